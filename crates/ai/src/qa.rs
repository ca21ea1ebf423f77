//! Natural-language business Q&A flow.

use serde::{Deserialize, Serialize};

use crate::flow::Flow;
use crate::model::AiError;

/// Compact numeric snapshot of the business, computed by the caller from the
/// tenant's own data. The model never sees raw documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessSnapshot {
    pub customers: u64,
    pub suppliers: u64,
    pub inventory_items: u64,
    pub low_stock_items: u64,
    pub open_invoices: u64,
    /// Smallest currency unit.
    pub outstanding_total: u64,
    /// Smallest currency unit.
    pub expenses_this_month: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessQuestion {
    pub question: String,
    pub snapshot: BusinessSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessAnswer {
    pub answer: String,
    #[serde(default)]
    pub caveats: Vec<String>,
}

/// One-shot Q&A over the snapshot.
pub struct AnswerBusinessQuestion;

impl Flow for AnswerBusinessQuestion {
    type Input = BusinessQuestion;
    type Output = BusinessAnswer;

    const NAME: &'static str = "answer_business_question";

    fn validate(input: &Self::Input) -> Result<(), AiError> {
        if input.question.trim().is_empty() {
            return Err(AiError::InvalidInput("question must not be empty".into()));
        }
        Ok(())
    }

    fn render_prompt(input: &Self::Input) -> String {
        // Snapshot serialization is infallible; it is a plain numeric struct.
        let snapshot = serde_json::to_string_pretty(&input.snapshot).unwrap_or_default();
        format!(
            "You are an assistant for a small-business owner.\n\
             Business snapshot (amounts are in cents):\n{snapshot}\n\n\
             Question: {question}\n\n\
             Respond with JSON only, matching:\n\
             {{\"answer\": string, \"caveats\": [string]}}",
            question = input.question.trim(),
        )
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::flow::run_flow;
    use crate::model::ModelClient;

    use super::*;

    struct CannedModel(&'static str);

    #[async_trait]
    impl ModelClient for CannedModel {
        async fn complete(&self, _prompt: &str) -> Result<String, AiError> {
            Ok(self.0.to_string())
        }
    }

    fn question(q: &str) -> BusinessQuestion {
        BusinessQuestion {
            question: q.to_string(),
            snapshot: BusinessSnapshot {
                customers: 12,
                open_invoices: 3,
                outstanding_total: 45000,
                ..BusinessSnapshot::default()
            },
        }
    }

    #[test]
    fn prompt_carries_question_and_snapshot() {
        let prompt = AnswerBusinessQuestion::render_prompt(&question("Who owes me money?"));
        assert!(prompt.contains("Who owes me money?"));
        assert!(prompt.contains("\"outstanding_total\": 45000"));
    }

    #[tokio::test]
    async fn parses_typed_answer() {
        let model = CannedModel(r#"{"answer": "Three invoices are open.", "caveats": []}"#);
        let out = run_flow::<AnswerBusinessQuestion>(&model, &question("Open invoices?"))
            .await
            .unwrap();
        assert_eq!(out.answer, "Three invoices are open.");
    }

    #[tokio::test]
    async fn parses_fenced_answer() {
        let model = CannedModel("```json\n{\"answer\": \"ok\"}\n```");
        let out = run_flow::<AnswerBusinessQuestion>(&model, &question("hm?"))
            .await
            .unwrap();
        assert_eq!(out.answer, "ok");
        assert!(out.caveats.is_empty());
    }

    #[tokio::test]
    async fn empty_question_rejected() {
        let model = CannedModel("{}");
        let err = run_flow::<AnswerBusinessQuestion>(&model, &question("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn malformed_response_surfaced() {
        let model = CannedModel("certainly! here's your answer:");
        let err = run_flow::<AnswerBusinessQuestion>(&model, &question("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::MalformedResponse(_)));
    }
}
