//! Sales forecasting flow.

use serde::{Deserialize, Serialize};

use crate::flow::Flow;
use crate::model::AiError;

/// Revenue for one calendar month, smallest currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySales {
    /// `YYYY-MM`.
    pub month: String,
    pub revenue: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesHistory {
    pub months: Vec<MonthlySales>,
    /// How many months ahead to predict.
    pub horizon: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyForecast {
    pub month: String,
    pub predicted_revenue: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesForecast {
    pub months: Vec<MonthlyForecast>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
}

/// One-shot forecast from monthly revenue history.
pub struct ForecastSales;

impl Flow for ForecastSales {
    type Input = SalesHistory;
    type Output = SalesForecast;

    const NAME: &'static str = "forecast_sales";

    fn validate(input: &Self::Input) -> Result<(), AiError> {
        if input.months.len() < 3 {
            return Err(AiError::InvalidInput(
                "forecast needs at least three months of history".into(),
            ));
        }
        if input.horizon == 0 || input.horizon > 12 {
            return Err(AiError::InvalidInput(
                "forecast horizon must be between 1 and 12 months".into(),
            ));
        }
        Ok(())
    }

    fn render_prompt(input: &Self::Input) -> String {
        let history = serde_json::to_string_pretty(&input.months).unwrap_or_default();
        format!(
            "You are a sales forecaster for a small business.\n\
             Monthly revenue history (amounts are in cents):\n{history}\n\n\
             Predict revenue for the next {horizon} month(s).\n\
             Respond with JSON only, matching:\n\
             {{\"months\": [{{\"month\": \"YYYY-MM\", \"predicted_revenue\": integer}}], \
             \"commentary\": string}}",
            horizon = input.horizon,
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

    fn history(n: usize) -> SalesHistory {
        SalesHistory {
            months: (1..=n)
                .map(|i| MonthlySales {
                    month: format!("2026-{i:02}"),
                    revenue: 100_000 + (i as u64) * 5_000,
                })
                .collect(),
            horizon: 2,
        }
    }

    #[tokio::test]
    async fn too_short_history_rejected() {
        let model = CannedModel("{}");
        let err = run_flow::<ForecastSales>(&model, &history(2)).await.unwrap_err();
        assert!(matches!(err, AiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn zero_horizon_rejected() {
        let model = CannedModel("{}");
        let mut input = history(4);
        input.horizon = 0;
        let err = run_flow::<ForecastSales>(&model, &input).await.unwrap_err();
        assert!(matches!(err, AiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn parses_typed_forecast() {
        let model = CannedModel(
            r#"{"months": [{"month": "2026-05", "predicted_revenue": 130000}],
                "commentary": "Steady growth."}"#,
        );
        let out = run_flow::<ForecastSales>(&model, &history(4)).await.unwrap();
        assert_eq!(out.months.len(), 1);
        assert_eq!(out.months[0].predicted_revenue, 130_000);
        assert_eq!(out.commentary.as_deref(), Some("Steady growth."));
    }

    #[test]
    fn prompt_names_the_horizon() {
        let prompt = ForecastSales::render_prompt(&history(3));
        assert!(prompt.contains("next 2 month(s)"));
        assert!(prompt.contains("2026-01"));
    }
}
