//! Flow definition and execution.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::model::{AiError, ModelClient};

/// A prompt/response flow with schema-typed ends.
pub trait Flow {
    type Input: Serialize + Send + Sync;
    type Output: DeserializeOwned;

    /// Stable flow name, used for logging.
    const NAME: &'static str;

    /// Reject inputs the template cannot do anything sensible with.
    fn validate(input: &Self::Input) -> Result<(), AiError> {
        let _ = input;
        Ok(())
    }

    /// Render the fixed prompt template for this input.
    fn render_prompt(input: &Self::Input) -> String;
}

/// Run a flow: validate, render, one model round trip, parse.
pub async fn run_flow<F: Flow>(
    model: &dyn ModelClient,
    input: &F::Input,
) -> Result<F::Output, AiError> {
    F::validate(input)?;
    let prompt = F::render_prompt(input);

    tracing::debug!(flow = F::NAME, "dispatching model call");
    let raw = model.complete(&prompt).await?;

    serde_json::from_str(strip_fences(&raw))
        .map_err(|e| AiError::MalformedResponse(format!("{} ({e})", F::NAME)))
}

/// Hosted models habitually wrap JSON in markdown fences; tolerate that.
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_plain_fences() {
        assert_eq!(strip_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn strips_json_fences() {
        assert_eq!(strip_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn leaves_bare_json_alone() {
        assert_eq!(strip_fences(" {\"a\":1} "), "{\"a\":1}");
    }
}
