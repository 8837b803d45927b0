// src/display.rs
use serde::Serialize;
use serde_json::Value;

use crate::models::PredictionResult;

/// What the result panel shows for a finished submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOutcome {
    WillDefault,
    WillNotDefault,
    /// Only produced in strict mode, for bodies without a usable verdict.
    Inconclusive,
    Failure(String),
}

/// Serializable rendering of a `DisplayOutcome`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedOutcome {
    pub kind: &'static str,
    pub headline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl DisplayOutcome {
    /// Maps a prediction to what the user sees.
    ///
    /// A non-empty `error` string wins. Otherwise only `default: true` renders
    /// as "will default"; everything else renders as "will not default",
    /// except that in `strict` mode a body lacking a boolean `default` renders
    /// as inconclusive. Malformed bodies are probed with the same precedence.
    pub fn from_result(result: &PredictionResult, strict: bool) -> Self {
        let (error, default) = match result {
            PredictionResult::Verdict { default } => (None, Some(*default)),
            PredictionResult::Error { error } => (Some(error.as_str()), None),
            PredictionResult::Malformed(body) => (
                body.get("error").and_then(Value::as_str),
                body.get("default").and_then(Value::as_bool),
            ),
        };

        match (error.filter(|message| !message.is_empty()), default) {
            (Some(message), _) => DisplayOutcome::Failure(message.to_string()),
            (None, Some(true)) => DisplayOutcome::WillDefault,
            (None, Some(false)) => DisplayOutcome::WillNotDefault,
            (None, None) if strict => DisplayOutcome::Inconclusive,
            (None, None) => DisplayOutcome::WillNotDefault,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DisplayOutcome::WillDefault => "will_default",
            DisplayOutcome::WillNotDefault => "will_not_default",
            DisplayOutcome::Inconclusive => "inconclusive",
            DisplayOutcome::Failure(_) => "failure",
        }
    }

    pub fn headline(&self) -> &str {
        match self {
            DisplayOutcome::WillDefault => "⚠️ Customer Will Default",
            DisplayOutcome::WillNotDefault => "✅ Customer Will Not Default",
            DisplayOutcome::Inconclusive => "❔ Prediction Inconclusive",
            DisplayOutcome::Failure(message) => message.as_str(),
        }
    }

    pub fn detail(&self) -> Option<&'static str> {
        match self {
            DisplayOutcome::WillDefault => Some("The model predicts a high risk of loan default."),
            DisplayOutcome::WillNotDefault => {
                Some("The model predicts the customer is unlikely to default.")
            }
            DisplayOutcome::Inconclusive => {
                Some("The prediction service returned a response that is neither a verdict nor an error.")
            }
            DisplayOutcome::Failure(_) => None,
        }
    }

    pub fn render(&self) -> RenderedOutcome {
        RenderedOutcome {
            kind: self.kind(),
            headline: self.headline().to_string(),
            detail: self.detail().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verdicts() {
        let yes = DisplayOutcome::from_result(&PredictionResult::Verdict { default: true }, false);
        assert_eq!(yes, DisplayOutcome::WillDefault);
        assert_eq!(yes.headline(), "⚠️ Customer Will Default");

        let no = DisplayOutcome::from_result(&PredictionResult::Verdict { default: false }, true);
        assert_eq!(no, DisplayOutcome::WillNotDefault);
    }

    #[test]
    fn test_error_message_is_the_headline() {
        let outcome = DisplayOutcome::from_result(&PredictionResult::error("model offline"), false);
        let rendered = outcome.render();
        assert_eq!(rendered.kind, "failure");
        assert_eq!(rendered.headline, "model offline");
        assert_eq!(rendered.detail, None);
    }

    #[test]
    fn test_error_message_takes_precedence_over_verdict() {
        let body = PredictionResult::from_value(json!({"default": true, "error": "model offline"}));
        assert!(body.is_malformed());
        assert_eq!(
            DisplayOutcome::from_result(&body, false),
            DisplayOutcome::Failure("model offline".to_string())
        );
    }

    #[test]
    fn test_null_error_does_not_hide_default_true() {
        let body = PredictionResult::from_value(json!({"default": true, "error": null}));
        assert!(body.is_malformed());
        assert_eq!(DisplayOutcome::from_result(&body, false), DisplayOutcome::WillDefault);
        assert_eq!(DisplayOutcome::from_result(&body, true), DisplayOutcome::WillDefault);
        assert_eq!(
            DisplayOutcome::from_result(&body, false).headline(),
            "⚠️ Customer Will Default"
        );
    }

    #[test]
    fn test_empty_error_falls_through_to_verdict() {
        let body = PredictionResult::from_value(json!({"error": ""}));
        assert_eq!(DisplayOutcome::from_result(&body, false), DisplayOutcome::WillNotDefault);
        assert_eq!(DisplayOutcome::from_result(&body, true), DisplayOutcome::Inconclusive);

        let with_default = PredictionResult::from_value(json!({"default": true, "error": ""}));
        assert_eq!(
            DisplayOutcome::from_result(&with_default, false),
            DisplayOutcome::WillDefault
        );
    }

    #[test]
    fn test_malformed_depends_on_strictness() {
        let body = PredictionResult::Malformed(json!({"prediction": 1}));
        assert_eq!(DisplayOutcome::from_result(&body, false), DisplayOutcome::WillNotDefault);
        assert_eq!(DisplayOutcome::from_result(&body, true), DisplayOutcome::Inconclusive);
    }
}
