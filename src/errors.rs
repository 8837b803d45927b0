// src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Field '{field}' expects a {expected} value")]
    FieldTypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    #[error("'{value}' is not a valid choice for {field}")]
    InvalidChoice { field: &'static str, value: String },

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("A prediction request is already in flight")]
    SubmitInFlight,
}

impl PredictError {
    /// Errors the user can fix by editing the form.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PredictError::UnknownField(_)
                | PredictError::FieldTypeMismatch { .. }
                | PredictError::InvalidChoice { .. }
                | PredictError::MissingField(_)
                | PredictError::InvalidNumber { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PredictError>;
