// src/config.rs
use serde::Deserialize;
use std::path::Path;
use crate::errors::{PredictError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://loan-default-backend.onrender.com/predict";
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// High-level application configuration loaded from environment variables
/// and, optionally, a TOML file named by `PREDICTOR_CONFIG`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// URL the applicant JSON is POSTed to.
    pub endpoint: String,

    /// When set, responses that are neither a verdict nor an error render as
    /// inconclusive instead of "will not default".
    pub strict_verdicts: bool,

    /// Address the local form server listens on.
    pub bind: String,
}

/// Shape of the optional TOML config file. Every key may be omitted.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub strict_verdicts: Option<bool>,

    #[serde(default)]
    pub bind: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            strict_verdicts: false,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup. The TOML file (if
    /// any) is applied first, then individual variables override it.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("PREDICTOR_CONFIG") {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(endpoint) = lookup("PREDICT_ENDPOINT") {
            config.endpoint = endpoint.trim().to_string();
        }
        if let Some(flag) = lookup("PREDICT_STRICT_VERDICTS") {
            config.strict_verdicts = parse_flag("PREDICT_STRICT_VERDICTS", &flag)?;
        }
        if let Some(bind) = lookup("PREDICTOR_BIND") {
            config.bind = bind.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML config file, filling missing keys with defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(raw)?;
        let defaults = Self::default();
        let config = Self {
            endpoint: file.endpoint.unwrap_or(defaults.endpoint),
            strict_verdicts: file.strict_verdicts.unwrap_or(defaults.strict_verdicts),
            bind: file.bind.unwrap_or(defaults.bind),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(PredictError::Config(format!(
                "Prediction endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.bind.is_empty() {
            return Err(PredictError::Config("Bind address must not be empty".to_string()));
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(PredictError::Config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
