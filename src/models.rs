// src/models.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

use crate::errors::PredictError;

/// The ten applicant attributes, spelled exactly as the endpoint expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Age,
    Income,
    Family,
    CcAvg,
    Education,
    Mortgage,
    SecuritiesAccount,
    CdAccount,
    Online,
    CreditCard,
}

impl FieldName {
    pub const ALL: [FieldName; 10] = [
        FieldName::Age,
        FieldName::Income,
        FieldName::Family,
        FieldName::CcAvg,
        FieldName::Education,
        FieldName::Mortgage,
        FieldName::SecuritiesAccount,
        FieldName::CdAccount,
        FieldName::Online,
        FieldName::CreditCard,
    ];

    /// Wire key for this field. Case-sensitive.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Age => "Age",
            FieldName::Income => "Income",
            FieldName::Family => "Family",
            FieldName::CcAvg => "CCAvg",
            FieldName::Education => "Education",
            FieldName::Mortgage => "Mortgage",
            FieldName::SecuritiesAccount => "Securities_Account",
            FieldName::CdAccount => "CD_Account",
            FieldName::Online => "Online",
            FieldName::CreditCard => "CreditCard",
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(
            self,
            FieldName::SecuritiesAccount
                | FieldName::CdAccount
                | FieldName::Online
                | FieldName::CreditCard
        )
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| PredictError::UnknownField(s.to_string()))
    }
}

/// A value coming from a form control: text inputs and selects produce text,
/// checkboxes produce a flag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Household size. The top choice means "four or more".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum FamilySize {
    #[default]
    One,
    Two,
    Three,
    FourOrMore,
}

impl FamilySize {
    /// Parses the value a select control submits ("1" through "4").
    pub fn from_choice(choice: &str) -> Result<Self, PredictError> {
        choice
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(|code| Self::try_from(code).ok())
            .ok_or_else(|| PredictError::InvalidChoice {
                field: FieldName::Family.as_str(),
                value: choice.to_string(),
            })
    }
}

impl From<FamilySize> for u8 {
    fn from(value: FamilySize) -> Self {
        match value {
            FamilySize::One => 1,
            FamilySize::Two => 2,
            FamilySize::Three => 3,
            FamilySize::FourOrMore => 4,
        }
    }
}

impl TryFrom<u8> for FamilySize {
    type Error = PredictError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(FamilySize::One),
            2 => Ok(FamilySize::Two),
            3 => Ok(FamilySize::Three),
            4 => Ok(FamilySize::FourOrMore),
            other => Err(PredictError::InvalidChoice {
                field: FieldName::Family.as_str(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum EducationLevel {
    #[default]
    Undergraduate,
    Graduate,
    Advanced,
}

impl EducationLevel {
    pub fn from_choice(choice: &str) -> Result<Self, PredictError> {
        choice
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(|code| Self::try_from(code).ok())
            .ok_or_else(|| PredictError::InvalidChoice {
                field: FieldName::Education.as_str(),
                value: choice.to_string(),
            })
    }
}

impl From<EducationLevel> for u8 {
    fn from(value: EducationLevel) -> Self {
        match value {
            EducationLevel::Undergraduate => 1,
            EducationLevel::Graduate => 2,
            EducationLevel::Advanced => 3,
        }
    }
}

impl TryFrom<u8> for EducationLevel {
    type Error = PredictError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(EducationLevel::Undergraduate),
            2 => Ok(EducationLevel::Graduate),
            3 => Ok(EducationLevel::Advanced),
            other => Err(PredictError::InvalidChoice {
                field: FieldName::Education.as_str(),
                value: other.to_string(),
            }),
        }
    }
}

/// Validated applicant attributes, serialized verbatim as the request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantInput {
    #[serde(rename = "Age")]
    pub age: Number,
    #[serde(rename = "Income")]
    pub income: Number,
    #[serde(rename = "Family")]
    pub family: FamilySize,
    #[serde(rename = "CCAvg")]
    pub cc_avg: Number,
    #[serde(rename = "Education")]
    pub education: EducationLevel,
    #[serde(rename = "Mortgage")]
    pub mortgage: Number,
    #[serde(rename = "Securities_Account")]
    pub securities_account: bool,
    #[serde(rename = "CD_Account")]
    pub cd_account: bool,
    #[serde(rename = "Online")]
    pub online: bool,
    #[serde(rename = "CreditCard")]
    pub credit_card: bool,
}

/// Parses entered text into a JSON number. Integers stay integers.
pub fn parse_number(field: FieldName, text: &str) -> Result<Number, PredictError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PredictError::MissingField(field.as_str()));
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Ok(Number::from(int));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| PredictError::InvalidNumber {
            field: field.as_str(),
            value: text.to_string(),
        })
}

/// What the prediction service answered.
///
/// A body is a `Verdict` only when it carries a boolean `default` and no
/// `error`; it is an `Error` only when it carries a string `error` and no
/// `default`. Anything else is passed through untouched as `Malformed`;
/// the display layer still reads `error` and `default` out of such bodies.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionResult {
    Verdict { default: bool },
    Error { error: String },
    Malformed(Value),
}

impl PredictionResult {
    pub fn error(message: impl Into<String>) -> Self {
        PredictionResult::Error {
            error: message.into(),
        }
    }

    pub fn from_value(value: Value) -> Self {
        let shape = value
            .as_object()
            .map(|body| (body.get("default"), body.get("error")));

        let decoded = match shape {
            Some((Some(Value::Bool(default)), None)) => Some(PredictionResult::Verdict { default: *default }),
            Some((None, Some(Value::String(error)))) => Some(PredictionResult::error(error.clone())),
            _ => None,
        };

        decoded.unwrap_or_else(|| PredictionResult::Malformed(value))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, PredictionResult::Malformed(_))
    }
}

impl<'de> Deserialize<'de> for PredictionResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(PredictionResult::from_value)
    }
}
