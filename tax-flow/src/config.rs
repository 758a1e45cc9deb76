use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{FlowError, Result, ValidationError};
use crate::models::TaxInputs;

pub const API_URL_ENV: &str = "TAX_API_URL";
pub const SESSION_FILE_ENV: &str = "TAX_FLOW_SESSION_FILE";
pub const VALIDATION_ENV: &str = "TAX_FLOW_VALIDATION";
pub const DEFAULT_SESSION_FILE: &str = ".tax-flow/session.json";

/// Which input fields must be non-zero before a calculation is submitted.
///
/// `AllFieldsRequired` matches the reference client, which cannot tell an
/// unset field from a legitimate zero (no rent paid, no extra income).
/// `GrossIncomeRequired` only insists on the monthly gross income.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    #[default]
    AllFieldsRequired,
    GrossIncomeRequired,
}

impl ValidationPolicy {
    pub fn validate(self, inputs: &TaxInputs) -> std::result::Result<(), ValidationError> {
        let fields: Vec<&'static str> = match self {
            ValidationPolicy::AllFieldsRequired => inputs
                .fields()
                .into_iter()
                .filter(|(_, value)| *value == 0.0)
                .map(|(name, _)| name)
                .collect(),
            ValidationPolicy::GrossIncomeRequired => {
                if inputs.monthly_gross_income == 0.0 {
                    vec!["monthlyGrossIncome"]
                } else {
                    Vec::new()
                }
            }
        };

        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingRequiredFields { fields })
        }
    }
}

impl FromStr for ValidationPolicy {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" | "all" | "all_fields_required" => Ok(ValidationPolicy::AllFieldsRequired),
            "lenient" | "gross" | "gross_income_required" => {
                Ok(ValidationPolicy::GrossIncomeRequired)
            }
            other => Err(FlowError::Config(format!(
                "Unknown validation policy '{}', expected 'strict' or 'lenient'",
                other
            ))),
        }
    }
}

/// Client settings shared by the flows and the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_base: String,
    pub session_file: PathBuf,
    pub validation: ValidationPolicy,
}

impl ClientConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            validation: ValidationPolicy::default(),
        }
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    pub fn with_validation(mut self, validation: ValidationPolicy) -> Self {
        self.validation = validation;
        self
    }

    /// Build a config from `TAX_API_URL`, `TAX_FLOW_SESSION_FILE` and `TAX_FLOW_VALIDATION`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_base = lookup(API_URL_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| FlowError::Config(format!("{} is not set", API_URL_ENV)))?;

        let mut config = Self::new(api_base);
        if let Some(path) = lookup(SESSION_FILE_ENV) {
            config = config.with_session_file(path);
        }
        if let Some(policy) = lookup(VALIDATION_ENV) {
            config = config.with_validation(policy.parse()?);
        }
        Ok(config)
    }
}
