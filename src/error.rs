use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreasuryError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("{0}")]
    PreCondition(String),

    #[error(
        "No TreasuryDirect security found for CUSIP: {cusip}, IssueMonth: {issue_month}, IssueDayOfMonth: {issue_day_of_month}, and IssueYear: {issue_year}."
    )]
    NotFound {
        cusip: String,
        issue_month: String,
        issue_day_of_month: String,
        issue_year: String,
    },

    #[error("{0:?} property not found.")]
    MissingField(String),

    #[error("{field:?} value ({}) is not a valid {target}.", quote(.value))]
    Parse {
        field: String,
        value: Option<String>,
        target: &'static str,
    },

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

fn quote(value: &Option<String>) -> String {
    match value {
        Some(value) => format!("{value:?}"),
        None => "null".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, TreasuryError>;

/// Fails with a `PreCondition` error when `value` is empty.
pub(crate) fn ensure_not_empty(value: &str, name: &str) -> Result<()> {
    if value.is_empty() {
        return Err(TreasuryError::PreCondition(format!(
            "{name} cannot be empty."
        )));
    }
    Ok(())
}

/// Fails with a `PreCondition` error when `value` is below `min`.
pub(crate) fn ensure_at_least<T>(value: T, min: T, name: &str) -> Result<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min {
        return Err(TreasuryError::PreCondition(format!(
            "{name} ({value}) must be greater than or equal to {min}."
        )));
    }
    Ok(())
}
