use thiserror::Error;

use clinicops_core::DomainError;

/// Failure of a metrics computation.
///
/// Insufficient history is *not* an error: it yields dormant metrics.
/// Everything here is a caller defect or a contract drift, so nothing is
/// retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ForecastError {
    /// Records are inconsistent (out-of-order orders, negative quantities,
    /// missing item fields, records of another item, ...).
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// A governance constant no longer matches its contract value.
    #[error("governance constant drift: {0}")]
    Governance(String),
}

impl ForecastError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }
}

impl From<DomainError> for ForecastError {
    fn from(err: DomainError) -> Self {
        Self::MalformedInput(err.to_string())
    }
}
