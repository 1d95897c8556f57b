//! Governance constants.
//!
//! These three values are load-bearing: changing any of them changes every
//! forecast the engine produces. Callers run [`verify`] once at startup and
//! the test suite asserts it before anything else.

use crate::error::ForecastError;

/// Days of slack above lead time before an item is merely "order soon".
pub const BUFFER_DAYS: i64 = 5;

/// Number of most recent valid cycles that feed the live forecast.
pub const ROLLING_WINDOW: usize = 3;

/// Capital protection multiplier: at most this many cycles of usage per order.
pub const CRITICALITY_FACTOR: f64 = 1.2;

/// Snapshot of the governance constants as compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GovernanceConstants {
    pub buffer_days: i64,
    pub rolling_window: usize,
    pub criticality_factor: f64,
}

impl GovernanceConstants {
    /// The values callers are contractually promised.
    pub const CONTRACT: GovernanceConstants = GovernanceConstants {
        buffer_days: 5,
        rolling_window: 3,
        criticality_factor: 1.2,
    };

    pub const fn current() -> Self {
        Self {
            buffer_days: BUFFER_DAYS,
            rolling_window: ROLLING_WINDOW,
            criticality_factor: CRITICALITY_FACTOR,
        }
    }
}

/// Check that the compiled constants match the contract and are usable.
pub fn verify() -> Result<(), ForecastError> {
    check(GovernanceConstants::current())
}

fn check(actual: GovernanceConstants) -> Result<(), ForecastError> {
    let contract = GovernanceConstants::CONTRACT;

    if actual.buffer_days != contract.buffer_days {
        return Err(ForecastError::Governance(format!(
            "BUFFER_DAYS is {}, contract requires {}",
            actual.buffer_days, contract.buffer_days
        )));
    }
    if actual.rolling_window != contract.rolling_window {
        return Err(ForecastError::Governance(format!(
            "ROLLING_WINDOW is {}, contract requires {}",
            actual.rolling_window, contract.rolling_window
        )));
    }
    if actual.criticality_factor.to_bits() != contract.criticality_factor.to_bits() {
        return Err(ForecastError::Governance(format!(
            "CRITICALITY_FACTOR is {}, contract requires {}",
            actual.criticality_factor, contract.criticality_factor
        )));
    }
    Ok(())
}
