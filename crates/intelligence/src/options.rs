use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Default number of cycles a replenishment order should cover.
pub const DEFAULT_TARGET_COVERAGE_CYCLES: f64 = 2.0;

/// Per-call tunables. Governance constants are not overridable here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ForecastOptions {
    /// How many predicted cycles of usage a recommendation aims to cover
    /// (before the capital protection cap is applied).
    pub target_coverage_cycles: f64,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            target_coverage_cycles: DEFAULT_TARGET_COVERAGE_CYCLES,
        }
    }
}

impl ForecastOptions {
    pub fn with_target_coverage_cycles(mut self, cycles: f64) -> Self {
        self.target_coverage_cycles = cycles;
        self
    }

    pub fn validate(&self) -> Result<(), ForecastError> {
        if !(self.target_coverage_cycles.is_finite() && self.target_coverage_cycles > 0.0) {
            return Err(ForecastError::InvalidOptions(format!(
                "target_coverage_cycles must be a finite positive number (got {})",
                self.target_coverage_cycles
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_two_cycles() {
        let options = ForecastOptions::default();
        assert_eq!(options.target_coverage_cycles, 2.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_or_non_finite_coverage() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let options = ForecastOptions::default().with_target_coverage_cycles(bad);
            assert!(matches!(options.validate(), Err(ForecastError::InvalidOptions(_))));
        }
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let options: ForecastOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ForecastOptions::default());

        let options: ForecastOptions =
            serde_json::from_str(r#"{"targetCoverageCycles":1.5}"#).unwrap();
        assert_eq!(options.target_coverage_cycles, 1.5);

        assert!(serde_json::from_str::<ForecastOptions>(r#"{"rollingWindow":5}"#).is_err());
    }
}
