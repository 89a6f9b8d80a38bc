// src/error.rs
use thiserror::Error;

/// Error taxonomy for the bs-surface library
#[derive(Debug, Error)]
pub enum PricingError {
    /// Invalid numeric input to a closed-form formula
    #[error("Domain error for '{parameter}' = {value}: {constraint}")]
    Domain {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// A series is too short for the requested statistic
    #[error("Insufficient data for {context}: need at least {required} points, got {actual}")]
    InsufficientData {
        context: String,
        required: usize,
        actual: usize,
    },

    /// Unrecognised strategy, estimator or scale name
    #[error("Invalid argument '{argument}' = \"{value}\": expected {expected}")]
    InvalidArgument {
        argument: String,
        value: String,
        expected: String,
    },

    /// The market-data collaborator could not resolve a ticker or series
    #[error("Upstream data unavailable from {source_name}: {reason}")]
    UpstreamUnavailable { source_name: String, reason: String },

    /// Export of computed matrices failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PricingError {
    /// True for errors caused by an invalid closed-form input.
    pub fn is_domain(&self) -> bool {
        matches!(self, PricingError::Domain { .. })
    }

    pub(crate) fn domain(parameter: &str, value: f64, constraint: impl Into<String>) -> Self {
        PricingError::Domain {
            parameter: parameter.to_string(),
            value,
            constraint: constraint.into(),
        }
    }

    pub(crate) fn invalid_argument(argument: &str, value: &str, expected: impl Into<String>) -> Self {
        PricingError::InvalidArgument {
            argument: argument.to_string(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    pub(crate) fn upstream(source_name: &str, reason: impl Into<String>) -> Self {
        PricingError::UpstreamUnavailable {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for bs-surface operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Validation utilities
pub mod validation {
    use super::{PricingError, PricingResult};

    /// Validate that a parameter is finite and strictly positive
    pub fn validate_positive(name: &str, value: f64) -> PricingResult<()> {
        validate_finite(name, value)?;
        if value <= 0.0 {
            Err(PricingError::domain(name, value, "must be positive (> 0)"))
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is finite and non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> PricingResult<()> {
        validate_finite(name, value)?;
        if value < 0.0 {
            Err(PricingError::domain(name, value, "must be non-negative (≥ 0)"))
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> PricingResult<()> {
        if !value.is_finite() {
            Err(PricingError::domain(
                name,
                value,
                "must be finite (not NaN or infinite)",
            ))
        } else {
            Ok(())
        }
    }

    /// Validate that expiry `big_t` lies strictly after the elapsed time `t`
    pub fn validate_time_to_expiry(big_t: f64, t: f64) -> PricingResult<()> {
        validate_finite("T", big_t)?;
        validate_finite("t", t)?;
        let tau = big_t - t;
        if tau <= 0.0 {
            Err(PricingError::domain(
                "T - t",
                tau,
                format!("time to expiry must be positive (T = {}, t = {})", big_t, t),
            ))
        } else {
            Ok(())
        }
    }

    /// Validate that a series holds at least `required` points
    pub fn validate_min_len(context: &str, actual: usize, required: usize) -> PricingResult<()> {
        if actual < required {
            Err(PricingError::InsufficientData {
                context: context.to_string(),
                required,
                actual,
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("sigma", 0.2).is_ok());
        assert!(validate_positive("sigma", 0.0).is_err());
        assert!(validate_positive("sigma", -0.1).is_err());
        assert!(validate_positive("sigma", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("value", 1.0).is_ok());
        assert!(validate_finite("value", f64::NAN).is_err());
        assert!(validate_finite("value", f64::INFINITY).is_err());
        assert!(validate_finite("value", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_validate_time_to_expiry() {
        assert!(validate_time_to_expiry(1.0, 0.0).is_ok());
        assert!(validate_time_to_expiry(1.0, 1.0).unwrap_err().is_domain());
        assert!(validate_time_to_expiry(0.5, 1.0).is_err());
    }

    #[test]
    fn test_validate_min_len() {
        assert!(validate_min_len("prices", 3, 2).is_ok());
        match validate_min_len("prices", 1, 2) {
            Err(PricingError::InsufficientData {
                required, actual, ..
            }) => {
                assert_eq!(required, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn test_error_display() {
        let error = PricingError::Domain {
            parameter: "sigma".to_string(),
            value: -0.1,
            constraint: "must be positive".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("sigma"));
        assert!(display.contains("-0.1"));
        assert!(display.contains("positive"));
    }

    #[test]
    fn test_invalid_argument_display() {
        let error = PricingError::invalid_argument("method", "garch", "one of std, log");
        let display = error.to_string();
        assert!(display.contains("garch"));
        assert!(display.contains("method"));
    }
}
