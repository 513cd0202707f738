//! Input validation helpers.
//!
//! Uses `!is_finite()` to reject NaN, +Inf and -Inf uniformly. Construction
//! guards report [`FxVolError::InvalidInput`]; query guards report
//! [`FxVolError::DomainError`].

use crate::error::FxVolError;

/// Validate that a construction input is strictly positive and finite.
pub(crate) fn validate_positive(value: f64, name: &str) -> crate::error::Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(FxVolError::invalid(format!(
            "{name} must be positive and finite, got {value}"
        )));
    }
    Ok(value)
}

/// Validate that a construction input is finite (allows zero and negatives).
pub(crate) fn validate_finite(value: f64, name: &str) -> crate::error::Result<f64> {
    if !value.is_finite() {
        return Err(FxVolError::invalid(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(value)
}

/// Validate that a query argument is strictly positive and finite.
pub(crate) fn require_positive(value: f64, name: &str) -> crate::error::Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(FxVolError::domain(format!(
            "{name} must be positive and finite, got {value}"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_guards_report_invalid_input() {
        assert!(validate_positive(0.5, "time").is_ok());
        assert!(matches!(
            validate_positive(0.0, "time"),
            Err(FxVolError::InvalidInput { .. })
        ));
        assert!(matches!(
            validate_finite(f64::NAN, "rr"),
            Err(FxVolError::InvalidInput { .. })
        ));
        assert!(validate_finite(-0.01, "rr").is_ok());
    }

    #[test]
    fn query_guards_report_domain_error() {
        assert!(matches!(
            require_positive(-1.0, "forward"),
            Err(FxVolError::DomainError { .. })
        ));
        assert!(matches!(
            require_positive(f64::INFINITY, "strike"),
            Err(FxVolError::DomainError { .. })
        ));
    }
}
