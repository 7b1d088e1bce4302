//! Error type shared by every fallible operation in the crate.
//!
//! Numeric routines never signal failure through NaN, infinity or a
//! sentinel value: invalid parameters, too-short inputs and unrepresentable
//! results all surface as a [`StatError`].

use std::fmt;

/// Error returned by distribution, sampling, regression and binning routines.
#[derive(Debug, Clone, PartialEq)]
pub enum StatError {
    /// A parameter or argument lies outside its valid domain
    /// (e.g. `std ≤ 0`, `p ∉ [0, 1]`, mismatched input lengths).
    Domain(String),

    /// Fewer observations than the operation requires.
    InsufficientData {
        /// Number of observations provided.
        got: usize,
        /// Minimum number of observations required.
        min: usize,
    },

    /// A result cannot be represented as a finite `f64`.
    NumericOverflow(String),
}

impl StatError {
    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        StatError::Domain(msg.into())
    }

    pub(crate) fn insufficient(got: usize, min: usize) -> Self {
        StatError::InsufficientData { got, min }
    }
}

impl fmt::Display for StatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatError::Domain(msg) => write!(f, "domain error: {msg}"),
            StatError::InsufficientData { got, min } => {
                write!(f, "insufficient data: got {got} observations, need at least {min}")
            }
            StatError::NumericOverflow(msg) => write!(f, "numeric overflow: {msg}"),
        }
    }
}

impl std::error::Error for StatError {}

/// Requires `value` to be finite, naming it in the error otherwise.
pub(crate) fn ensure_finite(name: &str, value: f64) -> Result<f64, StatError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(StatError::domain(format!("{name} must be finite, got {value}")))
    }
}

/// Requires `value` to be finite and strictly positive.
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<f64, StatError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(StatError::domain(format!("{name} must be > 0, got {value}")))
    }
}

/// Requires `value` to be a probability in `[0, 1]`.
pub(crate) fn ensure_probability(name: &str, value: f64) -> Result<f64, StatError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(StatError::domain(format!("{name} must lie in [0, 1], got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_domain() {
        let e = StatError::domain("std must be > 0, got 0");
        assert_eq!(e.to_string(), "domain error: std must be > 0, got 0");
    }

    #[test]
    fn test_display_insufficient() {
        let e = StatError::insufficient(1, 2);
        assert_eq!(
            e.to_string(),
            "insufficient data: got 1 observations, need at least 2"
        );
    }

    #[test]
    fn test_guards() {
        assert!(ensure_finite("x", f64::NAN).is_err());
        assert_eq!(ensure_finite("x", 1.5), Ok(1.5));
        assert!(ensure_positive("std", 0.0).is_err());
        assert!(ensure_positive("std", f64::INFINITY).is_err());
        assert!(ensure_probability("p", 1.0).is_ok());
        assert!(ensure_probability("p", -0.1).is_err());
        assert!(ensure_probability("p", f64::NAN).is_err());
    }
}
