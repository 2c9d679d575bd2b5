use thiserror::Error;

/// Errors raised by polynomial construction, arithmetic and root finding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An argument violated a documented precondition.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An interval was given with its left bound above its right bound.
    #[error("invalid interval ({left}, {right}]: left bound exceeds right bound")]
    InvalidInterval { left: f64, right: f64 },

    /// Euclidean division by the zero polynomial.
    #[error("division by the zero polynomial")]
    DivisionByZero,

    /// Root finding on the zero polynomial.
    #[error("the zero polynomial has infinitely many roots")]
    InfiniteSolutions,

    /// A bounded single-root query found nothing.
    #[error("no solution in ({left}, {right}]")]
    NoSolutionInRange { left: f64, right: f64 },
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let e = Error::InvalidInterval {
            left: 2.0,
            right: 1.0,
        };
        assert_eq!(
            e.to_string(),
            "invalid interval (2, 1]: left bound exceeds right bound"
        );

        let e = Error::invalid_input("coefficient list is empty");
        assert_eq!(e.to_string(), "invalid input: coefficient list is empty");
    }

    #[test]
    fn no_solution_reports_bounds() {
        let e = Error::NoSolutionInRange {
            left: -1.0,
            right: 1.0,
        };
        assert_eq!(e.to_string(), "no solution in (-1, 1]");
    }
}
