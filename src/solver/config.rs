use crate::error::{Error, Result};

/// Strategy used to shrink an isolating interval down to a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Refinement {
    /// Sturm-count bisection. Deterministic and always converges.
    #[default]
    Bisection,
    /// Newton-Raphson from random starting points inside the interval,
    /// falling back to bisection once the restart budget runs out.
    Newton,
}

/// Tuning knobs for [`Solver`](super::Solver).
///
/// # Example
///
/// ```
/// use realroot::{Refinement, SolverConfig};
///
/// let config = SolverConfig::default()
///     .with_refinement(Refinement::Newton)
///     .with_newton_iterations(100)
///     .unwrap()
///     .with_seed(7);
///
/// assert!(config.validate().is_ok());
/// assert!(SolverConfig::default().with_bisect_precision(-1.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Newton steps per starting point.
    pub newton_iterations: usize,
    /// Bisection stops once the bracket is no wider than this.
    pub bisect_precision: f64,
    /// Random restarts before Newton gives up and bisects.
    pub newton_max_restarts: usize,
    pub refinement: Refinement,
    /// Seed for the Newton starting points. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            newton_iterations: 500,
            bisect_precision: 1e-6,
            newton_max_restarts: 64,
            refinement: Refinement::Bisection,
            seed: None,
        }
    }
}

impl SolverConfig {
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `iterations` is zero.
    pub fn with_newton_iterations(mut self, iterations: usize) -> Result<Self> {
        self.newton_iterations = iterations;
        self.validate()?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] unless `precision` is finite and
    /// positive.
    pub fn with_bisect_precision(mut self, precision: f64) -> Result<Self> {
        self.bisect_precision = precision;
        self.validate()?;
        Ok(self)
    }

    pub fn with_newton_max_restarts(mut self, restarts: usize) -> Self {
        self.newton_max_restarts = restarts;
        self
    }

    pub fn with_refinement(mut self, refinement: Refinement) -> Self {
        self.refinement = refinement;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the knobs are usable. Needed after editing fields directly or
    /// deserializing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `newton_iterations` is zero or
    /// `bisect_precision` is not a finite positive number.
    pub fn validate(&self) -> Result<()> {
        if self.newton_iterations == 0 {
            return Err(Error::invalid_input("newton_iterations must be at least 1"));
        }
        if !(self.bisect_precision.is_finite() && self.bisect_precision > 0.0) {
            return Err(Error::invalid_input(format!(
                "bisect_precision must be finite and positive, got {}",
                self.bisect_precision
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = SolverConfig::default();
        assert_eq!(c.newton_iterations, 500);
        assert_eq!(c.bisect_precision, 1e-6);
        assert_eq!(c.refinement, Refinement::Bisection);
        assert!(c.seed.is_none());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn builders_chain() {
        let c = SolverConfig::default()
            .with_bisect_precision(1e-9)
            .unwrap()
            .with_newton_max_restarts(3)
            .with_seed(42);
        assert_eq!(c.bisect_precision, 1e-9);
        assert_eq!(c.newton_max_restarts, 3);
        assert_eq!(c.seed, Some(42));
    }

    #[test]
    fn validate_rejects_bad_knobs() {
        assert!(matches!(
            SolverConfig::default().with_newton_iterations(0),
            Err(Error::InvalidInput(_))
        ));
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(SolverConfig::default().with_bisect_precision(bad).is_err());
        }

        let mut c = SolverConfig::default();
        c.newton_iterations = 0;
        assert!(c.validate().is_err());
    }
}
