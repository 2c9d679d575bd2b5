use crate::error::{Error, Result};

/// A half-open real interval `(left, right]`.
///
/// Both bounds are finite and `left <= right`. A degenerate interval with
/// `left == right` contains no points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "(f64, f64)", into = "(f64, f64)")
)]
pub struct Interval {
    left: f64,
    right: f64,
}

impl Interval {
    /// Create the interval `(left, right]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInterval`] if `left > right` or either bound is
    /// NaN or infinite.
    pub fn new(left: f64, right: f64) -> Result<Self> {
        if !left.is_finite() || !right.is_finite() || left > right {
            return Err(Error::InvalidInterval { left, right });
        }
        Ok(Self { left, right })
    }

    /// Open lower bound.
    pub fn left(&self) -> f64 {
        self.left
    }

    /// Closed upper bound.
    pub fn right(&self) -> f64 {
        self.right
    }

    /// `right - left`, which overflows to infinity past `f64::MAX`.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Always finite and within `[left, right]`.
    pub fn midpoint(&self) -> f64 {
        let mid = self.left + 0.5 * (self.right - self.left);
        if mid.is_finite() {
            mid
        } else {
            0.5 * self.left + 0.5 * self.right
        }
    }

    /// Check `left < x <= right`.
    pub fn contains(&self, x: f64) -> bool {
        self.left < x && x <= self.right
    }

    /// Split at the midpoint into `(left, mid]` and `(mid, right]`.
    ///
    /// Returns `None` once the midpoint is no longer strictly inside, i.e.
    /// the bounds are adjacent floats.
    pub fn split(&self) -> Option<(Self, Self)> {
        let mid = self.midpoint();
        if mid <= self.left || mid >= self.right {
            return None;
        }
        Some((
            Self {
                left: self.left,
                right: mid,
            },
            Self {
                left: mid,
                right: self.right,
            },
        ))
    }
}

impl TryFrom<(f64, f64)> for Interval {
    type Error = Error;

    fn try_from((left, right): (f64, f64)) -> Result<Self> {
        Self::new(left, right)
    }
}

impl From<Interval> for (f64, f64) {
    fn from(interval: Interval) -> Self {
        (interval.left, interval.right)
    }
}

/// An intersection point `(x, y)` of two polynomials.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
