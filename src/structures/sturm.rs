//! Sturm sequences and sign-variation root counting.
//!
//! For a polynomial `p` the chain is `P0 = p`, `P1 = p'` and
//! `P(k+1) = -rem(P(k-1), P(k))`. If `V(x)` is the number of sign changes in
//! `(P0(x), P1(x), ...)` with exact zeros skipped, then `V(a) - V(b)` is the
//! number of distinct real roots of `p` in `(a, b]`.
//!
//! When `p` has repeated roots the chain stops at the first zero remainder and
//! its last element is `gcd(p, p')` up to scaling. The variation difference
//! still counts each distinct root once.

use crate::error::{Error, Result};
use crate::structures::poly::Polynomial;
use crate::utils::sign;

/// The Sturm sequence of a polynomial.
///
/// # Example
///
/// ```
/// use realroot::{Polynomial, SturmChain};
///
/// // x^2 - 1 has roots at -1 and 1
/// let p = Polynomial::new(vec![-1.0, 0.0, 1.0]).unwrap();
/// let chain = SturmChain::new(&p);
///
/// assert_eq!(chain.count_roots(-2.0, 2.0).unwrap(), 2);
/// assert_eq!(chain.count_roots(0.0, 2.0).unwrap(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SturmChain {
    polys: Vec<Polynomial>,
}

impl SturmChain {
    /// Build the chain for `p`.
    ///
    /// A constant `p` yields the one-element chain `[p]`. This includes the
    /// zero polynomial, whose chain reports no roots anywhere, so callers
    /// that must tell "no roots" from "every point is a root" check
    /// [`Polynomial::is_zero`] first. Otherwise the chain has between 2 and
    /// `deg(p) + 1` elements.
    pub fn new(p: &Polynomial) -> Self {
        if p.is_constant() {
            return Self {
                polys: vec![p.clone()],
            };
        }

        let max_len = p.degree() + 1;
        let mut polys = Vec::with_capacity(max_len);
        polys.push(p.clone());
        polys.push(p.derivative());

        while polys.len() < max_len {
            let n = polys.len();
            let last = &polys[n - 1];
            if last.is_constant() {
                break;
            }

            // `last` is non-constant, so the division is always defined.
            let Ok(rem) = polys[n - 2].rem(last) else {
                break;
            };
            if rem.is_zero() {
                break;
            }
            polys.push(-rem);
        }

        Self { polys }
    }

    /// Number of polynomials in the chain.
    pub fn len(&self) -> usize {
        self.polys.len()
    }

    /// Always `false`; every chain holds at least its source polynomial.
    pub fn is_empty(&self) -> bool {
        self.polys.is_empty()
    }

    /// The chain elements, starting with the source polynomial.
    pub fn polys(&self) -> &[Polynomial] {
        &self.polys
    }

    /// The polynomial the chain was built from.
    pub fn polynomial(&self) -> &Polynomial {
        &self.polys[0]
    }

    /// Sign variations of the chain evaluated at `x`.
    pub fn sign_variations(&self, x: f64) -> usize {
        let values: Vec<f64> = self.polys.iter().map(|p| p.eval(x)).collect();
        count_sign_variations(&values)
    }

    /// Raw variation difference `V(a) - V(b)` for `(a, b]`.
    ///
    /// The result can be negative when rounding corrupts an evaluation; the
    /// solver clamps it. A one-element chain always reports 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInterval`] if `a > b` or either bound is NaN.
    pub fn count_roots(&self, a: f64, b: f64) -> Result<isize> {
        if a.is_nan() || b.is_nan() || a > b {
            return Err(Error::InvalidInterval { left: a, right: b });
        }
        Ok(self.variation_difference(a, b))
    }

    /// [`count_roots`](Self::count_roots) for bounds already known to be ordered.
    pub(crate) fn variation_difference(&self, a: f64, b: f64) -> isize {
        if self.polys.len() == 1 {
            return 0;
        }
        self.sign_variations(a) as isize - self.sign_variations(b) as isize
    }
}

/// Count sign changes between consecutive nonzero values.
///
/// Exact zeros are dropped before comparing neighbours, so
/// `[1, 0, -1]` has one variation.
///
/// # Example
///
/// ```
/// use realroot::structures::sturm::count_sign_variations;
///
/// assert_eq!(count_sign_variations(&[1.0, -2.0, 0.0, 3.0]), 2);
/// assert_eq!(count_sign_variations(&[]), 0);
/// ```
pub fn count_sign_variations(values: &[f64]) -> usize {
    let mut variations = 0;
    let mut prev = 0i8;

    for &v in values {
        let s = sign(v);
        if s == 0 {
            continue;
        }
        if prev != 0 && s != prev {
            variations += 1;
        }
        prev = s;
    }

    variations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(coeffs: &[f64]) -> Polynomial {
        Polynomial::new(coeffs.to_vec()).unwrap()
    }

    #[test]
    fn sign_variations_skip_zeros() {
        assert_eq!(count_sign_variations(&[1.0, 0.0, -1.0]), 1);
        assert_eq!(count_sign_variations(&[0.0, 0.0]), 0);
        assert_eq!(count_sign_variations(&[1.0, 2.0, 3.0]), 0);
        assert_eq!(count_sign_variations(&[1.0, -1.0, 1.0, -1.0]), 3);
    }

    #[test]
    fn sign_variations_tiny_values() {
        // A raw product of these would underflow to zero.
        assert_eq!(count_sign_variations(&[1e-200, -1e-200]), 1);
    }

    #[test]
    fn constant_chain() {
        let chain = SturmChain::new(&Polynomial::constant(4.0));
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.count_roots(-10.0, 10.0).unwrap(), 0);

        let zero_chain = SturmChain::new(&Polynomial::zero());
        assert_eq!(zero_chain.len(), 1);
        assert_eq!(zero_chain.count_roots(-10.0, 10.0).unwrap(), 0);
    }

    #[test]
    fn linear_chain() {
        let p = poly(&[-3.0, 2.0]);
        let chain = SturmChain::new(&p);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.polys()[1].coefficients(), &[2.0]);
        assert_eq!(chain.count_roots(0.0, 2.0).unwrap(), 1);
        assert_eq!(chain.count_roots(2.0, 5.0).unwrap(), 0);
    }

    #[test]
    fn cubic_chain_elements() {
        // p = x^3 - 3x + 1
        let p = poly(&[1.0, -3.0, 0.0, 1.0]);
        let chain = SturmChain::new(&p);

        assert_eq!(chain.len(), 4);
        assert_eq!(chain.polynomial(), &p);
        assert_eq!(chain.polys()[1].coefficients(), &[-3.0, 0.0, 3.0]);
        // -rem(p, p') = 2x - 1
        assert!(chain.polys()[2].approx_eq(&poly(&[-1.0, 2.0]), 1e-12));
        assert_eq!(chain.polys()[3].degree(), 0);

        assert_eq!(chain.count_roots(-2.0, 2.0).unwrap(), 3);
        assert_eq!(chain.count_roots(0.0, 1.0).unwrap(), 1);
    }

    #[test]
    fn half_open_interval() {
        // (x - 1)(x - 2)
        let chain = SturmChain::new(&poly(&[2.0, -3.0, 1.0]));
        assert_eq!(chain.count_roots(1.0, 2.0).unwrap(), 1); // only 2
        assert_eq!(chain.count_roots(0.0, 1.0).unwrap(), 1); // only 1
        assert_eq!(chain.count_roots(1.0, 1.0).unwrap(), 0);
    }

    #[test]
    fn repeated_root_chain_stops_at_gcd() {
        // (x - 1)^2 (x + 2) = x^3 - 3x + 2
        let p = poly(&[2.0, -3.0, 0.0, 1.0]);
        let chain = SturmChain::new(&p);

        assert_eq!(chain.len(), 3);
        assert!(chain.polys()[2].approx_eq(&poly(&[-2.0, 2.0]), 1e-12));
        assert_eq!(chain.count_roots(-5.0, 5.0).unwrap(), 2);
    }

    #[test]
    fn chain_never_exceeds_degree_plus_one() {
        let p = Polynomial::wilkinson(8);
        let chain = SturmChain::new(&p);
        assert!(chain.len() <= p.degree() + 1);
        assert!(!chain.is_empty());
    }

    #[test]
    fn reversed_interval_is_rejected() {
        let chain = SturmChain::new(&poly(&[-1.0, 1.0]));
        assert_eq!(
            chain.count_roots(3.0, 1.0),
            Err(Error::InvalidInterval {
                left: 3.0,
                right: 1.0
            })
        );
        assert!(chain.count_roots(f64::NAN, 1.0).is_err());
    }
}
