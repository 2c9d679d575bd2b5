use core::fmt;
use core::hash::Hasher;
use core::ops::{Add, Mul, Neg, Sub};

use rustc_hash::FxHasher;

use crate::error::{Error, Result};
use crate::structures::fft;
use crate::utils::{approx_eq, strip_trailing_zeros};

/// Operand length at which `*` switches from the schoolbook product to the
/// FFT product.
pub const FFT_THRESHOLD: usize = 64;

/// Dense univariate polynomial with real coefficients.
///
/// Coefficients are stored in ascending order of degree:
/// `coeffs[i]` is the coefficient of `x^i`.
///
/// The coefficient vector is never empty and never ends in `0.0`, except for
/// the zero polynomial which is stored as the single coefficient `[0.0]`.
#[derive(Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

/// Content-derived identifier of a polynomial.
///
/// Structurally equal polynomials always share an id, so it can key caches
/// of data derived from the coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolyId(u64);

impl PolyId {
    /// Raw hash value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl Polynomial {
    /// Create a polynomial from coefficients in ascending order.
    ///
    /// `coeffs[i]` is the coefficient of `x^i`.
    /// Trailing zeros are automatically removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `coeffs` is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use realroot::Polynomial;
    ///
    /// // 3 + 2x + x^2
    /// let p = Polynomial::new(vec![3.0, 2.0, 1.0, 0.0]).unwrap();
    /// assert_eq!(p.degree(), 2);
    /// assert!(Polynomial::new(vec![]).is_err());
    /// ```
    pub fn new(coeffs: Vec<f64>) -> Result<Self> {
        if coeffs.is_empty() {
            return Err(Error::invalid_input(
                "polynomial needs at least one coefficient",
            ));
        }
        Ok(Self::from_raw(coeffs))
    }

    /// Build from a coefficient vector produced inside the crate.
    ///
    /// An empty vector becomes the zero polynomial.
    pub(crate) fn from_raw(mut coeffs: Vec<f64>) -> Self {
        if coeffs.is_empty() {
            coeffs.push(0.0);
        }
        strip_trailing_zeros(&mut coeffs);
        Self { coeffs }
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        Self { coeffs: vec![0.0] }
    }

    /// A constant polynomial.
    pub fn constant(c: f64) -> Self {
        Self { coeffs: vec![c] }
    }

    /// The polynomial `x`.
    pub fn x() -> Self {
        Self {
            coeffs: vec![0.0, 1.0],
        }
    }

    /// Create a monomial `c * x^n`.
    ///
    /// # Example
    ///
    /// ```
    /// use realroot::Polynomial;
    ///
    /// let m = Polynomial::monomial(3.0, 2); // 3x^2
    /// assert_eq!(m.degree(), 2);
    /// assert_eq!(m.eval(2.0), 12.0);
    /// ```
    pub fn monomial(c: f64, n: usize) -> Self {
        if c == 0.0 {
            return Self::zero();
        }
        let mut coeffs = vec![0.0; n + 1];
        coeffs[n] = c;
        Self { coeffs }
    }

    /// Create a monic polynomial from its roots: `(x - r1)(x - r2)...(x - rn)`.
    ///
    /// An empty root list gives the constant `1`.
    ///
    /// # Example
    ///
    /// ```
    /// use realroot::Polynomial;
    ///
    /// // (x - 2)(x - 5) = x^2 - 7x + 10
    /// let p = Polynomial::from_roots(&[2.0, 5.0]);
    /// assert_eq!(p.coefficients(), &[10.0, -7.0, 1.0]);
    /// ```
    pub fn from_roots(roots: &[f64]) -> Self {
        roots.iter().fold(Self::constant(1.0), |acc, &r| {
            acc.mul_naive(&Self {
                coeffs: vec![-r, 1.0],
            })
        })
    }

    /// Wilkinson's polynomial `(x - 1)(x - 2)...(x - n)`.
    ///
    /// Its roots are well separated, but the expanded coefficients grow fast
    /// enough to make it a classic stress input for root finders.
    pub fn wilkinson(n: usize) -> Self {
        let roots: Vec<f64> = (1..=n).map(|k| k as f64).collect();
        Self::from_roots(&roots)
    }

    /// Check if this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0] == 0.0
    }

    /// Check if this polynomial has degree 0 (the zero polynomial included).
    pub fn is_constant(&self) -> bool {
        self.coeffs.len() == 1
    }

    /// Check if the leading coefficient is exactly 1.
    pub fn is_monic(&self) -> bool {
        self.leading_coeff() == 1.0
    }

    /// Degree of the polynomial. The zero polynomial has degree 0.
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Number of stored coefficients, `degree() + 1`.
    pub fn num_coeffs(&self) -> usize {
        self.coeffs.len()
    }

    /// Coefficient of the highest-degree term.
    pub fn leading_coeff(&self) -> f64 {
        self.coeffs[self.coeffs.len() - 1]
    }

    /// Get the coefficient of `x^i`.
    ///
    /// Returns zero if `i` is beyond the polynomial's degree.
    pub fn coeff(&self, i: usize) -> f64 {
        self.coeffs.get(i).copied().unwrap_or(0.0)
    }

    /// Get a slice of all coefficients.
    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// Evaluate the polynomial at a point using Horner's method.
    ///
    /// NaN and infinities propagate as IEEE-754 arithmetic dictates.
    ///
    /// # Example
    ///
    /// ```
    /// use realroot::Polynomial;
    ///
    /// // p(x) = 1 + 2x + 3x^2
    /// let p = Polynomial::new(vec![1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(p.eval(2.0), 17.0);
    /// ```
    pub fn eval(&self, x: f64) -> f64 {
        // Horner's method: p(x) = a_0 + x(a_1 + x(a_2 + ... + x*a_n))
        let mut iter = self.coeffs.iter().rev();
        let mut result = iter.next().copied().unwrap_or(0.0);
        for &coeff in iter {
            result = result * x + coeff;
        }
        result
    }

    /// Compute the derivative.
    ///
    /// The derivative of any constant is the zero polynomial.
    ///
    /// # Example
    ///
    /// ```
    /// use realroot::Polynomial;
    ///
    /// // (4 + 3x + 2x^2 + x^3)' = 3 + 4x + 3x^2
    /// let f = Polynomial::new(vec![4.0, 3.0, 2.0, 1.0]).unwrap();
    /// assert_eq!(f.derivative().coefficients(), &[3.0, 4.0, 3.0]);
    /// ```
    pub fn derivative(&self) -> Self {
        if self.is_constant() {
            return Self::zero();
        }

        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &c)| c * i as f64)
            .collect();

        Self::from_raw(coeffs)
    }

    /// Compute the `n`-th derivative. `n = 0` returns a copy.
    pub fn nth_derivative(&self, n: usize) -> Self {
        let mut result = self.clone();
        for _ in 0..n {
            if result.is_zero() {
                break;
            }
            result = result.derivative();
        }
        result
    }

    /// Multiply by `x^offset`.
    ///
    /// The zero polynomial stays zero.
    pub fn shift_right(&self, offset: usize) -> Self {
        if self.is_zero() || offset == 0 {
            return self.clone();
        }
        let mut coeffs = vec![0.0; offset + self.coeffs.len()];
        coeffs[offset..].copy_from_slice(&self.coeffs);
        Self { coeffs }
    }

    /// Multiply every coefficient by `s`.
    ///
    /// Scaling by zero gives the canonical zero polynomial.
    pub fn scale(&self, s: f64) -> Self {
        if s == 0.0 {
            return Self::zero();
        }
        Self::from_raw(self.coeffs.iter().map(|&c| c * s).collect())
    }

    /// Polynomial multiplication using the O(n*m) convolution.
    ///
    /// This is the reference product the FFT path is checked against.
    pub fn mul_naive(&self, rhs: &Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return Self::zero();
        }

        let n = self.coeffs.len();
        let m = rhs.coeffs.len();
        let mut coeffs = vec![0.0; n + m - 1];

        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }

        Self::from_raw(coeffs)
    }

    /// Polynomial multiplication through the FFT, O(n log n).
    ///
    /// See [`fft::mul_fft`].
    pub fn mul_fft(&self, rhs: &Self) -> Self {
        fft::mul_fft(self, rhs)
    }

    /// Euclidean division: compute quotient and remainder.
    ///
    /// Returns `(q, r)` such that `self = q * divisor + r` and
    /// `deg(r) < deg(divisor)` (or `r` is zero). Each step aligns the
    /// divisor's leading term with the remainder's by a shift and a scalar
    /// factor, and that leading term is cleared exactly rather than left to
    /// rounding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DivisionByZero`] if the divisor is the zero polynomial.
    ///
    /// # Example
    ///
    /// ```
    /// use realroot::Polynomial;
    ///
    /// // (x^2 - 1) / (x - 1) = (x + 1), remainder 0
    /// let dividend = Polynomial::new(vec![-1.0, 0.0, 1.0]).unwrap();
    /// let divisor = Polynomial::new(vec![-1.0, 1.0]).unwrap();
    /// let (q, r) = dividend.div_rem(&divisor).unwrap();
    ///
    /// assert_eq!(q.coefficients(), &[1.0, 1.0]);
    /// assert!(r.is_zero());
    /// ```
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self)> {
        if divisor.is_zero() {
            return Err(Error::DivisionByZero);
        }

        let divisor_deg = divisor.degree();
        if self.degree() < divisor_deg || self.is_zero() {
            return Ok((Self::zero(), self.clone()));
        }

        let lead = divisor.leading_coeff();
        let mut remainder = self.coeffs.clone();
        let mut quotient = vec![0.0; self.degree() - divisor_deg + 1];

        for shift in (0..quotient.len()).rev() {
            let top = shift + divisor_deg;
            let factor = remainder[top] / lead;
            quotient[shift] = factor;

            if factor != 0.0 {
                // remainder -= factor * x^shift * divisor
                for (i, &d) in divisor.coeffs.iter().enumerate() {
                    remainder[shift + i] -= factor * d;
                }
            }
            remainder[top] = 0.0;
        }

        remainder.truncate(divisor_deg.max(1));
        Ok((Self::from_raw(quotient), Self::from_raw(remainder)))
    }

    /// Compute the remainder of division.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DivisionByZero`] if the divisor is the zero polynomial.
    pub fn rem(&self, divisor: &Self) -> Result<Self> {
        self.div_rem(divisor).map(|(_, r)| r)
    }

    /// Compare coefficient-wise with a tolerance.
    ///
    /// Polynomials of different degree are never equal. Each coefficient pair
    /// must satisfy `|a - b| <= epsilon * max(1, |a|, |b|)`.
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.coeffs.len() == other.coeffs.len()
            && self
                .coeffs
                .iter()
                .zip(&other.coeffs)
                .all(|(&a, &b)| approx_eq(a, b, epsilon))
    }

    /// Stable identifier derived from the coefficient values.
    ///
    /// `-0.0` hashes like `0.0` and every NaN hashes alike, so the id agrees
    /// with `==` on all non-NaN polynomials.
    pub fn id(&self) -> PolyId {
        let mut hasher = FxHasher::default();
        hasher.write_usize(self.coeffs.len());
        for &c in &self.coeffs {
            let bits = if c == 0.0 {
                0
            } else if c.is_nan() {
                f64::NAN.to_bits()
            } else {
                c.to_bits()
            };
            hasher.write_u64(bits);
        }
        PolyId(hasher.finish())
    }

    /// Cauchy's bound: every real root `r` satisfies `|r| < 1 + max |a_i / a_n|`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for constant polynomials, and when the
    /// bound overflows `f64` because the leading coefficient is tiny.
    ///
    /// # Example
    ///
    /// ```
    /// use realroot::Polynomial;
    ///
    /// let p = Polynomial::new(vec![1.0, -1.0, 0.0]).unwrap(); // 1 - x
    /// assert_eq!(p.cauchy_bound().unwrap(), 2.0);
    /// ```
    pub fn cauchy_bound(&self) -> Result<f64> {
        if self.is_constant() {
            return Err(Error::invalid_input(
                "Cauchy bound is undefined for a constant polynomial",
            ));
        }

        let lead = self.leading_coeff();
        let max_ratio = self.coeffs[..self.degree()]
            .iter()
            .map(|&c| (c / lead).abs())
            .fold(0.0, f64::max);

        let bound = 1.0 + max_ratio;
        if !bound.is_finite() {
            return Err(Error::invalid_input(format!(
                "Cauchy bound of {} is not finite",
                self
            )));
        }
        Ok(bound)
    }
}

/* ---- Arithmetic operators ---- */

impl Add<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Self::Output {
        let max_len = self.coeffs.len().max(rhs.coeffs.len());
        let coeffs = (0..max_len).map(|i| self.coeff(i) + rhs.coeff(i)).collect();
        Polynomial::from_raw(coeffs)
    }
}

impl Add for Polynomial {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl Add<&Polynomial> for Polynomial {
    type Output = Self;

    fn add(self, rhs: &Polynomial) -> Self::Output {
        &self + rhs
    }
}

impl Sub<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Self::Output {
        let max_len = self.coeffs.len().max(rhs.coeffs.len());
        let coeffs = (0..max_len).map(|i| self.coeff(i) - rhs.coeff(i)).collect();
        Polynomial::from_raw(coeffs)
    }
}

impl Sub for Polynomial {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        &self - &rhs
    }
}

impl Sub<&Polynomial> for Polynomial {
    type Output = Self;

    fn sub(self, rhs: &Polynomial) -> Self::Output {
        &self - rhs
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Self::Output {
        Polynomial {
            coeffs: self.coeffs.iter().map(|&c| -c).collect(),
        }
    }
}

impl Neg for Polynomial {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        for c in &mut self.coeffs {
            *c = -*c;
        }
        self
    }
}

impl Mul<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    /// Schoolbook product for small operands, FFT product once both operands
    /// have at least [`FFT_THRESHOLD`] coefficients.
    fn mul(self, rhs: &Polynomial) -> Self::Output {
        if self.coeffs.len().min(rhs.coeffs.len()) >= FFT_THRESHOLD {
            self.mul_fft(rhs)
        } else {
            self.mul_naive(rhs)
        }
    }
}

impl Mul for Polynomial {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}

impl Mul<&Polynomial> for Polynomial {
    type Output = Self;

    fn mul(self, rhs: &Polynomial) -> Self::Output {
        &self * rhs
    }
}

/// Scalar multiplication: polynomial * real
impl Mul<f64> for Polynomial {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl Mul<f64> for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let mut first = true;
        for (i, &coeff) in self.coeffs.iter().enumerate() {
            if coeff == 0.0 {
                continue;
            }

            let magnitude = if first {
                first = false;
                if coeff < 0.0 && i > 0 {
                    write!(f, "-")?;
                    -coeff
                } else {
                    coeff
                }
            } else if coeff < 0.0 {
                write!(f, " - ")?;
                -coeff
            } else {
                write!(f, " + ")?;
                coeff
            };

            match i {
                0 => write!(f, "{}", magnitude)?,
                1 if magnitude == 1.0 => write!(f, "x")?,
                1 => write!(f, "{}*x", magnitude)?,
                _ if magnitude == 1.0 => write!(f, "x^{}", i)?,
                _ => write!(f, "{}*x^{}", magnitude, i)?,
            }
        }

        Ok(())
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Polynomial {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Serialize as the plain coefficient list
        serde::Serialize::serialize(&self.coeffs, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Polynomial {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let coeffs: Vec<f64> = serde::Deserialize::deserialize(deserializer)?;
        Self::new(coeffs).map_err(serde::de::Error::custom)
    }
}
