//! Fast Fourier Transform for polynomial multiplication over the reals.
//!
//! Radix-2 Cooley-Tukey on [`Complex64`] buffers whose length is a power of
//! two. Real coefficients are lifted into the complex plane, transformed,
//! multiplied pointwise and brought back, which turns an O(n·m) convolution
//! into O(n log n) work.
//!
//! # Accuracy
//!
//! The product is exact only up to floating-point rounding. Results are
//! typically within a few ulps of the schoolbook product scaled by the
//! magnitude of the largest coefficients, which is why the `*` operator on
//! [`Polynomial`] only switches to this path for large operands.

use core::f64::consts::PI;

use num_complex::Complex64;

use crate::structures::poly::Polynomial;

/// A precomputed FFT plan for a specific size.
///
/// This caches twiddle factors for repeated transforms of the same length.
///
/// # Example
///
/// ```
/// use realroot::fft::FftPlan;
/// use realroot::Polynomial;
///
/// let plan = FftPlan::new(8).unwrap();
///
/// let a = Polynomial::new(vec![1.0, 2.0, 3.0]).unwrap();
/// let b = Polynomial::new(vec![4.0, 5.0]).unwrap();
/// let c = plan.mul(&a, &b);
///
/// assert!(c.approx_eq(&(a * b), 1e-12));
/// ```
#[derive(Debug, Clone)]
pub struct FftPlan {
    /// The size of the transform (power of 2)
    n: usize,
    /// twiddles[k] holds the factors for stage k (length 2^k)
    twiddles: Vec<Vec<Complex64>>,
    /// Conjugate factors for the inverse transform
    inv_twiddles: Vec<Vec<Complex64>>,
    /// 1/n, applied after the inverse transform
    n_inv: f64,
}

impl FftPlan {
    /// Create a plan for transforms of length `n`.
    ///
    /// Returns `None` if `n` is zero or not a power of 2.
    pub fn new(n: usize) -> Option<Self> {
        if n == 0 || !n.is_power_of_two() {
            return None;
        }

        let log_n = n.trailing_zeros();
        let mut twiddles = Vec::with_capacity(log_n as usize);
        let mut inv_twiddles = Vec::with_capacity(log_n as usize);

        for k in 0..log_n {
            let len = 1usize << (k + 1);
            twiddles.push(stage_twiddles(len, -1.0));
            inv_twiddles.push(stage_twiddles(len, 1.0));
        }

        Some(Self {
            n,
            twiddles,
            inv_twiddles,
            n_inv: 1.0 / n as f64,
        })
    }

    /// Get the transform size.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Forward transform in-place.
    ///
    /// # Panics
    /// Panics if `a.len() != self.size()`.
    pub fn fft(&self, a: &mut [Complex64]) {
        assert_eq!(a.len(), self.n, "Input length must match plan size");
        butterflies(a, &self.twiddles);
    }

    /// Inverse transform in-place, including the 1/n scaling.
    ///
    /// # Panics
    /// Panics if `a.len() != self.size()`.
    pub fn ifft(&self, a: &mut [Complex64]) {
        assert_eq!(a.len(), self.n, "Input length must match plan size");
        butterflies(a, &self.inv_twiddles);
        for x in a.iter_mut() {
            *x *= self.n_inv;
        }
    }

    /// Multiply two polynomials with this plan.
    ///
    /// # Panics
    /// Panics if `deg(a) + deg(b) + 1` exceeds the plan size.
    pub fn mul(&self, a: &Polynomial, b: &Polynomial) -> Polynomial {
        if a.is_zero() || b.is_zero() {
            return Polynomial::zero();
        }

        let result_len = a.degree() + b.degree() + 1;
        assert!(
            result_len <= self.n,
            "Polynomials too large for this plan. Need {} but plan size is {}",
            result_len,
            self.n
        );

        let mut a_values = self.forward(a);
        let b_values = self.forward(b);
        for (x, y) in a_values.iter_mut().zip(&b_values) {
            *x *= *y;
        }

        let mut coeffs = self.backward(&a_values);
        coeffs.truncate(result_len);
        Polynomial::from_raw(coeffs)
    }

    /// Transform a polynomial's coefficients, zero-padded to the plan size.
    ///
    /// # Panics
    /// Panics if the polynomial degree is >= plan size.
    pub fn forward(&self, p: &Polynomial) -> Vec<Complex64> {
        assert!(
            p.degree() < self.n,
            "Polynomial degree {} too large for plan size {}",
            p.degree(),
            self.n
        );

        let mut values = lift(p.coefficients(), self.n);
        self.fft(&mut values);
        values
    }

    /// Inverse-transform values and keep the real parts.
    ///
    /// The result has exactly `self.size()` entries; rounding noise is left in
    /// the high positions for the caller to truncate.
    ///
    /// # Panics
    /// Panics if `values.len() != self.size()`.
    pub fn backward(&self, values: &[Complex64]) -> Vec<f64> {
        let mut buf = values.to_vec();
        self.ifft(&mut buf);
        buf.into_iter().map(|z| z.re).collect()
    }
}

/// Compute the FFT of a sequence in-place.
///
/// The length of `a` must be a power of 2. After this call `a[k]` holds
/// `sum_j a[j] * exp(-2πi·jk/n)`.
pub fn fft(a: &mut [Complex64]) {
    let n = a.len();
    debug_assert!(n.is_power_of_two(), "FFT length must be a power of 2");
    if n <= 1 {
        return;
    }

    butterflies(a, &all_stages(n, -1.0));
}

/// Compute the inverse FFT of a sequence in-place, including the 1/n scaling.
pub fn ifft(a: &mut [Complex64]) {
    let n = a.len();
    debug_assert!(n.is_power_of_two(), "FFT length must be a power of 2");
    if n <= 1 {
        return;
    }

    butterflies(a, &all_stages(n, 1.0));
    let n_inv = 1.0 / n as f64;
    for x in a.iter_mut() {
        *x *= n_inv;
    }
}

/// Multiply two polynomials using the FFT.
///
/// The transform size is the smallest power of two holding all
/// `deg(a) + deg(b) + 1` product coefficients, so the cyclic convolution
/// never wraps around.
///
/// # Example
///
/// ```
/// use realroot::fft::mul_fft;
/// use realroot::Polynomial;
///
/// let a = Polynomial::new(vec![1.0, 2.0, 3.0]).unwrap(); // 1 + 2x + 3x²
/// let b = Polynomial::new(vec![4.0, 5.0]).unwrap();      // 4 + 5x
///
/// // 4 + 13x + 22x² + 15x³
/// let c = mul_fft(&a, &b);
/// assert!(c.approx_eq(&a.mul_naive(&b), 1e-12));
/// ```
pub fn mul_fft(a: &Polynomial, b: &Polynomial) -> Polynomial {
    if a.is_zero() || b.is_zero() {
        return Polynomial::zero();
    }

    let result_len = a.degree() + b.degree() + 1;
    let n = result_len.next_power_of_two();

    let mut a_values = lift(a.coefficients(), n);
    let mut b_values = lift(b.coefficients(), n);

    fft(&mut a_values);
    fft(&mut b_values);

    for (x, y) in a_values.iter_mut().zip(&b_values) {
        *x *= *y;
    }

    ifft(&mut a_values);

    let coeffs = a_values
        .into_iter()
        .take(result_len)
        .map(|z| z.re)
        .collect();

    Polynomial::from_raw(coeffs)
}

/// Real coefficients as complex values, zero-padded to `n`.
fn lift(coeffs: &[f64], n: usize) -> Vec<Complex64> {
    let mut values: Vec<Complex64> = coeffs.iter().map(|&c| Complex64::new(c, 0.0)).collect();
    values.resize(n, Complex64::new(0.0, 0.0));
    values
}

/// Twiddles `exp(sign·2πi·j/len)` for `j < len/2`.
fn stage_twiddles(len: usize, sign: f64) -> Vec<Complex64> {
    (0..len / 2)
        .map(|j| Complex64::from_polar(1.0, sign * 2.0 * PI * j as f64 / len as f64))
        .collect()
}

fn all_stages(n: usize, sign: f64) -> Vec<Vec<Complex64>> {
    let log_n = n.trailing_zeros();
    (0..log_n).map(|k| stage_twiddles(1 << (k + 1), sign)).collect()
}

/// Iterative Cooley-Tukey over precomputed stage twiddles.
fn butterflies(a: &mut [Complex64], stages: &[Vec<Complex64>]) {
    let n = a.len();
    if n <= 1 {
        return;
    }

    bit_reverse_permutation(a);

    for (k, stage) in stages.iter().enumerate() {
        let half_len = 1usize << k;
        let len = half_len * 2;

        for start in (0..n).step_by(len) {
            for (j, &w) in stage.iter().enumerate() {
                let u = a[start + j];
                let v = a[start + j + half_len] * w;
                a[start + j] = u + v;
                a[start + j + half_len] = u - v;
            }
        }
    }
}

/// Bit-reversal permutation.
fn bit_reverse_permutation<T: Copy>(a: &mut [T]) {
    let n = a.len();
    let log_n = n.trailing_zeros();

    for i in 0..n {
        let j = bit_reverse(i, log_n);
        if i < j {
            a.swap(i, j);
        }
    }
}

/// Reverse the lower `bits` bits of `x`.
fn bit_reverse(x: usize, bits: u32) -> usize {
    if bits == 0 {
        return 0;
    }
    x.reverse_bits() >> (usize::BITS - bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(coeffs: &[f64]) -> Polynomial {
        Polynomial::new(coeffs.to_vec()).unwrap()
    }

    fn close(a: &[Complex64], b: &[Complex64], tol: f64) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).norm() <= tol)
    }

    #[test]
    fn bit_reverse_test() {
        assert_eq!(bit_reverse(0b000, 3), 0b000);
        assert_eq!(bit_reverse(0b001, 3), 0b100);
        assert_eq!(bit_reverse(0b011, 3), 0b110);
        assert_eq!(bit_reverse(0b110, 3), 0b011);
        assert_eq!(bit_reverse(0, 0), 0);
    }

    #[test]
    fn fft_of_impulse_is_flat() {
        let mut a = vec![Complex64::new(0.0, 0.0); 8];
        a[0] = Complex64::new(1.0, 0.0);
        fft(&mut a);
        assert!(close(&a, &[Complex64::new(1.0, 0.0); 8], 1e-15));
    }

    #[test]
    fn fft_matches_direct_dft() {
        let n = 8;
        let input: Vec<Complex64> = (0..n)
            .map(|i| Complex64::new(i as f64 + 1.0, 0.5 * i as f64))
            .collect();

        let expected: Vec<Complex64> = (0..n)
            .map(|k| {
                input
                    .iter()
                    .enumerate()
                    .map(|(j, &x)| {
                        x * Complex64::from_polar(1.0, -2.0 * PI * (j * k) as f64 / n as f64)
                    })
                    .sum()
            })
            .collect();

        let mut a = input;
        fft(&mut a);
        assert!(close(&a, &expected, 1e-12));
    }

    #[test]
    fn fft_roundtrip() {
        let original: Vec<Complex64> = (0..1024)
            .map(|i| Complex64::new((i % 13) as f64 - 6.0, 0.0))
            .collect();
        let mut a = original.clone();

        fft(&mut a);
        ifft(&mut a);

        assert!(close(&a, &original, 1e-10));
    }

    #[test]
    fn length_one_is_identity() {
        let mut a = vec![Complex64::new(3.0, -1.0)];
        fft(&mut a);
        ifft(&mut a);
        assert_eq!(a, vec![Complex64::new(3.0, -1.0)]);
    }

    #[test]
    fn mul_fft_simple() {
        // (1 + x) * (1 + x) = 1 + 2x + x²
        let a = poly(&[1.0, 1.0]);
        let c = mul_fft(&a, &a);
        assert!(c.approx_eq(&poly(&[1.0, 2.0, 1.0]), 1e-12));
    }

    #[test]
    fn mul_fft_different_sizes() {
        let a = poly(&[1.0, 2.0, 3.0]);
        let b = poly(&[4.0, 5.0]);
        let c = mul_fft(&a, &b);
        assert!(c.approx_eq(&poly(&[4.0, 13.0, 22.0, 15.0]), 1e-12));
    }

    #[test]
    fn mul_fft_with_zero() {
        let a = poly(&[1.0, 2.0]);
        assert!(mul_fft(&a, &Polynomial::zero()).is_zero());
        assert!(mul_fft(&Polynomial::zero(), &a).is_zero());
    }

    #[test]
    fn mul_fft_constant() {
        let a = poly(&[1.0, 2.0, 3.0]);
        let c = mul_fft(&a, &Polynomial::constant(5.0));
        assert!(c.approx_eq(&poly(&[5.0, 10.0, 15.0]), 1e-12));
    }

    #[test]
    fn mul_fft_large_matches_naive() {
        let a = Polynomial::new((1..=100).map(|i| i as f64).collect()).unwrap();
        let b = Polynomial::new((1..=100).map(|i| (i * 2) as f64).collect()).unwrap();

        let fast = mul_fft(&a, &b);
        let naive = a.mul_naive(&b);

        assert_eq!(fast.degree(), naive.degree());
        assert!(fast.approx_eq(&naive, 1e-8));
    }

    // ---- FftPlan tests ----

    #[test]
    fn fft_plan_new() {
        let plan = FftPlan::new(1024);
        assert!(plan.is_some());
        assert_eq!(plan.unwrap().size(), 1024);
    }

    #[test]
    fn fft_plan_invalid_size() {
        assert!(FftPlan::new(100).is_none());
        assert!(FftPlan::new(0).is_none());
    }

    #[test]
    fn fft_plan_matches_free_fft() {
        let plan = FftPlan::new(16).unwrap();
        let original: Vec<Complex64> = (0..16).map(|i| Complex64::new(i as f64, 1.0)).collect();

        let mut a_plan = original.clone();
        plan.fft(&mut a_plan);

        let mut a_free = original;
        fft(&mut a_free);

        assert!(close(&a_plan, &a_free, 1e-12));
    }

    #[test]
    fn fft_plan_mul_matches_naive() {
        let plan = FftPlan::new(128).unwrap();

        let a = Polynomial::new((1..=50).map(|i| i as f64 * 0.25).collect()).unwrap();
        let b = Polynomial::new((1..=40).map(|i| -(i as f64)).collect()).unwrap();

        assert!(plan.mul(&a, &b).approx_eq(&a.mul_naive(&b), 1e-9));
    }

    #[test]
    fn fft_plan_forward_backward() {
        let plan = FftPlan::new(16).unwrap();

        let p = poly(&[1.0, 2.0, 3.0, 4.0]);
        let values = plan.forward(&p);
        let mut recovered = plan.backward(&values);
        recovered.truncate(p.num_coeffs());

        for (got, want) in recovered.iter().zip(p.coefficients()) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    #[should_panic(expected = "too large for this plan")]
    fn fft_plan_mul_too_large_panics() {
        let plan = FftPlan::new(4).unwrap();
        let a = poly(&[1.0, 1.0, 1.0]);
        let _ = plan.mul(&a, &a);
    }
}
