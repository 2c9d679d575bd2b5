/// Check whether `a` and `b` agree within `epsilon`.
///
/// The tolerance is absolute for magnitudes below one and relative above:
/// `|a - b| <= epsilon * max(1, |a|, |b|)`. Identical values (including
/// matching infinities) always compare equal.
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    if a == b {
        return true;
    }
    if !(a.is_finite() && b.is_finite()) {
        return false;
    }
    let scale = 1.0_f64.max(a.abs()).max(b.abs());
    (a - b).abs() <= epsilon * scale
}

/// Sign of `x` as -1, 0 or 1. Only an exact zero maps to 0.
pub fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Pop trailing zero coefficients, keeping at least one entry.
pub(crate) fn strip_trailing_zeros(coeffs: &mut Vec<f64>) {
    while coeffs.len() > 1 && coeffs.last() == Some(&0.0) {
        coeffs.pop();
    }
}
