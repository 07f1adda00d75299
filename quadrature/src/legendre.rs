use crate::QuadratureErrors;

/// Evaluates the Legendre polynomial `P_n(x)` and its derivative with the
/// three-term recurrence `l P_l = (2l - 1) x P_{l-1} - (l - 1) P_{l-2}`.
///
/// Returns `(P_n(x), P_n'(x))`.
pub fn legendre(degree: usize, x: f64) -> Result<(f64, f64), QuadratureErrors> {
    if !(-1.0..=1.0).contains(&x) {
        return Err(QuadratureErrors::ValueOutOfRange(x));
    }
    Ok(legendre_unchecked(degree, x))
}

/// Same as [`legendre`] without the range check; used inside root finding
/// where iterates are known to stay in `(-1, 1)`.
pub(crate) fn legendre_unchecked(degree: usize, x: f64) -> (f64, f64) {
    if degree == 0 {
        return (1.0, 0.0);
    }

    let mut p_prev = 1.0;
    let mut p = x;
    for l in 2..=degree {
        let lf = l as f64;
        let p_next = ((2.0 * lf - 1.0) * x * p - (lf - 1.0) * p_prev) / lf;
        p_prev = p;
        p = p_next;
    }

    let nf = degree as f64;
    let one_minus_x_2 = 1.0 - x * x;
    let dp = if one_minus_x_2.abs() > f64::EPSILON {
        nf * (p_prev - x * p) / one_minus_x_2
    } else {
        // P_n'(±1) = (±1)^(n+1) n(n+1)/2
        let sign = if x > 0.0 || degree % 2 == 1 { 1.0 } else { -1.0 };
        sign * nf * (nf + 1.0) / 2.0
    };
    (p, dp)
}
