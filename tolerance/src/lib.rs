use serde::{Deserialize, Serialize};

/// Convergence tolerances for iterative solves.
///
/// `abs_tol` bounds the maximum absolute residual, `rel_tol` bounds each
/// component of an update relative to the value it corrects.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    pub abs_tol: f64,
    pub rel_tol: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs_tol: 1e-8,
            rel_tol: 1e-10,
        }
    }
}

impl Tolerances {
    pub fn new(rel_tol: f64, abs_tol: f64) -> Self {
        Self { rel_tol, abs_tol }
    }

    pub fn with_abs_tol(mut self, abs_tol: f64) -> Self {
        self.abs_tol = abs_tol;
        self
    }

    pub fn with_rel_tol(mut self, rel_tol: f64) -> Self {
        self.rel_tol = rel_tol;
        self
    }

    /// True when every residual is within `abs_tol` of zero.
    pub fn residuals_converged(&self, residuals: &[f64]) -> bool {
        max_norm(residuals) <= self.abs_tol
    }

    /// True when each component of `update` is small compared to the value it was applied to.
    /// Slices of different length never count as converged.
    pub fn update_converged(&self, values: &[f64], update: &[f64]) -> bool {
        values.len() == update.len()
            && values
                .iter()
                .zip(update)
                .all(|(x, dx)| check_error(*x, *x + *dx, self.rel_tol, self.abs_tol))
    }

    pub fn check_error(&self, x0: f64, xf: f64) -> bool {
        check_error(x0, xf, self.rel_tol, self.abs_tol)
    }
}

pub fn check_error(x0: f64, xf: f64, rel_tol: f64, abs_tol: f64) -> bool {
    let abs_diff = (xf - x0).abs();
    let rel_diff = if x0.abs() > 1e-10 {
        abs_diff / x0.abs()
    } else {
        f64::INFINITY
    };
    abs_diff <= abs_tol || rel_diff <= rel_tol
}

/// Largest absolute entry, NaN if any entry is NaN. Zero for an empty slice.
pub fn max_norm(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |max, v| {
        if v.is_nan() || max.is_nan() {
            f64::NAN
        } else {
            max.max(v.abs())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_max_norm() {
        assert_abs_diff_eq!(max_norm(&[1.0, -3.5, 2.0]), 3.5);
        assert_abs_diff_eq!(max_norm(&[]), 0.0);
        assert!(max_norm(&[1.0, f64::NAN]).is_nan());
    }

    #[test]
    fn test_residuals_converged() {
        let tol = Tolerances::default().with_abs_tol(1e-6);
        assert!(tol.residuals_converged(&[1e-7, -5e-7]));
        assert!(!tol.residuals_converged(&[1e-7, -5e-6]));
        assert!(!tol.residuals_converged(&[f64::NAN]));
    }

    #[test]
    fn test_update_converged() {
        let tol = Tolerances::new(1e-6, 1e-12);
        assert!(tol.update_converged(&[1000.0, 0.0], &[1e-4, 1e-13]));
        assert!(!tol.update_converged(&[1000.0, 0.0], &[1e-2, 0.0]));
        assert!(!tol.update_converged(&[0.0], &[1e-3]));
        assert!(!tol.update_converged(&[1.0, 2.0], &[0.0]));
    }
}
