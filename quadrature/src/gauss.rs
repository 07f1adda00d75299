use crate::{Quadrature, QuadratureErrors, legendre::legendre_unchecked};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Largest rule we are willing to build; the root iteration loses accuracy well before this
/// matters for curve elements.
pub const MAX_POINTS: usize = 64;

const ROOT_TOL: f64 = 1e-15;
const MAX_ROOT_ITERATIONS: usize = 100;

/// Gauss–Legendre rule with `n` points on `[-1, 1]`, exact for polynomials up to degree `2n - 1`.
///
/// Knots are stored in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct GaussLegendre {
    knots: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussLegendre {
    pub fn new(n_points: usize) -> Result<Self, QuadratureErrors> {
        if n_points == 0 {
            return Err(QuadratureErrors::ZeroPoints);
        }
        if n_points > MAX_POINTS {
            return Err(QuadratureErrors::TooManyPoints(n_points));
        }

        let nf = n_points as f64;
        let mut knots = vec![0.0; n_points];
        let mut weights = vec![0.0; n_points];

        // roots are symmetric, so only the lower half is iterated and mirrored
        let n_half = n_points.div_ceil(2);
        for i in 0..n_half {
            // Tricomi's estimate, negated so that knots ascend with i
            let mut x = -(PI * (i as f64 + 0.75) / (nf + 0.5)).cos();
            let mut dp = 0.0;
            for _ in 0..MAX_ROOT_ITERATIONS {
                let (p, dpx) = legendre_unchecked(n_points, x);
                dp = dpx;
                let dx = p / dp;
                x -= dx;
                if dx.abs() <= ROOT_TOL {
                    break;
                }
            }
            let (_, dpx) = legendre_unchecked(n_points, x);
            if dpx.is_finite() {
                dp = dpx;
            }

            let w = 2.0 / ((1.0 - x * x) * dp * dp);
            let mirror = n_points - 1 - i;
            if mirror == i {
                knots[i] = 0.0;
                weights[i] = w;
            } else {
                knots[i] = x;
                knots[mirror] = -x;
                weights[i] = w;
                weights[mirror] = w;
            }
        }

        Ok(Self { knots, weights })
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Integrates `f` over `[-1, 1]`, summing in knot order.
    pub fn integrate<F: Fn(f64) -> f64>(&self, f: F) -> f64 {
        self.knots
            .iter()
            .zip(&self.weights)
            .fold(0.0, |sum, (x, w)| sum + w * f(*x))
    }

    /// Checked access to an integration point as `(weight, knot)`.
    pub fn point(&self, index: usize) -> Result<(f64, f64), QuadratureErrors> {
        match (self.weights.get(index), self.knots.get(index)) {
            (Some(w), Some(s)) => Ok((*w, *s)),
            _ => Err(QuadratureErrors::PointNotFound {
                index,
                n_points: self.knots.len(),
            }),
        }
    }
}

impl Quadrature for GaussLegendre {
    fn nweight(&self) -> usize {
        self.weights.len()
    }

    fn weight(&self, i: usize) -> f64 {
        self.weights[i]
    }

    fn knot(&self, i: usize) -> f64 {
        self.knots[i]
    }
}

impl TryFrom<usize> for GaussLegendre {
    type Error = QuadratureErrors;

    fn try_from(n_points: usize) -> Result<Self, Self::Error> {
        GaussLegendre::new(n_points)
    }
}

impl From<GaussLegendre> for usize {
    fn from(rule: GaussLegendre) -> usize {
        rule.knots.len()
    }
}
