pub mod gauss;
pub mod legendre;

pub use gauss::GaussLegendre;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuadratureErrors {
    #[error("a quadrature rule needs at least one point")]
    ZeroPoints,
    #[error("{0} points requested, at most {max} are supported", max = gauss::MAX_POINTS)]
    TooManyPoints(usize),
    #[error("value {0} must be between -1 and 1 inclusive")]
    ValueOutOfRange(f64),
    #[error("integration point {index} does not exist, the rule has {n_points} points")]
    PointNotFound { index: usize, n_points: usize },
}

/// A quadrature rule on the reference interval `[-1, 1]`.
pub trait Quadrature {
    /// Number of integration points.
    fn nweight(&self) -> usize;

    /// Weight of the `i`-th integration point.
    fn weight(&self, i: usize) -> f64;

    /// Local coordinate of the `i`-th integration point.
    fn knot(&self, i: usize) -> f64;
}
