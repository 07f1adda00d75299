/// Submodules for the nonlinear solve.
pub mod model;
pub mod newton;

pub use model::NonlinearModel;
pub use newton::{NewtonReport, NewtonSolver};

use thiserror::Error;

/// Error type returned by model callbacks.
pub type ModelError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum NonlinearErrors {
    #[error("{quantity} should have size {expected}, not {actual}")]
    WrongSize {
        quantity: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("newton solver did not converge in {iterations} iterations, max residual {max_residual:e}")]
    MaxIterationsReached { iterations: usize, max_residual: f64 },
    #[error("max residual {max_residual:e} exceeds the limit {limit:e}, the newton iteration is diverging")]
    MaxResidualExceeded { max_residual: f64, limit: f64 },
    #[error("residuals contain NaN or infinite values")]
    NonFiniteResidual,
    #[error("jacobian is singular in newton iteration {iteration}")]
    SingularJacobian { iteration: usize },
    #[error("{0}")]
    Model(ModelError),
}
