use std::fmt::Debug;

use nalgebra::{DMatrix, DVector};

use crate::ModelError;

/// Trait for a system of nonlinear equations `r(x) = 0` that can be solved by Newton's method.
///
/// The model owns its unknowns; the solver reads them with `get_dofs`, writes trial values
/// with `set_dofs` and asks for residuals at the values currently stored.
pub trait NonlinearModel: Debug {
    /// Number of unknowns, which is also the number of residual equations.
    fn ndof(&self) -> usize;

    /// Copy the current unknowns into `dofs`.
    fn get_dofs(&self, dofs: &mut DVector<f64>);

    /// Overwrite the unknowns with `dofs`.
    fn set_dofs(&mut self, dofs: &DVector<f64>) -> Result<(), ModelError>;

    /// Evaluate the residuals at the current unknowns.
    fn get_residuals(&mut self, residuals: &mut DVector<f64>) -> Result<(), ModelError>;

    /// Analytic jacobian `dr/dx` at the current unknowns.
    ///
    /// Returns `Ok(false)` when the model has none, in which case the solver
    /// falls back to finite differences.
    fn get_jacobian(&mut self, _jacobian: &mut DMatrix<f64>) -> Result<bool, ModelError> {
        Ok(false)
    }
}
