use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tolerance::{Tolerances, max_norm};

use crate::{NonlinearErrors, NonlinearModel};

/// Newton–Raphson solver configuration.
///
/// Converges when the maximum absolute residual drops below `tolerances.abs_tol`.
/// The jacobian comes from the model if it provides one, otherwise from forward
/// differences with step `fd_step`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonSolver {
    pub tolerances: Tolerances,
    pub max_iterations: usize,
    /// Residuals larger than this are taken as divergence.
    pub max_residual: f64,
    pub fd_step: f64,
}

impl Default for NewtonSolver {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            max_iterations: 20,
            max_residual: 1.0e10,
            fd_step: 1.0e-8,
        }
    }
}

/// Outcome of a converged solve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewtonReport {
    /// Number of linear solves performed.
    pub iterations: usize,
    /// Max residual at the converged solution.
    pub max_residual: f64,
}

impl NewtonSolver {
    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_residual(mut self, max_residual: f64) -> Self {
        self.max_residual = max_residual;
        self
    }

    pub fn with_fd_step(mut self, fd_step: f64) -> Self {
        self.fd_step = fd_step;
        self
    }

    /// Iterates `x <- x - J^-1 r(x)` until the residuals vanish.
    ///
    /// On failure the model is left at the last iterate.
    pub fn solve<M: NonlinearModel>(&self, model: &mut M) -> Result<NewtonReport, NonlinearErrors> {
        let n = model.ndof();
        if n == 0 {
            log::info!("no dofs, nothing to solve");
            return Ok(NewtonReport {
                iterations: 0,
                max_residual: 0.0,
            });
        }

        let mut dofs = DVector::zeros(n);
        model.get_dofs(&mut dofs);
        let mut residuals = DVector::zeros(n);
        model
            .get_residuals(&mut residuals)
            .map_err(NonlinearErrors::Model)?;
        check_size("residuals", n, residuals.len())?;

        let mut jacobian = DMatrix::zeros(n, n);

        for iteration in 0..self.max_iterations {
            let max_residual = self.check_residuals(iteration, &residuals)?;
            if self.tolerances.residuals_converged(residuals.as_slice()) {
                log::info!("newton solver converged in {iteration} iterations, max residual {max_residual:e}");
                return Ok(NewtonReport {
                    iterations: iteration,
                    max_residual,
                });
            }

            self.jacobian(model, &dofs, &residuals, &mut jacobian)?;
            let update = jacobian
                .clone()
                .lu()
                .solve(&residuals)
                .ok_or(NonlinearErrors::SingularJacobian { iteration })?;

            dofs -= &update;
            model.set_dofs(&dofs).map_err(NonlinearErrors::Model)?;
            model
                .get_residuals(&mut residuals)
                .map_err(NonlinearErrors::Model)?;
        }

        let max_residual = self.check_residuals(self.max_iterations, &residuals)?;
        if self.tolerances.residuals_converged(residuals.as_slice()) {
            log::info!(
                "newton solver converged in {} iterations, max residual {max_residual:e}",
                self.max_iterations
            );
            return Ok(NewtonReport {
                iterations: self.max_iterations,
                max_residual,
            });
        }

        log::warn!(
            "newton solver reached {} iterations without converging, max residual {max_residual:e}",
            self.max_iterations
        );
        Err(NonlinearErrors::MaxIterationsReached {
            iterations: self.max_iterations,
            max_residual,
        })
    }

    fn check_residuals(&self, iteration: usize, residuals: &DVector<f64>) -> Result<f64, NonlinearErrors> {
        let max_residual = max_norm(residuals.as_slice());
        log::debug!("newton iteration {iteration}: max residual {max_residual:e}");

        if !residuals.iter().all(|r| r.is_finite()) {
            return Err(NonlinearErrors::NonFiniteResidual);
        }
        if max_residual > self.max_residual {
            log::warn!("max residual {max_residual:e} exceeds {:e}", self.max_residual);
            return Err(NonlinearErrors::MaxResidualExceeded {
                max_residual,
                limit: self.max_residual,
            });
        }
        Ok(max_residual)
    }

    /// Fills `jacobian` analytically if the model can, otherwise by forward differences
    /// around `dofs`. The model is restored to `dofs` afterwards.
    fn jacobian<M: NonlinearModel>(
        &self,
        model: &mut M,
        dofs: &DVector<f64>,
        residuals: &DVector<f64>,
        jacobian: &mut DMatrix<f64>,
    ) -> Result<(), NonlinearErrors> {
        if model.get_jacobian(jacobian).map_err(NonlinearErrors::Model)? {
            return Ok(());
        }

        let n = dofs.len();
        let mut perturbed = dofs.clone();
        let mut perturbed_residuals = DVector::zeros(n);
        for j in 0..n {
            perturbed[j] = dofs[j] + self.fd_step;
            model.set_dofs(&perturbed).map_err(NonlinearErrors::Model)?;
            model
                .get_residuals(&mut perturbed_residuals)
                .map_err(NonlinearErrors::Model)?;
            for i in 0..n {
                jacobian[(i, j)] = (perturbed_residuals[i] - residuals[i]) / self.fd_step;
            }
            perturbed[j] = dofs[j];
        }
        model.set_dofs(dofs).map_err(NonlinearErrors::Model)?;
        Ok(())
    }
}

fn check_size(quantity: &'static str, expected: usize, actual: usize) -> Result<(), NonlinearErrors> {
    if expected != actual {
        return Err(NonlinearErrors::WrongSize {
            quantity,
            expected,
            actual,
        });
    }
    Ok(())
}
