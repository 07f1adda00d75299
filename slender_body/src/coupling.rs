use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::{
    SlenderBodyErrors, check_size,
    integrator::{ArmIntegrator, IntegratedQuantities},
    mesh::{Arm, Configuration},
    parameters::{RigidBodyParameter, RigidBodyState},
};

/// Balance condition contributed by one free rigid-body scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceEquation {
    /// Net drag in `x`, balanced by `V`.
    ForceX,
    /// Net drag in `y`, balanced by `U0`.
    ForceY,
    /// Net torque, balanced by `Theta_eq`.
    Torque,
}

impl BalanceEquation {
    pub fn for_parameter(parameter: RigidBodyParameter) -> Option<Self> {
        match parameter {
            RigidBodyParameter::V => Some(Self::ForceX),
            RigidBodyParameter::U0 => Some(Self::ForceY),
            RigidBodyParameter::ThetaEq => Some(Self::Torque),
            RigidBodyParameter::X0 | RigidBodyParameter::Y0 => None,
        }
    }

    pub fn residual(&self, drag: &Vector2<f64>, torque: f64) -> f64 {
        match self {
            Self::ForceX => drag[0],
            Self::ForceY => drag[1],
            Self::Torque => torque,
        }
    }
}

/// Force and torque balance of the rigid body over all attached arms.
///
/// One equation per free scalar, numbered in canonical parameter order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CouplingResidual {
    equations: Vec<(RigidBodyParameter, BalanceEquation)>,
}

impl CouplingResidual {
    /// Numbers the equations for the scalars currently free in `state`.
    pub fn assign_equations(&mut self, state: &RigidBodyState) -> Result<usize, SlenderBodyErrors> {
        self.equations = state
            .free_parameters()
            .into_iter()
            .map(|parameter| {
                BalanceEquation::for_parameter(parameter)
                    .map(|equation| (parameter, equation))
                    .ok_or(SlenderBodyErrors::NoBalanceEquation(parameter))
            })
            .collect::<Result<_, _>>()?;
        Ok(self.equations.len())
    }

    pub fn n_equations(&self) -> usize {
        self.equations.len()
    }

    pub fn equations(&self) -> &[(RigidBodyParameter, BalanceEquation)] {
        &self.equations
    }

    /// Integrals of every arm in its actual configuration.
    pub fn arm_quantities(
        &self,
        state: &RigidBodyState,
        arms: &[Arm],
    ) -> Result<Vec<IntegratedQuantities>, SlenderBodyErrors> {
        arms.iter()
            .map(|arm| ArmIntegrator::new(arm, state, Configuration::Actual)?.integrate())
            .collect()
    }

    /// Drag and torque summed over all arms, each torque taken about its own arm's centroid.
    pub fn total_drag_and_torque(
        &self,
        state: &RigidBodyState,
        arms: &[Arm],
    ) -> Result<(Vector2<f64>, f64), SlenderBodyErrors> {
        Ok(self
            .arm_quantities(state, arms)?
            .iter()
            .fold((Vector2::zeros(), 0.0), |(drag, torque), q| {
                (drag + q.drag, torque + q.torque)
            }))
    }

    pub fn fill_in_contribution_to_residuals(
        &self,
        state: &RigidBodyState,
        arms: &[Arm],
        residuals: &mut [f64],
    ) -> Result<(), SlenderBodyErrors> {
        check_size("coupling equations", self.equations.len(), state.n_free())?;
        check_size("coupling residuals", self.equations.len(), residuals.len())?;
        if self.equations.is_empty() {
            return Ok(());
        }

        let (drag, torque) = self.total_drag_and_torque(state, arms)?;
        for (residual, (_, equation)) in residuals.iter_mut().zip(&self.equations) {
            *residual = equation.residual(&drag, torque);
        }
        Ok(())
    }
}
