use std::fmt::Debug;

use nalgebra::Vector2;

use crate::{
    SlenderBodyErrors, check_size, config::PhysicalParameters, mesh::Arm, parameters::RigidBodyState,
};

/// What an elastic model can read while evaluating its residuals.
#[derive(Debug, Clone, Copy)]
pub struct ElasticContext<'a> {
    pub arms: &'a [Arm],
    pub state: &'a RigidBodyState,
    pub physical: &'a PhysicalParameters,
}

impl ElasticContext<'_> {
    pub fn arm(&self, index: usize) -> Result<&Arm, SlenderBodyErrors> {
        self.arms.get(index).ok_or(SlenderBodyErrors::ArmNotFound {
            index,
            n_arms: self.arms.len(),
        })
    }

    /// Hydrodynamic load at integration point `ipt` of segment `segment` of arm `arm`,
    /// already scaled by the coupling coefficient.
    pub fn load_vector(&self, arm: usize, segment: usize, ipt: usize) -> Result<Vector2<f64>, SlenderBodyErrors> {
        self.arm(arm)?
            .load_vector(segment, ipt, self.state, self.physical.coupling)
    }
}

/// The equilibrium equations of the arms themselves.
///
/// An elastic model owns the mapping between its unknowns and the nodes of the arms. Its
/// unknowns follow the free rigid-body scalars in the global unknown vector.
pub trait ElasticModel: Debug {
    fn ndof(&self, arms: &[Arm]) -> usize;

    fn get_dofs(&self, arms: &[Arm], dofs: &mut [f64]);

    fn set_dofs(&mut self, arms: &mut [Arm], dofs: &[f64]) -> Result<(), SlenderBodyErrors>;

    fn fill_in_contribution_to_residuals(
        &self,
        context: &ElasticContext,
        residuals: &mut [f64],
    ) -> Result<(), SlenderBodyErrors>;
}

/// Arms that keep their reference shape and add no unknowns.
#[derive(Debug, Clone, Copy, Default)]
pub struct RigidArms;

impl ElasticModel for RigidArms {
    fn ndof(&self, _arms: &[Arm]) -> usize {
        0
    }

    fn get_dofs(&self, _arms: &[Arm], _dofs: &mut [f64]) {}

    fn set_dofs(&mut self, _arms: &mut [Arm], dofs: &[f64]) -> Result<(), SlenderBodyErrors> {
        check_size("elastic dofs", 0, dofs.len())
    }

    fn fill_in_contribution_to_residuals(
        &self,
        _context: &ElasticContext,
        residuals: &mut [f64],
    ) -> Result<(), SlenderBodyErrors> {
        check_size("elastic residuals", 0, residuals.len())
    }
}
