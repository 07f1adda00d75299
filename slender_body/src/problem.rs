use nalgebra::{DVector, Vector2};
use nonlinear::{ModelError, NewtonReport, NewtonSolver, NonlinearModel};

use crate::{
    SlenderBodyErrors, check_size,
    config::SlenderBodyConfig,
    coupling::CouplingResidual,
    elasticity::{ElasticContext, ElasticModel, RigidArms},
    integrator::ArmIntegrator,
    mesh::{Arm, Configuration},
    output::DragAndTorqueRecord,
    parameters::{RigidBodyParameter, RigidBodyState},
};

/// A rigid body with its arms, solved as one nonlinear system.
///
/// The unknown vector holds the free rigid-body scalars in canonical order followed by the
/// elastic unknowns. The problem is the single owner of the [`RigidBodyState`]; arms and the
/// coupling residual only read it.
#[derive(Debug)]
pub struct RigidBodyProblem {
    config: SlenderBodyConfig,
    state: RigidBodyState,
    arms: Vec<Arm>,
    coupling: CouplingResidual,
    elasticity: Box<dyn ElasticModel>,
    n_rigid: usize,
    ndof: usize,
}

impl RigidBodyProblem {
    /// Builds the arms of the configured layout, frees the configured scalars and numbers
    /// the equations.
    pub fn new(config: SlenderBodyConfig) -> Result<Self, SlenderBodyErrors> {
        config.validate()?;

        let mut state = RigidBodyState::from(&config.initial);
        for parameter in &config.free_parameters {
            state.unpin(*parameter)?;
        }

        let handles = state.rigid_body_parameters();
        let arms = config
            .layout
            .arms()
            .into_iter()
            .map(|(name, theta_initial)| {
                let mut arm = Arm::from_config(name, &config, theta_initial)?;
                arm.attach(&handles)?;
                Ok(arm)
            })
            .collect::<Result<Vec<_>, SlenderBodyErrors>>()?;

        let mut problem = Self {
            config,
            state,
            arms,
            coupling: CouplingResidual::default(),
            elasticity: Box::new(RigidArms),
            n_rigid: 0,
            ndof: 0,
        };
        problem.assign_eqn_numbers()?;
        Ok(problem)
    }

    pub fn with_elasticity(mut self, elasticity: impl ElasticModel + 'static) -> Result<Self, SlenderBodyErrors> {
        self.elasticity = Box::new(elasticity);
        self.assign_eqn_numbers()?;
        Ok(self)
    }

    /// Attaches an extra arm to the rigid body and returns its index.
    pub fn add_arm(&mut self, mut arm: Arm) -> Result<usize, SlenderBodyErrors> {
        arm.attach(&self.state.rigid_body_parameters())?;
        self.arms.push(arm);
        self.assign_eqn_numbers()?;
        Ok(self.arms.len() - 1)
    }

    pub fn config(&self) -> &SlenderBodyConfig {
        &self.config
    }

    pub fn state(&self) -> &RigidBodyState {
        &self.state
    }

    pub fn arms(&self) -> &[Arm] {
        &self.arms
    }

    pub fn arm(&self, index: usize) -> Result<&Arm, SlenderBodyErrors> {
        self.arms.get(index).ok_or(SlenderBodyErrors::ArmNotFound {
            index,
            n_arms: self.arms.len(),
        })
    }

    pub fn coupling(&self) -> &CouplingResidual {
        &self.coupling
    }

    pub fn pin(&mut self, parameter: RigidBodyParameter) -> Result<(), SlenderBodyErrors> {
        self.state.pin(parameter);
        self.assign_eqn_numbers()?;
        Ok(())
    }

    pub fn unpin(&mut self, parameter: RigidBodyParameter) -> Result<(), SlenderBodyErrors> {
        self.state.unpin(parameter)?;
        self.assign_eqn_numbers()?;
        Ok(())
    }

    pub fn set_parameter(&mut self, parameter: RigidBodyParameter, value: f64) {
        self.state.set_value(parameter, value);
    }

    /// Numbers the coupling equations and the elastic unknowns; returns the total.
    pub fn assign_eqn_numbers(&mut self) -> Result<usize, SlenderBodyErrors> {
        self.n_rigid = self.coupling.assign_equations(&self.state)?;
        let n_elastic = self.elasticity.ndof(&self.arms);
        self.ndof = self.n_rigid + n_elastic;
        log::info!(
            "number of dofs: {} ({} rigid body, {} elastic)",
            self.ndof,
            self.n_rigid,
            n_elastic
        );
        Ok(self.ndof)
    }

    pub fn ndof(&self) -> usize {
        self.ndof
    }

    pub fn compute_centre_of_mass(&self, arm: usize) -> Result<Vector2<f64>, SlenderBodyErrors> {
        ArmIntegrator::new(self.arm(arm)?, &self.state, Configuration::Actual)?.compute_centre_of_mass()
    }

    /// Drag on one arm and the torque about its centre of mass.
    pub fn compute_drag_and_torque(&self, arm: usize) -> Result<(Vector2<f64>, f64), SlenderBodyErrors> {
        let integrator = ArmIntegrator::new(self.arm(arm)?, &self.state, Configuration::Actual)?;
        let centre = integrator.compute_centre_of_mass()?;
        Ok(integrator.compute_drag_and_torque(&centre))
    }

    pub fn fill_in_contribution_to_residuals(&self, residuals: &mut [f64]) -> Result<(), SlenderBodyErrors> {
        check_size("residuals", self.ndof, residuals.len())?;
        let (rigid, elastic) = residuals.split_at_mut(self.n_rigid);
        self.coupling
            .fill_in_contribution_to_residuals(&self.state, &self.arms, rigid)?;

        let context = ElasticContext {
            arms: &self.arms,
            state: &self.state,
            physical: &self.config.physical,
        };
        self.elasticity
            .fill_in_contribution_to_residuals(&context, elastic)
    }

    /// Net drag and torque over all arms at the current unknowns.
    pub fn output(&self) -> Result<DragAndTorqueRecord, SlenderBodyErrors> {
        let quantities = self.coupling.arm_quantities(&self.state, &self.arms)?;
        let mut drag = Vector2::zeros();
        let mut torque = 0.0;
        for (arm, q) in self.arms.iter().zip(&quantities) {
            log::debug!(
                "{}: length {:.6}, centroid ({:.6}, {:.6}), drag ({:e}, {:e}), torque {:e}",
                arm.name(),
                q.length,
                q.centroid[0],
                q.centroid[1],
                q.drag[0],
                q.drag[1],
                q.torque
            );
            drag += q.drag;
            torque += q.torque;
        }
        Ok(DragAndTorqueRecord {
            theta_eq: self.state.value(RigidBodyParameter::ThetaEq),
            drag,
            torque,
        })
    }

    pub fn newton_solve(&mut self) -> Result<NewtonReport, SlenderBodyErrors> {
        let solver = self.config.newton;
        self.newton_solve_with(&solver)
    }

    pub fn newton_solve_with(&mut self, solver: &NewtonSolver) -> Result<NewtonReport, SlenderBodyErrors> {
        Ok(solver.solve(self)?)
    }
}

impl NonlinearModel for RigidBodyProblem {
    fn ndof(&self) -> usize {
        self.ndof
    }

    fn get_dofs(&self, dofs: &mut DVector<f64>) {
        let (rigid, elastic) = dofs.as_mut_slice().split_at_mut(self.n_rigid);
        for (dof, parameter) in rigid.iter_mut().zip(self.state.free_parameters()) {
            *dof = self.state.value(parameter);
        }
        self.elasticity.get_dofs(&self.arms, elastic);
    }

    fn set_dofs(&mut self, dofs: &DVector<f64>) -> Result<(), ModelError> {
        check_size("dofs", self.ndof, dofs.len())?;
        let (rigid, elastic) = dofs.as_slice().split_at(self.n_rigid);
        self.state.set_free_values(rigid)?;
        self.elasticity.set_dofs(&mut self.arms, elastic)?;
        Ok(())
    }

    fn get_residuals(&mut self, residuals: &mut DVector<f64>) -> Result<(), ModelError> {
        self.fill_in_contribution_to_residuals(residuals.as_mut_slice())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArmLayout;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn config(free: &[RigidBodyParameter]) -> SlenderBodyConfig {
        SlenderBodyConfig {
            free_parameters: free.to_vec(),
            n_elements: 8,
            ..Default::default()
        }
    }

    #[test]
    fn test_construction() {
        let problem = RigidBodyProblem::new(config(&[RigidBodyParameter::V])).unwrap();
        assert_eq!(problem.arms().len(), 1);
        assert!(problem.arms()[0].is_attached());
        assert_eq!(problem.ndof(), 1);
        assert_eq!(NonlinearModel::ndof(&problem), 1);

        let pair = RigidBodyProblem::new(SlenderBodyConfig {
            layout: ArmLayout::Pair {
                inter_arm_angle: PI,
            },
            ..config(&[])
        })
        .unwrap();
        assert_eq!(pair.arms().len(), 2);
        assert_abs_diff_eq!(pair.arms()[1].theta_initial(), PI);
        assert_eq!(pair.ndof(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            RigidBodyProblem::new(config(&[RigidBodyParameter::Y0])),
            Err(SlenderBodyErrors::NoBalanceEquation(RigidBodyParameter::Y0))
        ));
    }

    #[test]
    fn test_dofs_round_trip() {
        let mut problem = RigidBodyProblem::new(config(&[
            RigidBodyParameter::ThetaEq,
            RigidBodyParameter::V,
        ]))
        .unwrap();
        let mut dofs = DVector::zeros(2);
        problem.get_dofs(&mut dofs);
        assert_eq!(dofs.as_slice(), &[3.0, 0.0]);

        problem.set_dofs(&DVector::from_vec(vec![1.5, 0.25])).unwrap();
        assert_abs_diff_eq!(problem.state().value(RigidBodyParameter::V), 1.5);
        assert_abs_diff_eq!(problem.state().value(RigidBodyParameter::ThetaEq), 0.25);
        assert!(problem.set_dofs(&DVector::zeros(3)).is_err());
    }

    #[test]
    fn test_residuals_are_balance_equations() {
        let problem = RigidBodyProblem::new(config(&[
            RigidBodyParameter::V,
            RigidBodyParameter::U0,
            RigidBodyParameter::ThetaEq,
        ]))
        .unwrap();
        let mut residuals = [0.0; 3];
        problem.fill_in_contribution_to_residuals(&mut residuals).unwrap();

        let (drag, torque) = problem.compute_drag_and_torque(0).unwrap();
        assert_abs_diff_eq!(residuals[0], drag[0], epsilon = 1e-14);
        assert_abs_diff_eq!(residuals[1], drag[1], epsilon = 1e-14);
        assert_abs_diff_eq!(residuals[2], torque, epsilon = 1e-14);

        let mut too_long = [0.0; 4];
        assert!(matches!(
            problem.fill_in_contribution_to_residuals(&mut too_long),
            Err(SlenderBodyErrors::WrongSize {
                quantity: "residuals",
                ..
            })
        ));
        assert!(matches!(
            problem.compute_centre_of_mass(1),
            Err(SlenderBodyErrors::ArmNotFound { index: 1, n_arms: 1 })
        ));
    }
}
