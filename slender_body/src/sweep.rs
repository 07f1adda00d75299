use std::f64::consts::TAU;

use nonlinear::NewtonReport;
use serde::Serialize;

use crate::{
    SlenderBodyErrors, config::SlenderBodyConfig, output::DragAndTorqueRecord,
    parameters::RigidBodyParameter, problem::RigidBodyProblem,
};

/// Result of one converged sweep step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepRecord {
    pub record: DragAndTorqueRecord,
    pub report: NewtonReport,
}

#[derive(Debug)]
pub struct SweepStep {
    pub theta_eq: f64,
    pub result: Result<SweepRecord, SlenderBodyErrors>,
}

fn solve_step(config: SlenderBodyConfig) -> Result<SweepRecord, SlenderBodyErrors> {
    let mut problem = RigidBodyProblem::new(config)?;
    let report = problem.newton_solve()?;
    Ok(SweepRecord {
        record: problem.output()?,
        report,
    })
}

/// Solves for the free scalars at `Theta_eq = 2 pi i / n_steps` for `i = 0..=n_steps`.
///
/// `Theta_eq` is pinned at every step and each step starts from a fresh problem built from
/// `config`, so a step that fails to converge is recorded and does not affect the next one.
pub fn orientation_sweep(config: &SlenderBodyConfig, n_steps: usize) -> Result<Vec<SweepStep>, SlenderBodyErrors> {
    if n_steps == 0 {
        return Err(SlenderBodyErrors::InvalidConfig(
            "an orientation sweep needs at least one step".to_string(),
        ));
    }
    config.validate()?;

    let steps = (0..=n_steps)
        .map(|i| {
            let theta_eq = TAU * i as f64 / n_steps as f64;
            let mut step_config = config.clone();
            step_config.initial.theta_eq = theta_eq;
            step_config
                .free_parameters
                .retain(|p| *p != RigidBodyParameter::ThetaEq);

            let result = solve_step(step_config);
            if let Err(e) = &result {
                log::warn!("sweep step {i} at theta_eq = {theta_eq:.6} failed: {e}");
            }
            SweepStep { theta_eq, result }
        })
        .collect();
    Ok(steps)
}
