use approx::assert_abs_diff_eq;
use nonlinear::NonlinearErrors;
use slender_body::prelude::*;
use std::f64::consts::{PI, TAU};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn speeds_config() -> SlenderBodyConfig {
    SlenderBodyConfig {
        free_parameters: vec![RigidBodyParameter::V, RigidBodyParameter::U0],
        n_elements: 6,
        ..Default::default()
    }
}

#[test]
fn sweep_balances_drag_at_every_orientation() {
    init_logger();
    let steps = orientation_sweep(&speeds_config(), 4).unwrap();
    assert_eq!(steps.len(), 5);
    assert_abs_diff_eq!(steps[4].theta_eq, TAU);

    for (i, step) in steps.iter().enumerate() {
        assert_abs_diff_eq!(step.theta_eq, 0.5 * PI * i as f64, epsilon = 1e-15);
        let SweepRecord { record, report } = step.result.as_ref().unwrap();
        assert!(report.max_residual <= 1e-8);
        assert_abs_diff_eq!(record.drag[0], 0.0, epsilon = 1e-8);
        assert_abs_diff_eq!(record.drag[1], 0.0, epsilon = 1e-8);
        let c = step.theta_eq.cos();
        assert_abs_diff_eq!(record.torque, -c * c / 12.0, epsilon = 1e-10);
    }
}

#[test]
fn sweep_pins_the_angle() {
    init_logger();
    let mut config = speeds_config();
    config.free_parameters.push(RigidBodyParameter::ThetaEq);
    let steps = orientation_sweep(&config, 2).unwrap();
    for step in &steps {
        let record = step.result.as_ref().unwrap().record;
        assert_eq!(record.theta_eq, step.theta_eq);
    }
}

#[test]
fn failed_steps_do_not_affect_others() {
    init_logger();
    // the initial residual is above the ceiling everywhere except with the arm hanging down
    let mut config = speeds_config();
    config.newton.max_residual = 2.0;
    let steps = orientation_sweep(&config, 4).unwrap();

    for (i, step) in steps.iter().enumerate() {
        if i == 2 {
            let record = step.result.as_ref().unwrap().record;
            assert_abs_diff_eq!(record.drag[0], 0.0, epsilon = 1e-8);
        } else {
            assert!(matches!(
                step.result,
                Err(SlenderBodyErrors::Nonlinear(
                    NonlinearErrors::MaxResidualExceeded { .. }
                ))
            ));
        }
    }
}

#[test]
fn invalid_config_fails_the_whole_sweep() {
    let config = SlenderBodyConfig {
        n_elements: 0,
        ..Default::default()
    };
    assert!(matches!(
        orientation_sweep(&config, 3),
        Err(SlenderBodyErrors::InvalidConfig(_))
    ));
}
