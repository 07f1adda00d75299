use nalgebra::Vector2;
use rotations::prelude::*;
use serde::{Deserialize, Serialize};

use crate::parameters::{RigidBodyParameters, RigidBodyState};

/// Pseudo-time at which the rigid-body motion is frozen during the equilibrium search.
pub const FROZEN_TIME: f64 = 0.0;

/// Rigid translation `(0.5 V t^2 + U0 t + X0, V t + Y0)` at pseudo-time `t`.
pub fn translation_at(t: f64, p: &RigidBodyParameters) -> Vector2<f64> {
    Vector2::new(0.5 * p.v * t * t + p.u0 * t + p.x0, p.v * t + p.y0)
}

/// Maps an arm's reference configuration into its actual configuration.
///
/// Every arm attached to the same rigid body uses the same map, differing only in the
/// fixed angular offset `theta_initial`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmKinematics {
    pub theta_initial: f64,
}

impl ArmKinematics {
    pub fn new(theta_initial: f64) -> Self {
        Self { theta_initial }
    }

    pub fn parameters(&self, state: &RigidBodyState) -> RigidBodyParameters {
        state.get_parameters(self.theta_initial)
    }

    /// Actual position and normal at the frozen time.
    pub fn to_actual(
        &self,
        r0: Vector2<f64>,
        n0: Vector2<f64>,
        p: &RigidBodyParameters,
    ) -> (Vector2<f64>, Vector2<f64>) {
        self.to_actual_at(FROZEN_TIME, r0, n0, p)
    }

    pub fn to_actual_at(
        &self,
        t: f64,
        r0: Vector2<f64>,
        n0: Vector2<f64>,
        p: &RigidBodyParameters,
    ) -> (Vector2<f64>, Vector2<f64>) {
        let r = p.rotation.rotate(r0) + translation_at(t, p);
        let n = p.rotation.rotate(n0);
        (r, n)
    }

    /// Rotates a direction (tangent or normal); directions are unaffected by translation.
    pub fn rotate_direction(&self, v: Vector2<f64>, p: &RigidBodyParameters) -> Vector2<f64> {
        p.rotation.rotate(v)
    }

    /// Inverse of the position map at the frozen time.
    pub fn to_reference(&self, r: Vector2<f64>, p: &RigidBodyParameters) -> Vector2<f64> {
        p.rotation.transform(r - translation_at(FROZEN_TIME, p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_identity_map() {
        let kinematics = ArmKinematics::new(0.0);
        let p = RigidBodyParameters::new(3.0, 4.0, 0.0, 0.0, 0.0);
        let (r, n) = kinematics.to_actual(Vector2::new(0.2, 0.7), Vector2::new(1.0, 0.0), &p);
        assert_abs_diff_eq!(r, Vector2::new(0.2, 0.7), epsilon = 1e-15);
        assert_abs_diff_eq!(n, Vector2::new(1.0, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn test_rotate_then_translate() {
        let state = RigidBodyState::new(0.0, 0.0, FRAC_PI_2, 5.0, 6.0);
        let kinematics = ArmKinematics::new(0.0);
        let p = kinematics.parameters(&state);
        let (r, n) = kinematics.to_actual(Vector2::new(0.0, 1.0), Vector2::new(1.0, 0.0), &p);
        assert_abs_diff_eq!(r, Vector2::new(4.0, 6.0), epsilon = 1e-12);
        assert_abs_diff_eq!(n, Vector2::new(0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_offset_arm() {
        // opposite arm of a pair: pointing down when the body is unrotated
        let state = RigidBodyState::new(0.0, 0.0, 0.0, 0.0, 0.0);
        let kinematics = ArmKinematics::new(PI);
        let p = kinematics.parameters(&state);
        let (r, _) = kinematics.to_actual(Vector2::new(0.0, 1.0), Vector2::new(1.0, 0.0), &p);
        assert_abs_diff_eq!(r, Vector2::new(0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_pseudo_time_translation() {
        let p = RigidBodyParameters::new(2.0, 3.0, 0.0, 1.0, -1.0);
        assert_abs_diff_eq!(translation_at(FROZEN_TIME, &p), Vector2::new(1.0, -1.0));
        assert_abs_diff_eq!(translation_at(2.0, &p), Vector2::new(11.0, 3.0));
    }

    proptest! {
        #[test]
        fn normal_norm_preserved(phi in -10.0..10.0f64, alpha in 0.0..std::f64::consts::TAU) {
            let kinematics = ArmKinematics::new(0.3);
            let p = RigidBodyParameters::new(1.0, 2.0, phi, 3.0, 4.0);
            let n0 = Vector2::new(alpha.cos(), alpha.sin());
            let (_, n) = kinematics.to_actual(Vector2::new(0.5, 0.5), n0, &p);
            prop_assert!((n.norm() - 1.0).abs() < 1e-12);
        }

        #[test]
        fn reference_round_trip(phi in -10.0..10.0f64, x in -5.0..5.0f64, y in -5.0..5.0f64) {
            let kinematics = ArmKinematics::default();
            let p = RigidBodyParameters::new(1.0, 2.0, phi, 3.0, 4.0);
            let r0 = Vector2::new(x, y);
            let (r, _) = kinematics.to_actual(r0, Vector2::new(1.0, 0.0), &p);
            prop_assert!((kinematics.to_reference(r, &p) - r0).norm() < 1e-10);
        }
    }
}
