//! Slender-body traction laws.
//!
//! A law maps the actual position `R` and unit normal `N` of a line element, together with
//! the rigid-body parameters, to the local hydrodynamic traction on the element. The laws
//! below depend on `N` only through quadratic terms, so the orientation of the normal does
//! not matter.

use nalgebra::Vector2;
use rotations::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{kinematics::FROZEN_TIME, parameters::RigidBodyParameters};

pub trait TractionLaw {
    /// Traction on the actual curve at pseudo-time `t`.
    fn traction_at(
        &self,
        t: f64,
        r: &Vector2<f64>,
        n: &Vector2<f64>,
        p: &RigidBodyParameters,
    ) -> Vector2<f64>;

    fn traction(&self, r: &Vector2<f64>, n: &Vector2<f64>, p: &RigidBodyParameters) -> Vector2<f64> {
        self.traction_at(FROZEN_TIME, r, n, p)
    }
}

/// The traction laws available to an arm, chosen at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum TractionModel {
    /// Drift with speed `V` and horizontal translation `U0` near a linear background flow.
    #[default]
    SlenderBodyDrift,
    /// Pure linear shear background flow with rate `gamma_dot`, independent of the rigid motion.
    LinearShear { gamma_dot: f64 },
}

impl TractionModel {
    /// Whether the law responds to the speeds `V` and `U0`.
    pub fn depends_on_speeds(&self) -> bool {
        matches!(self, Self::SlenderBodyDrift)
    }
}

impl TractionLaw for TractionModel {
    fn traction_at(
        &self,
        t: f64,
        r: &Vector2<f64>,
        n: &Vector2<f64>,
        p: &RigidBodyParameters,
    ) -> Vector2<f64> {
        match self {
            Self::SlenderBodyDrift => slender_body_drift(t, r, n, p.v, p.u0),
            Self::LinearShear { gamma_dot } => linear_shear(*gamma_dot, r, n),
        }
    }
}

pub fn slender_body_drift(t: f64, r: &Vector2<f64>, n: &Vector2<f64>, v: f64, u0: f64) -> Vector2<f64> {
    let t0 = v * t - r[1] + u0;
    Vector2::new(
        0.5 * t0 * n[1] * n[1] - 0.5 * n[1] * n[0] * v - (v * t + u0) + r[1],
        0.5 * v * n[0] * n[0] - 0.5 * n[1] * t0 * n[0] - v,
    )
}

pub fn linear_shear(gamma_dot: f64, r: &Vector2<f64>, n: &Vector2<f64>) -> Vector2<f64> {
    let y = r[1];
    gamma_dot * Vector2::new(y - 0.5 * n[1] * n[1] * y, 0.5 * n[0] * n[1] * y)
}

/// Rotates an actual-configuration traction back into the reference frame, `Rot(-phi) t`.
pub fn pullback_to_reference(traction: &Vector2<f64>, rotation: &PlanarRotation) -> Vector2<f64> {
    rotation.transform(*traction)
}

/// Load handed to the elastic equations: the pulled-back traction scaled by the coupling
/// coefficient `Q`.
pub fn load(traction: &Vector2<f64>, rotation: &PlanarRotation, coupling: f64) -> Vector2<f64> {
    coupling * pullback_to_reference(traction, rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn params(v: f64, u0: f64, theta: f64) -> RigidBodyParameters {
        RigidBodyParameters::new(v, u0, theta, 0.0, 0.0)
    }

    #[test]
    fn test_zero_motion_is_pure_shear() {
        let law = TractionModel::SlenderBodyDrift;
        let p = params(0.0, 0.0, 0.0);
        for (r, n) in [
            (Vector2::new(0.0, 0.5), Vector2::new(1.0, 0.0)),
            (Vector2::new(3.0, 2.0), Vector2::new(0.6, 0.8)),
            (Vector2::new(-1.0, -0.7), Vector2::new(0.0, 1.0)),
        ] {
            let y = r[1];
            let expected = Vector2::new(y - 0.5 * y * n[1] * n[1], 0.5 * y * n[0] * n[1]);
            assert_abs_diff_eq!(law.traction(&r, &n, &p), expected, epsilon = 1e-14);
            assert_abs_diff_eq!(linear_shear(1.0, &r, &n), expected, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_closed_form() {
        let r = Vector2::new(0.3, 0.4);
        let n = Vector2::new(0.6, 0.8);
        let (v, u0) = (3.0, 4.0);
        let t0 = u0 - r[1];
        let tx = 0.5 * t0 * 0.64 - 0.5 * 0.8 * 0.6 * v - u0 + r[1];
        let ty = 0.5 * v * 0.36 - 0.5 * 0.8 * t0 * 0.6 - v;
        let traction = TractionModel::default().traction(&r, &n, &params(v, u0, 0.0));
        assert_abs_diff_eq!(traction, Vector2::new(tx, ty), epsilon = 1e-14);
    }

    #[test]
    fn test_frozen_time_matches_explicit_zero() {
        let law = TractionModel::SlenderBodyDrift;
        let p = params(1.5, -2.0, 0.2);
        let r = Vector2::new(0.1, 0.9);
        let n = Vector2::new(0.0, 1.0);
        assert_eq!(law.traction(&r, &n, &p), law.traction_at(0.0, &r, &n, &p));
        assert!(law.traction_at(1.0, &r, &n, &p) != law.traction(&r, &n, &p));
    }

    #[test]
    fn test_normal_orientation_irrelevant() {
        let law = TractionModel::SlenderBodyDrift;
        let p = params(3.0, 4.0, 0.0);
        let r = Vector2::new(0.0, 0.25);
        let n = Vector2::new(0.28, 0.96);
        assert_abs_diff_eq!(law.traction(&r, &n, &p), law.traction(&r, &(-n), &p), epsilon = 1e-14);
    }

    #[test]
    fn test_shear_ignores_speeds() {
        let law = TractionModel::LinearShear { gamma_dot: 2.0 };
        let r = Vector2::new(0.0, 1.0);
        let n = Vector2::new(1.0, 0.0);
        assert_eq!(
            law.traction(&r, &n, &params(0.0, 0.0, 0.0)),
            law.traction(&r, &n, &params(5.0, -3.0, 0.0))
        );
        assert_abs_diff_eq!(law.traction(&r, &n, &params(0.0, 0.0, 0.0)), Vector2::new(2.0, 0.0));
        assert!(!law.depends_on_speeds());
    }

    #[test]
    fn test_load_scaled_by_coupling() {
        let rotation = PlanarRotation::new(0.7);
        let traction = Vector2::new(1.0, -2.0);
        assert_abs_diff_eq!(
            load(&traction, &rotation, 2.5),
            2.5 * pullback_to_reference(&traction, &rotation),
            epsilon = 1e-14
        );
        assert_abs_diff_eq!(load(&traction, &rotation, 0.0), Vector2::zeros());
    }

    proptest! {
        #[test]
        fn pullback_round_trip(
            phi in -10.0..10.0f64,
            x in -5.0..5.0f64,
            y in -5.0..5.0f64,
            alpha in 0.0..std::f64::consts::TAU,
        ) {
            let p = params(3.0, 4.0, phi);
            let n = Vector2::new(alpha.cos(), alpha.sin());
            let traction = TractionModel::SlenderBodyDrift.traction(&Vector2::new(x, y), &n, &p);
            let back = p.rotation.rotate(pullback_to_reference(&traction, &p.rotation));
            prop_assert!((back - traction).norm() <= 1e-12 * (1.0 + traction.norm()));
        }
    }
}
