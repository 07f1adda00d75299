use super::*;
use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// A counter-clockwise rotation of the plane by `angle` radians.
///
/// The sine and cosine are evaluated once at construction so repeated
/// applications at quadrature points do not re-evaluate trigonometric functions.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct PlanarRotation {
    angle: f64,
    cos: f64,
    sin: f64,
}

impl PlanarRotation {
    pub const IDENTITY: Self = Self {
        angle: 0.0,
        cos: 1.0,
        sin: 0.0,
    };

    pub fn new(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { angle, cos, sin }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn cos(&self) -> f64 {
        self.cos
    }

    pub fn sin(&self) -> f64 {
        self.sin
    }

    /// The standard rotation matrix `[[cos, -sin], [sin, cos]]`.
    pub fn matrix(&self) -> Matrix2<f64> {
        Matrix2::new(self.cos, -self.sin, self.sin, self.cos)
    }
}

impl Default for PlanarRotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<f64> for PlanarRotation {
    fn from(angle: f64) -> Self {
        Self::new(angle)
    }
}

impl From<PlanarRotation> for f64 {
    fn from(rotation: PlanarRotation) -> f64 {
        rotation.angle
    }
}

impl Mul<PlanarRotation> for PlanarRotation {
    type Output = Self;

    /// Composes two rotations; planar rotations commute so the order does not matter.
    fn mul(self, rhs: PlanarRotation) -> PlanarRotation {
        PlanarRotation {
            angle: self.angle + rhs.angle,
            cos: self.cos * rhs.cos - self.sin * rhs.sin,
            sin: self.sin * rhs.cos + self.cos * rhs.sin,
        }
    }
}

impl RotationTrait for PlanarRotation {
    fn rotate(&self, v: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            self.cos * v[0] - self.sin * v[1],
            self.sin * v[0] + self.cos * v[1],
        )
    }

    fn transform(&self, v: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            self.cos * v[0] + self.sin * v[1],
            -self.sin * v[0] + self.cos * v[1],
        )
    }

    fn inv(&self) -> Self {
        Self {
            angle: -self.angle,
            cos: self.cos,
            sin: -self.sin,
        }
    }

    fn identity() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{abs_diff_eq, assert_abs_diff_eq};
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    const TOL: f64 = 1e-12;

    #[test]
    fn test_rotate_quarter_turn() {
        let rotation = PlanarRotation::new(FRAC_PI_2);
        let v = rotation.rotate(Vector2::new(1.0, 0.0));
        assert_abs_diff_eq!(v[0], 0.0, epsilon = TOL);
        assert_abs_diff_eq!(v[1], 1.0, epsilon = TOL);
    }

    #[test]
    fn test_matrix_matches_rotate() {
        let rotation = PlanarRotation::new(0.7);
        let v = Vector2::new(0.3, -2.0);
        let expected = rotation.matrix() * v;
        let rotated = rotation.rotate(v);
        assert_abs_diff_eq!(rotated[0], expected[0], epsilon = TOL);
        assert_abs_diff_eq!(rotated[1], expected[1], epsilon = TOL);
    }

    #[test]
    fn test_composition() {
        let rotation = PlanarRotation::new(PI / 3.0) * PlanarRotation::new(PI / 6.0);
        assert_abs_diff_eq!(rotation.angle(), FRAC_PI_2, epsilon = TOL);
        assert_abs_diff_eq!(rotation.cos(), 0.0, epsilon = TOL);
        assert_abs_diff_eq!(rotation.sin(), 1.0, epsilon = TOL);
    }

    proptest! {
        #[test]
        fn should_preserve_norm_of_unit_vector(angle in -TAU..TAU, direction in 0.0..TAU) {
            let n0 = Vector2::new(direction.cos(), direction.sin());
            let n = PlanarRotation::new(angle).rotate(n0);
            prop_assert!(abs_diff_eq!(n.norm(), 1.0, epsilon = TOL));
        }
    }

    proptest! {
        #[test]
        fn should_undo_rotation_with_transform(angle in -TAU..TAU, x in -1e3..1e3, y in -1e3..1e3) {
            let rotation = PlanarRotation::new(angle);
            let v = Vector2::new(x, y);
            let back = rotation.transform(rotation.rotate(v));
            prop_assert!(abs_diff_eq!(back[0], x, epsilon = 1e-9));
            prop_assert!(abs_diff_eq!(back[1], y, epsilon = 1e-9));

            let via_inverse = rotation.inv().rotate(rotation.rotate(v));
            prop_assert!(abs_diff_eq!(via_inverse[0], x, epsilon = 1e-9));
            prop_assert!(abs_diff_eq!(via_inverse[1], y, epsilon = 1e-9));
        }
    }
}
