pub mod planar;

use nalgebra::Vector2;

pub mod prelude {
    pub use crate::planar::*;
    pub use crate::RotationTrait;
}

/// Trait defining rotation and transformation operations in the plane.
pub trait RotationTrait {
    /// Rotates a vector by the rotation.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be rotated.
    ///
    /// # Returns
    ///
    /// The rotated vector.
    fn rotate(&self, v: Vector2<f64>) -> Vector2<f64>;

    /// Transforms a vector by the rotation, i.e. expresses a vector given in the
    /// rotated frame in the unrotated one. Equivalent to rotating by the inverse.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be transformed.
    ///
    /// # Returns
    ///
    /// The transformed vector.
    fn transform(&self, v: Vector2<f64>) -> Vector2<f64>;

    fn inv(&self) -> Self;

    fn identity() -> Self;
}
