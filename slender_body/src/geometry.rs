use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::SlenderBodyErrors;

/// Undeformed, unrotated shape of an arm, parametrized by arc length `zeta` from the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReferenceShape {
    /// `r0(zeta) = zeta (-sin a, cos a)`; `inclination = 0` is a vertical arm.
    StraightLine { inclination: f64 },
    /// Arc leaving the anchor vertically and bending towards negative `x` for a positive radius.
    CircularArc { radius: f64 },
}

impl Default for ReferenceShape {
    fn default() -> Self {
        Self::vertical()
    }
}

impl ReferenceShape {
    pub fn vertical() -> Self {
        Self::StraightLine { inclination: 0.0 }
    }

    pub fn position(&self, zeta: f64) -> Vector2<f64> {
        match *self {
            Self::StraightLine { inclination } => {
                let (sin, cos) = inclination.sin_cos();
                zeta * Vector2::new(-sin, cos)
            }
            Self::CircularArc { radius } => {
                let (sin, cos) = (zeta / radius).sin_cos();
                radius * Vector2::new(cos - 1.0, sin)
            }
        }
    }

    /// Unit tangent `dr0/dzeta`.
    pub fn dposition(&self, zeta: f64) -> Vector2<f64> {
        match *self {
            Self::StraightLine { inclination } => {
                let (sin, cos) = inclination.sin_cos();
                Vector2::new(-sin, cos)
            }
            Self::CircularArc { radius } => {
                let (sin, cos) = (zeta / radius).sin_cos();
                Vector2::new(-sin, cos)
            }
        }
    }

    pub fn validate(&self) -> Result<(), SlenderBodyErrors> {
        match *self {
            Self::StraightLine { inclination } if !inclination.is_finite() => Err(
                SlenderBodyErrors::InvalidConfig(format!("inclination must be finite, got {inclination}")),
            ),
            Self::CircularArc { radius } if radius == 0.0 || !radius.is_finite() => Err(
                SlenderBodyErrors::InvalidConfig(format!(
                    "arc radius must be finite and non-zero, got {radius}"
                )),
            ),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_vertical_line() {
        let shape = ReferenceShape::vertical();
        assert_abs_diff_eq!(shape.position(0.5), Vector2::new(0.0, 0.5));
        assert_abs_diff_eq!(shape.dposition(0.5), Vector2::new(0.0, 1.0));
    }

    #[test]
    fn test_inclined_line() {
        let shape = ReferenceShape::StraightLine {
            inclination: FRAC_PI_2,
        };
        assert_abs_diff_eq!(shape.position(2.0), Vector2::new(-2.0, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn test_arc_starts_vertical() {
        let shape = ReferenceShape::CircularArc { radius: 2.0 };
        assert_abs_diff_eq!(shape.position(0.0), Vector2::zeros());
        assert_abs_diff_eq!(shape.dposition(0.0), Vector2::new(0.0, 1.0));
        // quarter circle
        assert_abs_diff_eq!(shape.position(std::f64::consts::PI), Vector2::new(-2.0, 2.0), epsilon = 1e-14);
        assert_abs_diff_eq!(shape.dposition(1.3).norm(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_validate() {
        assert!(ReferenceShape::vertical().validate().is_ok());
        assert!(matches!(
            ReferenceShape::CircularArc { radius: 0.0 }.validate(),
            Err(SlenderBodyErrors::InvalidConfig(_))
        ));
        assert!(matches!(
            ReferenceShape::StraightLine {
                inclination: f64::NAN
            }
            .validate(),
            Err(SlenderBodyErrors::InvalidConfig(_))
        ));
    }
}
