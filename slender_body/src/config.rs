use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use nonlinear::NewtonSolver;
use quadrature::GaussLegendre;
use ron::{
    from_str,
    ser::{PrettyConfig, to_string_pretty},
};
use serde::{Deserialize, Serialize};

use crate::{
    SlenderBodyErrors, geometry::ReferenceShape, parameters::RigidBodyParameter,
    traction::TractionModel,
};

/// Physical constants shared by every arm of a problem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalParameters {
    /// Non-dimensional arm thickness `H`, read by elastic models.
    pub thickness: f64,
    /// Non-dimensional prestress, read by elastic models.
    pub prestress: f64,
    /// Fluid-structure interaction parameter `Q` scaling the hydrodynamic load.
    pub coupling: f64,
}

impl Default for PhysicalParameters {
    fn default() -> Self {
        Self {
            thickness: 0.25,
            prestress: 0.0,
            coupling: 1.0,
        }
    }
}

/// Starting values of the rigid-body scalars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialRigidBody {
    pub v: f64,
    pub u0: f64,
    pub theta_eq: f64,
    pub x0: f64,
    pub y0: f64,
}

impl Default for InitialRigidBody {
    fn default() -> Self {
        Self {
            v: 3.0,
            u0: 4.0,
            theta_eq: 0.0,
            x0: 5.0,
            y0: 6.0,
        }
    }
}

/// How many arms hang off the rigid body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum ArmLayout {
    #[default]
    Single,
    /// Two arms, the second offset from the first by `inter_arm_angle`.
    Pair { inter_arm_angle: f64 },
}

impl ArmLayout {
    /// Name and angular offset of each arm.
    pub fn arms(&self) -> Vec<(String, f64)> {
        match *self {
            Self::Single => vec![("arm".to_string(), 0.0)],
            Self::Pair { inter_arm_angle } => vec![
                ("arm 1".to_string(), 0.0),
                ("arm 2".to_string(), inter_arm_angle),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlenderBodyConfig {
    pub physical: PhysicalParameters,
    pub initial: InitialRigidBody,
    /// Scalars solved for; all others stay at their initial value.
    pub free_parameters: Vec<RigidBodyParameter>,
    pub traction: TractionModel,
    pub shape: ReferenceShape,
    pub layout: ArmLayout,
    pub arm_length: f64,
    pub n_elements: usize,
    pub quadrature_order: usize,
    pub newton: NewtonSolver,
}

impl Default for SlenderBodyConfig {
    fn default() -> Self {
        Self {
            physical: PhysicalParameters::default(),
            initial: InitialRigidBody::default(),
            free_parameters: Vec::new(),
            traction: TractionModel::default(),
            shape: ReferenceShape::default(),
            layout: ArmLayout::default(),
            arm_length: 1.0,
            n_elements: 100,
            quadrature_order: 3,
            newton: NewtonSolver::default(),
        }
    }
}

fn check_finite(name: &str, value: f64) -> Result<(), SlenderBodyErrors> {
    if !value.is_finite() {
        return Err(SlenderBodyErrors::InvalidConfig(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(())
}

impl SlenderBodyConfig {
    pub fn from_ron(text: &str) -> Result<Self, SlenderBodyErrors> {
        let config: Self = from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, SlenderBodyErrors> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_ron(&contents)
    }

    pub fn to_ron(&self) -> Result<String, SlenderBodyErrors> {
        Ok(to_string_pretty(self, PrettyConfig::new())?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SlenderBodyErrors> {
        let mut file = File::create(path)?;
        file.write_all(self.to_ron()?.as_bytes())?;
        Ok(())
    }

    pub fn quadrature_rule(&self) -> Result<GaussLegendre, SlenderBodyErrors> {
        Ok(GaussLegendre::new(self.quadrature_order)?)
    }

    pub fn validate(&self) -> Result<(), SlenderBodyErrors> {
        let physical = &self.physical;
        check_finite("thickness", physical.thickness)?;
        check_finite("prestress", physical.prestress)?;
        check_finite("coupling", physical.coupling)?;
        if physical.thickness <= 0.0 {
            return Err(SlenderBodyErrors::InvalidConfig(format!(
                "thickness must be positive, got {}",
                physical.thickness
            )));
        }

        let initial = &self.initial;
        for (name, value) in [
            ("V", initial.v),
            ("U0", initial.u0),
            ("Theta_eq", initial.theta_eq),
            ("X0", initial.x0),
            ("Y0", initial.y0),
        ] {
            check_finite(name, value)?;
        }

        for parameter in &self.free_parameters {
            if !parameter.has_balance_equation() {
                return Err(SlenderBodyErrors::NoBalanceEquation(*parameter));
            }
            if matches!(parameter, RigidBodyParameter::V | RigidBodyParameter::U0)
                && !self.traction.depends_on_speeds()
            {
                return Err(SlenderBodyErrors::UnsupportedConfiguration(format!(
                    "{parameter} cannot be solved for with a traction law that ignores the speeds"
                )));
            }
        }
        if let TractionModel::LinearShear { gamma_dot } = self.traction {
            check_finite("shear rate", gamma_dot)?;
        }

        self.shape.validate()?;
        if let ArmLayout::Pair { inter_arm_angle } = self.layout {
            check_finite("inter-arm angle", inter_arm_angle)?;
        }

        check_finite("arm length", self.arm_length)?;
        if self.arm_length <= 0.0 {
            return Err(SlenderBodyErrors::InvalidConfig(format!(
                "arm length must be positive, got {}",
                self.arm_length
            )));
        }
        if self.n_elements == 0 {
            return Err(SlenderBodyErrors::InvalidConfig(
                "arms need at least one element".to_string(),
            ));
        }
        self.quadrature_rule()?;

        if !(self.newton.fd_step > 0.0 && self.newton.fd_step.is_finite()) {
            return Err(SlenderBodyErrors::InvalidConfig(format!(
                "finite difference step must be positive, got {}",
                self.newton.fd_step
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use quadrature::QuadratureErrors;

    #[test]
    fn test_defaults() {
        let config = SlenderBodyConfig::default();
        assert!(config.validate().is_ok());
        assert_abs_diff_eq!(config.physical.thickness, 0.25);
        assert_abs_diff_eq!(config.initial.y0, 6.0);
        assert_eq!(config.n_elements, 100);
        assert_eq!(config.newton.max_iterations, 20);
        assert_eq!(config.layout.arms().len(), 1);
    }

    #[test]
    fn test_parse_partial_ron() {
        let config = SlenderBodyConfig::from_ron(
            "(
                physical: (coupling: 0.5),
                free_parameters: [V, U0],
                layout: Pair(inter_arm_angle: 3.0),
                n_elements: 10,
                newton: (max_iterations: 5),
            )",
        )
        .unwrap();
        assert_abs_diff_eq!(config.physical.coupling, 0.5);
        assert_abs_diff_eq!(config.physical.thickness, 0.25);
        assert_eq!(
            config.free_parameters,
            vec![RigidBodyParameter::V, RigidBodyParameter::U0]
        );
        assert_eq!(config.layout, ArmLayout::Pair { inter_arm_angle: 3.0 });
        assert_eq!(config.n_elements, 10);
        assert_eq!(config.quadrature_order, 3);
        assert_eq!(config.newton.max_iterations, 5);
        assert_abs_diff_eq!(config.newton.max_residual, 1e10);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = SlenderBodyConfig {
            traction: TractionModel::LinearShear { gamma_dot: 2.0 },
            shape: ReferenceShape::CircularArc { radius: 3.0 },
            free_parameters: vec![RigidBodyParameter::ThetaEq],
            ..Default::default()
        };
        let text = config.to_ron().unwrap();
        assert_eq!(SlenderBodyConfig::from_ron(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_values() {
        let freeing_anchor = SlenderBodyConfig {
            free_parameters: vec![RigidBodyParameter::X0],
            ..Default::default()
        };
        assert!(matches!(
            freeing_anchor.validate(),
            Err(SlenderBodyErrors::NoBalanceEquation(RigidBodyParameter::X0))
        ));

        let shear_with_free_speed = SlenderBodyConfig {
            free_parameters: vec![RigidBodyParameter::U0],
            traction: TractionModel::LinearShear { gamma_dot: 1.0 },
            ..Default::default()
        };
        assert!(matches!(
            shear_with_free_speed.validate(),
            Err(SlenderBodyErrors::UnsupportedConfiguration(_))
        ));

        let no_points = SlenderBodyConfig {
            quadrature_order: 0,
            ..Default::default()
        };
        assert!(matches!(
            no_points.validate(),
            Err(SlenderBodyErrors::Quadrature(QuadratureErrors::ZeroPoints))
        ));

        let negative_length = SlenderBodyConfig {
            arm_length: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            negative_length.validate(),
            Err(SlenderBodyErrors::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_malformed_ron() {
        assert!(matches!(
            SlenderBodyConfig::from_ron("(n_elements: -3)"),
            Err(SlenderBodyErrors::RonDe(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            SlenderBodyConfig::load(Path::new("/nonexistent/slender_body.ron")),
            Err(SlenderBodyErrors::Io(_))
        ));
    }
}
