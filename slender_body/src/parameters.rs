use std::fmt;

use nalgebra::Vector2;
use rotations::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{SlenderBodyErrors, check_size, config::InitialRigidBody};

/// The five scalars describing the rigid body's bulk motion, in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RigidBodyParameter {
    /// Drift speed (and acceleration of the horizontal motion).
    V,
    /// Horizontal speed.
    U0,
    /// Rotation angle of the rigid body.
    ThetaEq,
    /// Horizontal anchor position.
    X0,
    /// Vertical anchor position.
    Y0,
}

impl RigidBodyParameter {
    pub const ALL: [Self; 5] = [Self::V, Self::U0, Self::ThetaEq, Self::X0, Self::Y0];

    pub fn index(self) -> usize {
        match self {
            Self::V => 0,
            Self::U0 => 1,
            Self::ThetaEq => 2,
            Self::X0 => 3,
            Self::Y0 => 4,
        }
    }

    /// Only the speeds and the angle are balanced by a force or torque equation.
    pub fn has_balance_equation(self) -> bool {
        matches!(self, Self::V | Self::U0 | Self::ThetaEq)
    }
}

impl fmt::Display for RigidBodyParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::V => "V",
            Self::U0 => "U0",
            Self::ThetaEq => "Theta_eq",
            Self::X0 => "X0",
            Self::Y0 => "Y0",
        };
        write!(f, "{name}")
    }
}

/// Non-owning reference to one scalar of a [`RigidBodyState`].
///
/// Handles are only created by the state, so they are always in range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParameterHandle(RigidBodyParameter);

impl ParameterHandle {
    pub fn parameter(&self) -> RigidBodyParameter {
        self.0
    }

    pub fn index(&self) -> usize {
        self.0.index()
    }
}

/// One unknown scalar that is either free (part of the nonlinear unknowns) or pinned.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinnableScalar {
    pub value: f64,
    pub pinned: bool,
}

impl PinnableScalar {
    pub fn pinned(value: f64) -> Self {
        Self {
            value,
            pinned: true,
        }
    }
}

/// Owner of the rigid-body unknowns shared by every arm and by the coupling residual.
///
/// All scalars are pinned on construction. Only the nonlinear solver writes values, through
/// [`RigidBodyState::set_free_values`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyState {
    scalars: [PinnableScalar; 5],
}

impl RigidBodyState {
    pub fn new(v: f64, u0: f64, theta_eq: f64, x0: f64, y0: f64) -> Self {
        Self {
            scalars: [
                PinnableScalar::pinned(v),
                PinnableScalar::pinned(u0),
                PinnableScalar::pinned(theta_eq),
                PinnableScalar::pinned(x0),
                PinnableScalar::pinned(y0),
            ],
        }
    }

    /// Handles to all five scalars in canonical order, for registration on arms.
    pub fn rigid_body_parameters(&self) -> Vec<ParameterHandle> {
        RigidBodyParameter::ALL
            .iter()
            .map(|p| ParameterHandle(*p))
            .collect()
    }

    pub fn value(&self, parameter: RigidBodyParameter) -> f64 {
        self.scalars[parameter.index()].value
    }

    pub fn value_of(&self, handle: &ParameterHandle) -> f64 {
        self.scalars[handle.index()].value
    }

    pub fn set_value(&mut self, parameter: RigidBodyParameter, value: f64) {
        self.scalars[parameter.index()].value = value;
    }

    pub fn is_pinned(&self, parameter: RigidBodyParameter) -> bool {
        self.scalars[parameter.index()].pinned
    }

    pub fn pin(&mut self, parameter: RigidBodyParameter) {
        self.scalars[parameter.index()].pinned = true;
    }

    /// Frees a scalar so the nonlinear solve determines it. Anchor coordinates have no
    /// balance equation and stay pinned.
    pub fn unpin(&mut self, parameter: RigidBodyParameter) -> Result<(), SlenderBodyErrors> {
        if !parameter.has_balance_equation() {
            return Err(SlenderBodyErrors::NoBalanceEquation(parameter));
        }
        self.scalars[parameter.index()].pinned = false;
        Ok(())
    }

    /// Free scalars in canonical order; this is their order in the unknown vector.
    pub fn free_parameters(&self) -> Vec<RigidBodyParameter> {
        RigidBodyParameter::ALL
            .into_iter()
            .filter(|p| !self.is_pinned(*p))
            .collect()
    }

    pub fn n_free(&self) -> usize {
        self.scalars.iter().filter(|s| !s.pinned).count()
    }

    pub fn get_free_values(&self, values: &mut [f64]) -> Result<(), SlenderBodyErrors> {
        let free = self.free_parameters();
        check_size("free rigid body values", free.len(), values.len())?;
        for (value, parameter) in values.iter_mut().zip(free) {
            *value = self.value(parameter);
        }
        Ok(())
    }

    pub fn set_free_values(&mut self, values: &[f64]) -> Result<(), SlenderBodyErrors> {
        let free = self.free_parameters();
        check_size("free rigid body values", free.len(), values.len())?;
        for (value, parameter) in values.iter().zip(free) {
            self.set_value(parameter, *value);
        }
        Ok(())
    }

    /// Parameter values as seen by an arm mounted at angular offset `theta_initial`.
    pub fn get_parameters(&self, theta_initial: f64) -> RigidBodyParameters {
        RigidBodyParameters::new(
            self.value(RigidBodyParameter::V),
            self.value(RigidBodyParameter::U0),
            self.value(RigidBodyParameter::ThetaEq) - theta_initial,
            self.value(RigidBodyParameter::X0),
            self.value(RigidBodyParameter::Y0),
        )
    }
}

impl From<&InitialRigidBody> for RigidBodyState {
    fn from(initial: &InitialRigidBody) -> Self {
        Self::new(
            initial.v,
            initial.u0,
            initial.theta_eq,
            initial.x0,
            initial.y0,
        )
    }
}

/// Snapshot of the rigid-body values for one arm, with the arm's offset already
/// subtracted from the rotation angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidBodyParameters {
    pub v: f64,
    pub u0: f64,
    /// Rotation by `Theta_eq - Theta_initial`.
    pub rotation: PlanarRotation,
    pub x0: f64,
    pub y0: f64,
}

impl RigidBodyParameters {
    pub fn new(v: f64, u0: f64, theta: f64, x0: f64, y0: f64) -> Self {
        Self {
            v,
            u0,
            rotation: PlanarRotation::new(theta),
            x0,
            y0,
        }
    }

    /// Effective rotation angle of the arm.
    pub fn theta(&self) -> f64 {
        self.rotation.angle()
    }

    pub fn anchor(&self) -> Vector2<f64> {
        Vector2::new(self.x0, self.y0)
    }
}
