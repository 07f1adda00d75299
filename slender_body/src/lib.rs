//! Quasi-static equilibrium of slender elastic arms attached to a free rigid body
//! in viscous flow.
//!
//! Each arm's reference shape is carried into its actual configuration by the rigid
//! body's rotation and translation ([`kinematics`]), slender-body theory turns the local
//! geometry into a traction ([`traction`]), the traction is integrated over every arm
//! ([`integrator`]) and the sums are balanced against the rigid body's free parameters
//! ([`coupling`]) inside one nonlinear system ([`problem`]).

pub mod config;
pub mod coupling;
pub mod elasticity;
pub mod geometry;
pub mod integrator;
pub mod kinematics;
pub mod mesh;
pub mod output;
pub mod parameters;
pub mod problem;
pub mod sweep;
pub mod traction;

use nonlinear::NonlinearErrors;
use parameters::RigidBodyParameter;
use quadrature::QuadratureErrors;
use thiserror::Error;

pub mod prelude {
    pub use crate::SlenderBodyErrors;
    pub use crate::config::{ArmLayout, InitialRigidBody, PhysicalParameters, SlenderBodyConfig};
    pub use crate::coupling::{BalanceEquation, CouplingResidual};
    pub use crate::elasticity::{ElasticContext, ElasticModel, RigidArms};
    pub use crate::geometry::ReferenceShape;
    pub use crate::integrator::{ArmIntegrator, IntegratedQuantities};
    pub use crate::kinematics::{ArmKinematics, FROZEN_TIME};
    pub use crate::mesh::{Arm, Configuration, HermiteNode, QuadraturePoint};
    pub use crate::output::{DragAndTorqueRecord, ProfilePoint};
    pub use crate::parameters::{
        ParameterHandle, PinnableScalar, RigidBodyParameter, RigidBodyParameters, RigidBodyState,
    };
    pub use crate::problem::RigidBodyProblem;
    pub use crate::sweep::{SweepRecord, SweepStep, orientation_sweep};
    pub use crate::traction::{TractionLaw, TractionModel};
}

#[derive(Debug, Error)]
pub enum SlenderBodyErrors {
    #[error("arm '{0}' is not attached to a rigid body")]
    ArmNotAttached(String),
    #[error("arm {index} does not exist, the problem has {n_arms} arms")]
    ArmNotFound { index: usize, n_arms: usize },
    #[error("arm '{arm}' has total length {length}, cannot compute its centre of mass")]
    DegenerateGeometry { arm: String, length: f64 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("rigid body parameter {position} should be {expected}, not {found}")]
    MisorderedParameter {
        position: usize,
        expected: RigidBodyParameter,
        found: RigidBodyParameter,
    },
    #[error("{0} has no force or torque balance and cannot be freed")]
    NoBalanceEquation(RigidBodyParameter),
    #[error("{0}")]
    Nonlinear(#[from] NonlinearErrors),
    #[error("{0}")]
    Quadrature(#[from] QuadratureErrors),
    #[error("{0}")]
    RonDe(#[from] ron::error::SpannedError),
    #[error("{0}")]
    RonSer(#[from] ron::Error),
    #[error("segment {index} does not exist, the arm has {n_segments} segments")]
    SegmentNotFound { index: usize, n_segments: usize },
    #[error("at least 2 plot points are needed per segment, got {0}")]
    TooFewPlotPoints(usize),
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),
    #[error("{quantity} should have size {expected}, not {actual}")]
    WrongSize {
        quantity: &'static str,
        expected: usize,
        actual: usize,
    },
}

pub(crate) fn check_size(
    quantity: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), SlenderBodyErrors> {
    if expected != actual {
        return Err(SlenderBodyErrors::WrongSize {
            quantity,
            expected,
            actual,
        });
    }
    Ok(())
}
