use std::fmt;

use nalgebra::Vector2;
use rotations::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    SlenderBodyErrors,
    mesh::{Arm, Configuration, QuadraturePoint},
    parameters::RigidBodyState,
    traction::TractionLaw,
};

/// Net drag and torque on the rigid body at one orientation, summed over all arms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragAndTorqueRecord {
    pub theta_eq: f64,
    pub drag: Vector2<f64>,
    pub torque: f64,
}

impl DragAndTorqueRecord {
    pub const HEADER: &'static str = "theta_eq drag_x drag_y torque";
}

impl fmt::Display for DragAndTorqueRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.theta_eq, self.drag[0], self.drag[1], self.torque
        )
    }
}

/// Sampled state of an arm at one plot point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub zeta: f64,
    /// Position in the actual configuration.
    pub position: Vector2<f64>,
    pub normal: Vector2<f64>,
    pub normal_norm: f64,
    pub traction: Vector2<f64>,
    /// Position relative to the anchor, rotated back into the body frame.
    pub anchored_position: Vector2<f64>,
}

impl Arm {
    /// Samples every segment at `n_plot` evenly spaced local coordinates, endpoints included.
    pub fn profile(&self, state: &RigidBodyState, n_plot: usize) -> Result<Vec<ProfilePoint>, SlenderBodyErrors> {
        if n_plot < 2 {
            return Err(SlenderBodyErrors::TooFewPlotPoints(n_plot));
        }
        let params = self.parameters(state)?;
        let anchor = params.anchor();

        let mut points = Vec::with_capacity(self.n_segments() * n_plot);
        for segment in self.segments() {
            for i in 0..n_plot {
                let s = -1.0 + 2.0 * i as f64 / (n_plot - 1) as f64;
                let (position, tangent) = self.sample(segment, s, Configuration::Actual, &params);
                let normal = QuadraturePoint {
                    weight: 0.0,
                    position,
                    tangent,
                }
                .unit_normal();
                points.push(ProfilePoint {
                    zeta: segment.zeta_at(s),
                    position,
                    normal,
                    normal_norm: normal.norm(),
                    traction: self.traction_model().traction(&position, &normal, &params),
                    anchored_position: params.rotation.transform(position - anchor),
                });
            }
        }
        Ok(points)
    }
}
