use nalgebra::Vector2;
use quadrature::Quadrature;

use crate::{
    SlenderBodyErrors,
    mesh::{Arm, Configuration, QuadraturePoint, Segment},
    parameters::{RigidBodyParameters, RigidBodyState},
    traction::TractionLaw,
};

/// Integrals over one arm, recomputed on every residual evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratedQuantities {
    pub length: f64,
    pub centroid: Vector2<f64>,
    pub drag: Vector2<f64>,
    /// Torque about `centroid`.
    pub torque: f64,
}

/// Quadrature over all segments of one arm.
///
/// Sums run over the integration points of a segment first and then over the segments,
/// always in the same order, so repeated evaluations at the same unknowns agree bitwise.
#[derive(Debug, Clone, Copy)]
pub struct ArmIntegrator<'a> {
    arm: &'a Arm,
    params: RigidBodyParameters,
    mode: Configuration,
}

impl<'a> ArmIntegrator<'a> {
    pub fn new(arm: &'a Arm, state: &RigidBodyState, mode: Configuration) -> Result<Self, SlenderBodyErrors> {
        Ok(Self::with_parameters(arm, arm.parameters(state)?, mode))
    }

    pub fn with_parameters(arm: &'a Arm, params: RigidBodyParameters, mode: Configuration) -> Self {
        Self { arm, params, mode }
    }

    pub fn mode(&self) -> Configuration {
        self.mode
    }

    fn points<'b>(&'b self, segment: &'b Segment) -> impl Iterator<Item = QuadraturePoint> + 'b {
        (0..self.arm.rule().nweight())
            .map(move |ipt| self.arm.quadrature_point_unchecked(segment, ipt, self.mode, &self.params))
    }

    fn traction(&self, point: &QuadraturePoint) -> Vector2<f64> {
        self.arm
            .traction_model()
            .traction(&point.position, &point.unit_normal(), &self.params)
    }

    fn segment_length(&self, segment: &Segment) -> f64 {
        self.points(segment).map(|point| point.dlength()).sum()
    }

    fn segment_moment(&self, segment: &Segment) -> Vector2<f64> {
        self.points(segment)
            .fold(Vector2::zeros(), |sum, point| sum + point.dlength() * point.position)
    }

    fn segment_drag_and_torque(&self, segment: &Segment, centre: &Vector2<f64>) -> (Vector2<f64>, f64) {
        self.points(segment)
            .fold((Vector2::zeros(), 0.0), |(drag, torque), point| {
                let dl = point.dlength();
                let traction = self.traction(&point);
                let lever = point.position - centre;
                (
                    drag + dl * traction,
                    torque + dl * (lever[0] * traction[1] - lever[1] * traction[0]),
                )
            })
    }

    pub fn compute_length(&self) -> f64 {
        self.arm
            .segments()
            .iter()
            .map(|segment| self.segment_length(segment))
            .sum()
    }

    /// Arc-length centroid of the arm.
    pub fn compute_centre_of_mass(&self) -> Result<Vector2<f64>, SlenderBodyErrors> {
        let (length, moment) = self.arm.segments().iter().fold(
            (0.0, Vector2::<f64>::zeros()),
            |(length, moment), segment| {
                (
                    length + self.segment_length(segment),
                    moment + self.segment_moment(segment),
                )
            },
        );
        if length.is_nan() || length <= 0.0 {
            return Err(SlenderBodyErrors::DegenerateGeometry {
                arm: self.arm.name().to_string(),
                length,
            });
        }
        Ok(moment / length)
    }

    /// Total drag and the torque about `centre`.
    pub fn compute_drag_and_torque(&self, centre: &Vector2<f64>) -> (Vector2<f64>, f64) {
        self.arm
            .segments()
            .iter()
            .fold((Vector2::zeros(), 0.0), |(drag, torque), segment| {
                let (d, t) = self.segment_drag_and_torque(segment, centre);
                (drag + d, torque + t)
            })
    }

    /// Length, centroid, and the drag and torque about that centroid.
    pub fn integrate(&self) -> Result<IntegratedQuantities, SlenderBodyErrors> {
        let length = self.compute_length();
        let centroid = self.compute_centre_of_mass()?;
        let (drag, torque) = self.compute_drag_and_torque(&centroid);
        Ok(IntegratedQuantities {
            length,
            centroid,
            drag,
            torque,
        })
    }
}
