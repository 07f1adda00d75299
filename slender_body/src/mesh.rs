use nalgebra::Vector2;
use quadrature::{GaussLegendre, Quadrature};
use serde::{Deserialize, Serialize};

use crate::{
    SlenderBodyErrors, check_size,
    config::SlenderBodyConfig,
    geometry::ReferenceShape,
    kinematics::ArmKinematics,
    parameters::{ParameterHandle, RigidBodyParameter, RigidBodyParameters, RigidBodyState},
    traction::{TractionLaw, TractionModel, load},
};

/// Which positions an arm is evaluated at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Configuration {
    /// The undeformed reference shape.
    Reference,
    /// The interpolated nodal positions, before the rigid-body motion.
    Current,
    /// The nodal positions carried through the rigid-body motion.
    #[default]
    Actual,
}

/// Hermite node: a position and its slope `dr/dzeta`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HermiteNode {
    pub position: Vector2<f64>,
    pub slope: Vector2<f64>,
}

/// Two-node cubic Hermite segment covering `zeta[0]..zeta[1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub zeta: [f64; 2],
    pub nodes: [usize; 2],
}

impl Segment {
    pub fn zeta_length(&self) -> f64 {
        self.zeta[1] - self.zeta[0]
    }

    /// Arc-length coordinate of the local coordinate `s` in `[-1, 1]`.
    pub fn zeta_at(&self, s: f64) -> f64 {
        self.zeta[0] + 0.5 * (s + 1.0) * self.zeta_length()
    }
}

/// Position, non-unit tangent `dr/ds` and weight at one integration point of a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraturePoint {
    pub weight: f64,
    pub position: Vector2<f64>,
    pub tangent: Vector2<f64>,
}

impl QuadraturePoint {
    pub fn jacobian(&self) -> f64 {
        self.tangent.norm()
    }

    /// `weight * J`, the arc length this point stands for.
    pub fn dlength(&self) -> f64 {
        self.weight * self.jacobian()
    }

    /// `(t_y, -t_x) / |t|`, or zero for a degenerate tangent.
    pub fn unit_normal(&self) -> Vector2<f64> {
        let jacobian = self.jacobian();
        if jacobian == 0.0 {
            return Vector2::zeros();
        }
        Vector2::new(self.tangent[1], -self.tangent[0]) / jacobian
    }
}

fn hermite_basis(u: f64) -> ([f64; 4], [f64; 4]) {
    let u2 = u * u;
    let u3 = u2 * u;
    (
        [
            2.0 * u3 - 3.0 * u2 + 1.0,
            u3 - 2.0 * u2 + u,
            -2.0 * u3 + 3.0 * u2,
            u3 - u2,
        ],
        [
            6.0 * u2 - 6.0 * u,
            3.0 * u2 - 4.0 * u + 1.0,
            -6.0 * u2 + 6.0 * u,
            3.0 * u2 - 2.0 * u,
        ],
    )
}

/// One slender arm discretized into Hermite segments over `zeta in [0, length]`.
///
/// The arm owns its nodal positions (the elastic unknowns) and reads the rigid-body
/// parameters through the handles registered by [`Arm::attach`].
#[derive(Debug, Clone)]
pub struct Arm {
    name: String,
    shape: ReferenceShape,
    length: f64,
    nodes: Vec<HermiteNode>,
    segments: Vec<Segment>,
    rule: GaussLegendre,
    kinematics: ArmKinematics,
    traction: TractionModel,
    parameters: Option<[ParameterHandle; 5]>,
}

impl Arm {
    pub fn new(
        name: impl Into<String>,
        shape: ReferenceShape,
        length: f64,
        n_elements: usize,
        rule: GaussLegendre,
        traction: TractionModel,
        theta_initial: f64,
    ) -> Result<Self, SlenderBodyErrors> {
        let name = name.into();
        shape.validate()?;
        if !(length > 0.0 && length.is_finite()) {
            return Err(SlenderBodyErrors::InvalidConfig(format!(
                "arm '{name}' must have a positive length, got {length}"
            )));
        }
        if n_elements == 0 {
            return Err(SlenderBodyErrors::InvalidConfig(format!(
                "arm '{name}' needs at least one element"
            )));
        }
        if !theta_initial.is_finite() {
            return Err(SlenderBodyErrors::InvalidConfig(format!(
                "arm '{name}' has a non-finite angular offset"
            )));
        }

        let dzeta = length / n_elements as f64;
        let nodes = (0..=n_elements)
            .map(|i| {
                let zeta = i as f64 * dzeta;
                HermiteNode {
                    position: shape.position(zeta),
                    slope: shape.dposition(zeta),
                }
            })
            .collect();
        let segments = (0..n_elements)
            .map(|e| Segment {
                zeta: [e as f64 * dzeta, (e + 1) as f64 * dzeta],
                nodes: [e, e + 1],
            })
            .collect();

        Ok(Self {
            name,
            shape,
            length,
            nodes,
            segments,
            rule,
            kinematics: ArmKinematics::new(theta_initial),
            traction,
            parameters: None,
        })
    }

    pub fn from_config(
        name: impl Into<String>,
        config: &SlenderBodyConfig,
        theta_initial: f64,
    ) -> Result<Self, SlenderBodyErrors> {
        Self::new(
            name,
            config.shape,
            config.arm_length,
            config.n_elements,
            config.quadrature_rule()?,
            config.traction,
            theta_initial,
        )
    }

    /// Registers the rigid-body scalars as external data of the arm.
    ///
    /// `handles` must hold all five parameters in canonical order, as returned by
    /// [`RigidBodyState::rigid_body_parameters`].
    pub fn attach(&mut self, handles: &[ParameterHandle]) -> Result<(), SlenderBodyErrors> {
        check_size("rigid body parameters", RigidBodyParameter::ALL.len(), handles.len())?;
        let mut attached = [handles[0]; 5];
        for (position, (handle, expected)) in handles.iter().zip(RigidBodyParameter::ALL).enumerate() {
            if handle.parameter() != expected {
                return Err(SlenderBodyErrors::MisorderedParameter {
                    position,
                    expected,
                    found: handle.parameter(),
                });
            }
            attached[position] = *handle;
        }
        self.parameters = Some(attached);
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.parameters.is_some()
    }

    pub fn external_data(&self) -> Option<&[ParameterHandle; 5]> {
        self.parameters.as_ref()
    }

    /// Rigid-body parameters seen by this arm, with its offset removed from the angle.
    pub fn parameters(&self, state: &RigidBodyState) -> Result<RigidBodyParameters, SlenderBodyErrors> {
        let handles = self
            .parameters
            .as_ref()
            .ok_or_else(|| SlenderBodyErrors::ArmNotAttached(self.name.clone()))?;
        let [v, u0, theta_eq, x0, y0] = handles.map(|h| state.value_of(&h));
        Ok(RigidBodyParameters::new(
            v,
            u0,
            theta_eq - self.kinematics.theta_initial,
            x0,
            y0,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &ReferenceShape {
        &self.shape
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn theta_initial(&self) -> f64 {
        self.kinematics.theta_initial
    }

    pub fn kinematics(&self) -> &ArmKinematics {
        &self.kinematics
    }

    pub fn traction_model(&self) -> &TractionModel {
        &self.traction
    }

    pub fn rule(&self) -> &GaussLegendre {
        &self.rule
    }

    pub fn nodes(&self) -> &[HermiteNode] {
        &self.nodes
    }

    /// Nodal unknowns, written by the elasticity model.
    pub fn nodes_mut(&mut self) -> &mut [HermiteNode] {
        &mut self.nodes
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn n_segments(&self) -> usize {
        self.segments.len()
    }

    pub fn segment(&self, index: usize) -> Result<&Segment, SlenderBodyErrors> {
        self.segments
            .get(index)
            .ok_or(SlenderBodyErrors::SegmentNotFound {
                index,
                n_segments: self.segments.len(),
            })
    }

    /// Position and tangent `dr/ds` of the nodal interpolation at local coordinate `s`.
    pub fn interpolate(&self, index: usize, s: f64) -> Result<(Vector2<f64>, Vector2<f64>), SlenderBodyErrors> {
        let segment = self.segment(index)?;
        Ok(self.interpolate_unchecked(segment, s))
    }

    fn interpolate_unchecked(&self, segment: &Segment, s: f64) -> (Vector2<f64>, Vector2<f64>) {
        let a = &self.nodes[segment.nodes[0]];
        let b = &self.nodes[segment.nodes[1]];
        let h = segment.zeta_length();
        let (psi, dpsi) = hermite_basis(0.5 * (s + 1.0));

        let position = psi[0] * a.position + psi[1] * h * a.slope + psi[2] * b.position + psi[3] * h * b.slope;
        let dposition_du =
            dpsi[0] * a.position + dpsi[1] * h * a.slope + dpsi[2] * b.position + dpsi[3] * h * b.slope;
        (position, 0.5 * dposition_du)
    }

    /// Position and tangent at local coordinate `s` of a segment, in the requested
    /// configuration.
    pub(crate) fn sample(
        &self,
        segment: &Segment,
        s: f64,
        mode: Configuration,
        params: &RigidBodyParameters,
    ) -> (Vector2<f64>, Vector2<f64>) {
        match mode {
            Configuration::Reference => {
                let zeta = segment.zeta_at(s);
                let dzeta_ds = 0.5 * segment.zeta_length();
                (self.shape.position(zeta), dzeta_ds * self.shape.dposition(zeta))
            }
            Configuration::Current => self.interpolate_unchecked(segment, s),
            Configuration::Actual => {
                let (r0, t0) = self.interpolate_unchecked(segment, s);
                // tangents rotate like normals
                self.kinematics.to_actual(r0, t0, params)
            }
        }
    }

    pub(crate) fn quadrature_point_unchecked(
        &self,
        segment: &Segment,
        ipt: usize,
        mode: Configuration,
        params: &RigidBodyParameters,
    ) -> QuadraturePoint {
        let (position, tangent) = self.sample(segment, self.rule.knot(ipt), mode, params);
        QuadraturePoint {
            weight: self.rule.weight(ipt),
            position,
            tangent,
        }
    }

    /// All integration points of one segment.
    pub fn quadrature_points(
        &self,
        index: usize,
        mode: Configuration,
        state: &RigidBodyState,
    ) -> Result<Vec<QuadraturePoint>, SlenderBodyErrors> {
        let segment = self.segment(index)?;
        let params = self.parameters(state)?;
        Ok((0..self.rule.nweight())
            .map(|ipt| self.quadrature_point_unchecked(segment, ipt, mode, &params))
            .collect())
    }

    /// Load at integration point `ipt` of segment `index`: the traction on the actual
    /// configuration pulled back to the reference frame and scaled by `coupling`.
    pub fn load_vector(
        &self,
        index: usize,
        ipt: usize,
        state: &RigidBodyState,
        coupling: f64,
    ) -> Result<Vector2<f64>, SlenderBodyErrors> {
        let segment = self.segment(index)?;
        self.rule.point(ipt)?;
        let params = self.parameters(state)?;
        let point = self.quadrature_point_unchecked(segment, ipt, Configuration::Actual, &params);
        let traction = self
            .traction
            .traction(&point.position, &point.unit_normal(), &params);
        Ok(load(&traction, &params.rotation, coupling))
    }
}
