//! Result types for section analyses

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::{SectionError, SectionResult};
use crate::geometry::{Polygon, Region};

/// Axial and flexural stiffness properties of a (gross or cracked) section
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ElasticProperties {
    /// Axial stiffness E·A
    pub e_a: f64,
    /// Centroid x-coordinate
    pub cx: f64,
    /// Centroid y-coordinate
    pub cy: f64,
    /// Flexural stiffness E·Ixx about the centroidal x-axis
    pub e_ixx: f64,
    /// Flexural stiffness E·Iyy about the centroidal y-axis
    pub e_iyy: f64,
    /// Product stiffness E·Ixy about the centroidal axes
    pub e_ixy: f64,
}

/// Gross section properties, computed once at construction and immutable
/// for the lifetime of the section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrossProperties {
    /// Total cross-sectional area
    pub area: f64,
    /// Elastic stiffness properties about the gross centroid
    pub elastic: ElasticProperties,
    /// Section modulus E·Zyy for the positive-x extreme fibre
    pub e_zyy_plus: f64,
    /// Section modulus E·Zyy for the negative-x extreme fibre
    pub e_zyy_minus: f64,
    /// Ultimate compressive strain of the governing concrete
    pub conc_ultimate_strain: f64,
    /// Total strand area
    pub strand_area: f64,
    /// Net prestress axial force (sum of strand prestress forces)
    pub n_prestress: f64,
    /// Net prestress moment about the moment centroid
    pub m_prestress: f64,
}

/// Results of a cracked section analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrackedProperties {
    /// Bending axis rotation (0 for sagging, pi for hogging)
    pub theta: f64,
    /// Net axial force the analysis was performed for
    pub n: f64,
    /// External bending moment the analysis was performed for
    pub m: f64,
    /// Cracking moments for (positive, negative) bending
    pub m_cr: (f64, f64),
    /// Converged neutral axis depth measured from the extreme compressive fibre
    pub d_nc: f64,
    /// Compression-zone concrete pieces retained after cracking
    pub cracked_regions: Vec<Region>,
    /// Elastic stiffness properties of the cracked section
    pub elastic: ElasticProperties,
}

impl CrackedProperties {
    /// Serialize to a JSON string
    pub fn to_json(&self) -> SectionResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Material class governing a moment-curvature failure point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureMaterial {
    Concrete,
    Reinforcement,
    Strand,
}

/// Failure point terminating a moment-curvature analysis
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CurvatureFailure {
    /// Material class that reached its failure strain
    pub material: FailureMaterial,
    /// Curvature at failure
    pub kappa: f64,
}

/// Results of a moment-curvature analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentCurvature {
    /// Bending axis rotation (0 for sagging, pi for hogging)
    pub theta: f64,
    /// Target axial force held constant through the analysis
    pub n_target: f64,
    /// Curvature values
    pub kappa: Vec<f64>,
    /// Moment at each curvature value
    pub moment: Vec<f64>,
    /// Failure point that terminated the sweep, if one was reached
    pub failure: Option<CurvatureFailure>,
}

impl MomentCurvature {
    /// Curvature at a given moment by linear interpolation of the analysis
    /// results.
    ///
    /// Fails when the moment lies outside the analysed range.
    pub fn curvature_at_moment(&self, m: f64) -> SectionResult<f64> {
        if self.kappa.len() < 2 {
            return Err(SectionError::AnalysisFailed(
                "Moment-curvature results contain fewer than two points.".to_string(),
            ));
        }

        for i in 0..self.moment.len() - 1 {
            let (m0, m1) = (self.moment[i], self.moment[i + 1]);
            if (m - m0) * (m - m1) <= 0.0 {
                let t = if m1 == m0 { 0.0 } else { (m - m0) / (m1 - m0) };
                return Ok(self.kappa[i] + t * (self.kappa[i + 1] - self.kappa[i]));
            }
        }

        Err(SectionError::AnalysisFailed(format!(
            "Moment {m} is outside the range of the moment-curvature analysis. \
             Confirm that the supplied moment or curvature lies within the \
             analysed range."
        )))
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> SectionResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Results of an ultimate bending capacity analysis
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UltimateCapacity {
    /// Bending axis rotation (0 for sagging, pi for hogging)
    pub theta: f64,
    /// Converged neutral axis depth (infinite for the uniform-strain case)
    pub d_n: f64,
    /// Net axial force at equilibrium
    pub n: f64,
    /// Ultimate bending moment about the moment centroid
    pub m: f64,
    /// Neutral axis parameter d_n / d, with d the depth to the extreme
    /// lumped tension element (zero when the section has no lumps)
    pub k_u: f64,
}

/// Stress in one meshed piece with its exact force resultant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionStress {
    /// The polygon piece the stresses apply to
    pub polygon: Polygon,
    /// Minimum stress over the piece
    pub stress_min: f64,
    /// Maximum stress over the piece
    pub stress_max: f64,
    /// Minimum strain over the piece
    pub strain_min: f64,
    /// Maximum strain over the piece
    pub strain_max: f64,
    /// Net force carried by the piece
    pub force: f64,
    /// Moment of the piece force about the reference x-axis
    pub m_x: f64,
    /// Moment of the piece force about the reference y-axis
    pub m_y: f64,
    /// y lever arm of the force about the reference point
    pub d_y: f64,
    /// x lever arm of the force about the reference point
    pub d_x: f64,
}

/// Stress at one lumped element (bar or strand)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointStress {
    /// Element centroid
    pub centroid: Point2<f64>,
    /// Stress at the element centroid
    pub stress: f64,
    /// Strain at the element centroid
    pub strain: f64,
    /// Net force in the element
    pub force: f64,
    /// x lever arm of the force about the reference point
    pub d_x: f64,
    /// y lever arm of the force about the reference point
    pub d_y: f64,
}

/// Stress distribution over the section for one analysis state.
///
/// Concrete pieces, lumped reinforcement and strand are kept in separate
/// collections because post-processing treats them differently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StressState {
    /// Per-piece concrete stresses
    pub concrete: Vec<RegionStress>,
    /// Lumped reinforcement stresses
    pub reinforcement: Vec<PointStress>,
    /// Strand stresses
    pub tendons: Vec<PointStress>,
}

impl StressState {
    /// Minimum and maximum concrete stress over all pieces
    pub fn concrete_stress_limits(&self) -> Option<(f64, f64)> {
        let mut limits: Option<(f64, f64)> = None;
        for piece in &self.concrete {
            limits = Some(match limits {
                Some((lo, hi)) => (lo.min(piece.stress_min), hi.max(piece.stress_max)),
                None => (piece.stress_min, piece.stress_max),
            });
        }
        limits
    }

    /// Net axial force summed over every piece and lumped element
    pub fn total_force(&self) -> f64 {
        let conc: f64 = self.concrete.iter().map(|p| p.force).sum();
        let bars: f64 = self.reinforcement.iter().map(|p| p.force).sum();
        let tendons: f64 = self.tendons.iter().map(|p| p.force).sum();
        conc + bars + tendons
    }

    /// Net moment about the reference x-axis summed over every piece and
    /// lumped element
    pub fn total_moment_x(&self) -> f64 {
        let conc: f64 = self.concrete.iter().map(|p| p.m_x).sum();
        let bars: f64 = self.reinforcement.iter().map(|p| p.force * p.d_y).sum();
        let tendons: f64 = self.tendons.iter().map(|p| p.force * p.d_y).sum();
        conc + bars + tendons
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> SectionResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
