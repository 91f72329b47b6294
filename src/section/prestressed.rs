//! Prestressed concrete section analysis
//!
//! [`PrestressedSection`] wraps the generic [`CrossSection`] machinery with
//! the prestressed-specific orchestration: cracking moments, cracked section
//! properties, moment-curvature and ultimate capacity for sagging and hogging
//! bending, and stress evaluation for the uncracked, cracked, service and
//! ultimate states.

use std::f64::consts::PI;

use nalgebra::Point2;

use crate::analysis::{split_at_profile_breakpoints, AnalysisRegion, StrainField};
use crate::error::{SectionError, SectionResult};
use crate::geometry::{local_v, Region, SectionGeometry};
use crate::math::{brent, secant, RootConfig};
use crate::results::{
    CrackedProperties, GrossProperties, MomentCurvature, PointStress, StressState,
    UltimateCapacity,
};
use crate::section::{CrossSection, MomentCurvatureConfig};

/// Tolerances for the cracked neutral axis search
const CRACKED_NA_CONFIG: RootConfig = RootConfig {
    xtol: 1e-3,
    rtol: 1e-6,
    max_iter: 100,
};

/// A prestressed concrete cross-section.
///
/// The section must be symmetric about the y-axis of its gross centroid and
/// may only carry meshed concrete; reinforcement and strand enter as lumped
/// elements. Bending is uniaxial: sagging (`positive = true`) or hogging.
#[derive(Debug, Clone)]
pub struct PrestressedSection {
    /// Underlying cross-section with gross properties
    pub base: CrossSection,
}

impl PrestressedSection {
    /// Create a prestressed section, computing gross properties and the
    /// locked-in prestress actions.
    ///
    /// Fails when the section is not symmetric about the y-axis or when a
    /// meshed region carries a non-concrete material.
    pub fn new(
        geometry: SectionGeometry,
        moment_centroid: Option<Point2<f64>>,
    ) -> SectionResult<Self> {
        if geometry.has_meshed_reinforcement() {
            return Err(SectionError::InvalidGeometry(
                "Meshed reinforcement is not supported in a prestressed section; \
                 model reinforcement and strand as lumped elements."
                    .to_string(),
            ));
        }

        let mut base = CrossSection::new(geometry, moment_centroid)?;

        let gp = &base.gross;
        if !is_close(gp.e_zyy_minus, gp.e_zyy_plus) {
            return Err(SectionError::InvalidGeometry(
                "Prestressed sections must be symmetric about the y-axis of the \
                 gross centroid."
                    .to_string(),
            ));
        }

        let mut strand_area = 0.0;
        let mut n_prestress = 0.0;
        let mut m_prestress = 0.0;
        for (lump, strand) in base.geometry.strands() {
            strand_area += lump.area;
            n_prestress += strand.prestress_force;
            m_prestress += strand.prestress_force * (lump.centroid.y - base.moment_centroid.y);
        }
        base.gross.strand_area = strand_area;
        base.gross.n_prestress = n_prestress;
        base.gross.m_prestress = m_prestress;

        Ok(Self { base })
    }

    /// Gross section properties including the prestress actions
    pub fn gross_properties(&self) -> &GrossProperties {
        &self.base.gross
    }

    /// Cracking moment about the x-axis for a net axial force `n` and an
    /// internal (prestress) moment `m_int`.
    ///
    /// The governing moment is the minimum over the concrete regions that
    /// have fibres on the tension side of the gross centroid.
    pub fn cracking_moment(&self, n: f64, m_int: f64, positive: bool) -> f64 {
        let theta = if positive { 0.0 } else { PI };
        let props = &self.base.gross.elastic;
        let c_v = local_v(theta, Point2::new(props.cx, props.cy));
        let sign = if positive { -1.0 } else { 1.0 };

        let mut m_c: Option<f64> = None;
        for region in self.base.geometry.concrete_regions() {
            let v_min = region
                .polygon
                .points()
                .iter()
                .map(|p| local_v(theta, *p))
                .fold(f64::INFINITY, f64::min);
            let d = c_v - v_min;
            if d <= 0.0 {
                continue;
            }

            let e = region.material.elastic_modulus();
            let f_t = region.material.flexural_tensile_strength().unwrap_or(0.0);

            // axial stress raises the cracking stress of this region
            let f_r = f_t + n * e / props.e_a;
            let m_c_geom = (f_r / e) * (props.e_ixx / d) + sign * m_int;

            m_c = Some(match m_c {
                Some(current) => current.min(m_c_geom),
                None => m_c_geom,
            });
        }

        m_c.unwrap_or(0.0)
    }

    /// Cracked section properties under an external moment `m_ext` and axial
    /// force `n_ext`.
    ///
    /// The prestress actions are treated as external loads on the cracked
    /// section. Fails when the combined actions keep the whole section in
    /// compression.
    pub fn cracked_properties(&self, m_ext: f64, n_ext: f64) -> SectionResult<CrackedProperties> {
        let gp = &self.base.gross;
        let n = n_ext + gp.n_prestress;
        let m_cr = (
            self.cracking_moment(n, gp.m_prestress, true),
            -self.cracking_moment(n, gp.m_prestress, false),
        );

        let theta = bending_theta(m_ext + gp.m_prestress);
        let (_, d_t) = self.base.extreme_fibre(theta)?;
        let a = 1e-6 * d_t;
        let b = d_t;

        let d_nc = brent(
            |d| Ok(self.cracked_trial(d, n, m_ext, theta)?.1),
            a,
            b,
            &CRACKED_NA_CONFIG,
        )
        .map_err(|err| match err {
            SectionError::Bracket { .. } => SectionError::AnalysisFailed(
                "Cracked analysis failed to converge: the section contains no \
                 tension. Supply a combination of m_ext and n_ext that produces \
                 tension when combined with the prestressing actions."
                    .to_string(),
            ),
            other => other,
        })?;

        let (mut cracked, _) = self.cracked_trial(d_nc, n, m_ext, theta)?;
        cracked.m_cr = m_cr;
        log::info!("cracked analysis converged: d_nc = {d_nc:.6}");

        Ok(cracked)
    }

    /// Evaluate one cracked neutral axis trial.
    ///
    /// Returns the candidate cracked properties and the minimum concrete
    /// stress of the cracked elastic analysis, which is zero at convergence.
    fn cracked_trial(
        &self,
        d_nc: f64,
        n: f64,
        m_ext: f64,
        theta: f64,
    ) -> SectionResult<(CrackedProperties, f64)> {
        let (ecf, d_t) = self.base.extreme_fibre(theta)?;
        if d_nc <= 0.0 {
            return Err(SectionError::InvalidInput(format!(
                "Cracked neutral axis depth must be positive, got {d_nc}."
            )));
        }
        if d_nc > d_t {
            return Err(SectionError::InvalidInput(format!(
                "Cracked neutral axis depth {d_nc} exceeds the section depth {d_t}."
            )));
        }

        let point_na = crate::analysis::point_on_neutral_axis(ecf, d_nc, theta);

        // keep only the compression-side concrete
        let mut cracked_regions = Vec::new();
        for region in self.base.geometry.concrete_regions() {
            let (above, _) = region.polygon.split(point_na, theta);
            for piece in above {
                cracked_regions.push(Region::new(piece, region.material.clone()));
            }
        }

        let elastic = self.base.cracked_elastic_properties(&cracked_regions);
        let candidate = CrackedProperties {
            theta,
            n,
            m: m_ext,
            m_cr: (0.0, 0.0),
            d_nc,
            cracked_regions,
            elastic,
        };

        let stress = self.cracked_stress(&candidate)?;
        let (stress_min, _) = stress.concrete_stress_limits().ok_or_else(|| {
            SectionError::AnalysisFailed(
                "Cracked section trial contains no concrete in compression.".to_string(),
            )
        })?;

        Ok((candidate, stress_min))
    }

    /// Moment-curvature response for sagging (`positive = true`) or hogging
    /// bending under a constant external axial force `n`.
    ///
    /// The sweep starts from the curvature at which the section carries zero
    /// moment under the prestress and the axial force.
    pub fn moment_curvature(
        &self,
        positive: bool,
        n: f64,
        config: &MomentCurvatureConfig,
    ) -> SectionResult<MomentCurvature> {
        let theta = if positive { 0.0 } else { PI };

        // initial curvature giving zero moment
        let kappa0 = secant(
            |kappa| Ok(self.base.solve_service_state(kappa, theta, n)?.m),
            0.0,
            -1e-6,
            &RootConfig::default(),
        )?;
        log::debug!("initial curvature kappa0 = {kappa0:e}");

        self.base.moment_curvature(theta, n, kappa0, config)
    }

    /// Ultimate bending capacity for sagging (`positive = true`) or hogging
    /// bending under an external axial force `n`
    pub fn ultimate_capacity(&self, positive: bool, n: f64) -> SectionResult<UltimateCapacity> {
        let theta = if positive { 0.0 } else { PI };
        self.base.ultimate_bending_capacity(theta, n)
    }

    /// Moment interaction diagrams are not defined for prestressed sections
    pub fn moment_interaction_diagram(&self) -> SectionResult<()> {
        Err(SectionError::Unsupported(
            "Moment interaction diagrams are not supported for prestressed \
             sections."
                .to_string(),
        ))
    }

    /// Biaxial bending diagrams are not defined for prestressed sections
    pub fn biaxial_bending_diagram(&self) -> SectionResult<()> {
        Err(SectionError::Unsupported(
            "Biaxial bending diagrams are not supported for prestressed \
             sections."
                .to_string(),
        ))
    }

    /// Elastic stress over the uncracked section under external actions,
    /// with the prestress applied as additional external actions
    pub fn uncracked_stress(&self, n_ext: f64, m_ext: f64) -> SectionResult<StressState> {
        let gp = &self.base.gross;
        let props = gp.elastic;
        let reference = Point2::new(props.cx, props.cy);
        let n = n_ext + gp.n_prestress;
        let m = m_ext + gp.m_prestress;

        let mut state = StressState::default();

        for region in &self.base.geometry.regions {
            let analysis = AnalysisRegion::new(region.polygon.clone(), region.material.clone());
            state
                .concrete
                .push(analysis.elastic_stress(n, m, &props, reference));
        }

        for lump in &self.base.geometry.lumps {
            let mut stress = elastic_point_stress(&props, lump.material.elastic_modulus(), n, m, lump.centroid);
            if let Some(strand) = lump.material.as_strand() {
                stress -= strand.prestress_stress(lump.area);
            }
            let strain = stress / lump.material.elastic_modulus();
            let point = point_stress(lump.centroid, stress, strain, lump.area, reference);

            if lump.material.as_strand().is_some() {
                state.tendons.push(point);
            } else {
                state.reinforcement.push(point);
            }
        }

        Ok(state)
    }

    /// Elastic stress over a cracked section.
    ///
    /// The strand forces act as external loads about the cracked centroid.
    pub fn cracked_stress(&self, cracked: &CrackedProperties) -> SectionResult<StressState> {
        let props = cracked.elastic;
        let reference = Point2::new(props.cx, props.cy);
        let n = cracked.n;

        // net moment about the cracked centroid
        let mut m = cracked.m;
        for (lump, strand) in self.base.geometry.strands() {
            m += strand.prestress_force * (lump.centroid.y - props.cy);
        }

        let mut state = StressState::default();

        for region in &cracked.cracked_regions {
            let analysis = AnalysisRegion::new(region.polygon.clone(), region.material.clone());
            state
                .concrete
                .push(analysis.elastic_stress(n, m, &props, reference));
        }

        for lump in &self.base.geometry.lumps {
            let mut stress = elastic_point_stress(&props, lump.material.elastic_modulus(), n, m, lump.centroid);
            if let Some(strand) = lump.material.as_strand() {
                stress -= strand.prestress_stress(lump.area);
            }
            let strain = stress / lump.material.elastic_modulus();
            let point = point_stress(lump.centroid, stress, strain, lump.area, reference);

            if lump.material.as_strand().is_some() {
                state.tendons.push(point);
            } else {
                state.reinforcement.push(point);
            }
        }

        Ok(state)
    }

    /// Service stress at a point on a moment-curvature response.
    ///
    /// The curvature is interpolated from the results for the supplied moment
    /// unless given explicitly.
    pub fn service_stress(
        &self,
        results: &MomentCurvature,
        m: f64,
        kappa: Option<f64>,
    ) -> SectionResult<StressState> {
        let kappa = match kappa {
            Some(kappa) => kappa,
            None => results.curvature_at_moment(m)?,
        };
        let theta = results.theta;

        let (ecf, _) = self.base.extreme_fibre(theta)?;
        let eps0 = brent(
            |e0| {
                Ok(self
                    .base
                    .service_equilibrium(kappa, e0, theta)?
                    .n
                    - results.n_target)
            },
            -0.1,
            0.1,
            &RootConfig::default(),
        )
        .map_err(|err| match err {
            SectionError::Bracket { .. } => SectionError::AnalysisFailed(
                "Service stress analysis failed to converge. Confirm that the \
                 supplied moment or curvature lies within the range of the \
                 moment-curvature analysis."
                    .to_string(),
            ),
            other => other,
        })?;

        let field = StrainField::Service {
            kappa,
            eps0,
            v_ecf: local_v(theta, ecf),
            theta,
        };
        self.field_stress(&field, false)
    }

    /// Stress at the ultimate bending capacity
    pub fn ultimate_stress(&self, ultimate: &UltimateCapacity) -> SectionResult<StressState> {
        let (ecf, _) = self.base.extreme_fibre(ultimate.theta)?;
        let field = StrainField::Ultimate {
            d_n: ultimate.d_n,
            v_ecf: local_v(ultimate.theta, ecf),
            theta: ultimate.theta,
            ultimate_strain: self.base.gross.conc_ultimate_strain,
        };
        self.field_stress(&field, true)
    }

    /// Stress over the whole section under a nonlinear strain field
    fn field_stress(&self, field: &StrainField, ultimate: bool) -> SectionResult<StressState> {
        let reference = self.base.moment_centroid;
        let mut state = StressState::default();

        for region in &self.base.geometry.regions {
            let profile = if ultimate {
                region.material.ultimate_profile()
            } else {
                region.material.service_profile()
            };
            for piece in split_at_profile_breakpoints(&region.polygon, profile, field) {
                let analysis = AnalysisRegion::new(piece, region.material.clone());
                state
                    .concrete
                    .push(analysis.nonlinear_stress(field, profile, reference));
            }
        }

        for lump in &self.base.geometry.lumps {
            let mut strain = field.strain_at(lump.centroid);
            if let Some(strand) = lump.material.as_strand() {
                strain -= strand.prestress_strain(lump.area);
            }
            let profile = if ultimate {
                lump.material.ultimate_profile()
            } else {
                lump.material.service_profile()
            };
            let stress = profile.stress(strain);
            let point = point_stress(lump.centroid, stress, strain, lump.area, reference);

            if lump.material.as_strand().is_some() {
                state.tendons.push(point);
            } else {
                state.reinforcement.push(point);
            }
        }

        Ok(state)
    }
}

/// Elastic stress at a point by superposition over the section stiffness
fn elastic_point_stress(
    props: &crate::results::ElasticProperties,
    elastic_modulus: f64,
    n: f64,
    m: f64,
    point: Point2<f64>,
) -> f64 {
    let det = props.e_ixx * props.e_iyy - props.e_ixy * props.e_ixy;
    let x = point.x - props.cx;
    let y = point.y - props.cy;

    elastic_modulus * (n / props.e_a + (-props.e_ixy * m * x + props.e_iyy * m * y) / det)
}

fn point_stress(
    centroid: Point2<f64>,
    stress: f64,
    strain: f64,
    area: f64,
    reference: Point2<f64>,
) -> PointStress {
    PointStress {
        centroid,
        stress,
        strain,
        force: stress * area,
        d_x: centroid.x - reference.x,
        d_y: centroid.y - reference.y,
    }
}

/// Bending direction for a net moment: sagging only for a strictly positive
/// moment, hogging otherwise
fn bending_theta(m_net: f64) -> f64 {
    if m_net > 0.0 {
        0.0
    } else {
        PI
    }
}

/// Relative closeness check for the symmetry validation
fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-8 + 1e-5 * b.abs()
}
