//! Cross-section property bookkeeping and generic equilibrium machinery
//!
//! [`CrossSection`] owns the geometry and the gross properties computed once
//! at construction, and provides the generic solvers the prestressed
//! orchestrator builds on: cracked property aggregation, the service
//! (moment-curvature) equilibrium iteration and the ultimate neutral axis
//! search.

pub mod prestressed;

use nalgebra::Point2;

use crate::analysis::{split_at_profile_breakpoints, AnalysisRegion, StrainField};
use crate::error::{SectionError, SectionResult};
use crate::geometry::{local_v, Lump, Region, SectionGeometry};
use crate::math::{brent, RootConfig};
use crate::results::{
    CurvatureFailure, ElasticProperties, FailureMaterial, GrossProperties, MomentCurvature,
    UltimateCapacity,
};

pub use prestressed::PrestressedSection;

/// Step-control parameters for a moment-curvature analysis
#[derive(Debug, Clone, Copy)]
pub struct MomentCurvatureConfig {
    /// Initial curvature increment
    pub kappa_inc: f64,
    /// Multiplier applied to the increment when the moment change is small;
    /// its inverse is applied when the change is large
    pub kappa_mult: f64,
    /// Maximum curvature increment
    pub kappa_inc_max: f64,
    /// Relative moment change below which the increment is grown
    pub delta_m_min: f64,
    /// Relative moment change above which the increment is reduced
    pub delta_m_max: f64,
}

impl Default for MomentCurvatureConfig {
    fn default() -> Self {
        Self {
            kappa_inc: 1e-7,
            kappa_mult: 2.0,
            kappa_inc_max: 5e-6,
            delta_m_min: 0.15,
            delta_m_max: 0.3,
        }
    }
}

impl MomentCurvatureConfig {
    /// Set the initial curvature increment
    pub fn with_kappa_inc(mut self, kappa_inc: f64) -> Self {
        self.kappa_inc = kappa_inc;
        self
    }

    /// Set the maximum curvature increment
    pub fn with_kappa_inc_max(mut self, kappa_inc_max: f64) -> Self {
        self.kappa_inc_max = kappa_inc_max;
        self
    }

    /// Set the relative moment change thresholds for adapting the increment
    pub fn with_moment_thresholds(mut self, delta_m_min: f64, delta_m_max: f64) -> Self {
        self.delta_m_min = delta_m_min;
        self.delta_m_max = delta_m_max;
        self
    }
}

/// Converged state of one service (moment-curvature) trial
#[derive(Debug, Clone, Copy)]
pub struct ServiceState {
    /// Net axial force
    pub n: f64,
    /// Net moment about the moment centroid
    pub m: f64,
    /// Largest ratio of any material strain to its failure strain
    pub failure_ratio: f64,
    /// Material class carrying the largest failure ratio
    pub failure_material: FailureMaterial,
}

/// Net actions of one ultimate trial
#[derive(Debug, Clone, Copy)]
pub struct UltimateState {
    /// Net axial force
    pub n: f64,
    /// Net moment about the moment centroid
    pub m: f64,
}

/// Safety cap on moment-curvature steps
const MAX_MK_STEPS: usize = 10_000;

/// A cross-section with gross properties computed at construction.
///
/// The gross properties (including the prestress actions filled in by
/// [`PrestressedSection::new`]) are fixed once construction completes and
/// are reused unchanged by every analysis.
#[derive(Debug, Clone)]
pub struct CrossSection {
    /// Section geometry
    pub geometry: SectionGeometry,
    /// Gross section properties
    pub gross: GrossProperties,
    /// Point about which analysis moments are reported
    pub moment_centroid: Point2<f64>,
}

impl CrossSection {
    /// Create a cross-section and compute its gross properties.
    ///
    /// When `moment_centroid` is `None` moments are reported about the
    /// stiffness-weighted gross centroid.
    pub fn new(
        geometry: SectionGeometry,
        moment_centroid: Option<Point2<f64>>,
    ) -> SectionResult<Self> {
        if geometry.regions.is_empty() {
            return Err(SectionError::InvalidGeometry(
                "Section contains no meshed regions.".to_string(),
            ));
        }

        let elastic = elastic_properties(&geometry.regions, &geometry.lumps);

        let area: f64 = geometry.regions.iter().map(|r| r.polygon.area()).sum::<f64>()
            + geometry.lumps.iter().map(|l| l.area).sum::<f64>();

        // x extents govern the section moduli used by the symmetry check
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        for p in geometry.boundary_points() {
            x_min = x_min.min(p.x);
            x_max = x_max.max(p.x);
        }

        let e_zyy_plus = if x_max - elastic.cx > 0.0 {
            elastic.e_iyy / (x_max - elastic.cx)
        } else {
            0.0
        };
        let e_zyy_minus = if elastic.cx - x_min > 0.0 {
            elastic.e_iyy / (elastic.cx - x_min)
        } else {
            0.0
        };

        // the least ductile concrete governs the ultimate strain pivot
        let conc_ultimate_strain = geometry
            .concrete_regions()
            .map(|r| r.material.ultimate_profile().failure_strain())
            .fold(f64::INFINITY, f64::min);
        let conc_ultimate_strain = if conc_ultimate_strain.is_finite() {
            conc_ultimate_strain
        } else {
            0.0
        };

        let gross = GrossProperties {
            area,
            elastic,
            e_zyy_plus,
            e_zyy_minus,
            conc_ultimate_strain,
            strand_area: 0.0,
            n_prestress: 0.0,
            m_prestress: 0.0,
        };

        let moment_centroid =
            moment_centroid.unwrap_or_else(|| Point2::new(elastic.cx, elastic.cy));

        Ok(Self {
            geometry,
            gross,
            moment_centroid,
        })
    }

    /// Elastic stiffness properties of a cracked geometry set (compression
    /// concrete pieces plus every lumped element)
    pub fn cracked_elastic_properties(&self, cracked_regions: &[Region]) -> ElasticProperties {
        elastic_properties(cracked_regions, &self.geometry.lumps)
    }

    /// Integrate the service stress field over the whole section.
    ///
    /// Pure trial function: no state is mutated. Strand lumps have their
    /// prestress strain subtracted before the profile is evaluated.
    pub fn service_equilibrium(
        &self,
        kappa: f64,
        eps0: f64,
        theta: f64,
    ) -> SectionResult<ServiceState> {
        let (ecf, _) = self.extreme_fibre(theta)?;
        let field = StrainField::Service {
            kappa,
            eps0,
            v_ecf: local_v(theta, ecf),
            theta,
        };

        let mut n = 0.0;
        let mut m = 0.0;
        let mut failure_ratio = 0.0;
        let mut failure_material = FailureMaterial::Concrete;

        for region in &self.geometry.regions {
            let profile = region.material.service_profile();
            let limit = profile.failure_strain();

            for piece in split_at_profile_breakpoints(&region.polygon, profile, &field) {
                let analysis = AnalysisRegion::new(piece, region.material.clone());
                let stress = analysis.nonlinear_stress(&field, profile, self.moment_centroid);
                n += stress.force;
                m += stress.m_x;

                let ratio = stress.strain_max / limit;
                if ratio > failure_ratio {
                    failure_ratio = ratio;
                    failure_material = FailureMaterial::Concrete;
                }
            }
        }

        for lump in &self.geometry.lumps {
            let (stress, strain) = lump_response(lump, &field, false);
            n += stress * lump.area;
            m += stress * lump.area * (lump.centroid.y - self.moment_centroid.y);

            let profile = lump.material.service_profile();
            let ratio = strain.abs() / profile.failure_strain();
            if ratio > failure_ratio {
                failure_ratio = ratio;
                failure_material = if lump.material.as_strand().is_some() {
                    FailureMaterial::Strand
                } else {
                    FailureMaterial::Reinforcement
                };
            }
        }

        Ok(ServiceState {
            n,
            m,
            failure_ratio,
            failure_material,
        })
    }

    /// Solve the strain offset that balances the target axial force at a
    /// given curvature, then return the committed state
    pub fn solve_service_state(
        &self,
        kappa: f64,
        theta: f64,
        n_target: f64,
    ) -> SectionResult<ServiceState> {
        let config = RootConfig::default();
        let eps0 = brent(
            |e0| Ok(self.service_equilibrium(kappa, e0, theta)?.n - n_target),
            -0.1,
            0.1,
            &config,
        )?;
        self.service_equilibrium(kappa, eps0, theta)
    }

    /// Generic moment-curvature stepping loop.
    ///
    /// Starts at `kappa0` and advances by an adaptive increment until a
    /// material reaches its failure strain.
    pub fn moment_curvature(
        &self,
        theta: f64,
        n: f64,
        kappa0: f64,
        config: &MomentCurvatureConfig,
    ) -> SectionResult<MomentCurvature> {
        let mut results = MomentCurvature {
            theta,
            n_target: n,
            kappa: Vec::new(),
            moment: Vec::new(),
            failure: None,
        };

        let initial = self.solve_service_state(kappa0, theta, n)?;
        results.kappa.push(kappa0);
        results.moment.push(initial.m);

        let mut kappa = kappa0;
        let mut kappa_inc = config.kappa_inc;
        let mut m_prev = initial.m;

        for step in 0..MAX_MK_STEPS {
            let trial_kappa = kappa + kappa_inc;
            let state = self.solve_service_state(trial_kappa, theta, n)?;

            if state.failure_ratio >= 1.0 {
                if kappa_inc > config.kappa_inc {
                    // walk back towards the failure point
                    kappa_inc /= 2.0;
                    continue;
                }
                results.kappa.push(trial_kappa);
                results.moment.push(state.m);
                results.failure = Some(CurvatureFailure {
                    material: state.failure_material,
                    kappa: trial_kappa,
                });
                log::info!(
                    "moment-curvature finished after {} steps, failure at kappa = {trial_kappa:e}",
                    step + 1
                );
                return Ok(results);
            }

            kappa = trial_kappa;
            results.kappa.push(kappa);
            results.moment.push(state.m);
            log::debug!("mk step {step}: kappa = {kappa:e}, m = {:e}", state.m);

            // adapt the curvature increment to the relative moment change
            if state.m != 0.0 {
                let delta_m = ((state.m - m_prev) / state.m).abs();
                if delta_m < config.delta_m_min {
                    kappa_inc = (kappa_inc * config.kappa_mult).min(config.kappa_inc_max);
                } else if delta_m > config.delta_m_max {
                    kappa_inc /= config.kappa_mult;
                }
            }
            m_prev = state.m;
        }

        Err(SectionError::Convergence {
            iterations: MAX_MK_STEPS,
        })
    }

    /// Integrate the ultimate stress field over the whole section for a
    /// trial neutral axis depth (`INFINITY` for the uniform-strain case)
    pub fn ultimate_equilibrium(&self, d_n: f64, theta: f64) -> SectionResult<UltimateState> {
        if d_n <= 0.0 {
            return Err(SectionError::InvalidInput(format!(
                "Neutral axis depth must be positive, got {d_n}."
            )));
        }

        let (ecf, _) = self.extreme_fibre(theta)?;
        let field = StrainField::Ultimate {
            d_n,
            v_ecf: local_v(theta, ecf),
            theta,
            ultimate_strain: self.gross.conc_ultimate_strain,
        };

        let mut n = 0.0;
        let mut m = 0.0;

        for region in &self.geometry.regions {
            let profile = region.material.ultimate_profile();
            for piece in split_at_profile_breakpoints(&region.polygon, profile, &field) {
                let analysis = AnalysisRegion::new(piece, region.material.clone());
                let stress = analysis.nonlinear_stress(&field, profile, self.moment_centroid);
                n += stress.force;
                m += stress.m_x;
            }
        }

        for lump in &self.geometry.lumps {
            let (stress, _) = lump_response(lump, &field, true);
            n += stress * lump.area;
            m += stress * lump.area * (lump.centroid.y - self.moment_centroid.y);
        }

        Ok(UltimateState { n, m })
    }

    /// Find the neutral axis depth at which the ultimate stress distribution
    /// balances the target axial force
    pub fn ultimate_bending_capacity(
        &self,
        theta: f64,
        n: f64,
    ) -> SectionResult<UltimateCapacity> {
        let (ecf, d_t) = self.extreme_fibre(theta)?;

        let a = 1e-6 * d_t;
        let b = 6.0 * d_t;
        let config = RootConfig::default();

        let d_n = brent(
            |d| Ok(self.ultimate_equilibrium(d, theta)?.n - n),
            a,
            b,
            &config,
        )
        .map_err(|err| match err {
            SectionError::Bracket { .. } => SectionError::AnalysisFailed(format!(
                "Ultimate analysis failed for n = {n}: no neutral axis depth in \
                 [{a}, {b}] balances the axial force."
            )),
            other => other,
        })?;

        let state = self.ultimate_equilibrium(d_n, theta)?;

        // k_u relative to the extreme lumped tension element
        let v_ecf = local_v(theta, ecf);
        let d_lump = self
            .geometry
            .lumps
            .iter()
            .map(|l| v_ecf - local_v(theta, l.centroid))
            .fold(0.0, f64::max);
        let k_u = if d_lump > 0.0 { d_n / d_lump } else { 0.0 };

        log::info!("ultimate capacity: d_n = {d_n:.6}, m = {:e}", state.m);

        Ok(UltimateCapacity {
            theta,
            d_n,
            n: state.n,
            m: state.m,
            k_u,
        })
    }

    /// Extreme fibre of the section for a bending axis rotation
    pub(crate) fn extreme_fibre(&self, theta: f64) -> SectionResult<(Point2<f64>, f64)> {
        self.geometry.extreme_fibre(theta).ok_or_else(|| {
            SectionError::InvalidGeometry("Section contains no boundary points.".to_string())
        })
    }
}

/// Stress and strain at a lumped element under a strain field, using the
/// service or ultimate profile and subtracting the strand prestress strain
fn lump_response(lump: &Lump, field: &StrainField, ultimate: bool) -> (f64, f64) {
    let mut strain = field.strain_at(lump.centroid);
    if let Some(strand) = lump.material.as_strand() {
        strain -= strand.prestress_strain(lump.area);
    }

    let profile = if ultimate {
        lump.material.ultimate_profile()
    } else {
        lump.material.service_profile()
    };

    (profile.stress(strain), strain)
}

/// Stiffness-weighted elastic properties of a geometry set
fn elastic_properties(regions: &[Region], lumps: &[Lump]) -> ElasticProperties {
    let mut e_a = 0.0;
    let mut e_qx = 0.0; // E * first moment about the x-axis
    let mut e_qy = 0.0;
    let mut e_ixx_o = 0.0; // E * second moments about the origin
    let mut e_iyy_o = 0.0;
    let mut e_ixy_o = 0.0;

    for region in regions {
        let e = region.material.elastic_modulus();
        let area = region.polygon.area();
        let c = region.polygon.centroid();

        e_a += e * area;
        e_qx += e * area * c.y;
        e_qy += e * area * c.x;
        e_ixx_o += e * region.polygon.ixx();
        e_iyy_o += e * region.polygon.iyy();
        e_ixy_o += e * region.polygon.ixy();
    }

    for lump in lumps {
        let e = lump.material.elastic_modulus();
        let (x, y) = (lump.centroid.x, lump.centroid.y);

        e_a += e * lump.area;
        e_qx += e * lump.area * y;
        e_qy += e * lump.area * x;
        e_ixx_o += e * lump.area * y * y;
        e_iyy_o += e * lump.area * x * x;
        e_ixy_o += e * lump.area * x * y;
    }

    if e_a == 0.0 {
        return ElasticProperties::default();
    }

    let cx = e_qy / e_a;
    let cy = e_qx / e_a;

    ElasticProperties {
        e_a,
        cx,
        cy,
        e_ixx: e_ixx_o - e_a * cy * cy,
        e_iyy: e_iyy_o - e_a * cx * cx,
        e_ixy: e_ixy_o - e_a * cx * cy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use crate::material::Concrete;
    use approx::assert_relative_eq;

    fn rect_section() -> CrossSection {
        let mut geometry = SectionGeometry::new();
        geometry.add_concrete(
            Polygon::rectangle(0.3, 0.6),
            Concrete::rectangular_block(30e9, 40e6, 3.5e6, 0.85, 0.77, 0.003),
        );
        CrossSection::new(geometry, None).unwrap()
    }

    #[test]
    fn test_gross_properties_rectangle() {
        let section = rect_section();
        let props = section.gross.elastic;

        assert_relative_eq!(props.e_a, 30e9 * 0.18, max_relative = 1e-12);
        assert_relative_eq!(props.cx, 0.15, epsilon = 1e-12);
        assert_relative_eq!(props.cy, 0.3, epsilon = 1e-12);
        assert_relative_eq!(
            props.e_ixx,
            30e9 * 0.3 * 0.6_f64.powi(3) / 12.0,
            max_relative = 1e-9
        );
        assert_relative_eq!(props.e_ixy, 0.0, epsilon = 1e-3);
        // symmetric section
        assert_relative_eq!(
            section.gross.e_zyy_plus,
            section.gross.e_zyy_minus,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_service_equilibrium_pure_compression() {
        let section = rect_section();
        // uniform compressive strain, no curvature
        let state = section.service_equilibrium(0.0, 0.001, 0.0).unwrap();
        assert_relative_eq!(state.n, 30e9 * 0.001 * 0.18, max_relative = 1e-9);
        assert_relative_eq!(state.m, 0.0, epsilon = 1.0);
    }

    #[test]
    fn test_solve_service_state_balances_axial_force() {
        let section = rect_section();
        let n_target = 500e3;
        let state = section.solve_service_state(1e-4, 0.0, n_target).unwrap();
        assert_relative_eq!(state.n, n_target, max_relative = 1e-6);
    }

    #[test]
    fn test_ultimate_equilibrium_squash() {
        let section = rect_section();
        let state = section
            .ultimate_equilibrium(f64::INFINITY, 0.0)
            .unwrap();
        // whole section at the block stress
        assert_relative_eq!(state.n, 0.85 * 40e6 * 0.18, max_relative = 1e-12);
        assert_relative_eq!(state.m, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_ultimate_equilibrium_rejects_bad_depth() {
        let section = rect_section();
        assert!(matches!(
            section.ultimate_equilibrium(-0.1, 0.0),
            Err(SectionError::InvalidInput(_))
        ));
    }
}
