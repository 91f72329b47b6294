//! Exact stress integration over a single polygon piece

use nalgebra::{Point2, Vector2};

use crate::analysis::StrainField;
use crate::geometry::Polygon;
use crate::material::{Material, StressStrainProfile};
use crate::results::{ElasticProperties, RegionStress};

/// One polygon piece with its material, ready for stress integration.
///
/// Callers split regions at the neutral axis and profile breakpoints first,
/// so the stress field over a piece is affine and the force and moment
/// integrals reduce to the piece's area, centroid and second moments.
#[derive(Debug, Clone)]
pub struct AnalysisRegion {
    /// The polygon piece
    pub polygon: Polygon,
    /// Material of the parent region
    pub material: Material,
}

impl AnalysisRegion {
    /// Create an analysis region from a piece and its material
    pub fn new(polygon: Polygon, material: Material) -> Self {
        Self { polygon, material }
    }

    /// Elastic stress under axial force `n` and moment `m` about the x-axis,
    /// by superposition over the section stiffness `props`.
    ///
    /// Lever arms are taken about `moment_centroid`.
    pub fn elastic_stress(
        &self,
        n: f64,
        m: f64,
        props: &ElasticProperties,
        moment_centroid: Point2<f64>,
    ) -> RegionStress {
        let e = self.material.elastic_modulus();
        let det = props.e_ixx * props.e_iyy - props.e_ixy * props.e_ixy;

        // affine stress field: sigma = sigma_0 + g . (x - c, y - c)
        let sigma_0 = e * n / props.e_a;
        let gradient = Vector2::new(
            e * (-props.e_ixy * m) / det,
            e * (props.e_iyy * m) / det,
        );

        let stress_at = |p: Point2<f64>| {
            sigma_0 + gradient.x * (p.x - props.cx) + gradient.y * (p.y - props.cy)
        };

        self.integrate_affine(stress_at, gradient, e, moment_centroid)
    }

    /// Nonlinear stress under a linear strain field, using `profile` for the
    /// material response.
    ///
    /// The piece must lie within a single affine segment of the profile.
    pub fn nonlinear_stress(
        &self,
        field: &StrainField,
        profile: &StressStrainProfile,
        moment_centroid: Point2<f64>,
    ) -> RegionStress {
        let theta = field.theta();
        let centroid = self.polygon.centroid();
        let strain_c = field.strain_at(centroid);

        // stress gradient in global coordinates
        let d_sigma_dv = profile.slope(strain_c) * field.gradient();
        let up = Vector2::new(-theta.sin(), theta.cos());
        let gradient = d_sigma_dv * up;

        let sigma_c = profile.stress(strain_c);
        let stress_at = |p: Point2<f64>| {
            sigma_c + gradient.x * (p.x - centroid.x) + gradient.y * (p.y - centroid.y)
        };

        let mut result = self.integrate_affine(stress_at, gradient, 1.0, moment_centroid);

        // exact strain extremes from the vertices of the piece
        let mut strain_min = strain_c;
        let mut strain_max = strain_c;
        for p in self.polygon.points() {
            let eps = field.strain_at(*p);
            strain_min = strain_min.min(eps);
            strain_max = strain_max.max(eps);
        }
        result.strain_min = strain_min;
        result.strain_max = strain_max;

        // stresses at the vertices are exact within the segment
        result.stress_min = f64::INFINITY;
        result.stress_max = f64::NEG_INFINITY;
        for p in self.polygon.points() {
            let sig = profile.stress(field.strain_at(*p));
            result.stress_min = result.stress_min.min(sig);
            result.stress_max = result.stress_max.max(sig);
        }

        result
    }

    /// Integrate an affine stress field exactly over the piece.
    ///
    /// `strain_modulus` converts stress back to strain for the reported
    /// strain extremes of the elastic case.
    fn integrate_affine<F>(
        &self,
        stress_at: F,
        gradient: Vector2<f64>,
        strain_modulus: f64,
        moment_centroid: Point2<f64>,
    ) -> RegionStress
    where
        F: Fn(Point2<f64>) -> f64,
    {
        let area = self.polygon.area();
        let centroid = self.polygon.centroid();
        let ixx_c = self.polygon.ixx_c();
        let iyy_c = self.polygon.iyy_c();
        let ixy_c = self.polygon.ixy_c();

        let sigma_c = stress_at(centroid);
        let force = sigma_c * area;

        let m_x = force * (centroid.y - moment_centroid.y)
            + gradient.x * ixy_c
            + gradient.y * ixx_c;
        let m_y = force * (centroid.x - moment_centroid.x)
            + gradient.x * iyy_c
            + gradient.y * ixy_c;

        let (d_x, d_y) = if force.abs() > f64::EPSILON {
            (m_y / force, m_x / force)
        } else {
            (0.0, 0.0)
        };

        let mut stress_min = f64::INFINITY;
        let mut stress_max = f64::NEG_INFINITY;
        for p in self.polygon.points() {
            let sig = stress_at(*p);
            stress_min = stress_min.min(sig);
            stress_max = stress_max.max(sig);
        }

        RegionStress {
            polygon: self.polygon.clone(),
            stress_min,
            stress_max,
            strain_min: stress_min / strain_modulus,
            strain_max: stress_max / strain_modulus,
            force,
            m_x,
            m_y,
            d_x,
            d_y,
        }
    }
}
