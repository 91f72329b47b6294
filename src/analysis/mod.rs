//! Strain fields and geometry preparation for stress integration
//!
//! Under the plane-sections hypothesis the strain over the section is linear
//! in the perpendicular (local `v`) coordinate of the bending frame. Meshed
//! regions are split at the neutral axis and at every stress-strain profile
//! breakpoint, so each resulting piece carries an affine stress field that
//! the per-piece integrals in [`region`] evaluate exactly.

pub mod region;

use nalgebra::{Point2, Rotation2, Vector2};

use crate::geometry::{local_v, Polygon};
use crate::material::StressStrainProfile;

pub use region::AnalysisRegion;

/// Linear strain distribution over the section for one converged state.
///
/// Compression positive, consistent with the material profiles.
#[derive(Debug, Clone, Copy)]
pub enum StrainField {
    /// Service state: strain `eps0` at the extreme compressive fibre,
    /// varying at rate `kappa` with depth
    Service {
        /// Curvature
        kappa: f64,
        /// Strain at the extreme compressive fibre
        eps0: f64,
        /// Local `v` coordinate of the extreme compressive fibre
        v_ecf: f64,
        /// Bending axis rotation
        theta: f64,
    },
    /// Ultimate state: strain pivots about the extreme compressive fibre at
    /// the concrete ultimate strain; `d_n = INFINITY` means uniform strain
    Ultimate {
        /// Neutral axis depth from the extreme compressive fibre
        d_n: f64,
        /// Local `v` coordinate of the extreme compressive fibre
        v_ecf: f64,
        /// Bending axis rotation
        theta: f64,
        /// Concrete ultimate compressive strain
        ultimate_strain: f64,
    },
}

impl StrainField {
    /// Bending axis rotation of the field
    pub fn theta(&self) -> f64 {
        match *self {
            StrainField::Service { theta, .. } => theta,
            StrainField::Ultimate { theta, .. } => theta,
        }
    }

    /// Strain at a point of the section
    pub fn strain_at(&self, point: Point2<f64>) -> f64 {
        match *self {
            StrainField::Service {
                kappa,
                eps0,
                v_ecf,
                theta,
            } => {
                let v = local_v(theta, point);
                eps0 - kappa * (v_ecf - v)
            }
            StrainField::Ultimate {
                d_n,
                v_ecf,
                theta,
                ultimate_strain,
            } => {
                if d_n.is_infinite() {
                    ultimate_strain
                } else {
                    let v = local_v(theta, point);
                    ultimate_strain * (1.0 - (v_ecf - v) / d_n)
                }
            }
        }
    }

    /// Rate of change of strain with the local `v` coordinate
    pub fn gradient(&self) -> f64 {
        match *self {
            StrainField::Service { kappa, .. } => kappa,
            StrainField::Ultimate {
                d_n,
                ultimate_strain,
                ..
            } => {
                if d_n.is_infinite() {
                    0.0
                } else {
                    ultimate_strain / d_n
                }
            }
        }
    }

    /// Local `v` coordinate at which the field equals `strain`, or `None`
    /// for a uniform field
    pub fn v_at_strain(&self, strain: f64) -> Option<f64> {
        match *self {
            StrainField::Service {
                kappa,
                eps0,
                v_ecf,
                ..
            } => {
                if kappa == 0.0 {
                    None
                } else {
                    Some(v_ecf - (eps0 - strain) / kappa)
                }
            }
            StrainField::Ultimate {
                d_n,
                v_ecf,
                ultimate_strain,
                ..
            } => {
                if d_n.is_infinite() || ultimate_strain == 0.0 {
                    None
                } else {
                    Some(v_ecf - d_n * (1.0 - strain / ultimate_strain))
                }
            }
        }
    }
}

/// Point on the neutral axis located a depth `d_n` below the extreme
/// compressive fibre, measured perpendicular to the bending axis
pub fn point_on_neutral_axis(
    extreme_fibre: Point2<f64>,
    d_n: f64,
    theta: f64,
) -> Point2<f64> {
    let up = Vector2::new(-theta.sin(), theta.cos());
    extreme_fibre - d_n * up
}

/// Split a polygon at every profile breakpoint of the strain field so each
/// returned piece lies within a single affine segment of the profile
pub fn split_at_profile_breakpoints(
    polygon: &Polygon,
    profile: &StressStrainProfile,
    field: &StrainField,
) -> Vec<Polygon> {
    let theta = field.theta();
    let mut pieces = vec![polygon.clone()];

    for breakpoint in profile.breakpoints() {
        let Some(v_line) = field.v_at_strain(breakpoint) else {
            continue;
        };

        // any point with local v coordinate on the breakpoint line
        let line_point = Rotation2::new(theta) * Point2::new(0.0, v_line);

        pieces = pieces
            .iter()
            .flat_map(|piece| {
                let (above, below) = piece.split(line_point, theta);
                above.into_iter().chain(below)
            })
            .collect();
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_service_strain_field() {
        let field = StrainField::Service {
            kappa: 1e-3,
            eps0: 0.001,
            v_ecf: 0.6,
            theta: 0.0,
        };
        // at the extreme compressive fibre
        assert_relative_eq!(field.strain_at(Point2::new(0.0, 0.6)), 0.001);
        // 0.3 below the top
        assert_relative_eq!(field.strain_at(Point2::new(0.1, 0.3)), 0.001 - 1e-3 * 0.3);
        // neutral axis location recovered from the field
        let v_na = field.v_at_strain(0.0).unwrap();
        assert_relative_eq!(field.strain_at(Point2::new(0.0, v_na)), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_ultimate_strain_field() {
        let field = StrainField::Ultimate {
            d_n: 0.2,
            v_ecf: 0.6,
            theta: 0.0,
            ultimate_strain: 0.003,
        };
        assert_relative_eq!(field.strain_at(Point2::new(0.0, 0.6)), 0.003);
        // at the neutral axis
        assert_relative_eq!(field.strain_at(Point2::new(0.0, 0.4)), 0.0, epsilon = 1e-15);
        // uniform case
        let squash = StrainField::Ultimate {
            d_n: f64::INFINITY,
            v_ecf: 0.6,
            theta: 0.0,
            ultimate_strain: 0.003,
        };
        assert_relative_eq!(squash.strain_at(Point2::new(5.0, -3.0)), 0.003);
        assert_relative_eq!(squash.gradient(), 0.0);
    }

    #[test]
    fn test_point_on_neutral_axis() {
        let ecf = Point2::new(0.15, 0.6);
        let na = point_on_neutral_axis(ecf, 0.2, 0.0);
        assert_relative_eq!(na.y, 0.4);
        let na_neg = point_on_neutral_axis(Point2::new(0.15, 0.0), 0.2, std::f64::consts::PI);
        assert_relative_eq!(na_neg.y, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_split_at_breakpoints() {
        let polygon = Polygon::rectangle(0.3, 0.6);
        let profile = StressStrainProfile::ConcreteLinearNoTension {
            elastic_modulus: 30e9,
            compressive_strength: 40e6,
            ultimate_strain: 0.003,
        };
        // neutral axis at v = 0.3: breakpoint strains 0 and fc/E both land
        // inside the section
        let field = StrainField::Service {
            kappa: 0.02,
            eps0: 0.006,
            v_ecf: 0.6,
            theta: 0.0,
        };
        let pieces = split_at_profile_breakpoints(&polygon, &profile, &field);
        assert_eq!(pieces.len(), 3);
        let total: f64 = pieces.iter().map(|p| p.area()).sum();
        assert_relative_eq!(total, 0.18, epsilon = 1e-12);
    }
}
