//! Material definitions for concrete, reinforcement and prestressing strand

pub mod stress_strain;

use serde::{Deserialize, Serialize};

pub use stress_strain::StressStrainProfile;

/// Concrete material for meshed regions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concrete {
    /// Elastic modulus in Pa
    pub elastic_modulus: f64,
    /// Flexural tensile strength (modulus of rupture) in Pa
    pub flexural_tensile_strength: f64,
    /// Profile used for service (moment-curvature) analysis
    pub service_profile: StressStrainProfile,
    /// Profile used for ultimate analysis
    pub ultimate_profile: StressStrainProfile,
}

impl Concrete {
    /// Create a concrete material with explicit profiles
    pub fn new(
        elastic_modulus: f64,
        flexural_tensile_strength: f64,
        service_profile: StressStrainProfile,
        ultimate_profile: StressStrainProfile,
    ) -> Self {
        Self {
            elastic_modulus,
            flexural_tensile_strength,
            service_profile,
            ultimate_profile,
        }
    }

    /// Create a concrete material with a no-tension linear service profile
    /// and a rectangular stress block for ultimate analysis
    pub fn rectangular_block(
        elastic_modulus: f64,
        compressive_strength: f64,
        flexural_tensile_strength: f64,
        alpha: f64,
        gamma: f64,
        ultimate_strain: f64,
    ) -> Self {
        Self {
            elastic_modulus,
            flexural_tensile_strength,
            service_profile: StressStrainProfile::ConcreteLinearNoTension {
                elastic_modulus,
                compressive_strength,
                ultimate_strain,
            },
            ultimate_profile: StressStrainProfile::RectangularStressBlock {
                compressive_strength,
                alpha,
                gamma,
                ultimate_strain,
            },
        }
    }

    /// Ultimate compressive strain of the concrete
    pub fn ultimate_strain(&self) -> f64 {
        self.ultimate_profile.failure_strain()
    }
}

/// Reinforcement steel for bars
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Steel {
    /// Elastic modulus in Pa
    pub elastic_modulus: f64,
    /// Stress-strain profile (used for both service and ultimate analysis)
    pub profile: StressStrainProfile,
}

impl Steel {
    /// Create an elastic-perfectly-plastic reinforcement steel
    pub fn elastic_plastic(elastic_modulus: f64, yield_strength: f64, fracture_strain: f64) -> Self {
        Self {
            elastic_modulus,
            profile: StressStrainProfile::ElasticPlastic {
                elastic_modulus,
                yield_strength,
                fracture_strain,
            },
        }
    }
}

/// Prestressing strand with a locked-in prestress force
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteelStrand {
    /// Elastic modulus in Pa
    pub elastic_modulus: f64,
    /// Prestress force in N (positive produces compression on the section)
    pub prestress_force: f64,
    /// Stress-strain profile (used for both service and ultimate analysis)
    pub profile: StressStrainProfile,
}

impl SteelStrand {
    /// Create an elastic-perfectly-plastic strand with a prestress force
    pub fn elastic_plastic(
        elastic_modulus: f64,
        yield_strength: f64,
        fracture_strain: f64,
        prestress_force: f64,
    ) -> Self {
        Self {
            elastic_modulus,
            prestress_force,
            profile: StressStrainProfile::ElasticPlastic {
                elastic_modulus,
                yield_strength,
                fracture_strain,
            },
        }
    }

    /// Tensile stress in the strand under the prestress force alone
    pub fn prestress_stress(&self, area: f64) -> f64 {
        self.prestress_force / area
    }

    /// Tensile strain in the strand under the prestress force alone
    pub fn prestress_strain(&self, area: f64) -> f64 {
        let stress = self.prestress_stress(area);
        self.profile
            .strain_at_stress(stress)
            .unwrap_or(stress / self.elastic_modulus)
    }
}

/// Closed set of materials a geometry can carry.
///
/// Dispatch on the variant replaces scattered "is this a strand" checks:
/// concrete appears only in meshed regions, reinforcement and strand only in
/// lumped geometries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Material {
    Concrete(Concrete),
    Steel(Steel),
    Strand(SteelStrand),
}

impl Material {
    /// Elastic modulus of the material
    pub fn elastic_modulus(&self) -> f64 {
        match self {
            Material::Concrete(c) => c.elastic_modulus,
            Material::Steel(s) => s.elastic_modulus,
            Material::Strand(s) => s.elastic_modulus,
        }
    }

    /// Profile used for service (moment-curvature) analysis
    pub fn service_profile(&self) -> &StressStrainProfile {
        match self {
            Material::Concrete(c) => &c.service_profile,
            Material::Steel(s) => &s.profile,
            Material::Strand(s) => &s.profile,
        }
    }

    /// Profile used for ultimate analysis
    pub fn ultimate_profile(&self) -> &StressStrainProfile {
        match self {
            Material::Concrete(c) => &c.ultimate_profile,
            Material::Steel(s) => &s.profile,
            Material::Strand(s) => &s.profile,
        }
    }

    /// Flexural tensile strength, concrete only
    pub fn flexural_tensile_strength(&self) -> Option<f64> {
        match self {
            Material::Concrete(c) => Some(c.flexural_tensile_strength),
            _ => None,
        }
    }

    /// True if the material is concrete
    pub fn is_concrete(&self) -> bool {
        matches!(self, Material::Concrete(_))
    }

    /// The strand material, if this is a strand
    pub fn as_strand(&self) -> Option<&SteelStrand> {
        match self {
            Material::Strand(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_prestress_strain() {
        let strand = SteelStrand::elastic_plastic(195e9, 1500e6, 0.035, 200e3);
        let area = 400e-6;
        assert_relative_eq!(strand.prestress_stress(area), 500e6);
        assert_relative_eq!(strand.prestress_strain(area), 500e6 / 195e9);
    }

    #[test]
    fn test_material_dispatch() {
        let concrete = Material::Concrete(Concrete::rectangular_block(
            30e9, 40e6, 3.5e6, 0.85, 0.77, 0.003,
        ));
        assert!(concrete.is_concrete());
        assert!(concrete.flexural_tensile_strength().is_some());
        assert!(concrete.as_strand().is_none());

        let strand = Material::Strand(SteelStrand::elastic_plastic(195e9, 1500e6, 0.035, 100e3));
        assert!(!strand.is_concrete());
        assert!(strand.as_strand().is_some());
    }
}
