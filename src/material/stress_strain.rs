//! Stress-strain profiles for nonlinear material response
//!
//! Sign convention: compressive stress and strain are positive, tensile
//! stress and strain are negative. All profiles are piecewise affine in
//! strain, so a region split at the profile breakpoints carries an affine
//! stress field that integrates exactly.

use serde::{Deserialize, Serialize};

/// Piecewise affine stress-strain relationship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StressStrainProfile {
    /// Linear elastic in both tension and compression
    Linear {
        /// Elastic modulus
        elastic_modulus: f64,
    },
    /// Symmetric elastic-perfectly-plastic (reinforcement, strand)
    ElasticPlastic {
        /// Elastic modulus
        elastic_modulus: f64,
        /// Yield strength (absolute value)
        yield_strength: f64,
        /// Strain at fracture (absolute value)
        fracture_strain: f64,
    },
    /// Linear in compression up to the plateau, zero stress in tension
    ConcreteLinearNoTension {
        /// Elastic modulus
        elastic_modulus: f64,
        /// Compressive strength (plateau stress)
        compressive_strength: f64,
        /// Ultimate compressive strain
        ultimate_strain: f64,
    },
    /// Rectangular stress block for ultimate analysis: uniform stress
    /// `alpha * f'c` over the strain range occupied by the top `gamma`
    /// fraction of the neutral axis depth, zero elsewhere
    RectangularStressBlock {
        /// Compressive strength
        compressive_strength: f64,
        /// Stress intensity factor
        alpha: f64,
        /// Block depth factor
        gamma: f64,
        /// Ultimate compressive strain
        ultimate_strain: f64,
    },
}

impl StressStrainProfile {
    /// Stress at the given strain
    pub fn stress(&self, strain: f64) -> f64 {
        match *self {
            Self::Linear { elastic_modulus } => elastic_modulus * strain,
            Self::ElasticPlastic {
                elastic_modulus,
                yield_strength,
                ..
            } => (elastic_modulus * strain).clamp(-yield_strength, yield_strength),
            Self::ConcreteLinearNoTension {
                elastic_modulus,
                compressive_strength,
                ..
            } => {
                if strain <= 0.0 {
                    0.0
                } else {
                    (elastic_modulus * strain).min(compressive_strength)
                }
            }
            Self::RectangularStressBlock {
                compressive_strength,
                alpha,
                gamma,
                ultimate_strain,
            } => {
                if strain >= (1.0 - gamma) * ultimate_strain {
                    alpha * compressive_strength
                } else {
                    0.0
                }
            }
        }
    }

    /// Tangent slope of the profile at the given strain
    pub fn slope(&self, strain: f64) -> f64 {
        match *self {
            Self::Linear { elastic_modulus } => elastic_modulus,
            Self::ElasticPlastic {
                elastic_modulus,
                yield_strength,
                ..
            } => {
                if (elastic_modulus * strain).abs() < yield_strength {
                    elastic_modulus
                } else {
                    0.0
                }
            }
            Self::ConcreteLinearNoTension {
                elastic_modulus,
                compressive_strength,
                ..
            } => {
                if strain > 0.0 && elastic_modulus * strain < compressive_strength {
                    elastic_modulus
                } else {
                    0.0
                }
            }
            Self::RectangularStressBlock { .. } => 0.0,
        }
    }

    /// Strain values at which the profile changes slope.
    ///
    /// Meshed regions are split at these strains so that every resulting
    /// piece lies within a single affine segment.
    pub fn breakpoints(&self) -> Vec<f64> {
        match *self {
            Self::Linear { .. } => Vec::new(),
            Self::ElasticPlastic {
                elastic_modulus,
                yield_strength,
                ..
            } => {
                let eps_y = yield_strength / elastic_modulus;
                vec![-eps_y, eps_y]
            }
            Self::ConcreteLinearNoTension {
                elastic_modulus,
                compressive_strength,
                ..
            } => vec![0.0, compressive_strength / elastic_modulus],
            Self::RectangularStressBlock {
                gamma,
                ultimate_strain,
                ..
            } => vec![(1.0 - gamma) * ultimate_strain],
        }
    }

    /// Strain beyond which the material is considered failed
    pub fn failure_strain(&self) -> f64 {
        match *self {
            Self::Linear { .. } => f64::INFINITY,
            Self::ElasticPlastic { fracture_strain, .. } => fracture_strain,
            Self::ConcreteLinearNoTension { ultimate_strain, .. } => ultimate_strain,
            Self::RectangularStressBlock { ultimate_strain, .. } => ultimate_strain,
        }
    }

    /// Strain corresponding to a stress on the elastic branch, where the
    /// profile has a well-defined inverse
    pub fn strain_at_stress(&self, stress: f64) -> Option<f64> {
        match *self {
            Self::Linear { elastic_modulus } => Some(stress / elastic_modulus),
            Self::ElasticPlastic {
                elastic_modulus,
                yield_strength,
                ..
            } => {
                if stress.abs() <= yield_strength {
                    Some(stress / elastic_modulus)
                } else {
                    None
                }
            }
            Self::ConcreteLinearNoTension {
                elastic_modulus,
                compressive_strength,
                ..
            } => {
                if (0.0..=compressive_strength).contains(&stress) {
                    Some(stress / elastic_modulus)
                } else {
                    None
                }
            }
            Self::RectangularStressBlock { .. } => None,
        }
    }
}
