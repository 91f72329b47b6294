//! psc-section - Prestressed concrete cross-section analysis
//!
//! This library computes the flexural response of prestressed concrete
//! cross-sections built from polygonal concrete regions and lumped
//! reinforcement and strand elements:
//! - Gross and cracked elastic section properties
//! - Cracking moments and cracked neutral axis location
//! - Moment-curvature response with adaptive curvature stepping
//! - Ultimate bending capacity
//! - Stress evaluation for the uncracked, cracked, service and ultimate states
//!
//! Stresses and strains are compression-positive; a tensioned strand carries
//! a negative stress.
//!
//! ## Example
//! ```rust
//! use psc_section::prelude::*;
//!
//! // 300 x 600 rectangular section, dimensions in metres, stresses in Pa
//! let mut geometry = SectionGeometry::new();
//! geometry.add_concrete(
//!     Polygon::rectangle(0.3, 0.6),
//!     Concrete::rectangular_block(30e9, 40e6, 3.5e6, 0.85, 0.77, 0.003),
//! );
//!
//! // 800 mm2 of strand 100 mm above the soffit, stressed to 800 kN
//! geometry.add_strand(
//!     800e-6,
//!     0.15,
//!     0.1,
//!     SteelStrand::elastic_plastic(195e9, 1500e6, 0.035, 800e3),
//! );
//!
//! let section = PrestressedSection::new(geometry, None).unwrap();
//!
//! // sagging ultimate capacity under zero external axial force
//! let ultimate = section.ultimate_capacity(true, 0.0).unwrap();
//! assert!(ultimate.m > 0.0);
//!
//! // elastic stresses under the prestress alone
//! let stress = section.uncracked_stress(0.0, 0.0).unwrap();
//! let (min, max) = stress.concrete_stress_limits().unwrap();
//! assert!(max > min);
//! ```

pub mod analysis;
pub mod error;
pub mod geometry;
pub mod material;
pub mod math;
pub mod results;
pub mod section;

// Re-export common types
pub mod prelude {
    pub use crate::error::{SectionError, SectionResult};
    pub use crate::geometry::{Lump, Polygon, Region, SectionGeometry};
    pub use crate::material::{Concrete, Material, Steel, SteelStrand, StressStrainProfile};
    pub use crate::math::RootConfig;
    pub use crate::results::{
        CrackedProperties, CurvatureFailure, ElasticProperties, FailureMaterial, GrossProperties,
        MomentCurvature, PointStress, RegionStress, StressState, UltimateCapacity,
    };
    pub use crate::section::{CrossSection, MomentCurvatureConfig, PrestressedSection};
}
