//! Cross-section geometry: meshed regions and lumped elements

pub mod polygon;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::material::{Material, SteelStrand};

pub use polygon::{local_coords, local_v, Polygon};

/// A meshed polygonal region with an associated material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    /// Boundary of the region
    pub polygon: Polygon,
    /// Material of the region
    pub material: Material,
}

impl Region {
    /// Create a new meshed region
    pub fn new(polygon: Polygon, material: Material) -> Self {
        Self { polygon, material }
    }
}

/// A lumped (point-like) element with explicit area and centroid,
/// used for reinforcement bars and prestressing strand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lump {
    /// Cross-sectional area
    pub area: f64,
    /// Centroid location
    pub centroid: Point2<f64>,
    /// Material of the element
    pub material: Material,
}

impl Lump {
    /// Create a new lumped element
    pub fn new(area: f64, x: f64, y: f64, material: Material) -> Self {
        Self {
            area,
            centroid: Point2::new(x, y),
            material,
        }
    }
}

/// Compound cross-section geometry: meshed regions plus lumped elements
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionGeometry {
    /// Meshed regions (concrete in a valid prestressed section)
    pub regions: Vec<Region>,
    /// Lumped reinforcement and strand elements
    pub lumps: Vec<Lump>,
}

impl SectionGeometry {
    /// Create an empty section geometry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a meshed region
    pub fn add_region(&mut self, region: Region) -> &mut Self {
        self.regions.push(region);
        self
    }

    /// Add a concrete region
    pub fn add_concrete(&mut self, polygon: Polygon, concrete: crate::material::Concrete) -> &mut Self {
        self.add_region(Region::new(polygon, Material::Concrete(concrete)))
    }

    /// Add a lumped reinforcement bar
    pub fn add_bar(&mut self, area: f64, x: f64, y: f64, steel: crate::material::Steel) -> &mut Self {
        self.lumps.push(Lump::new(area, x, y, Material::Steel(steel)));
        self
    }

    /// Add a lumped prestressing strand
    pub fn add_strand(&mut self, area: f64, x: f64, y: f64, strand: SteelStrand) -> &mut Self {
        self.lumps.push(Lump::new(area, x, y, Material::Strand(strand)));
        self
    }

    /// Meshed regions whose material is concrete
    pub fn concrete_regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| r.material.is_concrete())
    }

    /// Lumped reinforcement bars (non-strand lumps)
    pub fn bars(&self) -> impl Iterator<Item = &Lump> {
        self.lumps.iter().filter(|l| l.material.as_strand().is_none())
    }

    /// Lumped prestressing strands with their strand materials
    pub fn strands(&self) -> impl Iterator<Item = (&Lump, &SteelStrand)> {
        self.lumps
            .iter()
            .filter_map(|l| l.material.as_strand().map(|s| (l, s)))
    }

    /// True if any meshed region carries a non-concrete material
    pub fn has_meshed_reinforcement(&self) -> bool {
        self.regions.iter().any(|r| !r.material.is_concrete())
    }

    /// All boundary points of all meshed regions
    pub fn boundary_points(&self) -> impl Iterator<Item = Point2<f64>> + '_ {
        self.regions
            .iter()
            .flat_map(|r| r.polygon.points().iter().copied())
    }

    /// Extreme fibre in the direction perpendicular to a bending axis at
    /// rotation `theta`.
    ///
    /// Returns the boundary point with the largest local `v` coordinate
    /// (the extreme compressive fibre for positive bending) and the overall
    /// section depth `d_t` measured perpendicular to the bending axis.
    pub fn extreme_fibre(&self, theta: f64) -> Option<(Point2<f64>, f64)> {
        let mut best: Option<(Point2<f64>, f64)> = None;
        let mut v_min = f64::INFINITY;

        for p in self.boundary_points() {
            let v = local_v(theta, p);
            v_min = v_min.min(v);
            match best {
                Some((_, v_best)) if v <= v_best => {}
                _ => best = Some((p, v)),
            }
        }

        best.map(|(p, v_max)| (p, v_max - v_min))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Concrete, Steel, StressStrainProfile};
    use approx::assert_relative_eq;

    fn concrete() -> Concrete {
        Concrete::rectangular_block(30e9, 40e6, 3.5e6, 0.85, 0.77, 0.003)
    }

    #[test]
    fn test_extreme_fibre() {
        let mut geometry = SectionGeometry::new();
        geometry.add_concrete(Polygon::rectangle(0.3, 0.6), concrete());

        let (ecf, d_t) = geometry.extreme_fibre(0.0).unwrap();
        assert_relative_eq!(ecf.y, 0.6, epsilon = 1e-12);
        assert_relative_eq!(d_t, 0.6, epsilon = 1e-12);

        // negative bending flips the extreme fibre to the bottom
        let (ecf_neg, d_t_neg) = geometry.extreme_fibre(std::f64::consts::PI).unwrap();
        assert_relative_eq!(ecf_neg.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(d_t_neg, 0.6, epsilon = 1e-9);
    }

    #[test]
    fn test_meshed_reinforcement_detection() {
        let mut geometry = SectionGeometry::new();
        geometry.add_concrete(Polygon::rectangle(0.3, 0.6), concrete());
        assert!(!geometry.has_meshed_reinforcement());

        let steel = Steel {
            elastic_modulus: 200e9,
            profile: StressStrainProfile::Linear {
                elastic_modulus: 200e9,
            },
        };
        geometry.add_region(Region::new(
            Polygon::rectangle(0.05, 0.05),
            Material::Steel(steel),
        ));
        assert!(geometry.has_meshed_reinforcement());
    }

    #[test]
    fn test_filtered_accessors() {
        let mut geometry = SectionGeometry::new();
        geometry.add_concrete(Polygon::rectangle(0.3, 0.6), concrete());
        geometry.add_bar(
            500e-6,
            0.05,
            0.05,
            Steel::elastic_plastic(200e9, 500e6, 0.05),
        );
        geometry.add_strand(
            400e-6,
            0.15,
            0.1,
            SteelStrand::elastic_plastic(195e9, 1500e6, 0.035, 100e3),
        );

        assert_eq!(geometry.concrete_regions().count(), 1);
        assert_eq!(geometry.bars().count(), 1);
        assert_eq!(geometry.strands().count(), 1);
    }
}
