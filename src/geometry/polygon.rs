//! Polygonal region representation and planar geometric properties

use nalgebra::{Point2, Rotation2, Vector2};
use serde::{Deserialize, Serialize};

/// Minimum area below which a clipped piece is discarded as degenerate
const AREA_EPS: f64 = 1e-12;

/// A closed polygonal region defined by its boundary points.
///
/// Points are stored counter-clockwise; constructors normalise the winding
/// order so the shoelace integrals below are positive for valid regions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Point2<f64>>,
}

impl Polygon {
    /// Create a polygon from boundary points (any winding order)
    pub fn new(points: Vec<Point2<f64>>) -> Self {
        let mut poly = Self { points };
        if poly.signed_area() < 0.0 {
            poly.points.reverse();
        }
        poly
    }

    /// Create a `b` wide by `d` deep rectangle with bottom-left corner at the origin
    pub fn rectangle(b: f64, d: f64) -> Self {
        Self::rectangle_at(0.0, 0.0, b, d)
    }

    /// Create a `b` wide by `d` deep rectangle with bottom-left corner at `(x, y)`
    pub fn rectangle_at(x: f64, y: f64, b: f64, d: f64) -> Self {
        Self::new(vec![
            Point2::new(x, y),
            Point2::new(x + b, y),
            Point2::new(x + b, y + d),
            Point2::new(x, y + d),
        ])
    }

    /// Create an `n`-sided polygonal approximation of a circle
    pub fn circle(centre: Point2<f64>, diameter: f64, n: usize) -> Self {
        let r = diameter / 2.0;
        let points = (0..n)
            .map(|i| {
                let phi = 2.0 * std::f64::consts::PI * (i as f64) / (n as f64);
                Point2::new(centre.x + r * phi.cos(), centre.y + r * phi.sin())
            })
            .collect();
        Self::new(points)
    }

    /// Boundary points (counter-clockwise)
    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    fn signed_area(&self) -> f64 {
        let mut a = 0.0;
        for (p0, p1) in self.edges() {
            a += p0.x * p1.y - p1.x * p0.y;
        }
        a / 2.0
    }

    fn edges(&self) -> impl Iterator<Item = (Point2<f64>, Point2<f64>)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Area of the region
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Centroid of the region
    pub fn centroid(&self) -> Point2<f64> {
        let a = self.signed_area();
        if a.abs() < AREA_EPS {
            // degenerate: fall back to the vertex average
            let n = self.points.len().max(1) as f64;
            let sum = self
                .points
                .iter()
                .fold(Vector2::zeros(), |acc, p| acc + p.coords);
            return Point2::from(sum / n);
        }
        let mut cx = 0.0;
        let mut cy = 0.0;
        for (p0, p1) in self.edges() {
            let cross = p0.x * p1.y - p1.x * p0.y;
            cx += (p0.x + p1.x) * cross;
            cy += (p0.y + p1.y) * cross;
        }
        Point2::new(cx / (6.0 * a), cy / (6.0 * a))
    }

    /// Second moment of area about the global x-axis
    pub fn ixx(&self) -> f64 {
        let mut i = 0.0;
        for (p0, p1) in self.edges() {
            let cross = p0.x * p1.y - p1.x * p0.y;
            i += (p0.y * p0.y + p0.y * p1.y + p1.y * p1.y) * cross;
        }
        i / 12.0
    }

    /// Second moment of area about the global y-axis
    pub fn iyy(&self) -> f64 {
        let mut i = 0.0;
        for (p0, p1) in self.edges() {
            let cross = p0.x * p1.y - p1.x * p0.y;
            i += (p0.x * p0.x + p0.x * p1.x + p1.x * p1.x) * cross;
        }
        i / 12.0
    }

    /// Product moment of area about the global axes
    pub fn ixy(&self) -> f64 {
        let mut i = 0.0;
        for (p0, p1) in self.edges() {
            let cross = p0.x * p1.y - p1.x * p0.y;
            i += (p0.x * p1.y + 2.0 * p0.x * p0.y + 2.0 * p1.x * p1.y + p1.x * p0.y) * cross;
        }
        i / 24.0
    }

    /// Second moment of area about the centroidal x-axis
    pub fn ixx_c(&self) -> f64 {
        let c = self.centroid();
        self.ixx() - self.area() * c.y * c.y
    }

    /// Second moment of area about the centroidal y-axis
    pub fn iyy_c(&self) -> f64 {
        let c = self.centroid();
        self.iyy() - self.area() * c.x * c.x
    }

    /// Product moment of area about the centroidal axes
    pub fn ixy_c(&self) -> f64 {
        let c = self.centroid();
        self.ixy() - self.area() * c.x * c.y
    }

    /// Axis-aligned bounds as `(x_min, x_max, y_min, y_max)`
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for p in &self.points {
            x_min = x_min.min(p.x);
            x_max = x_max.max(p.x);
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
        }
        (x_min, x_max, y_min, y_max)
    }

    /// Test whether a point lies inside the region (ray casting)
    pub fn contains_point(&self, point: Point2<f64>) -> bool {
        let mut inside = false;
        for (p0, p1) in self.edges() {
            if (p0.y > point.y) != (p1.y > point.y) {
                let x_cross = p0.x + (point.y - p0.y) / (p1.y - p0.y) * (p1.x - p0.x);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Split the region along the line through `point` with direction `theta`.
    ///
    /// Returns the pieces above and below the line, where "above" means a
    /// larger perpendicular (local `v`) coordinate in the frame rotated by
    /// `theta`. Degenerate slivers are dropped.
    pub fn split(&self, point: Point2<f64>, theta: f64) -> (Vec<Polygon>, Vec<Polygon>) {
        // perpendicular coordinate of the cut line
        let v0 = local_v(theta, point);

        let above = self.clip_half_plane(theta, v0, 1.0);
        let below = self.clip_half_plane(theta, v0, -1.0);

        let keep = |poly: Option<Polygon>| -> Vec<Polygon> {
            match poly {
                Some(p) if p.points.len() >= 3 && p.area() > AREA_EPS => vec![p],
                _ => Vec::new(),
            }
        };

        (keep(above), keep(below))
    }

    /// Clip against the half-plane `sign * (v(p) - v0) >= 0`
    fn clip_half_plane(&self, theta: f64, v0: f64, sign: f64) -> Option<Polygon> {
        let mut out: Vec<Point2<f64>> = Vec::with_capacity(self.points.len() + 2);

        for (p0, p1) in self.edges() {
            let d0 = sign * (local_v(theta, p0) - v0);
            let d1 = sign * (local_v(theta, p1) - v0);

            if d0 >= 0.0 {
                push_unique(&mut out, p0);
            }
            if (d0 > 0.0 && d1 < 0.0) || (d0 < 0.0 && d1 > 0.0) {
                let t = d0 / (d0 - d1);
                let ix = p0.x + t * (p1.x - p0.x);
                let iy = p0.y + t * (p1.y - p0.y);
                push_unique(&mut out, Point2::new(ix, iy));
            }
        }

        // drop a duplicated closing point
        if let (Some(&first), Some(&last)) = (out.first(), out.last()) {
            if out.len() >= 2 && points_coincide(first, last) {
                out.pop();
            }
        }

        if out.len() >= 3 {
            Some(Polygon::new(out))
        } else {
            None
        }
    }
}

/// Perpendicular (local `v`) coordinate of a point in the frame rotated by `theta`
pub fn local_v(theta: f64, point: Point2<f64>) -> f64 {
    let local = Rotation2::new(-theta) * point;
    local.y
}

/// In-plane (local `u`, `v`) coordinates of a point in the frame rotated by `theta`
pub fn local_coords(theta: f64, point: Point2<f64>) -> (f64, f64) {
    let local = Rotation2::new(-theta) * point;
    (local.x, local.y)
}

fn points_coincide(a: Point2<f64>, b: Point2<f64>) -> bool {
    (a - b).norm_squared() < 1e-20
}

fn push_unique(out: &mut Vec<Point2<f64>>, p: Point2<f64>) {
    if out.last().map_or(true, |last| !points_coincide(*last, p)) {
        out.push(p);
    }
}
