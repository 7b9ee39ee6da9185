//! Plane geometry primitives for floorplate layouts.
//!
//! Pure functions and plain structs — no host dependency. Everything is in
//! meters, in the local frame (footprint centered at the origin, corridor
//! horizontal). Rectangles and L-shaped polygons share one `Region` type so
//! area and centroid flow through the same code path.

use serde::{Deserialize, Serialize};

/// A point in the local floor plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, stored as min corner + extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub depth: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, depth: f64) -> Self {
        Self {
            x,
            y,
            width,
            depth,
        }
    }

    /// Rectangle from its center point and extents.
    pub fn from_center(cx: f64, cy: f64, width: f64, depth: f64) -> Self {
        Self {
            x: cx - width / 2.0,
            y: cy - depth / 2.0,
            width,
            depth,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.depth
    }

    pub fn area(&self) -> f64 {
        self.width * self.depth
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.depth / 2.0)
    }

    /// Interior overlap test with a touching tolerance: shared edges within
    /// `tolerance` do not count as overlap.
    pub fn overlaps(&self, other: &Rect, tolerance: f64) -> bool {
        let overlap_x = (self.right() - tolerance) > other.x && (other.right() - tolerance) > self.x;
        let overlap_y = (self.top() - tolerance) > other.y && (other.top() - tolerance) > self.y;
        overlap_x && overlap_y
    }

    pub fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        p.x >= self.x - tolerance
            && p.x <= self.right() + tolerance
            && p.y >= self.y - tolerance
            && p.y <= self.top() + tolerance
    }

    /// Corners in counter-clockwise order starting at the min corner.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.top()),
            Point::new(self.x, self.top()),
        ]
    }
}

/// A unit footprint: plain rectangle or an L-shaped polygon.
///
/// Polygons store their boundary as an ordered vertex list (no repeated
/// closing vertex). Downstream code never branches on the variant for area
/// or centroid — both go through the shoelace formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Region {
    Rect(Rect),
    Polygon(Vec<Point>),
}

impl Region {
    /// Enclosed area. Polygon winding does not matter; the result is absolute.
    pub fn area(&self) -> f64 {
        match self {
            Region::Rect(r) => r.area(),
            Region::Polygon(vertices) => polygon_area(vertices),
        }
    }

    /// Area centroid.
    pub fn centroid(&self) -> Point {
        match self {
            Region::Rect(r) => r.center(),
            Region::Polygon(vertices) => polygon_centroid(vertices),
        }
    }

    /// Axis-aligned bounding box.
    pub fn bounds(&self) -> Rect {
        match self {
            Region::Rect(r) => *r,
            Region::Polygon(vertices) => {
                let mut min_x = f64::MAX;
                let mut min_y = f64::MAX;
                let mut max_x = f64::MIN;
                let mut max_y = f64::MIN;
                for v in vertices {
                    min_x = min_x.min(v.x);
                    min_y = min_y.min(v.y);
                    max_x = max_x.max(v.x);
                    max_y = max_y.max(v.y);
                }
                Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
            }
        }
    }
}

/// Shoelace area of a simple polygon. Absolute value, so winding is free.
pub fn polygon_area(vertices: &[Point]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum.abs() / 2.0
}

/// Area centroid of a simple polygon. Falls back to the vertex mean for
/// degenerate (zero-area) input.
pub fn polygon_centroid(vertices: &[Point]) -> Point {
    if vertices.len() < 3 {
        return vertex_mean(vertices);
    }
    let mut signed = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        let cross = a.x * b.y - b.x * a.y;
        signed += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    if signed.abs() < 1e-12 {
        return vertex_mean(vertices);
    }
    Point::new(cx / (3.0 * signed), cy / (3.0 * signed))
}

fn vertex_mean(vertices: &[Point]) -> Point {
    if vertices.is_empty() {
        return Point::new(0.0, 0.0);
    }
    let n = vertices.len() as f64;
    Point::new(
        vertices.iter().map(|v| v.x).sum::<f64>() / n,
        vertices.iter().map(|v| v.y).sum::<f64>() / n,
    )
}

/// Placement of the local frame in the host's world: translation in the
/// floor plane, rotation about Z, and floor elevation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HostTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    /// Rotation about Z in radians, counter-clockwise.
    pub rotation: f64,
    pub floor_z: f64,
}

impl HostTransform {
    /// Map a local-frame point into the host frame.
    pub fn to_host(&self, p: Point) -> Point {
        let (sin, cos) = self.rotation.sin_cos();
        Point::new(
            p.x * cos - p.y * sin + self.translate_x,
            p.x * sin + p.y * cos + self.translate_y,
        )
    }

    /// Map a host-frame point back into the local frame.
    pub fn to_local(&self, p: Point) -> Point {
        let dx = p.x - self.translate_x;
        let dy = p.y - self.translate_y;
        let (sin, cos) = self.rotation.sin_cos();
        Point::new(dx * cos + dy * sin, -dx * sin + dy * cos)
    }
}
