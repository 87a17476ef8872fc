//! Core geometry and result types shared by the contouring stages.

use serde::{Deserialize, Serialize};

/// A point in the plane (map coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    pub fn sub(self, other: Point2) -> Point2 {
        Point2::new(self.x - other.x, self.y - other.y)
    }

    pub fn distance_squared(self, other: Point2) -> f64 {
        let d = self.sub(other);
        d.x * d.x + d.y * d.y
    }

    /// Euclidean distance between two points.
    pub fn distance(self, other: Point2) -> f64 {
        self.distance_squared(other).sqrt()
    }

    pub fn midpoint(self, other: Point2) -> Point2 {
        Point2::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Returns `t * self + (1 - t) * other`.
    pub fn lerp_towards(self, other: Point2, t: f64) -> Point2 {
        Point2::new(
            t * self.x + (1.0 - t) * other.x,
            t * self.y + (1.0 - t) * other.y,
        )
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A surface sample: planar position plus height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vertex3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Planar projection of the vertex.
    pub fn xy(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Vertex3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// One face of a triangulated irregular network.
///
/// Serialized as `[[x, y, z], [x, y, z], [x, y, z]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[[f64; 3]; 3]", into = "[[f64; 3]; 3]")]
pub struct Triangle {
    pub vertices: [Vertex3; 3],
}

impl Triangle {
    pub fn new(a: Vertex3, b: Vertex3, c: Vertex3) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Lowest and highest vertex height.
    pub fn z_range(&self) -> (f64, f64) {
        self.vertices
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v.z), hi.max(v.z))
            })
    }
}

impl From<[[f64; 3]; 3]> for Triangle {
    fn from([a, b, c]: [[f64; 3]; 3]) -> Self {
        Self::new(a.into(), b.into(), c.into())
    }
}

impl From<Triangle> for [[f64; 3]; 3] {
    fn from(t: Triangle) -> Self {
        t.vertices.map(|v| [v.x, v.y, v.z])
    }
}

/// Height extent of a whole TIN, `None` when it has no triangles.
pub fn tin_z_range(tin: &[Triangle]) -> Option<(f64, f64)> {
    if tin.is_empty() {
        return None;
    }
    Some(
        tin.iter()
            .map(Triangle::z_range)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
                (lo.min(a), hi.max(b))
            }),
    )
}

/// The two-point line where one triangle crosses one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossingSegment {
    pub threshold: f64,
    pub points: [Point2; 2],
}

impl CrossingSegment {
    pub fn new(threshold: f64, a: Point2, b: Point2) -> Self {
        Self {
            threshold,
            points: [a, b],
        }
    }
}

/// An open stitched contour line.
pub type Polyline = Vec<Point2>;

/// All polylines extracted for a single threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourLevel {
    pub threshold: f64,
    pub polylines: Vec<Polyline>,
}

/// Threshold-ordered contour output.
///
/// Levels appear in the order their thresholds were generated. A threshold
/// without surviving polylines has no entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContourResult {
    levels: Vec<ContourLevel>,
}

impl ContourResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a level, ignoring it when it has no polylines.
    pub(crate) fn push_level(&mut self, threshold: f64, polylines: Vec<Polyline>) {
        if !polylines.is_empty() {
            self.levels.push(ContourLevel {
                threshold,
                polylines,
            });
        }
    }

    /// Polylines for an exact threshold value.
    pub fn get(&self, threshold: f64) -> Option<&[Polyline]> {
        self.levels
            .iter()
            .find(|l| l.threshold == threshold)
            .map(|l| l.polylines.as_slice())
    }

    pub fn contains(&self, threshold: f64) -> bool {
        self.get(threshold).is_some()
    }

    pub fn thresholds(&self) -> impl Iterator<Item = f64> + '_ {
        self.levels.iter().map(|l| l.threshold)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &[Polyline])> + '_ {
        self.levels
            .iter()
            .map(|l| (l.threshold, l.polylines.as_slice()))
    }

    pub fn levels(&self) -> &[ContourLevel] {
        &self.levels
    }

    pub fn into_levels(self) -> Vec<ContourLevel> {
        self.levels
    }

    /// Number of thresholds present.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn total_polylines(&self) -> usize {
        self.levels.iter().map(|l| l.polylines.len()).sum()
    }

    pub fn total_points(&self) -> usize {
        self.levels
            .iter()
            .flat_map(|l| l.polylines.iter())
            .map(Vec::len)
            .sum()
    }
}
