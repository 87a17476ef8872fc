//! Per-triangle threshold crossing ("meandering triangles").
//!
//! A triangle crosses a threshold when its vertices do not all sit on the
//! same side of it. The vertices then split 1-vs-2, and the crossing line
//! runs across the two edges joining the lone vertex to the other two.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{CrossingSegment, Point2, Triangle, Vertex3};

/// An edge is flat when its height difference is within this fraction of
/// the larger of its two heights (plain `f64` rounding at that magnitude).
pub const DEGENERATE_EPSILON: f64 = f64::EPSILON;

/// What to do when an interpolated edge has (almost) no height difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegeneratePolicy {
    /// Drop the triangle for this threshold.
    #[default]
    Skip,
    /// Use the midpoint of the flat edge as the crossing point.
    Midpoint,
}

impl fmt::Display for DegeneratePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Midpoint => write!(f, "midpoint"),
        }
    }
}

impl FromStr for DegeneratePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "midpoint" => Ok(Self::Midpoint),
            other => Err(format!("unknown degenerate policy '{}'", other)),
        }
    }
}

/// Outcome of intersecting one triangle with one threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crossing {
    /// All vertices lie on the same side.
    None,
    /// A regular crossing.
    Segment(CrossingSegment),
    /// A flat edge made interpolation undefined and the policy dropped it.
    Degenerate,
}

/// Intersect a triangle with a threshold using the default policy.
///
/// ```
/// use tin_contour::{intersect, Point2, Triangle};
///
/// let tri = Triangle::from([[0.0, 0.0, 0.0], [10.0, 0.0, 10.0], [0.0, 10.0, 10.0]]);
/// let seg = intersect(&tri, 5.0).unwrap();
/// assert_eq!(seg.points, [Point2::new(5.0, 0.0), Point2::new(0.0, 5.0)]);
/// ```
pub fn intersect(triangle: &Triangle, threshold: f64) -> Option<CrossingSegment> {
    intersect_with_policy(triangle, threshold, DegeneratePolicy::default())
}

/// Intersect a triangle with a threshold, resolving flat edges by `policy`.
pub fn intersect_with_policy(
    triangle: &Triangle,
    threshold: f64,
    policy: DegeneratePolicy,
) -> Option<CrossingSegment> {
    match classify(triangle, threshold, policy) {
        Crossing::Segment(seg) => Some(seg),
        Crossing::None | Crossing::Degenerate => None,
    }
}

/// Like [`intersect_with_policy`], but tells a miss apart from a dropped
/// degenerate crossing.
pub fn classify(triangle: &Triangle, threshold: f64, policy: DegeneratePolicy) -> Crossing {
    let mut below: [Option<&Vertex3>; 3] = [None; 3];
    let mut above: [Option<&Vertex3>; 3] = [None; 3];
    let (mut n_below, mut n_above) = (0, 0);

    for v in &triangle.vertices {
        if v.z < threshold {
            below[n_below] = Some(v);
            n_below += 1;
        } else {
            above[n_above] = Some(v);
            n_above += 1;
        }
    }

    let (minority, majority) = match (n_below, n_above) {
        (1, 2) => (below[0], [above[0], above[1]]),
        (2, 1) => (above[0], [below[0], below[1]]),
        _ => return Crossing::None,
    };
    let (Some(minority), [Some(a), Some(b)]) = (minority, majority) else {
        return Crossing::None;
    };

    match (
        edge_crossing(minority, a, threshold, policy),
        edge_crossing(minority, b, threshold, policy),
    ) {
        (Some(p), Some(q)) => Crossing::Segment(CrossingSegment::new(threshold, p, q)),
        _ => Crossing::Degenerate,
    }
}

/// Crossing point on the edge from `lone` to `v`.
fn edge_crossing(lone: &Vertex3, v: &Vertex3, threshold: f64, policy: DegeneratePolicy) -> Option<Point2> {
    let denom = lone.z - v.z;
    if denom.abs() <= DEGENERATE_EPSILON * lone.z.abs().max(v.z.abs()) {
        return flat_edge_fallback(lone, v, policy);
    }

    let t = (threshold - v.z) / denom;
    let p = lone.xy().lerp_towards(v.xy(), t);
    if p.is_finite() {
        Some(p)
    } else {
        flat_edge_fallback(lone, v, policy)
    }
}

fn flat_edge_fallback(lone: &Vertex3, v: &Vertex3, policy: DegeneratePolicy) -> Option<Point2> {
    match policy {
        DegeneratePolicy::Skip => None,
        DegeneratePolicy::Midpoint => Some(lone.xy().midpoint(v.xy())),
    }
}
