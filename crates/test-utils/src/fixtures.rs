//! Hand-built fixtures with known contouring outcomes.

use crate::generators::RawTriangle;

/// A segment as `[[x, y]; 2]`.
pub type RawSegment = [[f64; 2]; 2];

/// Triangle from the reference worked example. At threshold `5.0` it
/// crosses from `(5, 0)` to `(0, 5)`.
pub const WORKED_EXAMPLE: RawTriangle = [[0.0, 0.0, 0.0], [10.0, 0.0, 10.0], [0.0, 10.0, 10.0]];

/// Threshold used with [`WORKED_EXAMPLE`].
pub const WORKED_EXAMPLE_THRESHOLD: f64 = 5.0;

/// Triangles with a known below/above split at threshold `0.0`.
pub mod triangles {
    use super::RawTriangle;

    /// Every vertex below zero.
    pub const ALL_BELOW: RawTriangle = [[0.0, 0.0, -3.0], [1.0, 0.0, -2.0], [0.0, 1.0, -1.0]];

    /// Every vertex at or above zero (one sits exactly on it).
    pub const ALL_ABOVE: RawTriangle = [[0.0, 0.0, 0.0], [1.0, 0.0, 2.0], [0.0, 1.0, 1.0]];

    /// One vertex below, two above.
    pub const ONE_BELOW: RawTriangle = [[0.0, 0.0, -1.0], [4.0, 0.0, 3.0], [0.0, 4.0, 1.0]];

    /// Two vertices below, one above.
    pub const TWO_BELOW: RawTriangle = [[0.0, 0.0, -1.0], [4.0, 0.0, -3.0], [0.0, 4.0, 1.0]];
}

/// An open zig-zag path of `n` segments, each `spacing` apart along x,
/// alternating between `y = 0` and `y = spacing`.
///
/// Segments are listed in path order with consistent orientation.
pub fn segment_chain(n: usize, origin: [f64; 2], spacing: f64) -> Vec<RawSegment> {
    let points: Vec<[f64; 2]> = (0..=n)
        .map(|i| {
            [
                origin[0] + i as f64 * spacing,
                origin[1] + (i % 2) as f64 * spacing,
            ]
        })
        .collect();
    points.windows(2).map(|w| [w[0], w[1]]).collect()
}

/// [`segment_chain`] scrambled deterministically: alternate segments are
/// reversed and the list is interleaved from both ends.
pub fn scrambled_segment_chain(n: usize, origin: [f64; 2], spacing: f64) -> Vec<RawSegment> {
    let mut chain = segment_chain(n, origin, spacing);
    for seg in chain.iter_mut().step_by(2) {
        seg.swap(0, 1);
    }

    let mut out = Vec::with_capacity(chain.len());
    let (mut lo, mut hi) = (0, chain.len());
    while lo < hi {
        out.push(chain[lo]);
        lo += 1;
        if lo < hi {
            hi -= 1;
            out.push(chain[hi]);
        }
    }
    out
}
