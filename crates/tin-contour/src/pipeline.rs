//! End-to-end contour extraction from a TIN.

use std::time::Instant;

use rayon::prelude::*;

use crate::config::ContourConfig;
use crate::error::{ContourError, Result};
use crate::intersect::{classify, Crossing, DegeneratePolicy};
use crate::stitch::stitch;
use crate::threshold::generate_thresholds;
use crate::types::{ContourResult, CrossingSegment, Triangle};

/// Extract contour polylines for every configured threshold.
///
/// The configuration is validated first and the TIN is checked for
/// non-finite coordinates. An empty TIN, or one that never crosses any
/// threshold, gives an empty result.
pub fn contours_from_tin(tin: &[Triangle], config: &ContourConfig) -> Result<ContourResult> {
    config.validate()?;
    check_finite(tin)?;

    let start = Instant::now();

    let mut thresholds = generate_thresholds(config.threshold_count, config.z_min, config.z_max);
    // a zero-width range repeats one value; keep it as a single level
    thresholds.dedup();

    let (segments, degenerate) =
        crossing_segments(tin, &thresholds, config.degenerate_policy, config.parallel);

    tracing::debug!(
        triangles = tin.len(),
        thresholds = thresholds.len(),
        segments = segments.len(),
        degenerate,
        "Computed crossing segments"
    );

    let result = stitch(segments, &config.stitch_options());

    tracing::debug!(
        levels = result.len(),
        polylines = result.total_polylines(),
        points = result.total_points(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Contours extracted"
    );

    Ok(result)
}

/// Intersect every triangle with every threshold.
///
/// Segments come out threshold-major in the order of `thresholds`, and in
/// TIN order within a threshold. Also returns how many crossings were lost
/// to flat edges.
pub fn crossing_segments(
    tin: &[Triangle],
    thresholds: &[f64],
    policy: DegeneratePolicy,
    parallel: bool,
) -> (Vec<CrossingSegment>, usize) {
    let per_threshold = |&threshold: &f64| {
        let mut segments = Vec::new();
        let mut degenerate = 0usize;
        for triangle in tin {
            match classify(triangle, threshold, policy) {
                Crossing::Segment(seg) => segments.push(seg),
                Crossing::Degenerate => degenerate += 1,
                Crossing::None => {}
            }
        }
        (segments, degenerate)
    };

    let levels: Vec<(Vec<CrossingSegment>, usize)> = if parallel {
        thresholds.par_iter().map(per_threshold).collect()
    } else {
        thresholds.iter().map(per_threshold).collect()
    };

    let total = levels.iter().map(|(s, _)| s.len()).sum();
    let mut segments = Vec::with_capacity(total);
    let mut degenerate = 0;
    for (level, skipped) in levels {
        segments.extend(level);
        degenerate += skipped;
    }
    (segments, degenerate)
}

fn check_finite(tin: &[Triangle]) -> Result<()> {
    for (t, triangle) in tin.iter().enumerate() {
        if let Some(v) = triangle.vertices.iter().position(|v| !v.is_finite()) {
            return Err(ContourError::NonFiniteVertex {
                triangle: t,
                vertex: v,
            });
        }
    }
    Ok(())
}
