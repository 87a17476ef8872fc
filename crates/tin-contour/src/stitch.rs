//! Segment stitching: rebuild polylines from unordered crossing segments.
//!
//! Segments are grouped by threshold and each group is stitched on its own.
//! A line is seeded from the last remaining segment and grown at either end
//! by absorbing any remaining segment with an endpoint closer than the
//! nearness distance, until nothing is close enough. Lines with too few
//! points are dropped.
//!
//! Candidate lookup goes through a uniform grid over segment endpoints with
//! cells as wide as the nearness distance, so each join only inspects the
//! 3x3 cell neighbourhood of the line's two ends. Picking the lowest
//! surviving index among the candidates gives the same choice as scanning
//! the remaining list front to back.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::types::{ContourResult, CrossingSegment, Point2, Polyline};

/// Lines must have more than this many points to be kept.
pub const MIN_POLYLINE_POINTS: usize = 5;

/// Default endpoint joining distance.
pub const DEFAULT_NEARNESS: f64 = 1.0;

/// How to choose between several segments that are close enough to join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinRule {
    /// Take the earliest remaining segment in input order.
    #[default]
    FirstMatch,
    /// Take the segment whose endpoint is closest to the line's end.
    Nearest,
}

impl fmt::Display for JoinRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstMatch => write!(f, "first_match"),
            Self::Nearest => write!(f, "nearest"),
        }
    }
}

impl FromStr for JoinRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "first_match" | "first" => Ok(Self::FirstMatch),
            "nearest" => Ok(Self::Nearest),
            other => Err(format!("unknown join rule '{}'", other)),
        }
    }
}

/// Parameters for [`stitch`].
#[derive(Debug, Clone, PartialEq)]
pub struct StitchOptions {
    /// Endpoints strictly closer than this are joined.
    pub nearness: f64,
    /// Finished lines need more than this many points.
    pub min_points: usize,
    pub join_rule: JoinRule,
    /// Stitch threshold groups on the rayon pool.
    pub parallel: bool,
}

impl Default for StitchOptions {
    fn default() -> Self {
        Self {
            nearness: DEFAULT_NEARNESS,
            min_points: MIN_POLYLINE_POINTS,
            join_rule: JoinRule::FirstMatch,
            parallel: true,
        }
    }
}

/// Counters collected while stitching one threshold group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StitchStats {
    pub segments: usize,
    pub joins: usize,
    pub kept: usize,
    pub dropped: usize,
}

/// Stitch tagged segments into polylines, one level per threshold.
///
/// Levels appear in the order their threshold is first seen in `segments`.
/// Segments with different thresholds are never joined.
pub fn stitch(segments: Vec<CrossingSegment>, options: &StitchOptions) -> ContourResult {
    let groups = group_by_threshold(segments);

    let run = |(threshold, group): (f64, Vec<[Point2; 2]>)| {
        let (polylines, stats) = stitch_group_with_stats(group, options);
        tracing::trace!(
            threshold,
            segments = stats.segments,
            joins = stats.joins,
            kept = stats.kept,
            dropped = stats.dropped,
            "Stitched threshold group"
        );
        (threshold, polylines, stats)
    };

    let stitched: Vec<(f64, Vec<Polyline>, StitchStats)> = if options.parallel {
        groups.into_par_iter().map(run).collect()
    } else {
        groups.into_iter().map(run).collect()
    };

    let mut result = ContourResult::new();
    let mut dropped = 0;
    for (threshold, polylines, stats) in stitched {
        dropped += stats.dropped;
        result.push_level(threshold, polylines);
    }

    tracing::debug!(
        levels = result.len(),
        polylines = result.total_polylines(),
        dropped_short = dropped,
        "Stitching complete"
    );

    result
}

/// Stitch the segments of a single threshold.
pub fn stitch_group(segments: Vec<[Point2; 2]>, options: &StitchOptions) -> Vec<Polyline> {
    stitch_group_with_stats(segments, options).0
}

/// [`stitch_group`] plus bookkeeping counters.
pub fn stitch_group_with_stats(
    segments: Vec<[Point2; 2]>,
    options: &StitchOptions,
) -> (Vec<Polyline>, StitchStats) {
    let mut stats = StitchStats {
        segments: segments.len(),
        ..Default::default()
    };
    let mut pool = SegmentPool::new(segments, options.nearness);
    let mut finished = Vec::new();

    while let Some([a, b]) = pool.pop_last() {
        let mut line = VecDeque::from([a, b]);

        while let Some(join) = pool.take_join(&line, options.nearness, options.join_rule) {
            if join.at_head {
                line.push_front(join.keep);
            } else {
                line.push_back(join.keep);
            }
            stats.joins += 1;
        }

        if line.len() > options.min_points {
            finished.push(Vec::from(line));
            stats.kept += 1;
        } else {
            stats.dropped += 1;
        }
    }

    (finished, stats)
}

/// Split segments into per-threshold groups, preserving input order both
/// across and within groups.
fn group_by_threshold(segments: Vec<CrossingSegment>) -> Vec<(f64, Vec<[Point2; 2]>)> {
    let mut slots: HashMap<u64, usize> = HashMap::new();
    let mut groups: Vec<(f64, Vec<[Point2; 2]>)> = Vec::new();

    for seg in segments {
        // -0.0 and 0.0 are the same threshold
        let key = if seg.threshold == 0.0 {
            0f64.to_bits()
        } else {
            seg.threshold.to_bits()
        };
        let slot = *slots.entry(key).or_insert_with(|| {
            groups.push((seg.threshold, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(seg.points);
    }

    groups
}

/// A segment absorbed into a line.
#[derive(Debug, Clone, Copy)]
struct Join {
    at_head: bool,
    /// The endpoint of the absorbed segment that is not near the line.
    keep: Point2,
}

/// Which line end met which segment endpoint, and how far apart they were.
#[derive(Debug, Clone, Copy)]
struct Contact {
    at_head: bool,
    keep: Point2,
    distance: f64,
}

/// Test the four end pairings in fixed order: head with the segment's first
/// point, head with its second, then the same for the tail.
fn contact(head: Point2, tail: Point2, seg: &[Point2; 2], nearness: f64, rule: JoinRule) -> Option<Contact> {
    let pairings = [
        (true, seg[0], seg[1], head),
        (true, seg[1], seg[0], head),
        (false, seg[0], seg[1], tail),
        (false, seg[1], seg[0], tail),
    ];

    let mut best: Option<Contact> = None;
    for (at_head, near, keep, end) in pairings {
        let distance = near.distance(end);
        if distance >= nearness {
            continue;
        }
        let candidate = Contact {
            at_head,
            keep,
            distance,
        };
        match rule {
            JoinRule::FirstMatch => return Some(candidate),
            JoinRule::Nearest => {
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(candidate);
                }
            }
        }
    }
    best
}

type CellKey = (i64, i64);

/// The working set of one threshold group.
///
/// Segments are never moved; removal only flips `alive`, so indices keep
/// matching input order for tie-breaking.
struct SegmentPool {
    segments: Vec<[Point2; 2]>,
    alive: Vec<bool>,
    /// Everything at or above this index is already consumed.
    cursor: usize,
    cell_size: f64,
    grid: HashMap<CellKey, Vec<usize>>,
    scratch: Vec<usize>,
}

impl SegmentPool {
    fn new(segments: Vec<[Point2; 2]>, nearness: f64) -> Self {
        // a touch wider than nearness so rounding in `cell_of` cannot push a
        // neighbour two cells away
        let cell_size = nearness * 1.0001;
        let mut grid: HashMap<CellKey, Vec<usize>> = HashMap::new();

        if nearness > 0.0 {
            for (i, seg) in segments.iter().enumerate() {
                let k0 = cell_of(seg[0], cell_size);
                let k1 = cell_of(seg[1], cell_size);
                grid.entry(k0).or_default().push(i);
                if k1 != k0 {
                    grid.entry(k1).or_default().push(i);
                }
            }
        }

        Self {
            alive: vec![true; segments.len()],
            cursor: segments.len(),
            segments,
            cell_size,
            grid,
            scratch: Vec::new(),
        }
    }

    /// Remove and return the last remaining segment.
    fn pop_last(&mut self) -> Option<[Point2; 2]> {
        while self.cursor > 0 {
            self.cursor -= 1;
            if self.alive[self.cursor] {
                self.alive[self.cursor] = false;
                return Some(self.segments[self.cursor]);
            }
        }
        None
    }

    /// Find, remove and describe the segment that joins onto `line`.
    fn take_join(&mut self, line: &VecDeque<Point2>, nearness: f64, rule: JoinRule) -> Option<Join> {
        if nearness <= 0.0 {
            return None;
        }
        let (Some(&head), Some(&tail)) = (line.front(), line.back()) else {
            return None;
        };

        self.gather_candidates(head);
        self.gather_candidates(tail);

        // (index, contact) of the winner so far
        let mut best: Option<(usize, Contact)> = None;
        for &i in &self.scratch {
            let Some(c) = contact(head, tail, &self.segments[i], nearness, rule) else {
                continue;
            };
            let better = match (rule, best) {
                (_, None) => true,
                (JoinRule::FirstMatch, Some((bi, _))) => i < bi,
                (JoinRule::Nearest, Some((bi, bc))) => {
                    c.distance < bc.distance || (c.distance == bc.distance && i < bi)
                }
            };
            if better {
                best = Some((i, c));
            }
        }
        self.scratch.clear();

        let (index, c) = best?;
        self.alive[index] = false;
        Some(Join {
            at_head: c.at_head,
            keep: c.keep,
        })
    }

    /// Push live segment indices from the 3x3 cells around `p` into
    /// `scratch`, pruning consumed entries on the way.
    fn gather_candidates(&mut self, p: Point2) {
        let (cx, cy) = cell_of(p, self.cell_size);
        let alive = &self.alive;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let key = (cx.saturating_add(dx), cy.saturating_add(dy));
                if let Some(bucket) = self.grid.get_mut(&key) {
                    bucket.retain(|&i| alive[i]);
                    self.scratch.extend_from_slice(bucket);
                }
            }
        }
    }
}

fn cell_of(p: Point2, cell_size: f64) -> CellKey {
    // float-to-int casts saturate, so far-away points share edge cells
    ((p.x / cell_size).floor() as i64, (p.y / cell_size).floor() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn seg(a: (f64, f64), b: (f64, f64)) -> [Point2; 2] {
        [p(a.0, a.1), p(b.0, b.1)]
    }

    /// A zig-zag chain of `n` unit segments, shuffled deterministically.
    fn chain(n: usize, origin: f64) -> Vec<[Point2; 2]> {
        let pts: Vec<Point2> = (0..=n)
            .map(|i| p(origin + i as f64 * 3.0, (i % 2) as f64 * 3.0))
            .collect();
        let mut segs: Vec<[Point2; 2]> = pts.windows(2).map(|w| [w[0], w[1]]).collect();
        // flip every third segment and interleave from both ends
        for (i, s) in segs.iter_mut().enumerate() {
            if i % 3 == 0 {
                s.swap(0, 1);
            }
        }
        let mut out = Vec::with_capacity(segs.len());
        let (mut lo, mut hi) = (0, segs.len());
        while lo < hi {
            hi -= 1;
            out.push(segs[hi]);
            if lo < hi {
                out.push(segs[lo]);
                lo += 1;
            }
        }
        out
    }

    #[test]
    fn test_join_rule_parse() {
        assert_eq!("first-match".parse::<JoinRule>(), Ok(JoinRule::FirstMatch));
        assert_eq!("NEAREST".parse::<JoinRule>(), Ok(JoinRule::Nearest));
        assert!("closest".parse::<JoinRule>().is_err());
    }

    #[test]
    fn test_chain_is_rebuilt_whole() {
        let lines = stitch_group(chain(8, 0.0), &StitchOptions::default());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 9);
    }

    #[test]
    fn test_zero_nearness_never_joins() {
        let opts = StitchOptions {
            nearness: 0.0,
            min_points: 1,
            ..Default::default()
        };
        let lines = stitch_group(chain(4, 0.0), &opts);
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| l.len() == 2));
    }

    #[test]
    fn test_group_order_follows_first_appearance() {
        let segments = vec![
            CrossingSegment::new(2.0, p(0.0, 0.0), p(1.0, 0.0)),
            CrossingSegment::new(-1.0, p(0.0, 0.0), p(1.0, 0.0)),
            CrossingSegment::new(2.0, p(5.0, 0.0), p(6.0, 0.0)),
            CrossingSegment::new(-0.0, p(0.0, 0.0), p(1.0, 0.0)),
            CrossingSegment::new(0.0, p(0.0, 0.0), p(1.0, 0.0)),
        ];
        let groups = group_by_threshold(segments);
        let keys: Vec<f64> = groups.iter().map(|g| g.0).collect();
        assert_eq!(keys, vec![2.0, -1.0, -0.0]);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[2].1.len(), 2);
    }

    #[test]
    fn test_stats_count_drops() {
        let mut segments = chain(6, 0.0);
        segments.push(seg((500.0, 0.0), (501.0, 0.0)));
        let (lines, stats) = stitch_group_with_stats(segments, &StitchOptions::default());
        assert_eq!(lines.len(), 1);
        assert_eq!(stats.segments, 7);
        assert_eq!(stats.joins, 5);
        assert_eq!(stats.kept, 1);
        assert_eq!(stats.dropped, 1);
    }
}
