//! Contour line extraction from triangulated elevation surfaces.
//!
//! The pipeline has three stages:
//! - Threshold generation (evenly spaced heights)
//! - Triangle intersection ("meandering triangles")
//! - Segment stitching into polylines
//!
//! ```
//! use tin_contour::{contours_from_tin, ContourConfig, Triangle};
//!
//! let tin = vec![Triangle::from([[0.0, 0.0, 0.0], [10.0, 0.0, 10.0], [0.0, 10.0, 10.0]])];
//! let result = contours_from_tin(&tin, &ContourConfig::default()).unwrap();
//! // a single triangle never yields a long enough line
//! assert!(result.is_empty());
//! ```

pub mod config;
pub mod error;
pub mod intersect;
pub mod io;
pub mod pipeline;
pub mod stitch;
pub mod threshold;
pub mod types;

pub use config::ContourConfig;
pub use error::{ContourError, Result};
pub use intersect::{classify, intersect, intersect_with_policy, Crossing, DegeneratePolicy, DEGENERATE_EPSILON};
pub use pipeline::{contours_from_tin, crossing_segments};
pub use stitch::{
    stitch, stitch_group, stitch_group_with_stats, JoinRule, StitchOptions, StitchStats,
    DEFAULT_NEARNESS, MIN_POLYLINE_POINTS,
};
pub use threshold::{generate_thresholds, normalize_threshold};
pub use types::{
    tin_z_range, ContourLevel, ContourResult, CrossingSegment, Point2, Polyline, Triangle, Vertex3,
};
