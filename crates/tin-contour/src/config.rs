//! Configuration for contour extraction.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ContourError, Result};
use crate::intersect::DegeneratePolicy;
use crate::stitch::{JoinRule, StitchOptions, DEFAULT_NEARNESS, MIN_POLYLINE_POINTS};

/// Parameters of a full TIN contouring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourConfig {
    /// Number of evenly spaced thresholds.
    pub threshold_count: usize,

    /// Lowest threshold.
    pub z_min: f64,

    /// Highest threshold.
    pub z_max: f64,

    /// Endpoint distance under which segments are joined.
    pub nearness: f64,

    /// Polylines with this many points or fewer are discarded.
    pub min_points: usize,

    /// Tie-break between several joinable segments.
    pub join_rule: JoinRule,

    /// Handling of flat triangle edges at a threshold.
    pub degenerate_policy: DegeneratePolicy,

    /// Spread intersection and stitching over the rayon pool.
    pub parallel: bool,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            threshold_count: 10,
            z_min: -1.0,
            z_max: 1.0,
            nearness: DEFAULT_NEARNESS,
            min_points: MIN_POLYLINE_POINTS,
            join_rule: JoinRule::FirstMatch,
            degenerate_policy: DegeneratePolicy::Skip,
            parallel: true,
        }
    }
}

impl ContourConfig {
    /// Load configuration from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Overlay `CONTOUR_*` environment variables. Values that fail to parse
    /// are logged and ignored.
    pub fn with_env_overrides(mut self) -> Self {
        env_override("CONTOUR_THRESHOLD_COUNT", &mut self.threshold_count);
        env_override("CONTOUR_Z_MIN", &mut self.z_min);
        env_override("CONTOUR_Z_MAX", &mut self.z_max);
        env_override("CONTOUR_NEARNESS", &mut self.nearness);
        env_override("CONTOUR_MIN_POINTS", &mut self.min_points);
        env_override("CONTOUR_JOIN_RULE", &mut self.join_rule);
        env_override("CONTOUR_DEGENERATE_POLICY", &mut self.degenerate_policy);
        env_override("CONTOUR_PARALLEL", &mut self.parallel);
        self
    }

    /// Reject parameters the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.threshold_count < 1 {
            return Err(ContourError::invalid_config(
                "threshold_count",
                "must be at least 1",
            ));
        }
        if !self.z_min.is_finite() {
            return Err(ContourError::invalid_config(
                "z_min",
                format!("must be finite, got {}", self.z_min),
            ));
        }
        if !self.z_max.is_finite() {
            return Err(ContourError::invalid_config(
                "z_max",
                format!("must be finite, got {}", self.z_max),
            ));
        }
        if !self.nearness.is_finite() || self.nearness < 0.0 {
            return Err(ContourError::invalid_config(
                "nearness",
                format!("must be a finite value >= 0, got {}", self.nearness),
            ));
        }
        Ok(())
    }

    /// Stitching parameters derived from this configuration.
    pub fn stitch_options(&self) -> StitchOptions {
        StitchOptions {
            nearness: self.nearness,
            min_points: self.min_points,
            join_rule: self.join_rule,
            parallel: self.parallel,
        }
    }
}

fn env_override<T: FromStr>(key: &str, slot: &mut T) {
    let Ok(val) = std::env::var(key) else {
        return;
    };
    match val.trim().parse() {
        Ok(parsed) => *slot = parsed,
        Err(_) => tracing::warn!(key, value = %val, "Ignoring unparseable environment value"),
    }
}
