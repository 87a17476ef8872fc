//! Contour extraction command line tool.
//!
//! Reads a TIN as JSON (an array of `[[x, y, z]; 3]` triangles), extracts
//! contour lines and writes them as a GeoJSON FeatureCollection.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use test_utils::create_hills_tin;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use tin_contour::io::{read_tin, read_tin_file, write_geojson};
use tin_contour::{
    contours_from_tin, tin_z_range, ContourConfig, ContourResult, DegeneratePolicy, JoinRule,
    Triangle,
};

#[derive(Parser, Debug)]
#[command(name = "contour-cli")]
#[command(about = "Extract contour lines from a triangulated surface")]
struct Args {
    /// Input TIN as JSON ("-" or omitted reads stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output GeoJSON path (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of evenly spaced thresholds
    #[arg(short = 'n', long, env = "CONTOUR_THRESHOLD_COUNT")]
    thresholds: Option<usize>,

    /// Lowest threshold
    #[arg(long, env = "CONTOUR_Z_MIN", allow_hyphen_values = true)]
    z_min: Option<f64>,

    /// Highest threshold
    #[arg(long, env = "CONTOUR_Z_MAX", allow_hyphen_values = true)]
    z_max: Option<f64>,

    /// Take the threshold range from the TIN's own height extent
    #[arg(long, conflicts_with_all = ["z_min", "z_max"])]
    auto_range: bool,

    /// Endpoint distance under which segments are joined
    #[arg(long, env = "CONTOUR_NEARNESS")]
    nearness: Option<f64>,

    /// Drop polylines with this many points or fewer
    #[arg(long, env = "CONTOUR_MIN_POINTS")]
    min_points: Option<usize>,

    /// Segment join rule (first_match, nearest)
    #[arg(long, env = "CONTOUR_JOIN_RULE")]
    join_rule: Option<JoinRule>,

    /// Flat edge handling (skip, midpoint)
    #[arg(long, env = "CONTOUR_DEGENERATE_POLICY")]
    degenerate: Option<DegeneratePolicy>,

    /// Run on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Contour a synthetic N x N hills surface instead of reading input
    #[arg(long, value_name = "N", conflicts_with = "input")]
    synthetic: Option<usize>,

    /// Pretty-print the GeoJSON
    #[arg(long)]
    pretty: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    /// Configuration for this run, before any auto-range adjustment.
    fn config(&self) -> ContourConfig {
        let mut config = ContourConfig::default();
        if let Some(count) = self.thresholds {
            config.threshold_count = count;
        }
        if let Some(z_min) = self.z_min {
            config.z_min = z_min;
        }
        if let Some(z_max) = self.z_max {
            config.z_max = z_max;
        }
        if let Some(nearness) = self.nearness {
            config.nearness = nearness;
        }
        if let Some(min_points) = self.min_points {
            config.min_points = min_points;
        }
        if let Some(rule) = self.join_rule {
            config.join_rule = rule;
        }
        if let Some(policy) = self.degenerate {
            config.degenerate_policy = policy;
        }
        if self.sequential {
            config.parallel = false;
        }
        config
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level, args.json_logs)?;

    let tin = match args.synthetic {
        Some(n) => {
            info!(size = n, "Generating synthetic TIN");
            create_hills_tin(n, 1.0).into_iter().map(Triangle::from).collect()
        }
        None => load_tin(args.input.as_deref())?,
    };

    let (result, config) = extract(&args, &tin)?;

    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_geojson(file, &result, config.z_min, config.z_max, args.pretty)?;
        }
        None => {
            write_geojson(io::stdout().lock(), &result, config.z_min, config.z_max, args.pretty)?;
        }
    }

    info!(
        levels = result.len(),
        polylines = result.total_polylines(),
        points = result.total_points(),
        "Done"
    );

    Ok(())
}

/// Resolve the run configuration against `tin` and extract its contours.
fn extract(args: &Args, tin: &[Triangle]) -> Result<(ContourResult, ContourConfig)> {
    let mut config = args.config();
    if args.auto_range {
        match tin_z_range(tin) {
            Some((z_min, z_max)) => {
                config.z_min = z_min;
                config.z_max = z_max;
            }
            None => warn!("Empty TIN, keeping configured threshold range"),
        }
    }

    info!(
        triangles = tin.len(),
        thresholds = config.threshold_count,
        z_min = config.z_min,
        z_max = config.z_max,
        nearness = config.nearness,
        join_rule = %config.join_rule,
        "Extracting contours"
    );

    let result = contours_from_tin(tin, &config).context("Contour extraction failed")?;
    Ok((result, config))
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout may carry the GeoJSON
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Read the TIN from `input`, or from stdin when it is absent or `-`.
fn load_tin(input: Option<&Path>) -> Result<Vec<Triangle>> {
    let tin = match input {
        Some(path) if path.as_os_str() != "-" => read_tin_file(path)
            .with_context(|| format!("Failed to read TIN from {}", path.display()))?,
        _ => read_tin(io::stdin().lock()).context("Failed to read TIN from stdin")?,
    };
    if tin.is_empty() {
        warn!("TIN has no triangles");
    }
    Ok(tin)
}
