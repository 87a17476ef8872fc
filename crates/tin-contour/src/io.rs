//! Reading TINs and writing contour results.
//!
//! TINs are JSON arrays of triangles, each `[[x, y, z], [x, y, z], [x, y, z]]`.
//! Results are written as a GeoJSON FeatureCollection with one LineString
//! feature per polyline.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::threshold::normalize_threshold;
use crate::types::{ContourResult, Triangle};

/// Parse a TIN from a JSON string.
pub fn parse_tin(json: &str) -> Result<Vec<Triangle>> {
    Ok(serde_json::from_str(json)?)
}

/// Read a TIN from any JSON source.
pub fn read_tin<R: Read>(reader: R) -> Result<Vec<Triangle>> {
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}

/// Read a TIN from a JSON file.
pub fn read_tin_file(path: impl AsRef<Path>) -> Result<Vec<Triangle>> {
    let path = path.as_ref();
    let tin = read_tin(File::open(path)?)?;
    tracing::debug!(path = %path.display(), triangles = tin.len(), "Loaded TIN");
    Ok(tin)
}

/// A GeoJSON FeatureCollection of contour lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContourFeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    pub features: Vec<ContourFeature>,
}

/// One contour polyline as a GeoJSON Feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContourFeature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    pub geometry: LineStringGeometry,

    pub properties: ContourProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineStringGeometry {
    /// Type identifier (always "LineString").
    #[serde(rename = "type")]
    pub type_: String,

    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContourProperties {
    /// Height of the contour.
    pub threshold: f64,

    /// Threshold position within the configured range, `0.0..=1.0`.
    /// Renderers map this onto a colour ramp.
    pub band: f64,
}

impl ContourFeatureCollection {
    /// Build a collection from a result, normalising thresholds against
    /// `[z_min, z_max]`.
    pub fn from_result(result: &ContourResult, z_min: f64, z_max: f64) -> Self {
        let features = result
            .iter()
            .flat_map(|(threshold, polylines)| {
                let band = normalize_threshold(threshold, z_min, z_max);
                polylines.iter().map(move |line| ContourFeature {
                    type_: "Feature".to_string(),
                    geometry: LineStringGeometry {
                        type_: "LineString".to_string(),
                        coordinates: line.iter().map(|p| [p.x, p.y]).collect(),
                    },
                    properties: ContourProperties { threshold, band },
                })
            })
            .collect();

        Self {
            type_: "FeatureCollection".to_string(),
            features,
        }
    }
}

/// Write a result as GeoJSON.
pub fn write_geojson<W: Write>(
    writer: W,
    result: &ContourResult,
    z_min: f64,
    z_max: f64,
    pretty: bool,
) -> Result<()> {
    let collection = ContourFeatureCollection::from_result(result, z_min, z_max);
    let mut writer = BufWriter::new(writer);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, &collection)?;
    } else {
        serde_json::to_writer(&mut writer, &collection)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a result as GeoJSON to a file.
pub fn write_geojson_file(
    path: impl AsRef<Path>,
    result: &ContourResult,
    z_min: f64,
    z_max: f64,
) -> Result<()> {
    let path = path.as_ref();
    write_geojson(File::create(path)?, result, z_min, z_max, false)?;
    tracing::debug!(path = %path.display(), features = result.total_polylines(), "Wrote GeoJSON");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContourError;

    #[test]
    fn test_parse_tin() {
        let tin = parse_tin("[[[0,0,0],[1,0,1],[0,1,1]], [[1,1,2],[1,0,1],[0,1,1]]]").unwrap();
        assert_eq!(tin.len(), 2);
        assert_eq!(tin[1].vertices[0].z, 2.0);
    }

    #[test]
    fn test_parse_tin_rejects_wrong_arity() {
        let err = parse_tin("[[[0,0,0],[1,0,1]]]").unwrap_err();
        assert!(matches!(err, ContourError::Json(_)));
    }
}
