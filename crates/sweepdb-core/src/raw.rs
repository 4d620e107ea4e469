// crates/sweepdb-core/src/raw.rs
//! Raw GeoJSON-ish input structures as they come from region files.
//!
//! Everything a single feature may get wrong is kept as a loose
//! `serde_json::Value` here, so that one bad feature never fails the
//! deserialization of the whole file. The typed, fallible extraction lives
//! in [`crate::parser`].

use serde::Deserialize;
use serde_json::Value;

/// Area-schedule file: one section of one ward.
///
/// ```json
/// { "ward": 44, "section": 3, "hood": "Lakeview", "features": [ ... ] }
/// ```
#[derive(Debug, Deserialize)]
pub struct AreaFileRaw {
    #[serde(default)]
    pub ward: Option<Value>,
    #[serde(default)]
    pub section: Option<Value>,
    /// Older files call this `hood`.
    #[serde(default, alias = "hood")]
    pub label: Option<String>,
    #[serde(default)]
    pub features: Option<Vec<Value>>,
}

/// Road-list file: no top-level metadata, one feature per street.
#[derive(Debug, Deserialize)]
pub struct RoadFileRaw {
    #[serde(default)]
    pub features: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeatureRaw {
    #[serde(default)]
    pub geometry: Option<GeometryRaw>,
    /// Only road files read properties; area files ignore whatever is here.
    #[serde(default)]
    pub properties: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct GeometryRaw {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Value>,
}

/// `[lon, lat]` with any further ordinates ignored.
pub type PositionRaw = Vec<f64>;
pub type LineRaw = Vec<PositionRaw>;
pub type PolygonRaw = Vec<LineRaw>;
pub type MultiPolygonRaw = Vec<PolygonRaw>;
