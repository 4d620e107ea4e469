// crates/sweepdb-core/src/parser.rs

//! # Feature Parser
//!
//! Turns one region file into [`ScheduleEntity`] values.
//!
//! * **Area mode:** top-level `{ward, section, label}` plus features; every
//!   usable geometry in the file is aggregated into one entity.
//! * **Road mode:** one entity per feature, keyed by `properties.id`.
//!
//! File-level problems return [`SweepError::MalformedFile`]. Feature-level
//! problems are logged, collected in [`ParsedFile::issues`] and skipped.

use crate::error::{Result, SweepError};
use crate::model::{
    GeographicPoint, Geometry, Polygon, Polyline, RoadMeta, Ring, RingRole, ScheduleEntity,
};
use crate::raw::{
    AreaFileRaw, FeatureRaw, GeometryRaw, LineRaw, MultiPolygonRaw, PolygonRaw, PositionRaw,
    RoadFileRaw,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Which layout a region file follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Area,
    Road,
}

/// Result of parsing one file.
#[derive(Debug, Default)]
pub struct ParsedFile {
    pub entities: Vec<ScheduleEntity>,
    /// Number of features present in the file.
    pub features: usize,
    /// One entry per skipped feature (or the empty-entity notice).
    pub issues: Vec<SweepError>,
}

impl ParsedFile {
    pub fn geometry_count(&self) -> usize {
        self.entities.iter().map(|e| e.geometries.len()).sum()
    }

    /// Features that did not contribute a geometry.
    pub fn skipped_features(&self) -> usize {
        self.issues
            .iter()
            .filter(|e| !matches!(e, SweepError::EmptyEntity(_)))
            .count()
    }
}

/// Parse a file whose mode is already known.
pub fn parse_reader<R: Read>(reader: R, source: &Path, mode: FileMode) -> Result<ParsedFile> {
    match mode {
        FileMode::Area => parse_area(reader, source),
        FileMode::Road => parse_roads(reader, source),
    }
}

/// Parse an area-schedule file into at most one entity.
pub fn parse_area<R: Read>(reader: R, source: &Path) -> Result<ParsedFile> {
    let raw: AreaFileRaw = decode_file(reader, source)?;

    let ward = top_level_u32(raw.ward.as_ref())
        .ok_or_else(|| SweepError::malformed(source, "missing or invalid `ward`"))?;
    let section = top_level_u32(raw.section.as_ref())
        .ok_or_else(|| SweepError::malformed(source, "missing or invalid `section`"))?;
    let features = raw
        .features
        .ok_or_else(|| SweepError::malformed(source, "missing `features` array"))?;

    let label = raw
        .label
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| format!("Ward {ward}, Section {section}"));

    debug!(
        file = %source.display(),
        ward,
        section,
        features = features.len(),
        "parsing area file"
    );

    let mut out = ParsedFile {
        features: features.len(),
        ..ParsedFile::default()
    };
    let mut entity = ScheduleEntity::section(ward, section, label);

    for (index, value) in features.into_iter().enumerate() {
        let parsed = feature_from_value(index, value)
            .and_then(|f| decode_geometry(index, feature_geometry(index, f.geometry.as_ref())?));
        match parsed {
            Ok(geoms) => entity.geometries.extend(geoms),
            Err(e) => {
                warn!(file = %source.display(), "skipping feature: {e}");
                out.issues.push(e);
            }
        }
    }

    if entity.geometries.is_empty() {
        warn!(file = %source.display(), "no usable geometry; section not registered");
        out.issues.push(SweepError::EmptyEntity(source.to_path_buf()));
    } else {
        out.entities.push(entity);
    }
    Ok(out)
}

/// Parse a road-list file into one entity per usable feature.
pub fn parse_roads<R: Read>(reader: R, source: &Path) -> Result<ParsedFile> {
    let raw: RoadFileRaw = decode_file(reader, source)?;
    let features = raw
        .features
        .ok_or_else(|| SweepError::malformed(source, "missing `features` array"))?;

    debug!(file = %source.display(), features = features.len(), "parsing road file");

    let mut out = ParsedFile {
        features: features.len(),
        ..ParsedFile::default()
    };

    for (index, value) in features.into_iter().enumerate() {
        match road_from_value(index, value) {
            Ok(road) => out.entities.push(road),
            Err(e) => {
                warn!(file = %source.display(), "skipping road: {e}");
                out.issues.push(e);
            }
        }
    }

    if out.entities.is_empty() {
        out.issues.push(SweepError::EmptyEntity(source.to_path_buf()));
    }
    Ok(out)
}

fn road_from_value(index: usize, value: Value) -> Result<ScheduleEntity> {
    let feature = feature_from_value(index, value)?;
    let props = feature
        .properties
        .as_ref()
        .and_then(Value::as_object)
        .ok_or(SweepError::MissingRequiredField { index, field: "properties" })?;

    let id = props
        .get("id")
        .and_then(Value::as_u64)
        .ok_or(SweepError::MissingRequiredField { index, field: "id" })?;
    let name = props
        .get("name")
        .and_then(Value::as_str)
        .ok_or(SweepError::MissingRequiredField { index, field: "name" })?;

    let meta = RoadMeta {
        ward: optional_u32(props, "ward"),
        section: optional_u32(props, "section"),
        status: props.get("status").and_then(Value::as_str).map(str::to_owned),
    };

    let geometry = feature_geometry(index, feature.geometry.as_ref())?;
    let mut road = ScheduleEntity::road(id, name, meta);
    road.geometries = decode_geometry(index, geometry)?;
    Ok(road)
}

// -----------------------------------------------------------------------------
// GEOMETRY DISPATCH
// -----------------------------------------------------------------------------

/// Decode one feature's geometry into model values.
///
/// Exterior rings are reversed unconditionally; hole rings keep the order
/// they were read in. Renderers downstream depend on this winding, so the
/// asymmetry is kept as is.
pub fn decode_geometry(index: usize, geometry: &GeometryRaw) -> Result<Vec<Geometry>> {
    let kind = geometry
        .kind
        .as_deref()
        .ok_or(SweepError::MissingRequiredField { index, field: "geometry.type" })?;
    let coords = geometry
        .coordinates
        .as_ref()
        .ok_or(SweepError::MissingRequiredField { index, field: "geometry.coordinates" })?;

    match kind {
        "Polygon" => {
            let rings: PolygonRaw = coordinates(kind, coords)?;
            Ok(vec![Geometry::Polygon(polygon_from_rings(&rings)?)])
        }
        "MultiPolygon" => {
            let parts: MultiPolygonRaw = coordinates(kind, coords)?;
            parts
                .iter()
                .map(|rings| polygon_from_rings(rings).map(Geometry::Polygon))
                .collect()
        }
        "LineString" => {
            let line: LineRaw = coordinates(kind, coords)?;
            Ok(vec![classify_line(points(&line)?)?])
        }
        other => Err(SweepError::UnsupportedGeometryType {
            index,
            kind: other.to_owned(),
        }),
    }
}

/// A LineString closed on itself with at least four points is an implicit
/// polygon ring; anything else stays an open path in source order.
pub fn classify_line(points: Vec<GeographicPoint>) -> Result<Geometry> {
    let closed = points.len() >= Ring::MIN_POINTS && points.first() == points.last();
    if closed {
        let exterior = Ring::new(reversed(points), RingRole::Exterior)?;
        Ok(Geometry::Polygon(Polygon::new(exterior, Vec::new())))
    } else {
        Ok(Geometry::Polyline(Polyline::new(points)?))
    }
}

fn polygon_from_rings(rings: &[LineRaw]) -> Result<Polygon> {
    let (first, rest) = rings
        .split_first()
        .ok_or_else(|| SweepError::InvalidGeometry("polygon has no rings".into()))?;

    let exterior = Ring::new(reversed(closed(points(first)?)), RingRole::Exterior)?;
    let holes = rest
        .iter()
        .map(|ring| Ring::new(closed(points(ring)?), RingRole::Interior))
        .collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, holes))
}

fn points(line: &[PositionRaw]) -> Result<Vec<GeographicPoint>> {
    line.iter()
        .map(|pos| match pos.as_slice() {
            [lon, lat, ..] => GeographicPoint::new(*lat, *lon),
            _ => Err(SweepError::InvalidGeometry(format!(
                "position needs [lon, lat], got {} value(s)",
                pos.len()
            ))),
        })
        .collect()
}

/// Close an open ring by repeating its first point.
fn closed(mut points: Vec<GeographicPoint>) -> Vec<GeographicPoint> {
    if let (Some(first), Some(last)) = (points.first().copied(), points.last()) {
        if first != *last {
            points.push(first);
        }
    }
    points
}

fn reversed(mut points: Vec<GeographicPoint>) -> Vec<GeographicPoint> {
    points.reverse();
    points
}

// -----------------------------------------------------------------------------
// FIELD HELPERS
// -----------------------------------------------------------------------------

fn decode_file<T: DeserializeOwned, R: Read>(reader: R, source: &Path) -> Result<T> {
    serde_json::from_reader(reader).map_err(|e| SweepError::malformed(source, e.to_string()))
}

fn feature_from_value(index: usize, value: Value) -> Result<FeatureRaw> {
    if !value.is_object() {
        return Err(SweepError::MalformedFeature {
            index,
            reason: format!("expected an object, got {}", json_kind(&value)),
        });
    }
    serde_json::from_value(value)
        .map_err(|e| SweepError::InvalidGeometry(format!("feature {index}: {e}")))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn feature_geometry(index: usize, geometry: Option<&GeometryRaw>) -> Result<&GeometryRaw> {
    geometry.ok_or(SweepError::MissingRequiredField { index, field: "geometry" })
}

fn coordinates<T: DeserializeOwned>(kind: &str, coords: &Value) -> Result<T> {
    T::deserialize(coords)
        .map_err(|e| SweepError::InvalidGeometry(format!("{kind} coordinates: {e}")))
}

fn top_level_u32(value: Option<&Value>) -> Option<u32> {
    value.and_then(Value::as_u64).and_then(|v| u32::try_from(v).ok())
}

fn optional_u32(props: &Map<String, Value>, key: &str) -> Option<u32> {
    top_level_u32(props.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn area(value: Value) -> ParsedFile {
        let bytes = serde_json::to_vec(&value).unwrap();
        parse_area(bytes.as_slice(), Path::new("ward_44/section_3.geojson")).unwrap()
    }

    fn roads(value: Value) -> ParsedFile {
        let bytes = serde_json::to_vec(&value).unwrap();
        parse_roads(bytes.as_slice(), Path::new("roads/roads.geojson")).unwrap()
    }

    fn square(lo: f64, hi: f64) -> Value {
        json!([[lo, lo], [hi, lo], [hi, hi], [lo, hi], [lo, lo]])
    }

    #[test]
    fn polygon_with_hole_reverses_only_exterior() {
        let parsed = area(json!({
            "ward": 44, "section": 3, "hood": "Lakeview",
            "features": [{ "geometry": { "type": "Polygon",
                "coordinates": [square(0.0, 10.0), square(4.0, 6.0)] } }]
        }));
        let entity = &parsed.entities[0];
        assert_eq!(entity.label, "Lakeview");
        let Geometry::Polygon(poly) = &entity.geometries[0] else {
            panic!("expected polygon");
        };
        assert_eq!(poly.holes().len(), 1);
        // Source exterior starts at (lon 0, lat 0) then (lon 10, lat 0).
        // Reversed, the second point is (lon 0, lat 10).
        let ext = poly.exterior().points();
        assert_eq!((ext[1].lat, ext[1].lon), (10.0, 0.0));
        // Hole keeps source order: second point is (lon 6, lat 4).
        let hole = poly.holes()[0].points();
        assert_eq!((hole[1].lat, hole[1].lon), (4.0, 6.0));
    }

    #[test]
    fn multipolygon_yields_one_polygon_per_part() {
        let parsed = area(json!({
            "ward": 2, "section": 1, "label": "West Town",
            "features": [{ "geometry": { "type": "MultiPolygon",
                "coordinates": [[square(0.0, 1.0)], [square(2.0, 3.0), square(2.2, 2.8)]] } }]
        }));
        let geoms = &parsed.entities[0].geometries;
        assert_eq!(geoms.len(), 2);
        assert!(geoms.iter().all(Geometry::is_polygon));
    }

    #[test]
    fn multipolygon_reverses_exteriors_but_not_holes() {
        let parsed = area(json!({
            "ward": 2, "section": 1,
            "features": [{ "geometry": { "type": "MultiPolygon",
                "coordinates": [[square(0.0, 1.0)], [square(2.0, 3.0), square(2.2, 2.8)]] } }]
        }));
        let geoms = &parsed.entities[0].geometries;
        let Geometry::Polygon(first) = &geoms[0] else {
            panic!("expected polygon");
        };
        let Geometry::Polygon(second) = &geoms[1] else {
            panic!("expected polygon");
        };
        // Exteriors reversed: second point is (lon lo, lat hi).
        let ext = first.exterior().points();
        assert_eq!((ext[1].lat, ext[1].lon), (1.0, 0.0));
        let ext = second.exterior().points();
        assert_eq!((ext[1].lat, ext[1].lon), (3.0, 2.0));
        // Hole in source order: second point is (lon hi, lat lo).
        let hole = second.holes()[0].points();
        assert_eq!(second.holes()[0].role(), RingRole::Interior);
        assert_eq!((hole[1].lat, hole[1].lon), (2.2, 2.8));
    }

    #[test]
    fn closed_linestring_becomes_polygon() {
        let parsed = area(json!({
            "ward": 2, "section": 1,
            "features": [
                { "geometry": { "type": "LineString", "coordinates": square(0.0, 1.0) } },
                { "geometry": { "type": "LineString",
                    "coordinates": [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.5]] } }
            ]
        }));
        let geoms = &parsed.entities[0].geometries;
        assert!(matches!(geoms[0], Geometry::Polygon(ref p) if p.holes().is_empty()));
        let Geometry::Polyline(line) = &geoms[1] else {
            panic!("expected polyline");
        };
        // Open paths are not reversed.
        assert_eq!(line.points()[0].lon, 0.0);
        assert_eq!(line.points()[4].lat, 0.5);
        assert_eq!(parsed.entities[0].label, "Ward 2, Section 1");
    }

    #[test]
    fn bad_features_are_skipped_not_fatal() {
        let parsed = area(json!({
            "ward": 44, "section": 9, "hood": "Uptown",
            "features": [
                { "geometry": { "type": "Point", "coordinates": [0.0, 0.0] } },
                { "properties": { "id": 1 } },
                { "geometry": { "type": "LineString", "coordinates": [[0.0, 95.0], [1.0, 1.0]] } },
                "not a feature",
                { "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] } }
            ]
        }));
        assert_eq!(parsed.features, 5);
        assert_eq!(parsed.entities[0].geometries.len(), 1);
        assert_eq!(parsed.skipped_features(), 4);
        assert!(matches!(
            parsed.issues[0],
            SweepError::UnsupportedGeometryType { index: 0, ref kind } if kind == "Point"
        ));
        assert!(matches!(
            parsed.issues[1],
            SweepError::MissingRequiredField { index: 1, field: "geometry" }
        ));
        assert!(matches!(parsed.issues[3], SweepError::MalformedFeature { index: 3, .. }));
    }

    #[test]
    fn area_ignores_non_object_properties() {
        let parsed = area(json!({
            "ward": 1, "section": 1,
            "features": [{ "properties": ["x"],
                "geometry": { "type": "Polygon", "coordinates": [square(0.0, 1.0)] } }]
        }));
        assert_eq!(parsed.entities.len(), 1);
        assert_eq!(parsed.entities[0].geometries.len(), 1);
        assert!(parsed.issues.is_empty());
    }

    #[test]
    fn road_with_non_object_properties_is_skipped() {
        let parsed = roads(json!({
            "features": [{ "properties": "N Clark St",
                "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] } }]
        }));
        assert!(parsed.entities.is_empty());
        assert!(matches!(
            parsed.issues[0],
            SweepError::MissingRequiredField { index: 0, field: "properties" }
        ));
    }

    #[test]
    fn road_without_name_is_skipped() {
        let parsed = roads(json!({
            "features": [
                { "properties": { "id": 7 },
                  "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] } },
                { "properties": { "id": 8, "name": "W Belmont Ave" },
                  "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] } }
            ]
        }));
        assert_eq!(parsed.entities.len(), 1);
        assert_eq!(parsed.entities[0].label, "W Belmont Ave");
        assert!(matches!(
            parsed.issues[0],
            SweepError::MissingRequiredField { index: 0, field: "name" }
        ));
    }

    #[test]
    fn area_without_geometry_registers_nothing() {
        let parsed = area(json!({
            "ward": 44, "section": 9,
            "features": [{ "geometry": { "type": "Point", "coordinates": [0.0, 0.0] } }]
        }));
        assert!(parsed.entities.is_empty());
        assert!(matches!(parsed.issues.last(), Some(SweepError::EmptyEntity(_))));
    }

    #[test]
    fn area_missing_ward_is_malformed() {
        let bytes = serde_json::to_vec(&json!({ "section": 1, "features": [] })).unwrap();
        let err = parse_area(bytes.as_slice(), Path::new("x.geojson")).unwrap_err();
        assert!(matches!(err, SweepError::MalformedFile { .. }));

        let err = parse_area(&b"{ not json"[..], Path::new("x.geojson")).unwrap_err();
        assert!(matches!(err, SweepError::MalformedFile { .. }));
    }

    #[test]
    fn roads_one_entity_per_feature() {
        let parsed = roads(json!({
            "features": [
                { "properties": { "id": 10, "name": "N Clark St", "ward": 43, "section": 2, "status": "active" },
                  "geometry": { "type": "LineString", "coordinates": [[-87.64, 41.92], [-87.64, 41.93]] } },
                { "properties": { "name": "No Id Ave" },
                  "geometry": { "type": "LineString", "coordinates": [[-87.6, 41.9], [-87.6, 41.91]] } },
                { "properties": { "id": 12, "name": "W Fullerton Ave" },
                  "geometry": { "type": "Polygon", "coordinates": [square(0.0, 1.0)] } }
            ]
        }));
        assert_eq!(parsed.entities.len(), 2);
        let clark = &parsed.entities[0];
        assert_eq!(clark.label, "N Clark St");
        assert_eq!(clark.ward(), Some(43));
        assert_eq!(clark.road.as_ref().and_then(|r| r.status.as_deref()), Some("active"));
        assert!(matches!(
            parsed.issues[0],
            SweepError::MissingRequiredField { index: 1, field: "id" }
        ));
        assert!(parsed.entities[1].geometries[0].is_polygon());
    }

    #[test]
    fn unclosed_polygon_ring_is_closed() {
        let parsed = area(json!({
            "ward": 1, "section": 1,
            "features": [{ "geometry": { "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]] } }]
        }));
        let Geometry::Polygon(poly) = &parsed.entities[0].geometries[0] else {
            panic!("expected polygon");
        };
        assert_eq!(poly.exterior().points().len(), 5);
    }
}
