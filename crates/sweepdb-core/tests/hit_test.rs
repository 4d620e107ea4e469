use chrono::NaiveDate;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use sweepdb_core::{
    default_data_dir, parse_file, FileMode, GeographicPoint, Geometry, IngestConfig,
    LocalDatesFile, ScheduleKey, ScheduleRegistry, StatusPolicy, StatusTier,
};

fn pt(lat: f64, lon: f64) -> GeographicPoint {
    GeographicPoint::new(lat, lon).unwrap()
}

fn square(lat0: f64, lon0: f64, lat1: f64, lon1: f64) -> Value {
    json!([[lon0, lat0], [lon1, lat0], [lon1, lat1], [lon0, lat1], [lon0, lat0]])
}

fn write(dir: &Path, name: &str, value: Value) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();
    path
}

#[test]
fn polygon_hole_is_not_a_hit() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "section.geojson",
        json!({ "ward": 1, "section": 1, "features": [ { "geometry": { "type": "Polygon",
            "coordinates": [ square(41.0, -88.0, 42.0, -87.0), square(41.4, -87.6, 41.6, -87.4) ] } } ] }),
    );

    let parsed = parse_file(&path, FileMode::Area).unwrap();
    let entity = &parsed.entities[0];
    match &entity.geometries[0] {
        Geometry::Polygon(p) => assert_eq!(p.holes().len(), 1),
        other => panic!("expected polygon, got {other:?}"),
    }

    let registry = ScheduleRegistry::default();
    registry.replace(parsed.entities);
    assert!(registry.hit_test(&pt(41.5, -87.5)).is_none());
    assert!(registry.hit_test(&pt(41.2, -87.8)).is_some());
}

#[test]
fn closed_linestring_becomes_a_ring() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "roads.geojson",
        json!({ "features": [
            { "properties": { "id": 1, "name": "Loop" },
              "geometry": { "type": "LineString", "coordinates": square(41.0, -88.0, 41.1, -87.9) } },
            { "properties": { "id": 2, "name": "Open" },
              "geometry": { "type": "LineString",
                "coordinates": [[-88.0, 41.0], [-87.9, 41.0], [-87.9, 41.1], [-88.0, 41.1], [-88.0, 41.05]] } }
        ] }),
    );

    let parsed = parse_file(&path, FileMode::Road).unwrap();
    assert_eq!(parsed.entities.len(), 2);
    assert!(parsed.entities[0].geometries[0].is_polygon());
    assert!(!parsed.entities[1].geometries[0].is_polygon());
}

#[test]
fn later_overlay_wins() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(
        dir.path(),
        "a.geojson",
        json!({ "ward": 3, "section": 1, "label": "A", "features": [
            { "geometry": { "type": "Polygon", "coordinates": [ square(0.0, 0.0, 2.0, 2.0) ] } } ] }),
    );
    let b = write(
        dir.path(),
        "b.geojson",
        json!({ "ward": 3, "section": 2, "label": "B", "features": [
            { "geometry": { "type": "Polygon", "coordinates": [ square(1.0, 1.0, 3.0, 3.0) ] } } ] }),
    );

    let mut entities = parse_file(&a, FileMode::Area).unwrap().entities;
    entities.extend(parse_file(&b, FileMode::Area).unwrap().entities);
    let registry = ScheduleRegistry::default();
    registry.replace(entities);

    let snap = registry.snapshot();
    let (_, top) = snap.hit_test(&pt(1.5, 1.5)).unwrap();
    assert_eq!(top.label, "B");
    let (_, below) = snap.hit_test(&pt(0.5, 0.5)).unwrap();
    assert_eq!(below.label, "A");
}

#[test]
fn bundled_data_end_to_end() {
    let data = default_data_dir();
    let registry = ScheduleRegistry::default();
    let report = registry.load_dir(&data, &IngestConfig::default()).unwrap();
    assert_eq!(report.files_failed, 0);

    let snap = registry.snapshot();
    snap.populate_dates(&LocalDatesFile::load(data.join("dates.json")).unwrap());

    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let policy = StatusPolicy::default();
    let tier_at = |lat, lon| {
        let (handle, entity) = snap.hit_test(&pt(lat, lon)).unwrap();
        (entity.key, snap.status(handle, today, &policy).unwrap())
    };

    assert_eq!(
        tier_at(41.942, -87.658),
        (ScheduleKey::Section { ward: 44, section: 1 }, StatusTier::Urgent)
    );
    assert_eq!(
        tier_at(41.950, -87.658),
        (ScheduleKey::Section { ward: 44, section: 2 }, StatusTier::Soon)
    );
    // Streets are drawn over areas; Belmont borrows 44/2's schedule.
    assert_eq!(
        tier_at(41.9397, -87.6580),
        (ScheduleKey::Road { id: 1202 }, StatusTier::Soon)
    );
    // Park hole inside Lincoln Park.
    assert!(snap.hit_test(&pt(41.924, -87.643)).is_none());
    assert_eq!(
        tier_at(41.920, -87.648),
        (ScheduleKey::Section { ward: 43, section: 1 }, StatusTier::Urgent)
    );
}
