//! Basic usage example for sweepdb-rs
//!
//! This example demonstrates how to:
//! - Load the bundled ward/road data set
//! - Attach cleaning dates from `dates.json`
//! - Classify every region into urgent / soon / clear
//! - Hit-test coordinates and search labels

use sweepdb_rs::prelude::*;
use chrono::NaiveDate;

fn main() -> Result<()> {
    println!("=== sweepdb-rs Basic Usage Example ===\n");

    // Load the data
    let data = default_data_dir();
    println!("Loading {}...", data.display());
    let registry = ScheduleRegistry::default();
    let report = registry.load_dir(&data, &IngestConfig::default())?;
    println!(
        "✓ {} files, {} entities, {} geometries\n",
        report.files_read, report.entities, report.geometries
    );

    // Attach dates
    let generation = registry.snapshot();
    let dates = LocalDatesFile::load(data.join("dates.json"))?;
    let filled = generation.populate_dates(&dates);
    println!("Dates attached to {} entities ({} without any)\n", filled.updated, filled.missing);

    // Example 1: status of everything on a fixed day
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default();
    println!("--- Example 1: Status on {today} ---");
    for (_, entity) in generation.handles() {
        let dates = entity.dates();
        let upcoming: Vec<String> = next_relevant_dates(&dates, today)
            .iter()
            .map(|d| d.to_string())
            .collect();
        println!(
            "{:<16} {:<28} {:>6}  {}",
            entity.key.to_string(),
            entity.label,
            status_tier(&dates, today),
            upcoming.join(", ")
        );
    }
    println!();

    // Example 2: hit-testing (streets are registered last and win over areas)
    println!("--- Example 2: Hit-testing ---");
    let taps = [
        (41.9420, -87.6580, "inside Lakeview East"),
        (41.9400, -87.6545, "on N Clark St"),
        (41.9240, -87.6430, "inside the park hole"),
        (41.9000, -87.7000, "outside every region"),
    ];
    for (lat, lon, what) in taps {
        let p = GeographicPoint::new(lat, lon)?;
        match generation.hit_test(&p) {
            Some((_, e)) => println!("{what:<24} -> {} ({})", e.label, e.key),
            None => println!("{what:<24} -> nothing"),
        }
    }
    println!();

    // Example 3: label search
    println!("--- Example 3: Search for 'lakeview' ---");
    for (_, entity) in generation.search_label("lakeview") {
        println!("- {} ({})", entity.label, entity.key);
    }

    let stats = generation.stats();
    println!(
        "\n{} sections, {} roads, {} with dates",
        stats.sections, stats.roads, stats.dated
    );
    Ok(())
}
