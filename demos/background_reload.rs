//! Background reload example for sweepdb-rs
//!
//! Loads one ward, then reloads every ward on a worker thread while the
//! old generation keeps answering queries. Handles taken from the old
//! generation stop resolving once the new one is swapped in.

use std::sync::Arc;
use sweepdb_rs::prelude::*;
use sweepdb_rs::reload_in_background;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .init();

    let data = default_data_dir();
    let registry = Arc::new(ScheduleRegistry::default());

    // Generation 1: ward 44 only
    let only_44 = IngestConfig {
        wards: WardFilter::only([44]),
        ..IngestConfig::default()
    };
    registry.load_dir(&data, &only_44)?;
    let old = registry.snapshot();
    println!("generation {}: {} entities", old.id(), old.entities().len());

    let tap = GeographicPoint::new(41.9420, -87.6580)?;
    let handle = old.hit_test(&tap).map(|(h, _)| h);

    // Generation 2: everything, built off to the side
    let worker = reload_in_background(Arc::clone(&registry), data, IngestConfig::default())?;
    if let Some((_, e)) = old.hit_test(&tap) {
        println!("while reloading, old generation still answers: {}", e.label);
    }

    let report = worker.join().expect("ingest worker panicked")?;
    let new = registry.snapshot();
    println!(
        "generation {}: {} entities from {} files",
        new.id(),
        new.entities().len(),
        report.files_read
    );

    if let Some(h) = handle {
        println!(
            "old handle resolves in old generation: {}, in new generation: {}",
            old.entity(h).is_some(),
            new.entity(h).is_some()
        );
    }
    Ok(())
}
