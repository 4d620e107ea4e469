//! sweepdb: command-line interface for sweepdb-core
//!
//! This binary loads a street-cleaning data directory (ward sections and
//! roads), attaches cleaning dates and answers questions about it from the
//! terminal: overall stats, the status of every region, what lies under a
//! coordinate, and label search.
//!
//! Usage examples
//! --------------
//!
//! - Show overall stats
//!   $ sweepdb stats
//!
//! - List everything that is swept within three days
//!   $ sweepdb --today 2024-06-01 list --tier urgent
//!
//! - What is at this coordinate? (area or street)
//!   $ sweepdb hit 41.9405 -87.6543
//!
//! - Only wards 44 and 43, with a custom dates file
//!   $ sweepdb --wards 44,43 --dates ./dates.json list
//!
//! - Search labels
//!   $ sweepdb search "lakeview"
//!
//! Data source
//! -----------
//!
//! By default, the CLI loads the sample data bundled with `sweepdb-core` and
//! caches a binary snapshot next to it for fast subsequent runs. Use
//! `--data <dir>` to point at another data directory, `--no-cache` to always
//! parse the GeoJSON files, and `-v` for progress logging on stderr.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::Path;
use sweepdb_core::{
    default_cache_path, default_data_dir, DateSource, Generation, IngestConfig, LocalDatesFile,
    ScheduleEntity, ScheduleRegistry, StatusPolicy, StatusTier, WardFilter,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    let data = args.data.clone().unwrap_or_else(default_data_dir);
    let config = IngestConfig {
        wards: args.wards.clone(),
        touch_tolerance_m: args.tolerance,
        ..IngestConfig::default()
    };

    // Load regions (cache only when every ward is wanted)
    let registry = ScheduleRegistry::from_config(&config);
    let use_cache = !args.no_cache && (args.cache.is_some() || config.wards == WardFilter::All);
    let report = if use_cache {
        let cache = args.cache.clone().unwrap_or_else(|| default_cache_path(&data));
        registry.load_cached(&data, &cache, &config)
    } else {
        registry.load_dir(&data, &config)
    }
    .with_context(|| format!("loading {}", data.display()))?;
    info!(?report, "data loaded");

    // Attach dates
    let generation = registry.snapshot();
    if let Some(source) = date_source(&args, &data)? {
        let dates = generation.populate_dates(source.as_ref());
        info!(?dates, "dates attached");
    }

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let policy = config.status;

    match args.command {
        Commands::Stats => {
            let stats = generation.stats();
            println!("Schedule statistics (generation {}):", generation.id());
            println!("  Sections: {}", stats.sections);
            println!("  Roads: {}", stats.roads);
            println!("  Polygons: {}", stats.polygons);
            println!("  Polylines: {}", stats.polylines);
            println!("  With dates: {}", stats.dated);
            if report.files_failed > 0 || report.features_skipped > 0 {
                println!(
                    "  Skipped: {} files, {} features",
                    report.files_failed, report.features_skipped
                );
            }
        }

        Commands::List { tier } => {
            let wanted = tier.map(StatusTier::from);
            for (_, entity) in generation.handles() {
                let t = policy.status_tier(&entity.dates(), today);
                if wanted.map_or(true, |w| w == t) {
                    println!("{}", describe(entity, today, &policy));
                }
            }
        }

        Commands::Hit { lat, lon } => {
            let point = sweepdb_core::GeographicPoint::new(lat, lon)?;
            match generation.hit_test(&point) {
                Some((_, entity)) => println!("{}", describe(entity, today, &policy)),
                None => println!("Nothing at {lat}, {lon}"),
            }
        }

        Commands::Search { query } => {
            let matches = generation.search_label(&query);
            if matches.is_empty() {
                println!("No labels found matching: {query}");
            } else {
                for (_, entity) in matches {
                    println!("{}", describe(entity, today, &policy));
                }
            }
        }

        Commands::Section { ward, section } => {
            let key = sweepdb_core::ScheduleKey::Section { ward, section };
            show(&generation, &key, today, &policy);
        }

        Commands::Road { id } => {
            let key = sweepdb_core::ScheduleKey::Road { id };
            show(&generation, &key, today, &policy);
        }
    }

    Ok(())
}

/// `-v` count to a default filter; `RUST_LOG` overrides it.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn date_source(args: &CliArgs, data: &Path) -> anyhow::Result<Option<Box<dyn DateSource>>> {
    #[cfg(feature = "fetch")]
    if let Some(url) = &args.dates_url {
        let source = sweepdb_core::HttpDateSource::new(
            url.as_str(),
            sweepdb_core::HttpDateSource::DEFAULT_TIMEOUT,
        )?;
        return Ok(Some(Box::new(source)));
    }

    let path = match &args.dates {
        Some(p) => p.clone(),
        None => {
            let p = data.join(sweepdb_core::loader::DATES_FILE);
            if !p.is_file() {
                return Ok(None);
            }
            p
        }
    };
    let file = LocalDatesFile::load(&path).with_context(|| format!("reading {}", path.display()))?;
    Ok(Some(Box::new(file)))
}

fn describe(entity: &ScheduleEntity, today: NaiveDate, policy: &StatusPolicy) -> String {
    let dates = entity.dates();
    let tier = policy.status_tier(&dates, today);
    let next: Vec<String> = policy
        .next_relevant_dates(&dates, today)
        .iter()
        .map(|d| d.to_string())
        .collect();
    let next = if next.is_empty() {
        "no dates".to_owned()
    } else {
        next.join(", ")
    };
    format!("[{tier:>6}] {} ({}): {next}", entity.label, entity.key)
}

fn show(generation: &Generation, key: &sweepdb_core::ScheduleKey, today: NaiveDate, policy: &StatusPolicy) {
    match generation.find(key) {
        Some((_, entity)) => {
            println!("{}", describe(entity, today, policy));
            if let Some(road) = &entity.road {
                if let (Some(w), Some(s)) = (road.ward, road.section) {
                    println!("  Ward {w}, section {s}");
                }
                if let Some(status) = &road.status {
                    println!("  Status: {status}");
                }
            }
            println!("  Geometries: {}", entity.geometries.len());
        }
        None => eprintln!("No {key} loaded"),
    }
}
