// crates/sweepdb-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the Physical Layer (directory walk, I/O, decompression) and
//! delegates each file to the [`parser`](crate::parser).
//!
//! Expected layout:
//!
//! ```text
//! <root>/ward_44/*.geojson     area files, one section each
//! <root>/ward_43/*.geojson.gz  (gzip needs the 'compact' feature)
//! <root>/roads/*.geojson       road-list files
//! <root>/dates.json            optional local date source
//! ```
//!
//! Ward directories are read in ascending ward order and files in name
//! order, area files before road files. That order is the overlay
//! registration order, so it decides which overlay is on top.

pub mod common_io;
mod snapshot;

pub use snapshot::{default_cache_path, CompressionMode, SNAPSHOT_SUFFIX};

use crate::common::IngestReport;
use crate::config::IngestConfig;
use crate::error::{Result, SweepError};
use crate::model::ScheduleEntity;
use crate::parser::{self, FileMode, ParsedFile};
use crate::registry::ScheduleRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

pub const ROADS_DIR: &str = "roads";
pub const DATES_FILE: &str = "dates.json";

/// The sample data set shipped with this crate.
pub fn default_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Entities from one ingestion pass, in registration order.
#[derive(Debug, Default)]
pub struct Ingested {
    pub entities: Vec<ScheduleEntity>,
    pub report: IngestReport,
}

/// Parse a single region file.
pub fn parse_file(path: &Path, mode: FileMode) -> Result<ParsedFile> {
    let reader = common_io::open_stream(path)?;
    parser::parse_reader(reader, path, mode)
}

/// Walk `root` and parse every enabled ward and every road file.
///
/// Only a missing `root` is an error; unreadable or malformed files are
/// logged, counted and skipped.
pub fn ingest_dir(root: &Path, config: &IngestConfig) -> Result<Ingested> {
    if !root.is_dir() {
        return Err(SweepError::NotFound(format!(
            "data directory {}",
            root.display()
        )));
    }

    let mut out = Ingested::default();

    for (ward, dir) in ward_dirs(root)? {
        if !config.wards.allows(ward) {
            debug!(ward, "ward disabled; skipping directory");
            out.report.wards_skipped += 1;
            continue;
        }
        ingest_files(&dir, FileMode::Area, &mut out);
    }

    let roads = root.join(ROADS_DIR);
    if roads.is_dir() {
        ingest_files(&roads, FileMode::Road, &mut out);
    }

    info!(
        root = %root.display(),
        files = out.report.files_read,
        failed = out.report.files_failed,
        entities = out.report.entities,
        geometries = out.report.geometries,
        skipped = out.report.features_skipped,
        "ingestion pass finished"
    );
    Ok(out)
}

fn ward_dirs(root: &Path) -> Result<Vec<(u32, PathBuf)>> {
    let mut dirs: Vec<(u32, PathBuf)> = std::fs::read_dir(root)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .filter_map(|p| common_io::ward_dir_id(&p).map(|id| (id, p)))
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn ingest_files(dir: &Path, mode: FileMode, out: &mut Ingested) {
    let files = match common_io::region_files(dir) {
        Ok(files) => files,
        Err(e) => {
            warn!(dir = %dir.display(), "cannot list directory: {e}");
            return;
        }
    };

    for path in files {
        match parse_file(&path, mode) {
            Ok(parsed) => {
                out.report.absorb(IngestReport {
                    files_read: 1,
                    entities: parsed.entities.len(),
                    geometries: parsed.geometry_count(),
                    features_skipped: parsed.skipped_features(),
                    empty_files: usize::from(parsed.entities.is_empty()),
                    ..IngestReport::default()
                });
                out.entities.extend(parsed.entities);
            }
            Err(e) => {
                warn!(file = %path.display(), "skipping file: {e}");
                out.report.files_failed += 1;
            }
        }
    }
}

impl ScheduleRegistry {
    /// Ingest `root` and swap the result in as the new generation.
    pub fn load_dir(&self, root: impl AsRef<Path>, config: &IngestConfig) -> Result<IngestReport> {
        let Ingested { entities, report } = ingest_dir(root.as_ref(), config)?;
        self.replace(entities);
        Ok(report)
    }
}

/// Run [`ScheduleRegistry::load_dir`] on a worker thread.
///
/// The current generation keeps serving readers until the new one is
/// complete; a failed pass leaves it in place.
pub fn reload_in_background(
    registry: Arc<ScheduleRegistry>,
    root: PathBuf,
    config: IngestConfig,
) -> std::io::Result<JoinHandle<Result<IngestReport>>> {
    thread::Builder::new()
        .name("sweepdb-ingest".into())
        .spawn(move || registry.load_dir(&root, &config))
}
