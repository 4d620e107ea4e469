// crates/sweepdb-core/src/loader/snapshot.rs

use super::{common_io, ingest_dir, Ingested, DATES_FILE, ROADS_DIR};
use crate::common::IngestReport;
use crate::config::IngestConfig;
use crate::error::{Result, SweepError};
use crate::model::ScheduleEntity;
use crate::registry::{Generation, ScheduleRegistry};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

#[cfg(feature = "compact")]
use flate2::{write::GzEncoder, Compression};

// -----------------------------------------------------------------------------
// CONFIGURATION
// -----------------------------------------------------------------------------

#[cfg(not(feature = "compact"))]
pub const SNAPSHOT_SUFFIX: &str = ".snap.bin";
#[cfg(feature = "compact")]
pub const SNAPSHOT_SUFFIX: &str = ".snap.bin.gz";

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy)]
pub enum CompressionMode {
    Gzip,
    None,
}

impl CompressionMode {
    /// Follows the file extension, matching what [`common_io::open_stream`]
    /// expects when reading it back.
    pub fn for_path(path: &Path) -> Self {
        if common_io::is_gzip(path) {
            CompressionMode::Gzip
        } else {
            CompressionMode::None
        }
    }
}

#[derive(Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    entities: Vec<ScheduleEntity>,
}

// -----------------------------------------------------------------------------
// RUNTIME HELPERS
// -----------------------------------------------------------------------------

impl Generation {
    /// Persist this generation's entities, dates included.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        write_snapshot(path, self.entities(), CompressionMode::for_path(path))
    }
}

impl ScheduleRegistry {
    /// Replace the current generation with a stored snapshot.
    pub fn load_snapshot(&self, path: impl AsRef<Path>) -> Result<usize> {
        let entities = read_snapshot(path.as_ref())?;
        let count = entities.len();
        self.replace(entities);
        Ok(count)
    }

    /// **Smart Load:** reuse `cache` when it is newer than every source
    /// file under `root`, otherwise ingest and rewrite it.
    ///
    /// The ward filter is applied when ingesting; a cache written under one
    /// filter is reused as-is, so callers that change the filter should
    /// point at a different cache path.
    pub fn load_cached(&self, root: impl AsRef<Path>, cache: impl AsRef<Path>, config: &IngestConfig) -> Result<IngestReport> {
        let (root, cache) = (root.as_ref(), cache.as_ref());

        // 1. Check Cache
        if is_cache_fresh(root, cache) {
            match read_snapshot(cache) {
                Ok(entities) => {
                    info!(cache = %cache.display(), entities = entities.len(), "using snapshot cache");
                    let report = IngestReport {
                        entities: entities.len(),
                        geometries: entities.iter().map(|e| e.geometries.len()).sum(),
                        ..IngestReport::default()
                    };
                    self.replace(entities);
                    return Ok(report);
                }
                Err(e) => warn!(cache = %cache.display(), "snapshot unreadable, rebuilding: {e}"),
            }
        }

        // 2. Build
        let Ingested { entities, report } = ingest_dir(root, config)?;
        self.replace(entities);

        // 3. Cache (best effort)
        if let Err(e) = self.snapshot().save_snapshot(cache) {
            warn!(cache = %cache.display(), "could not write snapshot: {e}");
        }
        Ok(report)
    }
}

/// Default cache location for a data root: `<root>/<dirname>.snap.bin[.gz]`.
pub fn default_cache_path(root: &Path) -> PathBuf {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sweepdb".to_owned());
    root.join(format!("{name}{SNAPSHOT_SUFFIX}"))
}

// -----------------------------------------------------------------------------
// FRESHNESS
// -----------------------------------------------------------------------------

fn is_cache_fresh(root: &Path, cache: &Path) -> bool {
    let cache_time = match common_io::modified(cache) {
        Some(t) => t,
        None => return false,
    };
    match newest_source(root) {
        Some(source_time) => source_time <= cache_time,
        None => false,
    }
}

/// Latest mtime across region files and the dates file.
fn newest_source(root: &Path) -> Option<SystemTime> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(root)
        .ok()?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_dir() && common_io::ward_dir_id(p).is_some())
        .collect();
    dirs.push(root.join(ROADS_DIR));

    let mut newest = common_io::modified(&root.join(DATES_FILE));
    for dir in dirs.iter().filter(|d| d.is_dir()) {
        for file in common_io::region_files(dir).ok()? {
            newest = newest.max(common_io::modified(&file));
        }
    }
    newest
}

// -----------------------------------------------------------------------------
// GENERIC READ / WRITE
// -----------------------------------------------------------------------------

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    entities: &'a [ScheduleEntity],
}

fn write_snapshot(path: &Path, entities: &[ScheduleEntity], compression: CompressionMode) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let snap = SnapshotRef {
        version: SNAPSHOT_VERSION,
        entities,
    };

    match compression {
        CompressionMode::Gzip => {
            #[cfg(feature = "compact")]
            {
                let mut encoder = GzEncoder::new(writer, Compression::default());
                bincode::serialize_into(&mut encoder, &snap)?;
                // finish() writes the gzip trailer; flush() alone does not.
                encoder.finish()?.flush()?;
            }
            #[cfg(not(feature = "compact"))]
            {
                return Err(SweepError::malformed(
                    path,
                    "Gzip requested but 'compact' disabled",
                ));
            }
        }
        CompressionMode::None => {
            bincode::serialize_into(&mut writer, &snap)?;
            writer.flush()?;
        }
    }

    debug!(path = %path.display(), entities = entities.len(), "snapshot written");
    Ok(())
}

fn read_snapshot(path: &Path) -> Result<Vec<ScheduleEntity>> {
    let mut reader = common_io::open_stream(path)?;
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let snapshot: SnapshotFile = bincode::deserialize(&data)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SweepError::malformed(
            path,
            format!("snapshot version {} (expected {SNAPSHOT_VERSION})", snapshot.version),
        ));
    }
    Ok(snapshot.entities)
}
