// crates/sweepdb-core/src/loader/common_io.rs
use crate::error::{Result, SweepError};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[cfg(feature = "compact")]
use flate2::read::GzDecoder;

/// `true` for `*.gz` paths.
pub fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Opens a file, buffers it, and wraps `.gz` files in a Gzip decoder, so
/// the caller doesn't care about the compression.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)
        .map_err(|e| SweepError::NotFound(format!("{}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);

    if is_gzip(path) {
        #[cfg(feature = "compact")]
        {
            return Ok(Box::new(GzDecoder::new(reader)));
        }

        #[cfg(not(feature = "compact"))]
        {
            return Err(SweepError::malformed(
                path,
                "gzip input requires the 'compact' feature",
            ));
        }
    }

    Ok(Box::new(reader))
}

/// Region files: `*.geojson`, plus `*.geojson.gz` (decoded by [`open_stream`]).
pub fn is_region_file(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n.to_ascii_lowercase(),
        None => return false,
    };
    name.ends_with(".geojson") || name.ends_with(".geojson.gz")
}

/// Region files directly inside `dir`, sorted by file name.
pub fn region_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_region_file(p))
        .collect();
    files.sort();
    Ok(files)
}

/// `ward_44` -> `Some(44)`.
pub fn ward_dir_id(path: &Path) -> Option<u32> {
    path.file_name()?
        .to_str()?
        .strip_prefix("ward_")?
        .parse()
        .ok()
}

pub fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
