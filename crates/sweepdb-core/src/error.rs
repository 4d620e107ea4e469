// crates/sweepdb-core/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while ingesting region files, resolving dates or
/// talking to the registry.
///
/// Most variants are *per-item*: the loader logs them, counts them in the
/// [`IngestReport`](crate::IngestReport) and moves on. Only whole-pass
/// preconditions (a data root that does not exist) reach the caller.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The file could not be read or is not the expected JSON shape.
    #[error("malformed file {path}: {reason}")]
    MalformedFile { path: PathBuf, reason: String },

    /// A `features` entry that is not a feature object at all.
    #[error("feature {index}: malformed feature: {reason}")]
    MalformedFeature { index: usize, reason: String },

    /// A feature lacks a property the current file mode requires.
    #[error("feature {index}: missing required field `{field}`")]
    MissingRequiredField { index: usize, field: &'static str },

    /// Geometry kinds other than Polygon, MultiPolygon and LineString.
    #[error("feature {index}: unsupported geometry type `{kind}`")]
    UnsupportedGeometryType { index: usize, kind: String },

    /// Coordinates are present but violate the ring/line/range invariants.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A file produced no usable geometry, so no entity is registered for it.
    #[error("no usable geometry in {0}")]
    EmptyEntity(PathBuf),

    #[error("unparsable date `{0}`")]
    UnparsableDate(String),

    /// The handle belongs to a generation that has since been replaced.
    #[error("entity not found (generation {generation}, index {index})")]
    EntityNotFound { generation: u64, index: usize },

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Bincode(#[from] bincode::Error),

    #[cfg(feature = "fetch")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl SweepError {
    /// Shorthand used by the parser when the file itself is unusable.
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SweepError::MalformedFile {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SweepError>;
