// crates/sweepdb-core/src/common.rs
use serde::{Deserialize, Serialize};

/// Simple aggregate statistics for a registry generation.
///
/// Returned by [`Generation::stats`](crate::Generation::stats), these counts
/// reflect the materialized entity set after ward filtering and after any
/// empty entities were dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub sections: usize,
    pub roads: usize,
    pub polygons: usize,
    pub polylines: usize,
    /// Entities whose date list is non-empty.
    pub dated: usize,
}

/// Counts from one ingestion pass, for the caller to log or display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub files_read: usize,
    /// Files skipped as unreadable or structurally invalid.
    pub files_failed: usize,
    /// Ward directories left out by the ward filter.
    pub wards_skipped: usize,
    pub entities: usize,
    pub geometries: usize,
    pub features_skipped: usize,
    /// Files that parsed but yielded no usable geometry.
    pub empty_files: usize,
}

impl IngestReport {
    pub(crate) fn absorb(&mut self, other: IngestReport) {
        self.files_read += other.files_read;
        self.files_failed += other.files_failed;
        self.wards_skipped += other.wards_skipped;
        self.entities += other.entities;
        self.geometries += other.geometries;
        self.features_skipped += other.features_skipped;
        self.empty_files += other.empty_files;
    }
}
