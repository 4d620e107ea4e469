//! Workspace crate for `sweepdb-core` and `sweepdb-cli`.
//!
//! Re-exports the core library and a prelude for the demos under `demos/`.

pub use sweepdb_core::*;

pub mod prelude {
    pub use sweepdb_core::{
        default_data_dir, next_relevant_dates, status_tier, DateSource, EntityHandle,
        GeographicPoint, Generation, IngestConfig, IngestReport, LocalDatesFile, NameMatch,
        OverlayStyle, Result, ScheduleEntity, ScheduleKey, ScheduleRegistry, StatusPolicy,
        StatusTier, SweepError, WardFilter,
    };
}
