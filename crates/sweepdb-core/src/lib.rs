// crates/sweepdb-core/src/lib.rs

//! # sweepdb-core
//!
//! Street-cleaning schedule map engine: parses ward/section area files and
//! road-list files into geometries, attaches cleaning dates, classifies
//! urgency and answers "what is under this tap?".
//!
//! ```no_run
//! use sweepdb_core::{IngestConfig, LocalDatesFile, ScheduleRegistry, GeographicPoint};
//!
//! # fn main() -> sweepdb_core::Result<()> {
//! let registry = ScheduleRegistry::default();
//! registry.load_dir("data", &IngestConfig::default())?;
//!
//! let generation = registry.snapshot();
//! generation.populate_dates(&LocalDatesFile::load("data/dates.json")?);
//!
//! if let Some((_, entity)) = generation.hit_test(&GeographicPoint::new(41.94, -87.65)?) {
//!     println!("{} ({})", entity.label, entity.key);
//! }
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod config;
pub mod dates;
pub mod error;
pub mod loader;
pub mod model;
pub mod overlay;
pub mod parser;
pub mod registry;
pub mod status;
pub mod style;
pub mod text;
pub mod traits;
// Serde shapes of the input files
#[doc(hidden)]
pub mod raw;

// Re-exports
pub use crate::common::{IngestReport, RegistryStats};
pub use crate::config::{IngestConfig, WardFilter, DEFAULT_TOUCH_TOLERANCE_M};
#[cfg(feature = "fetch")]
pub use crate::dates::HttpDateSource;
pub use crate::dates::{parse_dates, DateSource, DatesReport, LocalDatesFile};
pub use crate::error::{Result, SweepError};
pub use crate::loader::{default_cache_path, default_data_dir, ingest_dir, parse_file, reload_in_background};
pub use crate::model::{
    GeographicPoint, Geometry, Polygon, Polyline, RoadMeta, ScheduleEntity, ScheduleKey,
};
pub use crate::overlay::{Overlay, OverlayIndex};
pub use crate::parser::{FileMode, ParsedFile};
pub use crate::registry::{EntityHandle, Generation, ScheduleRegistry};
pub use crate::status::{next_relevant_dates, status_tier, StatusPolicy, StatusTier};
pub use crate::style::{OverlayStyle, Rgba};
pub use crate::traits::NameMatch;
