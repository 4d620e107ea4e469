use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use sweepdb_core::{StatusTier, WardFilter, DEFAULT_TOUCH_TOLERANCE_M};

/// CLI arguments for sweepdb
#[derive(Debug, Parser)]
#[command(
    name = "sweepdb",
    version,
    about = "CLI for inspecting street-cleaning schedule data (ward sections and roads)"
)]
pub struct CliArgs {
    /// Data directory with ward_<N>/ and roads/ (default: sample data bundled with sweepdb-core)
    #[arg(short = 'd', long = "data", global = true)]
    pub data: Option<PathBuf>,

    /// Wards to load: `all` or a comma-separated list (e.g. 44,43)
    #[arg(short = 'w', long = "wards", global = true, default_value = "all")]
    pub wards: WardFilter,

    /// Dates file (default: <data>/dates.json when present)
    #[arg(long = "dates", global = true)]
    pub dates: Option<PathBuf>,

    /// Fetch dates from a schedule service instead of a file
    #[cfg(feature = "fetch")]
    #[arg(long = "dates-url", global = true, conflicts_with = "dates")]
    pub dates_url: Option<String>,

    /// Reference day for status tiers (default: today, local time)
    #[arg(long = "today", global = true)]
    pub today: Option<NaiveDate>,

    /// Touch radius around streets, in metres
    #[arg(long = "tolerance", global = true, default_value_t = DEFAULT_TOUCH_TOLERANCE_M)]
    pub tolerance: f64,

    /// Snapshot cache path (default: <data>/<dirname>.snap.bin.gz)
    #[arg(long = "cache", global = true)]
    pub cache: Option<PathBuf>,

    /// Always parse the source files and leave the cache alone
    #[arg(long = "no-cache", global = true, conflicts_with = "cache")]
    pub no_cache: bool,

    /// More logging (-v info, -vv debug, -vvv trace); RUST_LOG wins when set
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of the loaded data
    Stats,

    /// List all sections and roads with their status
    List {
        /// Only show entities in this tier
        #[arg(long = "tier", value_enum)]
        tier: Option<TierArg>,
    },

    /// What is drawn at this coordinate?
    Hit {
        /// Latitude in degrees
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees (negative west of Greenwich)
        #[arg(allow_hyphen_values = true)]
        lon: f64,
    },

    /// Search labels containing a substring (accent- and case-insensitive)
    Search {
        query: String,
    },

    /// Show one ward section
    Section {
        ward: u32,
        section: u32,
    },

    /// Show one road by id
    Road {
        id: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TierArg {
    Urgent,
    Soon,
    Clear,
}

impl From<TierArg> for StatusTier {
    fn from(t: TierArg) -> Self {
        match t {
            TierArg::Urgent => StatusTier::Urgent,
            TierArg::Soon => StatusTier::Soon,
            TierArg::Clear => StatusTier::Clear,
        }
    }
}
