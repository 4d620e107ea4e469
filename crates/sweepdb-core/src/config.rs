// crates/sweepdb-core/src/config.rs
use crate::status::StatusPolicy;
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;

/// Default radius, in metres, within which a tap counts as touching a
/// street drawn as a zero-width line.
pub const DEFAULT_TOUCH_TOLERANCE_M: f64 = 15.0;

/// Which ward directories an ingestion pass may read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WardFilter {
    #[default]
    All,
    Only(BTreeSet<u32>),
}

impl WardFilter {
    pub fn only(wards: impl IntoIterator<Item = u32>) -> Self {
        WardFilter::Only(wards.into_iter().collect())
    }

    #[inline]
    pub fn allows(&self, ward: u32) -> bool {
        match self {
            WardFilter::All => true,
            WardFilter::Only(set) => set.contains(&ward),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ward id `{0}`")]
pub struct WardFilterParseError(String);

/// Parses `"all"` or a comma-separated list such as `"44, 43,2"`.
impl FromStr for WardFilter {
    type Err = WardFilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(WardFilter::All);
        }
        s.split(',')
            .map(str::trim)
            .filter(|x| !x.is_empty())
            .map(|x| x.parse::<u32>().map_err(|_| WardFilterParseError(x.to_owned())))
            .collect::<Result<BTreeSet<_>, _>>()
            .map(WardFilter::Only)
    }
}

/// Everything an ingestion pass needs, passed in explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    pub wards: WardFilter,
    pub touch_tolerance_m: f64,
    pub status: StatusPolicy,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            wards: WardFilter::All,
            touch_tolerance_m: DEFAULT_TOUCH_TOLERANCE_M,
            status: StatusPolicy::default(),
        }
    }
}
