// crates/sweepdb-core/src/dates.rs

//! # Cleaning Dates
//!
//! Date sources deliver raw `"YYYY-MM-DD"` strings per schedule key; this
//! module turns them into calendar dates and writes them into a generation.
//! Unparsable strings are dropped one by one, the rest are kept.

use crate::error::{Result, SweepError};
use crate::loader::common_io;
use crate::model::ScheduleKey;
use crate::registry::{Generation, ScheduleRegistry};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Anything that can answer "which days is this region swept?".
///
/// `Ok(None)` means the source has no entry for the key.
pub trait DateSource {
    fn dates_for(&self, key: &ScheduleKey) -> Result<Option<Vec<String>>>;
}

/// Parse one date string.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| SweepError::UnparsableDate(s.to_owned()))
}

/// Parse all strings, dropping (and logging) the ones that do not parse.
/// Source order is kept; consumers sort.
pub fn parse_dates(raw: &[String]) -> Vec<NaiveDate> {
    parse_dates_counted(raw).0
}

fn parse_dates_counted(raw: &[String]) -> (Vec<NaiveDate>, usize) {
    let mut dropped = 0;
    let dates = raw
        .iter()
        .filter_map(|s| match parse_date(s) {
            Ok(d) => Some(d),
            Err(e) => {
                warn!("{e}");
                dropped += 1;
                None
            }
        })
        .collect();
    (dates, dropped)
}

// -----------------------------------------------------------------------------
// LOCAL FILE SOURCE
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DatesFileRaw {
    #[serde(default)]
    wards: Vec<WardDatesRaw>,
    #[serde(default)]
    roads: Vec<RoadDatesRaw>,
}

#[derive(Debug, Deserialize)]
struct WardDatesRaw {
    ward: u32,
    #[serde(default)]
    sections: Vec<SectionDatesRaw>,
}

#[derive(Debug, Deserialize)]
struct SectionDatesRaw {
    section: u32,
    #[serde(default)]
    dates: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RoadDatesRaw {
    id: u64,
    #[serde(default)]
    dates: Vec<String>,
}

/// Bundled `dates.json`:
///
/// ```json
/// { "wards": [ { "ward": 44, "sections": [ { "section": 3, "dates": ["2024-06-03"] } ] } ],
///   "roads": [ { "id": 1201, "dates": ["2024-06-05"] } ] }
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocalDatesFile {
    entries: HashMap<ScheduleKey, Vec<String>>,
}

impl LocalDatesFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = common_io::open_stream(path)?;
        let raw: DatesFileRaw = serde_json::from_reader(reader)
            .map_err(|e| SweepError::malformed(path, e.to_string()))?;
        let file = Self::from_raw(raw);
        debug!(file = %path.display(), keys = file.entries.len(), "loaded dates file");
        Ok(file)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_raw(serde_json::from_slice(bytes)?))
    }

    fn from_raw(raw: DatesFileRaw) -> Self {
        let mut entries = HashMap::new();
        for w in raw.wards {
            for s in w.sections {
                entries.insert(
                    ScheduleKey::Section {
                        ward: w.ward,
                        section: s.section,
                    },
                    s.dates,
                );
            }
        }
        for r in raw.roads {
            entries.insert(ScheduleKey::Road { id: r.id }, r.dates);
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DateSource for LocalDatesFile {
    fn dates_for(&self, key: &ScheduleKey) -> Result<Option<Vec<String>>> {
        Ok(self.entries.get(key).cloned())
    }
}

// -----------------------------------------------------------------------------
// HTTP SOURCE
// -----------------------------------------------------------------------------

/// Queries `{base}/cleaning-dates?ward=W&section=S` (or `?road=ID`) and
/// expects `{ "cleaning_dates": [...] }`. One attempt per key; retries are
/// up to the caller.
#[cfg(feature = "fetch")]
pub struct HttpDateSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "fetch")]
impl HttpDateSource {
    pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client,
        })
    }
}

#[cfg(feature = "fetch")]
#[derive(Debug, Deserialize)]
struct CleaningDatesResponse {
    cleaning_dates: Vec<String>,
}

#[cfg(feature = "fetch")]
impl DateSource for HttpDateSource {
    fn dates_for(&self, key: &ScheduleKey) -> Result<Option<Vec<String>>> {
        let query: Vec<(&str, String)> = match key {
            ScheduleKey::Section { ward, section } => {
                vec![("ward", ward.to_string()), ("section", section.to_string())]
            }
            ScheduleKey::Road { id } => vec![("road", id.to_string())],
        };
        let response = self
            .client
            .get(format!("{}/cleaning-dates", self.base_url))
            .query(&query)
            .send()?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: CleaningDatesResponse = response.error_for_status()?.json()?;
        Ok(Some(body.cleaning_dates))
    }
}

// -----------------------------------------------------------------------------
// POPULATION
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatesReport {
    pub updated: usize,
    /// Entities the source had nothing for.
    pub missing: usize,
    /// Lookups that errored (network, bad payload).
    pub failed: usize,
    pub dates_dropped: usize,
}

impl Generation {
    /// Fetch and install dates for every entity.
    ///
    /// Roads without an entry of their own fall back to their ward/section
    /// schedule when both are known. Each list is swapped in whole.
    pub fn populate_dates(&self, source: &dyn DateSource) -> DatesReport {
        let mut report = DatesReport::default();
        for entity in self.entities() {
            let mut found = lookup(source, &entity.key, &mut report);
            if found.is_none() {
                if let (ScheduleKey::Road { .. }, Some(ward), Some(section)) =
                    (entity.key, entity.ward(), entity.section_number())
                {
                    found = lookup(source, &ScheduleKey::Section { ward, section }, &mut report);
                }
            }
            match found {
                Some(raw) => {
                    let (dates, dropped) = parse_dates_counted(&raw);
                    report.dates_dropped += dropped;
                    entity.set_dates(dates);
                    report.updated += 1;
                }
                None => report.missing += 1,
            }
        }
        info!(
            generation = self.id(),
            updated = report.updated,
            missing = report.missing,
            failed = report.failed,
            dropped = report.dates_dropped,
            "cleaning dates populated"
        );
        report
    }
}

impl ScheduleRegistry {
    /// [`Generation::populate_dates`] on the current generation.
    pub fn populate_dates(&self, source: &dyn DateSource) -> DatesReport {
        self.snapshot().populate_dates(source)
    }
}

fn lookup(source: &dyn DateSource, key: &ScheduleKey, report: &mut DatesReport) -> Option<Vec<String>> {
    match source.dates_for(key) {
        Ok(found) => found,
        Err(e) => {
            warn!(%key, "date lookup failed: {e}");
            report.failed += 1;
            None
        }
    }
}
