// crates/sweepdb-core/src/model/entity.rs
use super::geometry::Geometry;
use crate::traits::NameMatch;
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Identity of a schedule region: an area section or a single road.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScheduleKey {
    Section { ward: u32, section: u32 },
    Road { id: u64 },
}

impl fmt::Display for ScheduleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleKey::Section { ward, section } => write!(f, "ward {ward} / section {section}"),
            ScheduleKey::Road { id } => write!(f, "road #{id}"),
        }
    }
}

/// Optional per-feature properties of road-list files.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadMeta {
    pub ward: Option<u32>,
    pub section: Option<u32>,
    pub status: Option<String>,
}

/// A cleaning-date list that is swapped as a whole.
///
/// Readers take an `Arc` snapshot and never see a half-written list; the
/// single writer replaces the value under a short write lock.
pub struct DateList(RwLock<Arc<[NaiveDate]>>);

impl DateList {
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self(RwLock::new(dates.into()))
    }

    #[inline]
    pub fn snapshot(&self) -> Arc<[NaiveDate]> {
        Arc::clone(&self.0.read())
    }

    pub fn replace(&self, dates: Vec<NaiveDate>) {
        *self.0.write() = dates.into();
    }
}

impl Default for DateList {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Clone for DateList {
    fn clone(&self) -> Self {
        Self(RwLock::new(self.snapshot()))
    }
}

impl fmt::Debug for DateList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.snapshot().iter()).finish()
    }
}

impl Serialize for DateList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let dates = self.snapshot();
        dates[..].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DateList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<NaiveDate>::deserialize(deserializer).map(DateList::new)
    }
}

/// A region or street with its geometries and cleaning dates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleEntity {
    pub key: ScheduleKey,
    /// Neighbourhood name for sections, street name for roads.
    pub label: String,
    pub road: Option<RoadMeta>,
    pub geometries: Vec<Geometry>,
    dates: DateList,
}

impl ScheduleEntity {
    pub fn section(ward: u32, section: u32, label: impl Into<String>) -> Self {
        Self {
            key: ScheduleKey::Section { ward, section },
            label: label.into(),
            road: None,
            geometries: Vec::new(),
            dates: DateList::default(),
        }
    }

    pub fn road(id: u64, label: impl Into<String>, meta: RoadMeta) -> Self {
        Self {
            key: ScheduleKey::Road { id },
            label: label.into(),
            road: Some(meta),
            geometries: Vec::new(),
            dates: DateList::default(),
        }
    }

    pub fn ward(&self) -> Option<u32> {
        match self.key {
            ScheduleKey::Section { ward, .. } => Some(ward),
            ScheduleKey::Road { .. } => self.road.as_ref().and_then(|r| r.ward),
        }
    }

    pub fn section_number(&self) -> Option<u32> {
        match self.key {
            ScheduleKey::Section { section, .. } => Some(section),
            ScheduleKey::Road { .. } => self.road.as_ref().and_then(|r| r.section),
        }
    }

    /// Current date list, unsorted, exactly as the date source delivered it.
    #[inline]
    pub fn dates(&self) -> Arc<[NaiveDate]> {
        self.dates.snapshot()
    }

    pub fn set_dates(&self, dates: Vec<NaiveDate>) {
        self.dates.replace(dates);
    }
}

impl NameMatch for ScheduleEntity {
    fn name_str(&self) -> &str {
        &self.label
    }
}
