// crates/sweepdb-core/src/registry.rs

//! # Schedule Registry
//!
//! Holds the current [`Generation`]: the entity arena plus the overlay
//! index built from it. Reloads build a complete new generation off to the
//! side and swap it in under a brief write lock, so readers always see one
//! generation or the other, never a mix.

use crate::common::RegistryStats;
use crate::config::{IngestConfig, DEFAULT_TOUCH_TOLERANCE_M};
use crate::error::{Result, SweepError};
use crate::model::{GeographicPoint, Geometry, ScheduleEntity, ScheduleKey};
use crate::overlay::OverlayIndex;
use crate::status::{StatusPolicy, StatusTier};
use crate::style::OverlayStyle;
use crate::traits::NameMatch;
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Stable reference to an entity inside one generation's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    pub generation: u64,
    pub index: usize,
}

impl EntityHandle {
    #[inline]
    pub const fn new(generation: u64, index: usize) -> Self {
        Self { generation, index }
    }
}

/// One immutable entity set and its overlays.
#[derive(Debug)]
pub struct Generation {
    id: u64,
    entities: Vec<ScheduleEntity>,
    overlays: OverlayIndex,
}

impl Generation {
    fn build(id: u64, entities: Vec<ScheduleEntity>, touch_tolerance_m: f64) -> Self {
        let overlays = OverlayIndex::from_entities(id, &entities, touch_tolerance_m);
        Self {
            id,
            entities,
            overlays,
        }
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn entities(&self) -> &[ScheduleEntity] {
        &self.entities
    }

    #[inline]
    pub fn overlays(&self) -> &OverlayIndex {
        &self.overlays
    }

    pub fn handles(&self) -> impl Iterator<Item = (EntityHandle, &ScheduleEntity)> {
        let id = self.id;
        self.entities
            .iter()
            .enumerate()
            .map(move |(i, e)| (EntityHandle::new(id, i), e))
    }

    /// `None` when the handle is from another generation or out of range.
    pub fn entity(&self, handle: EntityHandle) -> Option<&ScheduleEntity> {
        if handle.generation != self.id {
            return None;
        }
        self.entities.get(handle.index)
    }

    pub fn find(&self, key: &ScheduleKey) -> Option<(EntityHandle, &ScheduleEntity)> {
        self.handles().find(|(_, e)| e.key == *key)
    }

    /// Accent- and case-insensitive substring search on labels.
    pub fn search_label(&self, query: &str) -> Vec<(EntityHandle, &ScheduleEntity)> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        self.handles().filter(|(_, e)| e.name_contains(query)).collect()
    }

    /// Entity under `p`, topmost overlay first.
    pub fn hit_test(&self, p: &GeographicPoint) -> Option<(EntityHandle, &ScheduleEntity)> {
        let handle = self.overlays.hit_test(p)?;
        self.entity(handle).map(|e| (handle, e))
    }

    pub fn status(&self, handle: EntityHandle, today: NaiveDate, policy: &StatusPolicy) -> Option<StatusTier> {
        self.entity(handle)
            .map(|e| policy.status_tier(&e.dates(), today))
    }

    /// Style request for every overlay, in draw order.
    pub fn styles(&self, today: NaiveDate, policy: &StatusPolicy) -> Vec<(&Geometry, OverlayStyle)> {
        self.overlays
            .iter()
            .filter_map(|o| {
                let tier = self.status(o.entity, today, policy)?;
                Some((&o.geometry, OverlayStyle::for_overlay(tier, &o.geometry)))
            })
            .collect()
    }

    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats::default();
        for e in &self.entities {
            match e.key {
                ScheduleKey::Section { .. } => stats.sections += 1,
                ScheduleKey::Road { .. } => stats.roads += 1,
            }
            if !e.dates().is_empty() {
                stats.dated += 1;
            }
            for g in &e.geometries {
                match g {
                    Geometry::Polygon(_) => stats.polygons += 1,
                    Geometry::Polyline(_) => stats.polylines += 1,
                }
            }
        }
        stats
    }
}

/// Owner of the current generation.
#[derive(Debug)]
pub struct ScheduleRegistry {
    current: RwLock<Arc<Generation>>,
    last_id: AtomicU64,
    touch_tolerance_m: f64,
}

impl Default for ScheduleRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_TOUCH_TOLERANCE_M)
    }
}

impl ScheduleRegistry {
    /// Starts out with an empty generation 0.
    pub fn new(touch_tolerance_m: f64) -> Self {
        Self {
            current: RwLock::new(Arc::new(Generation::build(0, Vec::new(), touch_tolerance_m))),
            last_id: AtomicU64::new(0),
            touch_tolerance_m,
        }
    }

    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(config.touch_tolerance_m)
    }

    /// The generation readers should use for one render or one query.
    #[inline]
    pub fn snapshot(&self) -> Arc<Generation> {
        Arc::clone(&self.current.read())
    }

    /// Replace the whole entity set. Entities without geometry are dropped.
    ///
    /// Returns the id of the generation current afterwards. When two
    /// replacements overlap, the one started last wins; a build that
    /// finishes after a newer generation is already installed is dropped.
    pub fn replace(&self, entities: Vec<ScheduleEntity>) -> u64 {
        let before = entities.len();
        let entities: Vec<ScheduleEntity> = entities
            .into_iter()
            .filter(|e| !e.geometries.is_empty())
            .collect();
        if entities.len() != before {
            warn!(dropped = before - entities.len(), "dropping entities without geometry");
        }
        self.install(self.build_next(entities))
    }

    fn build_next(&self, entities: Vec<ScheduleEntity>) -> Arc<Generation> {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        Arc::new(Generation::build(id, entities, self.touch_tolerance_m))
    }

    /// Swap `generation` in unless a newer one got there first.
    fn install(&self, generation: Arc<Generation>) -> u64 {
        let mut current = self.current.write();
        if current.id > generation.id {
            warn!(
                stale = generation.id,
                current = current.id,
                "discarding generation built before the current one"
            );
            return current.id;
        }
        info!(
            generation = generation.id,
            entities = generation.entities.len(),
            overlays = generation.overlays.len(),
            "swapping in new generation"
        );
        *current = generation;
        current.id
    }

    /// Swap the whole date list of one entity.
    pub fn set_dates(&self, handle: EntityHandle, dates: Vec<NaiveDate>) -> Result<()> {
        let generation = self.snapshot();
        let entity = generation
            .entity(handle)
            .ok_or(SweepError::EntityNotFound {
                generation: handle.generation,
                index: handle.index,
            })?;
        entity.set_dates(dates);
        Ok(())
    }

    pub fn hit_test(&self, p: &GeographicPoint) -> Option<EntityHandle> {
        self.snapshot().overlays.hit_test(p)
    }

    #[inline]
    pub fn touch_tolerance_m(&self) -> f64 {
        self.touch_tolerance_m
    }
}
