// crates/sweepdb-core/src/overlay.rs
use crate::model::{Bounds, GeographicPoint, Geometry, ScheduleEntity};
use crate::registry::EntityHandle;

/// A drawable geometry and the entity it belongs to.
///
/// The handle is a lookup key only; resolving it against a newer
/// generation fails instead of dangling.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub geometry: Geometry,
    pub entity: EntityHandle,
    /// Pre-filter box, grown by the touch tolerance for open paths.
    bounds: Option<Bounds>,
}

impl Overlay {
    fn hit(&self, p: &GeographicPoint, tolerance_m: f64) -> bool {
        if !self.bounds.is_some_and(|b| b.contains(p)) {
            return false;
        }
        match &self.geometry {
            Geometry::Polygon(poly) => poly.contains(p),
            Geometry::Polyline(line) => line.distance_m(p) <= tolerance_m,
        }
    }
}

/// Overlays in registration order. Later entries draw on top and win
/// hit-tests on overlap.
#[derive(Debug, Clone)]
pub struct OverlayIndex {
    overlays: Vec<Overlay>,
    touch_tolerance_m: f64,
}

impl OverlayIndex {
    pub fn new(touch_tolerance_m: f64) -> Self {
        Self {
            overlays: Vec::new(),
            touch_tolerance_m,
        }
    }

    /// One overlay per geometry, entities in arena order.
    pub fn from_entities(generation: u64, entities: &[ScheduleEntity], touch_tolerance_m: f64) -> Self {
        let mut index = Self::new(touch_tolerance_m);
        for (i, entity) in entities.iter().enumerate() {
            let handle = EntityHandle::new(generation, i);
            for geometry in &entity.geometries {
                index.push(geometry.clone(), handle);
            }
        }
        index
    }

    pub fn push(&mut self, geometry: Geometry, entity: EntityHandle) {
        let bounds = match &geometry {
            Geometry::Polygon(_) => geometry.bounds(),
            Geometry::Polyline(_) => geometry
                .bounds()
                .map(|b| b.expanded_m(self.touch_tolerance_m)),
        };
        self.overlays.push(Overlay {
            geometry,
            entity,
            bounds,
        });
    }

    /// Topmost overlay under `p`, scanning from the last registered.
    pub fn hit_test_overlay(&self, p: &GeographicPoint) -> Option<&Overlay> {
        self.overlays
            .iter()
            .rev()
            .find(|o| o.hit(p, self.touch_tolerance_m))
    }

    pub fn hit_test(&self, p: &GeographicPoint) -> Option<EntityHandle> {
        self.hit_test_overlay(p).map(|o| o.entity)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    #[inline]
    pub fn touch_tolerance_m(&self) -> f64 {
        self.touch_tolerance_m
    }
}
