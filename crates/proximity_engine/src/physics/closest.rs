//! Closest-entity tracking
//!
//! Only identity changes of the nearest overlapping entity are observable;
//! distance changes alone never produce an event. Ties go to the entity seen
//! first in overlap order.

use super::BoundingVolume;
use crate::foundation::math::Vec3;
use crate::scene::Entity;

/// Change in the closest overlapping entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosestChange {
    /// Nothing was closest, now `0` is
    Set(Entity),
    /// `0` was closest, now nothing overlaps
    Cleared(Entity),
    /// `previous` lost the spot to `next`
    Replaced {
        /// Entity that is no longer closest
        previous: Entity,
        /// Entity that is now closest
        next: Entity,
    },
}

impl ClosestChange {
    /// Entity that stopped being closest, if any
    pub fn cleared(&self) -> Option<Entity> {
        match *self {
            Self::Cleared(e) | Self::Replaced { previous: e, .. } => Some(e),
            Self::Set(_) => None,
        }
    }

    /// Entity that became closest, if any
    pub fn set(&self) -> Option<Entity> {
        match *self {
            Self::Set(e) | Self::Replaced { next: e, .. } => Some(e),
            Self::Cleared(_) => None,
        }
    }
}

/// Nearest entity to `probe_center` by center distance
///
/// Entities whose volume cannot be resolved are ignored.
pub fn nearest<F>(overlapping: &[Entity], probe_center: Vec3, mut volume_of: F) -> Option<Entity>
where
    F: FnMut(Entity) -> Option<BoundingVolume>,
{
    let mut best: Option<(Entity, f32)> = None;
    for &entity in overlapping {
        let Some(volume) = volume_of(entity) else {
            continue;
        };
        let distance = volume.center_distance(probe_center);
        // strict comparison keeps the first of equidistant entities
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((entity, distance));
        }
    }
    best.map(|(entity, _)| entity)
}

/// Closest overlapping entity of the previous evaluation
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosestTracker {
    closest: Option<Entity>,
}

impl ClosestTracker {
    /// Tracker with nothing closest
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently closest entity
    pub fn closest(&self) -> Option<Entity> {
        self.closest
    }

    /// Recompute the nearest entity and report a change of identity
    pub fn update<F>(&mut self, overlapping: &[Entity], probe_center: Vec3, volume_of: F) -> Option<ClosestChange>
    where
        F: FnMut(Entity) -> Option<BoundingVolume>,
    {
        let next = nearest(overlapping, probe_center, volume_of);
        let change = match (self.closest, next) {
            (Some(previous), None) => Some(ClosestChange::Cleared(previous)),
            (None, Some(next)) => Some(ClosestChange::Set(next)),
            (Some(previous), Some(next)) if previous != next => {
                Some(ClosestChange::Replaced { previous, next })
            }
            _ => None,
        };
        self.closest = next;
        change
    }

    /// Forget the closest entity without reporting it
    pub fn clear(&mut self) {
        self.closest = None;
    }
}
