//! Per-entity bounding volume cache
//!
//! Volumes are kept in an engine-owned map keyed by entity handle instead of
//! being stashed on scene nodes, so teardown is a single `clear`.
//!
//! Two recomputation policies exist:
//! - [`VolumePolicy::Dynamic`]: recomputed on every [`VolumeCache::update`]
//! - [`VolumePolicy::Static`]: computed once from the world transform at that
//!   moment, then served from the cache until [`VolumeCache::invalidate`].
//!   Moving a static entity without invalidating it leaves a stale volume.

use std::collections::HashMap;

use super::BoundingVolume;
use crate::scene::Entity;

/// Source of world-space volumes, usually the host scene
pub trait VolumeSource {
    /// World-space AABB of the entity's geometry.
    ///
    /// `None` if the handle no longer resolves, the empty volume if the
    /// entity exists but has no renderable geometry.
    fn world_volume(&self, entity: Entity) -> Option<BoundingVolume>;
}

/// Caching strategy for an entity's volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VolumePolicy {
    /// Recompute every evaluation
    Dynamic,
    /// Compute once, reuse until invalidated
    #[default]
    Static,
}

/// Cached volume for one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeEntry {
    /// Last computed volume; empty until `computed` is set
    pub volume: BoundingVolume,
    /// Policy the entity is cached under
    pub policy: VolumePolicy,
    /// Whether `volume` holds a computed value. Registration and
    /// invalidation leave it unset.
    pub computed: bool,
}

impl VolumeEntry {
    fn pending(policy: VolumePolicy) -> Self {
        Self {
            volume: BoundingVolume::empty(),
            policy,
            computed: false,
        }
    }
}

/// Engine-owned store of bounding volumes
#[derive(Debug, Default)]
pub struct VolumeCache {
    entries: HashMap<Entity, VolumeEntry>,
}

impl VolumeCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `entity` under `policy` without computing its volume yet
    ///
    /// An existing entry under the same policy is left alone; a policy
    /// change discards the cached volume.
    pub fn register(&mut self, entity: Entity, policy: VolumePolicy) {
        let entry = self
            .entries
            .entry(entity)
            .or_insert_with(|| VolumeEntry::pending(policy));
        if entry.policy != policy {
            *entry = VolumeEntry::pending(policy);
        }
    }

    /// Current volume for `entity` under `policy`
    ///
    /// Returns `None` (and drops any entry) if the source no longer knows
    /// the entity. A computed static entry is returned as-is without
    /// consulting the source.
    pub fn update<S: VolumeSource + ?Sized>(
        &mut self,
        source: &S,
        entity: Entity,
        policy: VolumePolicy,
    ) -> Option<BoundingVolume> {
        if policy == VolumePolicy::Static {
            if let Some(entry) = self.entries.get(&entity) {
                if entry.computed && entry.policy == VolumePolicy::Static {
                    return Some(entry.volume);
                }
            }
        }

        let Some(volume) = source.world_volume(entity) else {
            self.entries.remove(&entity);
            return None;
        };
        self.entries.insert(
            entity,
            VolumeEntry {
                volume,
                policy,
                computed: true,
            },
        );
        Some(volume)
    }

    /// Clear the computed volume, forcing recomputation on next update
    ///
    /// The entry and its policy are kept. Returns `false` if the entity is
    /// not tracked.
    pub fn invalidate(&mut self, entity: Entity) -> bool {
        match self.entries.get_mut(&entity) {
            Some(entry) => {
                *entry = VolumeEntry::pending(entry.policy);
                true
            }
            None => false,
        }
    }

    /// Stop tracking `entity`
    pub fn remove(&mut self, entity: Entity) -> bool {
        self.entries.remove(&entity).is_some()
    }

    /// Tracked entry, computed or not
    pub fn entry(&self, entity: Entity) -> Option<&VolumeEntry> {
        self.entries.get(&entity)
    }

    /// Computed volume, if any
    pub fn volume(&self, entity: Entity) -> Option<&BoundingVolume> {
        self.entries
            .get(&entity)
            .filter(|entry| entry.computed)
            .map(|entry| &entry.volume)
    }

    /// All computed volumes, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &BoundingVolume)> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.computed)
            .map(|(&entity, entry)| (entity, &entry.volume))
    }

    /// Tracked entities, computed or not
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entries.keys().copied()
    }

    /// Number of tracked entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use slotmap::SlotMap;
    use std::cell::Cell;

    /// Source whose single entity can be moved between calls
    struct MovingBox {
        entity: Entity,
        offset: Cell<f32>,
        alive: Cell<bool>,
        lookups: Cell<u32>,
    }

    impl MovingBox {
        fn new() -> Self {
            let mut keys: SlotMap<Entity, ()> = SlotMap::with_key();
            Self {
                entity: keys.insert(()),
                offset: Cell::new(0.0),
                alive: Cell::new(true),
                lookups: Cell::new(0),
            }
        }

        fn move_to(&self, x: f32) {
            self.offset.set(x);
        }
    }

    impl VolumeSource for MovingBox {
        fn world_volume(&self, entity: Entity) -> Option<BoundingVolume> {
            self.lookups.set(self.lookups.get() + 1);
            if entity != self.entity || !self.alive.get() {
                return None;
            }
            let x = self.offset.get();
            Some(BoundingVolume::new(
                Vec3::new(x, 0.0, 0.0),
                Vec3::new(x + 1.0, 1.0, 1.0),
            ))
        }
    }

    #[test]
    fn test_static_volume_is_stable_until_invalidated() {
        let source = MovingBox::new();
        let mut cache = VolumeCache::new();

        let first = cache.update(&source, source.entity, VolumePolicy::Static).unwrap();
        source.move_to(10.0);
        let second = cache.update(&source, source.entity, VolumePolicy::Static).unwrap();
        // bit-identical, stale on purpose
        assert_eq!(first, second);
        assert_eq!(source.lookups.get(), 1);
        assert!(cache.entry(source.entity).unwrap().computed);

        assert!(cache.invalidate(source.entity));
        assert!(!cache.entry(source.entity).unwrap().computed);
        assert_eq!(cache.volume(source.entity), None);
        let third = cache.update(&source, source.entity, VolumePolicy::Static).unwrap();
        assert_eq!(third.min().x, 10.0);
    }

    #[test]
    fn test_dynamic_volume_tracks_every_move() {
        let source = MovingBox::new();
        let mut cache = VolumeCache::new();

        for x in [0.0, 3.0, -7.5] {
            source.move_to(x);
            let volume = cache.update(&source, source.entity, VolumePolicy::Dynamic).unwrap();
            assert_eq!(volume.min().x, x);
            assert_eq!(volume.center().x, x + 0.5);
        }
        assert_eq!(source.lookups.get(), 3);
    }

    #[test]
    fn test_switching_to_static_freezes_current_volume() {
        let source = MovingBox::new();
        let mut cache = VolumeCache::new();

        cache.update(&source, source.entity, VolumePolicy::Dynamic);
        source.move_to(4.0);
        let frozen = cache.update(&source, source.entity, VolumePolicy::Static).unwrap();
        source.move_to(8.0);
        let again = cache.update(&source, source.entity, VolumePolicy::Static).unwrap();
        assert_eq!(frozen.min().x, 4.0);
        assert_eq!(again, frozen);
    }

    #[test]
    fn test_stale_handle_drops_entry() {
        let source = MovingBox::new();
        let mut cache = VolumeCache::new();

        cache.update(&source, source.entity, VolumePolicy::Dynamic);
        assert_eq!(cache.len(), 1);
        source.alive.set(false);
        assert_eq!(cache.update(&source, source.entity, VolumePolicy::Dynamic), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_registered_entry_starts_uncomputed() {
        let source = MovingBox::new();
        let mut cache = VolumeCache::new();

        cache.register(source.entity, VolumePolicy::Static);
        let entry = cache.entry(source.entity).copied().unwrap();
        assert!(!entry.computed);
        assert_eq!(entry.policy, VolumePolicy::Static);
        assert_eq!(cache.volume(source.entity), None);
        assert_eq!(cache.iter().count(), 0);
        assert_eq!(cache.len(), 1);

        cache.update(&source, source.entity, VolumePolicy::Static);
        assert!(cache.entry(source.entity).unwrap().computed);

        // same policy keeps the computed volume, a new one discards it
        cache.register(source.entity, VolumePolicy::Static);
        assert!(cache.entry(source.entity).unwrap().computed);
        cache.register(source.entity, VolumePolicy::Dynamic);
        assert!(!cache.entry(source.entity).unwrap().computed);
    }

    #[test]
    fn test_remove_stops_tracking() {
        let source = MovingBox::new();
        let mut cache = VolumeCache::new();
        cache.update(&source, source.entity, VolumePolicy::Dynamic);
        assert!(cache.remove(source.entity));
        assert!(!cache.remove(source.entity));
        assert!(cache.entry(source.entity).is_none());
    }

    #[test]
    fn test_invalidate_unknown_entity_is_harmless() {
        let source = MovingBox::new();
        let mut cache = VolumeCache::new();
        assert!(!cache.invalidate(source.entity));
        cache.clear();
        assert_eq!(cache.iter().count(), 0);
    }
}
