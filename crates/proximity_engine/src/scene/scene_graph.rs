//! Scene graph trait
//!
//! The read-only view of a host scene that the proximity engine consumes,
//! plus the change-notification subscription it uses to invalidate its
//! candidate list. Hosts own the scene; the engine only queries it.

use super::{Entity, Selector};
use crate::physics::{VolumePolicy, VolumeSource};

bitflags::bitflags! {
    /// Kinds of scene mutation a subscriber can observe
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChangeKinds: u32 {
        /// An entity was added
        const NODES_ADDED = 1 << 0;
        /// An entity was removed
        const NODES_REMOVED = 1 << 1;
        /// An attribute (visibility, listener settings, tags) changed
        const ATTRIBUTES = 1 << 2;
        /// An entity's geometry was set or removed
        const GEOMETRY = 1 << 3;
        /// Additions and removals
        const STRUCTURE = Self::NODES_ADDED.bits() | Self::NODES_REMOVED.bits();
    }
}

/// Callback invoked with the kind of change that happened
pub type ChangeCallback = Box<dyn FnMut(ChangeKinds) + Send + Sync>;

/// Handle returned by [`SceneGraph::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Trait for host scenes that the proximity engine can observe
///
/// Every query must tolerate handles that no longer resolve: predicates
/// answer `false` and [`VolumeSource::world_volume`] answers `None`.
pub trait SceneGraph: VolumeSource + Send + Sync {
    /// Entities matching `selector`, in a stable order
    fn query_entities(&self, selector: &Selector) -> Vec<Entity>;

    /// Whether the handle still names a live entity
    fn contains(&self, entity: Entity) -> bool;

    /// Candidate-side enable flag
    fn is_enabled(&self, entity: Entity) -> bool;

    /// Whether the entity is currently visible
    fn is_visible(&self, entity: Entity) -> bool;

    /// How the entity's bounding volume should be cached
    fn volume_policy(&self, entity: Entity) -> VolumePolicy;

    /// Whether the entity is itself a probe
    fn is_probe(&self, entity: Entity) -> bool;

    /// Register `callback` for the given kinds of change
    fn subscribe(&mut self, kinds: ChangeKinds, callback: ChangeCallback) -> SubscriptionId;

    /// Drop a subscription; returns `false` if it was already gone
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}
