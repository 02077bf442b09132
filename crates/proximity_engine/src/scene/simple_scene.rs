//! Simple list-based scene
//!
//! A flat, insertion-ordered scene backed by a generational slot map. It is
//! the reference [`SceneGraph`] used by the demo and the tests, and a
//! reasonable host for small scenes. Removed entities leave their handles
//! dangling, so stale handles are detected for free.

use std::collections::BTreeSet;

use slotmap::SlotMap;

use super::scene_graph::{ChangeCallback, ChangeKinds, SceneGraph, SubscriptionId};
use super::selector::{COLLIDER_ATTRIBUTE, LISTENER_ATTRIBUTE};
use super::{Entity, Selector};
use crate::foundation::math::{Transform, Vec3};
use crate::physics::{BoundingVolume, VolumePolicy, VolumeSource};

/// Candidate-side settings carried by listener entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerSettings {
    /// Disabled listeners are never reported as overlapping
    pub enabled: bool,
    /// Dynamic listeners have their volume recomputed every evaluation
    pub dynamic: bool,
}

impl Default for ListenerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            dynamic: false,
        }
    }
}

impl ListenerSettings {
    /// Settings for a moving listener
    pub fn dynamic() -> Self {
        Self {
            dynamic: true,
            ..Self::default()
        }
    }

    /// Settings for a listener that is switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// One entity in a [`SimpleScene`]
#[derive(Debug, Clone)]
pub struct SceneNode {
    id: Option<String>,
    attributes: BTreeSet<String>,
    transform: Transform,
    local_bounds: Option<BoundingVolume>,
    visible: bool,
    listener: Option<ListenerSettings>,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self {
            id: None,
            attributes: BTreeSet::new(),
            transform: Transform::identity(),
            local_bounds: None,
            visible: true,
            listener: None,
        }
    }
}

impl SceneNode {
    /// Visible node with no geometry at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the node id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a free-form attribute
    pub fn with_attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.insert(name.into());
        self
    }

    /// Set the world transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the world position, keeping rotation and scale
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Give the node geometry with the given model-space bounds
    pub fn with_bounds(mut self, local_bounds: BoundingVolume) -> Self {
        self.local_bounds = Some(local_bounds);
        self
    }

    /// Set visibility
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Make the node a listener candidate
    pub fn with_listener(mut self, settings: ListenerSettings) -> Self {
        self.listener = Some(settings);
        self.attributes.insert(LISTENER_ATTRIBUTE.to_string());
        self
    }

    /// Give the node the probe role
    pub fn as_probe(mut self) -> Self {
        self.attributes.insert(COLLIDER_ATTRIBUTE.to_string());
        self
    }

    /// Node id, if any
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Whether the node carries `name`
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }

    /// World transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Model-space bounds, if the node has geometry
    pub fn local_bounds(&self) -> Option<&BoundingVolume> {
        self.local_bounds.as_ref()
    }

    /// Visibility
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Listener settings, if the node is a listener
    pub fn listener(&self) -> Option<ListenerSettings> {
        self.listener
    }

    /// World-space AABB of the node's geometry; empty without geometry
    pub fn world_volume(&self) -> BoundingVolume {
        self.local_bounds
            .map_or_else(BoundingVolume::empty, |bounds| bounds.transformed(&self.transform))
    }
}

struct Subscriber {
    id: SubscriptionId,
    kinds: ChangeKinds,
    callback: ChangeCallback,
}

/// Simple list-based scene graph (no spatial optimization)
///
/// Queries are linear scans in insertion order, which is sufficient for
/// scenes of a few thousand entities.
#[derive(Default)]
pub struct SimpleScene {
    nodes: SlotMap<Entity, SceneNode>,
    order: Vec<Entity>,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
}

impl SimpleScene {
    /// Create a new empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and notify observers
    pub fn spawn(&mut self, node: SceneNode) -> Entity {
        let entity = self.nodes.insert(node);
        self.order.push(entity);
        self.notify(ChangeKinds::NODES_ADDED);
        entity
    }

    /// Remove a node; returns `false` if the handle was already stale
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if self.nodes.remove(entity).is_none() {
            return false;
        }
        self.order.retain(|&e| e != entity);
        self.notify(ChangeKinds::NODES_REMOVED);
        true
    }

    /// Borrow a node
    pub fn node(&self, entity: Entity) -> Option<&SceneNode> {
        self.nodes.get(entity)
    }

    /// Find the first node with the given id
    pub fn find_by_id(&self, id: &str) -> Option<Entity> {
        self.order
            .iter()
            .copied()
            .find(|&e| self.nodes.get(e).and_then(SceneNode::id) == Some(id))
    }

    /// Move a node. Transforms are not structural, so nobody is notified.
    pub fn set_transform(&mut self, entity: Entity, transform: Transform) -> bool {
        self.nodes
            .get_mut(entity)
            .map(|node| node.transform = transform)
            .is_some()
    }

    /// Move a node to `position`, keeping rotation and scale
    pub fn set_position(&mut self, entity: Entity, position: Vec3) -> bool {
        self.nodes
            .get_mut(entity)
            .map(|node| node.transform.position = position)
            .is_some()
    }

    /// Replace or remove a node's geometry
    pub fn set_bounds(&mut self, entity: Entity, local_bounds: Option<BoundingVolume>) -> bool {
        self.mutate(entity, ChangeKinds::GEOMETRY, |node| {
            node.local_bounds = local_bounds;
        })
    }

    /// Show or hide a node
    pub fn set_visible(&mut self, entity: Entity, visible: bool) -> bool {
        self.mutate(entity, ChangeKinds::ATTRIBUTES, |node| node.visible = visible)
    }

    /// Attach, update or remove listener settings
    pub fn set_listener(&mut self, entity: Entity, settings: Option<ListenerSettings>) -> bool {
        self.mutate(entity, ChangeKinds::ATTRIBUTES, |node| {
            node.listener = settings;
            if settings.is_some() {
                node.attributes.insert(LISTENER_ATTRIBUTE.to_string());
            } else {
                node.attributes.remove(LISTENER_ATTRIBUTE);
            }
        })
    }

    /// Add a free-form attribute
    pub fn set_attribute(&mut self, entity: Entity, name: &str) -> bool {
        self.mutate(entity, ChangeKinds::ATTRIBUTES, |node| {
            node.attributes.insert(name.to_string());
        })
    }

    /// Remove a free-form attribute
    pub fn remove_attribute(&mut self, entity: Entity, name: &str) -> bool {
        self.mutate(entity, ChangeKinds::ATTRIBUTES, |node| {
            node.attributes.remove(name);
        })
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the scene has no entities
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn mutate(&mut self, entity: Entity, kind: ChangeKinds, f: impl FnOnce(&mut SceneNode)) -> bool {
        let Some(node) = self.nodes.get_mut(entity) else {
            return false;
        };
        f(node);
        self.notify(kind);
        true
    }

    fn notify(&mut self, kind: ChangeKinds) {
        for subscriber in &mut self.subscribers {
            if subscriber.kinds.intersects(kind) {
                (subscriber.callback)(kind);
            }
        }
    }
}

impl VolumeSource for SimpleScene {
    fn world_volume(&self, entity: Entity) -> Option<BoundingVolume> {
        self.nodes.get(entity).map(SceneNode::world_volume)
    }
}

impl SceneGraph for SimpleScene {
    fn query_entities(&self, selector: &Selector) -> Vec<Entity> {
        self.order
            .iter()
            .copied()
            .filter(|&e| {
                self.nodes
                    .get(e)
                    .is_some_and(|node| selector.matches(node.id(), |name| node.has_attribute(name)))
            })
            .collect()
    }

    fn contains(&self, entity: Entity) -> bool {
        self.nodes.contains_key(entity)
    }

    fn is_enabled(&self, entity: Entity) -> bool {
        self.nodes
            .get(entity)
            .is_some_and(|node| node.listener.map_or(true, |l| l.enabled))
    }

    fn is_visible(&self, entity: Entity) -> bool {
        self.nodes.get(entity).is_some_and(|node| node.visible)
    }

    fn volume_policy(&self, entity: Entity) -> VolumePolicy {
        match self.nodes.get(entity).and_then(|node| node.listener) {
            Some(settings) if settings.dynamic => VolumePolicy::Dynamic,
            _ => VolumePolicy::Static,
        }
    }

    fn is_probe(&self, entity: Entity) -> bool {
        self.nodes
            .get(entity)
            .is_some_and(|node| node.has_attribute(COLLIDER_ATTRIBUTE))
    }

    fn subscribe(&mut self, kinds: ChangeKinds, callback: ChangeCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber { id, kinds, callback });
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }
}
