//! Scene access
//!
//! The proximity engine never owns the scene it watches. This module defines
//! what it needs from a host scene and ships a simple in-memory host:
//!
//! ```text
//! Host scene (owned by the application)
//!      ↓  query_entities / world_volume / predicates
//! SceneGraph trait
//!      ↓  subscribe(ChangeKinds) → dirty flag
//! BoxCollider (physics)
//! ```

mod entity;
mod scene_graph;
mod selector;
mod simple_scene;

pub use entity::Entity;
pub use scene_graph::{ChangeCallback, ChangeKinds, SceneGraph, SubscriptionId};
pub use selector::{Selector, SelectorError, SelectorTerm, COLLIDER_ATTRIBUTE, LISTENER_ATTRIBUTE};
pub use simple_scene::{ListenerSettings, SceneNode, SimpleScene};
