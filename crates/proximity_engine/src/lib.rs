//! # Proximity Engine
//!
//! Tick-driven proximity detection between a probe entity and the entities
//! around it, using axis-aligned bounding boxes.
//!
//! ## Features
//!
//! - **Overlap lifecycle**: enter/exit events per candidate plus batched
//!   start/end sets, exits always before enters
//! - **Closest tracking**: reports only when the nearest overlapping entity
//!   changes identity
//! - **Volume caching**: static volumes computed once, dynamic ones every tick
//! - **Interval gating**: evaluations spaced by a configurable minimum interval
//! - **Host agnostic**: any scene implementing [`scene::SceneGraph`]
//!
//! ## Quick Start
//!
//! ```rust
//! use proximity_engine::prelude::*;
//!
//! let mut scene = SimpleScene::new();
//! let probe = scene.spawn(
//!     SceneNode::new()
//!         .with_bounds(BoundingVolume::new(Vec3::zeros(), Vec3::repeat(1.0)))
//!         .as_probe(),
//! );
//! let crate_box = scene.spawn(
//!     SceneNode::new()
//!         .with_bounds(BoundingVolume::new(Vec3::repeat(0.5), Vec3::repeat(2.0)))
//!         .with_listener(ListenerSettings::default()),
//! );
//!
//! let mut collider = BoxCollider::new(probe, ColliderConfig::default());
//! collider.attach(&mut scene);
//!
//! let mut events = EventRecorder::new();
//! collider.tick(0, &scene, &mut events);
//! assert_eq!(collider.intersected(), &[crate_box]);
//! assert_eq!(collider.closest(), Some(crate_box));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod config;
pub mod events;
pub mod foundation;
pub mod physics;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{ColliderConfig, Config, ConfigError},
        events::{CollisionEvent, CollisionEventKind, CollisionListener, EventRecorder, LoggingListener},
        foundation::{
            math::{Transform, Vec3},
            time::{Clock, ManualClock, MonotonicClock},
        },
        physics::{BoundingVolume, BoxCollider, TickReport, VolumePolicy},
        scene::{Entity, ListenerSettings, SceneGraph, SceneNode, Selector, SimpleScene},
    };
}
