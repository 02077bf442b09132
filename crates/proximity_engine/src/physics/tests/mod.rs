//! Cross-module tests for the box collider pipeline


use crate::config::ColliderConfig;
use crate::foundation::math::Vec3;
use crate::physics::{BoundingVolume, BoxCollider};
use crate::scene::{Entity, ListenerSettings, SceneNode, SimpleScene};

/// Axis-aligned cube from `min` to `max` on every axis
fn cube(min: f32, max: f32) -> BoundingVolume {
    BoundingVolume::new(Vec3::repeat(min), Vec3::repeat(max))
}

/// Static listener with the given bounds
fn listener(bounds: BoundingVolume) -> SceneNode {
    SceneNode::new()
        .with_bounds(bounds)
        .with_listener(ListenerSettings::default())
}

/// Dynamic listener with the given bounds
fn moving_listener(bounds: BoundingVolume) -> SceneNode {
    SceneNode::new()
        .with_bounds(bounds)
        .with_listener(ListenerSettings::dynamic())
}

/// Scene with a unit-cube probe and an attached collider evaluating every tick
fn probe_scene() -> (SimpleScene, Entity, BoxCollider) {
    let mut scene = SimpleScene::new();
    let probe = scene.spawn(SceneNode::new().with_id("probe").with_bounds(cube(0.0, 1.0)).as_probe());
    let mut collider = BoxCollider::new(probe, ColliderConfig::new().with_interval_ms(0));
    collider.attach(&mut scene);
    (scene, probe, collider)
}
