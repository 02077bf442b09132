//! Proximity demo application
//!
//! Drives a box collider through a short scripted scene and logs every
//! lifecycle event. Pass a `.toml` or `.ron` collider config as the first
//! argument to override the defaults.

use proximity_engine::config::{ColliderConfig, Config, ConfigError};
use proximity_engine::events::LoggingListener;
use proximity_engine::foundation::logging;
use proximity_engine::foundation::math::Vec3;
use proximity_engine::foundation::time::ManualClock;
use proximity_engine::physics::{BoundingVolume, BoxCollider};
use proximity_engine::scene::{ListenerSettings, SceneNode, SimpleScene};

/// Simulated frame length
const FRAME_MS: u64 = 16;

/// Demo failures
#[derive(thiserror::Error, Debug)]
enum DemoError {
    /// The config file could not be loaded
    #[error("failed to load collider config: {0}")]
    Config(#[from] ConfigError),
}

fn load_config() -> Result<ColliderConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading collider config from {path}");
            Ok(ColliderConfig::load_from_file(path)?)
        }
        None => Ok(ColliderConfig::default()),
    }
}

fn cube(min: f32, max: f32) -> BoundingVolume {
    BoundingVolume::new(Vec3::repeat(min), Vec3::repeat(max))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_default("info");

    let config = load_config()?;
    log::info!(
        "Collider: interval {} ms, selector `{}`",
        config.evaluation_interval_ms,
        config.selector
    );

    let mut scene = SimpleScene::new();
    let probe = scene.spawn(SceneNode::new().with_id("probe").with_bounds(cube(0.0, 1.0)).as_probe());
    let crate_a = scene.spawn(
        SceneNode::new()
            .with_id("crate-a")
            .with_bounds(cube(0.5, 2.0))
            .with_listener(ListenerSettings::dynamic()),
    );
    scene.spawn(
        SceneNode::new()
            .with_id("crate-b")
            .with_bounds(cube(5.0, 6.0))
            .with_listener(ListenerSettings::default()),
    );

    let mut collider = BoxCollider::new(probe, config);
    collider.attach(&mut scene);

    let clock = ManualClock::new(0);
    let mut listener = LoggingListener;

    // let crate-a overlap for a while, then push it away
    for frame in 0..30u64 {
        if frame == 15 {
            log::info!("Moving crate-a out of range");
            scene.set_position(crate_a, Vec3::repeat(9.5));
        }
        let report = collider.update(&clock, &scene, &mut listener);
        if report.evaluated {
            log::debug!("t={} ms: {report:?}", frame * FRAME_MS);
        }
        clock.advance(FRAME_MS);
    }

    log::info!(
        "Finished with {} overlapping, closest {:?}",
        collider.intersected().len(),
        collider.closest()
    );
    collider.teardown(&mut scene);
    Ok(())
}
