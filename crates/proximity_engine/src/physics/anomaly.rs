//! Recoverable evaluation anomalies
//!
//! None of these ever reach the caller as an `Err`. They degrade to "no
//! effect this tick" and show up in debug logs and the per-tick report.

use crate::scene::Entity;

/// Something unexpected found during an evaluation
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// The handle no longer resolves to a live entity
    #[error("stale handle {0:?} dropped")]
    StaleHandle(Entity),

    /// The entity has no geometry and is treated as an empty volume
    #[error("entity {0:?} has no geometry")]
    EmptyGeometry(Entity),

    /// The selector matched nothing
    #[error("selector `{0}` matched no entities")]
    MisconfiguredSelector(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_messages() {
        let mut keys: SlotMap<Entity, ()> = SlotMap::with_key();
        let e = keys.insert(());
        assert!(Anomaly::StaleHandle(e).to_string().starts_with("stale handle"));
        assert!(Anomaly::EmptyGeometry(e).to_string().ends_with("has no geometry"));
        assert_eq!(
            Anomaly::MisconfiguredSelector("[x]".into()).to_string(),
            "selector `[x]` matched no entities"
        );
    }
}
