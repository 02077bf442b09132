//! Candidate list
//!
//! The entities tested against the probe, rebuilt from a selector query only
//! when the scene reports a change. Order follows the scene query and is the
//! iteration order used for closest-entity tie-breaking.

use crate::scene::{Entity, SceneGraph, Selector};

/// Ordered candidate handles for one probe
#[derive(Debug, Default, Clone)]
pub struct CandidateSet {
    entities: Vec<Entity>,
}

impl CandidateSet {
    /// Create an empty candidate set
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-run `selector` against the scene, excluding `probe`
    ///
    /// Returns the new candidate count.
    pub fn refresh<G: SceneGraph + ?Sized>(
        &mut self,
        scene: &G,
        selector: &Selector,
        probe: Entity,
    ) -> usize {
        self.entities = scene.query_entities(selector);
        self.entities.retain(|&e| e != probe);
        self.entities.len()
    }

    /// Drop a single candidate (e.g. a handle found stale mid-evaluation)
    pub fn remove(&mut self, entity: Entity) -> bool {
        let before = self.entities.len();
        self.entities.retain(|&e| e != entity);
        self.entities.len() != before
    }

    /// Current candidates in query order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Whether `entity` is a candidate
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True if there are no candidates
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop every candidate
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ListenerSettings, SceneNode, SimpleScene};

    #[test]
    fn test_refresh_excludes_probe() {
        let mut scene = SimpleScene::new();
        let probe = scene.spawn(SceneNode::new().as_probe().with_listener(ListenerSettings::default()));
        let a = scene.spawn(SceneNode::new().with_listener(ListenerSettings::default()));

        let mut candidates = CandidateSet::new();
        assert_eq!(candidates.refresh(&scene, &Selector::default(), probe), 1);
        assert_eq!(candidates.entities(), &[a]);
        assert!(!candidates.contains(probe));
    }

    #[test]
    fn test_refresh_replaces_previous_list() {
        let mut scene = SimpleScene::new();
        let probe = scene.spawn(SceneNode::new().as_probe());
        let a = scene.spawn(SceneNode::new().with_listener(ListenerSettings::default()));
        let mut candidates = CandidateSet::new();
        candidates.refresh(&scene, &Selector::default(), probe);

        scene.despawn(a);
        let b = scene.spawn(SceneNode::new().with_listener(ListenerSettings::default()));
        candidates.refresh(&scene, &Selector::default(), probe);
        assert_eq!(candidates.entities(), &[b]);
    }

    #[test]
    fn test_zero_matches_is_just_empty() {
        let mut scene = SimpleScene::new();
        let probe = scene.spawn(SceneNode::new());
        scene.spawn(SceneNode::new());
        let mut candidates = CandidateSet::new();
        assert_eq!(candidates.refresh(&scene, &Selector::attribute("nothing"), probe), 0);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_remove_single_candidate() {
        let mut scene = SimpleScene::new();
        let probe = scene.spawn(SceneNode::new());
        let a = scene.spawn(SceneNode::new());
        let b = scene.spawn(SceneNode::new());
        let mut candidates = CandidateSet::new();
        candidates.refresh(&scene, &Selector::all(), probe);

        assert!(candidates.remove(a));
        assert!(!candidates.remove(a));
        assert_eq!(candidates.entities(), &[b]);
        assert_eq!(candidates.len(), 1);
    }
}
