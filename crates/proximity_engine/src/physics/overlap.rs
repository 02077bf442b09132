//! Overlap evaluation
//!
//! Walks the candidate list in order, applies the enable and visibility
//! filters, and keeps the candidates whose volume overlaps the probe's.
//! AABB overlap is O(1) per pair and exact for axis-aligned boxes.

use super::BoundingVolume;
use crate::scene::{Entity, SceneGraph};

/// Candidate filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlapFilters {
    /// Test invisible candidates too
    pub include_non_visible: bool,
}

/// Result of one overlap pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Overlapping candidates, in candidate order
    pub overlapping: Vec<Entity>,
    /// Candidates whose handle no longer resolved
    pub stale: Vec<Entity>,
    /// Candidates with no geometry
    pub empty: Vec<Entity>,
    /// Candidates actually tested (after filtering)
    pub tested: usize,
}

/// Whether `entity` passes the enable and visibility filters
pub fn passes_filters<G: SceneGraph + ?Sized>(
    scene: &G,
    entity: Entity,
    filters: &OverlapFilters,
) -> bool {
    if !scene.is_enabled(entity) {
        return false;
    }
    filters.include_non_visible || scene.is_visible(entity)
}

/// Test every candidate against `probe`
///
/// `volume_of` resolves a candidate's current volume, returning `None` for a
/// stale handle. Stale candidates are reported, not tested.
pub fn evaluate_overlaps<G, F>(
    probe: &BoundingVolume,
    candidates: &[Entity],
    scene: &G,
    filters: &OverlapFilters,
    mut volume_of: F,
) -> Evaluation
where
    G: SceneGraph + ?Sized,
    F: FnMut(Entity) -> Option<BoundingVolume>,
{
    let mut evaluation = Evaluation::default();
    for &candidate in candidates {
        if !scene.contains(candidate) {
            evaluation.stale.push(candidate);
            continue;
        }
        if !passes_filters(scene, candidate, filters) {
            continue;
        }
        let Some(volume) = volume_of(candidate) else {
            evaluation.stale.push(candidate);
            continue;
        };
        evaluation.tested += 1;
        if volume.is_empty() {
            evaluation.empty.push(candidate);
            continue;
        }
        if probe.overlaps(&volume) {
            evaluation.overlapping.push(candidate);
        }
    }
    evaluation
}
