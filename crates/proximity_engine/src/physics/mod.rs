//! Proximity detection
//!
//! Axis-aligned bounding volumes, their cache, and the box collider pipeline
//! that turns per-tick overlap tests into enter/exit and closest-entity
//! events.

pub mod anomaly;
pub mod bounding_volume;
pub mod box_collider;
pub mod candidate_set;
pub mod closest;
pub mod overlap;
pub mod scheduler;
pub mod transition;
pub mod volume_cache;

#[cfg(test)]
mod tests;

pub use anomaly::Anomaly;
pub use bounding_volume::BoundingVolume;
pub use box_collider::{BoxCollider, TickReport};
pub use candidate_set::CandidateSet;
pub use closest::{nearest, ClosestChange, ClosestTracker};
pub use overlap::{evaluate_overlaps, passes_filters, Evaluation, OverlapFilters};
pub use scheduler::{should_evaluate, DirtyFlag, EvaluationScheduler};
pub use transition::{diff_transitions, OverlapState, Transition};
pub use volume_cache::{VolumeCache, VolumeEntry, VolumePolicy, VolumeSource};
