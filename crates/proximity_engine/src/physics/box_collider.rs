//! Box collider
//!
//! One probe entity tested against a selector-defined candidate list. Each
//! tick that passes the interval gate runs, in order:
//!
//! 1. candidate refresh (only when the dirty flag is set)
//! 2. probe volume recomputation
//! 3. overlap pass over the candidates
//! 4. enter/exit diff against the previous pass
//! 5. closest-entity update
//! 6. event delivery
//!
//! Events of one tick are delivered as: per-candidate exits, per-candidate
//! enters, closest cleared, closest set, aggregate end, aggregate start.
//! Candidates that are probes themselves take part in the aggregate sets but
//! get no per-candidate events. Their role is recorded on entry, so the exit
//! is suppressed as well even if the entity is gone by then.

use std::collections::HashSet;

use super::anomaly::Anomaly;
use super::candidate_set::CandidateSet;
use super::closest::ClosestTracker;
use super::overlap::{evaluate_overlaps, OverlapFilters};
use super::scheduler::{DirtyFlag, EvaluationScheduler};
use super::transition::OverlapState;
use super::{BoundingVolume, VolumeCache, VolumePolicy};
use crate::config::ColliderConfig;
use crate::events::{CollisionEvent, CollisionListener};
use crate::foundation::time::Clock;
use crate::scene::{ChangeKinds, Entity, SceneGraph, SubscriptionId};

/// Summary of one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Whether the pipeline ran
    pub evaluated: bool,
    /// Candidates considered
    pub candidates: usize,
    /// Candidates overlapping the probe after this tick
    pub overlapping: usize,
    /// Candidates that started overlapping
    pub entered: usize,
    /// Candidates that stopped overlapping
    pub exited: usize,
    /// Handles found stale and dropped
    pub stale: usize,
    /// Candidates without geometry
    pub empty: usize,
}

/// Proximity engine for a single probe entity
#[derive(Debug)]
pub struct BoxCollider {
    probe: Entity,
    config: ColliderConfig,
    scheduler: EvaluationScheduler,
    candidates: CandidateSet,
    volumes: VolumeCache,
    overlap: OverlapState,
    closest: ClosestTracker,
    probe_role_members: HashSet<Entity>,
    subscription: Option<SubscriptionId>,
    torn_down: bool,
}

impl BoxCollider {
    /// Create a collider for `probe`; call [`attach`](Self::attach) to
    /// receive scene change notifications
    pub fn new(probe: Entity, config: ColliderConfig) -> Self {
        Self {
            probe,
            scheduler: EvaluationScheduler::new(config.evaluation_interval_ms),
            config,
            candidates: CandidateSet::new(),
            volumes: VolumeCache::new(),
            overlap: OverlapState::new(),
            closest: ClosestTracker::new(),
            probe_role_members: HashSet::new(),
            subscription: None,
            torn_down: false,
        }
    }

    /// Subscribe to scene changes so the candidate list is refreshed when
    /// entities come and go
    ///
    /// Returns `false` if already attached or torn down.
    pub fn attach<G: SceneGraph + ?Sized>(&mut self, scene: &mut G) -> bool {
        if self.torn_down || self.subscription.is_some() {
            return false;
        }
        let dirty = self.scheduler.dirty_flag();
        let id = scene.subscribe(ChangeKinds::all(), Box::new(move |_| dirty.mark()));
        self.subscription = Some(id);
        self.scheduler.mark_dirty();
        log::info!("Box collider for {:?} attached ({:?})", self.probe, id);
        true
    }

    /// Detach from the scene and drop all state
    ///
    /// Idempotent. No event is delivered after teardown, and the collider
    /// cannot be attached again.
    pub fn teardown<G: SceneGraph + ?Sized>(&mut self, scene: &mut G) {
        if self.torn_down {
            return;
        }
        if let Some(id) = self.subscription.take() {
            scene.unsubscribe(id);
        }
        self.candidates.clear();
        self.volumes.clear();
        self.overlap.clear();
        self.closest.clear();
        self.probe_role_members.clear();
        self.torn_down = true;
        log::info!("Box collider for {:?} torn down", self.probe);
    }

    /// Probe entity
    pub fn probe(&self) -> Entity {
        self.probe
    }

    /// Active configuration
    pub fn config(&self) -> &ColliderConfig {
        &self.config
    }

    /// Replace the configuration
    ///
    /// A new selector or visibility rule takes effect on the next evaluation.
    pub fn set_config(&mut self, config: ColliderConfig) {
        self.scheduler.set_interval_ms(config.evaluation_interval_ms);
        if config.selector != self.config.selector {
            self.scheduler.mark_dirty();
        }
        self.config = config;
    }

    /// Turn evaluation on or off
    ///
    /// Overlap state is kept while disabled. Re-enabling evaluates on the
    /// next tick with a fresh candidate list.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.config.enabled {
            self.scheduler.reset();
        }
        self.config.enabled = enabled;
    }

    /// Whether ticks evaluate at all
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Force a candidate refresh on the next evaluation
    pub fn mark_dirty(&self) {
        self.scheduler.mark_dirty();
    }

    /// Shared dirty flag, for hosts that deliver change notifications
    /// some other way
    pub fn dirty_flag(&self) -> DirtyFlag {
        self.scheduler.dirty_flag()
    }

    /// Whether [`teardown`](Self::teardown) has run
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Whether a scene subscription is active
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Candidates overlapping the probe as of the last evaluation
    pub fn intersected(&self) -> &[Entity] {
        self.overlap.current()
    }

    /// Closest overlapping candidate as of the last evaluation
    pub fn closest(&self) -> Option<Entity> {
        self.closest.closest()
    }

    /// Current candidate list
    pub fn candidates(&self) -> &[Entity] {
        self.candidates.entities()
    }

    /// Probe volume computed by the last evaluation
    pub fn probe_volume(&self) -> Option<&BoundingVolume> {
        self.volumes.volume(self.probe)
    }

    /// Cached volume of any entity, for visualization
    pub fn volume(&self, entity: Entity) -> Option<&BoundingVolume> {
        self.volumes.volume(entity)
    }

    /// All cached volumes, for visualization
    pub fn volumes(&self) -> impl Iterator<Item = (Entity, &BoundingVolume)> {
        self.volumes.iter()
    }

    /// Force a static volume to be recomputed on the next evaluation
    pub fn invalidate_volume(&mut self, entity: Entity) -> bool {
        self.volumes.invalidate(entity)
    }

    /// Read `clock` and run [`tick`](Self::tick)
    pub fn update<G, L>(&mut self, clock: &dyn Clock, scene: &G, listener: &mut L) -> TickReport
    where
        G: SceneGraph + ?Sized,
        L: CollisionListener + ?Sized,
    {
        self.tick(clock.now_ms(), scene, listener)
    }

    /// Evaluate if the interval gate allows it and deliver the resulting
    /// events to `listener`
    pub fn tick<G, L>(&mut self, now_ms: u64, scene: &G, listener: &mut L) -> TickReport
    where
        G: SceneGraph + ?Sized,
        L: CollisionListener + ?Sized,
    {
        let mut report = TickReport::default();
        if self.torn_down || !self.config.enabled {
            return report;
        }
        if !self.scheduler.try_begin(now_ms) {
            log::trace!("{:?}: tick at {now_ms} ms gated", self.probe);
            return report;
        }

        if self.scheduler.take_dirty() {
            self.refresh_candidates(scene);
        }

        let Some(probe_volume) = self.volumes.update(scene, self.probe, VolumePolicy::Dynamic) else {
            log::debug!("{}", Anomaly::StaleHandle(self.probe));
            return report;
        };
        if probe_volume.is_empty() {
            log::debug!("{}", Anomaly::EmptyGeometry(self.probe));
        }
        report.evaluated = true;

        let filters = OverlapFilters {
            include_non_visible: self.config.include_non_visible,
        };
        let volumes = &mut self.volumes;
        let evaluation = evaluate_overlaps(
            &probe_volume,
            self.candidates.entities(),
            scene,
            &filters,
            |e| volumes.update(scene, e, scene.volume_policy(e)),
        );

        for &entity in &evaluation.stale {
            self.candidates.remove(entity);
            self.volumes.remove(entity);
            log::debug!("{}", Anomaly::StaleHandle(entity));
        }
        for &entity in &evaluation.empty {
            log::trace!("{}", Anomaly::EmptyGeometry(entity));
        }
        report.candidates = self.candidates.len();
        report.stale = evaluation.stale.len();
        report.empty = evaluation.empty.len();

        self.overlap.begin_evaluation();
        self.overlap.set_current(evaluation.overlapping);
        let transition = self.overlap.transition();
        for &entity in &transition.exited {
            if !scene.contains(entity) {
                self.volumes.remove(entity);
            }
        }

        let volumes = &self.volumes;
        let closest_change = self.closest.update(
            self.overlap.current(),
            probe_volume.center(),
            |e| volumes.volume(e).copied(),
        );

        report.overlapping = self.overlap.current().len();
        report.entered = transition.entered.len();
        report.exited = transition.exited.len();

        let probe = self.probe;
        let mut events = Vec::new();
        for &candidate in &transition.exited {
            if !self.probe_role_members.remove(&candidate) {
                events.push(CollisionEvent::Exit { probe, candidate });
            }
        }
        for &candidate in &transition.entered {
            if scene.is_probe(candidate) {
                self.probe_role_members.insert(candidate);
            } else {
                events.push(CollisionEvent::Enter { probe, candidate });
            }
        }
        if let Some(change) = closest_change {
            if let Some(candidate) = change.cleared() {
                events.push(CollisionEvent::ClosestCleared { probe, candidate });
            }
            if let Some(candidate) = change.set() {
                events.push(CollisionEvent::ClosestSet { probe, candidate });
            }
        }
        if !transition.exited.is_empty() {
            events.push(CollisionEvent::AggregateEnd {
                probe,
                exited: transition.exited,
            });
        }
        if !transition.entered.is_empty() {
            events.push(CollisionEvent::AggregateStart {
                probe,
                entered: transition.entered,
            });
        }

        for event in &events {
            log::trace!("{event:?}");
            event.deliver(listener);
        }
        report
    }

    fn refresh_candidates<G: SceneGraph + ?Sized>(&mut self, scene: &G) {
        let count = self.candidates.refresh(scene, &self.config.selector, self.probe);
        log::debug!(
            "{:?}: {count} candidates for `{}`",
            self.probe,
            self.config.selector
        );
        if count == 0 {
            log::debug!("{}", Anomaly::MisconfiguredSelector(self.config.selector.to_string()));
        }

        let probe = self.probe;
        let evicted: Vec<Entity> = self
            .volumes
            .entities()
            .filter(|&e| e != probe && !self.candidates.contains(e))
            .collect();
        for entity in evicted {
            self.volumes.remove(entity);
        }
        for &entity in self.candidates.entities() {
            self.volumes.register(entity, scene.volume_policy(entity));
        }
    }
}
