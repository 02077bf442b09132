//! Collision lifecycle events
//!
//! The engine reports through the [`CollisionListener`] trait. How events
//! travel from there is up to the caller:
//! - implement the trait directly for immediate handling
//! - [`EventRecorder`] queues them for later inspection
//! - [`EventDispatcher`] routes them to handlers registered per event kind
//! - [`LoggingListener`] writes them to the log

use std::collections::HashMap;

use crate::scene::Entity;

/// Event kind identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionEventKind {
    /// A candidate started overlapping the probe
    Enter,
    /// A candidate stopped overlapping the probe
    Exit,
    /// One or more candidates started overlapping this tick
    AggregateStart,
    /// One or more candidates stopped overlapping this tick
    AggregateEnd,
    /// A candidate became the closest overlapping entity
    ClosestSet,
    /// A candidate stopped being the closest overlapping entity
    ClosestCleared,
}

/// One lifecycle event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollisionEvent {
    /// Per-candidate enter
    Enter {
        /// Probe entity
        probe: Entity,
        /// Candidate that entered
        candidate: Entity,
    },
    /// Per-candidate exit
    Exit {
        /// Probe entity
        probe: Entity,
        /// Candidate that exited
        candidate: Entity,
    },
    /// Every candidate that entered this tick
    AggregateStart {
        /// Probe entity
        probe: Entity,
        /// Entered candidates, never empty
        entered: Vec<Entity>,
    },
    /// Every candidate that exited this tick
    AggregateEnd {
        /// Probe entity
        probe: Entity,
        /// Exited candidates, never empty
        exited: Vec<Entity>,
    },
    /// New closest entity
    ClosestSet {
        /// Probe entity
        probe: Entity,
        /// Closest candidate
        candidate: Entity,
    },
    /// Previous closest entity lost the spot
    ClosestCleared {
        /// Probe entity
        probe: Entity,
        /// Former closest candidate
        candidate: Entity,
    },
}

impl CollisionEvent {
    /// Kind of this event
    pub fn kind(&self) -> CollisionEventKind {
        match self {
            Self::Enter { .. } => CollisionEventKind::Enter,
            Self::Exit { .. } => CollisionEventKind::Exit,
            Self::AggregateStart { .. } => CollisionEventKind::AggregateStart,
            Self::AggregateEnd { .. } => CollisionEventKind::AggregateEnd,
            Self::ClosestSet { .. } => CollisionEventKind::ClosestSet,
            Self::ClosestCleared { .. } => CollisionEventKind::ClosestCleared,
        }
    }

    /// Probe the event belongs to
    pub fn probe(&self) -> Entity {
        match self {
            Self::Enter { probe, .. }
            | Self::Exit { probe, .. }
            | Self::AggregateStart { probe, .. }
            | Self::AggregateEnd { probe, .. }
            | Self::ClosestSet { probe, .. }
            | Self::ClosestCleared { probe, .. } => *probe,
        }
    }

    /// Hand the event to the matching listener method
    pub fn deliver<L: CollisionListener + ?Sized>(&self, listener: &mut L) {
        match self {
            Self::Enter { probe, candidate } => listener.on_enter(*probe, *candidate),
            Self::Exit { probe, candidate } => listener.on_exit(*probe, *candidate),
            Self::AggregateStart { probe, entered } => listener.on_aggregate_start(*probe, entered),
            Self::AggregateEnd { probe, exited } => listener.on_aggregate_end(*probe, exited),
            Self::ClosestSet { probe, candidate } => listener.on_closest_set(*probe, *candidate),
            Self::ClosestCleared { probe, candidate } => {
                listener.on_closest_cleared(*probe, *candidate);
            }
        }
    }
}

/// Receiver of collision lifecycle events
///
/// Every method defaults to doing nothing, so implementors only override
/// what they care about.
pub trait CollisionListener {
    /// `candidate` started overlapping `probe`
    fn on_enter(&mut self, _probe: Entity, _candidate: Entity) {}

    /// `candidate` stopped overlapping `probe`
    fn on_exit(&mut self, _probe: Entity, _candidate: Entity) {}

    /// Batched enters of one tick; `entered` is never empty
    fn on_aggregate_start(&mut self, _probe: Entity, _entered: &[Entity]) {}

    /// Batched exits of one tick; `exited` is never empty
    fn on_aggregate_end(&mut self, _probe: Entity, _exited: &[Entity]) {}

    /// `candidate` is now the closest overlapping entity
    fn on_closest_set(&mut self, _probe: Entity, _candidate: Entity) {}

    /// `candidate` is no longer the closest overlapping entity
    fn on_closest_cleared(&mut self, _probe: Entity, _candidate: Entity) {}
}

/// Listener that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullListener;

impl CollisionListener for NullListener {}

/// Listener that records every event in arrival order
#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    events: Vec<CollisionEvent>,
}

impl EventRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Remove and return the recorded events
    pub fn take(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Kinds of the recorded events, in order
    pub fn kinds(&self) -> Vec<CollisionEventKind> {
        self.events.iter().map(CollisionEvent::kind).collect()
    }

    /// Forget recorded events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl CollisionListener for EventRecorder {
    fn on_enter(&mut self, probe: Entity, candidate: Entity) {
        self.events.push(CollisionEvent::Enter { probe, candidate });
    }

    fn on_exit(&mut self, probe: Entity, candidate: Entity) {
        self.events.push(CollisionEvent::Exit { probe, candidate });
    }

    fn on_aggregate_start(&mut self, probe: Entity, entered: &[Entity]) {
        self.events.push(CollisionEvent::AggregateStart {
            probe,
            entered: entered.to_vec(),
        });
    }

    fn on_aggregate_end(&mut self, probe: Entity, exited: &[Entity]) {
        self.events.push(CollisionEvent::AggregateEnd {
            probe,
            exited: exited.to_vec(),
        });
    }

    fn on_closest_set(&mut self, probe: Entity, candidate: Entity) {
        self.events.push(CollisionEvent::ClosestSet { probe, candidate });
    }

    fn on_closest_cleared(&mut self, probe: Entity, candidate: Entity) {
        self.events.push(CollisionEvent::ClosestCleared { probe, candidate });
    }
}

/// Listener that logs each event at `info` level
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingListener;

impl CollisionListener for LoggingListener {
    fn on_enter(&mut self, probe: Entity, candidate: Entity) {
        log::info!("{probe:?}: enter {candidate:?}");
    }

    fn on_exit(&mut self, probe: Entity, candidate: Entity) {
        log::info!("{probe:?}: exit {candidate:?}");
    }

    fn on_aggregate_start(&mut self, probe: Entity, entered: &[Entity]) {
        log::info!("{probe:?}: collide-start {entered:?}");
    }

    fn on_aggregate_end(&mut self, probe: Entity, exited: &[Entity]) {
        log::info!("{probe:?}: collide-end {exited:?}");
    }

    fn on_closest_set(&mut self, probe: Entity, candidate: Entity) {
        log::info!("{probe:?}: closest {candidate:?}");
    }

    fn on_closest_cleared(&mut self, probe: Entity, candidate: Entity) {
        log::info!("{probe:?}: closest cleared {candidate:?}");
    }
}

/// Event handler callback
pub type EventHandler = Box<dyn FnMut(&CollisionEvent)>;

/// Routes events to handlers registered for their kind
///
/// Handlers for one kind run in registration order. Only handlers
/// registered for an event's kind are notified.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<CollisionEventKind, Vec<EventHandler>>,
}

impl EventDispatcher {
    /// Create a dispatcher with no handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a specific event kind
    pub fn register_handler(&mut self, kind: CollisionEventKind, handler: EventHandler) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Number of handlers registered for `kind`
    pub fn handler_count(&self, kind: CollisionEventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Send one event to its handlers
    pub fn dispatch(&mut self, event: &CollisionEvent) {
        if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
            for handler in handlers.iter_mut() {
                handler(event);
            }
        }
    }
}

impl CollisionListener for EventDispatcher {
    fn on_enter(&mut self, probe: Entity, candidate: Entity) {
        self.dispatch(&CollisionEvent::Enter { probe, candidate });
    }

    fn on_exit(&mut self, probe: Entity, candidate: Entity) {
        self.dispatch(&CollisionEvent::Exit { probe, candidate });
    }

    fn on_aggregate_start(&mut self, probe: Entity, entered: &[Entity]) {
        if self.handler_count(CollisionEventKind::AggregateStart) > 0 {
            self.dispatch(&CollisionEvent::AggregateStart {
                probe,
                entered: entered.to_vec(),
            });
        }
    }

    fn on_aggregate_end(&mut self, probe: Entity, exited: &[Entity]) {
        if self.handler_count(CollisionEventKind::AggregateEnd) > 0 {
            self.dispatch(&CollisionEvent::AggregateEnd {
                probe,
                exited: exited.to_vec(),
            });
        }
    }

    fn on_closest_set(&mut self, probe: Entity, candidate: Entity) {
        self.dispatch(&CollisionEvent::ClosestSet { probe, candidate });
    }

    fn on_closest_cleared(&mut self, probe: Entity, candidate: Entity) {
        self.dispatch(&CollisionEvent::ClosestCleared { probe, candidate });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn pair() -> (Entity, Entity) {
        let mut keys: SlotMap<Entity, ()> = SlotMap::with_key();
        (keys.insert(()), keys.insert(()))
    }

    #[test]
    fn test_recorder_keeps_arrival_order() {
        let (probe, a) = pair();
        let mut recorder = EventRecorder::new();
        recorder.on_exit(probe, a);
        recorder.on_enter(probe, a);
        recorder.on_aggregate_end(probe, &[a]);

        assert_eq!(
            recorder.kinds(),
            vec![
                CollisionEventKind::Exit,
                CollisionEventKind::Enter,
                CollisionEventKind::AggregateEnd
            ]
        );
        assert_eq!(recorder.take().len(), 3);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_deliver_round_trips_through_listener() {
        let (probe, a) = pair();
        let events = vec![
            CollisionEvent::Enter { probe, candidate: a },
            CollisionEvent::AggregateStart {
                probe,
                entered: vec![a],
            },
            CollisionEvent::ClosestSet { probe, candidate: a },
            CollisionEvent::ClosestCleared { probe, candidate: a },
        ];
        let mut recorder = EventRecorder::new();
        for event in &events {
            event.deliver(&mut recorder);
        }
        assert_eq!(recorder.events(), events.as_slice());
        assert!(events.iter().all(|e| e.probe() == probe));
    }

    #[test]
    fn test_dispatcher_routes_by_kind() {
        let (probe, a) = pair();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();

        let sink = Rc::clone(&seen);
        dispatcher.register_handler(
            CollisionEventKind::Enter,
            Box::new(move |event: &CollisionEvent| sink.borrow_mut().push(event.clone())),
        );
        let sink = Rc::clone(&seen);
        dispatcher.register_handler(
            CollisionEventKind::Enter,
            Box::new(move |event: &CollisionEvent| sink.borrow_mut().push(event.clone())),
        );

        dispatcher.on_enter(probe, a);
        dispatcher.on_exit(probe, a);
        dispatcher.on_aggregate_start(probe, &[a]);

        assert_eq!(dispatcher.handler_count(CollisionEventKind::Enter), 2);
        assert_eq!(dispatcher.handler_count(CollisionEventKind::Exit), 0);
        assert_eq!(seen.borrow().len(), 2);
        assert!(seen
            .borrow()
            .iter()
            .all(|e| e.kind() == CollisionEventKind::Enter));
    }

    #[test]
    fn test_null_listener_accepts_everything() {
        let (probe, a) = pair();
        let mut listener = NullListener;
        CollisionEvent::Exit { probe, candidate: a }.deliver(&mut listener);
    }
}
