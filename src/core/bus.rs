//=========================================================================
// Event Bus
//=========================================================================
//
// Publish/subscribe dispatcher decoupling the Model, View, and
// Controller. All of them are listeners; the EventManager broadcasts
// every posted event to each of them, in registration order, on the
// posting thread.
//
// Architecture:
//   post(event) ──► snapshot registry ──► notify each live listener
//                        │
//   nested post() ◄──────┘ (handlers may post; dispatch recurses)
//
// Key Design Decisions:
// - **Synchronous recursive dispatch**: `post` is a direct call stack,
//   not a queue. An event posted from inside a handler is fully
//   broadcast before the outer `post` resumes.
// - **Non-owning registry**: listeners are held as `Weak` references
//   and liveness is checked at dispatch time, so a listener that is
//   dropped without unregistering simply stops receiving events.
// - **Closed listener set**: `Listener` is implemented by a fixed,
//   enumerated set of components (the engine, and in the full system
//   the view and controller), not an open plugin surface.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use super::event::Event;

//=== Listener Trait ======================================================

/// Capability to receive broadcast events.
///
/// `notify` is called synchronously on the posting thread. Because
/// dispatch recurses, a listener can be re-entered while one of its
/// `notify` calls is still on the stack. Implementers keep their
/// mutable state behind `RefCell` and must not hold a borrow across a
/// nested [`EventManager::post`].
///
/// Listeners must not assume anything about their position relative to
/// other listeners beyond registration order.
pub trait Listener {
    /// Called by the EventManager when an event occurs.
    fn notify(&self, event: &Event);
}

//=== EventManager ========================================================

/// Coordinates communication between the Model, View, and Controller.
///
/// Holds an ordered registry of listeners and broadcasts posted events
/// to every live one of them. Created once at process start and shared
/// via `Rc` by the driver and all listeners; the registry itself holds
/// only `Weak` back-references, so the manager never keeps a listener
/// alive.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use quarry_engine::prelude::*;
///
/// struct Echo;
///
/// impl Listener for Echo {
///     fn notify(&self, event: &Event) {
///         println!("{}", event);
///     }
/// }
///
/// let bus = Rc::new(EventManager::new());
/// let echo = Rc::new(Echo);
/// bus.register_listener(echo.clone());
/// bus.post(Event::Initialize);
/// ```
#[derive(Default)]
pub struct EventManager {
    listeners: RefCell<Vec<Weak<dyn Listener>>>,
}

impl EventManager {
    /// Creates an event manager with an empty registry.
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Adds a listener to the registry.
    ///
    /// The listener will receive every posted event through its
    /// [`Listener::notify`] call, after all previously registered
    /// listeners. Registration is not idempotent: registering the same
    /// listener twice means it is notified twice per post.
    pub fn register_listener(&self, listener: Rc<dyn Listener>) {
        self.listeners.borrow_mut().push(Rc::downgrade(&listener));
        trace!("Listener registered ({} total)", self.listeners.borrow().len());
    }

    /// Removes a listener from the registry by identity.
    ///
    /// Every registration of exactly this listener is removed; delivery
    /// to it stops with the next `post`. A broadcast already in flight
    /// still completes with its original registry snapshot. Unknown
    /// listeners are tolerated with a warning. Callers that instead
    /// drop their listener without unregistering are also fine, since
    /// dead registrations are skipped and pruned during `post`.
    pub fn unregister_listener(&self, listener: &dyn Listener) {
        let target = listener as *const dyn Listener as *const ();
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();

        listeners.retain(|weak| weak.as_ptr() as *const () != target);

        if listeners.len() == before {
            warn!("Attempted to unregister a listener that was not registered");
        }
    }

    /// Returns the number of live registrations.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    //--- Dispatch ---------------------------------------------------------

    /// Broadcasts an event to all registered listeners.
    ///
    /// Listeners are notified in registration order, synchronously on
    /// the calling thread. Delivery is fire-and-forget: no return
    /// values are collected. Dispatch iterates over a snapshot of the
    /// registry, so handlers are free to register, unregister, and post
    /// from inside `notify`; a nested post is fully broadcast before
    /// this call resumes with the next listener.
    pub fn post(&self, event: Event) {
        if !matches!(event, Event::EveryTick) {
            debug!("{}", event);
        }

        let snapshot: Vec<Weak<dyn Listener>> = self.listeners.borrow().clone();

        for weak in &snapshot {
            if let Some(listener) = weak.upgrade() {
                listener.notify(&event);
            }
        }

        // Prune registrations whose listener has been dropped.
        self.listeners.borrow_mut().retain(|weak| weak.strong_count() > 0);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Listeners ---------------------------------------------------

    /// Records every received event into its own log.
    struct Recorder {
        events: RefCell<Vec<Event>>,
    }

    impl Recorder {
        fn new() -> Rc<Self> {
            Rc::new(Self { events: RefCell::new(Vec::new()) })
        }
    }

    impl Listener for Recorder {
        fn notify(&self, event: &Event) {
            self.events.borrow_mut().push(*event);
        }
    }

    /// Appends its id to a shared log, for ordering assertions.
    struct Tagged {
        id: usize,
        log: Rc<RefCell<Vec<usize>>>,
    }

    impl Listener for Tagged {
        fn notify(&self, _event: &Event) {
            self.log.borrow_mut().push(self.id);
        }
    }

    /// Posts a follow-up event when it sees the trigger.
    struct Chainer {
        bus: Rc<EventManager>,
        trigger: Event,
        response: Event,
    }

    impl Listener for Chainer {
        fn notify(&self, event: &Event) {
            if *event == self.trigger {
                self.bus.post(self.response);
            }
        }
    }

    //--- Registration & Ordering ------------------------------------------

    #[test]
    fn post_delivers_in_registration_order() {
        let bus = EventManager::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let listeners: Vec<Rc<Tagged>> = (0..3)
            .map(|id| Rc::new(Tagged { id, log: log.clone() }))
            .collect();
        for listener in &listeners {
            bus.register_listener(listener.clone());
        }

        bus.post(Event::EveryTick);

        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn double_registration_notifies_twice() {
        let bus = EventManager::new();
        let recorder = Recorder::new();

        bus.register_listener(recorder.clone());
        bus.register_listener(recorder.clone());

        bus.post(Event::Quit);

        assert_eq!(recorder.events.borrow().len(), 2);
    }

    #[test]
    fn unregister_stops_delivery() {
        let bus = EventManager::new();
        let first = Recorder::new();
        let second = Recorder::new();

        bus.register_listener(first.clone());
        bus.register_listener(second.clone());
        bus.unregister_listener(first.as_ref());

        bus.post(Event::Pause);

        assert!(first.events.borrow().is_empty());
        assert_eq!(second.events.borrow().len(), 1);
        assert_eq!(bus.listener_count(), 1);
    }

    #[test]
    fn unregister_unknown_listener_is_tolerated() {
        let bus = EventManager::new();
        let stranger = Recorder::new();

        bus.unregister_listener(stranger.as_ref());

        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn dropped_listener_is_skipped_and_pruned() {
        let bus = EventManager::new();
        let survivor = Recorder::new();

        bus.register_listener(survivor.clone());
        {
            let doomed = Recorder::new();
            bus.register_listener(doomed.clone());
            assert_eq!(bus.listener_count(), 2);
        }

        assert_eq!(bus.listener_count(), 1);
        bus.post(Event::Continue);

        assert_eq!(survivor.events.borrow().len(), 1);
        assert_eq!(bus.listeners.borrow().len(), 1);
    }

    //--- Recursive Dispatch -----------------------------------------------

    #[test]
    fn nested_post_completes_before_outer_broadcast_resumes() {
        let bus = Rc::new(EventManager::new());
        let chainer = Rc::new(Chainer {
            bus: bus.clone(),
            trigger: Event::Pause,
            response: Event::Quit,
        });
        let recorder = Recorder::new();

        // Chainer first: its nested Quit is dispatched while the outer
        // Pause broadcast has not yet reached the recorder.
        bus.register_listener(chainer.clone());
        bus.register_listener(recorder.clone());

        bus.post(Event::Pause);

        assert_eq!(*recorder.events.borrow(), vec![Event::Quit, Event::Pause]);
    }

    #[test]
    fn registration_during_dispatch_skips_inflight_event() {
        struct LateRegistrar {
            bus: Rc<EventManager>,
            late: RefCell<Option<Rc<Recorder>>>,
        }

        impl Listener for LateRegistrar {
            fn notify(&self, _event: &Event) {
                if let Some(late) = self.late.borrow_mut().take() {
                    self.bus.register_listener(late);
                }
            }
        }

        let bus = Rc::new(EventManager::new());
        let late = Recorder::new();
        let registrar = Rc::new(LateRegistrar {
            bus: bus.clone(),
            late: RefCell::new(Some(late.clone())),
        });
        bus.register_listener(registrar.clone());

        // The in-flight broadcast uses the old snapshot.
        bus.post(Event::TimesUp);
        assert!(late.events.borrow().is_empty());

        // The next one reaches the late registration.
        bus.post(Event::Quit);
        assert_eq!(*late.events.borrow(), vec![Event::Quit]);
    }
}
