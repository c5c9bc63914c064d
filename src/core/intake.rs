//=========================================================================
// Event Intake
//=========================================================================
//
// Funnel for events that originate off the engine thread.
//
// Architecture:
//   other threads ──IntakeSender──► bounded channel ──drain_into()──► post()
//
// The dispatch model is strictly single-threaded: `EventManager::post`
// must only ever run on the thread that owns the engine. Anything with
// its own thread (device polling, network input) therefore sends plain
// `Event` values through this channel, and the engine drains it at the
// top of each loop iteration, re-posting every event on its own thread
// with the usual synchronous-recursive dispatch.
//
// Bounded drain prevents a chatty producer from starving the tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::bus::EventManager;
use super::event::Event;

//=== Limits ==============================================================

/// Upper bound on events drained per frame.
const MAX_EVENTS_PER_FRAME: usize = 100;

//=== IntakeSender ========================================================

/// Cloneable, `Send` handle for posting events from other threads.
///
/// Events arrive at the engine in send order at the next drain.
#[derive(Debug, Clone)]
pub struct IntakeSender {
    sender: Sender<Event>,
}

impl IntakeSender {
    /// Hands an event to the engine thread.
    ///
    /// Never blocks. Returns `false` (with a warning logged) if the
    /// event was dropped because the queue is full or the engine side
    /// has been dropped.
    pub fn send(&self, event: Event) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                warn!("Intake queue full, dropping {}", event);
                false
            }
            Err(TrySendError::Disconnected(event)) => {
                warn!("Intake disconnected, dropping {}", event);
                false
            }
        }
    }
}

//=== EventIntake =========================================================

/// Receiving half of the intake channel, owned by the engine thread.
pub struct EventIntake {
    receiver: Receiver<Event>,
}

impl EventIntake {
    /// Creates a bounded intake channel.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn channel(capacity: usize) -> (IntakeSender, EventIntake) {
        assert!(capacity > 0, "Intake capacity must be positive");
        let (sender, receiver) = bounded(capacity);
        (IntakeSender { sender }, EventIntake { receiver })
    }

    /// Drains pending events onto the bus, in send order.
    ///
    /// Bounded per call to prevent starvation of the tick that follows.
    /// A disconnected channel (all senders dropped) drains as empty.
    /// Returns the number of events posted.
    pub fn drain_into(&self, bus: &EventManager) -> usize {
        let mut drained = 0;

        while drained < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    bus.post(event);
                    drained += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if drained >= MAX_EVENTS_PER_FRAME {
            warn!("Intake backlog: drained {} events this frame", drained);
        }

        drained
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
