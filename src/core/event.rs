//=========================================================================
// Event Taxonomy
//
// Defines the closed set of events broadcast over the event bus.
//
// Every interaction between components goes through these values: the
// driver posts `Initialize`, the tick source drives `EveryTick`, the
// controller posts `PlayerMove`, and the engine reacts by posting
// further events (`ChangePosition`, `Quit`, ...). No component calls
// another's transition logic directly.
//
// Responsibilities:
// - Represent everything that can happen in a stable, portable way
// - Keep payloads intrinsic to the variant (immutable value types)
// - Provide a human-readable form for debug logging
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::math::Vec2;
use super::state::State;

//=== Direction ===========================================================

/// Direction a player can be moved in.
///
/// Each direction maps to a fixed unit vector in screen coordinates
/// (y grows downward, so `Up` is negative y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the unit vector for this direction.
    #[inline]
    pub const fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

//=== Transition ==========================================================

/// Payload of [`Event::StateChange`]: what to do to the state stack.
///
/// A pop request is its own variant rather than a reserved sentinel
/// state, so a pop can never be pushed onto the stack by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Push the given state on top of the stack.
    To(State),

    /// Pop the current state off the stack.
    Pop,
}

//=== Event ===============================================================

/// Immutable value describing something that happened, broadcast to all
/// registered listeners via [`EventManager::post`].
///
/// The set is closed: the engine's dispatch is a total match, and a new
/// kind of interaction means a new variant here, not an out-of-band
/// side channel.
///
/// [`EventManager::post`]: super::bus::EventManager::post
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Driver requests engine setup. Posted once before ticking starts.
    Initialize,

    /// Terminate the main loop at the next iteration boundary.
    Quit,

    /// Push the stopped state (pause the game).
    Pause,

    /// Pop the current state (resume from pause).
    Continue,

    /// Push a state, or pop the stack (see [`Transition`]).
    StateChange(Transition),

    /// One frame elapsed.
    EveryTick,

    /// The round timer expired.
    TimesUp,

    /// Swap player roles and positions, reset the round timer.
    ChangePosition,

    /// Input moved a player.
    PlayerMove {
        /// Index into the engine's player list (0 or 1).
        player_id: usize,
        /// Which way to move.
        direction: Direction,
    },
}

//--- Display -------------------------------------------------------------
//
// Debug-friendly rendering, one line per event. Tick events are the
// noisy ones; callers filter those before logging.
//
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Initialize => write!(f, "Initialize event"),
            Event::Quit => write!(f, "Quit event"),
            Event::Pause => write!(f, "Pause event"),
            Event::Continue => write!(f, "Continue event"),
            Event::StateChange(Transition::To(state)) => {
                write!(f, "StateChange event => StateTo: {:?}", state)
            }
            Event::StateChange(Transition::Pop) => {
                write!(f, "StateChange event => Pop")
            }
            Event::EveryTick => write!(f, "Tick event"),
            Event::TimesUp => write!(f, "Time's Up event"),
            Event::ChangePosition => write!(f, "Change Position"),
            Event::PlayerMove { player_id, direction } => {
                write!(f, "PlayerMove event => player_id {} move {:?}", player_id, direction)
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=== Direction =======================================================

    #[test]
    fn direction_units_are_axis_aligned() {
        assert_eq!(Direction::Up.unit(), Vec2::new(0.0, -1.0));
        assert_eq!(Direction::Down.unit(), Vec2::new(0.0, 1.0));
        assert_eq!(Direction::Left.unit(), Vec2::new(-1.0, 0.0));
        assert_eq!(Direction::Right.unit(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn direction_units_have_unit_length() {
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            assert_eq!(dir.unit().length(), 1.0);
        }
    }

    #[test]
    fn opposite_directions_cancel() {
        assert_eq!(Direction::Up.unit() + Direction::Down.unit(), Vec2::ZERO);
        assert_eq!(Direction::Left.unit() + Direction::Right.unit(), Vec2::ZERO);
    }

    //=== Event ===========================================================

    #[test]
    fn events_are_comparable_values() {
        assert_eq!(Event::Quit, Event::Quit);
        assert_ne!(Event::Quit, Event::Pause);

        let a = Event::PlayerMove { player_id: 0, direction: Direction::Up };
        let b = Event::PlayerMove { player_id: 0, direction: Direction::Up };
        let c = Event::PlayerMove { player_id: 1, direction: Direction::Up };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn events_are_copy() {
        let event = Event::StateChange(Transition::To(State::Play));
        let copied = event;
        assert_eq!(event, copied);
    }

    #[test]
    fn state_change_push_vs_pop_are_distinct() {
        let push = Event::StateChange(Transition::To(State::Play));
        let pop = Event::StateChange(Transition::Pop);
        assert_ne!(push, pop);
    }

    #[test]
    fn display_matches_debug_strings() {
        assert_eq!(Event::Initialize.to_string(), "Initialize event");
        assert_eq!(Event::EveryTick.to_string(), "Tick event");
        assert_eq!(Event::TimesUp.to_string(), "Time's Up event");
        assert_eq!(
            Event::StateChange(Transition::To(State::Menu)).to_string(),
            "StateChange event => StateTo: Menu"
        );
        assert_eq!(
            Event::PlayerMove { player_id: 1, direction: Direction::Left }.to_string(),
            "PlayerMove event => player_id 1 move Left"
        );
    }
}
