//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use quarry_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{EngineBuilder, GameEngine};

// Configuration
pub use crate::config::{ConfigError, GameConfig};

// Event bus
pub use crate::core::bus::{EventManager, Listener};

// Event taxonomy
pub use crate::core::event::{Direction, Event, Transition};

// Scene stack
pub use crate::core::state::{State, StateMachine};

// Entities and math
pub use crate::core::math::Vec2;
pub use crate::core::player::{Player, Role};

// Pacing and cross-thread intake
pub use crate::core::clock::{FrameClock, NullClock, TickSource};
pub use crate::core::intake::{EventIntake, IntakeSender};
