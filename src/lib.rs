//=========================================================================
// Quarry Engine — Library Root
//
// This crate defines the public API surface of the Quarry engine: a
// minimal MVC skeleton for a two-player pursuit game, built around a
// publish/subscribe event bus and a stack-based scene state machine.
//
// Responsibilities:
// - Expose the core subsystems (`core`): event bus, taxonomy, scene
//   stack, players, pacing, cross-thread intake
// - Expose the game engine facade (`GameEngine` / `EngineBuilder`)
// - Expose configuration loading (`config`)
//
// Typical usage:
// ```no_run
// use std::rc::Rc;
// use quarry_engine::prelude::*;
//
// fn main() {
//     let bus = Rc::new(EventManager::new());
//     let engine = EngineBuilder::new().build(&bus);
//     engine.run();
// }
// ```
//
// The process entry point itself (constructing the bus, wiring a view
// and controller, calling `run()`) belongs to the application, not to
// this crate.
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the engine's subsystems. It is exposed publicly for
// extensibility, but normal application code will mostly use the
// top-level re-exports and the prelude.
//
// `config` holds the externally supplied game constants and their
// TOML loader.
//
pub mod config;
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the game engine and its builder; the types are
// re-exported below, the module path is not part of the public API.
//
mod engine;

//--- Public Exports ------------------------------------------------------
//
// Re-exports the engine facade as the main entry point for
// applications, so users can simply `use quarry_engine::EngineBuilder;`
// without knowing the internal module structure.
//
pub use engine::{EngineBuilder, GameEngine};
