//=========================================================================
// Game Engine
//
// The model of the MVC triad and the sole logic listener on the bus.
//
// Architecture:
// ```text
//     EngineBuilder  ──build(&bus)──>  Rc<GameEngine>  ──run()──>  [Loop]
//         │                                │
//         ├─ with_config()                 ├─ registered as Listener
//         ├─ with_clock()                  └─ owns StateMachine,
//         └─ with_intake()                    players, roll, timer
//
//     Loop (per iteration, while running):
//       drain intake ──► post(EveryTick) ──► wait for frame boundary
// ```
//
// Every state transition is mediated by posted events: the driver,
// the controller, and the engine itself all talk to the model through
// `EventManager::post`, never by calling transition logic directly.
// Dispatch recurses: events the engine posts from inside `notify`
// (collision quit, role swap) are fully processed before the
// triggering broadcast resumes.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::config::GameConfig;
use crate::core::bus::{EventManager, Listener};
use crate::core::clock::{FrameClock, TickSource};
use crate::core::event::{Direction, Event, Transition};
use crate::core::intake::EventIntake;
use crate::core::player::Player;
use crate::core::state::{State, StateMachine};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing a [`GameEngine`].
///
/// # Default Values
///
/// - **Config**: `GameConfig::default()`
/// - **Tick source**: a [`FrameClock`] at the configured fps
/// - **Intake**: none (all events posted on the engine thread)
///
/// # Examples
///
/// Simple usage with defaults:
/// ```no_run
/// use std::rc::Rc;
/// use quarry_engine::prelude::*;
///
/// let bus = Rc::new(EventManager::new());
/// let engine = EngineBuilder::new().build(&bus);
/// engine.run();
/// ```
///
/// With configuration and an intake channel for an input thread:
/// ```no_run
/// # use std::rc::Rc;
/// # use quarry_engine::prelude::*;
/// let (sender, intake) = EventIntake::channel(128);
///
/// let bus = Rc::new(EventManager::new());
/// let engine = EngineBuilder::new()
///     .with_config(GameConfig { fps: 120, ..Default::default() })
///     .with_intake(intake)
///     .build(&bus);
///
/// std::thread::spawn(move || {
///     sender.send(Event::PlayerMove { player_id: 0, direction: Direction::Up });
/// });
///
/// engine.run();
/// ```
pub struct EngineBuilder {
    config: GameConfig,
    clock: Option<Box<dyn TickSource>>,
    intake: Option<EventIntake>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            clock: None,
            intake: None,
        }
    }

    /// Sets the game configuration.
    ///
    /// Validity is checked at [`EngineBuilder::build`] time.
    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the tick source.
    ///
    /// The default is a [`FrameClock`] at the configured fps; tests
    /// inject [`NullClock`](crate::core::clock::NullClock) to run the
    /// loop unthrottled.
    pub fn with_clock(mut self, clock: impl TickSource + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Attaches the receiving half of an intake channel.
    ///
    /// The engine drains it at the top of every loop iteration, posting
    /// each received event on its own thread (see [`EventIntake`]).
    pub fn with_intake(mut self, intake: EventIntake) -> Self {
        self.intake = Some(intake);
        self
    }

    /// Builds the engine and registers it with the bus.
    ///
    /// The engine is a listener from this moment on; events may flow
    /// before `run()` is ever called (the test harness drives it that
    /// way). The driver keeps the returned `Rc` alive for as long as
    /// the engine should stay registered.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid (zero fps or round
    /// length, degenerate arena).
    pub fn build(self, bus: &Rc<EventManager>) -> Rc<GameEngine> {
        if let Err(error) = self.config.validate() {
            panic!("Refusing to build engine: {}", error);
        }

        info!(
            "Building engine (fps: {}, arena: {}x{}, round: {} ticks)",
            self.config.fps,
            self.config.arena_width,
            self.config.arena_height,
            self.config.game_length
        );

        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(FrameClock::new(self.config.fps)));

        let engine = Rc::new(GameEngine {
            bus: Rc::clone(bus),
            config: self.config,
            clock: RefCell::new(clock),
            intake: self.intake,
            state: RefCell::new(EngineState {
                state_machine: StateMachine::new(),
                players: Vec::new(),
                roll: [0, 1],
                timer: 0,
                running: false,
            }),
        });

        bus.register_listener(engine.clone());
        engine
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== EngineState =========================================================

/// Mutable game state, kept behind one `RefCell` so recursive dispatch
/// can re-enter the engine. Borrows are short and never held across a
/// nested post.
#[derive(Debug)]
struct EngineState {
    state_machine: StateMachine,
    players: Vec<Player>,
    roll: [usize; 2],
    timer: u64,
    running: bool,
}

//=== GameEngine ==========================================================

/// The main game engine. The main loop of the game is in
/// [`GameEngine::run`].
///
/// Reacts to every posted event per the transition protocol:
///
/// | Event | Effect |
/// |---|---|
/// | `Initialize` | push `Menu`, `roll = [0, 1]`, fresh players, reset timer |
/// | `EveryTick` | per-scene update; in `Play`, count down toward the role swap |
/// | `StateChange(To(s))` | push `s` |
/// | `StateChange(Pop)` | pop; posts `Quit` when the stack runs out |
/// | `Quit` | stop the main loop at the next iteration boundary |
/// | `PlayerMove` | move the player, then check for the winning touch |
/// | `TimesUp` | push `EndGame` |
/// | `Pause` / `Continue` | push / pop `Stopped` |
/// | `ChangePosition` | swap roles, rebuild players, reset timer |
///
/// # Threading
///
/// Strictly single-threaded: the engine, the bus, and every other
/// listener live on one thread. Other threads reach the game only
/// through an [`EventIntake`] channel.
pub struct GameEngine {
    bus: Rc<EventManager>,
    config: GameConfig,
    clock: RefCell<Box<dyn TickSource>>,
    intake: Option<EventIntake>,
    state: RefCell<EngineState>,
}

impl GameEngine {
    //--- Main Loop --------------------------------------------------------

    /// Runs the main loop until a `Quit` event is processed.
    ///
    /// Posts `Initialize`, then per iteration: drains the intake
    /// channel (if any), posts `EveryTick`, and blocks until the next
    /// frame boundary. `running` is read only at the top of each
    /// iteration, so dispatch in flight when `Quit` lands still
    /// completes, but no further `EveryTick` is posted afterwards.
    pub fn run(&self) {
        info!("Engine starting (fps: {})", self.config.fps);

        self.state.borrow_mut().running = true;
        self.bus.post(Event::Initialize);
        self.state.borrow_mut().timer = self.config.game_length;

        while self.state.borrow().running {
            if let Some(intake) = &self.intake {
                intake.drain_into(&self.bus);
            }
            self.bus.post(Event::EveryTick);
            self.clock.borrow_mut().wait_frame();
        }

        info!("Engine stopped");
    }

    //--- Inspection -------------------------------------------------------
    //
    // Read-only views for the view layer (and tests). Cheap snapshots;
    // the engine never hands out references into its RefCell.
    //

    /// The state currently in control, if any.
    pub fn current_state(&self) -> Option<State> {
        self.state.borrow().state_machine.peek()
    }

    /// Snapshot of both players (empty before `Initialize`).
    pub fn players(&self) -> Vec<Player> {
        self.state.borrow().players.clone()
    }

    /// Current id-to-role mapping; `roll[slot]` is the id playing in
    /// that slot.
    pub fn roll(&self) -> [usize; 2] {
        self.state.borrow().roll
    }

    /// Ticks left until the next role swap.
    pub fn timer(&self) -> u64 {
        self.state.borrow().timer
    }

    /// Whether the main loop keeps going.
    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    //--- Event Handlers ---------------------------------------------------

    /// Sets up a new game: start scene, initial roles, fresh players.
    fn initialize(&self) {
        info!("Engine initializing");

        self.clock.borrow_mut().restart();

        let mut state = self.state.borrow_mut();
        state.state_machine.push(State::Menu);
        state.roll = [0, 1];
        state.players = vec![
            Player::new(state.roll[0], &self.config),
            Player::new(state.roll[1], &self.config),
        ];
        state.timer = self.config.game_length;
    }

    /// One frame of work for whichever scene is on top.
    fn every_tick(&self) {
        let current = self.state.borrow().state_machine.peek();

        match current {
            Some(State::Menu) => self.update_menu(),
            Some(State::Play) => {
                self.update_objects();

                let expired = {
                    let mut state = self.state.borrow_mut();
                    state.timer = state.timer.saturating_sub(1);
                    state.timer == 0
                };
                if expired {
                    self.bus.post(Event::ChangePosition);
                }
            }
            Some(State::EndGame) => self.update_endgame(),
            Some(State::Stopped) | None => {}
        }
    }

    fn state_change(&self, transition: Transition) {
        match transition {
            Transition::To(state) => {
                self.state.borrow_mut().state_machine.push(state);
            }
            Transition::Pop => {
                let exhausted = {
                    let mut state = self.state.borrow_mut();
                    state.state_machine.pop();
                    state.state_machine.is_empty()
                };
                if exhausted {
                    // Popping the last scene means the game is over.
                    self.bus.post(Event::Quit);
                }
            }
        }
    }

    fn player_move(&self, player_id: usize, direction: Direction) {
        {
            let mut state = self.state.borrow_mut();
            assert!(
                player_id < state.players.len(),
                "PlayerMove for unknown player id {}",
                player_id
            );
            state.players[player_id].move_direction(direction, &self.config);
        }
        self.check_collision();
    }

    /// Swaps which id plays which role and restarts the round.
    ///
    /// Both players are reconstructed from scratch at the new roles'
    /// start positions; nothing of the old round survives the swap.
    fn change_position(&self) {
        let mut state = self.state.borrow_mut();

        state.roll.swap(0, 1);
        state.players = vec![
            Player::new(state.roll[0], &self.config),
            Player::new(state.roll[1], &self.config),
        ];
        state.timer = self.config.game_length;

        debug!("Roles swapped, roll = {:?}", state.roll);
    }

    /// If the players touch, the game is over, not just the round.
    fn check_collision(&self) {
        let touching = {
            let state = self.state.borrow();
            match state.players.as_slice() {
                [a, b] => a.distance(b) < 2.0 * self.config.player_radius,
                _ => false,
            }
        };

        if touching {
            debug!("Players collided");
            self.bus.post(Event::Quit);
        }
    }

    //--- Scene Updates ----------------------------------------------------

    /// Updates the objects in the welcome scene.
    /// For example: game title, hint text.
    fn update_menu(&self) {
        trace!("menu update");
    }

    /// Updates the objects not controlled by the user.
    /// For example: obstacles, items, special effects.
    fn update_objects(&self) {
        trace!("objects update");
    }

    /// Updates the objects in the endgame scene.
    /// For example: scoreboard.
    fn update_endgame(&self) {
        trace!("endgame update");
    }
}

//=== Listener Implementation =============================================

impl Listener for GameEngine {
    /// Called by the EventManager when an event occurs.
    fn notify(&self, event: &Event) {
        match *event {
            Event::Initialize => self.initialize(),
            Event::EveryTick => self.every_tick(),
            Event::StateChange(transition) => self.state_change(transition),
            Event::Quit => {
                info!("Quit received, stopping after this iteration");
                self.state.borrow_mut().running = false;
            }
            Event::PlayerMove { player_id, direction } => self.player_move(player_id, direction),
            Event::TimesUp => {
                self.state.borrow_mut().state_machine.push(State::EndGame);
            }
            Event::Pause => {
                self.state.borrow_mut().state_machine.push(State::Stopped);
            }
            Event::Continue => {
                if self.state.borrow_mut().state_machine.pop().is_none() {
                    warn!("Continue with no state on the stack, ignoring");
                }
            }
            Event::ChangePosition => self.change_position(),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
