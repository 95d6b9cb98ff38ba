//! Game rules, the event-driven state machine and its timer runtime.
//!
//! - [`rules`] - total guard and mutation functions on [`GameState`]
//! - [`GameMachine`] - synchronous transitions returning [`Command`]s
//! - [`GameRuntime`] - executes commands with real timers, an [`AudioSink`]
//!   and a [`SettingsStore`]
//!
//! # Game Flow
//!
//! 1. `StartGame` resets the state, draws two pieces and starts gravity
//! 2. `Tick` moves the active piece down, or locks it and promotes the next
//! 3. After a lock, `CheckLines` animates and removes full rows
//! 4. `CheckLevelProgression` may pause gravity for a level transition
//! 5. The game ends when a promoted piece cannot be placed

pub use self::{
    config::*, game_state::*, machine::*, piece_generator::*, platform::*, runtime::*,
};

mod config;
mod game_state;
mod machine;
mod piece_generator;
mod platform;
pub mod rules;
mod runtime;
