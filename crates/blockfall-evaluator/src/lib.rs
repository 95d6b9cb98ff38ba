//! Heuristic AI for the falling-block engine.
//!
//! # Architecture
//!
//! ```text
//! Self-play / autopilot (play a game)
//!     ↓ uses
//! Move search (pick the best placement for one piece)
//!     ↓ uses
//! Placement evaluation (score one placement)
//!     ↓ uses
//! Feature extraction (aggregate height, lines cleared, holes, bumpiness)
//! ```
//!
//! - [`board_analysis`] - lazily computed column heights, holes and bumpiness
//! - [`placement_analysis`] - lock-and-clear simulation on a board copy, and
//!   [`extract_features`]
//! - [`placement_evaluator`] - [`FeatureWeights`] dot product and the
//!   [`SharedWeights`] slot
//! - [`move_search`] - exhaustive rotation × column search ([`MoveSearch`])
//! - [`autoplay`] - [`AutoPilot`], which turns a best move into input events
//! - [`session`] - headless [`play_session`] used for training fitness
//!
//! Everything except the weight slot works on values or board copies, so
//! searches may run on any thread.

pub use self::{
    autoplay::*, move_search::*, placement_analysis::*, placement_evaluator::*, session::*,
};

pub mod autoplay;
pub mod board_analysis;
pub mod move_search;
pub mod placement_analysis;
pub mod placement_evaluator;
pub mod session;
