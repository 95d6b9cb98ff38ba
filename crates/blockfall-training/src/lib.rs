//! Training system for evolving evaluator weights by self-play.
//!
//! # How Training Works
//!
//! 1. **Population** - create individuals with random [`FeatureWeights`]
//! 2. **Fitness** - each individual plays one headless game
//!    ([`blockfall_evaluator::play_session`]); its fitness is the number of
//!    lines cleared
//! 3. **Reproduction** - rank by fitness, pair neighbours, cross over and
//!    mutate to build the next generation
//! 4. **Repeat** - for the requested number of generations
//! 5. **Install** - evaluate the last generation once more and write the best
//!    weights into the live [`SharedWeights`] slot
//!
//! # Architecture
//!
//! ```text
//! Trainer
//!     ↓ owns
//! Population (genetic)
//!     ↓ each individual's weights are written into
//! SharedWeights (blockfall-evaluator)
//!     ↓ read by
//! MoveSearch → play_session
//!     ↓ produces
//! Fitness (lines cleared)
//! ```
//!
//! Every individual of one generation plays the same piece sequence, so their
//! fitness values are directly comparable. Trained weights are exported as an
//! [`AiModel`] JSON file and read back through a [`ModelLoader`].
//!
//! [`FeatureWeights`]: blockfall_evaluator::FeatureWeights
//! [`SharedWeights`]: blockfall_evaluator::SharedWeights

pub use self::{model::*, trainer::*};

pub mod genetic;
mod model;
mod trainer;
pub mod weights;
