//! Headless self-play.
//!
//! [`play_session`] plays one game with the rule functions directly, without
//! timers or input events: each spawned piece is rotated and shifted toward the
//! placement chosen by the [`MoveSearch`] (skipping blocked steps, as a live
//! game would), dropped, locked, line clears are applied, and the level is
//! updated.

use blockfall_engine::{Board, GameConfig, GameState, PieceGenerator, rules};

use crate::{autoplay::commit_moves, move_search::MoveSearch};

/// Outcome of a headless game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    pub lines_cleared: usize,
    pub score: usize,
    pub level: usize,
    /// Pieces locked into the board.
    pub pieces: usize,
    /// Singles, doubles, triples and tetrises.
    pub line_clear_counts: [usize; 4],
    pub final_board: Board,
}

impl SessionStats {
    fn from_state(state: &GameState) -> Self {
        Self {
            lines_cleared: state.lines_cleared(),
            score: state.score(),
            level: state.level(),
            pieces: state.completed_pieces(),
            line_clear_counts: *state.line_clear_counts(),
            final_board: state.board().clone(),
        }
    }
}

/// Plays one game from an empty board until a spawn fails or `max_pieces`
/// pieces have been locked.
///
/// The piece sequence is fully determined by `seed`, so two sessions with the
/// same seed and weights play identically.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameConfig;
/// use blockfall_evaluator::{MoveSearch, play_session};
///
/// let stats = play_session(&MoveSearch::default(), &GameConfig::default(), 1, 50);
/// assert!(stats.pieces <= 50);
/// ```
#[must_use]
pub fn play_session(
    search: &MoveSearch,
    config: &GameConfig,
    seed: u64,
    max_pieces: usize,
) -> SessionStats {
    let mut state = GameState::new(config.clone(), PieceGenerator::with_seed(seed));
    state.start_new_game(true);

    while state.completed_pieces() < max_pieces {
        let Some(piece) = state.current_piece().copied() else {
            break;
        };
        let Some(best) = search.best_move(state.board(), &piece, state.next_piece()) else {
            break;
        };
        let (piece, anchor) = commit_moves(state.board(), piece, state.anchor(), &best.placement);
        state.set_falling_piece(piece, anchor);
        if !rules::spawn(&mut state) {
            break;
        }
        let rows = rules::detect_full_lines(state.board());
        rules::remove_lines(&rows, &mut state);
        rules::check_level_progression(&mut state);
    }

    SessionStats::from_state(&state)
}

#[cfg(test)]
mod tests {
    use crate::placement_evaluator::{FeatureWeights, SharedWeights};

    use super::*;

    #[test]
    fn test_same_seed_same_game() {
        let search = MoveSearch::default();
        let config = GameConfig::default();
        let a = play_session(&search, &config, 99, 200);
        let b = play_session(&search, &config, 99, 200);
        assert_eq!(a, b);
    }

    #[test]
    fn test_piece_cap() {
        let stats = play_session(&MoveSearch::default(), &GameConfig::default(), 5, 30);
        assert_eq!(stats.pieces, 30);
        // 30 pieces never fill a 10x20 board under the default weights
        assert!(stats.final_board.rows().any(|row| row.iter().all(|b| b.is_empty())));
    }

    #[test]
    fn test_default_weights_clear_lines() {
        let stats = play_session(&MoveSearch::default(), &GameConfig::default(), 3, 500);
        assert!(stats.lines_cleared > 0, "{stats:?}");
        assert_eq!(stats.lines_cleared, {
            let [a, b, c, d] = stats.line_clear_counts;
            a + 2 * b + 3 * c + 4 * d
        });
    }

    #[test]
    fn test_reckless_weights_top_out() {
        // rewards height, so pieces stack up until a spawn fails
        let search = MoveSearch::new(SharedWeights::new(FeatureWeights([1.0, 0.0, 1.0, 1.0])));
        let stats = play_session(&search, &GameConfig::default(), 8, 10_000);
        assert!(stats.pieces < 10_000);
        assert!(!stats.final_board.is_row_empty(0) || !stats.final_board.is_row_empty(1));
    }
}
