//! Placement, spawning, line clearing, scoring and level rules.
//!
//! Every guard here is total: an illegal move is a `false`, never an error.

use crate::core::{Board, Piece, Position};

use super::GameState;

/// Base points per removed line, multiplied by the current level.
const LINE_SCORE: usize = 100;
/// Flat bonus for removing exactly four lines at once.
const TETRIS_BONUS: usize = 400;

/// Returns whether `piece` fits on `board` at `anchor`.
///
/// Cells above the board (negative rows) are allowed as long as their column
/// is in range. Cells below the board, outside the columns, or on an occupied
/// cell are not.
#[must_use]
pub fn can_place(board: &Board, piece: &Piece, anchor: Position) -> bool {
    piece.cells(anchor).all(|cell| {
        if cell.row < 0 {
            return board.contains_col(cell.col);
        }
        match board.index_of(cell) {
            Some((row, col)) => !board.is_occupied(row, col),
            None => false,
        }
    })
}

/// Returns whether the active piece can be moved by `offset`.
///
/// Always `false` when there is no active piece.
#[must_use]
pub fn can_move(state: &GameState, offset: Position) -> bool {
    state
        .current_piece()
        .is_some_and(|piece| can_place(state.board(), piece, state.anchor() + offset))
}

/// Lowest anchor reachable from `anchor` by moving straight down.
///
/// Returns `anchor` itself when the piece cannot move down at all.
#[must_use]
pub fn landing_position(board: &Board, piece: &Piece, anchor: Position) -> Position {
    let mut anchor = anchor;
    while can_place(board, piece, anchor + Position::DOWN) {
        anchor = anchor + Position::DOWN;
    }
    anchor
}

/// Locks the active piece and promotes the next piece.
///
/// Returns `false` when the game is over: either the outgoing piece never left
/// its spawn row, or the promoted piece does not fit at the spawn position.
pub fn spawn(state: &mut GameState) -> bool {
    if let Some(piece) = state.current_piece.take() {
        state.board.lock_piece(&piece, state.anchor);
        state.completed_pieces += 1;
        if state.anchor.row <= state.config.spawn_position(piece.kind()).row {
            return false;
        }
    }

    let piece = match state.next_piece.take() {
        Some(piece) => piece,
        None => state.generator.next_piece(),
    };
    state.next_piece = Some(state.generator.next_piece());
    state.anchor = state.config.spawn_position(piece.kind());
    state.current_piece = Some(piece);
    state.spawned_pieces += 1;

    can_place(&state.board, &piece, state.anchor)
}

/// Full rows, scanned bottom to top (highest index first).
#[must_use]
pub fn detect_full_lines(board: &Board) -> Vec<usize> {
    (0..board.height())
        .rev()
        .filter(|row| board.is_row_full(*row))
        .collect()
}

/// Removes `rows`, then credits lines and score.
///
/// Does nothing for an empty list.
pub fn remove_lines(rows: &[usize], state: &mut GameState) {
    if rows.is_empty() {
        return;
    }
    let removed = state.board.remove_rows(rows);
    if removed == 0 {
        return;
    }

    state.score += removed * LINE_SCORE * state.level;
    if removed == 4 {
        state.score += TETRIS_BONUS;
    }
    state.lines_cleared += removed;
    if let Some(count) = state.line_clear_counts.get_mut(removed - 1) {
        *count += 1;
    }
}

/// Advances the level once the cumulative line count reaches the threshold.
///
/// On success the threshold grows by the configured lines per level and the
/// gravity interval is recomputed. Returns whether the level changed.
pub fn check_level_progression(state: &mut GameState) -> bool {
    if state.lines_cleared < state.lines_to_next_level {
        return false;
    }
    state.level += 1;
    state.lines_to_next_level += state.config.lines_per_level;
    state.game_speed = state.config.speed_for_level(state.level);
    true
}
