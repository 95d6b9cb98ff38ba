//! Move search: choosing where the active piece should land.
//!
//! # How It Works
//!
//! 1. **Enumerate** - every rotation state (0 to 3 quarter turns) and every
//!    anchor column that keeps all blocks inside the board
//! 2. **Drop** - start with the piece's top block on row 0 and move down while
//!    the piece fits; candidates that do not fit at the top are skipped
//! 3. **Score** - extract [`BoardFeatures`] at the resting position and
//!    evaluate them
//! 4. **Select** - keep the highest score; ties go to the earliest candidate
//!    in rotation-then-column order
//!
//! The search is greedy: it looks at the active piece only. The next-piece
//! hint accepted by [`MoveSearch::best_move`] is reserved for a lookahead
//! extension and does not influence the result.

use arrayvec::ArrayVec;
use blockfall_engine::{Board, Piece, Position, rules};

use crate::{
    placement_analysis::{BoardFeatures, PlacementAnalysis},
    placement_evaluator::{PlacementEvaluator, SharedWeights},
};

/// A legal resting position for a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// The piece after `rotation` quarter turns.
    pub piece: Piece,
    pub rotation: u8,
    /// Resting anchor; its column is the target column.
    pub anchor: Position,
}

/// Result of [`MoveSearch::best_move`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMove {
    pub placement: Placement,
    pub score: f32,
    pub features: BoardFeatures,
}

impl BestMove {
    /// Leftmost board column covered by the placed piece.
    ///
    /// Always within `[0, width)`. The anchor column may lie outside the
    /// board when the rotated blocks sit right of the anchor.
    #[must_use]
    pub fn column(&self) -> i32 {
        self.placement.anchor.col + self.placement.piece.col_extent().0
    }

    #[must_use]
    pub fn rotation(&self) -> u8 {
        self.placement.rotation
    }
}

/// Enumerates every candidate resting position of `piece` on `board`.
///
/// Candidates come in rotation order (0 to 3), then left to right.
pub fn candidate_placements(board: &Board, piece: Piece) -> impl Iterator<Item = Placement> + '_ {
    let rotations: ArrayVec<(u8, Piece), 4> =
        (0..4).map(|n| (n, piece.rotated_times(n))).collect();
    rotations.into_iter().flat_map(move |(rotation, piece)| {
        let (min_col, max_col) = piece.col_extent();
        let width = i32::try_from(board.width()).unwrap_or(i32::MAX);
        let top = -piece.min_row();
        (-min_col..width - max_col).filter_map(move |col| {
            let start = Position::new(top, col);
            if !rules::can_place(board, &piece, start) {
                return None;
            }
            Some(Placement {
                piece,
                rotation,
                anchor: rules::landing_position(board, &piece, start),
            })
        })
    })
}

/// Evaluates every candidate with `evaluator` and returns the best.
///
/// Returns `None` when no candidate fits on the board.
#[must_use]
pub fn best_move_with<E>(evaluator: &E, board: &Board, piece: &Piece) -> Option<BestMove>
where
    E: PlacementEvaluator + ?Sized,
{
    let mut best: Option<BestMove> = None;
    for placement in candidate_placements(board, *piece) {
        let features =
            PlacementAnalysis::from_board(board, placement.piece, placement.anchor).features();
        let score = evaluator.evaluate_placement(&features);
        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(BestMove {
                placement,
                score,
                features,
            });
        }
    }
    best
}

/// Greedy placement search driven by the live weights in a [`SharedWeights`]
/// slot.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind};
/// use blockfall_evaluator::MoveSearch;
///
/// let search = MoveSearch::default();
/// let best = search
///     .best_move(&Board::default(), &Piece::new(PieceKind::I), None)
///     .unwrap();
/// assert!((0..10).contains(&best.column()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MoveSearch {
    weights: SharedWeights,
}

impl MoveSearch {
    #[must_use]
    pub fn new(weights: SharedWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &SharedWeights {
        &self.weights
    }

    /// Finds the best placement of `piece` on `board`.
    ///
    /// The weights are read once, so a concurrent replacement never mixes two
    /// weight vectors within one search. `_next_hint` is currently unused.
    #[must_use]
    pub fn best_move(
        &self,
        board: &Board,
        piece: &Piece,
        _next_hint: Option<&Piece>,
    ) -> Option<BestMove> {
        let weights = self.weights.snapshot();
        best_move_with(&weights, board, piece)
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::PieceKind;

    use super::*;
    use crate::placement_evaluator::FeatureWeights;

    #[derive(Debug)]
    struct Indifferent;

    impl PlacementEvaluator for Indifferent {
        fn evaluate_placement(&self, _features: &BoardFeatures) -> f32 {
            0.0
        }
    }

    #[test]
    fn test_i_piece_candidates_on_empty_board() {
        let board = Board::default();
        let candidates: Vec<_> = candidate_placements(&board, Piece::new(PieceKind::I)).collect();
        let per_rotation: Vec<_> = (0..4)
            .map(|r| candidates.iter().filter(|c| c.rotation == r).count())
            .collect();
        assert_eq!(per_rotation, vec![7, 10, 7, 10]);
        for candidate in &candidates {
            assert!(rules::can_place(&board, &candidate.piece, candidate.anchor));
            assert!(candidate.piece.cells(candidate.anchor).all(|c| c.row <= 19));
            assert!(candidate.piece.cells(candidate.anchor).any(|c| c.row == 19));
        }
    }

    #[test]
    fn test_best_move_prefers_line_clear() {
        let board = Board::from_ascii(
            "
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            SSSSSSSSS.
            ",
        );
        let best = MoveSearch::default()
            .best_move(&board, &Piece::new(PieceKind::I), None)
            .unwrap();
        assert_eq!(best.features.cleared_lines, 1);
        assert!(best.placement.piece.cells(best.placement.anchor).all(|c| c.col == 9));
        assert_eq!(best.rotation() % 2, 1);
    }

    #[test]
    fn test_left_edge_well_column_is_on_board() {
        let art = format!(
            "{}{}",
            "..........\n".repeat(16),
            ".SSSSSSSSS\n".repeat(4)
        );
        let board = Board::from_ascii(&art);
        let best = MoveSearch::default()
            .best_move(&board, &Piece::new(PieceKind::I), None)
            .unwrap();
        assert_eq!(best.features.cleared_lines, 4);
        assert_eq!(best.column(), 0);
        assert!(best.placement.piece.cells(best.placement.anchor).all(|c| c.col == 0));
    }

    #[test]
    fn test_best_column_in_bounds_for_every_shape() {
        let board = Board::default();
        for kind in PieceKind::ALL {
            let best = MoveSearch::default()
                .best_move(&board, &Piece::new(kind), None)
                .unwrap();
            assert!((0..10).contains(&best.column()), "{kind:?}: {}", best.column());
        }
    }

    #[test]
    fn test_ties_resolve_to_first_candidate() {
        let board = Board::default();
        let best = best_move_with(&Indifferent, &board, &Piece::new(PieceKind::T)).unwrap();
        assert_eq!(best.rotation(), 0);
        assert_eq!(best.column(), 0);
    }

    #[test]
    fn test_blocked_columns_are_skipped() {
        let mut board = Board::new(4, 4);
        for row in 0..4 {
            board.fill_row(row, PieceKind::Z);
        }
        let piece = Piece::new(PieceKind::O);
        assert!(best_move_with(&FeatureWeights::DEFAULT, &board, &piece).is_none());
    }

    #[test]
    fn test_search_uses_live_weights() {
        let search = MoveSearch::default();
        let board = Board::default();
        let piece = Piece::new(PieceKind::O);
        let before = search.best_move(&board, &piece, None).unwrap();
        search.weights().replace(FeatureWeights([0.0, 0.0, 0.0, 0.0]));
        let after = search.best_move(&board, &piece, None).unwrap();
        assert!(after.score.abs() < f32::EPSILON);
        assert!(before.score < 0.0);
    }
}
