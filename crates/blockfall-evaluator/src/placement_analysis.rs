//! Analysis of the board after a hypothetical piece placement.
//!
//! [`PlacementAnalysis`] locks the piece onto a copy of the board, removes any
//! full rows without scoring them, and exposes the resulting board through a
//! [`BoardAnalysis`]. The input board is never modified, so analyses of
//! different candidates can run side by side on the same board.

use blockfall_engine::{Board, Piece, Position};
use serde::{Deserialize, Serialize};

use crate::board_analysis::BoardAnalysis;

/// The four heuristic inputs of the evaluator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardFeatures {
    pub aggregate_height: usize,
    pub cleared_lines: usize,
    pub holes: usize,
    pub bumpiness: usize,
}

impl BoardFeatures {
    pub const LEN: usize = 4;

    /// Feature names, in [`BoardFeatures::to_array`] order.
    pub const NAMES: [&'static str; Self::LEN] =
        ["aggregate_height", "lines_cleared", "holes", "bumpiness"];

    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn to_array(self) -> [f32; Self::LEN] {
        [
            self.aggregate_height as f32,
            self.cleared_lines as f32,
            self.holes as f32,
            self.bumpiness as f32,
        ]
    }
}

#[derive(Debug)]
pub struct PlacementAnalysis {
    piece: Piece,
    anchor: Position,
    cleared_lines: usize,
    board_analysis: BoardAnalysis,
}

impl PlacementAnalysis {
    #[must_use]
    pub fn from_board(before_placement: &Board, piece: Piece, anchor: Position) -> Self {
        let mut board = before_placement.clone();
        board.lock_piece(&piece, anchor);
        let cleared_lines = board.clear_full_rows();

        Self {
            piece,
            anchor,
            cleared_lines,
            board_analysis: BoardAnalysis::from_board(board),
        }
    }

    #[must_use]
    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    #[must_use]
    pub fn anchor(&self) -> Position {
        self.anchor
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    #[must_use]
    pub fn board_analysis(&self) -> &BoardAnalysis {
        &self.board_analysis
    }

    #[must_use]
    pub fn features(&self) -> BoardFeatures {
        BoardFeatures {
            aggregate_height: self.board_analysis.aggregate_height(),
            cleared_lines: self.cleared_lines,
            holes: self.board_analysis.num_holes(),
            bumpiness: self.board_analysis.bumpiness(),
        }
    }
}

/// Locks `piece` at `anchor` on a copy of `board`, clears full rows, and
/// returns the features of the result together with the resulting board.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind, Position};
/// use blockfall_evaluator::extract_features;
///
/// let board = Board::default();
/// let piece = Piece::new(PieceKind::O);
/// let (features, after) = extract_features(&board, &piece, Position::new(18, 0));
/// assert_eq!(features.aggregate_height, 4);
/// assert_eq!(features.bumpiness, 2);
/// assert!(board.is_row_empty(19));
/// assert!(!after.is_row_empty(19));
/// ```
#[must_use]
pub fn extract_features(board: &Board, piece: &Piece, anchor: Position) -> (BoardFeatures, Board) {
    let analysis = PlacementAnalysis::from_board(board, *piece, anchor);
    let features = analysis.features();
    (features, analysis.board_analysis.into_board())
}

#[cfg(test)]
mod tests {
    use blockfall_engine::PieceKind;

    use super::*;

    #[test]
    fn test_clears_completed_rows() {
        let board = Board::from_ascii(
            "
            ..........
            ..........
            JJJJ..JJJJ
            JJJJ..JJJJ
            ",
        );
        let (features, after) =
            extract_features(&board, &Piece::new(PieceKind::O), Position::new(2, 4));
        assert_eq!(features.cleared_lines, 2);
        assert_eq!(features.aggregate_height, 0);
        assert_eq!(features.holes, 0);
        assert_eq!(after, Board::new(10, 4));
    }

    #[test]
    fn test_extraction_is_pure() {
        let board = Board::from_ascii(
            "
            ......
            ..T...
            .TT.S.
            ZZ.SS.
            ",
        );
        let before = board.clone();
        let piece = Piece::new(PieceKind::L).rotated();
        let anchor = Position::new(0, 2);
        let first = extract_features(&board, &piece, anchor);
        let second = extract_features(&board, &piece, anchor);
        assert_eq!(first, second);
        assert_eq!(board, before);
    }

    #[test]
    fn test_feature_array_order() {
        let features = BoardFeatures {
            aggregate_height: 12,
            cleared_lines: 1,
            holes: 3,
            bumpiness: 5,
        };
        assert_eq!(features.to_array(), [12.0, 1.0, 3.0, 5.0]);
        assert_eq!(BoardFeatures::NAMES[1], "lines_cleared");
    }
}
