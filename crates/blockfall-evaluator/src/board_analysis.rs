use std::{cell::OnceCell, iter};

use blockfall_engine::Board;

/// Lazily computed surface metrics of a board.
#[derive(Debug)]
pub struct BoardAnalysis {
    board: Board,
    column_heights: OnceCell<Vec<usize>>,
    column_occupied_cells: OnceCell<Vec<usize>>,
    aggregate_height: OnceCell<usize>,
    num_holes: OnceCell<usize>,
    bumpiness: OnceCell<usize>,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            column_occupied_cells: OnceCell::new(),
            aggregate_height: OnceCell::new(),
            num_holes: OnceCell::new(),
            bumpiness: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn into_board(self) -> Board {
        self.board
    }

    /// Height of each column, measured from the floor to its topmost block.
    #[must_use]
    pub fn column_heights(&self) -> &[usize] {
        self.column_heights.get_or_init(|| {
            let height = self.board.height();
            (0..self.board.width())
                .map(|x| {
                    (0..height)
                        .find(|y| self.board.is_occupied(*y, x))
                        .map_or(0, |top| height - top)
                })
                .collect()
        })
    }

    #[must_use]
    pub fn column_occupied_cells(&self) -> &[usize] {
        self.column_occupied_cells.get_or_init(|| {
            (0..self.board.width())
                .map(|x| {
                    (0..self.board.height())
                        .filter(|y| self.board.is_occupied(*y, x))
                        .count()
                })
                .collect()
        })
    }

    #[must_use]
    pub fn aggregate_height(&self) -> usize {
        *self
            .aggregate_height
            .get_or_init(|| self.column_heights().iter().sum())
    }

    /// Empty cells with at least one block above them in the same column.
    #[must_use]
    pub fn num_holes(&self) -> usize {
        *self.num_holes.get_or_init(|| {
            iter::zip(self.column_heights(), self.column_occupied_cells())
                .map(|(h, occ)| h - occ)
                .sum()
        })
    }

    /// Sum of absolute height differences between adjacent columns.
    #[must_use]
    pub fn bumpiness(&self) -> usize {
        *self.bumpiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|w| w[0].abs_diff(w[1]))
                .sum()
        })
    }
}
