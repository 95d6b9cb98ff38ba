use std::fmt;

use super::piece::{Piece, PieceKind, Position};

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    /// Empty cell (no piece).
    #[default]
    Empty,
    /// Locked block of a specific piece type; the type carries the color.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }
}

/// Fixed-size grid of cells. Row 0 is the top row.
///
/// The dimensions are chosen at construction and never change afterwards;
/// only cell contents mutate.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Block, PieceKind};
///
/// let mut board = Board::default();
/// board.fill_row(19, PieceKind::I);
/// assert!(board.is_row_full(19));
/// assert_eq!(board.block(19, 0), Block::Piece(PieceKind::I));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Block>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}

impl Board {
    pub const DEFAULT_WIDTH: usize = 10;
    pub const DEFAULT_HEIGHT: usize = 20;

    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Block::Empty; width * height],
        }
    }

    /// Parses a board from the format produced by its `Display` impl.
    ///
    /// Blank lines and surrounding whitespace are ignored; `.` is an empty
    /// cell and a piece letter is a block of that shape.
    ///
    /// # Panics
    ///
    /// Panics on an unknown cell character or rows of differing widths.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let width = lines.first().map_or(0, |line| line.chars().count());
        let mut board = Self::new(width, lines.len());

        for (y, line) in lines.iter().enumerate() {
            assert_eq!(
                line.chars().count(),
                width,
                "Each row must have exactly {width} cells, got {} at row {y}",
                line.chars().count(),
            );
            for (x, ch) in line.chars().enumerate() {
                let block = match ch {
                    '.' => Block::Empty,
                    _ => match PieceKind::from_char(ch) {
                        Some(kind) => Block::Piece(kind),
                        None => panic!("unknown cell {ch:?} at row {y}, column {x}"),
                    },
                };
                board.set_block(y, x, block);
            }
        }
        board
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Converts a position into `(row, col)` indices if it lies on the board.
    #[must_use]
    pub fn index_of(&self, pos: Position) -> Option<(usize, usize)> {
        let row = usize::try_from(pos.row).ok()?;
        let col = usize::try_from(pos.col).ok()?;
        (row < self.height && col < self.width).then_some((row, col))
    }

    #[must_use]
    pub fn contains_col(&self, col: i32) -> bool {
        usize::try_from(col).is_ok_and(|c| c < self.width)
    }

    #[must_use]
    pub fn block(&self, row: usize, col: usize) -> Block {
        self.cells[row * self.width + col]
    }

    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        !self.block(row, col).is_empty()
    }

    pub fn set_block(&mut self, row: usize, col: usize, block: Block) {
        self.cells[row * self.width + col] = block;
    }

    /// Returns an iterator over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Block]> {
        self.cells.chunks_exact(self.width)
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[Block] {
        &self.cells[row * self.width..][..self.width]
    }

    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        self.row(row).iter().all(|b| !b.is_empty())
    }

    #[must_use]
    pub fn is_row_empty(&self, row: usize) -> bool {
        self.row(row).iter().all(|b| b.is_empty())
    }

    /// Fills every cell of `row` with blocks of `kind`.
    pub fn fill_row(&mut self, row: usize, kind: PieceKind) {
        let width = self.width;
        self.cells[row * width..][..width].fill(Block::Piece(kind));
    }

    /// Writes the piece's cells at `anchor` into the board.
    ///
    /// Cells outside the board (including rows above row 0) are silently
    /// skipped.
    pub fn lock_piece(&mut self, piece: &Piece, anchor: Position) {
        for cell in piece.cells(anchor) {
            if let Some((row, col)) = self.index_of(cell) {
                self.set_block(row, col, Block::Piece(piece.kind()));
            }
        }
    }

    /// Removes the given rows, shifts the rows above them down, and inserts
    /// the same number of empty rows at the top.
    ///
    /// Rows may be given in any order; duplicates and out-of-range indices are
    /// ignored. Returns the number of rows removed.
    pub fn remove_rows(&mut self, rows: &[usize]) -> usize {
        let mut rows = rows
            .iter()
            .copied()
            .filter(|r| *r < self.height)
            .collect::<Vec<_>>();
        // bottom-most first
        rows.sort_unstable_by(|a, b| b.cmp(a));
        rows.dedup();

        if rows.is_empty() {
            return 0;
        }

        let mut cells = vec![Block::Empty; rows.len() * self.width];
        cells.reserve(self.cells.len());
        for (y, row) in self.rows().enumerate() {
            if rows.binary_search_by(|r| y.cmp(r)).is_err() {
                cells.extend_from_slice(row);
            }
        }
        self.cells = cells;
        rows.len()
    }

    /// Removes every full row and returns how many were removed.
    pub fn clear_full_rows(&mut self) -> usize {
        let full = (0..self.height)
            .filter(|r| self.is_row_full(*r))
            .collect::<Vec<_>>();
        self.remove_rows(&full)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for block in row {
                let c = match block {
                    Block::Empty => '.',
                    Block::Piece(kind) => kind.as_char(),
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_board_is_empty() {
        let board = Board::default();
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 20);
        for row in 0..board.height() {
            assert!(board.is_row_empty(row));
        }
    }

    #[test]
    fn test_index_of_bounds() {
        let board = Board::default();
        assert_eq!(board.index_of(Position::new(0, 0)), Some((0, 0)));
        assert_eq!(board.index_of(Position::new(19, 9)), Some((19, 9)));
        assert_eq!(board.index_of(Position::new(-1, 0)), None);
        assert_eq!(board.index_of(Position::new(20, 0)), None);
        assert_eq!(board.index_of(Position::new(0, 10)), None);
        assert_eq!(board.index_of(Position::new(0, -1)), None);
    }

    #[test]
    fn test_lock_piece_skips_cells_above_board() {
        let mut board = Board::default();
        // vertical I spans rows -2..=1 around its pivot
        let piece = Piece::new(PieceKind::I).rotated();
        board.lock_piece(&piece, Position::new(0, 3));
        let filled = (0..board.height())
            .flat_map(|r| (0..board.width()).map(move |c| (r, c)))
            .filter(|(r, c)| board.is_occupied(*r, *c))
            .collect::<Vec<_>>();
        assert_eq!(filled, vec![(0, 4), (1, 4)]);
        assert_eq!(board.block(0, 4), Block::Piece(PieceKind::I));
    }

    #[test]
    fn test_remove_rows_shifts_down() {
        let mut board = Board::default();
        board.set_block(17, 2, Block::Piece(PieceKind::T));
        board.fill_row(18, PieceKind::I);
        board.set_block(19, 5, Block::Piece(PieceKind::O));

        assert_eq!(board.remove_rows(&[18]), 1);
        assert!(board.is_row_empty(0));
        assert_eq!(board.block(18, 2), Block::Piece(PieceKind::T));
        assert_eq!(board.block(19, 5), Block::Piece(PieceKind::O));
        assert!(!board.is_row_full(18));
    }

    #[test]
    fn test_remove_rows_any_order() {
        let mut a = Board::default();
        for row in [10, 12, 19] {
            a.fill_row(row, PieceKind::L);
        }
        a.set_block(11, 0, Block::Piece(PieceKind::S));
        a.set_block(18, 3, Block::Piece(PieceKind::T));
        let mut b = a.clone();

        assert_eq!(a.remove_rows(&[10, 12, 19]), 3);
        assert_eq!(b.remove_rows(&[19, 10, 12, 12]), 3);
        assert_eq!(a, b);
        // row 11 has two removed rows below it, row 18 has one
        assert_eq!(a.block(13, 0), Block::Piece(PieceKind::S));
        assert_eq!(a.block(19, 3), Block::Piece(PieceKind::T));
        assert!((0..10).filter(|c| *c != 3).all(|c| !a.is_occupied(19, c)));
        for row in 0..3 {
            assert!(a.is_row_empty(row));
        }
    }

    #[test]
    fn test_clear_full_rows_all_filled() {
        let mut board = Board::default();
        for row in 0..board.height() {
            board.fill_row(row, PieceKind::Z);
        }
        assert_eq!(board.clear_full_rows(), 20);
        assert_eq!(board, Board::default());
    }

    #[test]
    fn test_clear_full_rows_partial_line() {
        let mut board = Board::default();
        for col in 0..board.width() - 1 {
            board.set_block(19, col, Block::Piece(PieceKind::J));
        }
        assert_eq!(board.clear_full_rows(), 0);
        assert!(!board.is_row_empty(19));
    }

    #[test]
    fn test_display() {
        let mut board = Board::new(3, 2);
        board.set_block(1, 0, Block::Piece(PieceKind::T));
        assert_eq!(board.to_string(), "...\nT..\n");
    }

    #[test]
    fn test_from_ascii_matches_display() {
        let board = Board::from_ascii(
            "
            ....
            .O..
            IIII
            ",
        );
        assert_eq!((board.width(), board.height()), (4, 3));
        assert_eq!(board.block(1, 1), Block::Piece(PieceKind::O));
        assert!(board.is_row_full(2));
        assert_eq!(Board::from_ascii(&board.to_string()), board);
    }
}
