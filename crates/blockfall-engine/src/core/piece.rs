use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// A cell coordinate on the board, or an offset between two coordinates.
///
/// Row 0 is the top of the board and rows grow downward. A position carries no
/// bounds invariant of its own; validity is only meaningful against a
/// [`Board`](super::board::Board). Negative rows describe cells above the
/// visible board.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Add,
)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const DOWN: Self = Self::new(1, 0);
    pub const LEFT: Self = Self::new(0, -1);
    pub const RIGHT: Self = Self::new(0, 1);

    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Display color associated with each piece shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PieceColor {
    Cyan,
    Yellow,
    Purple,
    Green,
    Red,
    Blue,
    Orange,
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

/// Uniform choice among the 7 playable shapes.
///
/// There is no "empty" or placeholder kind, so random generation can never
/// produce a sentinel piece.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn color(self) -> PieceColor {
        match self {
            PieceKind::I => PieceColor::Cyan,
            PieceKind::O => PieceColor::Yellow,
            PieceKind::T => PieceColor::Purple,
            PieceKind::S => PieceColor::Green,
            PieceKind::Z => PieceColor::Red,
            PieceKind::J => PieceColor::Blue,
            PieceKind::L => PieceColor::Orange,
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }

    fn spawn_shape(self) -> &'static PieceShape {
        &PIECE_SHAPES[self.index()]
    }
}

/// Block offsets and pivot of a shape in its spawn orientation.
struct PieceShape {
    blocks: [Position; 4],
    pivot: Position,
}

const fn p(row: i32, col: i32) -> Position {
    Position::new(row, col)
}

static PIECE_SHAPES: [PieceShape; PieceKind::LEN] = [
    // I: ####
    PieceShape {
        blocks: [p(0, 0), p(0, 1), p(0, 2), p(0, 3)],
        pivot: p(0, 1),
    },
    // O: ##
    //    ##
    PieceShape {
        blocks: [p(0, 0), p(0, 1), p(1, 0), p(1, 1)],
        pivot: p(0, 0),
    },
    // T: ###
    //     #
    PieceShape {
        blocks: [p(0, 0), p(0, 1), p(0, 2), p(1, 1)],
        pivot: p(0, 1),
    },
    // S:  ##
    //    ##
    PieceShape {
        blocks: [p(0, 1), p(0, 2), p(1, 0), p(1, 1)],
        pivot: p(1, 1),
    },
    // Z: ##
    //     ##
    PieceShape {
        blocks: [p(0, 0), p(0, 1), p(1, 1), p(1, 2)],
        pivot: p(1, 1),
    },
    // J: #
    //    ###
    PieceShape {
        blocks: [p(0, 0), p(1, 0), p(1, 1), p(1, 2)],
        pivot: p(1, 1),
    },
    // L:   #
    //    ###
    PieceShape {
        blocks: [p(0, 2), p(1, 0), p(1, 1), p(1, 2)],
        pivot: p(1, 1),
    },
];

/// A tetromino: a shape tag plus its block offsets and pivot.
///
/// Offsets are relative to an implicit origin; the board position of a piece
/// is an anchor kept outside the piece (see [`GameState`](crate::GameState)).
/// Pieces are immutable values: [`Piece::rotated`] returns a new piece.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind};
///
/// let piece = Piece::new(PieceKind::T);
/// let turned = piece.rotated().rotated().rotated().rotated();
/// assert!(turned.has_same_blocks(&piece));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    blocks: [Position; 4],
    pivot: Position,
    rotation: u8,
}

impl Piece {
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        let shape = kind.spawn_shape();
        Self {
            kind,
            blocks: shape.blocks,
            pivot: shape.pivot,
            rotation: 0,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn blocks(&self) -> &[Position; 4] {
        &self.blocks
    }

    #[must_use]
    pub fn pivot(&self) -> Position {
        self.pivot
    }

    /// Number of clockwise quarter turns applied since spawn, modulo 4.
    #[must_use]
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Rotates every block 90° clockwise around the pivot.
    ///
    /// `row' = pivot.row - (col - pivot.col)`, `col' = pivot.col + (row - pivot.row)`.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let pivot = self.pivot;
        let blocks = self.blocks.map(|b| {
            Position::new(
                pivot.row - (b.col - pivot.col),
                pivot.col + (b.row - pivot.row),
            )
        });
        Self {
            kind: self.kind,
            blocks,
            pivot,
            rotation: (self.rotation + 1) % 4,
        }
    }

    /// Applies [`Piece::rotated`] `count` times.
    #[must_use]
    pub fn rotated_times(&self, count: u8) -> Self {
        (0..count % 4).fold(*self, |piece, _| piece.rotated())
    }

    /// Absolute cells covered by this piece when resolved against `anchor`.
    pub fn cells(&self, anchor: Position) -> impl Iterator<Item = Position> + '_ {
        self.blocks.iter().map(move |b| *b + anchor)
    }

    /// Smallest and largest column offset among the blocks.
    #[must_use]
    pub fn col_extent(&self) -> (i32, i32) {
        let cols = self.blocks.iter().map(|b| b.col);
        let min = cols.clone().min().unwrap_or(0);
        let max = cols.max().unwrap_or(0);
        (min, max)
    }

    /// Smallest row offset among the blocks.
    #[must_use]
    pub fn min_row(&self) -> i32 {
        self.blocks.iter().map(|b| b.row).min().unwrap_or(0)
    }

    /// Compares the block sets, ignoring enumeration order.
    #[must_use]
    pub fn has_same_blocks(&self, other: &Self) -> bool {
        let mut a = self.blocks;
        let mut b = other.blocks;
        a.sort_by_key(|p| (p.row, p.col));
        b.sort_by_key(|p| (p.row, p.col));
        a == b
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_four_rotations_restore_blocks() {
        for kind in PieceKind::ALL {
            let piece = Piece::new(kind);
            let turned = piece.rotated().rotated().rotated().rotated();
            assert!(
                turned.has_same_blocks(&piece),
                "{kind:?} did not return to its spawn blocks"
            );
            assert_eq!(turned.rotation(), 0);
            assert_eq!(turned.pivot(), piece.pivot());
        }
    }

    #[test]
    fn test_rotation_does_not_mutate_source() {
        let piece = Piece::new(PieceKind::L);
        let before = *piece.blocks();
        let _ = piece.rotated();
        assert_eq!(*piece.blocks(), before);
    }

    #[test]
    fn test_rotate_i_piece_becomes_vertical() {
        let piece = Piece::new(PieceKind::I).rotated();
        let cols: Vec<_> = piece.blocks().iter().map(|b| b.col).collect();
        assert!(cols.iter().all(|c| *c == 1), "got {cols:?}");
        let mut rows: Vec<_> = piece.blocks().iter().map(|b| b.row).collect();
        rows.sort_unstable();
        assert_eq!(rows, vec![-2, -1, 0, 1]);
    }

    #[test]
    fn test_rotate_follows_pivot_formula() {
        let piece = Piece::new(PieceKind::T);
        let rotated = piece.rotated();
        // (0,0) around pivot (0,1) -> (0 - (0 - 1), 1 + (0 - 0)) = (1, 1)
        assert_eq!(rotated.blocks()[0], Position::new(1, 1));
        // (1,1) around pivot (0,1) -> (0 - 0, 1 + 1) = (0, 2)
        assert_eq!(rotated.blocks()[3], Position::new(0, 2));
    }

    #[test]
    fn test_rotated_times_wraps() {
        let piece = Piece::new(PieceKind::S);
        assert_eq!(piece.rotated_times(5), piece.rotated());
        assert_eq!(piece.rotated_times(0), piece);
    }

    #[test]
    fn test_cells_are_offset_by_anchor() {
        let piece = Piece::new(PieceKind::O);
        let cells: Vec<_> = piece.cells(Position::new(3, 4)).collect();
        assert_eq!(
            cells,
            vec![
                Position::new(3, 4),
                Position::new(3, 5),
                Position::new(4, 4),
                Position::new(4, 5),
            ]
        );
    }

    #[test]
    fn test_col_extent() {
        assert_eq!(Piece::new(PieceKind::I).col_extent(), (0, 3));
        assert_eq!(Piece::new(PieceKind::I).rotated().col_extent(), (1, 1));
        assert_eq!(Piece::new(PieceKind::O).col_extent(), (0, 1));
    }

    #[test]
    fn test_piece_colors_are_distinct() {
        let colors: HashSet<_> = PieceKind::ALL.iter().map(|k| k.color()).collect();
        assert_eq!(colors.len(), PieceKind::LEN);
        assert_eq!(PieceKind::I.color(), PieceColor::Cyan);
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('X'), None);
        assert_eq!(PieceKind::from_char('x'), None);
    }

    #[test]
    fn test_position_serialization() {
        let pos = Position::new(-2, 7);
        let json = serde_json::to_string(&pos).unwrap();
        assert_eq!(json, r#"{"row":-2,"col":7}"#);
        assert_eq!(serde_json::from_str::<Position>(&json).unwrap(), pos);
    }
}
