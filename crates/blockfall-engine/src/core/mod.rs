//! Board and piece model: immutable piece shapes, rotation geometry and the
//! board grid.

pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;
