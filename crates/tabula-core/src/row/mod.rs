//! Row staging and the binary encoding of row mutations.

mod bitmap;
mod error;
mod opcode;
mod operation;
mod partial;

#[cfg(test)]
mod tests;

pub use error::{RowDecodeError, RowError};
pub use opcode::WriteKind;
pub use operation::WriteOperation;
pub use partial::{Cell, ColumnRef, PartialRow};
