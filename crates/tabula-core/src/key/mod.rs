//! Order-preserving primary-key encoding and bound arithmetic.
//!
//! Encoded keys compare byte-wise in the same order as the key tuples they
//! encode, so key bounds can be merged and checked without decoding.

mod bound;
mod error;
mod ordered;


pub use bound::{BoundSide, is_empty_range, prefix_successor};
pub use error::KeyEncodeError;
pub use ordered::{decode_key_values, encode_key_values};
