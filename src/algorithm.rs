//! Algorithms operating on sequences of bits, independently of any collection.

mod move_bits;

pub use move_bits::move_bits;
