//! Implementations of bit collections.

pub mod bit_vector;

#[cfg(feature = "serde")]
mod bit_vector_serde;

pub use bit_vector::{BitVector, Iter};
