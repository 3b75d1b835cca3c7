//! Utilities for implementers of bit collections.

mod error;
mod word;
mod word_store;

pub mod alloc;

pub use error::{BoundsError, PreconditionError, WordStoreError};
pub use word::{BitWord, IndexInWord, IndexOfWord};
pub use word_store::{WordStore, dynamic::DynamicWordStore};
