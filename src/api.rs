//! Vocabulary types handed out by the bit collections.
//!
//! Rust references cannot designate a single bit, hence this module provides stand-ins:
//!
//! -   `BitRef`, a proxy for a single mutable bit.
//! -   `BitCursor`, a position within a sequence of bits, with full random-access arithmetic.
//! -   `CursorValidity`, the classification of a cursor against the range of bits of a collection.

mod bit_cursor;
mod bit_ref;

pub use bit_cursor::{BitCursor, CursorValidity};
pub use bit_ref::BitRef;
