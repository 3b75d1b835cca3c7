//! Bit-packed vector of booleans
//!
//! #   Organization
//!
//! This crate is composed of multiple top modules:
//!
//! -   The `api` module contains a selection of vocabulary types: a proxy for a single bit, and cursors.
//! -   The `algorithm` module contains a selection of algorithms built atop this API.
//! -   The `collections` module contains the `BitVector` collection.
//! -   The `utils` module contains a selection of low-level types upon which the collection, and algorithms, are
//!     built.
//!
//!
//! #   Word type
//!
//! Bits are packed in words, whose type is a parameter of the storage. `u64` is the default, while `u8`, `u16`, `u32`,
//! and `usize` are also available.
//!
//! #### Why not always `u64`?
//!
//! Wide words make bulk operations cheaper, while narrow words waste less memory in the tail of the last word. Which
//! matters most depends on the usage: many small vectors favor narrow words.
//!
//!
//! #   Index type
//!
//! Bits are indexed by a `usize`, and cursors are offset by an `isize`.
//!
//! #### Why not `u64`?
//!
//! A `BitVector` is an in-memory sequence, with its own storage. Its bits are only ever reached through slices of
//! words, which are indexed by `usize`, and the arithmetic on indexes is checked against overflow throughout.
//!
//!
//! #   Cursors
//!
//! A `BitCursor` is a (word, bit) position, which does not borrow its collection. It can thus be handed back to the
//! collection to insert or erase bits, and it is always checked against the collection before being dereferenced.
//!
//! Any operation which changes the length of the collection may change which bit a cursor designates, or whether it
//! designates any bit at all.

#![cfg_attr(not(test), no_std)]
//  Features (language)
//  Features (library)
#![cfg_attr(feature = "allocator_api", feature(allocator_api))]
//  Lints
#![deny(missing_docs)]
//  This author prefers to keep its test modules close to what they are testing.
#![allow(clippy::items_after_test_module)]

extern crate alloc;

pub mod algorithm;
pub mod api;
pub mod collections;
pub mod utils;
