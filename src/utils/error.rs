//  Errors.

use thiserror::Error;

use crate::api::CursorValidity;

/// An error in accessing a bit beyond the length of a bit vector.
#[derive(Clone, Copy, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
#[error("index {index} out of bounds for a bit vector of length {len}")]
pub struct BoundsError {
    /// The offending index.
    pub index: usize,
    /// The length of the bit vector at the time of the access.
    pub len: usize,
}

/// An error in calling an operation whose pre-condition does not hold.
///
/// The operation fails before mutating any state.
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum PreconditionError {
    /// The operation requires a non-empty bit vector.
    #[error("{operation} called on an empty bit vector")]
    Empty {
        /// Name of the failing operation.
        operation: &'static str,
    },
    /// The operation was handed a cursor which is not valid for this purpose.
    #[error("{operation} called with a cursor which is {validity}")]
    InvalidCursor {
        /// Name of the failing operation.
        operation: &'static str,
        /// Classification of the offending cursor.
        validity: CursorValidity,
    },
    /// The operation was handed a range whose start is after its end.
    #[error("{operation} called with a range whose start is after its end")]
    InvertedRange {
        /// Name of the failing operation.
        operation: &'static str,
    },
}

/// An error in reserving memory for words.
#[derive(Clone, Copy, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
#[error("WordStoreError")]
pub struct WordStoreError;
