//! A proxy for a single bit.

use core::fmt;

use crate::utils::{BitWord, IndexInWord};

/// A proxy for a single bit, within a word.
///
/// Rust references cannot point to a single bit, hence `BitRef` stands in for `&mut bool`: it borrows the word
/// containing the bit, and remembers which bit of the word it designates.
///
/// As a borrow, it cannot outlive any operation which may resize, or reallocate, the storage of its bit vector.
///
/// #   Examples
///
/// ```
/// #   use packed_bitvec::api::BitRef;
/// #   use packed_bitvec::utils::IndexInWord;
/// let mut word: u8 = 0b0001;
///
/// let mut bit = BitRef::new(&mut word, IndexInWord(2));
///
/// assert!(!bit.get());
///
/// bit.set(true);
///
/// assert!(bit.get());
/// assert_eq!(0b0101, word);
/// ```
pub struct BitRef<'a, W> {
    word: &'a mut W,
    in_word: IndexInWord,
}

impl<'a, W> BitRef<'a, W>
where
    W: BitWord,
{
    /// Creates a proxy for bit `in_word` of `word`.
    ///
    /// #   Panics
    ///
    /// See `IndexInWord`.
    #[inline]
    pub fn new(word: &'a mut W, in_word: IndexInWord) -> Self {
        debug_assert!(in_word.0 < W::BITS, "{} >= {}", in_word.0, W::BITS);

        Self { word, in_word }
    }

    /// Returns the index of the bit, within its word.
    #[inline]
    pub fn in_word(&self) -> IndexInWord {
        self.in_word
    }

    /// Returns the value of the bit.
    #[inline]
    pub fn get(&self) -> bool {
        self.word.is_set(self.in_word)
    }

    /// Sets the value of the bit.
    #[inline]
    pub fn set(&mut self, value: bool) {
        self.word.assign(self.in_word, value);
    }

    /// Sets the value of the bit, returning its previous value.
    #[inline]
    pub fn replace(&mut self, value: bool) -> bool {
        let previous = self.get();

        self.set(value);

        previous
    }

    /// Flips the value of the bit, returning its new value.
    #[inline]
    pub fn toggle(&mut self) -> bool {
        let value = !self.get();

        self.set(value);

        value
    }
}

//
//  Common traits
//

impl<W> fmt::Debug for BitRef<'_, W>
where
    W: BitWord,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        fmt::Debug::fmt(&self.get(), f)
    }
}

impl<W> From<BitRef<'_, W>> for bool
where
    W: BitWord,
{
    #[inline]
    fn from(bit: BitRef<'_, W>) -> bool {
        bit.get()
    }
}

impl<W> PartialEq<bool> for BitRef<'_, W>
where
    W: BitWord,
{
    #[inline]
    fn eq(&self, other: &bool) -> bool {
        self.get() == *other
    }
}

// mod tests
