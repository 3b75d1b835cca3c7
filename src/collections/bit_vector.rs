//! A bit-packed, growable, sequence of booleans.

//  Design considerations
//
//  #   Why cursors, rather than iterators, for `insert` and `erase`?
//
//  An iterator borrows its collection, and therefore cannot be handed back to the very same collection for mutation.
//  A `BitCursor` is a plain position instead: it is checked against the vector on every use, and thus cannot be
//  dereferenced out of bounds.
//
//  #   Why are the bits beyond the length not cleared?
//
//  `pop_back`, `erase`, and `resize` leave the bits beyond the new length as they are, rather than spending time
//  clearing them. As a result, any operation interpreting whole words (equality, ordering, hashing, serialization)
//  must mask the last word first.

use core::{
    cmp::Ordering,
    fmt::{self, Write as _},
    hash::{Hash, Hasher},
    iter::FusedIterator,
    mem,
    ops::Index,
};

use crate::{
    algorithm::move_bits,
    api::{BitCursor, BitRef, CursorValidity},
    utils::{BitWord, BoundsError, DynamicWordStore, IndexOfWord, PreconditionError, WordStore, WordStoreError},
};

/// A bit-packed, growable, sequence of booleans.
///
/// The bits are packed in words of type `S::Word`, stored in `S`, bit `i` of word `w` holding the bit at index
/// `w * BITS + i`.
///
/// #   Examples
///
/// ```
/// #   use packed_bitvec::collections::BitVector;
/// let mut bits = BitVector::new();
///
/// bits.push_back(true);
/// bits.push_back(false);
/// bits.push_back(true);
///
/// let position = bits.begin() + 1;
/// bits.insert(position, true).expect("valid cursor");
///
/// assert_eq!(4, bits.len());
/// assert_eq!(vec![true, true, false, true], bits.iter().collect::<Vec<_>>());
///
/// assert_eq!(Ok(true), bits.pop_back());
/// assert!(!bits[2]);
/// ```
#[derive(Clone)]
pub struct BitVector<S = DynamicWordStore>
where
    S: WordStore,
{
    //  Invariants:
    //  -   Bounded: `free < S::Word::BITS`.
    //
    //  `free` is only meaningful when `words` is not empty, see `free()`.
    words: S,
    free: u32,
}

//
//  Creation
//

impl BitVector<DynamicWordStore> {
    /// Creates a new, empty, bit vector.
    ///
    /// Does not allocate.
    pub const fn new() -> Self {
        Self {
            words: DynamicWordStore::new(),
            free: 0,
        }
    }

    /// Creates a new, empty, bit vector, with a capacity of at least `n` bits.
    pub fn with_capacity(n: usize) -> Self {
        let mut result = Self::new();
        result.reserve(n);
        result
    }

    /// Creates a new bit vector of `n` bits, all equal to `value`.
    ///
    /// #   Examples
    ///
    /// ```
    /// #   use packed_bitvec::collections::BitVector;
    /// let bits = BitVector::from_elem(70, true);
    ///
    /// assert_eq!(70, bits.len());
    /// assert!(bits.iter().all(|bit| bit));
    /// ```
    pub fn from_elem(n: usize, value: bool) -> Self {
        let mut result = Self::new();
        result.resize(n, value);
        result
    }
}

impl<S> BitVector<S>
where
    S: WordStore,
{
    /// Creates a new, empty, bit vector atop `store`.
    ///
    /// The store is cleared first, its capacity is retained.
    ///
    /// #   Examples
    ///
    /// ```
    /// #   use packed_bitvec::collections::BitVector;
    /// let mut bits = BitVector::with_store(Vec::<u8>::with_capacity(2));
    ///
    /// assert_eq!(0, bits.len());
    /// assert!(bits.capacity() >= 16);
    ///
    /// bits.resize(10, true);
    ///
    /// assert_eq!(2, bits.data().len());
    /// ```
    pub fn with_store(mut store: S) -> Self {
        store.clear();

        Self { words: store, free: 0 }
    }

    /// Creates a bit vector of `len` bits from `store`, which must hold exactly as many words as necessary.
    ///
    /// The bits of the last word beyond `len` are cleared.
    #[cfg(feature = "serde")]
    pub(crate) fn from_words(mut store: S, len: usize) -> Self {
        debug_assert_eq!(S::Word::words_for(len), store.words().len());

        let free = S::Word::free_bits_for(len);

        if let Some(last) = store.words_mut().last_mut() {
            *last = last.keep_lowest(S::Word::BITS - free);
        }

        Self { words: store, free }
    }

    /// Replaces the content of the bit vector with the bits of `iter`.
    pub fn assign<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = bool>,
    {
        self.clear();
        self.extend(iter);
    }

    /// Swaps the content of both bit vectors, without copying any bit.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }
}

//
//  Size & capacity
//

impl<S> BitVector<S>
where
    S: WordStore,
{
    /// Returns whether the bit vector contains no bit.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }

    /// Returns the number of bits in the bit vector.
    #[inline]
    pub fn len(&self) -> usize {
        let Some(last) = self.data().len().checked_sub(1) else {
            return 0;
        };

        last * S::Word::BITS as usize + (S::Word::BITS - self.free()) as usize
    }

    //  Returns the number of unused bits in the last word, 0 if there is no word.
    //
    //  The store may be emptied through `get_container_mut`, hence the check.
    #[inline]
    fn free(&self) -> u32 {
        if self.data().is_empty() {
            0
        } else {
            self.free
        }
    }

    /// Returns the number of bits the bit vector can hold without reallocating.
    ///
    /// The capacity is always a multiple of the number of bits in a word.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.words.capacity().saturating_mul(S::Word::BITS as usize)
    }

    /// Ensures that the capacity is at least `n` bits.
    ///
    /// Unlike `Vec::reserve`, `n` is the total number of bits, not an additional number of bits.
    ///
    /// #   Panics
    ///
    /// If the memory cannot be allocated.
    #[inline]
    pub fn reserve(&mut self, n: usize) {
        self.words.reserve(S::Word::words_for(n));
    }

    /// Ensures that the capacity is at least `n` bits.
    ///
    /// On error, `self` is left unchanged.
    #[inline]
    pub fn try_reserve(&mut self, n: usize) -> Result<(), WordStoreError> {
        self.words.try_reserve(S::Word::words_for(n))
    }

    /// Revises the capacity to `n` bits, rounded up to a whole number of words.
    ///
    /// If `n` is less than the length, the bit vector is truncated first. If `n` is `None`, the capacity is shrunk
    /// to fit the current length.
    ///
    /// #   Examples
    ///
    /// ```
    /// #   use packed_bitvec::collections::BitVector;
    /// let mut bits = BitVector::from_elem(300, false);
    ///
    /// bits.set_capacity(Some(100));
    ///
    /// assert_eq!(100, bits.len());
    /// assert_eq!(128, bits.capacity());
    /// ```
    pub fn set_capacity(&mut self, n: Option<usize>) {
        let len = self.len();

        let bits = match n {
            Some(n) if n < len => {
                self.resize_unfilled(n);
                n
            }
            Some(n) => n,
            None => len,
        };

        let words = S::Word::words_for(bits);
        let capacity = self.words.capacity();

        log::debug!("revising bit vector capacity from {capacity} to {words} words, for {bits} bits");

        if words < capacity {
            self.words.shrink_to(words);
        } else {
            self.words.reserve(words);
        }
    }

    /// Removes all bits, retaining the capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.words.clear();
        self.free = 0;
    }

    /// Resizes the bit vector to `n` bits, new bits, if any, being set to `value`.
    ///
    /// #   Panics
    ///
    /// If the memory cannot be allocated.
    ///
    /// #   Examples
    ///
    /// ```
    /// #   use packed_bitvec::collections::BitVector;
    /// let mut bits = BitVector::from_elem(3, false);
    ///
    /// bits.resize(5, true);
    ///
    /// assert_eq!(vec![false, false, false, true, true], bits.iter().collect::<Vec<_>>());
    ///
    /// bits.resize(1, true);
    ///
    /// assert_eq!(vec![false], bits.iter().collect::<Vec<_>>());
    /// ```
    pub fn resize(&mut self, n: usize, value: bool) {
        let len = self.len();

        if n <= len {
            self.resize_unfilled(n);
            return;
        }

        //  Fill the free bits of the last word, one at a time, then whole words at once.
        let in_tail = (n - len).min(self.free() as usize);

        let mut cursor = BitCursor::<S::Word>::from_index(len);

        for _ in 0..in_tail {
            cursor.write(self.words.words_mut(), value);
            cursor.increment();
        }

        let fill = if value { S::Word::ALL_ONES } else { S::Word::ALL_ZEROS };

        self.words.resize(S::Word::words_for(n), fill);
        self.free = S::Word::free_bits_for(n);
    }

    /// Resizes the bit vector to `n` bits, without specifying the value of new bits, if any.
    ///
    /// #   Panics
    ///
    /// If the memory cannot be allocated.
    pub fn resize_unfilled(&mut self, n: usize) {
        self.words.resize(S::Word::words_for(n), S::Word::ALL_ZEROS);
        self.free = S::Word::free_bits_for(n);
    }

    /// Appends a bit, set to `value`.
    ///
    /// #   Panics
    ///
    /// If the memory cannot be allocated, or if the length would exceed `usize::MAX`.
    #[inline]
    pub fn push_back(&mut self, value: bool) {
        self.push_back_unfilled().set(value);
    }

    /// Appends a bit, without specifying its value, and returns a proxy to it.
    ///
    /// #   Panics
    ///
    /// If the memory cannot be allocated, or if the length would exceed `usize::MAX`.
    pub fn push_back_unfilled(&mut self) -> BitRef<'_, S::Word> {
        let len = self.len();

        if len == usize::MAX {
            capacity_overflow();
        }

        let mut free = self.free();

        if free == 0 {
            self.words.push(S::Word::ALL_ZEROS);
            free = S::Word::BITS;
        }

        self.free = free - 1;

        BitCursor::from_index(len).reference(self.words.words_mut())
    }

    /// Removes the last bit, and returns its value.
    ///
    /// #   Errors
    ///
    /// If the bit vector is empty.
    pub fn pop_back(&mut self) -> Result<bool, PreconditionError> {
        let Some(last) = self.len().checked_sub(1) else {
            return Err(PreconditionError::Empty { operation: "pop_back" });
        };

        let value = BitCursor::<S::Word>::from_index(last).read(self.data());

        self.free = self.free() + 1;

        if self.free == S::Word::BITS {
            self.words.pop();
            self.free = 0;
        }

        Ok(value)
    }
}

//
//  Access
//

impl<S> BitVector<S>
where
    S: WordStore,
{
    /// Returns the bit at index `n`, if any.
    #[inline]
    pub fn get(&self, n: usize) -> Option<bool> {
        (n < self.len()).then(|| BitCursor::<S::Word>::from_index(n).read(self.data()))
    }

    /// Returns the bit at index `n`, or `default` if `n` is out of bounds.
    #[inline]
    pub fn test(&self, n: usize, default: bool) -> bool {
        self.get(n).unwrap_or(default)
    }

    /// Sets the bit at index `n` to `value`.
    ///
    /// If `n` is out of bounds, the bit vector is first extended to `n + 1` bits, the new bits being `false`.
    ///
    /// #   Panics
    ///
    /// If the memory cannot be allocated, or if `n` is `usize::MAX`.
    ///
    /// #   Examples
    ///
    /// ```
    /// #   use packed_bitvec::collections::BitVector;
    /// let mut bits = BitVector::new();
    ///
    /// bits.set(3, true);
    ///
    /// assert_eq!(4, bits.len());
    /// assert_eq!(vec![false, false, false, true], bits.iter().collect::<Vec<_>>());
    /// ```
    pub fn set(&mut self, n: usize, value: bool) {
        if n >= self.len() {
            let Some(len) = n.checked_add(1) else {
                capacity_overflow();
            };

            self.resize(len, false);
        }

        BitCursor::<S::Word>::from_index(n).write(self.words.words_mut(), value);
    }

    /// Returns the bit at index `n`.
    ///
    /// #   Errors
    ///
    /// If `n` is out of bounds.
    #[inline]
    pub fn at(&self, n: usize) -> Result<bool, BoundsError> {
        self.get(n).ok_or(BoundsError {
            index: n,
            len: self.len(),
        })
    }

    /// Returns a proxy to the bit at index `n`.
    ///
    /// #   Errors
    ///
    /// If `n` is out of bounds.
    #[inline]
    pub fn at_mut(&mut self, n: usize) -> Result<BitRef<'_, S::Word>, BoundsError> {
        let len = self.len();

        if n >= len {
            return Err(BoundsError { index: n, len });
        }

        Ok(BitCursor::from_index(n).reference(self.words.words_mut()))
    }

    /// Returns the bit at index `n`.
    ///
    /// #   Safety
    ///
    /// `n` must be strictly less than `self.len()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, n: usize) -> bool {
        debug_assert!(n < self.len(), "{n} >= {}", self.len());

        //  Safety:
        //  -   The word of bit `n` is within the words, as `n < self.len()`, as per pre-condition.
        unsafe { BitCursor::<S::Word>::from_index(n).read_unchecked(self.data()) }
    }

    /// Returns a proxy to the bit at index `n`.
    ///
    /// #   Safety
    ///
    /// `n` must be strictly less than `self.len()`.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, n: usize) -> BitRef<'_, S::Word> {
        debug_assert!(n < self.len(), "{n} >= {}", self.len());

        //  Safety:
        //  -   The word of bit `n` is within the words, as `n < self.len()`, as per pre-condition.
        unsafe { BitCursor::from_index(n).reference_unchecked(self.words.words_mut()) }
    }

    /// Returns the first bit.
    ///
    /// #   Errors
    ///
    /// If the bit vector is empty.
    #[inline]
    pub fn front(&self) -> Result<bool, PreconditionError> {
        self.get(0).ok_or(PreconditionError::Empty { operation: "front" })
    }

    /// Returns a proxy to the first bit.
    ///
    /// #   Errors
    ///
    /// If the bit vector is empty.
    #[inline]
    pub fn front_mut(&mut self) -> Result<BitRef<'_, S::Word>, PreconditionError> {
        if self.is_empty() {
            return Err(PreconditionError::Empty { operation: "front_mut" });
        }

        Ok(self.begin().reference(self.words.words_mut()))
    }

    /// Returns the last bit.
    ///
    /// #   Errors
    ///
    /// If the bit vector is empty.
    #[inline]
    pub fn back(&self) -> Result<bool, PreconditionError> {
        self.len()
            .checked_sub(1)
            .and_then(|n| self.get(n))
            .ok_or(PreconditionError::Empty { operation: "back" })
    }

    /// Returns a proxy to the last bit.
    ///
    /// #   Errors
    ///
    /// If the bit vector is empty.
    #[inline]
    pub fn back_mut(&mut self) -> Result<BitRef<'_, S::Word>, PreconditionError> {
        let Some(last) = self.len().checked_sub(1) else {
            return Err(PreconditionError::Empty { operation: "back_mut" });
        };

        Ok(BitCursor::from_index(last).reference(self.words.words_mut()))
    }

    /// Returns the first bit.
    ///
    /// #   Safety
    ///
    /// The bit vector must not be empty.
    #[inline]
    pub unsafe fn front_unchecked(&self) -> bool {
        //  Safety:
        //  -   `0 < self.len()`, as per pre-condition.
        unsafe { self.get_unchecked(0) }
    }

    /// Returns the last bit.
    ///
    /// #   Safety
    ///
    /// The bit vector must not be empty.
    #[inline]
    pub unsafe fn back_unchecked(&self) -> bool {
        let last = self.len().wrapping_sub(1);

        //  Safety:
        //  -   `last < self.len()`, as `self.len() > 0` as per pre-condition.
        unsafe { self.get_unchecked(last) }
    }

    /// Returns the words in which the bits are packed.
    ///
    /// The bits of the last word beyond the length have unspecified values.
    #[inline]
    pub fn data(&self) -> &[S::Word] {
        self.words.words()
    }

    /// Returns the words in which the bits are packed.
    ///
    /// The bits of the last word beyond the length have unspecified values, and are not observed.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [S::Word] {
        self.words.words_mut()
    }

    /// Returns the underlying store.
    #[inline]
    pub fn get_container(&self) -> &S {
        &self.words
    }

    /// Returns the underlying store, for bulk operations.
    ///
    /// The number of unused bits of the last word is retained across any modification of the store: pushing or
    /// popping words changes the length by whole words. Once the store is emptied, the bit vector is empty.
    #[inline]
    pub fn get_container_mut(&mut self) -> &mut S {
        &mut self.words
    }
}

//
//  Cursors
//

impl<S> BitVector<S>
where
    S: WordStore,
{
    /// Returns a cursor to the first bit, or the end if empty.
    #[inline]
    pub fn begin(&self) -> BitCursor<S::Word> {
        BitCursor::default()
    }

    /// Returns a cursor past the last bit.
    #[inline]
    pub fn end(&self) -> BitCursor<S::Word> {
        BitCursor::from_index(self.len())
    }

    /// Returns the bit designated by `cursor`, if it can be dereferenced.
    #[inline]
    pub fn bit(&self, cursor: BitCursor<S::Word>) -> Option<bool> {
        self.validate_cursor(cursor)
            .can_dereference()
            .then(|| cursor.read(self.data()))
    }

    /// Returns a proxy to the bit designated by `cursor`, if it can be dereferenced.
    #[inline]
    pub fn bit_mut(&mut self, cursor: BitCursor<S::Word>) -> Option<BitRef<'_, S::Word>> {
        if !self.validate_cursor(cursor).can_dereference() {
            return None;
        }

        Some(cursor.reference(self.words.words_mut()))
    }

    /// Returns an iterator over the bits.
    #[inline]
    pub fn iter(&self) -> Iter<'_, S::Word> {
        Iter::new(self.data(), self.len())
    }

    /// Classifies `cursor` against the bits of this bit vector.
    ///
    /// #   Examples
    ///
    /// ```
    /// #   use packed_bitvec::{api::CursorValidity, collections::BitVector};
    /// let bits = BitVector::from_elem(5, true);
    ///
    /// assert_eq!(CursorValidity::Dereferenceable, bits.validate_cursor(bits.begin() + 4));
    /// assert_eq!(CursorValidity::PastTheEnd, bits.validate_cursor(bits.end()));
    /// assert_eq!(CursorValidity::Invalid, bits.validate_cursor(bits.end() + 1));
    /// assert_eq!(CursorValidity::Invalid, bits.validate_cursor(bits.begin() - 1));
    /// ```
    #[inline]
    pub fn validate_cursor(&self, cursor: BitCursor<S::Word>) -> CursorValidity {
        cursor.validate(IndexOfWord(0), IndexOfWord(self.data().len()), self.free())
    }

    /// Returns whether the internal invariants of the bit vector hold.
    #[inline]
    pub fn validate(&self) -> bool {
        self.free < S::Word::BITS
    }
}

//
//  Modifications
//

impl<S> BitVector<S>
where
    S: WordStore,
{
    /// Inserts a bit set to `value` before `position`, and returns a cursor to it.
    ///
    /// #   Errors
    ///
    /// If `position` is not valid, in which case `self` is left unchanged.
    ///
    /// #   Panics
    ///
    /// If the memory cannot be allocated.
    pub fn insert(
        &mut self,
        position: BitCursor<S::Word>,
        value: bool,
    ) -> Result<BitCursor<S::Word>, PreconditionError> {
        self.check_cursor("insert", position, CursorValidity::is_valid)?;

        let end = self.end();

        self.push_back_unfilled();

        let words = self.words.words_mut();

        move_bits(words, position, end, position + 1);
        position.write(words, value);

        Ok(position)
    }

    /// Inserts `count` bits set to `value` before `position`, and returns a cursor to the first of them.
    ///
    /// #   Errors
    ///
    /// If `position` is not valid, in which case `self` is left unchanged.
    ///
    /// #   Panics
    ///
    /// If the memory cannot be allocated, or if the length would exceed `usize::MAX`.
    ///
    /// #   Examples
    ///
    /// ```
    /// #   use packed_bitvec::collections::BitVector;
    /// let mut bits = BitVector::from_elem(4, false);
    ///
    /// bits.insert_n(bits.begin() + 1, 2, true).expect("valid cursor");
    ///
    /// assert_eq!(vec![false, true, true, false, false, false], bits.iter().collect::<Vec<_>>());
    /// ```
    pub fn insert_n(
        &mut self,
        position: BitCursor<S::Word>,
        count: usize,
        value: bool,
    ) -> Result<BitCursor<S::Word>, PreconditionError> {
        self.check_cursor("insert_n", position, CursorValidity::is_valid)?;

        let end = self.end();

        let Some(len) = self.len().checked_add(count) else {
            capacity_overflow();
        };

        self.resize_unfilled(len);

        let words = self.words.words_mut();

        move_bits(words, position, end, position + offset(count));

        let mut cursor = position;

        for _ in 0..count {
            cursor.write(words, value);
            cursor.increment();
        }

        Ok(position)
    }

    /// Removes the bit at `position`, and returns a cursor to the bit which followed it.
    ///
    /// Never reallocates.
    ///
    /// #   Errors
    ///
    /// If `position` cannot be dereferenced, in which case `self` is left unchanged.
    pub fn erase(&mut self, position: BitCursor<S::Word>) -> Result<BitCursor<S::Word>, PreconditionError> {
        self.check_cursor("erase", position, CursorValidity::can_dereference)?;

        self.remove_range(position, position + 1);

        Ok(position)
    }

    /// Removes the bits in `[first, last)`, and returns a cursor to the bit which followed them.
    ///
    /// Never reallocates.
    ///
    /// #   Errors
    ///
    /// If either cursor is not valid, or if `first` is after `last`, in which case `self` is left unchanged.
    ///
    /// #   Examples
    ///
    /// ```
    /// #   use packed_bitvec::collections::BitVector;
    /// let mut bits: BitVector = [true, false, true, true, false].into_iter().collect();
    ///
    /// bits.erase_range(bits.begin() + 1, bits.begin() + 3).expect("valid range");
    ///
    /// assert_eq!(vec![true, true, false], bits.iter().collect::<Vec<_>>());
    /// ```
    pub fn erase_range(
        &mut self,
        first: BitCursor<S::Word>,
        last: BitCursor<S::Word>,
    ) -> Result<BitCursor<S::Word>, PreconditionError> {
        const OPERATION: &str = "erase_range";

        self.check_cursor(OPERATION, first, CursorValidity::is_valid)?;
        self.check_cursor(OPERATION, last, CursorValidity::is_valid)?;

        if first > last {
            return Err(PreconditionError::InvertedRange { operation: OPERATION });
        }

        self.remove_range(first, last);

        Ok(first)
    }

    //  Removes the bits in `[first, last)`.
    //
    //  Both cursors must be valid, and `first <= last`.
    fn remove_range(&mut self, first: BitCursor<S::Word>, last: BitCursor<S::Word>) {
        let removed = (last - first).unsigned_abs();

        if removed == 0 {
            return;
        }

        let capacity = self.words.capacity();
        let end = self.end();

        move_bits(self.words.words_mut(), last, end, first);

        self.resize_unfilled(self.len() - removed);

        debug_assert_eq!(capacity, self.words.capacity(), "erasing should never reallocate");
    }

    fn check_cursor(
        &self,
        operation: &'static str,
        cursor: BitCursor<S::Word>,
        accept: fn(CursorValidity) -> bool,
    ) -> Result<(), PreconditionError> {
        let validity = self.validate_cursor(cursor);

        if accept(validity) {
            Ok(())
        } else {
            Err(PreconditionError::InvalidCursor { operation, validity })
        }
    }
}

//
//  Whole words
//

impl<S> BitVector<S>
where
    S: WordStore,
{
    //  Returns the words, with the bits of the last word beyond the length cleared.
    pub(crate) fn masked_words(&self) -> impl ExactSizeIterator<Item = S::Word> + '_ {
        let words = self.data();
        let last = words.len().wrapping_sub(1);
        let kept = S::Word::BITS - self.free();

        words
            .iter()
            .enumerate()
            .map(move |(i, word)| if i == last { word.keep_lowest(kept) } else { *word })
    }
}

//
//  Iteration
//

/// An iterator over the bits of a `BitVector`.
#[derive(Clone, Debug)]
pub struct Iter<'a, W> {
    words: &'a [W],
    front: BitCursor<W>,
    back: BitCursor<W>,
}

impl<'a, W> Iter<'a, W>
where
    W: BitWord,
{
    fn new(words: &'a [W], len: usize) -> Self {
        Self {
            words,
            front: BitCursor::default(),
            back: BitCursor::from_index(len),
        }
    }
}

impl<W> Iterator for Iter<'_, W>
where
    W: BitWord,
{
    type Item = bool;

    #[inline]
    fn next(&mut self) -> Option<bool> {
        if self.front == self.back {
            return None;
        }

        let bit = self.front.read(self.words);
        self.front.increment();

        Some(bit)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.back - self.front).unsigned_abs();

        (remaining, Some(remaining))
    }
}

impl<W> DoubleEndedIterator for Iter<'_, W>
where
    W: BitWord,
{
    #[inline]
    fn next_back(&mut self) -> Option<bool> {
        if self.front == self.back {
            return None;
        }

        self.back.decrement();

        Some(self.back.read(self.words))
    }
}

impl<W> ExactSizeIterator for Iter<'_, W> where W: BitWord {}

impl<W> FusedIterator for Iter<'_, W> where W: BitWord {}

impl<'a, S> IntoIterator for &'a BitVector<S>
where
    S: WordStore,
{
    type Item = bool;
    type IntoIter = Iter<'a, S::Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S> Extend<bool> for BitVector<S>
where
    S: WordStore,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = bool>,
    {
        let iter = iter.into_iter();

        let (lower, _) = iter.size_hint();
        self.reserve(self.len().saturating_add(lower));

        for bit in iter {
            self.push_back(bit);
        }
    }
}

impl<S> FromIterator<bool> for BitVector<S>
where
    S: WordStore + Default,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut result = Self::default();
        result.extend(iter);
        result
    }
}

//
//  Common traits
//

static TRUE: bool = true;
static FALSE: bool = false;

impl<S> Index<usize> for BitVector<S>
where
    S: WordStore,
{
    type Output = bool;

    #[track_caller]
    fn index(&self, index: usize) -> &bool {
        match self.get(index) {
            Some(true) => &TRUE,
            Some(false) => &FALSE,
            None => index_out_of_bounds(BoundsError {
                index,
                len: self.len(),
            }),
        }
    }
}

impl<S> fmt::Debug for BitVector<S>
where
    S: WordStore,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str("BitVector(")?;

        for bit in self.iter() {
            f.write_char(if bit { '1' } else { '0' })?;
        }

        f.write_char(')')
    }
}

impl<S> Default for BitVector<S>
where
    S: WordStore + Default,
{
    fn default() -> Self {
        Self::with_store(S::default())
    }
}

impl<S> Eq for BitVector<S> where S: WordStore {}

impl<S> Hash for BitVector<S>
where
    S: WordStore,
{
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.len().hash(state);

        for word in self.masked_words() {
            word.hash(state);
        }
    }
}

impl<S> Ord for BitVector<S>
where
    S: WordStore,
{
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

impl<S, T> PartialEq<BitVector<T>> for BitVector<S>
where
    S: WordStore,
    T: WordStore<Word = S::Word>,
{
    fn eq(&self, other: &BitVector<T>) -> bool {
        self.len() == other.len() && self.masked_words().eq(other.masked_words())
    }
}

impl<S, T> PartialOrd<BitVector<T>> for BitVector<S>
where
    S: WordStore,
    T: WordStore<Word = S::Word>,
{
    fn partial_cmp(&self, other: &BitVector<T>) -> Option<Ordering> {
        Some(compare(self, other))
    }
}

//  Lexicographic comparison, lowest index first.
fn compare<S, T>(left: &BitVector<S>, right: &BitVector<T>) -> Ordering
where
    S: WordStore,
    T: WordStore<Word = S::Word>,
{
    let common = left.len().min(right.len());

    for (of_word, (l, r)) in left.masked_words().zip(right.masked_words()).enumerate() {
        let Some(in_word) = l.first_difference(r) else {
            continue;
        };

        //  A difference beyond the common prefix only stems from the longer of the two.
        match S::Word::fuse(IndexOfWord(of_word), in_word) {
            Some(index) if index < common => {
                return if l.is_set(in_word) {
                    Ordering::Greater
                } else {
                    Ordering::Less
                };
            }
            _ => break,
        }
    }

    left.len().cmp(&right.len())
}

//  Converts a number of bits into a cursor offset.
fn offset(count: usize) -> isize {
    isize::try_from(count).unwrap_or_else(|_| capacity_overflow())
}

#[cold]
#[inline(never)]
#[track_caller]
fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

#[cold]
#[inline(never)]
#[track_caller]
fn index_out_of_bounds(error: BoundsError) -> ! {
    panic!("{error}");
}

// mod tests_support

// mod creation_tests

// mod size_tests

#[cfg(test)]
mod access_tests {
    use super::{tests_support::*, *};

    #[test]
    fn get_test() {
        let bits: Bits8 = parse("0110000001");

        assert_eq!(Some(false), bits.get(0));
        assert_eq!(Some(true), bits.get(1));
        assert_eq!(Some(true), bits.get(9));
        assert_eq!(None, bits.get(10));

        assert!(bits.test(9, false));
        assert!(bits.test(10, true));
        assert!(!bits.test(10, false));
    }

    #[test]
    fn set_extends() {
        let mut bits = Bits8::default();

        bits.set(12, true);

        assert_eq!("0000000000001", render(&bits));

        bits.set(2, true);
        bits.set(12, false);

        assert_eq!("0010000000000", render(&bits));
    }

    #[test]
    fn set_extends_over_stale_bits() {
        let mut bits: Bits8 = parse("1111");

        bits.resize(1, false);
        bits.set(5, true);

        assert_eq!("100001", render(&bits));
    }

    #[test]
    fn at() {
        let mut bits: Bits8 = parse("01");

        assert_eq!(Ok(false), bits.at(0));
        assert_eq!(Ok(true), bits.at(1));
        assert_eq!(Err(BoundsError { index: 2, len: 2 }), bits.at(2));

        bits.at_mut(0).expect("in bounds").set(true);

        assert_eq!("11", render(&bits));
        assert_eq!(Err(BoundsError { index: 5, len: 2 }), bits.at_mut(5).map(bool::from));
    }

    #[test]
    fn front_back() {
        let mut bits = Bits8::default();

        assert_eq!(Err(PreconditionError::Empty { operation: "front" }), bits.front());
        assert_eq!(Err(PreconditionError::Empty { operation: "back" }), bits.back());
        assert!(bits.front_mut().is_err());
        assert!(bits.back_mut().is_err());

        bits.assign([true, false, false]);

        assert_eq!(Ok(true), bits.front());
        assert_eq!(Ok(false), bits.back());

        bits.front_mut().expect("not empty").set(false);
        bits.back_mut().expect("not empty").set(true);

        assert_eq!("001", render(&bits));

        //  Safety:
        //  -   `bits` is not empty.
        unsafe {
            assert!(!bits.front_unchecked());
            assert!(bits.back_unchecked());
        }
    }

    #[test]
    fn unchecked() {
        let mut bits: Bits8 = parse("0000000000");

        //  Safety:
        //  -   9 < 10.
        unsafe {
            bits.get_unchecked_mut(9).set(true);

            assert!(bits.get_unchecked(9));
            assert!(!bits.get_unchecked(8));
        }
    }

    #[test]
    fn index() {
        let bits: Bits8 = parse("10");

        assert!(bits[0]);
        assert!(!bits[1]);
    }

    #[test]
    #[should_panic(expected = "index 2 out of bounds for a bit vector of length 2")]
    fn index_out_of_bounds() {
        let bits: Bits8 = parse("10");

        let _ = bits[2];
    }

    #[test]
    fn cursors() {
        let mut bits: Bits8 = parse("0010000001");

        assert_eq!(10, bits.end() - bits.begin());
        assert_eq!(Some(true), bits.bit(bits.begin() + 2));
        assert_eq!(Some(true), bits.bit(bits.end() - 1));
        assert_eq!(None, bits.bit(bits.end()));
        assert_eq!(None, bits.bit(bits.begin() - 1));

        let cursor = bits.begin() + 3;
        bits.bit_mut(cursor).expect("dereferenceable").set(true);

        assert_eq!("0011000001", render(&bits));

        let end = bits.end();
        assert!(bits.bit_mut(end).is_none());
    }

    #[test]
    fn data_and_container() {
        let mut bits = BitVector::with_store(Vec::<u8>::new());

        bits.resize(12, true);

        assert_eq!(2, bits.get_container().len());

        bits.data_mut()[0] = 0b0000_0101;

        assert_eq!("101000001111", render(&bits));

        //  Appending a word appends whole words of bits, keeping the free bits count.
        bits.get_container_mut().push(u8::ALL_ONES);

        assert_eq!(20, bits.len());
        assert!(bits.validate());
    }

    #[test]
    fn container_emptied_with_free_bits() {
        let mut bits = BitVector::with_store(Vec::<u8>::new());

        bits.resize(3, true);
        bits.get_container_mut().pop();

        assert_eq!(0, bits.len());
        assert!(bits.is_empty());
        assert!(bits.validate());
        assert_eq!(CursorValidity::PastTheEnd, bits.validate_cursor(bits.begin()));
        assert_eq!(Err(PreconditionError::Empty { operation: "pop_back" }), bits.pop_back());
        assert_eq!(BitVector::with_store(Vec::<u8>::new()), bits);

        bits.resize(2, true);

        assert_eq!("11", render(&bits));
        assert!(bits.validate());

        bits.get_container_mut().pop();

        bits.insert(bits.begin(), true).expect("valid cursor");
        bits.push_back(false);

        assert_eq!("10", render(&bits));
        assert_eq!(Ok(false), bits.pop_back());
        assert_eq!(Ok(true), bits.pop_back());
        assert!(bits.is_empty());
    }
} // mod access_tests

// mod modification_tests

// mod comparison_tests

#[cfg(test)]
mod iter_tests {
    use super::{tests_support::*, *};

    #[test]
    fn forward_backward() {
        let bits: Bits8 = parse("1101000011");

        assert_eq!("1101000011", render(&bits));

        let reversed: String = bits.iter().rev().map(|bit| if bit { '1' } else { '0' }).collect();

        assert_eq!("1100001011", reversed);
    }

    #[test]
    fn mixed() {
        let bits: Bits8 = parse("1001");

        let mut iter = bits.iter();

        assert_eq!(4, iter.len());
        assert_eq!(Some(true), iter.next());
        assert_eq!(Some(true), iter.next_back());
        assert_eq!(2, iter.len());
        assert_eq!(Some(false), iter.next_back());
        assert_eq!(Some(false), iter.next());
        assert_eq!(0, iter.len());
        assert_eq!(None, iter.next());
        assert_eq!(None, iter.next_back());
    }

    #[test]
    fn into_iter() {
        let bits: Bits8 = parse("011");

        let mut count = 0;

        for bit in &bits {
            count += usize::from(bit);
        }

        assert_eq!(2, count);
    }
} // mod iter_tests

// mod model_tests
