//! A position within a sequence of bits, stored in words.

//  Design considerations
//
//  #   Why not a borrowing iterator?
//
//  A position which borrows its bit vector could not be handed back to the very same bit vector for `insert` or
//  `erase`. `BitCursor` is therefore a plain value, a (word, bit) pair, which only acts on storage when explicitly
//  handed the words.
//
//  #   Why wrapping word arithmetic?
//
//  Stepping before the first word, or far beyond the last, is legitimate as an intermediate result, as long as the
//  cursor is brought back in range before being dereferenced. Wrapping keeps `(c + a) + b == c + (a + b)` for all
//  `a` and `b`, while `validate` flags any cursor left out of range.

use core::{
    cmp::Ordering,
    fmt,
    marker::PhantomData,
    ops::{Add, AddAssign, Sub, SubAssign},
};

use crate::{
    api::BitRef,
    utils::{BitWord, IndexInWord, IndexOfWord},
};

/// Classification of a cursor against the range of bits of a bit vector.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CursorValidity {
    /// The cursor is neither within the range of bits, nor exactly at its end.
    Invalid,
    /// The cursor is exactly at the end of the range: it is valid, but may not be dereferenced.
    PastTheEnd,
    /// The cursor designates a bit within the range.
    Dereferenceable,
}

impl CursorValidity {
    /// Returns whether the cursor is valid, be it dereferenceable or not.
    #[inline]
    pub const fn is_valid(self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Returns whether the cursor may be dereferenced.
    #[inline]
    pub const fn can_dereference(self) -> bool {
        matches!(self, Self::Dereferenceable)
    }
}

impl fmt::Display for CursorValidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let name = match self {
            Self::Invalid => "invalid",
            Self::PastTheEnd => "valid, but not dereferenceable",
            Self::Dereferenceable => "dereferenceable",
        };

        f.write_str(name)
    }
}

/// A position within a sequence of bits, stored in words of type `W`.
///
/// Cursors are ordered lexicographically by index of word, then by index in word, and support the full range of
/// random-access arithmetic. Two cursors are equal if and only if they designate the same word and the same bit.
///
/// #   Examples
///
/// ```
/// #   use packed_bitvec::api::BitCursor;
/// let start = BitCursor::<u8>::from_index(6);
///
/// let cursor = start + 5;
///
/// assert_eq!(1, cursor.of_word().0);
/// assert_eq!(3, cursor.in_word().0);
///
/// assert_eq!(5, cursor - start);
/// assert_eq!(start, cursor - 5);
/// ```
pub struct BitCursor<W> {
    of_word: IndexOfWord,
    in_word: IndexInWord,
    _word: PhantomData<fn(W) -> W>,
}

//
//  Construction
//

impl<W> BitCursor<W>
where
    W: BitWord,
{
    /// Creates a cursor designating bit `in_word` of word `of_word`.
    ///
    /// #   Panics
    ///
    /// See `IndexInWord`.
    #[inline]
    pub fn from_raw(of_word: IndexOfWord, in_word: IndexInWord) -> Self {
        debug_assert!(in_word.0 < W::BITS, "{} >= {}", in_word.0, W::BITS);

        Self {
            of_word,
            in_word,
            _word: PhantomData,
        }
    }

    /// Creates a cursor designating the bit at `index`.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        let (of_word, in_word) = W::split(index);

        Self::from_raw(of_word, in_word)
    }

    /// Returns the index of the word designated by the cursor.
    #[inline]
    pub fn of_word(&self) -> IndexOfWord {
        self.of_word
    }

    /// Returns the index, within its word, of the bit designated by the cursor.
    #[inline]
    pub fn in_word(&self) -> IndexInWord {
        self.in_word
    }

    /// Returns the index of the bit designated by the cursor, if representable.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        W::fuse(self.of_word, self.in_word)
    }
}

//
//  Arithmetic
//

impl<W> BitCursor<W>
where
    W: BitWord,
{
    /// Moves the cursor to the next bit.
    #[inline]
    pub fn increment(&mut self) -> &mut Self {
        self.in_word.0 += 1;

        if self.in_word.0 == W::BITS {
            self.of_word.0 = self.of_word.0.wrapping_add(1);
            self.in_word.0 = 0;
        }

        self
    }

    /// Moves the cursor to the previous bit.
    #[inline]
    pub fn decrement(&mut self) -> &mut Self {
        if self.in_word.0 == 0 {
            self.of_word.0 = self.of_word.0.wrapping_sub(1);
            self.in_word.0 = W::BITS;
        }

        self.in_word.0 -= 1;

        self
    }

    /// Moves the cursor by `n` bits, forward if `n` is positive, backward otherwise.
    ///
    /// The result is identical to `n` calls to `increment`, or `-n` calls to `decrement`.
    ///
    /// #   Panics
    ///
    /// If `n` is so close to `isize::MAX` that the offset within the word cannot be added to it.
    #[inline]
    pub fn advance(&mut self, n: isize) -> &mut Self {
        let Some(total) = n.checked_add(self.in_word.0 as isize) else {
            offset_overflow(n);
        };

        let bits = W::BITS as usize;

        if total >= 0 {
            let total = total as usize;

            self.of_word.0 = self.of_word.0.wrapping_add(total / bits);
            self.in_word.0 = (total % bits) as u32;
        } else {
            //  Negative division and modulo round towards zero, hence mirror the computation around the word instead.
            //
            //  `unsigned_abs` is at most `isize::MAX + 1`, hence adding less than a word cannot overflow.
            let backwards = total.unsigned_abs() + (bits - 1);

            self.of_word.0 = self.of_word.0.wrapping_sub(backwards / bits);
            self.in_word.0 = ((bits - 1) - backwards % bits) as u32;
        }

        self
    }

    /// Moves the cursor by `n` bits, backward if `n` is positive, forward otherwise.
    ///
    /// #   Panics
    ///
    /// If `n` is `isize::MIN`, or see `advance`.
    #[inline]
    pub fn retreat(&mut self, n: isize) -> &mut Self {
        let Some(n) = n.checked_neg() else {
            offset_overflow(n);
        };

        self.advance(n)
    }

    /// Returns the signed distance, in bits, from `origin` to `self`.
    #[inline]
    pub fn distance_from(&self, origin: &Self) -> isize {
        let words = self.of_word.0.wrapping_sub(origin.of_word.0) as isize;
        let bits = self.in_word.0 as isize - origin.in_word.0 as isize;

        words.wrapping_mul(W::BITS as isize).wrapping_add(bits)
    }
}

//
//  Validation
//

impl<W> BitCursor<W>
where
    W: BitWord,
{
    /// Classifies the cursor against the bits stored in words `[start, end)`, the last of which has `tail_free_bits`
    /// unused bits.
    ///
    /// #   Examples
    ///
    /// ```
    /// #   use packed_bitvec::api::{BitCursor, CursorValidity};
    /// #   use packed_bitvec::utils::IndexOfWord;
    /// //  12 bits, stored in 2 bytes, with 4 free bits at the tail.
    /// let (start, end) = (IndexOfWord(0), IndexOfWord(2));
    ///
    /// let validity = |index| BitCursor::<u8>::from_index(index).validate(start, end, 4);
    ///
    /// assert_eq!(CursorValidity::Dereferenceable, validity(11));
    /// assert_eq!(CursorValidity::PastTheEnd, validity(12));
    /// assert_eq!(CursorValidity::Invalid, validity(13));
    /// ```
    pub fn validate(&self, start: IndexOfWord, end: IndexOfWord, tail_free_bits: u32) -> CursorValidity {
        let current = self.of_word.0;

        if current < start.0 {
            return CursorValidity::Invalid;
        }

        if tail_free_bits == 0 {
            return match current.cmp(&end.0) {
                Ordering::Less => CursorValidity::Dereferenceable,
                Ordering::Equal if self.in_word.0 == 0 => CursorValidity::PastTheEnd,
                _ => CursorValidity::Invalid,
            };
        }

        //  With free bits, there must be a last word.
        let Some(last) = end.0.checked_sub(1) else {
            return CursorValidity::Invalid;
        };

        match current.cmp(&last) {
            Ordering::Less => CursorValidity::Dereferenceable,
            Ordering::Equal => {
                let end_bit = W::BITS.saturating_sub(tail_free_bits);

                match self.in_word.0.cmp(&end_bit) {
                    Ordering::Less => CursorValidity::Dereferenceable,
                    Ordering::Equal => CursorValidity::PastTheEnd,
                    Ordering::Greater => CursorValidity::Invalid,
                }
            }
            Ordering::Greater => CursorValidity::Invalid,
        }
    }
}

//
//  Dereference
//

impl<W> BitCursor<W>
where
    W: BitWord,
{
    /// Returns the value of the designated bit.
    ///
    /// #   Panics
    ///
    /// If the designated word is not within `words`.
    #[inline]
    #[track_caller]
    pub fn read(&self, words: &[W]) -> bool {
        words[self.of_word.0].is_set(self.in_word)
    }

    /// Sets the value of the designated bit.
    ///
    /// #   Panics
    ///
    /// If the designated word is not within `words`.
    #[inline]
    #[track_caller]
    pub fn write(&self, words: &mut [W], value: bool) {
        words[self.of_word.0].assign(self.in_word, value);
    }

    /// Returns a proxy to the designated bit.
    ///
    /// #   Panics
    ///
    /// If the designated word is not within `words`.
    #[inline]
    #[track_caller]
    pub fn reference<'a>(&self, words: &'a mut [W]) -> BitRef<'a, W> {
        BitRef::new(&mut words[self.of_word.0], self.in_word)
    }

    /// Returns the value of the designated bit.
    ///
    /// #   Safety
    ///
    /// The designated word must be within `words`.
    #[inline]
    pub unsafe fn read_unchecked(&self, words: &[W]) -> bool {
        debug_assert!(self.of_word.0 < words.len(), "{} >= {}", self.of_word.0, words.len());

        //  Safety:
        //  -   `self.of_word.0` is in-bounds, as per pre-condition.
        let word = unsafe { *words.get_unchecked(self.of_word.0) };

        word.is_set(self.in_word)
    }

    /// Returns a proxy to the designated bit.
    ///
    /// #   Safety
    ///
    /// The designated word must be within `words`.
    #[inline]
    pub unsafe fn reference_unchecked<'a>(&self, words: &'a mut [W]) -> BitRef<'a, W> {
        debug_assert!(self.of_word.0 < words.len(), "{} >= {}", self.of_word.0, words.len());

        //  Safety:
        //  -   `self.of_word.0` is in-bounds, as per pre-condition.
        let word = unsafe { words.get_unchecked_mut(self.of_word.0) };

        BitRef::new(word, self.in_word)
    }
}

//
//  Operators
//

impl<W> Add<isize> for BitCursor<W>
where
    W: BitWord,
{
    type Output = Self;

    #[inline]
    fn add(mut self, n: isize) -> Self {
        self.advance(n);
        self
    }
}

impl<W> AddAssign<isize> for BitCursor<W>
where
    W: BitWord,
{
    #[inline]
    fn add_assign(&mut self, n: isize) {
        self.advance(n);
    }
}

impl<W> Sub<isize> for BitCursor<W>
where
    W: BitWord,
{
    type Output = Self;

    #[inline]
    fn sub(mut self, n: isize) -> Self {
        self.retreat(n);
        self
    }
}

impl<W> SubAssign<isize> for BitCursor<W>
where
    W: BitWord,
{
    #[inline]
    fn sub_assign(&mut self, n: isize) {
        self.retreat(n);
    }
}

impl<W> Sub for BitCursor<W>
where
    W: BitWord,
{
    type Output = isize;

    #[inline]
    fn sub(self, origin: Self) -> isize {
        self.distance_from(&origin)
    }
}

//
//  Common traits
//
//  Implemented by hand, as deriving would require `W` itself to implement them.
//

impl<W> Clone for BitCursor<W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for BitCursor<W> {}

impl<W> fmt::Debug for BitCursor<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.debug_struct("BitCursor")
            .field("of_word", &self.of_word.0)
            .field("in_word", &self.in_word.0)
            .finish()
    }
}

impl<W> Default for BitCursor<W> {
    fn default() -> Self {
        Self {
            of_word: IndexOfWord::default(),
            in_word: IndexInWord::default(),
            _word: PhantomData,
        }
    }
}

impl<W> Eq for BitCursor<W> {}

impl<W> core::hash::Hash for BitCursor<W> {
    fn hash<H>(&self, state: &mut H)
    where
        H: core::hash::Hasher,
    {
        self.of_word.hash(state);
        self.in_word.hash(state);
    }
}

impl<W> Ord for BitCursor<W> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.of_word
            .cmp(&other.of_word)
            .then_with(|| self.in_word.cmp(&other.in_word))
    }
}

impl<W> PartialEq for BitCursor<W> {
    fn eq(&self, other: &Self) -> bool {
        self.of_word == other.of_word && self.in_word == other.in_word
    }
}

impl<W> PartialOrd for BitCursor<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cold]
#[inline(never)]
#[track_caller]
fn offset_overflow(n: isize) -> ! {
    panic!("Cannot offset a cursor by {n}");
}

#[cfg(test)]
mod arithmetic_tests {
    use super::*;

    type Cursor = BitCursor<u8>;

    #[test]
    fn increment_crosses_words() {
        let mut cursor = Cursor::from_index(6);

        cursor.increment();
        assert_eq!((0, 7), raw(cursor));

        cursor.increment();
        assert_eq!((1, 0), raw(cursor));

        cursor.decrement();
        assert_eq!((0, 7), raw(cursor));
    }

    #[test]
    fn decrement_before_start_wraps() {
        let mut cursor = Cursor::default();

        cursor.decrement();

        assert_eq!((usize::MAX, 7), raw(cursor));

        cursor.increment();

        assert_eq!(Cursor::default(), cursor);
    }

    #[test]
    fn advance_matches_steps() {
        for start in 0..40 {
            let origin = Cursor::from_index(start);

            for n in -40isize..=40 {
                let mut stepped = origin;

                for _ in 0..n.unsigned_abs() {
                    if n >= 0 {
                        stepped.increment();
                    } else {
                        stepped.decrement();
                    }
                }

                assert_eq!(stepped, origin + n, "{start} + {n}");
                assert_eq!(stepped, origin - (-n), "{start} - {}", -n);
            }
        }
    }

    #[test]
    fn advance_wide_word() {
        let origin = BitCursor::<u64>::from_index(130);

        assert_eq!(BitCursor::from_index(0), origin - 130);
        assert_eq!(BitCursor::from_index(127), origin - 3);
        assert_eq!(BitCursor::from_index(1000), origin + 870);
    }

    #[test]
    fn advance_associative() {
        let origin = Cursor::from_index(17);

        for a in -30isize..=30 {
            for b in -30isize..=30 {
                assert_eq!((origin + a) + b, origin + (a + b), "{a} {b}");
            }
        }
    }

    #[test]
    fn advance_extremes() {
        let origin = Cursor::from_index(0);

        let far = origin + isize::MAX;

        assert_eq!(Some(isize::MAX as usize), far.index());
        assert_eq!(origin, far - isize::MAX);

        let before = origin + isize::MIN;

        assert_eq!(isize::MIN, before - origin);
    }

    #[test]
    #[should_panic]
    fn retreat_min() {
        let _ = Cursor::from_index(3) - isize::MIN;
    }

    #[test]
    fn distance() {
        let a = Cursor::from_index(3);
        let b = Cursor::from_index(21);

        assert_eq!(18, b - a);
        assert_eq!(-18, a - b);
        assert_eq!(0, a - a);
    }

    #[test]
    fn ordering() {
        let cursors: Vec<_> = (0..20).map(Cursor::from_index).collect();

        for (i, left) in cursors.iter().enumerate() {
            for (j, right) in cursors.iter().enumerate() {
                assert_eq!(i.cmp(&j), left.cmp(right), "{i} {j}");
                assert_eq!(i == j, left == right, "{i} {j}");
                assert_eq!(i < j, left < right, "{i} {j}");
                assert_eq!(i <= j, left <= right, "{i} {j}");
                assert_eq!(i > j, left > right, "{i} {j}");
                assert_eq!(i >= j, left >= right, "{i} {j}");
            }
        }
    }

    fn raw(cursor: Cursor) -> (usize, u32) {
        (cursor.of_word().0, cursor.in_word().0)
    }
} // mod arithmetic_tests

#[cfg(test)]
mod validate_tests {
    use super::*;

    type Cursor = BitCursor<u8>;

    #[test]
    fn empty() {
        let validate = |index| Cursor::from_index(index).validate(IndexOfWord(0), IndexOfWord(0), 0);

        assert_eq!(CursorValidity::PastTheEnd, validate(0));
        assert_eq!(CursorValidity::Invalid, validate(1));
        assert_eq!(CursorValidity::Invalid, validate(8));
    }

    #[test]
    fn full_words() {
        //  16 bits, no free bit.
        let validate = |index| Cursor::from_index(index).validate(IndexOfWord(0), IndexOfWord(2), 0);

        for index in 0..16 {
            assert_eq!(CursorValidity::Dereferenceable, validate(index), "{index}");
        }

        assert_eq!(CursorValidity::PastTheEnd, validate(16));
        assert_eq!(CursorValidity::Invalid, validate(17));
        assert_eq!(CursorValidity::Invalid, validate(24));
    }

    #[test]
    fn partial_tail() {
        //  13 bits, 3 free bits.
        let validate = |index| Cursor::from_index(index).validate(IndexOfWord(0), IndexOfWord(2), 3);

        for index in 0..13 {
            assert_eq!(CursorValidity::Dereferenceable, validate(index), "{index}");
        }

        assert_eq!(CursorValidity::PastTheEnd, validate(13));

        for index in 14..24 {
            assert_eq!(CursorValidity::Invalid, validate(index), "{index}");
        }
    }

    #[test]
    fn before_start() {
        let cursor = Cursor::default() - 1;

        assert_eq!(CursorValidity::Invalid, cursor.validate(IndexOfWord(0), IndexOfWord(2), 3));
        assert_eq!(
            CursorValidity::Invalid,
            Cursor::from_index(3).validate(IndexOfWord(1), IndexOfWord(2), 0)
        );
    }

    #[test]
    fn flags() {
        assert!(!CursorValidity::Invalid.is_valid());
        assert!(CursorValidity::PastTheEnd.is_valid());
        assert!(CursorValidity::Dereferenceable.is_valid());

        assert!(!CursorValidity::Invalid.can_dereference());
        assert!(!CursorValidity::PastTheEnd.can_dereference());
        assert!(CursorValidity::Dereferenceable.can_dereference());
    }
} // mod validate_tests

#[cfg(test)]
mod dereference_tests {
    use super::*;

    #[test]
    fn read_write() {
        let mut words = [0u8; 3];

        let cursor = BitCursor::<u8>::from_index(11);

        assert!(!cursor.read(&words));

        cursor.write(&mut words, true);

        assert!(cursor.read(&words));
        assert_eq!([0, 0b1000, 0], words);

        cursor.reference(&mut words).set(false);

        assert_eq!([0, 0, 0], words);
    }

    #[test]
    #[should_panic]
    fn read_out_of_words() {
        let words = [0u8; 1];

        BitCursor::<u8>::from_index(8).read(&words);
    }
} // mod dereference_tests
