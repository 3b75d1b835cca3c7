//  See `BitWord` trait.
//
//  #   Why a trait, rather than a fixed `u64`?
//
//  The width of a word is a trade-off between the cost of bulk operations, which favors wide words, and the memory
//  wasted in the tail of the last word, which favors narrow words. Small vectors, or vectors stored en masse, may
//  prefer `u8` or `u16`, while large vectors prefer `u64`.
//
//  It also makes testing word boundaries much cheaper: with `u8`, a 20 bits vector already spans 3 words.
//
//
//  #   Why `unsafe`?
//
//  Stores hand out freshly allocated, zeroed, memory as words. This is only sound if the all-zeros bit pattern is a
//  valid value of the word type.

use core::{fmt::Debug, hash::Hash};

/// The index of a word, in a sequence of words.
///
/// #   Why `usize`?
///
/// In Rust, all slices are indexed by a `usize`, and the `IndexOfWord` will be used nigh exclusively as an index in
/// slices.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct IndexOfWord(pub usize);

/// The index of a bit in a word.
///
/// The index of a bit in a word is expected to always be strictly less than the number of bits of the word. No index
/// created by `BitWord::split` will ever violate this invariant.
///
/// #   Panics
///
/// In Debug, most operations taking an `IndexInWord` will panic if its value is out of range.
///
/// In Release, any high bit will be ignored (masked away).
///
/// #   Why `u32`?
///
/// In Rust, all shift operations take a `u32` as their right-hand argument, and the `IndexInWord` will be used nigh
/// exclusively with shift operations.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct IndexInWord(pub u32);

/// A word of bits, the unit of storage of a bit vector.
///
/// Bit `i` of word `w` represents the logical position `w * BITS + i`.
///
/// #   Safety
///
/// Implementers must be plain unsigned integers: any bit pattern, including all-zeros, is a valid value.
pub unsafe trait BitWord: Copy + Debug + Default + Eq + Hash + Ord + Send + Sync + 'static {
    /// Number of bits in a word.
    const BITS: u32;

    /// An all-zeros word.
    const ALL_ZEROS: Self;

    /// An all-ones word.
    const ALL_ONES: Self;

    /// Returns whether the given bit is set.
    ///
    /// #   Panics
    ///
    /// See `IndexInWord`.
    fn is_set(self, bit: IndexInWord) -> bool;

    /// Sets, or resets, the given bit, according to `value`.
    ///
    /// #   Panics
    ///
    /// See `IndexInWord`.
    fn assign(&mut self, bit: IndexInWord, value: bool);

    /// Returns a copy of `self` in which only the `count` lowest bits are kept, all others being reset.
    ///
    /// `count` may be anywhere in `0..=Self::BITS`.
    fn keep_lowest(self, count: u32) -> Self;

    /// Returns the index of the lowest bit which differs between `self` and `other`, if any.
    fn first_difference(self, other: Self) -> Option<IndexInWord>;

    /// Splits a bit index into an index-of-word/index-in-word pair.
    ///
    /// #   Examples
    ///
    /// ```
    /// #   use packed_bitvec::utils::BitWord;
    /// let (of_word, in_word) = u8::split(21);
    ///
    /// assert_eq!(2, of_word.0);
    /// assert_eq!(5, in_word.0);
    /// ```
    #[inline]
    fn split(index: usize) -> (IndexOfWord, IndexInWord) {
        //  Compute both / and % close together, so the optimizer fuses both in a single instruction.
        let bits = Self::BITS as usize;

        let of_word = index / bits;
        let in_word = index % bits;

        (IndexOfWord(of_word), IndexInWord(in_word as u32))
    }

    /// Fuses an index-of-word/index-in-word pair into a bit index.
    ///
    /// Returns None if the pair designates a bit beyond `usize::MAX`. This will never happen for pairs obtained from
    /// `Self::split`.
    ///
    /// #   Panics
    ///
    /// See `IndexInWord`.
    ///
    /// #   Examples
    ///
    /// ```
    /// #   use packed_bitvec::utils::{BitWord, IndexInWord, IndexOfWord};
    /// let index = u8::fuse(IndexOfWord(2), IndexInWord(5)).expect("no overflow");
    ///
    /// assert_eq!(21, index);
    /// ```
    #[inline]
    fn fuse(of_word: IndexOfWord, in_word: IndexInWord) -> Option<usize> {
        debug_assert!(in_word.0 < Self::BITS);

        //  Mask to ensure the addition stays within the word.
        let in_word = (in_word.0 % Self::BITS) as usize;

        of_word.0.checked_mul(Self::BITS as usize)?.checked_add(in_word)
    }

    /// Returns the number of words required to hold `bits` bits, that is `⌈bits / BITS⌉`.
    #[inline]
    fn words_for(bits: usize) -> usize {
        bits.div_ceil(Self::BITS as usize)
    }

    /// Returns the number of unused bits in the last word, when holding `bits` bits.
    ///
    /// The result is always strictly less than `BITS`, and is 0 when `bits` is a multiple of `BITS`.
    #[inline]
    fn free_bits_for(bits: usize) -> u32 {
        let bits_per_word = Self::BITS as usize;

        ((bits_per_word - bits % bits_per_word) % bits_per_word) as u32
    }
}

macro_rules! impl_bit_word {
    ($($t:ty),*) => {
        $(
            //  Safety:
            //  -   Plain unsigned integer.
            unsafe impl BitWord for $t {
                const BITS: u32 = <$t>::BITS;

                const ALL_ZEROS: Self = 0;

                const ALL_ONES: Self = !0;

                #[inline]
                fn is_set(self, bit: IndexInWord) -> bool {
                    (self & bit_mask::<$t>(bit)) != 0
                }

                #[inline]
                fn assign(&mut self, bit: IndexInWord, value: bool) {
                    let mask = bit_mask::<$t>(bit);

                    if value {
                        *self |= mask;
                    } else {
                        *self &= !mask;
                    }
                }

                #[inline]
                fn keep_lowest(self, count: u32) -> Self {
                    debug_assert!(count <= Self::BITS);

                    match Self::ALL_ONES.checked_shl(count) {
                        Some(high) => self & !high,
                        None => self,
                    }
                }

                #[inline]
                fn first_difference(self, other: Self) -> Option<IndexInWord> {
                    let difference = self ^ other;

                    (difference != 0).then(|| IndexInWord(difference.trailing_zeros()))
                }
            }
        )*
    };
}

impl_bit_word!(u8, u16, u32, u64, usize);

//  Mask of the bit.
#[inline]
fn bit_mask<W>(bit: IndexInWord) -> W
where
    W: BitWord + From<u8> + core::ops::Shl<u32, Output = W>,
{
    debug_assert!(bit.0 < W::BITS, "{} >= {}", bit.0, W::BITS);

    //  Mask to ensure the shift doesn't overflow.
    let shift = bit.0 % W::BITS;

    W::from(1) << shift
}

#[cfg(test)]
mod static_tests {
    use super::*;

    #[test]
    fn split_brush() {
        assert_eq!((0, 0), compute_split(0));
        assert_eq!((0, 1), compute_split(1));
        assert_eq!((0, 62), compute_split(62));
        assert_eq!((0, 63), compute_split(63));

        assert_eq!((1, 0), compute_split(64));
        assert_eq!((1, 1), compute_split(65));
        assert_eq!((1, 63), compute_split(127));

        assert_eq!((2, 0), compute_split(128));
    }

    #[test]
    fn split_narrow() {
        assert_eq!((IndexOfWord(0), IndexInWord(7)), u8::split(7));
        assert_eq!((IndexOfWord(1), IndexInWord(0)), u8::split(8));
        assert_eq!((IndexOfWord(2), IndexInWord(15)), u16::split(47));
    }

    #[test]
    fn split_max() {
        let (of_word, in_word) = u64::split(usize::MAX);

        assert_eq!(Some(usize::MAX), u64::fuse(of_word, in_word));
    }

    #[test]
    fn fuse_brush() {
        assert_eq!(Some(0), compute_fuse(0, 0));
        assert_eq!(Some(63), compute_fuse(0, 63));
        assert_eq!(Some(64), compute_fuse(1, 0));
        assert_eq!(Some(127), compute_fuse(1, 63));
        assert_eq!(Some(128), compute_fuse(2, 0));
    }

    #[test]
    fn fuse_overflow() {
        let highest_of_word = usize::MAX / 64;

        assert_eq!(Some(usize::MAX), compute_fuse(highest_of_word, 63));
        assert_eq!(None, compute_fuse(highest_of_word + 1, 0));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic]
    fn fuse_in_overflow() {
        compute_fuse(0, 64);
    }

    #[test]
    fn words_for() {
        assert_eq!(0, u8::words_for(0));
        assert_eq!(1, u8::words_for(1));
        assert_eq!(1, u8::words_for(8));
        assert_eq!(2, u8::words_for(9));

        assert_eq!(usize::MAX / 64 + 1, u64::words_for(usize::MAX));
    }

    #[test]
    fn free_bits_for() {
        assert_eq!(0, u8::free_bits_for(0));
        assert_eq!(7, u8::free_bits_for(1));
        assert_eq!(0, u8::free_bits_for(8));
        assert_eq!(7, u8::free_bits_for(9));

        assert_eq!(0, u64::free_bits_for(usize::MAX - 63));
        assert_eq!(1, u64::free_bits_for(usize::MAX));
        assert_eq!(2, u64::free_bits_for(usize::MAX - 1));
    }

    fn compute_split(index: usize) -> (usize, u32) {
        let (of_word, in_word) = u64::split(index);

        (of_word.0, in_word.0)
    }

    fn compute_fuse(of_word: usize, in_word: u32) -> Option<usize> {
        u64::fuse(IndexOfWord(of_word), IndexInWord(in_word))
    }
} // mod static_tests

#[cfg(test)]
mod bit_tests {
    use super::*;

    #[test]
    fn is_set() {
        let word: u16 = 0b1001;

        assert!(word.is_set(IndexInWord(0)));
        assert!(word.is_set(IndexInWord(3)));

        for i in (1..=2).chain(4..16) {
            assert!(!word.is_set(IndexInWord(i)), "{i}");
        }
    }

    #[test]
    fn assign() {
        for i in 0..u32::BITS {
            let mut word = u32::ALL_ZEROS;

            word.assign(IndexInWord(i), true);
            assert_eq!(1 << i, word, "{i}");

            word.assign(IndexInWord(i), false);
            assert_eq!(0, word, "{i}");
        }
    }

    #[test]
    fn keep_lowest() {
        assert_eq!(0, u8::ALL_ONES.keep_lowest(0));
        assert_eq!(0b0000_0111, u8::ALL_ONES.keep_lowest(3));
        assert_eq!(u8::ALL_ONES, u8::ALL_ONES.keep_lowest(8));
        assert_eq!(u64::ALL_ONES, u64::ALL_ONES.keep_lowest(64));
    }

    #[test]
    fn first_difference() {
        assert_eq!(None, 0b1010u8.first_difference(0b1010));
        assert_eq!(Some(IndexInWord(2)), 0b1010u8.first_difference(0b1110));
        assert_eq!(Some(IndexInWord(63)), 0u64.first_difference(1 << 63));
    }
} // mod bit_tests
