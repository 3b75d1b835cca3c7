//  See `move_bits`.

use crate::{api::BitCursor, utils::BitWord};

/// Copies the bits in `[start, end)` to `[dest, dest + (end - start))`, within the same sequence of words.
///
/// The source and destination ranges may overlap: the copy direction is chosen so that no source bit is overwritten
/// before it is read. Bits outside the destination range are left untouched.
///
/// Returns the end of the destination range.
///
/// #   Panics
///
/// If `start > end`, or if either range is not within `words`.
///
/// #   Examples
///
/// ```
/// #   use packed_bitvec::{algorithm::move_bits, api::BitCursor};
/// let mut words: [u8; 2] = [0b0000_1111, 0];
///
/// let at = BitCursor::from_index;
///
/// //  Shift the lowest 4 bits up by 2, overlapping.
/// let end = move_bits(&mut words, at(0), at(4), at(2));
///
/// assert_eq!(at(6), end);
/// assert_eq!([0b0011_1111, 0], words);
/// ```
#[track_caller]
pub fn move_bits<W>(words: &mut [W], start: BitCursor<W>, end: BitCursor<W>, dest: BitCursor<W>) -> BitCursor<W>
where
    W: BitWord,
{
    assert!(start <= end, "{start:?} > {end:?}");

    let count = end - start;

    if dest <= start {
        let (mut source, mut target) = (start, dest);

        while source != end {
            let bit = source.read(words);
            target.write(words, bit);

            source.increment();
            target.increment();
        }

        target
    } else {
        let dest_end = dest + count;

        let (mut source, mut target) = (end, dest_end);

        while source != start {
            source.decrement();
            target.decrement();

            let bit = source.read(words);
            target.write(words, bit);
        }

        dest_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Cursor = BitCursor<u8>;

    #[test]
    fn empty_range() {
        let mut words = [0b1010_1010u8; 2];

        let end = move_bits(&mut words, Cursor::from_index(3), Cursor::from_index(3), Cursor::from_index(9));

        assert_eq!(Cursor::from_index(9), end);
        assert_eq!([0b1010_1010; 2], words);
    }

    #[test]
    fn down_overlapping() {
        //  Bits, lowest first: 0011 0101 | 1100 0000
        let mut words = [0b1010_1100u8, 0b0000_0011];

        move_bits(&mut words, Cursor::from_index(2), Cursor::from_index(10), Cursor::from_index(0));

        //  Bits, lowest first: 1101 0111 | 1100 0000
        assert_eq!([0b1110_1011, 0b0000_0011], words);
    }

    #[test]
    fn up_overlapping() {
        let mut words = [0b1111_0110u8, 0];

        let end = move_bits(&mut words, Cursor::from_index(1), Cursor::from_index(8), Cursor::from_index(4));

        assert_eq!(Cursor::from_index(11), end);

        //  Bits 1..8 (1101111, lowest first) now at 4..11, bits 0..4 untouched.
        assert_eq!([0b1011_0110, 0b0000_0111], words);
    }

    #[test]
    fn matches_model() {
        let mut rng = fastrand::Rng::with_seed(0x5eed_b175);

        for _ in 0..500 {
            let mut words: [u8; 4] = [rng.u8(..), rng.u8(..), rng.u8(..), rng.u8(..)];

            let mut model: Vec<bool> = (0..32).map(|i| Cursor::from_index(i).read(&words)).collect();

            let start = rng.usize(0..=32);
            let end = rng.usize(start..=32);
            let dest = rng.usize(0..=(32 - (end - start)));

            model.copy_within(start..end, dest);

            move_bits(
                &mut words,
                Cursor::from_index(start),
                Cursor::from_index(end),
                Cursor::from_index(dest),
            );

            let actual: Vec<bool> = (0..32).map(|i| Cursor::from_index(i).read(&words)).collect();

            assert_eq!(model, actual, "{start}..{end} -> {dest}");
        }
    }

    #[test]
    #[should_panic]
    fn inverted_range() {
        let mut words = [0u8; 2];

        move_bits(&mut words, Cursor::from_index(5), Cursor::from_index(3), Cursor::from_index(0));
    }
} // mod tests
