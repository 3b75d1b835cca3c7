//  Serialization of `BitVector`, with the "serde" feature.
//
//  A bit vector is serialized as a struct `{ len, words }`, where `len` is the number of bits, as a `u64`, and `words`
//  holds exactly `⌈len / BITS⌉` words. The bits of the last word beyond `len` are always written as 0, and ignored on
//  reading.

use alloc::vec::Vec;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Unexpected},
    ser::SerializeStruct,
};

use crate::{
    collections::BitVector,
    utils::{BitWord, WordStore},
};

impl<S> Serialize for BitVector<S>
where
    S: WordStore,
    S::Word: Serialize,
{
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        let mut state = serializer.serialize_struct("BitVector", 2)?;
        state.serialize_field("len", &(self.len() as u64))?;
        state.serialize_field("words", &MaskedWords(self))?;
        state.end()
    }
}

impl<'de, S> Deserialize<'de> for BitVector<S>
where
    S: WordStore + Default,
    S::Word: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Repr { len, words } = Repr::<S::Word>::deserialize(deserializer)?;

        let bits = usize::try_from(len)
            .map_err(|_| de::Error::invalid_value(Unexpected::Unsigned(len), &"a length fitting in usize"))?;

        if words.len() != S::Word::words_for(bits) {
            return Err(de::Error::invalid_length(words.len(), &"as many words as needed to hold len bits"));
        }

        let mut store = S::default();
        store.reserve(words.len());

        for word in words {
            store.push(word);
        }

        Ok(Self::from_words(store, bits))
    }
}

#[derive(Deserialize)]
#[serde(rename = "BitVector")]
struct Repr<W> {
    len: u64,
    words: Vec<W>,
}

struct MaskedWords<'a, S>(&'a BitVector<S>)
where
    S: WordStore;

impl<S> Serialize for MaskedWords<'_, S>
where
    S: WordStore,
    S::Word: Serialize,
{
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        serializer.collect_seq(self.0.masked_words())
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::DynamicWordStore;

    use super::*;

    type Bits8 = BitVector<DynamicWordStore<u8>>;

    fn sample() -> Bits8 {
        let mut bits: Bits8 = "11100000111".chars().map(|c| c == '1').collect();

        //  Leave a set bit beyond the length.
        bits.push_back(true);
        bits.pop_back().expect("not empty");

        bits
    }

    #[test]
    fn serialize_masks_tail() {
        let json = serde_json::to_string(&sample()).expect("serializable");

        assert_eq!(r#"{"len":11,"words":[7,7]}"#, json);
    }

    #[test]
    fn serialize_empty() {
        let json = serde_json::to_string(&Bits8::default()).expect("serializable");

        assert_eq!(r#"{"len":0,"words":[]}"#, json);
    }

    #[test]
    fn deserialize_masks_tail() {
        let bits: Bits8 = serde_json::from_str(r#"{"len":11,"words":[7,255]}"#).expect("deserializable");

        assert_eq!(sample(), bits);
        assert_eq!(&[7, 7][..], bits.data());
    }

    #[test]
    fn deserialize_vec_store() {
        let bits: BitVector<Vec<u16>> = serde_json::from_str(r#"{"len":3,"words":[5]}"#).expect("deserializable");

        assert_eq!(vec![true, false, true], bits.iter().collect::<Vec<_>>());
    }

    #[test]
    fn deserialize_rejects_word_count() {
        for json in [r#"{"len":11,"words":[7]}"#, r#"{"len":11,"words":[7,7,7]}"#, r#"{"len":0,"words":[0]}"#] {
            let result = serde_json::from_str::<Bits8>(json);

            assert!(result.is_err(), "{json}");
        }
    }
} // mod tests
