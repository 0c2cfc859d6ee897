//! Arbitrary-width bit vectors
//!
//! A [`Bitset`] is an immutable set of bit positions stored as a growable
//! array of `u64` words. Every operation returns a new value; operands are
//! never mutated. The word vector is kept normalized (no trailing zero words)
//! so equality and hashing compare set membership exactly.

use std::fmt;
use std::ops::{BitOr, Sub};

const WORD_BITS: usize = u64::BITS as usize;

/// Immutable, unbounded set of bit positions.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Bitset {
    /// Little-endian words: bit `i` lives in `words[i / 64]` at `i % 64`.
    /// Invariant: the last word, if any, is non-zero.
    words: Vec<u64>,
}

impl Bitset {
    /// The empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set containing exactly `position`.
    pub fn single(position: usize) -> Self {
        Self::new().with_bit(position)
    }

    /// The first `length` bits set. Intersects every single-bit set below
    /// position `length`.
    pub fn full(length: usize) -> Self {
        let whole = length / WORD_BITS;
        let rest = length % WORD_BITS;

        let mut words = vec![u64::MAX; whole];
        if rest > 0 {
            words.push((1u64 << rest) - 1);
        }
        Self { words }
    }

    fn from_words(mut words: Vec<u64>) -> Self {
        while words.last() == Some(&0) {
            words.pop();
        }
        Self { words }
    }

    /// Copy of `self` with `position` set.
    pub fn with_bit(&self, position: usize) -> Self {
        let word = position / WORD_BITS;
        let mut words = self.words.clone();
        if words.len() <= word {
            words.resize(word + 1, 0);
        }
        words[word] |= 1u64 << (position % WORD_BITS);
        Self { words }
    }

    /// Bitwise OR. The result is as wide as the wider operand.
    pub fn union(&self, other: &Bitset) -> Bitset {
        let (long, short) = if self.words.len() >= other.words.len() {
            (self, other)
        } else {
            (other, self)
        };

        let mut words = long.words.clone();
        for (w, s) in words.iter_mut().zip(&short.words) {
            *w |= s;
        }
        Self { words }
    }

    /// `self AND NOT (union of exclusions)`.
    pub fn subtract<'a, I>(&self, exclusions: I) -> Bitset
    where
        I: IntoIterator<Item = &'a Bitset>,
    {
        let mut words = self.words.clone();
        for exclusion in exclusions {
            for (w, e) in words.iter_mut().zip(&exclusion.words) {
                *w &= !e;
            }
        }
        Self::from_words(words)
    }

    /// True when the two sets share at least one position.
    pub fn intersects(&self, other: &Bitset) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .any(|(a, b)| a & b != 0)
    }

    pub fn is_zero(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, position: usize) -> bool {
        self.words
            .get(position / WORD_BITS)
            .is_some_and(|w| w & (1u64 << (position % WORD_BITS)) != 0)
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// One past the highest set position, or 0 for the empty set.
    pub fn bit_len(&self) -> usize {
        match self.words.last() {
            Some(last) => {
                (self.words.len() - 1) * WORD_BITS + (WORD_BITS - last.leading_zeros() as usize)
            }
            None => 0,
        }
    }

    /// Set positions in ascending order.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(idx, &word)| {
            let mut w = word;
            std::iter::from_fn(move || {
                if w == 0 {
                    return None;
                }
                let bit = w.trailing_zeros() as usize;
                w &= w - 1;
                Some(idx * WORD_BITS + bit)
            })
        })
    }
}

impl BitOr for &Bitset {
    type Output = Bitset;

    fn bitor(self, rhs: &Bitset) -> Bitset {
        self.union(rhs)
    }
}

impl Sub for &Bitset {
    type Output = Bitset;

    fn sub(self, rhs: &Bitset) -> Bitset {
        self.subtract([rhs])
    }
}

impl fmt::Debug for Bitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.ones()).finish()
    }
}

/// Binary rendering, most significant bit first. The empty set renders as `0`.
impl fmt::Binary for Bitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.bit_len();
        if len == 0 {
            return f.write_str("0");
        }
        for pos in (0..len).rev() {
            f.write_str(if self.contains(pos) { "1" } else { "0" })?;
        }
        Ok(())
    }
}
