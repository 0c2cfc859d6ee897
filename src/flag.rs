//! Named error categories
//!
//! A [`Flag`] pairs a [`Bitset`] with a display name. Leaf flags carry one bit
//! and come from a [`Counter`]; composite flags are unions (or unions minus
//! exclusions) of other flags. The name is cosmetic: equality, hashing and
//! [`intersect`] only look at the bits.
//!
//! ```
//! use errflags::{intersect, Counter, Flag};
//!
//! let mut counter = Counter::new();
//! let bad_input = counter.allocate("BadInput");
//! let not_authorized = counter.allocate("NotAuthorized");
//! let internal = counter.allocate("InternalError");
//! let user_error = Flag::join("UserError", [&bad_input, &not_authorized]);
//!
//! assert!(intersect(&bad_input, &user_error));
//! assert!(!intersect(&internal, &user_error));
//! ```

use crate::bitset::Bitset;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A named bit pattern identifying one or more error categories.
#[derive(Clone, Default)]
pub struct Flag {
    bits: Bitset,
    name: String,
}

impl Flag {
    /// Leaf flag with only `position` set.
    pub fn leaf(name: impl Into<String>, position: usize) -> Self {
        Self {
            bits: Bitset::single(position),
            name: name.into(),
        }
    }

    /// Wildcard that intersects every leaf allocated below `length`.
    pub fn full(name: impl Into<String>, length: usize) -> Self {
        Self {
            bits: Bitset::full(length),
            name: name.into(),
        }
    }

    pub fn from_bits(name: impl Into<String>, bits: Bitset) -> Self {
        Self {
            bits,
            name: name.into(),
        }
    }

    /// Union of `flags` under an explicit name. The name is not derived from
    /// the parts; see [`Flag::concat`] for that.
    pub fn join<'a, I>(name: impl Into<String>, flags: I) -> Self
    where
        I: IntoIterator<Item = &'a Flag>,
    {
        let bits = flags
            .into_iter()
            .fold(Bitset::new(), |acc, flag| acc.union(&flag.bits));
        Self {
            bits,
            name: name.into(),
        }
    }

    /// Union of `flags` named `A|B|C` after its parts.
    pub fn concat<'a, I>(flags: I) -> Self
    where
        I: IntoIterator<Item = &'a Flag>,
    {
        let mut names = Vec::new();
        let mut bits = Bitset::new();
        for flag in flags {
            names.push(flag.name.as_str());
            bits = bits.union(&flag.bits);
        }
        Self {
            name: names.join("|"),
            bits,
        }
    }

    /// Copy of `self` with every bit of `exclusions` cleared. Keeps the name.
    pub fn exclude<'a, I>(&self, exclusions: I) -> Self
    where
        I: IntoIterator<Item = &'a Flag>,
    {
        Self {
            bits: self.bits.subtract(exclusions.into_iter().map(|f| &f.bits)),
            name: self.name.clone(),
        }
    }

    /// Same bits under another name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            bits: self.bits.clone(),
            name: name.into(),
        }
    }

    /// True when the flags share at least one category bit.
    pub fn intersects(&self, other: &Flag) -> bool {
        self.bits.intersects(&other.bits)
    }

    pub fn bits(&self) -> &Bitset {
        &self.bits
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_zero()
    }
}

/// Category membership test. A flag may carry several bits, so this is the
/// "is-a" predicate, not equality.
pub fn intersect(a: &Flag, b: &Flag) -> bool {
    a.intersects(b)
}

impl PartialEq for Flag {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl Eq for Flag {}

impl Hash for Flag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("bits", &self.bits)
            .finish()
    }
}

/// Sequential bit allocator. Flags allocated from one counter never share a
/// position. Not synchronized: wrap it in a mutex to share it.
#[derive(Debug, Clone, Default)]
pub struct Counter {
    next: usize,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter whose first allocation lands on `position`.
    pub fn starting_at(position: usize) -> Self {
        Self { next: position }
    }

    /// Leaf flag at the next free position.
    pub fn allocate(&mut self, name: impl Into<String>) -> Flag {
        let position = self.next;
        self.next += 1;
        Flag::leaf(name, position)
    }

    /// Position the next allocation will use. Also the wildcard length that
    /// covers everything allocated so far.
    pub fn next_position(&self) -> usize {
        self.next
    }

    /// Wildcard matching every flag this counter has handed out.
    pub fn allocated(&self, name: impl Into<String>) -> Flag {
        Flag::full(name, self.next)
    }
}
