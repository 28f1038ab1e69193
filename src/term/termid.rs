use core::fmt::Debug;
use std::borrow::Borrow;
use std::fmt::Display;

use crate::{MiningError, MiningResult};

/// The accession of a term, e.g. `HP:0000118` or `GO:0008150`
///
/// The accession must consist of a prefix and a local identifier,
/// separated by a colon. Leading and trailing whitespace is removed.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TermId {
    inner: Box<str>,
}

impl TermId {
    /// Returns the accession as `&str`
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the prefix of the accession, e.g. `HP` for `HP:0000118`
    pub fn prefix(&self) -> &str {
        self.inner
            .split_once(':')
            .map_or(&self.inner, |(prefix, _)| prefix)
    }
}

impl TryFrom<&str> for TermId {
    type Error = MiningError;
    fn try_from(s: &str) -> MiningResult<Self> {
        let s = s.trim();
        match s.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => Ok(TermId {
                inner: s.into(),
            }),
            _ => Err(MiningError::InvalidInput(format!("invalid term id: {s}"))),
        }
    }
}

impl Debug for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermId({self})")
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl PartialEq<str> for TermId {
    fn eq(&self, other: &str) -> bool {
        &*self.inner == other
    }
}

impl PartialEq<&str> for TermId {
    fn eq(&self, other: &&str) -> bool {
        &*self.inner == *other
    }
}

impl Borrow<str> for TermId {
    fn borrow(&self) -> &str {
        &self.inner
    }
}

impl AsRef<str> for TermId {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

/// The interned index of a term inside the [`crate::Ontology`]
///
/// `TermIdx` values are handed out by the ontology when terms are inserted
/// and are only meaningful within that ontology.
#[derive(Copy, Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TermIdx {
    inner: u32,
}

impl TermIdx {
    /// Returns the position of the term inside the arena
    pub fn as_usize(&self) -> usize {
        self.inner as usize
    }

    /// Returns the integer representation of the index
    pub fn as_u32(&self) -> u32 {
        self.inner
    }
}

impl From<u32> for TermIdx {
    fn from(inner: u32) -> Self {
        Self { inner }
    }
}

impl TryFrom<usize> for TermIdx {
    type Error = MiningError;
    fn try_from(n: usize) -> MiningResult<Self> {
        Ok(Self {
            inner: n.try_into()?,
        })
    }
}

impl Debug for TermIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermIdx({})", self.inner)
    }
}

impl Display for TermIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.inner)
    }
}
