use std::collections::HashMap;

use crate::term::internal::TermInternal;
use crate::term::{Namespace, TermId, TermIdx};
use crate::{MiningResult, DEFAULT_ARENA_CAPACITY};

/// Stores all terms of all namespaces
///
/// Terms are addressed by their position in the arena ([`TermIdx`]).
/// The accession ([`TermId`]) is interned once when the term is inserted.
#[derive(Debug, Clone)]
pub(crate) struct Arena {
    terms: Vec<TermInternal>,
    ids: HashMap<TermId, TermIdx>,
}

impl Arena {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Inserts a new term and returns its index
    ///
    /// If the term is already present, the existing index is returned
    /// and the namespace is not changed
    pub fn insert(&mut self, id: TermId, namespace: Namespace) -> MiningResult<TermIdx> {
        if let Some(idx) = self.ids.get(&id) {
            return Ok(*idx);
        }
        let idx = TermIdx::try_from(self.terms.len())?;
        self.ids.insert(id.clone(), idx);
        self.terms.push(TermInternal::new(idx, id, namespace));
        Ok(idx)
    }

    pub fn index_of(&self, id: &str) -> Option<TermIdx> {
        self.ids.get(id.trim()).copied()
    }

    pub fn get(&self, idx: TermIdx) -> Option<&TermInternal> {
        self.terms.get(idx.as_usize())
    }

    pub fn get_unchecked(&self, idx: TermIdx) -> &TermInternal {
        &self.terms[idx.as_usize()]
    }

    pub fn get_unchecked_mut(&mut self, idx: TermIdx) -> &mut TermInternal {
        &mut self.terms[idx.as_usize()]
    }

    pub fn values(&self) -> std::slice::Iter<'_, TermInternal> {
        self.terms.iter()
    }

    /// Returns the indices of all terms of the namespace
    pub fn keys_of(&self, namespace: Namespace) -> Vec<TermIdx> {
        self.terms
            .iter()
            .filter(|term| term.namespace() == namespace)
            .map(TermInternal::idx)
            .collect()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            terms: Vec::with_capacity(DEFAULT_ARENA_CAPACITY),
            ids: HashMap::with_capacity(DEFAULT_ARENA_CAPACITY),
        }
    }
}
