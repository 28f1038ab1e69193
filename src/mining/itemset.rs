use smallvec::SmallVec;

use crate::term::{TermId, TermIdx};
use crate::{count_to_f64, MiningResult, Ontology};

type Items = SmallVec<[TermIdx; 4]>;

/// A set of terms that occur together in the transactions
///
/// The items are sorted by their [`TermIdx`] and each term occurs only once.
/// The itemset carries the number of transactions that contain all of its
/// terms (support) and its weighted support.
#[derive(Debug, Clone, PartialEq)]
pub struct Itemset {
    items: Items,
    support: usize,
    weighted_support: f64,
}

impl Itemset {
    pub(crate) fn new(items: Items, support: usize, weighted_support: f64) -> Self {
        debug_assert!(items.windows(2).all(|w| w[0] < w[1]));
        Self {
            items,
            support,
            weighted_support,
        }
    }

    /// Returns the sorted terms of the itemset
    pub fn items(&self) -> &[TermIdx] {
        &self.items
    }

    /// Returns the number of terms in the itemset
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the itemset has no terms
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if the term is part of the itemset
    pub fn contains(&self, term: TermIdx) -> bool {
        self.items.binary_search(&term).is_ok()
    }

    /// The number of transactions that contain all terms of the itemset
    pub fn support(&self) -> usize {
        self.support
    }

    /// The support weighted by the specificity of all terms
    pub fn weighted_support(&self) -> f64 {
        self.weighted_support
    }

    /// Returns the support as fraction of all transactions
    ///
    /// # Errors
    ///
    /// [`crate::MiningError::TryFromIntError`] if a count does not fit into `u32`
    pub fn support_fraction(&self, n_transactions: usize) -> MiningResult<f64> {
        if n_transactions == 0 {
            return Ok(0.0);
        }
        Ok(count_to_f64(self.support)? / count_to_f64(n_transactions)?)
    }

    /// Returns the [`TermId`]s of all terms, sorted by accession
    ///
    /// Terms that are not part of the ontology are skipped
    pub fn term_ids<'a>(&self, ontology: &'a Ontology) -> Vec<&'a TermId> {
        let mut ids: Vec<&TermId> = self
            .items
            .iter()
            .filter_map(|idx| ontology.get(*idx))
            .map(|term| term.id())
            .collect();
        ids.sort_unstable();
        ids
    }
}

/// Calculates the weighted support of an itemset
///
/// The weight is the harmonic mean of the specificities of all items,
/// for a pair `{a, b}` that is `2·a·b / (a + b)`. The weight is `0` if the
/// denominator is `0` or if any specificity is `0`.
pub(crate) fn weighted_support(specificities: &[f64], support: usize) -> MiningResult<f64> {
    let weight = match specificities {
        [] => 0.0,
        [single] => *single,
        [a, b] => {
            let denominator = a + b;
            if denominator == 0.0 {
                0.0
            } else {
                2.0 * a * b / denominator
            }
        }
        many => {
            if many.iter().any(|s| *s <= 0.0) {
                0.0
            } else {
                let inverse_sum: f64 = many.iter().map(|s| s.recip()).sum();
                count_to_f64(many.len())? / inverse_sum
            }
        }
    };
    Ok(weight * count_to_f64(support)?)
}
