use tracing::{debug, trace};

use crate::mining::{Itemset, MiningConfig, Transactions};
use crate::term::{TermId, TermIdx};
use crate::{count_to_f64, MiningError, MiningResult, Ontology};

/// A directed association `left -> right` between two terms
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationRule {
    left: TermIdx,
    right: TermIdx,
    support: usize,
    confidence: f64,
    coverage: f64,
}

impl AssociationRule {
    /// The antecedent term
    pub fn left(&self) -> TermIdx {
        self.left
    }

    /// The consequent term
    pub fn right(&self) -> TermIdx {
        self.right
    }

    /// The number of transactions containing both terms
    pub fn support(&self) -> usize {
        self.support
    }

    /// Fraction of transactions containing both terms, weighted by the
    /// specificity of the right term
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Fraction of transactions containing the left term, weighted by the
    /// specificity of the left term
    pub fn coverage(&self) -> f64 {
        self.coverage
    }

    /// Returns the [`TermId`]s of the left and right term
    pub fn term_ids<'a>(&self, ontology: &'a Ontology) -> Option<(&'a TermId, &'a TermId)> {
        Some((ontology.get(self.left)?.id(), ontology.get(self.right)?.id()))
    }
}

/// Creates all association rules from the frequent pairs of terms
///
/// Both directions of every pair are candidates. A rule `left -> right`
/// is kept if
///
/// - `left` is part of the left pool and `right` is part of the right pool
/// - `confidence = support(left, right) / n · specificity(right)` reaches
///   [`MiningConfig::min_confidence`]
/// - `coverage = support(left) / n · specificity(left)` reaches
///   [`MiningConfig::min_coverage`]
///
/// The rules are sorted by descending confidence.
///
/// # Errors
///
/// - [`MiningError::EmptyInput`] if there are no transactions
/// - [`MiningError::TryFromIntError`] if a count does not fit into `u32`
pub fn generate_rules(
    ontology: &Ontology,
    transactions: &Transactions,
    pairs: &[Itemset],
    config: &MiningConfig,
) -> MiningResult<Vec<AssociationRule>> {
    if transactions.is_empty() {
        return Err(MiningError::EmptyInput(
            "cannot create association rules without transactions".to_string(),
        ));
    }
    let n = count_to_f64(transactions.len())?;
    let (left_pool, right_pool) = (config.left_pool(), config.right_pool());

    let mut rules = Vec::new();
    let mut candidates = 0usize;
    for pair in pairs.iter().filter(|itemset| itemset.len() == 2) {
        let (a, b) = (pair.items()[0], pair.items()[1]);
        for (left, right) in [(a, b), (b, a)] {
            let (Some(left_term), Some(right_term)) = (ontology.get(left), ontology.get(right))
            else {
                continue;
            };
            if !left_pool.contains(left_term.namespace())
                || !right_pool.contains(right_term.namespace())
            {
                continue;
            }
            candidates += 1;

            let confidence = count_to_f64(pair.support())? / n
                * right_term.information_content().specificity();
            let coverage = count_to_f64(transactions.item_support(left))? / n
                * left_term.information_content().specificity();

            trace!(
                "{} -> {}: confidence {confidence}, coverage {coverage}",
                left_term.id(),
                right_term.id()
            );
            if confidence >= config.min_confidence() && coverage >= config.min_coverage() {
                rules.push(AssociationRule {
                    left,
                    right,
                    support: pair.support(),
                    confidence,
                    coverage,
                });
            }
        }
    }
    debug!(
        "Kept {} of {candidates} candidate rules {left_pool} -> {right_pool}",
        rules.len()
    );

    rules.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| a.left.cmp(&b.left))
            .then_with(|| a.right.cmp(&b.right))
    });
    Ok(rules)
}
