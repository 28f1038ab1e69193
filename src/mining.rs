//! Weighted Apriori mining of associations between terms
//!
//! Every gene is a transaction, its items are the terms it is annotated
//! to (see [`Transactions`]). The mining runs in two steps:
//!
//! 1. [`apriori`] finds all frequent itemsets. Single terms must be
//!     frequent and informative, larger itemsets are weighted by the
//!     specificity of their terms.
//! 2. [`generate_rules`] turns the frequent pairs into directed rules
//!     `left -> right` and keeps those with sufficient confidence and coverage
//!     whose terms belong to the configured [`Pool`]s.
//!
//! [`mine`] runs both steps with one [`MiningConfig`].
//!
//! # Examples
//!
//! ```
//! use std::collections::{HashMap, HashSet};
//! use ontomine::{Namespace, Ontology};
//! use ontomine::mining::{mine, MiningConfig, Pool};
//!
//! fn map(entries: &[(&str, &[&str])]) -> HashMap<String, HashSet<String>> {
//!     entries
//!         .iter()
//!         .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
//!         .collect()
//! }
//!
//! let hp = map(&[("HP:1", &[]), ("HP:2", &["HP:1"]), ("HP:3", &["HP:2"]), ("HP:4", &["HP:1"])]);
//! let bp = map(&[("GO:1", &[]), ("GO:2", &["GO:1"]), ("GO:3", &["GO:2"]), ("GO:4", &["GO:1"])]);
//! let hp_genes = map(&[("HP:3", &["g1", "g2"]), ("HP:4", &["g3", "g4"])]);
//! let bp_genes = map(&[("GO:3", &["g1", "g2", "g3"]), ("GO:4", &["g4"])]);
//!
//! let ontology = Ontology::from_maps(
//!     &[(Namespace::Phenotype, &hp), (Namespace::BiologicalProcess, &bp)],
//!     &[&hp_genes, &bp_genes],
//! ).unwrap();
//!
//! let config = MiningConfig::default()
//!     .with_min_support(0.5)
//!     .with_min_information_content(0.0)
//!     .with_min_coverage(0.02)
//!     .with_left_pool(Pool::BiologicalProcess);
//!
//! let run = mine(&ontology, &config).unwrap();
//! assert_eq!(run.transactions().len(), 4);
//! assert_eq!(run.itemsets().pairs().len(), 1);
//!
//! let rule = &run.rules()[0];
//! let (left, right) = rule.term_ids(&ontology).unwrap();
//! assert_eq!(left.as_str(), "GO:3");
//! assert_eq!(right.as_str(), "HP:3");
//! ```

use tracing::info;

use crate::{MiningResult, Ontology};

mod apriori;
mod config;
mod itemset;
mod rules;
mod transactions;

pub use apriori::{apriori, FrequentItemsets};
pub use config::{MiningConfig, Pool};
pub use itemset::Itemset;
pub use rules::{generate_rules, AssociationRule};
pub use transactions::Transactions;

/// The transactions, frequent itemsets and rules of one mining run
#[derive(Debug, Clone)]
pub struct MiningRun {
    transactions: Transactions,
    itemsets: FrequentItemsets,
    rules: Vec<AssociationRule>,
}

impl MiningRun {
    /// The transactions of the namespaces of both pools
    pub fn transactions(&self) -> &Transactions {
        &self.transactions
    }

    /// All frequent itemsets
    pub fn itemsets(&self) -> &FrequentItemsets {
        &self.itemsets
    }

    /// All association rules, sorted by descending confidence
    pub fn rules(&self) -> &[AssociationRule] {
        &self.rules
    }
}

/// Mines the association rules of the ontology
///
/// # Errors
///
/// - [`crate::MiningError::InvalidInput`] if the config is invalid
/// - [`crate::MiningError::EmptyInput`] if no gene is annotated to the namespaces of the pools
pub fn mine(ontology: &Ontology, config: &MiningConfig) -> MiningResult<MiningRun> {
    config.validate()?;
    let transactions = Transactions::new(ontology, &config.transaction_namespaces())?;
    let itemsets = apriori(ontology, &transactions, config)?;
    let rules = generate_rules(ontology, &transactions, itemsets.pairs(), config)?;
    info!(
        "Mined {} rules {} -> {} from {} frequent itemsets",
        rules.len(),
        config.left_pool(),
        config.right_pool(),
        itemsets.len()
    );
    Ok(MiningRun {
        transactions,
        itemsets,
        rules,
    })
}

/// Builds a small ontology with two namespaces
///
/// ```text
/// HP:1 <- HP:2 <- HP:3 {g1, g2}     GO:1 <- GO:2 <- GO:3 {g1, g2, g3}
/// HP:1 <- HP:4 {g3, g4}             GO:1 <- GO:4 {g4}
/// ```
#[cfg(test)]
pub(crate) fn test_ontology() -> Ontology {
    use std::collections::{HashMap, HashSet};

    use crate::Namespace;

    fn map(entries: &[(&str, &[&str])]) -> HashMap<String, HashSet<String>> {
        entries
            .iter()
            .map(|(key, values)| {
                (
                    key.to_string(),
                    values.iter().map(ToString::to_string).collect(),
                )
            })
            .collect()
    }

    let hp = map(&[
        ("HP:1", &[]),
        ("HP:2", &["HP:1"]),
        ("HP:3", &["HP:2"]),
        ("HP:4", &["HP:1"]),
    ]);
    let bp = map(&[
        ("GO:1", &[]),
        ("GO:2", &["GO:1"]),
        ("GO:3", &["GO:2"]),
        ("GO:4", &["GO:1"]),
    ]);
    let hp_genes = map(&[("HP:3", &["g1", "g2"]), ("HP:4", &["g3", "g4"])]);
    let bp_genes = map(&[("GO:3", &["g1", "g2", "g3"]), ("GO:4", &["g4"])]);

    Ontology::from_maps(
        &[
            (Namespace::Phenotype, &hp),
            (Namespace::BiologicalProcess, &bp),
        ],
        &[&hp_genes, &bp_genes],
    )
    .expect("the test ontology is valid")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::MiningError;

    #[test]
    fn mine_default_pools() {
        let ontology = test_ontology();
        let config = MiningConfig::default()
            .with_min_support(0.5)
            .with_min_information_content(0.0)
            .with_min_coverage(0.02);
        let run = mine(&ontology, &config).unwrap();
        assert_eq!(run.transactions().len(), 4);
        assert_eq!(run.itemsets().of_size(1).len(), 7);
        // GO:3 is not part of the right pool
        assert_eq!(run.rules().len(), 1);
    }

    #[test]
    fn invalid_config() {
        let ontology = test_ontology();
        let config = MiningConfig::default().with_min_support(2.0);
        assert!(matches!(
            mine(&ontology, &config),
            Err(MiningError::InvalidInput(_))
        ));
    }

    #[test]
    fn empty_pool() {
        let ontology = test_ontology();
        let config = MiningConfig::default()
            .with_left_pool(Pool::MolecularFunction)
            .with_right_pool(Pool::MolecularFunction);
        assert!(matches!(
            mine(&ontology, &config),
            Err(MiningError::EmptyInput(_))
        ));
    }
}
