use std::collections::{BTreeSet, HashSet};

use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::mining::itemset::{weighted_support, Itemset};
use crate::mining::{MiningConfig, Transactions};
use crate::term::{Namespace, TermIdx};
use crate::utils::Combinations;
use crate::{count_to_f64, MiningError, MiningResult, Ontology};

/// All frequent itemsets, grouped by their size
///
/// Itemsets of each size are sorted by their items.
#[derive(Debug, Clone, Default)]
pub struct FrequentItemsets {
    levels: Vec<Vec<Itemset>>,
    n_transactions: usize,
}

impl FrequentItemsets {
    /// Returns the frequent itemsets of the size
    ///
    /// Returns an empty slice if no itemset of this size is frequent
    pub fn of_size(&self, size: usize) -> &[Itemset] {
        size.checked_sub(1)
            .and_then(|level| self.levels.get(level))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Returns the frequent pairs of terms
    pub fn pairs(&self) -> &[Itemset] {
        self.of_size(2)
    }

    /// Returns the size of the largest frequent itemsets
    pub fn max_size(&self) -> usize {
        self.levels
            .iter()
            .rposition(|level| !level.is_empty())
            .map_or(0, |level| level + 1)
    }

    /// Returns the number of frequent itemsets of all sizes
    pub fn len(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Returns `true` if no itemset is frequent
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of transactions the itemsets were mined from
    pub fn n_transactions(&self) -> usize {
        self.n_transactions
    }

    /// Returns an iterator of all frequent itemsets, smallest first
    pub fn iter(&self) -> impl Iterator<Item = &Itemset> + '_ {
        self.levels.iter().flatten()
    }
}

/// The absolute thresholds of one mining run
#[derive(Debug, Clone, Copy)]
struct Thresholds {
    support: usize,
    weighted_support: f64,
    information_content: f64,
}

impl Thresholds {
    /// Converts the fractions of the config into absolute values
    ///
    /// - support: `⌈fraction · n⌉`
    /// - weighted support: `fraction / ⌈fraction · n⌉`, `0` if the denominator is `0`
    /// - information content: `fraction · -log10(1 / distinct items)`
    fn new(config: &MiningConfig, n_transactions: usize, n_items: usize) -> MiningResult<Self> {
        let n = count_to_f64(n_transactions)?;

        let support = (config.min_support() * n).ceil() as usize;

        let denominator = (config.min_weighted_support() * n).ceil();
        let weighted_support = if denominator == 0.0 {
            0.0
        } else {
            config.min_weighted_support() / denominator
        };

        let information_content = if n_items == 0 {
            0.0
        } else {
            config.min_information_content() * -(1.0 / count_to_f64(n_items)?).log10()
        };

        Ok(Self {
            support,
            weighted_support,
            information_content,
        })
    }
}

/// Finds all frequent itemsets of the transactions
///
/// 1. A single term is frequent if it occurs in at least `⌈min_support · n⌉`
///    transactions and its information content is at least
///    `min_information_content · -log10(1 / distinct terms)`.
/// 2. Candidates of size `k` are joined from two frequent itemsets of size
///    `k - 1` that share `k - 2` terms. Pairs must contain at least one
///    phenotype term.
/// 3. From size 4 on, a candidate is dropped unless all of its subsets of
///    size `k - 2` were frequent.
/// 4. A candidate is frequent if its weighted support reaches
///    `min_weighted_support / ⌈min_weighted_support · n⌉`. Candidates
///    that no transaction contains are dropped before this check, so they
///    are never frequent, even with a threshold of `0`.
///
/// Mining stops at [`MiningConfig::max_itemset_size`] or when no itemset
/// of a size is frequent.
///
/// # Errors
///
/// - [`MiningError::EmptyInput`] if there are no transactions
/// - [`MiningError::TryFromIntError`] if a count does not fit into `u32`
pub fn apriori(
    ontology: &Ontology,
    transactions: &Transactions,
    config: &MiningConfig,
) -> MiningResult<FrequentItemsets> {
    if transactions.is_empty() {
        return Err(MiningError::EmptyInput(
            "cannot mine frequent itemsets without transactions".to_string(),
        ));
    }
    let thresholds = Thresholds::new(config, transactions.len(), transactions.item_count())?;
    debug!("Absolute thresholds: {thresholds:?}");

    let mut levels: Vec<Vec<Itemset>> = Vec::with_capacity(config.max_itemset_size());
    levels.push(frequent_single_terms(ontology, transactions, &thresholds)?);
    info!("Found {} frequent itemsets of size 1", levels[0].len());

    let mut size = 2;
    while size <= config.max_itemset_size() {
        let previous = &levels[size - 2];
        if previous.is_empty() {
            break;
        }
        let level = if size == 2 {
            frequent_pairs(ontology, transactions, previous, &thresholds)?
        } else {
            let subsets = if size > 3 {
                Some(levels[size - 3].as_slice())
            } else {
                None
            };
            frequent_itemsets(ontology, transactions, previous, subsets, size, &thresholds)?
        };
        info!("Found {} frequent itemsets of size {size}", level.len());
        levels.push(level);
        size += 1;
    }

    Ok(FrequentItemsets {
        levels,
        n_transactions: transactions.len(),
    })
}

fn specificity(ontology: &Ontology, term: TermIdx) -> f64 {
    ontology
        .get(term)
        .map_or(0.0, |term| term.information_content().specificity())
}

fn is_phenotype(ontology: &Ontology, term: TermIdx) -> bool {
    ontology
        .get(term)
        .is_some_and(|term| term.namespace() == Namespace::Phenotype)
}

fn frequent_single_terms(
    ontology: &Ontology,
    transactions: &Transactions,
    thresholds: &Thresholds,
) -> MiningResult<Vec<Itemset>> {
    let mut level = Vec::new();
    for term in transactions.distinct_items() {
        let support = transactions.item_support(term);
        if support < thresholds.support {
            continue;
        }
        let Some(internal) = ontology.get(term) else {
            continue;
        };
        if internal.information_content().ic() < thresholds.information_content {
            continue;
        }
        let weight = weighted_support(&[internal.information_content().specificity()], support)?;
        level.push(Itemset::new(SmallVec::from_slice(&[term]), support, weight));
    }
    Ok(level)
}

/// Joins all frequent single terms into pairs
///
/// The pairs are independent of each other, every row of the
/// join is processed in parallel.
fn frequent_pairs(
    ontology: &Ontology,
    transactions: &Transactions,
    singles: &[Itemset],
    thresholds: &Thresholds,
) -> MiningResult<Vec<Itemset>> {
    let terms: Vec<TermIdx> = singles.iter().map(|itemset| itemset.items()[0]).collect();
    let terms = terms.as_slice();

    let candidates: Vec<Option<Itemset>> = (0..terms.len())
        .into_par_iter()
        .flat_map_iter(move |row| {
            Combinations::row(terms, row)
                .filter(move |(a, b)| is_phenotype(ontology, **a) || is_phenotype(ontology, **b))
                .map(move |(a, b)| -> MiningResult<Option<Itemset>> {
                    let support = transactions.support(&[*a, *b]);
                    if support == 0 {
                        return Ok(None);
                    }
                    let weight = weighted_support(
                        &[specificity(ontology, *a), specificity(ontology, *b)],
                        support,
                    )?;
                    if weight < thresholds.weighted_support {
                        return Ok(None);
                    }
                    let mut items: SmallVec<[TermIdx; 4]> = SmallVec::from_slice(&[*a, *b]);
                    items.sort_unstable();
                    Ok(Some(Itemset::new(items, support, weight)))
                })
        })
        .collect::<MiningResult<Vec<Option<Itemset>>>>()?;

    let mut level: Vec<Itemset> = candidates.into_iter().flatten().collect();
    level.sort_unstable_by(|a, b| a.items().cmp(b.items()));
    Ok(level)
}

/// Joins frequent itemsets of size `size - 1` into itemsets of `size`
///
/// `subsets` are the frequent itemsets of size `size - 2`, if given, all
/// subsets of this size of a candidate must be frequent.
fn frequent_itemsets(
    ontology: &Ontology,
    transactions: &Transactions,
    previous: &[Itemset],
    subsets: Option<&[Itemset]>,
    size: usize,
    thresholds: &Thresholds,
) -> MiningResult<Vec<Itemset>> {
    let mut candidates: BTreeSet<SmallVec<[TermIdx; 4]>> = BTreeSet::new();
    for (a, b) in Combinations::new(previous) {
        let mut union: SmallVec<[TermIdx; 4]> = SmallVec::from_slice(a.items());
        for term in b.items() {
            if !a.contains(*term) {
                union.push(*term);
            }
        }
        if union.len() == size {
            union.sort_unstable();
            candidates.insert(union);
        }
    }

    if let Some(subsets) = subsets {
        let frequent: HashSet<&[TermIdx]> = subsets.iter().map(Itemset::items).collect();
        let before = candidates.len();
        candidates.retain(|candidate| {
            sub_combinations(candidate, size - 2)
                .iter()
                .all(|subset| frequent.contains(subset.as_slice()))
        });
        debug!(
            "Pruned {} of {before} candidates of size {size}",
            before - candidates.len()
        );
    }

    let mut level = Vec::new();
    for candidate in candidates {
        let support = transactions.support(&candidate);
        if support == 0 {
            continue;
        }
        let specificities: Vec<f64> = candidate
            .iter()
            .map(|term| specificity(ontology, *term))
            .collect();
        let weight = weighted_support(&specificities, support)?;
        if weight >= thresholds.weighted_support {
            level.push(Itemset::new(candidate, support, weight));
        }
    }
    Ok(level)
}

/// Returns all subsets of `items` with `k` elements, keeping the order
fn sub_combinations(items: &[TermIdx], k: usize) -> Vec<Vec<TermIdx>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    if items.len() < k {
        return Vec::new();
    }
    let mut result = Vec::new();
    for (idx, first) in items.iter().enumerate() {
        for mut rest in sub_combinations(&items[idx + 1..], k - 1) {
            rest.insert(0, *first);
            result.push(rest);
        }
    }
    result
}

#[cfg(test)]
mod test {
    use std::collections::{HashMap, HashSet};

    use super::*;
    use crate::mining::test_ontology;

    fn flat_ontology() -> Ontology {
        // three unconnected roots A, B and C
        let hierarchy: HashMap<String, HashSet<String>> = ["HP:A", "HP:B", "HP:C"]
            .iter()
            .map(|id| (id.to_string(), HashSet::new()))
            .collect();
        let mut annotations: HashMap<String, HashSet<String>> = HashMap::new();
        for (term, gene) in [
            ("HP:A", "g1"),
            ("HP:B", "g1"),
            ("HP:A", "g2"),
            ("HP:C", "g2"),
            ("HP:A", "g3"),
        ] {
            annotations
                .entry(term.to_string())
                .or_default()
                .insert(gene.to_string());
        }
        Ontology::from_maps(&[(Namespace::Phenotype, &hierarchy)], &[&annotations]).unwrap()
    }

    #[test]
    fn single_terms_by_support() {
        let ontology = flat_ontology();
        let transactions = Transactions::new(&ontology, &[Namespace::Phenotype]).unwrap();
        assert_eq!(transactions.len(), 3);

        let config = MiningConfig::default()
            .with_min_support(0.5)
            .with_min_information_content(0.0)
            .with_max_itemset_size(1);
        let itemsets = apriori(&ontology, &transactions, &config).unwrap();

        let singles = itemsets.of_size(1);
        assert_eq!(singles.len(), 1);
        assert_eq!(singles[0].items(), &[ontology.term("HP:A").unwrap().idx()]);
        assert_eq!(singles[0].support(), 3);
        assert!(itemsets.of_size(2).is_empty());
        assert_eq!(itemsets.max_size(), 1);
    }

    #[test]
    fn single_terms_by_information_content() {
        let ontology = flat_ontology();
        let transactions = Transactions::new(&ontology, &[Namespace::Phenotype]).unwrap();

        // threshold: 0.5 · log10(3) = 0.2386
        // IC(A) = 0, IC(B) = IC(C) = log10(3) = 0.477
        let config = MiningConfig::default()
            .with_min_support(0.0)
            .with_min_information_content(0.5)
            .with_max_itemset_size(1);
        let itemsets = apriori(&ontology, &transactions, &config).unwrap();
        let mut ids: Vec<&str> = itemsets
            .of_size(1)
            .iter()
            .map(|itemset| itemset.term_ids(&ontology)[0].as_str())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["HP:B", "HP:C"]);
    }

    #[test]
    fn thresholds() {
        let config = MiningConfig::default()
            .with_min_support(0.5)
            .with_min_weighted_support(0.01)
            .with_min_information_content(0.3);
        let thresholds = Thresholds::new(&config, 3, 1000).unwrap();
        assert_eq!(thresholds.support, 2);
        assert!((thresholds.weighted_support - 0.01).abs() < 1e-12);
        assert!((thresholds.information_content - 0.9).abs() < 1e-12);

        let config = config.with_min_weighted_support(0.01);
        let thresholds = Thresholds::new(&config, 250, 1).unwrap();
        // 0.01 / ⌈2.5⌉
        assert!((thresholds.weighted_support - 0.01 / 3.0).abs() < 1e-12);
        assert_eq!(thresholds.information_content, 0.0);

        let config = config.with_min_weighted_support(0.0);
        let thresholds = Thresholds::new(&config, 250, 0).unwrap();
        assert_eq!(thresholds.weighted_support, 0.0);
    }

    #[test]
    fn weighted_pairs() {
        let ontology = test_ontology();
        let transactions =
            Transactions::new(&ontology, &[Namespace::Phenotype, Namespace::BiologicalProcess])
                .unwrap();
        let config = MiningConfig::default()
            .with_min_support(0.5)
            .with_min_information_content(0.0)
            .with_min_weighted_support(0.01);
        let itemsets = apriori(&ontology, &transactions, &config).unwrap();

        // GO:4 is only annotated to a single gene
        assert_eq!(itemsets.of_size(1).len(), 7);

        // only HP:3 and GO:3 have a non-zero specificity
        let pairs = itemsets.pairs();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].term_ids(&ontology), vec!["GO:3", "HP:3"]);
        assert_eq!(pairs[0].support(), 2);

        let a = ontology.term("HP:3").unwrap().specificity();
        let b = ontology.term("GO:3").unwrap().specificity();
        let expected = 2.0 * a * b / (a + b) * 2.0;
        assert!((pairs[0].weighted_support() - expected).abs() < 1e-12);
    }

    #[test]
    fn pairs_require_a_phenotype_term() {
        let ontology = test_ontology();
        let transactions = Transactions::new(&ontology, &[Namespace::BiologicalProcess]).unwrap();
        let config = MiningConfig::default()
            .with_min_support(0.0)
            .with_min_information_content(0.0)
            .with_min_weighted_support(0.0);
        let itemsets = apriori(&ontology, &transactions, &config).unwrap();
        assert_eq!(itemsets.of_size(1).len(), 4);
        assert!(itemsets.pairs().is_empty());
    }

    #[test]
    fn larger_itemsets() {
        let ontology = test_ontology();
        let transactions =
            Transactions::new(&ontology, &[Namespace::Phenotype, Namespace::BiologicalProcess])
                .unwrap();
        let config = MiningConfig::default()
            .with_min_support(0.0)
            .with_min_information_content(0.0)
            .with_min_weighted_support(0.0)
            .with_max_itemset_size(4);
        let itemsets = apriori(&ontology, &transactions, &config).unwrap();

        for itemset in itemsets.iter() {
            assert_eq!(itemset.support(), transactions.support(itemset.items()));
            assert!(itemset.support() > 0);
        }
        for itemset in itemsets.of_size(3) {
            assert_eq!(itemset.len(), 3);
        }
        assert!(itemsets.max_size() <= 4);
        assert!(!itemsets.of_size(3).is_empty());
    }

    fn itemset(ontology: &Ontology, ids: &[&str]) -> Itemset {
        let mut items: SmallVec<[TermIdx; 4]> = ids
            .iter()
            .map(|id| ontology.term(id).unwrap().idx())
            .collect();
        items.sort_unstable();
        Itemset::new(items, 0, 0.0)
    }

    #[test]
    fn candidates_with_infrequent_subsets_are_pruned() {
        let ontology = test_ontology();
        let transactions =
            Transactions::new(&ontology, &[Namespace::Phenotype, Namespace::BiologicalProcess])
                .unwrap();
        let thresholds = Thresholds {
            support: 0,
            weighted_support: 0.0,
            information_content: 0.0,
        };
        let previous = [
            itemset(&ontology, &["HP:2", "HP:3", "GO:2"]),
            itemset(&ontology, &["HP:2", "HP:3", "GO:3"]),
        ];
        let candidate = itemset(&ontology, &["HP:2", "HP:3", "GO:2", "GO:3"]);
        assert_eq!(transactions.support(candidate.items()), 2);

        let all_pairs = [
            itemset(&ontology, &["HP:2", "HP:3"]),
            itemset(&ontology, &["HP:2", "GO:2"]),
            itemset(&ontology, &["HP:2", "GO:3"]),
            itemset(&ontology, &["HP:3", "GO:2"]),
            itemset(&ontology, &["HP:3", "GO:3"]),
            itemset(&ontology, &["GO:2", "GO:3"]),
        ];

        let level = frequent_itemsets(
            &ontology,
            &transactions,
            &previous,
            Some(&all_pairs[..]),
            4,
            &thresholds,
        )
        .unwrap();
        assert_eq!(level.len(), 1);
        assert_eq!(level[0].items(), candidate.items());
        assert_eq!(level[0].support(), 2);

        let level =
            frequent_itemsets(&ontology, &transactions, &previous, None, 4, &thresholds).unwrap();
        assert_eq!(level.len(), 1);

        // {GO:2, GO:3} is not frequent
        let level = frequent_itemsets(
            &ontology,
            &transactions,
            &previous,
            Some(&all_pairs[..5]),
            4,
            &thresholds,
        )
        .unwrap();
        assert!(level.is_empty());
    }

    #[test]
    fn size_four_requires_frequent_pairs() {
        let ontology = test_ontology();
        let transactions =
            Transactions::new(&ontology, &[Namespace::Phenotype, Namespace::BiologicalProcess])
                .unwrap();
        let config = MiningConfig::default()
            .with_min_support(0.0)
            .with_min_information_content(0.0)
            .with_min_weighted_support(0.0)
            .with_max_itemset_size(4);
        let itemsets = apriori(&ontology, &transactions, &config).unwrap();

        // pairs of two process terms are never frequent
        let go_pair = itemset(&ontology, &["GO:2", "GO:3"]);
        assert!(itemsets
            .pairs()
            .iter()
            .all(|pair| pair.items() != go_pair.items()));

        // both size 3 itemsets that join into {HP:2, HP:3, GO:2, GO:3} are frequent
        for ids in [["HP:2", "HP:3", "GO:2"], ["HP:2", "HP:3", "GO:3"]] {
            let expected = itemset(&ontology, &ids);
            assert!(itemsets
                .of_size(3)
                .iter()
                .any(|found| found.items() == expected.items()));
        }

        let candidate = itemset(&ontology, &["HP:2", "HP:3", "GO:2", "GO:3"]);
        assert_eq!(transactions.support(candidate.items()), 2);
        assert!(itemsets
            .of_size(4)
            .iter()
            .all(|found| found.items() != candidate.items()));

        // every size 4 itemset holds at most one process term
        assert!(!itemsets.of_size(4).is_empty());
        for found in itemsets.of_size(4) {
            let processes = found
                .items()
                .iter()
                .filter(|idx| !is_phenotype(&ontology, **idx))
                .count();
            assert!(processes <= 1);
        }
    }

    #[test]
    fn no_transactions() {
        let ontology = test_ontology();
        let transactions = Transactions::new(&ontology, &[Namespace::CellularComponent]).unwrap();
        let result = apriori(&ontology, &transactions, &MiningConfig::default());
        assert!(matches!(result, Err(MiningError::EmptyInput(_))));
    }

    #[test]
    fn subsets() {
        let items: Vec<TermIdx> = [1u32, 2, 3, 4].iter().map(|i| TermIdx::from(*i)).collect();
        let pairs = sub_combinations(&items, 2);
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], vec![TermIdx::from(1u32), TermIdx::from(2u32)]);
        assert_eq!(sub_combinations(&items, 4).len(), 1);
        assert!(sub_combinations(&items, 5).is_empty());
    }
}
