use std::collections::BTreeMap;

use tracing::debug;

use crate::annotations::GeneId;
use crate::term::{Namespace, TermGroup, TermIdx};
use crate::{MiningResult, Ontology};

/// The transactions of the association mining
///
/// Every gene is one transaction. The items of the transaction are all
/// terms of the selected namespaces that the gene is annotated to, either
/// directly or through one of their descendants. Genes without any such
/// term are not part of the transactions.
///
/// For every item, the sorted list of transactions that contain it
/// is cached, so that the support of any itemset is the size of the
/// intersection of the lists of its items.
#[derive(Debug, Clone, Default)]
pub struct Transactions {
    genes: Vec<GeneId>,
    items: Vec<TermGroup>,
    tidlists: BTreeMap<TermIdx, Vec<u32>>,
}

impl Transactions {
    /// Merges the propagated annotations of the namespaces into transactions
    ///
    /// # Errors
    ///
    /// [`crate::MiningError::TryFromIntError`] if there are more than `u32::MAX` transactions
    pub fn new(ontology: &Ontology, namespaces: &[Namespace]) -> MiningResult<Self> {
        let mut gene_terms: BTreeMap<GeneId, Vec<TermIdx>> = BTreeMap::new();
        for term in ontology.term_values() {
            if !namespaces.contains(&term.namespace()) {
                continue;
            }
            for gene in term.genes() {
                gene_terms.entry(*gene).or_default().push(term.idx());
            }
        }

        let mut transactions = Transactions {
            genes: Vec::with_capacity(gene_terms.len()),
            items: Vec::with_capacity(gene_terms.len()),
            tidlists: BTreeMap::new(),
        };
        for (tid, (gene, terms)) in gene_terms.into_iter().enumerate() {
            let tid = u32::try_from(tid)?;
            let items: TermGroup = terms.into_iter().collect();
            for term in &items {
                transactions.tidlists.entry(term).or_default().push(tid);
            }
            transactions.genes.push(gene);
            transactions.items.push(items);
        }

        debug!(
            "Merged {:?} into {} transactions with {} distinct terms",
            namespaces,
            transactions.len(),
            transactions.item_count()
        );
        Ok(transactions)
    }

    /// Returns the number of transactions
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Returns `true` if there are no transactions
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Returns the number of distinct terms across all transactions
    pub fn item_count(&self) -> usize {
        self.tidlists.len()
    }

    /// Returns the genes in the order of the transactions
    pub fn genes(&self) -> &[GeneId] {
        &self.genes
    }

    /// Returns the terms of the gene's transaction
    pub fn items_of(&self, gene: &GeneId) -> Option<&TermGroup> {
        self.genes
            .binary_search(gene)
            .ok()
            .and_then(|tid| self.items.get(tid))
    }

    /// Returns an iterator of every gene and its terms
    pub fn iter(&self) -> impl Iterator<Item = (GeneId, &TermGroup)> + '_ {
        self.genes.iter().copied().zip(self.items.iter())
    }

    /// Returns an iterator of every distinct term, in order of their [`TermIdx`]
    pub fn distinct_items(&self) -> impl Iterator<Item = TermIdx> + '_ {
        self.tidlists.keys().copied()
    }

    /// Returns the number of transactions that contain the term
    pub fn item_support(&self, term: TermIdx) -> usize {
        self.tidlists.get(&term).map_or(0, Vec::len)
    }

    /// Returns the number of transactions that contain all terms
    ///
    /// The support of an empty itemset is the number of transactions
    pub fn support(&self, terms: &[TermIdx]) -> usize {
        let mut lists: Vec<&Vec<u32>> = Vec::with_capacity(terms.len());
        for term in terms {
            match self.tidlists.get(term) {
                Some(list) => lists.push(list),
                None => return 0,
            }
        }
        lists.sort_unstable_by_key(|list| list.len());

        let Some((first, rest)) = lists.split_first() else {
            return self.len();
        };
        if rest.is_empty() {
            return first.len();
        }
        first
            .iter()
            .filter(|tid| rest.iter().all(|list| list.binary_search(*tid).is_ok()))
            .count()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mining::test_ontology;

    #[test]
    fn merge_namespaces() {
        let ontology = test_ontology();
        let transactions =
            Transactions::new(&ontology, &[Namespace::Phenotype, Namespace::BiologicalProcess])
                .unwrap();
        assert_eq!(transactions.len(), 4);
        assert_eq!(transactions.item_count(), 8);

        let g1 = ontology.gene_by_symbol("g1").unwrap().id();
        assert_eq!(transactions.items_of(g1).unwrap().len(), 6);
        let g4 = ontology.gene_by_symbol("g4").unwrap().id();
        assert_eq!(transactions.items_of(g4).unwrap().len(), 4);
    }

    #[test]
    fn merge_single_namespace() {
        let ontology = test_ontology();
        let transactions = Transactions::new(&ontology, &[Namespace::Phenotype]).unwrap();
        assert_eq!(transactions.len(), 4);
        assert_eq!(transactions.item_count(), 4);
        for (_, items) in transactions.iter() {
            for term in items {
                assert_eq!(
                    ontology.term_by_idx(term).unwrap().namespace(),
                    Namespace::Phenotype
                );
            }
        }

        let transactions = Transactions::new(&ontology, &[Namespace::CellularComponent]).unwrap();
        assert!(transactions.is_empty());
        assert_eq!(transactions.item_count(), 0);
    }

    #[test]
    fn support_counts() {
        let ontology = test_ontology();
        let transactions =
            Transactions::new(&ontology, &[Namespace::Phenotype, Namespace::BiologicalProcess])
                .unwrap();
        let idx = |id: &str| ontology.term(id).unwrap().idx();

        assert_eq!(transactions.support(&[]), 4);
        assert_eq!(transactions.support(&[idx("HP:1")]), 4);
        assert_eq!(transactions.item_support(idx("GO:2")), 3);
        assert_eq!(transactions.support(&[idx("HP:3"), idx("GO:3")]), 2);
        assert_eq!(transactions.support(&[idx("HP:4"), idx("GO:3")]), 1);
        assert_eq!(transactions.support(&[idx("HP:3"), idx("GO:4")]), 0);
        assert_eq!(
            transactions.support(&[idx("HP:1"), idx("GO:1"), idx("GO:2")]),
            3
        );
    }
}
