use core::fmt::Debug;
use std::cmp::PartialEq;
use std::collections::{BTreeSet, HashSet};
use std::fmt::Display;
use std::hash::Hash;

use crate::term::TermGroup;
use crate::{MiningError, MiningResult, Ontology, TermIdx};

/// A set of genes
///
/// The set does not contain [`Gene`]s itself, but only their [`GeneId`]s.
/// Currently implemented using [`HashSet`] but any other implementation
/// should work as well given that each [`GeneId`] must appear only once
/// and it provides an iterator of [`GeneId`]
pub type Genes = HashSet<GeneId>;

/// A unique identifier for a [`Gene`]
///
/// The identifier is interned by the [`Ontology`] from the gene symbol, so the
/// same symbol from the phenotype annotations and from the GO annotations
/// refers to the same gene.
#[derive(Clone, Copy, Default, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct GeneId {
    inner: u32,
}

impl GeneId {
    /// Return the integer representation of the gene ID
    pub fn as_u32(&self) -> u32 {
        self.inner
    }

    /// Returns the position of the gene inside the gene table
    pub fn as_usize(&self) -> usize {
        self.inner as usize
    }
}

impl From<u32> for GeneId {
    fn from(inner: u32) -> Self {
        GeneId { inner }
    }
}

impl TryFrom<usize> for GeneId {
    type Error = MiningError;
    fn try_from(value: usize) -> MiningResult<Self> {
        Ok(GeneId {
            inner: value.try_into()?,
        })
    }
}

impl Display for GeneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GeneId:{}", self.inner)
    }
}

/// A single gene
///
/// A gene has a unique [`GeneId`] and a symbol, a set of synonyms and is
/// directly connected to a set of terms
#[derive(Default, Debug, Clone)]
pub struct Gene {
    id: GeneId,
    symbol: String,
    synonyms: BTreeSet<String>,
    terms: TermGroup,
}

impl Gene {
    /// Initializes a new Gene
    ///
    /// This method should rarely, if ever, be used directly. The
    /// preferred way to create new genes is through [`crate::Builder::add_gene`]
    /// to ensure that each gene exists only once.
    pub fn new(id: GeneId, symbol: &str) -> Gene {
        Gene {
            id,
            symbol: symbol.to_string(),
            synonyms: BTreeSet::new(),
            terms: TermGroup::default(),
        }
    }

    /// The unique [`GeneId`] of the gene
    pub fn id(&self) -> &GeneId {
        &self.id
    }

    /// The gene symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Alternative names of the gene, e.g. from the GAF synonym column
    pub fn synonyms(&self) -> &BTreeSet<String> {
        &self.synonyms
    }

    /// Adds a synonym to the gene
    ///
    /// The gene symbol itself and empty strings are not added.
    /// Returns whether the synonym was newly inserted
    pub fn add_synonym(&mut self, synonym: &str) -> bool {
        let synonym = synonym.trim();
        if synonym.is_empty() || synonym == self.symbol {
            return false;
        }
        self.synonyms.insert(synonym.to_string())
    }

    /// The set of directly annotated terms
    ///
    /// This does not include the ancestors of the terms
    pub fn terms(&self) -> &TermGroup {
        &self.terms
    }

    /// Connect another term to the gene
    ///
    /// # Note
    ///
    /// This method does **not** add the [`Gene`] to the term.
    /// Clients should not use this method, unless they are creating their own Ontology.
    pub fn add_term<I: Into<TermIdx>>(&mut self, term: I) -> bool {
        self.terms.insert(term)
    }
}

impl PartialEq for Gene {
    fn eq(&self, other: &Gene) -> bool {
        self.id == other.id
    }
}
impl Eq for Gene {}

impl Hash for Gene {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// [`Gene`] Iterator
pub struct GeneIterator<'a> {
    ontology: &'a Ontology,
    genes: std::collections::hash_set::Iter<'a, GeneId>,
}

impl<'a> GeneIterator<'a> {
    /// Initialize a new [`GeneIterator`]
    ///
    /// This method requires the [`Ontology`] as a parameter since
    /// the actual [`Gene`] entities are stored in it and not in [`Genes`]
    /// itself
    pub fn new(genes: &'a Genes, ontology: &'a Ontology) -> Self {
        GeneIterator {
            genes: genes.iter(),
            ontology,
        }
    }
}

impl<'a> std::iter::Iterator for GeneIterator<'a> {
    type Item = &'a Gene;
    fn next(&mut self) -> Option<Self::Item> {
        self.genes.next().map(|gene_id| {
            self.ontology
                .gene(gene_id)
                .expect("genes of a term are always present in the ontology")
        })
    }
}

impl Debug for GeneIterator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GeneIterator")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gene_synonyms() {
        let mut gene = Gene::new(1u32.into(), "NAT2");
        assert!(gene.add_synonym("AAC2"));
        assert!(!gene.add_synonym("AAC2"));
        assert!(!gene.add_synonym("NAT2"));
        assert!(!gene.add_synonym("  "));
        assert_eq!(gene.synonyms().len(), 1);
    }

    #[test]
    fn gene_terms() {
        let mut gene = Gene::new(1u32.into(), "NAT2");
        assert!(gene.add_term(TermIdx::from(4u32)));
        assert!(gene.add_term(TermIdx::from(2u32)));
        assert!(!gene.add_term(TermIdx::from(4u32)));
        assert_eq!(gene.terms().len(), 2);
        assert_eq!(gene.symbol(), "NAT2");
        assert_eq!(gene.id().to_string(), "GeneId:1");
    }

    #[test]
    fn gene_equality_by_id() {
        let a = Gene::new(1u32.into(), "NAT2");
        let b = Gene::new(1u32.into(), "other");
        assert_eq!(a, b);
    }
}
