use core::fmt::Debug;
use std::collections::{HashMap, HashSet};

use crate::annotations::{Gene, GeneId};
use crate::term::internal::TermInternal;
use crate::term::{Namespace, Term, TermId, TermIdx};
use crate::MiningResult;

pub(crate) mod builder;
mod termarena;
use builder::Builder;
use termarena::Arena;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// `Ontology` holds the term hierarchies of all namespaces and all genes
///
/// The [`Ontology`] contains the Human Phenotype Ontology and the three
/// Gene Ontology namespaces side by side. Every [`Term`] belongs to exactly
/// one [`Namespace`] and is only connected to terms of the same namespace.
///
/// A finished `Ontology` is read-only: all ancestors of every term are
/// cached, the genes of every term are propagated to all of its ancestors
/// and the information content and specificity of every term are calculated.
/// It is the input for the association mining in [`crate::mining`].
///
/// # Examples
///
/// ```
/// use std::collections::{HashMap, HashSet};
/// use ontomine::{Namespace, Ontology};
///
/// let hierarchy: HashMap<String, HashSet<String>> = HashMap::from([
///     ("HP:1".to_string(), HashSet::new()),
///     ("HP:2".to_string(), HashSet::from(["HP:1".to_string()])),
/// ]);
/// let annotations: HashMap<String, HashSet<String>> = HashMap::from([
///     ("HP:1".to_string(), HashSet::from(["g1".to_string()])),
///     ("HP:2".to_string(), HashSet::from(["g2".to_string()])),
/// ]);
///
/// let ontology = Ontology::from_maps(
///     &[(Namespace::Phenotype, &hierarchy)],
///     &[&annotations],
/// ).unwrap();
///
/// let root = ontology.term("HP:1").unwrap();
/// assert_eq!(root.gene_count(), 2);
/// assert_eq!(root.information_content().ic(), 0.0);
///
/// let child = ontology.term("HP:2").unwrap();
/// assert!((child.information_content().ic() - 0.30103).abs() < 1e-5);
/// ```
///
/// # Construction
///
/// 1. Parse the standard files with [`crate::parser::load_from_files`]
/// 2. Build from in-memory `child -> parents` and `term -> genes` maps
///     with [`Ontology::from_maps`]
/// 3. Step by step, using the typestate [`Builder`]
///
/// # Layout
///
/// ```mermaid
/// erDiagram
///     ONTOLOGY ||--|{ TERM : contains
///     ONTOLOGY ||--|{ GENE : contains
///     TERM ||--|{ TERM : is_a
///     TERM }|--o{ GENE : annotated
///     TERM {
///         TermId id
///         Namespace namespace
///         TermGroup parents
///         TermGroup all_parents
///         TermGroup children
///         Genes genes
///         InformationContent ic
///     }
///     GENE {
///         str symbol
///         GeneId id
///         Set synonyms
///         TermGroup terms
///     }
/// ```
#[derive(Default)]
pub struct Ontology {
    terms: Arena,
    genes: Vec<Gene>,
    gene_ids: HashMap<String, GeneId>,
}

impl Debug for Ontology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ontology with {} terms and {} genes",
            self.terms.len(),
            self.genes.len()
        )
    }
}

impl Ontology {
    /// Builds the `Ontology` from in-memory hierarchies and annotations
    ///
    /// - `hierarchies`: one `child -> direct parents` map per [`Namespace`].
    ///     Obsolete terms must already be removed.
    /// - `annotations`: `term -> gene symbols` maps of direct annotations.
    ///     Annotations to terms that are not part of any hierarchy are skipped.
    ///
    /// # Errors
    ///
    /// - [`crate::MiningError::InvalidInput`] if a term id or gene symbol is invalid
    /// - [`crate::MiningError::MalformedHierarchy`] if a hierarchy contains a cycle
    pub fn from_maps(
        hierarchies: &[(Namespace, &HashMap<String, HashSet<String>>)],
        annotations: &[&HashMap<String, HashSet<String>>],
    ) -> MiningResult<Self> {
        let mut builder = Builder::new();
        for (namespace, hierarchy) in hierarchies {
            builder::add_hierarchy_terms(&mut builder, *namespace, hierarchy)?;
        }

        let mut builder = builder.terms_complete();
        for (_, hierarchy) in hierarchies {
            builder::add_hierarchy_parents(&mut builder, hierarchy)?;
        }

        let mut builder = builder.connect_all_terms()?;
        for term_to_genes in annotations {
            builder.add_annotations(term_to_genes)?;
        }

        Ok(builder
            .propagate_annotations()
            .calculate_information_content()?
            .build())
    }

    /// Returns the number of terms in all namespaces
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the Ontology does not contain any terms
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the [`Term`] of the provided accession
    ///
    /// Returns `None` if the term does not exist
    ///
    /// ```
    /// use ontomine::Ontology;
    ///
    /// let ontology = Ontology::default();
    /// assert!(ontology.term("HP:0000118").is_none());
    /// ```
    pub fn term(&self, id: &str) -> Option<Term> {
        self.terms
            .index_of(id)
            .map(|idx| Term::new(self, self.terms.get_unchecked(idx)))
    }

    /// Returns the [`Term`] of the interned [`TermIdx`]
    ///
    /// Returns `None` if the index was not handed out by this Ontology
    pub fn term_by_idx(&self, idx: TermIdx) -> Option<Term> {
        self.get(idx).map(|term| Term::new(self, term))
    }

    /// Returns an Iterator of all [`Term`]s of all namespaces
    pub fn terms(&self) -> Iter<'_> {
        self.into_iter()
    }

    /// Returns an Iterator of all [`Term`]s of one [`Namespace`]
    pub fn terms_of(&self, namespace: Namespace) -> impl Iterator<Item = Term<'_>> + '_ {
        self.terms().filter(move |term| term.namespace() == namespace)
    }

    /// Returns the number of terms of the [`Namespace`]
    pub fn namespace_size(&self, namespace: Namespace) -> usize {
        self.terms
            .values()
            .filter(|term| term.namespace() == namespace)
            .count()
    }

    /// Returns a reference to the [`Gene`] of the provided [`GeneId`]
    ///
    /// If no such gene is present, `None` is returned
    pub fn gene(&self, gene_id: &GeneId) -> Option<&Gene> {
        self.genes.get(gene_id.as_usize())
    }

    /// Returns a reference to the [`Gene`] with the provided symbol
    ///
    /// Only the primary symbol is matched, not the synonyms of the gene
    pub fn gene_by_symbol(&self, symbol: &str) -> Option<&Gene> {
        self.gene_ids
            .get(symbol.trim())
            .and_then(|gene_id| self.gene(gene_id))
    }

    /// Returns an Iterator of all [`Gene`]s
    pub fn genes(&self) -> std::slice::Iter<'_, Gene> {
        self.genes.iter()
    }

    /// Returns the information content of every term of the [`Namespace`]
    ///
    /// The table is sorted by [`TermId`]
    pub fn information_content_table(&self, namespace: Namespace) -> Vec<(&TermId, f64)> {
        self.score_table(namespace, |term| term.information_content().ic())
    }

    /// Returns the specificity of every term of the [`Namespace`]
    ///
    /// The table is sorted by [`TermId`]
    pub fn specificity_table(&self, namespace: Namespace) -> Vec<(&TermId, f64)> {
        self.score_table(namespace, |term| term.information_content().specificity())
    }

    fn score_table<F: Fn(&TermInternal) -> f64>(
        &self,
        namespace: Namespace,
        score: F,
    ) -> Vec<(&TermId, f64)> {
        let mut table: Vec<(&TermId, f64)> = self
            .terms
            .values()
            .filter(|term| term.namespace() == namespace)
            .map(|term| (term.id(), score(term)))
            .collect();
        table.sort_unstable_by(|a, b| a.0.cmp(b.0));
        table
    }

    /// Returns the internal term of the [`TermIdx`]
    pub(crate) fn get(&self, idx: TermIdx) -> Option<&TermInternal> {
        self.terms.get(idx)
    }

    pub(crate) fn term_values(&self) -> std::slice::Iter<'_, TermInternal> {
        self.terms.values()
    }
}

/// Iterates the Ontology and yields [`Term`]s
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, TermInternal>,
    ontology: &'a Ontology,
}

impl<'a> std::iter::Iterator for Iter<'a> {
    type Item = Term<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|term| Term::new(self.ontology, term))
    }
}

impl<'a> IntoIterator for &'a Ontology {
    type Item = Term<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            inner: self.terms.values(),
            ontology: self,
        }
    }
}

impl Debug for Iter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Iter of {} remaining terms", self.inner.len())
    }
}

#[cfg(test)]
mod test {
    use super::*;

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

    fn small_ontology() -> Ontology {
        let hp = map(&[
            ("HP:1", &[]),
            ("HP:2", &["HP:1"]),
            ("HP:3", &["HP:1"]),
            ("HP:4", &["HP:2", "HP:3"]),
        ]);
        let bp = map(&[("GO:1", &[]), ("GO:2", &["GO:1"]), ("GO:3", &["GO:1", "HP:1"])]);
        let hp_genes = map(&[("HP:4", &["a"]), ("HP:3", &["b"]), ("HP:2", &["c"])]);
        let bp_genes = map(&[("GO:2", &["a", "b"]), ("GO:3", &["d"]), ("GO:9", &["e"])]);

        Ontology::from_maps(
            &[
                (Namespace::Phenotype, &hp),
                (Namespace::BiologicalProcess, &bp),
            ],
            &[&hp_genes, &bp_genes],
        )
        .unwrap()
    }

    fn symbols(term: Term) -> Vec<String> {
        let mut genes: Vec<String> = term.genes().map(|gene| gene.symbol().to_string()).collect();
        genes.sort();
        genes
    }

    #[test]
    fn end_to_end_two_terms() {
        let hp = map(&[("t:1", &[]), ("t:2", &["t:1"])]);
        let genes = map(&[("t:1", &["g1"]), ("t:2", &["g2"])]);
        let ontology = Ontology::from_maps(&[(Namespace::Phenotype, &hp)], &[&genes]).unwrap();

        let t1 = ontology.term("t:1").unwrap();
        let t2 = ontology.term("t:2").unwrap();
        assert_eq!(symbols(t1), vec!["g1", "g2"]);
        assert_eq!(symbols(t2), vec!["g2"]);
        assert_eq!(t1.information_content().ic(), 0.0);
        assert!((t2.information_content().ic() - 0.30103).abs() < 1e-5);
    }

    #[test]
    fn build_multiple_namespaces() {
        let ontology = small_ontology();
        assert_eq!(ontology.len(), 7);
        assert_eq!(ontology.namespace_size(Namespace::Phenotype), 4);
        assert_eq!(ontology.namespace_size(Namespace::BiologicalProcess), 3);
        // `e` is only annotated to an unknown term
        assert_eq!(ontology.genes().count(), 4);
        assert!(ontology.gene_by_symbol("e").is_none());

        let root = ontology.term("HP:1").unwrap();
        assert!(root.is_root());
        assert_eq!(symbols(root), vec!["a", "b", "c"]);

        let go_3 = ontology.term("GO:3").unwrap();
        assert_eq!(go_3.parent_ids().len(), 1);
        assert_eq!(ontology.term("GO:1").unwrap().gene_count(), 3);
    }

    #[test]
    fn term_relations() {
        let ontology = small_ontology();
        let root = ontology.term("HP:1").unwrap();
        let leaf = ontology.term("HP:4").unwrap();
        assert!(leaf.is_leaf());
        assert!(leaf.child_of(&root));
        assert!(root.parent_of(&leaf));
        assert_eq!(leaf.all_parents().count(), 3);
        assert_eq!(leaf.parents().count(), 2);
        assert_eq!(
            ontology.term_by_idx(leaf.idx()).unwrap().id(),
            &TermId::try_from("HP:4").unwrap()
        );
    }

    #[test]
    fn genes_keep_direct_terms() {
        let ontology = small_ontology();
        let gene = ontology.gene_by_symbol("a").unwrap();
        assert_eq!(gene.terms().len(), 2);
        assert_eq!(ontology.gene(gene.id()).unwrap().symbol(), "a");
    }

    #[test]
    fn score_tables() {
        let ontology = small_ontology();
        let ic = ontology.information_content_table(Namespace::Phenotype);
        let ids: Vec<&str> = ic.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["HP:1", "HP:2", "HP:3", "HP:4"]);
        assert_eq!(ic[0].1, 0.0);
        // HP:4 has one of three genes
        assert!((ic[3].1 - 3f64.log10()).abs() < 1e-9);

        let specificity = ontology.specificity_table(Namespace::Phenotype);
        assert_eq!(specificity.len(), 4);
        assert_eq!(specificity[0].1, 0.0);
        assert!(ontology.specificity_table(Namespace::MolecularFunction).is_empty());
    }

    #[test]
    fn iterate_terms() {
        let ontology = small_ontology();
        assert_eq!(ontology.terms().count(), 7);
        assert_eq!(ontology.terms_of(Namespace::BiologicalProcess).count(), 3);
        let mut n = 0;
        for _ in &ontology {
            n += 1;
        }
        assert_eq!(n, 7);
    }
}
