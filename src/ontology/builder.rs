//! Typestate builder of the [`Ontology`]
//!
//! ```text
//! Builder<LooseCollection>
//! |
//! terms_complete()
//! |
//! V
//! Builder<AllTerms>           add_parent()
//! |
//! connect_all_terms()         transitive closure of the parents
//! |
//! V
//! Builder<ConnectedTerms>     link_gene_term()
//! |
//! propagate_annotations()     genes bubble up to all ancestors
//! |
//! V
//! Builder<Propagated>
//! |
//! calculate_information_content()
//! |
//! V
//! Builder<FullyAnnotated>
//! |
//! build()
//! |
//! V
//! Ontology
//! ```
use std::collections::{HashMap, HashSet, VecDeque};
use std::marker::PhantomData;

use tracing::{debug, trace, warn};

use crate::annotations::{Gene, GeneId, Genes};
use crate::ontology::termarena::Arena;
use crate::term::{Namespace, TermGroup, TermId, TermIdx};
use crate::{MiningError, MiningResult, Ontology};

/// Terms can be added
pub struct LooseCollection;
/// All terms are added, parents can be connected
pub struct AllTerms;
/// The transitive closure of all parents is cached, genes can be linked
pub struct ConnectedTerms;
/// Genes are propagated to all ancestors
pub struct Propagated;
/// Information content and specificity are calculated
pub struct FullyAnnotated;

/// Marker for builder states that accept new genes
pub trait AddAnnotation {}
impl AddAnnotation for LooseCollection {}
impl AddAnnotation for AllTerms {}
impl AddAnnotation for ConnectedTerms {}

fn transition_state<TX, TY>(builder: Builder<TX>) -> Builder<TY> {
    Builder::<TY> {
        terms: builder.terms,
        genes: builder.genes,
        gene_ids: builder.gene_ids,
        state: PhantomData,
    }
}

/// Builds an [`Ontology`] step by step
///
/// Each state only offers the methods that are valid at that point of
/// the construction. See the module documentation for the order of states.
pub struct Builder<T> {
    terms: Arena,
    genes: Vec<Gene>,
    gene_ids: HashMap<String, GeneId>,
    state: PhantomData<T>,
}

impl<T> Builder<T> {
    /// Returns the number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if no terms were added yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the [`TermIdx`] of a term accession, if present
    pub fn term_idx(&self, id: &str) -> Option<TermIdx> {
        self.terms.index_of(id)
    }

    /// Returns the [`GeneId`] of a gene symbol, if present
    pub fn gene_id(&self, symbol: &str) -> Option<GeneId> {
        self.gene_ids.get(symbol).copied()
    }

    /// Returns the [`Namespace`] of a term accession, if present
    pub fn namespace_of(&self, id: &str) -> Option<Namespace> {
        self.terms
            .index_of(id)
            .and_then(|idx| self.terms.get(idx))
            .map(|term| term.namespace())
    }
}

impl<T: AddAnnotation> Builder<T> {
    /// Adds a gene and returns its [`GeneId`]
    ///
    /// Genes are identified by their symbol, adding the same symbol
    /// again returns the existing id.
    ///
    /// # Errors
    ///
    /// - [`MiningError::InvalidInput`] if the symbol is empty
    /// - [`MiningError::TryFromIntError`] if there are more than `u32::MAX` genes
    pub fn add_gene(&mut self, symbol: &str) -> MiningResult<GeneId> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(MiningError::InvalidInput("empty gene symbol".to_string()));
        }
        if let Some(id) = self.gene_ids.get(symbol) {
            return Ok(*id);
        }
        let id = GeneId::try_from(self.genes.len())?;
        self.genes.push(Gene::new(id, symbol));
        self.gene_ids.insert(symbol.to_string(), id);
        Ok(id)
    }

    /// Returns a mutable reference to the [`Gene`], e.g. to add synonyms
    pub fn gene_mut(&mut self, gene_id: &GeneId) -> Option<&mut Gene> {
        self.genes.get_mut(gene_id.as_usize())
    }
}

impl Default for Builder<LooseCollection> {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder<LooseCollection> {
    /// Constructs a new, empty builder
    pub fn new() -> Builder<LooseCollection> {
        Builder::<LooseCollection> {
            terms: Arena::default(),
            genes: Vec::new(),
            gene_ids: HashMap::new(),
            state: PhantomData,
        }
    }

    /// Adds a term to the namespace and returns its [`TermIdx`]
    ///
    /// If the accession is already present, the existing index is returned
    /// and the term keeps its original namespace.
    ///
    /// # Errors
    ///
    /// [`MiningError::InvalidInput`] if the accession is not a valid [`TermId`]
    pub fn add_term(&mut self, id: &str, namespace: Namespace) -> MiningResult<TermIdx> {
        let term_id = TermId::try_from(id)?;
        self.terms.insert(term_id, namespace)
    }

    /// All terms are added, continue with connecting them to their parents
    #[must_use]
    pub fn terms_complete(self) -> Builder<AllTerms> {
        debug!("Added {} terms", self.terms.len());
        transition_state(self)
    }
}

impl Builder<AllTerms> {
    /// Add a connection from a term to its parent
    ///
    /// - If the parent term was never added, it is created in the namespace
    ///   of the child (incomplete source ontologies are repaired silently).
    /// - If the parent belongs to a different namespace than the child, the
    ///   connection is stripped.
    ///
    /// Returns whether the connection was added
    ///
    /// # Errors
    ///
    /// - [`MiningError::DoesNotExist`] if the child is not present
    /// - [`MiningError::InvalidInput`] if the parent accession is invalid
    pub fn add_parent(&mut self, parent_id: &str, child_id: &str) -> MiningResult<bool> {
        let child = self
            .terms
            .index_of(child_id)
            .ok_or(MiningError::DoesNotExist)?;
        let namespace = self.terms.get_unchecked(child).namespace();

        let parent = match self.terms.index_of(parent_id) {
            Some(parent) => parent,
            None => {
                warn!("Parent {parent_id} of {child_id} is not defined, adding it to {namespace}");
                self.terms.insert(TermId::try_from(parent_id)?, namespace)?
            }
        };

        if parent == child {
            warn!("Ignoring self-reference of {child_id}");
            return Ok(false);
        }

        let parent_namespace = self.terms.get_unchecked(parent).namespace();
        if parent_namespace != namespace {
            debug!(
                "Stripping cross-namespace edge {child_id} ({namespace}) -> {parent_id} ({})",
                parent_namespace
            );
            return Ok(false);
        }

        self.terms.get_unchecked_mut(parent).add_child(child);
        Ok(self.terms.get_unchecked_mut(child).add_parent(parent))
    }

    /// Creates and caches the `all_parents` values for every term
    ///
    /// The hierarchy is traversed top-down, starting at all roots. A term is
    /// only visited once all of its parents are visited, so every parent's
    /// ancestors are complete before they are handed down to the child:
    ///
    /// `all_parents(child) = ⋃ (all_parents(parent) ∪ {parent})`
    ///
    /// Terms without parents have no ancestors.
    ///
    /// # Errors
    ///
    /// [`MiningError::MalformedHierarchy`] if the hierarchy contains a cycle
    pub fn connect_all_terms(mut self) -> MiningResult<Builder<ConnectedTerms>> {
        let mut pending_parents: Vec<usize> = self
            .terms
            .values()
            .map(|term| term.parents().len())
            .collect();

        let mut queue: VecDeque<TermIdx> = self
            .terms
            .values()
            .filter(|term| term.parents().is_empty())
            .map(|term| term.idx())
            .collect();
        debug!("Closing hierarchy from {} roots", queue.len());

        let mut visited = 0usize;
        while let Some(idx) = queue.pop_front() {
            visited += 1;
            let term = self.terms.get_unchecked(idx);
            let mut inherited = term.all_parents().clone();
            inherited.insert(idx);
            let children = term.children().clone();

            for child in &children {
                self.terms
                    .get_unchecked_mut(child)
                    .all_parents_mut()
                    .extend_from(&inherited);
                let pending = &mut pending_parents[child.as_usize()];
                *pending -= 1;
                if *pending == 0 {
                    queue.push_back(child);
                }
            }
        }

        if visited != self.terms.len() {
            let stuck = self
                .terms
                .values()
                .find(|term| pending_parents[term.idx().as_usize()] > 0)
                .map_or_else(String::new, |term| term.id().to_string());
            return Err(MiningError::MalformedHierarchy(format!(
                "{} terms are part of or below a cycle, e.g. {stuck}",
                self.terms.len() - visited
            )));
        }

        Ok(transition_state(self))
    }
}

impl Builder<ConnectedTerms> {
    /// Annotates the gene directly to the term
    ///
    /// The gene is **not** linked to the parents of the term, this
    /// happens for all terms at once in [`Builder::propagate_annotations`].
    ///
    /// Returns whether the annotation is new
    ///
    /// # Errors
    ///
    /// [`MiningError::DoesNotExist`] if the term or the gene is not present
    pub fn link_gene_term(&mut self, term_id: &str, gene_id: GeneId) -> MiningResult<bool> {
        let idx = self
            .terms
            .index_of(term_id)
            .ok_or(MiningError::DoesNotExist)?;
        let gene = self
            .genes
            .get_mut(gene_id.as_usize())
            .ok_or(MiningError::DoesNotExist)?;
        gene.add_term(idx);
        Ok(self.terms.get_unchecked_mut(idx).add_gene(gene_id))
    }

    /// Adds all direct annotations of a `term -> gene symbols` map
    ///
    /// Annotations to terms that are not part of the ontology (e.g. obsolete
    /// terms) are skipped. Returns the number of skipped annotations.
    ///
    /// # Errors
    ///
    /// [`MiningError::InvalidInput`] if a gene symbol is empty
    pub fn add_annotations(
        &mut self,
        term_to_genes: &HashMap<String, HashSet<String>>,
    ) -> MiningResult<usize> {
        let mut skipped = 0usize;
        for (term, genes) in term_to_genes {
            if self.terms.index_of(term).is_none() {
                warn!("Skipping {} annotations to unknown term {term}", genes.len());
                skipped += genes.len();
                continue;
            }
            for symbol in genes {
                let gene_id = self.add_gene(symbol)?;
                self.link_gene_term(term, gene_id)?;
            }
        }
        Ok(skipped)
    }

    /// Propagates the genes of every term to all of its ancestors
    ///
    /// Starting from the parents of all leaf terms, a worklist of terms is
    /// processed. Every processed term receives the genes of all of its
    /// children and re-schedules its parents whenever its own gene set
    /// changed (or on its first visit). A term can be visited multiple times,
    /// once for every path that reaches it, and its gene set is only final
    /// once the worklist is empty.
    ///
    /// Afterwards, for every term and every descendant of it, the genes of the
    /// descendant are a subset of the term's genes.
    #[must_use]
    pub fn propagate_annotations(mut self) -> Builder<Propagated> {
        let n_terms = self.terms.len();
        let mut queued = vec![false; n_terms];
        let mut visited = vec![false; n_terms];
        let mut worklist: VecDeque<TermIdx> = VecDeque::new();

        for term in self.terms.values() {
            if !term.children().is_empty() {
                continue;
            }
            for parent in term.parents() {
                if !queued[parent.as_usize()] {
                    queued[parent.as_usize()] = true;
                    worklist.push_back(parent);
                }
            }
        }

        let mut passes = 0usize;
        while let Some(idx) = worklist.pop_front() {
            queued[idx.as_usize()] = false;
            passes += 1;

            let mut genes: Genes = std::mem::take(self.terms.get_unchecked_mut(idx).genes_mut());
            let before = genes.len();
            for child in self.terms.get_unchecked(idx).children() {
                genes.extend(self.terms.get_unchecked(child).genes().iter().copied());
            }
            let changed = genes.len() != before;

            let term = self.terms.get_unchecked_mut(idx);
            *term.genes_mut() = genes;
            trace!("Propagated {} genes to {}", term.genes().len(), term.id());

            if changed || !visited[idx.as_usize()] {
                visited[idx.as_usize()] = true;
                for parent in term.parents() {
                    if !queued[parent.as_usize()] {
                        queued[parent.as_usize()] = true;
                        worklist.push_back(parent);
                    }
                }
            }
        }
        debug!("Propagated annotations of {n_terms} terms in {passes} passes");

        transition_state(self)
    }
}

impl Builder<Propagated> {
    /// Calculates the information content and specificity of every term
    ///
    /// Both values are calculated separately for every [`Namespace`]:
    ///
    /// - The information content of a term is `-log10(genes(term) / corpus)`,
    ///   where the corpus contains all genes of all terms of the namespace.
    ///   Terms without genes have an information content of `0`.
    /// - The specificity of a term is the sum of the information content of
    ///   all its ancestors, divided by the number of terms in the namespace.
    ///
    /// # Errors
    ///
    /// [`MiningError::TryFromIntError`] if there are more genes or terms than `u32::MAX`
    pub fn calculate_information_content(mut self) -> MiningResult<Builder<FullyAnnotated>> {
        for namespace in Namespace::ALL {
            let term_ids = self.terms.keys_of(namespace);
            if term_ids.is_empty() {
                continue;
            }

            let corpus: Genes = term_ids
                .iter()
                .flat_map(|idx| self.terms.get_unchecked(*idx).genes().iter().copied())
                .collect();
            for idx in &term_ids {
                let term = self.terms.get_unchecked_mut(*idx);
                let current = term.genes().len();
                term.information_content_mut().set_ic(corpus.len(), current)?;
            }

            let tree_size = term_ids.len();
            for idx in &term_ids {
                let ancestor_ic: f64 = self
                    .terms
                    .get_unchecked(*idx)
                    .all_parents()
                    .iter()
                    .filter_map(|parent| self.terms.get(parent))
                    .map(|parent| parent.information_content().ic())
                    .sum();
                self.terms
                    .get_unchecked_mut(*idx)
                    .information_content_mut()
                    .set_specificity(ancestor_ic, tree_size)?;
            }
            debug!(
                "Calculated information content of {tree_size} {namespace} terms, {} genes",
                corpus.len()
            );
        }
        Ok(transition_state(self))
    }
}

impl Builder<FullyAnnotated> {
    /// Returns the finished [`Ontology`]
    pub fn build(self) -> Ontology {
        Ontology {
            terms: self.terms,
            genes: self.genes,
            gene_ids: self.gene_ids,
        }
    }
}

/// Inserts all keys and parents of a `child -> parents` map into the builder
pub(crate) fn add_hierarchy_terms(
    builder: &mut Builder<LooseCollection>,
    namespace: Namespace,
    child_to_parents: &HashMap<String, HashSet<String>>,
) -> MiningResult<()> {
    for child in child_to_parents.keys() {
        builder.add_term(child, namespace)?;
    }
    Ok(())
}

/// Connects all children to their parents from a `child -> parents` map
pub(crate) fn add_hierarchy_parents(
    builder: &mut Builder<AllTerms>,
    child_to_parents: &HashMap<String, HashSet<String>>,
) -> MiningResult<()> {
    for (child, parents) in child_to_parents {
        for parent in parents {
            builder.add_parent(parent, child)?;
        }
    }
    Ok(())
}
