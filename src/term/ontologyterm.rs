use core::fmt::Debug;

use crate::annotations::{GeneIterator, Genes};
use crate::term::internal::TermInternal;
use crate::term::{
    InformationContent, Namespace, TermChildren, TermId, TermIdx, TermIdxs, TermParents,
};
use crate::{MiningError, MiningResult, Ontology};

/// The `Term` represents a single term of one of the ontologies
///
/// The term holds all required information and relationship data.
/// It is a cheap, read-only view into the [`Ontology`].
#[derive(Debug, Clone, Copy)]
pub struct Term<'a> {
    idx: TermIdx,
    id: &'a TermId,
    namespace: Namespace,
    parents: &'a TermParents,
    all_parents: &'a TermParents,
    children: &'a TermChildren,
    genes: &'a Genes,
    information_content: &'a InformationContent,
    ontology: &'a Ontology,
}

impl<'a> Term<'a> {
    /// Constructs a new [`Term`]
    ///
    /// # Errors
    ///
    /// If the given [`TermIdx`] does not match an existing term
    /// it returns an Error
    pub fn try_new(ontology: &'a Ontology, term: TermIdx) -> MiningResult<Term<'a>> {
        let term = ontology.get(term).ok_or(MiningError::DoesNotExist)?;
        Ok(Term::new(ontology, term))
    }

    /// Constructs a new [`Term`] from a `TermInternal`
    pub(crate) fn new(ontology: &'a Ontology, term: &'a TermInternal) -> Term<'a> {
        Term {
            idx: term.idx(),
            id: term.id(),
            namespace: term.namespace(),
            parents: term.parents(),
            all_parents: term.all_parents(),
            children: term.children(),
            genes: term.genes(),
            information_content: term.information_content(),
            ontology,
        }
    }

    /// Returns the interned [`TermIdx`] of the term
    pub fn idx(&self) -> TermIdx {
        self.idx
    }

    /// Returns the [`TermId`] of the term
    ///
    /// e.g.: `HP:0012345`
    pub fn id(&self) -> &'a TermId {
        self.id
    }

    /// Returns the [`Namespace`] of the term
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Returns an iterator of the direct parents of the term
    pub fn parents(&self) -> Terms<'a> {
        Terms::new(self.parents, self.ontology)
    }

    /// Returns an iterator of the direct children of the term
    pub fn children(&self) -> Terms<'a> {
        Terms::new(self.children, self.ontology)
    }

    /// Returns the [`TermIdx`]s of the direct parents
    pub fn parent_ids(&self) -> &'a TermParents {
        self.parents
    }

    /// Returns the [`TermIdx`]s of the direct children
    pub fn children_ids(&self) -> &'a TermChildren {
        self.children
    }

    /// Returns the [`TermIdx`]s of all direct and indirect parents
    pub fn all_parent_ids(&self) -> &'a TermParents {
        self.all_parents
    }

    /// Returns an iterator of the direct and indirect parents of the term
    pub fn all_parents(&self) -> Terms<'a> {
        Terms::new(self.all_parents, self.ontology)
    }

    /// Returns an iterator of all genes annotated to the term or any of its descendants
    pub fn genes(&self) -> GeneIterator<'a> {
        GeneIterator::new(self.genes, self.ontology)
    }

    /// Returns the number of genes annotated to the term or any of its descendants
    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    /// Returns the [`InformationContent`] of the term
    pub fn information_content(&self) -> &'a InformationContent {
        self.information_content
    }

    /// Returns the specificity of the term
    ///
    /// Shortcut for `term.information_content().specificity()`
    pub fn specificity(&self) -> f64 {
        self.information_content.specificity()
    }

    /// Returns `true` if the term has no parents
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Returns `true` if the term has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if `self` is a child (direct or indirect) of `other`
    pub fn child_of(&self, other: &Term) -> bool {
        self.all_parent_ids().contains(&other.idx())
    }

    /// Returns `true` if `self` is a parent (direct or indirect) of `other`
    pub fn parent_of(&self, other: &Term) -> bool {
        other.child_of(self)
    }
}

impl PartialEq for Term<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.idx == other.idx
    }
}

impl Eq for Term<'_> {}

/// Iterates [`Term`]s of a [`crate::TermGroup`]
pub struct Terms<'a> {
    ontology: &'a Ontology,
    ids: TermIdxs<'a>,
}

impl<'a> Terms<'a> {
    /// Constructs a new [`Terms`] iterator from a group of [`TermIdx`]s
    pub fn new(group: &'a crate::TermGroup, ontology: &'a Ontology) -> Self {
        Terms {
            ids: group.iter(),
            ontology,
        }
    }
}

impl<'a> std::iter::Iterator for Terms<'a> {
    type Item = Term<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|idx| {
            Term::new(
                self.ontology,
                self.ontology
                    .get(idx)
                    .expect("Terms can only iterate indices handed out by the ontology"),
            )
        })
    }
}

impl Debug for Terms<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Terms")
    }
}
