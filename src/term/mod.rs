//! Terms are the nodes of the ontology hierarchies
//!
//! Every term belongs to exactly one [`Namespace`] and is connected to its
//! direct parents (`is_a` and `part_of` relations) and, after the
//! [`crate::Ontology`] is built, to all of its transitive ancestors and to
//! all genes that are annotated to it or to any of its descendants.
//!
//! Internally, terms are stored in an arena and referenced by their
//! interned [`TermIdx`]. The public accession (e.g. `HP:0000118` or
//! `GO:0008150`) is a [`TermId`].

mod group;
mod information_content;
pub(crate) mod internal;
mod namespace;
mod ontologyterm;
mod termid;

pub use group::{TermGroup, TermIdxs};
pub use information_content::InformationContent;
pub use namespace::Namespace;
pub use ontologyterm::{Term, Terms};
pub use termid::{TermId, TermIdx};

/// The direct or transitive parents of a term
pub type TermParents = TermGroup;
/// The direct children of a term
pub type TermChildren = TermGroup;
