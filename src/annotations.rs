//! Genes are linked to terms and make up the transactions of the association mining
//!
//! This module contains the struct to represent [`Gene`]s and an iterator over them.
//!
//! - Each gene has a unique numerical identifier, interned by the [`crate::Ontology`]
//!   from the gene symbol.
//! - Each gene holds the terms it is directly annotated to and its synonyms
//!   (from GAF sources). Synonyms are carried along, the mining does not use them.

mod gene;
pub use gene::{Gene, GeneId, GeneIterator, Genes};
