#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

use core::fmt::Debug;
use std::num::{ParseIntError, TryFromIntError};
use thiserror::Error;

pub mod annotations;
pub mod mining;
pub mod parser;
pub mod term;
pub mod utils;

mod ontology;

pub use ontology::builder::{
    AddAnnotation, AllTerms, Builder, ConnectedTerms, FullyAnnotated, LooseCollection, Propagated,
};
pub use ontology::{Iter, Ontology};
pub use term::{Namespace, Term, TermGroup, TermId, TermIdx};

const DEFAULT_NUM_PARENTS: usize = 10;
const DEFAULT_NUM_ALL_PARENTS: usize = 30;
const DEFAULT_NUM_GENES: usize = 50;
const DEFAULT_ARENA_CAPACITY: usize = 50_000;

/// Main Error type for this crate
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MiningError {
    /// Term or gene does not exist in the [`Ontology`]
    #[error("term or gene does not exist")]
    DoesNotExist,
    /// Failed to parse an integer, e.g. a numerical gene identifier
    #[error("unable to parse Integer")]
    ParseIntError,
    /// A count is too large to be safely converted into a float
    #[error("cannot convert int to float")]
    TryFromIntError,
    /// Failed to open a file
    #[error("cannot open file {0}")]
    CannotOpenFile(String),
    /// The input data or a configuration value is invalid
    #[error("invalid input data: {0}")]
    InvalidInput(String),
    /// The term hierarchy is not a directed acyclic graph
    #[error("malformed hierarchy: {0}")]
    MalformedHierarchy(String),
    /// No meaningful ratio can be calculated, e.g. without any transactions
    #[error("empty input: {0}")]
    EmptyInput(String),
}

impl From<ParseIntError> for MiningError {
    fn from(_: ParseIntError) -> Self {
        MiningError::ParseIntError
    }
}

impl From<TryFromIntError> for MiningError {
    fn from(_: TryFromIntError) -> Self {
        MiningError::TryFromIntError
    }
}

/// Shortcut for `Result<T, MiningError>`
pub type MiningResult<T> = Result<T, MiningError>;

/// Converts a count into `f64` without silently losing precision
pub(crate) fn count_to_f64(n: usize) -> MiningResult<f64> {
    Ok(f64::from(u32::try_from(n)?))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn count_conversion() {
        assert_eq!(count_to_f64(0).unwrap(), 0.0);
        assert_eq!(count_to_f64(12345).unwrap(), 12345.0);
        assert_eq!(count_to_f64(u32::MAX as usize).unwrap(), 4_294_967_295.0);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn count_conversion_overflow() {
        assert_eq!(count_to_f64(usize::MAX), Err(MiningError::TryFromIntError));
    }
}
