use std::fmt::Display;
use std::str::FromStr;

use crate::{MiningError, MiningResult};

/// The ontology partition a term belongs to
///
/// Parent-child relations never cross namespaces. Edges between terms of
/// different namespaces are stripped when the [`crate::Ontology`] is built.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Namespace {
    /// Gene Ontology `biological_process`
    BiologicalProcess,
    /// Gene Ontology `molecular_function`
    MolecularFunction,
    /// Gene Ontology `cellular_component`
    CellularComponent,
    /// Human Phenotype Ontology
    Phenotype,
}

impl Namespace {
    /// All namespaces, in a fixed order
    pub const ALL: [Namespace; 4] = [
        Namespace::BiologicalProcess,
        Namespace::MolecularFunction,
        Namespace::CellularComponent,
        Namespace::Phenotype,
    ];

    /// Returns the namespace for a GAF aspect code (`P`, `F` or `C`)
    pub fn from_aspect(aspect: &str) -> Option<Self> {
        match aspect.trim() {
            "P" => Some(Namespace::BiologicalProcess),
            "F" => Some(Namespace::MolecularFunction),
            "C" => Some(Namespace::CellularComponent),
            _ => None,
        }
    }

    /// Returns the short code, e.g. `BP` or `HP`
    pub fn code(&self) -> &'static str {
        match self {
            Namespace::BiologicalProcess => "BP",
            Namespace::MolecularFunction => "MF",
            Namespace::CellularComponent => "CC",
            Namespace::Phenotype => "HP",
        }
    }
}

impl FromStr for Namespace {
    type Err = MiningError;

    /// Parses the OBO `namespace:` value or a short code
    fn from_str(s: &str) -> MiningResult<Self> {
        match s.trim() {
            "biological_process" | "BP" | "bp" => Ok(Namespace::BiologicalProcess),
            "molecular_function" | "MF" | "mf" => Ok(Namespace::MolecularFunction),
            "cellular_component" | "CC" | "cc" => Ok(Namespace::CellularComponent),
            "human_phenotype" | "HP" | "hp" => Ok(Namespace::Phenotype),
            other => Err(MiningError::InvalidInput(format!(
                "unknown namespace: {other}"
            ))),
        }
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_obo_namespaces() {
        assert_eq!(
            "biological_process".parse::<Namespace>(),
            Ok(Namespace::BiologicalProcess)
        );
        assert_eq!(
            "molecular_function".parse::<Namespace>(),
            Ok(Namespace::MolecularFunction)
        );
        assert_eq!("HP".parse::<Namespace>(), Ok(Namespace::Phenotype));
        assert!("external".parse::<Namespace>().is_err());
    }

    #[test]
    fn aspects() {
        assert_eq!(Namespace::from_aspect("P"), Some(Namespace::BiologicalProcess));
        assert_eq!(Namespace::from_aspect("F"), Some(Namespace::MolecularFunction));
        assert_eq!(Namespace::from_aspect("C"), Some(Namespace::CellularComponent));
        assert_eq!(Namespace::from_aspect("X"), None);
    }
}
