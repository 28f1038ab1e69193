use std::fmt::Display;
use std::str::FromStr;

use crate::term::Namespace;
use crate::{MiningError, MiningResult};

/// The terms that may appear on one side of an association rule
///
/// A pool also decides which namespaces feed the transactions:
/// the transactions contain the terms of the left and the right pool.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Pool {
    /// Terms of the Gene Ontology `biological_process` namespace
    BiologicalProcess,
    /// Terms of the Gene Ontology `molecular_function` namespace
    MolecularFunction,
    /// Terms of the Human Phenotype Ontology
    Phenotype,
    /// Phenotype, biological process and molecular function terms
    ///
    /// Cellular component terms are never part of any pool
    #[default]
    Any,
}

impl Pool {
    /// Returns the namespaces covered by the pool
    pub fn namespaces(&self) -> &'static [Namespace] {
        match self {
            Pool::BiologicalProcess => &[Namespace::BiologicalProcess],
            Pool::MolecularFunction => &[Namespace::MolecularFunction],
            Pool::Phenotype => &[Namespace::Phenotype],
            Pool::Any => &[
                Namespace::BiologicalProcess,
                Namespace::MolecularFunction,
                Namespace::Phenotype,
            ],
        }
    }

    /// Returns `true` if terms of the namespace belong to the pool
    pub fn contains(&self, namespace: Namespace) -> bool {
        self.namespaces().contains(&namespace)
    }
}

impl FromStr for Pool {
    type Err = MiningError;

    fn from_str(s: &str) -> MiningResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "bp" | "biological-process" | "biological_process" => Ok(Pool::BiologicalProcess),
            "mf" | "molecular-function" | "molecular_function" => Ok(Pool::MolecularFunction),
            "hp" | "phenotype" => Ok(Pool::Phenotype),
            "any" | "all" | "union" => Ok(Pool::Any),
            other => Err(MiningError::InvalidInput(format!("unknown pool: {other}"))),
        }
    }
}

impl Display for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Pool::BiologicalProcess => "bp",
            Pool::MolecularFunction => "mf",
            Pool::Phenotype => "hp",
            Pool::Any => "all",
        };
        write!(f, "{name}")
    }
}

/// Thresholds and term pools of one mining run
///
/// All thresholds are fractions. They are converted to absolute values
/// against the number of transactions when the mining starts.
///
/// ```
/// use ontomine::mining::{MiningConfig, Pool};
///
/// let config = MiningConfig::default()
///     .with_min_support(0.015)
///     .with_min_confidence(0.02)
///     .with_left_pool(Pool::BiologicalProcess);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.min_support(), 0.015);
/// assert_eq!(config.right_pool(), Pool::Phenotype);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MiningConfig {
    min_support: f64,
    min_weighted_support: f64,
    min_confidence: f64,
    min_coverage: f64,
    min_information_content: f64,
    left_pool: Pool,
    right_pool: Pool,
    max_itemset_size: usize,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: 0.02,
            min_weighted_support: 0.01,
            min_confidence: 0.03,
            min_coverage: 0.1,
            min_information_content: 0.3,
            left_pool: Pool::Any,
            right_pool: Pool::Phenotype,
            max_itemset_size: 2,
        }
    }
}

impl MiningConfig {
    /// Minimum fraction of transactions that must contain a single term
    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    /// Minimum weighted support of an itemset with more than one term
    pub fn min_weighted_support(&self) -> f64 {
        self.min_weighted_support
    }

    /// Minimum confidence of an association rule
    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Minimum coverage of the left side of an association rule
    pub fn min_coverage(&self) -> f64 {
        self.min_coverage
    }

    /// Minimum information content of a single term, as fraction of the
    /// maximum possible information content
    pub fn min_information_content(&self) -> f64 {
        self.min_information_content
    }

    /// The terms allowed on the left side of a rule
    pub fn left_pool(&self) -> Pool {
        self.left_pool
    }

    /// The terms allowed on the right side of a rule
    pub fn right_pool(&self) -> Pool {
        self.right_pool
    }

    /// The largest itemset size to mine
    pub fn max_itemset_size(&self) -> usize {
        self.max_itemset_size
    }

    /// Sets the minimum support fraction
    #[must_use]
    pub fn with_min_support(mut self, fraction: f64) -> Self {
        self.min_support = fraction;
        self
    }

    /// Sets the minimum weighted support fraction
    #[must_use]
    pub fn with_min_weighted_support(mut self, fraction: f64) -> Self {
        self.min_weighted_support = fraction;
        self
    }

    /// Sets the minimum confidence
    #[must_use]
    pub fn with_min_confidence(mut self, confidence: f64) -> Self {
        self.min_confidence = confidence;
        self
    }

    /// Sets the minimum coverage
    #[must_use]
    pub fn with_min_coverage(mut self, coverage: f64) -> Self {
        self.min_coverage = coverage;
        self
    }

    /// Sets the minimum information content fraction
    #[must_use]
    pub fn with_min_information_content(mut self, fraction: f64) -> Self {
        self.min_information_content = fraction;
        self
    }

    /// Sets the pool of the left side of rules
    #[must_use]
    pub fn with_left_pool(mut self, pool: Pool) -> Self {
        self.left_pool = pool;
        self
    }

    /// Sets the pool of the right side of rules
    #[must_use]
    pub fn with_right_pool(mut self, pool: Pool) -> Self {
        self.right_pool = pool;
        self
    }

    /// Sets the largest itemset size to mine
    #[must_use]
    pub fn with_max_itemset_size(mut self, size: usize) -> Self {
        self.max_itemset_size = size;
        self
    }

    /// Returns the namespaces of both pools, each namespace once
    pub fn transaction_namespaces(&self) -> Vec<Namespace> {
        let mut namespaces: Vec<Namespace> = self
            .left_pool
            .namespaces()
            .iter()
            .chain(self.right_pool.namespaces())
            .copied()
            .collect();
        namespaces.sort_unstable();
        namespaces.dedup();
        namespaces
    }

    /// Checks that all values are within their valid range
    ///
    /// # Errors
    ///
    /// [`MiningError::InvalidInput`] if
    ///
    /// - a support, confidence or coverage fraction is outside of `0..=1`
    /// - the information content fraction is negative
    /// - the maximum itemset size is `0`
    pub fn validate(&self) -> MiningResult<()> {
        for (name, value) in [
            ("min_support", self.min_support),
            ("min_weighted_support", self.min_weighted_support),
            ("min_confidence", self.min_confidence),
            ("min_coverage", self.min_coverage),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MiningError::InvalidInput(format!(
                    "{name} must be between 0 and 1, got {value}"
                )));
            }
        }
        if !(self.min_information_content >= 0.0 && self.min_information_content.is_finite()) {
            return Err(MiningError::InvalidInput(format!(
                "min_information_content must not be negative, got {}",
                self.min_information_content
            )));
        }
        if self.max_itemset_size == 0 {
            return Err(MiningError::InvalidInput(
                "max_itemset_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
