use crate::{count_to_f64, MiningResult};

/// The information content and specificity of a term
///
/// Both values are calculated per [`crate::Namespace`]: the information
/// content relates the genes of a term to all genes annotated anywhere in
/// the namespace, the specificity aggregates the information content of all
/// ancestors of the term.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct InformationContent {
    ic: f64,
    specificity: f64,
}

impl InformationContent {
    /// Returns the information content `-log10(genes / corpus)`
    pub fn ic(&self) -> f64 {
        self.ic
    }

    /// Returns the specificity, the summed ancestor IC normalized by the size of the tree
    pub fn specificity(&self) -> f64 {
        self.specificity
    }

    /// Calculates and sets the information content
    ///
    /// The IC is `0` if either the term or the whole corpus has no genes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MiningError::TryFromIntError`] if a count does not fit into `u32`
    pub fn set_ic(&mut self, total: usize, current: usize) -> MiningResult<()> {
        self.ic = information_content(total, current)?;
        Ok(())
    }

    /// Calculates and sets the specificity from the summed IC of all ancestors
    ///
    /// The specificity is `0` if the tree is empty.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MiningError::TryFromIntError`] if `tree_size` does not fit into `u32`
    pub fn set_specificity(&mut self, ancestor_ic: f64, tree_size: usize) -> MiningResult<()> {
        self.specificity = if tree_size == 0 {
            0.0
        } else {
            ancestor_ic / count_to_f64(tree_size)?
        };
        Ok(())
    }
}

/// `-log10(current / total)`, or `0` if the ratio is `0` or undefined
pub(crate) fn information_content(total: usize, current: usize) -> MiningResult<f64> {
    if total == 0 || current == 0 {
        return Ok(0.0);
    }
    let ic = -(count_to_f64(current)? / count_to_f64(total)?).log10();
    // full coverage yields -0.0
    Ok(ic.max(0.0))
}
