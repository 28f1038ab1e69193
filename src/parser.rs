//! Parsing the ontology and annotation files
//!
//! - `hp.obo` and `go-basic.obo` provide the term hierarchies
//! - `genes_to_phenotype.txt` links genes to HPO terms
//! - a GAF file, e.g. `goa_human.gaf`, links genes to GO terms
//!
//! Genes are identified by their symbol across both annotation sources.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::info;

use crate::ontology::builder::{add_hierarchy_parents, add_hierarchy_terms, Builder};
use crate::term::Namespace;
use crate::{MiningError, MiningResult, Ontology};

/// Module to parse GO - `Gene` associations from GAF files
pub(crate) mod gaf;
/// Module to parse `hp.obo` and `go-basic.obo` files
pub(crate) mod obo;

fn open<P: AsRef<Path>>(file: P) -> MiningResult<BufReader<File>> {
    let filename = file.as_ref().display().to_string();
    let file = File::open(file).map_err(|_| MiningError::CannotOpenFile(filename))?;
    Ok(BufReader::new(file))
}

/// Module to parse HPO - `Gene` associations
pub(crate) mod gene_to_hpo {
    use std::io::BufRead;
    use std::path::Path;

    use tracing::{debug, trace, warn};

    use crate::ontology::builder::{Builder, ConnectedTerms};
    use crate::term::TermId;
    use crate::{MiningError, MiningResult};

    struct ParsedGene<'a> {
        ncbi_id: u32,
        symbol: &'a str,
        term: &'a str,
    }

    impl<'a> ParsedGene<'a> {
        fn try_new(ncbi_id: &'a str, symbol: &'a str, term: &'a str) -> MiningResult<Self> {
            let ncbi_id = ncbi_id.trim().parse::<u32>()?;
            let term = term.trim();
            TermId::try_from(term)?;
            Ok(Self {
                ncbi_id,
                symbol,
                term,
            })
        }
    }

    // Removes the first (header) line.
    fn remove_header<R: BufRead>(reader: &mut R) -> MiningResult<()> {
        let mut trash = String::with_capacity(80);
        reader.read_line(&mut trash).map_err(|_| {
            MiningError::InvalidInput("Invalid data in genes_to_phenotype.txt".to_string())
        })?;
        if !trash.starts_with('#') && !trash.starts_with("ncbi_gene_id") {
            return Err(MiningError::InvalidInput(
                "genes_to_phenotype.txt file must contain a header".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses a single line of `genes_to_phenotype.txt`
    ///
    /// and returns a `ParsedGene` struct with gene and HPO info
    fn genes_to_phenotype_line(line: &str) -> MiningResult<ParsedGene<'_>> {
        let mut cols = line.split('\t');

        // Column 1 is the NCBI-ID of the gene
        let Some(ncbi_id) = cols.next() else {
            return Err(MiningError::InvalidInput(line.to_string()));
        };

        // Column 2 is the gene symbol
        let Some(symbol) = cols.next() else {
            return Err(MiningError::InvalidInput(line.to_string()));
        };

        // Column 3 is the HPO term ID
        let Some(term) = cols.next() else {
            return Err(MiningError::InvalidInput(line.to_string()));
        };

        ParsedGene::try_new(ncbi_id, symbol, term)
    }

    /// Links all genes to their HPO terms
    ///
    /// Returns the number of linked annotations
    fn parse_reader<R: BufRead>(
        mut reader: R,
        builder: &mut Builder<ConnectedTerms>,
    ) -> MiningResult<usize> {
        remove_header(&mut reader)?;

        let mut linked = 0usize;
        let mut skipped = 0usize;
        for line in reader.lines() {
            let line = line.map_err(|_| {
                MiningError::InvalidInput("Invalid data in genes_to_phenotype.txt".to_string())
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let gene = genes_to_phenotype_line(&line)?;
            if builder.term_idx(gene.term).is_none() {
                trace!(
                    "Skipping {} (NCBI {}) -> unknown {}",
                    gene.symbol,
                    gene.ncbi_id,
                    gene.term
                );
                skipped += 1;
                continue;
            }

            let gene_id = builder.add_gene(gene.symbol)?;
            builder.link_gene_term(gene.term, gene_id)?;
            linked += 1;
        }
        if skipped > 0 {
            warn!("Skipped {skipped} HPO annotations to unknown terms");
        }
        debug!("Linked {linked} HPO annotations");
        Ok(linked)
    }

    /// Parse `genes_to_phenotype.txt` file
    ///
    /// ```text
    /// ncbi_gene_id    gene_symbol hpo_id  hpo_name    frequency   disease_id
    /// 10  NAT2    HP:0000007  Autosomal recessive inheritance         -       OMIM:243400
    /// 10  NAT2    HP:0001939  Abnormality of metabolism/homeostasis   -       OMIM:243400
    /// 16  AARS1   HP:0002460  Distal muscle weakness                  15/15   OMIM:613287
    /// ```
    pub fn parse_genes_to_phenotype<P: AsRef<Path>>(
        file: P,
        builder: &mut Builder<ConnectedTerms>,
    ) -> MiningResult<usize> {
        parse_reader(super::open(file)?, builder)
    }

}

/// Builds a complete [`Ontology`] from the HPO and GO source files
///
/// 1. `hp_obo`: the HPO hierarchy, every term is part of [`Namespace::Phenotype`]
/// 2. `go_obo`: the GO hierarchy, terms are assigned by their `namespace`
/// 3. `genes_to_phenotype`: gene to HPO term annotations
/// 4. `gaf`: gene to GO term annotations, including gene synonyms
///
/// The returned ontology has the parents closure, the propagated genes,
/// the information content and the specificity of every term.
///
/// # Errors
///
/// - [`MiningError::CannotOpenFile`] if one of the files cannot be opened
/// - [`MiningError::InvalidInput`] if an annotation line is malformed
/// - [`MiningError::MalformedHierarchy`] if a hierarchy contains a cycle
///
/// # Examples
///
/// ```no_run
/// use ontomine::parser::load_from_files;
///
/// let ontology = load_from_files(
///     "hp.obo",
///     "go-basic.obo",
///     "genes_to_phenotype.txt",
///     "goa_human.gaf",
/// ).unwrap();
/// println!("{} terms", ontology.len());
/// ```
pub fn load_from_files<P: AsRef<Path>>(
    hp_obo: P,
    go_obo: P,
    genes_to_phenotype: P,
    gaf: P,
) -> MiningResult<Ontology> {
    let mut hierarchies = obo::read_obo_file(hp_obo, Some(Namespace::Phenotype))?;
    for (namespace, terms) in obo::read_obo_file(go_obo, None)? {
        hierarchies.entry(namespace).or_default().extend(terms);
    }

    // insert the namespaces in a fixed order to get stable term indices
    let mut namespaces: Vec<Namespace> = hierarchies.keys().copied().collect();
    namespaces.sort_unstable();

    let mut builder = Builder::new();
    for namespace in &namespaces {
        if let Some(hierarchy) = hierarchies.get(namespace) {
            add_hierarchy_terms(&mut builder, *namespace, hierarchy)?;
        }
    }

    let mut builder = builder.terms_complete();
    for hierarchy in hierarchies.values() {
        add_hierarchy_parents(&mut builder, hierarchy)?;
    }

    let mut builder = builder.connect_all_terms()?;
    gene_to_hpo::parse_genes_to_phenotype(genes_to_phenotype, &mut builder)?;
    gaf::parse_gaf(gaf, &mut builder)?;

    let ontology = builder
        .propagate_annotations()
        .calculate_information_content()?
        .build();
    info!(
        "Loaded {} terms and {} genes",
        ontology.len(),
        ontology.genes().len()
    );
    Ok(ontology)
}
