use std::io::BufRead;
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::ontology::builder::{Builder, ConnectedTerms};
use crate::term::Namespace;
use crate::{MiningError, MiningResult};

/// The relevant columns of one GAF 2.x annotation line
///
/// ```text
/// UniProtKB  A0A024RBG1  NUDT4B    enables  GO:0003723  GO_REF:0000043  IEA  UniProtKB-KW:KW-0694  F  Diphosphoinositol polyphosphate phosphohydrolase NUDT4B  NUDT4B|NUDT4  protein  taxon:9606  20230306  UniProt
/// ```
#[derive(Debug, PartialEq)]
struct GafRecord<'a> {
    symbol: &'a str,
    term: &'a str,
    namespace: Namespace,
    synonyms: Vec<&'a str>,
}

/// Parses a single line of a GAF file
///
/// Returns `None` for comments and for negated annotations
fn parse_line(line: &str) -> MiningResult<Option<GafRecord<'_>>> {
    if line.starts_with('!') || line.trim().is_empty() {
        return Ok(None);
    }
    let cols: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
    if cols.len() < 9 {
        return Err(MiningError::InvalidInput(line.to_string()));
    }

    // Column 4 holds the qualifiers, e.g. `NOT|enables`
    if cols[3].split('|').any(|qualifier| qualifier == "NOT") {
        return Ok(None);
    }

    let Some(namespace) = Namespace::from_aspect(cols[8]) else {
        return Err(MiningError::InvalidInput(format!(
            "invalid aspect {} in {line}",
            cols[8]
        )));
    };

    let symbol = cols[2].trim();
    if symbol.is_empty() {
        return Err(MiningError::InvalidInput(line.to_string()));
    }

    // Column 11 holds the pipe-separated synonyms
    let synonyms: Vec<&str> = cols
        .get(10)
        .map(|synonyms| {
            synonyms
                .split('|')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(Some(GafRecord {
        symbol,
        term: cols[4].trim(),
        namespace,
        synonyms,
    }))
}

/// Links all genes of the GAF data to their GO terms
///
/// Annotations to unknown terms, or to terms of a different namespace than
/// the aspect of the line, are skipped. Returns the number of linked annotations
fn parse_reader<R: BufRead>(
    reader: R,
    builder: &mut Builder<ConnectedTerms>,
) -> MiningResult<usize> {
    let mut linked = 0usize;
    let mut skipped = 0usize;
    for line in reader.lines() {
        let line = line
            .map_err(|_| MiningError::InvalidInput("Invalid data in GAF file".to_string()))?;
        let Some(record) = parse_line(&line)? else {
            continue;
        };

        match builder.namespace_of(record.term) {
            Some(namespace) if namespace == record.namespace => {}
            Some(namespace) => {
                trace!(
                    "Skipping {} annotated as {} but defined as {namespace}",
                    record.term,
                    record.namespace
                );
                skipped += 1;
                continue;
            }
            None => {
                trace!(
                    "Skipping annotation of {} to unknown term {}",
                    record.symbol,
                    record.term
                );
                skipped += 1;
                continue;
            }
        }

        let gene_id = builder.add_gene(record.symbol)?;
        if let Some(gene) = builder.gene_mut(&gene_id) {
            for synonym in &record.synonyms {
                gene.add_synonym(synonym);
            }
        }
        builder.link_gene_term(record.term, gene_id)?;
        linked += 1;
    }
    if skipped > 0 {
        warn!("Skipped {skipped} GO annotations to unknown or mismatching terms");
    }
    debug!("Linked {linked} GO annotations");
    Ok(linked)
}

/// Parses a GAF file, e.g. `goa_human.gaf`
///
/// # Errors
///
/// - [`MiningError::CannotOpenFile`] if the file cannot be opened
/// - [`MiningError::InvalidInput`] if a line is malformed
pub(crate) fn parse_gaf<P: AsRef<Path>>(
    file: P,
    builder: &mut Builder<ConnectedTerms>,
) -> MiningResult<usize> {
    let reader = super::open(file)?;
    parse_reader(reader, builder)
}
