use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::term::{Namespace, TermId};
use crate::{MiningError, MiningResult};

/// `child -> direct parents` of every term, grouped by namespace
pub(crate) type Hierarchies = HashMap<Namespace, HashMap<String, HashSet<String>>>;

/// The relevant lines of a single `[Term]` stanza
#[derive(Debug, Default, PartialEq)]
struct Stanza<'a> {
    id: Option<&'a str>,
    namespace: Option<&'a str>,
    parents: Vec<&'a str>,
    obsolete: bool,
}

impl<'a> Stanza<'a> {
    fn add_line(&mut self, line: &'a str) {
        let Some((key, value)) = line.split_once(':') else {
            return;
        };
        // trailing `! name` comments and `{qualifiers}` are not part of the value
        let value = value.split('!').next().unwrap_or_default().trim();
        match key {
            "id" => self.id = Some(value),
            "namespace" => self.namespace = Some(value),
            "is_a" => self.parents.extend(value.split_whitespace().next()),
            "relationship" => {
                let mut tokens = value.split_whitespace();
                if let (Some("part_of"), Some(parent)) = (tokens.next(), tokens.next()) {
                    self.parents.push(parent);
                }
            }
            "is_obsolete" => self.obsolete = value == "true",
            _ => {}
        }
    }

    fn insert_into(self, hierarchies: &mut Hierarchies, default_namespace: Option<Namespace>) {
        let Some(id) = self.id else {
            warn!("Skipping [Term] stanza without id");
            return;
        };
        if self.obsolete {
            trace!("Skipping obsolete term {id}");
            return;
        }
        if TermId::try_from(id).is_err() {
            warn!("Skipping term with invalid id {id}");
            return;
        }
        let namespace = match (self.namespace, default_namespace) {
            (Some(namespace), _) => match namespace.parse::<Namespace>() {
                Ok(namespace) => namespace,
                Err(_) => {
                    warn!("Skipping {id} from unknown namespace {namespace}");
                    return;
                }
            },
            (None, Some(namespace)) => namespace,
            (None, None) => {
                warn!("Skipping {id} without namespace");
                return;
            }
        };

        let parents = hierarchies
            .entry(namespace)
            .or_default()
            .entry(id.to_string())
            .or_default();
        for parent in self.parents {
            if TermId::try_from(parent).is_ok() {
                parents.insert(parent.to_string());
            } else {
                warn!("Ignoring invalid parent {parent} of {id}");
            }
        }
    }
}

/// Parses the content of an OBO file into `child -> parents` maps
///
/// Only `[Term]` stanzas are considered, obsolete terms are dropped.
/// Parents are taken from `is_a` and `relationship: part_of` lines.
/// Terms without a `namespace` line are assigned to `default_namespace`.
pub(crate) fn parse_obo(content: &str, default_namespace: Option<Namespace>) -> Hierarchies {
    let mut hierarchies = Hierarchies::new();
    let mut stanza: Option<Stanza> = None;

    for line in content.lines().map(str::trim) {
        if line.starts_with('[') {
            if let Some(finished) = stanza.take() {
                finished.insert_into(&mut hierarchies, default_namespace);
            }
            if line == "[Term]" {
                stanza = Some(Stanza::default());
            }
            continue;
        }
        if let Some(current) = stanza.as_mut() {
            current.add_line(line);
        }
    }
    if let Some(finished) = stanza {
        finished.insert_into(&mut hierarchies, default_namespace);
    }
    hierarchies
}

/// Reads an OBO file, e.g. `hp.obo` or `go-basic.obo`
///
/// # Errors
///
/// [`MiningError::CannotOpenFile`] if the file cannot be read
pub(crate) fn read_obo_file<P: AsRef<Path>>(
    file: P,
    default_namespace: Option<Namespace>,
) -> MiningResult<Hierarchies> {
    let filename = file.as_ref().display().to_string();
    let content =
        fs::read_to_string(file).map_err(|_| MiningError::CannotOpenFile(filename.clone()))?;
    let hierarchies = parse_obo(&content, default_namespace);
    for (namespace, terms) in &hierarchies {
        debug!("Parsed {} {namespace} terms from {filename}", terms.len());
    }
    Ok(hierarchies)
}
