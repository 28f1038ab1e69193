//! Mines association rules between GO or HPO terms and HPO terms
//!
//! ```text
//! cargo run --release --example mine -- hp.obo go-basic.obo genes_to_phenotype.txt goa_human.gaf [OUT_DIR]
//! ```
//!
//! Runs a sweep over left pools, minimum support and minimum confidence and
//! writes the information content, specificity, transactions, frequent
//! itemsets and rules as tab separated files into `OUT_DIR`.
//! Set `RUST_LOG=ontomine=debug` for progress output.
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;
use tracing_subscriber::EnvFilter;

use ontomine::mining::{mine, MiningConfig, MiningRun, Pool};
use ontomine::parser::load_from_files;
use ontomine::{Namespace, Ontology};

const POOLS: [Pool; 4] = [
    Pool::Any,
    Pool::BiologicalProcess,
    Pool::MolecularFunction,
    Pool::Phenotype,
];
const SUPPORT: [f64; 2] = [0.02, 0.015];
const CONFIDENCE: [f64; 3] = [0.03, 0.02, 0.01];

fn writer(dir: &Path, filename: &str) -> BufWriter<File> {
    let path = dir.join(filename);
    let file = File::create(&path).unwrap_or_else(|_| panic!("cannot create {}", path.display()));
    BufWriter::new(file)
}

fn write_scores(ontology: &Ontology, dir: &Path) {
    for namespace in [
        Namespace::Phenotype,
        Namespace::BiologicalProcess,
        Namespace::MolecularFunction,
    ] {
        let mut out = writer(dir, &format!("information_content_{namespace}.tsv"));
        for (id, ic) in ontology.information_content_table(namespace) {
            writeln!(out, "{id}\t{ic}").unwrap();
        }
        let mut out = writer(dir, &format!("specificity_{namespace}.tsv"));
        for (id, specificity) in ontology.specificity_table(namespace) {
            writeln!(out, "{id}\t{specificity}").unwrap();
        }
    }
}

fn write_transactions(ontology: &Ontology, run: &MiningRun, out: &mut impl Write) {
    for (gene_id, items) in run.transactions().iter() {
        let symbol = ontology.gene(&gene_id).map_or("-", |gene| gene.symbol());
        let mut ids: Vec<&str> = items
            .iter()
            .filter_map(|idx| ontology.term_by_idx(idx))
            .map(|term| term.id().as_str())
            .collect();
        ids.sort_unstable();
        writeln!(out, "{symbol}\t{}", ids.join(",")).unwrap();
    }
}

fn write_itemsets(ontology: &Ontology, run: &MiningRun, out: &mut impl Write) {
    let n = run.itemsets().n_transactions();
    for itemset in run.itemsets().iter().filter(|itemset| itemset.len() > 1) {
        let ids: Vec<&str> = itemset
            .term_ids(ontology)
            .into_iter()
            .map(|id| id.as_str())
            .collect();
        let support = itemset.support_fraction(n).unwrap() * 100.0;
        writeln!(
            out,
            "{{{}}}\t{support:.2}%\t{}",
            ids.join(", "),
            itemset.weighted_support()
        )
        .unwrap();
    }
}

fn write_rules(ontology: &Ontology, run: &MiningRun, out: &mut impl Write) {
    writeln!(out, "left\tright\tsupport\tconfidence\tcoverage").unwrap();
    for rule in run.rules() {
        let Some((left, right)) = rule.term_ids(ontology) else {
            continue;
        };
        writeln!(
            out,
            "{left}\t{right}\t{}\t{}\t{}",
            rule.support(),
            rule.confidence(),
            rule.coverage()
        )
        .unwrap();
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 5 {
        eprintln!(
            "usage: {} <hp.obo> <go.obo> <genes_to_phenotype.txt> <annotations.gaf> [OUT_DIR]",
            args[0]
        );
        std::process::exit(1);
    }
    let out_dir = PathBuf::from(args.get(5).map_or("ontomine_output", String::as_str));
    fs::create_dir_all(&out_dir).unwrap();

    let ontology = load_from_files(&args[1], &args[2], &args[3], &args[4]).unwrap();
    write_scores(&ontology, &out_dir);

    for pool in POOLS {
        for (s, support) in SUPPORT.iter().enumerate() {
            for (c, confidence) in CONFIDENCE.iter().enumerate() {
                let config = MiningConfig::default()
                    .with_left_pool(pool)
                    .with_right_pool(Pool::Phenotype)
                    .with_min_support(*support)
                    .with_min_confidence(*confidence);
                let run = match mine(&ontology, &config) {
                    Ok(run) => run,
                    Err(err) => {
                        eprintln!("skipping {pool} support {support}: {err}");
                        continue;
                    }
                };

                if c == 0 {
                    write_itemsets(
                        &ontology,
                        &run,
                        &mut writer(&out_dir, &format!("itemsets_{pool}_{s}.tsv")),
                    );
                    if s == 0 {
                        write_transactions(
                            &ontology,
                            &run,
                            &mut writer(&out_dir, &format!("transactions_{pool}.tsv")),
                        );
                    }
                }
                write_rules(
                    &ontology,
                    &run,
                    &mut writer(&out_dir, &format!("rules_{pool}_{s}_{c}.tsv")),
                );
                info!(
                    "{pool} -> hp, support {support}, confidence {confidence}: {} rules",
                    run.rules().len()
                );
            }
        }
    }
}
