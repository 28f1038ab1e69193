use std::collections::{HashMap, HashSet};
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ontomine::mining::{apriori, generate_rules, MiningConfig, Pool, Transactions};
use ontomine::{Namespace, Ontology};

type Hierarchy = HashMap<String, HashSet<String>>;

fn hierarchy(prefix: &str, size: usize) -> Hierarchy {
    (0..size)
        .map(|i| {
            let parents = if i == 0 {
                HashSet::new()
            } else {
                HashSet::from([format!("{prefix}:{}", (i - 1) / 4)])
            };
            (format!("{prefix}:{i}"), parents)
        })
        .collect()
}

fn annotations(prefix: &str, size: usize, genes: usize, seed: u64) -> Hierarchy {
    let mut state = seed;
    let mut term_to_genes = Hierarchy::new();
    for gene in 0..genes {
        for _ in 0..5 {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let term = (state >> 33) as usize % size;
            term_to_genes
                .entry(format!("{prefix}:{term}"))
                .or_default()
                .insert(format!("GENE{gene}"));
        }
    }
    term_to_genes
}

fn ontology() -> Ontology {
    let hp = hierarchy("HP", 2_000);
    let bp = hierarchy("GO", 2_000);
    Ontology::from_maps(
        &[
            (Namespace::Phenotype, &hp),
            (Namespace::BiologicalProcess, &bp),
        ],
        &[
            &annotations("HP", 2_000, 1_000, 7),
            &annotations("GO", 2_000, 1_000, 11),
        ],
    )
    .expect("the synthetic ontology is valid")
}

fn config() -> MiningConfig {
    MiningConfig::default()
        .with_min_support(0.01)
        .with_min_information_content(0.1)
        .with_left_pool(Pool::BiologicalProcess)
}

fn apriori_benchmark(c: &mut Criterion) {
    let ontology = ontology();
    let config = config();
    let transactions = Transactions::new(&ontology, &config.transaction_namespaces())
        .expect("transactions can be built");

    c.bench_function("apriori pairs", |b| {
        b.iter(|| {
            apriori(black_box(&ontology), black_box(&transactions), &config)
                .expect("mining succeeds")
                .len()
        })
    });
}

fn rules_benchmark(c: &mut Criterion) {
    let ontology = ontology();
    let config = config();
    let transactions = Transactions::new(&ontology, &config.transaction_namespaces())
        .expect("transactions can be built");
    let itemsets = apriori(&ontology, &transactions, &config).expect("mining succeeds");

    c.bench_function("association rules", |b| {
        b.iter(|| {
            generate_rules(
                black_box(&ontology),
                &transactions,
                black_box(itemsets.pairs()),
                &config,
            )
            .expect("rules can be generated")
            .len()
        })
    });
}

criterion_group! {
    name = mining;
    config = Criterion::default().sample_size(20).measurement_time(Duration::from_secs(10));
    targets = apriori_benchmark, rules_benchmark
}
criterion_main!(mining);
