use criterion::{criterion_group, criterion_main, Criterion};
use qa_core::cluster::cluster;
use qa_core::tokenizer::extract_keywords;
use qa_core::Document;

const TOPICS: &[&str] = &[
    "binary search tree insertion",
    "dynamic programming knapsack memoization",
    "linked list reversal recursion",
    "mutex deadlock threads",
    "pointer arithmetic overflow",
];

fn corpus(n: usize) -> Vec<Document> {
    (0..n)
        .map(|i| Document::new(i.to_string(), format!("{} question {}", TOPICS[i % TOPICS.len()], i)))
        .collect()
}

fn bench_extract(c: &mut Criterion) {
    let text = TOPICS.join(". ").repeat(50);
    c.bench_function("extract_keywords", |b| b.iter(|| extract_keywords(&text)));
}

fn bench_cluster(c: &mut Criterion) {
    let docs = corpus(300);
    c.bench_function("cluster_300", |b| b.iter(|| cluster(&docs)));
}

criterion_group!(benches, bench_extract, bench_cluster);
criterion_main!(benches);
