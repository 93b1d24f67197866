use qa_core::cluster::cluster;
use qa_core::config::DUPLICATE_THRESHOLD;
use qa_core::rank::{search, SearchOptions};
use qa_core::vectorize::find_similar;
use qa_core::{Document, EngineError};
use std::collections::HashSet;

#[test]
fn search_ranks_matching_question() {
    let candidates = vec![
        Document::new("q1", "How does binary search work?"),
        Document::new("q2", "What is recursion?"),
    ];
    let results = search("binary search algorithm", &candidates, SearchOptions::default()).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document_id, "q1");
    assert!(results[0].relevance_score >= 50);
    assert!(results[0].matched_keywords.contains("binary"));
    assert!(results[0].matched_keywords.contains("search"));
}

#[test]
fn duplicate_detection_finds_near_identical_thread() {
    let new_thread = Document::from_fields(
        "draft",
        &["How do I implement binary search in Python recursively?", "My recursive binary search never terminates.", "python recursion"],
    );
    let candidates = vec![
        Document::from_fields(
            "t-dup",
            &["How to implement recursive binary search in Python?", "My binary search recursively never terminates.", "python recursion"],
        ),
        Document::from_fields("t-other", &["Lab 3 due date", "Is the pointers lab due Friday or Monday?", "logistics"]),
    ];
    let results = find_similar(&new_thread.text, &candidates, DUPLICATE_THRESHOLD);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "t-dup");
    assert!(results[0].similarity >= 0.8, "similarity {}", results[0].similarity);
}

#[test]
fn clustering_groups_overlapping_prefix_only() {
    let docs = vec![
        Document::new("1", "binary search tree insertion"),
        Document::new("2", "binary search tree deletion"),
        Document::new("3", "binary search tree balancing insertion"),
        Document::new("4", "photosynthesis light reactions"),
        Document::new("5", "french revolution causes"),
    ];
    let clusters = cluster(&docs);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].frequency, 3);
    assert_eq!(clusters[0].representative_id, "1");
    assert_eq!(clusters[0].member_ids, vec!["1", "2", "3"]);
}

#[test]
fn clusters_never_share_documents() {
    let texts = [
        "array index bounds", "array index error", "index bounds checking",
        "array bounds", "pointer arithmetic", "pointer arithmetic overflow",
        "arithmetic overflow", "index error",
    ];
    let docs: Vec<Document> = texts.iter().enumerate().map(|(i, t)| Document::new(i.to_string(), *t)).collect();
    let clusters = cluster(&docs);
    let mut seen = HashSet::new();
    for c in &clusters {
        assert!(c.member_ids.len() >= 2);
        assert_eq!(c.frequency, c.member_ids.len());
        for id in &c.member_ids {
            assert!(seen.insert(id.clone()), "{id} in two clusters");
        }
    }
    assert!(clusters.windows(2).all(|w| w[0].frequency >= w[1].frequency));
}

#[test]
fn short_and_stopword_queries() {
    let candidates = vec![Document::new("q1", "the and or")];
    let err = search("ab", &candidates, SearchOptions::default()).unwrap_err();
    assert!(matches!(err, EngineError::QueryTooShort { .. }));

    let results = search("the and", &candidates, SearchOptions::default()).unwrap();
    assert!(results.is_empty());
}
