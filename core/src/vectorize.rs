//! TF-IDF vectors over a query plus its candidate set, and cosine matching.

use crate::tokenizer::extract_keywords;
use crate::{Document, KeywordSequence, SimilarityResult};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

pub type TermVector = HashMap<String, f32>;

/// L2-normalized TF-IDF vectors for one comparison. The query counts as a
/// document of the IDF universe.
#[derive(Debug, Clone, Default)]
pub struct TermVectors {
    pub query: TermVector,
    pub candidates: Vec<TermVector>,
}

impl TermVectors {
    pub fn build(query: &[String], candidates: &[KeywordSequence]) -> Self {
        let n = (candidates.len() + 1) as f32;
        let mut df: HashMap<&str, u32> = HashMap::new();
        for seq in std::iter::once(query).chain(candidates.iter().map(Vec::as_slice)) {
            let seen_in_doc: HashSet<&str> = seq.iter().map(String::as_str).collect();
            for term in seen_in_doc {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let weigh = |seq: &[String]| -> TermVector {
            let mut tf_raw: HashMap<&str, u32> = HashMap::new();
            for term in seq {
                *tf_raw.entry(term.as_str()).or_insert(0) += 1;
            }
            let mut vector: TermVector = tf_raw
                .into_iter()
                .map(|(term, tf)| {
                    let df_t = df.get(term).copied().unwrap_or(1).max(1);
                    // smoothed so terms shared by every document keep a weight
                    let idf = (1.0 + n / df_t as f32).ln();
                    (term.to_string(), tf as f32 * idf)
                })
                .collect();
            normalize(&mut vector);
            vector
        };

        Self {
            query: weigh(query),
            candidates: candidates.iter().map(|seq| weigh(seq)).collect(),
        }
    }
}

fn magnitude(v: &TermVector) -> f32 {
    v.values().map(|w| w * w).sum::<f32>().sqrt()
}

fn normalize(v: &mut TermVector) {
    let norm = magnitude(v);
    if norm == 0.0 { return; }
    for w in v.values_mut() { *w /= norm; }
}

/// Cosine similarity in [0, 1]. A zero vector on either side yields 0.
pub fn cosine(a: &TermVector, b: &TermVector) -> f32 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f32 = small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|x| w * x))
        .sum();
    let denom = magnitude(a) * magnitude(b);
    if dot == 0.0 || denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    (dot / denom).clamp(0.0, 1.0)
}

/// Candidates whose similarity to `query` is at least `threshold`, most
/// similar first. Ties keep candidate order.
pub fn find_similar(query: &str, candidates: &[Document], threshold: f32) -> Vec<SimilarityResult> {
    if candidates.is_empty() {
        return Vec::new();
    }
    let query_keywords = extract_keywords(query);
    let candidate_keywords: Vec<KeywordSequence> =
        candidates.iter().map(|doc| extract_keywords(&doc.text)).collect();
    let vectors = TermVectors::build(&query_keywords, &candidate_keywords);

    let mut results: Vec<SimilarityResult> = candidates
        .iter()
        .zip(vectors.candidates.iter())
        .map(|(doc, vector)| SimilarityResult { id: doc.id.clone(), similarity: cosine(&vectors.query, vector) })
        .filter(|r| r.similarity >= threshold)
        .collect();
    results.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal));

    tracing::debug!(
        candidates = candidates.len(),
        query_terms = query_keywords.len(),
        matches = results.len(),
        threshold,
        "duplicate scan"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(text: &str) -> KeywordSequence { extract_keywords(text) }

    #[test]
    fn self_similarity_is_one() {
        let text = "Segmentation fault when freeing linked list nodes in C";
        let vectors = TermVectors::build(&kw(text), &[kw(text)]);
        let sim = cosine(&vectors.query, &vectors.candidates[0]);
        assert!((sim - 1.0).abs() < 1e-5, "got {sim}");
    }

    #[test]
    fn disjoint_documents_score_zero() {
        let vectors = TermVectors::build(&kw("pointer arithmetic"), &[kw("photosynthesis chloroplast")]);
        assert_eq!(cosine(&vectors.query, &vectors.candidates[0]), 0.0);
    }

    #[test]
    fn vectors_are_unit_length() {
        let vectors = TermVectors::build(&kw("graph graph traversal"), &[kw("graph coloring"), kw("tree traversal")]);
        for v in std::iter::once(&vectors.query).chain(vectors.candidates.iter()) {
            assert!((magnitude(v) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn empty_query_scores_zero_without_nan() {
        let docs = vec![Document::new("a", "hash tables"), Document::new("b", "hash maps")];
        let results = find_similar("what is the", &docs, 0.0);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.similarity == 0.0));
    }

    #[test]
    fn empty_candidates_give_empty_result() {
        assert!(find_similar("hash tables", &[], 0.0).is_empty());
    }

    #[test]
    fn results_sorted_descending_and_thresholded() {
        let docs = vec![
            Document::new("far", "dynamic programming knapsack"),
            Document::new("close", "binary search tree insertion"),
            Document::new("exact", "binary search tree insertion order"),
        ];
        let results = find_similar("binary search tree insertion order", &docs, 0.1);
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "close"]);
        assert!(results[0].similarity >= results[1].similarity);
    }
}
