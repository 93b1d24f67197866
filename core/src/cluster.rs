//! Greedy single-pass FAQ clustering.
//!
//! Each unprocessed document seeds a cluster and absorbs every later,
//! still-unprocessed document whose keywords it overlaps by at least the
//! threshold (measured from the seed's side). A document consumed by a cluster
//! is never reconsidered, so results depend on input order. This is not a
//! connected-components clustering.

use crate::config::{CLUSTER_THRESHOLD, COMMON_KEYWORD_LIMIT};
use crate::overlap::overlap_ratio;
use crate::tokenizer::extract_keywords;
use crate::{AnswerSignal, Cluster, Document, FaqCluster, KeywordSequence};
use std::collections::{HashMap, HashSet};

pub fn cluster(documents: &[Document]) -> Vec<Cluster> {
    cluster_documents(documents, CLUSTER_THRESHOLD)
}

pub fn cluster_documents(documents: &[Document], threshold: f32) -> Vec<Cluster> {
    let keywords: Vec<KeywordSequence> = documents.iter().map(|d| extract_keywords(&d.text)).collect();
    let mut processed = vec![false; documents.len()];
    let mut clusters = Vec::new();

    for seed in 0..documents.len() {
        if processed[seed] { continue; }
        processed[seed] = true;
        let mut members = vec![seed];
        for other in seed + 1..documents.len() {
            if processed[other] { continue; }
            if overlap_ratio(&keywords[seed], &keywords[other]) >= threshold {
                members.push(other);
                processed[other] = true;
            }
        }
        if members.len() < 2 { continue; }

        let member_keywords: Vec<&KeywordSequence> = members.iter().map(|&i| &keywords[i]).collect();
        clusters.push(Cluster {
            representative_id: documents[seed].id.clone(),
            member_ids: members.iter().map(|&i| documents[i].id.clone()).collect(),
            common_keywords: common_keywords(&member_keywords),
            frequency: members.len(),
        });
    }

    // stable: equal-sized clusters keep discovery order
    clusters.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    tracing::debug!(documents = documents.len(), clusters = clusters.len(), threshold, "clustered documents");
    clusters
}

/// Keywords found in at least half of the members, by member count, top few.
fn common_keywords(members: &[&KeywordSequence]) -> Vec<String> {
    // keyword -> (members containing it, first-seen rank)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for seq in members {
        let mut seen_in_member: HashSet<&str> = HashSet::new();
        for term in seq.iter() {
            if !seen_in_member.insert(term.as_str()) { continue; }
            let rank = counts.len();
            counts.entry(term.as_str()).or_insert((0, rank)).0 += 1;
        }
    }
    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .filter(|(_, (count, _))| count * 2 >= members.len())
        .map(|(term, (count, rank))| (term, count, rank))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().take(COMMON_KEYWORD_LIMIT).map(|(term, _, _)| term.to_string()).collect()
}

/// Attach answer signals to clusters. Members without a signal are ignored for
/// the confidence average.
pub fn summarize(clusters: Vec<Cluster>, signals: &HashMap<String, AnswerSignal>) -> Vec<FaqCluster> {
    clusters
        .into_iter()
        .map(|cluster| {
            let member_signals: Vec<&AnswerSignal> =
                cluster.member_ids.iter().filter_map(|id| signals.get(id)).collect();
            let avg_confidence = if member_signals.is_empty() {
                None
            } else {
                let total: f32 = member_signals.iter().map(|s| s.confidence).sum();
                Some((total / member_signals.len() as f32).round().max(0.0) as u32)
            };
            let has_instructor_endorsement = member_signals.iter().any(|s| s.instructor_endorsed);
            FaqCluster { cluster, avg_confidence, has_instructor_endorsement }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<Document> {
        texts.iter().enumerate().map(|(i, t)| Document::new(format!("d{}", i + 1), *t)).collect()
    }

    #[test]
    fn singletons_are_dropped() {
        let clusters = cluster(&docs(&["quicksort pivot", "photosynthesis light", "tcp handshake"]));
        assert!(clusters.is_empty());
    }

    #[test]
    fn consumed_documents_are_not_reconsidered() {
        // d2 joins d1; d3 overlaps d2 fully but not d1 and must stay alone.
        let input = docs(&[
            "recursion base case",
            "recursion base case stack frames memory",
            "stack frames memory",
        ]);
        let clusters = cluster(&input);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].member_ids, vec!["d1", "d2"]);
    }

    #[test]
    fn overlap_is_measured_from_the_seed() {
        // seed has 5 keywords, candidate matches 1 of them: 0.2 from the seed side
        // even though the candidate's own keywords are fully covered.
        let input = docs(&["pointers arrays structs unions enums", "pointers"]);
        assert!(cluster(&input).is_empty());
        let reversed = docs(&["pointers", "pointers arrays structs unions enums"]);
        assert_eq!(cluster(&reversed).len(), 1);
    }

    #[test]
    fn sorted_by_frequency_descending() {
        let input = docs(&[
            "mutex deadlock threads",
            "linked list reversal",
            "linked list reversal recursion",
            "linked list reversal iterative",
            "mutex deadlock threads detection",
        ]);
        let clusters = cluster(&input);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].representative_id, "d2");
        assert_eq!(clusters[0].frequency, 3);
        assert_eq!(clusters[1].representative_id, "d1");
        assert_eq!(clusters[1].frequency, 2);
    }

    #[test]
    fn common_keywords_need_half_the_members() {
        let input = docs(&[
            "linked list reversal",
            "linked list reversal recursion",
            "linked list reversal iterative",
            "linked list reversal iterative",
        ]);
        let clusters = cluster(&input);
        assert_eq!(clusters[0].common_keywords, vec!["linked", "list", "reversal", "iterative"]);
    }

    #[test]
    fn common_keywords_capped() {
        let text = "alpha bravo charlie delta echo foxtrot golf";
        let clusters = cluster(&docs(&[text, text]));
        assert_eq!(clusters[0].common_keywords.len(), COMMON_KEYWORD_LIMIT);
        assert_eq!(clusters[0].common_keywords[0], "alpha");
    }

    #[test]
    fn summarize_passes_signals_through() {
        let clusters = cluster(&docs(&["heap sort", "heap sort", "heap sort"]));
        let mut signals = HashMap::new();
        signals.insert("d1".to_string(), AnswerSignal { confidence: 90.0, instructor_endorsed: false });
        signals.insert("d3".to_string(), AnswerSignal { confidence: 75.0, instructor_endorsed: true });
        let faq = summarize(clusters, &signals);
        assert_eq!(faq[0].avg_confidence, Some(83));
        assert!(faq[0].has_instructor_endorsement);
    }

    #[test]
    fn summarize_without_signals() {
        let faq = summarize(cluster(&docs(&["heap sort", "heap sort"])), &HashMap::new());
        assert_eq!(faq[0].avg_confidence, None);
        assert!(!faq[0].has_instructor_endorsement);
    }
}
