use std::collections::{BTreeSet, HashSet};

/// Fraction of `reference` tokens (with repetition) that occur anywhere in
/// `other`. Directional: `overlap_ratio(a, b)` and `overlap_ratio(b, a)` differ
/// in general. An empty reference scores 0.
pub fn overlap_ratio(reference: &[String], other: &[String]) -> f32 {
    if reference.is_empty() {
        return 0.0;
    }
    overlap_count(reference, other) as f32 / reference.len() as f32
}

/// Number of `reference` tokens (with repetition) that occur in `other`.
pub fn overlap_count(reference: &[String], other: &[String]) -> usize {
    let other: HashSet<&str> = other.iter().map(String::as_str).collect();
    reference.iter().filter(|t| other.contains(t.as_str())).count()
}

/// Distinct tokens of `reference` that occur in `other`.
pub fn matched_keywords(reference: &[String], other: &[String]) -> BTreeSet<String> {
    let other: HashSet<&str> = other.iter().map(String::as_str).collect();
    reference
        .iter()
        .filter(|t| other.contains(t.as_str()))
        .cloned()
        .collect()
}
