//! Tuning thresholds for duplicate detection, clustering and search.

use serde::Deserialize;

/// Minimum cosine similarity for a thread to count as a likely duplicate.
pub const DUPLICATE_THRESHOLD: f32 = 0.8;
/// Minimum directional overlap for a document to join a seed's cluster.
pub const CLUSTER_THRESHOLD: f32 = 0.4;
/// Minimum relevance score for question search.
pub const MIN_RELEVANCE: u32 = 20;
/// Minimum relevance score for course material search.
pub const MIN_MATERIAL_RELEVANCE: u32 = 30;
pub const SEARCH_LIMIT: usize = 20;
/// Raw query length after trimming, in characters.
pub const MIN_QUERY_CHARS: usize = 3;
pub const SNIPPET_CONTEXT_CHARS: usize = 50;
pub const SNIPPET_MAX_LENGTH: usize = 200;
pub const COMMON_KEYWORD_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub duplicate_threshold: f32,
    pub cluster_threshold: f32,
    pub min_relevance: u32,
    pub min_material_relevance: u32,
    pub search_limit: usize,
    pub snippet_max_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            duplicate_threshold: DUPLICATE_THRESHOLD,
            cluster_threshold: CLUSTER_THRESHOLD,
            min_relevance: MIN_RELEVANCE,
            min_material_relevance: MIN_MATERIAL_RELEVANCE,
            search_limit: SEARCH_LIMIT,
            snippet_max_length: SNIPPET_MAX_LENGTH,
        }
    }
}
