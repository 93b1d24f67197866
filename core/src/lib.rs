//! Lexical similarity, clustering and relevance ranking for course Q&A.
//!
//! Everything here is a pure function over caller-supplied snapshots: keyword
//! extraction, TF-IDF cosine matching for duplicate detection, the directional
//! overlap ratio, greedy FAQ clustering and relevance search.

pub mod cluster;
pub mod config;
pub mod error;
pub mod overlap;
pub mod rank;
pub mod tokenizer;
pub mod vectorize;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub use config::EngineConfig;
pub use error::{EngineError, Result};

/// Ordered keywords of one text. Repeated terms are kept.
pub type KeywordSequence = Vec<String>;

/// A searchable document built by the caller for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    /// Caller-concatenated searchable text, e.g. title + body + tags.
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }

    /// Join the non-empty fields with a single space.
    pub fn from_fields<S: AsRef<str>>(id: impl Into<String>, fields: &[S]) -> Self {
        let text = fields
            .iter()
            .map(|f| f.as_ref().trim())
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self { id: id.into(), text }
    }
}

/// A document whose keywords were extracted ahead of time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDocument {
    pub id: String,
    pub keywords: KeywordSequence,
}

impl PreparedDocument {
    pub fn from_document(doc: &Document) -> Self {
        Self { id: doc.id.clone(), keywords: tokenizer::extract_keywords(&doc.text) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityResult {
    pub id: String,
    pub similarity: f32, // in [0, 1]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    pub representative_id: String,
    pub member_ids: Vec<String>,
    pub common_keywords: Vec<String>,
    pub frequency: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub document_id: String,
    pub relevance_score: u32, // 0..=100
    pub matched_keywords: BTreeSet<String>,
}

/// AI-answer metadata for one document, passed through to FAQ clusters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnswerSignal {
    pub confidence: f32,
    #[serde(default)]
    pub instructor_endorsed: bool,
}

/// A cluster enriched with the answer signals of its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqCluster {
    #[serde(flatten)]
    pub cluster: Cluster,
    pub avg_confidence: Option<u32>,
    pub has_instructor_endorsement: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fields_skips_blank_parts() {
        let doc = Document::from_fields("t1", &["Binary search", "", "  ", "algorithms"]);
        assert_eq!(doc.text, "Binary search algorithms");
    }

    #[test]
    fn prepared_document_extracts_keywords() {
        let doc = Document::new("t1", "How does binary search work?");
        let prepared = PreparedDocument::from_document(&doc);
        assert_eq!(prepared.keywords, vec!["binary", "search", "work"]);
    }
}
