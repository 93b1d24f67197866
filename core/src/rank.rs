//! Keyword relevance search and snippet extraction.

use crate::config::{MIN_QUERY_CHARS, MIN_RELEVANCE, SEARCH_LIMIT, SNIPPET_CONTEXT_CHARS};
use crate::error::{EngineError, Result};
use crate::overlap::{matched_keywords, overlap_count};
use crate::tokenizer::extract_keywords;
use crate::{Document, PreparedDocument, SearchResult};
use regex::RegexBuilder;
use std::cmp::Reverse;

const ELLIPSIS: char = '…';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub min_relevance: u32,
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { min_relevance: MIN_RELEVANCE, limit: SEARCH_LIMIT }
    }
}

/// Reject queries shorter than the minimum after trimming. Counts raw
/// characters, not keywords.
pub fn validate_query(query: &str) -> Result<()> {
    let len = query.trim().chars().count();
    if len < MIN_QUERY_CHARS {
        return Err(EngineError::QueryTooShort { len, min: MIN_QUERY_CHARS });
    }
    Ok(())
}

pub fn search(query: &str, candidates: &[Document], opts: SearchOptions) -> Result<Vec<SearchResult>> {
    let prepared: Vec<PreparedDocument> = candidates.iter().map(PreparedDocument::from_document).collect();
    search_prepared(query, &prepared, opts)
}

/// Same as [`search`] over documents whose keywords are already extracted.
pub fn search_prepared<'a, I>(query: &str, candidates: I, opts: SearchOptions) -> Result<Vec<SearchResult>>
where
    I: IntoIterator<Item = &'a PreparedDocument>,
{
    validate_query(query)?;
    let query_keywords = extract_keywords(query);

    let mut scanned = 0usize;
    let mut results: Vec<SearchResult> = candidates
        .into_iter()
        .inspect(|_| scanned += 1)
        .map(|doc| SearchResult {
            document_id: doc.id.clone(),
            relevance_score: relevance_score(&query_keywords, &doc.keywords),
            matched_keywords: matched_keywords(&query_keywords, &doc.keywords),
        })
        .filter(|r| r.relevance_score >= opts.min_relevance)
        .collect();
    // stable on ties
    results.sort_by_key(|r| Reverse(r.relevance_score));
    let total_hits = results.len();
    results.truncate(opts.limit);

    tracing::debug!(
        query_terms = query_keywords.len(),
        candidates = scanned,
        total_hits,
        returned = results.len(),
        "relevance search"
    );
    Ok(results)
}

/// Percentage of query keywords found in the document, rounded. 0 for an empty query.
/// Integer arithmetic, so exact halves round up.
pub fn relevance_score(query_keywords: &[String], doc_keywords: &[String]) -> u32 {
    let len = query_keywords.len();
    if len == 0 {
        return 0;
    }
    let matches = overlap_count(query_keywords, doc_keywords);
    ((matches * 200 + len) / (2 * len)) as u32
}

/// Window of `content` around the first case-insensitive occurrence of any
/// keyword, or its head when none occurs. Offsets and lengths are in chars.
pub fn snippet<I, S>(content: &str, keywords: I, max_length: usize) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let chars: Vec<char> = content.chars().collect();
    // lowercasing may expand a char; keep the original index of each lowered char
    let lowered: Vec<(usize, char)> = chars
        .iter()
        .enumerate()
        .flat_map(|(i, c)| c.to_lowercase().map(move |l| (i, l)))
        .collect();
    let first = keywords
        .into_iter()
        .filter_map(|k| find_lowered(&lowered, k.as_ref()))
        .min();

    match first {
        Some(offset) => {
            let start = offset.saturating_sub(SNIPPET_CONTEXT_CHARS);
            let end = (start + max_length).min(chars.len());
            let mut out = String::new();
            if start > 0 { out.push(ELLIPSIS); }
            out.extend(&chars[start..end]);
            if end < chars.len() { out.push(ELLIPSIS); }
            out
        }
        None => {
            let mut out: String = chars.iter().take(max_length).collect();
            if chars.len() > max_length { out.push(ELLIPSIS); }
            out
        }
    }
}

fn find_lowered(lowered: &[(usize, char)], keyword: &str) -> Option<usize> {
    let needle: Vec<char> = keyword.to_lowercase().chars().collect();
    if needle.is_empty() || needle.len() > lowered.len() {
        return None;
    }
    lowered
        .windows(needle.len())
        .position(|w| w.iter().map(|(_, c)| c).eq(needle.iter()))
        .map(|pos| lowered[pos].0)
}

/// Wrap case-insensitive keyword occurrences in `<mark>` tags.
pub fn highlight<I, S>(snippet: &str, keywords: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut terms: Vec<String> = keywords
        .into_iter()
        .map(|k| k.as_ref().trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    if terms.is_empty() {
        return snippet.to_string();
    }
    // longest first so a keyword never splits a longer one it prefixes
    terms.sort_by_key(|t| Reverse(t.chars().count()));
    let alternation = terms.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    let pattern = format!(r"\b(?:{alternation})\b");
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(pat) => pat
            .replace_all(snippet, |caps: &regex::Captures| format!("<mark>{}</mark>", &caps[0]))
            .into_owned(),
        Err(err) => {
            tracing::warn!(%err, "highlight pattern rejected");
            snippet.to_string()
        }
    }
}
