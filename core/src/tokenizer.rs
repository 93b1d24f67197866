use crate::KeywordSequence;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Tokens of this many characters or fewer are dropped.
const MAX_SHORT_TOKEN_CHARS: usize = 2;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"\W+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "the","and","but","nor","for","yet","because","while","also","just",
            "are","was","were","been","being","have","has","had","does","did","doing",
            "will","would","could","should","can","may","might","must","shall",
            "what","when","where","which","who","whom","whose","why","how",
            "this","that","these","those","there","here",
            "you","your","they","them","their","its","our",
            "with","from","into","about","than","then","any","some","not",
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Lowercase, split on non-word characters and drop short tokens and stopwords.
/// Repeated terms are kept in order.
pub fn extract_keywords(text: &str) -> KeywordSequence {
    let lowered = text.to_lowercase();
    NON_WORD
        .replace_all(&lowered, " ")
        .split_whitespace()
        .filter(|token| token.chars().count() > MAX_SHORT_TOKEN_CHARS)
        .filter(|token| !is_stopword(token))
        .map(str::to_string)
        .collect()
}
