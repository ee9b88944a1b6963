//! Term extraction and edit distance for the search index.

use once_cell::sync::Lazy;
use regex::Regex;

/// Whitespace, space separators and punctuation all end a term.
static TERM_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\p{Z}\p{P}]+").unwrap());

/// Split text into lower-cased terms.
///
/// Field values and queries go through the same tokenizer so that a query
/// term and an indexed term are always comparable.
pub fn tokenize(text: &str) -> Vec<String> {
    TERM_SEPARATOR
        .split(text)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    if s1_chars.is_empty() {
        return s2_chars.len();
    }
    if s2_chars.is_empty() {
        return s1_chars.len();
    }

    let mut previous: Vec<usize> = (0..=s2_chars.len()).collect();
    let mut current = vec![0; s2_chars.len() + 1];

    for (i, c1) in s1_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, c2) in s2_chars.iter().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[s2_chars.len()]
}

/// Whether `s1` and `s2` are at most `max_distance` edits apart.
pub fn within_distance(s1: &str, s2: &str, max_distance: usize) -> bool {
    let len1 = s1.chars().count();
    let len2 = s2.chars().count();

    // The length gap alone is a lower bound on the distance.
    if len1.abs_diff(len2) > max_distance {
        return false;
    }

    levenshtein_distance(s1, s2) <= max_distance
}
