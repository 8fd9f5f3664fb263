
use serde::{Deserialize, Serialize};

/// Longest word run shared by the end of one chunk and the start of the next.
///
/// `start` keeps the casing of the following chunk, `end` the casing of the
/// preceding one; they only differ in case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlap {
    pub start: String,
    pub end: String,
}

/// Find the longest case-insensitive match between the last words of `prev`
/// and the first words of `next`, considering at most `max_words` words.
#[inline]
pub fn find_overlap(prev: &str, next: &str, max_words: usize) -> Option<Overlap> {
    let prev_words = prev.split_whitespace().collect::<Vec<_>>();
    let next_words = next.split_whitespace().collect::<Vec<_>>();

    // A prefix shorter than the suffix can never match, so cap at both lengths
    let longest = max_words.min(prev_words.len()).min(next_words.len());

    (1..=longest).rev().find_map(|len| {
        let end = prev_words[prev_words.len() - len..].join(" ");
        let start = next_words[..len].join(" ");
        (end.to_lowercase() == start.to_lowercase()).then_some(Overlap { start, end })
    })
}
