//! Anagram counting over a tree of text files
//!
//! Every word longer than the minimum length and made only of ASCII letters
//! and digits is keyed by its signature: its lowercase characters in sorted
//! order. Words that are anagrams of each other share a signature, so the
//! size of a signature's group is the number of words in that anagram class.

pub mod job;
pub mod strategy;

pub use job::FileJob;
pub use strategy::AnagramStrategy;

use crate::pipeline::Pair;

/// Words must be strictly longer than this many characters by default
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 3;

/// Input files are selected by this extension by default
pub const DEFAULT_EXTENSION: &str = "txt";

/// Sorted lowercase characters of `token`
pub fn signature(token: &str) -> String {
    let mut chars: Vec<char> = token.to_lowercase().chars().collect();
    chars.sort_unstable();
    chars.into_iter().collect()
}

/// Whether `token` takes part in anagram counting
pub fn is_candidate(token: &str, min_token_length: usize) -> bool {
    token.len() > min_token_length && token.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Candidate words of one line, in order
pub fn candidates(line: &str, min_token_length: usize) -> impl Iterator<Item = &str> {
    line.split_whitespace()
        .filter(move |token| is_candidate(token, min_token_length))
}

/// The `(signature, lowercase word)` pair for a candidate word
pub fn anagram_pair(token: &str) -> Pair<String, String> {
    Pair::new(signature(token), token.to_lowercase())
}
