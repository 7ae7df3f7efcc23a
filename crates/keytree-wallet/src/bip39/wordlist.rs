//! The 2048-word English mnemonic wordlist.
//!
//! The list is alphabetically sorted, so word lookup is a binary
//! search over the static table.

use std::sync::LazyLock;

/// Newline-separated wordlist resource, in canonical order.
const WORDLIST_RAW: &str = include_str!("english.txt");

/// Number of words in the list; each word encodes 11 bits.
pub const WORDLIST_LEN: usize = 2048;

/// The English words indexed by their 11-bit value.
pub(crate) static WORDS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let words: Vec<&'static str> = WORDLIST_RAW.lines().collect();
    debug_assert_eq!(words.len(), WORDLIST_LEN);
    words
});

/// Looks up the 11-bit index of a word, if it is in the list.
pub(crate) fn index_of(word: &str) -> Option<usize> {
    WORDS.binary_search(&word).ok()
}
