//! Name similarity scoring on a 0-100 scale.
//!
//! The score is a weighted best-of over a plain ratio, a sliding-window
//! partial ratio and token-order-insensitive ratios, all built on the Indel
//! normalized similarity. Partial and token ratios are discounted so a
//! verbatim match always outranks them.

use std::collections::BTreeSet;

use rapidfuzz::distance::indel;
use unidecode::unidecode;

const TOKEN_SCALE: f64 = 0.95;
const PARTIAL_SCALE: f64 = 0.9;
const LONG_PARTIAL_SCALE: f64 = 0.6;

/// Transliterates to ASCII, lower-cases, and collapses punctuation and
/// whitespace into single spaces.
pub fn normalize_name(raw: &str) -> String {
    let ascii = unidecode(raw).to_lowercase();
    let spaced: String = ascii
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { ' ' })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    indel::normalized_similarity(a.chars(), b.chars()) * 100.0
}

/// Best ratio of the shorter string against every equally long window of
/// the longer one.
fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    if short.is_empty() {
        return 0.0;
    }
    let long: Vec<char> = long.chars().collect();
    let width = short.chars().count();
    long.windows(width)
        .map(|window| indel::normalized_similarity(short.chars(), window.iter().copied()) * 100.0)
        .fold(0.0, f64::max)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Token-set comparison: the shared tokens against each side's full set.
fn token_set(a: &str, b: &str, scorer: fn(&str, &str) -> f64) -> f64 {
    let left: BTreeSet<&str> = a.split_whitespace().collect();
    let right: BTreeSet<&str> = b.split_whitespace().collect();
    let shared = left.intersection(&right).copied().collect::<Vec<_>>().join(" ");
    let only_left = left.difference(&right).copied().collect::<Vec<_>>().join(" ");
    let only_right = right.difference(&left).copied().collect::<Vec<_>>().join(" ");

    let join = |head: &str, tail: &str| {
        [head, tail]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    };
    let full_left = join(&shared, &only_left);
    let full_right = join(&shared, &only_right);

    [
        scorer(&shared, &full_left),
        scorer(&shared, &full_right),
        scorer(&full_left, &full_right),
    ]
    .into_iter()
    .fold(0.0, f64::max)
}

/// Similarity of two already-normalized names in `[0, 100]`.
///
/// Identical names score 100; either side empty scores 0.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let base = ratio(a, b);
    let (len_a, len_b) = (a.chars().count() as f64, b.chars().count() as f64);
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);

    if len_ratio < 1.5 {
        let sort = ratio(&sorted_tokens(a), &sorted_tokens(b)) * TOKEN_SCALE;
        let set = token_set(a, b, ratio) * TOKEN_SCALE;
        return base.max(sort).max(set);
    }

    let scale = if len_ratio > 8.0 {
        LONG_PARTIAL_SCALE
    } else {
        PARTIAL_SCALE
    };
    let partial = partial_ratio(a, b) * scale;
    let sort = partial_ratio(&sorted_tokens(a), &sorted_tokens(b)) * TOKEN_SCALE * scale;
    let set = token_set(a, b, partial_ratio) * TOKEN_SCALE * scale;
    base.max(partial).max(sort).max(set)
}
