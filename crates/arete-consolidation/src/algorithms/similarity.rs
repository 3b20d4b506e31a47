//! String normalization and Jaro-Winkler similarity in [0, 1].

use arete_core::config::defaults;
use arete_core::constants::{WINKLER_MAX_PREFIX, WINKLER_PREFIX_SCALE};

/// Minimum score for [`find_best_match`] when the caller has no preference.
pub const DEFAULT_MATCH_THRESHOLD: f64 = defaults::DEFAULT_MATCH_THRESHOLD;

/// Lowercase, drop punctuation, collapse whitespace runs, trim.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Jaro-Winkler similarity of two texts after normalization.
///
/// Equal normalized texts score 1 (two empty texts included). Exactly one
/// empty text scores 0. Symmetric.
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_similarity(&normalize(a), &normalize(b))
}

/// [`similarity`] for inputs that are already normalized.
pub(crate) fn normalized_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    // Greedy matching depends on argument order; fix it so the score is symmetric.
    if a <= b {
        jaro_winkler(&a, &b)
    } else {
        jaro_winkler(&b, &a)
    }
}

fn jaro_winkler(a: &[char], b: &[char]) -> f64 {
    let jaro = jaro(a, b);
    let prefix = a
        .iter()
        .zip(b)
        .take(WINKLER_MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count();
    (jaro + prefix as f64 * WINKLER_PREFIX_SCALE * (1.0 - jaro)).clamp(0.0, 1.0)
}

/// Plain Jaro similarity over non-empty char slices.
fn jaro(a: &[char], b: &[char]) -> f64 {
    let window = (a.len().max(b.len()) / 2).saturating_sub(1);

    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, ca) in a.iter().enumerate() {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(b.len());
        for j in lo..hi {
            if !b_matched[j] && b[j] == *ca {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    let a_seq = a.iter().zip(&a_matched).filter(|(_, m)| **m).map(|(c, _)| c);
    let b_seq = b.iter().zip(&b_matched).filter(|(_, m)| **m).map(|(c, _)| c);
    let half_transpositions = a_seq.zip(b_seq).filter(|(x, y)| x != y).count();
    let transpositions = half_transpositions as f64 / 2.0;

    let m = matches as f64;
    (m / a.len() as f64 + m / b.len() as f64 + (m - transpositions) / m) / 3.0
}

/// Candidate with the highest similarity to `query`, if any reaches `threshold`.
///
/// Ties keep the first candidate encountered. Returns the candidate and its score.
pub fn find_best_match<'a, T, F>(
    query: &str,
    candidates: &'a [T],
    key: F,
    threshold: f64,
) -> Option<(&'a T, f64)>
where
    F: Fn(&T) -> &str,
{
    let mut best: Option<(&'a T, f64)> = None;
    for candidate in candidates {
        let score = similarity(query, key(candidate));
        if score < threshold {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }
    best
}
