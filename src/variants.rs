//! Substitution variants of a name.

use crate::mapping::SubstitutionMap;
use itertools::Itertools;
use std::collections::BTreeSet;

/// Default cap on the number of substituted positions per variant.
pub const DEFAULT_MAX_SUBS: usize = 7;

/// Every distinct string obtained by substituting between 1 and `max_subs`
/// of the mappable characters of `source`.
///
/// Each combination of substitution positions is tried; positions that are
/// mappable but not chosen keep their original character. The unmodified
/// string is not part of the result unless a substitution reproduces it.
/// A string without mappable characters yields an empty set.
///
/// The number of strings built is the sum of `C(n, r)` for `r` in
/// `1..=max_subs`, `n` being the count of mappable characters.
pub fn generate_variants(
    source: &str,
    mapping: &SubstitutionMap,
    max_subs: usize,
) -> BTreeSet<String> {
    let chars: Vec<char> = source.chars().collect();
    let indices: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, ch)| mapping.contains(**ch))
        .map(|(i, _)| i)
        .collect();

    let mut variants = BTreeSet::new();
    for size in 1..=max_subs.min(indices.len()) {
        for combo in indices.iter().combinations(size) {
            let mut buffer = chars.clone();
            for &idx in combo {
                if let Some(replacement) = mapping.get(buffer[idx]) {
                    buffer[idx] = replacement;
                }
            }
            variants.insert(buffer.into_iter().collect::<String>());
        }
    }
    variants
}
