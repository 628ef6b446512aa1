//! Longest-matching-blocks similarity ratio.
//!
//! The score is `2 * M / (len(a) + len(b))` expressed as a percentage, where
//! `M` is the number of characters covered by matching blocks. Blocks are
//! found greedily: the longest common run first, then the same search on
//! the remainders to its left and right.

use crate::normalize::fold_case;
use std::collections::HashMap;

/// Case-insensitive similarity in `[0, 100]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = fold_case(a);
    let b = fold_case(b);
    // Tie-breaking in the block search depends on argument order; a fixed
    // order keeps the score symmetric.
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let first: Vec<char> = first.chars().collect();
    let second: Vec<char> = second.chars().collect();

    let total = first.len() + second.len();
    if total == 0 {
        return 100.0;
    }
    let matched = matched_chars(&first, &second);
    200.0 * matched as f64 / total as f64
}

/// Total size of the matching blocks between `a` and `b`.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, ch) in b.iter().enumerate() {
        positions.entry(*ch).or_default().push(j);
    }

    let mut matched = 0usize;
    let mut queue = vec![(0usize, a.len(), 0usize, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, size) = longest_match(a, &positions, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            queue.push((i + size, ahi, j + size, bhi));
        }
    }
    matched
}

/// Longest common run of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Returns `(i, j, size)`; among runs of equal size the one starting
/// earliest in `a`, then earliest in `b`, wins.
fn longest_match(
    a: &[char],
    positions: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
    // run length of the match ending at b[j] for the previous row of a
    let mut run_by_j: HashMap<usize, usize> = HashMap::new();
    for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_run: HashMap<usize, usize> = HashMap::new();
        if let Some(js) = positions.get(ch) {
            for &j in js {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let run = j
                    .checked_sub(1)
                    .and_then(|prev| run_by_j.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_run.insert(j, run);
                if run > best_size {
                    best_i = i + 1 - run;
                    best_j = j + 1 - run;
                    best_size = run;
                }
            }
        }
        run_by_j = next_run;
    }
    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_identical_strings() {
        assert_close(similarity("Иванов Иван", "Иванов Иван"), 100.0);
        assert_close(similarity("a", "a"), 100.0);
    }

    #[test]
    fn test_case_insensitive() {
        assert_close(similarity("ӘСЕТ", "әсет"), 100.0);
    }

    #[test]
    fn test_both_empty() {
        assert_close(similarity("", ""), 100.0);
    }

    #[test]
    fn test_one_empty() {
        assert_close(similarity("", "abc"), 0.0);
    }

    #[test]
    fn test_disjoint() {
        assert_close(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        // "bcd" is the only block
        assert_close(similarity("abcd", "bcde"), 75.0);
        // "ab" then "cd" on the right remainder
        assert_close(similarity("abxcd", "abcd"), 800.0 / 9.0);
    }

    #[test]
    fn test_name_inside_stem() {
        // 6 of 6 + 11 characters
        assert_close(similarity("Иванов", "иванов иван"), 1200.0 / 17.0);
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ("abxcd", "abcd"),
            ("Асан Болатов", "bolatov_asan"),
            ("abab", "baba"),
            ("Қуанов Әсет", "Куанов Асет 2021"),
        ];
        for (a, b) in pairs {
            assert_close(similarity(a, b), similarity(b, a));
        }
    }

    #[test]
    fn test_range() {
        let score = similarity("Болатов Асан", "Болатов_Асан_фото");
        assert!(score > 0.0 && score < 100.0);
    }
}
