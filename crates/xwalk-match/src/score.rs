//! The part-aware distance scorer.
//!
//! Scores how strongly two strings match; lower is better and negative
//! values are expected for good matches. Both strings are tokenized,
//! perfectly matching parts are removed and credited, and the remaining
//! parts are compared with a reordering minimum edit distance. Exact token
//! matches (street numbers, repeated words) therefore dominate the ranking
//! even when surrounded by noisy, differently-ordered tokens.

use rapidfuzz::distance::levenshtein;

use crate::text::normalized_parts;

/// Perfectly matched characters count double against the edit distance.
const PERFECT_MATCH_WEIGHT: i64 = 2;

const PART_SEPARATOR: &str = "-";

/// Scores two raw strings. Total over any inputs: empty strings and strings
/// with no extractable parts still produce a finite score.
pub fn part_distance(s1: &str, s2: &str) -> i64 {
    let parts1 = normalized_parts(s1);
    let parts2 = normalized_parts(s2);
    let (perfect_matches, min_distance) = distance_info(&parts1, &parts2);
    min_distance as i64 - PERFECT_MATCH_WEIGHT * perfect_matches as i64
}

/// Removes perfectly matching parts and measures what is left.
///
/// The elimination pass is an all-pairs scan, not a one-to-one assignment:
/// every matching `(i, j)` pair credits `max(len_i, len_j)` characters, and
/// an index is removed at most once no matter how many pairs it joins.
/// Returns `(perfect_match_characters, min_edit_distance_of_remainder)`.
fn distance_info(parts1: &[String], parts2: &[String]) -> (usize, usize) {
    let mut remove1 = vec![false; parts1.len()];
    let mut remove2 = vec![false; parts2.len()];

    let mut perfect_matches = 0usize;
    for (i, part1) in parts1.iter().enumerate() {
        for (j, part2) in parts2.iter().enumerate() {
            if perfect_match(part1, part2) {
                remove1[i] = true;
                remove2[j] = true;
                perfect_matches += part1.len().max(part2.len());
            }
        }
    }

    let remaining1 = keep_unflagged(parts1, &remove1);
    let remaining2 = keep_unflagged(parts2, &remove2);

    // The greedy search is asymmetric, so both directions are tried.
    let min_distance = greedy_reorder_distance(&remaining1, &remaining2)
        .min(greedy_reorder_distance(&remaining2, &remaining1));

    (perfect_matches, min_distance)
}

fn keep_unflagged<'a>(parts: &'a [String], flags: &[bool]) -> Vec<&'a str> {
    parts
        .iter()
        .zip(flags)
        .filter(|(_, flagged)| !**flagged)
        .map(|(part, _)| part.as_str())
        .collect()
}

/// Exact part equality. All-digit parts compare numerically so that
/// `"007"` matches `"7"` at any length.
fn perfect_match(part1: &str, part2: &str) -> bool {
    if is_numeric(part1) && is_numeric(part2) {
        return strip_leading_zeros(part1) == strip_leading_zeros(part2);
    }
    part1 == part2
}

fn is_numeric(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit())
}

fn strip_leading_zeros(part: &str) -> &str {
    let stripped = part.trim_start_matches('0');
    if stripped.is_empty() { "0" } else { stripped }
}

/// Minimum edit distance over reorderings of `parts`, found by a greedy
/// insertion-sort-style local search: for each position `i`, left to right,
/// every swap with a later position `j` is evaluated against the fixed
/// joined target and the best swap is committed before moving on. Exhaustive
/// permutation search is too expensive for strings with many parts; this
/// yields a local minimum. The first `j` reaching the strict minimum wins a
/// tie, and a swap is committed at every position. This procedure is
/// normative for ranking-order compatibility.
fn greedy_reorder_distance(parts: &[&str], target_parts: &[&str]) -> usize {
    let target = target_parts.join(PART_SEPARATOR);
    let mut ordered: Vec<&str> = parts.to_vec();

    for i in 0..ordered.len().saturating_sub(1) {
        let mut best_distance = usize::MAX;
        let mut best_index = i + 1;
        for j in i + 1..ordered.len() {
            let mut trial = ordered.clone();
            trial.swap(i, j);
            let distance = edit_distance(&trial.join(PART_SEPARATOR), &target);
            if distance < best_distance {
                best_distance = distance;
                best_index = j;
            }
        }
        ordered.swap(i, best_index);
    }

    edit_distance(&ordered.join(PART_SEPARATOR), &target)
}

fn edit_distance(a: &str, b: &str) -> usize {
    levenshtein::distance(a.chars(), b.chars())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_all_perfect_matches() {
        // "ward" (4) + "1" (1) perfectly matched, nothing remaining.
        assert_eq!(part_distance("Ward 1", "ward_1"), -10);
        assert_eq!(part_distance("Ward 1", "Ward 1"), -10);
    }

    #[test]
    fn appended_noise_scores_worse_than_exact() {
        let exact = part_distance("East Atlanta", "East Atlanta");
        let noisy = part_distance("East Atlanta", "East Atlanta zzz");
        assert!(exact < noisy);
    }

    #[test]
    fn numeric_parts_match_despite_leading_zeros() {
        assert_eq!(part_distance("007", "7"), -6);
        assert!(part_distance("Precinct 007", "Precinct 7") <= part_distance("Precinct 007", "Precinct 8"));
    }

    #[test]
    fn concatenated_tokens_are_not_perfect_matches() {
        // "WARD1" is a single part and matches neither "ward" nor "1"
        // exactly, while "Ward Two" still gets the full "ward" credit.
        assert_eq!(part_distance("Ward 1", "WARD1"), 1);
        assert_eq!(part_distance("Ward 1", "Ward Two"), -5);
    }

    #[test]
    fn reordering_finds_transposed_parts() {
        // No perfect matches; the greedy swap lines up "abc"/"abd" and
        // "xyz"/"xyy" leaving two substitutions.
        assert_eq!(part_distance("abc xyz", "xyy abd"), 2);
    }

    #[test]
    fn duplicate_parts_credit_every_matching_pair() {
        // One "zzz" against two accumulates the max length per pair.
        assert_eq!(part_distance("zzz", "zzz zzz"), -12);
    }

    #[test]
    fn empty_inputs_are_finite() {
        assert_eq!(part_distance("", ""), 0);
        assert_eq!(part_distance("", "abc"), 3);
        assert_eq!(part_distance("!!!", "abc"), 3);
        assert_eq!(part_distance("!!!", "..."), 0);
    }
}
