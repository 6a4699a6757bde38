//! Per-contig suffix-index engine: builds a suffix array directly over a
//! contig's raw bytes, the way the Go source builds one over `[]byte` via
//! `index/suffixarray`, and answers `lookup` queries by binary search over
//! that array. The array is built once in the indexer stage and carried
//! as plain owned data (`Vec<u32>`) across the channel to the matcher
//! stage, so there is no self-referential borrow between it and the
//! contig it was built from.

use std::cmp::Ordering;

/// Builds the suffix array (an ordering of every suffix start position, by
/// lexicographic order of the suffix) over `sequence`, by prefix-doubling:
/// each pass doubles the prefix length ranks are compared over, so it
/// converges in `O(log n)` passes regardless of the byte alphabet. Operates
/// on raw bytes with no encoding requirement — a contig's sequence (spec.md
/// §3) may contain any byte; unrecognized ones simply never match a primer
/// expansion, they are not a construction-time error.
pub fn build_suffix_array(sequence: &[u8]) -> Vec<u32> {
    let n = sequence.len();
    if n == 0 {
        return Vec::new();
    }

    let mut suffix_array: Vec<u32> = (0..n as u32).collect();
    let mut rank: Vec<i32> = sequence.iter().map(|&b| b as i32).collect();
    let mut next_rank = vec![0i32; n];
    let mut k = 1usize;

    loop {
        let rank_at = |rank: &[i32], i: usize| -> i32 {
            if i < n { rank[i] } else { -1 }
        };
        let key = |rank: &[i32], s: usize| (rank[s], rank_at(rank, s + k));

        suffix_array.sort_unstable_by(|&a, &b| {
            key(&rank, a as usize).cmp(&key(&rank, b as usize))
        });

        next_rank[suffix_array[0] as usize] = 0;
        for i in 1..n {
            let prev = suffix_array[i - 1] as usize;
            let curr = suffix_array[i] as usize;
            let bump = if key(&rank, prev) == key(&rank, curr) { 0 } else { 1 };
            next_rank[curr] = next_rank[prev] + bump;
        }
        rank.copy_from_slice(&next_rank);

        if rank[suffix_array[n - 1] as usize] as usize == n - 1 {
            break;
        }
        k *= 2;
    }

    suffix_array
}

/// All zero-based start positions at which `pattern` occurs in
/// `sequence`, overlapping occurrences included, found by binary search
/// over `suffix_array`. Returns an empty list for an empty pattern or a
/// pattern longer than `sequence`; returned order is unspecified (callers
/// that need determinism should sort the result).
pub fn lookup(sequence: &[u8], suffix_array: &[u32], pattern: &[u8]) -> Vec<usize> {
    if pattern.is_empty() || pattern.len() > sequence.len() {
        return Vec::new();
    }

    let lo = partition_point(suffix_array, |s| {
        compare_prefix(sequence, s, pattern) == Ordering::Less
    });
    let hi = partition_point(suffix_array, |s| {
        compare_prefix(sequence, s, pattern) != Ordering::Greater
    });

    suffix_array[lo..hi].iter().map(|&s| s as usize).collect()
}

/// Compares the suffix starting at `suffix_array[index]` against
/// `pattern`, truncated to `pattern`'s length: `Less`/`Greater` reflect
/// lexicographic order of the shared prefix, `Equal` means the suffix
/// starts with `pattern`.
fn compare_prefix(sequence: &[u8], suffix_start: u32, pattern: &[u8]) -> Ordering {
    let suffix = &sequence[suffix_start as usize..];
    if suffix.len() < pattern.len() {
        match suffix.cmp(&pattern[..suffix.len()]) {
            Ordering::Equal => Ordering::Less,
            other => other,
        }
    } else {
        suffix[..pattern.len()].cmp(pattern)
    }
}

/// The smallest index `i` in `suffix_array` such that `pred(suffix_array[i])`
/// no longer holds, i.e. a standard binary-search partition point: `pred`
/// must be `true` for a prefix of `suffix_array` and `false` for the rest.
/// `lookup` calls this once with `pred` true on everything ordered strictly
/// before `pattern` (the lower bound of the matching range) and once with
/// `pred` true on everything not ordered strictly after it (the upper
/// bound) — the two predicates have opposite monotonicity over the array,
/// so each is threaded through explicitly rather than compared against a
/// single `Ordering` value.
fn partition_point(suffix_array: &[u32], pred: impl Fn(u32) -> bool) -> usize {
    let mut lo = 0usize;
    let mut hi = suffix_array.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(suffix_array[mid]) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions_sorted(sequence: &str, pattern: &str) -> Vec<usize> {
        let array = build_suffix_array(sequence.as_bytes());
        let mut positions = lookup(sequence.as_bytes(), &array, pattern.as_bytes());
        positions.sort_unstable();
        positions
    }

    #[test]
    fn finds_overlapping_occurrences() {
        assert_eq!(positions_sorted("AAAA", "AA"), vec![0, 1, 2]);
    }

    #[test]
    fn empty_pattern_returns_empty() {
        assert_eq!(positions_sorted("ACGT", ""), Vec::<usize>::new());
    }

    #[test]
    fn pattern_longer_than_sequence_returns_empty() {
        assert_eq!(positions_sorted("ACGT", "ACGTACGT"), Vec::<usize>::new());
    }

    #[test]
    fn finds_single_occurrence() {
        assert_eq!(positions_sorted("AAAACGTTTTGCAT", "ACGT"), vec![3]);
    }

    #[test]
    fn pattern_equal_to_full_sequence_matches_once() {
        assert_eq!(positions_sorted("ACGT", "ACGT"), vec![0]);
    }

    #[test]
    fn no_match_returns_empty() {
        assert_eq!(positions_sorted("AAAA", "CGT"), Vec::<usize>::new());
    }
}
