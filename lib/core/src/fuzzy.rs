//! Fuzzy string ratios
//!
//! Both scores are on a 0-100 scale and operate on Unicode scalar values, so
//! a Hangul syllable counts as one character.
//!
//! - [`ratio`]: normalized InDel similarity of the full strings
//! - [`partial_ratio`]: best [`ratio`] of the shorter string against any
//!   same-length window of the longer one

use ahash::AHashSet;

/// Length of the longest common subsequence of two char slices
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// Normalized InDel similarity: `100 * 2 * LCS / (len(a) + len(b))`.
///
/// Two empty strings are identical and score 100.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Substring-tolerant similarity.
///
/// The shorter string is aligned against every window of the longer one,
/// including the shortened windows at either end, and the best [`ratio`] is
/// kept. Windows whose boundary character does not occur in the shorter
/// string cannot improve the score and are skipped.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    if short.is_empty() || long.is_empty() {
        return if short.len() == long.len() { 100.0 } else { 0.0 };
    }

    let mut best = partial_windows(short, long);
    if best < 100.0 && a.len() == b.len() {
        best = best.max(partial_windows(long, short));
    }
    best
}

fn partial_windows(needle: &[char], haystack: &[char]) -> f64 {
    let m = needle.len();
    let n = haystack.len();
    let alphabet: AHashSet<char> = needle.iter().copied().collect();
    let mut best = 0.0f64;

    let mut consider = |window: &[char], edge: char| -> bool {
        if !alphabet.contains(&edge) {
            return false;
        }
        let score = ratio_chars(needle, window);
        if score > best {
            best = score;
        }
        best >= 100.0
    };

    // Windows hanging off the left edge
    for i in 1..m {
        if consider(&haystack[..i], haystack[i - 1]) {
            return 100.0;
        }
    }
    // Full-length windows
    for i in 0..n - m {
        if consider(&haystack[i..i + m], haystack[i + m - 1]) {
            return 100.0;
        }
    }
    // Windows running to the right edge, starting with the last full one
    for i in n - m..n {
        if consider(&haystack[i..], haystack[i]) {
            return 100.0;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_ratio() {
        assert!(approx(ratio("", ""), 100.0));
        assert!(approx(ratio("abc", ""), 0.0));
        assert!(approx(ratio("abc", "abc"), 100.0));
        // LCS("kitten", "sitting") = 4 -> 200 * 4 / 13
        assert!(approx(ratio("kitten", "sitting"), 800.0 / 13.0));
        assert!(approx(ratio("abc", "xyz"), 0.0));
    }

    #[test]
    fn test_ratio_symmetric() {
        assert!(approx(
            ratio("농심 라면", "농심라면"),
            ratio("농심라면", "농심 라면")
        ));
    }

    #[test]
    fn test_partial_ratio_substring() {
        assert!(approx(partial_ratio("bibigo", "cj bibigo dumplings"), 100.0));
        assert!(approx(partial_ratio("cj bibigo dumplings", "bibigo"), 100.0));
        assert!(approx(partial_ratio("새우깡", "농심 새우깡 90g"), 100.0));
    }

    #[test]
    fn test_partial_ratio_empty() {
        assert!(approx(partial_ratio("", ""), 100.0));
        assert!(approx(partial_ratio("", "abc"), 0.0));
        assert!(approx(partial_ratio("abc", ""), 0.0));
    }

    #[test]
    fn test_partial_ratio_typo() {
        // "bibgo" vs window "bibig": LCS 4 of 10 chars
        let score = partial_ratio("bibgo", "bibigo mandu");
        assert!(score >= 80.0, "got {}", score);
        assert!(score < 100.0);
    }

    #[test]
    fn test_partial_ratio_edge_windows() {
        // Best alignment hangs off the right edge
        assert!(approx(partial_ratio("xyzab", "ab"), 100.0));
        assert!(partial_ratio("abcd", "zzzzzzab") > 60.0);
    }

    #[test]
    fn test_partial_ratio_disjoint() {
        assert!(approx(partial_ratio("abc", "xyzxyz"), 0.0));
    }
}
