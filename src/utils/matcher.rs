//! Sequence alignment primitives for lexical tag comparison.
//!
//! Implements the Ratcliff/Obershelp matching-blocks ratio: find the
//! longest common contiguous block, recurse on the pieces left and
//! right of it, and score 2 * matched / (len_a + len_b). Unlike plain
//! edit distance this rewards shared content regardless of where the
//! edit happened, which is what near-duplicate tag detection needs.

/// Alignment similarity between two strings in `[0, 1]`.
///
/// Symmetric: `sequence_ratio(a, b) == sequence_ratio(b, a)`.
/// Two empty strings are defined as identical (ratio 1.0).
#[inline]
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_len(a, b);
    2.0 * matched as f64 / total as f64
}

/// Total length of all matching blocks between `a` and `b`.
fn matching_len(a: &[u8], b: &[u8]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (ai, bi, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_len(&a[..ai], &b[..bi]) + matching_len(&a[ai + len..], &b[bi + len..])
}

/// Longest common contiguous block of `a` and `b`.
///
/// Returns `(start_in_a, start_in_b, length)`. Ties resolve to the
/// lowest start in `a`, then the lowest start in `b`, so the
/// recursion (and therefore the ratio) is deterministic.
fn longest_common_block(a: &[u8], b: &[u8]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // lengths[j] = length of the common suffix ending at a[i], b[j]
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let run = prev[j] + 1;
                cur[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            } else {
                cur[j + 1] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
        cur.fill(0);
    }
    best
}
