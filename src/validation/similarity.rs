//! String similarity for spotting mistyped machine/tool names.

/// Similarity ratio in `[0.0, 1.0]`: `2 * matched / (len(a) + len(b))`
///
/// Matched characters are found by repeatedly taking the longest common
/// block and recursing into the pieces on either side of it.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

fn matched_chars(a: &[char], b: &[char]) -> usize {
    let (start_a, start_b, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matched_chars(&a[..start_a], &b[..start_b])
        + matched_chars(&a[start_a + len..], &b[start_b + len..])
}

/// Longest common contiguous block, earliest in `a` on ties
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // run[j + 1] = length of the common block ending at a[i], b[j]
    let mut prev = vec![0usize; b.len() + 1];
    for i in 0..a.len() {
        let mut run = vec![0usize; b.len() + 1];
        for j in 0..b.len() {
            if a[i] == b[j] {
                run[j + 1] = prev[j] + 1;
                if run[j + 1] > best.2 {
                    best = (i + 1 - run[j + 1], j + 1 - run[j + 1], run[j + 1]);
                }
            }
        }
        prev = run;
    }
    best
}
