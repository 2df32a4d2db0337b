/// Levenshtein distance over Unicode scalar values.
///
/// Rolling single row sized by the shorter input.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (long, short) = if a.len() >= b.len() { (&a, &b) } else { (&b, &a) };
    if short.is_empty() {
        return long.len();
    }

    let mut row: Vec<usize> = (0..=short.len()).collect();
    for (i, &lc) in long.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, &sc) in short.iter().enumerate() {
            let substitution = diag + usize::from(lc != sc);
            let insertion = row[j + 1] + 1;
            let deletion = row[j] + 1;
            diag = row[j + 1];
            row[j + 1] = substitution.min(insertion).min(deletion);
        }
    }
    row[short.len()]
}

/// Fuzzy acceptance: `distance <= max(min_distance, max_len * ratio)`.
///
/// The ratio comparison stays in floating point so `ratio = 0.3` behaves
/// exactly like `d <= 0.3 * max_len`.
pub fn within_fuzzy_threshold(distance: usize, max_len: usize, ratio: f64, min_distance: usize) -> bool {
    distance <= min_distance || distance as f64 <= max_len as f64 * ratio
}

/// Length in chars of the longer of two tokens.
pub fn max_char_len(a: &str, b: &str) -> usize {
    a.chars().count().max(b.chars().count())
}
