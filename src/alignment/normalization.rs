/// Comparison form of a token: lowercase, alphanumerics and whitespace only.
pub fn normalize_word(word: &str) -> String {
    word.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Comparison form used by the windowed matcher: hyphenated words compare
/// on their first segment only ("well-known" -> "well").
pub fn normalize_window_target(word: &str) -> String {
    let head = word.split('-').next().unwrap_or(word);
    normalize_word(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_lowercases() {
        assert_eq!(normalize_word("Hello,"), "hello");
        assert_eq!(normalize_word("\"World!\""), "world");
        assert_eq!(normalize_word("don't"), "dont");
        assert_eq!(normalize_word("Übermäßig."), "übermäßig");
    }

    #[test]
    fn lowercase_expansion_is_filtered_too() {
        // 'İ' lowercases to 'i' plus a combining dot above
        assert_eq!(normalize_word("İstanbul"), "istanbul");
        assert_eq!(normalize_word("İstanbul"), normalize_word("istanbul"));
    }

    #[test]
    fn pure_punctuation_normalizes_to_empty() {
        assert_eq!(normalize_word("--"), "");
        assert_eq!(normalize_word("..."), "");
        assert_eq!(normalize_word("。"), "");
    }

    #[test]
    fn keeps_non_latin_letters_and_digits() {
        assert_eq!(normalize_word("你好！"), "你好");
        assert_eq!(normalize_word("3.14"), "314");
    }

    #[test]
    fn window_target_uses_segment_before_hyphen() {
        assert_eq!(normalize_window_target("Well-known"), "well");
        assert_eq!(normalize_window_target("plain"), "plain");
        assert_eq!(normalize_window_target("-leading"), "");
    }
}
