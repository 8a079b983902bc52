//! Text helpers for notification payloads and diagnostics.

/// Splits `text` into consecutive parts of at most `max_chars` characters.
///
/// Splitting is done on character boundaries, never inside a UTF-8 sequence.
/// An empty input yields no parts.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 {
        return vec![text.to_string()];
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Returns at most the first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Escapes characters that Telegram's legacy Markdown mode treats as markup.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_message_short() {
        assert_eq!(split_message("hello", 4096), vec!["hello".to_string()]);
    }

    #[test]
    fn test_split_message_exact_chunks() {
        let parts = split_message("abcdefgh", 3);
        assert_eq!(parts, vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_split_message_counts_characters_not_bytes() {
        let text = "ção".repeat(3);
        let parts = split_message(&text, 4);
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.chars().count() <= 4));
        assert_eq!(parts.concat(), text);
    }

    #[test]
    fn test_split_message_empty() {
        assert!(split_message("", 10).is_empty());
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("convocação", 8), "convocaç");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("JOAO_SILVA *x*"), "JOAO\\_SILVA \\*x\\*");
        assert_eq!(escape_markdown("plain"), "plain");
    }
}
