//! String helpers for log previews

/// Truncate at a character boundary, keeping at most `max_chars` characters
pub fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Single-line preview of turn content for console logs
///
/// Newlines are flattened so one turn stays on one console line.
pub fn preview(s: &str, max_chars: usize) -> String {
    let head = truncate_str(s, max_chars).replace('\n', " ");
    if head.len() < s.len() {
        format!("{}...", head.trim_end())
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str_ascii() {
        assert_eq!(truncate_str("hello world", 5), "hello");
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("", 5), "");
    }

    #[test]
    fn test_truncate_str_utf8() {
        assert_eq!(truncate_str("你好世界", 2), "你好");
        assert_eq!(truncate_str("Hello你好", 6), "Hello你");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 200), "short");
        assert_eq!(preview("line one\nline two", 200), "line one line two");
        assert_eq!(preview("abcdefgh", 4), "abcd...");
        assert_eq!(preview("设计系统说明", 2), "设计...");
    }
}
