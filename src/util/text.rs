use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const ELLIPSIS: char = '…';

/// Cuts `text` to `keep` columns plus an ellipsis when it is wider than
/// `max` columns. Width is measured in terminal cells.
pub fn truncate(text: &str, max: usize, keep: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }

    let mut width = 0;
    let mut out: String = text
        .chars()
        .take_while(|c| {
            width += c.width().unwrap_or(0);
            width <= keep
        })
        .collect();
    out.push(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_untouched() {
        assert_eq!(truncate("Song 2", 26, 23), "Song 2");
        assert_eq!(truncate(&"a".repeat(26), 26, 23), "a".repeat(26));
    }

    #[test]
    fn test_long_text_cut_with_ellipsis() {
        let name = "abcdefghijklmnopqrstuvwxyz0123";
        let cut = truncate(name, 26, 23);

        assert_eq!(cut, "abcdefghijklmnopqrstuvw…");
        assert_eq!(cut.chars().count(), 24);
    }

    #[test]
    fn test_wide_chars_never_split_past_limit() {
        let cut = truncate(&"音".repeat(20), 26, 23);

        assert_eq!(cut, format!("{}…", "音".repeat(11)));
        assert!(cut.width() <= 24);
    }
}
