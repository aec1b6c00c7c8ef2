//! Text utilities for terminal output
//!
//! Unicode-aware width calculation, wrapping and truncation for card
//! bodies and history columns.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap text to fit within specified width, breaking at word boundaries.
/// Words wider than the limit are broken by character.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for line in text.lines() {
        if UnicodeWidthStr::width(line) <= max_width {
            lines.push(line.to_string());
            continue;
        }

        let mut current_line = String::new();
        let mut current_width = 0;

        for word in line.split_whitespace() {
            let word_width = UnicodeWidthStr::width(word);

            if word_width > max_width {
                if !current_line.is_empty() {
                    lines.push(std::mem::take(&mut current_line));
                    current_width = 0;
                }

                for ch in word.chars() {
                    let ch_width = char_width(ch);
                    if current_width + ch_width > max_width && !current_line.is_empty() {
                        lines.push(std::mem::take(&mut current_line));
                        current_width = 0;
                    }
                    current_line.push(ch);
                    current_width += ch_width;
                }
            } else if current_width > 0 && current_width + 1 + word_width > max_width {
                lines.push(std::mem::replace(&mut current_line, word.to_string()));
                current_width = word_width;
            } else {
                if current_width > 0 {
                    current_line.push(' ');
                    current_width += 1;
                }
                current_line.push_str(word);
                current_width += word_width;
            }
        }

        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Cut text to a display width, marking the cut with `…`
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = char_width(ch);
        if width + ch_width > max_width - 1 {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out.push('…');
    out
}

/// Pad text with spaces up to a display width
pub fn pad_to_width(text: &str, width: usize) -> String {
    let current = text_width(text);
    if current >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - current))
    }
}

/// Terminal width with fallback
pub fn get_terminal_width() -> usize {
    let (_, cols) = console::Term::stdout().size();
    std::cmp::max((cols as usize).saturating_sub(4), 40)
}

/// Calculate the display width of text considering Unicode characters
pub fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Calculate the display width of a single character
pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_simple() {
        assert_eq!(wrap_text("Hello world", 20), vec!["Hello world"]);
    }

    #[test]
    fn test_wrap_text_long_line() {
        let text = "Extraia titulo, autor, data e os principais pontos do conteudo";
        let wrapped = wrap_text(text, 20);
        assert!(wrapped.len() > 1);
        for line in &wrapped {
            assert!(text_width(line) <= 20);
        }
    }

    #[test]
    fn test_wrap_text_long_word() {
        let wrapped = wrap_text("https://www.google.com/maps/search/padarias", 10);
        assert!(wrapped.len() >= 4);
        for line in &wrapped {
            assert!(text_width(line) <= 10);
        }
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("https://openai.com/blog", 10), "https://o…");
        assert_eq!(text_width(&truncate_to_width("São Paulo padarias", 6)), 6);
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("abcdef", 4), "abcdef");
        assert_eq!(pad_to_width("ã", 2), "ã ");
    }
}
