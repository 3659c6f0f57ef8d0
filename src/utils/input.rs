//! Input utilities for the single-line draft editor

/// Sanitize text input to prevent TUI corruption
///
/// This function:
/// - Converts tabs to 4 spaces
/// - Converts carriage returns and newlines to single spaces
/// - Filters out all other control characters
///
/// The draft is one line, so pasted multi-line text is flattened.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    let mut previous_was_break = false;

    for c in text.chars() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' | '\n' => {
                if !previous_was_break {
                    sanitized.push(' ');
                }
                previous_was_break = true;
                continue;
            }
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
        previous_was_break = false;
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_text_input_basic() {
        assert_eq!(sanitize_text_input("hello world"), "hello world");
    }

    #[test]
    fn test_sanitize_text_input_tabs() {
        assert_eq!(sanitize_text_input("hello\tworld"), "hello    world");
    }

    #[test]
    fn test_sanitize_text_input_line_breaks_collapse() {
        assert_eq!(sanitize_text_input("hello\r\nworld\nagain"), "hello world again");
    }

    #[test]
    fn test_sanitize_text_input_mixed_control_chars() {
        assert_eq!(sanitize_text_input("hello\x07\tworld\x1b"), "hello    world");
    }
}
