//! Utilities for sanitizing error messages.
//!
//! Error details end up in response bodies served to arbitrary clients, so
//! they are stripped of control characters and kept short.

use crate::config::MAX_ERROR_MESSAGE_LENGTH;

/// Sanitizes an error message by removing control characters.
///
/// Control characters other than tab and newline are dropped; newlines are
/// collapsed to spaces so the message stays on one line in logs and bodies.
pub fn sanitize_error_message(message: &str) -> String {
    message
        .chars()
        .filter_map(|c| match c {
            '\n' | '\r' => Some(' '),
            '\t' => Some('\t'),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Sanitizes and truncates an error message to `MAX_ERROR_MESSAGE_LENGTH` characters.
///
/// Truncation happens on a character boundary and is marked with an ellipsis.
pub fn sanitize_and_truncate_error_message(message: &str) -> String {
    let sanitized = sanitize_error_message(message);

    if sanitized.chars().count() > MAX_ERROR_MESSAGE_LENGTH {
        let truncated: String = sanitized
            .chars()
            .take(MAX_ERROR_MESSAGE_LENGTH.saturating_sub(3))
            .collect();
        format!("{truncated}...")
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_error_message_removes_control_chars() {
        let input = "Error\x00message\x01with\x02control\x03chars";
        let output = sanitize_error_message(input);
        assert_eq!(output, "Errormessagewithcontrolchars");
    }

    #[test]
    fn test_sanitize_error_message_flattens_newlines() {
        let output = sanitize_error_message("connection\nreset\r\nby peer");
        assert_eq!(output, "connection reset  by peer");
    }

    #[test]
    fn test_sanitize_error_message_preserves_unicode() {
        let input = "Error message with unicode: 测试 🚀";
        assert_eq!(sanitize_error_message(input), input);
    }

    #[test]
    fn test_truncate_long_message() {
        let long = "x".repeat(MAX_ERROR_MESSAGE_LENGTH * 2);
        let output = sanitize_and_truncate_error_message(&long);
        assert_eq!(output.chars().count(), MAX_ERROR_MESSAGE_LENGTH);
        assert!(output.ends_with("..."));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let long = "测".repeat(MAX_ERROR_MESSAGE_LENGTH + 10);
        let output = sanitize_and_truncate_error_message(&long);
        assert!(output.ends_with("..."));
        assert_eq!(output.chars().count(), MAX_ERROR_MESSAGE_LENGTH);
    }

    #[test]
    fn test_short_message_untouched() {
        assert_eq!(
            sanitize_and_truncate_error_message("connection reset"),
            "connection reset"
        );
    }
}
