//! Message text → query classification.

use std::sync::OnceLock;

use regex::Regex;

/// What a chat message asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    /// A four digit stop code.
    StopCode(String),
    /// A one to three character line code (`[A-Z0-9]`).
    LineCode(String),
    Unrecognized,
}

fn stop_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]{4}").expect("valid regex"))
}

fn line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Z0-9]{1,3}").expect("valid regex"))
}

/// Classify raw message text.
///
/// Only ASCII digits count. Stop codes win over line codes: a message containing four digits is always
/// a stop query, even though it also matches the line pattern. The returned
/// code is the leftmost match. The text is not trimmed or case-folded.
pub fn classify(text: &str) -> Classification {
    if let Some(m) = stop_re().find(text) {
        return Classification::StopCode(m.as_str().to_string());
    }
    if let Some(m) = line_re().find(text) {
        return Classification::LineCode(m.as_str().to_string());
    }
    Classification::Unrecognized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_digits_is_a_stop() {
        assert_eq!(classify("1234"), Classification::StopCode("1234".into()));
        assert_eq!(
            classify("fermata 0042 grazie"),
            Classification::StopCode("0042".into())
        );
    }

    #[test]
    fn stop_takes_precedence_over_line() {
        assert_eq!(
            classify("61 1234"),
            Classification::StopCode("1234".into())
        );
        assert_eq!(classify("AB5678"), Classification::StopCode("5678".into()));
    }

    #[test]
    fn short_alnum_is_a_line() {
        assert_eq!(classify("61"), Classification::LineCode("61".into()));
        assert_eq!(classify("N1"), Classification::LineCode("N1".into()));
        assert_eq!(classify("123"), Classification::LineCode("123".into()));
        // Leftmost run, capped at three characters.
        assert_eq!(classify("ABCDE"), Classification::LineCode("ABC".into()));
    }

    #[test]
    fn non_ascii_digits_are_not_codes() {
        assert_eq!(classify("\u{0661}\u{0662}\u{0663}\u{0664}"), Classification::Unrecognized);
        assert_eq!(classify("\u{FF11}\u{FF12}\u{FF13}\u{FF14}"), Classification::Unrecognized);
        // ASCII digits around them still win.
        assert_eq!(
            classify("\u{0661}\u{0662} 4321"),
            Classification::StopCode("4321".into())
        );
    }

    #[test]
    fn no_case_folding() {
        assert_eq!(classify("hello"), Classification::Unrecognized);
        assert_eq!(classify("n1"), Classification::LineCode("1".into()));
        assert_eq!(classify(""), Classification::Unrecognized);
        assert_eq!(classify("  \n"), Classification::Unrecognized);
    }
}
