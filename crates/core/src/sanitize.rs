//! Per-line cleanup applied before identifier and date matching.

/// Slash artifacts collapsed before character stripping, applied in order.
const SLASH_ARTIFACTS: &[(&str, &str)] = &[(" /,", "/"), (",,", ","), (" /", "/")];

/// Normalizes punctuation noise in textbox lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineSanitizer;

impl LineSanitizer {
    pub fn new() -> Self {
        Self
    }

    /// Sanitize a single line.
    ///
    /// - Collapses stray separators around slashes (`" /,"`, `" /"`, `",,"`)
    /// - Drops everything except ASCII letters, digits, whitespace and `/ . -`
    /// - Removes commas, so grouped numbers like `201,375` become `201375`
    ///
    /// Never fails; at worst the result is empty.
    pub fn sanitize(&self, line: &str) -> String {
        let collapsed = SLASH_ARTIFACTS
            .iter()
            .fold(line.to_string(), |acc, (from, to)| acc.replace(from, to));

        collapsed
            .chars()
            .filter(|&c| {
                c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '/' | '.' | '-')
            })
            .collect()
    }
}

/// Characters that end a line, including vertical tab and form feed and the
/// Unicode line and paragraph separators.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split text into trimmed, non-empty lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split(is_line_break)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_commas_in_numbers() {
        let sanitizer = LineSanitizer::new();

        assert_eq!(sanitizer.sanitize("16/201,375 US"), "16/201375 US");
    }

    #[test]
    fn test_collapses_slash_artifacts() {
        let sanitizer = LineSanitizer::new();

        assert_eq!(sanitizer.sanitize("PCT /,US2023/012345"), "PCT/US2023/012345");
        assert_eq!(sanitizer.sanitize("16 /201,,375 US"), "16/201375 US");
    }

    #[test]
    fn test_strips_odd_characters() {
        let sanitizer = LineSanitizer::new();

        assert_eq!(
            sanitizer.sanitize("(2018-LOW-68327-13): due 03/15/2027!"),
            "2018-LOW-68327-13 due 03/15/2027"
        );
        assert_eq!(sanitizer.sanitize("WO2023/123456 • “final”"), "WO2023/123456  final");
        assert_eq!(sanitizer.sanitize("→★"), "");
    }

    #[test]
    fn test_split_lines_on_every_line_break() {
        assert_eq!(
            split_lines("a\rb\x0bc\x0cd\u{85}e\u{2028}f\u{2029}g"),
            vec!["a", "b", "c", "d", "e", "f", "g"]
        );
    }

    #[test]
    fn test_split_lines_trims_and_drops_blanks() {
        assert_eq!(
            split_lines("  a \r\n\n   \n b\n"),
            vec!["a", "b"]
        );
    }
}
