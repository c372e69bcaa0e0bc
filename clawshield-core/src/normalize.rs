//! Content normalization for rule matching.
//!
//! Raw input is canonicalized before any pattern evaluation so rules can be
//! authored against a single predictable form: Unix newlines, lowercase,
//! single-space separated. The normalized form is used only for matching;
//! sanitization works on a line-ending-canonicalized but case- and
//! whitespace-preserving copy of the original content.
//!
//! License: MIT OR Apache-2.0

/// Rewrites every CRLF or lone CR line ending as a single LF.
pub fn normalize_line_endings(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}

/// Collapses every maximal run of whitespace (newlines included) to a single
/// space and trims the ends.
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalizes raw text into the form rules are matched against.
///
/// Pipeline: newline canonicalization, lowercase fold, whitespace collapse.
/// Idempotent: applying it twice yields the same result as once.
pub fn normalize_for_matching(input: &str) -> String {
    collapse_whitespace(&normalize_line_endings(input).to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_crlf_and_lone_cr() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn collapses_runs_and_trims() {
        assert_eq!(collapse_whitespace("  a \t b\n\n c  "), "a b c");
    }

    #[test]
    fn folds_case_and_whitespace() {
        assert_eq!(
            normalize_for_matching("  Please\r\nSEND   Usdc\tnow "),
            "please send usdc now"
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "",
            " \r\n ",
            "Mixed CASE\r\nand\trandom   spacing\r",
            "already normalized text",
        ];
        for sample in samples {
            let once = normalize_for_matching(sample);
            assert_eq!(normalize_for_matching(&once), once);
        }
    }
}
