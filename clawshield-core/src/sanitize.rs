//! Redaction of content classified as SANITIZE.
//!
//! Two layers are applied: whole lines containing any matched substring are
//! dropped, then a fixed, policy-independent list of credential and
//! wallet-action phrases is replaced with `[REDACTED]` in what survives.
//!
//! License: MIT OR Apache-2.0

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;

use crate::normalize::normalize_line_endings;
use crate::report::MatchedRule;

/// Marker inserted in place of redacted phrases.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// High-risk phrase patterns redacted regardless of policy content:
/// credential/secret terms and wallet-action terms.
const SECRET_AND_SIGNING_TERMS: &[&str] = &[
    "seed phrase",
    "private key",
    "mnemonic",
    "api key",
    "password",
    "token",
    "ssh key",
    "sign this transaction",
    "approve transaction",
    "connect your wallet",
    "confirm in wallet",
    "claim by signing",
    "send usdc",
    r"\btransfer\b",
    r"\bswap\b",
];

lazy_static! {
    static ref SECRET_AND_SIGNING_REGEXES: Vec<Regex> = SECRET_AND_SIGNING_TERMS
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("fixed redaction pattern must compile")
        })
        .collect();
}

/// Collects the case-folded, trimmed, deduplicated substrings across all
/// matched rules.
fn matched_substrings(matched_rules: &[MatchedRule]) -> BTreeSet<String> {
    let mut seen = BTreeSet::new();
    for rule in matched_rules {
        for entry in &rule.matches {
            let folded = entry.to_lowercase().trim().to_string();
            if !folded.is_empty() {
                seen.insert(folded);
            }
        }
    }
    seen
}

/// Produces a redacted copy of `content` safe to forward downstream.
///
/// Line endings are canonicalized (case and spacing preserved), lines whose
/// folded form contains any matched substring are dropped, the fixed phrase
/// list is redacted, and the result is trimmed.
pub fn sanitize_text(content: &str, matched_rules: &[MatchedRule]) -> String {
    let banned = matched_substrings(matched_rules);
    let canonical = normalize_line_endings(content);

    let kept_lines: Vec<&str> = canonical
        .split('\n')
        .filter(|line| {
            let folded = line.to_lowercase();
            !banned.iter().any(|needle| folded.contains(needle.as_str()))
        })
        .collect();

    let mut sanitized = kept_lines.join("\n");
    for regex in SECRET_AND_SIGNING_REGEXES.iter() {
        sanitized = regex.replace_all(&sanitized, REDACTION_MARKER).into_owned();
    }

    sanitized.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(matches: &[&str]) -> Vec<MatchedRule> {
        vec![MatchedRule {
            id: "r1".to_string(),
            title: "rule".to_string(),
            severity: 10,
            matches: matches.iter().map(|s| s.to_string()).collect(),
        }]
    }

    #[test]
    fn drops_lines_containing_matched_substrings() {
        let content = "keep this line\nPlease SEND USDC today\nand keep this too";
        let out = sanitize_text(content, &matched(&["send usdc"]));
        assert_eq!(out, "keep this line\nand keep this too");
    }

    #[test]
    fn line_drop_is_case_insensitive_against_folded_matches() {
        let content = "Send Usdc now";
        let out = sanitize_text(content, &matched(&["Send USDC"]));
        assert_eq!(out, "");
    }

    #[test]
    fn redacts_fixed_phrases_in_surviving_lines() {
        let content = "never share your Seed Phrase\nhello world";
        let out = sanitize_text(content, &matched(&["unrelated"]));
        assert_eq!(out, "never share your [REDACTED]\nhello world");
    }

    #[test]
    fn transfer_and_swap_redact_on_word_boundaries_only() {
        let out = sanitize_text("transferring a transfer or a swap, not swapped", &[]);
        assert_eq!(
            out,
            "transferring a [REDACTED] or a [REDACTED], not swapped"
        );
    }

    #[test]
    fn result_is_trimmed() {
        let out = sanitize_text("  \n  hello  \n  ", &[]);
        assert_eq!(out, "hello");
    }
}
