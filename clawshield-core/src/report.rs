//! Result data structures produced by a policy evaluation.
//!
//! These records are created fresh per evaluation and handed to the caller;
//! the receipt builder in the CLI crate embeds them verbatim.
//!
//! License: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

/// The three-way classification of a scanned input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// No action required; content is forwarded unchanged.
    Allow,
    /// Forward a redacted copy only.
    Sanitize,
    /// Forward nothing.
    Block,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Verdict::Allow => "ALLOW",
            Verdict::Sanitize => "SANITIZE",
            Verdict::Block => "BLOCK",
        };
        f.write_str(label)
    }
}

/// Evidence that a single policy rule fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedRule {
    pub id: String,
    pub title: String,
    pub severity: i32,
    /// Distinct matched substrings, deduplicated case-insensitively and
    /// sorted lexicographically.
    pub matches: Vec<String>,
}

/// The sole output of the evaluation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    /// Matched rules, sorted by rule id ascending.
    pub matched_rules: Vec<MatchedRule>,
    /// Aggregate risk score, clamped to `[0, 100]`.
    pub risk_score: i32,
    pub verdict: Verdict,
    /// Redacted copy for SANITIZE, the trimmed canonicalized original for
    /// ALLOW, and the empty string for BLOCK.
    pub sanitized_text: String,
    /// The normalized form the rules were matched against.
    pub normalized_content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_serializes_screaming() {
        assert_eq!(serde_json::to_string(&Verdict::Allow).unwrap(), "\"ALLOW\"");
        assert_eq!(
            serde_json::to_string(&Verdict::Sanitize).unwrap(),
            "\"SANITIZE\""
        );
        assert_eq!(serde_json::to_string(&Verdict::Block).unwrap(), "\"BLOCK\"");
    }

    #[test]
    fn verdict_displays_like_wire_form() {
        assert_eq!(Verdict::Block.to_string(), "BLOCK");
    }
}
