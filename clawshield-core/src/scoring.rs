//! Risk scoring and verdict classification.
//!
//! License: MIT OR Apache-2.0

use crate::policy::RiskScoring;
use crate::report::{MatchedRule, Verdict};

/// Rule id reserved for wallet-signing risk; its presence among the matched
/// rules adds a flat bonus on top of the rule's own severity.
pub const WALLET_SIGNING_RULE_ID: &str = "wallet_signing";

/// Flat bonus applied when two or more distinct rules matched.
pub const MULTI_RULE_BONUS: i32 = 10;

/// Flat bonus applied when the wallet-signing rule is among the matches.
pub const WALLET_SIGNING_BONUS: i32 = 10;

/// Inclusive upper bound of the risk score.
pub const MAX_RISK_SCORE: i32 = 100;

/// Aggregates matched-rule severities into a bounded risk score.
///
/// Both bonuses trigger independently and may stack. The lower clamp is
/// unreachable with non-negative severities but the policy schema does not
/// guarantee that, so both bounds are enforced.
pub fn score_matches(matched_rules: &[MatchedRule]) -> i32 {
    let mut total: i32 = matched_rules.iter().map(|rule| rule.severity).sum();

    if matched_rules.len() >= 2 {
        total += MULTI_RULE_BONUS;
    }
    if matched_rules.iter().any(|rule| rule.id == WALLET_SIGNING_RULE_ID) {
        total += WALLET_SIGNING_BONUS;
    }

    total.clamp(0, MAX_RISK_SCORE)
}

/// Maps a risk score to a verdict via the policy thresholds.
///
/// Ties favor the more severe verdict at each boundary.
pub fn verdict_for_score(score: i32, scoring: &RiskScoring) -> Verdict {
    if score >= scoring.block_threshold {
        Verdict::Block
    } else if score >= scoring.sanitize_threshold {
        Verdict::Sanitize
    } else {
        Verdict::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(id: &str, severity: i32) -> MatchedRule {
        MatchedRule {
            id: id.to_string(),
            title: format!("rule {id}"),
            severity,
            matches: vec!["x".to_string()],
        }
    }

    #[test]
    fn no_matches_scores_zero() {
        assert_eq!(score_matches(&[]), 0);
    }

    #[test]
    fn single_rule_scores_its_severity() {
        assert_eq!(score_matches(&[matched("prompt_injection", 25)]), 25);
    }

    #[test]
    fn wallet_signing_bonus_applies() {
        assert_eq!(score_matches(&[matched(WALLET_SIGNING_RULE_ID, 60)]), 70);
    }

    #[test]
    fn multi_rule_bonus_applies() {
        let rules = [matched("a", 30), matched("b", 20)];
        assert_eq!(score_matches(&rules), 60);
    }

    #[test]
    fn bonuses_stack() {
        let rules = [matched(WALLET_SIGNING_RULE_ID, 60), matched("b", 20)];
        assert_eq!(score_matches(&rules), 100);
    }

    #[test]
    fn score_clamps_to_upper_bound() {
        let rules = [matched("a", 90), matched("b", 90)];
        assert_eq!(score_matches(&rules), 100);
    }

    #[test]
    fn score_clamps_to_lower_bound_for_negative_severities() {
        assert_eq!(score_matches(&[matched("a", -40)]), 0);
    }

    #[test]
    fn verdict_boundaries_are_inclusive() {
        let scoring = RiskScoring {
            block_threshold: 80,
            sanitize_threshold: 40,
        };
        assert_eq!(verdict_for_score(39, &scoring), Verdict::Allow);
        assert_eq!(verdict_for_score(40, &scoring), Verdict::Sanitize);
        assert_eq!(verdict_for_score(79, &scoring), Verdict::Sanitize);
        assert_eq!(verdict_for_score(80, &scoring), Verdict::Block);
    }
}
