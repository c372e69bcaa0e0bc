//! The policy evaluation pipeline.
//!
//! A strictly linear, single-pass transform: normalize, match every rule,
//! score, classify, then sanitize / pass through / suppress. The pipeline is
//! pure and synchronous: it performs no I/O, holds no locks beyond the
//! shared rule-compilation cache, and may run concurrently on independent
//! threads. The only failure point is policy validation.
//!
//! License: MIT OR Apache-2.0

use log::debug;

use crate::errors::PolicyError;
use crate::matcher::get_or_compile_policy;
use crate::normalize::{normalize_for_matching, normalize_line_endings};
use crate::policy::{validate_policy, Policy};
use crate::report::{EvaluationSummary, MatchedRule, Verdict};
use crate::sanitize::sanitize_text;
use crate::scoring::{score_matches, verdict_for_score};

/// Evaluates `content` against `policy`, producing the full summary.
///
/// The policy is validated before any matching occurs; a structural violation
/// is terminal for the call. The sanitized text depends on the verdict:
/// BLOCK forwards nothing, SANITIZE forwards a redacted copy, ALLOW forwards
/// the line-ending-canonicalized original, trimmed.
pub fn evaluate_content(content: &str, policy: &Policy) -> Result<EvaluationSummary, PolicyError> {
    validate_policy(policy)?;

    let normalized_content = normalize_for_matching(content);
    let compiled = get_or_compile_policy(policy);

    let mut matched_rules: Vec<MatchedRule> = compiled
        .rules
        .iter()
        .filter_map(|rule| rule.evaluate(&normalized_content))
        .collect();
    matched_rules.sort_by(|a, b| a.id.cmp(&b.id));

    let risk_score = score_matches(&matched_rules);
    let verdict = verdict_for_score(risk_score, &policy.risk_scoring);
    debug!(
        "Evaluated content: {} rule(s) matched, score {}, verdict {}",
        matched_rules.len(),
        risk_score,
        verdict
    );

    let sanitized_text = match verdict {
        Verdict::Block => String::new(),
        Verdict::Sanitize => sanitize_text(content, &matched_rules),
        Verdict::Allow => normalize_line_endings(content).trim().to_string(),
    };

    Ok(EvaluationSummary {
        matched_rules,
        risk_score,
        verdict,
        sanitized_text,
        normalized_content,
    })
}
