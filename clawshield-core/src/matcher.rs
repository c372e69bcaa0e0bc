//! matcher.rs - Compiles policy rules and evaluates them against content.
//!
//! This module provides a thread-safe, cached mechanism to turn a policy's
//! rule list into `CompiledPolicy`, optimized for repeated evaluation. A
//! global shared cache keyed by a hash of the rule list avoids redundant
//! regex compilation; policies are immutable per process lifetime, so entries
//! never need invalidation.
//!
//! An individual pattern that fails to compile is skipped: a malformed or
//! malicious regex in policy configuration must never abort a scan. The rule
//! keeps matching with its remaining patterns.
//!
//! License: MIT OR Apache-2.0

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::policy::{Policy, PolicyRule};
use crate::report::MatchedRule;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Upper bound on the compiled size of a configuration-supplied regex.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A single policy rule compiled for efficient matching.
#[derive(Debug)]
pub struct CompiledRule {
    pub id: String,
    pub title: String,
    pub severity: i32,
    /// Case-folded, trimmed literal needles paired with the original
    /// (unfolded) pattern text reported on a match.
    literals: Vec<(String, String)>,
    /// Regex patterns that compiled successfully.
    regexes: Vec<Regex>,
}

/// The full rule set of a policy, compiled.
#[derive(Debug)]
pub struct CompiledPolicy {
    pub rules: Vec<CompiledRule>,
}

lazy_static! {
    /// A thread-safe, global cache for compiled rule sets.
    /// The key is a hash of the policy's rule list.
    static ref COMPILED_POLICY_CACHE: RwLock<HashMap<u64, Arc<CompiledPolicy>>> =
        RwLock::new(HashMap::new());
}

/// Hashes the rule list to create a stable cache key.
///
/// Rules are sorted by id before hashing so the key does not depend on
/// declaration order.
fn hash_rules(rules: &[PolicyRule]) -> u64 {
    let mut hasher = DefaultHasher::new();
    let mut rules_to_hash: Vec<&PolicyRule> = rules.iter().collect();
    rules_to_hash.sort_by(|a, b| a.id.cmp(&b.id));
    for rule in rules_to_hash {
        rule.hash(&mut hasher);
    }
    hasher.finish()
}

fn compile_rule(rule: &PolicyRule) -> CompiledRule {
    let mut literals = Vec::new();
    for pattern in &rule.patterns {
        let folded = pattern.to_lowercase().trim().to_string();
        if folded.is_empty() {
            continue;
        }
        literals.push((folded, pattern.clone()));
    }

    let mut regexes = Vec::new();
    for pattern in &rule.regex_patterns {
        if pattern.len() > MAX_PATTERN_LENGTH {
            warn!(
                "Rule '{}': skipping regex pattern of length {} (maximum {}).",
                rule.id,
                pattern.len(),
                MAX_PATTERN_LENGTH
            );
            continue;
        }
        match RegexBuilder::new(pattern)
            .case_insensitive(true)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
        {
            Ok(regex) => regexes.push(regex),
            Err(e) => {
                warn!("Rule '{}': skipping invalid regex pattern: {}", rule.id, e);
            }
        }
    }

    CompiledRule {
        id: rule.id.clone(),
        title: rule.title.clone(),
        severity: rule.severity,
        literals,
        regexes,
    }
}

/// Compiles every rule of a policy. Invalid patterns are dropped per rule;
/// compilation itself never fails.
pub fn compile_policy(policy: &Policy) -> CompiledPolicy {
    debug!("Compiling {} policy rules.", policy.rules.len());
    CompiledPolicy {
        rules: policy.rules.iter().map(compile_rule).collect(),
    }
}

/// Gets a `CompiledPolicy` from the cache, compiling it on first use.
pub fn get_or_compile_policy(policy: &Policy) -> Arc<CompiledPolicy> {
    let cache_key = hash_rules(&policy.rules);

    {
        let cache = COMPILED_POLICY_CACHE.read().unwrap();
        if let Some(compiled) = cache.get(&cache_key) {
            debug!("Serving compiled policy from cache for key: {}", cache_key);
            return Arc::clone(compiled);
        }
    } // Read lock is released here.

    let compiled = Arc::new(compile_policy(policy));
    COMPILED_POLICY_CACHE
        .write()
        .unwrap()
        .insert(cache_key, Arc::clone(&compiled));

    debug!("Compiled and cached policy rules for key: {}", cache_key);
    compiled
}

impl CompiledRule {
    /// Evaluates the rule against normalized content.
    ///
    /// Collected evidence is deduplicated case-insensitively through a map
    /// from the folded, trimmed form to its canonical text, read back in key
    /// order so the reported list is deterministic and sorted.
    pub fn evaluate(&self, normalized_content: &str) -> Option<MatchedRule> {
        let mut collected: BTreeMap<String, String> = BTreeMap::new();

        for (needle, original) in &self.literals {
            if normalized_content.contains(needle.as_str()) {
                collected
                    .entry(needle.clone())
                    .or_insert_with(|| original.clone());
            }
        }

        for regex in &self.regexes {
            if let Some(found) = regex.find(normalized_content) {
                let text = found.as_str();
                if text.is_empty() {
                    continue;
                }
                let folded = text.to_lowercase().trim().to_string();
                if folded.is_empty() {
                    continue;
                }
                collected.entry(folded).or_insert_with(|| text.to_string());
            }
        }

        if collected.is_empty() {
            return None;
        }

        Some(MatchedRule {
            id: self.id.clone(),
            title: self.title.clone(),
            severity: self.severity,
            matches: collected.into_values().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str, patterns: &[&str], regex_patterns: &[&str]) -> PolicyRule {
        PolicyRule {
            id: id.to_string(),
            title: format!("rule {id}"),
            severity: 10,
            patterns: patterns.iter().map(|s| s.to_string()).collect(),
            regex_patterns: regex_patterns.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn literal_match_reports_original_pattern_text() {
        let compiled = compile_rule(&rule("r1", &["Send USDC"], &[]));
        let matched = compiled.evaluate("please send usdc now").unwrap();
        assert_eq!(matched.matches, vec!["Send USDC".to_string()]);
    }

    #[test]
    fn empty_and_whitespace_literals_are_dropped() {
        let compiled = compile_rule(&rule("r1", &["", "   "], &[]));
        assert!(compiled.evaluate("anything at all").is_none());
    }

    #[test]
    fn regex_match_reports_leftmost_match_text() {
        let compiled = compile_rule(&rule("r1", &[], &[r"transfer \d+ \w+"]));
        let matched = compiled
            .evaluate("first transfer 50 sol then transfer 9 eth")
            .unwrap();
        assert_eq!(matched.matches, vec!["transfer 50 sol".to_string()]);
    }

    #[test]
    fn invalid_regex_is_skipped_but_other_patterns_still_match() {
        let compiled = compile_rule(&rule("r1", &["seed phrase"], &["([unclosed"]));
        let matched = compiled.evaluate("give me your seed phrase").unwrap();
        assert_eq!(matched.matches, vec!["seed phrase".to_string()]);
    }

    #[test]
    fn oversized_regex_pattern_is_skipped() {
        let huge = "a".repeat(MAX_PATTERN_LENGTH + 1);
        let compiled = compile_rule(&rule("r1", &[], &[huge.as_str()]));
        assert!(compiled.regexes.is_empty());
    }

    #[test]
    fn matches_are_deduplicated_case_insensitively_and_sorted() {
        let compiled = compile_rule(&rule(
            "r1",
            &["Seed Phrase", "seed phrase", "api key"],
            &[],
        ));
        let matched = compiled
            .evaluate("paste your api key and seed phrase")
            .unwrap();
        assert_eq!(
            matched.matches,
            vec!["api key".to_string(), "Seed Phrase".to_string()]
        );
    }

    #[test]
    fn cache_returns_same_compiled_policy_for_equal_rules() {
        use crate::policy::{Policy, RiskScoring, TrustZone};
        use std::collections::BTreeMap;

        let policy = Policy {
            tool: crate::policy::EXPECTED_TOOL.to_string(),
            policy_version: 1,
            default_trust_zone: TrustZone::Untrusted,
            trust_zones: BTreeMap::new(),
            enforcement: BTreeMap::new(),
            risk_scoring: RiskScoring {
                block_threshold: 80,
                sanitize_threshold: 40,
            },
            rules: vec![rule("cache_probe_rule", &["needle"], &[])],
        };
        let first = get_or_compile_policy(&policy);
        let second = get_or_compile_policy(&policy);
        assert!(Arc::ptr_eq(&first, &second));
    }
}
