//! Policy management for `clawshield-core`.
//!
//! This module defines the core data structures for the versioned rule policy
//! and handles deserialization of the JSON policy document. It provides
//! utilities for loading a policy from disk or from the embedded default and
//! for validating its structural invariants before any evaluation occurs.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

use crate::errors::PolicyError;

/// The tool identity a policy document must declare to be accepted.
pub const EXPECTED_TOOL: &str = "clawshield_lite";

/// Provenance classification of scanned input.
///
/// Carried on the input descriptor by the loader; the evaluation pipeline
/// itself treats all content identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrustZone {
    Trusted,
    #[default]
    Untrusted,
}

/// Human-facing description of a trust zone, as declared by the policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TrustZoneInfo {
    pub description: String,
}

/// The two score thresholds that drive verdict classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RiskScoring {
    pub block_threshold: i32,
    pub sanitize_threshold: i32,
}

/// A single pattern-matching rule.
///
/// Literal `patterns` are matched case-insensitively as substrings of the
/// normalized content; `regex_patterns` are compiled case-insensitively.
/// Rules are static configuration and are never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Unique identifier for the rule (e.g., "wallet_signing").
    pub id: String,
    /// Human-readable description of what the rule targets.
    pub title: String,
    /// Integer weight contributed to the risk score when the rule fires.
    pub severity: i32,
    /// Case-insensitive literal substrings.
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Case-insensitive regular expressions.
    #[serde(default)]
    pub regex_patterns: Vec<String>,
}

/// Represents the top-level policy document for ClawShield Lite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Identity tag; must equal [`EXPECTED_TOOL`].
    pub tool: String,
    /// Monotonically increasing policy revision, recorded in receipts.
    pub policy_version: u32,
    /// Trust zone assigned to inputs with no explicit provenance.
    #[serde(default)]
    pub default_trust_zone: TrustZone,
    /// Declarative descriptions of the known trust zones.
    #[serde(default)]
    pub trust_zones: BTreeMap<String, TrustZoneInfo>,
    /// Enforcement stance per capability category. Informational metadata;
    /// not consumed by the evaluation pipeline.
    #[serde(default)]
    pub enforcement: BTreeMap<String, String>,
    pub risk_scoring: RiskScoring,
    /// The ordered rule list. Must be non-empty.
    pub rules: Vec<PolicyRule>,
}

/// A policy together with provenance gathered at load time.
#[derive(Debug, Clone)]
pub struct LoadedPolicy {
    pub policy: Policy,
    /// SHA-256 hex digest of the raw policy document bytes.
    pub policy_hash: String,
    /// Where the document came from (a path, or `<embedded>`).
    pub policy_source: String,
}

/// Computes the lowercase SHA-256 hex digest of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Validates the structural invariants of a candidate policy.
///
/// Checks, in order: the policy declares the expected tool identity; the rule
/// list is non-empty; `block_threshold >= sanitize_threshold`. Any violation
/// is fatal and evaluation must not proceed.
pub fn validate_policy(policy: &Policy) -> Result<(), PolicyError> {
    if policy.tool != EXPECTED_TOOL {
        return Err(PolicyError::ToolMismatch {
            expected: EXPECTED_TOOL.to_string(),
            found: policy.tool.clone(),
        });
    }
    if policy.rules.is_empty() {
        return Err(PolicyError::EmptyRuleSet);
    }
    if policy.risk_scoring.block_threshold < policy.risk_scoring.sanitize_threshold {
        return Err(PolicyError::InvalidThresholds {
            block: policy.risk_scoring.block_threshold,
            sanitize: policy.risk_scoring.sanitize_threshold,
        });
    }
    Ok(())
}

impl Policy {
    /// Loads and validates a policy from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<LoadedPolicy, PolicyError> {
        let path = path.as_ref();
        info!("Loading policy from: {}", path.display());
        let raw = std::fs::read(path)?;
        let policy: Policy = serde_json::from_slice(&raw)?;
        validate_policy(&policy)?;

        debug!(
            "Loaded policy version {} with {} rules from file.",
            policy.policy_version,
            policy.rules.len()
        );
        Ok(LoadedPolicy {
            policy,
            policy_hash: sha256_hex(&raw),
            policy_source: path.display().to_string(),
        })
    }

    /// Loads the built-in default policy from the embedded document.
    pub fn load_default() -> Result<LoadedPolicy, PolicyError> {
        debug!("Loading default policy from embedded document...");
        let raw = include_str!("../config/default_policy.json");
        let policy: Policy = serde_json::from_str(raw)?;
        validate_policy(&policy)?;

        debug!("Loaded {} default rules.", policy.rules.len());
        Ok(LoadedPolicy {
            policy,
            policy_hash: sha256_hex(raw.as_bytes()),
            policy_source: "<embedded>".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_policy() -> Policy {
        Policy {
            tool: EXPECTED_TOOL.to_string(),
            policy_version: 1,
            default_trust_zone: TrustZone::Untrusted,
            trust_zones: BTreeMap::new(),
            enforcement: BTreeMap::new(),
            risk_scoring: RiskScoring {
                block_threshold: 80,
                sanitize_threshold: 40,
            },
            rules: vec![PolicyRule {
                id: "wallet_signing".to_string(),
                title: "Wallet signing request".to_string(),
                severity: 60,
                patterns: vec!["send usdc".to_string()],
                regex_patterns: vec![],
            }],
        }
    }

    #[test]
    fn accepts_well_formed_policy() {
        assert!(validate_policy(&minimal_policy()).is_ok());
    }

    #[test]
    fn rejects_tool_mismatch() {
        let mut policy = minimal_policy();
        policy.tool = "someone_else".to_string();
        assert!(matches!(
            validate_policy(&policy),
            Err(PolicyError::ToolMismatch { .. })
        ));
    }

    #[test]
    fn rejects_empty_rule_list() {
        let mut policy = minimal_policy();
        policy.rules.clear();
        assert!(matches!(
            validate_policy(&policy),
            Err(PolicyError::EmptyRuleSet)
        ));
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let mut policy = minimal_policy();
        policy.risk_scoring.block_threshold = 30;
        assert!(matches!(
            validate_policy(&policy),
            Err(PolicyError::InvalidThresholds { block: 30, sanitize: 40 })
        ));
    }

    #[test]
    fn default_policy_loads_and_validates() {
        let loaded = Policy::load_default().expect("embedded policy must be valid");
        assert_eq!(loaded.policy.tool, EXPECTED_TOOL);
        assert_eq!(loaded.policy_hash.len(), 64);
        assert_eq!(loaded.policy_source, "<embedded>");
    }

    #[test]
    fn sha256_hex_is_stable() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
