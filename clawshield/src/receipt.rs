// clawshield/src/receipt.rs
//! Scan receipt assembly.
//!
//! The receipt wraps the core's evaluation summary with provenance: content
//! and policy hashes, the input descriptor, a timestamp, and the posting
//! status for Sui and Walrus. It is the unit that gets printed, archived,
//! and recorded on-chain.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use clawshield_core::{sha256_hex, EvaluationSummary, LoadedPolicy, MatchedRule, Verdict};

use crate::input::InputDescriptor;
use crate::integrations::sui::SuiNetwork;

/// On-chain posting status of a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiReceiptStatus {
    pub posted: bool,
    pub network: SuiNetwork,
    pub package_id: String,
    pub tx_digest: String,
}

/// Blob-storage status of a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalrusReceiptStatus {
    pub stored: bool,
    pub blob_id: String,
}

/// The complete scan receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReceipt {
    pub tool: String,
    pub version: String,
    pub policy_version: u32,
    pub policy_hash: String,
    pub input: InputDescriptor,
    /// SHA-256 hex of the normalized content the rules were matched against.
    pub content_hash: String,
    pub timestamp_ms: i64,
    pub risk_score: i32,
    pub verdict: Verdict,
    pub matched_rules: Vec<MatchedRule>,
    pub sanitized_text: String,
    pub sui: SuiReceiptStatus,
    pub walrus: WalrusReceiptStatus,
}

/// Assembles a receipt from an evaluation. Posting status starts out
/// negative; the scan command fills it in when posting succeeds.
pub fn build_receipt(
    loaded: &LoadedPolicy,
    input: InputDescriptor,
    summary: &EvaluationSummary,
    network: SuiNetwork,
    package_id: String,
) -> ScanReceipt {
    ScanReceipt {
        tool: clawshield_core::EXPECTED_TOOL.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        policy_version: loaded.policy.policy_version,
        policy_hash: loaded.policy_hash.clone(),
        input,
        content_hash: sha256_hex(summary.normalized_content.as_bytes()),
        timestamp_ms: Utc::now().timestamp_millis(),
        risk_score: summary.risk_score,
        verdict: summary.verdict,
        matched_rules: summary.matched_rules.clone(),
        sanitized_text: summary.sanitized_text.clone(),
        sui: SuiReceiptStatus {
            posted: false,
            network,
            package_id,
            tx_digest: String::new(),
        },
        walrus: WalrusReceiptStatus {
            stored: false,
            blob_id: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clawshield_core::{evaluate_content, Policy};

    use crate::input::{InputDescriptor, InputKind};
    use clawshield_core::TrustZone;

    #[test]
    fn receipt_carries_policy_and_content_provenance() {
        let loaded = Policy::load_default().unwrap();
        let summary = evaluate_content("hello world", &loaded.policy).unwrap();
        let descriptor = InputDescriptor {
            kind: InputKind::Text,
            source: "inline".to_string(),
            trust_zone: TrustZone::Untrusted,
        };

        let receipt = build_receipt(
            &loaded,
            descriptor,
            &summary,
            SuiNetwork::Devnet,
            String::new(),
        );

        assert_eq!(receipt.tool, "clawshield_lite");
        assert_eq!(receipt.policy_hash, loaded.policy_hash);
        assert_eq!(
            receipt.content_hash,
            sha256_hex(summary.normalized_content.as_bytes())
        );
        assert_eq!(receipt.verdict, Verdict::Allow);
        assert!(!receipt.sui.posted);
        assert!(!receipt.walrus.stored);

        // Round-trips through JSON for archival.
        let json = serde_json::to_string(&receipt).unwrap();
        let reparsed: ScanReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed, receipt);
    }
}
