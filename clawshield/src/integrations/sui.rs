// clawshield/src/integrations/sui.rs
//! Subprocess wrapper around the `sui` command-line tool.
//!
//! ClawShield never talks to the chain in-process: receipts are recorded by
//! shelling out to a pre-installed `sui` binary and parsing its `--json`
//! output. The JSON shape differs across sui releases, so digest and package
//! extraction probe several known locations.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;

use clawshield_core::Verdict;

use crate::receipt::ScanReceipt;

const RECEIPT_MODULE: &str = "clawshield_receipts";
const RECORD_FUNCTION: &str = "record_receipt";
const CALL_GAS_BUDGET: &str = "10000000";
const PUBLISH_GAS_BUDGET: &str = "100000000";

/// The Sui networks receipts may be posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuiNetwork {
    Devnet,
    Testnet,
}

impl std::fmt::Display for SuiNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuiNetwork::Devnet => f.write_str("devnet"),
            SuiNetwork::Testnet => f.write_str("testnet"),
        }
    }
}

/// Parses a network name, defaulting to devnet for anything unrecognized.
pub fn parse_network(value: Option<&str>) -> SuiNetwork {
    match value {
        Some("testnet") => SuiNetwork::Testnet,
        _ => SuiNetwork::Devnet,
    }
}

/// Result of recording a receipt on-chain.
#[derive(Debug, Clone)]
pub struct SuiRecordResult {
    pub tx_digest: String,
    pub raw_output: String,
}

/// Result of publishing the receipt Move package.
#[derive(Debug, Clone)]
pub struct SuiPublishResult {
    pub package_id: String,
    pub tx_digest: String,
    pub raw_output: String,
}

fn run_sui(args: &[&str]) -> Result<String> {
    let output = Command::new("sui")
        .args(args)
        .output()
        .context("sui CLI execution failed")?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "sui command failed ({}): {}",
            output.status,
            format!("{stderr}{stdout}").trim()
        );
    }
    Ok(stdout)
}

/// Extracts the first top-level JSON object embedded in CLI output that may
/// be surrounded by log lines.
fn extract_json_object(raw: &str) -> Result<Value> {
    let first = raw.find('{');
    let last = raw.rfind('}');
    let (Some(first), Some(last)) = (first, last) else {
        bail!("unable to parse sui JSON output: {}", raw.trim());
    };
    if last <= first {
        bail!("unable to parse sui JSON output: {}", raw.trim());
    }
    let value: Value = serde_json::from_str(&raw[first..=last])
        .context("sui JSON output is not valid JSON")?;
    if !value.is_object() {
        bail!("sui JSON output is not an object");
    }
    Ok(value)
}

fn as_str(value: Option<&Value>) -> &str {
    value.and_then(Value::as_str).unwrap_or("")
}

fn extract_tx_digest(parsed: &Value) -> String {
    const CANDIDATES: &[&str] = &[
        "/effects/V2/transaction_digest",
        "/effects/V1/transactionDigest",
        "/effects/transaction_digest",
        "/digest",
        "/effects/transactionDigest",
        "/transactionDigest",
        "/result/digest",
    ];
    for pointer in CANDIDATES {
        let digest = as_str(parsed.pointer(pointer));
        if !digest.is_empty() {
            return digest.to_string();
        }
    }
    String::new()
}

fn extract_package_id(parsed: &Value) -> String {
    let direct = as_str(parsed.pointer("/packageId"));
    if !direct.is_empty() {
        return direct.to_string();
    }

    if let Some(changes) = parsed.pointer("/objectChanges").and_then(Value::as_array) {
        for change in changes {
            if as_str(change.get("type")) != "published" {
                continue;
            }
            let package_id = as_str(change.get("packageId"));
            if !package_id.is_empty() {
                return package_id.to_string();
            }
        }
    }

    if let Some(changes) = parsed.pointer("/changed_objects").and_then(Value::as_array) {
        for change in changes {
            if as_str(change.get("objectType")) != "package" {
                continue;
            }
            let object_id = as_str(change.get("objectId"));
            if !object_id.is_empty() {
                return object_id.to_string();
            }
        }
    }

    String::new()
}

/// Decodes a hex digest into its byte values.
fn hex_to_byte_array(hex_str: &str) -> Result<Vec<u8>> {
    hex::decode(hex_str.trim().to_lowercase())
        .map_err(|e| anyhow!("invalid hex digest: {e}"))
}

/// Renders bytes as the `[1,2,3]` vector literal the sui CLI expects.
fn to_sui_vector_arg(values: &[u8]) -> String {
    let joined = values
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("[{joined}]")
}

/// Wire encoding of a verdict for the Move contract.
fn verdict_to_code(verdict: Verdict) -> u8 {
    match verdict {
        Verdict::Allow => 0,
        Verdict::Sanitize => 1,
        Verdict::Block => 2,
    }
}

fn ensure_network(network: SuiNetwork) -> Result<()> {
    let env_name = network.to_string();
    run_sui(&["client", "switch", "--env", env_name.as_str()]).map(|_| ())
}

fn should_fallback_to_test_publish(message: &str) -> bool {
    message.contains("not present in `Move.toml`")
        || message.contains("not present in Move.toml")
        || message.contains("package is already published")
}

fn publish_with_fallback(move_path: &str, network: SuiNetwork) -> Result<String> {
    let publish_args = [
        "client",
        "publish",
        move_path,
        "--json",
        "--gas-budget",
        PUBLISH_GAS_BUDGET,
    ];

    match run_sui(&publish_args) {
        Ok(stdout) => Ok(stdout),
        Err(e) => {
            let message = e.to_string();
            if !should_fallback_to_test_publish(&message) {
                return Err(e);
            }

            let pubfile = std::env::temp_dir().join(format!(
                "clawshield-pub-{}-{}.toml",
                network,
                std::process::id()
            ));
            let pubfile = pubfile.to_string_lossy().into_owned();
            let network_name = network.to_string();
            let test_publish_args = [
                "client",
                "test-publish",
                move_path,
                "--build-env",
                network_name.as_str(),
                "--pubfile-path",
                pubfile.as_str(),
                "--json",
                "--gas-budget",
                PUBLISH_GAS_BUDGET,
            ];
            run_sui(&test_publish_args)
        }
    }
}

fn resolve_move_package_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("move"))
}

/// Publishes the receipt Move package, falling back to `test-publish` for
/// environments where the package address is pinned or already taken.
pub fn publish_package(
    network: SuiNetwork,
    explicit_move_path: Option<&Path>,
) -> Result<SuiPublishResult> {
    let move_path = resolve_move_package_path(explicit_move_path);
    let move_path = move_path.to_string_lossy().into_owned();
    ensure_network(network)?;

    let stdout = publish_with_fallback(&move_path, network)?;
    let parsed = extract_json_object(&stdout)?;
    let package_id = extract_package_id(&parsed);
    if package_id.is_empty() {
        bail!("publish succeeded but package id not found in output: {stdout}");
    }

    Ok(SuiPublishResult {
        package_id,
        tx_digest: extract_tx_digest(&parsed),
        raw_output: stdout,
    })
}

/// Records a scan receipt on-chain via `sui client call`.
pub fn record_receipt(
    receipt: &ScanReceipt,
    package_id: &str,
    network: SuiNetwork,
) -> Result<SuiRecordResult> {
    ensure_network(network)?;

    let content_hash = to_sui_vector_arg(&hex_to_byte_array(&receipt.content_hash)?);
    let policy_hash = to_sui_vector_arg(&hex_to_byte_array(&receipt.policy_hash)?);
    let walrus_blob = to_sui_vector_arg(receipt.walrus.blob_id.as_bytes());
    let verdict_code = verdict_to_code(receipt.verdict).to_string();
    let risk_score = receipt.risk_score.to_string();
    let policy_version = receipt.policy_version.to_string();
    let timestamp_ms = receipt.timestamp_ms.to_string();

    let args = [
        "client",
        "call",
        "--json",
        "--package",
        package_id,
        "--module",
        RECEIPT_MODULE,
        "--function",
        RECORD_FUNCTION,
        "--args",
        content_hash.as_str(),
        policy_hash.as_str(),
        verdict_code.as_str(),
        risk_score.as_str(),
        policy_version.as_str(),
        timestamp_ms.as_str(),
        walrus_blob.as_str(),
        "--gas-budget",
        CALL_GAS_BUDGET,
    ];

    let stdout = run_sui(&args)?;
    let parsed = extract_json_object(&stdout)?;

    Ok(SuiRecordResult {
        tx_digest: extract_tx_digest(&parsed),
        raw_output: stdout,
    })
}
