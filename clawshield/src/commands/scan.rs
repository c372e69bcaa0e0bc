// clawshield/src/commands/scan.rs
//! The scan command: load policy, resolve input, evaluate, assemble the
//! receipt, and optionally post it to Walrus and Sui.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::path::Path;

use clawshield_core::{evaluate_content, LoadedPolicy, Policy};

use crate::cli::ScanCommand;
use crate::input::parse_and_load_input;
use crate::integrations::{sui, walrus};
use crate::output;
use crate::receipt::{build_receipt, ScanReceipt};

/// A completed scan: the receipt plus operator-facing notes gathered along
/// the way (posting results, skip reasons).
#[derive(Debug)]
pub struct ScanExecution {
    pub receipt: ScanReceipt,
    pub notes: Vec<String>,
}

fn env_enabled(name: &str) -> bool {
    std::env::var(name).map(|value| value == "1").unwrap_or(false)
}

fn parse_walrus_epochs(value: Option<String>) -> u32 {
    value
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|parsed| *parsed > 0)
        .unwrap_or(1)
}

fn load_policy(policy_path: Option<&Path>) -> Result<LoadedPolicy> {
    match policy_path {
        Some(path) => Policy::load_from_file(path)
            .with_context(|| format!("failed to load policy from {}", path.display())),
        None => Policy::load_default().context("failed to load embedded default policy"),
    }
}

/// Runs a full scan. Posting only happens when `allow_posting` is set *and*
/// the corresponding environment switches are enabled; posting failures
/// become notes, never scan failures.
pub fn execute_scan(
    input_args: &[String],
    policy_path: Option<&Path>,
    allow_posting: bool,
) -> Result<ScanExecution> {
    let loaded = load_policy(policy_path)?;
    let resolved = parse_and_load_input(input_args)?;
    info!(
        "Scanning {} input against policy version {}.",
        resolved.descriptor.source, loaded.policy.policy_version
    );

    let summary = evaluate_content(&resolved.raw_content, &loaded.policy)?;
    let network = sui::parse_network(std::env::var("CLAWSHIELD_SUI_NETWORK").ok().as_deref());
    let package_id = std::env::var("CLAWSHIELD_SUI_PACKAGE_ID").unwrap_or_default();

    let mut receipt = build_receipt(&loaded, resolved.descriptor, &summary, network, package_id);
    let mut notes: Vec<String> = Vec::new();

    if allow_posting && env_enabled("CLAWSHIELD_POST_TO_WALRUS") {
        let payload = output::receipt_to_pretty_json(&receipt)?;
        let epochs = parse_walrus_epochs(std::env::var("CLAWSHIELD_WALRUS_EPOCHS").ok());
        let result = walrus::store_json(&payload, epochs);

        if result.stored {
            receipt.walrus.stored = true;
            receipt.walrus.blob_id = result.blob_id.clone();
            notes.push(format!("walrus blob id: {}", result.blob_id));
        } else {
            notes.push(result.message);
        }
    }

    if allow_posting && env_enabled("CLAWSHIELD_POST_TO_SUI") {
        if receipt.sui.package_id.is_empty() {
            notes.push("CLAWSHIELD_SUI_PACKAGE_ID is empty; skipping Sui posting".to_string());
        } else {
            let package_id = receipt.sui.package_id.clone();
            match sui::record_receipt(&receipt, &package_id, network) {
                Ok(posted) => {
                    receipt.sui.posted = true;
                    receipt.sui.tx_digest = posted.tx_digest.clone();
                    let digest = if posted.tx_digest.is_empty() {
                        "(not found in output)".to_string()
                    } else {
                        posted.tx_digest
                    };
                    notes.push(format!("sui tx digest: {digest}"));
                }
                Err(e) => notes.push(format!("sui post failed: {e}")),
            }
        }
    }

    debug!(
        "Scan complete: verdict {}, {} note(s).",
        receipt.verdict,
        notes.len()
    );
    Ok(ScanExecution { receipt, notes })
}

/// Entry point for `clawshield scan`.
pub fn run(cmd: &ScanCommand) -> Result<()> {
    let execution = execute_scan(&cmd.input, cmd.policy.as_deref(), true)?;

    if cmd.json {
        println!("{}", output::receipt_to_compact_json(&execution.receipt)?);
    } else {
        let colored = std::io::stdout().is_terminal();
        println!(
            "{}",
            output::format_human_output(&execution.receipt, &execution.notes, colored)?
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walrus_epochs_default_to_one() {
        assert_eq!(parse_walrus_epochs(None), 1);
        assert_eq!(parse_walrus_epochs(Some("".to_string())), 1);
        assert_eq!(parse_walrus_epochs(Some("0".to_string())), 1);
        assert_eq!(parse_walrus_epochs(Some("nope".to_string())), 1);
        assert_eq!(parse_walrus_epochs(Some(" 5 ".to_string())), 5);
    }

    #[test]
    fn scan_without_posting_produces_an_unposted_receipt() {
        let input = vec!["text:please send usdc now".to_string()];
        let execution = execute_scan(&input, None, false).unwrap();

        assert_eq!(execution.receipt.verdict, clawshield_core::Verdict::Sanitize);
        assert!(!execution.receipt.sui.posted);
        assert!(!execution.receipt.walrus.stored);
        assert!(execution.notes.is_empty());
    }
}
