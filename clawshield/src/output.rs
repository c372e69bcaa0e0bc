// clawshield/src/output.rs
//! Human-readable and JSON rendering of scan receipts.

use anyhow::Result;
use owo_colors::OwoColorize;

use clawshield_core::Verdict;

use crate::input::InputKind;
use crate::receipt::ScanReceipt;

const PREVIEW_MAX_CHARS: usize = 240;

pub fn receipt_to_pretty_json(receipt: &ScanReceipt) -> Result<String> {
    Ok(serde_json::to_string_pretty(receipt)?)
}

pub fn receipt_to_compact_json(receipt: &ScanReceipt) -> Result<String> {
    Ok(serde_json::to_string(receipt)?)
}

fn truncate(input: &str, max: usize) -> String {
    if input.chars().count() <= max {
        return input.to_string();
    }
    let prefix: String = input.chars().take(max).collect();
    format!("{prefix}...")
}

fn verdict_label(verdict: Verdict, colored: bool) -> String {
    if !colored {
        return verdict.to_string();
    }
    match verdict {
        Verdict::Allow => verdict.green().to_string(),
        Verdict::Sanitize => verdict.yellow().to_string(),
        Verdict::Block => verdict.red().to_string(),
    }
}

fn input_kind_label(kind: InputKind) -> &'static str {
    match kind {
        InputKind::File => "file",
        InputKind::Text => "text",
    }
}

/// Renders the full human summary: verdict, score, matched rules, sanitized
/// preview, posting status, notes, and the pretty receipt JSON.
pub fn format_human_output(
    receipt: &ScanReceipt,
    notes: &[String],
    colored: bool,
) -> Result<String> {
    let mut lines: Vec<String> = Vec::new();
    lines.push("=== ClawShield Lite Scan ===".to_string());
    lines.push(format!(
        "Input: {}:{}",
        input_kind_label(receipt.input.kind),
        receipt.input.source
    ));
    lines.push(format!("Verdict: {}", verdict_label(receipt.verdict, colored)));
    lines.push(format!("Risk score: {}/100", receipt.risk_score));
    lines.push(format!("Matched rules: {}", receipt.matched_rules.len()));

    for rule in &receipt.matched_rules {
        lines.push(format!("- {} ({}): {}", rule.id, rule.severity, rule.title));
        lines.push(format!("  matches: {}", rule.matches.join(", ")));
    }

    if receipt.verdict == Verdict::Sanitize {
        lines.push("Sanitized preview:".to_string());
        lines.push(truncate(
            &receipt.sanitized_text.replace('\n', " "),
            PREVIEW_MAX_CHARS,
        ));
    }

    let package = if receipt.sui.package_id.is_empty() {
        "unset"
    } else {
        receipt.sui.package_id.as_str()
    };
    lines.push(format!(
        "Sui receipt: {} (network={}, package={}, tx={})",
        if receipt.sui.posted { "posted" } else { "not posted" },
        receipt.sui.network,
        package,
        receipt.sui.tx_digest
    ));
    lines.push(format!(
        "Walrus log: {} (blob_id={})",
        if receipt.walrus.stored { "stored" } else { "not stored" },
        receipt.walrus.blob_id
    ));

    for note in notes {
        lines.push(format!("Note: {note}"));
    }

    lines.push("Receipt JSON:".to_string());
    lines.push(receipt_to_pretty_json(receipt)?);

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_appends_ellipsis_beyond_limit() {
        assert_eq!(truncate("short", 240), "short");
        let long = "x".repeat(300);
        let out = truncate(&long, 240);
        assert_eq!(out.chars().count(), 243);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn verdict_labels_are_plain_without_color() {
        assert_eq!(verdict_label(Verdict::Block, false), "BLOCK");
        assert_eq!(verdict_label(Verdict::Allow, false), "ALLOW");
    }
}
