// clawshield/src/integrations/walrus.rs
//! Subprocess wrapper around the `walrus` command-line tool.
//!
//! Receipts are archived by writing the JSON payload to a temporary file and
//! invoking `walrus store`. An unavailable or failing CLI is reported in the
//! returned status, never as an error: blob archival is best-effort and must
//! not fail a scan.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde_json::Value;
use std::process::Command;

/// Outcome of a walrus store attempt.
#[derive(Debug, Clone)]
pub struct WalrusStoreResult {
    pub stored: bool,
    pub blob_id: String,
    pub message: String,
}

impl WalrusStoreResult {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            stored: false,
            blob_id: String::new(),
            message: message.into(),
        }
    }
}

lazy_static! {
    static ref BLOB_ID_SHAPE: Regex =
        Regex::new(r"^(z-[A-Za-z0-9_-]+|(?i)walrus://[A-Za-z0-9._:-]+)$").unwrap();
    static ref BLOB_ID_PATTERNS: Vec<Regex> = vec![
        Regex::new(r#"(?i)"blobId"\s*:\s*"([^"]+)""#).unwrap(),
        Regex::new(r#"(?i)"blob_id"\s*:\s*"([^"]+)""#).unwrap(),
        Regex::new(r#"(?i)blob[_\s-]?id[:=\s"'`]+([A-Za-z0-9._:-]+)"#).unwrap(),
        Regex::new(r"\b(z-[A-Za-z0-9_-]+)\b").unwrap(),
        Regex::new(r"(?i)(walrus://[A-Za-z0-9._:-]+)").unwrap(),
    ];
}

fn is_likely_blob_id(value: &str) -> bool {
    BLOB_ID_SHAPE.is_match(value.trim())
}

/// Recursively searches parsed JSON for a plausible blob id.
fn extract_blob_id_from_json(value: &Value) -> String {
    match value {
        Value::String(s) if is_likely_blob_id(s) => s.trim().to_string(),
        Value::Array(entries) => entries
            .iter()
            .map(extract_blob_id_from_json)
            .find(|found| !found.is_empty())
            .unwrap_or_default(),
        Value::Object(map) => {
            for key in ["blob_id", "blobId", "blobID", "blob"] {
                if let Some(Value::String(candidate)) = map.get(key) {
                    if is_likely_blob_id(candidate) {
                        return candidate.trim().to_string();
                    }
                }
            }
            map.values()
                .map(extract_blob_id_from_json)
                .find(|found| !found.is_empty())
                .unwrap_or_default()
        }
        _ => String::new(),
    }
}

fn extract_blob_id(stdout: &str, combined_output: &str) -> String {
    let trimmed = stdout.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
            let from_json = extract_blob_id_from_json(&parsed);
            if !from_json.is_empty() {
                return from_json;
            }
        }
    }

    for pattern in BLOB_ID_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(combined_output) {
            if let Some(found) = caps.get(1) {
                return found.as_str().to_string();
            }
        }
    }

    String::new()
}

/// The walrus CLI sometimes exits zero while printing an error report.
fn has_walrus_error(output: &str) -> bool {
    const ERROR_MARKERS: &[&str] = &[
        "error:",
        "[child] error:",
        "max failovers exceeded",
        "client internal error",
        "transport error",
    ];
    let lower = output.to_lowercase();
    ERROR_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn walrus_available() -> bool {
    Command::new("walrus")
        .arg("--help")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Stores a JSON payload as a walrus blob for `epochs` storage epochs.
pub fn store_json(json_payload: &str, epochs: u32) -> WalrusStoreResult {
    if !walrus_available() {
        return WalrusStoreResult::failure("walrus CLI not found; skipping walrus storage");
    }

    let temp_dir = match tempfile::Builder::new().prefix("clawshield-").tempdir() {
        Ok(dir) => dir,
        Err(e) => return WalrusStoreResult::failure(format!("walrus store failed: {e}")),
    };
    let payload_path = temp_dir.path().join("receipt.json");
    if let Err(e) = std::fs::write(&payload_path, json_payload) {
        return WalrusStoreResult::failure(format!("walrus store failed: {e}"));
    }

    // Keep uploads in this process so failures return non-zero immediately.
    let epochs_arg = epochs.to_string();
    let run = Command::new("walrus")
        .args([
            "store",
            "--epochs",
            epochs_arg.as_str(),
            "--json",
            "--child-process-uploads=false",
        ])
        .arg(&payload_path)
        .output();

    let run = match run {
        Ok(output) => output,
        Err(e) => return WalrusStoreResult::failure(format!("walrus store failed: {e}")),
    };

    let stdout = String::from_utf8_lossy(&run.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&run.stderr).into_owned();
    let output = format!("{stdout}\n{stderr}").trim().to_string();
    debug!("walrus store finished with status {}", run.status);

    if !run.status.success() {
        return WalrusStoreResult::failure(format!(
            "walrus store failed ({}): {output}",
            run.status
        ));
    }
    if has_walrus_error(&output) {
        return WalrusStoreResult::failure(format!("walrus reported an error: {output}"));
    }

    let blob_id = extract_blob_id(&stdout, &output);
    if blob_id.is_empty() {
        return WalrusStoreResult::failure(format!(
            "walrus store finished without a blob id in output: {output}"
        ));
    }

    WalrusStoreResult {
        stored: true,
        blob_id,
        message: "walrus receipt stored".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recognizes_plausible_blob_id_shapes() {
        assert!(is_likely_blob_id("z-abc_123"));
        assert!(is_likely_blob_id("walrus://blob.id:1"));
        assert!(!is_likely_blob_id(""));
        assert!(!is_likely_blob_id("just words"));
    }

    #[test]
    fn extracts_blob_id_from_nested_json() {
        let value = json!({"result": {"newlyCreated": {"blobObject": {"blobId": "z-deep"}}}});
        assert_eq!(extract_blob_id_from_json(&value), "z-deep");
    }

    #[test]
    fn extracts_blob_id_from_free_text_output() {
        let combined = "stored blob\nBlob ID: z-abc123\ndone";
        assert_eq!(extract_blob_id("", combined), "z-abc123");
    }

    #[test]
    fn prefers_json_stdout_over_text_fallback() {
        let stdout = r#"{"blob_id": "z-json"}"#;
        let combined = format!("{stdout}\nblob id: z-text");
        assert_eq!(extract_blob_id(stdout, &combined), "z-json");
    }

    #[test]
    fn detects_error_markers_case_insensitively() {
        assert!(has_walrus_error("[child] Error: upload failed"));
        assert!(has_walrus_error("Max Failovers Exceeded"));
        assert!(!has_walrus_error("all good"));
    }
}
