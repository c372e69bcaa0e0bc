// clawshield/src/input.rs
//! Resolution of the scan input argument into raw content bytes.
//!
//! Inputs are given as `file:PATH` or `text:YOUR TEXT`; remaining arguments
//! are joined with spaces so unquoted text works. Both kinds are tagged
//! `untrusted`; ClawShield exists to scan content whose provenance is not
//! the operator.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use clawshield_core::TrustZone;

const INPUT_HELP: &str = "expected input as file:PATH or text:YOUR_TEXT";

/// How the content was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    File,
    Text,
}

/// Provenance of a scanned input, recorded in the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDescriptor {
    pub kind: InputKind,
    pub source: String,
    pub trust_zone: TrustZone,
}

/// An input descriptor together with the loaded content.
#[derive(Debug, Clone)]
pub struct ResolvedInput {
    pub descriptor: InputDescriptor,
    pub raw_content: String,
}

/// Parses `file:`/`text:` arguments and loads the referenced content.
pub fn parse_and_load_input(parts: &[String]) -> Result<ResolvedInput> {
    let Some(first) = parts.first() else {
        bail!(INPUT_HELP);
    };

    if let Some(suffix) = first.strip_prefix("file:") {
        let rest = parts[1..].join(" ");
        let candidate = if rest.is_empty() {
            suffix.to_string()
        } else {
            format!("{suffix} {rest}")
        };
        let candidate = candidate.trim().to_string();
        if candidate.is_empty() {
            bail!(INPUT_HELP);
        }

        let full_path = std::path::absolute(&candidate)
            .with_context(|| format!("failed to resolve input path {candidate}"))?;
        let raw_content = std::fs::read_to_string(&full_path)
            .with_context(|| format!("failed to read input file {}", full_path.display()))?;

        return Ok(ResolvedInput {
            descriptor: InputDescriptor {
                kind: InputKind::File,
                source: full_path.display().to_string(),
                trust_zone: TrustZone::Untrusted,
            },
            raw_content,
        });
    }

    if let Some(first_chunk) = first.strip_prefix("text:") {
        let remainder = parts[1..].join(" ");
        let text = if remainder.is_empty() {
            first_chunk.to_string()
        } else {
            format!("{first_chunk} {remainder}")
        };

        return Ok(ResolvedInput {
            descriptor: InputDescriptor {
                kind: InputKind::Text,
                source: "inline".to_string(),
                trust_zone: TrustZone::Untrusted,
            },
            raw_content: text,
        });
    }

    bail!(INPUT_HELP);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn inline_text_joins_arguments_with_spaces() {
        let parts: Vec<String> = ["text:hello", "there", "world"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let resolved = parse_and_load_input(&parts).unwrap();
        assert_eq!(resolved.descriptor.kind, InputKind::Text);
        assert_eq!(resolved.descriptor.source, "inline");
        assert_eq!(resolved.raw_content, "hello there world");
    }

    #[test]
    fn inline_text_preserves_embedded_newlines() {
        let parts = vec!["text:line one\nline two".to_string()];
        let resolved = parse_and_load_input(&parts).unwrap();
        assert_eq!(resolved.raw_content, "line one\nline two");
    }

    #[test]
    fn file_input_reads_content_and_records_absolute_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"file body").unwrap();
        let parts = vec![format!("file:{}", file.path().display())];

        let resolved = parse_and_load_input(&parts).unwrap();
        assert_eq!(resolved.descriptor.kind, InputKind::File);
        assert_eq!(resolved.raw_content, "file body");
        assert!(std::path::Path::new(&resolved.descriptor.source).is_absolute());
    }

    #[test]
    fn unprefixed_input_is_rejected() {
        let parts = vec!["just words".to_string()];
        assert!(parse_and_load_input(&parts).is_err());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(parse_and_load_input(&[]).is_err());
        assert!(parse_and_load_input(&["file:".to_string()]).is_err());
    }
}
