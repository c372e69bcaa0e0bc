//! errors.rs - Custom error types for the clawshield-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `clawshield-core` library.
///
/// Every variant is fatal for the evaluation that raised it: a policy that
/// fails validation must never reach the matching stage. Malformed regex
/// patterns inside an otherwise valid policy are *not* errors; they are
/// skipped during compilation so a bad configuration entry cannot deny
/// service for the whole scan.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PolicyError {
    #[error("policy tool mismatch: expected {expected}, got {found}")]
    ToolMismatch { expected: String, found: String },

    #[error("policy rules must be a non-empty list")]
    EmptyRuleSet,

    #[error("policy thresholds are invalid: block_threshold ({block}) must be >= sanitize_threshold ({sanitize})")]
    InvalidThresholds { block: i32, sanitize: i32 },

    #[error("failed to read policy file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse policy document: {0}")]
    Parse(#[from] serde_json::Error),
}
