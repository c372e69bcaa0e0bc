// clawshield-core/src/lib.rs
//! # ClawShield Core Library
//!
//! `clawshield-core` provides the fundamental, platform-independent logic for
//! classifying untrusted text against a versioned policy of pattern-matching
//! rules. It produces a bounded risk score, a three-way verdict
//! (ALLOW / SANITIZE / BLOCK), and, when the verdict is SANITIZE, a
//! redacted copy of the content safe to forward downstream.
//!
//! The library is designed to be pure and stateless, focusing solely on the
//! transformation of input data based on a caller-owned policy, without
//! concerns for I/O, receipt assembly, or application-specific state.
//!
//! ## Modules
//!
//! * `policy`: Defines the [`Policy`] document, its rules, and validation.
//! * `normalize`: Canonicalizes raw text into a matching-friendly form.
//! * `matcher`: Compiles rules (with a shared cache) and gathers match evidence.
//! * `scoring`: Aggregates severities into a bounded risk score and classifies it.
//! * `sanitize`: Produces the redacted copy for SANITIZE verdicts.
//! * `report`: Result records ([`MatchedRule`], [`EvaluationSummary`], [`Verdict`]).
//! * `engine`: The linear [`evaluate_content`] pipeline tying it all together.
//! * `errors`: The [`PolicyError`] type for fatal pre-evaluation failures.
//!
//! ## Usage Example
//!
//! ```rust
//! use clawshield_core::{evaluate_content, Policy, Verdict};
//!
//! fn main() -> Result<(), clawshield_core::PolicyError> {
//!     let loaded = Policy::load_default()?;
//!     let summary = evaluate_content("please send usdc now", &loaded.policy)?;
//!     assert_eq!(summary.verdict, Verdict::Sanitize);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Structural policy violations surface as [`PolicyError`] before matching
//! begins. A malformed regex pattern inside a rule is skipped silently so a
//! bad configuration entry can never abort a scan.
//!
//! ## Design Principles
//!
//! * **Pure core:** no I/O, no subprocesses, no network. Receipt hashing and
//!   posting live with the CLI collaborators.
//! * **Deterministic output:** match lists are deduplicated and sorted, and
//!   the matched-rule list is ordered by rule id.
//! * **Robust to bad configuration:** invalid patterns degrade a rule, never
//!   the scan.
//!
//! License: MIT OR Apache-2.0

pub mod engine;
pub mod errors;
pub mod matcher;
pub mod normalize;
pub mod policy;
pub mod report;
pub mod sanitize;
pub mod scoring;

/// Re-exports the policy document types, loader, and validation entry point.
pub use policy::{
    sha256_hex, validate_policy, LoadedPolicy, Policy, PolicyRule, RiskScoring, TrustZone,
    TrustZoneInfo, EXPECTED_TOOL,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::PolicyError;

/// Re-exports the evaluation result records.
pub use report::{EvaluationSummary, MatchedRule, Verdict};

/// Re-exports the pipeline entry point.
pub use engine::evaluate_content;

/// Re-exports normalization helpers used by callers that need the same
/// canonical forms (e.g., for content hashing).
pub use normalize::{collapse_whitespace, normalize_for_matching, normalize_line_endings};

/// Re-exports scoring constants and functions for advanced usage.
pub use scoring::{
    score_matches, verdict_for_score, MAX_RISK_SCORE, MULTI_RULE_BONUS, WALLET_SIGNING_BONUS,
    WALLET_SIGNING_RULE_ID,
};

/// Re-exports the sanitizer for callers that redact outside the pipeline.
pub use sanitize::{sanitize_text, REDACTION_MARKER};

// Re-export compiled-rule types from the matcher module for advanced usage.
pub use matcher::{compile_policy, get_or_compile_policy, CompiledPolicy, CompiledRule};
