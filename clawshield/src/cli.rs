// clawshield/src/cli.rs
//! This file defines the command-line interface (CLI) for the clawshield
//! application, including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "clawshield",
    author = "ClawShield contributors",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scan untrusted agent instructions against a versioned policy",
    long_about = "ClawShield Lite is a pre-execution guard for untrusted text. It classifies \
content against a policy of pattern-matching rules, produces a risk score and an \
ALLOW/SANITIZE/BLOCK verdict, and emits a scan receipt that can optionally be posted to Sui \
and archived on Walrus via their command-line tools.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Suppress all informational and debug messages.
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long, short = 'd', global = true)]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `clawshield` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scans an input and prints the verdict, matched rules, and receipt.
    #[command(about = "Scan an input (file:PATH or text:WORDS) and print the scan receipt.")]
    Scan(ScanCommand),

    /// Runs the built-in demo samples and checks their expected verdicts.
    #[command(about = "Run the embedded benign/ambiguous/malicious samples and verify verdicts.")]
    Demo,

    /// Publishes the companion Move package via the sui CLI.
    #[command(about = "Publish the receipt Move package and print its package id.")]
    Publish(PublishCommand),
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Print the receipt as compact JSON instead of the human summary.
    #[arg(long, help = "Print the scan receipt as compact JSON on stdout.")]
    pub json: bool,

    /// Path to a custom policy document (JSON).
    #[arg(long = "policy", value_name = "FILE", help = "Path to a custom policy JSON document.")]
    pub policy: Option<PathBuf>,

    /// The input to scan: `file:PATH` or `text:YOUR TEXT` (remaining
    /// arguments are joined with spaces).
    #[arg(value_name = "INPUT", required = true, num_args = 1.., trailing_var_arg = true)]
    pub input: Vec<String>,
}

/// Arguments for the `publish` command.
#[derive(Parser, Debug)]
pub struct PublishCommand {
    /// Path to the Move package to publish (defaults to ./move).
    #[arg(long = "move-path", value_name = "DIR", help = "Path to the Move package directory.")]
    pub move_path: Option<PathBuf>,
}
