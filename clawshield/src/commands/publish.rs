// clawshield/src/commands/publish.rs
//! The publish command: publishes the receipt Move package through the sui
//! CLI and prints the package id to configure for posting.

use anyhow::Result;

use crate::cli::PublishCommand;
use crate::integrations::sui;

/// Entry point for `clawshield publish`.
pub fn run(cmd: &PublishCommand) -> Result<()> {
    let network = sui::parse_network(std::env::var("CLAWSHIELD_SUI_NETWORK").ok().as_deref());
    let result = sui::publish_package(network, cmd.move_path.as_deref())?;

    println!("ClawShield Lite Move package published.");
    println!("network={network}");
    println!("package_id={}", result.package_id);
    println!("tx_digest={}", result.tx_digest);
    println!("Set CLAWSHIELD_SUI_PACKAGE_ID to this package_id before posting scan receipts.");
    Ok(())
}
