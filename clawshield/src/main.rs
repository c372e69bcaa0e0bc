// clawshield/src/main.rs
//! ClawShield Lite entry point.

use anyhow::Result;
use clap::Parser;

use clawshield::cli::{Cli, Commands};
use clawshield::commands;
use clawshield::logger;

fn main() -> Result<()> {
    let args = Cli::parse();
    logger::init_logger(args.quiet, args.debug);

    match &args.command {
        Commands::Scan(cmd) => commands::scan::run(cmd),
        Commands::Demo => commands::demo::run(),
        Commands::Publish(cmd) => commands::publish::run(cmd),
    }
}
