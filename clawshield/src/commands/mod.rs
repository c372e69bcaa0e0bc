// clawshield/src/commands/mod.rs
//! Command implementations for the clawshield CLI.

pub mod demo;
pub mod publish;
pub mod scan;
