// clawshield/src/lib.rs
//! # ClawShield CLI Application
//!
//! This crate provides the command-line interface for the ClawShield Lite
//! scanner. The evaluation pipeline itself lives in `clawshield-core`; this
//! crate resolves inputs, assembles scan receipts, renders output, and
//! drives the optional Sui/Walrus posting collaborators.

pub mod cli;
pub mod commands;
pub mod input;
pub mod integrations;
pub mod logger;
pub mod output;
pub mod receipt;
