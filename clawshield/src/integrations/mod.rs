// clawshield/src/integrations/mod.rs
//! Subprocess wrappers over the external posting tools: the Sui ledger
//! client and the Walrus blob store. Both are best-effort collaborators
//! invoked through pre-installed command-line binaries; the scan pipeline
//! itself never performs network I/O.

pub mod sui;
pub mod walrus;
