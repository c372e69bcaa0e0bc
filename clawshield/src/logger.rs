// clawshield/src/logger.rs
//! Logger initialization for the CLI.
//!
//! Respects `RUST_LOG` when set; the `--quiet` and `--debug` flags pick the
//! default filter otherwise. Log output goes to stderr so stdout stays
//! machine-parseable for `--json`.

pub fn init_logger(quiet: bool, debug: bool) {
    let default_filter = if quiet {
        "off"
    } else if debug {
        "debug"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
