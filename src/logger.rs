use std::sync::Once;

use env_logger::Builder;
use log::{LevelFilter, debug};

/// Guards the one-time logger setup
static INIT: Once = Once::new();

/// Installs the `env_logger` backend once per process.
///
/// Everything logs at `info` unless `RUST_LOG` says otherwise; the table's own
/// `debug` and `trace` output is only shown when asked for, e.g.
/// `RUST_LOG=chaintable=debug`.
pub fn initialize_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Info)
            .filter_module("chaintable", LevelFilter::Info)
            .format_timestamp_millis()
            .parse_default_env();

        // A test harness or embedding binary may have installed a logger first
        if builder.try_init().is_err() {
            debug!("logger: already initialized elsewhere");
        }
    });
}
