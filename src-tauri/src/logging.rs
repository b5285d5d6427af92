//! Logging setup shared by the CLI and the desktop shell.
//!
//! The library logs through the `log` facade; the subscriber installed here
//! also captures those records. `RUST_LOG` wins over the built-in default.

use tracing_subscriber::EnvFilter;

pub(crate) fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "pdf_unlocker_lib=debug,pdf_unlocker_cli=debug,info"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
