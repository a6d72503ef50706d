// src/logging.rs
// =============================================================================
// Diagnostic logging to stderr.
//
// The per-file report stays on stdout (println!) so it can be piped or read
// as JSON. Everything else (skipped files, failed downloads) is logged here
// and filtered with RUST_LOG, e.g. RUST_LOG=cdn_localizer=debug.
// =============================================================================

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,cdn_localizer=info";

pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}
