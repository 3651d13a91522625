//! Tracing subscriber setup for console output.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Events go to stderr without timestamps, so provisioning output reads
/// like a transcript. `verbose` raises the level to `DEBUG`; a `RUST_LOG`
/// value overrides both. Calling this twice is a no-op.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chandler={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .ok();
}
