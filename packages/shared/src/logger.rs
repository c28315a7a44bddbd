//! Logger setup built on `tracing-subscriber`.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Build the default filter directive for a binary.
///
/// Crate names use underscores in targets, so `pixel-chat-client` becomes
/// `pixel_chat_client=<level>`.
pub fn default_directive(bin_name: &str, level: &str) -> String {
    format!("{}={}", bin_name.replace('-', "_"), level)
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the given default level. Calling this
/// more than once is harmless: later calls leave the installed subscriber
/// in place and return `false`. Output goes to
/// stderr so it does not interleave with the chat transcript on stdout.
///
/// # Arguments
///
/// * `bin_name` - Name of the running binary (usually `env!("CARGO_BIN_NAME")`)
/// * `level` - Default log level such as `"info"` or `"debug"`
pub fn setup_logger(bin_name: &str, level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(bin_name, level)));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init();

    match installed {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("Logger already initialized, keeping it: {}", e);
            false
        }
    }
}
