//! Logging setup.
//!
//! Installs a `tracing_subscriber` registry with an `EnvFilter` (`RUST_LOG`, or the
//! given default directive) and a compact fmt layer. The scanner itself only emits
//! `tracing` events; installing a subscriber is left to the embedding application.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*, util::TryInitError};

/// Directive used when `RUST_LOG` is not set
pub const DEFAULT_LOG_DIRECTIVE: &str = "info";

/// Installs the global subscriber writing to stdout
pub fn setup_logging() -> Result<(), TryInitError> {
	setup_logging_with_writer(std::io::stdout, DEFAULT_LOG_DIRECTIVE)
}

/// Installs the global subscriber writing to `writer`
///
/// Fails if a global subscriber is already installed.
pub fn setup_logging_with_writer<W>(writer: W, default_directive: &str) -> Result<(), TryInitError>
where
	W: for<'writer> fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::registry()
		.with(filter)
		.with(
			fmt::layer()
				.with_writer(writer)
				.with_target(true)
				.with_thread_ids(false)
				.with_ansi(false)
				.compact(),
		)
		.try_init()
}
