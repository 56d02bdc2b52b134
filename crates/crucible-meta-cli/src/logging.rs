//! Subscriber setup shared by both binaries.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// How much logging output to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Bare status messages.
    #[default]
    Normal,
    /// Level, module and source location on every line, plus debug events.
    Debug,
}

/// Install the global subscriber, writing to stdout.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init(level: LogLevel) {
    let default_directive = match level {
        LogLevel::Normal => "info",
        LogLevel::Debug => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout);

    match level {
        LogLevel::Normal => builder
            .without_time()
            .with_ansi(false)
            .with_level(false)
            .with_target(false)
            .init(),
        LogLevel::Debug => builder
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .init(),
    }
}
