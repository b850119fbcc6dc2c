//! Diagnostic logging.
//!
//! Logs go to stderr so the report on stdout stays clean. `RUST_LOG`
//! overrides the level chosen on the command line.

use tracing_subscriber::{fmt, EnvFilter};

/// Log level chosen from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    /// Default: unhandled failures and failed cleanups only
    #[default]
    Warn,
    Off,
}

impl LogLevel {
    fn directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Off => "off",
        }
    }

    /// `--quiet` wins over any number of `-v`
    pub fn from_flags(verbosity: u8, quiet: bool) -> Self {
        if quiet {
            LogLevel::Off
        } else {
            LogLevel::from(verbosity)
        }
    }
}

impl From<u8> for LogLevel {
    /// 0 = Warn, 1 = Info, 2 = Debug, 3+ = Trace
    fn from(verbosity: u8) -> Self {
        match verbosity {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Install the global subscriber. Call once, before any scenario runs.
pub fn init_logging(level: LogLevel) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level.directive())
    };

    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(level == LogLevel::Trace)
        .without_time()
        .init();
}
