use std::{fmt::Display, path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

const LOG_DIR: &str = "logs";
const KEPT_LOG_FILES: usize = 5;

/// Which process is writing logs. Each one rotates its own files inside the same directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSource {
    /// Short-lived invocations. Only problems are interesting here.
    Cli,
    /// `remind serve`, usually running detached with nobody watching stdout.
    Reminder,
}

impl LogSource {
    fn file_prefix(self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Reminder => "reminder",
        }
    }

    fn default_level(self) -> LevelFilter {
        match self {
            Self::Cli => LevelFilter::WARN,
            Self::Reminder => LevelFilter::DEBUG,
        }
    }
}

/// Restricts output to this crate, dependencies stay quiet.
fn crate_filter(level: impl Display) -> EnvFilter {
    EnvFilter::new(format!("{}={level}", env!("CARGO_CRATE_NAME")))
}

/// Installs the global subscriber writing into `app_dir/logs`.
///
/// `verbose` raises the level to trace and mirrors everything to stdout. Otherwise `RUST_LOG`
/// picks the level, falling back to the default of `source`.
pub fn enable_logging(source: LogSource, app_dir: &Path, verbose: bool) -> Result<()> {
    let files = Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(KEPT_LOG_FILES)
        .filename_prefix(source.file_prefix())
        .build(app_dir.join(LOG_DIR))?;

    let level = if verbose {
        LevelFilter::TRACE.to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| source.default_level().to_string())
    };

    tracing_subscriber::fmt()
        .with_env_filter(crate_filter(level))
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false)
        .with_writer(files.and(std::io::stdout.with_filter(move |_| verbose)))
        .init();
    Ok(())
}

/// Dereference at the start of a test to see its logs. Safe to touch from many tests.
pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(crate_filter(LevelFilter::TRACE))
        .with_test_writer()
        .try_init();
});
