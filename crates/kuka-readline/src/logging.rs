//! File logging for the REPL.
//!
//! Log lines go to a daily file under the config directory so they never
//! interleave with the prompt.

use kuka_infrastructure::KukaPaths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "kuka=info";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
///
/// Returns `None` (and logs nothing) when the logs directory is unavailable.
/// The guard must be held until exit to flush buffered lines.
pub fn init(paths: &KukaPaths) -> Option<WorkerGuard> {
    let logs_dir = paths.logs_dir().ok()?;
    std::fs::create_dir_all(&logs_dir).ok()?;

    let appender = tracing_appender::rolling::daily(logs_dir, "kuka.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}
