use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "floatkit-demo.log";

/// Route logs to a file in the temp directory; the terminal belongs to the
/// alternate screen while the demo runs.
///
/// With `debug` off the level is forced to `info` regardless of `RUST_LOG`.
/// The returned guard flushes the writer on drop and must outlive the app.
pub fn init(debug: bool) -> WorkerGuard {
    let appender = tracing_appender::rolling::never(std::env::temp_dir(), LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    guard
}
