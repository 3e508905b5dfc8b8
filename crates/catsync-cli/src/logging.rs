use std::path::Path;

use catsync_core::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_PREFIX: &str = "catsync";
const LOG_FILE_SUFFIX: &str = "log";
const MAX_LOG_FILES: usize = 14;

/// Install the global subscriber: console output always, plus a daily log
/// file when `CATSYNC_LOG_DIR` is set.
///
/// The returned guard flushes the file writer on drop and must live until
/// the process exits.
///
/// # Errors
///
/// Returns an error if the filter directive is invalid or the log directory
/// cannot be created.
pub(crate) fn init(config: &AppConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;

    let (file_layer, guard) = match config.log_dir.as_deref() {
        Some(dir) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(dir)?);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

/// Daily-rotated `catsync.<date>.log` files, keeping the most recent two weeks.
fn file_appender(dir: &Path) -> anyhow::Result<RollingFileAppender> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(dir)?;
    Ok(appender)
}
