//! Logging Infrastructure
//!
//! Console output plus an optional daily rotating measurement log:
//! - `measurement.YYYY-MM-DD.log` under `<log_dir>/measurement`
//! - files older than 14 days are removed by an hourly task

use chrono::{Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

/// Rolling file prefix
const LOG_PREFIX: &str = "measurement";
/// Rolling file suffix
const LOG_SUFFIX: &str = "log";
/// Days a measurement log is kept
pub const RETENTION_DAYS: i64 = 14;

/// Measurement log directory below `log_dir`
pub fn measurement_log_dir(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_PREFIX)
}

/// Date encoded in a `measurement.YYYY-MM-DD.log` file name
fn log_file_date(name: &str) -> Option<NaiveDate> {
    let date_part = name
        .strip_prefix(LOG_PREFIX)?
        .strip_prefix('.')?
        .strip_suffix(LOG_SUFFIX)?
        .strip_suffix('.')?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Delete measurement logs older than `retention_days`
///
/// Returns the number of deleted files. Files not following the rolling
/// naming scheme are left alone.
pub fn cleanup_old_logs(log_dir: &Path, retention_days: i64) -> anyhow::Result<usize> {
    let cutoff = Local::now().date_naive() - chrono::Duration::days(retention_days);

    let dir = measurement_log_dir(log_dir);
    if !dir.exists() {
        return Ok(0);
    }

    let mut deleted = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(date) = log_file_date(name)
            && date < cutoff
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            deleted += 1;
        }
    }

    Ok(deleted)
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn")
/// * `json_format` - JSON console output
/// * `log_dir` - Optional directory for the rotating measurement log
///
/// # Examples
/// ```no_run
/// // console only
/// crab_measurement::init_logger_with_file("debug", false, None)?;
///
/// // console + ./logs/measurement/measurement.YYYY-MM-DD.log
/// crab_measurement::init_logger_with_file("info", true, Some("./logs"))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let file_layer = match log_dir {
        Some(dir) => {
            let dir = Path::new(dir);
            let measurement_dir = measurement_log_dir(dir);
            fs::create_dir_all(&measurement_dir)?;

            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_PREFIX)
                .filename_suffix(LOG_SUFFIX)
                .build(&measurement_dir)?;

            // 启动清理任务
            tokio::spawn(periodic_cleanup(dir.to_path_buf()));

            Some(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(appender)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Periodic cleanup task - runs every hour to clean old logs
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        sleep(Duration::from_secs(3600)).await;

        if let Err(e) = cleanup_old_logs(&log_dir, RETENTION_DAYS) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
    }
}

/// Initialize the logging system (console only)
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}
