//! Structured logging module for Majordomo
//!
//! Provides file-based logging with rotation and structured log output.
//! Logs are written to: ~/.config/majordomo/logs/

pub mod macros;

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system
///
/// Creates the log directory and sets up daily rotating log files at
/// `~/.config/majordomo/logs/majordomo.log.YYYY-MM-DD`.
///
/// Set `RUST_LOG` to control the level; the default is `info`.
pub fn init_logging() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "majordomo.log");

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .compact();

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .json();

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let init_result = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    if let Err(e) = init_result {
        // Avoid panicking when a test or embedding process already installed a subscriber.
        if e.to_string().contains("already been set") {
            return Ok(log_dir);
        }
        return Err(Box::new(e));
    }

    tracing::info!("Logging initialized. Log directory: {}", log_dir.display());

    Ok(log_dir)
}

/// Get log directory path: `~/.config/majordomo/logs`
pub fn get_log_directory() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::config_dir()
        .ok_or("Could not find config directory")?
        .join("majordomo");
    Ok(base_dir.join("logs"))
}
