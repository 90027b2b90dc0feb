//! Hourly check-in notifications.
//!
//! The loop sleeps toward the next top of the hour in one-second ticks so a
//! cancel request takes effect quickly, then fires unless the pause flag
//! file exists. Pausing only affects future fires.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Timelike};

use crate::app::{AppContext, AppEvent};
use crate::config::Config;
use crate::dialog;
use crate::runner::ToolRunner;

/// The next minute-zero instant after `now`.
pub fn next_top_of_hour(now: DateTime<Local>) -> DateTime<Local> {
    let truncated = now
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    truncated + chrono::Duration::hours(1)
}

/// Create the pause flag file (parent directories too).
pub fn set_pause_flag(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, b"paused\n")
        .with_context(|| format!("Failed to write pause flag {}", path.display()))?;
    crate::log_stderr!("Check-ins paused ({})", path.display());
    Ok(())
}

/// Remove the pause flag file. Missing flag is not an error.
pub fn clear_pause_flag(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            crate::log_stderr!("Check-ins resumed ({})", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

/// Fire one check-in. Returns false when the pause flag suppressed it.
pub async fn fire_checkin(
    config: &Config,
    runner: &Arc<dyn ToolRunner>,
    context: &AppContext,
) -> Result<bool> {
    if config.pause_flag_path().exists() {
        crate::log_stderr!("Check-in skipped due to pause flag");
        context.emit_event(AppEvent::CheckinSkipped);
        return Ok(false);
    }

    let message = config.checkin_message();
    dialog::notify(runner, &config.persona.name, &message).await?;
    context.emit_event(AppEvent::CheckinFired);
    Ok(true)
}

/// Run check-ins at every top of the hour until the context is cancelled.
pub async fn run_checkin_loop(
    config: &Config,
    runner: &Arc<dyn ToolRunner>,
    context: &AppContext,
) -> Result<()> {
    loop {
        let target = next_top_of_hour(Local::now());
        crate::log_debug!("Next check-in at {}", target.format("%H:%M"));

        while Local::now() < target {
            if context.is_cancelled() {
                context.emit_event(AppEvent::Cancelled {
                    stage: "checkin".to_string(),
                });
                return Ok(());
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        fire_checkin(config, runner, context).await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn next_top_of_hour_truncates_and_advances() {
        let now = Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        let next = next_top_of_hour(now);
        assert_eq!(
            next,
            Local.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn next_top_of_hour_from_exact_hour_is_the_following_hour() {
        let now = Local.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();
        let next = next_top_of_hour(now);
        assert_eq!(
            next,
            Local.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn next_top_of_hour_crosses_midnight() {
        let now = Local.with_ymd_and_hms(2026, 3, 14, 23, 59, 59).unwrap();
        let next = next_top_of_hour(now);
        assert_eq!(next, Local.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn pause_flag_roundtrip() {
        let flag = std::env::temp_dir().join(format!(
            "majordomo_pause_test_{}.flag",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&flag);

        assert!(!flag.exists());
        set_pause_flag(&flag).expect("set should succeed");
        assert!(flag.exists());
        clear_pause_flag(&flag).expect("clear should succeed");
        assert!(!flag.exists());

        // Clearing an absent flag is fine.
        clear_pause_flag(&flag).expect("second clear should succeed");
    }
}
