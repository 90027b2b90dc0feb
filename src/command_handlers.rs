//! One handler per command. Reports go through the context's output hook.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::boot;
use crate::checkin;
use crate::config::Config;
use crate::doctor;
use crate::net::{census, connectivity};

fn resolve_config_path(cli_override: Option<PathBuf>, context: &AppContext) -> PathBuf {
    cli_override
        .or_else(|| context.config_path().map(|p| p.to_path_buf()))
        .unwrap_or_else(Config::default_path)
}

pub(crate) async fn handle_boot(
    cli_config: Option<PathBuf>,
    context: &AppContext,
) -> Result<()> {
    let path = resolve_config_path(cli_config, context);
    // Boot fails hard on a missing or invalid config.
    let config = Config::load(&path)?;
    boot::run_boot(&config, context).await
}

pub(crate) async fn handle_census(
    cli_config: Option<PathBuf>,
    context: &AppContext,
) -> Result<()> {
    let path = resolve_config_path(cli_config, context);
    let config = Config::load_or_default(&path)?;
    let report = census::run_census(context.runner(), &config.census).await?;
    context.emit_line(
        &serde_json::to_string_pretty(&report).context("Failed to serialize census report")?,
    );
    Ok(())
}

pub(crate) async fn handle_netcheck(
    cli_config: Option<PathBuf>,
    context: &AppContext,
) -> Result<()> {
    let path = resolve_config_path(cli_config, context);
    let config = Config::load_or_default(&path)?;
    let report = connectivity::check_connectivity(&config.network).await;
    context.emit_line(
        &serde_json::to_string_pretty(&report)
            .context("Failed to serialize connectivity report")?,
    );
    Ok(())
}

pub(crate) async fn handle_checkin(
    cli_config: Option<PathBuf>,
    once: bool,
    context: &AppContext,
) -> Result<()> {
    let path = resolve_config_path(cli_config, context);
    let config = Config::load_or_default(&path)?;
    if once {
        checkin::fire_checkin(&config, context.runner(), context).await?;
        return Ok(());
    }
    checkin::run_checkin_loop(&config, context.runner(), context).await
}

pub(crate) async fn handle_doctor(
    cli_config: Option<PathBuf>,
    context: &AppContext,
) -> Result<()> {
    let path = resolve_config_path(cli_config, context);
    let report = doctor::run_doctor(&path, context).await;
    context.emit_line(
        &serde_json::to_string_pretty(&report).context("Failed to serialize doctor report")?,
    );
    Ok(())
}

pub(crate) async fn handle_pause(context: &AppContext) -> Result<()> {
    let config = Config::load_or_default(&Config::default_path())?;
    checkin::set_pause_flag(&config.pause_flag_path())?;
    context.emit_line("Check-ins paused.");
    Ok(())
}

pub(crate) async fn handle_resume(context: &AppContext) -> Result<()> {
    let config = Config::load_or_default(&Config::default_path())?;
    checkin::clear_pause_flag(&config.pause_flag_path())?;
    context.emit_line("Check-ins resumed.");
    Ok(())
}
