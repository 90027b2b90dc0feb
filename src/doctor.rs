//! Environment and tooling diagnostics.
//!
//! Probes the external tools the flows shell out to, the config file, the
//! configured media, and the log directory. Individual failed checks never
//! make the command exit non-zero; the report is the product.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::AppContext;
use crate::config::Config;

const REQUIRED_TOOLS: &[&str] = &["osascript", "say", "afplay", "open", "arp"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorCheck {
    pub name: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorReport {
    pub overall_ok: bool,
    pub checks: Vec<DoctorCheck>,
}

pub async fn run_doctor(config_path: &Path, context: &AppContext) -> DoctorReport {
    let mut checks = Vec::new();

    for tool in REQUIRED_TOOLS {
        checks.push(check_tool(tool, context).await);
    }

    let config = match Config::load(config_path) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config".to_string(),
                ok: true,
                detail: Some(config_path.display().to_string()),
            });
            config
        }
        Err(e) => {
            checks.push(DoctorCheck {
                name: "config".to_string(),
                ok: false,
                detail: Some(format!("{:#}", e)),
            });
            Config::default()
        }
    };

    checks.push(check_path_exists(
        "media.video_player",
        Some(&config.media.video_player),
    ));
    checks.push(check_path_exists(
        "media.boot_sound",
        config.media.boot_sound.as_deref(),
    ));
    checks.push(check_path_exists(
        "media.startup_video",
        config.media.startup_video.as_deref(),
    ));

    checks.push(check_log_directory());

    let overall_ok = checks.iter().all(|c| c.ok);
    DoctorReport { overall_ok, checks }
}

async fn check_tool(tool: &str, context: &AppContext) -> DoctorCheck {
    let name = format!("tool.{}", tool);
    match context
        .runner()
        .run("which", &[tool.to_string()])
        .await
    {
        Ok(output) if output.success => DoctorCheck {
            name,
            ok: true,
            detail: Some(output.stdout.trim().to_string()),
        },
        Ok(_) => DoctorCheck {
            name,
            ok: false,
            detail: Some(format!("{} not found on PATH", tool)),
        },
        Err(e) => DoctorCheck {
            name,
            ok: false,
            detail: Some(format!("{:#}", e)),
        },
    }
}

fn check_path_exists(name: &str, path: Option<&Path>) -> DoctorCheck {
    match path {
        Some(path) if path.exists() => DoctorCheck {
            name: name.to_string(),
            ok: true,
            detail: Some(path.display().to_string()),
        },
        Some(path) => DoctorCheck {
            name: name.to_string(),
            ok: false,
            detail: Some(format!("not found: {}", path.display())),
        },
        None => DoctorCheck {
            name: name.to_string(),
            ok: true,
            detail: Some("not configured".to_string()),
        },
    }
}

fn check_log_directory() -> DoctorCheck {
    let name = "logging.directory".to_string();
    match crate::logging::get_log_directory() {
        Ok(dir) => match std::fs::create_dir_all(&dir) {
            Ok(()) => DoctorCheck {
                name,
                ok: true,
                detail: Some(dir.display().to_string()),
            },
            Err(e) => DoctorCheck {
                name,
                ok: false,
                detail: Some(format!("{}: {}", dir.display(), e)),
            },
        },
        Err(e) => DoctorCheck {
            name,
            ok: false,
            detail: Some(e.to_string()),
        },
    }
}
