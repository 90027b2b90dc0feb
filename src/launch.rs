//! App and folder launching behind confirmation dialogs.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::config::Config;
use crate::dialog::{self, DialogSpec};
use crate::media::SoundTask;
use crate::runner::ToolRunner;
use crate::speech::Speaker;

/// Run the launch flow: prompt for the general apps/folders, then ask about
/// the finale app last.
///
/// Contract: the sound task has been started exactly once by the time this
/// returns, never before the launch prompt is answered. When there is
/// nothing general to ask about it starts immediately.
pub async fn open_apps_and_folders(
    config: &Config,
    runner: &Arc<dyn ToolRunner>,
    speaker: &Speaker,
    sound: &mut SoundTask,
) -> Result<()> {
    let apps = &config.launch.apps;
    let folders = &config.launch.folders;

    if !apps.is_empty() || !folders.is_empty() {
        let spec = DialogSpec::new(
            &config.persona.name,
            "Open configured applications and folders?",
        )
        .with_buttons(&["Open Apps", "Continue"], "Open Apps");

        let accepted = match dialog::show_dialog(runner, &spec).await {
            Ok(Some(reply)) => reply.button == "Open Apps",
            Ok(None) => false,
            Err(e) => {
                crate::log_error!("Launch prompt could not be shown: {}", e);
                false
            }
        };

        // The prompt has been answered (or failed); the sound may start now.
        sound.start();

        if accepted {
            crate::log_stderr!("Opening {} apps and {} folders", apps.len(), folders.len());
            for app in apps {
                crate::log_debug!("Opening app: {}", app);
                if let Err(e) = runner
                    .spawn_detached("open", &["-a".to_string(), app.clone()])
                    .await
                {
                    crate::log_error!("Failed to open app {}: {}", app, e);
                }
            }
            for folder in folders {
                crate::log_debug!("Opening folder: {}", folder);
                if let Err(e) = runner.spawn_detached("open", &[folder.clone()]).await {
                    crate::log_error!("Failed to open folder {}: {}", folder, e);
                }
            }
        } else {
            crate::log_stderr!("User skipped opening general apps and folders");
            speaker
                .speak("Okay, skipping general applications and folders.")
                .await;
        }
    } else {
        crate::log_debug!("No general apps/folders to prompt for; starting sound task");
        sound.start();
    }

    if let Some(finale_app) = &config.launch.finale_app {
        open_finale_app(config, runner, speaker, finale_app).await;
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Ok(())
}

/// The finale app is always asked about last, behind its own
/// Continue/Cancel dialog.
async fn open_finale_app(
    config: &Config,
    runner: &Arc<dyn ToolRunner>,
    speaker: &Speaker,
    finale_app: &str,
) {
    let spec = DialogSpec::new(&config.persona.name, format!("Open {}?", finale_app))
        .with_buttons(&["Continue", "Cancel"], "Continue");

    match dialog::show_dialog(runner, &spec).await {
        Ok(Some(reply)) if reply.button == "Continue" => {
            crate::log_debug!("Opening finale app: {}", finale_app);
            if let Err(e) = runner
                .spawn_detached("open", &["-a".to_string(), finale_app.to_string()])
                .await
            {
                crate::log_error!("Failed to open {}: {}", finale_app, e);
            }
        }
        Ok(_) => {
            crate::log_debug!("User declined to open {}", finale_app);
            speaker
                .speak(&format!("Okay, I will not open {}.", finale_app))
                .await;
        }
        Err(e) => {
            crate::log_error!("Finale dialog could not be shown: {}", e);
            speaker
                .speak(&format!(
                    "There was an error trying to ask about opening {}.",
                    finale_app
                ))
                .await;
        }
    }
}
