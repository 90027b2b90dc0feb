//! The full startup sequence.
//!
//! Order is normative: greet, identity gate, connectivity check, census,
//! startup video, launch flow (which starts the boot sound), sound
//! completion, days-left greeting, public IP offer, then the hourly
//! check-in loop. Connectivity, census, video, speech, and IP fetch
//! failures are all non-fatal; only a gate denial aborts.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};

use crate::app::{AppContext, AppEvent};
use crate::checkin;
use crate::config::Config;
use crate::dialog::{self, DialogSpec};
use crate::gate::{self, GateOutcome};
use crate::launch;
use crate::media::{self, SoundTask};
use crate::net::{census, connectivity, public_ip};
use crate::speech::Speaker;

const STEP_PAUSE: Duration = Duration::from_secs(1);

pub async fn run_boot(config: &Config, context: &AppContext) -> Result<()> {
    let runner = Arc::clone(context.runner());
    let speaker = Speaker::new(Arc::clone(&runner), config.persona.voice.clone());

    // Phase 1: greet.
    phase(context, "greet");
    let greet = DialogSpec::new(&config.persona.name, "Ready to proceed?");
    if let Err(e) = dialog::show_dialog(&runner, &greet).await {
        crate::log_error!("Greeting dialog could not be shown: {}", e);
    }
    crate::log_stderr!("Initial prompt dialog acknowledged");
    tokio::time::sleep(STEP_PAUSE).await;

    // Phase 2: identity gate. A denial aborts the whole boot.
    phase(context, "gate");
    match gate::run_identity_gate(config, &runner, &speaker).await? {
        GateOutcome::Granted => {
            context.emit_event(AppEvent::GateResult {
                granted: true,
                step: None,
            });
        }
        GateOutcome::Denied { step } => {
            context.emit_event(AppEvent::GateResult {
                granted: false,
                step: Some(step.as_str().to_string()),
            });
            anyhow::bail!("identity gate denied at step {}", step.as_str());
        }
    }
    tokio::time::sleep(STEP_PAUSE).await;

    // Phase 3: connectivity check and device census.
    phase(context, "network");
    let report = connectivity::check_connectivity(&config.network).await;
    if report.online {
        speaker.speak("Network status: Connected and secure.").await;
    } else {
        speaker
            .speak(
                "Network status: Warning, unable to verify a secure internet \
                 connection. Proceeding with caution.",
            )
            .await;
    }
    tokio::time::sleep(STEP_PAUSE).await;

    if config.census.enabled {
        match census::run_census(&runner, &config.census).await {
            Ok(report) => {
                context.emit_event(AppEvent::CensusComplete {
                    total: report.total,
                    identified: report.identified,
                });
                crate::log_stderr!(
                    "Census: {} devices, {} identified",
                    report.total,
                    report.identified
                );
                if config.census.announce {
                    let summary = report.summary_line();
                    speaker.speak(&summary).await;
                    if let Err(e) =
                        dialog::notify(&runner, &config.persona.name, &summary).await
                    {
                        crate::log_error!("Census notification failed: {}", e);
                    }
                }
            }
            Err(e) => {
                crate::log_error!("Device census failed (continuing): {:#}", e);
            }
        }
    }

    // Phase 4: startup video.
    phase(context, "video");
    if let Some(video_path) = &config.media.startup_video {
        if video_path.exists() {
            media::play_video_fullscreen(&runner, &speaker, &config.media, video_path).await;
            tokio::time::sleep(STEP_PAUSE).await;
        } else {
            crate::log_warn!("Startup video not found: {}", video_path.display());
        }
    }

    // Phases 5-7: launch flow; it decides when the boot sound starts.
    phase(context, "launch");
    let mut sound = SoundTask::new(Arc::clone(&runner), config.media.boot_sound.clone());
    launch::open_apps_and_folders(config, &runner, &speaker, &mut sound).await?;
    crate::log_stderr!("Finished opening apps and folders");
    sound.finish().await;

    // Phase 8: days-left greeting.
    phase(context, "greeting");
    tokio::time::sleep(STEP_PAUSE).await;
    speaker
        .speak(&welcome_line(
            &config.persona.user_name,
            Local::now().date_naive(),
        ))
        .await;

    // Phase 9: public IP offer.
    phase(context, "public_ip");
    offer_public_ip(config, &runner, &speaker).await;

    // Phase 10: check-in loop.
    phase(context, "checkin");
    crate::log_stderr!("Sending initial notification and scheduling hourly check-ins");
    if let Err(e) = dialog::notify(
        &runner,
        &config.persona.name,
        "Notifications will appear here every hour.",
    )
    .await
    {
        crate::log_error!("Initial notification failed: {}", e);
    }
    checkin::run_checkin_loop(config, &runner, context).await
}

fn phase(context: &AppContext, name: &str) {
    crate::log_debug!("Boot phase: {}", name);
    context.emit_event(AppEvent::BootPhase {
        phase: name.to_string(),
    });
}

async fn offer_public_ip(
    config: &Config,
    runner: &Arc<dyn crate::runner::ToolRunner>,
    speaker: &Speaker,
) {
    let spec = DialogSpec::new(
        &config.persona.name,
        "Would you like to see your current public IP?",
    )
    .with_buttons(&["Yes", "No"], "No");

    match dialog::show_dialog(runner, &spec).await {
        Ok(Some(reply)) if reply.button == "Yes" => {
            match public_ip::fetch_public_ip(&config.network).await {
                Ok(ip) => {
                    if let Err(e) = dialog::notify(runner, "Your IP Address", &ip).await {
                        crate::log_error!("IP notification failed: {}", e);
                    }
                    speaker
                        .speak(&format!("Your public IP address is {}", ip))
                        .await;
                }
                Err(e) => {
                    crate::log_error!("Error fetching IP address: {:#}", e);
                    speaker
                        .speak("Sorry, I couldn't fetch your public IP address at the moment.")
                        .await;
                }
            }
        }
        Ok(Some(_)) => {
            crate::log_stderr!("User chose not to see public IP");
            speaker.speak("Okay, I will not show your IP address.").await;
        }
        Ok(None) => {
            crate::log_stderr!("User cancelled the IP address dialog");
        }
        Err(e) => {
            crate::log_error!("IP address dialog error: {}", e);
        }
    }
}

/// Whole days from `today` to December 31 of the same year.
pub fn days_left_in_year(today: NaiveDate) -> i64 {
    NaiveDate::from_ymd_opt(today.year(), 12, 31)
        .map(|end| (end - today).num_days())
        .unwrap_or(0)
}

fn welcome_line(user_name: &str, today: NaiveDate) -> String {
    format!(
        "Welcome home {}. There are {} days left in the year. Another day, another opportunity.",
        user_name,
        days_left_in_year(today)
    )
}
