//! Identity gate: the ordered verification chain run before anything else
//! boots.
//!
//! Step order is fixed: facial presence, then the name challenge, then the
//! passphrase. Each step only runs when the previous one passed; a denied
//! step speaks its denial line, holds the dramatic pause, and stops the
//! chain.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::config::Config;
use crate::dialog::{self, DialogSpec, TextField};
use crate::runner::ToolRunner;
use crate::speech::Speaker;

const DRAMATIC_PAUSE: Duration = Duration::from_secs(3);

const FACE_DENIAL_LINE: &str =
    "I do not recognize you. Access denied. This incident has been recorded.";
const NAME_DENIAL_LINE: &str = "That is not the name I have on record. Access denied.";
const PASSPHRASE_DENIAL_LINE: &str = "Incorrect passphrase. Unauthorized access attempt \
     detected. Counter-measures initiated. We are coming for you.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStep {
    Face,
    Name,
    Passphrase,
}

impl GateStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateStep::Face => "FACE",
            GateStep::Name => "NAME",
            GateStep::Passphrase => "PASSPHRASE",
        }
    }

    fn denial_line(&self) -> &'static str {
        match self {
            GateStep::Face => FACE_DENIAL_LINE,
            GateStep::Name => NAME_DENIAL_LINE,
            GateStep::Passphrase => PASSPHRASE_DENIAL_LINE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Granted,
    Denied { step: GateStep },
}

/// Run the full verification chain. Speaks the denial line and waits the
/// dramatic pause before returning a denial; the caller decides how to exit.
pub async fn run_identity_gate(
    config: &Config,
    runner: &Arc<dyn ToolRunner>,
    speaker: &Speaker,
) -> Result<GateOutcome> {
    if config.identity.face_check.enabled {
        if !facial_presence_check(config, runner, speaker).await {
            return deny(GateStep::Face, speaker).await;
        }
        crate::log_stderr!("Identity gate: facial presence confirmed");
    }

    if config.identity.ask_name {
        if !name_challenge(config, runner).await? {
            return deny(GateStep::Name, speaker).await;
        }
        crate::log_stderr!("Identity gate: name challenge passed");
    }

    if config.identity.require_passphrase {
        if !passphrase_challenge(config, runner).await? {
            return deny(GateStep::Passphrase, speaker).await;
        }
        crate::log_stderr!("Identity gate: passphrase accepted");
    }

    Ok(GateOutcome::Granted)
}

async fn deny(step: GateStep, speaker: &Speaker) -> Result<GateOutcome> {
    crate::log_warn!("Identity gate denied at step {}", step.as_str());
    speaker.speak(step.denial_line()).await;
    tokio::time::sleep(DRAMATIC_PAUSE).await;
    Ok(GateOutcome::Denied { step })
}

/// Up to `max_attempts` capture rounds. Presence means the capture command
/// succeeded and, when a detector is configured, the detector exited zero
/// for the captured image. A capture tool that cannot launch counts as a
/// failed attempt, not a hard error.
async fn facial_presence_check(
    config: &Config,
    runner: &Arc<dyn ToolRunner>,
    speaker: &Speaker,
) -> bool {
    let face = &config.identity.face_check;
    for attempt in 1..=face.max_attempts {
        speaker
            .speak("Hold still. Verifying your identity.")
            .await;

        let image_path = capture_image_path(attempt);
        let present = run_capture_round(face, runner, &image_path).await;
        let _ = std::fs::remove_file(&image_path);

        if present {
            return true;
        }
        crate::log_warn!(
            "Facial presence attempt {}/{} failed",
            attempt,
            face.max_attempts
        );
    }
    false
}

async fn run_capture_round(
    face: &crate::config::FaceCheckConfig,
    runner: &Arc<dyn ToolRunner>,
    image_path: &std::path::Path,
) -> bool {
    let Some((program, args)) = split_command(&face.capture_command) else {
        return false;
    };
    let mut capture_args = args.to_vec();
    capture_args.push(image_path.to_string_lossy().into_owned());

    match runner.run(program, &capture_args).await {
        Ok(output) if output.success => {}
        Ok(output) => {
            crate::log_debug!("Capture command failed: {}", output.stderr.trim());
            return false;
        }
        Err(e) => {
            crate::log_error!("Capture command could not run: {}", e);
            return false;
        }
    }

    let Some((program, args)) = split_command(&face.detector_command) else {
        // No detector configured: a successful capture counts as presence.
        return true;
    };
    let mut detector_args = args.to_vec();
    detector_args.push(image_path.to_string_lossy().into_owned());

    match runner.run(program, &detector_args).await {
        Ok(output) => output.success,
        Err(e) => {
            crate::log_error!("Detector command could not run: {}", e);
            false
        }
    }
}

fn split_command(command: &[String]) -> Option<(&str, &[String])> {
    let (program, args) = command.split_first()?;
    Some((program.as_str(), args))
}

fn capture_image_path(attempt: u32) -> PathBuf {
    std::env::temp_dir().join(format!(
        "majordomo_face_{}_{}.jpg",
        std::process::id(),
        attempt
    ))
}

async fn name_challenge(config: &Config, runner: &Arc<dyn ToolRunner>) -> Result<bool> {
    let spec = DialogSpec::new(&config.persona.name, "State your name:")
        .with_text_field(TextField::Plain);
    let reply = dialog::show_dialog(runner, &spec).await?;
    Ok(match reply.and_then(|r| r.text) {
        Some(answer) => name_matches(&answer, &config.persona.user_name),
        None => false,
    })
}

async fn passphrase_challenge(config: &Config, runner: &Arc<dyn ToolRunner>) -> Result<bool> {
    let spec = DialogSpec::new(
        &config.persona.name,
        "Please enter the passphrase to continue:",
    )
    .with_text_field(TextField::Hidden);
    let reply = dialog::show_dialog(runner, &spec).await?;
    Ok(match reply {
        Some(reply) if reply.button == "Continue" => reply
            .text
            .is_some_and(|answer| passphrase_matches(&answer, &config.identity.passphrase)),
        _ => false,
    })
}

/// Name replies are accepted case-insensitively after trimming.
pub(crate) fn name_matches(answer: &str, expected: &str) -> bool {
    answer.trim().eq_ignore_ascii_case(expected.trim())
}

/// The passphrase is an exact match against the shared secret.
pub(crate) fn passphrase_matches(answer: &str, expected: &str) -> bool {
    answer == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_match_is_trimmed_and_case_insensitive() {
        assert!(name_matches("  Tony ", "tony"));
        assert!(name_matches("TONY", "Tony"));
        assert!(!name_matches("Toni", "Tony"));
        assert!(!name_matches("", "Tony"));
    }

    #[test]
    fn passphrase_match_is_exact() {
        assert!(passphrase_matches("iron man", "iron man"));
        assert!(!passphrase_matches("Iron Man", "iron man"));
        assert!(!passphrase_matches("iron man ", "iron man"));
    }

    #[test]
    fn gate_step_labels() {
        assert_eq!(GateStep::Face.as_str(), "FACE");
        assert_eq!(GateStep::Name.as_str(), "NAME");
        assert_eq!(GateStep::Passphrase.as_str(), "PASSPHRASE");
    }
}
