//! Boot sound and welcome video playback.

use std::path::Path;
use std::sync::Arc;

use crate::config::MediaConfig;
use crate::runner::ToolRunner;
use crate::speech::Speaker;

/// Background boot sound playback.
///
/// The launch flow dictates the moment `start` is called; whichever branch
/// runs, it must happen exactly once. `start` tolerates repeat calls so the
/// branches stay simple.
pub struct SoundTask {
    runner: Arc<dyn ToolRunner>,
    path: Option<std::path::PathBuf>,
    handle: Option<tokio::task::JoinHandle<()>>,
    started: bool,
}

impl SoundTask {
    pub fn new(runner: Arc<dyn ToolRunner>, path: Option<std::path::PathBuf>) -> Self {
        Self {
            runner,
            path,
            handle: None,
            started: false,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Spawn `afplay` in the background, at most once and only when a sound
    /// file is configured and present.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        let Some(path) = self.path.clone() else {
            crate::log_debug!("No boot sound configured; sound task is a no-op");
            return;
        };
        if !path.exists() {
            crate::log_warn!("Boot sound not found: {}", path.display());
            return;
        }

        let runner = Arc::clone(&self.runner);
        self.handle = Some(tokio::spawn(async move {
            let args = vec![path.to_string_lossy().into_owned()];
            match runner.run("afplay", &args).await {
                Ok(output) if !output.success => {
                    crate::log_error!("afplay error: {}", output.stderr.trim());
                }
                Ok(_) => {}
                Err(e) => {
                    crate::log_error!("afplay could not run: {}", e);
                }
            }
        }));
    }

    /// Wait until playback finishes (no-op when nothing is playing).
    pub async fn finish(mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                crate::log_warn!("Sound task join failed: {}", e);
            }
        }
    }
}

/// Play the startup video fullscreen with VLC, falling back to QuickTime
/// when the VLC binary cannot be launched. Both paths block until the
/// player exits.
pub async fn play_video_fullscreen(
    runner: &Arc<dyn ToolRunner>,
    speaker: &Speaker,
    media: &MediaConfig,
    video_path: &Path,
) {
    crate::log_debug!("Attempting to play video: {}", video_path.display());

    let vlc = media.video_player.to_string_lossy().into_owned();
    let vlc_args = vec![
        "--fullscreen".to_string(),
        "--play-and-exit".to_string(),
        video_path.to_string_lossy().into_owned(),
    ];

    match runner.run(&vlc, &vlc_args).await {
        Ok(output) if output.success => {
            crate::log_debug!("VLC playback finished ({})", vlc);
        }
        Ok(output) => {
            crate::log_error!("VLC playback error: {}", output.stderr.trim());
            let name = video_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| video_path.display().to_string());
            speaker
                .speak(&format!("Error playing video: {}.", name))
                .await;
        }
        Err(_) => {
            crate::log_warn!("VLC not found at {}. Falling back to QuickTime Player.", vlc);
            speaker
                .speak(
                    "VLC media player not found. Opening with QuickTime. \
                     Please close QuickTime to continue.",
                )
                .await;
            // -W blocks until the player quits.
            let qt_args = vec![
                "-W".to_string(),
                "-a".to_string(),
                "QuickTime Player".to_string(),
                video_path.to_string_lossy().into_owned(),
            ];
            match runner.run("open", &qt_args).await {
                Ok(_) => crate::log_debug!("QuickTime Player closed by user"),
                Err(e) => crate::log_error!("QuickTime fallback failed: {}", e),
            }
        }
    }
}
