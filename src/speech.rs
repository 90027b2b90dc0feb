//! Voice synthesis via `say`.

use std::sync::Arc;

use crate::runner::ToolRunner;

/// Wrapper around the `say` command honoring a configured voice.
///
/// Speech failures never abort a flow; they are logged and swallowed.
#[derive(Clone)]
pub struct Speaker {
    runner: Arc<dyn ToolRunner>,
    voice: Option<String>,
}

impl Speaker {
    pub fn new(runner: Arc<dyn ToolRunner>, voice: Option<String>) -> Self {
        Self { runner, voice }
    }

    pub async fn speak(&self, line: &str) {
        crate::log_debug!("Attempting to speak: '{}'", line);
        let mut args = Vec::new();
        if let Some(voice) = &self.voice {
            args.push("-v".to_string());
            args.push(voice.clone());
        }
        args.push(line.to_string());

        match self.runner.run("say", &args).await {
            Ok(output) if !output.success => {
                crate::log_error!("speak command error: {}", output.stderr.trim());
            }
            Ok(_) => {}
            Err(e) => {
                crate::log_error!("speak command could not run: {}", e);
            }
        }
    }
}
