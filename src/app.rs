//! Execution context and command dispatch.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::cli::{parse_cli_args, usage_text, version_text};
use crate::command::AppCommand;
use crate::command_handlers::{
    handle_boot, handle_census, handle_checkin, handle_doctor, handle_netcheck, handle_pause,
    handle_resume,
};
use crate::runner::{ProcessRunner, ToolRunner};

pub type OutputHook = Arc<dyn Fn(&str) + Send + Sync>;
pub type EventHook = Arc<dyn Fn(&AppEvent) + Send + Sync>;

/// Shared execution context: the tool runner, output/event hooks for
/// embedding and tests, and the cancellation flag.
#[derive(Clone)]
pub struct AppContext {
    config_path: Option<PathBuf>,
    runner: Arc<dyn ToolRunner>,
    output_hook: OutputHook,
    event_hook: EventHook,
    cancel_flag: Arc<AtomicBool>,
}

/// Progress events emitted through the context's event hook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AppEvent {
    BootPhase { phase: String },
    GateResult { granted: bool, step: Option<String> },
    CensusComplete { total: usize, identified: usize },
    CheckinFired,
    CheckinSkipped,
    Cancelled { stage: String },
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            config_path: None,
            runner: Arc::new(ProcessRunner),
            output_hook: Arc::new(|line| println!("{}", line)),
            event_hook: Arc::new(|_| {}),
            cancel_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_config_path(mut self, config_path: PathBuf) -> Self {
        self.config_path = Some(config_path);
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn ToolRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_output_hook(mut self, output_hook: OutputHook) -> Self {
        self.output_hook = output_hook;
        self
    }

    pub fn with_event_hook(mut self, event_hook: EventHook) -> Self {
        self.event_hook = event_hook;
        self
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn runner(&self) -> &Arc<dyn ToolRunner> {
        &self.runner
    }

    pub fn emit_line(&self, line: &str) {
        (self.output_hook)(line);
    }

    pub fn emit_event(&self, event: AppEvent) {
        (self.event_hook)(&event);
    }

    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    pub fn reset_cancel(&self) {
        self.cancel_flag.store(false, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }
}

/// Run the app by parsing CLI-style args and dispatching the command.
pub async fn run<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let context = AppContext::new();
    run_with_context(args, &context).await
}

/// Run the app with an explicit context (runner and hooks).
pub async fn run_with_context<I, S>(args: I, context: &AppContext) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let command = parse_cli_args(args)?;
    execute_command_with_context(command, context).await
}

/// Run the app with Ctrl+C cancellation wired into the provided context.
/// This is intended for CLI-style entrypoints.
pub async fn run_with_ctrl_c<I, S>(args: I, context: &AppContext) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let cancel_context = context.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_context.cancel();
            crate::log_stderr!("Cancellation requested (Ctrl+C). Stopping...");
        }
    });

    let run_result = run_with_context(args, context).await;
    signal_task.abort();
    run_result
}

/// Execute a pre-parsed command with the default context.
pub async fn execute_command(command: AppCommand) -> Result<()> {
    let context = AppContext::new();
    execute_command_with_context(command, &context).await
}

/// Execute a pre-parsed command. Handlers report through the context's
/// output hook so non-CLI entrypoints capture the results.
pub async fn execute_command_with_context(command: AppCommand, context: &AppContext) -> Result<()> {
    match command {
        AppCommand::Help => {
            context.emit_line(&usage_text());
            Ok(())
        }
        AppCommand::Version => {
            context.emit_line(&version_text());
            Ok(())
        }
        AppCommand::Boot { config } => handle_boot(config, context).await,
        AppCommand::Census { config } => handle_census(config, context).await,
        AppCommand::Netcheck { config } => handle_netcheck(config, context).await,
        AppCommand::Checkin { config, once } => handle_checkin(config, once, context).await,
        AppCommand::Doctor { config } => handle_doctor(config, context).await,
        AppCommand::Pause => handle_pause(context).await,
        AppCommand::Resume => handle_resume(context).await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{execute_command_with_context, AppContext, AppEvent};
    use crate::command::AppCommand;

    #[tokio::test]
    async fn help_command_writes_usage_to_output_hook() {
        let lines: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        let context = AppContext::new().with_output_hook(Arc::new(move |line| {
            sink.lock()
                .expect("output lock should not be poisoned")
                .push(line.to_string());
        }));

        execute_command_with_context(AppCommand::Help, &context)
            .await
            .expect("help command should succeed");

        let output = lines
            .lock()
            .expect("output lock should not be poisoned")
            .join("\n");
        assert!(output.contains("Usage:"));
        assert!(output.contains("majordomo doctor"));
    }

    #[test]
    fn context_event_hook_receives_emitted_event() {
        let events: Arc<Mutex<Vec<AppEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let context = AppContext::new().with_event_hook(Arc::new(move |event| {
            sink.lock()
                .expect("event lock should not be poisoned")
                .push(event.clone());
        }));

        context.emit_event(AppEvent::CheckinFired);

        let captured = events.lock().expect("event lock should not be poisoned");
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0], AppEvent::CheckinFired);
    }

    #[test]
    fn context_cancel_flag_can_be_set_and_reset() {
        let context = AppContext::new();
        assert!(!context.is_cancelled());
        context.cancel();
        assert!(context.is_cancelled());
        context.reset_cancel();
        assert!(!context.is_cancelled());
    }
}
