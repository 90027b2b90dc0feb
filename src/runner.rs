//! External tool invocation seam.
//!
//! Every OS command (osascript, say, afplay, open, arp, VLC, webcam tools)
//! goes through [`ToolRunner`] so the flows stay testable with a scripted
//! fake.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::process::Stdio;

/// Captured result of a finished tool invocation.
///
/// A non-zero exit is not an `Err`: callers decide severity. Only failing
/// to launch the program at all surfaces as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run a program to completion and capture its output.
    async fn run(&self, program: &str, args: &[String]) -> Result<ToolOutput>;

    /// Start a program without waiting for it (app/folder opening).
    async fn spawn_detached(&self, program: &str, args: &[String]) -> Result<()>;
}

/// Production runner on top of `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<ToolOutput> {
        let output = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| format!("Failed to launch {}", program))?;

        Ok(ToolOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn spawn_detached(&self, program: &str, args: &[String]) -> Result<()> {
        tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to launch {}", program))?;
        Ok(())
    }
}
