//! osascript dialog and notification glue.
//!
//! Dialog scripts are built and replies parsed as pure functions so the
//! AppleScript plumbing stays unit-testable. A cancelled dialog (ESC or the
//! Cancel button) makes osascript exit non-zero, which surfaces here as a
//! `None` reply rather than an error.

use anyhow::Result;
use std::sync::Arc;

use crate::runner::ToolRunner;

/// Optional text entry field on a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    None,
    Plain,
    Hidden,
}

/// A `display dialog` invocation.
#[derive(Debug, Clone)]
pub struct DialogSpec {
    pub title: String,
    pub message: String,
    pub buttons: Vec<String>,
    pub default_button: String,
    pub text_field: TextField,
}

impl DialogSpec {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            buttons: vec!["Continue".to_string()],
            default_button: "Continue".to_string(),
            text_field: TextField::None,
        }
    }

    pub fn with_buttons(mut self, buttons: &[&str], default_button: &str) -> Self {
        self.buttons = buttons.iter().map(|b| (*b).to_string()).collect();
        self.default_button = default_button.to_string();
        self
    }

    pub fn with_text_field(mut self, text_field: TextField) -> Self {
        self.text_field = text_field;
        self
    }

    /// Render the AppleScript source. All user-supplied strings are escaped.
    pub fn to_applescript(&self) -> String {
        let mut script = format!("display dialog \"{}\"", escape(&self.message));
        match self.text_field {
            TextField::None => {}
            TextField::Plain => script.push_str(" default answer \"\""),
            TextField::Hidden => script.push_str(" default answer \"\" with hidden answer"),
        }
        let buttons = self
            .buttons
            .iter()
            .map(|b| format!("\"{}\"", escape(b)))
            .collect::<Vec<_>>()
            .join(", ");
        script.push_str(&format!(
            " buttons {{{}}} default button \"{}\" with title \"{}\"",
            buttons,
            escape(&self.default_button),
            escape(&self.title)
        ));
        script
    }
}

/// Parsed osascript dialog reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogReply {
    pub button: String,
    pub text: Option<String>,
}

fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Parse osascript stdout of the form
/// `button returned:Continue, text returned:hunter2` (single line) or the
/// line-separated variant. Returns `None` when no button marker is present.
pub fn parse_reply(stdout: &str) -> Option<DialogReply> {
    const BUTTON_MARKER: &str = "button returned:";
    const TEXT_MARKER: &str = "text returned:";

    let mut button = None;
    let mut text = None;

    for line in stdout.lines() {
        if let Some(idx) = line.find(BUTTON_MARKER) {
            let rest = &line[idx + BUTTON_MARKER.len()..];
            let value = match rest.find(", text returned:") {
                Some(cut) => &rest[..cut],
                None => rest,
            };
            button = Some(value.trim().to_string());
        }
        if let Some(idx) = line.find(TEXT_MARKER) {
            text = Some(line[idx + TEXT_MARKER.len()..].trim().to_string());
        }
    }

    button.map(|button| DialogReply { button, text })
}

/// Show a dialog and wait for the reply. `Ok(None)` means the dialog was
/// cancelled or dismissed; `Err` means osascript itself could not run.
pub async fn show_dialog(
    runner: &Arc<dyn ToolRunner>,
    spec: &DialogSpec,
) -> Result<Option<DialogReply>> {
    let script = spec.to_applescript();
    crate::log_debug!("Showing dialog: {}", spec.message);
    let output = runner
        .run("osascript", &["-e".to_string(), script])
        .await?;

    if !output.success {
        crate::log_debug!("Dialog cancelled or failed: {}", output.stderr.trim());
        return Ok(None);
    }

    Ok(parse_reply(&output.stdout))
}

/// Post a `display notification`.
pub async fn notify(runner: &Arc<dyn ToolRunner>, title: &str, message: &str) -> Result<()> {
    let script = format!(
        "display notification \"{}\" with title \"{}\"",
        escape(message),
        escape(title)
    );
    let output = runner
        .run("osascript", &["-e".to_string(), script])
        .await?;
    if !output.success {
        crate::log_error!("Notification osascript error: {}", output.stderr.trim());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_button_dialog_script() {
        let spec = DialogSpec::new("Majordomo", "Ready to proceed?");
        assert_eq!(
            spec.to_applescript(),
            "display dialog \"Ready to proceed?\" buttons {\"Continue\"} \
             default button \"Continue\" with title \"Majordomo\""
        );
    }

    #[test]
    fn hidden_answer_dialog_script() {
        let spec = DialogSpec::new("Majordomo", "Please enter the passphrase to continue:")
            .with_text_field(TextField::Hidden);
        let script = spec.to_applescript();
        assert!(script.contains("default answer \"\" with hidden answer"));
        assert!(script.contains("buttons {\"Continue\"}"));
    }

    #[test]
    fn quotes_and_backslashes_are_escaped() {
        let spec = DialogSpec::new("Majordomo", r#"Open "Files" at C:\stuff?"#);
        let script = spec.to_applescript();
        assert!(script.contains(r#"Open \"Files\" at C:\\stuff?"#));
    }

    #[test]
    fn parse_single_line_reply() {
        let reply = parse_reply("button returned:Continue, text returned:hunter2\n")
            .expect("reply should parse");
        assert_eq!(reply.button, "Continue");
        assert_eq!(reply.text.as_deref(), Some("hunter2"));
    }

    #[test]
    fn parse_multi_line_reply() {
        let reply = parse_reply("button returned:Continue\ntext returned:hunter2\n")
            .expect("reply should parse");
        assert_eq!(reply.button, "Continue");
        assert_eq!(reply.text.as_deref(), Some("hunter2"));
    }

    #[test]
    fn parse_button_only_reply() {
        let reply = parse_reply("button returned:Open Apps\n").expect("reply should parse");
        assert_eq!(reply.button, "Open Apps");
        assert_eq!(reply.text, None);
    }

    #[test]
    fn parse_empty_stdout_is_none() {
        assert_eq!(parse_reply(""), None);
        assert_eq!(parse_reply("execution error: blah"), None);
    }

    #[test]
    fn parse_reply_trims_text_whitespace() {
        let reply = parse_reply("button returned:Continue\ntext returned:  iron man  \n")
            .expect("reply should parse");
        assert_eq!(reply.text.as_deref(), Some("iron man"));
    }
}
