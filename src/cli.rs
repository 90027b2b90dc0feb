//! Hand-rolled CLI argument parsing.

use std::path::PathBuf;

use anyhow::Result;

use crate::command::AppCommand;

pub fn version_text() -> String {
    format!("majordomo {}", env!("CARGO_PKG_VERSION"))
}

pub fn usage_text() -> String {
    format!(
        "{version}
Majordomo — Scripted Desktop Greeter & Boot Concierge

Usage:
  majordomo [boot] [--config <PATH>]
  majordomo census [--config <PATH>]
  majordomo netcheck [--config <PATH>]
  majordomo checkin [--config <PATH>] [--once]
  majordomo doctor [--config <PATH>]
  majordomo pause
  majordomo resume
  majordomo --help
  majordomo --version

Options:
  -c, --config <PATH>  Config file (default: ~/.config/majordomo/config.json)
      --once           Check-in: fire a single check-in and exit
  -h, --help           Show this help text
  -V, --version        Show version",
        version = version_text()
    )
}

pub fn parse_cli_args<I, S>(args: I) -> Result<AppCommand>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut iter = args.into_iter();
    let _program_name = iter.next();

    let mut command: Option<String> = None;
    let mut config: Option<PathBuf> = None;
    let mut once = false;

    while let Some(arg) = iter.next() {
        let arg = arg.as_ref();
        match arg {
            "-h" | "--help" => return Ok(AppCommand::Help),
            "-V" | "--version" => return Ok(AppCommand::Version),
            "boot" | "census" | "netcheck" | "checkin" | "doctor" | "pause" | "resume" => {
                if command.as_deref().is_some_and(|existing| existing != arg) {
                    return Err(anyhow::anyhow!(
                        "Multiple commands provided. Use only one command.\n\n{}",
                        usage_text()
                    ));
                }
                command = Some(arg.to_string());
            }
            "-c" | "--config" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("Missing value for --config.\n\n{}", usage_text())
                })?;
                config = Some(PathBuf::from(value.as_ref()));
            }
            "--once" => {
                once = true;
            }
            _ if arg.starts_with("--config=") => {
                let value = arg.split_once('=').map(|(_, v)| v).unwrap_or_default();
                if value.is_empty() {
                    return Err(anyhow::anyhow!(
                        "Missing value for --config.\n\n{}",
                        usage_text()
                    ));
                }
                config = Some(PathBuf::from(value));
            }
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown argument: {arg}\n\n{}",
                    usage_text()
                ));
            }
        }
    }

    match command.as_deref().unwrap_or("boot") {
        "boot" => {
            reject_once("boot", once)?;
            Ok(AppCommand::Boot { config })
        }
        "census" => {
            reject_once("census", once)?;
            Ok(AppCommand::Census { config })
        }
        "netcheck" => {
            reject_once("netcheck", once)?;
            Ok(AppCommand::Netcheck { config })
        }
        "checkin" => Ok(AppCommand::Checkin { config, once }),
        "doctor" => {
            reject_once("doctor", once)?;
            Ok(AppCommand::Doctor { config })
        }
        "pause" => {
            reject_flags("pause", config.is_some(), once)?;
            Ok(AppCommand::Pause)
        }
        "resume" => {
            reject_flags("resume", config.is_some(), once)?;
            Ok(AppCommand::Resume)
        }
        _ => unreachable!(),
    }
}

fn reject_once(command: &str, once: bool) -> Result<()> {
    if once {
        return Err(anyhow::anyhow!(
            "--once is only valid with checkin, not {}.\n\n{}",
            command,
            usage_text()
        ));
    }
    Ok(())
}

fn reject_flags(command: &str, has_config: bool, once: bool) -> Result<()> {
    if has_config || once {
        return Err(anyhow::anyhow!(
            "--config/--once are not valid with {}.\n\n{}",
            command,
            usage_text()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_help_flag() {
        let args = ["majordomo", "--help"];
        let parsed = parse_cli_args(args).expect("help args should parse");
        assert_eq!(parsed, AppCommand::Help);
    }

    #[test]
    fn parse_version_flag() {
        let args = ["majordomo", "-V"];
        let parsed = parse_cli_args(args).expect("version args should parse");
        assert_eq!(parsed, AppCommand::Version);
    }

    #[test]
    fn parse_default_boot_command() {
        let args = ["majordomo"];
        let parsed = parse_cli_args(args).expect("default args should parse");
        assert_eq!(parsed, AppCommand::Boot { config: None });
    }

    #[test]
    fn parse_boot_with_config_flag() {
        let args = ["majordomo", "boot", "--config", "/tmp/c.json"];
        let parsed = parse_cli_args(args).expect("boot with config should parse");
        assert_eq!(
            parsed,
            AppCommand::Boot {
                config: Some(PathBuf::from("/tmp/c.json"))
            }
        );
    }

    #[test]
    fn parse_config_equals_form() {
        let args = ["majordomo", "census", "--config=/tmp/c.json"];
        let parsed = parse_cli_args(args).expect("census with config should parse");
        assert_eq!(
            parsed,
            AppCommand::Census {
                config: Some(PathBuf::from("/tmp/c.json"))
            }
        );
    }

    #[test]
    fn parse_checkin_once() {
        let args = ["majordomo", "checkin", "--once"];
        let parsed = parse_cli_args(args).expect("checkin --once should parse");
        assert_eq!(
            parsed,
            AppCommand::Checkin {
                config: None,
                once: true
            }
        );
    }

    #[test]
    fn parse_once_rejected_outside_checkin() {
        let args = ["majordomo", "census", "--once"];
        let err = parse_cli_args(args).expect_err("census should reject --once");
        assert!(err.to_string().contains("--once is only valid with checkin"));
    }

    #[test]
    fn parse_pause_rejects_config() {
        let args = ["majordomo", "pause", "--config", "/tmp/c.json"];
        let err = parse_cli_args(args).expect_err("pause should reject --config");
        assert!(err.to_string().contains("not valid with pause"));
    }

    #[test]
    fn parse_missing_config_value_errors() {
        let args = ["majordomo", "boot", "--config"];
        let err = parse_cli_args(args).expect_err("missing value should fail");
        assert!(err.to_string().contains("Missing value for --config"));
    }

    #[test]
    fn parse_multiple_commands_errors() {
        let args = ["majordomo", "boot", "census"];
        let err = parse_cli_args(args).expect_err("two commands should fail");
        assert!(err.to_string().contains("Multiple commands provided"));
    }

    #[test]
    fn parse_unknown_argument_errors() {
        let args = ["majordomo", "--unknown"];
        let err = parse_cli_args(args).expect_err("unknown flag should fail");
        assert!(err.to_string().contains("Unknown argument"));
    }
}
