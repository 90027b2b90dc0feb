use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Boot { config: Option<PathBuf> },
    Census { config: Option<PathBuf> },
    Netcheck { config: Option<PathBuf> },
    Checkin { config: Option<PathBuf>, once: bool },
    Doctor { config: Option<PathBuf> },
    Pause,
    Resume,
    Help,
    Version,
}
