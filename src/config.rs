//! Configuration for the boot ritual.
//!
//! Loaded from a JSON file, default `~/.config/majordomo/config.json`. Every
//! section carries serde defaults so a minimal file only needs the values it
//! wants to change (the passphrase, usually).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.json";
const PAUSE_FLAG_FILE_NAME: &str = "pause.flag";
const DEFAULT_VLC_PATH: &str = "/Applications/VLC.app/Contents/MacOS/VLC";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Title used for dialogs/notifications and the spoken persona name.
    pub persona: PersonaConfig,
    pub identity: IdentityConfig,
    pub media: MediaConfig,
    pub launch: LaunchConfig,
    pub checkin: CheckinConfig,
    pub network: NetworkConfig,
    pub census: CensusConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    /// Dialog/notification title and self-reference in spoken lines.
    pub name: String,
    /// How the user is addressed.
    pub user_name: String,
    /// Voice passed to `say -v`. None uses the system default.
    pub voice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Shared secret for the passphrase gate.
    pub passphrase: String,
    pub require_passphrase: bool,
    /// Ask for the user's name before the passphrase.
    pub ask_name: bool,
    pub face_check: FaceCheckConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceCheckConfig {
    pub enabled: bool,
    /// Webcam capture command; the temp image path is appended as the last
    /// argument. First element is the program.
    pub capture_command: Vec<String>,
    /// Optional detector run against the captured image (exit 0 = face
    /// present). Empty means capture success alone counts as presence.
    pub detector_command: Vec<String>,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Boot sound played via afplay while apps launch.
    pub boot_sound: Option<PathBuf>,
    /// Fullscreen welcome video played before the launch flow.
    pub startup_video: Option<PathBuf>,
    /// VLC binary used for video playback, with QuickTime as fallback.
    pub video_player: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Apps opened with `open -a` after the launch confirmation.
    pub apps: Vec<String>,
    /// Folders opened with `open`.
    pub folders: Vec<String>,
    /// App asked about last, behind its own Continue/Cancel dialog.
    pub finale_app: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckinConfig {
    /// Hourly notification body; `{user_name}` is substituted.
    pub message: String,
    /// Flag file that suppresses check-ins while it exists.
    /// Defaults to `~/.config/majordomo/pause.flag`.
    pub pause_flag: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub probe_host: String,
    pub probe_port: u16,
    pub probe_timeout_secs: u64,
    pub ip_echo_url: String,
    pub ip_echo_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CensusConfig {
    pub enabled: bool,
    /// Speak and notify the census summary during boot.
    pub announce: bool,
    /// OUI prefix (e.g. "A4:83:E7") to manufacturer, merged over the
    /// built-in table.
    pub extra_vendors: HashMap<String, String>,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: "Majordomo".to_string(),
            user_name: "sir".to_string(),
            voice: None,
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            passphrase: String::new(),
            require_passphrase: true,
            ask_name: false,
            face_check: FaceCheckConfig::default(),
        }
    }
}

impl Default for FaceCheckConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            capture_command: Vec::new(),
            detector_command: Vec::new(),
            max_attempts: 2,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            boot_sound: None,
            startup_video: None,
            video_player: PathBuf::from(DEFAULT_VLC_PATH),
        }
    }
}

impl Default for CheckinConfig {
    fn default() -> Self {
        Self {
            message: "Hi {user_name}, checking in. Never stop grinding.".to_string(),
            pause_flag: None,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            probe_host: "8.8.8.8".to_string(),
            probe_port: 53,
            probe_timeout_secs: 3,
            ip_echo_url: "https://api.ipify.org".to_string(),
            ip_echo_timeout_secs: 10,
        }
    }
}

impl Default for CensusConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            announce: true,
            extra_vendors: HashMap::new(),
        }
    }
}

impl Config {
    /// Default config file path: `~/.config/majordomo/config.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("majordomo")
            .join(CONFIG_FILE_NAME)
    }

    /// Read, parse, and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when the file exists, defaults otherwise.
    ///
    /// Used by pause/resume and doctor, which should work before the user
    /// has written any config.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Config::default();
            // The empty default passphrase only matters on the boot path.
            Ok(config)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.identity.require_passphrase && self.identity.passphrase.trim().is_empty() {
            anyhow::bail!("identity.passphrase must be non-empty when require_passphrase is set");
        }
        if self.identity.face_check.enabled && self.identity.face_check.capture_command.is_empty()
        {
            anyhow::bail!(
                "identity.face_check.capture_command must be non-empty when face_check is enabled"
            );
        }
        if self.identity.face_check.max_attempts == 0 {
            anyhow::bail!("identity.face_check.max_attempts must be greater than zero");
        }
        if self.network.probe_timeout_secs == 0 {
            anyhow::bail!("network.probe_timeout_secs must be greater than zero");
        }
        if self.network.ip_echo_timeout_secs == 0 {
            anyhow::bail!("network.ip_echo_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    /// Resolved pause flag path, honoring the config override.
    pub fn pause_flag_path(&self) -> PathBuf {
        self.checkin.pause_flag.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("majordomo")
                .join(PAUSE_FLAG_FILE_NAME)
        })
    }

    /// Check-in notification body with placeholders substituted.
    pub fn checkin_message(&self) -> String {
        self.checkin
            .message
            .replace("{user_name}", &self.persona.user_name)
    }
}
