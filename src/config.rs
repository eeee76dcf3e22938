//! Configuration loading.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.boundaries/config.toml`)
//! 3. User config (`~/.boundaries/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. The app runs with sensible defaults when no
//! config exists, and a broken config file is skipped with a warning.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::capability::{Capability, PermissionOutcome};
use crate::core::tutorial::{default_steps, TutorialStep};
use crate::error::{BoundariesError, FailOpen, Result};
use crate::locale::Locale;
use crate::util::{read_optional, MAX_FILE_SIZE};

/// Name of the per-project and per-user config directory.
pub const CONFIG_DIR: &str = ".boundaries";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Display language defaults.
    pub locale: LocaleConfig,
    /// Key-value store location.
    pub storage: StorageConfig,
    /// Headless answers to permission requests.
    pub permissions: PermissionsConfig,
    /// Tutorial step table.
    pub tutorial: TutorialConfig,
}

/// Display language defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocaleConfig {
    /// Language used until one is chosen.
    pub default: Locale,
}

/// Key-value store location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Store file. Relative paths resolve against the boundaries home.
    pub file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file: "storage.json".to_string(),
        }
    }
}

/// A configured answer to one permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetOutcome {
    Granted,
    Denied,
    /// The platform has no such capability; reported as a request error.
    Unavailable,
}

impl PresetOutcome {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "granted" => Some(Self::Granted),
            "denied" => Some(Self::Denied),
            "unavailable" => Some(Self::Unavailable),
            _ => None,
        }
    }
}

impl From<PresetOutcome> for PermissionOutcome {
    fn from(preset: PresetOutcome) -> Self {
        match preset {
            PresetOutcome::Granted => PermissionOutcome::Granted,
            PresetOutcome::Denied => PermissionOutcome::Denied,
            PresetOutcome::Unavailable => PermissionOutcome::Error("unavailable".to_string()),
        }
    }
}

/// Headless answers to permission requests, and the audio resume policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PermissionsConfig {
    pub audio: PresetOutcome,
    pub microphone: PresetOutcome,
    pub camera: PresetOutcome,
    pub notifications: PresetOutcome,
    /// Wake sound output after audio is granted.
    pub resume_audio: bool,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            audio: PresetOutcome::Granted,
            microphone: PresetOutcome::Denied,
            camera: PresetOutcome::Denied,
            notifications: PresetOutcome::Denied,
            resume_audio: true,
        }
    }
}

impl PermissionsConfig {
    /// The configured answer for one capability.
    pub fn outcome_for(&self, capability: Capability) -> PermissionOutcome {
        self.preset_for(capability).into()
    }

    fn preset_for(&self, capability: Capability) -> PresetOutcome {
        match capability {
            Capability::Audio => self.audio,
            Capability::Microphone => self.microphone,
            Capability::Camera => self.camera,
            Capability::Notifications => self.notifications,
        }
    }
}

/// Tutorial step table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TutorialConfig {
    pub steps: Vec<TutorialStep>,
}

impl Default for TutorialConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
        }
    }
}

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Project config (`.boundaries/config.toml` in cwd)
    /// 3. User config (`~/.boundaries/config.toml`)
    /// 4. Defaults
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(e) => {
                tracing::warn!("current directory unavailable: {}", e);
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    fn load_user_config() -> Option<Config> {
        let path = boundaries_home()?.join("config.toml");
        Self::load_from_file(&path).fail_open_default("loading user config")
    }

    fn load_project_config(cwd: &Path) -> Option<Config> {
        let path = project_config_path(cwd);
        Self::load_from_file(&path).fail_open_default("loading project config")
    }

    /// Load config from a specific file path. A missing file is `None`.
    pub fn load_from_file(path: &Path) -> Result<Option<Config>> {
        let Some(content) = read_optional(path, MAX_FILE_SIZE)? else {
            return Ok(None);
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|e| BoundariesError::config(format!("{}: {}", path.display(), e)))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // BOUNDARIES_LOCALE
        if let Ok(val) = env::var("BOUNDARIES_LOCALE") {
            match val.parse::<Locale>() {
                Ok(locale) => self.locale.default = locale,
                Err(_) => tracing::warn!(
                    "Invalid BOUNDARIES_LOCALE value '{}'. Valid values: en, ms, zh. \
                    Using '{}'.",
                    val,
                    self.locale.default
                ),
            }
        }

        // BOUNDARIES_STORAGE_FILE
        if let Ok(val) = env::var("BOUNDARIES_STORAGE_FILE") {
            if val.trim().is_empty() {
                tracing::warn!("BOUNDARIES_STORAGE_FILE is empty, using '{}'", self.storage.file);
            } else {
                self.storage.file = val;
            }
        }

        // BOUNDARIES_RESUME_AUDIO
        if let Ok(val) = env::var("BOUNDARIES_RESUME_AUDIO") {
            match val.trim() {
                "true" | "1" => self.permissions.resume_audio = true,
                "false" | "0" => self.permissions.resume_audio = false,
                _ => tracing::warn!(
                    "Invalid BOUNDARIES_RESUME_AUDIO value '{}'. Valid values: true, false, 1, 0. \
                    Using '{}'.",
                    val,
                    self.permissions.resume_audio
                ),
            }
        }

        // BOUNDARIES_PERMISSION_<CAPABILITY>
        for capability in Capability::ALL {
            let var = format!("BOUNDARIES_PERMISSION_{}", capability.name().to_uppercase());
            let Ok(val) = env::var(&var) else {
                continue;
            };
            match PresetOutcome::parse(&val) {
                Some(preset) => self.set_preset(capability, preset),
                None => tracing::warn!(
                    "Invalid {} value '{}'. Valid values: granted, denied, unavailable.",
                    var,
                    val
                ),
            }
        }
    }

    fn set_preset(&mut self, capability: Capability, preset: PresetOutcome) {
        let slot = match capability {
            Capability::Audio => &mut self.permissions.audio,
            Capability::Microphone => &mut self.permissions.microphone,
            Capability::Camera => &mut self.permissions.camera,
            Capability::Notifications => &mut self.permissions.notifications,
        };
        *slot = preset;
    }

    /// Merge another config into this one.
    ///
    /// The `other` config takes precedence, field by field: each value in
    /// `other` that differs from the default replaces ours. A layer therefore
    /// cannot set a value back to its default over a lower layer.
    fn merge(mut self, other: Config) -> Self {
        let defaults = Config::default();

        if other.locale.default != defaults.locale.default {
            self.locale.default = other.locale.default;
        }

        if other.storage.file != defaults.storage.file {
            self.storage.file = other.storage.file;
        }

        for capability in Capability::ALL {
            let preset = other.permissions.preset_for(capability);
            if preset != defaults.permissions.preset_for(capability) {
                self.set_preset(capability, preset);
            }
        }
        if other.permissions.resume_audio != defaults.permissions.resume_audio {
            self.permissions.resume_audio = other.permissions.resume_audio;
        }

        // The step table is replaced whole
        if other.tutorial.steps != defaults.tutorial.steps {
            self.tutorial.steps = other.tutorial.steps;
        }

        self
    }

    /// Resolved path of the key-value store file.
    pub fn storage_path(&self) -> Option<PathBuf> {
        let file = PathBuf::from(&self.storage.file);
        if file.is_absolute() {
            return Some(file);
        }
        boundaries_home().map(|home| home.join(file))
    }
}

/// Get the boundaries home directory.
///
/// Checks `BOUNDARIES_HOME` first, then falls back to `~/.boundaries`, then
/// to a temp directory for environments without a home.
pub fn boundaries_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("BOUNDARIES_HOME") {
        if home.is_empty() {
            tracing::warn!("BOUNDARIES_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("BOUNDARIES_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(CONFIG_DIR));
    }

    let fallback_path = fallback_home();
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback_path.display()
    );
    Some(fallback_path)
}

#[cfg(unix)]
fn fallback_home() -> PathBuf {
    use std::os::unix::fs::MetadataExt;
    let uid = std::fs::metadata("/").map(|m| m.uid()).unwrap_or(0);
    PathBuf::from(format!("/tmp/boundaries-{}", uid))
}

#[cfg(not(unix))]
fn fallback_home() -> PathBuf {
    std::env::temp_dir().join("boundaries")
}

/// Project config file for a working directory.
pub fn project_config_path(cwd: &Path) -> PathBuf {
    cwd.join(CONFIG_DIR).join("config.toml")
}

/// Where the panic handler writes crash reports.
///
/// Returns `<boundaries_home>/crash.log`.
pub fn crash_log_path() -> Option<PathBuf> {
    boundaries_home().map(|h| h.join("crash.log"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tutorial::StepPosition;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    const ENV_VARS: &[&str] = &[
        "BOUNDARIES_LOCALE",
        "BOUNDARIES_STORAGE_FILE",
        "BOUNDARIES_RESUME_AUDIO",
        "BOUNDARIES_PERMISSION_AUDIO",
        "BOUNDARIES_PERMISSION_CAMERA",
    ];

    /// Point the home at an empty temp dir and clear overrides.
    fn isolated_home() -> TempDir {
        let home = TempDir::new().unwrap();
        env::set_var("BOUNDARIES_HOME", home.path());
        for var in ENV_VARS {
            env::remove_var(var);
        }
        home
    }

    fn cleanup() {
        env::remove_var("BOUNDARIES_HOME");
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }

    fn write_project_config(dir: &Path, content: &str) {
        let path = project_config_path(dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.locale.default, Locale::En);
        assert_eq!(config.storage.file, "storage.json");
        assert_eq!(config.permissions.audio, PresetOutcome::Granted);
        assert_eq!(config.permissions.camera, PresetOutcome::Denied);
        assert!(config.permissions.resume_audio);
        assert_eq!(config.tutorial.steps.len(), 5);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");

        let toml_content = r#"
[locale]
default = "zh"

[permissions]
camera = "unavailable"
resume_audio = false
"#;
        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_file(&config_path).unwrap().unwrap();

        assert_eq!(config.locale.default, Locale::Zh);
        assert_eq!(config.permissions.camera, PresetOutcome::Unavailable);
        assert!(!config.permissions.resume_audio);
        // Other fields should be defaults
        assert_eq!(config.permissions.audio, PresetOutcome::Granted);
        assert_eq!(config.storage.file, "storage.json");
    }

    #[test]
    fn test_load_from_file_missing() {
        let result = Config::load_from_file(Path::new("/nonexistent/config.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_from_file_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "this is not valid toml [[[").unwrap();

        assert!(Config::load_from_file(&config_path).is_err());
    }

    #[test]
    fn test_load_from_file_unknown_locale() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[locale]\ndefault = \"fr\"\n").unwrap();

        assert!(Config::load_from_file(&config_path).is_err());
    }

    #[test]
    fn test_custom_tutorial_steps() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        let toml_content = r#"
[[tutorial.steps]]
id = "hello"
screen = "main"
title = "tutorialWelcomeTitle"
description = "tutorialWelcomeDesc"

[[tutorial.steps]]
id = "games"
screen = "module1"
position = "bottom"
arrow = "up"
title = "tutorialModule1Title"
description = "tutorialModule1Desc"
"#;
        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_file(&config_path).unwrap().unwrap();
        assert_eq!(config.tutorial.steps.len(), 2);
        assert_eq!(config.tutorial.steps[0].position, StepPosition::Center);
        assert_eq!(config.tutorial.steps[1].screen, "module1");
    }

    #[test]
    #[serial]
    fn test_project_config_precedence() {
        let _home = isolated_home();
        let dir = TempDir::new().unwrap();
        write_project_config(dir.path(), "[locale]\ndefault = \"ms\"\n");

        let config = Config::load_from_cwd(dir.path());

        assert_eq!(config.locale.default, Locale::Ms);
        assert_eq!(config.storage.file, "storage.json");
        cleanup();
    }

    #[test]
    #[serial]
    fn test_project_overrides_user_config() {
        let home = isolated_home();
        fs::write(
            home.path().join("config.toml"),
            "[locale]\ndefault = \"zh\"\n[storage]\nfile = \"user.json\"\n",
        )
        .unwrap();
        let dir = TempDir::new().unwrap();
        write_project_config(dir.path(), "[locale]\ndefault = \"ms\"\n");

        let config = Config::load_from_cwd(dir.path());

        assert_eq!(config.locale.default, Locale::Ms);
        // Untouched by the project layer
        assert_eq!(config.storage.file, "user.json");
        cleanup();
    }

    #[test]
    #[serial]
    fn test_broken_project_config_is_skipped() {
        let _home = isolated_home();
        let dir = TempDir::new().unwrap();
        write_project_config(dir.path(), "[[[ nope");

        let config = Config::load_from_cwd(dir.path());
        assert_eq!(config, Config::default());
        cleanup();
    }

    #[test]
    #[serial]
    fn test_env_var_precedence() {
        let _home = isolated_home();
        let dir = TempDir::new().unwrap();
        write_project_config(dir.path(), "[locale]\ndefault = \"ms\"\n");

        env::set_var("BOUNDARIES_LOCALE", "zh");
        let config = Config::load_from_cwd(dir.path());

        assert_eq!(config.locale.default, Locale::Zh);
        cleanup();
    }

    #[test]
    #[serial]
    fn test_env_var_overrides() {
        let _home = isolated_home();
        env::set_var("BOUNDARIES_STORAGE_FILE", "/var/lib/boundaries/kv.json");
        env::set_var("BOUNDARIES_RESUME_AUDIO", "0");
        env::set_var("BOUNDARIES_PERMISSION_AUDIO", "denied");
        env::set_var("BOUNDARIES_PERMISSION_CAMERA", "Granted");

        let dir = TempDir::new().unwrap();
        let config = Config::load_from_cwd(dir.path());

        assert_eq!(config.storage.file, "/var/lib/boundaries/kv.json");
        assert!(!config.permissions.resume_audio);
        assert_eq!(config.permissions.audio, PresetOutcome::Denied);
        assert_eq!(config.permissions.camera, PresetOutcome::Granted);
        cleanup();
    }

    #[test]
    #[serial]
    fn test_env_var_invalid_values_ignored() {
        let _home = isolated_home();
        env::set_var("BOUNDARIES_LOCALE", "klingon");
        env::set_var("BOUNDARIES_PERMISSION_AUDIO", "maybe");
        env::set_var("BOUNDARIES_STORAGE_FILE", "  ");
        env::set_var("BOUNDARIES_RESUME_AUDIO", "yes");

        let dir = TempDir::new().unwrap();
        let config = Config::load_from_cwd(dir.path());

        assert_eq!(config.locale.default, Locale::En);
        assert_eq!(config.permissions.audio, PresetOutcome::Granted);
        assert_eq!(config.storage.file, "storage.json");
        assert!(config.permissions.resume_audio);
        cleanup();
    }

    #[test]
    #[serial]
    fn test_invalid_resume_audio_keeps_project_value() {
        let _home = isolated_home();
        let dir = TempDir::new().unwrap();
        write_project_config(dir.path(), "[permissions]\nresume_audio = false\n");

        env::set_var("BOUNDARIES_RESUME_AUDIO", "yes");
        let config = Config::load_from_cwd(dir.path());
        assert!(!config.permissions.resume_audio);

        env::set_var("BOUNDARIES_RESUME_AUDIO", "1");
        let config = Config::load_from_cwd(dir.path());
        assert!(config.permissions.resume_audio);

        env::set_var("BOUNDARIES_RESUME_AUDIO", "0");
        let config = Config::load_from_cwd(dir.path());
        assert!(!config.permissions.resume_audio);
        cleanup();
    }

    #[test]
    fn test_merge_field_by_field() {
        let mut lower = Config::default();
        lower.storage.file = "lower.json".to_string();
        lower.permissions.camera = PresetOutcome::Granted;

        let mut higher = Config::default();
        higher.locale.default = Locale::Ms;
        higher.permissions.resume_audio = false;

        let merged = lower.merge(higher);

        assert_eq!(merged.locale.default, Locale::Ms);
        assert_eq!(merged.storage.file, "lower.json");
        assert_eq!(merged.permissions.camera, PresetOutcome::Granted);
        assert!(!merged.permissions.resume_audio);
    }

    #[test]
    fn test_merge_with_explicit_defaults_does_not_block_overrides() {
        let mut lower = Config::default();
        lower.locale.default = Locale::Zh;

        let merged = lower.merge(Config::default());
        assert_eq!(merged.locale.default, Locale::Zh);
    }

    #[test]
    fn test_outcome_for() {
        let mut permissions = PermissionsConfig::default();
        permissions.notifications = PresetOutcome::Unavailable;

        assert_eq!(
            permissions.outcome_for(Capability::Audio),
            PermissionOutcome::Granted
        );
        assert_eq!(
            permissions.outcome_for(Capability::Microphone),
            PermissionOutcome::Denied
        );
        assert_eq!(
            permissions.outcome_for(Capability::Notifications),
            PermissionOutcome::Error("unavailable".to_string())
        );
    }

    #[test]
    #[serial]
    fn test_storage_path_resolution() {
        let home = isolated_home();

        let config = Config::default();
        assert_eq!(config.storage_path(), Some(home.path().join("storage.json")));

        let mut config = Config::default();
        config.storage.file = "/srv/kv.json".to_string();
        assert_eq!(config.storage_path(), Some(PathBuf::from("/srv/kv.json")));
        cleanup();
    }

    #[test]
    #[serial]
    fn test_boundaries_home_with_env() {
        env::set_var("BOUNDARIES_HOME", "/custom/boundaries");
        assert_eq!(boundaries_home(), Some(PathBuf::from("/custom/boundaries")));
        assert_eq!(
            crash_log_path(),
            Some(PathBuf::from("/custom/boundaries/crash.log"))
        );
        env::remove_var("BOUNDARIES_HOME");
    }

    #[test]
    #[serial]
    fn test_boundaries_home_empty_env() {
        env::set_var("BOUNDARIES_HOME", "");
        let home = boundaries_home();
        assert!(home.is_some());
        assert_ne!(home, Some(PathBuf::new()));
        env::remove_var("BOUNDARIES_HOME");
    }

    #[test]
    fn test_full_toml_roundtrip() {
        let mut config = Config::default();
        config.locale.default = Locale::Ms;
        config.permissions.microphone = PresetOutcome::Granted;

        let content = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&content).unwrap();
        assert_eq!(parsed, config);
    }
}
