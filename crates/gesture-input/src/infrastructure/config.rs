//! TOML configuration for the input subsystem.
//!
//! Reads and writes [`InputConfig`] from an explicit path or from the
//! platform-appropriate config file:
//! - Windows:  `%APPDATA%\GestureInput\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/gesture-input/config.toml` or
//!   `~/.config/gesture-input/config.toml`
//! - macOS:    `~/Library/Application Support/GestureInput/config.toml`
//!
//! Example:
//!
//! ```toml
//! log_level = "debug"
//! worker_threads = 2
//!
//! [smoothing]
//! factor = 0.5
//!
//! [timing]
//! click_hold_ms = 30
//!
//! [platform]
//! force_headless = true
//! ```
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = "...")]`, so a missing file, an
//! empty file, or a file written by an older version all load cleanly.
//!
//! # Environment overrides
//!
//! `GESTURE_INPUT_HEADLESS` and `GESTURE_INPUT_DISABLE_NATIVE` set to `1`,
//! `true` or `yes` turn on the matching `[platform]` switch regardless of the
//! file.  See [`InputConfig::apply_env_overrides`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::driver::DriverTimings;
use crate::application::input_service::ServiceOptions;

/// Forces the headless capability snapshot when truthy.
pub const ENV_HEADLESS: &str = "GESTURE_INPUT_HEADLESS";
/// Skips the native driver when truthy.
pub const ENV_DISABLE_NATIVE: &str = "GESTURE_INPUT_DISABLE_NATIVE";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The values parsed but are out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputConfig {
    /// `tracing` level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Upper bound on queued actions executing at once.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    #[serde(default)]
    pub cooldown: CooldownConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmoothingConfig {
    /// Damping factor α in `(0, 1]`; 1 disables smoothing.
    #[serde(default = "default_smoothing_factor")]
    pub factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CooldownConfig {
    /// Minimum gap between two firings of the same discrete action.
    #[serde(default = "default_cooldown_ms")]
    pub window_ms: u64,
}

/// Delays between primitive events, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingConfig {
    #[serde(default = "default_click_hold_ms")]
    pub click_hold_ms: u64,
    #[serde(default = "default_double_click_gap_ms")]
    pub double_click_gap_ms: u64,
    #[serde(default = "default_auto_delay_ms")]
    pub auto_delay_ms: u64,
    #[serde(default = "default_key_hold_ms")]
    pub key_hold_ms: u64,
    #[serde(default = "default_combo_hold_ms")]
    pub combo_hold_ms: u64,
}

/// Capability overrides applied on top of the probe.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlatformConfig {
    /// Treat the process as headless even when a display is attached.
    #[serde(default)]
    pub force_headless: bool,
    /// Never open or use the native driver.
    #[serde(default)]
    pub disable_native: bool,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_worker_threads() -> usize {
    crate::application::worker::DEFAULT_WORKER_THREADS
}
fn default_smoothing_factor() -> f64 {
    gesture_core::DEFAULT_SMOOTHING_FACTOR
}
fn default_cooldown_ms() -> u64 {
    gesture_core::DEFAULT_COOLDOWN.as_millis() as u64
}
fn default_click_hold_ms() -> u64 {
    50
}
fn default_double_click_gap_ms() -> u64 {
    100
}
fn default_auto_delay_ms() -> u64 {
    10
}
fn default_key_hold_ms() -> u64 {
    50
}
fn default_combo_hold_ms() -> u64 {
    50
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            worker_threads: default_worker_threads(),
            smoothing: SmoothingConfig::default(),
            cooldown: CooldownConfig::default(),
            timing: TimingConfig::default(),
            platform: PlatformConfig::default(),
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            factor: default_smoothing_factor(),
        }
    }
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            window_ms: default_cooldown_ms(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            click_hold_ms: default_click_hold_ms(),
            double_click_gap_ms: default_double_click_gap_ms(),
            auto_delay_ms: default_auto_delay_ms(),
            key_hold_ms: default_key_hold_ms(),
            combo_hold_ms: default_combo_hold_ms(),
        }
    }
}

impl InputConfig {
    /// Rejects values the subsystem cannot run with.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] for a smoothing factor outside `(0, 1]` or a
    /// zero worker count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = self.smoothing.factor;
        if !(f > 0.0 && f <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "smoothing.factor must be in (0, 1], got {f}"
            )));
        }
        if self.worker_threads == 0 {
            return Err(ConfigError::Invalid("worker_threads must be at least 1".into()));
        }
        Ok(())
    }

    /// Turns on `[platform]` switches requested through the environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if lookup(ENV_HEADLESS).is_some_and(|v| is_truthy(&v)) {
            self.platform.force_headless = true;
        }
        if lookup(ENV_DISABLE_NATIVE).is_some_and(|v| is_truthy(&v)) {
            self.platform.disable_native = true;
        }
    }

    pub fn driver_timings(&self) -> DriverTimings {
        let t = &self.timing;
        DriverTimings {
            click_hold: Duration::from_millis(t.click_hold_ms),
            double_click_gap: Duration::from_millis(t.double_click_gap_ms),
            auto_delay: Duration::from_millis(t.auto_delay_ms),
            key_hold: Duration::from_millis(t.key_hold_ms),
            combo_hold: Duration::from_millis(t.combo_hold_ms),
        }
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            smoothing_factor: self.smoothing.factor,
            cooldown_window: Duration::from_millis(self.cooldown.window_ms),
            worker_threads: self.worker_threads,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads `InputConfig` from `path`, returning the defaults if the file does
/// not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<InputConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(InputConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Loads the config from the platform config directory.
///
/// # Errors
///
/// As [`load_config`], plus [`ConfigError::NoPlatformConfigDir`].
pub fn load_default_config() -> Result<InputConfig, ConfigError> {
    load_config(&config_file_path()?)
}

/// Writes `config` to `path` as pretty TOML, creating parent directories.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(path: &Path, config: &InputConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("GestureInput"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("gesture-input"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("GestureInput")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn temp_dir(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("gesture_input_{tag}_{}_{nanos}", std::process::id()))
    }

    #[test]
    fn test_default_config_matches_documented_values() {
        // Arrange / Act
        let cfg = InputConfig::default();

        // Assert
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.worker_threads, 4);
        assert!((cfg.smoothing.factor - 0.3).abs() < f64::EPSILON);
        assert_eq!(cfg.cooldown.window_ms, 100);
        assert_eq!(cfg.timing.click_hold_ms, 50);
        assert_eq!(cfg.timing.double_click_gap_ms, 100);
        assert_eq!(cfg.timing.auto_delay_ms, 10);
        assert!(!cfg.platform.force_headless);
        assert!(!cfg.platform.disable_native);
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let cfg: InputConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, InputConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        // Arrange
        let toml_str = r#"
worker_threads = 2

[timing]
click_hold_ms = 30
"#;

        // Act
        let cfg: InputConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.worker_threads, 2);
        assert_eq!(cfg.timing.click_hold_ms, 30);
        assert_eq!(cfg.timing.key_hold_ms, 50);
        assert_eq!(cfg.cooldown.window_ms, 100);
    }

    #[test]
    fn test_invalid_toml_returns_parse_error() {
        let dir = temp_dir("bad");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        let result = load_config(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_config_returns_default_when_file_absent() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/config.toml");

        let cfg = load_config(&path).expect("absent file is not an error");

        assert_eq!(cfg, InputConfig::default());
    }

    #[test]
    fn test_save_and_load_config_round_trip_via_temp_dir() {
        // Arrange
        let dir = temp_dir("roundtrip");
        let path = dir.join("nested").join("config.toml");
        let mut cfg = InputConfig::default();
        cfg.log_level = "debug".to_string();
        cfg.smoothing.factor = 0.5;
        cfg.platform.force_headless = true;

        // Act
        save_config(&path, &cfg).unwrap();
        let loaded = load_config(&path).unwrap();

        // Assert
        assert_eq!(loaded, cfg);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_validate_rejects_out_of_range_smoothing() {
        for bad in [0.0, -0.1, 1.5, f64::NAN] {
            let mut cfg = InputConfig::default();
            cfg.smoothing.factor = bad;
            assert!(
                matches!(cfg.validate(), Err(ConfigError::Invalid(_))),
                "factor {bad} must be rejected"
            );
        }
    }

    #[test]
    fn test_validate_accepts_factor_of_one() {
        let mut cfg = InputConfig::default();
        cfg.smoothing.factor = 1.0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let mut cfg = InputConfig::default();
        cfg.worker_threads = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_env_overrides_turn_switches_on() {
        // Arrange
        let env: HashMap<&str, &str> =
            [(ENV_HEADLESS, "1"), (ENV_DISABLE_NATIVE, "TRUE")].into_iter().collect();
        let mut cfg = InputConfig::default();

        // Act
        cfg.apply_overrides_from(|k| env.get(k).map(|v| v.to_string()));

        // Assert
        assert!(cfg.platform.force_headless);
        assert!(cfg.platform.disable_native);
    }

    #[test]
    fn test_env_overrides_ignore_falsy_values() {
        let mut cfg = InputConfig::default();

        cfg.apply_overrides_from(|k| (k == ENV_HEADLESS).then(|| "0".to_string()));

        assert!(!cfg.platform.force_headless);
    }

    #[test]
    fn test_driver_timings_and_service_options_follow_config() {
        let mut cfg = InputConfig::default();
        cfg.timing.double_click_gap_ms = 150;
        cfg.cooldown.window_ms = 250;

        assert_eq!(cfg.driver_timings().double_click_gap, Duration::from_millis(150));
        assert_eq!(cfg.service_options().cooldown_window, Duration::from_millis(250));
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(path.ends_with("config.toml"), "got {path:?}");
        }
    }
}
