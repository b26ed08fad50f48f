// dashtime - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::datemath::{parse_endpoint, parse_interval};
use crate::core::model::{RawTimeRange, TimeZone};
use crate::core::navigation::valid_intervals;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for dashtime data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/dashtime/ or %APPDATA%\dashtime\config\)
    pub config_dir: PathBuf,

    /// Data directory for the picker history.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[time]` section.
    pub time: TimeSection,
    /// `[picker]` section.
    pub picker: PickerSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[time]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct TimeSection {
    /// "browser" or "utc".
    pub timezone: Option<String>,
    /// Delay applied to ranges ending at `now` (e.g. "1m").
    pub now_delay: Option<String>,
    /// Refresh intervals offered by the refresh picker.
    pub refresh_intervals: Option<Vec<String>>,
    /// Initial auto-refresh interval.
    pub refresh: Option<String>,
    /// Default range start expression.
    pub default_from: Option<String>,
    /// Default range end expression.
    pub default_to: Option<String>,
    /// Lock the time controls.
    pub locked: Option<bool>,
}

/// `[picker]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct PickerSection {
    /// Number of recently used ranges to remember.
    pub history_size: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Time --
    pub timezone: TimeZone,
    pub now_delay: Option<String>,
    pub refresh_intervals: Vec<String>,
    pub refresh: Option<String>,
    pub default_range: RawTimeRange,
    pub locked: bool,

    // -- Picker --
    pub history_size: usize,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timezone: TimeZone::default(),
            now_delay: None,
            refresh_intervals: constants::DEFAULT_REFRESH_INTERVALS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            refresh: None,
            default_range: RawTimeRange::relative(
                constants::DEFAULT_RANGE_FROM,
                constants::DEFAULT_RANGE_TO,
            ),
            locked: false,
            history_size: constants::DEFAULT_HISTORY_SIZE,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unparseable, returns defaults with a warning.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let raw = match read_raw_config(&config_path) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            return (AppConfig::default(), vec![msg]);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    validate(raw)
}

/// Read and deserialise a config file without validating its values.
pub fn read_raw_config(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Validate each field, accumulating warnings for rejected values.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let mut config = AppConfig::default();

    // -- Time: timezone --
    if let Some(ref tz) = raw.time.timezone {
        match TimeZone::parse(tz) {
            Some(parsed) => config.timezone = parsed,
            None => warnings.push(format!(
                "[time] timezone = \"{tz}\" is not recognised. Expected \"browser\" or \"utc\". \
                 Using default (browser)."
            )),
        }
    }

    // -- Time: now_delay --
    if let Some(ref delay) = raw.time.now_delay {
        if delay.is_empty() {
            // Explicitly disabled.
        } else if parse_interval(delay).is_ok() {
            config.now_delay = Some(delay.clone());
        } else {
            warnings.push(format!(
                "[time] now_delay = \"{delay}\" is not a valid interval (e.g. 1m). Ignoring."
            ));
        }
    }

    // -- Time: refresh_intervals --
    if let Some(ref intervals) = raw.time.refresh_intervals {
        let valid = valid_intervals(intervals, constants::MIN_REFRESH_INTERVAL_MS);
        for dropped in intervals.iter().filter(|i| !valid.contains(i)) {
            warnings.push(format!(
                "[time] refresh interval \"{dropped}\" is invalid or below the minimum. Dropped."
            ));
        }
        if valid.is_empty() {
            warnings.push(
                "[time] refresh_intervals has no valid entries. Using defaults.".to_string(),
            );
        } else {
            config.refresh_intervals = valid;
        }
    }

    // -- Time: refresh --
    if let Some(ref refresh) = raw.time.refresh {
        if config.refresh_intervals.contains(refresh) {
            config.refresh = Some(refresh.clone());
        } else if !refresh.is_empty() {
            warnings.push(format!(
                "[time] refresh = \"{refresh}\" is not one of the refresh intervals. \
                 Auto-refresh stays off."
            ));
        }
    }

    // -- Time: default range --
    let from = raw
        .time
        .default_from
        .as_deref()
        .unwrap_or(constants::DEFAULT_RANGE_FROM);
    let to = raw
        .time
        .default_to
        .as_deref()
        .unwrap_or(constants::DEFAULT_RANGE_TO);
    match (parse_endpoint(from), parse_endpoint(to)) {
        (Ok(from), Ok(to)) => config.default_range = RawTimeRange::new(from, to),
        (Err(e), _) | (_, Err(e)) => warnings.push(format!(
            "[time] default range \"{from}\" to \"{to}\" is invalid: {e}. Using default (now-6h to now)."
        )),
    }

    config.locked = raw.time.locked.unwrap_or(false);

    // -- Picker: history_size --
    if let Some(size) = raw.picker.history_size {
        if (1..=constants::MAX_HISTORY_SIZE).contains(&size) {
            config.history_size = size;
        } else {
            let err = ConfigError::ValueOutOfRange {
                field: "picker.history_size".to_string(),
                value: size.to_string(),
                expected: format!("1-{}", constants::MAX_HISTORY_SIZE),
            };
            warnings.push(format!(
                "{err}. Using default ({}).",
                constants::DEFAULT_HISTORY_SIZE
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::RangeEndpoint;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) {
        std::fs::write(dir.path().join(constants::CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty());
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_valid_config() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
[time]
timezone = "utc"
now_delay = "1m"
refresh_intervals = ["10s", "1m"]
refresh = "1m"
default_from = "now-24h"
default_to = "now"
locked = true

[picker]
history_size = 6

[logging]
level = "debug"
"#,
        );
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.timezone, TimeZone::Utc);
        assert_eq!(config.now_delay.as_deref(), Some("1m"));
        assert_eq!(config.refresh_intervals, vec!["10s", "1m"]);
        assert_eq!(config.refresh.as_deref(), Some("1m"));
        assert_eq!(config.default_range.from, RangeEndpoint::relative("now-24h"));
        assert!(config.locked);
        assert_eq!(config.history_size, 6);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_values_fall_back_with_warnings() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
[time]
timezone = "mars"
now_delay = "soon"
refresh_intervals = ["500ms", "nope"]
default_from = "now-3q"

[picker]
history_size = 99
"#,
        );
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config.timezone, TimeZone::Browser);
        assert!(config.now_delay.is_none());
        assert_eq!(
            config.refresh_intervals.len(),
            constants::DEFAULT_REFRESH_INTERVALS.len()
        );
        assert_eq!(config.default_range, AppConfig::default().default_range);
        assert_eq!(config.history_size, constants::DEFAULT_HISTORY_SIZE);
        // timezone, now_delay, 2 dropped intervals, empty intervals, range, history
        assert_eq!(warnings.len(), 7, "warnings: {warnings:?}");
    }

    #[test]
    fn test_unparseable_file_gives_defaults_with_warning() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[time\ntimezone = ");
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
    }
}
