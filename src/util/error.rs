// dashtime - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all dashtime operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum DashTimeError {
    /// A date-math expression could not be evaluated.
    DateMath(DateMathError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Picker history persistence failed.
    History(HistoryError),

    /// DataHub notifier settings or payload construction failed.
    Datahub(DatahubError),
}

impl fmt::Display for DashTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateMath(e) => write!(f, "Date math error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::History(e) => write!(f, "History error: {e}"),
            Self::Datahub(e) => write!(f, "DataHub error: {e}"),
        }
    }
}

impl std::error::Error for DashTimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DateMath(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::History(e) => Some(e),
            Self::Datahub(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Date math errors
// ---------------------------------------------------------------------------

/// Errors raised while parsing relative time expressions such as `now-6h/h`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateMathError {
    /// The expression was empty.
    Empty,

    /// The expression exceeds the maximum allowed length.
    TooLong { length: usize, max_length: usize },

    /// The anchor before `||` is not a recognised absolute timestamp.
    InvalidAnchor { expression: String, anchor: String },

    /// An operation after the anchor could not be parsed.
    InvalidOperation {
        expression: String,
        position: usize,
    },

    /// A unit character is not one of `s m h d w M y`.
    UnknownUnit { expression: String, unit: char },

    /// The result falls outside the representable date range.
    OutOfRange { expression: String },

    /// An interval string such as `5m` is malformed.
    InvalidInterval { interval: String },
}

impl fmt::Display for DateMathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty time expression"),
            Self::TooLong { length, max_length } => write!(
                f,
                "time expression is {length} chars, exceeds maximum of {max_length}"
            ),
            Self::InvalidAnchor { expression, anchor } => write!(
                f,
                "'{expression}': '{anchor}' is not a valid timestamp anchor"
            ),
            Self::InvalidOperation {
                expression,
                position,
            } => write!(
                f,
                "'{expression}': cannot parse operation at offset {position}"
            ),
            Self::UnknownUnit { expression, unit } => {
                write!(f, "'{expression}': unknown time unit '{unit}'")
            }
            Self::OutOfRange { expression } => {
                write!(f, "'{expression}': result is out of the supported date range")
            }
            Self::InvalidInterval { interval } => {
                write!(f, "'{interval}' is not a valid interval (expected e.g. 30s, 5m, 1h)")
            }
        }
    }
}

impl std::error::Error for DateMathError {}

impl From<DateMathError> for DashTimeError {
    fn from(e: DateMathError) -> Self {
        Self::DateMath(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for DashTimeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// History errors
// ---------------------------------------------------------------------------

/// Errors related to saving the picker history file.
#[derive(Debug)]
pub enum HistoryError {
    /// The history could not be serialised.
    Serialise { source: serde_json::Error },

    /// I/O error writing or renaming the history file.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialise { source } => write!(f, "failed to serialise history: {source}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "failed to {operation} history file '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialise { source } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<HistoryError> for DashTimeError {
    fn from(e: HistoryError) -> Self {
        Self::History(e)
    }
}

// ---------------------------------------------------------------------------
// DataHub errors
// ---------------------------------------------------------------------------

/// Errors related to the DataHub alert notifier.
#[derive(Debug)]
pub enum DatahubError {
    /// A required notifier setting is missing or empty.
    MissingSetting { field: &'static str },

    /// The CRC table section does not hold exactly 256 entries.
    InvalidCrcTable { entries: usize },

    /// The settings file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// I/O error reading the settings file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for DatahubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting { field } => {
                write!(f, "could not find {field} property in settings")
            }
            Self::InvalidCrcTable { entries } => write!(
                f,
                "CRC table has {entries} entries, expected 256"
            ),
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "settings file '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "cannot read settings file '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DatahubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DatahubError> for DashTimeError {
    fn from(e: DatahubError) -> Self {
        Self::Datahub(e)
    }
}

/// Convenience type alias for dashtime results.
pub type Result<T> = std::result::Result<T, DashTimeError>;
