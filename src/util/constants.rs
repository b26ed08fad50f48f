// dashtime - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "dashtime";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "dashtime";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Duration arithmetic
// =============================================================================

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Ranges longer than this many whole days are described in days only.
pub const DAYS_ONLY_THRESHOLD: i64 = 10;

/// Maximum number of unit groups in a range-length label.
pub const MAX_DURATION_UNITS: usize = 2;

// =============================================================================
// Time controls
// =============================================================================

/// Spans longer than this disable auto-refresh (one day).
pub const MAX_AUTO_REFRESH_SPAN_MS: i64 = MS_PER_DAY;

/// Default zoom-out factor used by the zoom button.
pub const DEFAULT_ZOOM_FACTOR: f64 = 2.0;

/// Default dashboard range when neither config nor caller supplies one.
pub const DEFAULT_RANGE_FROM: &str = "now-6h";
pub const DEFAULT_RANGE_TO: &str = "now";

/// Default refresh intervals offered by the refresh picker.
pub const DEFAULT_REFRESH_INTERVALS: &[&str] = &[
    "5s", "10s", "30s", "1m", "5m", "15m", "30m", "1h", "2h", "1d",
];

/// Refresh intervals shorter than this are dropped from the picker.
pub const MIN_REFRESH_INTERVAL_MS: i64 = MS_PER_SECOND;

/// Display format for absolute timestamps.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Upper bound on a date-math expression length.
pub const MAX_DATE_MATH_LENGTH: usize = 256;

// =============================================================================
// Picker history
// =============================================================================

/// Default number of recently used ranges remembered by the picker.
pub const DEFAULT_HISTORY_SIZE: usize = 4;

/// Hard upper bound on history size.
pub const MAX_HISTORY_SIZE: usize = 10;

/// History persistence file name (stored in the platform data directory).
pub const HISTORY_FILE_NAME: &str = "picker_history.json";

// =============================================================================
// Dashboard links and menus
// =============================================================================

/// Maximum number of search hits requested for a dashboard-links dropdown.
pub const DASHBOARD_SEARCH_LIMIT: usize = 50;

/// Panel type that carries overlay menu entries.
pub const MENU_LINK_PANEL_TYPE: &str = "british-steel-menu-link";

/// Dashboard uid of the root overlay menu.
pub const DEFAULT_MENU_ID: &str = "AYSUuF7Gk";

/// Icon paths used by the panel list.
pub const ROW_ICON: &str = "/public/img/icn-row.svg";
pub const PANEL_ICON: &str = "/public/img/icn-panel.svg";

// =============================================================================
// DataHub notifier
// =============================================================================

/// Host suffix appended to the configured DataHub server name.
pub const DATAHUB_DOMAIN: &str = "pc.scunthorpe.corusgroup.com";

/// Content type sent with DataHub write requests.
pub const DATAHUB_CONTENT_TYPE: &str = "application/x-www-form-url";

/// Maximum size of the DataHub settings file in bytes.
pub const MAX_DATAHUB_FILE_SIZE: u64 = 256 * 1024;

/// Default DataHub settings file, relative to the working directory.
pub const DATAHUB_SETTINGS_FILE: &str = "conf/localDefaults.ini";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
