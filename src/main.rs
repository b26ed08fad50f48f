// dashtime - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation (debug mode support)
// 3. Dispatch to the time controls and the DataHub request builder
//
// Results go to stdout; logs go to stderr.

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use dashtime::app::controls::TimeControls;
use dashtime::app::history::{self, PickerHistory};
use dashtime::core::datahub::{AlertState, DatahubNotifier};
use dashtime::core::datemath::{parse_endpoint, resolve};
use dashtime::core::describe::{describe_range, Tooltip};
use dashtime::core::duration::describe_duration;
use dashtime::core::model::{RawTimeRange, TimeZone};
use dashtime::platform::config::{load_config, AppConfig, PlatformPaths};
use dashtime::platform::fs::load_datahub_settings;
use dashtime::util::{self, error::ConfigError, error::Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// dashtime - dashboard time range tools.
///
/// Evaluates relative range expressions such as `now-6h` or `now/d`,
/// describes range lengths, and steps or widens ranges the way the
/// dashboard time controls do.
#[derive(Parser, Debug)]
#[command(name = "dashtime", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Display zone: "browser" or "utc" (overrides config.toml).
    #[arg(short = 't', long = "timezone", global = true)]
    timezone: Option<String>,

    /// Directory holding config.toml (defaults to the platform config dir).
    #[arg(short = 'c', long = "config-dir", global = true)]
    config_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the length of a range, e.g. "2 hours 30 minutes".
    Describe { from: String, to: String },

    /// Print both ends of a range as timestamps, with its label.
    Resolve { from: String, to: String },

    /// Print the picker tooltip for a range.
    Tooltip { from: String, to: String },

    /// Move a range by half its span.
    Shift {
        from: String,
        to: String,
        #[arg(long, value_enum, default_value_t = Direction::Backward)]
        direction: Direction,
    },

    /// Widen a range around its centre.
    Zoom {
        from: String,
        to: String,
        #[arg(long, default_value_t = util::constants::DEFAULT_ZOOM_FACTOR)]
        factor: f64,
    },

    /// List recently used ranges.
    History,

    /// Build the DataHub write request for an alert state change.
    Notify {
        #[arg(long)]
        tag: String,
        #[arg(long)]
        server: String,
        #[arg(long)]
        port: String,
        #[arg(long = "alert-value", default_value = "")]
        alert_value: String,
        #[arg(long = "ok-value", default_value = "")]
        ok_value: String,
        /// Resolve instead of trigger.
        #[arg(long)]
        ok: bool,
        /// Settings file with the DataHub keys and CRC table.
        #[arg(long, default_value = util::constants::DATAHUB_SETTINGS_FILE)]
        settings: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Direction {
    Backward,
    Forward,
}

fn main() {
    let cli = Cli::parse();

    let platform_paths = PlatformPaths::resolve();
    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| platform_paths.config_dir.clone());
    let (config, warnings) = load_config(&config_dir);

    util::logging::init(cli.debug, config.log_level.as_deref());
    for warning in &warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    tracing::debug!(
        version = util::constants::APP_VERSION,
        command = ?cli.command,
        "dashtime starting"
    );

    if let Err(e) = run(cli, config, &platform_paths) {
        tracing::error!(error = %e, "Command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn parse_range(from: &str, to: &str) -> Result<RawTimeRange> {
    Ok(RawTimeRange::new(parse_endpoint(from)?, parse_endpoint(to)?))
}

fn run(cli: Cli, mut config: AppConfig, paths: &PlatformPaths) -> Result<()> {
    if let Some(ref name) = cli.timezone {
        config.timezone = TimeZone::parse(name).ok_or_else(|| ConfigError::ValueOutOfRange {
            field: "--timezone".to_string(),
            value: name.clone(),
            expected: "browser or utc".to_string(),
        })?;
    }
    let tz = config.timezone;
    let now = Utc::now();
    let history_file = history::history_path(&paths.data_dir);

    match cli.command {
        Command::Describe { from, to } => {
            let range = resolve(&parse_range(&from, &to)?, now, tz)?;
            println!("{}", describe_duration(&range.from, &range.to));
        }
        Command::Resolve { from, to } => {
            let raw = parse_range(&from, &to)?;
            let range = resolve(&raw, now, tz)?;
            println!("{}", describe_range(&raw, tz));
            println!("from: {}", tz.format(&range.from));
            println!("to:   {}", tz.format(&range.to));
        }
        Command::Tooltip { from, to } => {
            let range = resolve(&parse_range(&from, &to)?, now, tz)?;
            println!("{}", Tooltip::build(&range, tz));
        }
        Command::Shift {
            from,
            to,
            direction,
        } => {
            let mut controls = controls_for(&config, &history_file, parse_range(&from, &to)?);
            match direction {
                Direction::Backward => controls.move_backward(now)?,
                Direction::Forward => controls.move_forward(now)?,
            }
            println!("{}", controls.raw());
            history::save(&controls.history, &history_file)?;
        }
        Command::Zoom { from, to, factor } => {
            let mut controls = controls_for(&config, &history_file, parse_range(&from, &to)?);
            controls.zoom_out(now, Some(factor))?;
            println!("{}", controls.raw());
            history::save(&controls.history, &history_file)?;
        }
        Command::History => {
            let saved = history::load(&history_file, config.history_size)
                .unwrap_or_else(|| PickerHistory::new(config.history_size));
            for raw in saved.ranges() {
                println!("{}", describe_range(raw, tz));
            }
        }
        Command::Notify {
            tag,
            server,
            port,
            alert_value,
            ok_value,
            ok,
            settings,
        } => {
            let channel: HashMap<String, String> = [
                ("tag", tag),
                ("server", server),
                ("port", port),
                ("alertvalue", alert_value),
                ("okvalue", ok_value),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
            let notifier = DatahubNotifier::from_settings(&channel)?;
            let state = if ok { AlertState::Ok } else { AlertState::Alerting };
            let request =
                notifier.build_request(state, now, &load_datahub_settings(&settings)?)?;
            println!("POST {}", request.url);
            println!("Content-Type: {}", request.content_type);
            println!();
            println!("{}", request.body);
        }
    }
    Ok(())
}

/// Time controls seeded with the stored history and switched to `raw`.
fn controls_for(config: &AppConfig, history_file: &Path, raw: RawTimeRange) -> TimeControls {
    let saved = history::load(history_file, config.history_size)
        .unwrap_or_else(|| PickerHistory::new(config.history_size));
    let mut controls = TimeControls::new(config, saved);
    controls.change_range(raw);
    controls
}
