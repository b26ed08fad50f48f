// dashtime - core/datahub.rs
//
// DataHub alert notifier: turns an alert state change into the plain-text
// write request a DataHub server expects.
//
// Wire body: `tag=<tag> <unix seconds> <value> <CRC hex>`, where the CRC
// covers `<tag><unix seconds><value><server key>` and uses a site-specific
// MSB-first table loaded from the settings file. Sending the request is
// left to the caller.

use crate::util::constants::{DATAHUB_CONTENT_TYPE, DATAHUB_DOMAIN};
use crate::util::error::DatahubError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

const CRC32_INIT: u32 = 0xFFFF_FFFF;
const CRC32_XOR: u32 = 0xFFFF_FFFF;
const CRC_TABLE_LEN: usize = 256;

/// Keys and CRC table from the `[datahub-keys]` and `[datahub-crctable]`
/// sections of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatahubSettings {
    /// `host:port` (host lowercased) to shared key.
    pub keys: HashMap<String, String>,
    pub crc_table: Vec<u32>,
}

impl DatahubSettings {
    /// Parse INI-style settings. Unknown sections, blank lines and
    /// unparseable table words are skipped.
    pub fn parse(content: &str) -> Self {
        let mut settings = Self::default();
        let mut section = String::new();

        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = name.to_lowercase();
                continue;
            }
            match section.as_str() {
                "datahub-keys" => {
                    if let Some((host_port, key)) = line.split_once('=') {
                        let (host_port, key) = (host_port.trim(), key.trim());
                        if !host_port.is_empty() && !key.is_empty() {
                            settings
                                .keys
                                .insert(normalise_host_port(host_port), key.to_string());
                        }
                    }
                }
                "datahub-crctable" => settings.crc_table.extend(
                    line.split_whitespace()
                        .filter_map(|word| u32::from_str_radix(word, 16).ok()),
                ),
                _ => {}
            }
        }

        tracing::debug!(
            keys = settings.keys.len(),
            crc_entries = settings.crc_table.len(),
            "DataHub settings parsed"
        );
        settings
    }

    /// Shared key for a server and port; empty when none is configured.
    pub fn key_for(&self, server: &str, port: &str) -> &str {
        self.keys
            .get(&format!("{}:{port}", server.to_lowercase()))
            .map_or("", String::as_str)
    }

    /// Sorted, de-duplicated host names with a configured key.
    pub fn hosts(&self) -> Vec<String> {
        let mut hosts: Vec<String> = self
            .keys
            .keys()
            .map(|hp| hp.split(':').next().unwrap_or_default().to_string())
            .collect();
        hosts.sort();
        hosts.dedup();
        hosts
    }

    /// Table-driven CRC over `data`.
    pub fn crc32(&self, data: &[u8]) -> Result<u32, DatahubError> {
        if self.crc_table.len() != CRC_TABLE_LEN {
            return Err(DatahubError::InvalidCrcTable {
                entries: self.crc_table.len(),
            });
        }
        let crc = data.iter().fold(CRC32_INIT, |crc, &byte| {
            self.crc_table[(((crc >> 24) ^ u32::from(byte)) & 0xFF) as usize] ^ (crc << 8)
        });
        Ok(crc ^ CRC32_XOR)
    }
}

fn normalise_host_port(host_port: &str) -> String {
    match host_port.split_once(':') {
        Some((host, port)) => format!("{}:{}", host.to_lowercase(), port),
        None => host_port.to_lowercase(),
    }
}

/// Alert rule state as seen by a notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertState {
    Ok,
    Alerting,
    NoData,
    Pending,
}

/// DataHub event kind derived from the alert state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Trigger,
    Resolve,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Trigger => "trigger",
            EventType::Resolve => "resolve",
        }
    }
}

/// A fully built write request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatahubRequest {
    pub event_type: EventType,
    pub url: String,
    pub content_type: &'static str,
    pub body: String,
}

/// Notifier configured from an alert channel's settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatahubNotifier {
    pub tag: String,
    pub server: String,
    pub port: String,
    pub alert_value: String,
    pub ok_value: String,
}

impl DatahubNotifier {
    /// Build from the channel's key/value settings. `tag`, `server` and
    /// `port` are required; the values default to empty strings.
    pub fn from_settings(settings: &HashMap<String, String>) -> Result<Self, DatahubError> {
        let get = |field: &str| {
            settings
                .get(field)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        let require = |field: &'static str| {
            let value = get(field);
            if value.is_empty() {
                Err(DatahubError::MissingSetting { field })
            } else {
                Ok(value)
            }
        };

        Ok(Self {
            tag: require("tag")?,
            server: require("server")?,
            port: require("port")?,
            alert_value: get("alertvalue"),
            ok_value: get("okvalue"),
        })
    }

    /// Build the write request for a state change at `now`.
    pub fn build_request(
        &self,
        state: AlertState,
        now: DateTime<Utc>,
        settings: &DatahubSettings,
    ) -> Result<DatahubRequest, DatahubError> {
        let (event_type, value) = match state {
            AlertState::Ok => (EventType::Resolve, self.ok_value.as_str()),
            _ => (EventType::Trigger, self.alert_value.as_str()),
        };

        let timestamp = now.timestamp().to_string();
        let key = settings.key_for(&self.server, &self.port);
        let signed = format!("{}{timestamp}{value}{key}", self.tag);
        let crc = settings.crc32(signed.as_bytes())?;
        let body = format!("tag={} {timestamp} {value} {crc:X}", self.tag);

        tracing::info!(
            event_type = event_type.as_str(),
            tag = %self.tag,
            server = %self.server,
            port = %self.port,
            "Built DataHub request"
        );

        Ok(DatahubRequest {
            event_type,
            url: format!(
                "http://{}.{DATAHUB_DOMAIN}:{}/write",
                self.server, self.port
            ),
            content_type: DATAHUB_CONTENT_TYPE,
            body,
        })
    }
}
