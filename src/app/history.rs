// dashtime - app/history.rs
//
// Recently used time ranges shown in the picker, and their persistence.
//
// - Most recent first; re-selecting a range moves it to the front.
// - Capped at the configured size; the oldest entry drops off.
// - Saved atomically (write temp, rename) as versioned JSON.
// - Load errors discard the history; the picker just starts empty.

use crate::core::model::RawTimeRange;
use crate::util::constants::HISTORY_FILE_NAME;
use crate::util::error::HistoryError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Version stamp for forward-compatibility checks. Mismatches discard the
/// stored history.
pub const HISTORY_VERSION: u32 = 1;

/// On-disk history snapshot.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryData {
    pub version: u32,
    #[serde(default)]
    pub ranges: Vec<RawTimeRange>,
}

/// In-memory picker history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerHistory {
    ranges: Vec<RawTimeRange>,
    capacity: usize,
}

impl PickerHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            ranges: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record a selection at the front, removing any earlier copy.
    pub fn push(&mut self, range: RawTimeRange) {
        self.ranges.retain(|r| *r != range);
        self.ranges.insert(0, range);
        self.ranges.truncate(self.capacity);
    }

    /// Entries, most recent first.
    pub fn ranges(&self) -> &[RawTimeRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn to_data(&self) -> HistoryData {
        HistoryData {
            version: HISTORY_VERSION,
            ranges: self.ranges.clone(),
        }
    }

    fn from_data(data: HistoryData, capacity: usize) -> Self {
        let mut history = Self::new(capacity);
        // Oldest first so the stored order survives a smaller capacity.
        for range in data.ranges.into_iter().rev() {
            history.push(range);
        }
        history
    }
}

/// Resolve the history file path from the platform data directory.
pub fn history_path(data_dir: &Path) -> PathBuf {
    data_dir.join(HISTORY_FILE_NAME)
}

/// Save `history` to `path` atomically, creating parent directories.
pub fn save(history: &PickerHistory, path: &Path) -> Result<(), HistoryError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| HistoryError::Io {
            path: parent.to_path_buf(),
            operation: "create directory for",
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(&history.to_data())
        .map_err(|source| HistoryError::Serialise { source })?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json.as_bytes()).map_err(|source| HistoryError::Io {
        path: tmp.clone(),
        operation: "write",
        source,
    })?;

    std::fs::rename(&tmp, path).map_err(|source| {
        let _ = std::fs::remove_file(&tmp);
        HistoryError::Io {
            path: path.to_path_buf(),
            operation: "finalise",
            source,
        }
    })?;

    tracing::debug!(path = %path.display(), entries = history.ranges.len(), "History saved");
    Ok(())
}

/// Load history from `path`, keeping at most `capacity` entries.
///
/// Returns `None` when the file is missing, malformed or from another
/// version.
pub fn load(path: &Path, capacity: usize) -> Option<PickerHistory> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %e, "Cannot read history file");
            }
        })
        .ok()?;

    let data: HistoryData = serde_json::from_str(&content)
        .map_err(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "History file is malformed, starting empty"
            );
        })
        .ok()?;

    if data.version != HISTORY_VERSION {
        tracing::warn!(
            found = data.version,
            expected = HISTORY_VERSION,
            "History file version mismatch, starting empty"
        );
        return None;
    }

    let history = PickerHistory::from_data(data, capacity);
    tracing::info!(path = %path.display(), entries = history.ranges.len(), "History loaded");
    Some(history)
}
