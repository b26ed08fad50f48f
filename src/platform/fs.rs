// dashtime - platform/fs.rs
//
// Filesystem access for settings files read outside config.toml.

use crate::core::datahub::DatahubSettings;
use crate::util::constants::MAX_DATAHUB_FILE_SIZE;
use crate::util::error::DatahubError;
use std::io;
use std::path::Path;

/// Read a file as a string, refusing anything larger than `max_size` bytes.
///
/// For files with invalid UTF-8, uses lossy conversion.
pub fn read_limited(path: &Path, max_size: u64) -> Result<String, DatahubError> {
    let io_err = |source: io::Error| DatahubError::Io {
        path: path.to_path_buf(),
        source,
    };
    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > max_size {
        return Err(DatahubError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size,
        });
    }
    let bytes = std::fs::read(path).map_err(io_err)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Load the DataHub keys and CRC table.
///
/// A missing file yields empty settings; building a request with them then
/// fails on the CRC table check.
pub fn load_datahub_settings(path: &Path) -> Result<DatahubSettings, DatahubError> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "DataHub settings file not found");
        return Ok(DatahubSettings::default());
    }
    let content = read_limited(path, MAX_DATAHUB_FILE_SIZE)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Read DataHub settings");
    Ok(DatahubSettings::parse(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_empty_settings() {
        let dir = TempDir::new().unwrap();
        let settings = load_datahub_settings(&dir.path().join("nope.ini")).unwrap();
        assert_eq!(settings, DatahubSettings::default());
    }

    #[test]
    fn test_loads_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("localDefaults.ini");
        std::fs::write(&path, "[datahub-keys]\nscbosco1:9000=secret\n").unwrap();
        let settings = load_datahub_settings(&path).unwrap();
        assert_eq!(settings.key_for("scbosco1", "9000"), "secret");
    }

    #[test]
    fn test_oversized_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.ini");
        std::fs::write(&path, vec![b'x'; 64]).unwrap();
        assert!(matches!(
            read_limited(&path, 16),
            Err(DatahubError::FileTooLarge { size: 64, .. })
        ));
    }
}
