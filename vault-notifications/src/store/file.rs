use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::ReadMarkerStore;
use crate::error::Result;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedMarker {
    last_read_timestamp: i64,
}

/// Read marker persisted as a small JSON document
///
/// Writes land in a sibling `.tmp` file first and are renamed into place, so a
/// reader sees either the previous marker or the new one.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ReadMarkerStore for JsonFileStore {
    fn load(&self) -> Result<Option<i64>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let marker: PersistedMarker = serde_json::from_str(&contents)?;
        Ok(Some(marker.last_read_timestamp))
    }

    fn save(&self, millis: i64) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let body = serde_json::to_vec(&PersistedMarker {
            last_read_timestamp: millis,
        })?;

        let temp = self.temp_path();
        fs::write(&temp, body)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
