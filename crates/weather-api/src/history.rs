//! JSON file history store
//!
//! The file is a single pretty-printed JSON array. Entries this crate did not
//! write (older layouts with extra or missing keys) are carried over as-is.

use std::io::Write;
use std::path::{Path, PathBuf};

use bridge_runtime::bridge_debug;
use core_types::{HistoryStore, PersistError, WeatherRecord};
use serde::Serialize;
use serde_json::Value;

/// Name used by earlier deployments, so an existing history is picked up.
pub const DEFAULT_HISTORY_FILE: &str = "hangzhou_weather_history.json";

const INDENT: &[u8] = b"    ";

#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every entry that parses as a [`WeatherRecord`], in file order.
    pub fn load(&self) -> Result<Vec<WeatherRecord>, PersistError> {
        self.load_entries()?
            .into_iter()
            .map(|entry| {
                serde_json::from_value(entry).map_err(|e| PersistError::Corrupt(e.to_string()))
            })
            .collect()
    }

    fn load_entries(&self) -> Result<Vec<Value>, PersistError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(entries)) => Ok(entries),
            Ok(_) => Err(PersistError::NotAList),
            Err(e) => Err(PersistError::Corrupt(format!("{}: {}", self.path.display(), e))),
        }
    }

    /// Replace the file with `entries` via a sibling temp file and rename.
    fn write_entries(&self, entries: &[Value]) -> Result<(), PersistError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        entries
            .serialize(&mut serializer)
            .map_err(|e| PersistError::Io(e.to_string()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        // Temp files are created owner-only; the replacement keeps the old file's mode
        if let Ok(meta) = std::fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| self.io_error(e))?;
        }
        tmp.write_all(&buf).map_err(|e| self.io_error(e))?;
        tmp.flush().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        Ok(())
    }

    fn io_error(&self, err: std::io::Error) -> PersistError {
        PersistError::Io(format!("{}: {}", self.path.display(), err))
    }
}

impl HistoryStore for JsonHistoryStore {
    fn append(&mut self, record: &WeatherRecord) -> Result<usize, PersistError> {
        let mut entries = self.load_entries()?;
        let entry = serde_json::to_value(record).map_err(|e| PersistError::Io(e.to_string()))?;
        entries.push(entry);

        self.write_entries(&entries)?;
        bridge_debug!(
            "JsonHistoryStore: {} now holds {} records",
            self.path.display(),
            entries.len()
        );

        Ok(entries.len())
    }
}
