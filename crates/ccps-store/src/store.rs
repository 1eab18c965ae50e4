//! JSON file store of named protocols.
//!
//! The file is a single JSON object mapping name to protocol string, written
//! pretty-printed with non-ASCII kept as-is and key order preserved.
//!
//! ## Corruption
//!
//! - Unparseable JSON or a non-object top level: [`ProtocolStore::open`]
//!   fails; [`ProtocolStore::reset`] deletes the file
//! - Records whose value is not a string are kept but reported by
//!   [`ProtocolStore::corrupted`]; [`ProtocolStore::repair`] drops them
//!
//! ## Durability
//!
//! Every mutation rewrites the whole file: the new contents go to a temporary
//! file in the same directory which is then renamed over the store path. On
//! any failure the temporary file is removed and the previous file and the
//! in-memory records stay untouched.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use ccps_core::ProtocolSource;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::error::StoreError;

/// Store file used when no path is configured.
pub const DEFAULT_STORE_PATH: &str = "protocols.json";

#[derive(Debug, Clone, PartialEq)]
enum Record {
    Protocol(String),
    Corrupted(Value),
}

/// A record whose value is not a protocol string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptedRecord {
    /// Record name.
    pub name: String,
    /// The value as found, rendered as JSON.
    pub raw: String,
}

/// Named protocols backed by a JSON file.
#[derive(Debug, Clone)]
pub struct ProtocolStore {
    path: PathBuf,
    records: Vec<(String, Record)>,
}

impl ProtocolStore {
    /// Loads the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no store file, starting empty");
                return Ok(Self { path, records: Vec::new() });
            },
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let value: Value = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Malformed { path: path.clone(), reason: e.to_string() })?;

        let map = match value {
            Value::Object(map) => map,
            other => return Err(StoreError::NotAnObject { found: json_kind(&other) }),
        };

        let records: Vec<(String, Record)> = map
            .into_iter()
            .map(|(name, value)| match value {
                Value::String(protocol) => (name, Record::Protocol(protocol)),
                other => (name, Record::Corrupted(other)),
            })
            .collect();

        let store = Self { path, records };
        for record in store.corrupted() {
            tracing::warn!(name = %record.name, raw = %record.raw, "corrupted store record");
        }
        tracing::debug!(path = %store.path.display(), protocols = store.len(), "loaded store");

        Ok(store)
    }

    /// Deletes the store file, if any, and returns an empty store for `path`.
    pub fn reset(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        match fs::remove_file(&path) {
            Ok(()) => tracing::info!(path = %path.display(), "deleted store file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {},
            Err(source) => return Err(StoreError::Io { path, source }),
        }
        Ok(Self { path, records: Vec::new() })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Valid `(name, protocol)` pairs in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.records.iter().filter_map(|(name, record)| match record {
            Record::Protocol(protocol) => Some((name.as_str(), protocol.as_str())),
            Record::Corrupted(_) => None,
        })
    }

    /// Number of valid protocols.
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    /// True if there are no valid protocols.
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    /// Records whose value is not a protocol string.
    pub fn corrupted(&self) -> Vec<CorruptedRecord> {
        self.records
            .iter()
            .filter_map(|(name, record)| match record {
                Record::Corrupted(raw) => {
                    Some(CorruptedRecord { name: name.clone(), raw: raw.to_string() })
                },
                Record::Protocol(_) => None,
            })
            .collect()
    }

    /// Protocol saved under `name`.
    pub fn get(&self, name: &str) -> Result<&str, StoreError> {
        match self.record(name) {
            Some(Record::Protocol(protocol)) => Ok(protocol),
            Some(Record::Corrupted(_)) => Err(StoreError::CorruptedRecord { name: name.to_owned() }),
            None => Err(StoreError::NotFound { name: name.to_owned() }),
        }
    }

    /// Name of the valid entry at 1-based `number`, as numbered by
    /// [`entries`](Self::entries).
    pub fn name_at(&self, number: usize) -> Option<&str> {
        number.checked_sub(1).and_then(|index| self.entries().nth(index)).map(|(name, _)| name)
    }

    /// Saves `protocol` under `name`.
    ///
    /// An existing name is rejected unless `replace` is set, in which case the
    /// record keeps its position and the previous protocol is returned.
    pub fn add(
        &mut self,
        name: &str,
        protocol: &str,
        replace: bool,
    ) -> Result<Option<String>, StoreError> {
        validate(name, protocol)?;

        let mut records = self.records.clone();
        let previous = match records.iter().position(|(existing, _)| existing == name) {
            Some(_) if !replace => return Err(StoreError::DuplicateName { name: name.to_owned() }),
            Some(index) => {
                match std::mem::replace(&mut records[index].1, Record::Protocol(protocol.to_owned())) {
                    Record::Protocol(old) => Some(old),
                    Record::Corrupted(_) => None,
                }
            },
            None => {
                records.push((name.to_owned(), Record::Protocol(protocol.to_owned())));
                None
            },
        };

        self.commit(records)?;
        Ok(previous)
    }

    /// Renames `old_name` to `new_name` and sets its protocol.
    ///
    /// If `new_name` belongs to another record, that record is overwritten
    /// (and `old_name` removed) only when `replace` is set.
    pub fn edit(
        &mut self,
        old_name: &str,
        new_name: &str,
        protocol: &str,
        replace: bool,
    ) -> Result<(), StoreError> {
        validate(new_name, protocol)?;

        let mut records = self.records.clone();
        let old_position = records
            .iter()
            .position(|(name, _)| name == old_name)
            .ok_or_else(|| StoreError::NotFound { name: old_name.to_owned() })?;
        let new_position = records.iter().position(|(name, _)| name == new_name);

        match new_position {
            Some(position) if position == old_position => {
                records[position].1 = Record::Protocol(protocol.to_owned());
            },
            Some(_) if !replace => {
                return Err(StoreError::DuplicateName { name: new_name.to_owned() });
            },
            Some(position) => {
                records[position].1 = Record::Protocol(protocol.to_owned());
                records.remove(old_position);
            },
            None => {
                records[old_position] =
                    (new_name.to_owned(), Record::Protocol(protocol.to_owned()));
            },
        }

        self.commit(records)
    }

    /// Removes the named records and returns how many existed.
    pub fn remove(&mut self, names: &[&str]) -> Result<usize, StoreError> {
        let mut records = self.records.clone();
        records.retain(|(name, _)| !names.contains(&name.as_str()));

        let removed = self.records.len() - records.len();
        if removed > 0 {
            self.commit(records)?;
        }
        Ok(removed)
    }

    /// Removes every record.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.commit(Vec::new())
    }

    /// Drops corrupted records and saves. Returns how many were dropped.
    pub fn repair(&mut self) -> Result<usize, StoreError> {
        let mut records = self.records.clone();
        records.retain(|(_, record)| matches!(record, Record::Protocol(_)));

        let dropped = self.records.len() - records.len();
        if dropped > 0 {
            self.commit(records)?;
            tracing::info!(dropped, "repaired store");
        }
        Ok(dropped)
    }

    /// Rewrites the store file from memory.
    pub fn save(&self) -> Result<(), StoreError> {
        write_records(&self.path, &self.records)
    }

    fn record(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|(existing, _)| existing == name).map(|(_, record)| record)
    }

    fn commit(&mut self, records: Vec<(String, Record)>) -> Result<(), StoreError> {
        write_records(&self.path, &records)?;
        self.records = records;
        Ok(())
    }
}

impl ProtocolSource for ProtocolStore {
    fn protocol(&self, name: &str) -> Option<&str> {
        self.get(name).ok()
    }
}

/// Splits a `name/protocol` entry. The entry must contain exactly one `/`.
pub fn split_entry(entry: &str) -> Result<(&str, &str), StoreError> {
    let entry = entry.trim();
    if entry.matches('/').count() != 1 {
        return Err(StoreError::InvalidEntry { entry: entry.to_owned() });
    }

    let (name, protocol) =
        entry.split_once('/').ok_or_else(|| StoreError::InvalidEntry { entry: entry.to_owned() })?;
    validate(name, protocol)?;
    Ok((name, protocol))
}

fn validate(name: &str, protocol: &str) -> Result<(), StoreError> {
    if name.is_empty() {
        return Err(StoreError::EmptyName);
    }
    if name.contains('/') {
        return Err(StoreError::InvalidName { name: name.to_owned() });
    }
    if protocol.is_empty() {
        return Err(StoreError::EmptyProtocol);
    }
    Ok(())
}

fn write_records(path: &Path, records: &[(String, Record)]) -> Result<(), StoreError> {
    let map: Map<String, Value> = records
        .iter()
        .map(|(name, record)| {
            let value = match record {
                Record::Protocol(protocol) => Value::String(protocol.clone()),
                Record::Corrupted(raw) => raw.clone(),
            };
            (name.clone(), value)
        })
        .collect();

    let mut json = serde_json::to_string_pretty(&Value::Object(map))?;
    json.push('\n');

    let io_error = |source| StoreError::Io { path: path.to_path_buf(), source };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // dropped (and deleted) on every early return
    let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
    file.write_all(json.as_bytes()).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;

    tracing::info!(path = %path.display(), records = records.len(), "saved store");
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_entry_accepts_one_separator() {
        assert_eq!(split_entry(" D3@ф7/p37l0.7m3l*3 ").expect("valid"), ("D3@ф7", "p37l0.7m3l*3"));
    }

    #[test]
    fn split_entry_rejects_zero_or_many_separators() {
        assert!(matches!(split_entry("p3"), Err(StoreError::InvalidEntry { .. })));
        assert!(matches!(split_entry("a/b/c"), Err(StoreError::InvalidEntry { .. })));
    }

    #[test]
    fn split_entry_rejects_empty_parts() {
        assert!(matches!(split_entry("/p3"), Err(StoreError::EmptyName)));
        assert!(matches!(split_entry("name/"), Err(StoreError::EmptyProtocol)));
    }

    #[test]
    fn json_kind_names_types() {
        assert_eq!(json_kind(&Value::Array(Vec::new())), "array");
        assert_eq!(json_kind(&Value::from(3)), "number");
    }
}
