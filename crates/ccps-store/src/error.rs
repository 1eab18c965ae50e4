//! Store error types.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors from loading, editing or saving the protocol store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the store file failed.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        /// The store file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The store file is not valid JSON.
    #[error("{} is not valid JSON: {reason}", .path.display())]
    Malformed {
        /// The store file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The store file is JSON but not an object.
    #[error("store must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON type found at the top level.
        found: &'static str,
    },

    /// Serializing the store failed.
    #[error("failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A protocol with this name already exists.
    #[error("protocol \"{name}\" already exists")]
    DuplicateName {
        /// The conflicting name.
        name: String,
    },

    /// No protocol with this name.
    #[error("protocol \"{name}\" not found")]
    NotFound {
        /// The requested name.
        name: String,
    },

    /// The record exists but its value is not a protocol string.
    #[error("protocol \"{name}\" is corrupted in the store file")]
    CorruptedRecord {
        /// The corrupted record's name.
        name: String,
    },

    /// Names cannot be empty.
    #[error("name cannot be empty")]
    EmptyName,

    /// Protocols cannot be empty.
    #[error("protocol cannot be empty")]
    EmptyProtocol,

    /// Names cannot contain the `/` separator.
    #[error("name \"{name}\" cannot contain '/'")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// A `name/protocol` entry without exactly one `/`.
    #[error("expected exactly one '/' in \"{entry}\" (example: D3@ф7/p37l0.7m3l*3)")]
    InvalidEntry {
        /// The rejected entry.
        entry: String,
    },
}

impl StoreError {
    /// Returns true if the store file itself cannot be read as a protocol
    /// map.
    ///
    /// Such a file has to be reset before the store is usable again.
    pub fn is_unreadable(&self) -> bool {
        match self {
            Self::Malformed { .. } | Self::NotAnObject { .. } => true,

            Self::Io { .. }
            | Self::Serialize(_)
            | Self::DuplicateName { .. }
            | Self::NotFound { .. }
            | Self::CorruptedRecord { .. }
            | Self::EmptyName
            | Self::EmptyProtocol
            | Self::InvalidName { .. }
            | Self::InvalidEntry { .. } => false,
        }
    }
}
