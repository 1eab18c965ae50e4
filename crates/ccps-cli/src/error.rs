//! CLI error types.

use std::io;

use ccps_core::{CipherError, RequestError};
use ccps_store::StoreError;
use thiserror::Error;

/// Errors that end a `ccps` invocation with a non-zero exit status.
#[derive(Debug, Error)]
pub enum CliError {
    /// The request is not `protocol/text` or `#name/text`.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The protocol could not be applied.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// Store lookup, edit or save failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The store file cannot be read at all.
    #[error("{source} (rerun with --reset-store to delete it and start empty)")]
    UnreadableStore {
        /// Why loading failed.
        #[source]
        source: StoreError,
    },

    /// A protocol number outside the listed range.
    #[error("no protocol number {number} (the store lists {count})")]
    NoSuchEntry {
        /// The requested 1-based number.
        number: usize,
        /// How many protocols are listed.
        count: usize,
    },

    /// `verify` found the protocol invalid or asymmetric.
    #[error("protocol \"{protocol}\" failed verification")]
    VerificationFailed {
        /// The verified protocol string.
        protocol: String,
    },

    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn unreadable_store_suggests_reset() {
        let err = CliError::UnreadableStore {
            source: StoreError::NotAnObject { found: "array" },
        };
        assert_eq!(
            err.to_string(),
            "store must be a JSON object, found array (rerun with --reset-store to delete it and \
             start empty)"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn wrapped_errors_are_transparent() {
        let err = CliError::from(StoreError::Malformed {
            path: PathBuf::from("p.json"),
            reason: "eof".to_string(),
        });
        assert_eq!(err.to_string(), "p.json is not valid JSON: eof");
    }
}
