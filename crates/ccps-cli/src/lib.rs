//! Command-line front end for CCPS.
//!
//! ## Architecture
//!
//! ```text
//! ccps
//!   ├─ Cli / CliConfig    (clap arguments, resolved settings)
//!   ├─ commands           (encode, decode, verify, protocols)
//!   ├─ guide              (instruction text)
//!   ├─ ccps-core Engine   (transforms over the standard alphabet)
//!   └─ ccps-store         (named protocols, opened only when needed)
//! ```
//!
//! Every command writes its report to a caller-supplied writer, so the binary
//! prints to stdout and tests capture into a buffer.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod commands;
mod error;
mod guide;

use std::{io::Write, path::PathBuf};

use ccps_store::DEFAULT_STORE_PATH;
use clap::{Args, Parser, Subcommand};
pub use error::CliError;
pub use guide::write_guide;

/// Custom Cypher Protocol System
#[derive(Parser, Debug)]
#[command(name = "ccps")]
#[command(about = "Encode and decode text with reversible CCPS protocols")]
#[command(version)]
pub struct Cli {
    /// Path to the named-protocol store
    #[arg(long, global = true, env = "CCPS_STORE", default_value = DEFAULT_STORE_PATH)]
    pub store: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Drop corrupted records from the store before running the command
    #[arg(long, global = true, conflicts_with = "reset_store")]
    pub repair_store: bool,

    /// Delete an unreadable store file and start with an empty store
    #[arg(long, global = true)]
    pub reset_store: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Encode `protocol/text` or `#name/text`, then check it decodes back
    Encode {
        /// The request
        request: String,
    },

    /// Decode `protocol/text` or `#name/text`
    Decode {
        /// The request
        request: String,
    },

    /// Encode and decode a request and report whether the protocol inverts
    Verify {
        /// The request
        request: String,
    },

    /// Print the protocol instruction guide
    Guide,

    /// Manage saved protocols
    #[command(subcommand)]
    Protocols(ProtocolsCommand),
}

/// `protocols` subcommands.
///
/// Entries are addressed by their 1-based number in `protocols list`.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolsCommand {
    /// List saved protocols
    List,

    /// Save a protocol as `name/protocol`
    Add(EntryArgs),

    /// Replace the protocol at NUMBER with `name/protocol`
    Edit {
        /// Entry number from `protocols list`
        number: usize,

        /// New entry in `name/protocol` form
        entry: String,

        /// Overwrite another protocol that already has the new name
        #[arg(long)]
        replace: bool,
    },

    /// Remove protocols by number; unknown numbers are ignored
    Remove {
        /// Entry numbers from `protocols list`
        #[arg(required = true)]
        numbers: Vec<usize>,
    },

    /// Remove every saved protocol
    Clear,
}

/// A `name/protocol` entry and its overwrite flag.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct EntryArgs {
    /// Entry in `name/protocol` form, with exactly one `/`
    pub entry: String,

    /// Overwrite an existing protocol with the same name
    #[arg(long)]
    pub replace: bool,
}

/// What to do with the store file before running a command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreRecovery {
    /// Open as-is; an unreadable file is an error.
    #[default]
    None,
    /// Drop corrupted records and save.
    Repair,
    /// Delete the file and start empty.
    Reset,
}

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Store file path.
    pub store_path: PathBuf,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Store recovery requested on the command line.
    pub recovery: StoreRecovery,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            log_level: "warn".to_string(),
            recovery: StoreRecovery::None,
        }
    }
}

impl Cli {
    /// Settings derived from the global flags.
    pub fn config(&self) -> CliConfig {
        let recovery = if self.reset_store {
            StoreRecovery::Reset
        } else if self.repair_store {
            StoreRecovery::Repair
        } else {
            StoreRecovery::None
        };

        CliConfig { store_path: self.store.clone(), log_level: self.log_level.clone(), recovery }
    }
}

/// Runs `command` with `config`, writing its report to `out`.
pub fn run(config: &CliConfig, command: &Command, out: &mut impl Write) -> Result<(), CliError> {
    tracing::debug!(?command, store = %config.store_path.display(), "running command");

    match command {
        Command::Encode { request } => commands::encode(config, request, out),
        Command::Decode { request } => commands::decode(config, request, out),
        Command::Verify { request } => commands::verify(config, request, out),
        Command::Guide => Ok(write_guide(out)?),
        Command::Protocols(command) => commands::protocols(config, command, out),
    }
}
