//! Command implementations.
//!
//! The store is opened only by commands that need it: `#name/text` requests
//! and the `protocols` family. Literal requests never touch the store file.

use std::io::Write;

use ccps_core::{
    CipherError, Direction, Engine, NoProtocols, Protocol, Request, RequestError, Verification,
};
use ccps_store::{ProtocolStore, StoreError, split_entry};

use crate::{CliConfig, CliError, ProtocolsCommand, StoreRecovery};

/// Opens the configured store, applying the requested recovery.
pub(crate) fn open_store(config: &CliConfig) -> Result<ProtocolStore, CliError> {
    if config.recovery == StoreRecovery::Reset {
        return Ok(ProtocolStore::reset(&config.store_path)?);
    }

    let mut store = ProtocolStore::open(&config.store_path).map_err(|e| {
        if e.is_unreadable() { CliError::UnreadableStore { source: e } } else { CliError::Store(e) }
    })?;

    if config.recovery == StoreRecovery::Repair {
        store.repair()?;
    }
    Ok(store)
}

fn parse_request(config: &CliConfig, input: &str) -> Result<Request, CliError> {
    if !input.trim_start().starts_with('#') {
        return Ok(Request::parse(input, &NoProtocols)?);
    }

    let store = open_store(config)?;
    Request::parse(input, &store).map_err(|e| match e {
        // a corrupted record is "not found" to the engine; name the real cause
        RequestError::UnknownProtocol { name } => match store.get(&name) {
            Err(err @ StoreError::CorruptedRecord { .. }) => CliError::Store(err),
            _ => CliError::Request(RequestError::UnknownProtocol { name }),
        },
        other => CliError::Request(other),
    })
}

fn write_result(out: &mut impl Write, request: &Request, result: &str) -> Result<(), CliError> {
    match request.name() {
        Some(name) => {
            writeln!(out, "Protocol: {} ({name})", request.protocol())?;
            writeln!(out, "Result: {result}")?;
        },
        None => writeln!(out, "{}/{result}", request.protocol())?,
    }
    Ok(())
}

/// `encode`: prints the result, then decodes it again as a check.
pub(crate) fn encode(
    config: &CliConfig,
    input: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let request = parse_request(config, input)?;
    let engine = Engine::standard();
    let protocol = Protocol::parse(request.protocol()).map_err(CipherError::from)?;

    let encoded = engine.encode(&protocol, request.text())?;
    write_result(out, &request, &encoded)?;

    let decoded = engine.decode(&protocol, &encoded)?;
    writeln!(out)?;
    if decoded == request.text() {
        writeln!(out, "no errors detected")?;
    } else {
        tracing::warn!(protocol = request.protocol(), %decoded, "encode check failed");
        writeln!(out, "WARNING: decoding the result does not give the input back")?;
        writeln!(out, "check the protocol with `ccps verify`")?;
    }
    Ok(())
}

/// `decode`: prints the decoded result.
pub(crate) fn decode(
    config: &CliConfig,
    input: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let request = parse_request(config, input)?;
    let decoded =
        Engine::standard().execute_str(request.protocol(), request.text(), Direction::Decode)?;
    write_result(out, &request, &decoded)
}

/// `verify`: prints the round-trip report; fails unless the protocol is
/// consistent.
pub(crate) fn verify(
    config: &CliConfig,
    input: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let request = parse_request(config, input)?;
    let failed = || CliError::VerificationFailed { protocol: request.protocol().to_owned() };

    let protocol = match Protocol::parse(request.protocol()) {
        Ok(protocol) => protocol,
        Err(error) => {
            writeln!(out, "{}/{error}", request.protocol())?;
            writeln!(out, "ERROR: invalid protocol")?;
            return Err(failed());
        },
    };

    let verification = Engine::standard().verify(&protocol, request.text());
    let (encoded, decoded) = match &verification {
        Verification::Failed { error } => {
            writeln!(out, "{}/{error}", request.protocol())?;
            writeln!(out, "ERROR: invalid protocol")?;
            return Err(failed());
        },
        Verification::Consistent { encoded, decoded }
        | Verification::Asymmetric { encoded, decoded } => (encoded, decoded),
    };

    writeln!(out, "protocol: {}", protocol.describe())?;
    writeln!(out, "input: {}", request.text())?;
    writeln!(out, "output: {encoded}")?;
    writeln!(out, "decoded: {decoded}")?;

    if verification.is_consistent() {
        writeln!(out, "OK: protocol is consistent")?;
        Ok(())
    } else {
        writeln!(out, "ERROR: protocol is asymmetric")?;
        Err(failed())
    }
}

/// `protocols ...`: store management.
pub(crate) fn protocols(
    config: &CliConfig,
    command: &ProtocolsCommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut store = open_store(config)?;

    match command {
        ProtocolsCommand::List => list(&store, out),
        ProtocolsCommand::Add(args) => {
            let (name, protocol) = split_entry(&args.entry)?;
            match store.add(name, protocol, args.replace)? {
                Some(previous) => writeln!(out, "replaced \"{name}\" (was {previous})")?,
                None => writeln!(out, "saved as \"{name}\"")?,
            }
            Ok(())
        },
        ProtocolsCommand::Edit { number, entry, replace } => {
            let old_name = entry_name(&store, *number)?;
            let (name, protocol) = split_entry(entry)?;
            store.edit(&old_name, name, protocol, *replace)?;
            writeln!(out, "protocol {number} changed to {name}/{protocol}")?;
            Ok(())
        },
        ProtocolsCommand::Remove { numbers } => {
            let mut numbers = numbers.clone();
            numbers.sort_unstable();
            numbers.dedup();

            let targets: Vec<(String, String)> = numbers
                .iter()
                .filter_map(|&number| store.name_at(number))
                .filter_map(|name| store.get(name).ok().map(|p| (name.to_owned(), p.to_owned())))
                .collect();

            if targets.is_empty() {
                writeln!(out, "nothing to remove")?;
                return Ok(());
            }

            let names: Vec<&str> = targets.iter().map(|(name, _)| name.as_str()).collect();
            let removed = store.remove(&names)?;
            let shown: Vec<String> = targets.iter().map(|(n, p)| format!("{n}/{p}")).collect();
            writeln!(out, "removed {removed}: {}", shown.join("; "))?;
            Ok(())
        },
        ProtocolsCommand::Clear => {
            let count = store.len();
            store.clear()?;
            writeln!(out, "removed all {count} protocols")?;
            Ok(())
        },
    }
}

fn list(store: &ProtocolStore, out: &mut impl Write) -> Result<(), CliError> {
    if store.is_empty() {
        writeln!(out, "no saved protocols")?;
    } else {
        for (number, (name, protocol)) in store.entries().enumerate() {
            writeln!(out, "{}. {name}/{protocol}", number + 1)?;
        }
    }

    let corrupted = store.corrupted();
    if !corrupted.is_empty() {
        writeln!(out)?;
        writeln!(out, "corrupted records (run with --repair-store to drop them):")?;
        for record in corrupted {
            writeln!(out, "  {}: {}", record.name, record.raw)?;
        }
    }
    Ok(())
}

fn entry_name(store: &ProtocolStore, number: usize) -> Result<String, CliError> {
    store
        .name_at(number)
        .map(str::to_owned)
        .ok_or(CliError::NoSuchEntry { number, count: store.len() })
}
