//! Fuzz target for the protocol parser and compiler
//!
//! # Strategy
//!
//! - Raw strings: arbitrary UTF-8, including multi-byte and control
//!   characters, fed straight to [`Protocol::parse`]
//! - Compile every protocol that parses, so parameter validation sees the
//!   same garbage
//!
//! # Invariants
//!
//! - NEVER panic on any input
//! - A parsed protocol has at least one instruction, each with a non-empty
//!   parameter, indexed in order
//! - `Display` output reparses to an equal protocol
//! - Compilation yields exactly one transform per instruction

#![no_main]

use ccps_core::Protocol;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|source: &str| {
    let Ok(protocol) = Protocol::parse(source) else {
        return;
    };

    assert!(!protocol.is_empty());
    for (index, instruction) in protocol.instructions().iter().enumerate() {
        assert_eq!(instruction.index(), index);
        assert!(!instruction.parameter().is_empty());
    }

    let rendered = protocol.to_string();
    assert_eq!(rendered, source);
    assert_eq!(Protocol::parse(&rendered).as_ref(), Ok(&protocol));

    if let Ok(transforms) = protocol.compile() {
        assert_eq!(transforms.len(), protocol.len());
    }
});
