//! Fuzz target for the encode/decode round trip
//!
//! # Strategy
//!
//! - Structured protocols: arbitrary instruction lists with extreme
//!   parameters (`i64::MIN`, huge block sizes, tiny and huge coefficients)
//! - Text drawn from the standard alphabet by index, so encoding never stops
//!   at an unknown symbol
//!
//! # Invariants
//!
//! - decode(encode(text)) == text for every protocol that compiles
//! - Output has the same number of symbols as the input
//! - Output only contains alphabet symbols
//! - `verify` agrees with the manual round trip

#![no_main]

use arbitrary::Arbitrary;
use ccps_core::{Alphabet, Engine, Protocol};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum FuzzInstruction {
    Shift(i64),
    Mirror(u16),
    LinearDecimal { whole: i32, fraction: u16 },
    LinearShorthand { negative: bool, digits: u32 },
    Wave(i64),
}

impl FuzzInstruction {
    fn render(&self) -> String {
        match self {
            Self::Shift(amount) => format!("p{amount}"),
            Self::Mirror(block) => format!("m{block}"),
            Self::LinearDecimal { whole, fraction } => format!("l{whole}.{fraction}"),
            Self::LinearShorthand { negative, digits } => {
                format!("l{}*{digits}", if *negative { "-" } else { "" })
            },
            // keep wave periods small enough to finish
            Self::Wave(height) => format!("w{}", height % 64),
        }
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    instructions: Vec<FuzzInstruction>,
    text: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let source: String = input.instructions.iter().map(FuzzInstruction::render).collect();
    let Ok(protocol) = Protocol::parse(&source) else {
        return;
    };

    let alphabet = Alphabet::standard();
    let text: String = input.text.iter().map(|&b| alphabet.symbol_at(usize::from(b))).collect();

    let engine = Engine::standard();
    let Ok(encoded) = engine.encode(&protocol, &text) else {
        // only parameter errors are possible here
        return;
    };

    assert_eq!(encoded.chars().count(), text.chars().count());
    assert!(encoded.chars().all(|c| alphabet.contains(c)));

    let decoded = engine.decode(&protocol, &encoded).expect("encoded text decodes");
    assert_eq!(decoded, text);
    assert!(engine.verify(&protocol, &text).is_consistent());
});
