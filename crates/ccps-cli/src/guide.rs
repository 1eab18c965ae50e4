//! Instruction guide printed by `ccps guide`.

use std::io::{self, Write};

use ccps_core::Command;

const RULE: &str = "-----------------------------------";
const BANNER: &str = "===================================";

const EXAMPLES: [&str; 4] = ["p3m2/12345", "l*5p2/hello", "w3p2/Привет", "m5w-2/Тест"];

fn usage(command: Command) -> [&'static str; 2] {
    match command {
        Command::Shift => {
            ["shift by N symbols along the alphabet", "N: integer, may be negative"]
        },
        Command::Mirror => ["reverse every block of N symbols", "N: positive integer"],
        Command::Linear => [
            "shift by an offset growing linearly with position",
            "K: integer or decimal (*5 means 0.5, -*5 means -0.5)",
        ],
        Command::Wave => [
            "shift by an offset rising and falling between -A and A",
            "A: integer, positive or negative",
        ],
    }
}

fn parameter_name(command: Command) -> char {
    match command {
        Command::Shift | Command::Mirror => 'N',
        Command::Linear => 'K',
        Command::Wave => 'A',
    }
}

fn section(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "{title}")?;
    writeln!(out, "{RULE}")
}

/// Writes the guide to `out`.
pub fn write_guide(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{BANNER}")?;
    writeln!(out, "WORKING WITH PROTOCOLS")?;
    writeln!(out, "{BANNER}")?;
    writeln!(out)?;
    writeln!(out, "A protocol is the key used to encode and decode messages.")?;
    writeln!(out, "It chains the functions listed below.")?;

    section(out, "PROTOCOL FORMAT:")?;
    writeln!(out, "  [function1][parameter][function2][parameter]... / text")?;
    writeln!(out)?;
    writeln!(out, "  Parameters follow their function letter with no spaces.")?;
    writeln!(out, "  Functions are applied left to right when encoding and")?;
    writeln!(out, "  right to left when decoding.")?;

    section(out, "FUNCTIONS:")?;
    for command in Command::ALL {
        let [summary, parameter] = usage(command);
        let head = format!("{}{}", command.letter(), parameter_name(command));
        writeln!(out, "  {head:<4} {summary}")?;
        writeln!(out, "       {parameter}")?;
    }

    section(out, "EXAMPLES:")?;
    for example in EXAMPLES {
        writeln!(out, "  {example}")?;
    }

    section(out, "SAVED PROTOCOLS:")?;
    writeln!(out, "  #name/text  apply the protocol saved as \"name\"")?;
    writeln!(out, "  Example: #base32/Привет")?;
    writeln!(out)?;
    writeln!(out, "  Save one with: ccps protocols add base32/p3m2")?;
    writeln!(out, "{BANNER}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guide_lists_every_function() {
        let mut out = Vec::new();
        write_guide(&mut out).expect("write to vec");
        let guide = String::from_utf8(out).expect("utf-8");

        for line in ["  pN   shift", "  mN   reverse", "  lK   shift", "  wA   shift"] {
            assert!(guide.contains(line), "missing {line:?}");
        }
    }

    #[test]
    fn guide_examples_are_valid_requests() {
        for example in EXAMPLES {
            let (protocol, text) = example.split_once('/').expect("example has a separator");
            assert!(ccps_core::verify(protocol, text).is_consistent(), "{example}");
        }
    }
}
