//! Protocol mini-language.
//!
//! A protocol is a compact string of instructions, each a command letter
//! followed by a parameter:
//!
//! ```text
//! protocol      := instruction+
//! instruction   := commandLetter parameter
//! commandLetter := 'p' | 'm' | 'l' | 'w'
//! parameter     := one or more characters up to the next command letter
//! ```
//!
//! Parameters stay opaque strings at parse time. They are validated when the
//! protocol is compiled into [`Transform`]s, so `m0` parses and only fails at
//! execution.

use std::{fmt, str::FromStr};

use crate::{
    error::{CipherError, ProtocolError},
    transform::Transform,
};

/// Transform selected by a command letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `p`: constant shift.
    Shift,
    /// `m`: block mirror.
    Mirror,
    /// `l`: shift growing linearly with position.
    Linear,
    /// `w`: triangle-wave cumulative shift.
    Wave,
}

impl Command {
    /// All commands, in letter order `p`, `m`, `l`, `w`.
    pub const ALL: [Self; 4] = [Self::Shift, Self::Mirror, Self::Linear, Self::Wave];

    /// Command for a letter, if it is one of `p`, `m`, `l`, `w`.
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'p' => Some(Self::Shift),
            'm' => Some(Self::Mirror),
            'l' => Some(Self::Linear),
            'w' => Some(Self::Wave),
            _ => None,
        }
    }

    /// The command letter.
    pub const fn letter(self) -> char {
        match self {
            Self::Shift => 'p',
            Self::Mirror => 'm',
            Self::Linear => 'l',
            Self::Wave => 'w',
        }
    }

    /// Human-readable name used by [`Protocol::describe`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shift => "shift",
            Self::Mirror => "mirror",
            Self::Linear => "linear",
            Self::Wave => "wave",
        }
    }
}

/// One parsed `(command, parameter)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    index: usize,
    command: Command,
    parameter: String,
}

impl Instruction {
    /// 0-based position in the protocol.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The command.
    pub fn command(&self) -> Command {
        self.command
    }

    /// The raw, unvalidated parameter.
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// Validates the parameter and builds the typed transform.
    pub fn compile(&self) -> Result<Transform, CipherError> {
        Transform::from_parameter(self.command, &self.parameter).map_err(|reason| {
            CipherError::InvalidParameter {
                index: self.index,
                command: self.command.letter(),
                parameter: self.parameter.clone(),
                reason,
            }
        })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.command.letter(), self.parameter)
    }
}

/// Ordered, immutable instruction sequence.
///
/// Instructions apply left to right on encode and right to left, inverted, on
/// decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protocol {
    instructions: Vec<Instruction>,
}

impl Protocol {
    /// Parses a protocol string.
    pub fn parse(source: &str) -> Result<Self, ProtocolError> {
        let mut instructions = Vec::new();
        let mut chars = source.chars().enumerate().peekable();

        while let Some((position, symbol)) = chars.next() {
            let command = Command::from_letter(symbol)
                .ok_or(ProtocolError::UnrecognizedCommand { symbol, position })?;

            let mut parameter = String::new();
            while let Some((_, next)) = chars.next_if(|&(_, c)| Command::from_letter(c).is_none()) {
                parameter.push(next);
            }

            if parameter.is_empty() {
                return Err(ProtocolError::MissingParameter { command: symbol, position });
            }

            instructions.push(Instruction { index: instructions.len(), command, parameter });
        }

        if instructions.is_empty() {
            return Err(ProtocolError::Empty);
        }

        Ok(Self { instructions })
    }

    /// The instructions in parsed order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions (at least one).
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Always false for a parsed protocol.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Validates every parameter, in parsed order.
    ///
    /// Fails on the first invalid instruction, before any text is touched.
    pub fn compile(&self) -> Result<Vec<Transform>, CipherError> {
        self.instructions.iter().map(Instruction::compile).collect()
    }

    /// Readable form, e.g. `linear(*5) shift(2)`.
    pub fn describe(&self) -> String {
        self.instructions
            .iter()
            .map(|instruction| format!("{}({})", instruction.command.name(), instruction.parameter))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromStr for Protocol {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            write!(f, "{instruction}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(protocol: &Protocol) -> Vec<(Command, &str)> {
        protocol.instructions().iter().map(|i| (i.command(), i.parameter())).collect()
    }

    #[test]
    fn parses_linear_then_shift() {
        let protocol = Protocol::parse("l*5p2").expect("valid protocol");
        assert_eq!(pairs(&protocol), vec![(Command::Linear, "*5"), (Command::Shift, "2")]);
        assert_eq!(protocol.instructions()[1].index(), 1);
    }

    #[test]
    fn parameters_are_consumed_greedily() {
        let protocol = Protocol::parse("p37l0.7m3l*3").expect("valid protocol");
        assert_eq!(
            pairs(&protocol),
            vec![
                (Command::Shift, "37"),
                (Command::Linear, "0.7"),
                (Command::Mirror, "3"),
                (Command::Linear, "*3"),
            ]
        );
    }

    #[test]
    fn parameters_are_opaque_at_parse_time() {
        let protocol = Protocol::parse("m0l##w-x").expect("syntax is valid");
        assert_eq!(protocol.len(), 3);
    }

    #[test]
    fn rejects_leading_non_command() {
        assert_eq!(
            Protocol::parse("3p"),
            Err(ProtocolError::UnrecognizedCommand { symbol: '3', position: 0 })
        );
        assert_eq!(
            Protocol::parse("P3"),
            Err(ProtocolError::UnrecognizedCommand { symbol: 'P', position: 0 })
        );
    }

    #[test]
    fn rejects_command_followed_by_command() {
        assert_eq!(
            Protocol::parse("p3mw2"),
            Err(ProtocolError::MissingParameter { command: 'm', position: 2 })
        );
    }

    #[test]
    fn rejects_trailing_command() {
        assert_eq!(
            Protocol::parse("p3l"),
            Err(ProtocolError::MissingParameter { command: 'l', position: 2 })
        );
    }

    #[test]
    fn rejects_empty_protocol() {
        assert_eq!(Protocol::parse(""), Err(ProtocolError::Empty));
    }

    #[test]
    fn display_reproduces_source() {
        let source = "w3p-2l-*5m4";
        let protocol: Protocol = source.parse().expect("valid protocol");
        assert_eq!(protocol.to_string(), source);
    }

    #[test]
    fn describe_names_each_instruction() {
        let protocol = Protocol::parse("p3m2l*5w-2").expect("valid protocol");
        insta::assert_snapshot!(protocol.describe(), @"shift(3) mirror(2) linear(*5) wave(-2)");
    }

    #[test]
    fn compile_reports_offending_instruction() {
        let protocol = Protocol::parse("p1m0").expect("valid syntax");
        let err = protocol.compile().unwrap_err();
        assert!(matches!(err, CipherError::InvalidParameter { index: 1, command: 'm', .. }));
    }

    #[test]
    fn command_letters_round_trip() {
        for command in Command::ALL {
            assert_eq!(Command::from_letter(command.letter()), Some(command));
        }
        assert_eq!(Command::from_letter('x'), None);
    }
}
