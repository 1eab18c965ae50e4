//! Error types for alphabets, protocol parsing and protocol execution.
//!
//! Every error is local to one call: a failed encode or decode never returns
//! partially transformed text.

use thiserror::Error;

/// Errors building a custom [`Alphabet`](crate::Alphabet).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlphabetError {
    /// The symbol list was empty.
    #[error("alphabet must contain at least one symbol")]
    Empty,

    /// A symbol appears more than once.
    #[error("symbol {symbol:?} appears at index {first} and again at index {second}")]
    DuplicateSymbol {
        /// The repeated symbol.
        symbol: char,
        /// Index of the first occurrence.
        first: usize,
        /// Index of the repeat.
        second: usize,
    },
}

/// Malformed protocol strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A character other than `p`, `m`, `l` or `w` sits where a command letter
    /// is expected.
    #[error("unrecognized command {symbol:?} at position {position}")]
    UnrecognizedCommand {
        /// The offending character.
        symbol: char,
        /// Character offset in the protocol string.
        position: usize,
    },

    /// A command letter is followed by another command letter or the end of
    /// the protocol.
    #[error("command '{command}' at position {position} has no parameter")]
    MissingParameter {
        /// The command letter.
        command: char,
        /// Character offset of the command letter.
        position: usize,
    },

    /// The protocol string contains no instructions.
    #[error("protocol is empty")]
    Empty,
}

/// Why an instruction parameter was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    /// Expected an integer with an optional leading `-`.
    #[error("expected an integer")]
    NotAnInteger,

    /// The integer does not fit in 64 bits.
    #[error("integer does not fit in 64 bits")]
    OutOfRange,

    /// Mirror block sizes must be at least 1.
    #[error("block size must be positive")]
    NonPositiveBlockSize,

    /// Expected a real number (`*` shorthand allowed).
    #[error("expected a number")]
    NotANumber,

    /// Infinite and NaN coefficients have no integer shift.
    #[error("coefficient must be finite")]
    NonFinite,
}

/// Errors from encoding or decoding text with a protocol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// The text contains a character outside the alphabet.
    #[error("symbol {symbol:?} at position {position} is not in the alphabet")]
    UnknownSymbol {
        /// The offending character.
        symbol: char,
        /// Character offset in the input text.
        position: usize,
    },

    /// An instruction's parameter failed validation.
    #[error("instruction {index} ({command}{parameter}): {reason}")]
    InvalidParameter {
        /// 0-based position of the instruction in the protocol.
        index: usize,
        /// The instruction's command letter.
        command: char,
        /// The raw parameter string.
        parameter: String,
        /// What was wrong with it.
        reason: ParameterError,
    },

    /// The protocol string could not be parsed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl CipherError {
    /// Returns the character that is missing from the alphabet, if that is
    /// what went wrong.
    pub fn unknown_symbol(&self) -> Option<char> {
        match self {
            Self::UnknownSymbol { symbol, .. } => Some(*symbol),
            Self::InvalidParameter { .. } | Self::Protocol(_) => None,
        }
    }
}

/// Errors splitting a user request into protocol and text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The request has no `/` between protocol (or name) and text.
    #[error("missing '/': use the form {form}")]
    MissingSeparator {
        /// The expected request form.
        form: &'static str,
    },

    /// A `#name/text` request names a protocol that is not saved.
    #[error("protocol \"{name}\" not found")]
    UnknownProtocol {
        /// The requested name.
        name: String,
    },
}
