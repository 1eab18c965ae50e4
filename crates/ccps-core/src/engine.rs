//! Protocol executor and round-trip verifier.
//!
//! ## Execution
//!
//! 1. Compile every instruction into a [`Transform`] (parameter errors
//!    surface here, before any text is touched)
//! 2. Map the text to alphabet indices (unknown symbols surface here, before
//!    any arithmetic)
//! 3. Run the transforms in parsed order on encode, or in reverse order with
//!    inverse effect on decode
//!
//! Either the whole protocol succeeds or the caller gets an error; partial
//! output is never returned.

use crate::{
    alphabet::Alphabet,
    error::CipherError,
    protocol::Protocol,
    transform::{Direction, Transform},
};

/// Outcome of [`Engine::verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Decoding the encoded text reproduced the input.
    Consistent {
        /// Encoded text.
        encoded: String,
        /// Decoded text (equal to the input).
        decoded: String,
    },

    /// Decoding the encoded text did not reproduce the input.
    ///
    /// Points at a transform whose inverse is broken, not at the protocol
    /// author.
    Asymmetric {
        /// Encoded text.
        encoded: String,
        /// Decoded text (differs from the input).
        decoded: String,
    },

    /// The protocol could not be applied at all.
    Failed {
        /// Why encoding failed.
        error: CipherError,
    },
}

impl Verification {
    /// True only for [`Verification::Consistent`].
    pub fn is_consistent(&self) -> bool {
        matches!(self, Self::Consistent { .. })
    }

    /// Encoded text, if encoding succeeded.
    pub fn encoded(&self) -> Option<&str> {
        match self {
            Self::Consistent { encoded, .. } | Self::Asymmetric { encoded, .. } => Some(encoded),
            Self::Failed { .. } => None,
        }
    }

    /// Decoded text, if both directions ran.
    pub fn decoded(&self) -> Option<&str> {
        match self {
            Self::Consistent { decoded, .. } | Self::Asymmetric { decoded, .. } => Some(decoded),
            Self::Failed { .. } => None,
        }
    }

    /// The failure, if the protocol could not be applied.
    pub fn error(&self) -> Option<&CipherError> {
        match self {
            Self::Failed { error } => Some(error),
            Self::Consistent { .. } | Self::Asymmetric { .. } => None,
        }
    }

    /// Flattens into `(is_consistent, encoded, decoded_or_error_message)`.
    pub fn into_parts(self) -> (bool, Option<String>, String) {
        match self {
            Self::Consistent { encoded, decoded } => (true, Some(encoded), decoded),
            Self::Asymmetric { encoded, decoded } => (false, Some(encoded), decoded),
            Self::Failed { error } => (false, None, error.to_string()),
        }
    }
}

/// Applies protocols over one alphabet.
///
/// Holds no state besides the alphabet reference; every call is independent.
#[derive(Debug, Clone, Copy)]
pub struct Engine<'a> {
    alphabet: &'a Alphabet,
}

impl Engine<'static> {
    /// Engine over the standard alphabet.
    pub fn standard() -> Self {
        Self { alphabet: Alphabet::standard() }
    }
}

impl Default for Engine<'static> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> Engine<'a> {
    /// Engine over a custom alphabet.
    pub const fn new(alphabet: &'a Alphabet) -> Self {
        Self { alphabet }
    }

    /// The alphabet this engine works over.
    pub const fn alphabet(&self) -> &'a Alphabet {
        self.alphabet
    }

    /// Applies `protocol` to `text` in `direction`.
    pub fn execute(
        &self,
        protocol: &Protocol,
        text: &str,
        direction: Direction,
    ) -> Result<String, CipherError> {
        let transforms = protocol.compile()?;
        let mut indices = self.alphabet.to_indices(text)?;
        let modulus = self.alphabet.len();

        let ordered: Vec<(usize, &Transform)> = match direction {
            Direction::Encode => transforms.iter().enumerate().collect(),
            Direction::Decode => transforms.iter().enumerate().rev().collect(),
        };

        for (index, transform) in ordered {
            indices = transform.apply(&indices, modulus, direction);
            tracing::debug!(index, %transform, ?direction, "applied transform");
        }

        Ok(self.alphabet.to_text(&indices))
    }

    /// Encodes `text`.
    pub fn encode(&self, protocol: &Protocol, text: &str) -> Result<String, CipherError> {
        self.execute(protocol, text, Direction::Encode)
    }

    /// Decodes `text`.
    pub fn decode(&self, protocol: &Protocol, text: &str) -> Result<String, CipherError> {
        self.execute(protocol, text, Direction::Decode)
    }

    /// Encodes then decodes `text` and checks the result matches.
    ///
    /// Never fails; problems are reported through the returned
    /// [`Verification`].
    pub fn verify(&self, protocol: &Protocol, text: &str) -> Verification {
        let encoded = match self.encode(protocol, text) {
            Ok(encoded) => encoded,
            Err(error) => return Verification::Failed { error },
        };

        match self.decode(protocol, &encoded) {
            Ok(decoded) if decoded == text => Verification::Consistent { encoded, decoded },
            Ok(decoded) => {
                tracing::warn!(%protocol, input = text, %decoded, "protocol does not invert");
                Verification::Asymmetric { encoded, decoded }
            },
            Err(error) => Verification::Failed { error },
        }
    }

    /// Parses `protocol` and applies it in `direction`.
    pub fn execute_str(
        &self,
        protocol: &str,
        text: &str,
        direction: Direction,
    ) -> Result<String, CipherError> {
        let protocol = Protocol::parse(protocol)?;
        self.execute(&protocol, text, direction)
    }

    /// Parses `protocol` and verifies it; parse errors become
    /// [`Verification::Failed`].
    pub fn verify_str(&self, protocol: &str, text: &str) -> Verification {
        match Protocol::parse(protocol) {
            Ok(protocol) => self.verify(&protocol, text),
            Err(error) => Verification::Failed { error: error.into() },
        }
    }
}

/// Encodes `text` with `protocol` over the standard alphabet.
pub fn encode(protocol: &str, text: &str) -> Result<String, CipherError> {
    Engine::standard().execute_str(protocol, text, Direction::Encode)
}

/// Decodes `text` with `protocol` over the standard alphabet.
pub fn decode(protocol: &str, text: &str) -> Result<String, CipherError> {
    Engine::standard().execute_str(protocol, text, Direction::Decode)
}

/// Verifies `protocol` against `text` over the standard alphabet.
pub fn verify(protocol: &str, text: &str) -> Verification {
    Engine::standard().verify_str(protocol, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParameterError, ProtocolError};

    #[test]
    fn encode_then_decode_restores_text() {
        let encoded = encode("p3m2", "12345").expect("encode");
        assert_eq!(encoded, "54768");
        assert_eq!(decode("p3m2", &encoded).expect("decode"), "12345");
    }

    #[test]
    fn decode_reverses_instruction_order() {
        // decode must undo l, then p, then m
        let encoded = encode("m3p1l*5", "abcdefg").expect("encode");
        assert_eq!(decode("m3p1l*5", &encoded).expect("decode"), "abcdefg");
    }

    #[test]
    fn invalid_parameter_wins_over_unknown_symbol() {
        let err = encode("m0", "€").unwrap_err();
        assert!(matches!(
            err,
            CipherError::InvalidParameter { reason: ParameterError::NonPositiveBlockSize, .. }
        ));
    }

    #[test]
    fn mirror_rejects_unknown_symbols_too() {
        let err = encode("m2", "ab\n").unwrap_err();
        assert_eq!(err, CipherError::UnknownSymbol { symbol: '\n', position: 2 });
    }

    #[test]
    fn empty_text_is_fine() {
        assert_eq!(encode("p3w2l*5m4", "").expect("encode"), "");
    }

    #[test]
    fn custom_alphabet() {
        let alphabet = Alphabet::new("abc").expect("unique");
        let engine = Engine::new(&alphabet);
        let protocol = Protocol::parse("p1").expect("valid");
        assert_eq!(engine.encode(&protocol, "abc").expect("encode"), "bca");
        assert_eq!(engine.alphabet().len(), 3);
    }

    #[test]
    fn verify_consistent_protocol() {
        let verification = verify("l*5p2", "hello");
        assert!(verification.is_consistent());
        assert_eq!(verification.encoded(), Some("jhpps"));
        assert_eq!(verification.decoded(), Some("hello"));
        assert_eq!(verification.error(), None);
    }

    #[test]
    fn verify_reports_parse_failure() {
        let verification = verify("x1", "abc");
        assert!(!verification.is_consistent());
        assert_eq!(verification.encoded(), None);
        assert_eq!(
            verification.error(),
            Some(&CipherError::Protocol(ProtocolError::UnrecognizedCommand {
                symbol: 'x',
                position: 0
            }))
        );
    }

    #[test]
    fn verify_parts_carry_error_message() {
        let (consistent, encoded, message) = verify("p1", "a€").into_parts();
        assert!(!consistent);
        assert_eq!(encoded, None);
        assert_eq!(message, "symbol '€' at position 1 is not in the alphabet");
    }

    #[test]
    fn asymmetric_verification_is_not_consistent() {
        let verification =
            Verification::Asymmetric { encoded: "x".to_string(), decoded: "y".to_string() };
        assert!(!verification.is_consistent());
        assert_eq!(verification.into_parts(), (false, Some("x".to_string()), "y".to_string()));
    }
}
