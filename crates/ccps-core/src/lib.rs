//! CCPS transform engine
//!
//! Reversible, composable symbol-substitution over a fixed alphabet. A
//! protocol string such as `l*5p2` describes a sequence of transforms; encoding
//! applies them left to right and decoding undoes them right to left.
//!
//! ## Architecture
//!
//! ```text
//! protocol string ──► Protocol::parse ──► [Instruction]
//!                                             │ compile
//!                                             ▼
//! text ──► Alphabet::to_indices ──► [Transform] applied per Direction
//!                                             │
//!                                             ▼
//!                                Alphabet::to_text ──► output
//! ```
//!
//! - [`Alphabet`]: fixed symbol set and index mapping
//! - [`Transform`]: shift, mirror, linear, wave
//! - [`Protocol`]: parsed instruction sequence
//! - [`Engine`]: executor and round-trip verifier
//! - [`Request`]: `protocol/text` and `#name/text` inputs
//!
//! This is not a secure cipher; reversibility is the goal.
//!
//! ```
//! let encoded = ccps_core::encode("p3", "123")?;
//! assert_eq!(encoded, "456");
//! assert_eq!(ccps_core::decode("p3", &encoded)?, "123");
//! # Ok::<(), ccps_core::CipherError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod alphabet;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod request;
pub mod transform;

pub use alphabet::{Alphabet, STANDARD_ALPHABET_VERSION, STANDARD_SYMBOLS};
pub use engine::{Engine, Verification, decode, encode, verify};
pub use error::{AlphabetError, CipherError, ParameterError, ProtocolError, RequestError};
pub use protocol::{Command, Instruction, Protocol};
pub use request::{NoProtocols, ProtocolSource, Request};
pub use transform::{Direction, Transform};
