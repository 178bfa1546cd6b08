//! MTProto 2.0 session state and message framing.
//!
//! This crate handles:
//! * Message-ID and sequence-number allocation ([`SessionClock`])
//! * Plaintext framing for unauthenticated traffic ([`Message`])
//! * The encrypted envelope for everything after key setup
//!   ([`EncryptedSession`])
//!
//! It is intentionally transport-agnostic: bring your own TCP/WebSocket.
//! The client crate wires these pieces to an actual connection.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod encrypted;
pub mod message;

pub use clock::SessionClock;
pub use encrypted::{DecryptedMessage, EncryptedSession};
pub use message::{Message, PlainError};

// Sessions are keyed by an [`AuthKey`]; re-exported so callers do not need
// a direct courier-crypto dependency just to build one.
pub use courier_crypto::{AuthKey, InvalidKeyLength};
