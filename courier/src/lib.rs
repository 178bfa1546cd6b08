//! # courier — MTProto 2.0 transport core
//!
//! `courier` is a modular implementation of the MTProto 2.0 client transport:
//! four focused sub-crates wired together here for convenience.
//!
//! | Sub-crate         | Role                                              |
//! |-------------------|---------------------------------------------------|
//! | `courier-tl`      | TL primitive codec and the service schema         |
//! | `courier-crypto`  | AES-IGE, key derivation, the sealed envelope      |
//! | `courier-mtproto` | Session clock, plaintext and encrypted framing    |
//! | `courier-client`  | Single-flight request client over your connection |
//!
//! ## Quick start
//!
//! ```rust
//! use courier::mtproto::{Message, SessionClock};
//! use courier::tl::{service::Ping, Serializable};
//!
//! // Serialize a raw TL request.
//! let bytes = Ping { ping_id: 1 }.to_bytes();
//!
//! // Frame it for the wire (plaintext, pre-handshake).
//! let mut clock = SessionClock::new();
//! let msg = Message { msg_id: clock.next_msg_id(), body: bytes };
//! let wire = msg.to_plaintext_bytes();
//! assert_eq!(&wire[..8], &[0u8; 8]);
//! ```
//!
//! Once an auth key is established, [`EncryptedSession`] seals requests into
//! the encrypted envelope, and [`Client`] drives the whole request/response
//! cycle over any [`Connection`] you supply.

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Re-export of [`courier_tl`] — TL primitives, traits and service types.
pub use courier_tl as tl;

/// Re-export of [`courier_crypto`] — AES-IGE, SHA helpers, `AuthKey`, envelope.
pub use courier_crypto as crypto;

/// Re-export of [`courier_mtproto`] — session clock, plaintext and encrypted framing.
pub use courier_mtproto as mtproto;

/// Re-export of [`courier_client`] — the async single-flight client.
pub use courier_client as client;

// ─── Convenience re-exports ───────────────────────────────────────────────────

pub use courier_client::{Client, Config, Connection, InvocationError, RpcError};
pub use courier_crypto::AuthKey;
pub use courier_mtproto::{EncryptedSession, Message, SessionClock};
pub use courier_tl::{ContentClass, Deserializable, Identifiable, RemoteCall, Serializable};
