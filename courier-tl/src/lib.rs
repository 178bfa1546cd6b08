//! TL binary codec and the MTProto service schema.
//!
//! This crate is deliberately small: it covers the TL *primitives* (ints,
//! longs, 128/256-bit nonces, doubles, bools, byte strings, vectors) and the
//! handful of hand-written service constructors the transport layer itself
//! speaks (`ping`, `pong`, `msgs_ack`, `msg_container`, `rpc_result`, …).
//! It does **not** ship a generated API schema; higher layers bring their
//! own types and implement the traits below for them.
//!
//! # Overview
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`serialize`]   | [`Serializable`] and the primitive encoders           |
//! | [`deserialize`] | [`Deserializable`], [`Cursor`] and primitive decoders |
//! | [`service`]     | MTProto service constructors with their wire IDs      |
//!
//! # Example
//!
//! ```rust
//! use courier_tl::{Serializable, Deserializable, service::Ping};
//!
//! let bytes = Ping { ping_id: 7 }.to_bytes();
//! assert_eq!(&bytes[..4], &0x7abe77ec_u32.to_le_bytes());
//! let back = Ping::from_bytes(&bytes).unwrap();
//! assert_eq!(back.ping_id, 7);
//! ```

#![deny(unsafe_code)]

pub mod deserialize;
pub mod serialize;
pub mod service;

pub use deserialize::{Cursor, Deserializable};
pub use serialize::Serializable;

/// Bare `vector` (lowercase) — a count followed by items, without the boxed
/// `Vector` constructor ID `0x1cb5c415` in front.
#[derive(Clone, Debug, PartialEq)]
pub struct RawVec<T>(pub Vec<T>);

// ─── Core traits ──────────────────────────────────────────────────────────────

/// Every schema type has a unique 32-bit constructor ID.
pub trait Identifiable {
    /// The constructor ID as specified in the TL schema.
    const CONSTRUCTOR_ID: u32;
}

/// Marks a function type that can be invoked over the transport.
///
/// `Return` is the type the peer answers with.
pub trait RemoteCall: Serializable {
    /// The deserialized response type.
    type Return: Deserializable;
}

/// Whether a message carrying this type expects an acknowledgment.
///
/// Content-related messages are assigned odd sequence numbers and are acked
/// by the peer; housekeeping traffic (acks, pings, containers, `http_wait`)
/// is even-numbered and flows without acknowledgment. The default is
/// content-related; the service module overrides it for the housekeeping
/// constructors.
pub trait ContentClass {
    /// `true` when the peer is expected to acknowledge the message.
    const CONTENT_RELATED: bool = true;
}
