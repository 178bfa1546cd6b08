//! Error types for courier-client.

use std::{fmt, io};

use courier_mtproto::encrypted::DecryptError;

// ─── RpcError ─────────────────────────────────────────────────────────────────

/// An application-level error the peer sent back in place of a result.
///
/// Numeric suffixes are stripped from the name and placed in [`RpcError::value`].
///
/// # Example
/// `FLOOD_WAIT_30` → `RpcError { code: 420, name: "FLOOD_WAIT", value: Some(30) }`
#[derive(Clone, Debug, PartialEq)]
pub struct RpcError {
    /// HTTP-like status code.
    pub code: i32,
    /// Error name in SCREAMING_SNAKE_CASE with digits removed.
    pub name: String,
    /// Numeric suffix extracted from the name, if any.
    pub value: Option<u32>,
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RPC {}: {}", self.code, self.name)?;
        if let Some(v) = self.value {
            write!(f, " (value: {v})")?;
        }
        Ok(())
    }
}

impl std::error::Error for RpcError {}

impl RpcError {
    /// Parse a raw error message like `"FLOOD_WAIT_30"` into an `RpcError`.
    pub fn from_raw(code: i32, message: &str) -> Self {
        if let Some((name, suffix)) = message.rsplit_once('_') {
            if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(value) = suffix.parse() {
                    return Self { code, name: name.to_string(), value: Some(value) };
                }
            }
        }
        Self { code, name: message.to_string(), value: None }
    }

    /// Match on the error name, with optional wildcard prefix/suffix `'*'`.
    ///
    /// # Examples
    /// - `err.is("FLOOD_WAIT")` — exact match
    /// - `err.is("PHONE_CODE_*")` — starts-with match
    /// - `err.is("*_INVALID")` — ends-with match
    pub fn is(&self, pattern: &str) -> bool {
        if let Some(prefix) = pattern.strip_suffix('*') {
            self.name.starts_with(prefix)
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            self.name.ends_with(suffix)
        } else {
            self.name == pattern
        }
    }

    /// Returns the flood-wait duration in seconds, if this is a FLOOD_WAIT error.
    pub fn flood_wait_seconds(&self) -> Option<u64> {
        if self.code == 420 && self.name == "FLOOD_WAIT" {
            self.value.map(|v| v as u64)
        } else {
            None
        }
    }
}

// ─── InvocationError ──────────────────────────────────────────────────────────

/// The error type returned from any [`Client`](crate::Client) method that
/// talks to the peer.
///
/// Nothing here triggers an automatic retry: recovery policy belongs to the
/// caller, which can inspect the variant (and [`RpcError`] helpers) to decide.
#[derive(Debug)]
pub enum InvocationError {
    /// The peer rejected the request.
    Rpc(RpcError),
    /// The peer answered with a bare 4-byte error code instead of a frame.
    Transport {
        /// The little-endian signed code carried by the frame.
        code: i32,
    },
    /// Envelope validation failed; the connection has already been dropped.
    Corrupted(DecryptError),
    /// A frame or reply would not deserialize.
    Deserialize(String),
    /// Network / I/O failure.
    Io(io::Error),
    /// No connection is attached.
    NotConnected,
    /// The peer did not answer within the configured receive timeout.
    Timeout,
}

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rpc(e)             => write!(f, "{e}"),
            Self::Transport { code } => write!(f, "transport error {code}"),
            Self::Corrupted(e)       => write!(f, "corrupted frame: {e}"),
            Self::Deserialize(s)     => write!(f, "deserialize error: {s}"),
            Self::Io(e)              => write!(f, "I/O error: {e}"),
            Self::NotConnected       => write!(f, "no connection attached"),
            Self::Timeout            => write!(f, "receive timed out"),
        }
    }
}

impl std::error::Error for InvocationError {}

impl From<io::Error> for InvocationError {
    fn from(e: io::Error) -> Self { Self::Io(e) }
}

impl From<courier_tl::deserialize::Error> for InvocationError {
    fn from(e: courier_tl::deserialize::Error) -> Self { Self::Deserialize(e.to_string()) }
}

impl InvocationError {
    /// Returns `true` if this is the named RPC error (supports `'*'` wildcards).
    pub fn is(&self, pattern: &str) -> bool {
        match self {
            Self::Rpc(e) => e.is(pattern),
            _            => false,
        }
    }

    /// If this is a FLOOD_WAIT error, returns how many seconds to wait.
    pub fn flood_wait_seconds(&self) -> Option<u64> {
        match self {
            Self::Rpc(e) => e.flood_wait_seconds(),
            _            => None,
        }
    }
}
