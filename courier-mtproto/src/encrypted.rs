//! Encrypted MTProto 2.0 session (post auth-key).
//!
//! Construct an [`EncryptedSession`] once the auth key is in hand and use
//! it to seal every outgoing request and open every incoming frame.

use courier_crypto::{AuthKey, DequeBuffer, Side, decrypt_data_v2, encrypt_data_v2};
use courier_tl::{ContentClass, Serializable};

use crate::clock::SessionClock;

/// Errors that can occur when decrypting a server frame.
#[derive(Debug)]
pub enum DecryptError {
    /// The underlying crypto layer rejected the message.
    Crypto(courier_crypto::DecryptError),
    /// The decrypted inner message was too short to contain a valid header.
    FrameTooShort,
    /// Session-ID mismatch (possible replay or wrong connection).
    SessionMismatch,
    /// The inner length field overruns the decrypted plaintext.
    BadLength,
}

impl std::fmt::Display for DecryptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Crypto(e) => write!(f, "crypto: {e}"),
            Self::FrameTooShort => write!(f, "inner plaintext too short"),
            Self::SessionMismatch => write!(f, "session_id mismatch"),
            Self::BadLength => write!(f, "inner length field overruns plaintext"),
        }
    }
}

impl std::error::Error for DecryptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Crypto(e) => Some(e),
            _ => None,
        }
    }
}

/// The inner payload extracted from a successfully decrypted server frame.
#[derive(Clone, Debug)]
pub struct DecryptedMessage {
    /// `salt` sent by the server; non-zero values should be adopted.
    pub salt: i64,
    /// The `session_id` echoed in the frame.
    pub session_id: i64,
    /// The `msg_id` of the inner message.
    pub msg_id: i64,
    /// `seq_no` of the inner message.
    pub seq_no: i32,
    /// TL-serialized body of the inner message.
    pub body: Vec<u8>,
}

/// MTProto 2.0 encrypted session state.
///
/// Owns the [`AuthKey`], the random per-connection session ID, the current
/// server salt, and the [`SessionClock`] that allocates message IDs and
/// sequence numbers. [`pack`](Self::pack) seals outgoing requests,
/// [`unpack`](Self::unpack) opens incoming frames.
pub struct EncryptedSession {
    auth_key: AuthKey,
    session_id: i64,
    clock: SessionClock,
    /// Current server salt to include in outgoing messages.
    pub salt: i64,
}

impl EncryptedSession {
    /// Create a session with a freshly drawn random session ID.
    pub fn new(auth_key: AuthKey, first_salt: i64) -> Self {
        let mut rnd = [0u8; 8];
        getrandom::getrandom(&mut rnd).expect("getrandom failed");
        let session = Self::with_session_id(auth_key, first_salt, i64::from_le_bytes(rnd));
        log::debug!(
            "new encrypted session {:#018x} for {:?}",
            session.session_id,
            session.auth_key
        );
        session
    }

    /// Create a session with an explicit session ID.
    ///
    /// Normal connections want [`EncryptedSession::new`]; this exists so
    /// frames can be reproduced deterministically.
    pub fn with_session_id(auth_key: AuthKey, first_salt: i64, session_id: i64) -> Self {
        Self {
            auth_key,
            session_id,
            clock: SessionClock::new(),
            salt: first_salt,
        }
    }

    /// The session ID chosen at construction.
    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    /// Adjust the clock skew used for message-ID generation.
    pub fn set_time_offset(&mut self, secs: i32) {
        self.clock.set_time_offset(secs);
    }

    /// Seal a request into a wire-ready encrypted frame.
    pub fn pack<S: Serializable + ContentClass>(&mut self, call: &S) -> Vec<u8> {
        self.pack_with_msg_id(call).0
    }

    /// Like [`pack`](Self::pack), but also returns the message ID allocated
    /// for the request so the reply can be correlated.
    ///
    /// Layout of the plaintext before encryption:
    /// ```text
    /// salt:       i64
    /// session_id: i64
    /// msg_id:     i64
    /// seq_no:     i32
    /// body_len:   i32
    /// body:       [u8; body_len]
    /// ```
    pub fn pack_with_msg_id<S: Serializable + ContentClass>(&mut self, call: &S) -> (Vec<u8>, i64) {
        let body = call.to_bytes();
        let msg_id = self.clock.next_msg_id();
        let seq_no = self.clock.next_seq_no(S::CONTENT_RELATED);

        let inner_len = 8 + 8 + 8 + 4 + 4 + body.len();
        // Front headroom fits auth_key_id + msg_key, appended after encryption.
        let mut buf = DequeBuffer::with_capacity(inner_len + 28, 24);
        buf.extend(self.salt.to_le_bytes());
        buf.extend(self.session_id.to_le_bytes());
        buf.extend(msg_id.to_le_bytes());
        buf.extend(seq_no.to_le_bytes());
        buf.extend((body.len() as u32).to_le_bytes());
        buf.extend(body.iter().copied());

        encrypt_data_v2(&mut buf, &self.auth_key, Side::Client);
        (buf.as_ref().to_vec(), msg_id)
    }

    /// Open an encrypted server frame.
    ///
    /// Validates the crypto envelope, the inner header length, the echoed
    /// session ID, and the body length field before handing the body back.
    pub fn unpack(&self, frame: &mut [u8]) -> Result<DecryptedMessage, DecryptError> {
        let plaintext =
            decrypt_data_v2(frame, &self.auth_key, Side::Server).map_err(DecryptError::Crypto)?;

        // inner: salt(8) + session_id(8) + msg_id(8) + seq_no(4) + len(4) + body
        if plaintext.len() < 32 {
            return Err(DecryptError::FrameTooShort);
        }

        let salt = i64::from_le_bytes(plaintext[..8].try_into().unwrap());
        let session_id = i64::from_le_bytes(plaintext[8..16].try_into().unwrap());
        let msg_id = i64::from_le_bytes(plaintext[16..24].try_into().unwrap());
        let seq_no = i32::from_le_bytes(plaintext[24..28].try_into().unwrap());
        let body_len = u32::from_le_bytes(plaintext[28..32].try_into().unwrap()) as usize;

        if session_id != self.session_id {
            return Err(DecryptError::SessionMismatch);
        }
        if body_len > plaintext.len() - 32 {
            log::warn!(
                "inner length {body_len} overruns plaintext ({} bytes of body)",
                plaintext.len() - 32
            );
            return Err(DecryptError::BadLength);
        }

        let body = plaintext[32..32 + body_len].to_vec();
        Ok(DecryptedMessage { salt, session_id, msg_id, seq_no, body })
    }
}
