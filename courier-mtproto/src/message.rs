//! Plaintext message framing (pre auth-key).

/// A framed message with its allocated ID.
///
/// Only unauthenticated traffic travels in this form; once an auth key is
/// established everything goes through [`crate::EncryptedSession`].
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    /// Unique identifier for this message.
    pub msg_id: i64,
    /// The serialized TL body (constructor ID + fields).
    pub body: Vec<u8>,
}

impl Message {
    /// Serialize into the plaintext wire format:
    ///
    /// ```text
    /// auth_key_id:long  (always 0 for plaintext)
    /// message_id:long
    /// message_data_length:int
    /// message_data:bytes
    /// ```
    pub fn to_plaintext_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8 + 8 + 4 + self.body.len());
        buf.extend(0u64.to_le_bytes());
        buf.extend(self.msg_id.to_le_bytes());
        buf.extend((self.body.len() as u32).to_le_bytes());
        buf.extend(&self.body);
        buf
    }

    /// Parse a plaintext frame, validating the fixed header.
    ///
    /// The body starts at byte 20: after the zero `auth_key_id`, the
    /// message ID, and the length field.
    pub fn from_plaintext_bytes(frame: &[u8]) -> Result<Self, PlainError> {
        if frame.len() < 20 {
            return Err(PlainError::TooShort);
        }
        if frame[..8] != [0u8; 8] {
            return Err(PlainError::BadAuthKeyId);
        }
        let msg_id = i64::from_le_bytes(frame[8..16].try_into().unwrap());
        let len = u32::from_le_bytes(frame[16..20].try_into().unwrap()) as usize;
        if len > frame.len() - 20 {
            return Err(PlainError::BadLength);
        }
        Ok(Self { msg_id, body: frame[20..20 + len].to_vec() })
    }
}

/// Errors from [`Message::from_plaintext_bytes`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlainError {
    /// Fewer than the 20 header bytes arrived.
    TooShort,
    /// The leading 8 bytes were not zero, so this is not a plaintext frame.
    BadAuthKeyId,
    /// The length field points past the end of the frame.
    BadLength,
}

impl std::fmt::Display for PlainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort => write!(f, "plaintext frame shorter than its header"),
            Self::BadAuthKeyId => write!(f, "nonzero auth_key_id in plaintext frame"),
            Self::BadLength => write!(f, "length field overruns the frame"),
        }
    }
}
impl std::error::Error for PlainError {}
