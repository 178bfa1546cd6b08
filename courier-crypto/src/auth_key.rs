//! The shared authorization key and its cached identifier.

use crate::sha1;

/// An MTProto authorization key plus its pre-computed 8-byte identifier.
///
/// The key itself is established out of band (the DH handshake is not this
/// crate's business) and handed in as raw bytes. Production keys are 256
/// bytes; anything of at least [`AuthKey::MIN_LEN`] is accepted.
#[derive(Clone)]
pub struct AuthKey {
    pub(crate) data: Vec<u8>,
    pub(crate) key_id: [u8; 8],
}

impl AuthKey {
    /// Minimum accepted key length in bytes.
    ///
    /// Message-key derivation reads `key[88 + x .. 120 + x]` where `x` is 8
    /// for server-sent messages, so any key shorter than 128 bytes cannot
    /// serve both directions of a session.
    pub const MIN_LEN: usize = 128;

    /// Construct from raw key bytes, computing the key ID.
    ///
    /// Rejects keys shorter than [`AuthKey::MIN_LEN`] up front; a short key
    /// would otherwise only be caught deep inside key derivation.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, InvalidKeyLength> {
        if data.len() < Self::MIN_LEN {
            return Err(InvalidKeyLength { len: data.len() });
        }
        let sha = sha1!(&data);
        let mut key_id = [0u8; 8];
        key_id.copy_from_slice(&sha[12..20]);
        Ok(Self { data, key_id })
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The 8-byte key identifier: `SHA1(key)[12..20]`, i.e. the low 8 bytes
    /// of the digest.
    pub fn key_id(&self) -> [u8; 8] {
        self.key_id
    }
}

impl std::fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthKey(id={})", u64::from_le_bytes(self.key_id))
    }
}

impl PartialEq for AuthKey {
    fn eq(&self, other: &Self) -> bool {
        self.key_id == other.key_id
    }
}

/// Error from [`AuthKey::from_bytes`]: the key is too short to use.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvalidKeyLength {
    /// Length of the rejected key, in bytes.
    pub len: usize,
}

impl std::fmt::Display for InvalidKeyLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "auth key is {} bytes, need at least {}",
            self.len,
            AuthKey::MIN_LEN
        )
    }
}

impl std::error::Error for InvalidKeyLength {}
