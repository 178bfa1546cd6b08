//! Message-layer cryptography for MTProto 2.0.
//!
//! Provides:
//! - AES-256-IGE encryption/decryption ([`ige`])
//! - SHA-1 / SHA-256 hash macros ([`sha1!`], [`sha256!`])
//! - [`AuthKey`] — the shared secret plus its cached 8-byte identifier
//! - per-message key derivation ([`derive_client_key_iv`], [`derive_server_key_iv`])
//! - the encrypted envelope itself ([`encrypt_data_v2`], [`decrypt_data_v2`])
//!
//! Everything here is synchronous and allocation-light; session state
//! (salts, session IDs, message IDs) lives one crate up.

#![deny(unsafe_code)]

pub mod ige;

mod auth_key;
mod deque_buffer;
mod sha;

pub use auth_key::{AuthKey, InvalidKeyLength};
pub use deque_buffer::DequeBuffer;

// ─── MTProto 2.0 encrypt / decrypt ───────────────────────────────────────────

/// Errors from [`decrypt_data_v2`].
#[derive(Clone, Debug, PartialEq)]
pub enum DecryptError {
    /// Ciphertext too short or not block-aligned.
    InvalidBuffer,
    /// The `auth_key_id` in the ciphertext does not match our key.
    AuthKeyMismatch,
    /// The `msg_key` in the ciphertext does not match our computed value.
    MessageKeyMismatch,
}

impl std::fmt::Display for DecryptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBuffer => write!(f, "invalid ciphertext buffer length"),
            Self::AuthKeyMismatch => write!(f, "auth_key_id mismatch"),
            Self::MessageKeyMismatch => write!(f, "msg_key mismatch"),
        }
    }
}
impl std::error::Error for DecryptError {}

/// Which peer *sent* the message being processed.
///
/// Key derivation is direction-asymmetric: the same auth key yields
/// different AES material for client-sent and server-sent messages. A
/// client encrypts with [`Side::Client`] and decrypts incoming frames with
/// [`Side::Server`]; a test fabricating a server frame does the reverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// The message was (or is being) sent by the client.
    Client,
    /// The message was (or is being) sent by the server.
    Server,
}

impl Side {
    fn x(self) -> usize {
        match self {
            Side::Client => 0,
            Side::Server => 8,
        }
    }

    fn derive_key_iv(self, msg_key: &[u8; 16], auth_key: &AuthKey) -> ([u8; 32], [u8; 32]) {
        match self {
            Side::Client => derive_client_key_iv(msg_key, auth_key),
            Side::Server => derive_server_key_iv(msg_key, auth_key),
        }
    }
}

fn derive_key_iv(msg_key: &[u8; 16], auth_key: &AuthKey, x: usize) -> ([u8; 32], [u8; 32]) {
    let sha_a = sha256!(msg_key, &auth_key.data[x..x + 36]);
    let sha_b = sha256!(&auth_key.data[40 + x..76 + x], msg_key);

    let mut aes_key = [0u8; 32];
    aes_key[..8].copy_from_slice(&sha_a[..8]);
    aes_key[8..24].copy_from_slice(&sha_b[8..24]);
    aes_key[24..].copy_from_slice(&sha_a[24..]);

    let mut aes_iv = [0u8; 32];
    aes_iv[..8].copy_from_slice(&sha_b[..8]);
    aes_iv[8..24].copy_from_slice(&sha_a[8..24]);
    aes_iv[24..].copy_from_slice(&sha_b[24..]);

    (aes_key, aes_iv)
}

/// Derive the AES key/IV pair for a **client-sent** message.
///
/// `a = SHA256(msg_key || auth_key[0..36])`,
/// `b = SHA256(auth_key[40..76] || msg_key)`;
/// `key = a[0..8] || b[8..24] || a[24..32]`,
/// `iv  = b[0..8] || a[8..24] || b[24..32]`.
pub fn derive_client_key_iv(msg_key: &[u8; 16], auth_key: &AuthKey) -> ([u8; 32], [u8; 32]) {
    derive_key_iv(msg_key, auth_key, 0)
}

/// Derive the AES key/IV pair for a **server-sent** message.
///
/// Same construction as [`derive_client_key_iv`] with every auth-key range
/// shifted up by 8: `a = SHA256(msg_key || auth_key[8..44])`,
/// `b = SHA256(auth_key[48..84] || msg_key)`.
pub fn derive_server_key_iv(msg_key: &[u8; 16], auth_key: &AuthKey) -> ([u8; 32], [u8; 32]) {
    derive_key_iv(msg_key, auth_key, 8)
}

/// Random padding appended before encryption: brings the total to a
/// multiple of 16 with at least 12 extra bytes, so identical payloads do
/// not produce identical ciphertext lengths modulo the block size.
fn padding_len(len: usize) -> usize {
    12 + (16 - (len + 12) % 16) % 16
}

/// Encrypt `buffer` in place (with prepended header) as an MTProto 2.0
/// message sent by `side`.
///
/// After this call `buffer` contains `key_id || msg_key || ciphertext`.
pub fn encrypt_data_v2(buffer: &mut DequeBuffer, auth_key: &AuthKey, side: Side) {
    let mut rnd = [0u8; 32];
    getrandom::getrandom(&mut rnd).expect("getrandom failed");
    do_encrypt_data_v2(buffer, auth_key, side, &rnd);
}

pub(crate) fn do_encrypt_data_v2(
    buffer: &mut DequeBuffer,
    auth_key: &AuthKey,
    side: Side,
    rnd: &[u8; 32],
) {
    let pad = padding_len(buffer.len());
    buffer.extend(rnd.iter().take(pad).copied());

    let x = side.x();
    let msg_key_large = sha256!(&auth_key.data[88 + x..120 + x], buffer.as_ref());
    let mut msg_key = [0u8; 16];
    msg_key.copy_from_slice(&msg_key_large[8..24]);

    let (key, iv) = side.derive_key_iv(&msg_key, auth_key);
    ige::encrypt(buffer.as_mut(), &key, &iv);

    buffer.extend_front(&msg_key);
    buffer.extend_front(&auth_key.key_id);
}

/// Decrypt an MTProto 2.0 message sent by `side`.
///
/// `buffer` must contain `key_id || msg_key || ciphertext`. On success
/// returns the padded plaintext as a sub-slice of `buffer`; the caller is
/// responsible for trimming the padding via the inner length field.
pub fn decrypt_data_v2<'a>(
    buffer: &'a mut [u8],
    auth_key: &AuthKey,
    side: Side,
) -> Result<&'a mut [u8], DecryptError> {
    if buffer.len() < 24 || (buffer.len() - 24) % 16 != 0 {
        return Err(DecryptError::InvalidBuffer);
    }
    if auth_key.key_id != buffer[..8] {
        return Err(DecryptError::AuthKeyMismatch);
    }
    let mut msg_key = [0u8; 16];
    msg_key.copy_from_slice(&buffer[8..24]);

    let (key, iv) = side.derive_key_iv(&msg_key, auth_key);
    ige::decrypt(&mut buffer[24..], &key, &iv);

    let x = side.x();
    let our_key = sha256!(&auth_key.data[88 + x..120 + x], &buffer[24..]);
    if msg_key != our_key[8..24] {
        return Err(DecryptError::MessageKeyMismatch);
    }
    Ok(&mut buffer[24..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterned_key() -> AuthKey {
        AuthKey::from_bytes((0..=255).collect()).unwrap()
    }

    #[test]
    fn padding_stays_in_window() {
        for len in 0..200 {
            let pad = padding_len(len);
            assert!(pad >= 12 && pad < 28, "len {len} gave padding {pad}");
            assert_eq!((len + pad) % 16, 0);
        }
    }

    #[test]
    fn directions_derive_different_material() {
        let key = patterned_key();
        let msg_key = [7u8; 16];
        assert_ne!(
            derive_client_key_iv(&msg_key, &key),
            derive_server_key_iv(&msg_key, &key)
        );
    }

    #[test]
    fn envelope_layout_is_header_plus_blocks() {
        let key = patterned_key();
        let mut buffer = DequeBuffer::with_capacity(64, 24);
        buffer.extend(*b"abc");
        do_encrypt_data_v2(&mut buffer, &key, Side::Client, &[0x11; 32]);

        assert_eq!(buffer[..8], key.key_id());
        assert_eq!((buffer.len() - 24) % 16, 0);
        // 3 payload bytes force 13 bytes of padding
        assert_eq!(buffer.len(), 24 + 16);
    }
}
