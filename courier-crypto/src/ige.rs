//! AES-256 in IGE (Infinite Garble Extension) mode.
//!
//! IGE chains both directions: each block is XORed with the previous
//! ciphertext block before the cipher and with the previous plaintext block
//! after it. The 32-byte IV carries the two initial chaining values, first
//! the ciphertext half, then the plaintext half.

use aes::Aes256;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};

/// Encrypt `buffer` in place. Length must be a multiple of 16.
pub fn encrypt(buffer: &mut [u8], key: &[u8; 32], iv: &[u8; 32]) {
    assert_eq!(buffer.len() % 16, 0, "IGE input must be block-aligned");
    let cipher = Aes256::new(GenericArray::from_slice(key));

    let mut prev_cipher = [0u8; 16];
    let mut prev_plain = [0u8; 16];
    prev_cipher.copy_from_slice(&iv[..16]);
    prev_plain.copy_from_slice(&iv[16..]);

    let mut saved = [0u8; 16];
    for block in buffer.chunks_exact_mut(16) {
        saved.copy_from_slice(block);

        for i in 0..16 {
            block[i] ^= prev_cipher[i];
        }
        cipher.encrypt_block(GenericArray::from_mut_slice(block));
        for i in 0..16 {
            block[i] ^= prev_plain[i];
        }

        prev_cipher.copy_from_slice(block);
        prev_plain.copy_from_slice(&saved);
    }
}

/// Decrypt `buffer` in place. Length must be a multiple of 16.
pub fn decrypt(buffer: &mut [u8], key: &[u8; 32], iv: &[u8; 32]) {
    assert_eq!(buffer.len() % 16, 0, "IGE input must be block-aligned");
    let cipher = Aes256::new(GenericArray::from_slice(key));

    let mut prev_cipher = [0u8; 16];
    let mut prev_plain = [0u8; 16];
    prev_cipher.copy_from_slice(&iv[..16]);
    prev_plain.copy_from_slice(&iv[16..]);

    let mut saved = [0u8; 16];
    for block in buffer.chunks_exact_mut(16) {
        saved.copy_from_slice(block);

        for i in 0..16 {
            block[i] ^= prev_plain[i];
        }
        cipher.decrypt_block(GenericArray::from_mut_slice(block));
        for i in 0..16 {
            block[i] ^= prev_cipher[i];
        }

        prev_cipher.copy_from_slice(&saved);
        prev_plain.copy_from_slice(block);
    }
}
