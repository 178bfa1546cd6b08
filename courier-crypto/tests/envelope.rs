use courier_crypto::{
    AuthKey, DecryptError, DequeBuffer, Side, decrypt_data_v2, derive_client_key_iv,
    derive_server_key_iv, encrypt_data_v2, sha1,
};

fn key_of(len: usize) -> AuthKey {
    AuthKey::from_bytes((0..len).map(|i| i as u8).collect()).unwrap()
}

fn seal(payload: &[u8], key: &AuthKey, side: Side) -> Vec<u8> {
    let mut buffer = DequeBuffer::with_capacity(payload.len() + 32, 24);
    buffer.extend(payload.iter().copied());
    encrypt_data_v2(&mut buffer, key, side);
    buffer.as_ref().to_vec()
}

// ── AuthKey ───────────────────────────────────────────────────────────────────

#[test]
fn key_id_is_sha1_tail() {
    let raw: Vec<u8> = vec![1; 200];
    let key = AuthKey::from_bytes(raw.clone()).unwrap();
    assert_eq!(key.key_id(), sha1!(&raw)[12..20]);
    assert_eq!(key.as_bytes(), &raw[..]);
}

#[test]
fn short_keys_are_rejected_eagerly() {
    let err = AuthKey::from_bytes(vec![1; 127]).unwrap_err();
    assert_eq!(err.len, 127);
    assert!(AuthKey::from_bytes(vec![1; 128]).is_ok());
    assert!(AuthKey::from_bytes(vec![1; 200]).is_ok());
}

#[test]
fn keys_compare_by_id() {
    assert_eq!(key_of(256), key_of(256));
    assert_ne!(key_of(256), key_of(200));
}

// ── Round trips ───────────────────────────────────────────────────────────────

#[test]
fn decrypt_recovers_what_encrypt_sealed() {
    let key = key_of(256);
    let payload = b"the quick brown fox";

    for side in [Side::Client, Side::Server] {
        let mut wire = seal(payload, &key, side);
        let plain = decrypt_data_v2(&mut wire, &key, side).unwrap();
        assert_eq!(&plain[..payload.len()], payload);
        assert_eq!(plain.len() % 16, 0);
    }
}

#[test]
fn round_trip_works_at_minimum_key_length() {
    let key = key_of(128);
    let mut wire = seal(b"x", &key, Side::Client);
    let plain = decrypt_data_v2(&mut wire, &key, Side::Client).unwrap();
    assert_eq!(plain[0], b'x');
}

#[test]
fn padding_window_holds_across_payload_sizes() {
    let key = key_of(256);
    for len in [0usize, 1, 4, 15, 16, 17, 100] {
        let wire = seal(&vec![0xabu8; len], &key, Side::Client);
        let pad = wire.len() - 24 - len;
        assert!(pad >= 12 && pad < 28, "payload {len} gave padding {pad}");
        assert_eq!((wire.len() - 24) % 16, 0);
    }
}

#[test]
fn sides_are_not_interchangeable() {
    let key = key_of(256);
    let mut wire = seal(b"direction matters", &key, Side::Client);
    let err = decrypt_data_v2(&mut wire, &key, Side::Server).unwrap_err();
    assert_eq!(err, DecryptError::MessageKeyMismatch);
}

#[test]
fn derivations_differ_only_by_offset() {
    // With a constant key every auth-key slice is identical, so the two
    // directions collapse into one — the degenerate case the all-0x01
    // fixtures elsewhere rely on.
    let flat = AuthKey::from_bytes(vec![1; 200]).unwrap();
    let msg_key = [3u8; 16];
    assert_eq!(
        derive_client_key_iv(&msg_key, &flat),
        derive_server_key_iv(&msg_key, &flat)
    );
}

// ── Tampering ─────────────────────────────────────────────────────────────────

#[test]
fn flipped_ciphertext_bit_is_detected() {
    let key = key_of(256);
    let wire = seal(b"integrity", &key, Side::Client);

    for pos in [24, wire.len() / 2, wire.len() - 1] {
        let mut bad = wire.clone();
        bad[pos] ^= 0x01;
        let err = decrypt_data_v2(&mut bad, &key, Side::Client).unwrap_err();
        assert_eq!(err, DecryptError::MessageKeyMismatch, "flip at {pos}");
    }
}

#[test]
fn flipped_msg_key_bit_is_detected() {
    let key = key_of(256);
    let mut wire = seal(b"integrity", &key, Side::Client);
    wire[8] ^= 0x80;
    let err = decrypt_data_v2(&mut wire, &key, Side::Client).unwrap_err();
    assert_eq!(err, DecryptError::MessageKeyMismatch);
}

#[test]
fn foreign_key_id_is_detected() {
    let key = key_of(256);
    let mut wire = seal(b"whoami", &key, Side::Client);
    wire[0] ^= 0xff;
    let err = decrypt_data_v2(&mut wire, &key, Side::Client).unwrap_err();
    assert_eq!(err, DecryptError::AuthKeyMismatch);
}

#[test]
fn malformed_buffers_are_rejected_before_any_crypto() {
    let key = key_of(256);
    assert_eq!(
        decrypt_data_v2(&mut [0u8; 23], &key, Side::Server).unwrap_err(),
        DecryptError::InvalidBuffer
    );
    // 24-byte header plus a partial block
    assert_eq!(
        decrypt_data_v2(&mut [0u8; 31], &key, Side::Server).unwrap_err(),
        DecryptError::InvalidBuffer
    );
}
