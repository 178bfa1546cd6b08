use courier_crypto::{AuthKey, DequeBuffer, Side, encrypt_data_v2};
use courier_mtproto::encrypted::DecryptError;
use courier_mtproto::EncryptedSession;
use courier_tl::{ContentClass, Serializable};

/// Raw five-byte payload, content-related by default.
struct Hello;

impl Serializable for Hello {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        buf.extend(*b"HELLO");
    }
}

impl ContentClass for Hello {}

struct Probe;

impl Serializable for Probe {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        buf.extend(*b"probe");
    }
}

impl ContentClass for Probe {
    const CONTENT_RELATED: bool = false;
}

fn flat_key() -> AuthKey {
    AuthKey::from_bytes(vec![1; 200]).unwrap()
}

fn patterned_key() -> AuthKey {
    AuthKey::from_bytes((0..=255).collect()).unwrap()
}

/// Seal a server-side frame around the given inner header fields.
fn server_frame(key: &AuthKey, salt: i64, session_id: i64, body: &[u8]) -> Vec<u8> {
    let mut buf = DequeBuffer::with_capacity(32 + body.len() + 28, 24);
    buf.extend(salt.to_le_bytes());
    buf.extend(session_id.to_le_bytes());
    buf.extend(0x5eed_0000_0000_0004i64.to_le_bytes());
    buf.extend(1i32.to_le_bytes());
    buf.extend((body.len() as u32).to_le_bytes());
    buf.extend(body.iter().copied());
    encrypt_data_v2(&mut buf, key, Side::Server);
    buf.as_ref().to_vec()
}

#[test]
fn hello_round_trip_with_flat_key() {
    // With an all-0x01 key both directions derive identical material, so a
    // client-sealed frame opens as if the server had sent it.
    let mut session = EncryptedSession::with_session_id(flat_key(), 0, 0);
    let mut wire = session.pack(&Hello);

    let msg = session.unpack(&mut wire).unwrap();
    assert_eq!(msg.body, b"HELLO");
    assert_eq!(msg.salt, 0);
    assert_eq!(msg.session_id, 0);
    assert_eq!(msg.seq_no, 1, "first content-related message");
}

#[test]
fn envelope_starts_with_key_id_and_msg_key() {
    let key = patterned_key();
    let key_id = key.key_id();
    let mut session = EncryptedSession::with_session_id(key, 99, 7);
    let (wire, msg_id) = session.pack_with_msg_id(&Hello);

    assert_eq!(&wire[..8], &key_id);
    assert_eq!((wire.len() - 24) % 16, 0);
    assert!(msg_id > 0);
}

#[test]
fn housekeeping_packs_with_even_seq_no() {
    let mut session = EncryptedSession::with_session_id(flat_key(), 0, 0);
    let mut wire = session.pack(&Probe);
    let msg = session.unpack(&mut wire).unwrap();
    assert_eq!(msg.seq_no & 1, 0);
}

#[test]
fn unpack_reads_server_frames() {
    let key = patterned_key();
    let session = EncryptedSession::with_session_id(key.clone(), 0, 0x11223344);
    let mut wire = server_frame(&key, 555, 0x11223344, b"\xde\xad\xbe\xef");

    let msg = session.unpack(&mut wire).unwrap();
    assert_eq!(msg.salt, 555);
    assert_eq!(msg.body, b"\xde\xad\xbe\xef");
    assert_eq!(msg.seq_no, 1);
}

#[test]
fn foreign_session_id_is_fatal() {
    let key = patterned_key();
    let session = EncryptedSession::with_session_id(key.clone(), 0, 1);
    let mut wire = server_frame(&key, 0, 2, b"hi");

    assert!(matches!(session.unpack(&mut wire), Err(DecryptError::SessionMismatch)));
}

#[test]
fn tampered_frame_surfaces_the_crypto_error() {
    let key = patterned_key();
    let session = EncryptedSession::with_session_id(key.clone(), 0, 0);
    let mut wire = server_frame(&key, 0, 0, b"hi");
    wire[30] ^= 0x40;

    assert!(matches!(
        session.unpack(&mut wire),
        Err(DecryptError::Crypto(courier_crypto::DecryptError::MessageKeyMismatch))
    ));
}

#[test]
fn truncated_inner_plaintext_is_rejected() {
    let key = patterned_key();
    let session = EncryptedSession::with_session_id(key.clone(), 0, 0);

    // A 4-byte inner pads out to a single 16-byte block, well short of the
    // 32-byte header.
    let mut buf = DequeBuffer::with_capacity(8, 24);
    buf.extend(7i32.to_le_bytes());
    encrypt_data_v2(&mut buf, &key, Side::Server);
    let mut wire = buf.as_ref().to_vec();

    assert!(matches!(session.unpack(&mut wire), Err(DecryptError::FrameTooShort)));
}

#[test]
fn overrunning_length_field_is_rejected() {
    let key = patterned_key();
    let session = EncryptedSession::with_session_id(key.clone(), 0, 0);

    let mut buf = DequeBuffer::with_capacity(64, 24);
    buf.extend(0i64.to_le_bytes());
    buf.extend(0i64.to_le_bytes());
    buf.extend(4i64.to_le_bytes());
    buf.extend(1i32.to_le_bytes());
    buf.extend(9_999u32.to_le_bytes()); // body_len far beyond the plaintext
    buf.extend(*b"tiny");
    encrypt_data_v2(&mut buf, &key, Side::Server);
    let mut wire = buf.as_ref().to_vec();

    assert!(matches!(session.unpack(&mut wire), Err(DecryptError::BadLength)));
}
