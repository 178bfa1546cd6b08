use courier_mtproto::{Message, PlainError, SessionClock};

#[test]
fn msg_ids_strictly_increase() {
    let mut clock = SessionClock::new();
    let mut last = clock.next_msg_id();
    for _ in 0..1_000 {
        let id = clock.next_msg_id();
        assert!(id > last, "ids must strictly increase ({id} after {last})");
        last = id;
    }
}

#[test]
fn content_related_seq_nos_are_odd_and_advance() {
    let mut clock = SessionClock::new();
    let a = clock.next_seq_no(true);
    let b = clock.next_seq_no(true);
    assert_eq!(a & 1, 1, "content-related seq_no must be odd");
    assert_eq!(b & 1, 1);
    assert!(b > a, "seq_no must increase");
}

#[test]
fn housekeeping_seq_nos_are_even_and_hold() {
    let mut clock = SessionClock::new();
    assert_eq!(clock.next_seq_no(false), 0);
    assert_eq!(clock.next_seq_no(false), 0, "housekeeping must not advance the counter");
    assert_eq!(clock.next_seq_no(true), 1);
    assert_eq!(clock.next_seq_no(false), 2);
    assert_eq!(clock.next_seq_no(true), 3);
}

// ── Plaintext framing ─────────────────────────────────────────────────────────

#[test]
fn plaintext_wire_layout() {
    let mut clock = SessionClock::new();
    let msg = Message { msg_id: clock.next_msg_id(), body: b"PING".to_vec() };
    let wire = msg.to_plaintext_bytes();

    // auth_key_id (8) + msg_id (8) + length (4) + body
    assert_eq!(wire.len(), 24);
    assert_eq!(&wire[..8], &[0u8; 8]);
    assert_eq!(&wire[8..16], &msg.msg_id.to_le_bytes());
    assert_eq!(&wire[16..20], &4u32.to_le_bytes());
    assert_eq!(&wire[20..], b"PING");
}

#[test]
fn plaintext_parse_recovers_the_body() {
    let msg = Message { msg_id: 0x0102030405060708, body: b"PING".to_vec() };
    let back = Message::from_plaintext_bytes(&msg.to_plaintext_bytes()).unwrap();
    assert_eq!(back, msg);
}

#[test]
fn plaintext_parse_rejects_bad_frames() {
    // Header cut short
    assert_eq!(Message::from_plaintext_bytes(&[0u8; 19]), Err(PlainError::TooShort));

    // Nonzero auth_key_id prefix
    let mut framed = Message { msg_id: 1, body: vec![7] }.to_plaintext_bytes();
    framed[3] = 0xee;
    assert_eq!(Message::from_plaintext_bytes(&framed), Err(PlainError::BadAuthKeyId));

    // Length field promising more than the frame holds
    let mut framed = Message { msg_id: 1, body: vec![7, 8, 9] }.to_plaintext_bytes();
    framed[16] = 200;
    assert_eq!(Message::from_plaintext_bytes(&framed), Err(PlainError::BadLength));
}
