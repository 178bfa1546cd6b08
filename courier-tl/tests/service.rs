use courier_tl::deserialize::Error;
use courier_tl::service::{
    ContainerMsg, GzipPacked, MsgContainer, MsgsAck, Ping, Pong, RpcError, RpcResult,
};
use courier_tl::{ContentClass, Deserializable, Identifiable, Serializable};

#[test]
fn ping_wire_layout() {
    let wire = Ping { ping_id: 0x1122334455667788 }.to_bytes();
    assert_eq!(&wire[..4], &0x7abe77ecu32.to_le_bytes());
    assert_eq!(&wire[4..], &0x1122334455667788i64.to_le_bytes());
}

#[test]
fn wrong_constructor_is_rejected() {
    let wire = Ping { ping_id: 1 }.to_bytes();
    let err = Pong::from_bytes(&wire).unwrap_err();
    assert_eq!(err, Error::UnexpectedConstructor { id: Ping::CONSTRUCTOR_ID });
}

#[test]
fn rpc_result_body_is_raw_remainder() {
    let pong = Pong { msg_id: 11, ping_id: 22 };
    let wire = RpcResult { req_msg_id: 42, body: pong.to_bytes() }.to_bytes();

    let result = RpcResult::from_bytes(&wire).unwrap();
    assert_eq!(result.req_msg_id, 42);
    // The body carries no length marker; it is whatever followed req_msg_id.
    assert_eq!(Pong::from_bytes(&result.body).unwrap(), pong);
}

#[test]
fn rpc_error_reads_code_and_message() {
    let wire = RpcError {
        error_code: 420,
        error_message: "FLOOD_WAIT_30".into(),
    }
    .to_bytes();

    let err = RpcError::from_bytes(&wire).unwrap();
    assert_eq!(err.error_code, 420);
    assert_eq!(err.error_message, "FLOOD_WAIT_30");
}

#[test]
fn container_frames_inner_messages_bare() {
    let container = MsgContainer {
        messages: vec![
            ContainerMsg { msg_id: 1, seq_no: 2, body: Pong { msg_id: 1, ping_id: 9 }.to_bytes() },
            ContainerMsg { msg_id: 3, seq_no: 4, body: vec![0xde, 0xad, 0xbe, 0xef] },
        ],
    };
    let wire = container.to_bytes();

    // Constructor ID, then a bare count — no Vector header in between.
    assert_eq!(&wire[..4], &MsgContainer::CONSTRUCTOR_ID.to_le_bytes());
    assert_eq!(&wire[4..8], &2i32.to_le_bytes());
    // First entry header: msg_id(8) seq_no(4) len(4)
    assert_eq!(&wire[8..16], &1i64.to_le_bytes());
    assert_eq!(&wire[16..20], &2i32.to_le_bytes());
    assert_eq!(&wire[20..24], &20i32.to_le_bytes());

    assert_eq!(MsgContainer::from_bytes(&wire).unwrap(), container);
}

#[test]
fn gzip_packed_wraps_tl_bytes() {
    let wire = GzipPacked { packed_data: vec![9, 9, 9] }.to_bytes();
    assert_eq!(&wire[..4], &GzipPacked::CONSTRUCTOR_ID.to_le_bytes());
    assert_eq!(wire[4], 3); // TL bytes header
    assert_eq!(GzipPacked::from_bytes(&wire).unwrap().packed_data, vec![9, 9, 9]);
}

#[test]
fn housekeeping_is_not_content_related() {
    struct GetTime;
    impl Serializable for GetTime {
        fn serialize(&self, _: &mut impl Extend<u8>) {}
    }
    impl ContentClass for GetTime {}

    assert!(GetTime::CONTENT_RELATED, "plain requests default to content-related");
    assert!(!Ping::CONTENT_RELATED);
    assert!(!MsgsAck::CONTENT_RELATED);
    assert!(!MsgContainer::CONTENT_RELATED);
    assert!(!courier_tl::service::HttpWait::CONTENT_RELATED);
}
