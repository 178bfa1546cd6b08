//! Hand-written MTProto service constructors.
//!
//! These are the types the transport layer itself sends and receives:
//! keepalives, acknowledgments, containers, and the `rpc_result` wrapper
//! every answer arrives in. Their layouts are fixed by the MTProto service
//! schema and do not change between API layers, which is why they are
//! written out by hand rather than generated.

use crate::deserialize::{Buffer, Error, Result};
use crate::{ContentClass, Deserializable, Identifiable, RemoteCall, Serializable};

fn expect_id(buf: Buffer, id: u32) -> Result<()> {
    let got = u32::deserialize(buf)?;
    if got == id {
        Ok(())
    } else {
        Err(Error::UnexpectedConstructor { id: got })
    }
}

// ─── ping / pong ─────────────────────────────────────────────────────────────

/// `ping#7abe77ec ping_id:long = Pong;`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ping {
    /// Caller-chosen value echoed back in the [`Pong`].
    pub ping_id: i64,
}

impl Identifiable for Ping {
    const CONSTRUCTOR_ID: u32 = 0x7abe77ec;
}

impl Serializable for Ping {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.ping_id.serialize(buf);
    }
}

impl Deserializable for Ping {
    fn deserialize(buf: Buffer) -> Result<Self> {
        expect_id(buf, Self::CONSTRUCTOR_ID)?;
        Ok(Self { ping_id: i64::deserialize(buf)? })
    }
}

impl RemoteCall for Ping {
    type Return = Pong;
}

impl ContentClass for Ping {
    const CONTENT_RELATED: bool = false;
}

/// `pong#347773c5 msg_id:long ping_id:long = Pong;`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pong {
    /// ID of the `ping` message being answered.
    pub msg_id: i64,
    /// Echo of the caller-chosen value.
    pub ping_id: i64,
}

impl Identifiable for Pong {
    const CONSTRUCTOR_ID: u32 = 0x347773c5;
}

impl Serializable for Pong {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.msg_id.serialize(buf);
        self.ping_id.serialize(buf);
    }
}

impl Deserializable for Pong {
    fn deserialize(buf: Buffer) -> Result<Self> {
        expect_id(buf, Self::CONSTRUCTOR_ID)?;
        Ok(Self {
            msg_id: i64::deserialize(buf)?,
            ping_id: i64::deserialize(buf)?,
        })
    }
}

// ─── acknowledgments ─────────────────────────────────────────────────────────

/// `msgs_ack#62d6b459 msg_ids:Vector<long> = MsgsAck;`
#[derive(Clone, Debug, PartialEq)]
pub struct MsgsAck {
    /// IDs of the messages being acknowledged.
    pub msg_ids: Vec<i64>,
}

impl Identifiable for MsgsAck {
    const CONSTRUCTOR_ID: u32 = 0x62d6b459;
}

impl Serializable for MsgsAck {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.msg_ids.serialize(buf);
    }
}

impl Deserializable for MsgsAck {
    fn deserialize(buf: Buffer) -> Result<Self> {
        expect_id(buf, Self::CONSTRUCTOR_ID)?;
        Ok(Self { msg_ids: Vec::<i64>::deserialize(buf)? })
    }
}

impl ContentClass for MsgsAck {
    const CONTENT_RELATED: bool = false;
}

// ─── containers ──────────────────────────────────────────────────────────────

/// One entry of a [`MsgContainer`]: a complete inner message with its own
/// ID and sequence number, body kept as raw bytes for the caller to decode.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerMsg {
    /// Inner message ID.
    pub msg_id: i64,
    /// Inner sequence number.
    pub seq_no: i32,
    /// Raw serialized body (a boxed TL object).
    pub body: Vec<u8>,
}

impl Serializable for ContainerMsg {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.msg_id.serialize(buf);
        self.seq_no.serialize(buf);
        (self.body.len() as i32).serialize(buf);
        buf.extend(self.body.iter().copied());
    }
}

impl Deserializable for ContainerMsg {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let msg_id = i64::deserialize(buf)?;
        let seq_no = i32::deserialize(buf)?;
        let len = i32::deserialize(buf)?;
        if len < 0 {
            return Err(Error::UnexpectedEof);
        }
        let mut body = vec![0u8; len as usize];
        buf.read_exact(&mut body)?;
        Ok(Self { msg_id, seq_no, body })
    }
}

/// `msg_container#73f1f8dc messages:vector<%Message> = MessageContainer;`
///
/// The inner vector is bare: a count follows the constructor ID directly.
#[derive(Clone, Debug, PartialEq)]
pub struct MsgContainer {
    /// The batched messages, in order.
    pub messages: Vec<ContainerMsg>,
}

impl Identifiable for MsgContainer {
    const CONSTRUCTOR_ID: u32 = 0x73f1f8dc;
}

impl Serializable for MsgContainer {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        (self.messages.len() as i32).serialize(buf);
        for msg in &self.messages {
            msg.serialize(buf);
        }
    }
}

impl Deserializable for MsgContainer {
    fn deserialize(buf: Buffer) -> Result<Self> {
        expect_id(buf, Self::CONSTRUCTOR_ID)?;
        let len = i32::deserialize(buf)? as usize;
        let messages = (0..len)
            .map(|_| ContainerMsg::deserialize(buf))
            .collect::<Result<_>>()?;
        Ok(Self { messages })
    }
}

impl ContentClass for MsgContainer {
    const CONTENT_RELATED: bool = false;
}

// ─── http long-poll ──────────────────────────────────────────────────────────

/// `http_wait#9299359f max_delay:int wait_after:int max_wait:int = HttpWait;`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HttpWait {
    /// Maximum milliseconds to delay the response.
    pub max_delay: i32,
    /// Milliseconds to keep waiting after the last message.
    pub wait_after: i32,
    /// Hard cap on the total wait, in milliseconds.
    pub max_wait: i32,
}

impl Identifiable for HttpWait {
    const CONSTRUCTOR_ID: u32 = 0x9299359f;
}

impl Serializable for HttpWait {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.max_delay.serialize(buf);
        self.wait_after.serialize(buf);
        self.max_wait.serialize(buf);
    }
}

impl Deserializable for HttpWait {
    fn deserialize(buf: Buffer) -> Result<Self> {
        expect_id(buf, Self::CONSTRUCTOR_ID)?;
        Ok(Self {
            max_delay: i32::deserialize(buf)?,
            wait_after: i32::deserialize(buf)?,
            max_wait: i32::deserialize(buf)?,
        })
    }
}

impl ContentClass for HttpWait {
    const CONTENT_RELATED: bool = false;
}

// ─── rpc results ─────────────────────────────────────────────────────────────

/// `rpc_result#f35c6d01 req_msg_id:long result:Object = RpcResult;`
///
/// The trailing `Object` has no length marker, so the body is everything
/// left in the buffer; decoding it is up to the caller, which knows what
/// the original request was.
#[derive(Clone, Debug, PartialEq)]
pub struct RpcResult {
    /// ID of the request this answers.
    pub req_msg_id: i64,
    /// Raw serialized result.
    pub body: Vec<u8>,
}

impl Identifiable for RpcResult {
    const CONSTRUCTOR_ID: u32 = 0xf35c6d01;
}

impl Serializable for RpcResult {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.req_msg_id.serialize(buf);
        buf.extend(self.body.iter().copied());
    }
}

impl Deserializable for RpcResult {
    fn deserialize(buf: Buffer) -> Result<Self> {
        expect_id(buf, Self::CONSTRUCTOR_ID)?;
        let req_msg_id = i64::deserialize(buf)?;
        let body = buf.read_remaining().to_vec();
        Ok(Self { req_msg_id, body })
    }
}

/// `rpc_error#2144ca19 error_code:int error_message:string = RpcError;`
#[derive(Clone, Debug, PartialEq)]
pub struct RpcError {
    /// Numeric error class, e.g. `420`.
    pub error_code: i32,
    /// Symbolic message, e.g. `"FLOOD_WAIT_30"`.
    pub error_message: String,
}

impl Identifiable for RpcError {
    const CONSTRUCTOR_ID: u32 = 0x2144ca19;
}

impl Serializable for RpcError {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.error_code.serialize(buf);
        self.error_message.serialize(buf);
    }
}

impl Deserializable for RpcError {
    fn deserialize(buf: Buffer) -> Result<Self> {
        expect_id(buf, Self::CONSTRUCTOR_ID)?;
        Ok(Self {
            error_code: i32::deserialize(buf)?,
            error_message: String::deserialize(buf)?,
        })
    }
}

// ─── session notifications ───────────────────────────────────────────────────

/// `new_session_created#9ec20908 first_msg_id:long unique_id:long
/// server_salt:long = NewSession;`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewSessionCreated {
    /// First message ID the server saw in this session.
    pub first_msg_id: i64,
    /// Server-chosen session marker.
    pub unique_id: i64,
    /// Salt valid for the new session.
    pub server_salt: i64,
}

impl Identifiable for NewSessionCreated {
    const CONSTRUCTOR_ID: u32 = 0x9ec20908;
}

impl Serializable for NewSessionCreated {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.first_msg_id.serialize(buf);
        self.unique_id.serialize(buf);
        self.server_salt.serialize(buf);
    }
}

impl Deserializable for NewSessionCreated {
    fn deserialize(buf: Buffer) -> Result<Self> {
        expect_id(buf, Self::CONSTRUCTOR_ID)?;
        Ok(Self {
            first_msg_id: i64::deserialize(buf)?,
            unique_id: i64::deserialize(buf)?,
            server_salt: i64::deserialize(buf)?,
        })
    }
}

/// `bad_server_salt#edab447b bad_msg_id:long bad_msg_seqno:int error_code:int
/// new_server_salt:long = BadMsgNotification;`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BadServerSalt {
    /// ID of the rejected message.
    pub bad_msg_id: i64,
    /// Sequence number of the rejected message.
    pub bad_msg_seqno: i32,
    /// Always `48` (bad server salt).
    pub error_code: i32,
    /// The salt to use from now on.
    pub new_server_salt: i64,
}

impl Identifiable for BadServerSalt {
    const CONSTRUCTOR_ID: u32 = 0xedab447b;
}

impl Serializable for BadServerSalt {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.bad_msg_id.serialize(buf);
        self.bad_msg_seqno.serialize(buf);
        self.error_code.serialize(buf);
        self.new_server_salt.serialize(buf);
    }
}

impl Deserializable for BadServerSalt {
    fn deserialize(buf: Buffer) -> Result<Self> {
        expect_id(buf, Self::CONSTRUCTOR_ID)?;
        Ok(Self {
            bad_msg_id: i64::deserialize(buf)?,
            bad_msg_seqno: i32::deserialize(buf)?,
            error_code: i32::deserialize(buf)?,
            new_server_salt: i64::deserialize(buf)?,
        })
    }
}

/// `bad_msg_notification#a7eff811 bad_msg_id:long bad_msg_seqno:int
/// error_code:int = BadMsgNotification;`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BadMsgNotification {
    /// ID of the rejected message.
    pub bad_msg_id: i64,
    /// Sequence number of the rejected message.
    pub bad_msg_seqno: i32,
    /// What was wrong with it (16 = msg_id too low, 17 = too high, …).
    pub error_code: i32,
}

impl Identifiable for BadMsgNotification {
    const CONSTRUCTOR_ID: u32 = 0xa7eff811;
}

impl Serializable for BadMsgNotification {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.bad_msg_id.serialize(buf);
        self.bad_msg_seqno.serialize(buf);
        self.error_code.serialize(buf);
    }
}

impl Deserializable for BadMsgNotification {
    fn deserialize(buf: Buffer) -> Result<Self> {
        expect_id(buf, Self::CONSTRUCTOR_ID)?;
        Ok(Self {
            bad_msg_id: i64::deserialize(buf)?,
            bad_msg_seqno: i32::deserialize(buf)?,
            error_code: i32::deserialize(buf)?,
        })
    }
}

// ─── compression ─────────────────────────────────────────────────────────────

/// `gzip_packed#3072cfa1 packed_data:bytes = Object;`
#[derive(Clone, Debug, PartialEq)]
pub struct GzipPacked {
    /// The deflated serialized object.
    pub packed_data: Vec<u8>,
}

impl Identifiable for GzipPacked {
    const CONSTRUCTOR_ID: u32 = 0x3072cfa1;
}

impl Serializable for GzipPacked {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.packed_data.serialize(buf);
    }
}

impl Deserializable for GzipPacked {
    fn deserialize(buf: Buffer) -> Result<Self> {
        expect_id(buf, Self::CONSTRUCTOR_ID)?;
        Ok(Self { packed_data: Vec::<u8>::deserialize(buf)? })
    }
}
