//! # courier-client
//!
//! Async request/response façade over the courier envelope, with the socket
//! left to the caller.
//!
//! ## What it does
//! - Plaintext frames before an auth key is installed, sealed envelopes after
//! - Reply correlation by message ID, through `rpc_result`, containers and
//!   `gzip_packed` wrappers
//! - Adoption of fresh server salts (from envelopes and `bad_server_salt`)
//! - Typed [`RpcError`] surfacing with wildcard matching
//! - A receive timeout on every in-flight call
//!
//! One request is in flight at a time: [`Client::invoke`] holds `&mut self`
//! across its send and the matching receive, so concurrent calls serialize
//! at compile time instead of racing on the shared read buffer. Multiplexing
//! by message ID is deliberately left to higher layers.

#![deny(unsafe_code)]

mod errors;

pub use errors::{InvocationError, RpcError};

use std::io;
use std::time::Duration;

use courier_mtproto::{AuthKey, EncryptedSession, Message, SessionClock};
use courier_tl::service;
use courier_tl::{ContentClass, Cursor, Deserializable, Identifiable, RemoteCall, Serializable};

// ─── Envelope constructor IDs ─────────────────────────────────────────────────

// Plain consts because associated consts cannot appear in match patterns.
const ID_RPC_RESULT:      u32 = service::RpcResult::CONSTRUCTOR_ID;
const ID_RPC_ERROR:       u32 = service::RpcError::CONSTRUCTOR_ID;
const ID_CONTAINER:       u32 = service::MsgContainer::CONSTRUCTOR_ID;
const ID_GZIP_PACKED:     u32 = service::GzipPacked::CONSTRUCTOR_ID;
const ID_PONG:            u32 = service::Pong::CONSTRUCTOR_ID;
const ID_MSGS_ACK:        u32 = service::MsgsAck::CONSTRUCTOR_ID;
const ID_BAD_SERVER_SALT: u32 = service::BadServerSalt::CONSTRUCTOR_ID;
const ID_NEW_SESSION:     u32 = service::NewSessionCreated::CONSTRUCTOR_ID;
const ID_BAD_MSG:         u32 = service::BadMsgNotification::CONSTRUCTOR_ID;
const ID_HTTP_WAIT:       u32 = service::HttpWait::CONSTRUCTOR_ID;

// ─── Connection ───────────────────────────────────────────────────────────────

/// Byte-stream transport contract.
///
/// The client does no socket work of its own; implement this for whatever
/// carries the frames (TCP, WebSocket, a proxy tunnel, an in-memory pair in
/// tests). One [`send`](Connection::send) or [`recv`](Connection::recv) call
/// moves exactly one whole frame — length prefixes, obfuscation and other
/// transport-level framing live behind this trait.
#[allow(async_fn_in_trait)]
pub trait Connection {
    /// Open the underlying transport.
    async fn connect(&mut self) -> io::Result<()>;
    /// Write one complete frame.
    async fn send(&mut self, data: &[u8]) -> io::Result<()>;
    /// Read one complete frame.
    async fn recv(&mut self) -> io::Result<Vec<u8>>;
    /// Close the underlying transport.
    async fn close(&mut self) -> io::Result<()>;
}

// ─── Config ───────────────────────────────────────────────────────────────────

/// Client tuning knobs.
#[derive(Clone, Debug)]
pub struct Config {
    /// How long [`Client::invoke`] waits for each incoming frame before
    /// giving up with [`InvocationError::Timeout`].
    pub recv_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self { recv_timeout: Duration::from_secs(10) }
    }
}

// ─── Client ───────────────────────────────────────────────────────────────────

/// Session state: plaintext before key setup, encrypted after.
enum Mode {
    Plain(SessionClock),
    Encrypted(EncryptedSession),
}

/// Request/response client driving a single [`Connection`].
///
/// A client lives for exactly one connection. After
/// [`disconnect`](Self::disconnect), or after a fatal decode error has torn
/// the connection down, build a fresh client — sessions are not resumed.
pub struct Client<C> {
    conn: Option<C>,
    mode: Mode,
    config: Config,
}

impl<C: Connection> Client<C> {
    /// A detached client in plaintext mode.
    pub fn new(config: Config) -> Self {
        Self { conn: None, mode: Mode::Plain(SessionClock::new()), config }
    }

    /// Open `conn` and attach it.
    pub async fn connect(&mut self, mut conn: C) -> Result<(), InvocationError> {
        conn.connect().await?;
        self.conn = Some(conn);
        Ok(())
    }

    /// Whether a connection is currently attached.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Switch to encrypted mode under an established key.
    ///
    /// Starts a fresh session (random session ID); the time offset learned
    /// while in plaintext mode carries over.
    pub fn set_auth_key(&mut self, key: AuthKey, first_salt: i64) {
        let mut session = EncryptedSession::new(key, first_salt);
        if let Mode::Plain(clock) = &self.mode {
            session.set_time_offset(clock.time_offset());
        }
        self.mode = Mode::Encrypted(session);
    }

    /// Install a fully specified session instead of deriving one from a key.
    ///
    /// [`set_auth_key`](Self::set_auth_key) is the usual entry point; this
    /// variant additionally pins the session ID and salt, which deterministic
    /// tests need.
    pub fn set_session(&mut self, session: EncryptedSession) {
        self.mode = Mode::Encrypted(session);
    }

    /// Whether an auth key has been installed.
    pub fn is_encrypted(&self) -> bool {
        matches!(self.mode, Mode::Encrypted(_))
    }

    /// Adjust for clock skew against the peer, in seconds.
    pub fn set_time_offset(&mut self, secs: i32) {
        match &mut self.mode {
            Mode::Plain(clock) => clock.set_time_offset(secs),
            Mode::Encrypted(session) => session.set_time_offset(secs),
        }
    }

    /// Close and detach the connection. The session dies with it.
    pub async fn disconnect(&mut self) -> Result<(), InvocationError> {
        match self.conn.take() {
            Some(mut conn) => conn.close().await.map_err(Into::into),
            None => Ok(()),
        }
    }

    /// Send `request` and decode the peer's reply.
    ///
    /// Frames that are not the reply (acks, salt notices, stray server
    /// pushes) are consumed and handled along the way. An `rpc_error` reply
    /// is raised as [`InvocationError::Rpc`], never returned as a value.
    pub async fn invoke<R>(&mut self, request: &R) -> Result<R::Return, InvocationError>
    where
        R: RemoteCall + ContentClass,
    {
        let raw = self.invoke_raw(request).await?;
        let mut buf = Cursor::from_slice(&raw);
        R::Return::deserialize(&mut buf).map_err(Into::into)
    }

    /// Round-trip a `ping` with a random ID and return the matching `pong`.
    pub async fn ping(&mut self) -> Result<service::Pong, InvocationError> {
        self.invoke(&service::Ping { ping_id: random_i64() }).await
    }

    async fn invoke_raw<R: Serializable + ContentClass>(
        &mut self,
        request: &R,
    ) -> Result<Vec<u8>, InvocationError> {
        if self.conn.is_none() {
            return Err(InvocationError::NotConnected);
        }
        // Frame and message ID are produced before the first await point, so
        // a cancelled call leaves at most a skipped ID behind, never a torn
        // clock update.
        let (wire, req_msg_id) = self.seal(request);
        self.send_frame(&wire).await?;
        self.read_reply(req_msg_id).await
    }

    fn seal<R: Serializable + ContentClass>(&mut self, request: &R) -> (Vec<u8>, i64) {
        match &mut self.mode {
            Mode::Plain(clock) => {
                let msg = Message { msg_id: clock.next_msg_id(), body: request.to_bytes() };
                (msg.to_plaintext_bytes(), msg.msg_id)
            }
            Mode::Encrypted(session) => session.pack_with_msg_id(request),
        }
    }

    async fn send_frame(&mut self, wire: &[u8]) -> Result<(), InvocationError> {
        let conn = self.conn.as_mut().ok_or(InvocationError::NotConnected)?;
        conn.send(wire).await.map_err(Into::into)
    }

    async fn recv_frame(&mut self) -> Result<Vec<u8>, InvocationError> {
        let conn = self.conn.as_mut().ok_or(InvocationError::NotConnected)?;
        tokio::time::timeout(self.config.recv_timeout, conn.recv())
            .await
            .map_err(|_| InvocationError::Timeout)?
            .map_err(Into::into)
    }

    async fn teardown(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            let _ = conn.close().await;
        }
    }

    /// Consume incoming frames until the reply to `req_msg_id` shows up.
    async fn read_reply(&mut self, req_msg_id: i64) -> Result<Vec<u8>, InvocationError> {
        loop {
            let mut frame = self.recv_frame().await?;

            // A bare 4-byte frame is a transport-level error code, not TL.
            if frame.len() == 4 {
                let code = i32::from_le_bytes(frame[..].try_into().unwrap());
                log::warn!("transport-level error {code}");
                return Err(InvocationError::Transport { code });
            }

            let opened = match &mut self.mode {
                // Plaintext replies are not enveloped: the body is the reply.
                Mode::Plain(_) => {
                    let msg = Message::from_plaintext_bytes(&frame)
                        .map_err(|e| InvocationError::Deserialize(e.to_string()))?;
                    return Ok(msg.body);
                }
                Mode::Encrypted(session) => match session.unpack(&mut frame) {
                    Ok(msg) => {
                        if msg.salt != 0 {
                            session.salt = msg.salt;
                        }
                        Ok(msg.body)
                    }
                    Err(e) => Err(e),
                },
            };

            let body = match opened {
                Ok(body) => body,
                Err(e) => {
                    // Key, integrity or session mismatch: the stream can no
                    // longer be trusted. Drop the connection, then surface.
                    self.teardown().await;
                    return Err(InvocationError::Corrupted(e));
                }
            };

            if let Some(reply) = self.digest(body, req_msg_id)? {
                return Ok(reply);
            }
        }
    }

    /// Process one envelope body; returns the payload answering `req_msg_id`
    /// once it has been seen.
    fn digest(&mut self, body: Vec<u8>, req_msg_id: i64) -> Result<Option<Vec<u8>>, InvocationError> {
        if body.len() < 4 {
            return Err(InvocationError::Deserialize(
                "envelope shorter than a constructor ID".into(),
            ));
        }
        let cid = u32::from_le_bytes(body[..4].try_into().unwrap());

        match cid {
            ID_RPC_RESULT => {
                let result = service::RpcResult::from_bytes(&body)?;
                if result.req_msg_id != req_msg_id {
                    log::debug!("rpc_result for unknown msg_id {:#x}, skipped", result.req_msg_id);
                    return Ok(None);
                }
                reply_payload(result.body).map(Some)
            }
            ID_RPC_ERROR => {
                let err = service::RpcError::from_bytes(&body)?;
                Err(InvocationError::Rpc(RpcError::from_raw(err.error_code, &err.error_message)))
            }
            ID_CONTAINER => {
                let container = service::MsgContainer::from_bytes(&body)?;
                let mut reply = None;
                for inner in container.messages {
                    if let Some(payload) = self.digest(inner.body, req_msg_id)? {
                        reply = Some(payload);
                    }
                }
                Ok(reply)
            }
            ID_GZIP_PACKED => {
                let packed = service::GzipPacked::from_bytes(&body)?;
                self.digest(inflate(&packed.packed_data)?, req_msg_id)
            }
            ID_PONG => {
                let pong = service::Pong::from_bytes(&body)?;
                if pong.msg_id == req_msg_id {
                    Ok(Some(body))
                } else {
                    log::debug!("pong for unknown msg_id {:#x}, skipped", pong.msg_id);
                    Ok(None)
                }
            }
            ID_BAD_SERVER_SALT => {
                let bad = service::BadServerSalt::from_bytes(&body)?;
                if let Mode::Encrypted(session) = &mut self.mode {
                    log::info!("peer rejected our salt, adopting {:#018x}", bad.new_server_salt);
                    session.salt = bad.new_server_salt;
                }
                // No automatic resend; the caller owns retry policy.
                Ok(None)
            }
            ID_BAD_MSG => {
                let bad = service::BadMsgNotification::from_bytes(&body)?;
                log::warn!("peer flagged msg {:#x}: error {}", bad.bad_msg_id, bad.error_code);
                Ok(None)
            }
            ID_MSGS_ACK | ID_NEW_SESSION | ID_HTTP_WAIT => {
                log::debug!("housekeeping {cid:#010x}, skipped");
                Ok(None)
            }
            _ => {
                log::debug!("unhandled constructor {cid:#010x}, skipped");
                Ok(None)
            }
        }
    }
}

// ─── Reply unwrapping ─────────────────────────────────────────────────────────

/// Unwrap the payload of an `rpc_result` aimed at us: raise `rpc_error`,
/// inflate `gzip_packed`, hand anything else back for typed decoding.
fn reply_payload(body: Vec<u8>) -> Result<Vec<u8>, InvocationError> {
    if body.len() < 4 {
        return Err(InvocationError::Deserialize("empty rpc_result payload".into()));
    }
    match u32::from_le_bytes(body[..4].try_into().unwrap()) {
        ID_RPC_ERROR => {
            let err = service::RpcError::from_bytes(&body)?;
            Err(InvocationError::Rpc(RpcError::from_raw(err.error_code, &err.error_message)))
        }
        ID_GZIP_PACKED => {
            let packed = service::GzipPacked::from_bytes(&body)?;
            reply_payload(inflate(&packed.packed_data)?)
        }
        _ => Ok(body),
    }
}

// ─── Utilities ────────────────────────────────────────────────────────────────

fn random_i64() -> i64 {
    let mut b = [0u8; 8];
    getrandom::getrandom(&mut b).expect("getrandom");
    i64::from_le_bytes(b)
}

/// Inflate a `gzip_packed` body, accepting either a gzip member or a bare
/// zlib stream.
fn inflate(data: &[u8]) -> Result<Vec<u8>, InvocationError> {
    use std::io::Read;

    let mut out = Vec::new();
    if flate2::read::GzDecoder::new(data).read_to_end(&mut out).is_ok() && !out.is_empty() {
        return Ok(out);
    }
    out.clear();
    flate2::read::ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|_| InvocationError::Deserialize("gzip_packed body would not inflate".into()))?;
    Ok(out)
}
