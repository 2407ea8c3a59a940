//! Inbound data-channel envelope (JSON).
//!
//! The envelope stores `pld` as `RawValue` so the payload is only parsed once
//! the type has been accepted. Unknown fields are tolerated: newer senders may
//! add fields without breaking this client.

use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::{AvaError, Result};

/// Acknowledgement code the avatar service uses for a successful command.
pub const COMMAND_OK: i64 = 1000;

/// One decoded data-channel frame.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    /// Protocol version.
    pub v: i64,
    /// Message kind (field name is `type` in JSON).
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Logical message id shared by every fragment of one message.
    pub mid: String,
    /// Fragment index within the logical message.
    #[serde(default)]
    pub idx: Option<u64>,
    /// Completion marker: set on the last fragment of a logical message.
    #[serde(default)]
    pub fin: Option<bool>,
    /// Payload, stored as raw JSON (lazy parsing).
    #[serde(default)]
    pub pld: Option<Box<RawValue>>,
}

/// `pld` of a `"chat"` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatPayload {
    pub text: String,
    pub from: String,
}

impl ChatPayload {
    /// Attribution comes from the payload only, never from the transport uid.
    pub fn is_from_user(&self) -> bool {
        self.from == "user"
    }
}

/// `pld` of a `"command"` envelope sent back by the avatar service.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandAck {
    pub cmd: String,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl CommandAck {
    pub fn is_ok(&self) -> bool {
        self.code.map_or(true, |c| c == COMMAND_OK)
    }
}

impl Envelope {
    /// Parse an envelope from JSON text.
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s)
            .map_err(|e| AvaError::BadRequest(format!("invalid envelope json: {e}")))
    }

    /// Parse the payload as chat text.
    pub fn chat_payload(&self) -> Result<ChatPayload> {
        self.payload()
    }

    /// Parse the payload as a command acknowledgement.
    pub fn command_ack(&self) -> Result<CommandAck> {
        self.payload()
    }

    pub fn is_final(&self) -> bool {
        self.fin.unwrap_or(false)
    }

    fn payload<T: for<'de> Deserialize<'de>>(&self) -> Result<T> {
        let raw = self
            .pld
            .as_ref()
            .ok_or_else(|| AvaError::BadRequest(format!("{} envelope requires pld", self.msg_type)))?;
        serde_json::from_str(raw.get())
            .map_err(|e| AvaError::BadRequest(format!("{} invalid pld: {e}", self.msg_type)))
    }
}

/// Decode one raw frame: UTF-8 first, then the JSON envelope.
pub fn decode_frame(frame: &[u8]) -> Result<Envelope> {
    let s = std::str::from_utf8(frame)
        .map_err(|e| AvaError::BadRequest(format!("frame is not utf8: {e}")))?;
    Envelope::from_json(s)
}
