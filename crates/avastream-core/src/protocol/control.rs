//! Outgoing frames: chat text for the avatar and avatar commands.
//!
//! The real-time channel caps a single data message, so chat text is split
//! into numbered fragments (`idx`, last one carries `fin: true`). Splits land
//! on char boundaries and the budget counts JSON escaping, so every encoded
//! frame stays within `max_frame_bytes`.

use bytes::Bytes;
use serde::Serialize;

use crate::error::{AvaError, Result};
use crate::protocol::{PROTOCOL_VERSION, TYPE_CHAT, TYPE_COMMAND};

/// Avatar voice/language/mode parameters (`set-params` command).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvatarParams {
    /// Voice id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vid: Option<String>,
    /// Language code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// 1 = retelling, 2 = dialogue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<u8>,
}

/// Command sent to the avatar over the data channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cmd", content = "data", rename_all = "kebab-case")]
pub enum Command {
    SetParams(AvatarParams),
    Interrupt,
}

#[derive(Serialize)]
struct OutFrame<'a, P: Serialize> {
    v: i64,
    #[serde(rename = "type")]
    msg_type: &'a str,
    mid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    idx: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fin: Option<bool>,
    pld: P,
}

#[derive(Serialize)]
struct ChatText<'a> {
    text: &'a str,
}

fn encode<P: Serialize>(frame: &OutFrame<'_, P>) -> Result<Vec<u8>> {
    serde_json::to_vec(frame).map_err(|e| AvaError::Internal(format!("json encode failed: {e}")))
}

/// Bytes a char occupies inside a JSON string literal.
fn escaped_len(c: char) -> usize {
    match c {
        '"' | '\\' | '\n' | '\r' | '\t' | '\u{08}' | '\u{0c}' => 2,
        c if (c as u32) < 0x20 => 6,
        c => c.len_utf8(),
    }
}

/// Encode `text` as one or more chat frames for message `mid`.
///
/// Empty text still yields a single (final) frame.
pub fn encode_chat_frames(mid: &str, text: &str, max_frame_bytes: usize) -> Result<Vec<Bytes>> {
    // Worst-case header: widest idx and `false` for fin.
    let overhead = encode(&OutFrame {
        v: PROTOCOL_VERSION,
        msg_type: TYPE_CHAT,
        mid,
        idx: Some(u64::MAX),
        fin: Some(false),
        pld: ChatText { text: "" },
    })?
    .len();

    let budget = max_frame_bytes.saturating_sub(overhead);
    if budget < 6 {
        return Err(AvaError::BadRequest(format!(
            "max_frame_bytes {max_frame_bytes} leaves no room for text (mid={mid})"
        )));
    }

    let mut chunks: Vec<&str> = Vec::new();
    let mut start = 0;
    let mut cost = 0;
    for (i, c) in text.char_indices() {
        let l = escaped_len(c);
        if cost + l > budget && i > start {
            chunks.push(&text[start..i]);
            start = i;
            cost = 0;
        }
        cost += l;
    }
    chunks.push(&text[start..]);

    let last = chunks.len() - 1;
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            encode(&OutFrame {
                v: PROTOCOL_VERSION,
                msg_type: TYPE_CHAT,
                mid,
                idx: Some(i as u64),
                fin: Some(i == last),
                pld: ChatText { text: chunk },
            })
            .map(Bytes::from)
        })
        .collect()
}

/// Encode a single command frame.
pub fn encode_command(mid: &str, cmd: &Command) -> Result<Bytes> {
    encode(&OutFrame {
        v: PROTOCOL_VERSION,
        msg_type: TYPE_COMMAND,
        mid,
        idx: None,
        fin: None,
        pld: cmd,
    })
    .map(Bytes::from)
}
