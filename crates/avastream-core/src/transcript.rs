//! Chat transcript and the streaming reassembly reducer.
//!
//! The transcript is an ordered map: `order` fixes render order (first
//! appearance, append-only) and `entries` gives keyed access for in-place
//! text accumulation. Both are private and only change together.
//!
//! Inbound ids are `"{type}_{mid}"`; local echo ids are `"msg-{unix_ms}"`.
//! The two namespaces never overlap, so a local echo can never absorb an
//! inbound fragment or the other way round.

use std::collections::HashMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::protocol::envelope::Envelope;
use crate::protocol::{PROTOCOL_VERSION, TYPE_CHAT};

const LOCAL_ID_PREFIX: &str = "msg-";

/// Stable identifier of one transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryId(String);

impl EntryId {
    /// Id of an inbound logical message.
    pub fn inbound(msg_type: &str, mid: &str) -> Self {
        Self(format!("{msg_type}_{mid}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for ids minted by [`Transcript::push_local`].
    pub fn is_local(&self) -> bool {
        self.0.starts_with(LOCAL_ID_PREFIX)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One logical chat message as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    id: EntryId,
    text: String,
    is_sent_by_me: bool,
    complete: bool,
}

impl TranscriptEntry {
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Fixed when the entry is created.
    pub fn is_sent_by_me(&self) -> bool {
        self.is_sent_by_me
    }

    /// Set by a `fin` fragment. Local echoes are complete from the start.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Text only grows.
    pub fn append_text(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }
}

/// Why a frame had no effect on the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    InvalidUtf8,
    MalformedEnvelope,
    UnsupportedVersion(i64),
    UnhandledType,
    MalformedPayload,
    AlreadyComplete,
}

impl DropReason {
    /// Label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            DropReason::InvalidUtf8 => "invalid_utf8",
            DropReason::MalformedEnvelope => "malformed_envelope",
            DropReason::UnsupportedVersion(_) => "unsupported_version",
            DropReason::UnhandledType => "unhandled_type",
            DropReason::MalformedPayload => "malformed_payload",
            DropReason::AlreadyComplete => "already_complete",
        }
    }
}

/// Outcome of applying one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Created(EntryId),
    Appended(EntryId),
    Dropped(DropReason),
}

impl Applied {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Applied::Created(_) => "created",
            Applied::Appended(_) => "appended",
            Applied::Dropped(reason) => reason.as_str(),
        }
    }
}

/// Ordered, append-only chat transcript.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    order: Vec<EntryId>,
    entries: HashMap<EntryId, TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: &EntryId) -> Option<&TranscriptEntry> {
        self.entries.get(id)
    }

    /// Keyed access for accumulating text in place.
    pub fn get_mut(&mut self, id: &EntryId) -> Option<&mut TranscriptEntry> {
        self.entries.get_mut(id)
    }

    /// Entries in render order.
    pub fn iter(&self) -> impl Iterator<Item = &TranscriptEntry> + '_ {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Ids in render order.
    pub fn ids(&self) -> &[EntryId] {
        &self.order
    }

    /// Insert a new entry at the end of render order.
    /// Returns `false` (and changes nothing) if the id is already present.
    pub fn append_new(&mut self, entry: TranscriptEntry) -> bool {
        if self.entries.contains_key(&entry.id) {
            return false;
        }
        self.order.push(entry.id.clone());
        self.entries.insert(entry.id.clone(), entry);
        true
    }

    /// Apply one raw data-channel frame. Never fails: anything that is not a
    /// valid v2 chat fragment is dropped without touching the transcript.
    pub fn apply_frame(&mut self, frame: &[u8]) -> Applied {
        let text = match std::str::from_utf8(frame) {
            Ok(s) => s,
            Err(_) => return dropped(DropReason::InvalidUtf8, None),
        };
        match Envelope::from_json(text) {
            Ok(env) => self.apply_envelope(&env),
            Err(_) => dropped(DropReason::MalformedEnvelope, None),
        }
    }

    /// Apply an already decoded envelope (see
    /// [`decode_frame`](crate::protocol::envelope::decode_frame)).
    pub fn apply_envelope(&mut self, env: &Envelope) -> Applied {
        if env.v != PROTOCOL_VERSION {
            return dropped(DropReason::UnsupportedVersion(env.v), Some(&env.mid));
        }
        if env.msg_type != TYPE_CHAT {
            return dropped(DropReason::UnhandledType, Some(&env.mid));
        }
        let pld = match env.chat_payload() {
            Ok(p) => p,
            Err(_) => return dropped(DropReason::MalformedPayload, Some(&env.mid)),
        };

        let id = EntryId::inbound(&env.msg_type, &env.mid);
        if let Some(entry) = self.entries.get_mut(&id) {
            if entry.complete {
                return dropped(DropReason::AlreadyComplete, Some(&env.mid));
            }
            entry.append_text(&pld.text);
            entry.complete = env.is_final();
            return Applied::Appended(id);
        }

        let entry = TranscriptEntry {
            id: id.clone(),
            is_sent_by_me: pld.is_from_user(),
            text: pld.text,
            complete: env.is_final(),
        };
        self.append_new(entry);
        tracing::trace!(id = %id, "transcript entry created");
        Applied::Created(id)
    }

    /// Insert a locally sent message (own echo) with an id from the current time.
    pub fn push_local(&mut self, text: &str) -> EntryId {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        self.push_local_at(now_ms, text)
    }

    /// Insert a locally sent message stamped `unix_ms`. Sends within the same
    /// millisecond get a `-{n}` suffix.
    pub fn push_local_at(&mut self, unix_ms: u64, text: &str) -> EntryId {
        let base = format!("{LOCAL_ID_PREFIX}{unix_ms}");
        let mut id = EntryId(base.clone());
        let mut n = 0u32;
        while self.entries.contains_key(&id) {
            n += 1;
            id = EntryId(format!("{base}-{n}"));
        }

        self.append_new(TranscriptEntry {
            id: id.clone(),
            text: text.to_string(),
            is_sent_by_me: true,
            complete: true,
        });
        id
    }
}

fn dropped(reason: DropReason, mid: Option<&str>) -> Applied {
    tracing::debug!(reason = reason.as_str(), mid = mid.unwrap_or("-"), "frame dropped");
    Applied::Dropped(reason)
}
