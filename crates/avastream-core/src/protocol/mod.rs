//! Data-channel wire protocol.
//!
//! Every frame on the real-time channel's data-message facility is one UTF-8
//! JSON envelope: `{"v": 2, "type": ..., "mid": ..., "pld": {...}}`.
//! - `envelope`: inbound decoding (lazy `RawValue` payloads).
//! - `control`: outgoing chat and command frames, sized to the channel's
//!   per-message byte limit.
//!
//! Decoders are panic-free: malformed input is reported as `AvaError`, and the
//! transcript reducer turns that into a silent drop.

pub mod control;
pub mod envelope;

/// The only envelope version this client speaks.
pub const PROTOCOL_VERSION: i64 = 2;

/// Envelope type carrying chat text fragments.
pub const TYPE_CHAT: &str = "chat";

/// Envelope type carrying avatar commands and their acknowledgements.
pub const TYPE_COMMAND: &str = "command";
