//! Top-level facade crate for avastream.
//!
//! Re-exports the transcript/protocol core and the session client so users can
//! depend on a single crate.

pub mod core {
    pub use avastream_core::*;
}

pub mod client {
    pub use avastream_client::*;
}

pub use avastream_client::session::{SessionOptions, SessionSignal, StreamingSession};
pub use avastream_core::{AvaError, Result, Transcript, TranscriptEntry};
