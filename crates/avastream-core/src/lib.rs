//! avastream core: data-channel wire protocol, transcript reassembly, and the
//! shared error type.
//!
//! This crate carries no transport, HTTP, or runtime dependencies. The
//! transcript reducer is a synchronous function of (current transcript, next
//! frame) so it can be driven from any event loop the client chooses.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed inbound
//! frames are reported as a drop reason, never as a panic or an error that
//! could end the session.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;
pub mod transcript;

/// Shared result type.
pub use error::{AvaError, Result};
pub use transcript::{Applied, DropReason, EntryId, Transcript, TranscriptEntry};
