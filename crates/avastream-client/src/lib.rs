//! avastream client library entry.
//!
//! This crate wires the session REST API, the real-time channel adapter, the
//! avatar command helpers, and the transcript core into one session
//! orchestrator. It is consumed by the binary (`main.rs`) and by integration
//! tests.

pub mod api;
pub mod channel;
pub mod commands;
pub mod config;
pub mod obs;
pub mod preview;
pub mod session;
