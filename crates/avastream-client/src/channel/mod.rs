//! Real-time channel adapter seam.
//!
//! The vendor RTC SDK (join/leave, publish/subscribe tracks, data messages,
//! network-quality callbacks) sits behind `RtcChannel`. Adapters push SDK
//! callbacks into their `ListenerRegistry`; the session orchestrator consumes
//! them as `ChannelEvent`s through the handle it received on join.

pub mod listeners;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

use avastream_core::error::Result;

use crate::api::Credentials;
use crate::config::MicrophoneConfig;

pub use listeners::{ListenerHandle, ListenerRegistry};

/// Remote participant id on the channel.
pub type Uid = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
    DataChannel,
}

/// Handle of a locally published track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackId(pub u64);

/// SDK quality grades (0 unknown, 1 excellent .. 6 down).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkQuality {
    pub uplink: u8,
    pub downlink: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RemoteVideoStats {
    pub receive_bitrate: u64,
    pub receive_frame_rate: u32,
    pub receive_width: u32,
    pub receive_height: u32,
    pub packet_loss_rate: f64,
    pub end_to_end_delay_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RemoteAudioStats {
    pub receive_bitrate: u64,
    pub packet_loss_rate: f64,
    pub end_to_end_delay_ms: u64,
}

/// Snapshot taken on each network-quality callback: the local link plus the
/// first remote user's network, video, and audio stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkStats {
    pub local_network: NetworkQuality,
    pub remote_network: NetworkQuality,
    pub video: RemoteVideoStats,
    pub audio: RemoteAudioStats,
}

/// Callbacks delivered by the SDK.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    UserPublished { uid: Uid, media: MediaKind },
    UserUnpublished { uid: Uid, media: MediaKind },
    /// One data-channel frame. `uid` is not trusted for attribution.
    StreamMessage { uid: Uid, body: Bytes },
    NetworkQuality(NetworkStats),
    TokenWillExpire,
    TokenDidExpire,
    Exception { code: i64, msg: String, uid: Uid },
}

#[async_trait]
pub trait RtcChannel: Send + Sync {
    fn is_joined(&self) -> bool;
    async fn join(&self, creds: &Credentials) -> Result<()>;
    async fn leave(&self) -> Result<()>;

    /// Create, publish, and return a microphone track.
    async fn publish_microphone(&self, cfg: &MicrophoneConfig) -> Result<TrackId>;
    /// Stop, close, and unpublish one local track.
    async fn unpublish(&self, track: TrackId) -> Result<()>;
    async fn unpublish_all(&self) -> Result<()>;

    async fn subscribe(&self, uid: Uid, media: MediaKind) -> Result<()>;
    async fn unsubscribe(&self, uid: Uid, media: MediaKind) -> Result<()>;

    /// Fire-and-forget data message.
    async fn send_stream_message(&self, frame: Bytes) -> Result<()>;

    fn listeners(&self) -> &ListenerRegistry;
}
