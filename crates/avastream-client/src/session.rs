//! Streaming session orchestrator.
//!
//! A `StreamingSession` owns everything one live conversation acquires: the
//! API session, the channel join, the listener handle, the microphone track,
//! the transcript, and the latest network stats. It is driven through
//! `&mut self` from a single task, so every transcript mutation is applied to
//! completion before the next event is pulled.
//!
//! Lifecycle:
//! - `start`: create API session -> join channel -> set avatar params
//!   (a failed join closes the API session before returning the error)
//! - `pump` / `handle_event`: one channel event at a time
//! - `close`: release mic, unpublish, leave, close API session; every step
//!   runs even if an earlier one failed

use std::sync::Arc;

use tokio::sync::mpsc;

use avastream_core::error::{AvaError, Result};
use avastream_core::protocol::control::AvatarParams;
use avastream_core::protocol::envelope::{decode_frame, Envelope};
use avastream_core::protocol::{PROTOCOL_VERSION, TYPE_COMMAND};
use avastream_core::{Applied, EntryId, Transcript};

use crate::api::{Session, SessionApi};
use crate::channel::{ChannelEvent, ListenerHandle, MediaKind, NetworkStats, RtcChannel, TrackId};
use crate::commands;
use crate::config::{ClientConfig, MicrophoneConfig};
use crate::obs::ClientMetrics;

/// Per-session settings, usually taken from `ClientConfig`.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub avatar_id: String,
    pub duration_minutes: u32,
    pub params: AvatarParams,
    pub max_frame_bytes: usize,
    pub microphone: MicrophoneConfig,
}

impl SessionOptions {
    pub fn from_config(cfg: &ClientConfig) -> Self {
        Self {
            avatar_id: cfg.session.avatar_id.clone(),
            duration_minutes: cfg.session.duration_minutes,
            params: cfg.avatar.params(),
            max_frame_bytes: cfg.channel.max_frame_bytes,
            microphone: cfg.microphone.clone(),
        }
    }
}

/// What the caller should do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    Continue,
    /// Credentials expire soon (the SDK warns ~30s ahead).
    ExpiringSoon,
    /// Credentials expired: call `close`.
    Expired,
    /// The event stream ended.
    ChannelClosed,
}

pub struct StreamingSession {
    api: Arc<dyn SessionApi>,
    channel: Arc<dyn RtcChannel>,
    opts: SessionOptions,
    session: Session,
    listener: Option<ListenerHandle>,
    events: mpsc::UnboundedReceiver<ChannelEvent>,
    transcript: Transcript,
    mic: Option<TrackId>,
    stats: Option<NetworkStats>,
    expired: bool,
    metrics: Arc<ClientMetrics>,
}

impl StreamingSession {
    pub async fn start(
        api: Arc<dyn SessionApi>,
        channel: Arc<dyn RtcChannel>,
        opts: SessionOptions,
        metrics: Arc<ClientMetrics>,
    ) -> Result<Self> {
        let duration_secs = opts.duration_minutes.checked_mul(60).ok_or_else(|| {
            AvaError::BadRequest(format!(
                "duration_minutes {} is out of range",
                opts.duration_minutes
            ))
        })?;
        let session = api.create_session(&opts.avatar_id, duration_secs).await?;

        let (listener, events) = match join_channel(channel.as_ref(), &session).await {
            Ok(joined) => joined,
            Err(e) => {
                if let Err(close_err) = api.close_session(&session.id).await {
                    tracing::warn!(session_id = %session.id, error = %close_err, "close after failed join failed");
                }
                return Err(e);
            }
        };
        tracing::info!(session_id = %session.id, channel = %session.credentials.channel, "channel joined");

        let s = Self {
            api,
            channel,
            opts,
            session,
            listener: Some(listener),
            events,
            transcript: Transcript::new(),
            mic: None,
            stats: None,
            expired: false,
            metrics,
        };

        let sent = commands::set_avatar_params(s.channel.as_ref(), &s.opts.params).await;
        if let Err(e) = sent {
            if let Err(close_err) = s.close().await {
                tracing::warn!(error = %close_err, "teardown after failed set-params failed");
            }
            return Err(e);
        }
        Ok(s)
    }

    pub fn session_id(&self) -> &str {
        &self.session.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn network_stats(&self) -> Option<&NetworkStats> {
        self.stats.as_ref()
    }

    pub fn mic_enabled(&self) -> bool {
        self.mic.is_some()
    }

    pub fn avatar_params(&self) -> &AvatarParams {
        &self.opts.params
    }

    /// Echo `text` into the transcript, then send it to the avatar.
    /// The echo stays even if the send fails.
    pub async fn send_message(&mut self, text: &str) -> Result<EntryId> {
        self.ensure_live()?;
        let id = self.transcript.push_local(text);
        let n = commands::send_message_to_avatar(
            self.channel.as_ref(),
            id.as_str(),
            text,
            self.opts.max_frame_bytes,
        )
        .await?;
        self.metrics.frames_sent.add(&[("kind", "chat")], n as u64);
        Ok(id)
    }

    pub async fn set_avatar_params(&mut self, params: AvatarParams) -> Result<()> {
        self.ensure_live()?;
        commands::set_avatar_params(self.channel.as_ref(), &params).await?;
        self.metrics.frames_sent.inc(&[("kind", "set_params")]);
        self.opts.params = params;
        Ok(())
    }

    pub async fn interrupt(&self) -> Result<()> {
        self.ensure_live()?;
        commands::interrupt_response(self.channel.as_ref()).await?;
        self.metrics.frames_sent.inc(&[("kind", "interrupt")]);
        Ok(())
    }

    /// Enable the microphone if off, disable it if on. Returns the new state.
    pub async fn toggle_mic(&mut self) -> Result<bool> {
        match self.mic.take() {
            Some(track) => {
                if let Err(e) = self.channel.unpublish(track).await {
                    // still ours: `close` retries it
                    self.mic = Some(track);
                    return Err(e);
                }
                tracing::info!(session_id = %self.session.id, "microphone disabled");
                Ok(false)
            }
            None => {
                self.ensure_live()?;
                let track = self.channel.publish_microphone(&self.opts.microphone).await?;
                self.mic = Some(track);
                tracing::info!(session_id = %self.session.id, "microphone enabled");
                Ok(true)
            }
        }
    }

    /// Wait for the next channel event and handle it.
    pub async fn pump(&mut self) -> Result<SessionSignal> {
        match self.events.recv().await {
            Some(ev) => self.handle_event(ev).await,
            None => Ok(SessionSignal::ChannelClosed),
        }
    }

    pub async fn handle_event(&mut self, ev: ChannelEvent) -> Result<SessionSignal> {
        match ev {
            ChannelEvent::StreamMessage { body, .. } => {
                self.on_stream_message(&body);
            }
            ChannelEvent::UserPublished { uid, media } => {
                if media != MediaKind::DataChannel {
                    tracing::debug!(uid, ?media, "remote user published");
                    self.channel.subscribe(uid, media).await?;
                }
            }
            ChannelEvent::UserUnpublished { uid, media } => {
                tracing::debug!(uid, ?media, "remote user unpublished");
                self.channel.unsubscribe(uid, media).await?;
            }
            ChannelEvent::NetworkQuality(stats) => {
                self.stats = Some(stats);
            }
            ChannelEvent::TokenWillExpire => {
                tracing::warn!(session_id = %self.session.id, "session will expire in 30s");
                return Ok(SessionSignal::ExpiringSoon);
            }
            ChannelEvent::TokenDidExpire => {
                tracing::warn!(session_id = %self.session.id, "session expired");
                self.expired = true;
                return Ok(SessionSignal::Expired);
            }
            ChannelEvent::Exception { code, msg, uid } => {
                tracing::warn!(code, msg = %msg, uid, "channel exception");
            }
        }
        Ok(SessionSignal::Continue)
    }

    fn on_stream_message(&mut self, body: &[u8]) {
        let applied = match decode_frame(body) {
            Ok(env) => {
                if env.v == PROTOCOL_VERSION && env.msg_type == TYPE_COMMAND {
                    log_command_ack(&env);
                }
                self.transcript.apply_envelope(&env)
            }
            Err(_) => self.transcript.apply_frame(body),
        };
        self.metrics.frames.inc(&[("outcome", applied.as_str())]);
        if let Applied::Created(id) = &applied {
            tracing::debug!(session_id = %self.session.id, id = %id, "transcript entry added");
        }
    }

    fn ensure_live(&self) -> Result<()> {
        if self.expired {
            return Err(AvaError::SessionExpired);
        }
        if !self.channel.is_joined() {
            return Err(AvaError::InvalidState("channel is not joined".into()));
        }
        Ok(())
    }

    /// Tear the session down. The transcript is discarded with `self`.
    pub async fn close(mut self) -> Result<()> {
        let mut first_err: Option<AvaError> = None;
        let mut keep = |res: Result<()>, step: &str| {
            if let Err(e) = res {
                tracing::warn!(step, error = %e, "teardown step failed");
                first_err.get_or_insert(e);
            }
        };

        // Stop listening first so nothing mutates state mid-teardown.
        self.listener.take();
        self.events.close();

        if let Some(track) = self.mic.take() {
            keep(self.channel.unpublish(track).await, "unpublish_mic");
        }
        keep(self.channel.unpublish_all().await, "unpublish_all");
        keep(self.channel.leave().await, "leave");
        keep(self.api.close_session(&self.session.id).await, "close_session");

        tracing::info!(session_id = %self.session.id, entries = self.transcript.len(), "session torn down");
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

async fn join_channel(
    channel: &dyn RtcChannel,
    session: &Session,
) -> Result<(ListenerHandle, mpsc::UnboundedReceiver<ChannelEvent>)> {
    if channel.is_joined() {
        channel.leave().await?;
    }
    // Listen before joining so no early callback is missed; on a failed join
    // the handle drops here and the listener goes with it.
    let (handle, rx) = channel.listeners().subscribe();
    channel.join(&session.credentials).await?;
    Ok((handle, rx))
}

fn log_command_ack(env: &Envelope) {
    match env.command_ack() {
        Ok(ack) if !ack.is_ok() => {
            tracing::warn!(mid = %env.mid, cmd = %ack.cmd, code = ?ack.code, msg = ?ack.msg, "avatar command rejected");
        }
        Ok(ack) => tracing::debug!(mid = %env.mid, cmd = %ack.cmd, "avatar command acknowledged"),
        Err(_) => {}
    }
}
