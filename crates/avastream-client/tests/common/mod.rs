//! In-memory fakes for the session API and the real-time channel.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use avastream_client::api::{Avatar, Credentials, Language, Session, SessionApi, Voice};
use avastream_client::channel::{ListenerRegistry, MediaKind, RtcChannel, TrackId, Uid};
use avastream_client::config::MicrophoneConfig;
use avastream_core::error::{AvaError, Result};

pub fn session(id: &str) -> Session {
    Session {
        id: id.to_string(),
        credentials: Credentials {
            app_id: "app".into(),
            channel: format!("ch-{id}"),
            token: "rtc-token".into(),
            uid: 42,
        },
    }
}

#[derive(Default)]
pub struct FakeApi {
    pub created: Mutex<Vec<(String, u32)>>,
    pub closed: Mutex<Vec<String>>,
    pub fail_create: AtomicBool,
}

#[async_trait]
impl SessionApi for FakeApi {
    async fn create_session(&self, avatar_id: &str, duration_secs: u32) -> Result<Session> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(AvaError::Upstream("create_session: http 500".into()));
        }
        self.created.lock().unwrap().push((avatar_id.to_string(), duration_secs));
        Ok(session("s1"))
    }

    async fn close_session(&self, session_id: &str) -> Result<()> {
        self.closed.lock().unwrap().push(session_id.to_string());
        Ok(())
    }

    async fn list_languages(&self) -> Result<Vec<Language>> {
        Ok(vec![])
    }

    async fn list_voices(&self) -> Result<Vec<Voice>> {
        Ok(vec![])
    }

    async fn list_avatars(&self) -> Result<Vec<Avatar>> {
        Ok(vec![])
    }
}

/// Records every call; SDK callbacks are simulated through `registry.emit`.
#[derive(Default)]
pub struct FakeChannel {
    pub registry: ListenerRegistry,
    pub joined: AtomicBool,
    pub fail_join: AtomicBool,
    pub fail_leave: AtomicBool,
    pub fail_unpublish: AtomicBool,
    pub calls: Mutex<Vec<String>>,
    pub sent: Mutex<Vec<Bytes>>,
    next_track: AtomicU64,
}

impl FakeChannel {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent_json(&self) -> Vec<serde_json::Value> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|b| serde_json::from_slice(b).unwrap())
            .collect()
    }
}

#[async_trait]
impl RtcChannel for FakeChannel {
    fn is_joined(&self) -> bool {
        self.joined.load(Ordering::SeqCst)
    }

    async fn join(&self, creds: &Credentials) -> Result<()> {
        self.record(format!("join:{}", creds.channel));
        if self.fail_join.load(Ordering::SeqCst) {
            return Err(AvaError::Channel("join refused".into()));
        }
        self.joined.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn leave(&self) -> Result<()> {
        self.record("leave");
        self.joined.store(false, Ordering::SeqCst);
        if self.fail_leave.load(Ordering::SeqCst) {
            return Err(AvaError::Channel("leave failed".into()));
        }
        Ok(())
    }

    async fn publish_microphone(&self, cfg: &MicrophoneConfig) -> Result<TrackId> {
        self.record(format!("publish_mic:{}", cfg.encoder));
        Ok(TrackId(self.next_track.fetch_add(1, Ordering::SeqCst)))
    }

    async fn unpublish(&self, track: TrackId) -> Result<()> {
        self.record(format!("unpublish:{}", track.0));
        if self.fail_unpublish.load(Ordering::SeqCst) {
            return Err(AvaError::Channel("unpublish failed".into()));
        }
        Ok(())
    }

    async fn unpublish_all(&self) -> Result<()> {
        self.record("unpublish_all");
        Ok(())
    }

    async fn subscribe(&self, uid: Uid, media: MediaKind) -> Result<()> {
        self.record(format!("subscribe:{uid}:{media:?}"));
        Ok(())
    }

    async fn unsubscribe(&self, uid: Uid, media: MediaKind) -> Result<()> {
        self.record(format!("unsubscribe:{uid}:{media:?}"));
        Ok(())
    }

    async fn send_stream_message(&self, frame: Bytes) -> Result<()> {
        self.sent.lock().unwrap().push(frame);
        Ok(())
    }

    fn listeners(&self) -> &ListenerRegistry {
        &self.registry
    }
}
