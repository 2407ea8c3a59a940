//! Session REST API: provisioning streaming sessions and listing the
//! selectable avatars, voices, and languages.
//!
//! `SessionApi` is the seam the session orchestrator depends on; `http`
//! provides the reqwest-backed implementation.

pub mod http;
pub mod types;

use async_trait::async_trait;

use avastream_core::error::Result;

pub use http::HttpSessionApi;
pub use types::{Avatar, Credentials, Language, Session, Voice};

#[async_trait]
pub trait SessionApi: Send + Sync {
    async fn create_session(&self, avatar_id: &str, duration_secs: u32) -> Result<Session>;
    async fn close_session(&self, session_id: &str) -> Result<()>;
    async fn list_languages(&self) -> Result<Vec<Language>>;
    async fn list_voices(&self) -> Result<Vec<Voice>>;
    async fn list_avatars(&self) -> Result<Vec<Avatar>>;
}

/// Everything the user can pick from before starting a session.
#[derive(Debug, Clone, Default)]
pub struct SelectableOptions {
    pub languages: Vec<Language>,
    pub voices: Vec<Voice>,
    pub avatars: Vec<Avatar>,
}

/// Fetch the three option lists concurrently.
pub async fn fetch_options(api: &dyn SessionApi) -> Result<SelectableOptions> {
    let (languages, voices, avatars) = futures_util::future::try_join3(
        api.list_languages(),
        api.list_voices(),
        api.list_avatars(),
    )
    .await?;

    Ok(SelectableOptions {
        languages,
        voices,
        avatars,
    })
}
