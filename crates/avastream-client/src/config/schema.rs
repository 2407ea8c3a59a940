use serde::Deserialize;

use avastream_core::error::{AvaError, Result};
use avastream_core::protocol::control::AvatarParams;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub version: u32,

    #[serde(default)]
    pub api: ApiSection,

    #[serde(default)]
    pub session: SessionSection,

    #[serde(default)]
    pub avatar: AvatarSection,

    #[serde(default)]
    pub channel: ChannelSection,

    #[serde(default)]
    pub microphone: MicrophoneConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: 1,
            api: ApiSection::default(),
            session: SessionSection::default(),
            avatar: AvatarSection::default(),
            channel: ChannelSection::default(),
            microphone: MicrophoneConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(AvaError::UnsupportedVersion);
        }

        self.api.validate()?;
        self.session.validate()?;
        self.avatar.validate()?;
        self.channel.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
    #[serde(default = "default_host")]
    pub host: String,

    /// Bearer token; `AVASTREAM_TOKEN` takes precedence.
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            token: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ApiSection {
    pub fn validate(&self) -> Result<()> {
        if !(self.host.starts_with("http://") || self.host.starts_with("https://")) {
            return Err(AvaError::BadRequest(
                "api.host must start with http:// or https://".into(),
            ));
        }
        if !(1000..=120000).contains(&self.timeout_ms) {
            return Err(AvaError::BadRequest(
                "api.timeout_ms must be between 1000 and 120000".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionSection {
    #[serde(default = "default_avatar_id")]
    pub avatar_id: String,

    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,

    /// Placeholder media shown before the remote video starts.
    #[serde(default = "default_avatar_video_url")]
    pub avatar_video_url: String,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            avatar_id: default_avatar_id(),
            duration_minutes: default_duration_minutes(),
            avatar_video_url: default_avatar_video_url(),
        }
    }
}

impl SessionSection {
    pub fn validate(&self) -> Result<()> {
        if self.avatar_id.trim().is_empty() {
            return Err(AvaError::BadRequest("session.avatar_id must not be empty".into()));
        }
        if !(1..=120).contains(&self.duration_minutes) {
            return Err(AvaError::BadRequest(
                "session.duration_minutes must be between 1 and 120".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AvatarSection {
    #[serde(default = "default_voice_id")]
    pub voice_id: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// 1 = retelling, 2 = dialogue.
    #[serde(default = "default_mode")]
    pub mode: u8,
}

impl Default for AvatarSection {
    fn default() -> Self {
        Self {
            voice_id: default_voice_id(),
            language: default_language(),
            mode: default_mode(),
        }
    }
}

impl AvatarSection {
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.mode, 1 | 2) {
            return Err(AvaError::BadRequest("avatar.mode must be 1 or 2".into()));
        }
        Ok(())
    }

    /// Parameters for the `set-params` command. Empty strings are left unset.
    pub fn params(&self) -> AvatarParams {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        AvatarParams {
            vid: non_empty(&self.voice_id),
            lang: non_empty(&self.language),
            mode: Some(self.mode),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelSection {
    /// Per data-message byte limit of the real-time channel.
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,
}

impl Default for ChannelSection {
    fn default() -> Self {
        Self {
            max_frame_bytes: default_max_frame_bytes(),
        }
    }
}

impl ChannelSection {
    pub fn validate(&self) -> Result<()> {
        if !(128..=1024).contains(&self.max_frame_bytes) {
            return Err(AvaError::BadRequest(
                "channel.max_frame_bytes must be between 128 and 1024".into(),
            ));
        }
        Ok(())
    }
}

/// Microphone capture settings handed to the channel adapter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MicrophoneConfig {
    #[serde(default = "default_encoder")]
    pub encoder: String,
    /// Acoustic echo cancellation.
    #[serde(default = "default_true")]
    pub aec: bool,
    /// Automatic noise suppression.
    #[serde(default = "default_true")]
    pub ans: bool,
    /// Automatic gain control.
    #[serde(default = "default_true")]
    pub agc: bool,
}

impl Default for MicrophoneConfig {
    fn default() -> Self {
        Self {
            encoder: default_encoder(),
            aec: true,
            ans: true,
            agc: true,
        }
    }
}

fn default_host() -> String {
    "https://openapi.akool.com".into()
}
fn default_timeout_ms() -> u64 {
    15000
}
fn default_avatar_id() -> String {
    "dvp_Tristan_cloth2_1080P".into()
}
fn default_duration_minutes() -> u32 {
    10
}
fn default_avatar_video_url() -> String {
    "https://static.website-files.org/assets/avatar/avatar/streaming_avatar/tristan_10s_silence.mp4"
        .into()
}
fn default_voice_id() -> String {
    "Xb7hH8MSUJpSbSDYk0k2".into()
}
fn default_language() -> String {
    "en".into()
}
fn default_mode() -> u8 {
    2
}
fn default_max_frame_bytes() -> usize {
    1024
}
fn default_encoder() -> String {
    "speech_low_quality".into()
}
fn default_true() -> bool {
    true
}
