use serde::{Deserialize, Serialize};

/// Business code the session API uses for success.
pub const API_OK: i64 = 1000;

/// Common response wrapper: `{"code": 1000, "msg": "...", "data": ...}`.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

/// Real-time channel credentials issued with a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "agora_app_id")]
    pub app_id: String,
    #[serde(rename = "agora_channel")]
    pub channel: String,
    #[serde(rename = "agora_token")]
    pub token: String,
    #[serde(rename = "agora_uid")]
    pub uid: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_id")]
    pub id: String,
    pub credentials: Credentials,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub lang_code: String,
    pub lang_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub voice_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub avatar_id: String,
    #[serde(default)]
    pub name: String,
    /// Preview media (image or looping video).
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateSessionReq<'a> {
    pub avatar_id: &'a str,
    pub duration: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct CloseSessionReq<'a> {
    pub id: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LanguageList {
    pub lang_list: Vec<Language>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AvatarList {
    pub result: Vec<Avatar>,
}
