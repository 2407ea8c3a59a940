//! Client config loader (strict parsing).

pub mod schema;

use std::fs;

use secrecy::SecretString;

use avastream_core::error::{AvaError, Result};

pub use schema::{
    ApiSection, AvatarSection, ChannelSection, ClientConfig, MicrophoneConfig, SessionSection,
};

/// Environment variable that overrides `api.token`.
pub const TOKEN_ENV: &str = "AVASTREAM_TOKEN";

pub fn load_from_file(path: &str) -> Result<ClientConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| AvaError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ClientConfig> {
    let cfg: ClientConfig = serde_yaml::from_str(s)
        .map_err(|e| AvaError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Bearer token for the session API: env first, then the config file.
pub fn resolve_token(cfg: &ClientConfig) -> Result<SecretString> {
    let from_env = std::env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty());
    from_env
        .or_else(|| cfg.api.token.clone())
        .map(SecretString::from)
        .ok_or_else(|| {
            AvaError::BadRequest(format!("api token missing: set api.token or {TOKEN_ENV}"))
        })
}
