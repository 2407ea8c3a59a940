//! reqwest-backed session API client.
//!
//! Every call forwards the bearer token, unwraps the `{code, msg, data}`
//! wrapper, and maps failures onto `AvaError`:
//! - HTTP 401/403 => `AuthFailed`
//! - other non-2xx, network, or decode failures => `Upstream`
//! - `code != 1000` => `ApiRejected`

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;

use avastream_core::error::{AvaError, Result};

use crate::api::types::{
    ApiResponse, AvatarList, CloseSessionReq, CreateSessionReq, LanguageList, API_OK,
};
use crate::api::{Avatar, Language, Session, SessionApi, Voice};
use crate::config::ApiSection;
use crate::obs::ClientMetrics;

const SESSION_CREATE: &str = "/api/open/v4/liveAvatar/session/create";
const SESSION_CLOSE: &str = "/api/open/v4/liveAvatar/session/close";
const LANGUAGE_LIST: &str = "/api/open/v3/language/list";
const VOICE_LIST: &str = "/api/open/v3/voice/list";
const AVATAR_LIST: &str = "/api/open/v4/liveAvatar/avatar/list";

pub struct HttpSessionApi {
    http: reqwest::Client,
    host: String,
    token: SecretString,
    metrics: Arc<ClientMetrics>,
}

impl HttpSessionApi {
    pub fn new(cfg: &ApiSection, token: SecretString, metrics: Arc<ClientMetrics>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| AvaError::Internal(format!("http client build failed: {e}")))?;

        Ok(Self {
            http,
            host: cfg.host.trim_end_matches('/').to_string(),
            token,
            metrics,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        op: &'static str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>> {
        let req = self
            .http
            .get(self.url(path))
            .query(query)
            .bearer_auth(self.token.expose_secret());
        self.call(op, req).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        op: &'static str,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        let req = self
            .http
            .post(self.url(path))
            .json(body)
            .bearer_auth(self.token.expose_secret());
        self.call(op, req).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        op: &'static str,
        req: reqwest::RequestBuilder,
    ) -> Result<Option<T>> {
        let started = Instant::now();
        let res = self.send(op, req).await;
        self.metrics
            .api_latency
            .observe(&[("op", op)], started.elapsed());

        let result = match &res {
            Ok(_) => "ok",
            Err(e) => e.client_code().as_str(),
        };
        self.metrics.api_calls.inc(&[("op", op), ("result", result)]);

        if let Err(e) = &res {
            tracing::warn!(op, error = %e, "session api call failed");
        }
        res
    }

    async fn send<T: DeserializeOwned>(
        &self,
        op: &'static str,
        req: reqwest::RequestBuilder,
    ) -> Result<Option<T>> {
        let resp = req
            .send()
            .await
            .map_err(|e| AvaError::Upstream(format!("{op}: network error: {e}")))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AvaError::AuthFailed);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AvaError::Upstream(format!("{op}: http {status}: {body}")));
        }

        let wrapped: ApiResponse<T> = resp
            .json()
            .await
            .map_err(|e| AvaError::Upstream(format!("{op}: invalid response: {e}")))?;

        if wrapped.code != API_OK {
            return Err(AvaError::ApiRejected {
                code: wrapped.code,
                msg: wrapped.msg,
            });
        }
        Ok(wrapped.data)
    }
}

fn require<T>(op: &str, data: Option<T>) -> Result<T> {
    data.ok_or_else(|| AvaError::Upstream(format!("{op}: response has no data")))
}

#[async_trait]
impl SessionApi for HttpSessionApi {
    async fn create_session(&self, avatar_id: &str, duration_secs: u32) -> Result<Session> {
        let body = CreateSessionReq {
            avatar_id,
            duration: duration_secs,
        };
        let session: Session = require(
            "create_session",
            self.post("create_session", SESSION_CREATE, &body).await?,
        )?;
        tracing::info!(session_id = %session.id, avatar_id, duration_secs, "session created");
        Ok(session)
    }

    async fn close_session(&self, session_id: &str) -> Result<()> {
        let _: Option<serde_json::Value> = self
            .post("close_session", SESSION_CLOSE, &CloseSessionReq { id: session_id })
            .await?;
        tracing::info!(session_id, "session closed");
        Ok(())
    }

    async fn list_languages(&self) -> Result<Vec<Language>> {
        let list: LanguageList =
            require("list_languages", self.get("list_languages", LANGUAGE_LIST, &[]).await?)?;
        Ok(list.lang_list)
    }

    async fn list_voices(&self) -> Result<Vec<Voice>> {
        require("list_voices", self.get("list_voices", VOICE_LIST, &[]).await?)
    }

    async fn list_avatars(&self) -> Result<Vec<Avatar>> {
        let list: AvatarList = require(
            "list_avatars",
            self.get("list_avatars", AVATAR_LIST, &[("page", "1"), ("size", "100")])
                .await?,
        )?;
        Ok(list.result)
    }
}
