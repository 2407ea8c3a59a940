#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use avastream_client::api::{self, HttpSessionApi, SessionApi};
use avastream_client::config::ApiSection;
use avastream_client::obs::ClientMetrics;
use avastream_core::AvaError;

fn client(server: &MockServer) -> (HttpSessionApi, Arc<ClientMetrics>) {
    let cfg = ApiSection {
        host: server.uri(),
        token: None,
        timeout_ms: 5_000,
    };
    let metrics = Arc::new(ClientMetrics::default());
    let api = HttpSessionApi::new(&cfg, "test-token".to_string().into(), Arc::clone(&metrics))
        .expect("client");
    (api, metrics)
}

#[tokio::test]
async fn create_session_sends_bearer_and_parses_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/open/v4/liveAvatar/session/create"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({"avatar_id": "dvp_Tristan_cloth2_1080P", "duration": 600})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 1000,
            "msg": "OK",
            "data": {
                "_id": "sess-1",
                "status": 1,
                "credentials": {
                    "agora_app_id": "app",
                    "agora_channel": "room-1",
                    "agora_token": "rtc",
                    "agora_uid": 7
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, metrics) = client(&server);
    let s = api.create_session("dvp_Tristan_cloth2_1080P", 600).await.unwrap();
    assert_eq!(s.id, "sess-1");
    assert_eq!(s.credentials.channel, "room-1");
    assert_eq!(s.credentials.uid, 7);
    assert_eq!(
        metrics.api_calls.get(&[("op", "create_session"), ("result", "ok")]),
        1
    );
}

#[tokio::test]
async fn close_session_posts_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/open/v4/liveAvatar/session/close"))
        .and(body_json(json!({"id": "sess-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 1000, "msg": "OK"})))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _) = client(&server);
    api.close_session("sess-1").await.unwrap();
}

#[tokio::test]
async fn business_code_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/open/v4/liveAvatar/session/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 1101,
            "msg": "avatar not found"
        })))
        .mount(&server)
        .await;

    let (api, metrics) = client(&server);
    let err = api.create_session("nope", 60).await.unwrap_err();
    match &err {
        AvaError::ApiRejected { code, msg } => {
            assert_eq!(*code, 1101);
            assert_eq!(msg, "avatar not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.client_code().as_str(), "API_REJECTED");
    assert_eq!(
        metrics.api_calls.get(&[("op", "create_session"), ("result", "API_REJECTED")]),
        1
    );
}

#[tokio::test]
async fn unauthorized_maps_to_auth_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/open/v3/voice/list"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (api, _) = client(&server);
    let err = api.list_voices().await.unwrap_err();
    assert!(matches!(err, AvaError::AuthFailed), "got {err:?}");
}

#[tokio::test]
async fn server_error_maps_to_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/open/v3/language/list"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let (api, _) = client(&server);
    let err = api.list_languages().await.unwrap_err();
    assert_eq!(err.client_code().as_str(), "UPSTREAM");
}

#[tokio::test]
async fn missing_data_is_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/open/v4/liveAvatar/session/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 1000})))
        .mount(&server)
        .await;

    let (api, _) = client(&server);
    let err = api.create_session("a", 60).await.unwrap_err();
    assert_eq!(err.client_code().as_str(), "UPSTREAM");
}

#[tokio::test]
async fn fetch_options_lists_all_three() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/open/v3/language/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 1000,
            "data": {"lang_list": [{"lang_code": "en", "lang_name": "English"}]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/open/v3/voice/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 1000,
            "data": [{"voice_id": "v1", "name": "Ava"}, {"voice_id": "v2", "name": "Max"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/open/v4/liveAvatar/avatar/list"))
        .and(query_param("page", "1"))
        .and(query_param("size", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 1000,
            "data": {"result": [{"avatar_id": "a1", "name": "Tristan", "url": "https://cdn/a1.png"}]}
        })))
        .mount(&server)
        .await;

    let (api, _) = client(&server);
    let opts = api::fetch_options(&api).await.unwrap();
    assert_eq!(opts.languages.len(), 1);
    assert_eq!(opts.languages[0].lang_code, "en");
    assert_eq!(opts.voices.len(), 2);
    assert_eq!(opts.avatars[0].url, "https://cdn/a1.png");
}

#[tokio::test]
async fn fetch_options_fails_if_any_list_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/open/v3/language/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 1000,
            "data": {"lang_list": []}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/open/v3/voice/list"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/open/v4/liveAvatar/avatar/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 1000,
            "data": {"result": []}
        })))
        .mount(&server)
        .await;

    let (api, _) = client(&server);
    let err = api::fetch_options(&api).await.unwrap_err();
    assert!(matches!(err, AvaError::AuthFailed));
}
