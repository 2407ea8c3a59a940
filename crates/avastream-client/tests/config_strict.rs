#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use avastream_client::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
session:
  avatar_id: "dvp_Tristan_cloth2_1080P"
  duraton_minutes: 5 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.api.host, "https://openapi.akool.com");
    assert_eq!(cfg.session.avatar_id, "dvp_Tristan_cloth2_1080P");
    assert_eq!(cfg.session.duration_minutes, 10);
    assert_eq!(cfg.avatar.voice_id, "Xb7hH8MSUJpSbSDYk0k2");
    assert_eq!(cfg.avatar.language, "en");
    assert_eq!(cfg.avatar.mode, 2);
    assert_eq!(cfg.channel.max_frame_bytes, 1024);
    assert_eq!(cfg.microphone.encoder, "speech_low_quality");
    assert!(cfg.microphone.aec && cfg.microphone.ans && cfg.microphone.agc);
}

#[test]
fn wrong_version_is_unsupported() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn out_of_range_values_fail() {
    let cases = [
        "version: 1\nsession: { duration_minutes: 0 }\n",
        "version: 1\nsession: { duration_minutes: 500 }\n",
        "version: 1\navatar: { mode: 3 }\n",
        "version: 1\nchannel: { max_frame_bytes: 4096 }\n",
        "version: 1\napi: { host: \"openapi.akool.com\" }\n",
        "version: 1\napi: { timeout_ms: 10 }\n",
    ];
    for yaml in cases {
        let err = config::load_from_str(yaml).expect_err(yaml);
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST", "yaml={yaml}");
    }
}

#[test]
fn queue_size_key_is_unknown() {
    let err = config::load_from_str("version: 1\nchannel: { event_queue: 256 }\n")
        .expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn avatar_params_from_config() {
    let cfg = config::load_from_str(
        "version: 1\navatar: { voice_id: \"v1\", language: \"\", mode: 1 }\n",
    )
    .unwrap();
    let p = cfg.avatar.params();
    assert_eq!(p.vid.as_deref(), Some("v1"));
    assert_eq!(p.lang, None);
    assert_eq!(p.mode, Some(1));
}
