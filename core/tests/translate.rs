//! Translation calls end to end against the mock server, including batch
//! fan-out and the status-to-error mapping as seen by a caller.

mod common;

use std::time::Duration;

use mock_server::{MockConfig, StatusCode};
use nativ::{ErrorKind, NativError, TranslateOptions};
use serde_json::json;

#[tokio::test]
async fn translate_reshapes_wire_response_and_sends_options() {
    let wire = json!({
        "translated_text": "Bonjour le monde",
        "metadata": {"word_count": 2, "cost": 10},
        "tm_match": {
            "score": 85,
            "match_type": "fuzzy",
            "top_matches": [{
                "tm_id": "tm1",
                "score": 85,
                "match_type": "fuzzy",
                "source_text": "Hello world",
                "target_text": "Bonjour le monde",
                "information_source": "manual"
            }]
        },
        "rationale": "Direct translation"
    });
    let (client, state) =
        common::start(MockConfig::default().canned_translation("Hello world", wire)).await;

    let options = TranslateOptions {
        context: Some("greeting".to_string()),
        formality: Some("formal".to_string()),
        ..Default::default()
    };
    let result = client.translate("Hello world", "French", &options).await.unwrap();

    assert_eq!(result.translated_text, "Bonjour le monde");
    assert_eq!(result.metadata.word_count, 2);
    assert_eq!(result.metadata.cost, 10.0);
    let tm = result.tm_match.expect("match with score 85 is kept");
    assert_eq!(tm.score, 85.0);
    assert_eq!(tm.top_matches.len(), 1);
    assert_eq!(result.rationale.as_deref(), Some("Direct translation"));

    let sent = state.requests_to("/text/culturalize");
    assert_eq!(sent.len(), 1);
    let request = &sent[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.body["text"], "Hello world");
    assert_eq!(request.body["language"], "French");
    assert_eq!(request.body["context"], "greeting");
    assert_eq!(request.body["formality"], "formal");
    assert_eq!(request.body["tool"], "api");
    assert_eq!(request.api_key.as_deref(), Some(mock_server::API_KEY));
    assert_eq!(request.user_agent.as_deref(), Some(nativ::transport::USER_AGENT));
    assert!(request
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("application/json")));
}

#[tokio::test]
async fn zero_score_match_is_omitted() {
    let (client, _state) = common::start(MockConfig::default()).await;

    let result = client
        .translate("Good morning", "German", &TranslateOptions::default())
        .await
        .unwrap();

    assert_eq!(result.translated_text, "[German] Good morning");
    assert!(result.tm_match.is_none());
    assert!(result.rationale.is_some());
    assert!(result.backtranslation.is_none());
}

#[tokio::test]
async fn backtranslation_is_returned_when_requested() {
    let (client, _state) = common::start(MockConfig::default()).await;
    let options = TranslateOptions {
        backtranslate: Some(true),
        include_rationale: Some(false),
        ..Default::default()
    };

    let result = client.translate("Thanks", "Spanish", &options).await.unwrap();

    assert_eq!(result.backtranslation.as_deref(), Some("Thanks"));
    assert!(result.rationale.is_none());
}

#[tokio::test]
async fn batch_runs_concurrently_and_keeps_input_order() {
    // Both calls must be in flight together to pass the rendezvous; "a" then
    // answers last.
    let config = MockConfig::default()
        .rendezvous(2)
        .translation_latency("a", Duration::from_millis(150));
    let (client, state) = common::start(config).await;

    let results = client
        .translate_batch(&["a", "b"], "French", &TranslateOptions::default())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].translated_text, "[French] a");
    assert_eq!(results[1].translated_text, "[French] b");
    assert_eq!(state.requests_to("/text/culturalize").len(), 2);
}

#[tokio::test]
async fn batch_fails_as_a_whole() {
    let config = MockConfig::default().fail_translation(
        "bad",
        StatusCode::PAYMENT_REQUIRED,
        r#"{"detail":"Insufficient credits"}"#,
    );
    let (client, _state) = common::start(config).await;

    let texts = vec!["fine".to_string(), "bad".to_string()];
    let err = client
        .translate_batch(&texts, "French", &TranslateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, NativError::InsufficientBalance(_)));
    assert_eq!(err.status(), Some(402));
}

#[tokio::test]
async fn service_statuses_map_to_error_kinds() {
    let cases = [
        (StatusCode::BAD_REQUEST, ErrorKind::Validation),
        (StatusCode::PAYMENT_REQUIRED, ErrorKind::InsufficientBalance),
        (StatusCode::FORBIDDEN, ErrorKind::Validation),
        (StatusCode::NOT_FOUND, ErrorKind::NotFound),
        (StatusCode::UNPROCESSABLE_ENTITY, ErrorKind::Validation),
        (StatusCode::TOO_MANY_REQUESTS, ErrorKind::RateLimit),
        (StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::Server),
        (StatusCode::SERVICE_UNAVAILABLE, ErrorKind::Server),
    ];
    let config = cases.iter().fold(MockConfig::default(), |config, (status, _)| {
        config.fail_translation(
            status.as_str(),
            *status,
            &format!(r#"{{"detail":"failed {}","code":{}}}"#, status.as_u16(), status.as_u16()),
        )
    });
    let (client, _state) = common::start(config).await;

    for (status, kind) in cases {
        let err = client
            .translate(status.as_str(), "French", &TranslateOptions::default())
            .await
            .unwrap_err();
        let code = status.as_u16();
        assert_eq!(err.kind(), Some(kind), "status {code}");
        assert_eq!(err.status(), Some(code));
        assert_eq!(
            err.body(),
            Some(&json!({"detail": format!("failed {code}"), "code": code}))
        );
        assert_eq!(err.api_error().unwrap().message, format!("failed {code}"));
    }
}

#[tokio::test]
async fn plain_text_error_body_is_captured_as_detail() {
    let config = MockConfig::default().fail_translation(
        "boom",
        StatusCode::BAD_GATEWAY,
        "upstream exploded",
    );
    let (client, _state) = common::start(config).await;

    let err = client
        .translate("boom", "French", &TranslateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, NativError::Server(_)));
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.body(), Some(&json!({"detail": "upstream exploded"})));
}

#[tokio::test]
async fn rejected_key_is_an_authentication_error() {
    let (client, _state) = common::start_with(
        MockConfig::default(),
        nativ::ClientConfig::new().api_key("wrong-key"),
    )
    .await;

    let err = client
        .translate("Hello", "French", &TranslateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, NativError::Authentication(_)));
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.body(), Some(&json!({"detail": "Invalid API key"})));
}

#[tokio::test]
async fn stalled_call_times_out_without_a_typed_kind() {
    let config = MockConfig::default().translation_latency("slow", Duration::from_secs(5));
    let (client, _state) = common::start_with(config, common::short_timeout(100)).await;

    let err = client
        .translate("slow", "French", &TranslateOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
    assert_eq!(err.kind(), None);
    assert_eq!(err.status(), None);
}
