use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, MockConfig, MockState, API_KEY};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header("x-api-key", API_KEY)
        .body(String::new())
        .unwrap()
}

fn delete(uri: &str) -> Request<String> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("x-api-key", API_KEY)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-api-key", API_KEY)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_key_is_rejected() {
    let resp = app()
        .oneshot(Request::builder().uri("/user/languages").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await, json!({"detail": "Missing API key"}));
}

#[tokio::test]
async fn wrong_key_is_rejected() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/user/languages")
                .header("x-api-key", "nope")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- translate ---

#[tokio::test]
async fn translate_without_tm_reports_zero_score() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/text/culturalize",
            json!({"text": "Hello there", "language": "French", "include_rationale": true}),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["translated_text"], "[French] Hello there");
    assert_eq!(body["metadata"]["word_count"], 2);
    assert_eq!(body["tm_match"]["score"], 0);
    assert!(body["rationale"].is_string());
    assert!(body.get("backtranslation").is_none());
}

#[tokio::test]
async fn translate_requires_text() {
    let resp = app()
        .oneshot(json_request("POST", "/text/culturalize", json!({"language": "French"})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn canned_translation_is_returned_verbatim() {
    let canned = json!({"translated_text": "Salut", "metadata": {"word_count": 1, "cost": 3}});
    let state = MockState::new(MockConfig::default().canned_translation("Hi", canned.clone()));
    let resp = app_with(state)
        .oneshot(json_request(
            "POST",
            "/text/culturalize",
            json!({"text": "Hi", "language": "French"}),
        ))
        .await
        .unwrap();

    assert_eq!(body_json(resp).await, canned);
}

#[tokio::test]
async fn configured_failure_can_be_plain_text() {
    let state = MockState::new(MockConfig::default().fail_translation(
        "boom",
        StatusCode::BAD_GATEWAY,
        "upstream exploded",
    ));
    let resp = app_with(state)
        .oneshot(json_request(
            "POST",
            "/text/culturalize",
            json!({"text": "boom", "language": "French"}),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "text/plain");
    assert_eq!(body_bytes(resp).await, "upstream exploded");
}

// --- journal ---

#[tokio::test]
async fn journal_records_query_headers_and_body() {
    let state = MockState::new(MockConfig::default());
    let app = app_with(state.clone());

    app.clone()
        .oneshot(get("/master-tm/fuzzy-search?query=Sign%20up&score_cutoff=70&target_lang=fr"))
        .await
        .unwrap();
    app.oneshot(json_request(
        "PATCH",
        "/user/languages/1/formality",
        json!({"formality": "informal"}),
    ))
    .await
    .unwrap();

    let requests = state.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].query["query"], "Sign up");
    assert_eq!(requests[0].query["score_cutoff"], "70");
    assert_eq!(requests[0].api_key.as_deref(), Some(API_KEY));
    assert_eq!(requests[0].body, Value::Null);
    assert_eq!(requests[1].body, json!({"formality": "informal"}));
    assert_eq!(state.requests_to("/user/languages/1/formality").len(), 1);
}

// --- languages ---

#[tokio::test]
async fn languages_have_numeric_ids() {
    let resp = app().oneshot(get("/user/languages")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["languages"][0]["id"], 1);
    assert_eq!(body["languages"][0]["language_code"], "fr");
}

#[tokio::test]
async fn updating_unknown_language_is_404() {
    let resp = app()
        .oneshot(json_request(
            "PATCH",
            "/user/languages/99/custom-style",
            json!({"custom_style": "Playful"}),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- translation memory ---

#[tokio::test]
async fn tm_lifecycle() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/master-tm/entries",
            json!({
                "source_text": "Sign up",
                "target_text": "S'inscrire",
                "source_language_code": "en",
                "target_language_code": "fr",
                "information_source": "manual"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert!(created.get("enabled").is_none());
    assert!(created.get("priority").is_none());

    // search
    let resp = app
        .clone()
        .oneshot(get("/master-tm/fuzzy-search?query=Sign%20up%20now&source_lang=en"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["matches"][0]["tm_id"], id.as_str());
    assert_eq!(body["matches"][0]["match_type"], "fuzzy");

    // translate now hits the entry exactly
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/text/culturalize",
            json!({"text": "Sign up", "language": "French", "language_code": "fr"}),
        ))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["translated_text"], "S'inscrire");
    assert_eq!(body["tm_match"]["score"], 100);
    assert_eq!(body["tm_match"]["top_matches"][0]["information_source"], "manual");

    // disable
    let resp = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/master-tm/entries/{id}"),
            json!({"enabled": false}),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await, json!({"success": true}));

    // stats
    let resp = app.clone().oneshot(get("/master-tm/stats")).await.unwrap();
    assert_eq!(
        body_json(resp).await,
        json!({"total": 1, "enabled": 0, "disabled": 1, "by_source": {"manual": 1}})
    );

    // enabled_only hides it
    let resp = app
        .clone()
        .oneshot(get("/master-tm/entries?enabled_only=true"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["total"], 0);

    // delete, then delete again
    let resp = app
        .clone()
        .oneshot(delete(&format!("/master-tm/entries/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = app
        .oneshot(delete(&format!("/master-tm/entries/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_tm_update_is_400() {
    let resp = app()
        .oneshot(json_request("PATCH", "/master-tm/entries/x", json!({})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- style guides ---

#[tokio::test]
async fn style_guide_lifecycle() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/style-guide",
            json!({"title": "Tone", "content": "Warm", "is_enabled": true}),
        ))
        .await
        .unwrap();
    let created = body_json(resp).await;
    assert_eq!(created["id"], 1);

    let resp = app
        .clone()
        .oneshot(json_request("PUT", "/style-guide/1", json!({"content": "Warmer"})))
        .await
        .unwrap();
    let updated = body_json(resp).await;
    assert_eq!(updated["title"], "Tone");
    assert_eq!(updated["content"], "Warmer");

    let resp = app.clone().oneshot(get("/style-guide/combined")).await.unwrap();
    let combined = body_json(resp).await;
    assert_eq!(combined["style_guide_count"], 1);
    assert!(combined["prompt"].as_str().unwrap().contains("Tone: Warmer"));

    let resp = app.clone().oneshot(delete("/style-guide/1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.oneshot(get("/style-guide")).await.unwrap();
    assert_eq!(body_json(resp).await, json!({"guides": []}));
}

#[tokio::test]
async fn updating_unknown_guide_is_404() {
    let resp = app()
        .oneshot(json_request("PUT", "/style-guide/abc", json!({"title": "x"})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn brand_voice_reports_absence() {
    let state = MockState::new(MockConfig::default().without_brand_voice());
    let resp = app_with(state).oneshot(get("/style-guide/prompt")).await.unwrap();
    assert_eq!(body_json(resp).await, json!({"exists": false}));
}
