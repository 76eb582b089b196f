//! In-memory stand-in for the Nativ API.
//!
//! Serves the same routes and wire shapes as the real service with just
//! enough behavior to drive the client end to end. Every request is written
//! to a journal (method, path, query, interesting headers, JSON body or
//! multipart fields) so tests can assert what actually went over the wire.
//! Translate calls can be given canned responses, failures and latency, and
//! can be made to wait for each other to prove they run concurrently.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{header, HeaderMap},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Barrier, sync::RwLock};
use uuid::Uuid;

pub use axum::http::StatusCode;

/// Key accepted by a server built with [`MockConfig::default`].
pub const API_KEY: &str = "test-key";

/// Placeholder payload returned for generated images ("image", base64).
pub const IMAGE_BASE64: &str = "aW1hZ2U=";

const BARRIER_WAIT: Duration = Duration::from_secs(5);

/// A response the mock returns verbatim instead of doing its own work.
#[derive(Clone, Debug)]
pub struct Failure {
    pub status: StatusCode,
    /// Sent as `application/json` when it parses, `text/plain` otherwise.
    pub body: String,
}

#[derive(Clone, Debug)]
pub struct MockConfig {
    pub api_key: String,
    pub brand_voice: Option<String>,
    /// Translate responses keyed by input text.
    canned: HashMap<String, Value>,
    /// Translate failures keyed by input text.
    failures: HashMap<String, Failure>,
    /// Extra delay before answering a translate call, keyed by input text.
    latency: HashMap<String, Duration>,
    /// Translate calls wait until this many are in flight together.
    barrier: Option<usize>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            api_key: API_KEY.to_string(),
            brand_voice: Some("Friendly, concise, never sarcastic.".to_string()),
            canned: HashMap::new(),
            failures: HashMap::new(),
            latency: HashMap::new(),
            barrier: None,
        }
    }
}

impl MockConfig {
    pub fn canned_translation(mut self, text: &str, response: Value) -> Self {
        self.canned.insert(text.to_string(), response);
        self
    }

    pub fn fail_translation(mut self, text: &str, status: StatusCode, body: &str) -> Self {
        self.failures.insert(
            text.to_string(),
            Failure {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    pub fn translation_latency(mut self, text: &str, delay: Duration) -> Self {
        self.latency.insert(text.to_string(), delay);
        self
    }

    pub fn rendezvous(mut self, calls: usize) -> Self {
        self.barrier = Some(calls);
        self
    }

    pub fn without_brand_voice(mut self) -> Self {
        self.brand_voice = None;
        self
    }
}

/// One request as the mock received it.
#[derive(Clone, Debug, Serialize)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub api_key: Option<String>,
    pub user_agent: Option<String>,
    pub content_type: Option<String>,
    /// JSON body, multipart fields as an object, or `null`.
    pub body: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TmRecord {
    pub id: String,
    pub source_text: String,
    pub target_text: String,
    pub source_language_code: String,
    pub target_language_code: String,
    pub information_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    /// Left out of responses until explicitly set, like the real service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

impl TmRecord {
    fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// Style guides use numeric ids on the wire.
#[derive(Clone, Debug, Serialize)]
pub struct GuideRecord {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub is_enabled: bool,
    pub display_order: u64,
    pub user_id: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct LanguageRecord {
    pub id: u64,
    pub language: String,
    pub language_code: String,
    pub formality: Option<String>,
    pub custom_style: Option<String>,
}

pub struct MockState {
    config: MockConfig,
    barrier: Option<Barrier>,
    journal: Mutex<Vec<RecordedRequest>>,
    tm: RwLock<Vec<TmRecord>>,
    guides: RwLock<BTreeMap<u64, GuideRecord>>,
    next_guide_id: AtomicU64,
    languages: RwLock<Vec<LanguageRecord>>,
}

pub type Shared = Arc<MockState>;

impl MockState {
    pub fn new(config: MockConfig) -> Shared {
        let languages = vec![
            LanguageRecord {
                id: 1,
                language: "French".to_string(),
                language_code: "fr".to_string(),
                formality: Some("formal".to_string()),
                custom_style: None,
            },
            LanguageRecord {
                id: 2,
                language: "German".to_string(),
                language_code: "de".to_string(),
                formality: None,
                custom_style: None,
            },
        ];
        Arc::new(Self {
            barrier: config.barrier.map(Barrier::new),
            config,
            journal: Mutex::new(Vec::new()),
            tm: RwLock::new(Vec::new()),
            guides: RwLock::new(BTreeMap::new()),
            next_guide_id: AtomicU64::new(1),
            languages: RwLock::new(languages),
        })
    }

    /// Everything received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.journal
            .lock()
            .map(|journal| journal.clone())
            .unwrap_or_default()
    }

    /// Requests received for `path`.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub async fn seed_tm(&self, record: TmRecord) {
        self.tm.write().await.push(record);
    }

    fn record(&self, request: RecordedRequest) {
        if let Ok(mut journal) = self.journal.lock() {
            journal.push(request);
        }
    }
}

pub fn app() -> Router {
    app_with(MockState::new(MockConfig::default()))
}

pub fn app_with(state: Shared) -> Router {
    Router::new()
        .route("/text/culturalize", post(translate))
        .route("/text/extract", post(extract_text))
        .route("/text/feedback", post(submit_feedback))
        .route("/image/culturalize", post(culturalize_image))
        .route("/image/inspect", post(inspect_image))
        .route("/user/languages", get(list_languages))
        .route("/user/languages/{id}/formality", patch(update_formality))
        .route("/user/languages/{id}/custom-style", patch(update_custom_style))
        .route("/master-tm/fuzzy-search", get(search_tm))
        .route("/master-tm/entries", get(list_tm_entries).post(add_tm_entry))
        .route(
            "/master-tm/entries/{id}",
            patch(update_tm_entry).delete(delete_tm_entry),
        )
        .route("/master-tm/stats", get(tm_stats))
        .route("/style-guide", get(list_guides).post(create_guide))
        .route("/style-guide/prompt", get(brand_voice))
        .route("/style-guide/combined", get(combined_prompt))
        .route("/style-guide/{id}", put(update_guide).delete(delete_guide))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

pub async fn run_with(listener: TcpListener, state: Shared) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(state)).await
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Middleware
// ---------------------------------------------------------------------------

async fn require_api_key(State(state): State<Shared>, req: Request, next: Next) -> Response {
    match header_str(req.headers(), "x-api-key") {
        Some(key) if key == state.config.api_key => next.run(req).await,
        Some(_) => detail(StatusCode::UNAUTHORIZED, "Invalid API key"),
        None => detail(StatusCode::UNAUTHORIZED, "Missing API key"),
    }
}

async fn record_request(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(_) => return detail(StatusCode::BAD_REQUEST, "unreadable body"),
    };
    let content_type = header_str(&parts.headers, "content-type");
    let recorded_body = match content_type.as_deref() {
        Some(ct) if ct.starts_with("multipart/form-data") => {
            multipart_summary(ct, bytes.clone()).await
        }
        _ => serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    };
    let query = Query::<BTreeMap<String, String>>::try_from_uri(&parts.uri)
        .map(|Query(q)| q)
        .unwrap_or_default();

    state.record(RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query,
        api_key: header_str(&parts.headers, "x-api-key"),
        user_agent: header_str(&parts.headers, "user-agent"),
        content_type,
        body: recorded_body,
    });

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// Multipart fields as a JSON object; file fields become
/// `{filename, content_type, size}`.
async fn multipart_summary(content_type: &str, bytes: axum::body::Bytes) -> Value {
    let req = match axum::http::Request::builder()
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(bytes))
    {
        Ok(req) => req,
        Err(_) => return Value::Null,
    };
    let Ok(form) = read_form(req).await else {
        return Value::Null;
    };
    let mut summary = serde_json::Map::new();
    for (name, field) in form.fields {
        summary.insert(name, Value::String(field));
    }
    for (name, file) in form.files {
        summary.insert(
            name,
            json!({
                "filename": file.filename,
                "content_type": file.content_type,
                "size": file.data.len(),
            }),
        );
    }
    Value::Object(summary)
}

// ---------------------------------------------------------------------------
// Multipart helpers
// ---------------------------------------------------------------------------

struct UploadedFile {
    filename: String,
    content_type: String,
    data: Vec<u8>,
}

#[derive(Default)]
struct Form {
    fields: BTreeMap<String, String>,
    files: BTreeMap<String, UploadedFile>,
}

impl Form {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

async fn read_form(req: Request) -> Result<Form, Response> {
    let mut multipart = Multipart::from_request(req, &())
        .await
        .map_err(IntoResponse::into_response)?;
    let mut form = Form::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(IntoResponse::into_response)?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(filename) => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(IntoResponse::into_response)?;
                form.files.insert(
                    name,
                    UploadedFile {
                        filename,
                        content_type,
                        data: data.to_vec(),
                    },
                );
            }
            None => {
                let value = field.text().await.map_err(IntoResponse::into_response)?;
                form.fields.insert(name, value);
            }
        }
    }
    Ok(form)
}

fn require_file(form: &Form) -> Result<&UploadedFile, Response> {
    form.files
        .get("file")
        .ok_or_else(|| detail(StatusCode::UNPROCESSABLE_ENTITY, "file is required"))
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

fn failure_response(failure: &Failure) -> Response {
    match serde_json::from_str::<Value>(&failure.body) {
        Ok(body) => (failure.status, Json(body)).into_response(),
        Err(_) => (
            failure.status,
            [(header::CONTENT_TYPE, "text/plain")],
            failure.body.clone(),
        )
            .into_response(),
    }
}

async fn translate(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let Some(text) = body.get("text").and_then(Value::as_str) else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "text is required");
    };
    let Some(language) = body.get("language").and_then(Value::as_str) else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "language is required");
    };

    if let Some(barrier) = &state.barrier {
        if tokio::time::timeout(BARRIER_WAIT, barrier.wait()).await.is_err() {
            return detail(StatusCode::GATEWAY_TIMEOUT, "peer requests never arrived");
        }
    }
    if let Some(delay) = state.config.latency.get(text) {
        tokio::time::sleep(*delay).await;
    }
    if let Some(failure) = state.config.failures.get(text) {
        return failure_response(failure);
    }
    if let Some(canned) = state.config.canned.get(text) {
        return Json(canned.clone()).into_response();
    }

    let target_code = body
        .get("language_code")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let exact = state
        .tm
        .read()
        .await
        .iter()
        .find(|e| {
            e.is_enabled()
                && e.source_text == text
                && (target_code.is_empty() || e.target_language_code == target_code)
        })
        .cloned();

    let word_count = text.split_whitespace().count();
    let (translated_text, tm_match) = match exact {
        Some(entry) => (
            entry.target_text.clone(),
            json!({
                "score": 100,
                "match_type": "exact",
                "source_text": entry.source_text,
                "target_text": entry.target_text,
                "tm_source": entry.information_source,
                "tm_source_name": entry.source_name,
                "tm_id": entry.id,
                "top_matches": [{
                    "tm_id": entry.id,
                    "score": 100,
                    "match_type": "exact",
                    "source_text": entry.source_text,
                    "target_text": entry.target_text,
                    "information_source": entry.information_source,
                }],
            }),
        ),
        None => (
            format!("[{language}] {text}"),
            json!({ "score": 0, "match_type": "none", "top_matches": [] }),
        ),
    };

    let mut response = json!({
        "translated_text": translated_text,
        "metadata": { "word_count": word_count, "cost": word_count * 5 },
        "tm_match": tm_match,
    });
    if body["include_rationale"].as_bool().unwrap_or(false) {
        response["rationale"] = json!(format!("Adapted for a {language}-speaking audience"));
    }
    if body["backtranslate"].as_bool().unwrap_or(false) {
        response["backtranslation"] = json!(text);
    }
    Json(response).into_response()
}

async fn extract_text(req: Request) -> Response {
    let form = match read_form(req).await {
        Ok(form) => form,
        Err(rejection) => return rejection,
    };
    match require_file(&form) {
        Ok(file) => Json(json!({
            "extracted_text": format!("{} bytes of text from {}", file.data.len(), file.filename)
        }))
        .into_response(),
        Err(rejection) => rejection,
    }
}

async fn submit_feedback(Json(body): Json<Value>) -> Response {
    Json(json!({
        "success": true,
        "feedback_id": Uuid::new_v4().to_string(),
        "approved": body.get("approved").cloned().unwrap_or(Value::Null),
    }))
    .into_response()
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

async fn culturalize_image(req: Request) -> Response {
    let form = match read_form(req).await {
        Ok(form) => form,
        Err(rejection) => return rejection,
    };
    if let Err(rejection) = require_file(&form) {
        return rejection;
    }
    if form.field("text").is_none() || form.field("language_code").is_none() {
        return detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "text and language_code are required",
        );
    }
    let num_images: usize = form
        .field("num_images")
        .and_then(|n| n.parse().ok())
        .unwrap_or(1);
    let images: Vec<Value> = (0..num_images)
        .map(|_| json!({ "image_base64": IMAGE_BASE64 }))
        .collect();
    Json(json!({
        "images": images,
        "metadata": { "cost": num_images * 25, "num_images": num_images },
    }))
    .into_response()
}

async fn inspect_image(req: Request) -> Response {
    let form = match read_form(req).await {
        Ok(form) => form,
        Err(rejection) => return rejection,
    };
    if let Err(rejection) = require_file(&form) {
        return rejection;
    }
    let affected: Vec<Value> = form
        .field("countries")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|country| {
            json!({
                "country": country,
                "issue": format!("Imagery may be misread in {country}"),
                "suggestion": "Use a neutral background",
            })
        })
        .collect();
    let verdict = if affected.is_empty() { "SAFE" } else { "NOT SAFE" };
    Json(json!({ "verdict": verdict, "affected_countries": affected })).into_response()
}

// ---------------------------------------------------------------------------
// Languages
// ---------------------------------------------------------------------------

async fn list_languages(State(state): State<Shared>) -> Json<Value> {
    let languages = state.languages.read().await;
    Json(json!({ "languages": *languages }))
}

#[derive(Deserialize)]
struct FormalityUpdate {
    formality: String,
}

#[derive(Deserialize)]
struct CustomStyleUpdate {
    custom_style: Option<String>,
}

async fn update_language<F>(state: &MockState, id: &str, apply: F) -> Response
where
    F: FnOnce(&mut LanguageRecord),
{
    let mut languages = state.languages.write().await;
    match languages.iter_mut().find(|l| l.id.to_string() == id) {
        Some(language) => {
            apply(language);
            Json(json!({ "success": true })).into_response()
        }
        None => detail(StatusCode::NOT_FOUND, "Language not found"),
    }
}

async fn update_formality(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(input): Json<FormalityUpdate>,
) -> Response {
    update_language(&state, &id, |l| l.formality = Some(input.formality)).await
}

async fn update_custom_style(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(input): Json<CustomStyleUpdate>,
) -> Response {
    update_language(&state, &id, |l| l.custom_style = input.custom_style).await
}

// ---------------------------------------------------------------------------
// Translation memory
// ---------------------------------------------------------------------------

/// Crude similarity: exact 100, containment 80, otherwise shared-word ratio.
fn similarity(query: &str, candidate: &str) -> u64 {
    let (q, c) = (query.to_lowercase(), candidate.to_lowercase());
    if q == c {
        return 100;
    }
    if c.contains(&q) || q.contains(&c) {
        return 80;
    }
    let query_words: Vec<&str> = q.split_whitespace().collect();
    if query_words.is_empty() {
        return 0;
    }
    let shared = query_words.iter().filter(|w| c.split_whitespace().any(|cw| cw == **w)).count();
    (shared * 60 / query_words.len()) as u64
}

async fn search_tm(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(query) = params.get("query") else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "query is required");
    };
    let cutoff: f64 = params
        .get("score_cutoff")
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0);
    let limit: usize = params
        .get("limit")
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);
    let source_lang = params.get("source_lang");
    let target_lang = params.get("target_lang");

    let tm = state.tm.read().await;
    let mut matches: Vec<(u64, &TmRecord)> = tm
        .iter()
        .filter(|e| e.is_enabled())
        .filter(|e| source_lang.map_or(true, |l| *l == e.source_language_code))
        .filter(|e| target_lang.map_or(true, |l| *l == e.target_language_code))
        .map(|e| (similarity(query, &e.source_text), e))
        .filter(|(score, _)| *score > 0 && *score as f64 >= cutoff)
        .collect();
    matches.sort_by(|a, b| b.0.cmp(&a.0));

    let matches: Vec<Value> = matches
        .into_iter()
        .take(limit)
        .map(|(score, e)| {
            json!({
                "tm_id": e.id,
                "score": score,
                "match_type": if score == 100 { "exact" } else { "fuzzy" },
                "source_text": e.source_text,
                "target_text": e.target_text,
                "information_source": e.information_source,
                "source_name": e.source_name,
            })
        })
        .collect();
    Json(json!({ "matches": matches })).into_response()
}

async fn list_tm_entries(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let limit: usize = params.get("limit").and_then(|s| s.parse().ok()).unwrap_or(100);
    let offset: usize = params.get("offset").and_then(|s| s.parse().ok()).unwrap_or(0);
    let enabled_only = params.get("enabled_only").is_some_and(|v| v == "true");
    let search = params.get("search").map(|s| s.to_lowercase());

    let tm = state.tm.read().await;
    let filtered: Vec<&TmRecord> = tm
        .iter()
        .filter(|e| params.get("source_lang").map_or(true, |l| *l == e.source_language_code))
        .filter(|e| params.get("target_lang").map_or(true, |l| *l == e.target_language_code))
        .filter(|e| {
            params
                .get("information_source")
                .map_or(true, |s| *s == e.information_source)
        })
        .filter(|e| !enabled_only || e.is_enabled())
        .filter(|e| {
            search.as_ref().map_or(true, |s| {
                e.source_text.to_lowercase().contains(s) || e.target_text.to_lowercase().contains(s)
            })
        })
        .collect();
    let page: Vec<&TmRecord> = filtered.iter().skip(offset).take(limit).copied().collect();
    Json(json!({
        "entries": page,
        "total": filtered.len(),
        "offset": offset,
        "limit": limit,
    }))
}

#[derive(Deserialize)]
struct NewTmEntry {
    source_text: String,
    target_text: String,
    source_language_code: String,
    target_language_code: String,
    information_source: String,
    source_name: Option<String>,
}

async fn add_tm_entry(State(state): State<Shared>, Json(input): Json<NewTmEntry>) -> Response {
    if input.source_text.trim().is_empty() || input.target_text.trim().is_empty() {
        return detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "source_text and target_text must not be empty",
        );
    }
    let record = TmRecord {
        id: Uuid::new_v4().to_string(),
        source_text: input.source_text,
        target_text: input.target_text,
        source_language_code: input.source_language_code,
        target_language_code: input.target_language_code,
        information_source: input.information_source,
        source_name: input.source_name,
        enabled: None,
        priority: None,
    };
    state.tm.write().await.push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

#[derive(Deserialize)]
struct TmUpdate {
    target_text: Option<String>,
    enabled: Option<bool>,
}

async fn update_tm_entry(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(input): Json<TmUpdate>,
) -> Response {
    if input.target_text.is_none() && input.enabled.is_none() {
        return detail(StatusCode::BAD_REQUEST, "No fields to update");
    }
    let mut tm = state.tm.write().await;
    let Some(entry) = tm.iter_mut().find(|e| e.id == id) else {
        return detail(StatusCode::NOT_FOUND, "TM entry not found");
    };
    if let Some(target_text) = input.target_text {
        entry.target_text = target_text;
    }
    if let Some(enabled) = input.enabled {
        entry.enabled = Some(enabled);
    }
    Json(json!({ "success": true })).into_response()
}

async fn delete_tm_entry(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut tm = state.tm.write().await;
    let before = tm.len();
    tm.retain(|e| e.id != id);
    if tm.len() == before {
        return detail(StatusCode::NOT_FOUND, "TM entry not found");
    }
    Json(json!({ "success": true })).into_response()
}

async fn tm_stats(State(state): State<Shared>) -> Json<Value> {
    let tm = state.tm.read().await;
    let enabled = tm.iter().filter(|e| e.is_enabled()).count();
    let mut by_source: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in tm.iter() {
        *by_source.entry(entry.information_source.as_str()).or_default() += 1;
    }
    Json(json!({
        "total": tm.len(),
        "enabled": enabled,
        "disabled": tm.len() - enabled,
        "by_source": by_source,
    }))
}

// ---------------------------------------------------------------------------
// Style guides and brand voice
// ---------------------------------------------------------------------------

async fn list_guides(State(state): State<Shared>) -> Json<Value> {
    let guides = state.guides.read().await;
    let guides: Vec<&GuideRecord> = guides.values().collect();
    Json(json!({ "guides": guides }))
}

#[derive(Deserialize)]
struct NewGuide {
    title: String,
    content: String,
    #[serde(default = "enabled_by_default")]
    is_enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

async fn create_guide(State(state): State<Shared>, Json(input): Json<NewGuide>) -> Response {
    if input.title.trim().is_empty() {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "title must not be empty");
    }
    let id = state.next_guide_id.fetch_add(1, Ordering::SeqCst);
    let guide = GuideRecord {
        id,
        title: input.title,
        content: input.content,
        is_enabled: input.is_enabled,
        display_order: id,
        user_id: 1,
    };
    state.guides.write().await.insert(id, guide.clone());
    Json(guide).into_response()
}

#[derive(Deserialize)]
struct GuideUpdate {
    title: Option<String>,
    content: Option<String>,
    is_enabled: Option<bool>,
}

async fn update_guide(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(input): Json<GuideUpdate>,
) -> Response {
    let mut guides = state.guides.write().await;
    let guide = match id.parse::<u64>() {
        Ok(id) => guides.get_mut(&id),
        Err(_) => None,
    };
    let Some(guide) = guide else {
        return detail(StatusCode::NOT_FOUND, "Style guide not found");
    };
    if let Some(title) = input.title {
        guide.title = title;
    }
    if let Some(content) = input.content {
        guide.content = content;
    }
    if let Some(is_enabled) = input.is_enabled {
        guide.is_enabled = is_enabled;
    }
    Json(guide.clone()).into_response()
}

async fn delete_guide(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let removed = match id.parse::<u64>() {
        Ok(id) => state.guides.write().await.remove(&id),
        Err(_) => None,
    };
    match removed {
        Some(_) => Json(json!({ "success": true })).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Style guide not found"),
    }
}

async fn brand_voice(State(state): State<Shared>) -> Json<Value> {
    match &state.config.brand_voice {
        Some(prompt) => Json(json!({ "prompt": prompt, "exists": true, "cached": false })),
        None => Json(json!({ "exists": false })),
    }
}

async fn combined_prompt(State(state): State<Shared>) -> Json<Value> {
    let guides = state.guides.read().await;
    let enabled: Vec<&GuideRecord> = guides.values().filter(|g| g.is_enabled).collect();
    let mut sections: Vec<String> = state.config.brand_voice.iter().cloned().collect();
    sections.extend(enabled.iter().map(|g| format!("{}: {}", g.title, g.content)));
    Json(json!({
        "prompt": sections.join("\n\n"),
        "has_brand_voice": state.config.brand_voice.is_some(),
        "style_guide_count": enabled.len(),
    }))
}
