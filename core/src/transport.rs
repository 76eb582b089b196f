//! Executes `HttpRequest` values against the service.
//!
//! # Design
//! This is the only module that performs network I/O. `send` issues exactly
//! one request per call with no retries, bounded by the configured timeout.
//! Turning the raw response into a result is split out into `interpret` so
//! the status handling can be tested without a server.

use std::sync::Arc;
use std::time::Instant;

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::ResolvedConfig;
use crate::error::{NativError, Result};
use crate::http::{FormPart, HttpMethod, HttpRequest, HttpResponse, RequestBody};

pub const API_KEY_HEADER: &str = "X-API-Key";
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    config: Arc<ResolvedConfig>,
}

impl Transport {
    pub fn new(config: ResolvedConfig) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Send one request and return the parsed JSON body of a 2xx response.
    pub async fn send(&self, request: HttpRequest) -> Result<Value> {
        let url = format!("{}{}", self.config.base_url, request.path);
        let started = Instant::now();
        debug!(
            method = request.method.as_str(),
            path = %request.path,
            body = body_kind(&request.body),
            "sending request"
        );

        let mut builder = self
            .http
            .request(to_reqwest_method(request.method), &url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .timeout(self.config.timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(parts) => builder.multipart(into_form(parts)?),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            path = %request.path,
            "received response"
        );

        interpret(HttpResponse { status, body })
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn body_kind(body: &RequestBody) -> &'static str {
    match body {
        RequestBody::Empty => "empty",
        RequestBody::Json(_) => "json",
        RequestBody::Multipart(_) => "multipart",
    }
}

fn into_form(parts: Vec<FormPart>) -> Result<Form> {
    parts
        .into_iter()
        .try_fold(Form::new(), |form, part| -> Result<Form> {
            Ok(match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File { name, file } => {
                    let part = Part::bytes(file.data)
                        .file_name(file.filename)
                        .mime_str(&file.content_type)?;
                    form.part(name, part)
                }
            })
        })
}

/// Parse a response body as JSON, keeping non-JSON text as `{"detail": text}`.
pub fn parse_body(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| {
        debug!(len = raw.len(), "response body is not JSON");
        json!({ "detail": raw })
    })
}

/// Pass 2xx bodies through; map everything else to a `NativError`.
pub fn interpret(response: HttpResponse) -> Result<Value> {
    let body = parse_body(&response.body);
    if (200..300).contains(&response.status) {
        return Ok(body);
    }
    let err = NativError::from_status(response.status, body);
    warn!(status = response.status, error = %err, "request rejected");
    Err(err)
}
