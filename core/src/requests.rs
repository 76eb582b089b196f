//! Request builders, one per remote operation.
//!
//! # Design
//! Builders turn typed arguments into an `HttpRequest` value: path, query and
//! body with the service's literal field names, with caller defaults filled
//! in. They perform no I/O. File inputs arrive already resolved so the
//! multipart builders stay synchronous. Local validation happens here, so a
//! rejected call never reaches the transport.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::json;

use crate::error::{NativError, Result};
use crate::file::ResolvedFile;
use crate::http::{FormPart, HttpMethod, HttpRequest};
use crate::types::{
    CulturalizeImageOptions, Feedback, InspectImageOptions, ListTmEntriesOptions, NewStyleGuide,
    NewTmEntry, SearchTmOptions, StyleGuideUpdate, TmEntryUpdate, TranslateOptions,
};

/// Value of the `tool` field identifying calls made through this library.
const TOOL: &str = "api";

const DEFAULT_SOURCE_LANGUAGE: &str = "English";
const DEFAULT_SOURCE_LANGUAGE_CODE: &str = "en";
const DEFAULT_OUTPUT_FORMAT: &str = "png";
const DEFAULT_IMAGE_MODEL: &str = "gpt";
const DEFAULT_NUM_IMAGES: u32 = 1;
const DEFAULT_SEARCH_LIMIT: u32 = 10;
pub(crate) const DEFAULT_LIST_LIMIT: u32 = 100;
const DEFAULT_INFORMATION_SOURCE: &str = "manual";

/// Everything but RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Encode a caller-supplied id so it stays a single path segment.
fn segment(id: &str) -> String {
    utf8_percent_encode(id, PATH_SEGMENT).to_string()
}

#[derive(Serialize)]
struct TranslateBody<'a> {
    text: &'a str,
    language: &'a str,
    source_language: &'a str,
    source_language_code: &'a str,
    tool: &'static str,
    include_tm_info: bool,
    backtranslate: bool,
    include_rationale: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    glossary: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    formality: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_characters: Option<u32>,
}

#[derive(Serialize)]
struct AddTmEntryBody<'a> {
    source_text: &'a str,
    target_text: &'a str,
    source_language_code: &'a str,
    target_language_code: &'a str,
    information_source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_name: Option<&'a str>,
}

pub fn translate(text: &str, language: &str, options: &TranslateOptions) -> Result<HttpRequest> {
    let body = TranslateBody {
        text,
        language,
        source_language: options
            .source_language
            .as_deref()
            .unwrap_or(DEFAULT_SOURCE_LANGUAGE),
        source_language_code: options
            .source_language_code
            .as_deref()
            .unwrap_or(DEFAULT_SOURCE_LANGUAGE_CODE),
        tool: TOOL,
        include_tm_info: options.include_tm_info.unwrap_or(true),
        backtranslate: options.backtranslate.unwrap_or(false),
        include_rationale: options.include_rationale.unwrap_or(true),
        language_code: options.language_code.as_deref(),
        context: options.context.as_deref(),
        glossary: options.glossary.as_deref(),
        formality: options.formality.as_deref(),
        max_characters: options.max_characters,
    };
    Ok(HttpRequest::new(HttpMethod::Post, "/text/culturalize").json(serde_json::to_value(body)?))
}

fn file_part(file: ResolvedFile) -> FormPart {
    FormPart::File {
        name: "file".to_string(),
        file,
    }
}

pub fn extract_text(file: ResolvedFile) -> HttpRequest {
    HttpRequest::new(HttpMethod::Post, "/text/extract").multipart(vec![file_part(file)])
}

pub fn culturalize_image(
    file: ResolvedFile,
    text: &str,
    language_code: &str,
    options: &CulturalizeImageOptions,
) -> HttpRequest {
    let parts = vec![
        file_part(file),
        FormPart::text("text", text),
        FormPart::text("language_code", language_code),
        FormPart::text(
            "output_format",
            options.output_format.as_deref().unwrap_or(DEFAULT_OUTPUT_FORMAT),
        ),
        FormPart::text("model", options.model.as_deref().unwrap_or(DEFAULT_IMAGE_MODEL)),
        FormPart::text(
            "num_images",
            options.num_images.unwrap_or(DEFAULT_NUM_IMAGES).to_string(),
        ),
        FormPart::text("tool", TOOL),
    ];
    HttpRequest::new(HttpMethod::Post, "/image/culturalize").multipart(parts)
}

pub fn inspect_image(file: ResolvedFile, options: &InspectImageOptions) -> HttpRequest {
    let mut parts = vec![file_part(file)];
    if !options.countries.is_empty() {
        parts.push(FormPart::text("countries", options.countries.join(",")));
    }
    HttpRequest::new(HttpMethod::Post, "/image/inspect").multipart(parts)
}

pub fn get_languages() -> HttpRequest {
    HttpRequest::new(HttpMethod::Get, "/user/languages")
}

pub fn update_language_formality(id: &str, formality: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Patch, format!("/user/languages/{}/formality", segment(id)))
        .json(json!({ "formality": formality }))
}

/// `None` clears the custom style.
pub fn update_language_custom_style(id: &str, custom_style: Option<&str>) -> HttpRequest {
    HttpRequest::new(HttpMethod::Patch, format!("/user/languages/{}/custom-style", segment(id)))
        .json(json!({ "custom_style": custom_style }))
}

pub fn search_tm(query: &str, options: &SearchTmOptions) -> HttpRequest {
    HttpRequest::new(HttpMethod::Get, "/master-tm/fuzzy-search")
        .query("query", query)
        .query(
            "source_lang",
            options
                .source_language_code
                .as_deref()
                .unwrap_or(DEFAULT_SOURCE_LANGUAGE_CODE),
        )
        .query("score_cutoff", options.min_score.unwrap_or(0.0))
        .query("limit", options.limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
        .query_opt("target_lang", options.target_language_code.as_deref())
}

pub fn list_tm_entries(options: &ListTmEntriesOptions) -> HttpRequest {
    HttpRequest::new(HttpMethod::Get, "/master-tm/entries")
        .query("limit", options.limit.unwrap_or(DEFAULT_LIST_LIMIT))
        .query("offset", options.offset.unwrap_or(0))
        .query_opt("source_lang", options.source_language_code.as_deref())
        .query_opt("target_lang", options.target_language_code.as_deref())
        .query_opt("information_source", options.information_source.as_deref())
        .query_opt("search", options.search.as_deref())
        .query_opt("enabled_only", options.enabled_only)
}

pub fn add_tm_entry(entry: &NewTmEntry) -> Result<HttpRequest> {
    let body = AddTmEntryBody {
        source_text: &entry.source_text,
        target_text: &entry.target_text,
        source_language_code: &entry.source_language_code,
        target_language_code: &entry.target_language_code,
        information_source: entry
            .information_source
            .as_deref()
            .unwrap_or(DEFAULT_INFORMATION_SOURCE),
        source_name: entry.source_name.as_deref(),
    };
    Ok(HttpRequest::new(HttpMethod::Post, "/master-tm/entries").json(serde_json::to_value(body)?))
}

pub fn update_tm_entry(id: &str, update: &TmEntryUpdate) -> Result<HttpRequest> {
    if update.is_empty() {
        return Err(NativError::validation(
            "at least one of target_text or enabled must be provided",
        ));
    }
    Ok(HttpRequest::new(HttpMethod::Patch, format!("/master-tm/entries/{}", segment(id)))
        .json(serde_json::to_value(update)?))
}

pub fn delete_tm_entry(id: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Delete, format!("/master-tm/entries/{}", segment(id)))
}

pub fn get_tm_stats() -> HttpRequest {
    HttpRequest::new(HttpMethod::Get, "/master-tm/stats")
}

pub fn get_style_guides() -> HttpRequest {
    HttpRequest::new(HttpMethod::Get, "/style-guide")
}

pub fn create_style_guide(guide: &NewStyleGuide) -> HttpRequest {
    HttpRequest::new(HttpMethod::Post, "/style-guide").json(json!({
        "title": guide.title,
        "content": guide.content,
        "is_enabled": guide.is_enabled.unwrap_or(true),
    }))
}

pub fn update_style_guide(id: &str, update: &StyleGuideUpdate) -> Result<HttpRequest> {
    if update.is_empty() {
        return Err(NativError::validation(
            "at least one of title, content or is_enabled must be provided",
        ));
    }
    Ok(HttpRequest::new(HttpMethod::Put, format!("/style-guide/{}", segment(id)))
        .json(serde_json::to_value(update)?))
}

pub fn delete_style_guide(id: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Delete, format!("/style-guide/{}", segment(id)))
}

pub fn get_brand_voice() -> HttpRequest {
    HttpRequest::new(HttpMethod::Get, "/style-guide/prompt")
}

pub fn get_combined_prompt() -> HttpRequest {
    HttpRequest::new(HttpMethod::Get, "/style-guide/combined")
}

pub fn submit_feedback(feedback: &Feedback) -> Result<HttpRequest> {
    Ok(HttpRequest::new(HttpMethod::Post, "/text/feedback").json(serde_json::to_value(feedback)?))
}
