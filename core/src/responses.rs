//! Adapters from the service's wire JSON to the caller-facing records.
//!
//! Every function here is total: a missing key, a `null`, or a value of an
//! unexpected type maps to the documented default instead of an error.
//! Numeric ids are coerced to strings.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::types::{
    AffectedCountry, BrandVoice, CulturalInspection, ExtractedText, GeneratedImage, ImageMetadata,
    ImageResult, LanguageSetting, OperationStatus, StyleGuide, TmEntry, TmEntryPage, TmMatch,
    TmSearchMatch, TmStats, TranslationMetadata, TranslationResult,
};

const DEFAULT_TM_PRIORITY: i64 = 50;

fn opt_string(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string(value: &Value, key: &str) -> String {
    opt_string(value, key).unwrap_or_default()
}

fn opt_number(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64)
}

fn number(value: &Value, key: &str) -> f64 {
    opt_number(value, key).unwrap_or(0.0)
}

fn opt_count(value: &Value, key: &str) -> Option<u64> {
    let field = value.get(key)?;
    field
        .as_u64()
        .or_else(|| field.as_f64().filter(|n| *n >= 0.0).map(|n| n as u64))
}

fn count(value: &Value, key: &str) -> u64 {
    opt_count(value, key).unwrap_or(0)
}

fn opt_flag(value: &Value, key: &str) -> Option<bool> {
    value.get(key).and_then(Value::as_bool)
}

/// The array under `key`, or the body itself when the service sent a bare
/// array, or nothing.
fn list<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .or_else(|| value.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn parse_translation(body: &Value) -> TranslationResult {
    let metadata = body.get("metadata").unwrap_or(&Value::Null);
    TranslationResult {
        translated_text: string(body, "translated_text"),
        metadata: TranslationMetadata {
            word_count: count(metadata, "word_count"),
            cost: number(metadata, "cost"),
        },
        tm_match: body
            .get("tm_match")
            .filter(|m| number(m, "score") > 0.0)
            .map(parse_tm_match),
        rationale: opt_string(body, "rationale"),
        backtranslation: opt_string(body, "backtranslation"),
    }
}

/// Top-level matches name their provenance `tm_source`; the nested
/// candidates use the search vocabulary (`information_source`).
fn parse_tm_match(m: &Value) -> TmMatch {
    TmMatch {
        score: number(m, "score"),
        match_type: string(m, "match_type"),
        source_text: string(m, "source_text"),
        target_text: string(m, "target_text"),
        tm_source: opt_string(m, "tm_source").or_else(|| opt_string(m, "information_source")),
        tm_source_name: opt_string(m, "tm_source_name").or_else(|| opt_string(m, "source_name")),
        tm_id: opt_string(m, "tm_id"),
        top_matches: list(m, "top_matches").iter().map(parse_tm_match).collect(),
    }
}

pub fn parse_extracted_text(body: &Value) -> ExtractedText {
    ExtractedText {
        text: string(body, "extracted_text"),
    }
}

pub fn parse_image_result(body: &Value) -> ImageResult {
    let images: Vec<GeneratedImage> = list(body, "images")
        .iter()
        .map(|image| GeneratedImage {
            image_base64: string(image, "image_base64"),
        })
        .collect();
    let metadata = body.get("metadata").unwrap_or(&Value::Null);
    ImageResult {
        metadata: ImageMetadata {
            cost: number(metadata, "cost"),
            num_images: opt_count(metadata, "num_images").unwrap_or(images.len() as u64),
        },
        images,
    }
}

pub fn parse_inspection(body: &Value) -> CulturalInspection {
    CulturalInspection {
        verdict: string(body, "verdict"),
        affected_countries: list(body, "affected_countries")
            .iter()
            .map(|finding| AffectedCountry {
                country: string(finding, "country"),
                issue: string(finding, "issue"),
                suggestion: string(finding, "suggestion"),
            })
            .collect(),
    }
}

pub fn parse_languages(body: &Value) -> Vec<LanguageSetting> {
    list(body, "languages")
        .iter()
        .map(|lang| LanguageSetting {
            id: string(lang, "id"),
            language: string(lang, "language"),
            language_code: string(lang, "language_code"),
            formality: opt_string(lang, "formality"),
            custom_style: opt_string(lang, "custom_style"),
        })
        .collect()
}

pub fn parse_status(body: &Value) -> OperationStatus {
    OperationStatus {
        success: opt_flag(body, "success").unwrap_or(false),
    }
}

pub fn parse_tm_search(body: &Value) -> Vec<TmSearchMatch> {
    list(body, "matches")
        .iter()
        .map(|m| TmSearchMatch {
            tm_id: string(m, "tm_id"),
            score: number(m, "score"),
            match_type: string(m, "match_type"),
            source_text: string(m, "source_text"),
            target_text: string(m, "target_text"),
            information_source: string(m, "information_source"),
            source_name: opt_string(m, "source_name"),
        })
        .collect()
}

pub fn parse_tm_entry(entry: &Value) -> TmEntry {
    TmEntry {
        id: string(entry, "id"),
        source_language_code: string(entry, "source_language_code"),
        target_language_code: string(entry, "target_language_code"),
        source_text: string(entry, "source_text"),
        target_text: string(entry, "target_text"),
        information_source: string(entry, "information_source"),
        source_name: opt_string(entry, "source_name"),
        enabled: opt_flag(entry, "enabled").unwrap_or(true),
        priority: entry
            .get("priority")
            .and_then(Value::as_i64)
            .unwrap_or(DEFAULT_TM_PRIORITY),
        user_id: opt_string(entry, "user_id"),
        organization_id: opt_string(entry, "organization_id"),
        created_at: opt_string(entry, "created_at"),
        updated_at: opt_string(entry, "updated_at"),
        score: opt_number(entry, "score"),
    }
}

/// Paging numbers missing from the response fall back to what was asked for;
/// a missing total falls back to the number of entries received.
pub fn parse_tm_entry_page(body: &Value, offset: u64, limit: u64) -> TmEntryPage {
    let entries: Vec<TmEntry> = list(body, "entries").iter().map(parse_tm_entry).collect();
    TmEntryPage {
        total: opt_count(body, "total").unwrap_or(entries.len() as u64),
        offset: opt_count(body, "offset").unwrap_or(offset),
        limit: opt_count(body, "limit").unwrap_or(limit),
        entries,
    }
}

pub fn parse_tm_stats(body: &Value) -> TmStats {
    let by_source: BTreeMap<String, u64> = body
        .get("by_source")
        .and_then(Value::as_object)
        .map(|sources| {
            sources
                .iter()
                .filter_map(|(source, n)| n.as_u64().map(|n| (source.clone(), n)))
                .collect()
        })
        .unwrap_or_default();
    TmStats {
        total: count(body, "total"),
        enabled: count(body, "enabled"),
        disabled: count(body, "disabled"),
        by_source,
    }
}

pub fn parse_style_guide(guide: &Value) -> StyleGuide {
    StyleGuide {
        id: string(guide, "id"),
        title: string(guide, "title"),
        content: string(guide, "content"),
        is_enabled: opt_flag(guide, "is_enabled").unwrap_or(true),
        display_order: guide.get("display_order").and_then(Value::as_i64),
        user_id: opt_string(guide, "user_id"),
    }
}

pub fn parse_style_guides(body: &Value) -> Vec<StyleGuide> {
    list(body, "guides").iter().map(parse_style_guide).collect()
}

pub fn parse_brand_voice(body: &Value) -> BrandVoice {
    BrandVoice {
        prompt: opt_string(body, "prompt"),
        exists: opt_flag(body, "exists").unwrap_or(false),
        cached: opt_flag(body, "cached"),
    }
}
