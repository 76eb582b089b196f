//! Caller-facing records and per-operation option structs.
//!
//! # Design
//! Result records are what the adapters in `responses` produce from wire
//! JSON; they never mirror the wire shape one-to-one. Option structs are
//! plain values with public fields and `Default`, so callers spell out only
//! what they need. The update payloads serialize straight to their wire
//! form and omit unset fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub translated_text: String,
    pub metadata: TranslationMetadata,
    /// Absent when the service found no match or reported a score of 0.
    pub tm_match: Option<TmMatch>,
    pub rationale: Option<String>,
    pub backtranslation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationMetadata {
    pub word_count: u64,
    pub cost: f64,
}

/// Translation-memory match attached to a translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmMatch {
    /// 0-100.
    pub score: f64,
    pub match_type: String,
    pub source_text: String,
    pub target_text: String,
    pub tm_source: Option<String>,
    pub tm_source_name: Option<String>,
    pub tm_id: Option<String>,
    pub top_matches: Vec<TmMatch>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslateOptions {
    /// Defaults to "English".
    pub source_language: Option<String>,
    /// Defaults to "en".
    pub source_language_code: Option<String>,
    pub language_code: Option<String>,
    pub context: Option<String>,
    pub glossary: Option<String>,
    pub formality: Option<String>,
    pub max_characters: Option<u32>,
    /// Defaults to true.
    pub include_tm_info: Option<bool>,
    /// Defaults to false.
    pub backtranslate: Option<bool>,
    /// Defaults to true.
    pub include_rationale: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub text: String,
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    pub images: Vec<GeneratedImage>,
    pub metadata: ImageMetadata,
}

/// One generated image, base64-encoded as the service returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub image_base64: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub cost: f64,
    pub num_images: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CulturalizeImageOptions {
    /// Defaults to "png".
    pub output_format: Option<String>,
    /// Defaults to "gpt".
    pub model: Option<String>,
    /// Defaults to 1.
    pub num_images: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CulturalInspection {
    /// Service-defined, e.g. "SAFE" or "NOT SAFE". Not validated.
    pub verdict: String,
    pub affected_countries: Vec<AffectedCountry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedCountry {
    pub country: String,
    pub issue: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectImageOptions {
    /// Sent comma-joined; omitted when empty.
    pub countries: Vec<String>,
}

// ---------------------------------------------------------------------------
// Languages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSetting {
    pub id: String,
    pub language: String,
    pub language_code: String,
    pub formality: Option<String>,
    pub custom_style: Option<String>,
}

/// Outcome of endpoints that only acknowledge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationStatus {
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Translation memory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmEntry {
    pub id: String,
    pub source_language_code: String,
    pub target_language_code: String,
    pub source_text: String,
    pub target_text: String,
    pub information_source: String,
    pub source_name: Option<String>,
    /// Defaults to true.
    pub enabled: bool,
    /// Defaults to 50.
    pub priority: i64,
    pub user_id: Option<String>,
    pub organization_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Only present on entries returned by a search.
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmSearchMatch {
    pub tm_id: String,
    pub score: f64,
    pub match_type: String,
    pub source_text: String,
    pub target_text: String,
    pub information_source: String,
    pub source_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmEntryPage {
    pub entries: Vec<TmEntry>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmStats {
    pub total: u64,
    pub enabled: u64,
    pub disabled: u64,
    pub by_source: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchTmOptions {
    /// Defaults to "en".
    pub source_language_code: Option<String>,
    pub target_language_code: Option<String>,
    /// Defaults to 0.
    pub min_score: Option<f64>,
    /// Defaults to 10.
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTmEntriesOptions {
    pub source_language_code: Option<String>,
    pub target_language_code: Option<String>,
    pub information_source: Option<String>,
    pub search: Option<String>,
    pub enabled_only: Option<bool>,
    /// Defaults to 100.
    pub limit: Option<u32>,
    /// Defaults to 0.
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTmEntry {
    pub source_text: String,
    pub target_text: String,
    pub source_language_code: String,
    pub target_language_code: String,
    /// Defaults to "manual".
    pub information_source: Option<String>,
    pub source_name: Option<String>,
}

/// Partial update of a TM entry. At least one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmEntryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl TmEntryUpdate {
    pub fn is_empty(&self) -> bool {
        self.target_text.is_none() && self.enabled.is_none()
    }
}

// ---------------------------------------------------------------------------
// Style guides and brand voice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleGuide {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Defaults to true.
    pub is_enabled: bool,
    pub display_order: Option<i64>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStyleGuide {
    pub title: String,
    pub content: String,
    /// Defaults to true.
    pub is_enabled: Option<bool>,
}

/// Partial update of a style guide. At least one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleGuideUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
}

impl StyleGuideUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.is_enabled.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandVoice {
    pub prompt: Option<String>,
    /// Defaults to false.
    pub exists: bool,
    pub cached: Option<bool>,
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

/// Feedback on a translation. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
}
