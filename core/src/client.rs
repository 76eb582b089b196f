//! Async client for the Nativ API.
//!
//! # Design
//! `NativClient` holds only its resolved configuration and a pooled HTTP
//! handle, both read-only after construction, so a client can be cloned and
//! shared across tasks freely. Every operation follows the same three steps:
//! build an `HttpRequest` (`requests`), send it (`transport`), and reshape
//! the JSON body (`responses`).

use std::time::Duration;

use futures::future::try_join_all;
use serde_json::Value;

use crate::config::{ClientConfig, ResolvedConfig};
use crate::error::Result;
use crate::file::FileInput;
use crate::requests;
use crate::responses;
use crate::transport::Transport;
use crate::types::{
    BrandVoice, CulturalInspection, CulturalizeImageOptions, ExtractedText, Feedback,
    ImageResult, InspectImageOptions, LanguageSetting, ListTmEntriesOptions, NewStyleGuide,
    NewTmEntry, OperationStatus, SearchTmOptions, StyleGuide, StyleGuideUpdate, TmEntry,
    TmEntryPage, TmEntryUpdate, TmSearchMatch, TmStats, TranslateOptions, TranslationResult,
};

#[derive(Debug, Clone)]
pub struct NativClient {
    transport: Transport,
}

impl NativClient {
    /// Build a client, resolving anything `config` leaves unset from
    /// `NATIV_API_KEY` / `NATIV_API_URL`. Fails with an authentication error
    /// when no API key can be found.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::from_resolved(config.resolve()?)
    }

    /// Build a client purely from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    pub fn from_resolved(config: ResolvedConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.transport.config().base_url
    }

    pub fn timeout(&self) -> Duration {
        self.transport.config().timeout
    }

    // -- Translation -------------------------------------------------------

    /// Translate `text` into `language` with cultural adaptation.
    pub async fn translate(
        &self,
        text: &str,
        language: &str,
        options: &TranslateOptions,
    ) -> Result<TranslationResult> {
        let request = requests::translate(text, language, options)?;
        let body = self.transport.send(request).await?;
        Ok(responses::parse_translation(&body))
    }

    /// Translate every text concurrently, one request each.
    ///
    /// Results come back in input order. The first failure fails the whole
    /// batch and no partial results are returned.
    pub async fn translate_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        language: &str,
        options: &TranslateOptions,
    ) -> Result<Vec<TranslationResult>> {
        try_join_all(
            texts
                .iter()
                .map(|text| self.translate(text.as_ref(), language, options)),
        )
        .await
    }

    /// Run OCR over an image or PDF.
    pub async fn extract_text(&self, file: impl Into<FileInput>) -> Result<ExtractedText> {
        let file = file.into().resolve().await?;
        let body = self.transport.send(requests::extract_text(file)).await?;
        Ok(responses::parse_extracted_text(&body))
    }

    // -- Images ------------------------------------------------------------

    /// Generate culturally adapted variants of an image carrying `text`.
    pub async fn culturalize_image(
        &self,
        file: impl Into<FileInput>,
        text: &str,
        language_code: &str,
        options: &CulturalizeImageOptions,
    ) -> Result<ImageResult> {
        let file = file.into().resolve().await?;
        let request = requests::culturalize_image(file, text, language_code, options);
        let body = self.transport.send(request).await?;
        Ok(responses::parse_image_result(&body))
    }

    /// Check an image for cultural issues in the given countries.
    pub async fn inspect_image(
        &self,
        file: impl Into<FileInput>,
        options: &InspectImageOptions,
    ) -> Result<CulturalInspection> {
        let file = file.into().resolve().await?;
        let body = self
            .transport
            .send(requests::inspect_image(file, options))
            .await?;
        Ok(responses::parse_inspection(&body))
    }

    // -- Languages ---------------------------------------------------------

    pub async fn get_languages(&self) -> Result<Vec<LanguageSetting>> {
        let body = self.transport.send(requests::get_languages()).await?;
        Ok(responses::parse_languages(&body))
    }

    pub async fn update_language_formality(
        &self,
        id: &str,
        formality: &str,
    ) -> Result<OperationStatus> {
        let request = requests::update_language_formality(id, formality);
        let body = self.transport.send(request).await?;
        Ok(responses::parse_status(&body))
    }

    /// Set or, with `None`, clear a language's custom style.
    pub async fn update_language_custom_style(
        &self,
        id: &str,
        custom_style: Option<&str>,
    ) -> Result<OperationStatus> {
        let request = requests::update_language_custom_style(id, custom_style);
        let body = self.transport.send(request).await?;
        Ok(responses::parse_status(&body))
    }

    // -- Translation memory ------------------------------------------------

    pub async fn search_tm(
        &self,
        query: &str,
        options: &SearchTmOptions,
    ) -> Result<Vec<TmSearchMatch>> {
        let body = self.transport.send(requests::search_tm(query, options)).await?;
        Ok(responses::parse_tm_search(&body))
    }

    /// Fetch a single page of entries.
    pub async fn list_tm_entries(&self, options: &ListTmEntriesOptions) -> Result<TmEntryPage> {
        let body = self.transport.send(requests::list_tm_entries(options)).await?;
        Ok(responses::parse_tm_entry_page(
            &body,
            u64::from(options.offset.unwrap_or(0)),
            u64::from(options.limit.unwrap_or(requests::DEFAULT_LIST_LIMIT)),
        ))
    }

    pub async fn add_tm_entry(&self, entry: &NewTmEntry) -> Result<TmEntry> {
        let body = self.transport.send(requests::add_tm_entry(entry)?).await?;
        Ok(responses::parse_tm_entry(&body))
    }

    /// Fails locally with a validation error when `update` is empty.
    pub async fn update_tm_entry(
        &self,
        id: &str,
        update: &TmEntryUpdate,
    ) -> Result<OperationStatus> {
        let body = self
            .transport
            .send(requests::update_tm_entry(id, update)?)
            .await?;
        Ok(responses::parse_status(&body))
    }

    pub async fn delete_tm_entry(&self, id: &str) -> Result<OperationStatus> {
        let body = self.transport.send(requests::delete_tm_entry(id)).await?;
        Ok(responses::parse_status(&body))
    }

    pub async fn get_tm_stats(&self) -> Result<TmStats> {
        let body = self.transport.send(requests::get_tm_stats()).await?;
        Ok(responses::parse_tm_stats(&body))
    }

    // -- Style guides ------------------------------------------------------

    pub async fn get_style_guides(&self) -> Result<Vec<StyleGuide>> {
        let body = self.transport.send(requests::get_style_guides()).await?;
        Ok(responses::parse_style_guides(&body))
    }

    pub async fn create_style_guide(&self, guide: &NewStyleGuide) -> Result<StyleGuide> {
        let body = self
            .transport
            .send(requests::create_style_guide(guide))
            .await?;
        Ok(responses::parse_style_guide(&body))
    }

    /// Fails locally with a validation error when `update` is empty.
    pub async fn update_style_guide(
        &self,
        id: &str,
        update: &StyleGuideUpdate,
    ) -> Result<StyleGuide> {
        let body = self
            .transport
            .send(requests::update_style_guide(id, update)?)
            .await?;
        Ok(responses::parse_style_guide(&body))
    }

    pub async fn delete_style_guide(&self, id: &str) -> Result<OperationStatus> {
        let body = self.transport.send(requests::delete_style_guide(id)).await?;
        Ok(responses::parse_status(&body))
    }

    pub async fn get_brand_voice(&self) -> Result<BrandVoice> {
        let body = self.transport.send(requests::get_brand_voice()).await?;
        Ok(responses::parse_brand_voice(&body))
    }

    /// Brand voice and enabled style guides merged by the service, unparsed.
    pub async fn get_combined_prompt(&self) -> Result<Value> {
        self.transport.send(requests::get_combined_prompt()).await
    }

    // -- Feedback ----------------------------------------------------------

    pub async fn submit_feedback(&self, feedback: &Feedback) -> Result<Value> {
        self.transport
            .send(requests::submit_feedback(feedback)?)
            .await
    }
}
