//! Async client for the Nativ localization API.
//!
//! # Overview
//! Maps the service's HTTP/JSON endpoints (culturalized translation, image
//! culturalization and inspection, translation memory, style guides) onto
//! typed methods of `NativClient`.
//!
//! # Design
//! - `requests` builds each call as a plain `HttpRequest` value and
//!   `responses` reshapes wire JSON into result records; both are pure.
//! - `transport` is the single place that touches the network: one request
//!   per call, auth header, per-call timeout, status-to-error mapping.
//! - Configuration is resolved once at construction (explicit value, then
//!   `NATIV_API_KEY` / `NATIV_API_URL`, then defaults) and never re-read.
//!
//! ```no_run
//! use nativ::{ClientConfig, NativClient, TranslateOptions};
//!
//! # async fn run() -> nativ::Result<()> {
//! let client = NativClient::new(ClientConfig::new().api_key("sk-..."))?;
//! let result = client
//!     .translate("Hello world", "French", &TranslateOptions::default())
//!     .await?;
//! println!("{}", result.translated_text);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod file;
pub mod http;
pub mod requests;
pub mod responses;
pub mod transport;
pub mod types;

pub use client::NativClient;
pub use config::{ClientConfig, ResolvedConfig};
pub use error::{ApiError, ErrorKind, NativError, Result};
pub use file::{Blob, FileInput, ResolvedFile};
pub use http::{FormPart, HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use types::*;
