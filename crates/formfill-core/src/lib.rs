//! Court form PDF generation pipeline
//!
//! This crate fills legal court forms with user-submitted data and
//! returns rendered PDF bytes. Two strategies cover the two document
//! families:
//! - fillable documents (named AcroForm widgets) go through a binary
//!   form-fill engine: `pdftk` when present on the host, lopdf otherwise
//! - static documents go through an HTML template rendered by headless
//!   Chrome, or a verbatim copy when no template exists
//!
//! The `FormFiller` orchestrator selects the strategy once, fronts it
//! with a short-TTL content-addressed cache for preview requests, and
//! exposes an always-fresh flattened path for final downloads.
//!
//! Field introspection (`extract`) discovers a document's fillable
//! fields for catalog import and never runs in the request path.

pub mod cache;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod fdf;
pub mod filler;
pub mod format;
pub mod pdf;
pub mod strategy;

pub use cache::{RenderCache, TtlCache};
pub use classify::classify;
pub use config::GeneratorConfig;
pub use engine::FillEngine;
pub use error::{FormatError, GenerationError};
pub use extract::{extract, field_names, FieldExtractor};
pub use filler::FormFiller;
pub use format::format_value;
pub use strategy::{FormFillStrategy, HtmlRenderStrategy};
