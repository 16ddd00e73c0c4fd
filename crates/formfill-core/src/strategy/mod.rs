//! Generation strategies
//!
//! One strategy per document family, sharing the same
//! `generate`/`generate_flattened` contract: form-filling for documents
//! with named widgets, HTML rendering (or verbatim copy) for everything
//! else. The orchestrator picks exactly one at construction time.

pub mod form_fill;
pub mod html_render;

pub use form_fill::FormFillStrategy;
pub use html_render::HtmlRenderStrategy;
