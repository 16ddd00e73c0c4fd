//! HTML document rendering engine
//!
//! This crate turns an HTML template plus a JSON context into paginated
//! PDF bytes:
//! - `template::render` substitutes `{{ key }}` placeholders with context
//!   values (dotted paths descend into nested objects)
//! - `renderer::render_html_to_pdf` drives a headless Chrome instance
//!   through chromiumoxide and prints the page with fixed legal-document
//!   page geometry (US Letter, print media emulation)

pub mod error;
pub mod renderer;
pub mod template;

pub use error::RenderError;
pub use renderer::{render_html_to_pdf, PdfRenderOptions};
pub use template::render;
