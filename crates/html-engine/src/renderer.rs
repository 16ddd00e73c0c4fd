//! Headless-Chrome HTML to PDF conversion
//!
//! The rendered HTML is written to a per-call temp file, loaded over
//! `file://`, printed with print-media emulation, and read back as raw
//! PDF bytes. Navigation and printing are both bounded by a timeout so
//! a wedged renderer can never block a generation call indefinitely.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetEmulatedMediaParams;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use futures::StreamExt;

use crate::error::RenderError;

/// Page geometry and wait bounds for a print run.
///
/// Defaults match the court-form layout: US Letter, 0.5in top/bottom and
/// 0.75in left/right margins, background graphics on.
#[derive(Debug, Clone)]
pub struct PdfRenderOptions {
    pub paper_width_in: f64,
    pub paper_height_in: f64,
    pub margin_top_in: f64,
    pub margin_bottom_in: f64,
    pub margin_left_in: f64,
    pub margin_right_in: f64,
    pub print_background: bool,
    pub timeout_ms: u64,
    pub chrome_executable: Option<PathBuf>,
}

impl Default for PdfRenderOptions {
    fn default() -> Self {
        Self {
            paper_width_in: 8.5,
            paper_height_in: 11.0,
            margin_top_in: 0.5,
            margin_bottom_in: 0.5,
            margin_left_in: 0.75,
            margin_right_in: 0.75,
            print_background: true,
            timeout_ms: 30_000,
            chrome_executable: None,
        }
    }
}

/// Convert an HTML string to paginated PDF bytes.
pub async fn render_html_to_pdf(
    html: &str,
    options: &PdfRenderOptions,
) -> Result<Vec<u8>, RenderError> {
    // The page is served from disk; a data: URL would hit Chrome's URL
    // length limit on large rendered forms.
    let mut file = tempfile::Builder::new()
        .prefix("html-engine-")
        .suffix(".html")
        .tempfile()?;
    file.write_all(html.as_bytes())?;
    file.flush()?;
    let url = format!("file://{}", file.path().display());

    let mut builder = BrowserConfig::builder();
    if let Some(chrome) = &options.chrome_executable {
        builder = builder.chrome_executable(chrome);
    }
    let config = builder.build().map_err(RenderError::Browser)?;

    let (mut browser, mut handler) = Browser::launch(config)
        .await
        .map_err(|e| RenderError::Browser(e.to_string()))?;
    let events = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    let result = print_page(&browser, &url, options).await;

    if let Err(e) = browser.close().await {
        tracing::debug!(error = %e, "browser close failed");
    }
    events.abort();

    result
}

async fn print_page(
    browser: &Browser,
    url: &str,
    options: &PdfRenderOptions,
) -> Result<Vec<u8>, RenderError> {
    let wait = Duration::from_millis(options.timeout_ms);

    let page = tokio::time::timeout(wait, browser.new_page(url))
        .await
        .map_err(|_| RenderError::Timeout(options.timeout_ms))?
        .map_err(|e| RenderError::Browser(e.to_string()))?;

    page.execute(SetEmulatedMediaParams {
        media: Some("print".to_string()),
        features: None,
    })
    .await
    .map_err(|e| RenderError::Browser(e.to_string()))?;

    tokio::time::timeout(wait, page.wait_for_navigation())
        .await
        .map_err(|_| RenderError::Timeout(options.timeout_ms))?
        .map_err(|e| RenderError::Browser(e.to_string()))?;

    let params = PrintToPdfParams {
        print_background: Some(options.print_background),
        paper_width: Some(options.paper_width_in),
        paper_height: Some(options.paper_height_in),
        margin_top: Some(options.margin_top_in),
        margin_bottom: Some(options.margin_bottom_in),
        margin_left: Some(options.margin_left_in),
        margin_right: Some(options.margin_right_in),
        prefer_css_page_size: Some(false),
        ..Default::default()
    };

    let bytes = tokio::time::timeout(wait, page.pdf(params))
        .await
        .map_err(|_| RenderError::Timeout(options.timeout_ms))?
        .map_err(|e| RenderError::Browser(e.to_string()))?;

    tracing::debug!(size = bytes.len(), "printed HTML to PDF");
    Ok(bytes)
}
