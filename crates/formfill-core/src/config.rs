//! Generation pipeline configuration

use std::path::PathBuf;

/// Paths and bounds for the generation pipeline.
///
/// Environment overrides let deployments point at a vendored `pdftk`
/// or a pinned Chrome build without code changes.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directory holding `<form code>.html` templates for the
    /// HTML-rendering strategy.
    pub templates_dir: PathBuf,
    /// Directory for written output documents.
    pub output_dir: PathBuf,
    /// The pdftk binary probed for the primary fill engine.
    pub pdftk_binary: PathBuf,
    /// Explicit Chrome executable; auto-detected when unset.
    pub chrome_executable: Option<PathBuf>,
    /// Bound on headless-Chrome navigation and printing.
    pub render_timeout_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("output"),
            pdftk_binary: PathBuf::from("pdftk"),
            chrome_executable: None,
            render_timeout_ms: 30_000,
        }
    }
}

impl GeneratorConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("FORMFILL_TEMPLATES_DIR") {
            config.templates_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("FORMFILL_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Ok(bin) = std::env::var("FORMFILL_PDFTK") {
            config.pdftk_binary = PathBuf::from(bin);
        }
        if let Ok(chrome) = std::env::var("CHROME") {
            config.chrome_executable = Some(PathBuf::from(chrome));
        }
        if let Ok(ms) = std::env::var("FORMFILL_RENDER_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse() {
                config.render_timeout_ms = ms;
            }
        }
        config
    }
}
