//! Generation orchestrator
//!
//! Selects the strategy for a form once at construction, fronts the
//! preview path with the fingerprint-keyed TTL cache, and leaves the
//! flattened download path always fresh. Failures are propagated with
//! form and submission context and are never cached.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use catalog_types::{FormDefinition, Submission};
use chrono::Utc;

use crate::cache::RenderCache;
use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::pdf::unique_output_filename;
use crate::strategy::{FormFillStrategy, HtmlRenderStrategy};

/// Deliberately short: this dedupes rapid successive preview requests,
/// it is not an artifact store.
pub const PREVIEW_CACHE_TTL: Duration = Duration::from_secs(10);

enum Strategy {
    FormFill(FormFillStrategy),
    HtmlRender(HtmlRenderStrategy),
}

pub struct FormFiller {
    form: FormDefinition,
    strategy: Strategy,
    cache: Arc<dyn RenderCache>,
    output_dir: PathBuf,
}

impl FormFiller {
    pub fn new(
        form: FormDefinition,
        config: &GeneratorConfig,
        cache: Arc<dyn RenderCache>,
    ) -> Self {
        let strategy = if form.fillable {
            Strategy::FormFill(FormFillStrategy::new(config))
        } else {
            Strategy::HtmlRender(HtmlRenderStrategy::new(config))
        };
        Self {
            form,
            strategy,
            cache,
            output_dir: config.output_dir.clone(),
        }
    }

    /// Orchestrator with an explicit form-fill engine (skips the host
    /// capability probe).
    pub fn with_form_fill_strategy(
        form: FormDefinition,
        strategy: FormFillStrategy,
        config: &GeneratorConfig,
        cache: Arc<dyn RenderCache>,
    ) -> Self {
        Self {
            form,
            strategy: Strategy::FormFill(strategy),
            cache,
            output_dir: config.output_dir.clone(),
        }
    }

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    /// Cached preview render.
    pub async fn generate(&self, submission: &mut Submission) -> Result<Vec<u8>, GenerationError> {
        let key = submission.fingerprint();
        if submission.cache_valid() {
            if let Some(bytes) = self.cache.get(&key) {
                tracing::debug!(
                    form = %self.form.code,
                    submission = %submission.id,
                    "serving cached render"
                );
                return Ok(bytes);
            }
        }

        let bytes = self.run(submission, false).await?;
        self.cache.set(&key, bytes.clone(), PREVIEW_CACHE_TTL);
        submission.mark_generated();
        Ok(bytes)
    }

    /// Always-fresh flattened render for final download; never cached.
    pub async fn generate_flattened(
        &self,
        submission: &Submission,
    ) -> Result<Vec<u8>, GenerationError> {
        self.run(submission, true).await
    }

    /// Render and write to the output directory under a per-call unique
    /// filename.
    pub async fn generate_to_file(
        &self,
        submission: &mut Submission,
    ) -> Result<PathBuf, GenerationError> {
        let bytes = self.generate(submission).await?;
        std::fs::create_dir_all(&self.output_dir)?;
        let filename =
            unique_output_filename(&self.form.code, &submission.id.to_string(), Utc::now());
        let path = self.output_dir.join(filename);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }

    async fn run(
        &self,
        submission: &Submission,
        flatten: bool,
    ) -> Result<Vec<u8>, GenerationError> {
        let result = match (&self.strategy, flatten) {
            (Strategy::FormFill(s), false) => s.generate(&self.form, submission).await,
            (Strategy::FormFill(s), true) => s.generate_flattened(&self.form, submission).await,
            (Strategy::HtmlRender(s), false) => s.generate(&self.form, submission).await,
            (Strategy::HtmlRender(s), true) => s.generate_flattened(&self.form, submission).await,
        };
        if let Err(e) = &result {
            tracing::error!(
                form = %self.form.code,
                submission = %submission.id,
                error = %e,
                "generation failed"
            );
        }
        result
    }
}
