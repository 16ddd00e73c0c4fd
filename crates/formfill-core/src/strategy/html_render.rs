//! HTML-rendering strategy for non-fillable documents
//!
//! If `<templates_dir>/<form code>.html` exists, it is rendered with the
//! submission's form data in scope and printed through headless Chrome.
//! Otherwise the static source document is returned verbatim, which
//! covers informational court forms with nothing to fill.

use std::path::PathBuf;

use catalog_types::{FormDefinition, Submission};
use html_engine::PdfRenderOptions;
use serde_json::{json, Map, Value};

use crate::config::GeneratorConfig;
use crate::error::GenerationError;

pub struct HtmlRenderStrategy {
    templates_dir: PathBuf,
    options: PdfRenderOptions,
}

impl HtmlRenderStrategy {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            templates_dir: config.templates_dir.clone(),
            options: PdfRenderOptions {
                timeout_ms: config.render_timeout_ms,
                chrome_executable: config.chrome_executable.clone(),
                ..PdfRenderOptions::default()
            },
        }
    }

    pub async fn generate(
        &self,
        form: &FormDefinition,
        submission: &Submission,
    ) -> Result<Vec<u8>, GenerationError> {
        let template_path = self.templates_dir.join(format!("{}.html", form.code));
        if template_path.exists() {
            let source = std::fs::read_to_string(&template_path)?;
            let html = html_engine::render(&source, &template_context(form, submission));
            tracing::debug!(form = %form.code, template = %template_path.display(), "rendering HTML template");
            return Ok(html_engine::render_html_to_pdf(&html, &self.options).await?);
        }

        if !form.source_document.exists() {
            return Err(GenerationError::TemplateNotFound(
                form.source_document.clone(),
            ));
        }
        tracing::debug!(form = %form.code, "no template, copying static source document");
        Ok(std::fs::read(&form.source_document)?)
    }

    /// HTML-rendered PDFs are already non-interactive, so flattening is
    /// identical to a plain render.
    pub async fn generate_flattened(
        &self,
        form: &FormDefinition,
        submission: &Submission,
    ) -> Result<Vec<u8>, GenerationError> {
        self.generate(form, submission).await
    }
}

/// Template scope: submitted values at the top level plus `form.*`
/// metadata and per-field declarations.
fn template_context(form: &FormDefinition, submission: &Submission) -> Map<String, Value> {
    let mut context = submission.form_data.clone();
    context.insert(
        "form".to_string(),
        json!({ "code": form.code, "title": form.title }),
    );
    context.insert(
        "fields".to_string(),
        serde_json::to_value(&form.fields).unwrap_or(Value::Null),
    );
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    fn strategy(templates_dir: &std::path::Path) -> HtmlRenderStrategy {
        let config = GeneratorConfig {
            templates_dir: templates_dir.to_path_buf(),
            ..GeneratorConfig::default()
        };
        HtmlRenderStrategy::new(&config)
    }

    #[tokio::test]
    async fn copies_static_source_verbatim_when_no_template() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("info-sheet.pdf");
        let payload = b"%PDF-1.4\nstatic informational form\n%%EOF\n";
        std::fs::File::create(&source)
            .unwrap()
            .write_all(payload)
            .unwrap();

        let form = FormDefinition::new("info-10", "Info Sheet", false, &source, vec![]).unwrap();
        let bytes = strategy(dir.path())
            .generate(&form, &Submission::new("info-10"))
            .await
            .unwrap();
        assert_eq!(bytes, payload.to_vec());
    }

    #[tokio::test]
    async fn missing_source_without_template_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.pdf");
        let form = FormDefinition::new("info-10", "Info Sheet", false, &missing, vec![]).unwrap();

        let err = strategy(dir.path())
            .generate(&form, &Submission::new("info-10"))
            .await
            .unwrap_err();
        match err {
            GenerationError::TemplateNotFound(path) => assert_eq!(path, missing),
            other => panic!("expected TemplateNotFound, got {other}"),
        }
        // No partial output was written anywhere.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn context_exposes_form_metadata_and_values() {
        let form = FormDefinition::new("sc-100", "Small Claims", false, "x.pdf", vec![]).unwrap();
        let mut submission = Submission::new("sc-100");
        submission.set_field("full_name", json!("José García"));

        let context = template_context(&form, &submission);
        assert_eq!(context["full_name"], json!("José García"));
        assert_eq!(context["form"]["title"], json!("Small Claims"));
    }
}
