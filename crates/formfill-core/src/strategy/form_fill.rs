//! Form-filling strategy for fillable documents

use std::collections::BTreeMap;

use catalog_types::{FormDefinition, Submission};
use serde_json::Value;

use crate::config::GeneratorConfig;
use crate::engine::FillEngine;
use crate::error::GenerationError;
use crate::format::format_value;

pub struct FormFillStrategy {
    engine: FillEngine,
}

impl FormFillStrategy {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            engine: FillEngine::select(config),
        }
    }

    /// Bypass the capability probe; used by tests and vendored setups.
    pub fn with_engine(engine: FillEngine) -> Self {
        Self { engine }
    }

    pub async fn generate(
        &self,
        form: &FormDefinition,
        submission: &Submission,
    ) -> Result<Vec<u8>, GenerationError> {
        self.fill(form, submission, false)
    }

    /// Same content with the widgets flattened into static marks for
    /// final download.
    pub async fn generate_flattened(
        &self,
        form: &FormDefinition,
        submission: &Submission,
    ) -> Result<Vec<u8>, GenerationError> {
        self.fill(form, submission, true)
    }

    fn fill(
        &self,
        form: &FormDefinition,
        submission: &Submission,
        flatten: bool,
    ) -> Result<Vec<u8>, GenerationError> {
        // A missing source document is fatal; there is nothing to fall
        // back to.
        if !form.source_document.exists() {
            return Err(GenerationError::TemplateNotFound(
                form.source_document.clone(),
            ));
        }

        let values = build_widget_values(form, submission)?;
        tracing::debug!(
            form = %form.code,
            widgets = values.len(),
            flatten,
            "filling form document"
        );
        self.engine.fill(&form.source_document, &values, flatten)
    }
}

/// Map submission data into widget values: look up by field *name*,
/// format by semantic type, bind under the *widget name*. Fields the
/// user has not answered format their type's empty default.
pub fn build_widget_values(
    form: &FormDefinition,
    submission: &Submission,
) -> Result<BTreeMap<String, String>, GenerationError> {
    let mut values = BTreeMap::new();
    for field in &form.fields {
        let raw = submission.value(&field.name).unwrap_or(&Value::Null);
        let formatted =
            format_value(field.semantic_type, raw).map_err(|source| GenerationError::Format {
                field: field.name.clone(),
                value: raw.to_string(),
                source,
            })?;
        values.insert(field.widget_name.clone(), formatted);
    }
    Ok(values)
}
