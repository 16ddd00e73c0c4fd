use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level classification of a field's data kind, independent
/// of the underlying PDF widget's native type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Text,
    Textarea,
    Date,
    Currency,
    Checkbox,
    Email,
    Tel,
    Select,
    Radio,
    Number,
    Signature,
    Address,
    RepeatingGroup,
    Hidden,
}

impl Default for SemanticType {
    fn default() -> Self {
        SemanticType::Text
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Duplicate field name in form '{form}': {name}")]
    DuplicateFieldName { form: String, name: String },

    #[error("Duplicate widget name in form '{form}': {widget}")]
    DuplicateWidgetName { form: String, widget: String },
}

/// One declared field on a form.
///
/// `name` is the submission-data key; `widget_name` is the name of the
/// interactive widget it binds to inside the source document. The two
/// are distinct because fields on different forms may share a semantic
/// name while binding to differently-named widgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub semantic_type: SemanticType,
    pub widget_name: String,
    pub required: bool,
    pub position: u32,
    pub pattern: Option<String>,
}

impl FieldDefinition {
    pub fn new(
        name: impl Into<String>,
        semantic_type: SemanticType,
        widget_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            widget_name: widget_name.into(),
            required: false,
            position: 0,
            pattern: None,
        }
    }
}

/// A document template in the form catalog.
///
/// `fillable` selects the generation path: true for documents with named
/// interactive widgets, false for static/informational documents that go
/// through the HTML-rendering path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDefinition {
    pub code: String,
    pub title: String,
    pub fillable: bool,
    pub source_document: PathBuf,
    pub fields: Vec<FieldDefinition>,
}

impl FormDefinition {
    /// Build a form definition, rejecting duplicate field or widget names.
    pub fn new(
        code: impl Into<String>,
        title: impl Into<String>,
        fillable: bool,
        source_document: impl Into<PathBuf>,
        mut fields: Vec<FieldDefinition>,
    ) -> Result<Self, CatalogError> {
        let code = code.into();

        let mut names = HashSet::new();
        let mut widgets = HashSet::new();
        for field in &fields {
            if !names.insert(field.name.clone()) {
                return Err(CatalogError::DuplicateFieldName {
                    form: code,
                    name: field.name.clone(),
                });
            }
            if !widgets.insert(field.widget_name.clone()) {
                return Err(CatalogError::DuplicateWidgetName {
                    form: code,
                    widget: field.widget_name.clone(),
                });
            }
        }

        fields.sort_by_key(|f| f.position);

        Ok(Self {
            code,
            title: title.into(),
            fillable,
            source_document: source_document.into(),
            fields,
        })
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A field discovered by introspecting a PDF document.
///
/// Transient: produced during catalog import to seed field definitions,
/// never persisted as a first-class entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub name: String,
    pub semantic_type: SemanticType,
    pub page: u32,
}
