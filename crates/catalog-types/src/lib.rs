//! Shared catalog and submission types
//!
//! This crate defines the data model that drives PDF generation:
//! form definitions with their declared fields, the semantic field
//! type enum, and user submissions with their cache fingerprint.

pub mod submission;
pub mod types;

pub use submission::{Submission, SubmissionStatus};
pub use types::{
    CatalogError, ExtractedField, FieldDefinition, FormDefinition, SemanticType,
};
