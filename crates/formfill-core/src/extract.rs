//! PDF field introspection for catalog import
//!
//! Primary engine: a lopdf AcroForm walk. It yields nothing when the
//! document has no form dictionary or lopdf cannot parse it; in that
//! case, if pdftk is on the host, its `dump_data_fields` listing is
//! parsed instead. No fields from either engine is a normal result
//! ("this is a non-fillable document"), never an error: a broken
//! document must not abort a whole import batch.

use std::path::{Path, PathBuf};
use std::process::Command;

use catalog_types::{ExtractedField, SemanticType};
use lopdf::Document;

use crate::classify::classify;
use crate::config::GeneratorConfig;
use crate::pdf::terminal_fields;

/// Widget names for non-data utility buttons, matched case-insensitively
/// against the start of the name. Applies to button widgets only: text
/// fields like "PrintedName" or "SubmittedDate" are legitimate data.
const UTILITY_WIDGET_NAMES: &[&str] = &["save", "print", "reset", "submit", "clear"];

pub struct FieldExtractor {
    pdftk_binary: PathBuf,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(&GeneratorConfig::default())
    }
}

impl FieldExtractor {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            pdftk_binary: config.pdftk_binary.clone(),
        }
    }

    /// Discover the document's fillable fields in document order.
    pub fn extract(&self, path: &Path) -> Vec<ExtractedField> {
        match extract_with_lopdf(path) {
            Ok(fields) if !fields.is_empty() => return fields,
            Ok(_) => {
                tracing::debug!(path = %path.display(), "primary extraction found no fields");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "primary extraction failed");
            }
        }

        if pdftk_available(&self.pdftk_binary) {
            return self.extract_with_pdftk(path);
        }
        Vec::new()
    }

    /// Derived projection: just the discovered field names.
    pub fn field_names(&self, path: &Path) -> Vec<String> {
        self.extract(path).into_iter().map(|f| f.name).collect()
    }

    fn extract_with_pdftk(&self, path: &Path) -> Vec<ExtractedField> {
        let output = Command::new(&self.pdftk_binary)
            .arg(path)
            .arg("dump_data_fields")
            .output();
        match output {
            Ok(out) if out.status.success() => {
                parse_dump_data_fields(&String::from_utf8_lossy(&out.stdout))
            }
            Ok(out) => {
                tracing::warn!(
                    path = %path.display(),
                    status = %out.status,
                    "pdftk dump_data_fields failed"
                );
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to run pdftk");
                Vec::new()
            }
        }
    }
}

/// Extract with the default configuration.
pub fn extract(path: &Path) -> Vec<ExtractedField> {
    FieldExtractor::default().extract(path)
}

/// Field names with the default configuration.
pub fn field_names(path: &Path) -> Vec<String> {
    FieldExtractor::default().field_names(path)
}

/// Capability probe: is pdftk runnable on this host?
pub fn pdftk_available(binary: &Path) -> bool {
    Command::new(binary)
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn extract_with_lopdf(path: &Path) -> Result<Vec<ExtractedField>, lopdf::Error> {
    let doc = Document::load(path)?;
    let fields = terminal_fields(&doc)
        .into_iter()
        .filter(|f| !f.is_pushbutton())
        .filter(|f| !(f.is_button() && is_utility_name(&f.name)))
        .map(|f| {
            // Checkbox widgets are identifiable from the document itself;
            // everything else is classified from the name.
            let semantic_type = if f.is_button() {
                SemanticType::Checkbox
            } else {
                classify(&f.name)
            };
            ExtractedField {
                name: f.name,
                semantic_type,
                page: f.page,
            }
        })
        .collect();
    Ok(fields)
}

fn is_utility_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    UTILITY_WIDGET_NAMES.iter().any(|kw| lower.starts_with(kw))
}

/// Parse pdftk's `dump_data_fields` block listing.
///
/// Blocks are separated by `---` lines; each line is `Key: Value`.
fn parse_dump_data_fields(output: &str) -> Vec<ExtractedField> {
    let mut fields = Vec::new();
    let mut name: Option<String> = None;
    let mut field_type: Option<String> = None;

    let mut flush = |name: &mut Option<String>, field_type: &mut Option<String>| {
        if let Some(n) = name.take() {
            let ftype = field_type.take();
            let is_button = ftype.as_deref() == Some("Button");
            if is_button && is_utility_name(&n) {
                return;
            }
            let semantic_type = if is_button {
                SemanticType::Checkbox
            } else {
                classify(&n)
            };
            fields.push(ExtractedField {
                name: n,
                semantic_type,
                // dump_data_fields carries no page information.
                page: 1,
            });
        } else {
            field_type.take();
        }
    };

    for line in output.lines() {
        let line = line.trim_end();
        if line.starts_with("---") {
            flush(&mut name, &mut field_type);
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            match key.trim() {
                "FieldName" => name = Some(value.trim().to_string()),
                "FieldType" => field_type = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }
    flush(&mut name, &mut field_type);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DUMP: &str = "\
---
FieldType: Text
FieldName: PlaintiffName
FieldFlags: 0
FieldJustification: Left
---
FieldType: Button
FieldName: FiledWidget
FieldStateOption: Yes
---
FieldType: Text
FieldName: ClaimAmount
---
FieldType: Text
FieldName: PrintedName
---
FieldType: Button
FieldName: PrintForm
---";

    #[test]
    fn parses_dump_blocks() {
        let fields = parse_dump_data_fields(DUMP);
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["PlaintiffName", "FiledWidget", "ClaimAmount", "PrintedName"]
        );
    }

    #[test]
    fn dump_classifies_buttons_as_checkbox_and_names_otherwise() {
        let fields = parse_dump_data_fields(DUMP);
        assert_eq!(fields[0].semantic_type, SemanticType::Text);
        assert_eq!(fields[1].semantic_type, SemanticType::Checkbox);
        assert_eq!(fields[2].semantic_type, SemanticType::Currency);
    }

    #[test]
    fn dump_filters_utility_buttons() {
        let fields = parse_dump_data_fields(DUMP);
        assert!(fields.iter().all(|f| f.name != "PrintForm"));
    }

    #[test]
    fn dump_keeps_text_fields_with_utility_prefixes() {
        // "type or print name" fields are data, not buttons.
        let fields = parse_dump_data_fields(DUMP);
        let printed = fields.iter().find(|f| f.name == "PrintedName").unwrap();
        assert_eq!(printed.semantic_type, SemanticType::Text);
    }

    #[test]
    fn single_field_listing_is_plain_text() {
        let dump = "---\nFieldType: Text\nFieldName: PlaintiffName\n---\n";
        let fields = parse_dump_data_fields(dump);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "PlaintiffName");
        assert_eq!(fields[0].semantic_type, SemanticType::Text);
    }

    #[test]
    fn empty_listing_yields_no_fields() {
        assert!(parse_dump_data_fields("").is_empty());
    }

    #[test]
    fn utility_names_are_detected() {
        assert!(is_utility_name("PrintForm"));
        assert!(is_utility_name("reset"));
        assert!(is_utility_name("SubmitButton"));
        assert!(!is_utility_name("PlaintiffName"));
    }

    #[test]
    fn missing_document_degrades_to_empty() {
        let fields = extract(Path::new("/nonexistent/form.pdf"));
        assert!(fields.is_empty());
    }
}
