//! Low-level PDF helpers shared by the extractor and the fill engines

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use lopdf::{Document, Object, ObjectId};

use crate::error::GenerationError;

/// ReadOnly bit of the field flags (/Ff), PDF 32000-1 table 221.
pub const FF_READ_ONLY: i64 = 1;
/// Pushbutton bit: marks utility widgets (Save/Print/Reset) that carry
/// no data and must never reach the field catalog.
pub const FF_PUSHBUTTON: i64 = 1 << 16;

/// A terminal AcroForm field: the dictionary that actually holds /V.
#[derive(Debug, Clone)]
pub struct AcroField {
    /// Object id of the field dictionary; None for inline array entries,
    /// which cannot be addressed for mutation.
    pub id: Option<ObjectId>,
    /// Fully-qualified (dotted) field name.
    pub name: String,
    /// /FT value, possibly inherited from an ancestor field.
    pub field_type: Option<Vec<u8>>,
    /// /Ff field flags.
    pub flags: i64,
    /// 1-based page carrying the field's widget.
    pub page: u32,
}

impl AcroField {
    pub fn is_button(&self) -> bool {
        self.field_type.as_deref() == Some(b"Btn")
    }

    pub fn is_pushbutton(&self) -> bool {
        self.is_button() && self.flags & FF_PUSHBUTTON != 0
    }
}

/// Collect every terminal field of the document's AcroForm, resolving
/// dotted names and widget page numbers. Documents without an AcroForm
/// yield an empty list.
pub fn terminal_fields(doc: &Document) -> Vec<AcroField> {
    let mut out = Vec::new();
    let pages = widget_pages(doc);
    let Some(fields) = acroform_field_refs(doc) else {
        return out;
    };
    for entry in &fields {
        walk_field(doc, entry, None, None, &pages, &mut out);
    }
    out
}

fn acroform_field_refs(doc: &Document) -> Option<Vec<Object>> {
    let catalog = doc.catalog().ok()?;
    let acroform = resolve(doc, catalog.get(b"AcroForm").ok()?)?;
    let fields = resolve(doc, acroform.as_dict().ok()?.get(b"Fields").ok()?)?;
    Some(fields.as_array().ok()?.clone())
}

/// Object id of the AcroForm dictionary itself, when indirect.
pub fn acroform_id(doc: &Document) -> Option<ObjectId> {
    doc.catalog()
        .ok()?
        .get(b"AcroForm")
        .ok()?
        .as_reference()
        .ok()
}

fn walk_field(
    doc: &Document,
    obj: &Object,
    prefix: Option<&str>,
    inherited_ft: Option<Vec<u8>>,
    pages: &HashMap<ObjectId, u32>,
    out: &mut Vec<AcroField>,
) {
    let id = obj.as_reference().ok();
    let Some(dict) = resolve(doc, obj).and_then(|o| o.as_dict().ok()) else {
        return;
    };

    let partial = dict
        .get(b"T")
        .ok()
        .and_then(|t| resolve(doc, t))
        .and_then(|t| t.as_str().ok())
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned());
    let name = match (prefix, partial.as_deref()) {
        (Some(p), Some(t)) => format!("{}.{}", p, t),
        (Some(p), None) => p.to_string(),
        (None, Some(t)) => t.to_string(),
        (None, None) => String::new(),
    };

    let field_type = dict
        .get(b"FT")
        .ok()
        .and_then(|o| resolve(doc, o))
        .and_then(|o| o.as_name().ok())
        .map(|b| b.to_vec())
        .or(inherited_ft);
    let flags = dict
        .get(b"Ff")
        .ok()
        .and_then(|o| resolve(doc, o))
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(0);

    let kids = dict
        .get(b"Kids")
        .ok()
        .and_then(|o| resolve(doc, o))
        .and_then(|o| o.as_array().ok())
        .cloned();

    if let Some(kids) = kids {
        // Kids carrying their own /T are child fields; nameless kids are
        // widget annotations of this field.
        let mut has_child_fields = false;
        for kid in &kids {
            let named = resolve(doc, kid)
                .and_then(|o| o.as_dict().ok())
                .map(|d| d.has(b"T"))
                .unwrap_or(false);
            if named {
                has_child_fields = true;
                let child_prefix = if name.is_empty() { None } else { Some(name.as_str()) };
                walk_field(doc, kid, child_prefix, field_type.clone(), pages, out);
            }
        }
        if has_child_fields {
            return;
        }

        let page = kids
            .iter()
            .filter_map(|k| k.as_reference().ok())
            .find_map(|kid_id| pages.get(&kid_id).copied())
            .unwrap_or(1);
        if !name.is_empty() {
            out.push(AcroField { id, name, field_type, flags, page });
        }
        return;
    }

    // Merged field + widget dictionary.
    if !name.is_empty() {
        let page = id.and_then(|i| pages.get(&i).copied()).unwrap_or(1);
        out.push(AcroField { id, name, field_type, flags, page });
    }
}

/// Map widget annotation ids to their 1-based page number.
fn widget_pages(doc: &Document) -> HashMap<ObjectId, u32> {
    let mut map = HashMap::new();
    for (page_no, page_id) in doc.get_pages() {
        let Some(annots) = doc
            .get_object(page_id)
            .ok()
            .and_then(|p| p.as_dict().ok())
            .and_then(|d| d.get(b"Annots").ok())
            .and_then(|o| resolve(doc, o))
            .and_then(|o| o.as_array().ok())
        else {
            continue;
        };
        for annot in annots {
            if let Ok(id) = annot.as_reference() {
                map.insert(id, page_no);
            }
        }
    }
    map
}

/// Follow a reference one level; plain objects pass through.
pub fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// True when the bytes carry a PDF header.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF-")
}

/// Parse PDF bytes and return the page count.
pub fn page_count(bytes: &[u8]) -> Result<u32, GenerationError> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| GenerationError::Engine(format!("Failed to parse PDF: {}", e)))?;
    Ok(doc.get_pages().len() as u32)
}

/// Encode text for a PDF string object: ASCII stays literal, anything
/// else becomes UTF-16BE with a byte-order mark.
pub fn encode_pdf_string(value: &str) -> Vec<u8> {
    if value.is_ascii() {
        value.as_bytes().to_vec()
    } else {
        utf16be_bytes(value)
    }
}

/// UTF-16BE bytes with leading BOM.
pub fn utf16be_bytes(value: &str) -> Vec<u8> {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}

/// Replace anything outside `[A-Za-z0-9._-]` so concurrent calls can
/// safely share an output directory.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '-' })
        .collect();
    if cleaned.trim_matches('-').is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}

/// Per-call unique output filename: form code + submission id + timestamp.
pub fn unique_output_filename(
    form_code: &str,
    submission_id: &str,
    now: DateTime<Utc>,
) -> String {
    format!(
        "{}-{}-{}.pdf",
        sanitize_filename(form_code, "form"),
        sanitize_filename(submission_id, "submission"),
        now.timestamp_millis()
    )
}
