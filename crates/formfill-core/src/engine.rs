//! Binary form-fill engines
//!
//! Primary: pdftk `fill_form` over an FDF document (best appearance
//! regeneration and flattening). Fallback: lopdf, setting /V directly on
//! each matching AcroForm field. Engine choice is a capability probe at
//! construction, never a caught crash at fill time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use lopdf::{Document, Object, StringFormat};

use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::extract::pdftk_available;
use crate::fdf::serialize_fdf;
use crate::pdf::{acroform_id, encode_pdf_string, terminal_fields, FF_READ_ONLY};

#[derive(Debug, Clone)]
pub enum FillEngine {
    /// Shell out to pdftk.
    Pdftk(PathBuf),
    /// In-process lopdf manipulation.
    Library,
}

impl FillEngine {
    /// Probe the host and pick the best available engine.
    pub fn select(config: &GeneratorConfig) -> Self {
        if pdftk_available(&config.pdftk_binary) {
            FillEngine::Pdftk(config.pdftk_binary.clone())
        } else {
            tracing::debug!(
                binary = %config.pdftk_binary.display(),
                "pdftk unavailable, using library fill engine"
            );
            FillEngine::Library
        }
    }

    pub fn fill(
        &self,
        source: &Path,
        values: &BTreeMap<String, String>,
        flatten: bool,
    ) -> Result<Vec<u8>, GenerationError> {
        match self {
            FillEngine::Pdftk(binary) => fill_with_pdftk(binary, source, values, flatten),
            FillEngine::Library => fill_with_lopdf(source, values, flatten),
        }
    }
}

fn fill_with_pdftk(
    binary: &Path,
    source: &Path,
    values: &BTreeMap<String, String>,
    flatten: bool,
) -> Result<Vec<u8>, GenerationError> {
    let workdir = tempfile::tempdir()?;
    let fdf_path = workdir.path().join("data.fdf");
    let out_path = workdir.path().join("filled.pdf");
    std::fs::write(&fdf_path, serialize_fdf(values))?;

    let mut cmd = Command::new(binary);
    cmd.arg(source)
        .arg("fill_form")
        .arg(&fdf_path)
        .arg("output")
        .arg(&out_path);
    if flatten {
        cmd.arg("flatten");
    }

    let output = cmd.output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GenerationError::Engine(format!(
            "pdftk exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(std::fs::read(&out_path)?)
}

pub fn fill_with_lopdf(
    source: &Path,
    values: &BTreeMap<String, String>,
    flatten: bool,
) -> Result<Vec<u8>, GenerationError> {
    let mut doc = Document::load(source)
        .map_err(|e| GenerationError::Engine(format!("Failed to load document: {}", e)))?;

    let targets: Vec<_> = terminal_fields(&doc)
        .into_iter()
        .filter_map(|f| f.id.map(|id| (id, f.name.clone(), f.is_button())))
        .collect();

    for (id, name, is_button) in targets {
        // Values for widgets that no longer exist in the document are
        // silently ignored elsewhere; here the mirror case applies and
        // document fields without a submitted value are left untouched.
        let Some(value) = values.get(&name) else {
            continue;
        };
        let dict = doc
            .get_object_mut(id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| GenerationError::Engine(format!("Bad field object: {}", e)))?;

        if is_button {
            let state: &str = if value == "Yes" { "Yes" } else { "Off" };
            dict.set("V", Object::Name(state.as_bytes().to_vec()));
            dict.set("AS", Object::Name(state.as_bytes().to_vec()));
        } else {
            dict.set(
                "V",
                Object::String(encode_pdf_string(value), StringFormat::Literal),
            );
            // Stale appearance streams would keep showing the old value.
            dict.remove(b"AP");
        }

        if flatten {
            let flags = dict
                .get(b"Ff")
                .ok()
                .and_then(|o| o.as_i64().ok())
                .unwrap_or(0);
            dict.set("Ff", Object::Integer(flags | FF_READ_ONLY));
        }
    }

    // Viewers must regenerate appearances for the values set above.
    if let Some(form_id) = acroform_id(&doc) {
        if let Ok(form) = doc.get_object_mut(form_id).and_then(Object::as_dict_mut) {
            form.set("NeedAppearances", Object::Boolean(true));
        }
    }

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| GenerationError::Engine(format!("Failed to save filled PDF: {}", e)))?;
    Ok(buffer)
}
