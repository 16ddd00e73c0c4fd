//! FDF serialization for the pdftk fill engine
//!
//! pdftk's `fill_form` consumes a Forms Data Format document mapping
//! widget names to values. ASCII values are written as escaped literal
//! strings; anything else as UTF-16BE hex strings, which pdftk handles
//! reliably across locales.

use std::collections::BTreeMap;

use crate::pdf::utf16be_bytes;

/// Serialize a widget-name -> formatted-value map to FDF bytes.
pub fn serialize_fdf(values: &BTreeMap<String, String>) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"%FDF-1.2\n");
    out.extend_from_slice(b"1 0 obj\n<< /FDF << /Fields [\n");
    for (widget, value) in values {
        out.extend_from_slice(b"<< /T ");
        write_string(&mut out, widget);
        out.extend_from_slice(b" /V ");
        write_string(&mut out, value);
        out.extend_from_slice(b" >>\n");
    }
    out.extend_from_slice(b"] >> >>\nendobj\ntrailer\n<< /Root 1 0 R >>\n%%EOF\n");
    out
}

fn write_string(out: &mut Vec<u8>, value: &str) {
    if value.is_ascii() {
        out.push(b'(');
        for byte in value.bytes() {
            match byte {
                b'(' | b')' | b'\\' => {
                    out.push(b'\\');
                    out.push(byte);
                }
                b'\n' => out.extend_from_slice(b"\\n"),
                b'\r' => out.extend_from_slice(b"\\r"),
                other => out.push(other),
            }
        }
        out.push(b')');
    } else {
        out.push(b'<');
        for byte in utf16be_bytes(value) {
            out.extend_from_slice(format!("{:02X}", byte).as_bytes());
        }
        out.push(b'>');
    }
}
