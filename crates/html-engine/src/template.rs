//! Placeholder substitution for HTML form templates
//!
//! Templates use `{{ key }}` markers. A key is looked up in the JSON
//! context; dotted keys (`form.title`) descend into nested objects.
//! Unknown keys render as an empty string so partially-filled
//! submissions still produce a document.

use serde_json::{Map, Value};

/// Render a template source against a JSON context.
pub fn render(source: &str, context: &Map<String, Value>) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                out.push_str(&lookup(context, key));
                rest = &after[end + 2..];
            }
            None => {
                // Unterminated marker: emit literally.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn lookup(context: &Map<String, Value>, key: &str) -> String {
    let mut parts = key.split('.');
    let first = match parts.next() {
        Some(p) if !p.is_empty() => p,
        _ => return String::new(),
    };

    let mut current = match context.get(first) {
        Some(v) => v,
        None => return String::new(),
    };
    for part in parts {
        current = match current.get(part) {
            Some(v) => v,
            None => return String::new(),
        };
    }
    coerce(current)
}

fn coerce(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn context() -> Map<String, Value> {
        let mut ctx = Map::new();
        ctx.insert("full_name".into(), json!("José García"));
        ctx.insert("amount".into(), json!("1000.00"));
        ctx.insert("form".into(), json!({"code": "sc-100", "title": "Small Claims"}));
        ctx
    }

    #[test]
    fn substitutes_simple_placeholders() {
        let html = render("<p>{{ full_name }} owes {{ amount }}</p>", &context());
        assert_eq!(html, "<p>José García owes 1000.00</p>");
    }

    #[test]
    fn substitutes_dotted_paths() {
        let html = render("<title>{{ form.title }}</title>", &context());
        assert_eq!(html, "<title>Small Claims</title>");
    }

    #[test]
    fn unknown_keys_render_empty() {
        let html = render("[{{ missing }}][{{ form.nope }}]", &context());
        assert_eq!(html, "[][]");
    }

    #[test]
    fn unterminated_marker_is_literal() {
        let html = render("before {{ broken", &context());
        assert_eq!(html, "before {{ broken");
    }

    #[test]
    fn text_without_markers_passes_through() {
        let html = render("<h1>Notice</h1>", &context());
        assert_eq!(html, "<h1>Notice</h1>");
    }

    #[test]
    fn booleans_and_numbers_coerce() {
        let mut ctx = Map::new();
        ctx.insert("filed".into(), json!(true));
        ctx.insert("count".into(), json!(3));
        assert_eq!(render("{{ filed }}/{{ count }}", &ctx), "true/3");
    }
}
