//! Field-value formatting for the fill engines
//!
//! Output strings must match what the rendering engines expect exactly:
//! checkbox widgets toggle on the literal "Yes"/"Off" pair, currency is
//! always two fractional digits, dates print US-style. These rules are
//! load-bearing for output compatibility with the filed court forms.

use catalog_types::SemanticType;
use chrono::NaiveDate;
use serde_json::Value;

use crate::error::FormatError;

/// Format a raw submitted value for its semantic type.
///
/// Total over the enum: null and absent values map to the empty string,
/// except checkboxes which default to "Off".
pub fn format_value(semantic: SemanticType, raw: &Value) -> Result<String, FormatError> {
    match semantic {
        SemanticType::Checkbox => Ok(format_checkbox(raw)),
        SemanticType::Currency => format_currency(raw),
        SemanticType::Date => Ok(format_date(raw)),
        SemanticType::Address => Ok(format_address(raw)),
        SemanticType::Text
        | SemanticType::Textarea
        | SemanticType::Email
        | SemanticType::Tel
        | SemanticType::Select
        | SemanticType::Radio
        | SemanticType::Number
        | SemanticType::Signature
        | SemanticType::RepeatingGroup
        | SemanticType::Hidden => Ok(coerce(raw)),
    }
}

fn format_checkbox(raw: &Value) -> String {
    let checked = match raw {
        Value::Bool(b) => *b,
        Value::String(s) => s == "1" || s.eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    };
    if checked { "Yes" } else { "Off" }.to_string()
}

fn format_currency(raw: &Value) -> Result<String, FormatError> {
    let parsed = match raw {
        Value::Null => return Ok(String::new()),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(String::new());
            }
            trimmed.parse::<f64>().ok()
        }
        _ => None,
    };
    match parsed {
        Some(v) => Ok(format!("{:.2}", v)),
        None => Err(FormatError::Currency(coerce(raw))),
    }
}

fn format_date(raw: &Value) -> String {
    match raw {
        Value::String(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => date.format("%m/%d/%Y").to_string(),
            // Documented leniency: unparseable dates pass through
            // unchanged rather than failing the whole render.
            Err(_) => s.clone(),
        },
        other => coerce(other),
    }
}

fn format_address(raw: &Value) -> String {
    match raw {
        Value::Object(parts) => {
            let get = |key: &str| {
                parts
                    .get(key)
                    .map(coerce)
                    .filter(|s| !s.is_empty())
            };
            let mut pieces = Vec::new();
            if let Some(street) = get("street") {
                pieces.push(street);
            }
            if let Some(street2) = get("street2") {
                pieces.push(street2);
            }
            if let Some(city) = get("city") {
                pieces.push(city);
            }
            match (get("state"), get("zip")) {
                (Some(state), Some(zip)) => pieces.push(format!("{} {}", state, zip)),
                (Some(state), None) => pieces.push(state),
                (None, Some(zip)) => pieces.push(zip),
                (None, None) => {}
            }
            pieces.join(", ")
        }
        other => coerce(other),
    }
}

/// Pass-through string coercion for plain field types.
fn coerce(raw: &Value) -> String {
    match raw {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(coerce).collect::<Vec<_>>().join(", "),
        Value::Object(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn currency_pads_to_two_decimals() {
        let out = format_value(SemanticType::Currency, &json!("12.5")).unwrap();
        assert_eq!(out, "12.50");
    }

    #[test]
    fn currency_rounds_excess_precision() {
        let out = format_value(SemanticType::Currency, &json!("12.567")).unwrap();
        assert_eq!(out, "12.57");
    }

    #[test]
    fn currency_accepts_json_numbers() {
        let out = format_value(SemanticType::Currency, &json!(1000)).unwrap();
        assert_eq!(out, "1000.00");
    }

    #[test]
    fn currency_null_and_blank_render_empty() {
        assert_eq!(format_value(SemanticType::Currency, &Value::Null).unwrap(), "");
        assert_eq!(format_value(SemanticType::Currency, &json!("  ")).unwrap(), "");
    }

    #[test]
    fn non_numeric_currency_is_a_format_error() {
        let err = format_value(SemanticType::Currency, &json!("ten dollars")).unwrap_err();
        assert!(matches!(err, FormatError::Currency(_)));
    }

    #[test]
    fn iso_date_renders_us_style() {
        let out = format_value(SemanticType::Date, &json!("2026-01-01")).unwrap();
        assert_eq!(out, "01/01/2026");
    }

    #[test]
    fn unparseable_date_passes_through() {
        let out = format_value(SemanticType::Date, &json!("next Tuesday")).unwrap();
        assert_eq!(out, "next Tuesday");
    }

    #[test]
    fn checkbox_truthy_is_yes() {
        assert_eq!(format_value(SemanticType::Checkbox, &json!("1")).unwrap(), "Yes");
        assert_eq!(format_value(SemanticType::Checkbox, &json!("true")).unwrap(), "Yes");
        assert_eq!(format_value(SemanticType::Checkbox, &json!(true)).unwrap(), "Yes");
    }

    #[test]
    fn checkbox_everything_else_is_off() {
        assert_eq!(format_value(SemanticType::Checkbox, &Value::Null).unwrap(), "Off");
        assert_eq!(format_value(SemanticType::Checkbox, &json!(false)).unwrap(), "Off");
        assert_eq!(format_value(SemanticType::Checkbox, &json!("0")).unwrap(), "Off");
        assert_eq!(format_value(SemanticType::Checkbox, &json!("yes")).unwrap(), "Off");
    }

    #[test]
    fn structured_address_composes_sub_parts() {
        let raw = json!({
            "street": "123 Main St",
            "city": "Sacramento",
            "state": "CA",
            "zip": "95814"
        });
        let out = format_value(SemanticType::Address, &raw).unwrap();
        assert_eq!(out, "123 Main St, Sacramento, CA 95814");
    }

    #[test]
    fn flat_address_passes_through() {
        let out = format_value(SemanticType::Address, &json!("PO Box 7")).unwrap();
        assert_eq!(out, "PO Box 7");
    }

    #[test]
    fn text_coerces_strings_and_scalars() {
        assert_eq!(format_value(SemanticType::Text, &json!("José García")).unwrap(), "José García");
        assert_eq!(format_value(SemanticType::Text, &json!(7)).unwrap(), "7");
        assert_eq!(format_value(SemanticType::Text, &Value::Null).unwrap(), "");
    }

    proptest! {
        #[test]
        fn currency_output_always_has_two_fraction_digits(v in -1_000_000.0f64..1_000_000.0) {
            let out = format_value(SemanticType::Currency, &json!(v)).unwrap();
            let (_, frac) = out.split_once('.').expect("missing decimal point");
            prop_assert_eq!(frac.len(), 2);
        }

        #[test]
        fn checkbox_output_is_always_yes_or_off(s in "[ -~]{0,16}") {
            let out = format_value(SemanticType::Checkbox, &json!(s)).unwrap();
            prop_assert!(out == "Yes" || out == "Off");
        }
    }
}
