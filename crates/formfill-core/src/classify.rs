//! Widget-name heuristics for semantic field types
//!
//! Court-form widget names are free-form ("PlaintiffPhoneNumber",
//! "FilingFeeTotal", "DateSigned"), so classification is a set of
//! ordered case-insensitive substring heuristics. First match wins;
//! anything unmatched is plain text.

use catalog_types::SemanticType;

/// Heuristics in declaration order; earlier entries win ties.
const HEURISTICS: &[(&[&str], SemanticType)] = &[
    (&["phone", "tel"], SemanticType::Tel),
    (&["email"], SemanticType::Email),
    (&["amount", "total", "fee"], SemanticType::Currency),
    (&["date", "signed"], SemanticType::Date),
];

/// Map a raw widget name to a semantic field type.
///
/// Pure and total: unmatched names always resolve to `Text`.
pub fn classify(widget_name: &str) -> SemanticType {
    let lower = widget_name.to_lowercase();
    for (keywords, semantic) in HEURISTICS {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return *semantic;
        }
    }
    SemanticType::Text
}
