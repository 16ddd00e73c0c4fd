use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Bumped whenever the generation pipeline changes output for identical
/// form data, so stale cache entries can never be served across a deploy.
const FINGERPRINT_VERSION: &str = "2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    InProgress,
    Completed,
}

/// One user's answer set for a form.
///
/// Mutated field-by-field while the user fills the form; the generation
/// pipeline only reads `form_data` and records a generation marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub form_code: String,
    pub form_data: Map<String, Value>,
    pub status: SubmissionStatus,
    pub updated_at: DateTime<Utc>,
    pub generated_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub fn new(form_code: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            form_code: form_code.into(),
            form_data: Map::new(),
            status: SubmissionStatus::InProgress,
            updated_at: Utc::now(),
            generated_at: None,
        }
    }

    /// Set a single field value, invalidating any cached render.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.form_data.insert(name.into(), value);
        self.updated_at = Utc::now();
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.form_data.get(name)
    }

    /// Deterministic content hash of the form data plus a schema-version
    /// tag, used as the render cache key.
    ///
    /// `serde_json::Map` is backed by a BTreeMap, so serialization order
    /// is independent of insertion order.
    pub fn fingerprint(&self) -> String {
        let body = serde_json::to_vec(&self.form_data).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(FINGERPRINT_VERSION.as_bytes());
        hasher.update(b"|");
        hasher.update(&body);
        hex::encode(hasher.finalize())
    }

    /// Whether a cached render is still trustworthy: true only if nothing
    /// was mutated since the last generation marker.
    pub fn cache_valid(&self) -> bool {
        self.generated_at
            .map(|generated| generated >= self.updated_at)
            .unwrap_or(false)
    }

    /// Record that a render was produced from the current form data.
    pub fn mark_generated(&mut self) {
        self.generated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn fingerprint_is_deterministic() {
        let mut a = Submission::new("sc-100");
        a.set_field("full_name", json!("José García"));
        a.set_field("amount", json!("1000"));

        let mut b = Submission::new("sc-100");
        // Reverse insertion order; fingerprint must not change.
        b.set_field("amount", json!("1000"));
        b.set_field("full_name", json!("José García"));

        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_changes_when_data_changes() {
        let mut sub = Submission::new("sc-100");
        sub.set_field("amount", json!("1000"));
        let before = sub.fingerprint();

        sub.set_field("amount", json!("2000"));
        assert_ne!(before, sub.fingerprint());
    }

    #[test]
    fn cache_invalid_before_first_generation() {
        let sub = Submission::new("sc-100");
        assert!(!sub.cache_valid());
    }

    #[test]
    fn cache_valid_after_mark_generated() {
        let mut sub = Submission::new("sc-100");
        sub.set_field("amount", json!("1000"));
        sub.mark_generated();
        assert!(sub.cache_valid());
    }

    #[test]
    fn mutation_invalidates_cache() {
        let mut sub = Submission::new("sc-100");
        sub.set_field("amount", json!("1000"));
        sub.mark_generated();
        // Guarantee a strictly later mutation timestamp.
        std::thread::sleep(std::time::Duration::from_millis(2));
        sub.set_field("amount", json!("2000"));
        assert!(!sub.cache_valid());
    }

    proptest! {
        #[test]
        fn fingerprint_is_64_hex_chars(
            key in "[a-z_]{1,16}",
            value in "[ -~]{0,64}",
        ) {
            let mut sub = Submission::new("sc-100");
            sub.set_field(key, json!(value));
            let fp = sub.fingerprint();
            prop_assert_eq!(fp.len(), 64);
            prop_assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
