//! `${NAME}` substitution over parsed JSON documents
//!
//! Substitution runs on string scalars after parsing, never on raw document
//! text, so replacement values cannot change the document's structure.
//! Object keys are left untouched.

use std::collections::BTreeMap;

use aep_domain::{AepError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{(\w+)\}").expect("PLACEHOLDER pattern is valid"));

/// Replacement values for `${NAME}` tokens
///
/// Names are resolved from the explicit mapping first, then from the
/// process environment when enabled. A name found in neither is replaced by
/// the bare name when the environment is enabled, and is a configuration
/// error otherwise.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    mapping: BTreeMap<String, String>,
    use_env: bool,
}

impl Substitutions {
    /// Mapping-only substitution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment-backed substitution with an empty mapping.
    pub fn from_env() -> Self {
        Self { mapping: BTreeMap::new(), use_env: true }
    }

    pub fn with_mapping<K, V>(mut self, mapping: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.mapping.extend(mapping.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.mapping.insert(name.into(), value.into());
        self
    }

    pub fn with_env(mut self, enabled: bool) -> Self {
        self.use_env = enabled;
        self
    }

    /// Build a mapping from the string scalars at the top level of a
    /// document. Numbers and booleans are rendered in their JSON form.
    pub fn mapping_from_document(document: &Value) -> Result<BTreeMap<String, String>> {
        let Value::Object(map) = document else {
            return Err(AepError::Config("parameter document must be a mapping".to_string()));
        };
        map.iter()
            .map(|(name, value)| {
                aep_domain::utils::json_path::scalar_to_string(value)
                    .map(|v| (name.clone(), v))
                    .ok_or_else(|| {
                        AepError::Config(format!("parameter '{name}' must be a scalar value"))
                    })
            })
            .collect()
    }

    /// Replace every token in one string.
    pub fn apply_str(&self, text: &str) -> Result<String> {
        let mut missing = None;
        let replaced = PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            match self.resolve(name) {
                Some(value) => value,
                None => {
                    missing.get_or_insert_with(|| name.to_string());
                    String::new()
                }
            }
        });

        match missing {
            Some(name) => Err(AepError::Config(format!("no value for parameter '{name}'"))),
            None => Ok(replaced.into_owned()),
        }
    }

    /// Replace tokens in every string scalar of a document.
    pub fn apply(&self, value: Value) -> Result<Value> {
        match value {
            Value::String(s) => self.apply_str(&s).map(Value::String),
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.apply(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Value::Object(map) => map
                .into_iter()
                .map(|(key, item)| self.apply(item).map(|item| (key, item)))
                .collect::<Result<serde_json::Map<_, _>>>()
                .map(Value::Object),
            other => Ok(other),
        }
    }

    fn resolve(&self, name: &str) -> Option<String> {
        if let Some(value) = self.mapping.get(name) {
            return Some(value.clone());
        }
        if self.use_env {
            return Some(std::env::var(name).unwrap_or_else(|_| name.to_string()));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_mapping_replaces_tokens_inside_strings() {
        let subs = Substitutions::new().with_value("PLATFORM_GATEWAY", "https://platform.adobe.io");
        let out = subs.apply_str("${PLATFORM_GATEWAY}/data/foundation/catalog/dataSets").unwrap();
        assert_eq!(out, "https://platform.adobe.io/data/foundation/catalog/dataSets");
    }

    #[test]
    fn test_missing_name_without_env_is_config_error() {
        let err = Substitutions::new().apply_str("${NOPE}/x").unwrap_err();
        assert!(matches!(err, AepError::Config(ref m) if m.contains("NOPE")));
    }

    #[test]
    fn test_env_fallback_uses_literal_name_when_unset() {
        let subs = Substitutions::from_env();
        let out = subs.apply_str("${AEP_TEMPLATE_TEST_SURELY_UNSET_VAR}").unwrap();
        assert_eq!(out, "AEP_TEMPLATE_TEST_SURELY_UNSET_VAR");
    }

    #[test]
    fn test_mapping_wins_over_env() {
        let subs = Substitutions::from_env().with_value("PATH", "mapped");
        assert_eq!(subs.apply_str("${PATH}").unwrap(), "mapped");
    }

    #[test]
    fn test_apply_walks_nested_values_and_keeps_keys() {
        let subs = Substitutions::new().with_value("NAME", "profiles");
        let doc = json!({
            "${NAME}": 1,
            "name": "${NAME}",
            "tags": ["a-${NAME}", 3, null],
            "nested": { "flag": true, "title": "${NAME} set" }
        });
        let out = subs.apply(doc).unwrap();
        assert_eq!(out["${NAME}"], 1);
        assert_eq!(out["name"], "profiles");
        assert_eq!(out["tags"][0], "a-profiles");
        assert_eq!(out["tags"][1], 3);
        assert_eq!(out["nested"]["title"], "profiles set");
        assert_eq!(out["nested"]["flag"], true);
    }

    #[test]
    fn test_replacement_text_is_not_rescanned() {
        let subs = Substitutions::new().with_value("A", "${B}");
        assert_eq!(subs.apply_str("${A}").unwrap(), "${B}");
    }

    #[test]
    fn test_mapping_from_document() {
        let mapping = Substitutions::mapping_from_document(
            &json!({ "PLATFORM_GATEWAY": "https://platform.adobe.io", "VERSION": 2 }),
        )
        .unwrap();
        assert_eq!(mapping["VERSION"], "2");
        assert!(Substitutions::mapping_from_document(&json!({ "X": [] })).is_err());
        assert!(Substitutions::mapping_from_document(&json!("x")).is_err());
    }
}
