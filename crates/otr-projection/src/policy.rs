use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::ProjectionResult;

/// Caller-supplied rules for turning raw history records into display rows.
///
/// All keys are entity-relative paths, i.e. the record key with its leading
/// entity segment removed (`details.orderStatus`, not `0.details.orderStatus`).
///
/// A policy is plain data. It is never persisted by the history store and is
/// passed fresh into every projection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationPolicy {
    /// Show every record, skipping the ignore-list and the allow-list.
    pub verbose: bool,
    /// Null out string payloads of anonymous keys.
    pub redact: bool,
    /// Paths hidden in non-verbose mode. Matched as plain string prefixes, so
    /// an entry ending in `.` hides a whole subtree.
    pub ignored_prefixes: BTreeSet<String>,
    /// Human-readable labels. In non-verbose mode a key must appear here or
    /// in `anonymous_keys` to be shown.
    pub translations: BTreeMap<String, String>,
    /// Keys carrying identifying data such as a VIN.
    pub anonymous_keys: BTreeSet<String>,
}

impl TranslationPolicy {
    /// Parse a policy from TOML.
    pub fn from_toml_str(raw: &str) -> ProjectionResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn redact(mut self, redact: bool) -> Self {
        self.redact = redact;
        self
    }

    pub fn ignore(mut self, prefix: impl Into<String>) -> Self {
        self.ignored_prefixes.insert(prefix.into());
        self
    }

    pub fn translate(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.translations.insert(key.into(), label.into());
        self
    }

    pub fn anonymize(mut self, key: impl Into<String>) -> Self {
        self.anonymous_keys.insert(key.into());
        self
    }

    /// Returns `true` if `key` starts with any ignored prefix.
    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignored_prefixes
            .iter()
            .any(|prefix| key.starts_with(prefix.as_str()))
    }

    /// Returns `true` if `key` passes the non-verbose allow-list.
    pub fn is_allowed(&self, key: &str) -> bool {
        self.translations.contains_key(key) || self.anonymous_keys.contains(key)
    }

    pub fn is_anonymous(&self, key: &str) -> bool {
        self.anonymous_keys.contains(key)
    }

    /// Display label for `key`, if one is configured.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.translations.get(key).map(String::as_str)
    }
}
