/// Immutable validation configuration.
///
/// A [`ValidationConfig`] enumerates, per record kind, which fields are
/// allowed, which are required, the id pattern, and which fields receive the
/// URL and hygiene checks. It is built once and shared by reference with every
/// rule in the pipeline.
use std::sync::LazyLock;

use regex::Regex;

use crate::record::RecordKind;

/// Matches `dataset-<digits>`, capturing the digits.
static DATASET_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^dataset-([0-9]+)$").unwrap_or_else(|e| unreachable!("built-in pattern: {e}"))
});

/// Matches `provider-<digits>`, capturing the digits.
static PROVIDER_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^provider-([0-9]+)$").unwrap_or_else(|e| unreachable!("built-in pattern: {e}"))
});

const DATASET_ALLOWED: &[&str] = &[
    "alt_ids",
    "alt_title",
    "date",
    "description",
    "doi",
    "id",
    "original",
    "provider",
    "title",
    "url",
];

const PROVIDER_ALLOWED: &[&str] = &["id", "ror", "title", "url"];

/// How the pipeline reacts to the first violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Stop at the first violation.
    #[default]
    FailFast,
    /// Run every rule and report every violation.
    CollectAll,
}

/// Field rules for one record kind.
#[derive(Debug, Clone)]
pub struct KindRules {
    /// Every key a record may carry.
    pub allowed_fields: Vec<String>,
    /// Keys every record must carry.
    pub required_fields: Vec<String>,
    /// Id shape. Capture group 1 must hold the numeric suffix.
    pub id_pattern: Regex,
    /// Fields whose non-empty values must be well-formed absolute URLs.
    pub url_fields: Vec<String>,
    /// Fields that must not start or end with whitespace.
    pub trimmed_fields: Vec<String>,
    /// Optional identifier fields that must not be empty when present.
    pub non_empty_fields: Vec<String>,
}

impl KindRules {
    /// Default rules for dataset records.
    pub fn datasets() -> Self {
        Self {
            allowed_fields: owned(DATASET_ALLOWED),
            required_fields: owned(&["id", "title", "provider"]),
            id_pattern: DATASET_ID_RE.clone(),
            url_fields: owned(&["url"]),
            trimmed_fields: owned(&["title"]),
            non_empty_fields: Vec::new(),
        }
    }

    /// Default rules for provider records.
    pub fn providers() -> Self {
        Self {
            allowed_fields: owned(PROVIDER_ALLOWED),
            required_fields: owned(&["id", "title"]),
            id_pattern: PROVIDER_ID_RE.clone(),
            url_fields: Vec::new(),
            trimmed_fields: owned(&["title", "ror"]),
            non_empty_fields: owned(&["ror"]),
        }
    }

    /// Returns `true` if `field` is in the allowed set.
    pub fn allows(&self, field: &str) -> bool {
        self.allowed_fields.iter().any(|f| f == field)
    }

    /// Extracts the numeric suffix of a well-formed id, or `None` if the id
    /// does not match [`KindRules::id_pattern`].
    pub fn id_number<'a>(&self, id: &'a str) -> Option<&'a str> {
        self.id_pattern
            .captures(id)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// The numeric suffix with leading zeros stripped, so `dataset-07` and
    /// `dataset-7` share a key. Digits are never parsed, so arbitrarily long
    /// suffixes cannot overflow.
    pub fn id_key<'a>(&self, id: &'a str) -> Option<&'a str> {
        self.id_number(id).map(|digits| {
            let trimmed = digits.trim_start_matches('0');
            if trimmed.is_empty() { "0" } else { trimmed }
        })
    }
}

/// Controls which stages run and how violations are handled.
///
/// # Default
///
/// ```
/// # use dsreg_core::{FailureMode, ValidationConfig};
/// let cfg = ValidationConfig::default();
/// assert_eq!(cfg.mode, FailureMode::FailFast);
/// assert!(cfg.run_schema && cfg.run_identity && cfg.run_references && cfg.run_hygiene);
/// ```
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Rules for the datasets collection.
    pub datasets: KindRules,
    /// Rules for the providers collection.
    pub providers: KindRules,
    /// Fail fast or collect everything.
    pub mode: FailureMode,
    /// Run the field schema stage.
    pub run_schema: bool,
    /// Run the id format and uniqueness stage.
    pub run_identity: bool,
    /// Run the provider and join reference stage.
    pub run_references: bool,
    /// Run the whitespace and empty-value stage.
    pub run_hygiene: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            datasets: KindRules::datasets(),
            providers: KindRules::providers(),
            mode: FailureMode::default(),
            run_schema: true,
            run_identity: true,
            run_references: true,
            run_hygiene: true,
        }
    }
}

impl ValidationConfig {
    /// Default rules with every violation collected.
    pub fn collect_all() -> Self {
        Self {
            mode: FailureMode::CollectAll,
            ..Self::default()
        }
    }

    /// Returns the rules for the given kind.
    pub fn rules(&self, kind: RecordKind) -> &KindRules {
        match kind {
            RecordKind::Dataset => &self.datasets,
            RecordKind::Provider => &self.providers,
        }
    }
}

fn owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| (*f).to_owned()).collect()
}
