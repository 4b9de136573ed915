//! Shared constructors for registry fixtures.
//!
//! Compiled only in test builds. Integration tests under `tests/` build
//! their own fixtures because they link against the non-test library.
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(clippy::wildcard_enum_match_arm)]

use serde_json::{Value, json};

use crate::config::ValidationConfig;
use crate::record::{Record, Registry};
use crate::validation::{Findings, ValidationRule, Violation, ViolationKind};

/// Builds a record from a `json!` object literal.
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(fields) => Record::new(fields),
        other => panic!("fixture must be a JSON object, got {other}"),
    }
}

/// A dataset with only the required fields.
pub fn dataset(id: &str, title: &str, provider: &str) -> Record {
    record(json!({"id": id, "title": title, "provider": provider}))
}

/// A provider with only the required fields.
pub fn provider(id: &str, title: &str) -> Record {
    record(json!({"id": id, "title": title}))
}

/// A small registry that passes every rule.
pub fn clean_registry() -> Registry {
    Registry::new(
        vec![
            dataset("dataset-1", "Census Microdata", "provider-1"),
            record(json!({
                "id": "dataset-2",
                "title": "Household Survey",
                "provider": "provider-2",
                "url": "https://example.org/surveys/household",
                "original": {"joins_to": ["dataset-1"]}
            })),
        ],
        vec![
            provider("provider-1", "Statistics Office"),
            record(json!({
                "id": "provider-2",
                "title": "Survey Institute",
                "ror": "https://ror.org/05abcde12"
            })),
        ],
    )
}

/// Runs one rule in collect-all mode and returns its findings.
pub fn run_rule(rule: &dyn ValidationRule, registry: &Registry) -> Vec<Violation> {
    let config = ValidationConfig::collect_all();
    let mut findings = Findings::new(config.mode);
    let flow = rule.check(registry, &config, &mut findings);
    assert!(flow.is_continue(), "collect-all runs never break");
    findings.into_violations()
}

/// The kinds of a list of violations, in order.
pub fn kinds(violations: &[Violation]) -> Vec<ViolationKind> {
    violations.iter().map(|v| v.kind).collect()
}
