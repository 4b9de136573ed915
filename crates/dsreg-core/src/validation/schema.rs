/// Field schema rules: allowed fields, required fields, field types, URLs.
///
/// All rules here are driven by the per-kind [`KindRules`] in the
/// configuration, so widening the whitelist or adding a URL field needs no
/// code change.
use std::ops::ControlFlow;

use serde_json::Value;

use crate::config::{KindRules, ValidationConfig};
use crate::record::{Record, RecordKind, Registry};
use crate::url_check::is_valid_url;

use super::{Findings, Location, Stage, ValidationRule, Violation, ViolationKind, all_records};


/// The datasets collection must hold at least one record.
pub struct NonEmptyRegistry;

impl ValidationRule for NonEmptyRegistry {
    fn name(&self) -> &'static str {
        "non-empty-registry"
    }

    fn stage(&self) -> Stage {
        Stage::Schema
    }

    fn check(
        &self,
        registry: &Registry,
        _config: &ValidationConfig,
        findings: &mut Findings,
    ) -> ControlFlow<()> {
        if registry.datasets.is_empty() {
            findings.report(Violation::new(
                ViolationKind::EmptyRegistry,
                Location::Collection {
                    kind: RecordKind::Dataset,
                },
                None,
                "no datasets loaded",
            ))?;
        }
        ControlFlow::Continue(())
    }
}

/// Every key of every record belongs to its kind's allowed set.
///
/// Each unknown key produces its own violation.
pub struct AllowedFields;

impl ValidationRule for AllowedFields {
    fn name(&self) -> &'static str {
        "allowed-fields"
    }

    fn stage(&self) -> Stage {
        Stage::Schema
    }

    fn check(
        &self,
        registry: &Registry,
        config: &ValidationConfig,
        findings: &mut Findings,
    ) -> ControlFlow<()> {
        for (kind, index, record) in all_records(registry) {
            let rules = config.rules(kind);
            for key in record.keys().filter(|k| !rules.allows(k)) {
                findings.report(Violation::new(
                    ViolationKind::SchemaViolation,
                    Location::field(kind, record.id(), index, key),
                    Some(key.to_owned()),
                    format!("unknown field name \"{key}\""),
                ))?;
            }
        }
        ControlFlow::Continue(())
    }
}

/// Every record carries its kind's required fields.
pub struct RequiredFields;

impl ValidationRule for RequiredFields {
    fn name(&self) -> &'static str {
        "required-fields"
    }

    fn stage(&self) -> Stage {
        Stage::Schema
    }

    fn check(
        &self,
        registry: &Registry,
        config: &ValidationConfig,
        findings: &mut Findings,
    ) -> ControlFlow<()> {
        for (kind, index, record) in all_records(registry) {
            let rules = config.rules(kind);
            for field in rules.required_fields.iter().filter(|f| !record.contains(f)) {
                findings.report(Violation::new(
                    ViolationKind::SchemaViolation,
                    Location::field(kind, record.id(), index, field),
                    None,
                    format!("missing required field \"{field}\""),
                ))?;
            }
        }
        ControlFlow::Continue(())
    }
}

/// Checked fields hold the JSON type the other rules expect.
///
/// Required, URL, trimmed, and identifier fields must be strings. URL fields
/// may also be `null`, which counts as unpopulated. `original` must be an
/// object, and its `joins_to` an array of strings.
pub struct FieldTypes;

impl ValidationRule for FieldTypes {
    fn name(&self) -> &'static str {
        "field-types"
    }

    fn stage(&self) -> Stage {
        Stage::Schema
    }

    fn check(
        &self,
        registry: &Registry,
        config: &ValidationConfig,
        findings: &mut Findings,
    ) -> ControlFlow<()> {
        for (kind, index, record) in all_records(registry) {
            let rules = config.rules(kind);
            for field in string_fields(rules) {
                let nullable = rules.url_fields.iter().any(|f| f == field);
                match record.get(field) {
                    None | Some(Value::String(_)) => {}
                    Some(Value::Null) if nullable => {}
                    Some(other) => {
                        findings.report(Violation::new(
                            ViolationKind::SchemaViolation,
                            Location::field(kind, record.id(), index, field),
                            Some(other.to_string()),
                            format!("field \"{field}\" must be a string, found {}", type_name(other)),
                        ))?;
                    }
                }
            }
            check_original(kind, index, record, findings)?;
        }
        ControlFlow::Continue(())
    }
}

/// Populated URL fields parse as absolute URLs. Empty strings are exempt.
pub struct WellFormedUrls;

impl ValidationRule for WellFormedUrls {
    fn name(&self) -> &'static str {
        "well-formed-urls"
    }

    fn stage(&self) -> Stage {
        Stage::Schema
    }

    fn check(
        &self,
        registry: &Registry,
        config: &ValidationConfig,
        findings: &mut Findings,
    ) -> ControlFlow<()> {
        for (kind, index, record) in all_records(registry) {
            for field in &config.rules(kind).url_fields {
                let Some(url) = record.str_field(field) else {
                    continue;
                };
                if url.is_empty() || is_valid_url(url) {
                    continue;
                }
                findings.report(Violation::new(
                    ViolationKind::InvalidUrl,
                    Location::field(kind, record.id(), index, field),
                    Some(url.to_owned()),
                    format!("badly formed URL \"{url}\""),
                ))?;
            }
        }
        ControlFlow::Continue(())
    }
}

/// Fields whose values must be strings, deduplicated, in first-seen order.
fn string_fields(rules: &KindRules) -> Vec<&str> {
    let mut fields: Vec<&str> = Vec::new();
    let candidates = rules
        .required_fields
        .iter()
        .chain(&rules.url_fields)
        .chain(&rules.trimmed_fields)
        .chain(&rules.non_empty_fields);
    for field in candidates {
        // `original` is structural, checked separately.
        if field != "original" && !fields.contains(&field.as_str()) {
            fields.push(field);
        }
    }
    fields
}

fn check_original(
    kind: RecordKind,
    index: usize,
    record: &Record,
    findings: &mut Findings,
) -> ControlFlow<()> {
    let Some(original) = record.get("original") else {
        return ControlFlow::Continue(());
    };
    let Value::Object(original) = original else {
        return findings.report(Violation::new(
            ViolationKind::SchemaViolation,
            Location::field(kind, record.id(), index, "original"),
            Some(original.to_string()),
            format!("field \"original\" must be an object, found {}", type_name(original)),
        ));
    };
    let Some(joins_to) = original.get("joins_to") else {
        return ControlFlow::Continue(());
    };
    let well_typed = joins_to
        .as_array()
        .is_some_and(|targets| targets.iter().all(Value::is_string));
    if !well_typed {
        findings.report(Violation::new(
            ViolationKind::SchemaViolation,
            Location::field(kind, record.id(), index, "original.joins_to"),
            Some(joins_to.to_string()),
            "field \"original.joins_to\" must be an array of dataset id strings",
        ))?;
    }
    ControlFlow::Continue(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
