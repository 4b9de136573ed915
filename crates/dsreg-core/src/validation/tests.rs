#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use super::*;
use crate::test_helpers::{clean_registry, dataset, kinds, provider, record};

fn collect_all(registry: &Registry) -> ValidationReport {
    validate(registry, &ValidationConfig::collect_all())
}

// ── pipeline shape ──────────────────────────────────────────────────────────

#[test]
fn pipeline_runs_stages_in_order() {
    let pipeline = build_pipeline(&ValidationConfig::default());
    let stages: Vec<Stage> = pipeline.iter().map(|r| r.stage()).collect();
    let mut sorted = stages.clone();
    sorted.sort();
    assert_eq!(stages, sorted);
    assert_eq!(pipeline.len(), 12);
    assert_eq!(pipeline.first().map(|r| r.name()), Some("non-empty-registry"));
}

#[test]
fn disabled_stages_are_skipped() {
    let config = ValidationConfig {
        run_schema: false,
        run_hygiene: false,
        ..ValidationConfig::default()
    };
    let pipeline = build_pipeline(&config);
    assert!(
        pipeline
            .iter()
            .all(|r| matches!(r.stage(), Stage::Identity | Stage::References))
    );
}

#[test]
fn disabled_hygiene_ignores_whitespace() {
    let registry = Registry::new(
        vec![dataset("dataset-1", " Foo", "provider-1")],
        vec![provider("provider-1", "P")],
    );
    let config = ValidationConfig {
        run_hygiene: false,
        ..ValidationConfig::collect_all()
    };
    assert!(validate(&registry, &config).is_valid());
}

// ── scenarios ───────────────────────────────────────────────────────────────

#[test]
fn unknown_provider_fails_validation() {
    let registry = Registry::new(
        vec![dataset("dataset-1", "Foo", "provider-9")],
        vec![provider("provider-1", "Bar")],
    );
    let report = validate(&registry, &ValidationConfig::default());
    assert!(!report.is_valid());
    let v = report
        .by_kind(ViolationKind::UnknownProvider)
        .next()
        .expect("unknown provider reported");
    assert_eq!(v.location.record_id(), Some("dataset-1"));
    assert_eq!(v.value.as_deref(), Some("provider-9"));
}

#[test]
fn leading_whitespace_fails_validation() {
    let registry = Registry::new(
        vec![dataset("dataset-1", " Foo", "provider-1")],
        vec![provider("provider-1", "Bar")],
    );
    let report = validate(&registry, &ValidationConfig::default());
    assert_eq!(kinds(&report.violations), [ViolationKind::LeadingWhitespace]);
    assert_eq!(report.violations[0].location.field_name(), Some("title"));
    assert_eq!(report.violations[0].value.as_deref(), Some(" Foo"));
}

#[test]
fn dangling_join_fails_validation() {
    let registry = Registry::new(
        vec![
            dataset("dataset-1", "A", "provider-1"),
            record(json!({
                "id": "dataset-2",
                "title": "X",
                "provider": "provider-1",
                "original": {"joins_to": ["dataset-999"]}
            })),
        ],
        vec![provider("provider-1", "Bar")],
    );
    let report = validate(&registry, &ValidationConfig::default());
    assert_eq!(kinds(&report.violations), [ViolationKind::UnknownJoinTarget]);
    assert_eq!(report.violations[0].location.record_id(), Some("dataset-2"));
    assert_eq!(report.violations[0].value.as_deref(), Some("dataset-999"));
}

#[test]
fn duplicate_id_fails_validation() {
    let registry = Registry::new(
        vec![
            dataset("dataset-3", "A", "provider-1"),
            dataset("dataset-3", "B", "provider-1"),
        ],
        vec![provider("provider-1", "Bar")],
    );
    let report = validate(&registry, &ValidationConfig::default());
    assert_eq!(kinds(&report.violations), [ViolationKind::DuplicateId]);
    assert_eq!(report.violations[0].location.record_id(), Some("dataset-3"));
}

#[test]
fn url_rules_distinguish_empty_from_malformed() {
    let bad = Registry::new(
        vec![record(json!({"id": "dataset-1", "title": "A", "provider": "provider-1", "url": "not a url"}))],
        vec![provider("provider-1", "Bar")],
    );
    let report = validate(&bad, &ValidationConfig::default());
    assert_eq!(kinds(&report.violations), [ViolationKind::InvalidUrl]);

    let empty = Registry::new(
        vec![record(json!({"id": "dataset-1", "title": "A", "provider": "provider-1", "url": ""}))],
        vec![provider("provider-1", "Bar")],
    );
    assert!(validate(&empty, &ValidationConfig::default()).is_valid());
}

#[test]
fn url_without_host_fails_validation() {
    let registry = Registry::new(
        vec![record(json!({"id": "dataset-1", "title": "A", "provider": "provider-1", "url": "http:///data.csv"}))],
        vec![provider("provider-1", "Bar")],
    );
    let report = collect_all(&registry);
    assert_eq!(kinds(&report.violations), [ViolationKind::InvalidUrl]);
    assert_eq!(report.violations[0].value.as_deref(), Some("http:///data.csv"));
}

#[test]
fn clean_registry_passes() {
    let report = collect_all(&clean_registry());
    assert!(report.is_valid(), "unexpected: {:?}", report.violations);
    assert!(!report.halted);
    assert!(report.counts().is_empty());
}

// ── failure modes ───────────────────────────────────────────────────────────

fn messy_registry() -> Registry {
    Registry::new(
        vec![
            dataset("dataset-1", " Lead", "provider-9"),
            dataset("dataset-1", "Trail ", "provider-1"),
            record(json!({"id": "ds-5", "title": "Odd", "provider": "provider-1", "colour": "red"})),
        ],
        vec![
            provider("provider-1", "P"),
            record(json!({"id": "provider-2", "title": "Q", "ror": ""})),
        ],
    )
}

#[test]
fn fail_fast_stops_at_first_violation() {
    let report = validate(&messy_registry(), &ValidationConfig::default());
    assert!(report.halted);
    assert_eq!(report.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::SchemaViolation);
}

#[test]
fn collect_all_gathers_every_stage() {
    let report = collect_all(&messy_registry());
    assert!(!report.halted);
    let counts = report.counts();
    assert_eq!(counts.get(&ViolationKind::SchemaViolation), Some(&1));
    assert_eq!(counts.get(&ViolationKind::MalformedId), Some(&1));
    assert_eq!(counts.get(&ViolationKind::DuplicateId), Some(&1));
    assert_eq!(counts.get(&ViolationKind::UnknownProvider), Some(&1));
    assert_eq!(counts.get(&ViolationKind::LeadingWhitespace), Some(&1));
    assert_eq!(counts.get(&ViolationKind::TrailingWhitespace), Some(&1));
    assert_eq!(counts.get(&ViolationKind::EmptyValue), Some(&1));
    assert_eq!(report.len(), 7);
}

#[test]
fn collect_all_orders_violations_by_stage() {
    let report = collect_all(&messy_registry());
    let first_hygiene = report
        .violations
        .iter()
        .position(|v| v.kind == ViolationKind::LeadingWhitespace)
        .expect("hygiene finding");
    let last_reference = report
        .violations
        .iter()
        .rposition(|v| v.kind == ViolationKind::UnknownProvider)
        .expect("reference finding");
    assert!(last_reference < first_hygiene);
}

#[test]
fn empty_datasets_reported_and_nothing_else() {
    let registry = Registry::new(vec![], vec![provider("provider-1", "P")]);
    let report = collect_all(&registry);
    assert_eq!(kinds(&report.violations), [ViolationKind::EmptyRegistry]);
}

#[test]
fn empty_datasets_fail_with_schema_skipped() {
    let registry = Registry::new(vec![], vec![provider("provider-1", "P")]);
    let config = ValidationConfig {
        run_schema: false,
        ..ValidationConfig::collect_all()
    };
    let report = validate(&registry, &config);
    assert!(!report.is_valid());
    assert_eq!(kinds(&report.violations), [ViolationKind::NoProviderReferences]);
}

// ── sources ─────────────────────────────────────────────────────────────────

#[test]
fn validate_sources_loads_then_validates() {
    let report = validate_sources(
        r#"[{"id": "dataset-1", "title": "Foo", "provider": "provider-9"}]"#,
        r#"[{"id": "provider-1", "title": "Bar"}]"#,
        &ValidationConfig::default(),
    )
    .expect("both sources decode");
    assert_eq!(kinds(&report.violations), [ViolationKind::UnknownProvider]);
}

#[test]
fn validate_sources_surfaces_load_errors() {
    let err = validate_sources("{}", "[]", &ValidationConfig::default())
        .expect_err("object is not an array");
    assert!(matches!(err, LoadError::NotAnArray { .. }), "{err:?}");
}

// ── rendering ───────────────────────────────────────────────────────────────

#[test]
fn codes_are_stable() {
    assert_eq!(ViolationKind::UnknownProvider.code(), "unknown-provider");
    assert_eq!(ViolationKind::UnknownJoinTarget.to_string(), "unknown-join-target");
    assert_eq!(ViolationKind::EmptyValue.code(), "empty-value");
}

#[test]
fn location_display_forms() {
    assert_eq!(
        Location::record(RecordKind::Dataset, Some("dataset-1"), 0).to_string(),
        "dataset \"dataset-1\""
    );
    assert_eq!(
        Location::field(RecordKind::Provider, Some("provider-2"), 1, "ror").to_string(),
        "provider \"provider-2\" field \"ror\""
    );
    assert_eq!(
        Location::record(RecordKind::Dataset, None, 4).to_string(),
        "datasets[4]"
    );
    assert_eq!(
        Location::Collection {
            kind: RecordKind::Provider
        }
        .to_string(),
        "providers"
    );
}

#[test]
fn violation_serializes_with_code_and_scope() {
    let v = Violation::new(
        ViolationKind::UnknownProvider,
        Location::field(RecordKind::Dataset, Some("dataset-1"), 0, "provider"),
        Some("provider-9".to_owned()),
        "provider \"provider-9\" is not in providers.json",
    );
    let value = serde_json::to_value(&v).expect("serialize");
    assert_eq!(value["kind"], "unknown-provider");
    assert_eq!(value["location"]["scope"], "record");
    assert_eq!(value["location"]["kind"], "dataset");
    assert_eq!(value["location"]["id"], "dataset-1");
    assert_eq!(value["location"]["field"], "provider");
    assert_eq!(value["value"], "provider-9");
}

#[test]
fn findings_break_only_in_fail_fast() {
    let violation = || {
        Violation::new(
            ViolationKind::EmptyRegistry,
            Location::Collection {
                kind: RecordKind::Dataset,
            },
            None,
            "no datasets",
        )
    };
    let mut fast = Findings::new(FailureMode::FailFast);
    assert!(fast.report(violation()).is_break());
    let mut all = Findings::new(FailureMode::CollectAll);
    assert!(all.report(violation()).is_continue());
    assert!(all.report(violation()).is_continue());
    assert_eq!(all.len(), 2);
}
