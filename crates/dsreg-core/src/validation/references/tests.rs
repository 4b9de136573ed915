#![allow(clippy::expect_used)]

use serde_json::json;

use super::*;
use crate::test_helpers::{clean_registry, dataset, kinds, provider, record, run_rule};

#[test]
fn provider_references_clean() {
    assert!(run_rule(&ProviderReferences, &clean_registry()).is_empty());
}

#[test]
fn unknown_provider_names_dataset_and_provider() {
    let registry = Registry::new(
        vec![dataset("dataset-1", "Foo", "provider-9")],
        vec![provider("provider-1", "Bar")],
    );
    let diags = run_rule(&ProviderReferences, &registry);
    assert_eq!(kinds(&diags), [ViolationKind::UnknownProvider]);
    assert_eq!(diags[0].location.record_id(), Some("dataset-1"));
    assert_eq!(diags[0].value.as_deref(), Some("provider-9"));
    assert!(diags[0].message.contains("provider-9"));
}

#[test]
fn every_unresolved_reference_is_listed() {
    let registry = Registry::new(
        vec![
            dataset("dataset-1", "A", "provider-7"),
            dataset("dataset-2", "B", "provider-1"),
            dataset("dataset-3", "C", "provider-8"),
            dataset("dataset-4", "D", "provider-7"),
        ],
        vec![provider("provider-1", "P")],
    );
    let diags = run_rule(&ProviderReferences, &registry);
    let cited: Vec<(Option<&str>, Option<&str>)> = diags
        .iter()
        .map(|d| (d.location.record_id(), d.value.as_deref()))
        .collect();
    assert_eq!(
        cited,
        [
            (Some("dataset-1"), Some("provider-7")),
            (Some("dataset-3"), Some("provider-8")),
            (Some("dataset-4"), Some("provider-7")),
        ]
    );
}

#[test]
fn datasets_without_any_provider_reference_flagged() {
    let registry = Registry::new(
        vec![record(json!({"id": "dataset-1", "title": "A"}))],
        vec![provider("provider-1", "P")],
    );
    let diags = run_rule(&ProviderReferences, &registry);
    assert_eq!(kinds(&diags), [ViolationKind::NoProviderReferences]);
}

#[test]
fn empty_datasets_reference_no_provider() {
    let registry = Registry::new(vec![], vec![provider("provider-1", "P")]);
    assert_eq!(
        kinds(&run_rule(&ProviderReferences, &registry)),
        [ViolationKind::NoProviderReferences]
    );
    assert!(run_rule(&JoinTargets, &registry).is_empty());
}

#[test]
fn empty_registry_already_reported_is_not_repeated() {
    let registry = Registry::new(vec![], vec![]);
    let config = ValidationConfig::collect_all();
    let mut findings = Findings::new(config.mode);
    let flow = findings.report(Violation::new(
        ViolationKind::EmptyRegistry,
        Location::Collection {
            kind: RecordKind::Dataset,
        },
        None,
        "datasets.json holds no records",
    ));
    assert!(flow.is_continue());
    assert!(ProviderReferences.check(&registry, &config, &mut findings).is_continue());
    assert_eq!(kinds(&findings.into_violations()), [ViolationKind::EmptyRegistry]);
}

#[test]
fn provider_reference_is_exact_match() {
    let registry = Registry::new(
        vec![dataset("dataset-1", "A", "provider-1 ")],
        vec![provider("provider-1", "P")],
    );
    assert_eq!(run_rule(&ProviderReferences, &registry).len(), 1);
}

#[test]
fn join_targets_clean() {
    assert!(run_rule(&JoinTargets, &clean_registry()).is_empty());
}

#[test]
fn dangling_join_target_reported() {
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
        vec![provider("provider-1", "P")],
    );
    let diags = run_rule(&JoinTargets, &registry);
    assert_eq!(kinds(&diags), [ViolationKind::UnknownJoinTarget]);
    assert_eq!(diags[0].location.record_id(), Some("dataset-2"));
    assert_eq!(diags[0].value.as_deref(), Some("dataset-999"));
    assert!(diags[0].message.contains("joins_to"), "{}", diags[0].message);
    assert!(diags[0].message.contains("datasets.json"));
}

#[test]
fn self_join_is_allowed() {
    let registry = Registry::new(
        vec![record(json!({
            "id": "dataset-5",
            "title": "Self",
            "provider": "provider-1",
            "original": {"joins_to": ["dataset-5"]}
        }))],
        vec![],
    );
    assert!(run_rule(&JoinTargets, &registry).is_empty());
}

#[test]
fn join_target_may_appear_later_in_source() {
    let registry = Registry::new(
        vec![
            record(json!({
                "id": "dataset-1",
                "title": "A",
                "provider": "provider-1",
                "original": {"joins_to": ["dataset-2", "dataset-3"]}
            })),
            dataset("dataset-2", "B", "provider-1"),
        ],
        vec![],
    );
    let diags = run_rule(&JoinTargets, &registry);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].value.as_deref(), Some("dataset-3"));
}

#[test]
fn join_targets_must_be_datasets_not_providers() {
    let registry = Registry::new(
        vec![record(json!({
            "id": "dataset-1",
            "title": "A",
            "provider": "provider-1",
            "original": {"joins_to": ["provider-1"]}
        }))],
        vec![provider("provider-1", "P")],
    );
    assert_eq!(run_rule(&JoinTargets, &registry).len(), 1);
}
