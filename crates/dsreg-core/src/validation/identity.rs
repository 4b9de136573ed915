/// Identity rules: id format, id uniqueness, title uniqueness.
///
/// Each rule is an independent predicate over one collection at a time.
/// Records without a string `id` or `title` are skipped here; the schema
/// rules report them.
use std::collections::{HashMap, HashSet};
use std::ops::ControlFlow;

use crate::config::ValidationConfig;
use crate::record::{RecordKind, Registry};

use super::{Findings, Location, Stage, ValidationRule, Violation, ViolationKind};


const KINDS: [RecordKind; 2] = [RecordKind::Dataset, RecordKind::Provider];

/// Every id matches its kind's pattern (`dataset-<digits>`, `provider-<digits>`).
pub struct IdFormat;

impl ValidationRule for IdFormat {
    fn name(&self) -> &'static str {
        "id-format"
    }

    fn stage(&self) -> Stage {
        Stage::Identity
    }

    fn check(
        &self,
        registry: &Registry,
        config: &ValidationConfig,
        findings: &mut Findings,
    ) -> ControlFlow<()> {
        for kind in KINDS {
            let rules = config.rules(kind);
            for (index, record) in registry.records(kind).iter().enumerate() {
                let Some(id) = record.id() else { continue };
                if rules.id_number(id).is_none() {
                    findings.report(Violation::new(
                        ViolationKind::MalformedId,
                        Location::field(kind, Some(id), index, "id"),
                        Some(id.to_owned()),
                        format!(
                            "badly formed id \"{id}\", expected {}",
                            rules.id_pattern.as_str()
                        ),
                    ))?;
                }
            }
        }
        ControlFlow::Continue(())
    }
}

/// No numeric id suffix repeats within a collection.
///
/// Ids are compared by their numeric value, so `dataset-3` and `dataset-03`
/// collide. Every occurrence after the first is reported. Malformed ids are
/// left to [`IdFormat`].
pub struct UniqueIds;

impl ValidationRule for UniqueIds {
    fn name(&self) -> &'static str {
        "unique-ids"
    }

    fn stage(&self) -> Stage {
        Stage::Identity
    }

    fn check(
        &self,
        registry: &Registry,
        config: &ValidationConfig,
        findings: &mut Findings,
    ) -> ControlFlow<()> {
        for kind in KINDS {
            let rules = config.rules(kind);
            let mut first_seen: HashMap<&str, &str> = HashMap::new();
            for (index, record) in registry.records(kind).iter().enumerate() {
                let Some(id) = record.id() else { continue };
                let Some(key) = rules.id_key(id) else { continue };
                let Some(previous) = first_seen.get(key).copied() else {
                    first_seen.insert(key, id);
                    continue;
                };
                let message = if previous == id {
                    format!("duplicate id \"{id}\"")
                } else {
                    format!("duplicate id \"{id}\" (same number as \"{previous}\")")
                };
                findings.report(Violation::new(
                    ViolationKind::DuplicateId,
                    Location::field(kind, Some(id), index, "id"),
                    Some(id.to_owned()),
                    message,
                ))?;
            }
        }
        ControlFlow::Continue(())
    }
}

/// No title repeats within a collection (exact, case-sensitive match).
pub struct UniqueTitles;

impl ValidationRule for UniqueTitles {
    fn name(&self) -> &'static str {
        "unique-titles"
    }

    fn stage(&self) -> Stage {
        Stage::Identity
    }

    fn check(
        &self,
        registry: &Registry,
        _config: &ValidationConfig,
        findings: &mut Findings,
    ) -> ControlFlow<()> {
        for kind in KINDS {
            let mut seen: HashSet<&str> = HashSet::new();
            for (index, record) in registry.records(kind).iter().enumerate() {
                let Some(title) = record.title() else { continue };
                if !seen.insert(title) {
                    findings.report(Violation::new(
                        ViolationKind::DuplicateTitle,
                        Location::field(kind, record.id(), index, "title"),
                        Some(title.to_owned()),
                        format!("duplicate title \"{title}\""),
                    ))?;
                }
            }
        }
        ControlFlow::Continue(())
    }
}
