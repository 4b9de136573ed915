/// Cross-reference rules: dataset → provider and dataset → dataset joins.
///
/// Both rules are pure functions of the final collection state, so they can
/// run before or after a merge without change.
use std::collections::{BTreeSet, HashSet};
use std::ops::ControlFlow;

use crate::config::ValidationConfig;
use crate::record::{RecordKind, Registry};

use super::{Findings, Location, Stage, ValidationRule, Violation, ViolationKind};

#[cfg(test)]
mod tests;

/// Every dataset's `provider` names an existing provider id, and at least one
/// dataset names a provider at all. An empty datasets collection references
/// nothing and fails too, unless the schema stage already reported it as
/// [`ViolationKind::EmptyRegistry`].
///
/// One violation is produced per unresolved dataset, so a collect-all run
/// lists every dangling provider reference together.
pub struct ProviderReferences;

impl ValidationRule for ProviderReferences {
    fn name(&self) -> &'static str {
        "provider-references"
    }

    fn stage(&self) -> Stage {
        Stage::References
    }

    fn check(
        &self,
        registry: &Registry,
        _config: &ValidationConfig,
        findings: &mut Findings,
    ) -> ControlFlow<()> {
        let referenced: BTreeSet<&str> = registry
            .datasets
            .iter()
            .filter_map(|d| d.str_field("provider"))
            .collect();

        if referenced.is_empty() && !findings.contains(ViolationKind::EmptyRegistry) {
            findings.report(Violation::new(
                ViolationKind::NoProviderReferences,
                Location::Collection {
                    kind: RecordKind::Dataset,
                },
                None,
                "no dataset references a provider",
            ))?;
        }

        let index = registry.provider_index();
        let unresolved = referenced
            .iter()
            .filter(|id| !index.contains_key(*id))
            .count();
        tracing::debug!(
            referenced = referenced.len(),
            unresolved,
            "provider references collected"
        );

        for (index_in_source, dataset) in registry.datasets.iter().enumerate() {
            let Some(provider) = dataset.str_field("provider") else {
                continue;
            };
            if index.contains_key(provider) {
                continue;
            }
            findings.report(Violation::new(
                ViolationKind::UnknownProvider,
                Location::field(
                    RecordKind::Dataset,
                    dataset.id(),
                    index_in_source,
                    "provider",
                ),
                Some(provider.to_owned()),
                format!("provider \"{provider}\" is not in providers.json"),
            ))?;
        }
        ControlFlow::Continue(())
    }
}

/// Every id listed in a dataset's `original.joins_to` names an existing
/// dataset. A dataset may list itself.
pub struct JoinTargets;

impl ValidationRule for JoinTargets {
    fn name(&self) -> &'static str {
        "join-targets"
    }

    fn stage(&self) -> Stage {
        Stage::References
    }

    fn check(
        &self,
        registry: &Registry,
        _config: &ValidationConfig,
        findings: &mut Findings,
    ) -> ControlFlow<()> {
        let dataset_ids: HashSet<&str> = registry.datasets.iter().filter_map(|d| d.id()).collect();

        for (index, dataset) in registry.datasets.iter().enumerate() {
            for target in dataset.joins_to() {
                if dataset_ids.contains(target) {
                    continue;
                }
                let source = dataset.id().unwrap_or("(no id)");
                findings.report(Violation::new(
                    ViolationKind::UnknownJoinTarget,
                    Location::field(RecordKind::Dataset, dataset.id(), index, "original.joins_to"),
                    Some(target.to_owned()),
                    format!(
                        "metadata for \"{source}\" says it can be joined to \"{target}\", \
                         but \"{target}\" is not in datasets.json; update datasets.json \
                         or fix the joins_to metadata"
                    ),
                ))?;
            }
        }
        ControlFlow::Continue(())
    }
}
