/// Hygiene rules: stray whitespace and empty identifier values.
///
/// Only the fields named in [`crate::config::KindRules::trimmed_fields`] and
/// [`crate::config::KindRules::non_empty_fields`] are inspected. Free text
/// such as `description` is deliberately left alone.
use std::ops::ControlFlow;

use crate::config::ValidationConfig;
use crate::record::Registry;

use super::{Findings, Location, Stage, ValidationRule, Violation, ViolationKind, all_records};


/// A whitespace defect in a text value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Untrimmed {
    /// The first character is whitespace.
    Leading,
    /// The last character is whitespace.
    Trailing,
}

/// Classifies `value`. Leading whitespace wins when both ends are untrimmed.
pub fn untrimmed(value: &str) -> Option<Untrimmed> {
    if value.starts_with(char::is_whitespace) {
        Some(Untrimmed::Leading)
    } else if value.ends_with(char::is_whitespace) {
        Some(Untrimmed::Trailing)
    } else {
        None
    }
}

/// Checked text fields carry no leading or trailing whitespace.
pub struct TrimmedText;

impl ValidationRule for TrimmedText {
    fn name(&self) -> &'static str {
        "trimmed-text"
    }

    fn stage(&self) -> Stage {
        Stage::Hygiene
    }

    fn check(
        &self,
        registry: &Registry,
        config: &ValidationConfig,
        findings: &mut Findings,
    ) -> ControlFlow<()> {
        for (kind, index, record) in all_records(registry) {
            for field in &config.rules(kind).trimmed_fields {
                let Some(value) = record.str_field(field) else {
                    continue;
                };
                let (violation_kind, side) = match untrimmed(value) {
                    None => continue,
                    Some(Untrimmed::Leading) => (ViolationKind::LeadingWhitespace, "leading"),
                    Some(Untrimmed::Trailing) => (ViolationKind::TrailingWhitespace, "trailing"),
                };
                findings.report(Violation::new(
                    violation_kind,
                    Location::field(kind, record.id(), index, field),
                    Some(value.to_owned()),
                    format!("{side} whitespace in {field} |{value}|"),
                ))?;
            }
        }
        ControlFlow::Continue(())
    }
}

/// Optional identifier fields (e.g. `ror`) are non-empty when present.
pub struct NonEmptyIdentifiers;

impl ValidationRule for NonEmptyIdentifiers {
    fn name(&self) -> &'static str {
        "non-empty-identifiers"
    }

    fn stage(&self) -> Stage {
        Stage::Hygiene
    }

    fn check(
        &self,
        registry: &Registry,
        config: &ValidationConfig,
        findings: &mut Findings,
    ) -> ControlFlow<()> {
        for (kind, index, record) in all_records(registry) {
            for field in &config.rules(kind).non_empty_fields {
                if record.str_field(field) == Some("") {
                    findings.report(Violation::new(
                        ViolationKind::EmptyValue,
                        Location::field(kind, record.id(), index, field),
                        Some(String::new()),
                        format!("{field} is present but empty"),
                    ))?;
                }
            }
        }
        ControlFlow::Continue(())
    }
}
