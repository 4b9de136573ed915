/// Violation types and rule dispatch for the registry validator.
///
/// This module defines [`Violation`], [`ViolationKind`], [`Location`], and
/// [`ValidationReport`], the types that describe every finding, together with
/// the [`ValidationRule`] trait, the [`Findings`] sink, [`build_pipeline`], and
/// the top-level [`validate`] entry point.
///
/// The pipeline runs four stages in order: schema, identity, references,
/// hygiene. In [`FailureMode::FailFast`] the first recorded violation halts
/// the run; in [`FailureMode::CollectAll`] every rule runs to completion.
pub mod hygiene;
pub mod identity;
pub mod references;
pub mod schema;

use std::collections::BTreeMap;
use std::fmt;
use std::ops::ControlFlow;

use serde::Serialize;

use crate::config::{FailureMode, ValidationConfig};
use crate::load::{LoadError, load_registry};
use crate::record::{RecordKind, Registry};

#[cfg(test)]
mod tests;

/// The category of a validation finding.
///
/// [`ViolationKind::code`] returns the stable hyphenated form used in
/// serialised output (e.g. `"unknown-provider"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViolationKind {
    /// The datasets collection holds no records.
    EmptyRegistry,
    /// Unknown field, missing required field, or a field of the wrong JSON type.
    SchemaViolation,
    /// A populated URL field is not a well-formed absolute URL.
    InvalidUrl,
    /// An id does not match the kind-prefixed numeric pattern.
    MalformedId,
    /// An id's numeric suffix repeats within its collection.
    DuplicateId,
    /// A title repeats within its collection.
    DuplicateTitle,
    /// Datasets exist but none names a provider.
    NoProviderReferences,
    /// A dataset's `provider` does not resolve to a provider id.
    UnknownProvider,
    /// An `original.joins_to` entry does not resolve to a dataset id.
    UnknownJoinTarget,
    /// A checked text field starts with whitespace.
    LeadingWhitespace,
    /// A checked text field ends with whitespace.
    TrailingWhitespace,
    /// An optional identifier field is present but empty.
    EmptyValue,
}

impl ViolationKind {
    /// Returns the stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyRegistry => "empty-registry",
            Self::SchemaViolation => "schema-violation",
            Self::InvalidUrl => "invalid-url",
            Self::MalformedId => "malformed-id",
            Self::DuplicateId => "duplicate-id",
            Self::DuplicateTitle => "duplicate-title",
            Self::NoProviderReferences => "no-provider-references",
            Self::UnknownProvider => "unknown-provider",
            Self::UnknownJoinTarget => "unknown-join-target",
            Self::LeadingWhitespace => "leading-whitespace",
            Self::TrailingWhitespace => "trailing-whitespace",
            Self::EmptyValue => "empty-value",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for ViolationKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Where a finding was detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum Location {
    /// A record, or one field of it.
    Record {
        /// The collection holding the record.
        kind: RecordKind,
        /// The record's `id`, when it has a string one.
        id: Option<String>,
        /// Zero-based position in the source array.
        index: usize,
        /// The offending field, if applicable.
        field: Option<String>,
    },
    /// A whole collection.
    Collection {
        /// The collection.
        kind: RecordKind,
    },
}

impl Location {
    /// A location naming a record without a specific field.
    pub fn record(kind: RecordKind, id: Option<&str>, index: usize) -> Self {
        Self::Record {
            kind,
            id: id.map(str::to_owned),
            index,
            field: None,
        }
    }

    /// A location naming one field of a record.
    pub fn field(kind: RecordKind, id: Option<&str>, index: usize, field: &str) -> Self {
        Self::Record {
            kind,
            id: id.map(str::to_owned),
            index,
            field: Some(field.to_owned()),
        }
    }

    /// The offending record's id, if any.
    pub fn record_id(&self) -> Option<&str> {
        match self {
            Self::Record { id, .. } => id.as_deref(),
            Self::Collection { .. } => None,
        }
    }

    /// The offending field, if any.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::Record { field, .. } => field.as_deref(),
            Self::Collection { .. } => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record {
                kind,
                id: Some(id),
                field: None,
                ..
            } => write!(f, "{kind} \"{id}\""),
            Self::Record {
                kind,
                id: Some(id),
                field: Some(field),
                ..
            } => write!(f, "{kind} \"{id}\" field \"{field}\""),
            Self::Record {
                kind,
                id: None,
                index,
                field: None,
            } => write!(f, "{}[{index}]", kind.collection()),
            Self::Record {
                kind,
                id: None,
                index,
                field: Some(field),
            } => write!(f, "{}[{index}] field \"{field}\"", kind.collection()),
            Self::Collection { kind } => f.write_str(kind.collection()),
        }
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// What went wrong.
    pub kind: ViolationKind,
    /// Where it went wrong.
    pub location: Location,
    /// The offending value: the unknown key, the bad URL, the unresolved
    /// target, the duplicated title, and so on.
    pub value: Option<String>,
    /// A human-readable explanation.
    pub message: String,
}

impl Violation {
    /// Constructs a new [`Violation`].
    pub fn new(
        kind: ViolationKind,
        location: Location,
        value: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            location,
            value,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.location, self.message)
    }
}

/// The outcome of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationReport {
    /// Every violation recorded, in pipeline order.
    pub violations: Vec<Violation>,
    /// `true` when a fail-fast run stopped at its first violation.
    pub halted: bool,
}

impl ValidationReport {
    /// Returns `true` if no violation was recorded.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Iterates over violations of one kind.
    pub fn by_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.kind == kind)
    }

    /// Per-kind totals, ordered by kind.
    pub fn counts(&self) -> BTreeMap<ViolationKind, usize> {
        let mut counts = BTreeMap::new();
        for v in &self.violations {
            *counts.entry(v.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Total number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns `true` if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Sink that rules push violations into.
///
/// [`Findings::report`] returns [`ControlFlow::Break`] once the run should
/// stop, so rules propagate it with `?`.
#[derive(Debug)]
pub struct Findings {
    mode: FailureMode,
    violations: Vec<Violation>,
}

impl Findings {
    /// Creates an empty sink for the given mode.
    pub fn new(mode: FailureMode) -> Self {
        Self {
            mode,
            violations: Vec::new(),
        }
    }

    /// Records a violation.
    pub fn report(&mut self, violation: Violation) -> ControlFlow<()> {
        self.violations.push(violation);
        match self.mode {
            FailureMode::FailFast => ControlFlow::Break(()),
            FailureMode::CollectAll => ControlFlow::Continue(()),
        }
    }

    /// Number of violations recorded so far.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns `true` if a violation of `kind` has been recorded.
    pub fn contains(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    /// Consumes the sink, returning the recorded violations.
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

/// A pipeline stage. Stages run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Allowed and required fields, field types, URL syntax.
    Schema,
    /// Id format, id uniqueness, title uniqueness.
    Identity,
    /// Provider and join references.
    References,
    /// Whitespace and empty-value checks.
    Hygiene,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema => f.write_str("schema"),
            Self::Identity => f.write_str("identity"),
            Self::References => f.write_str("references"),
            Self::Hygiene => f.write_str("hygiene"),
        }
    }
}

/// A stateless check over the loaded registry.
///
/// Rules receive the registry and configuration by shared reference and push
/// findings into `findings`. A rule must propagate the [`ControlFlow`]
/// returned by [`Findings::report`] so fail-fast runs stop promptly.
///
/// The trait is object-safe; [`build_pipeline`] returns
/// `Vec<Box<dyn ValidationRule>>`.
pub trait ValidationRule {
    /// Short rule name, used in logs.
    fn name(&self) -> &'static str;

    /// The stage this rule belongs to.
    fn stage(&self) -> Stage;

    /// Inspect `registry` and report findings.
    fn check(
        &self,
        registry: &Registry,
        config: &ValidationConfig,
        findings: &mut Findings,
    ) -> ControlFlow<()>;
}

/// Builds the ordered rule list for the given configuration.
pub fn build_pipeline(config: &ValidationConfig) -> Vec<Box<dyn ValidationRule>> {
    use hygiene::{NonEmptyIdentifiers, TrimmedText};
    use identity::{IdFormat, UniqueIds, UniqueTitles};
    use references::{JoinTargets, ProviderReferences};
    use schema::{AllowedFields, FieldTypes, NonEmptyRegistry, RequiredFields, WellFormedUrls};

    let mut pipeline: Vec<Box<dyn ValidationRule>> = Vec::new();

    if config.run_schema {
        pipeline.push(Box::new(NonEmptyRegistry));
        pipeline.push(Box::new(AllowedFields));
        pipeline.push(Box::new(RequiredFields));
        pipeline.push(Box::new(FieldTypes));
        pipeline.push(Box::new(WellFormedUrls));
    }

    if config.run_identity {
        pipeline.push(Box::new(IdFormat));
        pipeline.push(Box::new(UniqueIds));
        pipeline.push(Box::new(UniqueTitles));
    }

    if config.run_references {
        pipeline.push(Box::new(ProviderReferences));
        pipeline.push(Box::new(JoinTargets));
    }

    if config.run_hygiene {
        pipeline.push(Box::new(TrimmedText));
        pipeline.push(Box::new(NonEmptyIdentifiers));
    }

    pipeline
}

/// Runs the validation pipeline over a loaded registry.
///
/// The run is a pure function of `registry` and `config`.
pub fn validate(registry: &Registry, config: &ValidationConfig) -> ValidationReport {
    let pipeline = build_pipeline(config);
    let mut findings = Findings::new(config.mode);
    let mut halted = false;

    for rule in &pipeline {
        let before = findings.len();
        let flow = rule.check(registry, config, &mut findings);
        tracing::debug!(
            stage = %rule.stage(),
            rule = rule.name(),
            violations = findings.len() - before,
            "rule finished"
        );
        if flow.is_break() {
            tracing::debug!(rule = rule.name(), "fail-fast halt");
            halted = true;
            break;
        }
    }

    ValidationReport {
        violations: findings.into_violations(),
        halted,
    }
}

/// Decodes both sources and validates them.
///
/// # Errors
///
/// Returns [`LoadError`] when either source cannot be decoded; no rule runs
/// in that case.
pub fn validate_sources(
    datasets: &str,
    providers: &str,
    config: &ValidationConfig,
) -> Result<ValidationReport, LoadError> {
    let registry = load_registry(datasets, providers)?;
    Ok(validate(&registry, config))
}

/// Iterates over every record of both kinds, datasets first.
pub(crate) fn all_records(
    registry: &Registry,
) -> impl Iterator<Item = (RecordKind, usize, &crate::record::Record)> {
    [RecordKind::Dataset, RecordKind::Provider]
        .into_iter()
        .flat_map(move |kind| {
            registry
                .records(kind)
                .iter()
                .enumerate()
                .map(move |(index, record)| (kind, index, record))
        })
}
