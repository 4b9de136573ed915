/// In-memory record model for the two registry collections.
///
/// A [`Record`] wraps the decoded JSON object exactly as it appeared in the
/// source: no field is coerced, renamed, or dropped. Typed accessors return
/// `None` when a field is absent or carries a non-string value, which leaves
/// type complaints to the schema rules instead of failing the load.
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// An entry of `datasets.json`.
    Dataset,
    /// An entry of `providers.json`.
    Provider,
}

impl RecordKind {
    /// The plural collection name used in messages (`"datasets"` / `"providers"`).
    pub fn collection(self) -> &'static str {
        match self {
            Self::Dataset => "datasets",
            Self::Provider => "providers",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dataset => f.write_str("dataset"),
            Self::Provider => f.write_str("provider"),
        }
    }
}

/// A single registry entry: a flat JSON object held verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Wraps an already-decoded JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// The record's `id`, if present and a string.
    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    /// The record's `title`, if present and a string.
    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    /// Returns the named field when it is present and holds a JSON string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Returns the raw JSON value of a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns `true` if the field name is present, whatever its value.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates over field names in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The dataset ids listed under `original.joins_to`.
    ///
    /// Non-string entries are skipped; the field-type rule reports them.
    pub fn joins_to(&self) -> Vec<&str> {
        self.fields
            .get("original")
            .and_then(|original| original.get("joins_to"))
            .and_then(Value::as_array)
            .map(|targets| targets.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Borrows the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the record, returning the underlying JSON object.
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Both registry collections, in source order.
///
/// Held immutably for the duration of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Registry {
    /// Records from the datasets source.
    pub datasets: Vec<Record>,
    /// Records from the providers source.
    pub providers: Vec<Record>,
}

impl Registry {
    /// Builds a registry from two already-decoded collections.
    pub fn new(datasets: Vec<Record>, providers: Vec<Record>) -> Self {
        Self {
            datasets,
            providers,
        }
    }

    /// Returns the records of the given kind.
    pub fn records(&self, kind: RecordKind) -> &[Record] {
        match kind {
            RecordKind::Dataset => &self.datasets,
            RecordKind::Provider => &self.providers,
        }
    }

    /// Maps each provider id to its record. Later duplicates win.
    pub fn provider_index(&self) -> HashMap<&str, &Record> {
        self.providers
            .iter()
            .filter_map(|p| p.id().map(|id| (id, p)))
            .collect()
    }

    /// Maps each dataset id to its record. Later duplicates win.
    pub fn dataset_index(&self) -> HashMap<&str, &Record> {
        self.datasets
            .iter()
            .filter_map(|d| d.id().map(|id| (id, d)))
            .collect()
    }
}
