/// Record loader: decodes the datasets and providers sources.
///
/// Each source must hold a top-level JSON array of objects. Values are kept
/// exactly as decoded so downstream rules see authentic data. Any failure is
/// a [`LoadError`] naming the source that failed; nothing downstream can run
/// without both collections.
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::record::{Record, RecordKind, Registry};

/// A fatal failure to obtain one of the two collections.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The source file does not exist.
    #[error("{} source not found: {}", .kind.collection(), .path.display())]
    NotFound {
        /// Which collection failed.
        kind: RecordKind,
        /// The missing path.
        path: PathBuf,
    },

    /// The source exists but could not be read (permissions, invalid UTF-8, ...).
    #[error("{} source {} could not be read: {source}", .kind.collection(), .path.display())]
    Unreadable {
        /// Which collection failed.
        kind: RecordKind,
        /// The unreadable path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The source is not valid JSON.
    #[error("{} source is not valid JSON (line {line}, column {column}): {detail}", .kind.collection())]
    Malformed {
        /// Which collection failed.
        kind: RecordKind,
        /// 1-based line of the syntax error.
        line: usize,
        /// 1-based column of the syntax error.
        column: usize,
        /// The decoder's description.
        detail: String,
    },

    /// The top-level JSON value is not an array.
    #[error("{} source must hold a top-level JSON array", .kind.collection())]
    NotAnArray {
        /// Which collection failed.
        kind: RecordKind,
    },

    /// An array entry is not a JSON object.
    #[error("{} source entry {index} is not a JSON object", .kind.collection())]
    NotAnObject {
        /// Which collection failed.
        kind: RecordKind,
        /// Zero-based position in the array.
        index: usize,
    },
}

impl LoadError {
    /// The collection whose source failed.
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::NotFound { kind, .. }
            | Self::Unreadable { kind, .. }
            | Self::Malformed { kind, .. }
            | Self::NotAnArray { kind }
            | Self::NotAnObject { kind, .. } => *kind,
        }
    }
}

/// Decodes one collection from JSON text.
///
/// # Errors
///
/// [`LoadError::Malformed`], [`LoadError::NotAnArray`], or
/// [`LoadError::NotAnObject`].
pub fn parse_records(kind: RecordKind, text: &str) -> Result<Vec<Record>, LoadError> {
    let value: Value = serde_json::from_str(text).map_err(|e| LoadError::Malformed {
        kind,
        line: e.line(),
        column: e.column(),
        detail: e.to_string(),
    })?;

    let Value::Array(entries) = value else {
        return Err(LoadError::NotAnArray { kind });
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Object(fields) => Ok(Record::new(fields)),
            Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::Array(_) => Err(LoadError::NotAnObject { kind, index }),
        })
        .collect()
}

/// Decodes both collections from JSON text.
///
/// The datasets source is decoded first, so when both are broken the error
/// names the datasets source.
///
/// # Errors
///
/// Any [`LoadError`] from [`parse_records`].
pub fn load_registry(datasets: &str, providers: &str) -> Result<Registry, LoadError> {
    let datasets = parse_records(RecordKind::Dataset, datasets)?;
    let providers = parse_records(RecordKind::Provider, providers)?;
    tracing::info!(
        datasets = datasets.len(),
        providers = providers.len(),
        "registry loaded"
    );
    Ok(Registry::new(datasets, providers))
}

/// Reads one source file into a string.
///
/// # Errors
///
/// [`LoadError::NotFound`] when the path does not exist, otherwise
/// [`LoadError::Unreadable`].
pub fn read_source(kind: RecordKind, path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                kind,
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Unreadable {
                kind,
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Reads and decodes both collections from disk.
///
/// # Errors
///
/// Any [`LoadError`].
pub fn load_registry_files(datasets: &Path, providers: &Path) -> Result<Registry, LoadError> {
    tracing::debug!(
        datasets = %datasets.display(),
        providers = %providers.display(),
        "reading registry sources"
    );
    let datasets_text = read_source(RecordKind::Dataset, datasets)?;
    let providers_text = read_source(RecordKind::Provider, providers)?;
    load_registry(&datasets_text, &providers_text)
}
