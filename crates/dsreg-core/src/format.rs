/// Canonical on-disk form of a registry collection.
///
/// Records are ordered by the numeric suffix of their id and serialised with
/// four-space indentation, keys in sorted order, non-ASCII text unescaped,
/// and one trailing newline. Formatting never validates; it only reorders
/// records and normalises whitespace, so `render(load(x))` is set-equal to
/// `x` and rendering already formatted output is byte-identical.
///
/// Numbers keep their digits (`1.50` stays `1.50`) but exponents are written
/// in serde_json's normal form, so `1e3` renders as `1e+3`.
use std::cmp::Ordering;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::config::KindRules;
use crate::load::{LoadError, parse_records};
use crate::record::{Record, RecordKind};

/// Failure to produce the canonical form of a source.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The source could not be decoded.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The records could not be serialised.
    #[error("failed to render records: {0}")]
    Render(#[from] serde_json::Error),
}

/// Sort position of a record.
///
/// Numbered ids come first, by numeric value; ids outside the pattern follow
/// in string order; records with no string id come last.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey<'a> {
    Numbered { digits: usize, key: &'a str },
    Unnumbered(&'a str),
    Missing,
}

fn sort_key<'a>(rules: &KindRules, record: &'a Record) -> SortKey<'a> {
    match record.id() {
        Some(id) => match rules.id_key(id) {
            Some(key) => SortKey::Numbered {
                digits: key.len(),
                key,
            },
            None => SortKey::Unnumbered(id),
        },
        None => SortKey::Missing,
    }
}

/// Compares two records by id order.
pub fn compare_records(rules: &KindRules, a: &Record, b: &Record) -> Ordering {
    sort_key(rules, a).cmp(&sort_key(rules, b))
}

/// Sorts records ascending by id. The sort is stable, so records whose ids
/// share a numeric value keep their input order.
pub fn sort_records(records: &mut [Record], rules: &KindRules) {
    records.sort_by(|a, b| compare_records(rules, a, b));
}

/// Serialises records in canonical form.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if serialisation fails.
pub fn render_records(records: &[Record]) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;
    buf.push(b'\n');
    String::from_utf8(buf).map_err(|e| <serde_json::Error as serde::ser::Error>::custom(e))
}

/// Decodes, sorts, and re-renders one source.
///
/// # Errors
///
/// [`FormatError::Load`] if `text` is not a JSON array of objects.
pub fn reformat_source(
    kind: RecordKind,
    text: &str,
    rules: &KindRules,
) -> Result<String, FormatError> {
    let mut records = parse_records(kind, text)?;
    sort_records(&mut records, rules);
    let rendered = render_records(&records)?;
    tracing::debug!(
        collection = kind.collection(),
        records = records.len(),
        changed = rendered != text,
        "source reformatted"
    );
    Ok(rendered)
}

/// Returns `true` if `text` is already in canonical form.
///
/// # Errors
///
/// Same as [`reformat_source`].
pub fn is_formatted(kind: RecordKind, text: &str, rules: &KindRules) -> Result<bool, FormatError> {
    Ok(reformat_source(kind, text, rules)? == text)
}
