/// Provenance record for a validated registry revision.
///
/// Captures the revision identifier supplied by the caller (typically a
/// commit hash), every dataset and provider id in canonical order, and a
/// SHA-256 digest of each collection's canonical rendering. The digests do
/// not change when only on-disk formatting changes.
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::ValidationConfig;
use crate::format::{render_records, sort_records};
use crate::record::{Record, RecordKind, Registry};

/// Audit record for one registry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// The revision the registry was read from, if known.
    pub revision: Option<String>,
    /// Dataset ids in canonical order.
    pub datasets: Vec<String>,
    /// Provider ids in canonical order.
    pub providers: Vec<String>,
    /// Lowercase hex SHA-256 of the canonical datasets rendering.
    pub datasets_sha256: String,
    /// Lowercase hex SHA-256 of the canonical providers rendering.
    pub providers_sha256: String,
}

impl Provenance {
    /// Builds the provenance record for `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if a collection cannot be rendered.
    pub fn capture(
        registry: &Registry,
        config: &ValidationConfig,
        revision: Option<String>,
    ) -> Result<Self, serde_json::Error> {
        let (datasets, datasets_sha256) = summarize(registry, config, RecordKind::Dataset)?;
        let (providers, providers_sha256) = summarize(registry, config, RecordKind::Provider)?;
        Ok(Self {
            revision,
            datasets,
            providers,
            datasets_sha256,
            providers_sha256,
        })
    }
}

fn summarize(
    registry: &Registry,
    config: &ValidationConfig,
    kind: RecordKind,
) -> Result<(Vec<String>, String), serde_json::Error> {
    let mut records: Vec<Record> = registry.records(kind).to_vec();
    sort_records(&mut records, config.rules(kind));
    let ids = records
        .iter()
        .filter_map(Record::id)
        .map(str::to_owned)
        .collect();
    let rendered = render_records(&records)?;
    Ok((ids, hex_encode(&Sha256::digest(rendered.as_bytes()))))
}

/// Encodes a byte slice as a lowercase hexadecimal string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX_CHARS[(b >> 4) as usize] as char);
        out.push(HEX_CHARS[(b & 0x0f) as usize] as char);
    }
    out
}
