/// Syntactic URL check for populated `url` fields.
///
/// A URL passes when it parses as an absolute URL with a non-empty scheme, a
/// non-empty host, and a non-empty path written after the authority. The
/// `url` crate normalises `https://example.org` to path `/` and skips extra
/// slashes in `http:///host`, so the authority and path requirements are
/// checked against the input text rather than the parsed value. No network
/// access is performed.
use url::Url;

/// Returns `true` if `candidate` is a well-formed absolute URL with scheme,
/// host, and path. Never panics; every parse failure maps to `false`.
pub fn is_valid_url(candidate: &str) -> bool {
    let Ok(parsed) = Url::parse(candidate) else {
        return false;
    };
    if parsed.scheme().is_empty() {
        return false;
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => {}
        Some(_) | None => return false,
    }
    has_authority_and_path(candidate)
}

/// Returns `true` if the input names a non-empty authority after `://` and
/// the text following it starts a path.
fn has_authority_and_path(candidate: &str) -> bool {
    let Some((_, rest)) = candidate.split_once("://") else {
        return false;
    };
    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    if rest[..authority_end].is_empty() {
        return false;
    }
    rest[authority_end..].starts_with('/')
}
