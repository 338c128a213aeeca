//! Canonical request and response construction.
//!
//! A canonical request is the exact byte string that gets signed:
//!
//! ```text
//! <version>\n
//! <METHOD>\n
//! <canonical path>\n
//! <canonical query>\n
//! <timestamp>\n
//! <raw body>
//! ```
//!
//! A canonical response drops the request line:
//!
//! ```text
//! <version>\n
//! <timestamp>\n
//! <raw body>
//! ```
//!
//! The body always comes last, so every earlier field is free of raw newlines
//! and the layout cannot be shifted by body content.

use http::Uri;
use http::uri::PathAndQuery;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode, percent_decode_str, percent_encode};

use crate::error::SignatureError;

/// Characters that must be percent-encoded in canonical path segments and
/// query components: everything except RFC 3986 unreserved characters.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// The path and raw (still encoded) query of a request URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    /// The URL path, as it appeared in the URL.
    pub path: String,
    /// The raw query string without the leading `?`; empty if absent.
    pub query: String,
}

/// Parse a base URL and return its path prefix without a trailing slash.
///
/// The base URL must be absolute (scheme and host).
///
/// # Examples
///
/// ```
/// use apisign_auth::canonical::parse_base_path;
///
/// assert_eq!(parse_base_path("https://api.example.com/prod/").unwrap(), "/prod");
/// assert_eq!(parse_base_path("https://api.example.com").unwrap(), "");
/// assert!(parse_base_path("/prod").is_err());
/// ```
pub fn parse_base_path(base_url: &str) -> Result<String, SignatureError> {
    let uri: Uri = base_url
        .parse()
        .map_err(|e| SignatureError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(SignatureError::InvalidBaseUrl(format!(
            "{base_url}: scheme and host are required"
        )));
    }
    Ok(uri.path().trim_end_matches('/').to_owned())
}

/// Split a request URL into its path and raw query.
///
/// Accepts absolute URLs (`https://host/path?q`), origin-form URLs
/// (`/path?q`), and relative URLs (`path?q`). Relative URLs are joined onto
/// `base_path`. Fragments are dropped.
///
/// # Errors
///
/// Returns [`SignatureError::InvalidUrl`] for unparseable URLs and
/// [`SignatureError::MissingBaseUrl`] for a relative URL without a base.
pub fn resolve_target(url: &str, base_path: Option<&str>) -> Result<RequestTarget, SignatureError> {
    let url = url.split_once('#').map_or(url, |(before, _)| before);

    if has_scheme(url) {
        let uri: Uri = url
            .parse()
            .map_err(|e| SignatureError::InvalidUrl(format!("{url}: {e}")))?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(SignatureError::InvalidUrl(url.to_owned()));
        }
        return Ok(RequestTarget {
            path: uri.path().to_owned(),
            query: uri.query().unwrap_or_default().to_owned(),
        });
    }

    let joined;
    let target = if url.starts_with('/') {
        url
    } else {
        let base = base_path.ok_or_else(|| SignatureError::MissingBaseUrl(url.to_owned()))?;
        joined = format!("{base}/{url}");
        joined.as_str()
    };

    let path_and_query: PathAndQuery = target
        .parse()
        .map_err(|e| SignatureError::InvalidUrl(format!("{target}: {e}")))?;

    Ok(RequestTarget {
        path: path_and_query.path().to_owned(),
        query: path_and_query.query().unwrap_or_default().to_owned(),
    })
}

/// Whether `url` starts with a `scheme://` prefix.
///
/// Only the leading scheme counts, so a URL embedded in the query of an
/// origin-form or relative URL does not make it absolute.
fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Build the canonical path by re-encoding each path segment.
///
/// Segments are decoded to raw bytes first so that `/a%20b` and `/a b`
/// canonicalize the same way. Empty paths normalize to `/`.
///
/// # Examples
///
/// ```
/// use apisign_auth::canonical::build_canonical_path;
///
/// assert_eq!(build_canonical_path("/v1/items"), "/v1/items");
/// assert_eq!(build_canonical_path(""), "/");
/// ```
#[must_use]
pub fn build_canonical_path(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }

    path.split('/')
        .map(|segment| uri_encode(&percent_decode_str(segment).collect::<Vec<u8>>()))
        .collect::<Vec<_>>()
        .join("/")
}

/// Build the canonical query string from the URL query and explicit params.
///
/// The URL query is decoded as `application/x-www-form-urlencoded` (so `+`
/// decodes to a space) into raw bytes; invalid UTF-8 is kept as-is rather
/// than replaced. Explicit `params` are unencoded and replace every URL
/// value that shares their key; URL keys not named in `params` are kept.
/// Pairs are sorted by key, then by value, and re-encoded.
///
/// # Examples
///
/// ```
/// use apisign_auth::canonical::build_canonical_query;
///
/// assert_eq!(build_canonical_query("b=2&a=1", &[]), "a=1&b=2");
/// assert_eq!(build_canonical_query("a=1&b=2", &[("a", "x y")]), "a=x%20y&b=2");
/// ```
#[must_use]
pub fn build_canonical_query(raw_query: &str, params: &[(&str, &str)]) -> String {
    let mut pairs: Vec<(Vec<u8>, Vec<u8>)> = raw_query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .map(|(key, value)| (form_decode(key), form_decode(value)))
        .filter(|(key, _)| !params.iter().any(|(name, _)| name.as_bytes() == key.as_slice()))
        .collect();

    pairs.extend(
        params
            .iter()
            .map(|(key, value)| (key.as_bytes().to_vec(), value.as_bytes().to_vec())),
    );
    pairs.sort_unstable();

    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", uri_encode(key), uri_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Assemble the canonical request bytes.
#[must_use]
pub fn build_canonical_request(
    version: &str,
    method: &str,
    canonical_path: &str,
    canonical_query: &str,
    timestamp: &str,
    body: &[u8],
) -> Vec<u8> {
    let head = format!("{version}\n{method}\n{canonical_path}\n{canonical_query}\n{timestamp}\n");
    let mut out = Vec::with_capacity(head.len() + body.len());
    out.extend_from_slice(head.as_bytes());
    out.extend_from_slice(body);
    out
}

/// Assemble the canonical response bytes.
#[must_use]
pub fn build_canonical_response(version: &str, timestamp: &str, body: &[u8]) -> Vec<u8> {
    let head = format!("{version}\n{timestamp}\n");
    let mut out = Vec::with_capacity(head.len() + body.len());
    out.extend_from_slice(head.as_bytes());
    out.extend_from_slice(body);
    out
}

fn uri_encode(input: &[u8]) -> String {
    percent_encode(input, URI_ENCODE_SET).to_string()
}

/// Decode one form-encoded query component to raw bytes.
fn form_decode(input: &str) -> Vec<u8> {
    let plus_as_space = input.replace('+', " ");
    percent_decode(plus_as_space.as_bytes()).collect()
}
