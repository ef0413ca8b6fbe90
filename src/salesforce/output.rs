//! Extraction helpers for `sf` stdout
//!
//! The CLI may wrap its JSON in update notices or log lines, so nothing here
//! assumes stdout is clean.

use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::core::{CloudSenseError, Result};

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)https?://[^\s'"<>]+"#).expect("valid URL pattern"));

static HTTP_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("valid prefix pattern"));

/// Path that trades a session id for a browser session
pub const FRONTDOOR_PATH: &str = "/secur/frontdoor.jsp";

/// Characters of stdout quoted in errors
const SNIPPET_LEN: usize = 200;

/// URI component encoding: everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Slice from the first `{` to the last `}` of the trimmed text
pub fn extract_json_object(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (end > start).then(|| &trimmed[start..=end])
}

/// Parse the JSON object embedded in CLI output
pub fn parse_embedded_json(text: &str) -> Result<Value> {
    let slice = extract_json_object(text).ok_or_else(|| CloudSenseError::NoJson(snippet(text)))?;
    Ok(serde_json::from_str(slice)?)
}

/// `result.url` or `result.openUrl`, if it is an http(s) URL
pub fn url_from_json(value: &Value) -> Option<String> {
    ["/result/url", "/result/openUrl"]
        .into_iter()
        .filter_map(|pointer| value.pointer(pointer).and_then(Value::as_str))
        .find(|candidate| is_http_url(candidate))
        .map(str::to_string)
}

/// First URL-shaped substring of the text
pub fn first_url(text: &str) -> Option<&str> {
    URL_PATTERN.find(text).map(|m| m.as_str())
}

/// Whether the string starts with `http://` or `https://`
pub fn is_http_url(candidate: &str) -> bool {
    HTTP_PREFIX.is_match(candidate)
}

/// Compose `<instance>/secur/frontdoor.jsp?sid=<token>`.
///
/// The token is percent-encoded as a URI component, so `!` stays literal and
/// a space becomes `%20`.
pub fn frontdoor_url(instance_url: &str, token: &str) -> Result<String> {
    let base = instance_url.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{}{}", base, FRONTDOOR_PATH))?;
    Ok(format!(
        "{}?sid={}",
        url,
        utf8_percent_encode(token, URI_COMPONENT)
    ))
}

/// Leading characters of trimmed output, for error messages
pub fn snippet(text: &str) -> String {
    text.trim().chars().take(SNIPPET_LEN).collect()
}
