//! Pattern binding: matching a route pattern against a URL and parsing
//! query strings.
//!
//! Everything here is a pure function of its inputs.

use crate::pattern::{PatternMode, RoutePattern, Segment};
use std::borrow::Cow;
use waypost_core::{Params, Url};

/// Match `pattern` against `url`, returning the captured path parameters.
///
/// Returns `None` when the segment counts differ, a literal segment differs,
/// or (for host-aware patterns) the scheme or host differ. Empty segments on
/// either side are ignored, so trailing slashes never change the outcome.
///
/// When a capture name appears more than once, the right-most value wins.
pub fn match_path(pattern: &RoutePattern, url: &Url) -> Option<Params> {
    let url_segments: Vec<&str> = match pattern.mode() {
        PatternMode::Path => path_segments(url).collect(),
        PatternMode::HostPath => url
            .host_str()
            .filter(|host| !host.is_empty())
            .into_iter()
            .chain(path_segments(url))
            .collect(),
        PatternMode::Url { scheme, host } => {
            if !scheme.eq_ignore_ascii_case(url.scheme()) {
                return None;
            }
            if let (Some(expected), Some(actual)) = (host, url.host_str()) {
                if !expected.eq_ignore_ascii_case(actual) {
                    return None;
                }
            }
            path_segments(url).collect()
        }
    };

    bind_segments(pattern.segments(), &url_segments)
}

fn path_segments(url: &Url) -> impl Iterator<Item = &str> {
    url.path().split('/').filter(|s| !s.is_empty())
}

fn bind_segments(pattern: &[Segment], url: &[&str]) -> Option<Params> {
    if pattern.len() != url.len() {
        return None;
    }

    let mut binding = Params::new();
    for (segment, value) in pattern.iter().zip(url) {
        match segment {
            Segment::Literal(literal) if literal == value => {}
            Segment::Literal(_) => return None,
            Segment::Capture(name) => match percent_decode(value) {
                Some(decoded) => {
                    binding.insert(name.clone(), decoded.into_owned());
                }
                None => {
                    binding.remove(name);
                }
            },
        }
    }
    Some(binding)
}

/// Parse the query string of `url` into a map.
///
/// See [`parse_query_str`] for the rules.
pub fn parse_query(url: &Url) -> Params {
    url.query().map(parse_query_str).unwrap_or_default()
}

/// Parse a raw query string (without the leading `?`).
///
/// Pairs are split on `&`, then on the first `=`. Values are
/// percent-decoded; keys are taken verbatim. A pair without `=` or with a
/// value that does not decode is skipped. Later duplicates overwrite
/// earlier ones.
pub fn parse_query_str(query: &str) -> Params {
    let mut params = Params::new();
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if let Some(value) = percent_decode(value) {
            params.insert(key.to_string(), value.into_owned());
        }
    }
    params
}

/// Percent-decode `raw`, rejecting malformed escapes and invalid UTF-8.
///
/// `+` is left alone.
pub fn percent_decode(raw: &str) -> Option<Cow<'_, str>> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let well_formed = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !well_formed {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    urlencoding::decode(raw).ok()
}
