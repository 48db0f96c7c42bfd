//! Session cookie jar.
//!
//! The jar is a flat name → value map. Cookie attributes the server sends in
//! upper case (`EXPIRES`, `DOMAIN`, `PATH`) come through the parser as ordinary
//! pairs and are removed after every update, so the jar only ever holds
//! session data.

use std::collections::{BTreeMap, HashMap};

/// Attribute names that are stripped from the jar after every update.
pub const METADATA_KEYS: [&str; 3] = ["EXPIRES", "DOMAIN", "PATH"];

const HTTP_ONLY: &str = "HttpOnly";

/// Anything the jar can be updated from.
#[derive(Debug, Clone)]
pub enum CookieSource {
    /// A single `name=value; name2=value2` string.
    Header(String),
    /// One entry per `Set-Cookie` header line.
    SetCookie(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl CookieSource {
    fn into_map(self) -> BTreeMap<String, String> {
        match self {
            CookieSource::Header(raw) => parse_cookie_string(&raw),
            CookieSource::SetCookie(lines) => parse_cookie_string(&flatten_set_cookie(&lines)),
            CookieSource::Map(map) => map,
        }
    }
}

impl From<&str> for CookieSource {
    fn from(raw: &str) -> Self {
        CookieSource::Header(raw.to_string())
    }
}

impl From<String> for CookieSource {
    fn from(raw: String) -> Self {
        CookieSource::Header(raw)
    }
}

impl From<Vec<String>> for CookieSource {
    fn from(lines: Vec<String>) -> Self {
        CookieSource::SetCookie(lines)
    }
}

impl From<&[&str]> for CookieSource {
    fn from(lines: &[&str]) -> Self {
        CookieSource::SetCookie(lines.iter().map(|l| l.to_string()).collect())
    }
}

impl From<BTreeMap<String, String>> for CookieSource {
    fn from(map: BTreeMap<String, String>) -> Self {
        CookieSource::Map(map)
    }
}

impl From<HashMap<String, String>> for CookieSource {
    fn from(map: HashMap<String, String>) -> Self {
        CookieSource::Map(map.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, String); N]> for CookieSource {
    fn from(pairs: [(&str, String); N]) -> Self {
        CookieSource::Map(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

/// Parses a `name=value; name2=value2` string.
///
/// Segments without `=` are ignored, the first occurrence of a name wins,
/// double-quoted values are unquoted and percent-encoded values are decoded
/// when they decode cleanly.
pub fn parse_cookie_string(raw: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for segment in raw.split(';') {
        let Some((name, value)) = segment.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() || out.contains_key(name) {
            continue;
        }
        let mut value = value.trim();
        if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            value = &value[1..value.len() - 1];
        }
        let value = match urlencoding::decode(value) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => value.to_string(),
        };
        out.insert(name.to_string(), value);
    }
    out
}

/// Serializes cookies as `name=value; ` pairs, trailing separator included.
pub fn serialize_cookies<'a>(cookies: impl IntoIterator<Item = (&'a String, &'a String)>) -> String {
    let mut out = String::new();
    for (name, value) in cookies {
        out.push_str(name);
        out.push('=');
        out.push_str(value);
        out.push_str("; ");
    }
    out
}

/// Joins several `Set-Cookie` lines into one parseable string, dropping the
/// bare `HttpOnly` flag so it neither becomes a name nor swallows the next pair.
pub fn flatten_set_cookie(lines: &[String]) -> String {
    lines
        .iter()
        .flat_map(|line| line.split(';'))
        .map(str::trim)
        .filter(|segment| !segment.is_empty() && !segment.eq_ignore_ascii_case(HTTP_ONLY))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole jar.
    pub fn set(&mut self, source: impl Into<CookieSource>) {
        self.cookies = source.into().into_map();
        self.strip_metadata();
    }

    /// Unions `source` into the jar; incoming values overwrite existing names.
    pub fn merge(&mut self, source: impl Into<CookieSource>) {
        let incoming = source.into().into_map();
        if incoming.is_empty() {
            return;
        }
        self.cookies.extend(incoming);
        self.strip_metadata();
    }

    /// The `Cookie` request header value.
    pub fn header(&self) -> String {
        serialize_cookies(&self.cookies)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    fn strip_metadata(&mut self) {
        for key in METADATA_KEYS {
            self.cookies.remove(key);
        }
    }
}
