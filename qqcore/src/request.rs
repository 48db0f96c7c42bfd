//! Runtime-agnostic description of one API call.

use serde_json::Value;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Statuses 200 and 504 of the long-poll endpoint.
pub const LONG_POLL_STATUSES: &[u16] = &[200, 504];

/// Which response statuses count as success for a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPredicate {
    /// Any 2xx.
    #[default]
    Success,
    Exactly(u16),
    AnyOf(&'static [u16]),
}

impl StatusPredicate {
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            StatusPredicate::Success => (200..300).contains(&status),
            StatusPredicate::Exactly(expected) => status == *expected,
            StatusPredicate::AnyOf(allowed) => allowed.contains(&status),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One API call before session headers are attached.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// JSON payload, sent as the `r` form field.
    pub payload: Option<Value>,
    pub accept: StatusPredicate,
    pub follow_redirects: bool,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            payload: None,
            accept: StatusPredicate::Success,
            follow_redirects: true,
        }
    }

    pub fn post(url: impl Into<String>, payload: Value) -> Self {
        Self {
            method: Method::Post,
            payload: Some(payload),
            ..Self::get(url)
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn referer(self, referer: &str) -> Self {
        self.header("Referer", referer)
    }

    pub fn origin(self, origin: &str) -> Self {
        self.header("Origin", origin)
    }

    pub fn accept(mut self, accept: StatusPredicate) -> Self {
        self.accept = accept;
        self
    }

    pub fn no_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    /// Form body `r=<url-encoded JSON>`, if this call has a payload.
    pub fn form_body(&self) -> Option<String> {
        self.payload.as_ref().map(form_r)
    }
}

/// Wraps a payload the way the API expects POST bodies: `r=<url-encoded JSON>`.
pub fn form_r(payload: &Value) -> String {
    format!("r={}", urlencoding::encode(&payload.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn predicates() {
        assert!(StatusPredicate::Success.accepts(204));
        assert!(!StatusPredicate::Success.accepts(302));
        assert!(StatusPredicate::Exactly(302).accepts(302));
        assert!(!StatusPredicate::Exactly(302).accepts(200));
        let poll = StatusPredicate::AnyOf(LONG_POLL_STATUSES);
        assert!(poll.accepts(200) && poll.accepts(504));
        assert!(!poll.accepts(502));
    }

    #[test]
    fn form_r_url_encodes_json() {
        let body = form_r(&json!({"key": ""}));
        assert_eq!(body, "r=%7B%22key%22%3A%22%22%7D");
    }

    #[test]
    fn post_carries_payload() {
        let req = ApiRequest::post("http://x/poll2", json!({"a": 1})).referer("http://ref");
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.form_body().as_deref(), Some("r=%7B%22a%22%3A1%7D"));
        assert_eq!(req.headers, vec![("Referer".to_string(), "http://ref".to_string())]);
        assert!(ApiRequest::get("http://x").form_body().is_none());
    }
}
