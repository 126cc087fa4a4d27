use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;

use crate::error::CrmError;

/// A replayable request description.
///
/// Unlike `reqwest::Request`, every part is owned and cloneable, so a request
/// can be re-issued after a credential refresh with its method and body intact.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the configured base URL, e.g. `users/search`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Build a path from escaped segments, e.g. `["users", id, "page"]`.
    pub fn path_from_segments(segments: &[&str]) -> String {
        segments
            .iter()
            .map(|s| urlencoding::encode(s))
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a query pair only when a value is present.
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v.to_string()),
            None => self,
        }
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, CrmError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// One logical call: the request plus its one-shot replay marker.
///
/// `retried` flips to `true` right before the single replay after a refresh.
/// An envelope that fails authentication again is rejected, never queued.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    request: ApiRequest,
    retried: bool,
}

impl RequestEnvelope {
    pub fn new(request: ApiRequest) -> Self {
        Self {
            request,
            retried: false,
        }
    }

    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    pub fn is_retried(&self) -> bool {
        self.retried
    }

    /// Mark the envelope as replayed. Returns `false` if it already was.
    pub fn mark_retried(&mut self) -> bool {
        !std::mem::replace(&mut self.retried, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_are_escaped() {
        assert_eq!(
            ApiRequest::path_from_segments(&["users", "Иван?x=1#f"]),
            "users/%D0%98%D0%B2%D0%B0%D0%BD%3Fx%3D1%23f"
        );
        assert_eq!(
            ApiRequest::path_from_segments(&["users", "a b/c", "page"]),
            "users/a%20b%2Fc/page"
        );
        assert_eq!(
            ApiRequest::path_from_segments(&["users", "5f0c-9e"]),
            "users/5f0c-9e"
        );
    }

    #[test]
    fn query_opt_skips_missing_values() {
        let req = ApiRequest::get("users")
            .query_opt("department", Some("IT"))
            .query_opt::<u32>("page", None)
            .query_opt("grade", Some(3));
        assert_eq!(
            req.query,
            vec![
                ("department".to_string(), "IT".to_string()),
                ("grade".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn envelope_marks_retry_once() {
        let mut envelope = RequestEnvelope::new(ApiRequest::get("users"));
        assert!(!envelope.is_retried());
        assert!(envelope.mark_retried());
        assert!(envelope.is_retried());
        assert!(!envelope.mark_retried());
    }
}
