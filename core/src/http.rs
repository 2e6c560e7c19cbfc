//! HTTP transport types for the request pipeline.
//!
//! # Design
//! Requests and responses are plain data. The dispatcher builds an
//! `HttpRequest`, a `Transport` turns it into an `HttpResponse`, and the
//! decoder and normalizer only ever look at the `HttpResponse`. Keeping the
//! wire shapes as owned values means transports other than reqwest (test
//! doubles included) can be plugged in without touching the pipeline.

use bytes::Bytes;

/// Header name for the JSON content type.
pub const CONTENT_TYPE: &str = "content-type";

/// Header name carrying the API key on authenticated operations.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Media type sent on every request.
pub const APPLICATION_JSON: &str = "application/json";

/// HTTP method for a request. Every Webfry operation is a POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-built request descriptor.
///
/// `url` is absolute (normalized base plus the operation path). `body` is
/// already serialized JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A response with its body fully buffered.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Reason phrase for `status`, empty when the transport does not know one.
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl HttpResponse {
    /// Response with no headers, mostly useful for custom transports.
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_2xx_only() {
        assert!(HttpResponse::new(200, "OK", "").is_success());
        assert!(HttpResponse::new(204, "No Content", "").is_success());
        assert!(!HttpResponse::new(199, "", "").is_success());
        assert!(!HttpResponse::new(301, "Moved Permanently", "").is_success());
        assert!(!HttpResponse::new(401, "Unauthorized", "").is_success());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Post,
            url: "https://webfry.dev/api/user_info".to_string(),
            headers: vec![("X-API-Key".to_string(), "abc".to_string())],
            body: None,
        };
        assert_eq!(req.header(API_KEY_HEADER), Some("abc"));
        assert_eq!(req.header(CONTENT_TYPE), None);
    }

    #[test]
    fn method_renders_uppercase() {
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
    }
}
