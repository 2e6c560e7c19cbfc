//! The Webfry operation table.
//!
//! Each operation is one fixed path and method under the API root. The
//! table is data so it can be inspected (and checked in tests) independently
//! of the typed client methods that use it.

use crate::http::HttpMethod;

/// How a successful response body is returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Decode as JSON and convert into the operation's response type.
    Json,
    /// Return the body text verbatim.
    Text,
}

/// A single remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub path: &'static str,
    pub method: HttpMethod,
    pub requires_auth: bool,
    pub mode: ResponseMode,
}

impl Endpoint {
    const fn post(name: &'static str, path: &'static str, requires_auth: bool) -> Self {
        Self {
            name,
            path,
            method: HttpMethod::Post,
            requires_auth,
            mode: ResponseMode::Json,
        }
    }

    const fn text(self) -> Self {
        Self {
            mode: ResponseMode::Text,
            ..self
        }
    }
}

pub const GET_API_KEY: Endpoint = Endpoint::post("get_api_key", "/get_api_key", false);
pub const ROTATE_API_KEY: Endpoint = Endpoint::post("rotate_api_key", "/new_api_key", true);
pub const USER_INFO: Endpoint = Endpoint::post("user_info", "/user_info", true);
pub const PASSWORD_CHECK: Endpoint = Endpoint::post("password_check", "/password_check", true);
pub const HASH_LOOKUP: Endpoint = Endpoint::post("hash_lookup", "/hash_lookup", true);
pub const HASH_LOOKUP_SITE: Endpoint = Endpoint::post("hash_lookup_site", "/hash_lookup_site", false);
pub const HASH_GENERATOR: Endpoint = Endpoint::post("hash_generator", "/hash_generator", true);
pub const BASE64: Endpoint = Endpoint::post("base64", "/base64", true);
pub const ENTROPY: Endpoint = Endpoint::post("entropy", "/entropy", true);
pub const HASH_IDENTIFIER: Endpoint = Endpoint::post("hash_identifier", "/hash_identifier", true);
pub const GENERATE_RANDOM_KEY: Endpoint =
    Endpoint::post("generate_random_key", "/generate_random_key", true);
pub const JWT_DECODER: Endpoint = Endpoint::post("jwt_decoder", "/jwt_decoder", true);
pub const SECURE_ENCRYPT: Endpoint = Endpoint::post("secure_encrypt", "/secure_encrypt", true);
pub const SECURE_DECRYPT: Endpoint = Endpoint::post("secure_decrypt", "/secure_decrypt", true);
pub const JSON_FORMAT: Endpoint = Endpoint::post("json_format", "/json_format", true);
pub const JSON_MINIFY: Endpoint = Endpoint::post("json_minify", "/json_minify", true);
pub const COMMON_PASSWORD: Endpoint = Endpoint::post("common_password", "/common_pwd", true);
pub const SUGGESTION: Endpoint = Endpoint::post("suggestion", "/suggestion", true).text();
/// Under construction server-side.
pub const IP_INFO: Endpoint = Endpoint::post("ip_info", "/ip_info", true);
/// Under construction server-side.
pub const DATA_BREACH: Endpoint = Endpoint::post("data_breach", "/data_breach", true);

/// Every operation, in declaration order.
pub const ALL: &[Endpoint] = &[
    GET_API_KEY,
    ROTATE_API_KEY,
    USER_INFO,
    PASSWORD_CHECK,
    HASH_LOOKUP,
    HASH_LOOKUP_SITE,
    HASH_GENERATOR,
    BASE64,
    ENTROPY,
    HASH_IDENTIFIER,
    GENERATE_RANDOM_KEY,
    JWT_DECODER,
    SECURE_ENCRYPT,
    SECURE_DECRYPT,
    JSON_FORMAT,
    JSON_MINIFY,
    COMMON_PASSWORD,
    SUGGESTION,
    IP_INFO,
    DATA_BREACH,
];

/// Look up an operation by its method name.
pub fn by_name(name: &str) -> Option<&'static Endpoint> {
    ALL.iter().find(|endpoint| endpoint.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn paths_are_unique_and_rooted() {
        let mut seen = HashSet::new();
        for endpoint in ALL {
            assert!(endpoint.path.starts_with('/'), "{}", endpoint.name);
            assert!(!endpoint.path.ends_with('/'), "{}", endpoint.name);
            assert!(seen.insert(endpoint.path), "duplicate path {}", endpoint.path);
        }
        assert_eq!(ALL.len(), 20);
    }

    #[test]
    fn every_operation_is_post() {
        assert!(ALL.iter().all(|e| e.method == HttpMethod::Post));
    }

    #[test]
    fn only_key_exchange_and_site_lookup_are_public() {
        let public: Vec<_> = ALL.iter().filter(|e| !e.requires_auth).map(|e| e.name).collect();
        assert_eq!(public, vec!["get_api_key", "hash_lookup_site"]);
    }

    #[test]
    fn suggestion_is_the_only_text_operation() {
        let text: Vec<_> = ALL.iter().filter(|e| e.mode == ResponseMode::Text).collect();
        assert_eq!(text, vec![&SUGGESTION]);
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(by_name("common_password").map(|e| e.path), Some("/common_pwd"));
        assert_eq!(by_name("rotate_api_key").map(|e| e.path), Some("/new_api_key"));
        assert!(by_name("nope").is_none());
    }
}
