//! Typed async client for the Webfry API.
//!
//! # Design
//! Every operation goes through the same three steps:
//! `build_request` (headers, auth, JSON body; no I/O), `transport::invoke`
//! (one deadline-bound exchange) and `parse_json` / `parse_text` (decode, then
//! either convert or normalize into an `ApiError`). The build and parse halves
//! are public so a host that performs its own I/O can use them directly.
//!
//! The API key lives in the client's `ClientConfig`. Changing it takes
//! `&mut self`, so it can never change underneath an in-flight call; share a
//! client across tasks by wrapping it (e.g. in `Arc<RwLock<_>>`).

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::decode::{body_text, decode_payload};
use crate::endpoints::{self, Endpoint, ResponseMode};
use crate::error::{ApiError, ErrorPayload, Result};
use crate::http::{HttpRequest, HttpResponse, API_KEY_HEADER, APPLICATION_JSON, CONTENT_TYPE};
use crate::normalize::api_error;
use crate::transport::{invoke, ReqwestTransport, Transport};
use crate::types::*;

/// Client for the Webfry API.
#[derive(Clone)]
pub struct WebfryClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for WebfryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebfryClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl WebfryClient {
    /// Client for `config` using the reqwest transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.user_agent())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Client for `config` sending requests through `transport`.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Client configured from `WEBFRY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.config.set_api_key(api_key.into());
    }

    pub fn clear_api_key(&mut self) {
        self.config.clear_api_key();
    }

    pub fn has_api_key(&self) -> bool {
        self.config.api_key().is_some()
    }

    // -----------------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------------

    /// Build the request for `endpoint`.
    ///
    /// Fails with `ApiError::Configuration` when the endpoint requires an API
    /// key and none is set.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: Option<&B>,
    ) -> Result<HttpRequest> {
        let mut headers = vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())];
        if endpoint.requires_auth {
            let api_key = self.config.api_key().ok_or_else(ApiError::missing_api_key)?;
            headers.push((API_KEY_HEADER.to_string(), api_key.to_string()));
        }

        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(ApiError::Serialization)?;

        Ok(HttpRequest {
            method: endpoint.method,
            url: self.config.url(endpoint.path),
            headers,
            body,
        })
    }

    /// Send `request` through the transport under the configured timeout.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        invoke(self.transport.as_ref(), request, self.config.timeout()).await
    }

    /// Interpret a JSON-mode response.
    ///
    /// An empty or unparseable success body is treated as JSON `null`, so it
    /// converts cleanly into `Option<_>` or `Value` and fails with
    /// `UnexpectedShape` for struct types.
    pub fn parse_json<T: DeserializeOwned>(&self, response: &HttpResponse) -> Result<T> {
        let payload = decode_payload(&body_text(response));

        if !response.is_success() {
            let payload = payload.map_or(ErrorPayload::Empty, ErrorPayload::Json);
            return Err(api_error(response.status, &response.status_text, payload));
        }

        serde_json::from_value(payload.clone().unwrap_or(Value::Null))
            .map_err(|source| ApiError::UnexpectedShape { source, payload })
    }

    /// Interpret a text-mode response. Success bodies are returned verbatim.
    pub fn parse_text(&self, response: &HttpResponse) -> Result<String> {
        let text = body_text(response);

        if !response.is_success() {
            let payload = match decode_payload(&text) {
                Some(value) => ErrorPayload::Json(value),
                None if text.is_empty() => ErrorPayload::Empty,
                None => ErrorPayload::Text(text),
            };
            return Err(api_error(response.status, &response.status_text, payload));
        }

        Ok(text)
    }

    async fn call_json<T, B>(&self, endpoint: &Endpoint, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        debug_assert_eq!(endpoint.mode, ResponseMode::Json, "{} is not a JSON operation", endpoint.name);
        let request = self.build_request(endpoint, body)?;
        tracing::debug!(operation = endpoint.name, url = %request.url, "dispatching");
        let response = self.execute(request).await?;
        self.parse_json(&response)
    }

    async fn call_text<B: Serialize + ?Sized>(&self, endpoint: &Endpoint, body: Option<&B>) -> Result<String> {
        debug_assert_eq!(endpoint.mode, ResponseMode::Text, "{} is not a text operation", endpoint.name);
        let request = self.build_request(endpoint, body)?;
        tracing::debug!(operation = endpoint.name, url = %request.url, "dispatching");
        let response = self.execute(request).await?;
        self.parse_text(&response)
    }

    // -----------------------------------------------------------------------
    // Account
    // -----------------------------------------------------------------------

    /// Exchange account credentials for an API key. Does not store the key.
    pub async fn get_api_key(&self, body: &ApiKeyRequest) -> Result<ApiKeyResponse> {
        self.call_json(&endpoints::GET_API_KEY, Some(body)).await
    }

    /// Issue a new key, invalidating the current one. Does not store the key.
    pub async fn rotate_api_key(&self) -> Result<ApiKeyResponse> {
        self.call_json(&endpoints::ROTATE_API_KEY, None::<&()>).await
    }

    pub async fn user_info(&self) -> Result<UserInfoResponse> {
        self.call_json(&endpoints::USER_INFO, None::<&()>).await
    }

    // -----------------------------------------------------------------------
    // Passwords
    // -----------------------------------------------------------------------

    pub async fn password_check(&self, body: &PasswordCheckBody) -> Result<StrengthResult> {
        self.call_json(&endpoints::PASSWORD_CHECK, Some(body)).await
    }

    pub async fn entropy(&self, body: &EntropyRequest) -> Result<EntropyResponse> {
        self.call_json(&endpoints::ENTROPY, Some(body)).await
    }

    pub async fn common_password(&self, body: &PasswordRequest) -> Result<PasswordResponse> {
        self.call_json(&endpoints::COMMON_PASSWORD, Some(body)).await
    }

    // -----------------------------------------------------------------------
    // Hashes
    // -----------------------------------------------------------------------

    pub async fn hash_lookup(&self, body: &HashLookupBody) -> Result<HashLookupOutput> {
        self.call_json(&endpoints::HASH_LOOKUP, Some(body)).await
    }

    /// Unauthenticated variant of `hash_lookup`.
    pub async fn hash_lookup_site(&self, body: &HashLookupBody) -> Result<HashLookupOutput> {
        self.call_json(&endpoints::HASH_LOOKUP_SITE, Some(body)).await
    }

    pub async fn hash_generator(&self, body: &HashGeneratorRequest) -> Result<HashGeneratorResponse> {
        self.call_json(&endpoints::HASH_GENERATOR, Some(body)).await
    }

    pub async fn hash_identifier(&self, body: &HashIdentifierRequest) -> Result<HashIdentifierResponse> {
        self.call_json(&endpoints::HASH_IDENTIFIER, Some(body)).await
    }

    // -----------------------------------------------------------------------
    // Encoding and crypto helpers
    // -----------------------------------------------------------------------

    pub async fn base64(&self, body: &Base64Request) -> Result<Base64Response> {
        self.call_json(&endpoints::BASE64, Some(body)).await
    }

    pub async fn generate_random_key(&self) -> Result<GenerateRandomKeyResponse> {
        self.call_json(&endpoints::GENERATE_RANDOM_KEY, None::<&()>).await
    }

    pub async fn jwt_decoder(&self, body: &JwtRequest) -> Result<JwtResponse> {
        self.call_json(&endpoints::JWT_DECODER, Some(body)).await
    }

    pub async fn secure_encrypt(&self, body: &CryptoRequest) -> Result<CryptoResponse> {
        self.call_json(&endpoints::SECURE_ENCRYPT, Some(body)).await
    }

    pub async fn secure_decrypt(&self, body: &CryptoRequest) -> Result<CryptoResponse> {
        self.call_json(&endpoints::SECURE_DECRYPT, Some(body)).await
    }

    pub async fn json_format(&self, body: &JsonRequest) -> Result<JsonResponse> {
        self.call_json(&endpoints::JSON_FORMAT, Some(body)).await
    }

    pub async fn json_minify(&self, body: &JsonRequest) -> Result<JsonResponse> {
        self.call_json(&endpoints::JSON_MINIFY, Some(body)).await
    }

    // -----------------------------------------------------------------------
    // Misc
    // -----------------------------------------------------------------------

    /// Send feedback. The service answers with free-form text.
    pub async fn suggestion(&self, body: &SuggestionInput) -> Result<String> {
        self.call_text(&endpoints::SUGGESTION, Some(body)).await
    }

    /// Untyped until the endpoint ships; `None` for an empty body.
    pub async fn ip_info(&self, body: &IpRequest) -> Result<Option<Value>> {
        self.call_json(&endpoints::IP_INFO, Some(body)).await
    }

    /// Untyped until the endpoint ships; `None` for an empty body.
    pub async fn data_breach(&self, body: &IpRequest) -> Result<Option<Value>> {
        self.call_json(&endpoints::DATA_BREACH, Some(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelSignal;
    use crate::error::TransportError;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn send(&self, _: HttpRequest, _: CancelSignal) -> Result<HttpResponse, TransportError> {
            Err(TransportError::Other("unreachable".to_string()))
        }
    }

    fn client() -> WebfryClient {
        WebfryClient::with_transport(ClientConfig::new("http://localhost:3000"), Arc::new(Unreachable))
    }

    fn response(status: u16, status_text: &str, body: &str) -> HttpResponse {
        HttpResponse::new(status, status_text, body.to_string())
    }

    #[test]
    fn build_public_request_has_no_key_header() {
        let req = client()
            .build_request(
                &endpoints::GET_API_KEY,
                Some(&ApiKeyRequest {
                    email: "a@b.c".to_string(),
                    password: "pw".to_string(),
                }),
            )
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/get_api_key");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["email"], "a@b.c");
        assert_eq!(body["password"], "pw");
    }

    #[test]
    fn build_authenticated_request_without_key_fails() {
        let err = client().build_request(&endpoints::USER_INFO, None::<&()>).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn build_authenticated_request_carries_key() {
        let mut c = client();
        c.set_api_key("abc123");
        let req = c.build_request(&endpoints::USER_INFO, None::<&()>).unwrap();
        assert_eq!(req.header("x-api-key"), Some("abc123"));
        assert!(req.body.is_none());
    }

    #[test]
    fn clear_api_key_restores_configuration_error() {
        let mut c = client();
        c.set_api_key("abc123");
        assert!(c.has_api_key());
        c.clear_api_key();
        assert!(!c.has_api_key());
        assert!(c.build_request(&endpoints::ROTATE_API_KEY, None::<&()>).is_err());
    }

    #[test]
    fn parse_json_success() {
        let parsed: ApiKeyResponse = client()
            .parse_json(&response(200, "OK", r#"{"api_key":"abc123"}"#))
            .unwrap();
        assert_eq!(parsed.api_key, "abc123");
    }

    #[test]
    fn parse_json_unparseable_success_is_null() {
        let parsed: Option<Value> = client().parse_json(&response(200, "OK", "not json")).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn parse_json_shape_mismatch_keeps_payload() {
        let err = client()
            .parse_json::<ApiKeyResponse>(&response(200, "OK", r#"{"key":"abc"}"#))
            .unwrap_err();
        match err {
            ApiError::UnexpectedShape { payload, .. } => {
                assert_eq!(payload, Some(serde_json::json!({"key": "abc"})));
            }
            other => panic!("expected UnexpectedShape, got {other:?}"),
        }
    }

    #[test]
    fn parse_json_error_uses_error_field() {
        let err = client()
            .parse_json::<ApiKeyResponse>(&response(401, "Unauthorized", r#"{"error":"invalid credentials"}"#))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid credentials");
        assert_eq!(err.status(), 401);
    }

    #[test]
    fn parse_json_error_with_html_body_drops_payload() {
        let err = client()
            .parse_json::<Value>(&response(502, "Bad Gateway", "<html>oops</html>"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad Gateway");
        assert_eq!(err.payload(), Some(&ErrorPayload::Empty));
    }

    #[test]
    fn parse_text_returns_body_verbatim() {
        let text = client().parse_text(&response(200, "OK", "  thanks!\n")).unwrap();
        assert_eq!(text, "  thanks!\n");
        assert_eq!(client().parse_text(&response(200, "OK", "")).unwrap(), "");
    }

    #[test]
    fn parse_text_error_keeps_raw_text() {
        let err = client().parse_text(&response(500, "Internal Server Error", "boom")).unwrap_err();
        assert_eq!(err.to_string(), "Internal Server Error");
        assert_eq!(err.payload(), Some(&ErrorPayload::Text("boom".to_string())));
    }

    #[test]
    fn parse_text_error_prefers_json_message() {
        let err = client()
            .parse_text(&response(400, "Bad Request", r#"{"message":"message must not be empty"}"#))
            .unwrap_err();
        assert_eq!(err.to_string(), "message must not be empty");
    }

    #[tokio::test]
    async fn transport_failure_surfaces_from_operations() {
        let mut c = client();
        c.set_api_key("k");
        let err = c.user_info().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    #[should_panic(expected = "suggestion is not a JSON operation")]
    async fn json_dispatch_rejects_text_endpoint() {
        let input = SuggestionInput {
            email: None,
            message: "hi".to_string(),
        };
        let _ = client().call_json::<Value, _>(&endpoints::SUGGESTION, Some(&input)).await;
    }

    #[tokio::test]
    #[should_panic(expected = "user_info is not a text operation")]
    async fn text_dispatch_rejects_json_endpoint() {
        let _ = client().call_text(&endpoints::USER_INFO, None::<&()>).await;
    }

    #[test]
    fn debug_does_not_leak_key() {
        let mut c = client();
        c.set_api_key("hidden-value");
        assert!(!format!("{c:?}").contains("hidden-value"));
    }
}
