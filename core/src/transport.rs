//! Transport abstraction and the timeout-bound invoker.
//!
//! # Design
//! `Transport` performs exactly one exchange and knows nothing about
//! timeouts. `invoke` is the single place where a deadline is applied: it
//! races the transport future against a timer, fires the cancel signal if the
//! timer wins and drops whichever future lost. Every operation therefore
//! shares the same timeout semantics.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;

use crate::cancel::{CancelSignal, CancellationToken};
use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP exchange.
///
/// Implementations should stop work and release the connection once
/// `cancel` fires. The invoker drops the returned future on timeout either
/// way.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: HttpRequest,
        cancel: CancelSignal,
    ) -> Result<HttpResponse, TransportError>;
}

/// Run `request` through `transport`, failing with `ApiError::Timeout` if no
/// response arrives within `timeout`.
pub async fn invoke(
    transport: &dyn Transport,
    request: HttpRequest,
    timeout: Duration,
) -> Result<HttpResponse, ApiError> {
    let (token, signal) = CancellationToken::new();
    let method = request.method;
    let url = request.url.clone();
    let started = Instant::now();

    tokio::select! {
        result = transport.send(request, signal) => match result {
            Ok(response) => {
                tracing::debug!(
                    %method,
                    %url,
                    status = response.status,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "response received"
                );
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(%method, %url, error = %e, "transport failure");
                Err(ApiError::Transport(e))
            }
        },
        () = tokio::time::sleep(timeout) => {
            token.cancel();
            tracing::warn!(%method, %url, timeout_ms = timeout.as_millis() as u64, "request timed out");
            Err(ApiError::timeout(timeout))
        }
    }
}

/// `Transport` backed by a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport sending `user_agent` on every request.
    pub fn new(user_agent: &str) -> Result<Self, TransportError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    /// Wrap an existing reqwest client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn exchange(&self, request: HttpRequest) -> Result<HttpResponse, reqwest::Error> {
        let mut builder = self.client.request(request.method.into(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: HttpRequest,
        mut cancel: CancelSignal,
    ) -> Result<HttpResponse, TransportError> {
        tokio::select! {
            result = self.exchange(request) => result.map_err(TransportError::from),
            () = cancel.cancelled() => Err(TransportError::Cancelled),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}
