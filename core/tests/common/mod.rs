//! Scripted transport double shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use webfry_core::{CancelSignal, ClientConfig, HttpRequest, HttpResponse, Transport, TransportError, WebfryClient};

/// What the double does for one call.
pub enum Reply {
    Respond(HttpResponse),
    Fail(String),
    /// Never resolves; only the invoker's deadline ends the call.
    Hang,
    /// Respond 200 with the request body as the response body.
    Echo,
}

/// Transport that replays scripted replies and records what it saw.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
    signals: Mutex<Vec<CancelSignal>>,
    calls: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        let transport = Self::default();
        transport.replies.lock().unwrap().extend(replies);
        Arc::new(transport)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request recorded")
    }

    /// Cancel signals received so far, in call order.
    pub fn signals(&self) -> Vec<CancelSignal> {
        self.signals.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest, cancel: CancelSignal) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.signals.lock().unwrap().push(cancel);

        let reply = self.replies.lock().unwrap().pop_front().unwrap_or(Reply::Hang);
        match reply {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(message) => Err(TransportError::Other(message)),
            Reply::Hang => std::future::pending::<Result<HttpResponse, TransportError>>().await,
            Reply::Echo => Ok(HttpResponse::new(200, "OK", request.body.unwrap_or_default())),
        }
    }
}

pub fn ok(body: &str) -> Reply {
    Reply::Respond(HttpResponse::new(200, "OK", body.to_string()))
}

pub fn status(code: u16, status_text: &str, body: &str) -> Reply {
    Reply::Respond(HttpResponse::new(code, status_text, body.to_string()))
}

pub fn client(transport: Arc<MockTransport>) -> WebfryClient {
    client_with_timeout(transport, Duration::from_secs(5))
}

pub fn client_with_timeout(transport: Arc<MockTransport>, timeout: Duration) -> WebfryClient {
    let config = ClientConfig::builder()
        .base_url("http://webfry.test")
        .timeout(timeout)
        .build()
        .unwrap();
    WebfryClient::with_transport(config, transport)
}

pub fn authed(transport: Arc<MockTransport>) -> WebfryClient {
    let mut client = client(transport);
    client.set_api_key("test-key");
    client
}
