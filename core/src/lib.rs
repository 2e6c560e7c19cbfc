//! Async client for the Webfry security tooling API.
//!
//! # Overview
//! `WebfryClient` maps each remote operation (key management, password and
//! hash analysis, encoding and crypto helpers) to a typed async method. All of
//! them share one pipeline: build the request, run it through a `Transport`
//! under a deadline, decode the body, and either return the typed value or a
//! single `ApiError`.
//!
//! # Design
//! - `http` holds the plain-data request/response types; `transport` holds
//!   the `Transport` trait, the reqwest implementation and the timeout-bound
//!   `invoke`.
//! - `decode` never fails: empty or non-JSON bodies become `None`.
//! - `normalize` picks the error message from `error`, then `message`, then
//!   the status text.
//! - `endpoints` is the operation table; `types` the wire DTOs.
//!
//! ```no_run
//! # async fn demo() -> webfry_core::Result<()> {
//! use webfry_core::{ClientConfig, PasswordCheckBody, WebfryClient};
//!
//! let config = ClientConfig::builder().api_key("my-key").build()?;
//! let client = WebfryClient::new(config)?;
//! let strength = client
//!     .password_check(&PasswordCheckBody { password: "MyPassword123!".into() })
//!     .await?;
//! println!("{} ({})", strength.label, strength.score);
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod client;
pub mod config;
pub mod decode;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod normalize;
pub mod transport;
pub mod types;

pub use cancel::{CancelSignal, CancellationToken};
pub use client::WebfryClient;
pub use config::{normalize_base_url, ClientConfig, ClientConfigBuilder};
pub use endpoints::{Endpoint, ResponseMode};
pub use error::{ApiError, ErrorPayload, Result, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{invoke, ReqwestTransport, Transport};
pub use types::*;
