//! Backend exchange.
//!
//! [`ChatBackend`] is the seam between the controller and the network;
//! [`HttpBackend`] talks to the real service, tests substitute fakes.

mod http;
pub mod types;

pub use http::HttpBackend;
pub use types::{ChatRequest, ChatResponse, HealthSnapshot, SessionClearRequest};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to reach backend: {0}")]
    Transport(String),

    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response JSON: {0}")]
    Decode(String),

    #[error("Failed to encode request JSON: {0}")]
    Encode(String),
}

/// The three calls the widget makes.
pub trait ChatBackend {
    /// `POST /api/chat`.
    fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError>;

    /// `POST /api/session/clear`. The reply body is ignored.
    fn clear_session(&self, session_id: &str) -> Result<(), BackendError>;

    /// `GET /api/health`.
    fn health(&self) -> Result<HealthSnapshot, BackendError>;
}

impl<T: ChatBackend + ?Sized> ChatBackend for &T {
    fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        (**self).chat(request)
    }

    fn clear_session(&self, session_id: &str) -> Result<(), BackendError> {
        (**self).clear_session(session_id)
    }

    fn health(&self) -> Result<HealthSnapshot, BackendError> {
        (**self).health()
    }
}
