//! Blocking HTTP client for the backend, built on ureq.

use std::time::Duration;

use super::types::{ChatRequest, ChatResponse, HealthSnapshot, SessionClearRequest};
use super::{BackendError, ChatBackend};
use crate::config::WidgetConfig;
use crate::logging::{Direction, ExchangeLog};

const CHAT_PATH: &str = "/api/chat";
const SESSION_CLEAR_PATH: &str = "/api/session/clear";
const HEALTH_PATH: &str = "/api/health";

/// Talks to the backend over HTTP.
///
/// Every request is bounded by the configured timeout; a request that runs
/// past it fails as a transport error.
pub struct HttpBackend {
    agent: ureq::Agent,
    base_url: String,
    exchange_log: ExchangeLog,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into();
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            base_url: base_url.trim_end_matches('/').to_string(),
            exchange_log: ExchangeLog::disabled(),
        }
    }

    pub fn from_config(config: &WidgetConfig) -> Self {
        Self::new(config.base_url.clone(), config.timeout())
    }

    /// Record every exchange to `log`.
    pub fn with_exchange_log(mut self, log: ExchangeLog) -> Self {
        self.exchange_log = log;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ureq::Response, BackendError> {
        let payload = serde_json::to_string(body).map_err(|e| BackendError::Encode(e.to_string()))?;
        self.exchange_log
            .record(Direction::Send, &format!("POST {} {}", path, payload));
        log::debug!("POST {}", path);

        self.agent
            .post(&self.url(path))
            .set("Content-Type", "application/json")
            .send_string(&payload)
            .map_err(|e| self.transport_failure(path, e))
    }

    fn get(&self, path: &str) -> Result<ureq::Response, BackendError> {
        self.exchange_log
            .record(Direction::Send, &format!("GET {}", path));
        log::debug!("GET {}", path);

        self.agent
            .get(&self.url(path))
            .call()
            .map_err(|e| self.transport_failure(path, e))
    }

    fn transport_failure(&self, path: &str, err: ureq::Error) -> BackendError {
        let error = match err {
            ureq::Error::Status(status, response) => BackendError::Status {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => BackendError::Transport(transport.to_string()),
        };
        self.exchange_log
            .record(Direction::Error, &format!("{} {}", path, error));
        error
    }

    fn decode<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        response: ureq::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        let body = response
            .into_string()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        self.exchange_log
            .record(Direction::Recv, &format!("{} {} {}", status, path, body));

        serde_json::from_str(&body).map_err(|e| {
            let error = BackendError::Decode(e.to_string());
            self.exchange_log
                .record(Direction::Error, &format!("{} {}", path, error));
            error
        })
    }
}

impl ChatBackend for HttpBackend {
    fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        let response = self.post(CHAT_PATH, request)?;
        self.decode(CHAT_PATH, response)
    }

    fn clear_session(&self, session_id: &str) -> Result<(), BackendError> {
        let body = SessionClearRequest {
            session_id: session_id.to_string(),
        };
        self.post(SESSION_CLEAR_PATH, &body).map(|_| ())
    }

    fn health(&self) -> Result<HealthSnapshot, BackendError> {
        let response = self.get(HEALTH_PATH)?;
        self.decode(HEALTH_PATH, response)
    }
}
