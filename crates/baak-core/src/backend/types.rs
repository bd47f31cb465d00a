//! Wire types for the backend's JSON contract.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    /// Empty string when no session has been established yet.
    pub session_id: String,
}

/// Reply from `POST /api/chat`. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub intent: Option<String>,
    /// Any JSON value is accepted and read by truthiness.
    #[serde(default, deserialize_with = "truthy")]
    pub has_data: Option<bool>,
}

/// Body of `POST /api/session/clear`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClearRequest {
    pub session_id: String,
}

/// Reply from `GET /api/health`.
///
/// An unhealthy backend omits most fields, and `pinecone_vectors` is null
/// when the index is unreachable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub active_sessions: Option<u64>,
    #[serde(default)]
    pub pinecone_status: Option<String>,
    #[serde(default)]
    pub pinecone_vectors: Option<u64>,
    #[serde(default)]
    pub db_status: Option<String>,
    #[serde(default)]
    pub knowledge_status: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthSnapshot {
    /// Markdown summary shown in the health bubble. Missing values print as `-`.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "**Health Check**\n\n\
             • Status: {}\n\
             • Sessions: {}\n\
             • Pinecone: {} (vectors: {})\n\
             • DB: {}",
            or_dash(self.status.as_deref()),
            or_dash(self.active_sessions),
            or_dash(self.pinecone_status.as_deref()),
            or_dash(self.pinecone_vectors),
            or_dash(self.db_status.as_deref()),
        );
        if let Some(knowledge) = &self.knowledge_status {
            summary.push_str(&format!("\n• Knowledge: {knowledge}"));
        }
        summary
    }
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn truthy<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Null => None,
        Value::Bool(b) => Some(b),
        Value::Number(n) => Some(n.as_f64().map(|f| f != 0.0).unwrap_or(true)),
        Value::String(s) => Some(!s.is_empty()),
        Value::Array(_) | Value::Object(_) => Some(true),
    }))
}
