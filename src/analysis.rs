use serde::{Deserialize, Serialize};

/// Classification returned by the analysis service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    #[serde(rename = "PRODUTIVO")]
    Productive,
    #[serde(rename = "IMPRODUTIVO")]
    Unproductive,
}

impl Category {
    /// Label as it travels on the wire.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Category::Productive => "PRODUTIVO",
            Category::Unproductive => "IMPRODUTIVO",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisResult {
    pub category: Category,
    pub reason: String,
    /// Suggested reply, ready to paste into a mail client.
    pub response: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Error body sent with non-2xx responses. `detail` is only used when it is
/// a plain string; validation errors carry a list there.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub(crate) fn detail_text(self) -> Option<String> {
        match self.detail {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}
