use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Body of a successful single-shot answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackAnswer {
    pub answer: String,
    #[serde(default)]
    pub cached: bool,
}

/// One request, one response. No retries and no history side effects;
/// any failure comes back as `AskError::Fallback`.
#[async_trait::async_trait]
pub trait FallbackCaller: Send + Sync {
    async fn request(&self, question: &str) -> Result<FallbackAnswer>;
}
