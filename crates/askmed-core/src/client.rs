use crate::config::Settings;
use crate::constants::endpoints::{ASK_PATH, HEALTH_PATH, HISTORY_PATH};
use crate::error::{AskError, Result};
use crate::fallback::{FallbackAnswer, FallbackCaller};
use crate::stream::{PayloadStream, SseDecoder, StreamTransport};
use futures::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP client for the answer service.
///
/// Implements both the streaming transport and the single-shot fallback,
/// plus the service's health and server-side history endpoints.
#[derive(Clone)]
pub struct AskClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    question: &'a str,
    streaming: bool,
}

/// `GET /api/health` body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub features: Vec<String>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// One record of the server's own question log.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerHistoryItem {
    pub question: String,
    #[serde(default)]
    pub answer: Option<String>,
    /// Seconds since the epoch, as recorded by the server.
    pub timestamp: f64,
}

#[derive(Debug, Deserialize)]
struct ServerHistoryResponse {
    history: Vec<ServerHistoryItem>,
}

impl AskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(settings.server.connect_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: settings.server.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Streaming URL with a cache-busting suffix.
    pub fn stream_url(&self, question: &str, cache_buster: i64) -> String {
        format!(
            "{}{}?question={}&streaming=true&_={}",
            self.base_url,
            ASK_PATH,
            urlencoding::encode(question),
            cache_buster
        )
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        let status = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<HealthStatus>()
            .await?;
        Ok(status)
    }

    pub async fn server_history(&self) -> Result<Vec<ServerHistoryItem>> {
        let url = format!("{}{}", self.base_url, HISTORY_PATH);
        let response = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<ServerHistoryResponse>()
            .await?;
        Ok(response.history)
    }

    pub async fn clear_server_history(&self) -> Result<()> {
        let url = format!("{}{}", self.base_url, HISTORY_PATH);
        self.http.delete(&url).send().await?.error_for_status()?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl StreamTransport for AskClient {
    async fn connect(&self, question: &str) -> Result<PayloadStream> {
        let url = self.stream_url(question, chrono::Utc::now().timestamp_millis());

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| AskError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AskError::transport(format!(
                "stream request failed ({status})"
            )));
        }

        let mut decoder = SseDecoder::new();
        let payloads = response
            .bytes_stream()
            .map(move |chunk| match chunk {
                Ok(bytes) => decoder.push(&bytes).into_iter().map(Ok).collect::<Vec<_>>(),
                Err(e) => vec![Err(AskError::transport(e.to_string()))],
            })
            .flat_map(futures::stream::iter);

        Ok(payloads.boxed())
    }
}

#[async_trait::async_trait]
impl FallbackCaller for AskClient {
    async fn request(&self, question: &str) -> Result<FallbackAnswer> {
        let url = format!("{}{}", self.base_url, ASK_PATH);
        let body = AskRequest {
            question,
            streaming: false,
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AskError::fallback(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AskError::fallback(e.to_string()))?;

        if !status.is_success() {
            return Err(AskError::fallback(format!(
                "server returned {status}: {text}"
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| AskError::fallback(format!("Failed to parse answer: {e}")))
    }
}
