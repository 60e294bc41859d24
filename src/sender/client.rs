use super::request::{DEFAULT_ENDPOINT, OutboundRequest};
use crate::domain::ShipperError;
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Collector base URL; the token and collector path are appended to it.
    pub endpoint: String,
    pub token: String,
    /// Default tags merged into every event.
    pub tags: Vec<String>,
    /// Upper bound on one request/response exchange.
    pub timeout: Duration,
    pub connection_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: String::new(),
            tags: Vec::new(),
            timeout: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
            user_agent: format!("loggly-shipper/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Successful outcome of a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResponse {
    pub status: u16,
    /// Decoded response body: JSON when the collector sent JSON, `Null` when
    /// empty, otherwise the raw text.
    pub body: Value,
}

impl DispatchResponse {
    fn decode(status: u16, text: &str) -> Self {
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        };
        Self { status, body }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_response_time: Duration,
}

#[derive(Debug, Default)]
pub struct ClientStats {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    total_response_time: AtomicU64,
}

impl ClientStats {
    pub fn record_request(&self, success: bool, response_time: Duration) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_response_time
            .fetch_add(response_time.as_millis() as u64, Ordering::Relaxed);

        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> DispatchStats {
        let total_requests = self.total_requests.load(Ordering::Relaxed);
        let total_response_time = self.total_response_time.load(Ordering::Relaxed);

        let average_response_time = if total_requests > 0 {
            Duration::from_millis(total_response_time / total_requests)
        } else {
            Duration::ZERO
        };

        DispatchStats {
            total_requests,
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            average_response_time,
        }
    }
}

/// Pooled HTTP client performing exactly one POST per request it is handed.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    stats: Arc<ClientStats>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ShipperError> {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connection_timeout)
            .build()
            .map_err(|e| {
                ShipperError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            stats: Arc::new(ClientStats::default()),
        })
    }

    pub async fn send(&self, request: OutboundRequest) -> Result<DispatchResponse, ShipperError> {
        let start = Instant::now();
        let result = self.exchange(request).await;
        self.stats.record_request(result.is_ok(), start.elapsed());
        result
    }

    async fn exchange(&self, request: OutboundRequest) -> Result<DispatchResponse, ShipperError> {
        let OutboundRequest { url, headers, body } = request;

        let response = self
            .client
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The status alone decides the outcome; the body is diagnostics only.
            return Err(ShipperError::Server {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let text = response.text().await?;
        Ok(DispatchResponse::decode(status.as_u16(), &text))
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats.snapshot()
    }
}
