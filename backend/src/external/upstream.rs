//! Common plumbing for the upstream analytic services
//!
//! Every upstream call settles into an [`UpstreamOutcome`]: a response below
//! 500 is data (client errors included), while a 5xx status, a timeout, a
//! connection failure or an unreadable body is `Unavailable`. Nothing here
//! returns an error to the caller.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::context::ParcelContext;

/// Result of one upstream call
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamOutcome {
    /// The service answered with a status below 500
    Available { status: u16, body: Value },
    /// Timeout, connection failure, 5xx or unreadable body
    Unavailable { reason: String },
}

impl UpstreamOutcome {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        UpstreamOutcome::Unavailable {
            reason: reason.into(),
        }
    }

    /// Successful outcome with a 200 status
    pub fn ok(body: Value) -> Self {
        UpstreamOutcome::Available { status: 200, body }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, UpstreamOutcome::Available { .. })
    }

    /// Payload of an available outcome, `None` when unavailable
    pub fn into_payload(self) -> Option<Value> {
        match self {
            UpstreamOutcome::Available { body, .. } => Some(body),
            UpstreamOutcome::Unavailable { .. } => None,
        }
    }
}

/// Result of a liveness check
#[derive(Debug, Clone, PartialEq)]
pub enum LivenessOutcome {
    Responded { status: u16, body: Option<Value> },
    Unreachable { reason: String },
}

/// One upstream analytic service
#[async_trait]
pub trait UpstreamService: Send + Sync {
    /// Service name used in logs and health reports
    fn name(&self) -> &'static str;

    /// Run the service's evaluation for a parcel
    async fn evaluate(&self, parcel_id: i32, context: &ParcelContext) -> UpstreamOutcome;

    /// Call the service's liveness endpoint
    async fn liveness(&self) -> LivenessOutcome;
}

/// Classify a received response
pub fn classify_response(status: u16, body: Result<Value, String>) -> UpstreamOutcome {
    if status >= 500 {
        return UpstreamOutcome::unavailable(format!("upstream returned status {}", status));
    }
    match body {
        Ok(body) => UpstreamOutcome::Available { status, body },
        Err(e) => UpstreamOutcome::unavailable(format!("unreadable response body: {}", e)),
    }
}

/// HTTP access to one upstream service
#[derive(Clone)]
pub struct UpstreamHttp {
    service: &'static str,
    base_url: String,
    client: Client,
    request_timeout: Duration,
    health_timeout: Duration,
}

impl UpstreamHttp {
    pub fn new(
        service: &'static str,
        base_url: impl Into<String>,
        request_timeout: Duration,
        health_timeout: Duration,
    ) -> Self {
        Self {
            service,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
            request_timeout,
            health_timeout,
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body
    pub async fn post_json<B>(&self, path: &str, body: &B) -> UpstreamOutcome
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path);
        let request = self.client.post(&url).json(body);
        self.settle(&url, request).await
    }

    /// GET with query parameters
    pub async fn get_json(&self, path: &str, query: &[(&str, String)]) -> UpstreamOutcome {
        let url = self.url(path);
        let request = self.client.get(&url).query(query);
        self.settle(&url, request).await
    }

    /// GET `/health` with the short liveness timeout
    pub async fn liveness(&self) -> LivenessOutcome {
        let url = self.url("/health");
        match self
            .client
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.json::<Value>().await.ok();
                LivenessOutcome::Responded { status, body }
            }
            Err(e) => LivenessOutcome::Unreachable {
                reason: describe_error(&e),
            },
        }
    }

    async fn settle(&self, url: &str, request: RequestBuilder) -> UpstreamOutcome {
        let outcome = match request.timeout(self.request_timeout).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.json::<Value>().await.map_err(|e| e.to_string());
                classify_response(status, body)
            }
            Err(e) => UpstreamOutcome::unavailable(describe_error(&e)),
        };

        match &outcome {
            UpstreamOutcome::Available { status, .. } => {
                tracing::debug!("[{}] {} answered {}", self.service, url, status);
            }
            UpstreamOutcome::Unavailable { reason } => {
                tracing::warn!("[{}] {} unavailable: {}", self.service, url, reason);
            }
        }

        outcome
    }
}

fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}
