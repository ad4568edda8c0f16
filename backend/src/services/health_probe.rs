//! Aggregated liveness of the upstream services

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::external::{LivenessOutcome, UpstreamService};

/// Liveness verdict for one service
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
    Unavailable,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ServiceHealth {
    pub name: &'static str,
    pub status: ServiceStatus,
    #[serde(rename = "statusCode", skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    /// 200 is healthy, any other status below 500 is degraded, the rest is
    /// unavailable
    pub fn from_liveness(name: &'static str, outcome: LivenessOutcome) -> Self {
        match outcome {
            LivenessOutcome::Responded { status, body } => {
                let status_kind = match status {
                    200 => ServiceStatus::Healthy,
                    s if s < 500 => ServiceStatus::Degraded,
                    _ => ServiceStatus::Unavailable,
                };
                Self {
                    name,
                    status: status_kind,
                    status_code: Some(status),
                    data: body,
                    error: None,
                }
            }
            LivenessOutcome::Unreachable { reason } => Self::unavailable(name, reason),
        }
    }

    fn unavailable(name: &'static str, reason: String) -> Self {
        Self {
            name,
            status: ServiceStatus::Unavailable,
            status_code: None,
            data: None,
            error: Some(reason),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub timestamp: DateTime<Utc>,
    pub services: Vec<ServiceHealth>,
    #[serde(rename = "allHealthy")]
    pub all_healthy: bool,
}

/// Probes every upstream service concurrently
#[derive(Clone)]
pub struct HealthProbe {
    services: Vec<Arc<dyn UpstreamService>>,
    probe_timeout: Duration,
}

impl HealthProbe {
    pub fn new(services: Vec<Arc<dyn UpstreamService>>, probe_timeout: Duration) -> Self {
        Self {
            services,
            probe_timeout,
        }
    }

    pub async fn check_all(&self) -> HealthReport {
        let probes = self.services.iter().map(|service| self.probe(service.as_ref()));
        let services = join_all(probes).await;

        let all_healthy = services
            .iter()
            .all(|s| s.status == ServiceStatus::Healthy);

        if !all_healthy {
            tracing::warn!(
                "Upstream services not healthy: {}",
                services
                    .iter()
                    .filter(|s| s.status != ServiceStatus::Healthy)
                    .map(|s| s.name)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        HealthReport {
            timestamp: Utc::now(),
            services,
            all_healthy,
        }
    }

    async fn probe(&self, service: &dyn UpstreamService) -> ServiceHealth {
        match tokio::time::timeout(self.probe_timeout, service.liveness()).await {
            Ok(outcome) => ServiceHealth::from_liveness(service.name(), outcome),
            Err(_) => ServiceHealth::unavailable(
                service.name(),
                format!("timed out after {:?}", self.probe_timeout),
            ),
        }
    }
}
