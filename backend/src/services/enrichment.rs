//! Parcel enrichment from the upstream analytic services
//!
//! The four services are queried concurrently for one parcel. Each call is
//! bounded by its own timeout and the orchestrator waits for all of them;
//! whatever is available is merged, the rest is left null.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use shared::{EnrichedParcel, Enrichment, Parcel, UpstreamData, UpstreamHighlights};

use crate::external::{ParcelContext, UpstreamClients, UpstreamOutcome, UpstreamService};

/// Fans a parcel out to the upstream services and merges the answers
#[derive(Clone)]
pub struct EnrichmentOrchestrator {
    vision: Arc<dyn UpstreamService>,
    water: Arc<dyn UpstreamService>,
    rules: Arc<dyn UpstreamService>,
    ai: Arc<dyn UpstreamService>,
    call_timeout: Duration,
}

impl EnrichmentOrchestrator {
    pub fn new(
        vision: Arc<dyn UpstreamService>,
        water: Arc<dyn UpstreamService>,
        rules: Arc<dyn UpstreamService>,
        ai: Arc<dyn UpstreamService>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            vision,
            water,
            rules,
            ai,
            call_timeout,
        }
    }

    pub fn from_clients(clients: &UpstreamClients, call_timeout: Duration) -> Self {
        Self::new(
            clients.vision.clone(),
            clients.water.clone(),
            clients.rules.clone(),
            clients.ai.clone(),
            call_timeout,
        )
    }

    /// Enrich a parcel. Never fails: a parcel without identifier comes back
    /// unenriched.
    pub async fn enrich(&self, parcel: Parcel) -> EnrichedParcel {
        let enrichment = self.enrichment_for(&parcel).await;
        EnrichedParcel { parcel, enrichment }
    }

    /// Upstream data for a parcel, `None` when the parcel has no identifier
    pub async fn enrichment_for(&self, parcel: &Parcel) -> Option<Enrichment> {
        if !parcel.has_identifier() {
            return None;
        }

        let context = ParcelContext::derive(parcel, Utc::now());
        tracing::debug!(
            "Enriching parcel {} ({}, stress {}, tier {:?})",
            parcel.id,
            context.crop_type,
            context.stress_level,
            context.priority
        );

        let (vision, water, rules, ai) = tokio::join!(
            self.call(self.vision.as_ref(), parcel.id, &context),
            self.call(self.water.as_ref(), parcel.id, &context),
            self.call(self.rules.as_ref(), parcel.id, &context),
            self.call(self.ai.as_ref(), parcel.id, &context),
        );

        let upstream_data = UpstreamData {
            vision: vision.into_payload(),
            water_prediction: water.into_payload(),
            agro_rules: rules.into_payload(),
            ai_recommendations: ai.into_payload(),
        };

        let (highlights, errors) = UpstreamHighlights::extract(&upstream_data);
        for error in &errors {
            tracing::warn!(
                "Ignoring undecodable {} fields for parcel {}: {}",
                error.slot,
                parcel.id,
                error.message
            );
        }

        Some(Enrichment {
            upstream_data,
            highlights,
        })
    }

    async fn call(
        &self,
        service: &dyn UpstreamService,
        parcel_id: i32,
        context: &ParcelContext,
    ) -> UpstreamOutcome {
        match tokio::time::timeout(self.call_timeout, service.evaluate(parcel_id, context)).await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(
                    "[{}] no answer for parcel {} within {:?}",
                    service.name(),
                    parcel_id,
                    self.call_timeout
                );
                UpstreamOutcome::unavailable(format!("timed out after {:?}", self.call_timeout))
            }
        }
    }
}
