//! Plant vision service client (MS3)
//!
//! The vision service analyses uploaded leaf images and has no parcel
//! endpoint. Until images are linked to parcels, evaluation answers a fixed
//! "no data" payload without calling the service. Liveness is real.

use async_trait::async_trait;
use serde_json::json;

use super::context::ParcelContext;
use super::upstream::{LivenessOutcome, UpstreamHttp, UpstreamOutcome, UpstreamService};

pub const SERVICE_NAME: &str = "MS3-Vision";

/// Vision API client
#[derive(Clone)]
pub struct VisionClient {
    http: UpstreamHttp,
}

impl VisionClient {
    pub fn new(http: UpstreamHttp) -> Self {
        Self { http }
    }
}

/// Payload returned for every parcel until image linkage exists
pub fn no_data_response(parcel_id: i32) -> serde_json::Value {
    json!({
        "status": "no_data",
        "message": "Vision analysis requires image upload",
        "parcelId": parcel_id,
    })
}

#[async_trait]
impl UpstreamService for VisionClient {
    fn name(&self) -> &'static str {
        SERVICE_NAME
    }

    async fn evaluate(&self, parcel_id: i32, _context: &ParcelContext) -> UpstreamOutcome {
        tracing::debug!(
            "[{}] vision analysis requested for parcel {} (no image linkage)",
            SERVICE_NAME,
            parcel_id
        );
        UpstreamOutcome::ok(no_data_response(parcel_id))
    }

    async fn liveness(&self) -> LivenessOutcome {
        self.http.liveness().await
    }
}
