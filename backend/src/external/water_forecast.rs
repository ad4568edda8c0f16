//! Water stress forecasting service client (MS4)

use async_trait::async_trait;
use serde::Serialize;

use super::context::{sensor_id_for_parcel, ParcelContext};
use super::upstream::{LivenessOutcome, UpstreamHttp, UpstreamOutcome, UpstreamService};

pub const SERVICE_NAME: &str = "MS4-Prevision";

/// Forecast horizon requested for every parcel
pub const FORECAST_HORIZON_DAYS: u32 = 7;

/// Forecasting model requested for every parcel
pub const FORECAST_MODEL: &str = "ensemble";

/// Longest sensor identifier accepted in a request path
pub const MAX_SENSOR_ID_LEN: usize = 64;

/// Sensor identifiers are non-empty runs of ASCII letters, digits, `_` and
/// `-`, so they can be placed in an upstream path as a single segment.
pub fn is_valid_sensor_id(sensor_id: &str) -> bool {
    !sensor_id.is_empty()
        && sensor_id.len() <= MAX_SENSOR_ID_LEN
        && sensor_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Water forecast API client
#[derive(Clone)]
pub struct WaterForecastClient {
    http: UpstreamHttp,
}

/// Request body of `/forecasts/with-recommendations`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ForecastRequest {
    pub capteur_id: String,
    pub horizon_days: u32,
    pub model: &'static str,
}

impl ForecastRequest {
    pub fn for_parcel(parcel_id: i32) -> Self {
        Self {
            capteur_id: sensor_id_for_parcel(parcel_id),
            horizon_days: FORECAST_HORIZON_DAYS,
            model: FORECAST_MODEL,
        }
    }
}

impl WaterForecastClient {
    pub fn new(http: UpstreamHttp) -> Self {
        Self { http }
    }

    /// Fetch the multi-day forecast of the sensor mapped to a parcel
    pub async fn forecast(&self, parcel_id: i32) -> UpstreamOutcome {
        let request = ForecastRequest::for_parcel(parcel_id);
        self.http
            .post_json("/forecasts/with-recommendations", &request)
            .await
    }

    /// Fetch the raw reading history of a sensor. Callers check the
    /// identifier with [`is_valid_sensor_id`] first.
    pub async fn sensor_history(&self, sensor_id: &str, days: u32) -> UpstreamOutcome {
        self.http
            .get_json(
                &format!("/capteurs/{}/history", sensor_id),
                &[("days", days.to_string())],
            )
            .await
    }
}

#[async_trait]
impl UpstreamService for WaterForecastClient {
    fn name(&self) -> &'static str {
        SERVICE_NAME
    }

    async fn evaluate(&self, parcel_id: i32, _context: &ParcelContext) -> UpstreamOutcome {
        self.forecast(parcel_id).await
    }

    async fn liveness(&self) -> LivenessOutcome {
        self.http.liveness().await
    }
}
