//! Upstream liveness probe tests

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::*;
use parcel_dashboard_backend::external::UpstreamService;
use parcel_dashboard_backend::services::{HealthProbe, ServiceStatus};
use serde_json::Value;

fn service(fake: FakeService) -> Arc<dyn UpstreamService> {
    Arc::new(fake)
}

fn healthy(name: &'static str) -> Arc<dyn UpstreamService> {
    service(FakeService::answering(name, Value::Null))
}

#[tokio::test]
async fn test_all_services_healthy() {
    let probe = HealthProbe::new(
        vec![
            healthy("MS3-Vision"),
            healthy("MS4-Prevision"),
            healthy("MS5-Regles"),
            healthy("MS6-Reco"),
        ],
        Duration::from_secs(1),
    );

    let report = probe.check_all().await;

    assert!(report.all_healthy);
    assert_eq!(report.services.len(), 4);
    assert!(report
        .services
        .iter()
        .all(|s| s.status == ServiceStatus::Healthy && s.status_code == Some(200)));
}

/// One hanging service out of four: only that one is unavailable
#[tokio::test]
async fn test_one_timeout_out_of_four() {
    let probe = HealthProbe::new(
        vec![
            healthy("MS3-Vision"),
            service(
                FakeService::answering("MS4-Prevision", Value::Null)
                    .with_delay(Duration::from_secs(30)),
            ),
            healthy("MS5-Regles"),
            healthy("MS6-Reco"),
        ],
        Duration::from_millis(100),
    );

    let started = Instant::now();
    let report = probe.check_all().await;
    assert!(started.elapsed() < Duration::from_secs(5));

    assert!(!report.all_healthy);
    let statuses: Vec<(&str, ServiceStatus)> =
        report.services.iter().map(|s| (s.name, s.status)).collect();
    assert_eq!(
        statuses,
        vec![
            ("MS3-Vision", ServiceStatus::Healthy),
            ("MS4-Prevision", ServiceStatus::Unavailable),
            ("MS5-Regles", ServiceStatus::Healthy),
            ("MS6-Reco", ServiceStatus::Healthy),
        ]
    );
    assert!(report.services[1].error.is_some());
}

#[tokio::test]
async fn test_mixed_statuses() {
    let probe = HealthProbe::new(
        vec![
            healthy("MS3-Vision"),
            service(FakeService::answering("MS4-Prevision", Value::Null).with_liveness_status(404)),
            service(FakeService::answering("MS5-Regles", Value::Null).with_liveness_status(503)),
            service(FakeService::failing("MS6-Reco")),
        ],
        Duration::from_secs(1),
    );

    let report = probe.check_all().await;

    assert!(!report.all_healthy);
    assert_eq!(report.services[0].status, ServiceStatus::Healthy);
    assert_eq!(report.services[1].status, ServiceStatus::Degraded);
    assert_eq!(report.services[2].status, ServiceStatus::Unavailable);
    assert_eq!(report.services[3].status, ServiceStatus::Unavailable);
}

#[tokio::test]
async fn test_report_json_shape() {
    let probe = HealthProbe::new(vec![healthy("MS3-Vision")], Duration::from_secs(1));

    let value = serde_json::to_value(probe.check_all().await).unwrap();

    assert_eq!(value["allHealthy"], Value::Bool(true));
    assert_eq!(value["services"][0]["name"], "MS3-Vision");
    assert_eq!(value["services"][0]["status"], "healthy");
    assert_eq!(value["services"][0]["statusCode"], 200);
    assert!(value["timestamp"].is_string());
}
