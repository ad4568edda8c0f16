//! PostgreSQL/PostGIS parcel store

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use std::time::Duration;

use shared::{
    AlertAggregate, AlertListing, DiseaseAlert, IrrigationRecommendation, ModelError, Parcel,
    ParcelAggregate, ParcelRef, ParcelSummary, RecommendationAggregate, RecommendationListing,
};

use super::ParcelStore;
use crate::config::DatabaseConfig;
use crate::error::AppResult;

const PARCEL_COLUMNS: &str = r#"
    p.id, p.nom, p.culture, p.superficie_ha, p.date_semis, p.stress_hydrique,
    p.niveau_stress, p.besoin_eau_mm, p.derniere_irrigation,
    ST_AsGeoJSON(p.geometry)::json AS geometry
"#;

const RECOMMENDATION_COLUMNS: &str = r#"
    r.id, r.parcelle_id, r.volume_mm, r.duree_minutes, r.heure_optimale, r.priorite,
    r.date_recommandation, r.appliquee, r.date_application
"#;

const ALERT_COLUMNS: &str = r#"
    a.id, a.parcelle_id, a.type_maladie, a.severite, a.confiance, a.date_detection,
    a.description
"#;

/// Owned handle on the PostGIS database.
///
/// Connections are acquired from the pool per query and returned right after.
#[derive(Clone)]
pub struct PgParcelStore {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct ParcelRow {
    id: i32,
    nom: String,
    culture: String,
    superficie_ha: Decimal,
    date_semis: Option<NaiveDate>,
    stress_hydrique: String,
    niveau_stress: Decimal,
    besoin_eau_mm: Decimal,
    derniere_irrigation: Option<DateTime<Utc>>,
    geometry: Option<serde_json::Value>,
}

#[derive(Debug, FromRow)]
struct ParcelSummaryRow {
    #[sqlx(flatten)]
    parcel: ParcelRow,
    nb_alertes: i64,
    nb_recommandations: i64,
}

#[derive(Debug, FromRow)]
struct AlertRow {
    id: i32,
    parcelle_id: i32,
    type_maladie: String,
    severite: String,
    confiance: Decimal,
    date_detection: DateTime<Utc>,
    description: Option<String>,
}

#[derive(Debug, FromRow)]
struct AlertListingRow {
    #[sqlx(flatten)]
    alert: AlertRow,
    parcelle_nom: String,
    parcelle_culture: String,
}

#[derive(Debug, FromRow)]
struct RecommendationRow {
    id: i32,
    parcelle_id: i32,
    volume_mm: Decimal,
    duree_minutes: i32,
    heure_optimale: Option<NaiveTime>,
    priorite: String,
    date_recommandation: DateTime<Utc>,
    appliquee: bool,
    date_application: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow)]
struct RecommendationListingRow {
    #[sqlx(flatten)]
    recommendation: RecommendationRow,
    parcelle_nom: String,
    parcelle_culture: String,
    parcelle_superficie_ha: Decimal,
}

impl TryFrom<ParcelRow> for Parcel {
    type Error = ModelError;

    fn try_from(row: ParcelRow) -> Result<Self, Self::Error> {
        Ok(Parcel {
            id: row.id,
            name: row.nom,
            crop_type: row.culture,
            area_ha: row.superficie_ha,
            sowing_date: row.date_semis,
            stress_level: row.niveau_stress,
            stress_category: row.stress_hydrique.parse()?,
            water_need_mm: row.besoin_eau_mm,
            last_irrigation: row.derniere_irrigation,
            geometry: row.geometry.unwrap_or(serde_json::Value::Null),
        })
    }
}

impl TryFrom<AlertRow> for DiseaseAlert {
    type Error = ModelError;

    fn try_from(row: AlertRow) -> Result<Self, Self::Error> {
        Ok(DiseaseAlert {
            id: row.id,
            parcel_id: row.parcelle_id,
            disease_type: row.type_maladie,
            severity: row.severite.parse()?,
            confidence: row.confiance,
            detected_at: row.date_detection,
            description: row.description,
        })
    }
}

impl TryFrom<RecommendationRow> for IrrigationRecommendation {
    type Error = ModelError;

    fn try_from(row: RecommendationRow) -> Result<Self, Self::Error> {
        Ok(IrrigationRecommendation {
            id: row.id,
            parcel_id: row.parcelle_id,
            volume_mm: row.volume_mm,
            duration_minutes: row.duree_minutes,
            optimal_time: row.heure_optimale,
            priority: row.priorite.parse()?,
            recommended_at: row.date_recommandation,
            applied: row.appliquee,
            applied_at: row.date_application,
        })
    }
}

impl PgParcelStore {
    /// Open a connection pool
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;

        Ok(Self { db })
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.db).await
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.db.close().await;
    }
}

#[async_trait]
impl ParcelStore for PgParcelStore {
    async fn parcel_summaries(&self) -> AppResult<Vec<ParcelSummary>> {
        let rows = sqlx::query_as::<_, ParcelSummaryRow>(&format!(
            r#"
            SELECT {PARCEL_COLUMNS},
                   COALESCE(a.nb_alertes, 0) AS nb_alertes,
                   COALESCE(r.nb_reco, 0) AS nb_recommandations
            FROM parcelles p
            LEFT JOIN (
                SELECT parcelle_id, COUNT(*) AS nb_alertes
                FROM alertes_maladies
                GROUP BY parcelle_id
            ) a ON a.parcelle_id = p.id
            LEFT JOIN (
                SELECT parcelle_id, COUNT(*) AS nb_reco
                FROM recommandations_irrigation
                WHERE appliquee = false
                GROUP BY parcelle_id
            ) r ON r.parcelle_id = p.id
            ORDER BY p.id ASC
            "#
        ))
        .fetch_all(&self.db)
        .await?;

        let summaries = rows
            .into_iter()
            .map(|row| -> Result<ParcelSummary, ModelError> {
                Ok(ParcelSummary {
                    parcel: row.parcel.try_into()?,
                    alert_count: row.nb_alertes,
                    pending_recommendation_count: row.nb_recommandations,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(summaries)
    }

    async fn find_parcel(&self, parcel_id: i32) -> AppResult<Option<Parcel>> {
        let row = sqlx::query_as::<_, ParcelRow>(&format!(
            "SELECT {PARCEL_COLUMNS} FROM parcelles p WHERE p.id = $1"
        ))
        .bind(parcel_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Parcel::try_from).transpose()?)
    }

    async fn alerts_for_parcel(&self, parcel_id: i32) -> AppResult<Vec<DiseaseAlert>> {
        let rows = sqlx::query_as::<_, AlertRow>(&format!(
            r#"
            SELECT {ALERT_COLUMNS}
            FROM alertes_maladies a
            WHERE a.parcelle_id = $1
            ORDER BY a.date_detection DESC
            "#
        ))
        .bind(parcel_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(DiseaseAlert::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn pending_recommendations_for_parcel(
        &self,
        parcel_id: i32,
    ) -> AppResult<Vec<IrrigationRecommendation>> {
        let rows = sqlx::query_as::<_, RecommendationRow>(&format!(
            r#"
            SELECT {RECOMMENDATION_COLUMNS}
            FROM recommandations_irrigation r
            WHERE r.parcelle_id = $1 AND r.appliquee = false
            "#
        ))
        .bind(parcel_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(IrrigationRecommendation::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn list_alerts(&self) -> AppResult<Vec<AlertListing>> {
        let rows = sqlx::query_as::<_, AlertListingRow>(&format!(
            r#"
            SELECT {ALERT_COLUMNS},
                   p.nom AS parcelle_nom,
                   p.culture AS parcelle_culture
            FROM alertes_maladies a
            JOIN parcelles p ON a.parcelle_id = p.id
            ORDER BY a.date_detection DESC
            "#
        ))
        .fetch_all(&self.db)
        .await?;

        let listings = rows
            .into_iter()
            .map(|row| -> Result<AlertListing, ModelError> {
                let parcel = ParcelRef {
                    id: row.alert.parcelle_id,
                    name: row.parcelle_nom,
                    crop_type: row.parcelle_culture,
                    area_ha: None,
                };
                Ok(AlertListing {
                    alert: row.alert.try_into()?,
                    parcel,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(listings)
    }

    async fn list_pending_recommendations(&self) -> AppResult<Vec<RecommendationListing>> {
        let rows = sqlx::query_as::<_, RecommendationListingRow>(&format!(
            r#"
            SELECT {RECOMMENDATION_COLUMNS},
                   p.nom AS parcelle_nom,
                   p.culture AS parcelle_culture,
                   p.superficie_ha AS parcelle_superficie_ha
            FROM recommandations_irrigation r
            JOIN parcelles p ON r.parcelle_id = p.id
            WHERE r.appliquee = false
            "#
        ))
        .fetch_all(&self.db)
        .await?;

        let listings = rows
            .into_iter()
            .map(|row| -> Result<RecommendationListing, ModelError> {
                let parcel = ParcelRef {
                    id: row.recommendation.parcelle_id,
                    name: row.parcelle_nom,
                    crop_type: row.parcelle_culture,
                    area_ha: Some(row.parcelle_superficie_ha),
                };
                Ok(RecommendationListing {
                    recommendation: row.recommendation.try_into()?,
                    parcel,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(listings)
    }

    async fn mark_recommendation_applied(
        &self,
        recommendation_id: i32,
        at: DateTime<Utc>,
    ) -> AppResult<Option<IrrigationRecommendation>> {
        let row = sqlx::query_as::<_, RecommendationRow>(&format!(
            r#"
            UPDATE recommandations_irrigation AS r
            SET appliquee = true,
                date_application = COALESCE(r.date_application, $2)
            WHERE r.id = $1
            RETURNING {RECOMMENDATION_COLUMNS}
            "#
        ))
        .bind(recommendation_id)
        .bind(at)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(IrrigationRecommendation::try_from).transpose()?)
    }

    async fn parcel_aggregate(&self) -> AppResult<ParcelAggregate> {
        let row = sqlx::query_as::<_, (i64, Decimal, i64, i64, i64, Option<Decimal>, Decimal)>(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(superficie_ha), 0),
                COUNT(*) FILTER (WHERE stress_hydrique = 'CRITIQUE'),
                COUNT(*) FILTER (WHERE stress_hydrique = 'MODERE'),
                COUNT(*) FILTER (WHERE stress_hydrique = 'OK'),
                AVG(niveau_stress),
                COALESCE(SUM(besoin_eau_mm * superficie_ha), 0)
            FROM parcelles
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(ParcelAggregate {
            parcel_count: row.0,
            total_area_ha: row.1,
            critical_count: row.2,
            moderate_count: row.3,
            ok_count: row.4,
            mean_stress: row.5,
            water_demand: row.6,
        })
    }

    async fn alert_aggregate(&self) -> AppResult<AlertAggregate> {
        let row = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE severite = 'ELEVEE')
            FROM alertes_maladies
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(AlertAggregate {
            alert_count: row.0,
            high_severity_count: row.1,
        })
    }

    async fn recommendation_aggregate(&self) -> AppResult<RecommendationAggregate> {
        let row = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE priorite = 'URGENTE')
            FROM recommandations_irrigation
            WHERE appliquee = false
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(RecommendationAggregate {
            pending_count: row.0,
            urgent_count: row.1,
        })
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db).await.is_ok()
    }
}
