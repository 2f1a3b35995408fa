use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::RecommendationEngine;
use crate::core::error::{AppError, Result};
use crate::features::access::Action;
use crate::features::approvals::models::RecordStatus;
use crate::features::auth::model::Actor;
use crate::features::locations::models::LocationType;
use crate::features::recommendations::dtos::RecommendationResponseDto;
use crate::features::recommendations::models::{
    AiRecommendation, AnalysisRequest, RecommendationTarget,
};

/// A target row as the prompt sees it, plus its cache columns
struct TargetRow {
    request: AnalysisRequest,
    cached: Option<serde_json::Value>,
    generated_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct LocationRow {
    item: serde_json::Value,
    status: RecordStatus,
    location_type: LocationType,
    ai_recommendation: Option<serde_json::Value>,
    ai_generated_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct DesaRow {
    item: serde_json::Value,
    ai_recommendation: Option<serde_json::Value>,
    ai_generated_at: Option<DateTime<Utc>>,
}

/// Read-through cache of AI recommendations stored on the target row
pub struct RecommendationService {
    pool: PgPool,
    engine: Arc<RecommendationEngine>,
}

impl RecommendationService {
    pub fn new(pool: PgPool, engine: Arc<RecommendationEngine>) -> Self {
        Self { pool, engine }
    }

    async fn load(&self, target: RecommendationTarget, id: Uuid) -> Result<TargetRow> {
        match target {
            RecommendationTarget::Location => {
                let row = sqlx::query_as::<_, LocationRow>(
                    r#"
                    SELECT to_jsonb(l) - 'ai_recommendation' - 'ai_generated_at' AS item,
                           l.status, l.location_type, l.ai_recommendation, l.ai_generated_at
                    FROM locations l
                    WHERE l.id = $1
                    "#,
                )
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to load location {}: {:?}", id, e);
                    AppError::Database(e)
                })?
                .filter(|row| row.status == RecordStatus::Approved)
                .ok_or_else(|| {
                    AppError::NotFound(
                        "Lokasi tidak ditemukan atau belum disetujui".to_string(),
                    )
                })?;

                Ok(TargetRow {
                    request: AnalysisRequest::Location {
                        item: row.item,
                        type_label: row.location_type.label().to_string(),
                    },
                    cached: row.ai_recommendation,
                    generated_at: row.ai_generated_at,
                })
            }
            RecommendationTarget::Desa => {
                let row = sqlx::query_as::<_, DesaRow>(
                    r#"
                    SELECT to_jsonb(d) - 'ai_recommendation' - 'ai_generated_at' AS item,
                           d.ai_recommendation, d.ai_generated_at
                    FROM desa d
                    WHERE d.id = $1
                    "#,
                )
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to load desa {}: {:?}", id, e);
                    AppError::Database(e)
                })?
                .ok_or_else(|| AppError::NotFound("Desa tidak ditemukan".to_string()))?;

                Ok(TargetRow {
                    request: AnalysisRequest::Desa { item: row.item },
                    cached: row.ai_recommendation,
                    generated_at: row.ai_generated_at,
                })
            }
        }
    }

    fn decode_cached(value: Option<serde_json::Value>, id: Uuid) -> Option<AiRecommendation> {
        let value = value?;
        match serde_json::from_value::<AiRecommendation>(value) {
            Ok(rec) => Some(rec),
            Err(e) => {
                tracing::warn!("Ignoring unreadable cached recommendation on {}: {}", id, e);
                None
            }
        }
    }

    /// Cached recommendation, if any
    pub async fn get_cached(
        &self,
        target: RecommendationTarget,
        id: Uuid,
    ) -> Result<Option<RecommendationResponseDto>> {
        let row = self.load(target, id).await?;
        Ok(Self::decode_cached(row.cached, id)
            .map(|rec| RecommendationResponseDto::new(target, id, rec, row.generated_at, true)))
    }

    /// Return the cached recommendation unless `force`, otherwise ask the model.
    /// Successful results are stored; fallbacks are returned without storing.
    pub async fn generate(
        &self,
        target: RecommendationTarget,
        id: Uuid,
        actor: &Actor,
        force: bool,
    ) -> Result<RecommendationResponseDto> {
        actor.authorize(Action::GenerateRecommendation)?;
        if force {
            actor.authorize(Action::ForceRegenerateRecommendation)?;
        }

        let row = self.load(target, id).await?;
        if !force {
            if let Some(rec) = Self::decode_cached(row.cached, id) {
                return Ok(RecommendationResponseDto::new(
                    target,
                    id,
                    rec,
                    row.generated_at,
                    true,
                ));
            }
        }

        let recommendation = self.engine.narrate(&row.request).await;
        if !recommendation.success {
            return Ok(RecommendationResponseDto::new(
                target,
                id,
                recommendation,
                None,
                false,
            ));
        }

        let stored = serde_json::to_value(&recommendation)
            .map_err(|e| AppError::Internal(format!("Failed to encode recommendation: {}", e)))?;

        let generated_at = sqlx::query_scalar::<_, DateTime<Utc>>(&format!(
            r#"
            UPDATE {}
            SET ai_recommendation = $2, ai_generated_at = NOW()
            WHERE id = $1
            RETURNING ai_generated_at
            "#,
            target.table()
        ))
        .bind(id)
        .bind(stored)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to cache recommendation for {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Data tidak ditemukan".to_string()))?;

        tracing::info!(
            "Recommendation cached: {} {} (score {}) by {}",
            target.table(),
            id,
            recommendation.feasibility_score,
            actor.username
        );

        Ok(RecommendationResponseDto::new(
            target,
            id,
            recommendation,
            Some(generated_at),
            false,
        ))
    }

    /// Clear the cached recommendation so the next request regenerates it
    pub async fn invalidate(
        &self,
        target: RecommendationTarget,
        id: Uuid,
        actor: &Actor,
    ) -> Result<()> {
        actor.authorize(Action::InvalidateRecommendation)?;

        let updated = sqlx::query(&format!(
            "UPDATE {} SET ai_recommendation = NULL, ai_generated_at = NULL WHERE id = $1",
            target.table()
        ))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to invalidate recommendation for {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .rows_affected();

        if updated == 0 {
            return Err(AppError::NotFound("Data tidak ditemukan".to_string()));
        }

        tracing::info!(
            "Recommendation invalidated: {} {} by {}",
            target.table(),
            id,
            actor.username
        );
        Ok(())
    }
}
