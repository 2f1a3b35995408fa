use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::approvals::models::{RecordStatus, SubmissionKind};
use crate::features::approvals::ApprovalService;
use crate::features::auth::model::Actor;
use crate::features::investments::dtos::{CreateInvestmentDto, UpdateInvestmentDto};
use crate::features::investments::models::{Investment, InvestmentFilter};
use crate::shared::constants::canonical_kecamatan;
use crate::shared::types::{search_pattern, PaginationQuery};

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::record_status IS NULL OR status = $1)
      AND ($2::uuid IS NULL OR created_by = $2)
      AND ($3::investment_sector IS NULL OR sector = $3)
      AND ($4::text IS NULL OR LOWER(kecamatan) = LOWER($4))
      AND ($5::text IS NULL OR LOWER(desa) = LOWER($5))
      AND ($6::text IS NULL OR title ILIKE $6 OR description ILIKE $6)
"#;

pub struct InvestmentService {
    pool: PgPool,
}

impl InvestmentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &InvestmentFilter,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<Investment>, i64)> {
        let search = search_pattern(filter.search.as_deref());
        let desa = filter.desa.as_deref().map(str::trim);

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM investments {}",
            FILTER_CLAUSE
        ))
        .bind(filter.status)
        .bind(filter.created_by)
        .bind(filter.sector)
        .bind(filter.kecamatan.as_deref())
        .bind(desa)
        .bind(search.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count investments: {:?}", e);
            AppError::Database(e)
        })?;

        let items = sqlx::query_as::<_, Investment>(&format!(
            "SELECT * FROM investments {} ORDER BY created_at DESC LIMIT $7 OFFSET $8",
            FILTER_CLAUSE
        ))
        .bind(filter.status)
        .bind(filter.created_by)
        .bind(filter.sector)
        .bind(filter.kecamatan.as_deref())
        .bind(desa)
        .bind(search.as_deref())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list investments: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((items, total))
    }

    pub async fn get_approved(&self, id: Uuid) -> Result<Investment> {
        sqlx::query_as::<_, Investment>(
            "SELECT * FROM investments WHERE id = $1 AND status = 'approved'",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch investment {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(not_found)
    }

    async fn ensure_location_exists(conn: &mut PgConnection, location_id: Uuid) -> Result<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM locations WHERE id = $1)",
        )
        .bind(location_id)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check location {}: {:?}", location_id, e);
            AppError::Database(e)
        })?;

        if exists {
            Ok(())
        } else {
            Err(AppError::BadRequest(
                "Lokasi terkait tidak ditemukan".to_string(),
            ))
        }
    }

    pub async fn create(&self, actor: &Actor, dto: CreateInvestmentDto) -> Result<Investment> {
        let kecamatan = canonical_kecamatan(&dto.kecamatan)
            .ok_or_else(|| AppError::Validation("Kecamatan tidak dikenal".to_string()))?;
        let status = RecordStatus::initial_for(actor.role);
        let approved_by = (status == RecordStatus::Approved).then_some(actor.user_id);

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        if let Some(location_id) = dto.location_id {
            Self::ensure_location_exists(&mut *tx, location_id).await?;
        }

        let investment = sqlx::query_as::<_, Investment>(
            r#"
            INSERT INTO investments (
                title, sector, kecamatan, desa, description, estimated_value,
                location_id, latitude, longitude, contact, image_url,
                status, created_by, approved_by, approved_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6,
                $7, $8, $9, $10, $11,
                $12, $13, $14, CASE WHEN $14::uuid IS NULL THEN NULL ELSE NOW() END
            )
            RETURNING *
            "#,
        )
        .bind(dto.title.trim())
        .bind(dto.sector)
        .bind(kecamatan)
        .bind(dto.desa.trim())
        .bind(&dto.description)
        .bind(dto.estimated_value)
        .bind(dto.location_id)
        .bind(dto.latitude)
        .bind(dto.longitude)
        .bind(&dto.contact)
        .bind(&dto.image_url)
        .bind(status)
        .bind(actor.user_id)
        .bind(approved_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert investment: {:?}", e);
            AppError::Database(e)
        })?;

        if status == RecordStatus::Pending {
            let snapshot = serde_json::to_value(&dto).map_err(|e| {
                AppError::Internal(format!("Failed to snapshot investment: {}", e))
            })?;
            ApprovalService::enqueue(
                &mut *tx,
                SubmissionKind::Investment,
                investment.id,
                actor.user_id,
                snapshot,
            )
            .await?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit investment: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Investment created: id={}, by={}, status={}",
            investment.id,
            actor.username,
            investment.status
        );

        Ok(investment)
    }

    pub async fn update(&self, id: Uuid, dto: UpdateInvestmentDto) -> Result<Investment> {
        let kecamatan = match dto.kecamatan.as_deref() {
            Some(k) => Some(
                canonical_kecamatan(k)
                    .ok_or_else(|| AppError::Validation("Kecamatan tidak dikenal".to_string()))?,
            ),
            None => None,
        };

        let mut conn = self.pool.acquire().await.map_err(|e| {
            tracing::error!("Failed to acquire connection: {:?}", e);
            AppError::Database(e)
        })?;

        if let Some(location_id) = dto.location_id {
            Self::ensure_location_exists(&mut *conn, location_id).await?;
        }

        let investment = sqlx::query_as::<_, Investment>(
            r#"
            UPDATE investments SET
                title = COALESCE($2, title),
                sector = COALESCE($3, sector),
                kecamatan = COALESCE($4, kecamatan),
                desa = COALESCE($5, desa),
                description = COALESCE($6, description),
                estimated_value = COALESCE($7, estimated_value),
                location_id = COALESCE($8, location_id),
                latitude = COALESCE($9, latitude),
                longitude = COALESCE($10, longitude),
                contact = COALESCE($11, contact),
                image_url = COALESCE($12, image_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.title.as_deref().map(str::trim))
        .bind(dto.sector)
        .bind(kecamatan)
        .bind(dto.desa.as_deref().map(str::trim))
        .bind(&dto.description)
        .bind(dto.estimated_value)
        .bind(dto.location_id)
        .bind(dto.latitude)
        .bind(dto.longitude)
        .bind(&dto.contact)
        .bind(&dto.image_url)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update investment {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(not_found)?;

        tracing::info!("Investment updated: id={}", id);
        Ok(investment)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        ApprovalService::delete_for_target(&mut *tx, SubmissionKind::Investment, id).await?;

        let deleted = sqlx::query("DELETE FROM investments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete investment {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .rows_affected();

        if deleted == 0 {
            return Err(not_found());
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit investment delete: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Investment deleted: id={}", id);
        Ok(())
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Peluang investasi tidak ditemukan".to_string())
}
