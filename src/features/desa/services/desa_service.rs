use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::core::database::unique_violation;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::Actor;
use crate::features::desa::dtos::{CreateDesaDto, DesaQueryParams, UpdateDesaDto};
use crate::features::desa::models::Desa;
use crate::shared::constants::canonical_kecamatan;
use crate::shared::types::search_pattern;

pub struct DesaService {
    pool: PgPool,
}

impl DesaService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, params: &DesaQueryParams) -> Result<(Vec<Desa>, i64)> {
        let pagination = params.pagination();
        let kecamatan = params.kecamatan.as_deref().map(str::trim);
        let search = search_pattern(params.search.as_deref());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM desa
            WHERE ($1::text IS NULL OR LOWER(kecamatan) = LOWER($1))
              AND ($2::text IS NULL OR name ILIKE $2)
            "#,
        )
        .bind(kecamatan)
        .bind(search.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count desa: {:?}", e);
            AppError::Database(e)
        })?;

        let items = sqlx::query_as::<_, Desa>(
            r#"
            SELECT * FROM desa
            WHERE ($1::text IS NULL OR LOWER(kecamatan) = LOWER($1))
              AND ($2::text IS NULL OR name ILIKE $2)
            ORDER BY kecamatan, name
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(kecamatan)
        .bind(search.as_deref())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list desa: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((items, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<Desa> {
        sqlx::query_as::<_, Desa>("SELECT * FROM desa WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch desa {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(not_found)
    }

    pub async fn create(&self, actor: &Actor, dto: CreateDesaDto) -> Result<Desa> {
        let kecamatan = canonical_kecamatan(&dto.kecamatan)
            .ok_or_else(|| AppError::Validation("Kecamatan tidak dikenal".to_string()))?;
        let name = dto.name.trim();

        let desa = sqlx::query_as::<_, Desa>(
            r#"
            INSERT INTO desa (
                name, kecamatan, head_name, description, latitude, longitude, image_url,
                statistics, tourism, bumdes, products, infrastructure, investment_highlights,
                created_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(kecamatan)
        .bind(&dto.head_name)
        .bind(&dto.description)
        .bind(dto.latitude)
        .bind(dto.longitude)
        .bind(&dto.image_url)
        .bind(Json(&dto.statistics))
        .bind(Json(&dto.tourism))
        .bind(Json(&dto.bumdes))
        .bind(Json(&dto.products))
        .bind(Json(&dto.infrastructure))
        .bind(Json(&dto.investment_highlights))
        .bind(actor.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_or_database(e, name, kecamatan))?;

        tracing::info!(
            "Desa created: id={}, {} / {}, by={}",
            desa.id,
            desa.kecamatan,
            desa.name,
            actor.username
        );

        Ok(desa)
    }

    /// Edits clear the cached recommendation
    pub async fn update(&self, id: Uuid, dto: UpdateDesaDto) -> Result<Desa> {
        let kecamatan = match dto.kecamatan.as_deref() {
            Some(k) => Some(
                canonical_kecamatan(k)
                    .ok_or_else(|| AppError::Validation("Kecamatan tidak dikenal".to_string()))?,
            ),
            None => None,
        };
        let name = dto.name.as_deref().map(str::trim);

        let desa = sqlx::query_as::<_, Desa>(
            r#"
            UPDATE desa SET
                name = COALESCE($2, name),
                kecamatan = COALESCE($3, kecamatan),
                head_name = COALESCE($4, head_name),
                description = COALESCE($5, description),
                latitude = COALESCE($6, latitude),
                longitude = COALESCE($7, longitude),
                image_url = COALESCE($8, image_url),
                statistics = COALESCE($9, statistics),
                tourism = COALESCE($10, tourism),
                bumdes = COALESCE($11, bumdes),
                products = COALESCE($12, products),
                infrastructure = COALESCE($13, infrastructure),
                investment_highlights = COALESCE($14, investment_highlights),
                ai_recommendation = NULL,
                ai_generated_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(kecamatan)
        .bind(&dto.head_name)
        .bind(&dto.description)
        .bind(dto.latitude)
        .bind(dto.longitude)
        .bind(&dto.image_url)
        .bind(dto.statistics.as_ref().map(Json))
        .bind(dto.tourism.as_ref().map(Json))
        .bind(dto.bumdes.as_ref().map(Json))
        .bind(dto.products.as_ref().map(Json))
        .bind(dto.infrastructure.as_ref().map(Json))
        .bind(dto.investment_highlights.as_ref().map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            duplicate_or_database(e, name.unwrap_or_default(), kecamatan.unwrap_or_default())
        })?
        .ok_or_else(not_found)?;

        tracing::info!("Desa updated: id={}", id);
        Ok(desa)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM desa WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete desa {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .rows_affected();

        if deleted == 0 {
            return Err(not_found());
        }

        tracing::info!("Desa deleted: id={}", id);
        Ok(())
    }
}

fn duplicate_or_database(err: sqlx::Error, name: &str, kecamatan: &str) -> AppError {
    if unique_violation(&err).is_some() {
        return AppError::Conflict(format!(
            "Desa {} sudah terdaftar di Kecamatan {}",
            name, kecamatan
        ));
    }
    tracing::error!("Failed to save desa: {:?}", err);
    AppError::Database(err)
}

fn not_found() -> AppError {
    AppError::NotFound("Desa tidak ditemukan".to_string())
}
