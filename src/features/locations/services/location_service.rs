use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::approvals::models::{RecordStatus, SubmissionKind};
use crate::features::approvals::ApprovalService;
use crate::features::auth::model::Actor;
use crate::features::locations::dtos::{CreateLocationDto, UpdateLocationDto};
use crate::features::locations::models::{Location, LocationFilter};
use crate::shared::constants::canonical_kecamatan;
use crate::shared::types::{search_pattern, PaginationQuery};

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::record_status IS NULL OR status = $1)
      AND ($2::uuid IS NULL OR created_by = $2)
      AND ($3::location_type IS NULL OR location_type = $3)
      AND ($4::text IS NULL OR LOWER(kecamatan) = LOWER($4))
      AND ($5::text IS NULL OR LOWER(desa) = LOWER($5))
      AND ($6::text IS NULL OR name ILIKE $6 OR description ILIKE $6)
"#;

pub struct LocationService {
    pool: PgPool,
}

impl LocationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &LocationFilter,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<Location>, i64)> {
        let search = search_pattern(filter.search.as_deref());
        let desa = filter.desa.as_deref().map(str::trim);

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM locations {}",
            FILTER_CLAUSE
        ))
        .bind(filter.status)
        .bind(filter.created_by)
        .bind(filter.location_type)
        .bind(filter.kecamatan.as_deref())
        .bind(desa)
        .bind(search.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count locations: {:?}", e);
            AppError::Database(e)
        })?;

        let items = sqlx::query_as::<_, Location>(&format!(
            "SELECT * FROM locations {} ORDER BY created_at DESC LIMIT $7 OFFSET $8",
            FILTER_CLAUSE
        ))
        .bind(filter.status)
        .bind(filter.created_by)
        .bind(filter.location_type)
        .bind(filter.kecamatan.as_deref())
        .bind(desa)
        .bind(search.as_deref())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list locations: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((items, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>> {
        sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch location {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    /// Approved location, or 404 for anything else
    pub async fn get_approved(&self, id: Uuid) -> Result<Location> {
        self.find_by_id(id)
            .await?
            .filter(|l| l.status == RecordStatus::Approved)
            .ok_or_else(not_found)
    }

    /// Create a location. Staff submissions are approved on the spot, everyone
    /// else's wait in the review queue.
    pub async fn create(&self, actor: &Actor, dto: CreateLocationDto) -> Result<Location> {
        let kecamatan = canonical_kecamatan(&dto.kecamatan)
            .ok_or_else(|| AppError::Validation("Kecamatan tidak dikenal".to_string()))?;
        let status = RecordStatus::initial_for(actor.role);
        let approved_by = (status == RecordStatus::Approved).then_some(actor.user_id);

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let location = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (
                name, location_type, kecamatan, desa, description,
                latitude, longitude, address, image_url, contact,
                status, created_by, approved_by, approved_at
            ) VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, $9, $10,
                $11, $12, $13, CASE WHEN $13::uuid IS NULL THEN NULL ELSE NOW() END
            )
            RETURNING *
            "#,
        )
        .bind(dto.name.trim())
        .bind(dto.location_type)
        .bind(kecamatan)
        .bind(dto.desa.trim())
        .bind(&dto.description)
        .bind(dto.latitude)
        .bind(dto.longitude)
        .bind(&dto.address)
        .bind(&dto.image_url)
        .bind(&dto.contact)
        .bind(status)
        .bind(actor.user_id)
        .bind(approved_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert location: {:?}", e);
            AppError::Database(e)
        })?;

        if status == RecordStatus::Pending {
            let snapshot = serde_json::to_value(&dto)
                .map_err(|e| AppError::Internal(format!("Failed to snapshot location: {}", e)))?;
            ApprovalService::enqueue(
                &mut *tx,
                SubmissionKind::Location,
                location.id,
                actor.user_id,
                snapshot,
            )
            .await?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit location: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Location created: id={}, by={}, status={}",
            location.id,
            actor.username,
            location.status
        );

        Ok(location)
    }

    /// Staff edit. Changing the content drops any cached recommendation.
    pub async fn update(&self, id: Uuid, dto: UpdateLocationDto) -> Result<Location> {
        let kecamatan = match dto.kecamatan.as_deref() {
            Some(k) => Some(
                canonical_kecamatan(k)
                    .ok_or_else(|| AppError::Validation("Kecamatan tidak dikenal".to_string()))?,
            ),
            None => None,
        };

        let location = sqlx::query_as::<_, Location>(
            r#"
            UPDATE locations SET
                name = COALESCE($2, name),
                location_type = COALESCE($3, location_type),
                kecamatan = COALESCE($4, kecamatan),
                desa = COALESCE($5, desa),
                description = COALESCE($6, description),
                latitude = COALESCE($7, latitude),
                longitude = COALESCE($8, longitude),
                address = COALESCE($9, address),
                image_url = COALESCE($10, image_url),
                contact = COALESCE($11, contact),
                ai_recommendation = NULL,
                ai_generated_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.location_type)
        .bind(kecamatan)
        .bind(dto.desa.as_deref().map(str::trim))
        .bind(&dto.description)
        .bind(dto.latitude)
        .bind(dto.longitude)
        .bind(&dto.address)
        .bind(&dto.image_url)
        .bind(&dto.contact)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update location {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(not_found)?;

        tracing::info!("Location updated: id={}", id);
        Ok(location)
    }

    /// Delete a location together with its queue entries
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        ApprovalService::delete_for_target(&mut *tx, SubmissionKind::Location, id).await?;

        let deleted = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete location {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .rows_affected();

        if deleted == 0 {
            return Err(not_found());
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit location delete: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Location deleted: id={}", id);
        Ok(())
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Lokasi tidak ditemukan".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::access::UserRole;
    use crate::shared::test_helpers::{count_where, insert_actor, location_draft};

    #[sqlx::test(migrations = "./migrations")]
    async fn test_staff_submission_is_approved_without_queue_entry(pool: PgPool) {
        let admin = insert_actor(&pool, UserRole::Admin).await;
        let service = LocationService::new(pool.clone());

        let location = service
            .create(&admin, location_draft("Pantai Srau"))
            .await
            .unwrap();

        assert_eq!(location.status, RecordStatus::Approved);
        assert_eq!(location.approved_by, Some(admin.user_id));
        assert!(location.approved_at.is_some());
        assert_eq!(location.kecamatan, "Pringkuku");
        assert_eq!(count_where(&pool, "approvals", "target_id", location.id).await, 0);
        assert!(service.get_approved(location.id).await.is_ok());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_user_submission_waits_in_queue(pool: PgPool) {
        let user = insert_actor(&pool, UserRole::User).await;
        let service = LocationService::new(pool.clone());

        let location = service
            .create(&user, location_draft("Goa Gong"))
            .await
            .unwrap();

        assert_eq!(location.status, RecordStatus::Pending);
        assert_eq!(location.approved_by, None);
        assert!(location.approved_at.is_none());

        let (status, submitted_by) = sqlx::query_as::<_, (RecordStatus, Uuid)>(
            "SELECT status, submitted_by FROM approvals WHERE kind = 'location' AND target_id = $1",
        )
        .bind(location.id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(status, RecordStatus::Pending);
        assert_eq!(submitted_by, user.user_id);

        assert!(matches!(
            service.get_approved(location.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_removes_queue_entry(pool: PgPool) {
        let user = insert_actor(&pool, UserRole::User).await;
        let service = LocationService::new(pool.clone());
        let location = service
            .create(&user, location_draft("Telaga Claket"))
            .await
            .unwrap();

        service.delete(location.id).await.unwrap();

        assert_eq!(count_where(&pool, "locations", "id", location.id).await, 0);
        assert_eq!(count_where(&pool, "approvals", "target_id", location.id).await, 0);
        assert!(matches!(
            service.delete(location.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
