use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::approvals::dtos::{ApprovalQueryParams, ApprovalStatsDto, ReviewResultDto};
use crate::features::approvals::models::{
    ApprovalWithSubmitter, RecordStatus, ReviewDecision, StatusCounts, SubmissionKind,
};
use crate::features::auth::model::Actor;

/// Review queue and the approve/reject workflow for locations and investments
pub struct ApprovalService {
    pool: PgPool,
}

impl ApprovalService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a pending queue entry using the caller's transaction
    pub async fn enqueue(
        conn: &mut PgConnection,
        kind: SubmissionKind,
        target_id: Uuid,
        submitted_by: Uuid,
        snapshot: serde_json::Value,
    ) -> Result<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO approvals (kind, target_id, submitted_by, snapshot)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(kind)
        .bind(target_id)
        .bind(submitted_by)
        .bind(snapshot)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to enqueue {:?} {}: {:?}", kind, target_id, e);
            AppError::Database(e)
        })?;

        Ok(id)
    }

    /// Remove every queue entry of a target using the caller's transaction
    pub async fn delete_for_target(
        conn: &mut PgConnection,
        kind: SubmissionKind,
        target_id: Uuid,
    ) -> Result<u64> {
        let result = sqlx::query("DELETE FROM approvals WHERE kind = $1 AND target_id = $2")
            .bind(kind)
            .bind(target_id)
            .execute(conn)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete approvals of {}: {:?}", target_id, e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected())
    }

    pub async fn list(
        &self,
        params: &ApprovalQueryParams,
    ) -> Result<(Vec<ApprovalWithSubmitter>, i64)> {
        let pagination = params.pagination();
        let status = params.status_or_pending();

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM approvals a
            WHERE ($1::submission_kind IS NULL OR a.kind = $1)
              AND a.status = $2
            "#,
        )
        .bind(params.kind)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count approvals: {:?}", e);
            AppError::Database(e)
        })?;

        let items = sqlx::query_as::<_, ApprovalWithSubmitter>(
            r#"
            SELECT a.*, u.username AS submitted_by_username
            FROM approvals a
            LEFT JOIN users u ON u.id = a.submitted_by
            WHERE ($1::submission_kind IS NULL OR a.kind = $1)
              AND a.status = $2
            ORDER BY a.created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(params.kind)
        .bind(status)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list approvals: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((items, total))
    }

    pub async fn stats(&self) -> Result<ApprovalStatsDto> {
        let locations = self.count_by_status(SubmissionKind::Location).await?;
        let investments = self.count_by_status(SubmissionKind::Investment).await?;

        let pending_queue = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM approvals WHERE status = 'pending'",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count pending approvals: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(ApprovalStatsDto {
            locations: locations.into(),
            investments: investments.into(),
            pending_queue,
        })
    }

    async fn count_by_status(&self, kind: SubmissionKind) -> Result<StatusCounts> {
        let sql = format!(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'approved') AS approved,
                COUNT(*) FILTER (WHERE status = 'rejected') AS rejected
            FROM {}
            "#,
            kind.table()
        );

        sqlx::query_as::<_, StatusCounts>(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count {}: {:?}", kind.table(), e);
                AppError::Database(e)
            })
    }

    /// Review by queue entry id
    pub async fn review(
        &self,
        approval_id: Uuid,
        reviewer: &Actor,
        decision: ReviewDecision,
    ) -> Result<ReviewResultDto> {
        let (kind, target_id) = sqlx::query_as::<_, (SubmissionKind, Uuid)>(
            "SELECT kind, target_id FROM approvals WHERE id = $1",
        )
        .bind(approval_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch approval {}: {:?}", approval_id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Pengajuan tidak ditemukan".to_string()))?;

        self.review_target(kind, target_id, reviewer, decision).await
    }

    /// Approve or reject a location/investment and mirror the result onto its
    /// queue entry. The target row is locked for the duration.
    pub async fn review_target(
        &self,
        kind: SubmissionKind,
        target_id: Uuid,
        reviewer: &Actor,
        decision: ReviewDecision,
    ) -> Result<ReviewResultDto> {
        let table = kind.table();
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin review transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let current = sqlx::query_scalar::<_, RecordStatus>(&format!(
            "SELECT status FROM {} WHERE id = $1 FOR UPDATE",
            table
        ))
        .bind(target_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to lock {} {}: {:?}", table, target_id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("{} tidak ditemukan", kind.label())))?;

        let next = current.apply(&decision)?;
        let approved_by = (next == RecordStatus::Approved).then_some(reviewer.user_id);
        let reason = decision.rejection_reason();

        sqlx::query(&format!(
            r#"
            UPDATE {}
            SET status = $2,
                approved_by = $3,
                approved_at = CASE WHEN $3::uuid IS NULL THEN NULL ELSE NOW() END,
                rejection_reason = $4,
                updated_at = NOW()
            WHERE id = $1
            "#,
            table
        ))
        .bind(target_id)
        .bind(next)
        .bind(approved_by)
        .bind(reason)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update {} {}: {:?}", table, target_id, e);
            AppError::Database(e)
        })?;

        let approval_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE approvals
            SET status = $3,
                reviewed_by = $4,
                reviewed_at = NOW(),
                rejection_reason = $5,
                updated_at = NOW()
            WHERE kind = $1 AND target_id = $2 AND status = 'pending'
            RETURNING id
            "#,
        )
        .bind(kind)
        .bind(target_id)
        .bind(next)
        .bind(reviewer.user_id)
        .bind(reason)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update approval of {}: {:?}", target_id, e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit review of {}: {:?}", target_id, e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "{} {} {} by {}",
            table,
            target_id,
            next,
            reviewer.username
        );

        Ok(ReviewResultDto {
            kind,
            target_id,
            status: next,
            approval_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::access::UserRole;
    use crate::features::locations::LocationService;
    use crate::shared::test_helpers::{insert_actor, location_draft};

    type TargetRow = (RecordStatus, Option<Uuid>, Option<String>);
    type QueueRow = (Uuid, RecordStatus, Option<Uuid>, Option<String>);

    async fn pending_location(pool: &PgPool, name: &str) -> Uuid {
        let user = insert_actor(pool, UserRole::User).await;
        LocationService::new(pool.clone())
            .create(&user, location_draft(name))
            .await
            .unwrap()
            .id
    }

    async fn target_row(pool: &PgPool, id: Uuid) -> TargetRow {
        sqlx::query_as::<_, TargetRow>(
            "SELECT status, approved_by, rejection_reason FROM locations WHERE id = $1",
        )
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn queue_row(pool: &PgPool, target_id: Uuid) -> QueueRow {
        sqlx::query_as::<_, QueueRow>(
            "SELECT id, status, reviewed_by, rejection_reason FROM approvals WHERE target_id = $1",
        )
        .bind(target_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_approve_by_target_updates_record_and_queue(pool: PgPool) {
        let admin = insert_actor(&pool, UserRole::Admin).await;
        let target = pending_location(&pool, "Pantai Klayar").await;
        let service = ApprovalService::new(pool.clone());

        let result = service
            .review_target(
                SubmissionKind::Location,
                target,
                &admin,
                ReviewDecision::Approve,
            )
            .await
            .unwrap();

        let (queue_id, queue_status, reviewed_by, _) = queue_row(&pool, target).await;
        assert_eq!(result.status, RecordStatus::Approved);
        assert_eq!(result.approval_id, Some(queue_id));
        assert_eq!(queue_status, RecordStatus::Approved);
        assert_eq!(reviewed_by, Some(admin.user_id));

        let (status, approved_by, reason) = target_row(&pool, target).await;
        assert_eq!(status, RecordStatus::Approved);
        assert_eq!(approved_by, Some(admin.user_id));
        assert_eq!(reason, None);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_reject_by_queue_entry_stores_trimmed_reason(pool: PgPool) {
        let owner = insert_actor(&pool, UserRole::Owner).await;
        let target = pending_location(&pool, "Sungai Maron").await;
        let (queue_id, ..) = queue_row(&pool, target).await;
        let service = ApprovalService::new(pool.clone());

        let decision = ReviewDecision::reject("  Foto kurang jelas  ").unwrap();
        let result = service.review(queue_id, &owner, decision).await.unwrap();
        assert_eq!(result.status, RecordStatus::Rejected);

        let (status, approved_by, reason) = target_row(&pool, target).await;
        assert_eq!(status, RecordStatus::Rejected);
        assert_eq!(approved_by, None);
        assert_eq!(reason.as_deref(), Some("Foto kurang jelas"));

        let (_, queue_status, reviewed_by, queue_reason) = queue_row(&pool, target).await;
        assert_eq!(queue_status, RecordStatus::Rejected);
        assert_eq!(reviewed_by, Some(owner.user_id));
        assert_eq!(queue_reason.as_deref(), Some("Foto kurang jelas"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_second_review_conflicts_and_changes_nothing(pool: PgPool) {
        let admin = insert_actor(&pool, UserRole::Admin).await;
        let target = pending_location(&pool, "Goa Tabuhan").await;
        let service = ApprovalService::new(pool.clone());

        service
            .review_target(
                SubmissionKind::Location,
                target,
                &admin,
                ReviewDecision::Approve,
            )
            .await
            .unwrap();

        let (queue_id, ..) = queue_row(&pool, target).await;
        let again = service
            .review(
                queue_id,
                &admin,
                ReviewDecision::reject("Terlambat").unwrap(),
            )
            .await;
        assert!(matches!(again, Err(AppError::Conflict(_))));

        let (status, approved_by, reason) = target_row(&pool, target).await;
        assert_eq!(status, RecordStatus::Approved);
        assert_eq!(approved_by, Some(admin.user_id));
        assert_eq!(reason, None);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_review_of_unknown_entry_is_not_found(pool: PgPool) {
        let admin = insert_actor(&pool, UserRole::Admin).await;
        let service = ApprovalService::new(pool);

        let missing = service
            .review(Uuid::new_v4(), &admin, ReviewDecision::Approve)
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
