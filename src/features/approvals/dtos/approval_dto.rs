use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::approvals::models::{
    ApprovalWithSubmitter, RecordStatus, StatusCounts, SubmissionKind,
};
use crate::shared::types::{default_page, default_page_size, PaginationQuery};

/// Query parameters for the review queue
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ApprovalQueryParams {
    /// Only entries of this kind
    pub kind: Option<SubmissionKind>,
    /// Defaults to `pending`
    pub status: Option<RecordStatus>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl ApprovalQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.page_size)
    }

    pub fn status_or_pending(&self) -> RecordStatus {
        self.status.unwrap_or(RecordStatus::Pending)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RejectSubmissionDto {
    #[validate(length(max = 1000, message = "Alasan penolakan maksimal 1000 karakter"))]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApprovalResponseDto {
    pub id: Uuid,
    pub kind: SubmissionKind,
    pub target_id: Uuid,
    pub submitted_by: Uuid,
    pub submitted_by_username: Option<String>,
    #[schema(value_type = Object)]
    pub snapshot: serde_json::Value,
    pub status: RecordStatus,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ApprovalWithSubmitter> for ApprovalResponseDto {
    fn from(row: ApprovalWithSubmitter) -> Self {
        let a = row.approval;
        Self {
            id: a.id,
            kind: a.kind,
            target_id: a.target_id,
            submitted_by: a.submitted_by,
            submitted_by_username: row.submitted_by_username,
            snapshot: a.snapshot,
            status: a.status,
            reviewed_by: a.reviewed_by,
            reviewed_at: a.reviewed_at,
            rejection_reason: a.rejection_reason,
            created_at: a.created_at,
        }
    }
}

/// Result of approving or rejecting a submission
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewResultDto {
    pub kind: SubmissionKind,
    pub target_id: Uuid,
    pub status: RecordStatus,
    /// `None` when the record had no queue entry
    pub approval_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusCountsDto {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub total: i64,
}

impl From<StatusCounts> for StatusCountsDto {
    fn from(c: StatusCounts) -> Self {
        Self {
            total: c.pending + c.approved + c.rejected,
            pending: c.pending,
            approved: c.approved,
            rejected: c.rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApprovalStatsDto {
    pub locations: StatusCountsDto,
    pub investments: StatusCountsDto,
    /// Queue entries still waiting for review
    pub pending_queue: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_counts_total() {
        let dto = StatusCountsDto::from(StatusCounts {
            pending: 3,
            approved: 10,
            rejected: 2,
        });
        assert_eq!(dto.total, 15);
    }

    #[test]
    fn test_query_defaults_to_pending() {
        let params: ApprovalQueryParams =
            serde_json::from_value(serde_json::json!({"kind": "investment"})).unwrap();
        assert_eq!(params.kind, Some(SubmissionKind::Investment));
        assert_eq!(params.status_or_pending(), RecordStatus::Pending);
        assert_eq!(params.pagination().page, 1);
    }
}
