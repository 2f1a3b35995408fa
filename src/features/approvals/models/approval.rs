use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::{RecordStatus, SubmissionKind};

/// Queue entry for a submission awaiting review
#[derive(Debug, Clone, FromRow)]
pub struct Approval {
    pub id: Uuid,
    pub kind: SubmissionKind,
    pub target_id: Uuid,
    pub submitted_by: Uuid,
    pub snapshot: serde_json::Value,
    pub status: RecordStatus,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Approval joined with the submitter's username
#[derive(Debug, Clone, FromRow)]
pub struct ApprovalWithSubmitter {
    #[sqlx(flatten)]
    pub approval: Approval,
    pub submitted_by_username: Option<String>,
}

/// Per-status counts for one submission table
#[derive(Debug, Clone, Default, FromRow)]
pub struct StatusCounts {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}
