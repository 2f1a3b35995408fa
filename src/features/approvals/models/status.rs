//! Review lifecycle shared by locations and investments.
//!
//! ```text
//! pending ──approve──▶ approved
//!    │
//!    └────reject─────▶ rejected
//! ```
//!
//! `approved` and `rejected` are terminal.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::core::error::AppError;
use crate::features::access::UserRole;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "record_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Approved,
    Rejected,
}

impl RecordStatus {
    /// Status a freshly created record starts in. Staff skip the queue.
    pub fn initial_for(role: UserRole) -> Self {
        if role.is_staff() {
            RecordStatus::Approved
        } else {
            RecordStatus::Pending
        }
    }

    pub fn apply(self, decision: &ReviewDecision) -> Result<RecordStatus, TransitionError> {
        if self != RecordStatus::Pending {
            return Err(TransitionError::AlreadyReviewed(self));
        }

        Ok(match decision {
            ReviewDecision::Approve => RecordStatus::Approved,
            ReviewDecision::Reject { .. } => RecordStatus::Rejected,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Approved => "approved",
            RecordStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject { reason: String },
}

impl ReviewDecision {
    /// Build a rejection; the reason must contain something besides whitespace
    pub fn reject(reason: &str) -> Result<Self, TransitionError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(TransitionError::MissingRejectionReason);
        }
        Ok(ReviewDecision::Reject {
            reason: reason.to_string(),
        })
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            ReviewDecision::Approve => None,
            ReviewDecision::Reject { reason } => Some(reason),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Pengajuan sudah berstatus {0}")]
    AlreadyReviewed(RecordStatus),

    #[error("Alasan penolakan wajib diisi")]
    MissingRejectionReason,
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::AlreadyReviewed(_) => AppError::Conflict(err.to_string()),
            TransitionError::MissingRejectionReason => AppError::BadRequest(err.to_string()),
        }
    }
}

/// Which table an approval record points at
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "submission_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Location,
    Investment,
}

impl SubmissionKind {
    pub fn table(self) -> &'static str {
        match self {
            SubmissionKind::Location => "locations",
            SubmissionKind::Investment => "investments",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SubmissionKind::Location => "Lokasi",
            SubmissionKind::Investment => "Peluang investasi",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status_by_role() {
        assert_eq!(RecordStatus::initial_for(UserRole::User), RecordStatus::Pending);
        assert_eq!(RecordStatus::initial_for(UserRole::Admin), RecordStatus::Approved);
        assert_eq!(RecordStatus::initial_for(UserRole::Owner), RecordStatus::Approved);
    }

    #[test]
    fn test_pending_transitions() {
        let reject = ReviewDecision::reject("Koordinat tidak valid").unwrap();
        assert_eq!(
            RecordStatus::Pending.apply(&ReviewDecision::Approve),
            Ok(RecordStatus::Approved)
        );
        assert_eq!(RecordStatus::Pending.apply(&reject), Ok(RecordStatus::Rejected));
    }

    #[test]
    fn test_terminal_states_refuse_every_decision() {
        let reject = ReviewDecision::reject("duplikat").unwrap();
        for status in [RecordStatus::Approved, RecordStatus::Rejected] {
            for decision in [&ReviewDecision::Approve, &reject] {
                assert_eq!(
                    status.apply(decision),
                    Err(TransitionError::AlreadyReviewed(status))
                );
            }
        }
    }

    #[test]
    fn test_rejection_requires_reason() {
        assert_eq!(
            ReviewDecision::reject("   \n"),
            Err(TransitionError::MissingRejectionReason)
        );
        let decision = ReviewDecision::reject("  Foto buram  ").unwrap();
        assert_eq!(decision.rejection_reason(), Some("Foto buram"));
        assert_eq!(ReviewDecision::Approve.rejection_reason(), None);
    }

    #[test]
    fn test_transition_error_status_codes() {
        use axum::{http::StatusCode, response::IntoResponse};

        let conflict: AppError = TransitionError::AlreadyReviewed(RecordStatus::Approved).into();
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);

        let bad: AppError = TransitionError::MissingRejectionReason.into();
        assert_eq!(bad.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_submission_kind_tables() {
        assert_eq!(SubmissionKind::Location.table(), "locations");
        assert_eq!(SubmissionKind::Investment.table(), "investments");
    }
}
