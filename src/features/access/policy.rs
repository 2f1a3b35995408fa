//! Who may do what.
//!
//! `can_perform` is the single table every HTTP guard and service check
//! consults. User-management operations additionally depend on the target
//! account and go through `check_user_management`.

use thiserror::Error;
use uuid::Uuid;

use super::role::UserRole;
use crate::core::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SubmitContent,
    ViewOwnSubmissions,
    GenerateRecommendation,
    ForceRegenerateRecommendation,
    InvalidateRecommendation,
    ReviewSubmission,
    ManageCatalog,
    DeleteContent,
    ViewAllContent,
    ListUsers,
    ChangeUserRole,
    DeleteUser,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::SubmitContent,
        Action::ViewOwnSubmissions,
        Action::GenerateRecommendation,
        Action::ForceRegenerateRecommendation,
        Action::InvalidateRecommendation,
        Action::ReviewSubmission,
        Action::ManageCatalog,
        Action::DeleteContent,
        Action::ViewAllContent,
        Action::ListUsers,
        Action::ChangeUserRole,
        Action::DeleteUser,
    ];
}

pub fn can_perform(role: UserRole, action: Action) -> bool {
    use Action::*;

    match action {
        SubmitContent | ViewOwnSubmissions | GenerateRecommendation => true,
        ForceRegenerateRecommendation
        | InvalidateRecommendation
        | ReviewSubmission
        | ManageCatalog
        | DeleteContent
        | ViewAllContent => role.is_staff(),
        ListUsers | ChangeUserRole | DeleteUser => role.is_owner(),
    }
}

/// Minimal view of an account for user-management checks
#[derive(Debug, Clone, Copy)]
pub struct UserRef {
    pub id: Uuid,
    pub role: UserRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserManagementOp {
    Delete,
    ChangeRole(UserRole),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("Hanya owner yang dapat mengelola pengguna")]
    NotPermitted,

    #[error("Tidak dapat melakukan tindakan ini pada akun sendiri")]
    SelfTarget,

    #[error("Akun owner tidak dapat diubah atau dihapus")]
    OwnerTarget,

    #[error("Peran owner tidak dapat diberikan")]
    CannotGrantOwner,
}

impl From<PolicyViolation> for AppError {
    fn from(v: PolicyViolation) -> Self {
        match v {
            PolicyViolation::NotPermitted | PolicyViolation::OwnerTarget => {
                AppError::Forbidden(v.to_string())
            }
            PolicyViolation::SelfTarget | PolicyViolation::CannotGrantOwner => {
                AppError::BadRequest(v.to_string())
            }
        }
    }
}

pub fn check_user_management(
    actor: UserRef,
    target: UserRef,
    op: UserManagementOp,
) -> Result<(), PolicyViolation> {
    let action = match op {
        UserManagementOp::Delete => Action::DeleteUser,
        UserManagementOp::ChangeRole(_) => Action::ChangeUserRole,
    };

    if !can_perform(actor.role, action) {
        return Err(PolicyViolation::NotPermitted);
    }
    if actor.id == target.id {
        return Err(PolicyViolation::SelfTarget);
    }
    if target.role.is_owner() {
        return Err(PolicyViolation::OwnerTarget);
    }
    if op == UserManagementOp::ChangeRole(UserRole::Owner) {
        return Err(PolicyViolation::CannotGrantOwner);
    }
    Ok(())
}
