use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::access::{can_perform, Action, UserRole};

/// Profile row linked to a token subject
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AccountProfile {
    #[sqlx(rename = "id")]
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
}

/// Request identity placed in extensions by the auth middleware.
///
/// `profile` is `None` until the subject registers a profile.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub profile: Option<AccountProfile>,
}

/// An authenticated user that has a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub sub: String,
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// The token email, only when the issuer marked it verified
    pub fn verified_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|_| self.email_verified)
    }

    /// Accounts without a profile act with the lowest role
    pub fn role(&self) -> UserRole {
        self.profile.as_ref().map(|p| p.role).unwrap_or_default()
    }

    pub fn actor(&self) -> Result<Actor> {
        let profile = self.profile.as_ref().ok_or_else(|| {
            AppError::Forbidden("Lengkapi profil Anda terlebih dahulu".to_string())
        })?;

        Ok(Actor {
            sub: self.sub.clone(),
            user_id: profile.user_id,
            username: profile.username.clone(),
            role: profile.role,
        })
    }
}

impl Actor {
    pub fn can(&self, action: Action) -> bool {
        can_perform(self.role, action)
    }

    pub fn authorize(&self, action: Action) -> Result<()> {
        if self.can(action) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Anda tidak memiliki akses untuk tindakan ini".to_string(),
            ))
        }
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}
