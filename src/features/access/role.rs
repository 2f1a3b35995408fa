use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account role. Ordered `User < Admin < Owner`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    sqlx::Type,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
    Owner,
}

impl UserRole {
    /// Admin or owner
    pub fn is_staff(self) -> bool {
        self >= UserRole::Admin
    }

    pub fn is_owner(self) -> bool {
        self == UserRole::Owner
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
            UserRole::Owner => "owner",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_and_staff() {
        assert!(UserRole::User < UserRole::Admin);
        assert!(UserRole::Admin < UserRole::Owner);
        assert!(!UserRole::User.is_staff());
        assert!(UserRole::Admin.is_staff());
        assert!(UserRole::Owner.is_staff());
        assert!(UserRole::Owner.is_owner());
        assert!(!UserRole::Admin.is_owner());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        let role: UserRole = serde_json::from_str("\"owner\"").unwrap();
        assert_eq!(role, UserRole::Owner);
        assert!(serde_json::from_str::<UserRole>("\"superadmin\"").is_err());
    }
}
