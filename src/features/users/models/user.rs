use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::access::{UserRef, UserRole};

/// Registered profile linked to an identity-provider subject
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub auth_subject: String,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn user_ref(&self) -> UserRef {
        UserRef {
            id: self.id,
            role: self.role,
        }
    }
}

/// Why a username cannot be taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameIssue {
    Invalid,
    Taken,
}

impl UsernameIssue {
    pub fn message(self) -> &'static str {
        match self {
            UsernameIssue::Invalid => {
                "Username 3-30 karakter, huruf kecil, angka, atau garis bawah, diawali huruf"
            }
            UsernameIssue::Taken => "Username sudah digunakan",
        }
    }
}

/// Lowercase and trim a requested username
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Whether `verified_email` claims the vacant owner seat. Unverified
/// addresses never reach this check.
pub fn claims_owner_seat(
    owner_email: Option<&str>,
    verified_email: Option<&str>,
    owner_exists: bool,
) -> bool {
    if owner_exists {
        return false;
    }
    match (owner_email, verified_email) {
        (Some(owner), Some(email)) => owner.trim().eq_ignore_ascii_case(email.trim()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  Budi_Santoso "), "budi_santoso");
    }

    #[test]
    fn test_owner_seat_claimed_only_while_vacant() {
        let owner = Some("bupati@pacitankab.go.id");
        assert!(claims_owner_seat(owner, Some("Bupati@PacitanKab.go.id"), false));
        assert!(!claims_owner_seat(owner, Some("bupati@pacitankab.go.id"), true));
        assert!(!claims_owner_seat(owner, Some("warga@example.com"), false));
        assert!(!claims_owner_seat(None, Some("bupati@pacitankab.go.id"), false));
        assert!(!claims_owner_seat(owner, None, false));
    }
}
