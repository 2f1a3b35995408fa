use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::access::UserRole;
use crate::features::users::models::User;
use crate::shared::types::{default_page, default_page_size, PaginationQuery};
use crate::shared::validation::validate_not_blank;

/// Profile registration for the authenticated identity
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterProfileDto {
    /// Lowercased before checking; 3-30 chars, letters, digits, underscores
    #[validate(length(min = 3, max = 30, message = "Username harus 3-30 karakter"))]
    pub username: String,

    #[validate(
        length(min = 1, max = 120, message = "Nama tampilan maksimal 120 karakter"),
        custom(function = "validate_not_blank", message = "Nama tampilan wajib diisi")
    )]
    pub display_name: String,

    /// Defaults to the email claim of the token
    #[validate(email(message = "Format email tidak valid"))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponseDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UsernameAvailabilityDto {
    pub username: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct UserQueryParams {
    pub role: Option<UserRole>,
    /// Matches username, display name or email
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl UserQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.page_size)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChangeRoleDto {
    pub role: UserRole,
}

/// Owner request to remove an account and everything it submitted
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserRequestDto {
    pub user_id: Uuid,
    /// Must be the caller's own id
    pub current_user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_validation() {
        let dto: RegisterProfileDto = serde_json::from_value(json!({
            "username": "pokdarwis_srau",
            "display_name": "Pokdarwis Srau",
            "email": "srau@example.com"
        }))
        .unwrap();
        assert!(dto.validate().is_ok());

        let dto: RegisterProfileDto = serde_json::from_value(json!({
            "username": "ab",
            "display_name": "   ",
            "email": "bukan-email"
        }))
        .unwrap();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("display_name"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_delete_request_is_camel_case() {
        let user_id = Uuid::new_v4();
        let current = Uuid::new_v4();
        let dto: DeleteUserRequestDto = serde_json::from_value(json!({
            "userId": user_id,
            "currentUserId": current
        }))
        .unwrap();
        assert_eq!(dto.user_id, user_id);
        assert_eq!(dto.current_user_id, current);
    }
}
