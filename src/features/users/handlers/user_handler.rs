use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::access::Action;
use crate::features::auth::guards::{RequireOwner, RequireProfile};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{
    ChangeRoleDto, DeleteUserRequestDto, RegisterProfileDto, UserQueryParams, UserResponseDto,
    UsernameAvailabilityDto,
};
use crate::features::users::services::{check_delete_request, UserService};
use crate::shared::types::{ApiResponse, Meta};

/// Register the caller's profile
///
/// The first sign-in of the configured owner email becomes the owner.
#[utoipa::path(
    post,
    path = "/api/users/profile",
    request_body = RegisterProfileDto,
    responses(
        (status = 201, description = "Profile created", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Username taken or profile already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn register_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<RegisterProfileDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponseDto>>)> {
    dto.validate()?;
    let created = service.register(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(created.into()),
            Some("Profil berhasil dibuat".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Own profile", body = ApiResponse<UserResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Profile not registered yet")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_me(
    RequireProfile(actor): RequireProfile,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let user = service.get(actor.user_id).await?;
    Ok(Json(ApiResponse::success(Some(user.into()), None, None)))
}

#[utoipa::path(
    get,
    path = "/api/usernames/{username}/availability",
    params(("username" = String, Path, description = "Requested username")),
    responses(
        (status = 200, description = "Availability", body = ApiResponse<UsernameAvailabilityDto>)
    ),
    tag = "users"
)]
pub async fn username_availability(
    State(service): State<Arc<UserService>>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<UsernameAvailabilityDto>>> {
    let (username, issue) = service.username_availability(&username).await?;
    let dto = UsernameAvailabilityDto {
        username,
        available: issue.is_none(),
        reason: issue.map(|i| i.message().to_string()),
    };
    Ok(Json(ApiResponse::success(Some(dto), None, None)))
}

/// List accounts (owner)
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(UserQueryParams),
    responses(
        (status = 200, description = "Accounts", body = ApiResponse<Vec<UserResponseDto>>),
        (status = 403, description = "Owner only")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(
    RequireOwner(actor): RequireOwner,
    State(service): State<Arc<UserService>>,
    AppQuery(params): AppQuery<UserQueryParams>,
) -> Result<Json<ApiResponse<Vec<UserResponseDto>>>> {
    actor.authorize(Action::ListUsers)?;
    let (users, total) = service.list(&params).await?;
    let dtos: Vec<UserResponseDto> = users.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta::total(total)),
    )))
}

/// Promote or demote an account (owner)
///
/// The owner role itself cannot be granted, and owners cannot be changed.
#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/role",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = ChangeRoleDto,
    responses(
        (status = 200, description = "Role changed", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Own account or owner role requested"),
        (status = 403, description = "Owner only, or target is an owner"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn change_role(
    RequireOwner(actor): RequireOwner,
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<ChangeRoleDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let user = service.change_role(&actor, id, dto.role).await?;
    Ok(Json(ApiResponse::success(
        Some(user.into()),
        Some("Peran pengguna berhasil diubah".to_string()),
        None,
    )))
}

/// Delete an account, its identity and everything it submitted (owner)
#[utoipa::path(
    post,
    path = "/api/admin/delete-user",
    request_body = DeleteUserRequestDto,
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Own account"),
        (status = 403, description = "Not the caller, not the owner, or target is an owner"),
        (status = 404, description = "User not found"),
        (status = 502, description = "Identity provider refused the deletion")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_user(
    RequireProfile(actor): RequireProfile,
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<DeleteUserRequestDto>,
) -> Result<Json<ApiResponse<()>>> {
    check_delete_request(&actor, &dto)?;
    service.delete_user(&actor, dto.user_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Pengguna berhasil dihapus".to_string()),
        None,
    )))
}
