//! Role guards for handlers.
//!
//! Each guard reads the `AuthenticatedUser` the auth middleware stored in the
//! request extensions and yields an [`Actor`]:
//! - `RequireProfile`: any account that has registered a profile
//! - `RequireStaff`: admin or owner
//! - `RequireOwner`: the owner seat only
//!
//! ```ignore
//! pub async fn handler(RequireStaff(actor): RequireStaff) { ... }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::core::error::AppError;
use crate::features::access::UserRole;
use crate::features::auth::model::{Actor, AuthenticatedUser};

fn actor_from_parts(parts: &Parts, min_role: UserRole) -> Result<Actor, AppError> {
    let user = parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

    let actor = user.actor()?;
    if actor.role < min_role {
        let message = match min_role {
            UserRole::Owner => "Hanya owner yang dapat mengakses fitur ini",
            _ => "Hanya admin yang dapat mengakses fitur ini",
        };
        return Err(AppError::Forbidden(message.to_string()));
    }
    Ok(actor)
}

pub struct RequireProfile(pub Actor);

impl<S> FromRequestParts<S> for RequireProfile
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        actor_from_parts(parts, UserRole::User).map(RequireProfile)
    }
}

pub struct RequireStaff(pub Actor);

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        actor_from_parts(parts, UserRole::Admin).map(RequireStaff)
    }
}

pub struct RequireOwner(pub Actor);

impl<S> FromRequestParts<S> for RequireOwner
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        actor_from_parts(parts, UserRole::Owner).map(RequireOwner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{user_with_role, user_without_profile, with_user};
    use axum::{http::StatusCode, routing::get, Router};
    use axum_test::TestServer;

    async fn profile_route(RequireProfile(actor): RequireProfile) -> String {
        actor.username
    }

    async fn staff_route(RequireStaff(actor): RequireStaff) -> String {
        actor.role.to_string()
    }

    async fn owner_route(RequireOwner(actor): RequireOwner) -> String {
        actor.role.to_string()
    }

    fn routes() -> Router {
        Router::new()
            .route("/profile", get(profile_route))
            .route("/staff", get(staff_route))
            .route("/owner", get(owner_route))
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() {
        let server = TestServer::new(routes()).unwrap();
        server
            .get("/profile")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_identity_without_profile_is_forbidden() {
        let server = TestServer::new(with_user(routes(), user_without_profile())).unwrap();
        server
            .get("/profile")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_regular_user() {
        let server = TestServer::new(with_user(routes(), user_with_role(UserRole::User))).unwrap();
        server.get("/profile").await.assert_status_ok();
        server.get("/staff").await.assert_status(StatusCode::FORBIDDEN);
        server.get("/owner").await.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin() {
        let server = TestServer::new(with_user(routes(), user_with_role(UserRole::Admin))).unwrap();
        server.get("/staff").await.assert_text("admin");
        server.get("/owner").await.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_owner_passes_every_guard() {
        let server = TestServer::new(with_user(routes(), user_with_role(UserRole::Owner))).unwrap();
        server.get("/profile").await.assert_status_ok();
        server.get("/staff").await.assert_text("owner");
        server.get("/owner").await.assert_text("owner");
    }
}
