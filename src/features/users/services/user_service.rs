use std::sync::Arc;

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::core::database::unique_violation;
use crate::core::error::{AppError, Result};
use crate::features::access::{
    check_user_management, Action, UserManagementOp, UserRef, UserRole,
};
use crate::features::auth::model::{Actor, AuthenticatedUser};
use crate::features::users::dtos::{DeleteUserRequestDto, RegisterProfileDto, UserQueryParams};
use crate::features::users::models::{claims_owner_seat, normalize_username, User, UsernameIssue};
use crate::modules::logto::IdentityProvider;
use crate::shared::types::search_pattern;
use crate::shared::validation::USERNAME_REGEX;

/// Checks on an owner delete request that need no database access.
///
/// The id the client believes it is acting as must be the caller, the caller
/// must hold the owner seat, and the owner cannot delete themselves.
pub fn check_delete_request(actor: &Actor, request: &DeleteUserRequestDto) -> Result<()> {
    if request.current_user_id != actor.user_id {
        return Err(AppError::Forbidden(
            "currentUserId tidak sesuai dengan pengguna yang masuk".to_string(),
        ));
    }
    actor.authorize(Action::DeleteUser)?;
    if request.user_id == actor.user_id {
        return Err(AppError::BadRequest(
            "Tidak dapat menghapus akun sendiri".to_string(),
        ));
    }
    Ok(())
}

fn not_found() -> AppError {
    AppError::NotFound("Pengguna tidak ditemukan".to_string())
}

pub struct UserService {
    pool: PgPool,
    identity: Arc<dyn IdentityProvider>,
    owner_email: Option<String>,
}

impl UserService {
    pub fn new(
        pool: PgPool,
        identity: Arc<dyn IdentityProvider>,
        owner_email: Option<String>,
    ) -> Self {
        Self {
            pool,
            identity,
            owner_email,
        }
    }

    async fn username_issue(
        conn: &mut PgConnection,
        username: &str,
    ) -> Result<Option<UsernameIssue>> {
        if !USERNAME_REGEX.is_match(username) {
            return Ok(Some(UsernameIssue::Invalid));
        }
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM usernames WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check username {}: {:?}", username, e);
            AppError::Database(e)
        })?;
        Ok(taken.then_some(UsernameIssue::Taken))
    }

    pub async fn username_availability(
        &self,
        raw: &str,
    ) -> Result<(String, Option<UsernameIssue>)> {
        let username = normalize_username(raw);
        let mut conn = self.pool.acquire().await.map_err(AppError::Database)?;
        let issue = Self::username_issue(&mut *conn, &username).await?;
        Ok((username, issue))
    }

    /// Create the caller's profile and reserve its username in one transaction.
    ///
    /// The configured owner email takes the owner seat while nobody holds it.
    pub async fn register(
        &self,
        user: &AuthenticatedUser,
        dto: RegisterProfileDto,
    ) -> Result<User> {
        if user.profile.is_some() {
            return Err(AppError::Conflict("Profil sudah terdaftar".to_string()));
        }

        let email = dto
            .email
            .as_deref()
            .or(user.email.as_deref())
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::Validation("Email wajib diisi".to_string()))?
            .to_string();

        let username = normalize_username(&dto.username);
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if let Some(issue) = Self::username_issue(&mut *tx, &username).await? {
            return Err(match issue {
                UsernameIssue::Invalid => AppError::Validation(issue.message().to_string()),
                UsernameIssue::Taken => AppError::Conflict(issue.message().to_string()),
            });
        }

        let owner_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE role = 'owner')",
        )
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        let claims_owner = claims_owner_seat(
            self.owner_email.as_deref(),
            user.verified_email(),
            owner_exists,
        );
        let role = if claims_owner {
            UserRole::Owner
        } else {
            UserRole::User
        };

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (auth_subject, username, email, display_name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&user.sub)
        .bind(&username)
        .bind(&email)
        .bind(dto.display_name.trim())
        .bind(role)
        .fetch_one(&mut *tx)
        .await
        .map_err(registration_conflict)?;

        sqlx::query("INSERT INTO usernames (username, user_id, email) VALUES ($1, $2, $3)")
            .bind(&username)
            .bind(created.id)
            .bind(&email)
            .execute(&mut *tx)
            .await
            .map_err(registration_conflict)?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Profile registered: id={}, username={}, role={}",
            created.id,
            created.username,
            created.role
        );
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch user {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(not_found)
    }

    pub async fn list(&self, params: &UserQueryParams) -> Result<(Vec<User>, i64)> {
        let pagination = params.pagination();
        let search = search_pattern(params.search.as_deref());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users
            WHERE ($1::user_role IS NULL OR role = $1)
              AND ($2::text IS NULL OR username ILIKE $2 OR display_name ILIKE $2 OR email ILIKE $2)
            "#,
        )
        .bind(params.role)
        .bind(search.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count users: {:?}", e);
            AppError::Database(e)
        })?;

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE ($1::user_role IS NULL OR role = $1)
              AND ($2::text IS NULL OR username ILIKE $2 OR display_name ILIKE $2 OR email ILIKE $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(params.role)
        .bind(search.as_deref())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((users, total))
    }

    pub async fn change_role(
        &self,
        actor: &Actor,
        target_id: Uuid,
        role: UserRole,
    ) -> Result<User> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let target = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
            .bind(target_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(not_found)?;

        check_user_management(
            actor_ref(actor),
            target.user_ref(),
            UserManagementOp::ChangeRole(role),
        )?;

        let updated = sqlx::query_as::<_, User>(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(target_id)
        .bind(role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to change role of {}: {:?}", target_id, e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Role changed: {} {} -> {} by {}",
            updated.username,
            target.role,
            updated.role,
            actor.username
        );
        Ok(updated)
    }

    /// Remove an account with its submissions.
    ///
    /// The identity goes first; if the provider refuses, nothing local changes.
    pub async fn delete_user(&self, actor: &Actor, target_id: Uuid) -> Result<()> {
        let target = self.get(target_id).await?;
        check_user_management(actor_ref(actor), target.user_ref(), UserManagementOp::Delete)?;

        self.identity.delete_identity(&target.auth_subject).await?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let removed = delete_account_rows(&mut *tx, target_id).await.map_err(|e| {
            tracing::error!("Failed to delete account rows for {}: {:?}", target_id, e);
            AppError::Database(e)
        })?;
        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "User deleted: {} ({} locations, {} investments) by {}",
            target.username,
            removed.locations,
            removed.investments,
            actor.username
        );
        Ok(())
    }
}

fn actor_ref(actor: &Actor) -> UserRef {
    UserRef {
        id: actor.user_id,
        role: actor.role,
    }
}

fn registration_conflict(err: sqlx::Error) -> AppError {
    match unique_violation(&err).as_deref() {
        Some("usernames_pkey") | Some("users_username_key") => {
            AppError::Conflict(UsernameIssue::Taken.message().to_string())
        }
        Some("users_auth_subject_key") => {
            AppError::Conflict("Profil sudah terdaftar".to_string())
        }
        Some(_) => AppError::Conflict("Data pengguna bentrok, silakan coba lagi".to_string()),
        None => {
            tracing::error!("Failed to register profile: {:?}", err);
            AppError::Database(err)
        }
    }
}

struct RemovedRows {
    locations: u64,
    investments: u64,
}

async fn delete_account_rows(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> std::result::Result<RemovedRows, sqlx::Error> {
    sqlx::query(
        r#"
        DELETE FROM approvals
        WHERE submitted_by = $1
           OR target_id IN (SELECT id FROM locations WHERE created_by = $1)
           OR target_id IN (SELECT id FROM investments WHERE created_by = $1)
        "#,
    )
    .bind(user_id)
    .execute(&mut *conn)
    .await?;

    let investments = sqlx::query("DELETE FROM investments WHERE created_by = $1")
        .bind(user_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    let locations = sqlx::query("DELETE FROM locations WHERE created_by = $1")
        .bind(user_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM usernames WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    Ok(RemovedRows {
        locations,
        investments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::investments::dtos::CreateInvestmentDto;
    use crate::features::investments::models::InvestmentSector;
    use crate::features::investments::InvestmentService;
    use crate::features::locations::LocationService;
    use crate::shared::test_helpers::{
        count_where, insert_actor, location_draft, user_without_profile,
    };
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    fn owner() -> Actor {
        Actor {
            sub: "sub-owner".to_string(),
            user_id: Uuid::new_v4(),
            username: "bupati".to_string(),
            role: UserRole::Owner,
        }
    }

    fn request(actor: &Actor, user_id: Uuid) -> DeleteUserRequestDto {
        DeleteUserRequestDto {
            user_id,
            current_user_id: actor.user_id,
        }
    }

    #[test]
    fn test_delete_request_must_come_from_caller() {
        let actor = owner();
        let req = DeleteUserRequestDto {
            user_id: Uuid::new_v4(),
            current_user_id: Uuid::new_v4(),
        };
        assert!(matches!(
            check_delete_request(&actor, &req),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_delete_request_requires_owner() {
        let admin = Actor {
            role: UserRole::Admin,
            ..owner()
        };
        let req = request(&admin, Uuid::new_v4());
        assert!(matches!(
            check_delete_request(&admin, &req),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_delete_request_refuses_self() {
        let actor = owner();
        let req = request(&actor, actor.user_id);
        assert!(matches!(
            check_delete_request(&actor, &req),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_delete_request_for_other_account_passes() {
        let actor = owner();
        assert!(check_delete_request(&actor, &request(&actor, Uuid::new_v4())).is_ok());
    }

    struct RecordingIdentity {
        refuse: bool,
        deleted: Mutex<Vec<String>>,
    }

    impl RecordingIdentity {
        fn new(refuse: bool) -> Arc<Self> {
            Arc::new(Self {
                refuse,
                deleted: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl IdentityProvider for RecordingIdentity {
        async fn delete_identity(&self, subject: &str) -> Result<()> {
            if self.refuse {
                return Err(AppError::ExternalServiceError(
                    "Identity provider unavailable".to_string(),
                ));
            }
            self.deleted.lock().unwrap().push(subject.to_string());
            Ok(())
        }
    }

    fn investment_draft() -> CreateInvestmentDto {
        CreateInvestmentDto {
            title: "Homestay Pantai Srau".to_string(),
            sector: InvestmentSector::Pariwisata,
            kecamatan: "Pringkuku".to_string(),
            desa: "Candi".to_string(),
            description: "Penginapan dekat pantai".to_string(),
            estimated_value: Decimal::new(750_000_000, 0),
            location_id: None,
            latitude: None,
            longitude: None,
            contact: None,
            image_url: None,
        }
    }

    async fn seed_submissions(pool: &PgPool, author: &Actor) -> (Uuid, Uuid) {
        let location = LocationService::new(pool.clone())
            .create(author, location_draft("Pantai Watu Karung"))
            .await
            .unwrap();
        let investment = InvestmentService::new(pool.clone())
            .create(author, investment_draft())
            .await
            .unwrap();
        (location.id, investment.id)
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_user_removes_account_and_submissions(pool: PgPool) {
        let owner = insert_actor(&pool, UserRole::Owner).await;
        let target = insert_actor(&pool, UserRole::User).await;
        let bystander = insert_actor(&pool, UserRole::User).await;
        let (location_id, investment_id) = seed_submissions(&pool, &target).await;
        let (kept_location, _) = seed_submissions(&pool, &bystander).await;

        let identity = RecordingIdentity::new(false);
        let service = UserService::new(pool.clone(), identity.clone(), None);
        service.delete_user(&owner, target.user_id).await.unwrap();

        assert_eq!(*identity.deleted.lock().unwrap(), vec![target.sub.clone()]);
        assert_eq!(count_where(&pool, "users", "id", target.user_id).await, 0);
        assert_eq!(count_where(&pool, "usernames", "user_id", target.user_id).await, 0);
        assert_eq!(count_where(&pool, "locations", "created_by", target.user_id).await, 0);
        assert_eq!(count_where(&pool, "investments", "created_by", target.user_id).await, 0);
        assert_eq!(count_where(&pool, "approvals", "submitted_by", target.user_id).await, 0);
        assert_eq!(count_where(&pool, "approvals", "target_id", location_id).await, 0);
        assert_eq!(count_where(&pool, "approvals", "target_id", investment_id).await, 0);

        assert_eq!(count_where(&pool, "locations", "id", kept_location).await, 1);
        assert_eq!(count_where(&pool, "approvals", "target_id", kept_location).await, 1);
        assert_eq!(count_where(&pool, "users", "id", bystander.user_id).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_refused_identity_removal_keeps_local_rows(pool: PgPool) {
        let owner = insert_actor(&pool, UserRole::Owner).await;
        let target = insert_actor(&pool, UserRole::User).await;
        let (location_id, _) = seed_submissions(&pool, &target).await;

        let service = UserService::new(pool.clone(), RecordingIdentity::new(true), None);
        let result = service.delete_user(&owner, target.user_id).await;
        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));

        assert_eq!(count_where(&pool, "users", "id", target.user_id).await, 1);
        assert_eq!(count_where(&pool, "locations", "id", location_id).await, 1);
        assert_eq!(count_where(&pool, "approvals", "target_id", location_id).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_user_guards_owner_and_missing_target(pool: PgPool) {
        let owner = insert_actor(&pool, UserRole::Owner).await;
        let admin = insert_actor(&pool, UserRole::Admin).await;
        let service = UserService::new(pool.clone(), RecordingIdentity::new(false), None);

        assert!(matches!(
            service.delete_user(&owner, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_user(&admin, owner.user_id).await,
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(count_where(&pool, "users", "id", owner.user_id).await, 1);
    }

    fn registering(email: &str, verified: bool) -> AuthenticatedUser {
        let mut user = user_without_profile();
        user.email = Some(email.to_string());
        user.email_verified = verified;
        user
    }

    fn profile(username: &str) -> RegisterProfileDto {
        RegisterProfileDto {
            username: username.to_string(),
            display_name: "Bupati Pacitan".to_string(),
            email: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_owner_seat_needs_verified_email(pool: PgPool) {
        let service = UserService::new(
            pool.clone(),
            RecordingIdentity::new(false),
            Some("bupati@pacitankab.go.id".to_string()),
        );

        let unverified = service
            .register(&registering("bupati@pacitankab.go.id", false), profile("bupati_palsu"))
            .await
            .unwrap();
        assert_eq!(unverified.role, UserRole::User);

        let verified = service
            .register(&registering("bupati@pacitankab.go.id", true), profile("bupati"))
            .await
            .unwrap();
        assert_eq!(verified.role, UserRole::Owner);
        assert_eq!(verified.username, "bupati");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_reserves_username(pool: PgPool) {
        let service = UserService::new(pool.clone(), RecordingIdentity::new(false), None);

        let first = service
            .register(&registering("a@pacitan.test", true), profile("Pokdarwis_Srau"))
            .await
            .unwrap();
        assert_eq!(first.username, "pokdarwis_srau");
        assert_eq!(count_where(&pool, "usernames", "user_id", first.id).await, 1);

        let taken = service
            .register(&registering("b@pacitan.test", true), profile("pokdarwis_srau"))
            .await;
        assert!(matches!(taken, Err(AppError::Conflict(_))));
    }
}
