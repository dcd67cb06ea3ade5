use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::db::entities::UserModel;
use crate::db::repository::{Repository, UserRepository};
use crate::models::{NewUser, RecordKind, UserId};
use crate::services::context::ServiceContext;
use crate::utils::errors::AppError;

/// Registration and login against the `users` table
pub struct AuthService;

impl AuthService {
    /// Register a new account. Emails are compared case-insensitively.
    pub async fn register(ctx: &ServiceContext, new_user: NewUser) -> Result<UserModel, AppError> {
        Self::create_user(ctx, new_user, false).await
    }

    /// Check credentials and return the matching account
    pub async fn login(
        ctx: &ServiceContext,
        email: &str,
        password: &str,
    ) -> Result<UserModel, AppError> {
        let email = normalize_email(email);
        let user = ctx
            .users()
            .find_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if hash_password(&user.password_salt, password) != user.password_hash {
            debug!("Rejected login for {}", email);
            return Err(AppError::InvalidCredentials);
        }

        info!("User {} logged in", user.id);
        Ok(user)
    }

    pub async fn get_user(ctx: &ServiceContext, id: &UserId) -> Result<UserModel, AppError> {
        ctx.users()
            .find_by_id(id.as_str())
            .await?
            .ok_or_else(|| AppError::not_found(RecordKind::User, id))
    }

    pub(crate) async fn create_user(
        ctx: &ServiceContext,
        new_user: NewUser,
        verified: bool,
    ) -> Result<UserModel, AppError> {
        let email = normalize_email(&new_user.email);
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::InvalidValue {
                field: "email",
                value: new_user.email,
            });
        }
        if new_user.password.is_empty() {
            return Err(AppError::InvalidValue {
                field: "password",
                value: String::new(),
            });
        }

        let repo = ctx.users();
        if repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateEmail(email));
        }

        let salt = uuid::Uuid::new_v4().simple().to_string();
        let user = UserModel {
            id: UserId::generate().to_string(),
            password_hash: hash_password(&salt, &new_user.password),
            password_salt: salt,
            email,
            user_type: new_user.user_type.as_str().to_string(),
            name: new_user.name.trim().to_string(),
            verified,
            created_at: chrono::Utc::now().naive_utc(),
        };

        let user = repo.insert(user).await?;
        info!("Registered {} user {}", user.user_type, user.id);
        Ok(user)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
