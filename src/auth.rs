use actix_web::{dev::ServiceRequest, web, Error, HttpMessage};
use actix_web_httpauth::extractors::basic::BasicAuth;
use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;
use sqlx::SqlitePool;

use crate::{db, error::ApiError, state::AppState};

pub const AUTH_REALM: &str = "Serenova";

/// An authenticated caller, with the password hash already stripped.
#[derive(Clone, Debug, serde::Serialize)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub is_admin: bool,
}

pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed_hash = PasswordHash::new(password_hash);
    match parsed_hash {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// `Ok(None)` means the credentials are wrong; a storage failure stays an
/// error so it is never mistaken for a bad password.
pub async fn authenticate_credentials(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<Option<AuthUser>, sqlx::Error> {
    let Some(user) = db::users::get_user_by_email(pool, email).await? else {
        return Ok(None);
    };

    if !verify_password(password, &user.password) {
        return Ok(None);
    }

    Ok(Some(AuthUser {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        is_admin: user.is_admin != 0,
    }))
}

/// Guard: valid credentials required.
pub async fn require_user(
    pool: &SqlitePool,
    credentials: &BasicAuth,
) -> Result<AuthUser, ApiError> {
    let email = credentials.user_id();
    let password = credentials.password().unwrap_or_default();
    authenticate_credentials(pool, email, password)
        .await?
        .ok_or(ApiError::Unauthorized)
}

/// Guard: valid credentials and the stored admin flag.
pub async fn require_admin(
    pool: &SqlitePool,
    credentials: &BasicAuth,
) -> Result<AuthUser, ApiError> {
    let user = require_user(pool, credentials).await?;
    if !user.is_admin {
        return Err(ApiError::Forbidden);
    }
    Ok(user)
}

/// Middleware validator for admin-only scopes.
pub async fn admin_validator(
    req: ServiceRequest,
    credentials: BasicAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
        return Err((ApiError::Unauthorized.into(), req));
    };
    match require_admin(&state.db, &credentials).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            Ok(req)
        }
        Err(err) => Err((err.into(), req)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::test_pool;

    #[actix_web::test]
    async fn storage_failure_is_not_a_bad_credential() {
        let pool = test_pool().await;
        let hash = hash_password("pw1").unwrap();
        db::users::create_user(&pool, "a@x.com", &hash, "A")
            .await
            .unwrap();

        let user = authenticate_credentials(&pool, "a@x.com", "pw1")
            .await
            .unwrap();
        assert!(user.is_some());

        let rejected = authenticate_credentials(&pool, "a@x.com", "wrong")
            .await
            .unwrap();
        assert!(rejected.is_none());

        // A dead pool must surface as an error, not as a failed login.
        pool.close().await;
        assert!(authenticate_credentials(&pool, "a@x.com", "pw1")
            .await
            .is_err());
    }
}
