use crate::error::ApiError;
use crate::users::dto::{CreateUserRequest, UpdateUserRequest};
use crate::users::repo::UserStore;
use crate::users::repo_types::{User, UserChanges};
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};
use tracing::{debug, error, info};
use uuid::Uuid;

const ACTIVE_STATUS: &str = "1";

const CREATE_AT_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]");

lazy_static! {
    // v1 ids need a node id; one random value per process.
    static ref NODE_ID: [u8; 6] = rand::random();
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Time-ordered unique id for a new user.
pub fn new_user_id() -> String {
    Uuid::now_v1(&NODE_ID).to_string()
}

pub fn now_timestamp() -> anyhow::Result<String> {
    Ok(OffsetDateTime::now_utc().format(CREATE_AT_FORMAT)?)
}

/// `gender` and `status` are CHAR(1) columns; empty is allowed.
fn require_single_char(field: &str, value: &str) -> Result<(), ApiError> {
    if value.chars().count() > 1 {
        return Err(ApiError::Validation(format!(
            "{field} must be at most one character"
        )));
    }
    Ok(())
}

pub async fn list_users(store: &dyn UserStore) -> Result<Vec<User>, ApiError> {
    let users = store.list().await?;
    debug!(count = users.len(), "users listed");
    Ok(users)
}

pub async fn register_user(
    store: &dyn UserStore,
    req: CreateUserRequest,
) -> Result<User, ApiError> {
    require_single_char("gender", &req.gender)?;

    let user = User {
        id: new_user_id(),
        username: req.username,
        password: hash_password(&req.password)?,
        first_name: req.first_name,
        last_name: req.last_name,
        gender: req.gender,
        create_at: now_timestamp()?,
        status: ACTIVE_STATUS.into(),
    };
    store.insert(&user).await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

pub async fn find_user(store: &dyn UserStore, id: &str) -> Result<User, ApiError> {
    store.find_by_id(id).await?.ok_or(ApiError::NotFound)
}

pub async fn update_user(
    store: &dyn UserStore,
    req: UpdateUserRequest,
) -> Result<User, ApiError> {
    require_single_char("gender", &req.gender)?;
    require_single_char("status", &req.status)?;

    let changes = UserChanges {
        id: req.id,
        first_name: req.first_name,
        last_name: req.last_name,
        gender: req.gender,
        status: req.status,
        create_at: now_timestamp()?,
    };
    let touched = store.update(&changes).await?;
    debug!(user_id = %changes.id, touched, "user update executed");

    find_user(store, &changes.id).await
}

/// Deleting an unknown id is not an error.
pub async fn delete_user(store: &dyn UserStore, id: &str) -> Result<(), ApiError> {
    let removed = store.delete(id).await?;
    info!(user_id = %id, removed, "user delete executed");
    Ok(())
}

#[cfg(test)]
mod password_tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "pw1";
        let hash = hash_password(password).expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_plaintext_hashes_differently() {
        let a = hash_password("pw1").unwrap();
        let b = hash_password("pw1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
