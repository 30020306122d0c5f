use serde::Serialize;
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: String,         // UUID v1, hyphenated
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,   // Argon2 hash, not exposed in JSON
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub create_at: String,  // overwritten on every update
    pub status: String,
}

/// Columns written by an update; everything else on the row is left alone.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub status: String,
    pub create_at: String,
}
