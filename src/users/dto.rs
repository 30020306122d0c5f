use serde::{Deserialize, Serialize};

/// Request body for user registration.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
}

/// Request body for `PUT /users`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteUserResponse {
    pub status: bool,
    pub message: String,
}

impl DeleteUserResponse {
    pub fn deleted() -> Self {
        Self {
            status: true,
            message: "Deleted this user successfully.".into(),
        }
    }
}
