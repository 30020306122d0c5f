use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::ApiError,
    state::AppState,
    users::{
        dto::{CreateUserRequest, DeleteUserRequest, DeleteUserResponse, UpdateUserRequest},
        repo_types::User,
        services,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(list_users)
                .post(create_user)
                .put(update_user)
                .delete(delete_user),
        )
        .route("/users/:id", get(get_user).delete(delete_user_by_id))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = services::list_users(state.users.as_ref()).await?;
    Ok(Json(users))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let user = services::register_user(state.users.as_ref(), payload).await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user = services::find_user(state.users.as_ref(), &id).await?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let user = services::update_user(state.users.as_ref(), payload).await?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn delete_user(
    State(state): State<AppState>,
    Json(payload): Json<DeleteUserRequest>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    services::delete_user(state.users.as_ref(), &payload.id).await?;
    Ok(Json(DeleteUserResponse::deleted()))
}

#[instrument(skip(state))]
pub async fn delete_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    services::delete_user(state.users.as_ref(), &id).await?;
    Ok(Json(DeleteUserResponse::deleted()))
}
