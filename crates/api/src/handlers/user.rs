//! Handlers for the `/users` resource.
//!
//! Passwords are hashed with Argon2id before storage and never serialized
//! in responses ([`UserResponse`] carries no hash).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use curio_core::error::CoreError;
use curio_core::password;
use curio_core::types::DbId;

use curio_db::models::user::{
    CreateUser, CreateUserRequest, UpdateUser, UpdateUserRequest, UserResponse,
};
use curio_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Name length bounds declared by the original record schema.
const NAME_MIN: usize = 3;
const NAME_MAX: usize = 50;

fn validate_name(name: &str) -> Result<(), AppError> {
    let len = name.chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "name must be between {NAME_MIN} and {NAME_MAX} characters"
        ))));
    }
    Ok(())
}

fn hash_password(plaintext: &str) -> Result<String, AppError> {
    password::validate_password_strength(plaintext)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    password::hash_password(plaintext)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))
}

/// POST /users
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validate_name(&body.name)?;
    let password_hash = hash_password(&body.password)?;

    let input = CreateUser {
        name: body.name,
        dob: body.dob,
        country: body.country,
        email: body.email,
        password_hash,
    };
    let user = UserRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /users
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(user.into()))
}

/// PUT /users/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    if let Some(name) = &body.name {
        validate_name(name)?;
    }
    let password_hash = match &body.password {
        Some(plaintext) => Some(hash_password(plaintext)?),
        None => None,
    };

    let input = UpdateUser {
        name: body.name,
        dob: body.dob,
        country: body.country,
        email: body.email,
        password_hash,
    };
    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(user.into()))
}

/// DELETE /users/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = UserRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}
