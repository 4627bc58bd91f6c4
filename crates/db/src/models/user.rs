//! User entity model and DTOs.

use curio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub dob: chrono::NaiveDate,
    pub country: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub dob: chrono::NaiveDate,
    pub country: String,
    pub email: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            dob: user.dob,
            country: user.country,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for creating a new user. `password_hash` is the already-hashed
/// PHC string; plaintext handling lives in the API layer.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub dob: chrono::NaiveDate,
    pub country: String,
    pub email: String,
    pub password_hash: String,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub dob: Option<chrono::NaiveDate>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// Incoming request body for creating a user (plaintext password).
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub dob: chrono::NaiveDate,
    pub country: String,
    pub email: String,
    pub password: String,
}

/// Incoming request body for updating a user.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub dob: Option<chrono::NaiveDate>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}
