//! Item entity model and DTOs.

use curio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    /// Generated filename of the uploaded image inside the upload directory.
    pub image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new item.
///
/// `image` is normally filled in by the upload handler after the file has
/// been written to disk; a JSON caller never needs to supply it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateItem {
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// DTO for updating an existing item. Only non-`None` fields are applied,
/// so omitting `image` leaves the stored reference untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}
