//! Handlers for the `/items` resource.
//!
//! Create and update accept either a JSON body or a multipart form. A
//! multipart form may carry an `image` file field; the file is written to
//! the upload store and the generated filename is persisted on the record.
//! When no new file is supplied on update, the stored reference is
//! retained. Deleting an item also deletes its stored file so no orphans
//! accumulate.

use axum::extract::{Multipart, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::Json;
use axum::RequestExt;
use curio_core::error::CoreError;
use curio_core::types::DbId;
use serde::Deserialize;

use curio_db::models::item::{CreateItem, Item, UpdateItem};
use curio_db::repositories::ItemRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Item fields as they arrive in a JSON body.
#[derive(Debug, Default, Deserialize)]
struct ItemBody {
    name: Option<String>,
    age: Option<i32>,
    gender: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

/// Item fields parsed from either request flavour, plus the raw file bytes
/// when a multipart `image` field was present.
#[derive(Debug, Default)]
struct ItemForm {
    name: Option<String>,
    age: Option<i32>,
    gender: Option<String>,
    image: Option<String>,
    /// `(original filename, bytes)` of an uploaded file.
    file: Option<(String, Vec<u8>)>,
}

/// Parse an item submission from a JSON or multipart request body.
async fn parse_item_form(request: Request) -> AppResult<ItemForm> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    if !is_multipart {
        let Json(body) = request
            .extract::<Json<ItemBody>, _>()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        return Ok(ItemForm {
            name: body.name,
            age: body.age,
            gender: body.gender,
            image: body.image,
            file: None,
        });
    }

    let mut multipart = request
        .extract::<Multipart, _>()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut form = ItemForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // Browsers submit an empty part when no file was chosen;
                // that counts as "no file attached".
                if !filename.is_empty() && !data.is_empty() {
                    form.file = Some((filename, data.to_vec()));
                }
            }
            "name" => form.name = Some(read_text(field).await?),
            "gender" => form.gender = Some(read_text(field).await?),
            "age" => {
                let text = read_text(field).await?;
                if !text.trim().is_empty() {
                    let age: i32 = text.trim().parse().map_err(|_| {
                        AppError::BadRequest(format!("Invalid age value: '{text}'"))
                    })?;
                    form.age = Some(age);
                }
            }
            _ => {} // ignore unknown fields
        }
    }
    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Store an uploaded file, returning its generated filename.
async fn store_file(state: &AppState, original: &str, bytes: &[u8]) -> AppResult<String> {
    state
        .uploads
        .save(original, bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))
}

/// Best-effort removal of a stored file; failures are logged, not surfaced.
async fn discard_file(state: &AppState, filename: &str) {
    if let Err(e) = state.uploads.remove(filename).await {
        tracing::warn!(filename = %filename, error = %e, "Failed to remove uploaded file");
    }
}

/// POST /items
///
/// Accepts JSON or a multipart form with an optional `image` file.
pub async fn create(
    State(state): State<AppState>,
    request: Request,
) -> AppResult<(StatusCode, Json<Item>)> {
    let form = parse_item_form(request).await?;

    let name = form
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("name is required".into())))?;

    let image = match &form.file {
        Some((original, bytes)) => Some(store_file(&state, original, bytes).await?),
        None => form.image,
    };

    let input = CreateItem {
        name,
        age: form.age,
        gender: form.gender,
        image,
    };
    let item = ItemRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /items
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Item>>> {
    let items = ItemRepo::list(&state.pool).await?;
    Ok(Json(items))
}

/// GET /items/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Item>> {
    let item = ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;
    Ok(Json(item))
}

/// PUT /items/{id}
///
/// Accepts JSON or a multipart form. Supplying a new `image` file replaces
/// the stored file and deletes the old one; omitting it leaves the stored
/// reference untouched.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    request: Request,
) -> AppResult<Json<Item>> {
    let form = parse_item_form(request).await?;

    let previous = ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;

    let new_image = match &form.file {
        Some((original, bytes)) => Some(store_file(&state, original, bytes).await?),
        None => form.image,
    };

    let input = UpdateItem {
        name: form.name,
        age: form.age,
        gender: form.gender,
        image: new_image.clone(),
    };

    let updated = match ItemRepo::update(&state.pool, id, &input).await? {
        Some(item) => item,
        None => {
            // Row vanished between the lookup and the update; don't leave
            // the freshly written file behind.
            if let Some(filename) = &new_image {
                discard_file(&state, filename).await;
            }
            return Err(AppError::Core(CoreError::NotFound { entity: "Item", id }));
        }
    };

    // A replaced image's old file is no longer referenced by anything.
    if let (Some(old), Some(new)) = (&previous.image, &updated.image) {
        if old != new {
            discard_file(&state, old).await;
        }
    }

    Ok(Json(updated))
}

/// DELETE /items/{id}
///
/// Removes the record and its uploaded file, if any.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let item = ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;

    let deleted = ItemRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Item", id }));
    }

    if let Some(filename) = &item.image {
        discard_file(&state, filename).await;
    }

    Ok(StatusCode::NO_CONTENT)
}
