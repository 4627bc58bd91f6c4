//! Serves stored upload files at `GET /uploads/{filename}`.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use tokio_util::io::ReaderStream;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::uploads::content_type_for_extension;

/// GET /uploads/{filename}
///
/// Streams the stored file's bytes with a Content-Type guessed from its
/// extension. Names that could escape the upload directory are rejected.
pub async fn serve(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let path = state
        .uploads
        .resolve(&filename)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid filename: '{filename}'")))?;

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("No such upload: '{filename}'")));
        }
        Err(e) => return Err(AppError::InternalError(e.to_string())),
    };

    let size = file
        .metadata()
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .len();

    let stream = ReaderStream::new(file);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for_extension(&filename))
        .header(header::CONTENT_LENGTH, size.to_string())
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::InternalError(e.to_string()))
}
