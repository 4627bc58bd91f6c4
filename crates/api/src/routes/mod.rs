pub mod health;
pub mod items;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the application route tree.
///
/// ```text
/// POST   /items               create (JSON or multipart)
/// GET    /items               list
/// GET    /items/{id}          get_by_id
/// PUT    /items/{id}          update (JSON or multipart)
/// DELETE /items/{id}          delete (also removes the uploaded file)
///
/// POST   /users               create
/// GET    /users               list
/// GET    /users/{id}          get_by_id
/// PUT    /users/{id}          update
/// DELETE /users/{id}          delete
///
/// GET    /uploads/{filename}  stored file bytes
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/items", items::router())
        .nest("/users", users::router())
        .route("/uploads/{filename}", get(handlers::uploads::serve))
}
