use crate::error::TablecastError;
use crate::server::extract::JsonBody;
use crate::server::router::TablecastState;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tablecast_schema::DatabaseSnapshot;

pub fn router() -> Router<TablecastState> {
    Router::new()
        .route("/database:create", post(create_database))
        .route("/database", get(get_database).put(replace_database))
}

/// POST /database:create
///
/// Drops every table. Observers receive the empty state.
async fn create_database(State(state): State<TablecastState>) -> Result<StatusCode, TablecastError> {
    state.store.create_database().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /database
async fn get_database(
    State(state): State<TablecastState>,
) -> Result<Json<DatabaseSnapshot>, TablecastError> {
    Ok(Json(state.store.snapshot().await?))
}

/// PUT /database
///
/// All-or-nothing: a snapshot with any invalid table leaves the current state untouched.
async fn replace_database(
    State(state): State<TablecastState>,
    JsonBody(snapshot): JsonBody<DatabaseSnapshot>,
) -> Result<StatusCode, TablecastError> {
    state.store.replace_database(snapshot).await?;
    Ok(StatusCode::NO_CONTENT)
}
