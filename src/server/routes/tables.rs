use crate::error::TablecastError;
use crate::server::extract::{JsonBody, Originator, PathParams};
use crate::server::router::TablecastState;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use tablecast_schema::{
    AddRowRequest, AddTableRequest, ColumnInfo, RowView, TableSnapshot, UpdateCellRequest,
    UpdateCellResponse,
};
use tracing::debug;

pub fn router() -> Router<TablecastState> {
    Router::new()
        .route("/tables", get(list_tables).post(add_table))
        .route("/tables/{table}", delete(remove_table).put(replace_table))
        .route(
            "/tables/{table}/columns",
            get(columns_info).post(add_column),
        )
        .route("/tables/{table}/columns/{column}", delete(delete_column))
        .route("/tables/{table}/rows", get(display_table).post(add_row))
        .route("/tables/{table}/rows:new", post(add_new_row))
        .route("/tables/{table}/rows:dedup", post(remove_duplicates))
        .route("/tables/{table}/rows/{row}", delete(delete_row))
        .route("/tables/{table}/cells", put(update_cell))
}

async fn list_tables(State(state): State<TablecastState>) -> Result<Json<Vec<String>>, TablecastError> {
    Ok(Json(state.store.get_tables().await?))
}

/// POST /tables
async fn add_table(
    State(state): State<TablecastState>,
    JsonBody(req): JsonBody<AddTableRequest>,
) -> Result<StatusCode, TablecastError> {
    state.store.add_table(req.name, req.columns).await?;
    Ok(StatusCode::CREATED)
}

async fn remove_table(
    State(state): State<TablecastState>,
    PathParams(table): PathParams<String>,
) -> Result<StatusCode, TablecastError> {
    state.store.remove_table(&table).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /tables/{table}
///
/// Overwrites schema and rows with the client's copy. When the request names an observer
/// through `x-observer-id`, that observer is not sent the resulting update.
async fn replace_table(
    State(state): State<TablecastState>,
    PathParams(table): PathParams<String>,
    Originator(originator): Originator,
    JsonBody(content): JsonBody<TableSnapshot>,
) -> Result<StatusCode, TablecastError> {
    state.store.replace_table(&table, content, originator).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn columns_info(
    State(state): State<TablecastState>,
    PathParams(table): PathParams<String>,
) -> Result<Json<Vec<ColumnInfo>>, TablecastError> {
    Ok(Json(state.store.get_columns_info(&table).await?))
}

async fn add_column(
    State(state): State<TablecastState>,
    PathParams(table): PathParams<String>,
    JsonBody(column): JsonBody<ColumnInfo>,
) -> Result<StatusCode, TablecastError> {
    state.store.add_column(&table, column).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_column(
    State(state): State<TablecastState>,
    PathParams((table, column)): PathParams<(String, String)>,
) -> Result<StatusCode, TablecastError> {
    state.store.delete_column(&table, &column).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn display_table(
    State(state): State<TablecastState>,
    PathParams(table): PathParams<String>,
) -> Result<Json<Vec<RowView>>, TablecastError> {
    Ok(Json(state.store.display_table(&table).await?))
}

async fn add_row(
    State(state): State<TablecastState>,
    PathParams(table): PathParams<String>,
    JsonBody(req): JsonBody<AddRowRequest>,
) -> Result<StatusCode, TablecastError> {
    state.store.add_row(&table, req.values).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_new_row(
    State(state): State<TablecastState>,
    PathParams(table): PathParams<String>,
) -> Result<StatusCode, TablecastError> {
    state.store.add_new_row(&table).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_duplicates(
    State(state): State<TablecastState>,
    PathParams(table): PathParams<String>,
) -> Result<StatusCode, TablecastError> {
    let removed = state.store.remove_duplicates(&table).await?;
    debug!(table = %table, removed, "Deduplicated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /tables/{table}/rows/{row}
///
/// `row` counts from 1. Zero, negatives and numbers past the last row are rejected.
async fn delete_row(
    State(state): State<TablecastState>,
    PathParams((table, row)): PathParams<(String, i64)>,
) -> Result<StatusCode, TablecastError> {
    state.store.delete_row(&table, row).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /tables/{table}/cells
///
/// A value that does not parse as the column type is not an error: the answer is
/// `{"success": false}` and nothing changes.
async fn update_cell(
    State(state): State<TablecastState>,
    PathParams(table): PathParams<String>,
    JsonBody(req): JsonBody<UpdateCellRequest>,
) -> Result<Json<UpdateCellResponse>, TablecastError> {
    let success = state
        .store
        .update_table_cell(&table, req.row, &req.column, &req.value)
        .await?;
    Ok(Json(UpdateCellResponse { success }))
}
