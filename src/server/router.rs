use crate::config::SyncConfig;
use crate::server::access_log::access_log;
use crate::server::routes::{database, observers, tables};
use crate::service::StoreHandle;
use axum::{Router, http::StatusCode, middleware};
use std::time::Duration;

/// Shared by every handler. Cloning is cheap: the store is an actor handle.
#[derive(Clone)]
pub struct TablecastState {
    pub store: StoreHandle,
    pub keep_alive: Duration,
}

impl TablecastState {
    pub fn new(store: StoreHandle, sync: &SyncConfig) -> Self {
        Self {
            store,
            keep_alive: sync.keep_alive(),
        }
    }
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

pub fn tablecast_router(state: TablecastState) -> Router {
    Router::new()
        .merge(database::router())
        .merge(tables::router())
        .merge(observers::router())
        .fallback(not_found_handler)
        .with_state(state)
        .layer(middleware::from_fn(access_log))
}
