use crate::error::TablecastError;
use crate::server::extract::PathParams;
use crate::server::router::TablecastState;
use crate::service::StoreHandle;
use crate::sync::ObserverId;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{delete, get},
};
use futures::{StreamExt, future, stream};
use tablecast_schema::Registered;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

pub fn router() -> Router<TablecastState> {
    Router::new()
        .route("/observers", get(register))
        .route("/observers/{id}", delete(unregister))
}

/// Unregisters its observer when the SSE stream is dropped, i.e. when the client hangs up.
struct ObserverGuard {
    store: StoreHandle,
    id: ObserverId,
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let store = self.store.clone();
        let id = self.id;
        handle.spawn(async move {
            // Already gone after an explicit DELETE or a prune.
            if let Err(e) = store.unregister(id).await {
                debug!(observer = %id, error = %e, "Observer cleanup skipped");
            }
        });
    }
}

/// GET /observers
///
/// Opens an observer stream. The first event names the observer, the second carries the
/// current state, and every accepted mutation after that pushes the new state.
async fn register(State(state): State<TablecastState>) -> Result<impl IntoResponse, TablecastError> {
    let (id, rx) = state.store.register().await?;
    info!(observer = %id, "Observer stream opened");

    let registered = Event::default().event("registered").json_data(Registered {
        observer_id: id.to_string(),
    });
    let guard = ObserverGuard {
        store: state.store.clone(),
        id,
    };
    let updates = ReceiverStream::new(rx).map(move |update| {
        let _guard = &guard;
        Event::default()
            .event("database")
            .id(update.revision.to_string())
            .json_data(&*update)
    });
    let events = stream::once(future::ready(registered)).chain(updates);

    Ok(Sse::new(events).keep_alive(KeepAlive::new().interval(state.keep_alive)))
}

/// DELETE /observers/{id}
async fn unregister(
    State(state): State<TablecastState>,
    PathParams(raw): PathParams<String>,
) -> Result<StatusCode, TablecastError> {
    let id: ObserverId = raw
        .parse()
        .map_err(|_| TablecastError::InvalidObserverId(raw.clone()))?;
    state.store.unregister(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
