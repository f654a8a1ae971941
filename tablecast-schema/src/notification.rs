use crate::table::DatabaseSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// First event on a fresh observer stream. Clients echo `observer_id` back in the
/// `x-observer-id` header so the server can recognise them as originator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registered {
    pub observer_id: String,
}

/// Full-state push sent after every accepted mutation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseUpdate {
    /// Increases by one per accepted mutation; a replica can drop anything not newer
    /// than what it already holds.
    pub revision: u64,
    /// Operation that produced this state, e.g. `AddTable`.
    pub cause: String,
    pub at: DateTime<Utc>,
    pub database: DatabaseSnapshot,
}
