use crate::error::StoreError;
use crate::store::{Database, schema::parse_type};
use crate::sync::{Broadcaster, ObserverId, ObserverSender};
use crate::utils::logging::pretty_json_if_debug;
use chrono::Utc;
use std::sync::Arc;
use tablecast_schema::{
    ColumnInfo, DatabaseSnapshot, DatabaseUpdate, RowView, TableSnapshot, Value,
};
use tracing::{debug, info};

/// Dispatch layer between the transport and the store.
///
/// Every mutating call validates first, applies, then fans the resulting state out to the
/// registered observers. Read calls never broadcast. Callers are expected to serialize
/// access (the store actor owns the only instance).
pub struct TableService {
    db: Database,
    broadcaster: Broadcaster,
    revision: u64,
}

impl TableService {
    pub fn new(db: Database, broadcaster: Broadcaster) -> Self {
        Self {
            db,
            broadcaster,
            revision: 0,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get_tables(&self) -> Vec<String> {
        self.db.table_names()
    }

    pub fn get_columns_info(&self, table: &str) -> Result<Vec<ColumnInfo>, StoreError> {
        Ok(self.db.table(table)?.schema().infos())
    }

    pub fn display_table(&self, table: &str) -> Result<Vec<RowView>, StoreError> {
        Ok(self.db.table(table)?.row_views())
    }

    pub fn snapshot(&self) -> DatabaseSnapshot {
        self.db.snapshot()
    }

    /// Drops every table.
    pub fn create_database(&mut self) {
        let dropped = self.db.len();
        self.db = Database::new();
        info!(dropped_tables = dropped, "Database recreated");
        self.commit("CreateDatabase", None);
    }

    pub fn add_table(&mut self, name: &str, columns: &[ColumnInfo]) -> Result<(), StoreError> {
        self.db.add_table(name, columns)?;
        info!(table = %name, columns = columns.len(), "Table added");
        self.commit("AddTable", None);
        Ok(())
    }

    pub fn remove_table(&mut self, name: &str) -> Result<(), StoreError> {
        self.db.remove_table(name)?;
        info!(table = %name, "Table removed");
        self.commit("RemoveTable", None);
        Ok(())
    }

    pub fn add_new_row(&mut self, table: &str) -> Result<(), StoreError> {
        self.db.table_mut(table)?.add_new_row();
        debug!(table = %table, "Blank row appended");
        self.commit("AddNewRow", None);
        Ok(())
    }

    pub fn add_row(&mut self, table: &str, values: Vec<Value>) -> Result<(), StoreError> {
        self.db.table_mut(table)?.add_row(values)?;
        debug!(table = %table, "Row appended");
        self.commit("AddRow", None);
        Ok(())
    }

    /// `row_number` counts from 1, the way clients number rows on screen. Cell updates keep
    /// 0-based indices.
    pub fn delete_row(&mut self, table: &str, row_number: i64) -> Result<(), StoreError> {
        let t = self.db.table_mut(table)?;
        let len = t.row_count();
        let out_of_range = || StoreError::IndexOutOfRange {
            index: row_number,
            len,
        };
        let index = row_number.checked_sub(1).ok_or_else(out_of_range)?;
        t.remove_row(index).map_err(|_| out_of_range())?;
        debug!(table = %table, row_number, "Row deleted");
        self.commit("DeleteRow", None);
        Ok(())
    }

    pub fn add_column(&mut self, table: &str, column: &ColumnInfo) -> Result<(), StoreError> {
        let tag = parse_type(&column.column_type)?;
        self.db.table_mut(table)?.add_column(&column.column_name, tag)?;
        info!(table = %table, column = %column.column_name, column_type = %tag, "Column added");
        self.commit("AddColumn", None);
        Ok(())
    }

    pub fn delete_column(&mut self, table: &str, column: &str) -> Result<(), StoreError> {
        self.db.table_mut(table)?.delete_column(column)?;
        info!(table = %table, column = %column, "Column deleted");
        self.commit("DeleteColumn", None);
        Ok(())
    }

    /// Returns the number of rows removed.
    pub fn remove_duplicates(&mut self, table: &str) -> Result<usize, StoreError> {
        let removed = self.db.table_mut(table)?.remove_duplicates();
        debug!(table = %table, removed, "Duplicate rows removed");
        self.commit("RemoveDuplicates", None);
        Ok(removed)
    }

    /// `Ok(false)` when `raw` does not parse as the column type; nothing changes and
    /// nobody is notified in that case.
    pub fn update_table_cell(
        &mut self,
        table: &str,
        row: i64,
        column: &str,
        raw: &str,
    ) -> Result<bool, StoreError> {
        let updated = self.db.table_mut(table)?.update_cell(row, column, raw)?;
        if updated {
            debug!(table = %table, row, column = %column, "Cell updated");
            self.commit("UpdateTableCell", None);
        } else {
            debug!(table = %table, row, column = %column, raw = %raw, "Cell value rejected");
        }
        Ok(updated)
    }

    /// Replaces schema and rows of an existing table with a client's full copy. The
    /// originator already holds that state and is not notified.
    pub fn replace_table(
        &mut self,
        table: &str,
        content: &TableSnapshot,
        originator: Option<ObserverId>,
    ) -> Result<(), StoreError> {
        self.db.table_mut(table)?.replace_content(content)?;
        info!(
            table = %table,
            rows = content.rows.len(),
            originator = ?originator.map(|id| id.to_string()),
            "Table replaced"
        );
        self.commit("ReplaceTable", originator);
        Ok(())
    }

    /// Swaps the whole directory for `snapshot` after validating all of it.
    pub fn replace_database(&mut self, snapshot: &DatabaseSnapshot) -> Result<(), StoreError> {
        self.db = Database::from_snapshot(snapshot)?;
        info!(tables = self.db.len(), "Database replaced");
        self.commit("ReplaceDatabase", None);
        Ok(())
    }

    /// Adds an observer channel and immediately sends it the current state.
    pub fn register(&mut self, sender: ObserverSender) -> ObserverId {
        let id = self.broadcaster.register(sender);
        let update = self.update("Register");
        self.broadcaster.send_to(id, update);
        id
    }

    pub fn unregister(&mut self, id: ObserverId) -> bool {
        self.broadcaster.unregister(id)
    }

    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    fn commit(&mut self, cause: &str, originator: Option<ObserverId>) {
        self.revision += 1;
        if self.broadcaster.is_empty() {
            return;
        }

        let update = self.update(cause);
        if let Some(json) = pretty_json_if_debug(update.as_ref()) {
            debug!(revision = self.revision, "Broadcasting state:\n{json}");
        }

        let report = match originator {
            Some(_) => self.broadcaster.broadcast_except(update, originator),
            None => self.broadcaster.broadcast_all(update),
        };
        debug!(
            cause,
            revision = self.revision,
            delivered = report.delivered,
            dropped = report.dropped,
            pruned = report.pruned,
            "Update broadcast"
        );
    }

    fn update(&self, cause: &str) -> Arc<DatabaseUpdate> {
        Arc::new(DatabaseUpdate {
            revision: self.revision,
            cause: cause.to_string(),
            at: Utc::now(),
            database: self.db.snapshot(),
        })
    }
}

impl Default for TableService {
    fn default() -> Self {
        Self::new(Database::new(), Broadcaster::new(64))
    }
}
