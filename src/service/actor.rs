use super::facade::TableService;
use crate::error::{StoreError, TablecastError};
use crate::store::Database;
use crate::sync::{Broadcaster, ObserverId, ObserverReceiver};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use tablecast_schema::{ColumnInfo, DatabaseSnapshot, RowView, TableSnapshot, Value};
use tracing::info;

type Reply<T> = RpcReplyPort<Result<T, StoreError>>;

#[derive(Debug)]
pub enum StoreMessage {
    /// List table names in creation order.
    GetTables(RpcReplyPort<Vec<String>>),

    /// Schema of one table.
    GetColumnsInfo(String, Reply<Vec<ColumnInfo>>),

    /// Rows of one table keyed by column name.
    DisplayTable(String, Reply<Vec<RowView>>),

    /// Full copy of the current state.
    Snapshot(RpcReplyPort<DatabaseSnapshot>),

    CreateDatabase(RpcReplyPort<()>),
    AddTable(String, Vec<ColumnInfo>, Reply<()>),
    RemoveTable(String, Reply<()>),
    AddNewRow(String, Reply<()>),
    AddRow(String, Vec<Value>, Reply<()>),
    /// Table and 1-based row number.
    DeleteRow(String, i64, Reply<()>),
    AddColumn(String, ColumnInfo, Reply<()>),
    DeleteColumn(String, String, Reply<()>),
    RemoveDuplicates(String, Reply<usize>),

    /// Table, row index, column, raw text. `Ok(false)` is a rejected value.
    UpdateTableCell(String, i64, String, String, Reply<bool>),

    /// Whole-table replacement; the optional observer is the originator and is not notified.
    ReplaceTable(String, TableSnapshot, Option<ObserverId>, Reply<()>),

    ReplaceDatabase(DatabaseSnapshot, Reply<()>),

    /// Open a new observer channel; the current state is already queued on it.
    Register(RpcReplyPort<(ObserverId, ObserverReceiver)>),

    /// Returns whether the observer was registered.
    Unregister(ObserverId, RpcReplyPort<bool>),
}

/// Cloneable entry point to the store. All calls are serialized through one actor, so every
/// mutation is atomic with respect to every other call.
#[derive(Clone)]
pub struct StoreHandle {
    actor: ActorRef<StoreMessage>,
}

fn rpc_failed(op: &str, e: impl std::fmt::Display) -> TablecastError {
    TablecastError::RactorError(format!("StoreActor {op} RPC failed: {e}"))
}

impl StoreHandle {
    pub async fn get_tables(&self) -> Result<Vec<String>, TablecastError> {
        ractor::call!(self.actor, StoreMessage::GetTables).map_err(|e| rpc_failed("GetTables", e))
    }

    pub async fn get_columns_info(&self, table: &str) -> Result<Vec<ColumnInfo>, TablecastError> {
        Ok(
            ractor::call!(self.actor, StoreMessage::GetColumnsInfo, table.to_string())
                .map_err(|e| rpc_failed("GetColumnsInfo", e))??,
        )
    }

    pub async fn display_table(&self, table: &str) -> Result<Vec<RowView>, TablecastError> {
        Ok(
            ractor::call!(self.actor, StoreMessage::DisplayTable, table.to_string())
                .map_err(|e| rpc_failed("DisplayTable", e))??,
        )
    }

    pub async fn snapshot(&self) -> Result<DatabaseSnapshot, TablecastError> {
        ractor::call!(self.actor, StoreMessage::Snapshot).map_err(|e| rpc_failed("Snapshot", e))
    }

    pub async fn create_database(&self) -> Result<(), TablecastError> {
        ractor::call!(self.actor, StoreMessage::CreateDatabase)
            .map_err(|e| rpc_failed("CreateDatabase", e))
    }

    pub async fn add_table(
        &self,
        name: String,
        columns: Vec<ColumnInfo>,
    ) -> Result<(), TablecastError> {
        Ok(ractor::call!(self.actor, StoreMessage::AddTable, name, columns)
            .map_err(|e| rpc_failed("AddTable", e))??)
    }

    pub async fn remove_table(&self, name: &str) -> Result<(), TablecastError> {
        Ok(
            ractor::call!(self.actor, StoreMessage::RemoveTable, name.to_string())
                .map_err(|e| rpc_failed("RemoveTable", e))??,
        )
    }

    pub async fn add_new_row(&self, table: &str) -> Result<(), TablecastError> {
        Ok(
            ractor::call!(self.actor, StoreMessage::AddNewRow, table.to_string())
                .map_err(|e| rpc_failed("AddNewRow", e))??,
        )
    }

    pub async fn add_row(&self, table: &str, values: Vec<Value>) -> Result<(), TablecastError> {
        Ok(
            ractor::call!(self.actor, StoreMessage::AddRow, table.to_string(), values)
                .map_err(|e| rpc_failed("AddRow", e))??,
        )
    }

    pub async fn delete_row(&self, table: &str, row_number: i64) -> Result<(), TablecastError> {
        Ok(
            ractor::call!(self.actor, StoreMessage::DeleteRow, table.to_string(), row_number)
                .map_err(|e| rpc_failed("DeleteRow", e))??,
        )
    }

    pub async fn add_column(&self, table: &str, column: ColumnInfo) -> Result<(), TablecastError> {
        Ok(
            ractor::call!(self.actor, StoreMessage::AddColumn, table.to_string(), column)
                .map_err(|e| rpc_failed("AddColumn", e))??,
        )
    }

    pub async fn delete_column(&self, table: &str, column: &str) -> Result<(), TablecastError> {
        Ok(ractor::call!(
            self.actor,
            StoreMessage::DeleteColumn,
            table.to_string(),
            column.to_string()
        )
        .map_err(|e| rpc_failed("DeleteColumn", e))??)
    }

    pub async fn remove_duplicates(&self, table: &str) -> Result<usize, TablecastError> {
        Ok(
            ractor::call!(self.actor, StoreMessage::RemoveDuplicates, table.to_string())
                .map_err(|e| rpc_failed("RemoveDuplicates", e))??,
        )
    }

    pub async fn update_table_cell(
        &self,
        table: &str,
        row: i64,
        column: &str,
        raw: &str,
    ) -> Result<bool, TablecastError> {
        Ok(ractor::call!(
            self.actor,
            StoreMessage::UpdateTableCell,
            table.to_string(),
            row,
            column.to_string(),
            raw.to_string()
        )
        .map_err(|e| rpc_failed("UpdateTableCell", e))??)
    }

    pub async fn replace_table(
        &self,
        table: &str,
        content: TableSnapshot,
        originator: Option<ObserverId>,
    ) -> Result<(), TablecastError> {
        Ok(ractor::call!(
            self.actor,
            StoreMessage::ReplaceTable,
            table.to_string(),
            content,
            originator
        )
        .map_err(|e| rpc_failed("ReplaceTable", e))??)
    }

    pub async fn replace_database(&self, snapshot: DatabaseSnapshot) -> Result<(), TablecastError> {
        Ok(
            ractor::call!(self.actor, StoreMessage::ReplaceDatabase, snapshot)
                .map_err(|e| rpc_failed("ReplaceDatabase", e))??,
        )
    }

    /// Registers a new observer. The receiver already holds the current state.
    pub async fn register(&self) -> Result<(ObserverId, ObserverReceiver), TablecastError> {
        ractor::call!(self.actor, StoreMessage::Register).map_err(|e| rpc_failed("Register", e))
    }

    pub async fn unregister(&self, id: ObserverId) -> Result<(), TablecastError> {
        let removed = ractor::call!(self.actor, StoreMessage::Unregister, id)
            .map_err(|e| rpc_failed("Unregister", e))?;
        if removed {
            Ok(())
        } else {
            Err(TablecastError::UnknownObserver(id))
        }
    }

    pub fn stop(&self) {
        self.actor.stop(None);
    }
}

struct StoreActor;

#[ractor::async_trait]
impl Actor for StoreActor {
    type Msg = StoreMessage;
    type State = TableService;
    type Arguments = usize;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        observer_queue_capacity: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!(observer_queue_capacity, "StoreActor initialized");
        Ok(TableService::new(
            Database::new(),
            Broadcaster::new(observer_queue_capacity),
        ))
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        svc: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            StoreMessage::GetTables(reply) => {
                let _ = reply.send(svc.get_tables());
            }
            StoreMessage::GetColumnsInfo(table, reply) => {
                let _ = reply.send(svc.get_columns_info(&table));
            }
            StoreMessage::DisplayTable(table, reply) => {
                let _ = reply.send(svc.display_table(&table));
            }
            StoreMessage::Snapshot(reply) => {
                let _ = reply.send(svc.snapshot());
            }
            StoreMessage::CreateDatabase(reply) => {
                svc.create_database();
                let _ = reply.send(());
            }
            StoreMessage::AddTable(name, columns, reply) => {
                let _ = reply.send(svc.add_table(&name, &columns));
            }
            StoreMessage::RemoveTable(name, reply) => {
                let _ = reply.send(svc.remove_table(&name));
            }
            StoreMessage::AddNewRow(table, reply) => {
                let _ = reply.send(svc.add_new_row(&table));
            }
            StoreMessage::AddRow(table, values, reply) => {
                let _ = reply.send(svc.add_row(&table, values));
            }
            StoreMessage::DeleteRow(table, row_number, reply) => {
                let _ = reply.send(svc.delete_row(&table, row_number));
            }
            StoreMessage::AddColumn(table, column, reply) => {
                let _ = reply.send(svc.add_column(&table, &column));
            }
            StoreMessage::DeleteColumn(table, column, reply) => {
                let _ = reply.send(svc.delete_column(&table, &column));
            }
            StoreMessage::RemoveDuplicates(table, reply) => {
                let _ = reply.send(svc.remove_duplicates(&table));
            }
            StoreMessage::UpdateTableCell(table, row, column, raw, reply) => {
                let _ = reply.send(svc.update_table_cell(&table, row, &column, &raw));
            }
            StoreMessage::ReplaceTable(table, content, originator, reply) => {
                let _ = reply.send(svc.replace_table(&table, &content, originator));
            }
            StoreMessage::ReplaceDatabase(snapshot, reply) => {
                let _ = reply.send(svc.replace_database(&snapshot));
            }
            StoreMessage::Register(reply) => {
                let (tx, rx) = svc.broadcaster().channel();
                let id = svc.register(tx);
                // The caller may have given up already; drop the observer again in that case.
                if reply.send((id, rx)).is_err() {
                    svc.unregister(id);
                }
            }
            StoreMessage::Unregister(id, reply) => {
                let _ = reply.send(svc.unregister(id));
            }
        }
        Ok(())
    }
}

/// Spawns the store actor with an empty database.
pub async fn spawn(observer_queue_capacity: usize) -> StoreHandle {
    let (actor, _jh) = ractor::Actor::spawn(None, StoreActor, observer_queue_capacity)
        .await
        .expect("failed to spawn StoreActor");

    StoreHandle { actor }
}
