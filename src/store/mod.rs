//! In-memory table store.
//!
//! Layout:
//! - `schema.rs`: ordered column schema
//! - `coerce.rs`: text → `Value` conversion per column type
//! - `table.rs`: one table and its row/column mutations
//! - `database.rs`: the table directory

pub mod coerce;
pub mod database;
pub mod schema;
pub mod table;

pub use database::Database;
pub use schema::{Column, ColumnSchema};
pub use table::Table;
