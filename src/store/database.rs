use super::schema::ColumnSchema;
use super::table::Table;
use crate::error::StoreError;
use tablecast_schema::{ColumnInfo, DatabaseSnapshot};

/// Directory of tables keyed by unique name, kept in creation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Database {
    tables: Vec<Table>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every table in `snapshot` and builds a new directory from it.
    pub fn from_snapshot(snapshot: &DatabaseSnapshot) -> Result<Self, StoreError> {
        let mut db = Database::new();
        for table in &snapshot.tables {
            if db.find(&table.name).is_some() {
                return Err(StoreError::DuplicateTable(table.name.clone()));
            }
            db.tables.push(Table::from_snapshot(table)?);
        }
        Ok(db)
    }

    pub fn add_table(&mut self, name: &str, columns: &[ColumnInfo]) -> Result<(), StoreError> {
        if self.find(name).is_some() {
            return Err(StoreError::DuplicateTable(name.to_string()));
        }
        let schema = ColumnSchema::from_infos(name, columns)?;
        self.tables.push(Table::new(name, schema));
        Ok(())
    }

    pub fn remove_table(&mut self, name: &str) -> Result<(), StoreError> {
        let index = self
            .find(name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))?;
        self.tables.remove(index);
        Ok(())
    }

    pub fn table(&self, name: &str) -> Result<&Table, StoreError> {
        self.find(name)
            .map(|i| &self.tables[i])
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
    }

    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table, StoreError> {
        match self.find(name) {
            Some(i) => Ok(&mut self.tables[i]),
            None => Err(StoreError::UnknownTable(name.to_string())),
        }
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn snapshot(&self) -> DatabaseSnapshot {
        DatabaseSnapshot {
            tables: self.tables.iter().map(Table::snapshot).collect(),
        }
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.tables.iter().position(|t| t.name() == name)
    }
}
