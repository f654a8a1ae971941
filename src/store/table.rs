use super::coerce::coerce;
use super::schema::{Column, ColumnSchema};
use crate::error::StoreError;
use ahash::AHashSet;
use tablecast_schema::{RowView, TableSnapshot, TypeTag, Value};

/// A named relation. Every row holds exactly one value per schema column, in schema order,
/// and each value is either `Null` or of the column's declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    schema: ColumnSchema,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: impl Into<String>, schema: ColumnSchema) -> Self {
        Self {
            name: name.into(),
            schema,
            rows: Vec::new(),
        }
    }

    /// Rebuilds a table from a client payload. Nothing is returned unless every row fits.
    pub fn from_snapshot(snapshot: &TableSnapshot) -> Result<Self, StoreError> {
        let schema = ColumnSchema::from_infos(&snapshot.name, &snapshot.columns)?;
        for row in &snapshot.rows {
            check_row(&schema, row)?;
        }
        Ok(Self {
            name: snapshot.name.clone(),
            schema,
            rows: snapshot.rows.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn add_column(&mut self, name: &str, tag: TypeTag) -> Result<(), StoreError> {
        if self.schema.position(name).is_some() {
            return Err(StoreError::DuplicateColumn {
                table: self.name.clone(),
                column: name.to_string(),
            });
        }
        self.schema.push(Column::new(name, tag));
        for row in &mut self.rows {
            row.push(Value::Null);
        }
        Ok(())
    }

    pub fn delete_column(&mut self, name: &str) -> Result<(), StoreError> {
        let (index, _) = self.column(name)?;
        self.schema.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }
        Ok(())
    }

    /// Appends a fully typed row. `Null` is accepted in any column.
    pub fn add_row(&mut self, values: Vec<Value>) -> Result<(), StoreError> {
        check_row(&self.schema, &values)?;
        self.rows.push(values);
        Ok(())
    }

    /// Appends a row of `Null`s without any type check.
    pub fn add_new_row(&mut self) {
        self.rows.push(vec![Value::Null; self.schema.len()]);
    }

    /// Removes the row at `index`; rows below it shift up by one.
    pub fn remove_row(&mut self, index: i64) -> Result<(), StoreError> {
        let index = self.row_index(index)?;
        self.rows.remove(index);
        Ok(())
    }

    /// Keeps the first row of every distinct value sequence, in original order.
    /// Returns how many rows were dropped.
    pub fn remove_duplicates(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen: AHashSet<Vec<Value>> = AHashSet::with_capacity(before);
        self.rows.retain(|row| seen.insert(row.clone()));
        before - self.rows.len()
    }

    /// Coerces `raw` into the column's type and stores it.
    ///
    /// `Ok(false)` is the soft failure: the text does not fit the type and the cell keeps
    /// its previous value. Unknown columns and bad indices are real errors.
    pub fn update_cell(&mut self, row: i64, column: &str, raw: &str) -> Result<bool, StoreError> {
        let (col, tag) = self.column(column)?;
        let row = self.row_index(row)?;
        match coerce(tag, raw) {
            Some(value) => {
                self.rows[row][col] = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Swaps schema and rows for the content of `snapshot`, keeping this table's name.
    pub fn replace_content(&mut self, snapshot: &TableSnapshot) -> Result<(), StoreError> {
        let schema = ColumnSchema::from_infos(&self.name, &snapshot.columns)?;
        for row in &snapshot.rows {
            check_row(&schema, row)?;
        }
        self.schema = schema;
        self.rows = snapshot.rows.clone();
        Ok(())
    }

    pub fn row_views(&self) -> Vec<RowView> {
        self.rows
            .iter()
            .map(|row| {
                RowView(
                    self.schema
                        .iter()
                        .zip(row)
                        .map(|(column, value)| (column.name.clone(), value.clone()))
                        .collect(),
                )
            })
            .collect()
    }

    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            name: self.name.clone(),
            columns: self.schema.infos(),
            rows: self.rows.clone(),
        }
    }

    fn column(&self, name: &str) -> Result<(usize, TypeTag), StoreError> {
        self.schema
            .iter()
            .enumerate()
            .find(|(_, c)| c.name == name)
            .map(|(i, c)| (i, c.tag))
            .ok_or_else(|| StoreError::UnknownColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    fn row_index(&self, index: i64) -> Result<usize, StoreError> {
        usize::try_from(index)
            .ok()
            .filter(|i| *i < self.rows.len())
            .ok_or(StoreError::IndexOutOfRange {
                index,
                len: self.rows.len(),
            })
    }
}

fn check_row(schema: &ColumnSchema, values: &[Value]) -> Result<(), StoreError> {
    if values.len() != schema.len() {
        return Err(StoreError::ArityMismatch {
            expected: schema.len(),
            actual: values.len(),
        });
    }
    for (column, value) in schema.iter().zip(values) {
        match value.type_tag() {
            Some(actual) if actual != column.tag => {
                return Err(StoreError::TypeMismatch {
                    column: column.name.clone(),
                    expected: column.tag,
                    actual,
                });
            }
            _ => {}
        }
        if !value.is_finite() {
            return Err(StoreError::NonFiniteReal {
                column: column.name.clone(),
            });
        }
    }
    Ok(())
}
