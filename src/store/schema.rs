use crate::error::StoreError;
use tablecast_schema::{ColumnInfo, TypeTag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub tag: TypeTag,
}

impl Column {
    pub fn new(name: impl Into<String>, tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            tag,
        }
    }

    pub fn info(&self) -> ColumnInfo {
        ColumnInfo::new(self.name.clone(), self.tag)
    }
}

/// Ordered column list. Position `i` describes value `i` of every row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSchema {
    columns: Vec<Column>,
}

impl ColumnSchema {
    /// Builds a schema from wire column infos, rejecting unknown type names and repeated
    /// column names. `table` is only used for error messages.
    pub fn from_infos(table: &str, infos: &[ColumnInfo]) -> Result<Self, StoreError> {
        let mut schema = ColumnSchema::default();
        for info in infos {
            let tag = parse_type(&info.column_type)?;
            if schema.position(&info.column_name).is_some() {
                return Err(StoreError::DuplicateColumn {
                    table: table.to_string(),
                    column: info.column_name.clone(),
                });
            }
            schema.columns.push(Column::new(info.column_name.clone(), tag));
        }
        Ok(schema)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    pub fn infos(&self) -> Vec<ColumnInfo> {
        self.columns.iter().map(Column::info).collect()
    }

    pub(crate) fn push(&mut self, column: Column) {
        self.columns.push(column);
    }

    pub(crate) fn remove(&mut self, index: usize) -> Column {
        self.columns.remove(index)
    }
}

/// Maps a wire type name onto the closed tag set; anything else is a hard rejection.
pub fn parse_type(name: &str) -> Result<TypeTag, StoreError> {
    name.parse()
        .map_err(|_| StoreError::UnknownType(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_infos_keeps_order_and_rejects_bad_input() {
        let schema = ColumnSchema::from_infos(
            "t",
            &[
                ColumnInfo::new("b", TypeTag::Integer),
                ColumnInfo::new("a", TypeTag::ComplexReal),
            ],
        )
        .unwrap();
        assert_eq!(schema.position("b"), Some(0));
        assert_eq!(schema.position("a"), Some(1));
        assert_eq!(schema.get(1).map(|c| c.tag), Some(TypeTag::ComplexReal));

        let dup = ColumnSchema::from_infos(
            "t",
            &[
                ColumnInfo::new("a", TypeTag::String),
                ColumnInfo::new("a", TypeTag::Char),
            ],
        );
        assert_eq!(
            dup,
            Err(StoreError::DuplicateColumn {
                table: "t".into(),
                column: "a".into()
            })
        );

        let unknown = ColumnSchema::from_infos(
            "t",
            &[ColumnInfo {
                column_name: "a".into(),
                column_type: "System.Int32".into(),
            }],
        );
        assert_eq!(unknown, Err(StoreError::UnknownType("System.Int32".into())));
    }
}
