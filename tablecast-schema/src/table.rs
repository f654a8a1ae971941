use crate::value::{TypeTag, Value};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One schema entry as it crosses the wire. `column_type` stays textual so the server can
/// reject unknown names itself instead of failing inside the JSON extractor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub column_name: String,
    pub column_type: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, tag: TypeTag) -> Self {
        Self {
            column_name: name.into(),
            column_type: tag.as_str().to_string(),
        }
    }
}

/// A row keyed by column name, in schema order.
///
/// Serialized as a JSON object whose key order follows the schema.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowView(pub Vec<(String, Value)>);

impl RowView {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}

impl Serialize for RowView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RowView {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = RowView;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column name to cell value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RowView, A::Error> {
                let mut cells = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    cells.push((name, value));
                }
                Ok(RowView(cells))
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// Full content of one table. Rows are positional and line up with `columns`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TableSnapshot {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

/// Full content of the database, tables in creation order.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct DatabaseSnapshot {
    #[serde(default)]
    pub tables: Vec<TableSnapshot>,
}

impl DatabaseSnapshot {
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    pub fn table(&self, name: &str) -> Option<&TableSnapshot> {
        self.tables.iter().find(|t| t.name == name)
    }
}
