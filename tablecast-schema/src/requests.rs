use crate::table::ColumnInfo;
use crate::value::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddTableRequest {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddRowRequest {
    pub values: Vec<Value>,
}

/// `value` is raw text; the server coerces it into the column's declared type.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateCellRequest {
    pub row: i64,
    pub column: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct UpdateCellResponse {
    pub success: bool,
}
