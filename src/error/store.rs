use tablecast_schema::TypeTag;
use thiserror::Error as ThisError;

/// Failure classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
}

/// Domain failures of the table store. All of them are detected before anything is mutated.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum StoreError {
    #[error("table `{0}` already exists")]
    DuplicateTable(String),

    #[error("table `{0}` does not exist")]
    UnknownTable(String),

    #[error("column `{column}` already exists in table `{table}`")]
    DuplicateColumn { table: String, column: String },

    #[error("column `{column}` does not exist in table `{table}`")]
    UnknownColumn { table: String, column: String },

    #[error("expected {expected} values, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("invalid type for column `{column}`: expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: TypeTag,
        actual: TypeTag,
    },

    #[error("column `{column}` only holds finite numbers")]
    NonFiniteReal { column: String },

    #[error("row index {index} out of range for {len} rows")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("unknown column type `{0}`")]
    UnknownType(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::UnknownTable(_) | StoreError::UnknownColumn { .. } => ErrorKind::NotFound,
            StoreError::DuplicateTable(_) | StoreError::DuplicateColumn { .. } => {
                ErrorKind::Conflict
            }
            StoreError::ArityMismatch { .. }
            | StoreError::TypeMismatch { .. }
            | StoreError::NonFiniteReal { .. }
            | StoreError::IndexOutOfRange { .. }
            | StoreError::UnknownType(_) => ErrorKind::Validation,
        }
    }

    /// Stable machine-readable code for the JSON error body.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::DuplicateTable(_) => "DUPLICATE_TABLE",
            StoreError::UnknownTable(_) => "UNKNOWN_TABLE",
            StoreError::DuplicateColumn { .. } => "DUPLICATE_COLUMN",
            StoreError::UnknownColumn { .. } => "UNKNOWN_COLUMN",
            StoreError::ArityMismatch { .. } => "ARITY_MISMATCH",
            StoreError::TypeMismatch { .. } => "TYPE_MISMATCH",
            StoreError::NonFiniteReal { .. } => "NON_FINITE_REAL",
            StoreError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            StoreError::UnknownType(_) => "UNKNOWN_TYPE",
        }
    }
}
