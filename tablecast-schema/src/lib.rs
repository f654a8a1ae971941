pub mod notification;
pub mod requests;
pub mod table;
pub mod value;

pub use notification::{DatabaseUpdate, Registered};
pub use requests::{AddRowRequest, AddTableRequest, UpdateCellRequest, UpdateCellResponse};
pub use table::{ColumnInfo, DatabaseSnapshot, RowView, TableSnapshot};
pub use value::{TypeTag, UnknownTypeName, Value};
