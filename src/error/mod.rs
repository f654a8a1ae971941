mod store;
mod tablecast;

pub use store::{ErrorKind, StoreError};
pub use tablecast::{ApiErrorBody, ApiErrorObject, TablecastError};
