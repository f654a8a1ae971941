pub mod config;
pub mod error;
pub mod server;
pub mod service;
pub mod store;
pub mod sync;
pub mod utils;

pub use error::{StoreError, TablecastError};
pub use server::router::{TablecastState, tablecast_router};
pub use service::StoreHandle;
