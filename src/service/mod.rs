//! Service facade over the store, and the actor that serializes access to it.

pub mod actor;
pub mod facade;

pub use actor::{StoreHandle, StoreMessage, spawn};
pub use facade::TableService;
