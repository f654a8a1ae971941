pub mod database;
pub mod observers;
pub mod tables;
