pub mod access_log;
pub mod extract;
pub mod router;
pub mod routes;
