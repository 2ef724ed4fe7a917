pub mod app;
pub mod context;
pub mod error;
pub mod extract;
pub mod routes;
