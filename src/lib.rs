//! Signup/login/logout over server-side cookie sessions, plus topic and
//! question CRUD, backed by SQLite.

pub mod auth;
pub mod configuration;
pub mod db;
pub mod server;
pub mod telemetry;
