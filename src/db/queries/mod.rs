pub mod questions;
pub mod sessions;
pub mod topics;
pub mod users;
