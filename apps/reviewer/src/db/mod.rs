//! Local SQLite storage for review and vocabulary state.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{SharedRepository, SqliteRepository};
