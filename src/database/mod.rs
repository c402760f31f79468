pub mod discussions;
pub mod issues;
pub mod labels;
pub mod manager;
pub mod models;
pub mod projects;
pub mod workspaces;

pub use labels::PgLabelStore;
pub use manager::{DatabaseError, DatabaseManager};
