pub mod ai_sql;
pub mod cli;
pub mod config;
pub mod database;
pub mod format;
pub mod logging;
pub mod password_sanitizer;

pub use config::Config;
pub use database::{DatabaseError, PostgreSQLClient, ResultSet};
