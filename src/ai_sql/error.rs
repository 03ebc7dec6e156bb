//! Error types for AI SQL generation

use crate::database::DatabaseError;
use thiserror::Error;

/// Result type for AI SQL operations
pub type AiResult<T> = Result<T, AiError>;

/// Errors raised while talking to the completion service
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Failed to parse completion response: {0}")]
    Parse(String),

    #[error("No response returned")]
    EmptyResponse,
}

/// Errors that can occur while running the tool
///
/// Only the startup kinds are fatal; everything else aborts the current
/// question and the session carries on.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Configuration error: {0}")]
    StartupConfig(String),

    #[error("Failed to load database schema: {0}")]
    SchemaLoad(#[source] DatabaseError),

    #[error("Failed to read input: {0}")]
    InputRead(#[from] std::io::Error),

    #[error("Completion request failed: {0}")]
    CompletionRequest(#[from] CompletionError),

    #[error("Query failed: {0}")]
    QueryExecution(#[source] DatabaseError),

    #[error("Failed to format results: {0}")]
    ResultFormatting(String),
}

impl AiError {
    /// Whether the error should terminate the process
    pub fn is_fatal(&self) -> bool {
        matches!(self, AiError::StartupConfig(_) | AiError::SchemaLoad(_))
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            AiError::StartupConfig(msg) => {
                format!("Configuration issue: {}. Check your config file or command-line flags.", msg)
            }
            AiError::SchemaLoad(e) => {
                format!("Schema extraction failed: {}. Ensure the connection string is correct.", e)
            }
            AiError::CompletionRequest(CompletionError::Network(msg)) => {
                format!("Network error: {}. Check your internet connection.", msg)
            }
            _ => self.to_string(),
        }
    }
}

/// Execution failures become query errors; rows that cannot be rendered are
/// formatting errors.
impl From<DatabaseError> for AiError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::Decode { .. } => AiError::ResultFormatting(error.to_string()),
            other => AiError::QueryExecution(other),
        }
    }
}
