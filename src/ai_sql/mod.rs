//! AI-powered SQL generation from natural language
//!
//! A schema snapshot and the user's question are turned into a completion
//! prompt; the returned text is shown as candidate SQL and only runs after an
//! explicit confirmation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use aisql::ai_sql::{InteractiveMode, OpenAiCompletionClient, SchemaExtractor};
//!
//! let schema = SchemaExtractor::extract(&database).await?;
//! let client = OpenAiCompletionClient::new(api_key, settings)?;
//! let mut session = InteractiveMode::new(stdin, stdout, &schema, &client, &database);
//! session.run(std::future::pending()).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod prompt;
pub mod schema;
pub mod ui;

pub use client::{CompletionProvider, OpenAiCompletionClient};
pub use config::CompletionSettings;
pub use error::{AiError, AiResult, CompletionError};
pub use prompt::PromptGenerator;
pub use schema::{DatabaseSchema, SchemaExtractor, SchemaField, TableSchema};
pub use ui::{InteractiveMode, LoopExit};
