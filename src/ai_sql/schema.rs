//! Schema snapshot used as context for SQL generation
//!
//! The snapshot is read once at startup from the metadata provider and kept
//! read-only for the rest of the session.

use crate::ai_sql::error::{AiError, AiResult};
use crate::database::{ColumnRow, MetadataProvider};
use std::collections::HashMap;
use tracing::{debug, info};

/// A single column and its declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub column: String,
    pub datatype: String,
}

/// Columns of one table, in database enumeration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub fields: Vec<SchemaField>,
}

/// Table name to columns, iterated in the order tables were first seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseSchema {
    tables: Vec<TableSchema>,
    index: HashMap<String, usize>,
}

impl DatabaseSchema {
    /// Group (table, column, datatype) rows by table, keeping row order
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = ColumnRow>,
    {
        let mut schema = Self::default();
        for (table, column, datatype) in rows {
            schema.push_field(table, SchemaField { column, datatype });
        }
        schema
    }

    fn push_field(&mut self, table: String, field: SchemaField) {
        let position = match self.index.get(&table) {
            Some(&position) => position,
            None => {
                self.tables.push(TableSchema {
                    name: table.clone(),
                    fields: Vec::new(),
                });
                self.index.insert(table, self.tables.len() - 1);
                self.tables.len() - 1
            }
        };
        self.tables[position].fields.push(field);
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Reads the schema snapshot from a database
pub struct SchemaExtractor;

impl SchemaExtractor {
    /// Run the metadata query and build the snapshot
    pub async fn extract(provider: &dyn MetadataProvider) -> AiResult<DatabaseSchema> {
        info!("Extracting schema snapshot");

        let rows = provider
            .get_column_metadata()
            .await
            .map_err(AiError::SchemaLoad)?;

        let schema = DatabaseSchema::from_rows(rows);
        debug!("Schema snapshot has {} tables", schema.len());

        Ok(schema)
    }
}
