//! PostgreSQL access: connection, schema metadata and query execution
use async_trait::async_trait;
use sqlx::postgres::{PgColumn, PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, Executor, Row, TypeInfo, ValueRef};
use thiserror::Error;
use tracing::debug;

/// Column metadata for every table outside the system schemas, in the
/// server's natural order.
const COLUMN_METADATA_QUERY: &str = r#"
    select table_name::text, column_name::text, data_type::text
    from INFORMATION_SCHEMA.COLUMNS
    where table_schema != 'information_schema' and table_schema != 'pg_catalog'
"#;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Unable to format PostgreSQL type '{type_name}' in column '{column}': {message}")]
    Decode {
        column: String,
        type_name: String,
        message: String,
    },

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),
}

/// One raw metadata row: (table, column, data type)
pub type ColumnRow = (String, String, String);

/// Query results with every cell rendered to text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }
}

/// Source of table/column metadata
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn get_column_metadata(&self) -> Result<Vec<ColumnRow>, DatabaseError>;
}

/// Runs arbitrary SQL text and returns rendered rows
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute_query(&self, sql: &str) -> Result<ResultSet, DatabaseError>;
}

/// PostgreSQL database client implementation
pub struct PostgreSQLClient {
    pool: PgPool,
}

impl PostgreSQLClient {
    /// Open a single-connection pool for the given connection string
    pub async fn connect(connection_string: &str) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .min_connections(0)
            .connect(connection_string)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Column names of a statement that returned no rows
    ///
    /// Statements the server cannot describe (several statements in one
    /// string, for instance) yield no columns.
    async fn describe_columns(&self, sql: &str) -> Vec<String> {
        match (&self.pool).describe(sql).await {
            Ok(describe) => column_names(describe.columns()),
            Err(e) => {
                debug!("[PostgreSQLClient::describe_columns] No column names available: {}", e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl MetadataProvider for PostgreSQLClient {
    async fn get_column_metadata(&self) -> Result<Vec<ColumnRow>, DatabaseError> {
        debug!("[PostgreSQLClient::get_column_metadata] Reading information_schema.columns");

        let rows = sqlx::query(COLUMN_METADATA_QUERY)
            .fetch_all(&self.pool)
            .await?;

        let columns = collect_column_rows(rows.iter().map(decode_column_row))?;

        debug!(
            "[PostgreSQLClient::get_column_metadata] Read {} column rows",
            columns.len()
        );
        Ok(columns)
    }
}

fn decode_column_row(row: &PgRow) -> Result<ColumnRow, sqlx::Error> {
    Ok((row.try_get(0)?, row.try_get(1)?, row.try_get(2)?))
}

/// Any undecodable row fails the whole snapshot
fn collect_column_rows<I>(rows: I) -> Result<Vec<ColumnRow>, DatabaseError>
where
    I: IntoIterator<Item = Result<ColumnRow, sqlx::Error>>,
{
    rows.into_iter()
        .map(|row| row.map_err(DatabaseError::from))
        .collect()
}

#[async_trait]
impl QueryExecutor for PostgreSQLClient {
    async fn execute_query(&self, sql: &str) -> Result<ResultSet, DatabaseError> {
        debug!("[PostgreSQLClient::execute_query] Executing query");

        // Simple query protocol: every value arrives in its text form
        let rows = sqlx::raw_sql(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let Some(first_row) = rows.first() else {
            return Ok(ResultSet::new(self.describe_columns(sql).await, Vec::new()));
        };

        let columns = column_names(first_row.columns());

        let mut results = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut string_row = Vec::with_capacity(columns.len());
            for i in 0..row.len() {
                string_row.push(format_postgresql_value(row, i)?);
            }
            results.push(string_row);
        }

        debug!(
            "[PostgreSQLClient::execute_query] Query completed with {} rows",
            results.len()
        );
        Ok(ResultSet::new(columns, results))
    }
}

fn column_names(columns: &[PgColumn]) -> Vec<String> {
    columns
        .iter()
        .map(|column| column.name().to_string())
        .collect()
}

/// Format a PostgreSQL value to string representation
fn format_postgresql_value(row: &PgRow, column_index: usize) -> Result<String, DatabaseError> {
    let column = row.column(column_index);
    let type_name = column.type_info().name();

    let decode_error = |e: sqlx::Error| DatabaseError::Decode {
        column: column.name().to_string(),
        type_name: type_name.to_string(),
        message: e.to_string(),
    };

    if row.try_get_raw(column_index).map_err(decode_error)?.is_null() {
        return Ok(render_text_value(type_name, None));
    }

    let text = row
        .try_get_unchecked::<String, _>(column_index)
        .map_err(decode_error)?;
    Ok(render_text_value(type_name, Some(&text)))
}

/// Turn the server's text form of a value into a table cell
fn render_text_value(type_name: &str, text: Option<&str>) -> String {
    match (type_name, text) {
        (_, None) => String::new(),
        ("BOOL", Some("t")) => "true".to_string(),
        ("BOOL", Some("f")) => "false".to_string(),
        (_, Some(text)) => text.to_string(),
    }
}
