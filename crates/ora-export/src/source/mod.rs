//! Oracle source database operations over ODBC.
//!
//! The pool connects through the ODBC driver manager, so an Oracle ODBC
//! driver (for example the Instant Client one) must be installed and
//! registered. ODBC calls are blocking; a single mutex serializes them
//! behind the async trait, matching the batch execution model where one
//! table is fully processed before the next.

mod types;

pub use types::*;

use crate::config::DatabaseConfig;
use crate::error::{ExportError, Result};
use crate::value::SqlValue;
use async_trait::async_trait;
use odbc_api::{
    buffers::TextRowSet, ConnectionOptions, Cursor, DataType, Environment, ResultSetMetadata,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Capabilities the export pipeline needs from a source database.
#[async_trait]
pub trait SourcePool: Send + Sync {
    /// Partition a table's columns into primary-key, non-nullable and
    /// nullable sets. Table-name matching is case-insensitive.
    async fn classify(&self, schema: &str, table: &str) -> Result<ColumnClassification>;

    /// Fetch the full current contents of a table as typed rows.
    async fn fetch_all(&self, schema: &str, table: &str) -> Result<RowSet>;

    /// Fetch the CREATE statement for a table from the database's own
    /// metadata API.
    async fn ddl_for(&self, schema: &str, table: &str) -> Result<String>;
}

/// Escape a SQL string literal value to prevent SQL injection.
/// Doubles single quotes: `O'Brien` -> `O''Brien`
fn escape_sql_string(s: &str) -> String {
    s.replace('\'', "''")
}

/// Oracle source pool over ODBC.
pub struct OracleOdbcPool {
    env: Arc<Environment>,
    connection_string: String,
    /// Mutex to serialize ODBC operations (ODBC is not thread-safe)
    conn_mutex: Mutex<()>,
}

impl OracleOdbcPool {
    /// Create a new Oracle pool and verify connectivity.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Connection`] if the ODBC environment cannot
    /// be created, the driver is missing, or the test query fails. This is
    /// the run-aborting failure mode: nothing else is attempted when the
    /// database is unreachable.
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let env = Environment::new().map_err(|e| {
            ExportError::Connection(format!(
                "Failed to create ODBC environment: {}. \
                 Make sure an Oracle ODBC driver is installed and registered \
                 with the driver manager.",
                e
            ))
        })?;

        let connection_string = config.connection_string();
        debug!(
            "ODBC connection string (credentials hidden): Driver={{{}}};DBQ=//{}:{}/{};...",
            config.driver, config.host, config.port, config.service
        );

        // Test connection - scoped so conn is dropped before env moves
        {
            let conn = env
                .connect_with_connection_string(&connection_string, ConnectionOptions::default())
                .map_err(|e| {
                    ExportError::Connection(format!(
                        "Failed to connect to Oracle via ODBC: {}. \
                         Check host, service name and credentials.",
                        e
                    ))
                })?;

            conn.execute("SELECT 1 FROM dual", ())
                .map_err(|e| ExportError::Connection(format!("Connection test failed: {}", e)))?;
        }

        info!(
            "Connected to Oracle via ODBC: {}:{}/{}",
            config.host, config.port, config.service
        );

        Ok(Self {
            env: Arc::new(env),
            connection_string,
            conn_mutex: Mutex::new(()),
        })
    }

    /// Get a new ODBC connection.
    fn connect(&self) -> std::result::Result<odbc_api::Connection<'_>, String> {
        self.env
            .connect_with_connection_string(&self.connection_string, ConnectionOptions::default())
            .map_err(|e| format!("ODBC connection failed: {}", e))
    }

    /// Execute a query on an existing connection and return all cells as
    /// text. NULL cells come back as `None`.
    fn query_strings(
        conn: &odbc_api::Connection<'_>,
        sql: &str,
        max_str_len: usize,
    ) -> std::result::Result<Vec<Vec<Option<String>>>, String> {
        let mut rows = Vec::new();

        if let Some(mut cursor) = conn
            .execute(sql, ())
            .map_err(|e| format!("ODBC query failed: {} - SQL: {}", e, sql))?
        {
            let num_cols = cursor
                .num_result_cols()
                .map_err(|e| format!("Failed to get column count: {}", e))?
                as usize;

            let mut buffers = TextRowSet::for_cursor(1000, &mut cursor, Some(max_str_len))
                .map_err(|e| format!("Failed to create row buffer: {}", e))?;

            let mut row_cursor = cursor
                .bind_buffer(&mut buffers)
                .map_err(|e| format!("Failed to bind buffer: {}", e))?;

            while let Some(batch) = row_cursor
                .fetch()
                .map_err(|e| format!("Failed to fetch rows: {}", e))?
            {
                for row_idx in 0..batch.num_rows() {
                    let mut row = Vec::with_capacity(num_cols);
                    for col_idx in 0..num_cols {
                        let value = batch
                            .at(col_idx, row_idx)
                            .map(|bytes| String::from_utf8_lossy(bytes).to_string());
                        row.push(value);
                    }
                    rows.push(row);
                }
            }
        }

        Ok(rows)
    }

    /// Execute a catalog query on a fresh connection.
    fn run_query(&self, sql: &str) -> std::result::Result<Vec<Vec<Option<String>>>, String> {
        let conn = self.connect()?;
        Self::query_strings(&conn, sql, 4096)
    }

    fn classify_sync(
        &self,
        schema: &str,
        table: &str,
    ) -> std::result::Result<ColumnClassification, String> {
        let schema_lit = escape_sql_string(schema);
        let table_lit = escape_sql_string(table);

        let sql = format!(
            "SELECT column_name, nullable FROM all_tab_columns \
             WHERE UPPER(owner) = UPPER('{schema_lit}') \
             AND UPPER(table_name) = UPPER('{table_lit}') \
             ORDER BY column_id"
        );
        let columns = self.run_query(&sql)?;
        if columns.is_empty() {
            return Err("table not found in catalog".to_string());
        }

        // The primary key must resolve to exactly one constraint. With
        // case-insensitive matching two tables differing only in name case
        // would both match, which we reject rather than mixing their keys.
        let sql = format!(
            "SELECT DISTINCT c.owner, c.table_name, c.constraint_name \
             FROM all_constraints c \
             WHERE UPPER(c.owner) = UPPER('{schema_lit}') \
             AND UPPER(c.table_name) = UPPER('{table_lit}') \
             AND c.constraint_type = 'P'"
        );
        let constraints = self.run_query(&sql)?;

        let constraint = match constraints.len() {
            0 => return Err("no primary key constraint found".to_string()),
            1 => &constraints[0],
            n => {
                return Err(format!(
                    "primary key is ambiguous: {} constraints match case-insensitively",
                    n
                ))
            }
        };
        let owner = constraint
            .first()
            .and_then(|v| v.clone())
            .ok_or_else(|| "constraint owner missing from catalog".to_string())?;
        let constraint_name = constraint
            .get(2)
            .and_then(|v| v.clone())
            .ok_or_else(|| "constraint name missing from catalog".to_string())?;

        let owner_lit = escape_sql_string(&owner);
        let constraint_lit = escape_sql_string(&constraint_name);

        let sql = format!(
            "SELECT column_name FROM all_cons_columns \
             WHERE owner = '{owner_lit}' \
             AND constraint_name = '{constraint_lit}' \
             ORDER BY position"
        );
        let primary_key: Vec<String> = self
            .run_query(&sql)?
            .into_iter()
            .filter_map(|row| row.into_iter().next().flatten())
            .collect();

        let mut classification = ColumnClassification {
            primary_key,
            ..Default::default()
        };

        for row in columns {
            let name = row
                .first()
                .and_then(|v| v.clone())
                .ok_or_else(|| "column name missing from catalog".to_string())?;
            if classification.primary_key.contains(&name) {
                continue;
            }
            let nullable = row
                .get(1)
                .and_then(|v| v.as_deref())
                .map(|s| s == "Y")
                .unwrap_or(true);
            if nullable {
                classification.nullable.push(name);
            } else {
                classification.non_nullable.push(name);
            }
        }

        info!(
            "Classified {}.{}: pk={:?} non_nullable={:?} nullable={:?}",
            schema, table,
            classification.primary_key,
            classification.non_nullable,
            classification.nullable
        );

        Ok(classification)
    }

    fn fetch_all_sync(&self, schema: &str, table: &str) -> std::result::Result<RowSet, String> {
        let conn = self.connect()?;
        let sql = format!("SELECT * FROM {}.{}", schema, table);

        let mut rows: RowSet = Vec::new();

        let Some(mut cursor) = conn
            .execute(&sql, ())
            .map_err(|e| format!("ODBC query failed: {} - SQL: {}", e, sql))?
        else {
            return Ok(rows);
        };

        let num_cols = cursor
            .num_result_cols()
            .map_err(|e| format!("Failed to get column count: {}", e))? as u16;

        let mut names = Vec::with_capacity(num_cols as usize);
        let mut data_types = Vec::with_capacity(num_cols as usize);
        for col in 1..=num_cols {
            names.push(
                cursor
                    .col_name(col)
                    .map_err(|e| format!("Failed to get column name: {}", e))?,
            );
            data_types.push(
                cursor
                    .col_data_type(col)
                    .map_err(|e| format!("Failed to get column type: {}", e))?,
            );
        }

        let mut buffers = TextRowSet::for_cursor(1000, &mut cursor, Some(65536))
            .map_err(|e| format!("Failed to create row buffer: {}", e))?;

        let mut row_cursor = cursor
            .bind_buffer(&mut buffers)
            .map_err(|e| format!("Failed to bind buffer: {}", e))?;

        while let Some(batch) = row_cursor
            .fetch()
            .map_err(|e| format!("Failed to fetch rows: {}", e))?
        {
            for row_idx in 0..batch.num_rows() {
                let mut row = Row::new();
                for col_idx in 0..num_cols as usize {
                    let text = batch
                        .at(col_idx, row_idx)
                        .map(|bytes| String::from_utf8_lossy(bytes).to_string());
                    row.insert(
                        names[col_idx].clone(),
                        convert_text_value(text, &data_types[col_idx]),
                    );
                }
                rows.push(row);
            }
        }

        debug!("Fetched {} rows from {}.{}", rows.len(), schema, table);

        Ok(rows)
    }

    fn ddl_for_sync(&self, schema: &str, table: &str) -> std::result::Result<String, String> {
        let conn = self.connect()?;

        // Strip storage noise from the generated DDL. Transform params are
        // session-scoped, so they must run on the connection issuing the
        // get_ddl call.
        for param in ["STORAGE", "TABLESPACE", "SEGMENT_ATTRIBUTES"] {
            let sql = format!(
                "BEGIN DBMS_METADATA.SET_TRANSFORM_PARAM(DBMS_METADATA.SESSION_TRANSFORM,'{param}','FALSE'); END;"
            );
            conn.execute(&sql, ())
                .map_err(|e| format!("Failed to set DDL transform param {}: {}", param, e))?;
        }

        let table_lit = escape_sql_string(table);
        let schema_lit = escape_sql_string(schema);
        let sql = format!(
            "SELECT dbms_metadata.get_ddl('TABLE', '{table_lit}', '{schema_lit}') FROM dual"
        );

        let rows = Self::query_strings(&conn, &sql, 1024 * 1024)?;
        rows.into_iter()
            .next()
            .and_then(|row| row.into_iter().next().flatten())
            .ok_or_else(|| "dbms_metadata.get_ddl returned no DDL".to_string())
    }
}

#[async_trait]
impl SourcePool for OracleOdbcPool {
    async fn classify(&self, schema: &str, table: &str) -> Result<ColumnClassification> {
        let _lock = self.conn_mutex.lock().await;
        self.classify_sync(schema, table)
            .map_err(|e| ExportError::metadata(table, e))
    }

    async fn fetch_all(&self, schema: &str, table: &str) -> Result<RowSet> {
        let _lock = self.conn_mutex.lock().await;
        self.fetch_all_sync(schema, table)
            .map_err(|e| ExportError::query(table, e))
    }

    async fn ddl_for(&self, schema: &str, table: &str) -> Result<String> {
        let _lock = self.conn_mutex.lock().await;
        self.ddl_for_sync(schema, table)
            .map_err(|e| ExportError::metadata(table, e))
    }
}

/// Convert an ODBC text cell to a typed value using the reported column type.
fn convert_text_value(text: Option<String>, data_type: &DataType) -> SqlValue {
    let Some(s) = text else {
        return SqlValue::Null;
    };

    match data_type {
        DataType::TinyInt | DataType::SmallInt | DataType::Integer | DataType::BigInt => s
            .parse::<i64>()
            .map(SqlValue::Integer)
            .unwrap_or(SqlValue::Text(s)),
        DataType::Numeric { scale: 0, .. } | DataType::Decimal { scale: 0, .. } => {
            // Oracle NUMBER without scale is integral
            s.parse::<i64>()
                .map(SqlValue::Integer)
                .or_else(|_| s.parse().map(SqlValue::Decimal))
                .unwrap_or(SqlValue::Text(s))
        }
        DataType::Numeric { .. } | DataType::Decimal { .. } => s
            .parse()
            .map(SqlValue::Decimal)
            .unwrap_or(SqlValue::Text(s)),
        DataType::Real | DataType::Float { .. } | DataType::Double => s
            .parse::<f64>()
            .map(SqlValue::Float)
            .unwrap_or(SqlValue::Text(s)),
        DataType::Bit => match s.as_str() {
            "1" | "true" | "True" | "TRUE" => SqlValue::Bool(true),
            "0" | "false" | "False" | "FALSE" => SqlValue::Bool(false),
            _ => SqlValue::Text(s),
        },
        DataType::Timestamp { .. } | DataType::Date => {
            // ODBC returns Oracle DATE/TIMESTAMP as "2023-01-15 10:30:45.123"
            chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
                .or_else(|_| chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S"))
                .or_else(|_| {
                    chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                        .map(|d| d.and_time(chrono::NaiveTime::MIN))
                })
                .map(SqlValue::DateTime)
                .unwrap_or(SqlValue::Text(s))
        }
        _ => SqlValue::Text(s),
    }
}
