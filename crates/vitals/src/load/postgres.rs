//! Loading into PostgreSQL.

use std::time::Duration;

use sqlx::postgres::PgConnectOptions;
use sqlx::query_builder::Separated;
use sqlx::{Connection as _, PgConnection, Postgres, QueryBuilder};
use tracing::{debug, info, instrument};

use crate::config::{DEFAULT_BATCH_SIZE, DatabaseTarget};
use crate::error::{Result, Service, VitalsError};
use crate::input::{DataTable, Value};
use crate::schema::ColumnType;

use super::loader::{LoadSummary, Loader};

/// Postgres accepts at most this many bind parameters per statement.
const MAX_BIND_PARAMS: usize = 65_535;

/// Replaces a table in PostgreSQL with the cleaned data.
///
/// Everything after the connectivity check runs in one transaction, so a
/// failed load leaves any previous table in place.
#[derive(Debug, Clone)]
pub struct PostgresLoader {
    batch_size: usize,
    connect_timeout: Duration,
}

impl PostgresLoader {
    /// Create a loader inserting 1000 rows per statement.
    pub fn new() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Set the number of rows per INSERT statement.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set how long to wait for the connection to be established.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[instrument(skip_all, fields(target = %target), err)]
    async fn connect(&self, target: &DatabaseTarget) -> Result<PgConnection> {
        let options = PgConnectOptions::new()
            .host(&target.host)
            .port(target.port)
            .database(&target.database)
            .username(&target.username)
            .password(&target.password);

        let mut conn = tokio::time::timeout(self.connect_timeout, PgConnection::connect_with(&options))
            .await
            .map_err(|elapsed| VitalsError::connectivity(Service::Database, elapsed))?
            .map_err(|e| VitalsError::connectivity(Service::Database, e))?;

        sqlx::query("SELECT 1")
            .execute(&mut conn)
            .await
            .map_err(|e| VitalsError::connectivity(Service::Database, e))?;

        info!("connection successful");
        Ok(conn)
    }
}

impl Default for PostgresLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader for PostgresLoader {
    #[instrument(skip_all, fields(table = table, rows = data.row_count()), err)]
    async fn load(&self, target: &DatabaseTarget, table: &str, data: &DataTable) -> Result<LoadSummary> {
        let mut conn = self.connect(target).await?;
        let plan = TablePlan::new(table, data);
        let rows_per_batch = plan.rows_per_batch(self.batch_size);

        let mut tx = conn.begin().await?;
        sqlx::query(&plan.drop_sql()).execute(&mut *tx).await?;
        sqlx::query(&plan.create_sql()).execute(&mut *tx).await?;
        debug!(sql = %plan.create_sql(), "table recreated");

        let mut batches = 0;
        for chunk in data.rows.chunks(rows_per_batch) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(plan.insert_prefix());
            builder.push_values(chunk, |mut b, row| {
                for (value, ty) in row.iter().zip(&plan.types) {
                    push_cell(&mut b, value, *ty);
                }
            });
            builder.build().execute(&mut *tx).await?;
            batches += 1;
        }

        tx.commit().await?;
        conn.close().await?;

        info!(table, rows = data.row_count(), batches, "database upload successful");
        Ok(LoadSummary {
            table: table.to_string(),
            rows: data.row_count(),
            batches,
        })
    }
}

/// DDL and DML for one load, derived from the table's contents.
#[derive(Debug, Clone)]
struct TablePlan {
    table: String,
    columns: Vec<String>,
    types: Vec<ColumnType>,
}

impl TablePlan {
    fn new(table: &str, data: &DataTable) -> Self {
        let types = (0..data.column_count())
            .map(|idx| ColumnType::infer(data.column_values(idx)))
            .collect();
        Self {
            table: table.to_string(),
            columns: data.headers.clone(),
            types,
        }
    }

    fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", quote_ident(&self.table))
    }

    fn create_sql(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .zip(&self.types)
            .map(|(name, ty)| format!("{} {}", quote_ident(name), ty.sql_type()))
            .collect();
        format!("CREATE TABLE {} ({})", quote_ident(&self.table), columns.join(", "))
    }

    fn insert_prefix(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(|c| quote_ident(c)).collect();
        format!("INSERT INTO {} ({}) ", quote_ident(&self.table), columns.join(", "))
    }

    /// Rows per statement, capped so a statement stays under the bind
    /// parameter limit.
    fn rows_per_batch(&self, batch_size: usize) -> usize {
        let per_row = self.columns.len().max(1);
        batch_size.min(MAX_BIND_PARAMS / per_row).max(1)
    }
}

fn push_cell(b: &mut Separated<'_, '_, Postgres, &'static str>, value: &Value, ty: ColumnType) {
    match ty {
        ColumnType::Integer => b.push_bind(value.as_number().map(|n| n as i64)),
        ColumnType::Float => b.push_bind(value.as_number()),
        ColumnType::Timestamp => b.push_bind(value.as_timestamp()),
        ColumnType::Text => b.push_bind((!value.is_null()).then(|| value.to_string())),
    };
}

/// Quote an SQL identifier, doubling embedded quotes.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
