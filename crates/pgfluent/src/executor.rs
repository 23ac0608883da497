//! The execution boundary.
//!
//! Everything up to here is pure construction; [`Executor`] is the only
//! surface that touches a connection. Reads go through [`Executor::query`],
//! mutations are packaged as [`Runnable`] units and run inside transactions,
//! singly or grouped.

use crate::error::{QueryError, QueryResult};
use crate::param::ParamList;
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::{NoTls, Row};

/// Rows and affected-row count produced by one executed unit.
#[derive(Debug, Default)]
pub struct RowSet {
    pub rows: Vec<Row>,
    pub row_count: u64,
}

/// A rendered mutation ready to run inside a transaction.
#[derive(Debug)]
pub struct Runnable {
    sql: String,
    params: ParamList,
    returning: Option<String>,
}

impl Runnable {
    pub(crate) fn new(sql: String, params: ParamList) -> Self {
        Self {
            sql,
            params,
            returning: None,
        }
    }

    pub(crate) fn returning(mut self, column: String) -> Self {
        self.returning = Some(column);
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &ParamList {
        &self.params
    }

    /// Run against an open transaction. Statements with a RETURNING column
    /// go through the query path so the returned rows are kept; the rest use
    /// the execute path and report only the affected-row count.
    pub async fn run(&self, tx: &tokio_postgres::Transaction<'_>) -> QueryResult<RowSet> {
        let refs = self.params.as_refs();
        if self.returning.is_some() {
            let rows = tx
                .query(self.sql.as_str(), &refs)
                .await
                .map_err(QueryError::from_db_error)?;
            let row_count = rows.len() as u64;
            Ok(RowSet { rows, row_count })
        } else {
            let row_count = tx
                .execute(self.sql.as_str(), &refs)
                .await
                .map_err(QueryError::from_db_error)?;
            Ok(RowSet {
                rows: Vec::new(),
                row_count,
            })
        }
    }
}

/// Runs rendered statements against a database.
pub trait Executor: Send + Sync {
    /// Run a read and return the raw rows.
    fn query(
        &self,
        sql: &str,
        params: &ParamList,
    ) -> impl Future<Output = QueryResult<Vec<Row>>> + Send;

    /// Run one mutation inside its own transaction.
    fn execute_in_transaction(
        &self,
        unit: Runnable,
    ) -> impl Future<Output = QueryResult<RowSet>> + Send {
        self.transaction(vec![unit])
    }

    /// Run several mutations inside a single transaction, in order. Any
    /// failure rolls the whole group back. Returns the outcome of the last
    /// unit.
    fn transaction(
        &self,
        units: Vec<Runnable>,
    ) -> impl Future<Output = QueryResult<RowSet>> + Send;
}

/// Pool-backed executor, the default for application use.
#[derive(Clone)]
pub struct PgExecutor {
    pool: Pool,
}

impl PgExecutor {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub fn from_url(url: &str) -> QueryResult<Self> {
        Ok(Self::new(create_pool(url)?))
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

impl Executor for PgExecutor {
    fn query(
        &self,
        sql: &str,
        params: &ParamList,
    ) -> impl Future<Output = QueryResult<Vec<Row>>> + Send {
        async move {
            let client = self.pool.get().await?;
            client
                .query(sql, &params.as_refs())
                .await
                .map_err(QueryError::from_db_error)
        }
    }

    fn transaction(
        &self,
        units: Vec<Runnable>,
    ) -> impl Future<Output = QueryResult<RowSet>> + Send {
        async move {
            let mut client = self.pool.get().await?;
            let tx = client.transaction().await?;
            let mut last = RowSet::default();
            for unit in &units {
                match unit.run(&tx).await {
                    Ok(outcome) => last = outcome,
                    Err(err) => {
                        tracing::debug!(target: "pgfluent::sql", sql = %unit.sql(), error = %err, "rolling back");
                        if let Err(rollback_err) = tx.rollback().await {
                            return Err(QueryError::Other(format!(
                                "{err}; rollback also failed: {rollback_err}"
                            )));
                        }
                        return Err(err);
                    }
                }
            }
            tx.commit().await?;
            Ok(last)
        }
    }
}

/// Build a deadpool pool from a connection URL, with fast recycling.
pub fn create_pool(url: &str) -> QueryResult<Pool> {
    let mut config = Config::new();
    config.url = Some(url.to_string());
    config.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    config
        .create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|err| QueryError::Pool(err.to_string()))
}

/// Build a pool from an explicit deadpool configuration.
pub fn create_pool_with_config(mut config: Config) -> QueryResult<Pool> {
    if config.manager.is_none() {
        config.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
    }
    config
        .create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|err| QueryError::Pool(err.to_string()))
}
