//! A typed, fluent query builder for PostgreSQL.
//!
//! Statements are assembled through staged builders: each fluent call returns
//! a new stage exposing only the clauses that may legally follow, so malformed
//! clause orders are compile errors. Values never enter the SQL text; they
//! accumulate as `$n` parameters, subqueries continuing the outer statement's
//! numbering. Execution is confined to the [`Executor`] boundary, and every
//! mutation runs inside a transaction.
//!
//! ```no_run
//! use pgfluent::{select, Comparable, Fetch, Field, PgExecutor, Table};
//!
//! #[tokio::main]
//! async fn main() -> pgfluent::QueryResult<()> {
//!     let users = Table::new("users");
//!     let id: Field<i64> = users.field(1, "id", "bigint");
//!     let name: Field<String> = users.field(2, "name", "text");
//!
//!     let exec = PgExecutor::from_url("postgres://localhost/app")?;
//!     let rows = select(vec![&id, &name])
//!         .from(&users)
//!         .where_(name.like("a%".to_string()))
//!         .fetch(&exec)
//!         .await?;
//!     for row in rows {
//!         let user_id: i64 = row.get(&id)?;
//!         let user_name: String = row.get(&name)?;
//!         println!("{user_id} {user_name}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! SQL text and bound parameters are traced at the `pgfluent::sql` target;
//! parameter values longer than 15 characters are truncated in the trace.

pub mod condition;
pub mod error;
pub mod executor;
pub mod expr;
pub mod param;
pub mod query;
pub mod record;
pub mod schema;

pub use condition::{BoolOp, Condition};
pub use error::{QueryError, QueryResult};
pub use executor::{create_pool, create_pool_with_config, Executor, PgExecutor, RowSet, Runnable};
pub use expr::{
    count, count_star, current_date, distinct, distinct_on, max, min, now, null_value, Comparable,
    FieldExpr, FnExpr,
};
pub use param::{Param, ParamList};
pub use query::{
    delete_from, insert_into, select, select_all, update, ColumnTuple, CursorPart, DeleteFromPart,
    DeleteWherePart, Execute, Fetch, FromPart, GroupByPart, HavingPart, InsertFinalPart,
    InsertIntoPart, InsertValuesPart, JoinOnPart, JoinPart, OrderByPart, PartChain, SelectPart,
    SetPart, UpdatePart, UpdateWherePart, WherePart,
};
pub use record::{ExecResult, Record};
pub use schema::{Field, SortField, SortOrder, Table};
