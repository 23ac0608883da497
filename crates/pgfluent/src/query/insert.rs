//! INSERT construction.
//!
//! Column lists are ordinary tuples of field references; [`ColumnTuple`]
//! derives the matching value tuple type, so a value of the wrong type or
//! arity fails to compile. Tuples up to ten columns are supported.

use crate::error::{QueryError, QueryResult};
use crate::executor::{Executor, Runnable};
use crate::param::{Param, ParamList};
use crate::record::ExecResult;
use crate::schema::{Field, Table};
use std::marker::PhantomData;
use tokio_postgres::types::{FromSql, ToSql};

/// A tuple of column references with a matching tuple of value types.
pub trait ColumnTuple {
    type Values;

    fn column_names(&self) -> Vec<String>;
    fn bind(values: Self::Values) -> Vec<Param>;
}

macro_rules! impl_column_tuple {
    ($(($($T:ident . $idx:tt),+)),+ $(,)?) => {
        $(
            impl<'a, $($T: ToSql + Send + Sync + 'static),+> ColumnTuple for ($(&'a Field<$T>,)+) {
                type Values = ($($T,)+);

                fn column_names(&self) -> Vec<String> {
                    vec![$(self.$idx.name().to_string()),+]
                }

                fn bind(values: Self::Values) -> Vec<Param> {
                    vec![$(Param::new(values.$idx)),+]
                }
            }
        )+
    };
}

impl_column_tuple!(
    (T0.0),
    (T0.0, T1.1),
    (T0.0, T1.1, T2.2),
    (T0.0, T1.1, T2.2, T3.3),
    (T0.0, T1.1, T2.2, T3.3, T4.4),
    (T0.0, T1.1, T2.2, T3.3, T4.4, T5.5),
    (T0.0, T1.1, T2.2, T3.3, T4.4, T5.5, T6.6),
    (T0.0, T1.1, T2.2, T3.3, T4.4, T5.5, T6.6, T7.7),
    (T0.0, T1.1, T2.2, T3.3, T4.4, T5.5, T6.6, T7.7, T8.8),
    (T0.0, T1.1, T2.2, T3.3, T4.4, T5.5, T6.6, T7.7, T8.8, T9.9),
);

/// Start an INSERT into a table over a tuple of columns.
pub fn insert_into<C: ColumnTuple>(table: &Table, columns: C) -> InsertIntoPart<C> {
    InsertIntoPart {
        table: table.name().to_string(),
        columns: columns.column_names(),
        _marker: PhantomData,
    }
}

/// Columns chosen; a matching value tuple is required next.
#[derive(Debug)]
pub struct InsertIntoPart<C: ColumnTuple> {
    table: String,
    columns: Vec<String>,
    _marker: PhantomData<fn(C)>,
}

impl<C: ColumnTuple> InsertIntoPart<C> {
    pub fn values(self, values: C::Values) -> InsertValuesPart {
        InsertValuesPart {
            table: self.table,
            columns: self.columns,
            params: C::bind(values),
        }
    }
}

/// Values bound; executable as-is or extended with RETURNING.
#[derive(Debug, Clone)]
pub struct InsertValuesPart {
    table: String,
    columns: Vec<String>,
    params: Vec<Param>,
}

impl InsertValuesPart {
    /// Return one column of the inserted row, typed by the field.
    pub fn returning<R>(self, field: &Field<R>) -> InsertFinalPart<R> {
        InsertFinalPart {
            inner: self,
            column: field.name().to_string(),
            _marker: PhantomData,
        }
    }

    pub fn render(&self) -> (String, ParamList) {
        self.render_returning(None)
    }

    pub fn to_sql(&self) -> String {
        self.render().0
    }

    pub fn runnable(&self) -> Runnable {
        let (sql, params) = self.render();
        Runnable::new(sql, params)
    }

    /// Run the insert in its own transaction.
    pub async fn execute(&self, exec: &impl Executor) -> QueryResult<ExecResult<()>> {
        let outcome = exec.execute_in_transaction(self.runnable()).await?;
        Ok(ExecResult::new(Vec::new(), outcome.row_count))
    }

    fn render_returning(&self, returning: Option<&str>) -> (String, ParamList) {
        let mut params = ParamList::new();
        let placeholders: Vec<String> = self
            .params
            .iter()
            .map(|param| format!("${}", params.push(param.clone())))
            .collect();
        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            self.columns.join(", "),
            placeholders.join(", ")
        );
        if let Some(column) = returning {
            sql.push_str(&format!(" RETURNING {column}"));
        }
        tracing::trace!(target: "pgfluent::sql", sql = %sql, params = %params.display_truncated());
        (sql, params)
    }
}

/// RETURNING column chosen; execution decodes the returned values.
#[derive(Debug, Clone)]
pub struct InsertFinalPart<R> {
    inner: InsertValuesPart,
    column: String,
    _marker: PhantomData<fn() -> R>,
}

impl<R: for<'a> FromSql<'a>> InsertFinalPart<R> {
    pub fn render(&self) -> (String, ParamList) {
        self.inner.render_returning(Some(&self.column))
    }

    pub fn to_sql(&self) -> String {
        self.render().0
    }

    pub fn runnable(&self) -> Runnable {
        let (sql, params) = self.render();
        Runnable::new(sql, params).returning(self.column.clone())
    }

    /// Run the insert and decode the RETURNING column of every inserted row.
    pub async fn execute(&self, exec: &impl Executor) -> QueryResult<ExecResult<R>> {
        let outcome = exec.execute_in_transaction(self.runnable()).await?;
        let values = outcome
            .rows
            .iter()
            .map(|row| {
                row.try_get(0).map_err(|err| QueryError::Decode {
                    column: self.column.clone(),
                    message: err.to_string(),
                })
            })
            .collect::<QueryResult<Vec<R>>>()?;
        Ok(ExecResult::new(values, outcome.row_count))
    }
}
