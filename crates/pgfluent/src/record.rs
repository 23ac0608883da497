//! Decoded results: row records and mutation outcomes.

use crate::error::{QueryError, QueryResult};
use crate::expr::FieldExpr;
use tokio_postgres::types::FromSql;
use tokio_postgres::Row;

/// One fetched row, addressed by the expressions that were selected.
///
/// Lookup uses the expression's output key: the alias lowercased when one
/// was set, else the bare column name.
#[derive(Debug)]
pub struct Record {
    row: Row,
}

impl Record {
    pub(crate) fn new(row: Row) -> Self {
        Self { row }
    }

    /// Decode the value selected under `expr`.
    pub fn get<'a, T: FromSql<'a>>(&'a self, expr: &dyn FieldExpr) -> QueryResult<T> {
        let key = expr.output_key();
        self.row.try_get(key.as_str()).map_err(|err| QueryError::Decode {
            column: key,
            message: err.to_string(),
        })
    }

    /// Decode a nullable value selected under `expr`.
    pub fn get_opt<'a, T: FromSql<'a>>(&'a self, expr: &dyn FieldExpr) -> QueryResult<Option<T>> {
        self.get(expr)
    }

    /// The underlying row, for decoding outside the expression surface.
    pub fn row(&self) -> &Row {
        &self.row
    }
}

/// Outcome of a mutation: affected-row count, plus the RETURNING values when
/// the statement had a RETURNING clause.
#[derive(Debug, Clone)]
pub struct ExecResult<T> {
    values: Vec<T>,
    row_count: u64,
}

impl<T> ExecResult<T> {
    pub(crate) fn new(values: Vec<T>, row_count: u64) -> Self {
        Self { values, row_count }
    }

    /// First returned value, if any. For single-row inserts this is the
    /// generated key.
    pub fn value(&self) -> Option<&T> {
        self.values.first()
    }

    /// Every returned value, in row order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Number of rows the statement affected.
    pub fn row_count(&self) -> u64 {
        self.row_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_result_exposes_first_value() {
        let result = ExecResult::new(vec![7_i64, 8, 9], 3);
        assert_eq!(result.value(), Some(&7));
        assert_eq!(result.values(), &[7, 8, 9]);
        assert_eq!(result.row_count(), 3);
    }

    #[test]
    fn unit_exec_result_has_no_values() {
        let result: ExecResult<()> = ExecResult::new(Vec::new(), 2);
        assert!(result.value().is_none());
        assert_eq!(result.row_count(), 2);
    }
}
