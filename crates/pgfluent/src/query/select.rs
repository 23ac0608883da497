//! SELECT construction.
//!
//! Each stage is a distinct type exposing only the clauses that may legally
//! follow it, so `FROM` before `SELECT` or `HAVING` without `GROUP BY` fails
//! to compile rather than at the database. All stages that form a complete
//! statement implement [`Fetch`] and convert into a [`PartChain`] for use as
//! a subquery.

use super::{single_row, PartChain, QueryPart, SelectItem};
use crate::condition::Condition;
use crate::error::QueryResult;
use crate::executor::Executor;
use crate::expr::FieldExpr;
use crate::param::ParamList;
use crate::record::Record;
use crate::schema::{SortField, Table};

/// Start a SELECT over an explicit projection list.
pub fn select(items: Vec<&dyn FieldExpr>) -> SelectPart {
    let items = items
        .into_iter()
        .map(|expr| SelectItem {
            text: expr.render(),
            alias: expr.alias().map(str::to_string),
        })
        .collect();
    SelectPart {
        chain: PartChain::new().push(QueryPart::Select(items)),
    }
}

/// Start a `SELECT *`.
pub fn select_all() -> SelectPart {
    SelectPart {
        chain: PartChain::new().push(QueryPart::Select(Vec::new())),
    }
}

/// Terminal surface of a complete SELECT: rendering and row fetching.
pub trait Fetch: Sync {
    fn chain(&self) -> &PartChain;

    /// Render to SQL text and the accumulated parameter list. Rendering is
    /// repeatable; calling twice yields identical text and numbering.
    fn render(&self) -> (String, ParamList) {
        self.chain().build()
    }

    /// SQL text only, for logging and tests.
    fn to_sql(&self) -> String {
        self.render().0
    }

    /// Run the query and return every row as a [`Record`].
    fn fetch(&self, exec: &impl Executor) -> impl Future<Output = QueryResult<Vec<Record>>> + Send {
        async move {
            let (sql, params) = self.render();
            let rows = exec.query(&sql, &params).await?;
            Ok(rows.into_iter().map(Record::new).collect())
        }
    }

    /// Run the query and return the row only when exactly one came back.
    fn fetch_single(
        &self,
        exec: &impl Executor,
    ) -> impl Future<Output = QueryResult<Option<Record>>> + Send {
        async move { Ok(single_row(self.fetch(exec).await?)) }
    }

    /// Fetch and decode every row through `map`.
    fn fetch_mapped<T, F>(
        &self,
        exec: &impl Executor,
        map: F,
    ) -> impl Future<Output = QueryResult<Vec<T>>> + Send
    where
        T: Send,
        F: Fn(&Record) -> QueryResult<T> + Send + Sync,
    {
        async move {
            self.fetch(exec)
                .await?
                .iter()
                .map(|record| map(record))
                .collect()
        }
    }

    /// Fetch and decode, returning `Some` only when exactly one row came back.
    fn fetch_single_mapped<T, F>(
        &self,
        exec: &impl Executor,
        map: F,
    ) -> impl Future<Output = QueryResult<Option<T>>> + Send
    where
        T: Send,
        F: Fn(&Record) -> QueryResult<T> + Send + Sync,
    {
        async move {
            match self.fetch_single(exec).await? {
                Some(record) => Ok(Some(map(&record)?)),
                None => Ok(None),
            }
        }
    }
}

macro_rules! impl_terminal {
    ($($stage:ident),+ $(,)?) => {
        $(
            impl Fetch for $stage {
                fn chain(&self) -> &PartChain {
                    &self.chain
                }
            }

            impl From<$stage> for PartChain {
                fn from(stage: $stage) -> PartChain {
                    stage.chain
                }
            }
        )+
    };
}

impl_terminal!(
    FromPart,
    JoinOnPart,
    WherePart,
    GroupByPart,
    HavingPart,
    OrderByPart,
    CursorPart,
);

/// Projection chosen; only `FROM` may follow.
#[derive(Debug, Clone)]
pub struct SelectPart {
    chain: PartChain,
}

impl SelectPart {
    pub fn from(self, table: &Table) -> FromPart {
        FromPart {
            chain: self.chain.push(QueryPart::From(table.name().to_string())),
        }
    }
}

/// Source table chosen; joins, filters and ordering may follow.
#[derive(Debug, Clone)]
pub struct FromPart {
    chain: PartChain,
}

impl FromPart {
    pub fn join(self, table: &Table) -> JoinPart {
        JoinPart {
            chain: self.chain.push(QueryPart::Join(table.name().to_string())),
        }
    }

    pub fn left_outer_join(self, table: &Table) -> JoinPart {
        JoinPart {
            chain: self
                .chain
                .push(QueryPart::LeftOuterJoin(table.name().to_string())),
        }
    }

    pub fn where_(self, condition: Condition) -> WherePart {
        WherePart {
            chain: self.chain.push(QueryPart::Where(condition)),
        }
    }

    pub fn group_by(self, fields: Vec<&dyn FieldExpr>) -> GroupByPart {
        GroupByPart {
            chain: self.chain.push(group_by_part(fields)),
        }
    }

    pub fn order_by(self, keys: Vec<SortField>) -> OrderByPart {
        OrderByPart {
            chain: self.chain.push(QueryPart::OrderBy(keys)),
        }
    }

    pub fn limit(self, limit: u64) -> CursorPart {
        CursorPart::with_limit(self.chain, limit)
    }

    pub fn offset(self, offset: u64) -> CursorPart {
        CursorPart::with_offset(self.chain, offset)
    }
}

/// Join target named; the `ON` condition is mandatory before anything else.
#[derive(Debug, Clone)]
pub struct JoinPart {
    chain: PartChain,
}

impl JoinPart {
    pub fn on(self, condition: Condition) -> JoinOnPart {
        JoinOnPart {
            chain: self.chain.push(QueryPart::On(condition)),
        }
    }
}

/// Join complete; further joins, filters and ordering may follow.
#[derive(Debug, Clone)]
pub struct JoinOnPart {
    chain: PartChain,
}

impl JoinOnPart {
    pub fn join(self, table: &Table) -> JoinPart {
        JoinPart {
            chain: self.chain.push(QueryPart::Join(table.name().to_string())),
        }
    }

    pub fn left_outer_join(self, table: &Table) -> JoinPart {
        JoinPart {
            chain: self
                .chain
                .push(QueryPart::LeftOuterJoin(table.name().to_string())),
        }
    }

    pub fn where_(self, condition: Condition) -> WherePart {
        WherePart {
            chain: self.chain.push(QueryPart::Where(condition)),
        }
    }

    pub fn group_by(self, fields: Vec<&dyn FieldExpr>) -> GroupByPart {
        GroupByPart {
            chain: self.chain.push(group_by_part(fields)),
        }
    }

    pub fn order_by(self, keys: Vec<SortField>) -> OrderByPart {
        OrderByPart {
            chain: self.chain.push(QueryPart::OrderBy(keys)),
        }
    }

    pub fn limit(self, limit: u64) -> CursorPart {
        CursorPart::with_limit(self.chain, limit)
    }

    pub fn offset(self, offset: u64) -> CursorPart {
        CursorPart::with_offset(self.chain, offset)
    }
}

/// Filter applied; grouping, ordering and pagination may follow.
#[derive(Debug, Clone)]
pub struct WherePart {
    chain: PartChain,
}

impl WherePart {
    pub fn group_by(self, fields: Vec<&dyn FieldExpr>) -> GroupByPart {
        GroupByPart {
            chain: self.chain.push(group_by_part(fields)),
        }
    }

    pub fn order_by(self, keys: Vec<SortField>) -> OrderByPart {
        OrderByPart {
            chain: self.chain.push(QueryPart::OrderBy(keys)),
        }
    }

    pub fn limit(self, limit: u64) -> CursorPart {
        CursorPart::with_limit(self.chain, limit)
    }

    pub fn offset(self, offset: u64) -> CursorPart {
        CursorPart::with_offset(self.chain, offset)
    }
}

/// Grouping applied; `HAVING` is only reachable from here.
#[derive(Debug, Clone)]
pub struct GroupByPart {
    chain: PartChain,
}

impl GroupByPart {
    pub fn having(self, condition: Condition) -> HavingPart {
        HavingPart {
            chain: self.chain.push(QueryPart::Having(condition)),
        }
    }

    pub fn order_by(self, keys: Vec<SortField>) -> OrderByPart {
        OrderByPart {
            chain: self.chain.push(QueryPart::OrderBy(keys)),
        }
    }

    pub fn limit(self, limit: u64) -> CursorPart {
        CursorPart::with_limit(self.chain, limit)
    }

    pub fn offset(self, offset: u64) -> CursorPart {
        CursorPart::with_offset(self.chain, offset)
    }
}

/// Group filter applied; ordering and pagination may follow.
#[derive(Debug, Clone)]
pub struct HavingPart {
    chain: PartChain,
}

impl HavingPart {
    pub fn order_by(self, keys: Vec<SortField>) -> OrderByPart {
        OrderByPart {
            chain: self.chain.push(QueryPart::OrderBy(keys)),
        }
    }

    pub fn limit(self, limit: u64) -> CursorPart {
        CursorPart::with_limit(self.chain, limit)
    }

    pub fn offset(self, offset: u64) -> CursorPart {
        CursorPart::with_offset(self.chain, offset)
    }
}

/// Ordering applied; only pagination may follow.
#[derive(Debug, Clone)]
pub struct OrderByPart {
    chain: PartChain,
}

impl OrderByPart {
    pub fn limit(self, limit: u64) -> CursorPart {
        CursorPart::with_limit(self.chain, limit)
    }

    pub fn offset(self, offset: u64) -> CursorPart {
        CursorPart::with_offset(self.chain, offset)
    }
}

/// Pagination applied. Repeated `limit`/`offset` calls overwrite the stored
/// values in place rather than appending further clauses.
#[derive(Debug, Clone)]
pub struct CursorPart {
    chain: PartChain,
}

impl CursorPart {
    fn with_limit(chain: PartChain, limit: u64) -> Self {
        Self {
            chain: chain.push(QueryPart::Cursor {
                limit: Some(limit),
                offset: None,
            }),
        }
    }

    fn with_offset(chain: PartChain, offset: u64) -> Self {
        Self {
            chain: chain.push(QueryPart::Cursor {
                limit: None,
                offset: Some(offset),
            }),
        }
    }

    pub fn limit(mut self, value: u64) -> Self {
        if let Some(QueryPart::Cursor { limit, .. }) = self.chain.parts.last_mut() {
            *limit = Some(value);
        }
        self
    }

    pub fn offset(mut self, value: u64) -> Self {
        if let Some(QueryPart::Cursor { offset, .. }) = self.chain.parts.last_mut() {
            *offset = Some(value);
        }
        self
    }
}

fn group_by_part(fields: Vec<&dyn FieldExpr>) -> QueryPart {
    QueryPart::GroupBy(fields.into_iter().map(|field| field.render()).collect())
}
