//! Statement assembly: the part chain shared by every builder stage.
//!
//! Builders never concatenate SQL as they go. Each fluent call appends a
//! [`QueryPart`] to a [`PartChain`]; text and placeholder numbers are only
//! produced when the chain is rendered, so a chain can be rendered any number
//! of times with identical output.

mod delete;
mod insert;
mod select;
mod update;

#[cfg(test)]
mod tests;

pub use delete::{delete_from, DeleteFromPart, DeleteWherePart};
pub use insert::{insert_into, ColumnTuple, InsertFinalPart, InsertIntoPart, InsertValuesPart};
pub use select::{
    select, select_all, CursorPart, Fetch, FromPart, GroupByPart, HavingPart, JoinOnPart,
    JoinPart, OrderByPart, SelectPart, WherePart,
};
pub use update::{update, Execute, SetPart, UpdatePart, UpdateWherePart};

use crate::condition::Condition;
use crate::param::{Param, ParamList};
use crate::schema::{SortField, SortOrder};

/// One projected column in a SELECT list.
#[derive(Debug, Clone)]
pub(crate) struct SelectItem {
    pub(crate) text: String,
    pub(crate) alias: Option<String>,
}

impl SelectItem {
    fn render(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} AS \"{}\"", self.text, alias),
            None => self.text.clone(),
        }
    }
}

/// Right-hand side of a SET assignment.
#[derive(Debug, Clone)]
pub(crate) enum AssignValue {
    /// Bound value, rendered as a placeholder.
    Value(Param),
    /// Inline expression such as `NOW()` or `users.visits + 1`, no binding.
    Expr(String),
}

/// One column assignment in a SET clause. Columns render bare, unqualified.
#[derive(Debug, Clone)]
pub(crate) struct Assignment {
    pub(crate) column: String,
    pub(crate) value: AssignValue,
}

impl Assignment {
    fn render(&self, params: &mut ParamList) -> String {
        match &self.value {
            AssignValue::Value(param) => {
                let index = params.push(param.clone());
                format!("{}=${index}", self.column)
            }
            AssignValue::Expr(text) => format!("{}={}", self.column, text),
        }
    }
}

/// A single clause of a statement under construction.
#[derive(Debug, Clone)]
pub(crate) enum QueryPart {
    Select(Vec<SelectItem>),
    From(String),
    Join(String),
    LeftOuterJoin(String),
    On(Condition),
    Where(Condition),
    GroupBy(Vec<String>),
    Having(Condition),
    OrderBy(Vec<SortField>),
    Cursor {
        limit: Option<u64>,
        offset: Option<u64>,
    },
    Update(String),
    Set(Vec<Assignment>),
    DeleteFrom(String),
}

impl QueryPart {
    fn render(&self, params: &mut ParamList) -> String {
        match self {
            QueryPart::Select(items) => {
                if items.is_empty() {
                    "SELECT *".to_string()
                } else {
                    let list: Vec<String> = items.iter().map(SelectItem::render).collect();
                    format!("SELECT {}", list.join(", "))
                }
            }
            QueryPart::From(table) => format!("FROM {table}"),
            QueryPart::Join(table) => format!("JOIN {table}"),
            QueryPart::LeftOuterJoin(table) => format!("LEFT OUTER JOIN {table}"),
            QueryPart::On(cond) => format!("ON {}", cond.render(params)),
            QueryPart::Where(cond) => format!("WHERE {}", cond.render(params)),
            QueryPart::GroupBy(columns) => format!("GROUP BY {}", columns.join(", ")),
            QueryPart::Having(cond) => format!("HAVING {}", cond.render(params)),
            QueryPart::OrderBy(keys) => {
                let rendered: Vec<String> = keys
                    .iter()
                    .map(|key| match key.order() {
                        Some(SortOrder::Asc) => format!("{} ASC", key.render()),
                        Some(SortOrder::Desc) => format!("{} DESC", key.render()),
                        None => key.render().to_string(),
                    })
                    .collect();
                format!("ORDER BY {}", rendered.join(", "))
            }
            QueryPart::Cursor { limit, offset } => {
                let mut text = String::new();
                if let Some(limit) = limit {
                    text.push_str(&format!("LIMIT {limit}"));
                }
                if let Some(offset) = offset {
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(&format!("OFFSET {offset}"));
                }
                text
            }
            QueryPart::Update(table) => format!("UPDATE {table}"),
            QueryPart::Set(assignments) => {
                let list: Vec<String> = assignments
                    .iter()
                    .map(|assignment| assignment.render(params))
                    .collect();
                format!("SET {}", list.join(", "))
            }
            QueryPart::DeleteFrom(table) => format!("DELETE FROM {table}"),
        }
    }
}

/// An ordered, immutable-once-built sequence of statement clauses.
#[derive(Debug, Clone, Default)]
pub struct PartChain {
    pub(crate) parts: Vec<QueryPart>,
}

impl PartChain {
    pub(crate) fn new() -> Self {
        Self { parts: Vec::new() }
    }

    pub(crate) fn push(mut self, part: QueryPart) -> Self {
        self.parts.push(part);
        self
    }

    /// Render every part in order, binding into `params`. Subqueries call
    /// this against the caller's list so placeholder numbering continues
    /// rather than restarting.
    pub(crate) fn render(&self, params: &mut ParamList) -> String {
        let clauses: Vec<String> = self
            .parts
            .iter()
            .map(|part| part.render(params))
            .filter(|clause| !clause.is_empty())
            .collect();
        clauses.join(" ")
    }

    /// Render as a top-level statement, tracing the text and truncated
    /// parameter values at the `pgfluent::sql` target.
    pub(crate) fn build(&self) -> (String, ParamList) {
        let mut params = ParamList::new();
        let sql = self.render(&mut params);
        tracing::trace!(target: "pgfluent::sql", sql = %sql, params = %params.display_truncated());
        (sql, params)
    }
}

/// Reduce a fetched row set to the exactly-one-row contract used by
/// `fetch_single`: `Some` only when the set holds a single row.
pub(crate) fn single_row<T>(mut rows: Vec<T>) -> Option<T> {
    if rows.len() == 1 {
        rows.pop()
    } else {
        None
    }
}
