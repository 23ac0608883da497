//! Boolean condition trees for WHERE, HAVING and join ON clauses.
//!
//! A [`Condition`] is a closed tree built by the [`Comparable`] operators and
//! combined with [`Condition::and`] / [`Condition::or`]. Rendering walks the
//! tree, pushing bound values into the shared [`ParamList`] so placeholder
//! numbers always reflect accumulation order across the whole statement,
//! subqueries included.
//!
//! [`Comparable`]: crate::expr::Comparable

use crate::param::{Param, ParamList};
use crate::query::PartChain;

/// Combinator between two conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    fn as_sql(self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
        }
    }
}

/// A renderable boolean condition.
#[derive(Clone)]
pub enum Condition {
    /// `left op $n` against a bound value.
    Value {
        left: String,
        op: &'static str,
        param: Param,
    },
    /// `left op right` between two column expressions, no binding.
    FieldCmp {
        left: String,
        op: &'static str,
        right: String,
    },
    /// `left IS NULL` / `left IS NOT NULL`.
    Null { left: String, negated: bool },
    /// `left IN ($n, $n+1, ...)` against bound values.
    InList { left: String, params: Vec<Param> },
    /// `left IN (subquery)`; the subquery binds into the caller's list.
    InQuery { left: String, query: PartChain },
    /// `left op (subquery)` against a scalar subquery.
    QueryCmp {
        left: String,
        op: &'static str,
        query: PartChain,
    },
    /// `(left combinator right)`, always parenthesized.
    Combined {
        op: BoolOp,
        left: Box<Condition>,
        right: Box<Condition>,
    },
}

impl Condition {
    pub(crate) fn value(left: String, op: &'static str, param: Param) -> Self {
        Condition::Value { left, op, param }
    }

    pub(crate) fn field_cmp(left: String, op: &'static str, right: String) -> Self {
        Condition::FieldCmp { left, op, right }
    }

    pub(crate) fn null(left: String, negated: bool) -> Self {
        Condition::Null { left, negated }
    }

    pub(crate) fn in_list(left: String, params: Vec<Param>) -> Self {
        Condition::InList { left, params }
    }

    pub(crate) fn in_query(left: String, query: PartChain) -> Self {
        Condition::InQuery { left, query }
    }

    pub(crate) fn query_cmp(left: String, op: &'static str, query: PartChain) -> Self {
        Condition::QueryCmp { left, op, query }
    }

    /// Conjunction with another condition.
    pub fn and(self, other: Condition) -> Condition {
        Condition::Combined {
            op: BoolOp::And,
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// Disjunction with another condition.
    pub fn or(self, other: Condition) -> Condition {
        Condition::Combined {
            op: BoolOp::Or,
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// Render to SQL text, binding values into `params` in tree order.
    pub(crate) fn render(&self, params: &mut ParamList) -> String {
        match self {
            Condition::Value { left, op, param } => {
                let index = params.push(param.clone());
                format!("{left} {op} ${index}")
            }
            Condition::FieldCmp { left, op, right } => format!("{left} {op} {right}"),
            Condition::Null { left, negated } => {
                if *negated {
                    format!("{left} IS NOT NULL")
                } else {
                    format!("{left} IS NULL")
                }
            }
            Condition::InList { left, params: values } => {
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|value| format!("${}", params.push(value.clone())))
                    .collect();
                format!("{left} IN ({})", placeholders.join(", "))
            }
            Condition::InQuery { left, query } => {
                format!("{left} IN ({})", query.render(params))
            }
            Condition::QueryCmp { left, op, query } => {
                format!("{left} {op} ({})", query.render(params))
            }
            Condition::Combined { op, left, right } => {
                format!("({} {} {})", left.render(params), op.as_sql(), right.render(params))
            }
        }
    }
}

impl std::fmt::Debug for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut params = ParamList::new();
        let sql = self.render(&mut params);
        f.debug_struct("Condition")
            .field("sql", &sql)
            .field("params", &params.debug_values())
            .finish()
    }
}
