//! Renderable expressions and the typed comparison surface.
//!
//! [`FieldExpr`] is the object-safe core: anything that can appear in a
//! SELECT list, an ORDER BY key or on either side of a comparison. The
//! [`Comparable`] extension adds the typed operators that produce
//! [`Condition`] values.

use crate::condition::Condition;
use crate::param::Param;
use crate::query::PartChain;
use crate::schema::SortField;
use tokio_postgres::types::ToSql;

/// A renderable column expression.
pub trait FieldExpr {
    /// SQL text of the expression, e.g. `users.name` or `COUNT(orders.id)`.
    fn render(&self) -> String;

    /// Display alias, if any.
    fn alias(&self) -> Option<&str>;

    /// Bare name for SET/INSERT/RETURNING positions. Computed expressions
    /// have no meaningful bare name and fall back to their rendered text.
    fn name(&self) -> String {
        self.render()
    }

    /// Key under which this expression's value appears in a result record:
    /// the alias lowercased when set, else the bare name unchanged.
    fn output_key(&self) -> String {
        match self.alias() {
            Some(alias) => alias.to_lowercase(),
            None => self.name(),
        }
    }
}

/// Typed comparison operators over an expression.
///
/// `V` is the value type accepted on the right-hand side. Each operator comes
/// in three forms: against a bound value (`eq`), against another expression
/// (`eq_expr`), and against a scalar subquery (`eq_query`).
pub trait Comparable<V: ToSql + Send + Sync + 'static>: FieldExpr {
    fn eq(&self, value: V) -> Condition {
        Condition::value(self.render(), "=", Param::new(value))
    }

    fn ne(&self, value: V) -> Condition {
        Condition::value(self.render(), "!=", Param::new(value))
    }

    fn lt(&self, value: V) -> Condition {
        Condition::value(self.render(), "<", Param::new(value))
    }

    fn lte(&self, value: V) -> Condition {
        Condition::value(self.render(), "<=", Param::new(value))
    }

    fn gt(&self, value: V) -> Condition {
        Condition::value(self.render(), ">", Param::new(value))
    }

    fn gte(&self, value: V) -> Condition {
        Condition::value(self.render(), ">=", Param::new(value))
    }

    fn like(&self, pattern: V) -> Condition {
        Condition::value(self.render(), "LIKE", Param::new(pattern))
    }

    fn eq_expr(&self, other: &dyn FieldExpr) -> Condition {
        Condition::field_cmp(self.render(), "=", other.render())
    }

    fn ne_expr(&self, other: &dyn FieldExpr) -> Condition {
        Condition::field_cmp(self.render(), "!=", other.render())
    }

    fn lt_expr(&self, other: &dyn FieldExpr) -> Condition {
        Condition::field_cmp(self.render(), "<", other.render())
    }

    fn lte_expr(&self, other: &dyn FieldExpr) -> Condition {
        Condition::field_cmp(self.render(), "<=", other.render())
    }

    fn gt_expr(&self, other: &dyn FieldExpr) -> Condition {
        Condition::field_cmp(self.render(), ">", other.render())
    }

    fn gte_expr(&self, other: &dyn FieldExpr) -> Condition {
        Condition::field_cmp(self.render(), ">=", other.render())
    }

    fn eq_query(&self, query: impl Into<PartChain>) -> Condition {
        Condition::query_cmp(self.render(), "=", query.into())
    }

    fn ne_query(&self, query: impl Into<PartChain>) -> Condition {
        Condition::query_cmp(self.render(), "!=", query.into())
    }

    fn lt_query(&self, query: impl Into<PartChain>) -> Condition {
        Condition::query_cmp(self.render(), "<", query.into())
    }

    fn lte_query(&self, query: impl Into<PartChain>) -> Condition {
        Condition::query_cmp(self.render(), "<=", query.into())
    }

    fn gt_query(&self, query: impl Into<PartChain>) -> Condition {
        Condition::query_cmp(self.render(), ">", query.into())
    }

    fn gte_query(&self, query: impl Into<PartChain>) -> Condition {
        Condition::query_cmp(self.render(), ">=", query.into())
    }

    fn in_list(&self, values: Vec<V>) -> Condition {
        Condition::in_list(self.render(), values.into_iter().map(Param::new).collect())
    }

    fn in_query(&self, query: impl Into<PartChain>) -> Condition {
        Condition::in_query(self.render(), query.into())
    }

    fn is_null(&self) -> Condition {
        Condition::null(self.render(), false)
    }

    fn is_not_null(&self) -> Condition {
        Condition::null(self.render(), true)
    }
}

/// A computed expression: aggregate, function call or inline arithmetic.
#[derive(Debug, Clone)]
pub struct FnExpr {
    text: String,
    alias: Option<String>,
}

impl FnExpr {
    pub(crate) fn raw(text: String) -> Self {
        Self { text, alias: None }
    }

    /// Copy of this expression under a display alias.
    pub fn as_(&self, alias: impl Into<String>) -> Self {
        Self {
            text: self.text.clone(),
            alias: Some(alias.into()),
        }
    }

    /// Arithmetic expression `self + value`. The alias is not carried over.
    pub fn plus(&self, value: i64) -> FnExpr {
        FnExpr::raw(format!("{} + {}", self.text, value))
    }

    /// Arithmetic expression `self - value`.
    pub fn minus(&self, value: i64) -> FnExpr {
        FnExpr::raw(format!("{} - {}", self.text, value))
    }

    /// Ascending ORDER BY key over this expression. Sorts by the alias when
    /// one is set, else by the rendered text.
    pub fn asc(&self) -> SortField {
        SortField::new(self.sort_text(), Some(crate::schema::SortOrder::Asc))
    }

    /// Descending ORDER BY key over this expression.
    pub fn desc(&self) -> SortField {
        SortField::new(self.sort_text(), Some(crate::schema::SortOrder::Desc))
    }

    fn sort_text(&self) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => self.text.clone(),
        }
    }
}

impl FieldExpr for FnExpr {
    fn render(&self) -> String {
        self.text.clone()
    }

    fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

impl<V: ToSql + Send + Sync + 'static> Comparable<V> for FnExpr {}

impl From<&FnExpr> for SortField {
    fn from(expr: &FnExpr) -> Self {
        SortField::new(expr.sort_text(), None)
    }
}

/// `COUNT(expr)`.
pub fn count(expr: &dyn FieldExpr) -> FnExpr {
    FnExpr::raw(format!("COUNT({})", expr.render()))
}

/// `COUNT(*)`.
pub fn count_star() -> FnExpr {
    FnExpr::raw("COUNT(*)".to_string())
}

/// `MIN(expr)`.
pub fn min(expr: &dyn FieldExpr) -> FnExpr {
    FnExpr::raw(format!("MIN({})", expr.render()))
}

/// `MAX(expr)`.
pub fn max(expr: &dyn FieldExpr) -> FnExpr {
    FnExpr::raw(format!("MAX({})", expr.render()))
}

/// `DISTINCT(expr)`.
pub fn distinct(expr: &dyn FieldExpr) -> FnExpr {
    FnExpr::raw(format!("DISTINCT({})", expr.render()))
}

/// `DISTINCT ON (group) expr`.
pub fn distinct_on(group: &dyn FieldExpr, expr: &dyn FieldExpr) -> FnExpr {
    FnExpr::raw(format!("DISTINCT ON ({}) {}", group.render(), expr.render()))
}

/// `NOW()`, usable in SET positions for timestamp columns.
pub fn now() -> FnExpr {
    FnExpr::raw("NOW()".to_string())
}

/// `CURRENT_DATE`.
pub fn current_date() -> FnExpr {
    FnExpr::raw("CURRENT_DATE".to_string())
}

/// SQL `NULL`, usable in SET positions to clear a nullable column.
pub fn null_value() -> FnExpr {
    FnExpr::raw("NULL".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;

    fn id_field() -> Field<i64> {
        Field::new("orders", 1, "id", "bigint")
    }

    #[test]
    fn aggregates_render_over_qualified_fields() {
        let id = id_field();
        assert_eq!(count(&id).render(), "COUNT(orders.id)");
        assert_eq!(count_star().render(), "COUNT(*)");
        assert_eq!(min(&id).render(), "MIN(orders.id)");
        assert_eq!(max(&id).render(), "MAX(orders.id)");
        assert_eq!(distinct(&id).render(), "DISTINCT(orders.id)");
    }

    #[test]
    fn distinct_on_takes_group_then_projection() {
        let id = id_field();
        let status: Field<String> = Field::new("orders", 2, "status", "text");
        assert_eq!(
            distinct_on(&status, &id).render(),
            "DISTINCT ON (orders.status) orders.id"
        );
    }

    #[test]
    fn fn_expr_alias_sets_output_key() {
        let total = count_star().as_("Total");
        assert_eq!(total.render(), "COUNT(*)");
        assert_eq!(total.output_key(), "total");
        // Unaliased computed expressions key on their rendered text.
        assert_eq!(count_star().output_key(), "COUNT(*)");
    }

    #[test]
    fn fn_expr_sorts_by_alias_when_present() {
        let total = count_star().as_("total");
        assert_eq!(total.desc().render(), "total");
        assert_eq!(count_star().asc().render(), "COUNT(*)");
    }
}
