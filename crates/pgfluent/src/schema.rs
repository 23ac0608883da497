//! Schema descriptors: tables, typed columns and sort keys.
//!
//! These are immutable value objects, typically declared once per schema and
//! shared. Every combinator (`aliased`, `as_`, `asc`, `desc`) returns a new
//! descriptor; nothing is ever mutated in place.

use crate::expr::{Comparable, FieldExpr, FnExpr};
use std::marker::PhantomData;
use tokio_postgres::types::ToSql;

/// A table handle.
///
/// The alias set by [`Table::aliased`] is informational only: fields keep
/// rendering their qualifier from the original table name, so joining the
/// same table twice under different aliases produces identical column
/// references. This matches the behavior the builder has always had; callers
/// that need self-joins must declare a second table with a distinct name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    alias: Option<String>,
}

impl Table {
    /// Create a table handle.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    /// Return a new handle for the same table under a display alias.
    pub fn aliased(&self, alias: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            alias: Some(alias.into()),
        }
    }

    /// The table name as used in FROM/JOIN/UPDATE/INSERT/DELETE clauses.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The display alias, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Declare a typed column of this table.
    pub fn field<T>(&self, ordinal: u32, name: &str, data_type: &'static str) -> Field<T> {
        Field::new(&self.name, ordinal, name, data_type)
    }
}

/// Sort direction for an ORDER BY key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A typed column descriptor.
///
/// `T` is the Rust type bound to the column; comparisons through
/// [`Comparable`](crate::expr::Comparable) only accept values of that type.
/// Rendering always yields `table.column` regardless of any alias.
pub struct Field<T> {
    table: String,
    ordinal: u32,
    name: String,
    alias: Option<String>,
    data_type: &'static str,
    nullable: bool,
    has_default: bool,
    sort: Option<SortOrder>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Field<T> {
    /// Create a column descriptor. Nullability and default default to false;
    /// use [`Field::nullable`] / [`Field::with_default`] for the rest.
    pub fn new(table: impl Into<String>, ordinal: u32, name: impl Into<String>, data_type: &'static str) -> Self {
        Self {
            table: table.into(),
            ordinal,
            name: name.into(),
            alias: None,
            data_type,
            nullable: false,
            has_default: false,
            sort: None,
            _marker: PhantomData,
        }
    }

    /// Mark the column as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark the column as carrying a database-side default.
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// The bare column name (used in SET/INSERT/RETURNING clauses and as the
    /// output key when no alias is set).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owning table's name.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Ordinal position within the table declaration.
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    /// Declared SQL data type tag.
    pub fn data_type(&self) -> &'static str {
        self.data_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn has_default(&self) -> bool {
        self.has_default
    }

    /// Sort tag carried by this copy, if produced via `asc`/`desc`.
    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }

    /// Copy of this field under a display alias.
    ///
    /// The alias only changes the SELECT output name (`expr AS "alias"`) and
    /// the record lookup key, never the `table.column` qualifier.
    pub fn as_(&self, alias: impl Into<String>) -> Self {
        let mut field = self.clone();
        field.alias = Some(alias.into());
        field.sort = None;
        field
    }

    /// Copy carrying an ascending sort tag, for use as an ORDER BY key.
    pub fn asc(&self) -> Self {
        let mut field = self.clone();
        field.sort = Some(SortOrder::Asc);
        field
    }

    /// Copy carrying a descending sort tag, for use as an ORDER BY key.
    pub fn desc(&self) -> Self {
        let mut field = self.clone();
        field.sort = Some(SortOrder::Desc);
        field
    }

    /// Arithmetic expression `table.column + value`.
    pub fn plus(&self, value: i64) -> FnExpr {
        FnExpr::raw(format!("{} + {}", self.render(), value))
    }

    /// Arithmetic expression `table.column - value`.
    pub fn minus(&self, value: i64) -> FnExpr {
        FnExpr::raw(format!("{} - {}", self.render(), value))
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            ordinal: self.ordinal,
            name: self.name.clone(),
            alias: self.alias.clone(),
            data_type: self.data_type,
            nullable: self.nullable,
            has_default: self.has_default,
            sort: self.sort,
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("table", &self.table)
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("data_type", &self.data_type)
            .finish()
    }
}

impl<T> FieldExpr for Field<T> {
    fn render(&self) -> String {
        format!("{}.{}", self.table, self.name)
    }

    fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

impl<T: ToSql + Send + Sync + 'static> Comparable<T> for Field<T> {}

/// A resolved ORDER BY key: rendered text plus an optional direction.
///
/// For a bare field the text is the qualified `table.column`; for an aliased
/// or computed expression it is the alias if set, else the rendered text.
#[derive(Debug, Clone)]
pub struct SortField {
    text: String,
    order: Option<SortOrder>,
}

impl SortField {
    pub(crate) fn new(text: String, order: Option<SortOrder>) -> Self {
        Self { text, order }
    }

    pub fn render(&self) -> &str {
        &self.text
    }

    pub fn order(&self) -> Option<SortOrder> {
        self.order
    }
}

impl<T> From<&Field<T>> for SortField {
    fn from(field: &Field<T>) -> Self {
        SortField::new(field.render(), field.sort)
    }
}

impl<T> From<Field<T>> for SortField {
    fn from(field: Field<T>) -> Self {
        SortField::from(&field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_name() -> Field<String> {
        Field::new("users", 2, "name", "text")
    }

    #[test]
    fn field_renders_qualified_name() {
        assert_eq!(users_name().render(), "users.name");
    }

    #[test]
    fn alias_never_changes_the_qualifier() {
        let aliased = users_name().as_("display_name");
        assert_eq!(aliased.render(), "users.name");
        assert_eq!(aliased.alias(), Some("display_name"));
        assert_eq!(aliased.output_key(), "display_name");
    }

    #[test]
    fn output_key_lowercases_alias_but_not_name() {
        let field = users_name().as_("DisplayName");
        assert_eq!(field.output_key(), "displayname");
        assert_eq!(users_name().output_key(), "name");
    }

    #[test]
    fn table_alias_is_informational_only() {
        let users = Table::new("users");
        let u2 = users.aliased("u2");
        assert_eq!(u2.name(), "users");
        assert_eq!(u2.alias(), Some("u2"));
        // Fields declared through either handle render identically.
        let via_alias: Field<i64> = u2.field(1, "id", "bigint");
        assert_eq!(via_alias.render(), "users.id");
    }

    #[test]
    fn asc_desc_are_copies() {
        let field = users_name();
        let sorted = field.desc();
        assert_eq!(sorted.sort(), Some(SortOrder::Desc));
        assert_eq!(field.sort(), None);
        let key = SortField::from(&sorted);
        assert_eq!(key.render(), "users.name");
        assert_eq!(key.order(), Some(SortOrder::Desc));
    }

    #[test]
    fn plus_minus_render_inline() {
        let age: Field<i32> = Field::new("users", 3, "age", "integer");
        assert_eq!(age.plus(1).render(), "users.age + 1");
        assert_eq!(age.minus(5).render(), "users.age - 5");
    }
}
