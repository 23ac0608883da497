//! Positional parameter storage shared across a whole statement render.

use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A clone-friendly parameter wrapper using Arc.
///
/// Conditions and assignments capture their values at construction time;
/// wrapping in Arc lets the immutable part chain be cloned (e.g. when a
/// builder stage is reused as a subquery) without copying parameter values.
#[derive(Clone)]
pub struct Param(Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Create a new parameter from any ToSql value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Get a reference to the inner value as a ToSql trait object.
    pub fn as_ref(&self) -> &(dyn ToSql + Sync) {
        // Arc<dyn ToSql + Send + Sync> -> &(dyn ToSql + Sync)
        &*self.0 as &(dyn ToSql + Sync)
    }

    /// Debug text of the value, truncated for trace logging.
    ///
    /// Values whose debug form exceeds 15 characters are shown as a
    /// 12-character prefix plus an ellipsis.
    pub(crate) fn display_truncated(&self) -> String {
        let text = format!("{:?}", self.0);
        if text.chars().count() > 15 {
            let prefix: String = text.chars().take(12).collect();
            format!("{}...", prefix)
        } else {
            text
        }
    }
}

impl std::fmt::Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Param").field(&self.0).finish()
    }
}

/// The shared positional parameter buffer for one statement render.
///
/// Placeholder numbers are 1-based and strictly increasing: a condition pushes
/// its value and emits `$<len>`. Subqueries render against their caller's
/// buffer, so their placeholders continue the outer numbering.
#[derive(Clone, Debug, Default)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter and return its 1-based placeholder index.
    pub fn push(&mut self, param: Param) -> usize {
        self.params.push(param);
        self.params.len()
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Get all parameters as references for tokio-postgres.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }

    /// Debug text of every value, used by tests and trace logging.
    pub fn debug_values(&self) -> Vec<String> {
        self.params.iter().map(|p| format!("{:?}", p.0)).collect()
    }

    /// Comma-joined truncated representation for trace logging.
    pub(crate) fn display_truncated(&self) -> String {
        self.params
            .iter()
            .map(|p| p.display_truncated())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_returns_one_based_index() {
        let mut params = ParamList::new();
        assert_eq!(params.push(Param::new(1i32)), 1);
        assert_eq!(params.push(Param::new("two")), 2);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn debug_values_preserve_order() {
        let mut params = ParamList::new();
        params.push(Param::new(5i64));
        params.push(Param::new("x"));
        assert_eq!(params.debug_values(), vec!["5", "\"x\""]);
    }

    #[test]
    fn long_values_truncate_for_logging() {
        let param = Param::new("abcdefghijklmnopqrstuvwxyz");
        let shown = param.display_truncated();
        assert!(shown.ends_with("..."));
        // 12-character prefix of the debug text (which includes the quote)
        assert_eq!(shown, "\"abcdefghijk...");
    }

    #[test]
    fn short_values_pass_through() {
        assert_eq!(Param::new(42i32).display_truncated(), "42");
    }

    #[test]
    fn rich_types_bind_as_params() {
        let mut params = ParamList::new();
        params.push(Param::new(uuid::Uuid::nil()));
        params.push(Param::new(chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        params.push(Param::new(serde_json::json!({"k": "v"})));
        assert_eq!(params.as_refs().len(), 3);
    }
}
