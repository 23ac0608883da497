//! UPDATE construction and the shared mutation terminal surface.

use super::{AssignValue, Assignment, PartChain, QueryPart};
use crate::error::QueryResult;
use crate::executor::{Executor, Runnable};
use crate::expr::FnExpr;
use crate::param::{Param, ParamList};
use crate::record::ExecResult;
use crate::schema::{Field, Table};
use tokio_postgres::types::ToSql;

/// Terminal surface of a complete mutation: rendering and execution.
///
/// Every mutation runs inside its own transaction; [`Execute::runnable`]
/// exposes the unit so several mutations can be grouped into one transaction
/// through [`Executor::transaction`].
pub trait Execute: Sync {
    fn chain(&self) -> &PartChain;

    fn render(&self) -> (String, ParamList) {
        self.chain().build()
    }

    fn to_sql(&self) -> String {
        self.render().0
    }

    /// Package the statement for execution, alone or grouped with others.
    fn runnable(&self) -> Runnable {
        let (sql, params) = self.render();
        Runnable::new(sql, params)
    }

    /// Run the mutation in its own transaction.
    fn execute(
        &self,
        exec: &impl Executor,
    ) -> impl Future<Output = QueryResult<ExecResult<()>>> + Send {
        async move {
            let outcome = exec.execute_in_transaction(self.runnable()).await?;
            Ok(ExecResult::new(Vec::new(), outcome.row_count))
        }
    }
}

/// Start an UPDATE against a table.
pub fn update(table: &Table) -> UpdatePart {
    UpdatePart {
        chain: PartChain::new().push(QueryPart::Update(table.name().to_string())),
    }
}

/// Target table chosen; at least one assignment is required.
#[derive(Debug, Clone)]
pub struct UpdatePart {
    chain: PartChain,
}

impl UpdatePart {
    pub fn set<T: ToSql + Send + Sync + 'static>(self, field: &Field<T>, value: T) -> SetPart {
        SetPart {
            chain: self.chain.push(QueryPart::Set(vec![assign_value(field, value)])),
        }
    }

    pub fn set_expr<T>(self, field: &Field<T>, expr: &FnExpr) -> SetPart {
        SetPart {
            chain: self.chain.push(QueryPart::Set(vec![assign_expr(field, expr)])),
        }
    }
}

/// Assignments accumulating in call order; more may be added, or the
/// statement filtered and executed.
#[derive(Debug, Clone)]
pub struct SetPart {
    chain: PartChain,
}

impl SetPart {
    pub fn set<T: ToSql + Send + Sync + 'static>(mut self, field: &Field<T>, value: T) -> Self {
        self.push_assignment(assign_value(field, value));
        self
    }

    pub fn set_expr<T>(mut self, field: &Field<T>, expr: &FnExpr) -> Self {
        self.push_assignment(assign_expr(field, expr));
        self
    }

    pub fn where_(self, condition: crate::condition::Condition) -> UpdateWherePart {
        UpdateWherePart {
            chain: self.chain.push(QueryPart::Where(condition)),
        }
    }

    fn push_assignment(&mut self, assignment: Assignment) {
        if let Some(QueryPart::Set(assignments)) = self.chain.parts.last_mut() {
            assignments.push(assignment);
        }
    }
}

/// Filter applied; the statement is complete.
#[derive(Debug, Clone)]
pub struct UpdateWherePart {
    chain: PartChain,
}

impl Execute for SetPart {
    fn chain(&self) -> &PartChain {
        &self.chain
    }
}

impl Execute for UpdateWherePart {
    fn chain(&self) -> &PartChain {
        &self.chain
    }
}

fn assign_value<T: ToSql + Send + Sync + 'static>(field: &Field<T>, value: T) -> Assignment {
    Assignment {
        column: field.name().to_string(),
        value: AssignValue::Value(Param::new(value)),
    }
}

fn assign_expr<T>(field: &Field<T>, expr: &FnExpr) -> Assignment {
    use crate::expr::FieldExpr;
    Assignment {
        column: field.name().to_string(),
        value: AssignValue::Expr(expr.render()),
    }
}
