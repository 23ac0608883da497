//! DELETE construction.

use super::{Execute, PartChain, QueryPart};
use crate::condition::Condition;
use crate::schema::Table;

/// Start a DELETE against a table. Without a filter this deletes every row;
/// both stages execute, so narrowing with [`DeleteFromPart::where_`] is the
/// caller's responsibility.
pub fn delete_from(table: &Table) -> DeleteFromPart {
    DeleteFromPart {
        chain: PartChain::new().push(QueryPart::DeleteFrom(table.name().to_string())),
    }
}

/// Target table chosen; optionally filtered, then executed.
#[derive(Debug, Clone)]
pub struct DeleteFromPart {
    chain: PartChain,
}

impl DeleteFromPart {
    pub fn where_(self, condition: Condition) -> DeleteWherePart {
        DeleteWherePart {
            chain: self.chain.push(QueryPart::Where(condition)),
        }
    }
}

/// Filter applied; the statement is complete.
#[derive(Debug, Clone)]
pub struct DeleteWherePart {
    chain: PartChain,
}

impl Execute for DeleteFromPart {
    fn chain(&self) -> &PartChain {
        &self.chain
    }
}

impl Execute for DeleteWherePart {
    fn chain(&self) -> &PartChain {
        &self.chain
    }
}
