//! Filter and join descriptors over `sea_query`.
//!
//! # Responsibility
//! - Give callers typed WHERE/ON conditions and join descriptors.
//! - Map string column names (optionally `table.column`) to sea-query
//!   column references.
//!
//! # Invariants
//! - Values are always bound, never spliced into SQL text.
//! - Multiple WHERE conditions are combined with AND.

pub mod join;
pub mod predicate;

pub use join::{Join, JoinColumn, JoinKind};
pub use predicate::{CompareOp, Predicate};

use sea_query::{Alias, ColumnRef, Cond, Condition, IntoColumnRef};

/// Resolves `column` or `table.column` into a column reference.
pub(crate) fn column_ref(name: &str) -> ColumnRef {
    match name.split_once('.') {
        Some((table, column)) => (Alias::new(table), Alias::new(column)).into_column_ref(),
        None => Alias::new(name).into_column_ref(),
    }
}

/// Folds predicates into one AND condition, `None` when there are none.
pub(crate) fn all_of(predicates: &[Predicate]) -> Option<Condition> {
    if predicates.is_empty() {
        return None;
    }

    Some(
        predicates
            .iter()
            .fold(Cond::all(), |cond, predicate| cond.add(predicate.condition())),
    )
}
