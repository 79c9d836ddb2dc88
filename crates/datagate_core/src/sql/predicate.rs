//! WHERE/ON condition expressions.

use crate::sql::column_ref;
use sea_query::{BinOper, Cond, Condition, Expr, SimpleExpr, Value};

/// Binary comparison against a bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
}

/// Filter condition used in WHERE clauses and join conditions.
///
/// Column names are `column` or `table.column`. Values are bound
/// parameters; anything convertible into a `sea_query::Value` works,
/// including `&str`, integers and `Option`s.
#[derive(Debug, Clone)]
pub struct Predicate(Condition);

impl Predicate {
    pub fn compare(column: &str, op: CompareOp, value: impl Into<Value>) -> Self {
        let op = match op {
            CompareOp::Eq => BinOper::Equal,
            CompareOp::NotEq => BinOper::NotEqual,
            CompareOp::Lt => BinOper::SmallerThan,
            CompareOp::Lte => BinOper::SmallerThanOrEqual,
            CompareOp::Gt => BinOper::GreaterThan,
            CompareOp::Gte => BinOper::GreaterThanOrEqual,
            CompareOp::Like => BinOper::Like,
        };
        Self::from_expr(Expr::col(column_ref(column)).binary(op, value.into()))
    }

    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    pub fn not_eq(column: &str, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::NotEq, value)
    }

    pub fn lt(column: &str, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Lt, value)
    }

    pub fn lte(column: &str, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Lte, value)
    }

    pub fn gt(column: &str, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Gt, value)
    }

    pub fn gte(column: &str, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Gte, value)
    }

    pub fn like(column: &str, pattern: &str) -> Self {
        Self::compare(column, CompareOp::Like, pattern)
    }

    /// `left = right`, both identifiers. Used for join conditions.
    pub fn column_eq(left: &str, right: &str) -> Self {
        Self::from_expr(Expr::col(column_ref(left)).equals(column_ref(right)))
    }

    pub fn is_null(column: &str) -> Self {
        Self::from_expr(Expr::col(column_ref(column)).is_null())
    }

    pub fn is_not_null(column: &str) -> Self {
        Self::from_expr(Expr::col(column_ref(column)).is_not_null())
    }

    /// `column IN (...)`; an empty list matches nothing.
    pub fn in_list<V: Into<Value>>(column: &str, values: impl IntoIterator<Item = V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::from_expr(Expr::col(column_ref(column)).is_in(values))
    }

    /// Raw SQL fragment with its own `?` placeholders.
    pub fn expression<V: Into<Value>>(sql: &str, params: impl IntoIterator<Item = V>) -> Self {
        Self::from_expr(Expr::cust_with_values(sql, params))
    }

    pub fn and(self, other: Predicate) -> Self {
        Self(Cond::all().add(self.0).add(other.0))
    }

    pub fn or(self, other: Predicate) -> Self {
        Self(Cond::any().add(self.0).add(other.0))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self(self.0.not())
    }

    pub(crate) fn condition(&self) -> Condition {
        self.0.clone()
    }

    fn from_expr(expr: SimpleExpr) -> Self {
        Self(Cond::all().add(expr))
    }
}

impl From<Condition> for Predicate {
    fn from(condition: Condition) -> Self {
        Self(condition)
    }
}
