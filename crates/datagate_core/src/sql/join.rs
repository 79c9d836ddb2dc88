//! Join descriptors for reads.

use crate::model::Model;
use crate::naming::model_to_table;
use crate::sql::predicate::Predicate;
use sea_query::{Alias, Expr, JoinType, SelectStatement};

/// Join type, always chosen by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    /// `FULL OUTER JOIN`.
    Outer,
}

impl From<JoinKind> for JoinType {
    fn from(kind: JoinKind) -> Self {
        match kind {
            JoinKind::Inner => JoinType::InnerJoin,
            JoinKind::Left => JoinType::LeftJoin,
            JoinKind::Right => JoinType::RightJoin,
            JoinKind::Outer => JoinType::FullOuterJoin,
        }
    }
}

/// One column selected from a joined table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinColumn {
    pub name: String,
    pub alias: Option<String>,
}

impl JoinColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }
}

/// An additional table combined into a read.
#[derive(Debug, Clone)]
pub struct Join {
    table: String,
    on: Predicate,
    columns: Vec<JoinColumn>,
    kind: JoinKind,
}

impl Join {
    /// Joins the table of model `M`.
    pub fn to<M: Model>(on: Predicate, columns: Vec<JoinColumn>, kind: JoinKind) -> Self {
        Self::for_type(M::TYPE_NAME, on, columns, kind)
    }

    /// Joins the table derived from a declared type name.
    pub fn for_type(type_name: &str, on: Predicate, columns: Vec<JoinColumn>, kind: JoinKind) -> Self {
        Self {
            table: model_to_table(type_name),
            on,
            columns,
            kind,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }

    pub fn columns(&self) -> &[JoinColumn] {
        &self.columns
    }

    /// Adds the join clause and this join's qualified columns to `select`.
    pub(crate) fn apply(&self, select: &mut SelectStatement) {
        for column in &self.columns {
            let qualified = Expr::col((Alias::new(&self.table), Alias::new(&column.name)));
            match &column.alias {
                Some(alias) => select.expr_as(qualified, Alias::new(alias)),
                None => select.expr(qualified),
            };
        }
        select.join(self.kind.into(), Alias::new(&self.table), self.on.condition());
    }
}
