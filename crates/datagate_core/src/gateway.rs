//! Model-level reads, writes and deletes over a SQLite connection.
//!
//! # Responsibility
//! - Derive the table from the model type and build one statement per call.
//! - Own lifecycle stamping: `created` on insert, `updated` on update,
//!   `deleted` on soft delete.
//! - Propagate store errors unchanged.
//!
//! # Invariants
//! - Column/value mismatches are rejected before any SQL runs.
//! - Insert vs update is decided once, from `Model::id()`.
//! - Lifecycle fields change only after the statement succeeds.
//! - No identity predicate is injected; callers target rows explicitly.
//! - UPDATE and hard DELETE without predicates are rejected unless
//!   `GatewayOptions::allow_unfiltered_writes` is set.

use crate::clock::{Clock, SystemClock};
use crate::config::GatewayOptions;
use crate::model::lifecycle::{timestamp_to_value, truncate_to_millis};
use crate::model::{
    Fields, Model, Timestamp, CREATED_COLUMN, DELETED_COLUMN, GATEWAY_OWNED_COLUMNS,
    UPDATED_COLUMN,
};
use crate::sql::{all_of, Join, Predicate};
use log::{debug, error, info, warn};
use rusqlite::Connection;
use sea_query::{Alias, Asterisk, Query, SimpleExpr, SqliteQueryBuilder};
use sea_query_rusqlite::{RusqliteBinder, RusqliteValues};
use std::time::Instant;
use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway failure.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// `Model::extract()` returned misaligned columns and values.
    #[error("column count ({columns}) and value count ({values}) don't match for `{table}`")]
    ColumnValueMismatch {
        table: String,
        columns: usize,
        values: usize,
    },
    /// UPDATE or DELETE without predicates while not opted in.
    #[error("refusing unfiltered {operation} on `{table}`: supply at least one predicate")]
    UnfilteredWrite {
        operation: &'static str,
        table: String,
    },
    /// Soft delete requested for a model that was never inserted.
    #[error("cannot soft-delete a `{table}` row that was never persisted")]
    NotPersisted { table: String },
    /// Store-side failure, passed through untouched.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// How `Gateway::delete` removes a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteMode {
    /// Stamp `deleted` and keep the row.
    #[default]
    Soft,
    /// Physically remove matching rows.
    Hard,
}

/// Which lifecycle column an update-path write commits.
#[derive(Debug, Clone, Copy)]
enum UpdateStamp {
    Updated(Timestamp),
    Deleted(Timestamp),
}

/// Translates model intents into statements on one borrowed connection.
pub struct Gateway<'conn> {
    conn: &'conn Connection,
    options: GatewayOptions,
    clock: Box<dyn Clock>,
}

impl<'conn> Gateway<'conn> {
    /// Wraps a borrowed connection.
    ///
    /// Identifiers are emitted double-quoted. Connections opened through
    /// `open_db`/`open_db_in_memory` reject unknown double-quoted names;
    /// a caller-opened connection must disable SQLite's double-quoted
    /// string literals (`SQLITE_DBCONFIG_DQS_DML`) itself, or a misspelled
    /// column silently compares as a string.
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            options: GatewayOptions::default(),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_options(mut self, options: GatewayOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the time source used for lifecycle stamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn options(&self) -> &GatewayOptions {
        &self.options
    }

    /// Reads every `M` matching all `predicates`, combined with `joins`.
    ///
    /// Rows come back in store order, one model per record. No ordering or
    /// limit is added.
    pub fn get<M: Model>(&self, joins: &[Join], predicates: &[Predicate]) -> GatewayResult<Vec<M>> {
        let started_at = Instant::now();
        let table = M::table_name();

        let mut query = Query::select();
        query
            .column((Alias::new(&table), Asterisk))
            .from(Alias::new(&table));
        for join in joins {
            join.apply(&mut query);
        }
        if let Some(condition) = all_of(predicates) {
            query.cond_where(condition);
        }
        let (sql, values) = query.build_rusqlite(SqliteQueryBuilder);

        match self.fetch::<M>(&sql, &values) {
            Ok(models) => {
                debug!(
                    "event=gateway_get module=gateway status=ok table={} joins={} predicates={} rows={} duration_ms={}",
                    table,
                    joins.len(),
                    predicates.len(),
                    models.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(models)
            }
            Err(err) => {
                error!(
                    "event=gateway_get module=gateway status=error table={} duration_ms={} error={}",
                    table,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Inserts a new model or updates a persisted one.
    ///
    /// Returns the generated id for inserts and `None` for updates. On the
    /// update path `predicates` select the target rows.
    pub fn persist<M: Model>(
        &self,
        model: &mut M,
        predicates: &[Predicate],
    ) -> GatewayResult<Option<i64>> {
        let table = M::table_name();
        let fields = self.persistable_fields(model, &table)?;

        match model.id() {
            None => self.insert(model, &table, fields).map(Some),
            Some(_) => {
                let stamp = match model.lifecycle().deleted() {
                    None => UpdateStamp::Updated(self.now()),
                    Some(deleted_at) => UpdateStamp::Deleted(deleted_at),
                };
                self.update(model, &table, fields, predicates, stamp)
                    .map(|()| None)
            }
        }
    }

    /// Soft-deletes (tombstones) or hard-deletes a model's rows.
    ///
    /// A soft delete is an update-path persist that commits a fresh
    /// `deleted` stamp; the row stays in the table.
    pub fn delete<M: Model>(
        &self,
        model: &mut M,
        mode: DeleteMode,
        predicates: &[Predicate],
    ) -> GatewayResult<Option<i64>> {
        match mode {
            DeleteMode::Soft => self.soft_delete(model, predicates),
            DeleteMode::Hard => {
                self.hard_delete::<M>(predicates)?;
                Ok(None)
            }
        }
    }

    /// Shorthand for `delete(model, DeleteMode::Soft, predicates)`.
    pub fn soft_delete<M: Model>(
        &self,
        model: &mut M,
        predicates: &[Predicate],
    ) -> GatewayResult<Option<i64>> {
        let table = M::table_name();
        if model.id().is_none() {
            warn!(
                "event=gateway_delete module=gateway status=rejected mode=soft table={} reason=not_persisted",
                table
            );
            return Err(GatewayError::NotPersisted { table });
        }

        let fields = self.persistable_fields(model, &table)?;
        let stamp = UpdateStamp::Deleted(self.now());
        self.update(model, &table, fields, predicates, stamp)?;
        Ok(None)
    }

    fn hard_delete<M: Model>(&self, predicates: &[Predicate]) -> GatewayResult<()> {
        let started_at = Instant::now();
        let table = M::table_name();
        self.ensure_filtered("delete", &table, predicates)?;

        let mut query = Query::delete();
        query.from_table(Alias::new(&table));
        if let Some(condition) = all_of(predicates) {
            query.cond_where(condition);
        }
        let (sql, values) = query.build_rusqlite(SqliteQueryBuilder);

        match self.execute(&sql, &values) {
            Ok(changed) => {
                info!(
                    "event=gateway_delete module=gateway status=ok mode=hard table={} rows={} duration_ms={}",
                    table,
                    changed,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=gateway_delete module=gateway status=error mode=hard table={} duration_ms={} error={}",
                    table,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn insert<M: Model>(&self, model: &mut M, table: &str, fields: Fields) -> GatewayResult<i64> {
        let started_at = Instant::now();
        let created_at = self.now();

        let (mut columns, mut values) = fields.into_parts();
        columns.push(CREATED_COLUMN.to_string());
        values.push(timestamp_to_value(created_at));
        let column_count = columns.len();
        let value_count = values.len();

        let mut query = Query::insert();
        query
            .into_table(Alias::new(table))
            .columns(columns.into_iter().map(Alias::new))
            .values(values.into_iter().map(SimpleExpr::from))
            .map_err(|_| GatewayError::ColumnValueMismatch {
                table: table.to_string(),
                columns: column_count,
                values: value_count,
            })?;
        let (sql, values) = query.build_rusqlite(SqliteQueryBuilder);

        match self.execute(&sql, &values) {
            Ok(_) => {
                let id = self.conn.last_insert_rowid();
                model.lifecycle_mut().set_created(created_at);
                info!(
                    "event=gateway_persist module=gateway status=ok path=insert table={} columns={} id={} duration_ms={}",
                    table,
                    column_count,
                    id,
                    started_at.elapsed().as_millis()
                );
                Ok(id)
            }
            Err(err) => {
                error!(
                    "event=gateway_persist module=gateway status=error path=insert table={} duration_ms={} error={}",
                    table,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn update<M: Model>(
        &self,
        model: &mut M,
        table: &str,
        fields: Fields,
        predicates: &[Predicate],
        stamp: UpdateStamp,
    ) -> GatewayResult<()> {
        let started_at = Instant::now();
        self.ensure_filtered("update", table, predicates)?;

        let (columns, values) = fields.into_parts();
        let mut query = Query::update();
        query.table(Alias::new(table));
        for (column, value) in columns.into_iter().zip(values) {
            query.value(Alias::new(column), value);
        }
        let (path, stamp_column, stamp_at) = match stamp {
            UpdateStamp::Updated(at) => ("update", UPDATED_COLUMN, at),
            UpdateStamp::Deleted(at) => ("soft_delete", DELETED_COLUMN, at),
        };
        query.value(Alias::new(stamp_column), timestamp_to_value(stamp_at));
        if let Some(condition) = all_of(predicates) {
            query.cond_where(condition);
        }
        let (sql, values) = query.build_rusqlite(SqliteQueryBuilder);

        match self.execute(&sql, &values) {
            Ok(changed) => {
                let lifecycle = model.lifecycle_mut();
                match stamp {
                    UpdateStamp::Updated(at) => lifecycle.set_updated(at),
                    UpdateStamp::Deleted(at) => lifecycle.set_deleted(at),
                }
                info!(
                    "event=gateway_persist module=gateway status=ok path={} table={} rows={} duration_ms={}",
                    path,
                    table,
                    changed,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=gateway_persist module=gateway status=error path={} table={} duration_ms={} error={}",
                    path,
                    table,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Extracts, checks alignment, and strips gateway-owned columns.
    fn persistable_fields<M: Model>(&self, model: &M, table: &str) -> GatewayResult<Fields> {
        let fields = model.extract();
        if !fields.is_aligned() {
            let columns = fields.columns().len();
            let values = fields.values().len();
            error!(
                "event=gateway_persist module=gateway status=error table={} error_code=column_value_mismatch columns={} values={}",
                table, columns, values
            );
            return Err(GatewayError::ColumnValueMismatch {
                table: table.to_string(),
                columns,
                values,
            });
        }

        Ok(fields.without(GATEWAY_OWNED_COLUMNS))
    }

    fn ensure_filtered(
        &self,
        operation: &'static str,
        table: &str,
        predicates: &[Predicate],
    ) -> GatewayResult<()> {
        if !predicates.is_empty() {
            return Ok(());
        }

        if self.options.allow_unfiltered_writes {
            warn!(
                "event=gateway_unfiltered_write module=gateway status=allowed operation={} table={}",
                operation, table
            );
            return Ok(());
        }

        warn!(
            "event=gateway_unfiltered_write module=gateway status=rejected operation={} table={}",
            operation, table
        );
        Err(GatewayError::UnfilteredWrite {
            operation,
            table: table.to_string(),
        })
    }

    /// Stamp time, truncated to the millisecond precision the store keeps.
    fn now(&self) -> Timestamp {
        truncate_to_millis(self.clock.now())
    }

    fn fetch<M: Model>(&self, sql: &str, values: &RusqliteValues) -> rusqlite::Result<Vec<M>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(&*values.as_params())?;
        let mut models = Vec::new();

        while let Some(row) = rows.next()? {
            models.push(M::from_row(row)?);
        }

        Ok(models)
    }

    fn execute(&self, sql: &str, values: &RusqliteValues) -> rusqlite::Result<usize> {
        self.conn.execute(sql, &*values.as_params())
    }
}
