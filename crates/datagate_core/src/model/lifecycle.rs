//! Gateway-owned lifecycle timestamps.
//!
//! # Responsibility
//! - Hold `created`/`updated`/`deleted` for one entity.
//! - Expose read access to callers and stamping to the gateway only.
//!
//! # Invariants
//! - `created` is stamped once, by the insert path.
//! - `updated` is stamped by update-path writes without a tombstone.
//! - `deleted` is stamped by a soft delete and is never cleared here.
//! - Timestamps are stored as unix epoch milliseconds.

use crate::model::{CREATED_COLUMN, DELETED_COLUMN, UPDATED_COLUMN};
use chrono::{DateTime, Timelike, Utc};
use rusqlite::Row;
use sea_query::Value;

/// Lifecycle timestamp type.
pub type Timestamp = DateTime<Utc>;

/// Persistence state of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Constructed, never inserted.
    New,
    /// Inserted and not tombstoned.
    Persisted,
    /// Tombstoned via soft delete; the row still exists.
    SoftDeleted,
}

impl LifecycleState {
    pub(crate) fn of(id: Option<i64>, lifecycle: &Lifecycle) -> Self {
        match (id, lifecycle.deleted) {
            (None, _) => Self::New,
            (Some(_), None) => Self::Persisted,
            (Some(_), Some(_)) => Self::SoftDeleted,
        }
    }
}

/// The three lifecycle timestamps of one entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifecycle {
    created: Option<Timestamp>,
    updated: Option<Timestamp>,
    deleted: Option<Timestamp>,
}

impl Lifecycle {
    /// Lifecycle for a freshly constructed entity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a lifecycle from values already held by the store.
    pub fn from_stored(
        created: Option<Timestamp>,
        updated: Option<Timestamp>,
        deleted: Option<Timestamp>,
    ) -> Self {
        Self {
            created,
            updated,
            deleted,
        }
    }

    /// Reads the `created`/`updated`/`deleted` columns of a selected row.
    ///
    /// Missing columns are an error; `NULL` values map to `None`.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            created: timestamp_column(row, CREATED_COLUMN)?,
            updated: timestamp_column(row, UPDATED_COLUMN)?,
            deleted: timestamp_column(row, DELETED_COLUMN)?,
        })
    }

    pub fn created(&self) -> Option<Timestamp> {
        self.created
    }

    pub fn updated(&self) -> Option<Timestamp> {
        self.updated
    }

    pub fn deleted(&self) -> Option<Timestamp> {
        self.deleted
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted.is_some()
    }

    pub(crate) fn set_created(&mut self, at: Timestamp) {
        self.created = Some(at);
    }

    pub(crate) fn set_updated(&mut self, at: Timestamp) {
        self.updated = Some(at);
    }

    pub(crate) fn set_deleted(&mut self, at: Timestamp) {
        self.deleted = Some(at);
    }
}

/// Truncates to the millisecond precision the store keeps.
pub(crate) fn truncate_to_millis(at: Timestamp) -> Timestamp {
    let millis_only = (at.nanosecond() / 1_000_000) * 1_000_000;
    at.with_nanosecond(millis_only).unwrap_or(at)
}

pub(crate) fn timestamp_to_value(at: Timestamp) -> Value {
    Value::BigInt(Some(at.timestamp_millis()))
}

fn timestamp_column(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<Timestamp>> {
    let Some(millis) = row.get::<_, Option<i64>>(column)? else {
        return Ok(None);
    };

    match DateTime::from_timestamp_millis(millis) {
        Some(at) => Ok(Some(at)),
        None => {
            let index = row.as_ref().column_index(column)?;
            Err(rusqlite::Error::IntegralValueOutOfRange(index, millis))
        }
    }
}
