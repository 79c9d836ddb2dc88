//! Model contract consumed by the gateway.
//!
//! # Responsibility
//! - Define what a domain entity must expose to be read, written and
//!   soft-deleted through `Gateway`.
//! - Keep lifecycle timestamps owned by the gateway, not by callers.
//!
//! # Invariants
//! - `id() == None` means the entity has never been inserted.
//! - `lifecycle().deleted().is_some()` means the entity is soft-deleted.
//! - Table names derive from `TYPE_NAME` only, never from runtime type data.

pub mod fields;
pub mod lifecycle;

use crate::naming::model_to_table;
use rusqlite::Row;

pub use fields::Fields;
pub use lifecycle::{Lifecycle, LifecycleState, Timestamp};

/// Column holding the store-generated identifier.
pub const ID_COLUMN: &str = "id";
/// Non-persistent payload column; always dropped from writes.
pub const EXTRA_DATA_COLUMN: &str = "extra_data";
/// Insert timestamp column.
pub const CREATED_COLUMN: &str = "created";
/// Last non-deleting write timestamp column.
pub const UPDATED_COLUMN: &str = "updated";
/// Soft-delete tombstone column.
pub const DELETED_COLUMN: &str = "deleted";

/// Columns the gateway strips from `Model::extract()` before writing.
pub(crate) const GATEWAY_OWNED_COLUMNS: &[&str] = &[
    ID_COLUMN,
    EXTRA_DATA_COLUMN,
    CREATED_COLUMN,
    UPDATED_COLUMN,
    DELETED_COLUMN,
];

/// Domain entity persisted through `Gateway`.
///
/// Implemented explicitly by each entity type.
pub trait Model: Sized {
    /// Declared type name, e.g. `"UserAccount"` or `"app::model::UserAccount"`.
    const TYPE_NAME: &'static str;

    /// Builds one entity from a selected record.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Persistable fields as column/value pairs.
    fn extract(&self) -> Fields;

    /// Store-generated identifier, `None` before the first insert.
    fn id(&self) -> Option<i64>;

    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Table this model is stored in.
    fn table_name() -> String {
        model_to_table(Self::TYPE_NAME)
    }

    /// Current lifecycle state derived from `id()` and the tombstone.
    fn state(&self) -> LifecycleState {
        LifecycleState::of(self.id(), self.lifecycle())
    }
}
