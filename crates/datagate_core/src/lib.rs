//! Minimal data mapper over SQLite.
//!
//! Models implement [`Model`]; [`Gateway`] derives their table from the
//! declared type name, builds one statement per call and stamps the
//! `created`/`updated`/`deleted` lifecycle.

pub mod clock;
pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod naming;
pub mod sql;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConnectionOptions, GatewayOptions, LoggingConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use gateway::{DeleteMode, Gateway, GatewayError, GatewayResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::{Fields, Lifecycle, LifecycleState, Model, Timestamp};
pub use naming::model_to_table;
pub use sea_query::Value;
pub use sql::{CompareOp, Join, JoinColumn, JoinKind, Predicate};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
