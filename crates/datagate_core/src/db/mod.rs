//! SQLite connection bootstrap.
//!
//! # Responsibility
//! - Open file or in-memory connections for use with `Gateway`.
//! - Apply connection pragmas from `ConnectionOptions`.
//!
//! # Invariants
//! - Schemas belong to the caller; nothing here creates or migrates tables.

use std::path::PathBuf;
use thiserror::Error;

mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to open database `{}`: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to configure connection: {0}")]
    Configure(#[from] rusqlite::Error),
}
