#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use datagate_core::{
    open_db_in_memory, ConnectionOptions, Fields, Lifecycle, Model, Timestamp, Value,
};
use rusqlite::{Connection, Row};

pub const SCHEMA: &str = "
CREATE TABLE user_account (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    created INTEGER,
    updated INTEGER,
    deleted INTEGER
);
CREATE TABLE post (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES user_account(id),
    title TEXT NOT NULL,
    created INTEGER,
    updated INTEGER,
    deleted INTEGER
);
";

pub fn open_with_schema() -> Connection {
    let conn = open_db_in_memory(&ConnectionOptions::default()).unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn
}

pub fn at(seconds: i64) -> Timestamp {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub extra_data: Option<String>,
    lifecycle: Lifecycle,
}

impl UserAccount {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            email: email.to_string(),
            extra_data: None,
            lifecycle: Lifecycle::new(),
        }
    }
}

impl Model for UserAccount {
    const TYPE_NAME: &'static str = "app::model::UserAccount";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            email: row.get("email")?,
            extra_data: None,
            lifecycle: Lifecycle::from_row(row)?,
        })
    }

    fn extract(&self) -> Fields {
        Fields::new()
            .with("id", self.id)
            .with("name", self.name.as_str())
            .with("email", self.email.as_str())
            .with("extra_data", self.extra_data.clone())
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: Option<i64>,
    pub user_id: i64,
    pub title: String,
    /// Filled only when a read joins `user_account.name AS author`.
    pub author: Option<String>,
    lifecycle: Lifecycle,
}

impl Post {
    pub fn new(user_id: i64, title: &str) -> Self {
        Self {
            id: None,
            user_id,
            title: title.to_string(),
            author: None,
            lifecycle: Lifecycle::new(),
        }
    }
}

impl Model for Post {
    const TYPE_NAME: &'static str = "Post";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let author = match row.as_ref().column_index("author") {
            Ok(_) => row.get("author")?,
            Err(_) => None,
        };

        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            title: row.get("title")?,
            author,
            lifecycle: Lifecycle::from_row(row)?,
        })
    }

    fn extract(&self) -> Fields {
        Fields::new()
            .with("user_id", self.user_id)
            .with("title", self.title.as_str())
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }
}

/// Model whose `extract()` returns more columns than values.
#[derive(Debug, Default)]
pub struct UserAccountBroken {
    pub id: Option<i64>,
    lifecycle: Lifecycle,
}

impl UserAccountBroken {
    pub fn persisted(id: i64) -> Self {
        Self {
            id: Some(id),
            lifecycle: Lifecycle::new(),
        }
    }
}

impl Model for UserAccountBroken {
    const TYPE_NAME: &'static str = "UserAccount";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            lifecycle: Lifecycle::from_row(row)?,
        })
    }

    fn extract(&self) -> Fields {
        Fields::from_parts(
            vec!["name".to_string(), "email".to_string()],
            vec![Value::from("only-one-value")],
        )
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }
}

pub fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

pub fn stored_millis(conn: &Connection, table: &str, column: &str, id: i64) -> Option<i64> {
    conn.query_row(
        &format!("SELECT {column} FROM {table} WHERE id = ?1"),
        [id],
        |row| row.get(0),
    )
    .unwrap()
}
