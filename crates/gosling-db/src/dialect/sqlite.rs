use super::{Dialect, query_version_history};
use crate::handle::{DriverError, VersionCursor, VersionHandle};

const CREATE_VERSION_TABLE: &str = "CREATE TABLE goose_db_version (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    version_id INTEGER NOT NULL,
    is_applied INTEGER NOT NULL,
    tstamp TIMESTAMP DEFAULT (datetime('now'))
);";

const INSERT_VERSION: &str = "INSERT INTO goose_db_version (version_id, is_applied) VALUES (?, ?);";

/// SQLite 3. Booleans are stored as integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sqlite3Dialect;

impl Dialect for Sqlite3Dialect {
    fn create_version_table_sql(&self) -> &str {
        CREATE_VERSION_TABLE
    }

    fn insert_version_sql(&self) -> &str {
        INSERT_VERSION
    }

    fn db_version_query<'h>(
        &self,
        handle: &'h dyn VersionHandle,
    ) -> Result<VersionCursor<'h>, DriverError> {
        query_version_history(handle)
    }
}
