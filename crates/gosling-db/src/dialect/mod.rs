mod mysql;
mod postgres;
mod redshift;
mod sqlite;
mod tidb;

use std::fmt;

use tracing::debug;

use crate::handle::{DriverError, VersionCursor, VersionHandle};

pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;
pub use redshift::RedshiftDialect;
pub use sqlite::Sqlite3Dialect;
pub use tidb::TiDbDialect;

/// Name of the version-history table. Shared by the DDL, insert and query.
pub const VERSION_TABLE: &str = "goose_db_version";

/// History query used by every built-in dialect. Newest event first.
pub const VERSION_HISTORY_QUERY: &str =
    "SELECT version_id, is_applied FROM goose_db_version ORDER BY id DESC";

/// SQL generation and history lookup for one database backend.
///
/// Implementations carry no state. Install a custom one with
/// [`ActiveDialect::set_custom`](crate::ActiveDialect::set_custom).
pub trait Dialect: Send + Sync + fmt::Debug {
    /// DDL creating the version table (`id`, `version_id`, `is_applied`,
    /// `tstamp`). Running it against an existing table fails.
    fn create_version_table_sql(&self) -> &str;

    /// Insert for one history row. Binds exactly two parameters, in order:
    /// `version_id`, then `is_applied`.
    fn insert_version_sql(&self) -> &str;

    /// Read every history row, newest first, projecting `version_id` and
    /// `is_applied`. Driver failures are returned as-is.
    fn db_version_query<'h>(
        &self,
        handle: &'h dyn VersionHandle,
    ) -> Result<VersionCursor<'h>, DriverError>;
}

/// Run [`VERSION_HISTORY_QUERY`] on `handle`.
pub fn query_version_history<'h>(
    handle: &'h dyn VersionHandle,
) -> Result<VersionCursor<'h>, DriverError> {
    debug!(table = VERSION_TABLE, "querying version history");
    handle.query_versions(VERSION_HISTORY_QUERY)
}
