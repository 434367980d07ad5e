pub mod dialect;
pub mod handle;
pub mod registry;

pub use dialect::{
    Dialect, MySqlDialect, PostgresDialect, RedshiftDialect, Sqlite3Dialect, TiDbDialect,
    VERSION_HISTORY_QUERY, VERSION_TABLE, query_version_history,
};
pub use handle::{DriverError, VersionCursor, VersionHandle, VersionRow};
pub use registry::{ActiveDialect, DialectKind, DialectRegistry};
