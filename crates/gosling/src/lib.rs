pub mod logging;
pub mod selection;

pub use gosling_common::{Error, Result};
pub use gosling_config::{AppConfig, ConfigLoader, ConfigWatcher, LoggingConfig};
pub use gosling_db::{
    ActiveDialect, Dialect, DialectKind, DialectRegistry, DriverError, MySqlDialect,
    PostgresDialect, RedshiftDialect, Sqlite3Dialect, TiDbDialect, VERSION_HISTORY_QUERY,
    VERSION_TABLE, VersionCursor, VersionHandle, VersionRow, query_version_history,
};
pub use selection::{active_dialect_from_config, follow_config};
