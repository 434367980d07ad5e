use super::{Dialect, query_version_history};
use crate::handle::{DriverError, VersionCursor, VersionHandle};

const CREATE_VERSION_TABLE: &str = "CREATE TABLE goose_db_version (
    id integer NOT NULL identity(1, 1),
    version_id bigint NOT NULL,
    is_applied boolean NOT NULL,
    tstamp timestamp NULL default sysdate,
    PRIMARY KEY(id)
);";

const INSERT_VERSION: &str =
    "INSERT INTO goose_db_version (version_id, is_applied) VALUES ($1, $2);";

/// Amazon Redshift. Has no `serial`, so the key is an identity column and
/// the timestamp defaults to `sysdate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedshiftDialect;

impl Dialect for RedshiftDialect {
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
