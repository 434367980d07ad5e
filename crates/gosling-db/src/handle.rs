use std::fmt;

use rusqlite::Connection;

/// Error produced by the database driver behind a [`VersionHandle`].
///
/// The driver's own error value is boxed as-is, so callers can downcast it
/// (e.g. to `rusqlite::Error`).
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// One row of the version history as projected by the history query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRow {
    pub version_id: i64,
    pub is_applied: bool,
}

/// Rows returned by a history query, newest first.
///
/// The cursor belongs to the caller and releases whatever it holds on drop.
pub struct VersionCursor<'h> {
    rows: Box<dyn Iterator<Item = Result<VersionRow, DriverError>> + 'h>,
}

impl<'h> VersionCursor<'h> {
    pub fn new<I>(rows: I) -> Self
    where
        I: Iterator<Item = Result<VersionRow, DriverError>> + 'h,
    {
        Self {
            rows: Box::new(rows),
        }
    }

    /// Drain the cursor, stopping at the first row error.
    pub fn collect_rows(self) -> Result<Vec<VersionRow>, DriverError> {
        self.collect()
    }
}

impl Iterator for VersionCursor<'_> {
    type Item = Result<VersionRow, DriverError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }
}

impl fmt::Debug for VersionCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionCursor").finish_non_exhaustive()
    }
}

/// An open database connection that can run the version history query.
///
/// Implement this for the driver that owns the connection. The query text
/// always projects `version_id` then `is_applied`.
pub trait VersionHandle {
    fn query_versions(&self, sql: &str) -> Result<VersionCursor<'_>, DriverError>;
}

impl VersionHandle for Connection {
    // rusqlite rows borrow their statement, so the statement is stepped to
    // completion here and the cursor yields what was fetched.
    fn query_versions(&self, sql: &str) -> Result<VersionCursor<'_>, DriverError> {
        let mut stmt = self.prepare(sql)?;
        let fetched: Vec<Result<VersionRow, DriverError>> = stmt
            .query_map([], |row| {
                Ok(VersionRow {
                    version_id: row.get(0)?,
                    is_applied: row.get(1)?,
                })
            })?
            .map(|row| row.map_err(DriverError::from))
            .collect();

        Ok(VersionCursor::new(fetched.into_iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(version_id: i64, is_applied: bool) -> VersionRow {
        VersionRow {
            version_id,
            is_applied,
        }
    }

    #[test]
    fn cursor_yields_rows_in_given_order() {
        let rows = vec![row(3, true), row(1, false)];
        let cursor = VersionCursor::new(rows.clone().into_iter().map(Ok));
        assert_eq!(cursor.collect_rows().unwrap(), rows);
    }

    #[test]
    fn collect_rows_stops_at_first_error() {
        let items: Vec<Result<VersionRow, DriverError>> = vec![
            Ok(row(1, true)),
            Err("row decode failed".into()),
            Ok(row(2, true)),
        ];
        let err = VersionCursor::new(items.into_iter()).collect_rows().unwrap_err();
        assert_eq!(err.to_string(), "row decode failed");
    }

    #[test]
    fn connection_reads_projected_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (a INTEGER, b INTEGER);
             INSERT INTO t (a, b) VALUES (42, 1), (43, 0);",
        )
        .unwrap();

        let rows = conn
            .query_versions("SELECT a, b FROM t ORDER BY a")
            .unwrap()
            .collect_rows()
            .unwrap();
        assert_eq!(rows, vec![row(42, true), row(43, false)]);
    }

    #[test]
    fn connection_surfaces_prepare_failure_unmodified() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn.query_versions("SELECT a, b FROM missing").unwrap_err();
        let sqlite_err = err
            .downcast_ref::<rusqlite::Error>()
            .expect("driver error is a rusqlite::Error");
        assert!(sqlite_err.to_string().contains("no such table"));
    }
}
