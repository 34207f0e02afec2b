use std::{path::Path, time::Duration};

use rusqlite::{Connection, OpenFlags};

use crate::error::{AppError, AppResult};

/// Opens an existing database file. A missing file is an error, not a new database.
pub fn open(path: &Path, readonly: bool, busy_timeout_ms: u64) -> AppResult<Connection> {
    let access = if readonly {
        OpenFlags::SQLITE_OPEN_READ_ONLY
    } else {
        OpenFlags::SQLITE_OPEN_READ_WRITE
    };
    let flags = access | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;

    let open_failed = |source: rusqlite::Error| AppError::DbOpenFailed {
        path: path.to_path_buf(),
        source,
    };
    let conn = Connection::open_with_flags(path, flags).map_err(open_failed)?;
    conn.busy_timeout(Duration::from_millis(busy_timeout_ms))
        .map_err(open_failed)?;

    tracing::debug!(path = %path.display(), readonly, "database opened");
    Ok(conn)
}
