use std::{
    path::Path,
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, anyhow};
use chrono::{DateTime, Local};
use rusqlite::Connection;

use crate::{
    config::StorageConfig,
    storage::{error::StorageError, schema},
};

pub type SecondsSinceUnix = i64;

/// One SQLite connection shared by the metadata and blob stores.
pub type SharedConnection = Arc<Mutex<Connection>>;

fn open_in_memory() -> Result<rusqlite::Connection, rusqlite::Error> {
    Connection::open_in_memory()
}

fn open_from_file(path: &Path) -> Result<rusqlite::Connection, rusqlite::Error> {
    Connection::open(path)
}

pub fn open(config: &StorageConfig) -> Result<SharedConnection, StorageError> {
    let db = match (config.in_memory, &config.path) {
        (true, _) => open_in_memory()?,
        (false, Some(path)) => open_from_file(path)?,
        (false, None) => {
            return Err(StorageError::Unavailable(
                "on-disk storage configured without a path".to_string(),
            ));
        }
    };
    share(db)
}

/// Initializes the schema on an existing connection and wraps it for sharing.
pub fn share(db: Connection) -> Result<SharedConnection, StorageError> {
    schema::init(&db)?;
    Ok(Arc::new(Mutex::new(db)))
}

/// Runs `f` against the connection on the blocking pool.
///
/// Each call is a suspension point for the caller, like a transaction on an
/// async browser store.
pub(crate) async fn with_conn<T, F>(conn: &SharedConnection, f: F) -> Result<T, StorageError>
where
    T: Send + 'static,
    F: FnOnce(&mut Connection) -> Result<T, StorageError> + Send + 'static,
{
    let conn = Arc::clone(conn);
    tokio::task::spawn_blocking(move || {
        let mut guard = conn
            .lock()
            .map_err(|e| StorageError::Unavailable(format!("connection lock poisoned: {e}")))?;
        f(&mut guard)
    })
    .await
    .map_err(|e| StorageError::Unavailable(format!("storage worker failed: {e}")))?
}

/// converts time to number of seconds since unix_epoch
pub fn system_time_to_i64(time: SystemTime) -> anyhow::Result<SecondsSinceUnix> {
    i64::try_from(
        time.duration_since(UNIX_EPOCH)
            .with_context(|| "failed to get unix timestamp")?
            .as_secs(),
    )
    .with_context(|| "failed to get timestamp in seconds")
}

pub(crate) fn now_secs() -> Result<SecondsSinceUnix, StorageError> {
    system_time_to_i64(SystemTime::now()).map_err(StorageError::Internal)
}

/// converts number of seconds since unix epoch local time to local date time
pub fn i64_seconds_to_local_time(since_unix: i64) -> anyhow::Result<DateTime<Local>> {
    let datetime = DateTime::from_timestamp(since_unix, 0).ok_or(anyhow!(
        "failed to convert {since_unix} s timestamp to datetime"
    ))?;

    Ok(DateTime::from(datetime))
}

#[cfg(test)]
mod tests {
    use crate::{
        config::StorageConfig,
        storage::{db::open, error::StorageError, schema},
    };

    #[test]
    fn open_in_memory_db_initializes_schema() {
        let db = open(&StorageConfig::default()).unwrap();
        let db = db.lock().unwrap();

        let mut stmt = db
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap();

        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();

        for table in schema::tables::ALL_TABLES {
            assert!(tables.contains(&table.to_string()));
        }
    }

    #[test]
    fn open_on_disk_without_path_is_unavailable() {
        let config = StorageConfig {
            in_memory: false,
            path: None,
            ..Default::default()
        };
        let err = open(&config).unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
    }

    #[test]
    fn open_on_disk_creates_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("player.db");
        let config = StorageConfig {
            in_memory: false,
            path: Some(path.clone()),
            ..Default::default()
        };
        open(&config)?;
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn timestamps_round_trip_to_local_time() -> anyhow::Result<()> {
        let local = super::i64_seconds_to_local_time(1_700_000_000)?;
        assert_eq!(local.timestamp(), 1_700_000_000);
        Ok(())
    }
}
