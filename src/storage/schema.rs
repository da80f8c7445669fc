use rusqlite::Connection;

pub mod tables {
    pub const METADATA: &str = "metadata";
    pub const BLOBS: &str = "blobs";

    pub const ALL_TABLES: &[&str] = &[METADATA, BLOBS];
}

pub mod columns {
    pub const KEY: &str = "key";
    pub const VALUE: &str = "value";
    pub const UPDATED_AT: &str = "updated_at";

    pub const TRACK_ID: &str = "track_id";
    pub const DATA: &str = "data";
    pub const MIME_TYPE: &str = "mime_type";
    pub const FILE_NAME: &str = "file_name";
    pub const DIGEST: &str = "digest";
    pub const STORED_AT: &str = "stored_at";
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS blobs (
    track_id TEXT PRIMARY KEY NOT NULL,
    data BLOB NOT NULL,
    mime_type TEXT NOT NULL,
    file_name TEXT NOT NULL,
    digest TEXT NOT NULL,
    stored_at INTEGER NOT NULL
);
"#;

pub fn init(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA)
}
