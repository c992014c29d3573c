use rusqlite::Connection;

use crate::error::Result;

pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS catalogs (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     INTEGER NOT NULL,
            name        TEXT NOT NULL,
            created_at  INTEGER NOT NULL,
            UNIQUE (user_id, name)
        );

        CREATE INDEX IF NOT EXISTS idx_catalogs_user ON catalogs(user_id);

        CREATE TABLE IF NOT EXISTS images (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     INTEGER NOT NULL,
            catalog_id  INTEGER NOT NULL REFERENCES catalogs(id) ON DELETE CASCADE,
            name        TEXT NOT NULL,
            file        TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at  INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_images_user ON images(user_id);
        CREATE INDEX IF NOT EXISTS idx_images_catalog ON images(catalog_id);
        CREATE INDEX IF NOT EXISTS idx_images_file ON images(file);

        CREATE TABLE IF NOT EXISTS config (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}
