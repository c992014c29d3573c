use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{schema, Store};
use crate::domain::{Catalog, Image, NewImage, UserId};
use crate::error::{Error, Result};

const IMAGE_COLUMNS: &str = "id, user_id, catalog_id, name, file, description, created_at";

/// SQLite-backed store for catalogs and images.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a store at the given path with WAL mode.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    fn query_images(&self, sql: &str, param: i64) -> Result<Vec<Image>> {
        let mut stmt = self.conn.prepare(sql)?;
        let images = stmt
            .query_map(params![param], image_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(images)
    }
}

impl Store for SqliteStore {
    // ── Catalogs ─────────────────────────────────────────────────────

    fn create_catalog(&self, user: UserId, name: &str) -> Result<Catalog> {
        if self.find_catalog(user, name)?.is_some() {
            return Err(Error::CatalogAlreadyExists(name.to_string()));
        }

        let created_at = chrono::Utc::now().timestamp();
        self.conn.execute(
            "INSERT INTO catalogs (user_id, name, created_at) VALUES (?1, ?2, ?3)",
            params![user.0, name, created_at],
        )?;
        Ok(Catalog {
            id: self.conn.last_insert_rowid(),
            user,
            name: name.to_string(),
            created_at,
        })
    }

    fn find_catalog(&self, user: UserId, name: &str) -> Result<Option<Catalog>> {
        let catalog = self
            .conn
            .query_row(
                "SELECT id, user_id, name, created_at FROM catalogs WHERE user_id = ?1 AND name = ?2",
                params![user.0, name],
                catalog_from_row,
            )
            .optional()?;
        Ok(catalog)
    }

    fn list_catalogs(&self, user: UserId) -> Result<Vec<Catalog>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, created_at FROM catalogs WHERE user_id = ?1 ORDER BY id",
        )?;
        let catalogs = stmt
            .query_map(params![user.0], catalog_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(catalogs)
    }

    fn delete_catalog(&self, catalog_id: i64) -> Result<usize> {
        let image_count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM images WHERE catalog_id = ?1",
            params![catalog_id],
            |row| row.get(0),
        )?;

        // Images go with the catalog through ON DELETE CASCADE.
        let removed = self
            .conn
            .execute("DELETE FROM catalogs WHERE id = ?1", params![catalog_id])?;
        if removed == 0 {
            return Err(Error::CatalogNotFound(catalog_id.to_string()));
        }
        Ok(image_count as usize)
    }

    // ── Images ───────────────────────────────────────────────────────

    fn create_image(&self, image: &NewImage) -> Result<Image> {
        let created_at = chrono::Utc::now().timestamp();
        let file_str = image.file.to_string_lossy();
        self.conn.execute(
            "INSERT INTO images (user_id, catalog_id, name, file, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                image.user.0,
                image.catalog_id,
                image.name,
                file_str.as_ref(),
                image.description,
                created_at,
            ],
        )?;
        Ok(Image {
            id: self.conn.last_insert_rowid(),
            user: image.user,
            catalog_id: image.catalog_id,
            name: image.name.clone(),
            file: image.file.clone(),
            description: image.description.clone(),
            created_at,
        })
    }

    fn get_image(&self, id: i64) -> Result<Option<Image>> {
        let image = self
            .conn
            .query_row(
                &format!("SELECT {IMAGE_COLUMNS} FROM images WHERE id = ?1"),
                params![id],
                image_from_row,
            )
            .optional()?;
        Ok(image)
    }

    fn list_images_for_user(&self, user: UserId) -> Result<Vec<Image>> {
        self.query_images(
            &format!("SELECT {IMAGE_COLUMNS} FROM images WHERE user_id = ?1 ORDER BY id"),
            user.0,
        )
    }

    fn list_images_in_catalog(&self, catalog_id: i64) -> Result<Vec<Image>> {
        self.query_images(
            &format!("SELECT {IMAGE_COLUMNS} FROM images WHERE catalog_id = ?1 ORDER BY id"),
            catalog_id,
        )
    }

    fn delete_image(&self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM images WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn count_images_with_file(&self, file: &Path) -> Result<usize> {
        let file_str = file.to_string_lossy();
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM images WHERE file = ?1",
            params![file_str.as_ref()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    // ── Config ───────────────────────────────────────────────────────

    fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn get_config(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM config WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}

fn catalog_from_row(row: &Row<'_>) -> rusqlite::Result<Catalog> {
    Ok(Catalog {
        id: row.get(0)?,
        user: UserId(row.get(1)?),
        name: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn image_from_row(row: &Row<'_>) -> rusqlite::Result<Image> {
    Ok(Image {
        id: row.get(0)?,
        user: UserId(row.get(1)?),
        catalog_id: row.get(2)?,
        name: row.get(3)?,
        file: PathBuf::from(row.get::<_, String>(4)?),
        description: row.get(5)?,
        created_at: row.get(6)?,
    })
}
