//! SQLite sink: files, fonts, and their many-to-many association.
//!
//! Schema:
//!
//! * `files(id, path UNIQUE, created_at, modified_at)` - one row per
//!   processed document; timestamps are RFC 3339.
//! * `fonts(id, name UNIQUE)` - one row per distinct font name.
//! * `file_fonts(file_id, font_id)` - which fonts each document uses.
//!
//! Everything is insert-once/read-many: upserts keep re-runs idempotent,
//! and the presence of a `files` row is what lets a later run skip the
//! document without parsing it.

use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::scanner::FileEntry;

use super::{FontSink, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS files (
    id          INTEGER PRIMARY KEY,
    path        TEXT NOT NULL UNIQUE,
    created_at  TEXT,
    modified_at TEXT
);

CREATE TABLE IF NOT EXISTS fonts (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS file_fonts (
    file_id INTEGER NOT NULL REFERENCES files(id) ON DELETE CASCADE,
    font_id INTEGER NOT NULL REFERENCES fonts(id) ON DELETE CASCADE,
    PRIMARY KEY (file_id, font_id)
);
";

/// A recorded font, optionally with the documents it was seen in.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FontRecord {
    /// Font name (PostScript name as written by the text engine)
    pub name: String,
    /// Paths of the documents using this font, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
}

/// A recorded document.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileRecord {
    /// Document path
    pub path: String,
    /// Creation time (RFC 3339), where the filesystem had one
    pub created_at: Option<String>,
    /// Modification time (RFC 3339)
    pub modified_at: Option<String>,
}

/// Handle to the font database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and ensure the schema.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Whether a document path already has a row.
    pub fn is_recorded(&self, path: &str) -> Result<bool, StoreError> {
        let id: Option<i64> = self
            .conn
            .query_row("SELECT id FROM files WHERE path = ?1", [path], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(id.is_some())
    }

    /// Insert or refresh the row for a document, returning its id.
    pub fn record_file(&self, entry: &FileEntry) -> Result<i64, StoreError> {
        let path = entry.path.to_string_lossy().into_owned();
        let created = entry.created.map(to_rfc3339);
        let modified = to_rfc3339(entry.modified);

        self.conn.execute(
            "INSERT INTO files (path, created_at, modified_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(path) DO UPDATE SET created_at = ?2, modified_at = ?3",
            params![path, created, modified],
        )?;

        let id = self
            .conn
            .query_row("SELECT id FROM files WHERE path = ?1", [path], |row| {
                row.get(0)
            })?;
        Ok(id)
    }

    /// Insert a font name if new, returning its id either way.
    pub fn record_font(&self, name: &str) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO fonts (name) VALUES (?1)",
            [name],
        )?;

        let id = self
            .conn
            .query_row("SELECT id FROM fonts WHERE name = ?1", [name], |row| {
                row.get(0)
            })?;
        Ok(id)
    }

    /// Whether a font name already has a row.
    pub fn is_font_recorded(&self, name: &str) -> Result<bool, StoreError> {
        let id: Option<i64> = self
            .conn
            .query_row("SELECT id FROM fonts WHERE name = ?1", [name], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(id.is_some())
    }

    /// Associate a document with a font. Idempotent.
    pub fn associate(&self, file_id: i64, font_id: i64) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO file_fonts (file_id, font_id) VALUES (?1, ?2)",
            params![file_id, font_id],
        )?;
        Ok(())
    }

    /// All recorded fonts, sorted by name.
    pub fn fonts(&self) -> Result<Vec<FontRecord>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT name FROM fonts ORDER BY name")?;
        let records = stmt
            .query_map([], |row| {
                Ok(FontRecord {
                    name: row.get(0)?,
                    files: None,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// All recorded fonts with the documents using them, sorted by name.
    pub fn fonts_with_files(&self) -> Result<Vec<FontRecord>, StoreError> {
        let mut fonts = self.fonts()?;

        let mut stmt = self.conn.prepare(
            "SELECT f.path FROM files f
             JOIN file_fonts ff ON ff.file_id = f.id
             JOIN fonts fo ON fo.id = ff.font_id
             WHERE fo.name = ?1
             ORDER BY f.path",
        )?;

        for font in &mut fonts {
            let files = stmt
                .query_map([&font.name], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            font.files = Some(files);
        }

        Ok(fonts)
    }

    /// All recorded documents, sorted by path.
    pub fn files(&self) -> Result<Vec<FileRecord>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT path, created_at, modified_at FROM files ORDER BY path")?;
        let records = stmt
            .query_map([], |row| {
                Ok(FileRecord {
                    path: row.get(0)?,
                    created_at: row.get(1)?,
                    modified_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

fn to_rfc3339(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339()
}

/// [`FontSink`] backed by [`Database`].
pub struct SqliteSink {
    db: Database,
    allow_duplicates: bool,
    description: String,
}

impl SqliteSink {
    /// Open the database at `path` as a sink.
    pub fn new(path: &Path, allow_duplicates: bool) -> Result<Self, StoreError> {
        Ok(Self {
            db: Database::open(path)?,
            allow_duplicates,
            description: path.display().to_string(),
        })
    }
}

impl FontSink for SqliteSink {
    fn should_skip(&mut self, entry: &FileEntry) -> Result<bool, StoreError> {
        if self.allow_duplicates {
            return Ok(false);
        }
        self.db.is_recorded(&entry.path.to_string_lossy())
    }

    fn record(&mut self, entry: &FileEntry, fonts: &[String]) -> Result<usize, StoreError> {
        let file_id = self.db.record_file(entry)?;

        let mut new_fonts = 0;
        for name in fonts {
            let known = self.db.is_font_recorded(name)?;
            let font_id = self.db.record_font(name)?;
            self.db.associate(file_id, font_id)?;
            if !known {
                new_fonts += 1;
            }
        }
        Ok(new_fonts)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}
