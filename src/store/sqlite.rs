use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};
use tracing::debug;

use crate::app::{GleanerError, Result};
use crate::domain::Document;
use crate::store::{DocumentSink, Store};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|e| GleanerError::Other(format!("Migration failed: {}", e)))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            GleanerError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn decode(payload: String) -> Result<Document> {
        Ok(serde_json::from_str(&payload)?)
    }
}

impl DocumentSink for SqliteStore {
    fn insert_documents(&self, docs: &[Document]) -> Result<usize> {
        let mut by_collection: BTreeMap<&str, Vec<&Document>> = BTreeMap::new();
        for doc in docs {
            by_collection
                .entry(doc.collection_name())
                .or_default()
                .push(doc);
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut count = 0;

        for (collection, group) in by_collection {
            let total = group.len();
            let mut inserted_here = 0;
            for doc in group {
                inserted_here += tx.execute(
                    "INSERT OR IGNORE INTO documents (id, collection, url, payload, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        doc.id,
                        collection,
                        doc.url().as_str(),
                        serde_json::to_string(doc)?,
                        doc.created_at.to_rfc3339()
                    ],
                )?;
            }
            debug!(collection, inserted = inserted_here, total, "Inserted documents");
            count += inserted_here;
        }

        tx.commit()?;
        Ok(count)
    }
}

impl Store for SqliteStore {
    fn get_document(&self, id: &str) -> Result<Option<Document>> {
        let conn = self.lock()?;
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM documents WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        payload.map(Self::decode).transpose()
    }

    fn list_collection(&self, collection: &str) -> Result<Vec<Document>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT payload FROM documents WHERE collection = ?1 ORDER BY created_at DESC, id",
        )?;

        let payloads = stmt
            .query_map(params![collection], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        payloads.into_iter().map(Self::decode).collect()
    }

    fn count_in_collection(&self, collection: &str) -> Result<i64> {
        let conn = self.lock()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn collection_counts(&self) -> Result<Vec<(String, i64)>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT collection, COUNT(*) FROM documents GROUP BY collection ORDER BY collection",
        )?;

        let counts = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(counts)
    }
}
