//! SQLite-backed document store.
//!
//! RULE: Only this module talks to the database. The copy engine and the
//! orchestrator go through `DocStore`, `CollectionRef`, and `DocCursor`.
//!
//! Each collection is one table holding one JSON document per row. The `seq`
//! column is physical insertion order only; document identity lives inside
//! the document body. Collections are created on first insert, and a `find`
//! against a collection that does not exist yields an empty cursor.

use std::collections::VecDeque;

use rusqlite::{params, Connection, OptionalExtension};

use crate::{
    batch::{BulkSink, DocumentStream},
    document::Document,
    error::{ArchiveError, ArchiveResult},
    filter::Filter,
};

const DEFAULT_FETCH_SIZE: usize = 100;

pub struct DocStore {
    conn: Connection,
}

impl DocStore {
    pub fn open(path: &str) -> ArchiveResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory store (used in tests).
    pub fn in_memory() -> ArchiveResult<Self> {
        Ok(Self {
            conn: Connection::open(":memory:")?,
        })
    }

    /// Handle on a named destination collection; the copy engine's
    /// production [`BulkSink`].
    pub fn collection<'a>(&'a self, name: &'a str) -> CollectionRef<'a> {
        CollectionRef { store: self, name }
    }

    pub fn insert_one(&self, collection: &str, doc: &Document) -> ArchiveResult<()> {
        self.insert_many(collection, std::slice::from_ref(doc))
    }

    /// One bulk write: every document in a single transaction, in slice
    /// order, stored verbatim.
    pub fn insert_many(&self, collection: &str, docs: &[Document]) -> ArchiveResult<()> {
        if docs.is_empty() {
            return Ok(());
        }
        let table = self.ensure_collection(collection)?;
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(&format!(r#"INSERT INTO "{table}" (body) VALUES (?1)"#))?;
            for doc in docs {
                stmt.execute(params![serde_json::to_string(doc)?])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Lazy, forward-only, single-pass cursor over the matching documents.
    pub fn find(&self, collection: &str, filter: Filter) -> ArchiveResult<DocCursor<'_>> {
        let table = table_name(collection)?;
        let exists = self.table_exists(&table)?;
        Ok(DocCursor {
            store: self,
            table,
            filter,
            fetch_size: DEFAULT_FETCH_SIZE,
            last_seq: 0,
            buf: VecDeque::new(),
            exhausted: !exists,
        })
    }

    pub fn count(&self, collection: &str) -> ArchiveResult<i64> {
        let table = table_name(collection)?;
        if !self.table_exists(&table)? {
            return Ok(0);
        }
        let n = self
            .conn
            .query_row(&format!(r#"SELECT COUNT(*) FROM "{table}""#), [], |row| {
                row.get(0)
            })?;
        Ok(n)
    }

    fn ensure_collection(&self, collection: &str) -> ArchiveResult<String> {
        let table = table_name(collection)?;
        self.conn.execute_batch(&format!(
            r#"CREATE TABLE IF NOT EXISTS "{table}" (
                seq  INTEGER PRIMARY KEY AUTOINCREMENT,
                body TEXT NOT NULL
            );"#
        ))?;
        Ok(table)
    }

    fn table_exists(&self, table: &str) -> ArchiveResult<bool> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![table],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Read the next window of rows after `after_seq`, oldest first.
    fn fetch_window(
        &self,
        table: &str,
        after_seq: i64,
        limit: usize,
    ) -> ArchiveResult<Vec<(i64, Document)>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"SELECT seq, body FROM "{table}" WHERE seq > ?1 ORDER BY seq ASC LIMIT ?2"#
        ))?;
        let rows = stmt
            .query_map(params![after_seq, limit as i64], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(seq, body)| {
                Ok::<_, ArchiveError>((seq, serde_json::from_str::<Document>(&body)?))
            })
            .collect()
    }
}

/// Collection names come from configuration and tests; reject anything that
/// cannot be used as a bare table identifier.
fn table_name(collection: &str) -> ArchiveResult<String> {
    let ok = !collection.is_empty()
        && collection
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !ok {
        return Err(ArchiveError::InvalidCollectionName(collection.to_string()));
    }
    Ok(format!("doc_{collection}"))
}

#[derive(Clone, Copy)]
pub struct CollectionRef<'a> {
    store: &'a DocStore,
    name: &'a str,
}

impl BulkSink for CollectionRef<'_> {
    fn insert_many(&self, docs: &[Document]) -> ArchiveResult<()> {
        self.store.insert_many(self.name, docs)
    }
}

/// Forward-only cursor over one `find` result.
///
/// Rows are paged out of SQLite in `fetch_size` windows and matched against
/// the filter as they arrive; peak buffering is one window, never the full
/// result set. Advancing the cursor performs I/O.
pub struct DocCursor<'a> {
    store: &'a DocStore,
    table: String,
    filter: Filter,
    fetch_size: usize,
    last_seq: i64,
    buf: VecDeque<Document>,
    exhausted: bool,
}

impl DocCursor<'_> {
    /// Window size for each page read. The orchestrator sets this to the
    /// level's batch size so cursor I/O granularity follows the batch bound.
    pub fn with_fetch_size(mut self, fetch_size: usize) -> Self {
        self.fetch_size = fetch_size.max(1);
        self
    }
}

impl DocumentStream for DocCursor<'_> {
    fn try_next(&mut self) -> ArchiveResult<Option<Document>> {
        loop {
            if let Some(doc) = self.buf.pop_front() {
                return Ok(Some(doc));
            }
            if self.exhausted {
                return Ok(None);
            }
            let window = self
                .store
                .fetch_window(&self.table, self.last_seq, self.fetch_size)?;
            if window.len() < self.fetch_size {
                self.exhausted = true;
            }
            for (seq, doc) in window {
                self.last_seq = seq;
                if self.filter.matches(&doc) {
                    self.buf.push_back(doc);
                }
            }
        }
    }
}
