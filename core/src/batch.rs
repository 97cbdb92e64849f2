//! Batched copy engine.
//!
//! Streams an arbitrarily large query result into a destination collection
//! in fixed-size chunks: drain up to `batch_size` documents, run the visitor
//! on each as it is drained, then write the chunk with one bulk insert. Peak
//! memory for a copy is one chunk, never the full result.
//!
//! The visitor is how the traversal recurses: archiving a level's document
//! triggers the child levels' archival, and that recursion completes before
//! the document's own chunk is flushed.

use crate::{
    document::Document,
    error::{ArchiveError, ArchiveResult},
};

/// A lazy, forward-only, fallible sequence of documents.
///
/// Implemented by [`DocCursor`](crate::store::DocCursor); tests drive the
/// engine with scripted in-memory streams.
pub trait DocumentStream {
    fn try_next(&mut self) -> ArchiveResult<Option<Document>>;
}

/// Destination of one archival level. Exactly one call per flushed chunk.
pub trait BulkSink {
    fn insert_many(&self, docs: &[Document]) -> ArchiveResult<()>;
}

/// Copy every document from `stream` into `dest`, `batch_size` at a time.
pub fn archive_batched(
    dest: &impl BulkSink,
    stream: &mut impl DocumentStream,
    batch_size: usize,
) -> ArchiveResult<()> {
    consume_and_archive_batched(dest, stream, batch_size, |_| Ok(()))
}

/// Like [`archive_batched`], but runs `visitor` on each document as it is
/// drained from the stream, before the document's chunk is flushed.
///
/// An empty stream performs zero bulk inserts; a final partial chunk is
/// still flushed. A visitor error aborts the copy with the current chunk
/// unwritten.
pub fn consume_and_archive_batched<S, V>(
    dest: &impl BulkSink,
    stream: &mut S,
    batch_size: usize,
    mut visitor: V,
) -> ArchiveResult<()>
where
    S: DocumentStream,
    V: FnMut(&Document) -> ArchiveResult<()>,
{
    if batch_size == 0 {
        return Err(ArchiveError::InvalidBatchSize(batch_size));
    }
    let mut chunk: Vec<Document> = Vec::with_capacity(batch_size);
    loop {
        while chunk.len() < batch_size {
            match stream.try_next()? {
                Some(doc) => {
                    visitor(&doc)?;
                    chunk.push(doc);
                }
                None => {
                    if !chunk.is_empty() {
                        dest.insert_many(&chunk)?;
                        log::debug!("flushed final chunk of {} document(s)", chunk.len());
                    }
                    return Ok(());
                }
            }
        }
        dest.insert_many(&chunk)?;
        log::debug!("flushed chunk of {} document(s)", chunk.len());
        chunk.clear();
    }
}
