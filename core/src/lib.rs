//! Hierarchical batched archival over a document store.
//!
//! Walks the fixed collection hierarchy rooted at one deal —
//! deal → businessEventRecord → { taxLotEffect, accrualEffect } → taxLot —
//! and copies every matched document into a parallel archive store, one
//! fixed-size bulk insert at a time. Memory and round-trip cost are bounded
//! by the per-level batch sizes, never by result-set size.

pub mod archiver;
pub mod batch;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod filter;
pub mod store;

pub use archiver::DealArchiver;
pub use batch::{archive_batched, consume_and_archive_batched, BulkSink, DocumentStream};
pub use config::{ArchiveJobConfig, BatchSizes};
pub use error::{ArchiveError, ArchiveResult};
pub use filter::Filter;
pub use store::{DocCursor, DocStore};
