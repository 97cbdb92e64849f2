//! Documents and field access.
//!
//! Record bodies are opaque JSON trees; the traversal only ever reads the
//! handful of dotted paths that drive the next level down. Anything the
//! traversal needs that is absent or mis-shaped is fatal for the run — there
//! is no skip-and-continue for malformed records.

use serde_json::Value;

use crate::error::{ArchiveError, ArchiveResult};

pub type Document = Value;

/// Walk a dotted path (`"meta.txId"`) through nested objects.
pub fn value_at<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    let mut current = doc;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

pub fn required<'a>(doc: &'a Document, path: &str) -> ArchiveResult<&'a Value> {
    value_at(doc, path).ok_or_else(|| ArchiveError::Extraction {
        path: path.to_string(),
        reason: "field not present".into(),
    })
}

pub fn required_str<'a>(doc: &'a Document, path: &str) -> ArchiveResult<&'a str> {
    required(doc, path)?
        .as_str()
        .ok_or_else(|| ArchiveError::Extraction {
            path: path.to_string(),
            reason: "expected a string".into(),
        })
}

pub fn required_array<'a>(doc: &'a Document, path: &str) -> ArchiveResult<&'a Vec<Value>> {
    required(doc, path)?
        .as_array()
        .ok_or_else(|| ArchiveError::Extraction {
            path: path.to_string(),
            reason: "expected an array".into(),
        })
}
