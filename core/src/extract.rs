//! Tax-lot reference extraction.
//!
//! The two effect collections reach tax lots through different embedded
//! shapes: `taxLotEffect` carries a flat identifier array at `data.tls`,
//! while `accrualEffect` carries sub-records at `data.accs`, each holding
//! one identifier under `tl`. The shapes stay separate strategies on
//! purpose — the source schema is not normalized, and extraction must not
//! pretend otherwise.

use serde_json::Value;

use crate::{
    document::{self, Document},
    error::{ArchiveError, ArchiveResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxLotRefShape {
    /// Flat array of identifiers at `data.tls`.
    FlatIds,
    /// Array of sub-records at `data.accs`, one identifier each at `tl`.
    SubRecords,
}

impl TaxLotRefShape {
    /// Pull the referenced tax-lot identifiers out of an effect document.
    pub fn tax_lot_ids(self, doc: &Document) -> ArchiveResult<Vec<Value>> {
        match self {
            Self::FlatIds => Ok(document::required_array(doc, "data.tls")?.clone()),
            Self::SubRecords => document::required_array(doc, "data.accs")?
                .iter()
                .map(|sub| {
                    sub.get("tl")
                        .cloned()
                        .ok_or_else(|| ArchiveError::Extraction {
                            path: "data.accs.tl".to_string(),
                            reason: "sub-record has no tax-lot identifier".into(),
                        })
                })
                .collect(),
        }
    }
}
