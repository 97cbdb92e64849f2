//! Traversal orchestrator: deal → businessEventRecord →
//! { taxLotEffect, accrualEffect } → taxLot.
//!
//! Each level issues one filtered query against the source store and streams
//! the result into the same-named archive collection through the batched
//! copy engine; the per-document visitor on the middle levels drives the
//! next level down. Execution is strictly sequential and depth-first — a
//! document's entire subtree is archived before the next document at the
//! same level is drained from its cursor.
//!
//! Failure semantics: any store error or malformed record aborts the run
//! immediately and propagates to the caller. There is no retry and no
//! rollback of records archived by earlier levels, so a failed run can leave
//! the archive partially populated. Re-running against a non-empty archive
//! duplicates records; callers wanting all-or-nothing semantics need an
//! outer staging layer.

use serde_json::Value;

use crate::{
    batch::{archive_batched, consume_and_archive_batched},
    config::BatchSizes,
    document,
    error::ArchiveResult,
    extract::TaxLotRefShape,
    filter::Filter,
    store::DocStore,
};

pub const DEAL: &str = "deal";
pub const BUSINESS_EVENT_RECORD: &str = "businessEventRecord";
pub const TAX_LOT_EFFECT: &str = "taxLotEffect";
pub const ACCRUAL_EFFECT: &str = "accrualEffect";
pub const TAX_LOT: &str = "taxLot";

pub struct DealArchiver<'a> {
    source: &'a DocStore,
    archive: &'a DocStore,
    batch: BatchSizes,
}

impl<'a> DealArchiver<'a> {
    pub fn new(source: &'a DocStore, archive: &'a DocStore, batch: BatchSizes) -> Self {
        Self {
            source,
            archive,
            batch,
        }
    }

    /// Archive one deal and everything reachable from it.
    ///
    /// `deal_id` is the external deal identifier (every stored version is
    /// archived); `tax_lot_group_id` narrows the business event records to
    /// the group under archival.
    pub fn archive_deal(&self, deal_id: &str, tax_lot_group_id: &str) -> ArchiveResult<()> {
        self.batch.validate()?;

        log::debug!("archiving deal {deal_id} (tax-lot-group {tax_lot_group_id})");

        // Level 1: every stored version of the deal.
        let mut deals = self
            .source
            .find(DEAL, Filter::eq("_id.id", deal_id))?
            .with_fetch_size(self.batch.deals);
        archive_batched(&self.archive.collection(DEAL), &mut deals, self.batch.deals)?;

        // Level 2: business event records; each one's transaction id drives
        // both effect branches.
        let mut records = self
            .source
            .find(
                BUSINESS_EVENT_RECORD,
                Filter::and(
                    Filter::eq("BusinessEvent.deal.dealId", deal_id),
                    Filter::eq("BusinessEvent.taxLotGroupId", tax_lot_group_id),
                ),
            )?
            .with_fetch_size(self.batch.business_event_records);
        consume_and_archive_batched(
            &self.archive.collection(BUSINESS_EVENT_RECORD),
            &mut records,
            self.batch.business_event_records,
            |record| {
                let tx_id = document::required_str(record, "meta.txId")?.to_string();
                self.archive_effects(&tx_id)
            },
        )
    }

    /// Levels 3 and 4: the two effect branches for one transaction id.
    /// Independent sibling queries — an empty result in one leaves the other
    /// untouched.
    fn archive_effects(&self, tx_id: &str) -> ArchiveResult<()> {
        log::debug!("archiving effects for txId {tx_id}");

        let mut tax_lot_effects = self
            .source
            .find(TAX_LOT_EFFECT, Filter::eq("key.txId", tx_id))?
            .with_fetch_size(self.batch.tax_lot_effects);
        consume_and_archive_batched(
            &self.archive.collection(TAX_LOT_EFFECT),
            &mut tax_lot_effects,
            self.batch.tax_lot_effects,
            |effect| self.archive_tax_lots(TaxLotRefShape::FlatIds.tax_lot_ids(effect)?),
        )?;

        let mut accrual_effects = self
            .source
            .find(ACCRUAL_EFFECT, Filter::eq("key.txId", tx_id))?
            .with_fetch_size(self.batch.accrual_effects);
        consume_and_archive_batched(
            &self.archive.collection(ACCRUAL_EFFECT),
            &mut accrual_effects,
            self.batch.accrual_effects,
            |effect| self.archive_tax_lots(TaxLotRefShape::SubRecords.tax_lot_ids(effect)?),
        )
    }

    /// Level 5: tax lots by identifier membership. No de-duplication across
    /// parents — a lot referenced from both branches is archived twice.
    fn archive_tax_lots(&self, ids: Vec<Value>) -> ArchiveResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut lots = self
            .source
            .find(TAX_LOT, Filter::is_in("_id", ids))?
            .with_fetch_size(self.batch.tax_lots);
        archive_batched(
            &self.archive.collection(TAX_LOT),
            &mut lots,
            self.batch.tax_lots,
        )
    }
}
