//! Archival job configuration.

use serde::Deserialize;

use crate::error::{ArchiveError, ArchiveResult};

fn default_batch_size() -> usize {
    100
}

/// Per-level batch sizes. Each value bounds both the copy engine's chunk
/// size and the cursor fetch window for its level.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchSizes {
    #[serde(default = "default_batch_size")]
    pub deals: usize,
    #[serde(default = "default_batch_size")]
    pub business_event_records: usize,
    #[serde(default = "default_batch_size")]
    pub tax_lot_effects: usize,
    #[serde(default = "default_batch_size")]
    pub accrual_effects: usize,
    #[serde(default = "default_batch_size")]
    pub tax_lots: usize,
}

impl Default for BatchSizes {
    fn default() -> Self {
        Self::uniform(default_batch_size())
    }
}

impl BatchSizes {
    /// Same bound for every level.
    pub fn uniform(n: usize) -> Self {
        Self {
            deals: n,
            business_event_records: n,
            tax_lot_effects: n,
            accrual_effects: n,
            tax_lots: n,
        }
    }

    /// Rejected before any query is issued: a batch size of zero would turn
    /// the drain loop into a no-op that never terminates.
    pub fn validate(&self) -> ArchiveResult<()> {
        let all = [
            self.deals,
            self.business_event_records,
            self.tax_lot_effects,
            self.accrual_effects,
            self.tax_lots,
        ];
        for n in all {
            if n == 0 {
                return Err(ArchiveError::InvalidBatchSize(n));
            }
        }
        Ok(())
    }
}

/// One archival run, loadable from a JSON file (runner `--config`).
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveJobConfig {
    pub deal_id: String,
    pub tax_lot_group_id: String,
    #[serde(default)]
    pub batch_sizes: BatchSizes,
}

impl ArchiveJobConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Ok(serde_json::from_str(&content)?)
    }
}
