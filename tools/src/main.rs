//! archive-runner: headless archival runner.
//!
//! Usage:
//!   archive-runner --source sem.db --archive archive.db \
//!       --deal-id IzzBMFw_EemtfZP7oMavCgA --tax-lot-group vrBLTfu8RFKz \
//!       [--batch-size 100]
//!   archive-runner --source sem.db --archive archive.db --config job.json
//!   archive-runner --source sem.db --seed-demo --deal-id D --tax-lot-group G

use anyhow::Result;
use deal_archive_core::{
    archiver::{ACCRUAL_EFFECT, BUSINESS_EVENT_RECORD, DEAL, TAX_LOT, TAX_LOT_EFFECT},
    ArchiveJobConfig, BatchSizes, DealArchiver, DocStore,
};
use serde_json::json;
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let source_path = str_arg(&args, "--source").unwrap_or(":memory:");
    let archive_path = str_arg(&args, "--archive").unwrap_or("archive.db");
    let seed_demo = args.iter().any(|a| a == "--seed-demo");

    let job = match str_arg(&args, "--config") {
        Some(path) => ArchiveJobConfig::load(path)?,
        None => {
            let deal_id = str_arg(&args, "--deal-id")
                .ok_or_else(|| anyhow::anyhow!("--deal-id is required without --config"))?;
            let tax_lot_group_id = str_arg(&args, "--tax-lot-group")
                .ok_or_else(|| anyhow::anyhow!("--tax-lot-group is required without --config"))?;
            ArchiveJobConfig {
                deal_id: deal_id.to_string(),
                tax_lot_group_id: tax_lot_group_id.to_string(),
                batch_sizes: BatchSizes::default(),
            }
        }
    };

    // --batch-size overrides every level with one bound.
    let batch_sizes = match str_arg(&args, "--batch-size") {
        Some(raw) => BatchSizes::uniform(raw.parse()?),
        None => job.batch_sizes.clone(),
    };

    println!("archive-runner");
    println!("  source:         {source_path}");
    println!("  archive:        {archive_path}");
    println!("  deal id:        {}", job.deal_id);
    println!("  tax-lot group:  {}", job.tax_lot_group_id);
    println!();

    let source = DocStore::open(source_path)?;
    let archive = DocStore::open(archive_path)?;

    if seed_demo {
        seed_demo_fixture(&source, &job.deal_id, &job.tax_lot_group_id)?;
        println!("seeded demo fixture into source store");
    }

    let archiver = DealArchiver::new(&source, &archive, batch_sizes);
    archiver.archive_deal(&job.deal_id, &job.tax_lot_group_id)?;
    log::info!("archival run for deal {} complete", job.deal_id);

    print_summary(&archive)?;
    Ok(())
}

/// Per-collection archived counts, read back from the archive store.
/// Informative only — the archival contract itself is silent on success.
fn print_summary(archive: &DocStore) -> Result<()> {
    println!("=== ARCHIVE SUMMARY ===");
    for collection in [
        DEAL,
        BUSINESS_EVENT_RECORD,
        TAX_LOT_EFFECT,
        ACCRUAL_EFFECT,
        TAX_LOT,
    ] {
        println!("  {collection}: {}", archive.count(collection)?);
    }
    Ok(())
}

/// Seed the canonical demonstration hierarchy: three deal versions, two
/// business event records, two effects per branch, eight tax lots.
fn seed_demo_fixture(source: &DocStore, deal_id: &str, tlg_id: &str) -> Result<()> {
    for version in 1..=3 {
        source.insert_one(DEAL, &json!({ "_id": { "id": deal_id, "version": version } }))?;
    }

    for tx_id in ["12345678", "87654321"] {
        source.insert_one(
            BUSINESS_EVENT_RECORD,
            &json!({
                "BusinessEvent": {
                    "deal": { "dealId": deal_id },
                    "taxLotGroupId": tlg_id,
                },
                "meta": { "txId": tx_id },
            }),
        )?;
    }

    source.insert_one(
        TAX_LOT_EFFECT,
        &json!({ "key": { "txId": "12345678" }, "data": { "tls": [1, 2] } }),
    )?;
    source.insert_one(
        TAX_LOT_EFFECT,
        &json!({ "key": { "txId": "87654321" }, "data": { "tls": [3, 4] } }),
    )?;

    source.insert_one(
        ACCRUAL_EFFECT,
        &json!({ "key": { "txId": "12345678" }, "data": { "accs": [{ "tl": 5 }, { "tl": 6 }] } }),
    )?;
    source.insert_one(
        ACCRUAL_EFFECT,
        &json!({ "key": { "txId": "87654321" }, "data": { "accs": [{ "tl": 7 }, { "tl": 8 }] } }),
    )?;

    for id in 1..=8 {
        source.insert_one(TAX_LOT, &json!({ "_id": id }))?;
    }

    Ok(())
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
