//! Job configuration tests: defaults, JSON parsing, validation.

use deal_archive_core::{ArchiveError, ArchiveJobConfig, BatchSizes};

#[test]
fn defaults_are_valid() {
    let batch = BatchSizes::default();
    assert_eq!(batch.deals, 100);
    assert_eq!(batch.tax_lots, 100);
    batch.validate().unwrap();
}

#[test]
fn job_config_parses_with_default_batch_sizes() {
    let job: ArchiveJobConfig = serde_json::from_str(
        r#"{ "deal_id": "D", "tax_lot_group_id": "G" }"#,
    )
    .unwrap();

    assert_eq!(job.deal_id, "D");
    assert_eq!(job.tax_lot_group_id, "G");
    assert_eq!(job.batch_sizes.business_event_records, 100);
}

/// Levels left out of the config fall back to the default bound.
#[test]
fn partial_batch_sizes_fill_in_defaults() {
    let job: ArchiveJobConfig = serde_json::from_str(
        r#"{
            "deal_id": "D",
            "tax_lot_group_id": "G",
            "batch_sizes": { "tax_lots": 25 }
        }"#,
    )
    .unwrap();

    assert_eq!(job.batch_sizes.tax_lots, 25);
    assert_eq!(job.batch_sizes.deals, 100);
    job.batch_sizes.validate().unwrap();
}

#[test]
fn zero_batch_size_fails_validation() {
    let err = BatchSizes::uniform(0).validate().unwrap_err();
    assert!(matches!(err, ArchiveError::InvalidBatchSize(0)));

    let batch = BatchSizes {
        accrual_effects: 0,
        ..BatchSizes::default()
    };
    assert!(batch.validate().is_err());
}
