//! Integration tests for CSV imports against real storage backends.

use narrate_core::models::schedules::{paye_2025, paye_2026, payroll_2026};
use narrate_core::store::{SnapshotStore, StoreConfig, StoreFactory, load_roster};
use narrate_core::{LawComparison, ProgressiveTaxCalculator};
use narrate_data::{BandTableLoader, RosterLoader, RosterLoaderError};
use narrate_db_sqlite::SqliteStoreFactory;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const BANDS_CSV: &str = include_str!("../test-data/paye_bands.csv");
const EMPLOYEES_CSV: &str = include_str!("../test-data/employees.csv");

async fn sqlite_store(connection_string: &str) -> Box<dyn SnapshotStore> {
    SqliteStoreFactory
        .create(&StoreConfig {
            backend: "sqlite".to_string(),
            connection_string: connection_string.to_string(),
        })
        .await
        .expect("Failed to open sqlite store")
}

#[test]
fn test_band_file_matches_builtin_schedules() {
    let records = BandTableLoader::parse(BANDS_CSV.as_bytes()).expect("Failed to parse CSV");

    let tables = BandTableLoader::build(&records).expect("Tables should be valid");

    assert_eq!(tables.len(), 3);
    assert_eq!(tables[0], paye_2025());
    assert_eq!(tables[1], paye_2026());
    assert_eq!(tables[2], payroll_2026());
}

#[test]
fn test_loaded_tables_drive_the_comparison() {
    let records = BandTableLoader::parse(BANDS_CSV.as_bytes()).unwrap();
    let mut tables = BandTableLoader::build(&records).unwrap().into_iter();
    let old_law = tables.next().unwrap();
    let new_law = tables.next().unwrap();

    let result = LawComparison::new(old_law, new_law)
        .compare(dec!(2500000))
        .unwrap();

    assert_eq!(result.tax_2025, dec!(413000));
    assert_eq!(result.tax_2026, dec!(198000));
}

#[test]
fn test_loaded_payroll_table_bands_taxable_pay() {
    let records = BandTableLoader::parse(BANDS_CSV.as_bytes()).unwrap();
    let tables = BandTableLoader::build(&records).unwrap();

    let tax = ProgressiveTaxCalculator::new(&tables[2])
        .tax(dec!(2760000))
        .unwrap();

    assert_eq!(tax, dec!(467600));
}

#[tokio::test]
async fn test_import_roster_into_sqlite_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("payroll.db");
    let path = path.to_str().expect("utf-8 path");

    let records = RosterLoader::parse(EMPLOYEES_CSV.as_bytes()).unwrap();
    {
        let store = sqlite_store(path).await;
        let added = RosterLoader::load(store.as_ref(), &records).await.unwrap();
        assert_eq!(added, 3);
    }

    let store = sqlite_store(path).await;
    let roster = load_roster(store.as_ref()).await.unwrap();

    assert_eq!(roster.len(), 3);
    assert_eq!(roster[0].name, "Ada Obi");
    assert_eq!(roster[0].monthly_tax, dec!(38967));
    assert_eq!(roster[2].monthly_gross, dec!(1000000));
    assert!(roster.iter().all(|e| !e.selected));
}

#[tokio::test]
async fn test_import_with_blank_tin_is_rejected() {
    let store = sqlite_store(":memory:").await;
    let csv = "name,email,tin,monthly_gross\nAda Obi,ada@example.com,,250000";
    let records = RosterLoader::parse(csv.as_bytes()).unwrap();

    let result = RosterLoader::load(store.as_ref(), &records).await;

    assert!(matches!(
        result,
        Err(RosterLoaderError::InvalidEmployee { row: 1, .. })
    ));
    assert!(load_roster(store.as_ref()).await.unwrap().is_empty());
}
