use std::io::Read;

use chrono::{DateTime, Duration, Utc};
use narrate_core::calculations::common::sanitize_amount;
use narrate_core::state::{PayrollRoster, RosterAction, RosterError, register_employee};
use narrate_core::store::{SnapshotStore, StoreError, load_roster, save_roster};
use narrate_core::{EmployeeTaxCalculator, NewEmployee};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RosterLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("row {row}: {source}")]
    InvalidEmployee {
        row: usize,
        #[source]
        source: RosterError,
    },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<csv::Error> for RosterLoaderError {
    fn from(err: csv::Error) -> Self {
        RosterLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of an employee CSV file: `name,email,tin,monthly_gross`.
///
/// `monthly_gross` is free text; only its digits are kept, so `"₦250,000"`
/// reads as 250000.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EmployeeRecord {
    pub name: String,
    pub email: String,
    pub tin: String,
    #[serde(deserialize_with = "deserialize_gross")]
    pub monthly_gross: Decimal,
}

fn deserialize_gross<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(sanitize_amount(&raw))
}

impl From<&EmployeeRecord> for NewEmployee {
    fn from(record: &EmployeeRecord) -> Self {
        NewEmployee {
            name: record.name.clone(),
            email: record.email.clone(),
            tin: record.tin.clone(),
            monthly_gross: record.monthly_gross,
        }
    }
}

/// Imports employees into the persisted payroll roster.
pub struct RosterLoader;

impl RosterLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<EmployeeRecord>, RosterLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: EmployeeRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Computes each employee's PAYE and appends them to the stored roster.
    ///
    /// Every row is validated before anything is written, so a bad row
    /// leaves the roster untouched. Returns the number of employees added.
    pub async fn load(
        store: &dyn SnapshotStore,
        records: &[EmployeeRecord],
    ) -> Result<usize, RosterLoaderError> {
        Self::load_at(store, records, Utc::now()).await
    }

    async fn load_at(
        store: &dyn SnapshotStore,
        records: &[EmployeeRecord],
        now: DateTime<Utc>,
    ) -> Result<usize, RosterLoaderError> {
        let calculator = EmployeeTaxCalculator::default();

        // Ids are derived from the timestamp; offset each row by a
        // millisecond so a batch never collides.
        let employees = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let stamp = now + Duration::milliseconds(index as i64);
                register_employee(NewEmployee::from(record), &calculator, stamp).map_err(
                    |source| RosterLoaderError::InvalidEmployee {
                        row: index + 1,
                        source,
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let added = employees.len();
        let roster = employees.into_iter().fold(
            PayrollRoster::new(load_roster(store).await?),
            |roster, employee| roster.reduce(RosterAction::Add(employee)),
        );
        save_roster(store, roster.employees()).await?;

        info!(added, total = roster.employees().len(), "roster imported");
        Ok(added)
    }
}
