use std::io::Read;

use narrate_core::{BandTable, BandTableError, LawYear, TaxBand, TaxpayerCategory};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::deserialize_optional_decimal;

/// Errors that can occur when loading band tables.
#[derive(Debug, Error)]
pub enum BandLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Unknown law year {0} (expected 2025 or 2026)")]
    UnknownLawYear(i32),

    #[error("Unknown taxpayer category '{0}'")]
    UnknownCategory(String),

    #[error("{law_year} {category}: exemption threshold differs between rows")]
    InconsistentThreshold { law_year: i32, category: String },

    #[error("{law_year} {category}: {source}")]
    InvalidTable {
        law_year: i32,
        category: String,
        #[source]
        source: BandTableError,
    },
}

impl From<csv::Error> for BandLoaderError {
    fn from(err: csv::Error) -> Self {
        BandLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of a band table CSV file.
///
/// - `law_year`: 2025 or 2026
/// - `category`: `individual` or `employee-payroll`
/// - `upper_bound`: cumulative upper bound of the band (empty for the top band)
/// - `rate`: marginal rate as a decimal (e.g. 0.05 for 5%)
/// - `exemption_threshold`: repeated on every row of a table
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BandRecord {
    pub law_year: i32,
    pub category: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub exemption_threshold: Decimal,
}

/// Reads band tables from CSV and validates them into [`BandTable`]s.
pub struct BandTableLoader;

impl BandTableLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BandRecord>, BandLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BandRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Groups rows by (law year, category) in first-seen order and validates
    /// each group as one table. Rows within a group keep file order.
    pub fn build(records: &[BandRecord]) -> Result<Vec<BandTable>, BandLoaderError> {
        let mut groups: Vec<((i32, &str), Vec<&BandRecord>)> = Vec::new();

        for record in records {
            let key = (record.law_year, record.category.as_str());
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, rows)) => rows.push(record),
                None => groups.push((key, vec![record])),
            }
        }

        groups
            .into_iter()
            .map(|((year, category), rows)| Self::build_table(year, category, &rows))
            .collect()
    }

    fn build_table(
        year: i32,
        category: &str,
        rows: &[&BandRecord],
    ) -> Result<BandTable, BandLoaderError> {
        let law_year = LawYear::from_year(year).ok_or(BandLoaderError::UnknownLawYear(year))?;
        let parsed_category = TaxpayerCategory::parse(category)
            .ok_or_else(|| BandLoaderError::UnknownCategory(category.to_string()))?;

        let threshold = rows
            .first()
            .map(|r| r.exemption_threshold)
            .unwrap_or_default();
        if rows.iter().any(|r| r.exemption_threshold != threshold) {
            return Err(BandLoaderError::InconsistentThreshold {
                law_year: year,
                category: category.to_string(),
            });
        }

        let bands = rows
            .iter()
            .map(|r| TaxBand {
                upper_bound: r.upper_bound,
                marginal_rate: r.rate,
            })
            .collect();

        BandTable::new(law_year, parsed_category, threshold, bands).map_err(|source| {
            BandLoaderError::InvalidTable {
                law_year: year,
                category: category.to_string(),
                source,
            }
        })
    }
}
