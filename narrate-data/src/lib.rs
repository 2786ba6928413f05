//! CSV import for band tables and payroll rosters.

mod bands;
mod roster;

use rust_decimal::Decimal;
use serde::Deserialize;

pub use bands::{BandLoaderError, BandRecord, BandTableLoader};
pub use roster::{EmployeeRecord, RosterLoader, RosterLoaderError};

/// Empty cells read as `None`.
pub(crate) fn deserialize_optional_decimal<'de, D>(
    deserializer: D
) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
