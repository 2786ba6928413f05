use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tax law regime a band table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LawYear {
    /// The schedule in force up to the end of 2025.
    Pre2026,
    /// The reform schedule effective January 1, 2026.
    Reform2026,
}

impl LawYear {
    pub fn year(&self) -> i32 {
        match self {
            Self::Pre2026 => 2025,
            Self::Reform2026 => 2026,
        }
    }

    pub fn from_year(year: i32) -> Option<Self> {
        match year {
            2025 => Some(Self::Pre2026),
            2026 => Some(Self::Reform2026),
            _ => None,
        }
    }
}

impl fmt::Display for LawYear {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.year())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaxpayerCategory {
    Individual,
    EmployeePayroll,
}

impl TaxpayerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::EmployeePayroll => "employee-payroll",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "individual" => Some(Self::Individual),
            "employee-payroll" => Some(Self::EmployeePayroll),
            _ => None,
        }
    }
}

/// A single income range taxed at one marginal rate.
///
/// `upper_bound` is cumulative (measured from zero taxable income).
/// `None` marks the open-ended top band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBand {
    pub upper_bound: Option<Decimal>,
    pub marginal_rate: Decimal,
}

impl TaxBand {
    pub fn bounded(
        upper_bound: Decimal,
        marginal_rate: Decimal,
    ) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            marginal_rate,
        }
    }

    pub fn unbounded(marginal_rate: Decimal) -> Self {
        Self {
            upper_bound: None,
            marginal_rate,
        }
    }
}

/// Errors raised when a band table violates its structural invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BandTableError {
    #[error("band table has no bands")]
    Empty,

    #[error("exemption threshold must not be negative, got {0}")]
    NegativeThreshold(Decimal),

    #[error("band {index} rate must be strictly between 0 and 1, got {rate}")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("band {index} upper bound {bound} does not exceed the previous bound")]
    NonIncreasingBound { index: usize, bound: Decimal },

    #[error("band {index} is unbounded but is not the last band")]
    UnboundedBeforeEnd { index: usize },

    #[error("last band must be unbounded")]
    BoundedTopBand,
}

/// An ordered, gap-free set of bands covering income from zero to infinity.
///
/// Tables are immutable once built; [`BandTable::new`] is the only way to
/// obtain one, so every table in circulation satisfies the invariants checked
/// there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BandTable {
    law_year: LawYear,
    category: TaxpayerCategory,
    exemption_threshold: Decimal,
    bands: Vec<TaxBand>,
}

impl BandTable {
    /// Builds a validated band table.
    ///
    /// # Errors
    ///
    /// Returns [`BandTableError`] if the table is empty, the threshold is
    /// negative, a rate falls outside `(0, 1)`, bounds are not strictly
    /// increasing, or the open-ended band is missing or misplaced.
    pub fn new(
        law_year: LawYear,
        category: TaxpayerCategory,
        exemption_threshold: Decimal,
        bands: Vec<TaxBand>,
    ) -> Result<Self, BandTableError> {
        if bands.is_empty() {
            return Err(BandTableError::Empty);
        }
        if exemption_threshold < Decimal::ZERO {
            return Err(BandTableError::NegativeThreshold(exemption_threshold));
        }

        let last = bands.len() - 1;
        let mut previous = Decimal::ZERO;
        for (index, band) in bands.iter().enumerate() {
            if band.marginal_rate <= Decimal::ZERO || band.marginal_rate >= Decimal::ONE {
                return Err(BandTableError::InvalidRate {
                    index,
                    rate: band.marginal_rate,
                });
            }
            match band.upper_bound {
                Some(bound) => {
                    if index == last {
                        return Err(BandTableError::BoundedTopBand);
                    }
                    if bound <= previous {
                        return Err(BandTableError::NonIncreasingBound { index, bound });
                    }
                    previous = bound;
                }
                None if index != last => {
                    return Err(BandTableError::UnboundedBeforeEnd { index });
                }
                None => {}
            }
        }

        Ok(Self {
            law_year,
            category,
            exemption_threshold,
            bands,
        })
    }

    /// Skips validation. Only for the compiled-in schedules, which are
    /// checked against [`BandTable::new`] in tests.
    pub(crate) fn builtin(
        law_year: LawYear,
        category: TaxpayerCategory,
        exemption_threshold: Decimal,
        bands: Vec<TaxBand>,
    ) -> Self {
        Self {
            law_year,
            category,
            exemption_threshold,
            bands,
        }
    }

    pub fn law_year(&self) -> LawYear {
        self.law_year
    }

    pub fn category(&self) -> TaxpayerCategory {
        self.category
    }

    pub fn exemption_threshold(&self) -> Decimal {
        self.exemption_threshold
    }

    pub fn bands(&self) -> &[TaxBand] {
        &self.bands
    }
}

/// Turns band widths into cumulative bounds.
///
/// Each `Some(width)` is added to the running total to give that band's
/// upper bound; `None` is the open-ended top band.
pub(crate) fn cumulative_bands(widths: &[(Option<Decimal>, Decimal)]) -> Vec<TaxBand> {
    let mut running = Decimal::ZERO;
    widths
        .iter()
        .map(|(width, rate)| match width {
            Some(w) => {
                running += *w;
                TaxBand::bounded(running, *rate)
            }
            None => TaxBand::unbounded(*rate),
        })
        .collect()
}
