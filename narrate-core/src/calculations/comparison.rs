//! Old-law vs. new-law comparison for a single income figure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::common::ratio_or_zero;
use super::progressive::{ProgressiveTaxCalculator, ProgressiveTaxError};
use crate::models::schedules::{paye_2025, paye_2026};
use crate::models::{BandTable, TaxBreakdown};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub income: Decimal,
    pub tax_2025: Decimal,
    pub tax_2026: Decimal,

    /// `tax_2025 - tax_2026`. Negative when the new law costs more.
    pub savings: Decimal,

    /// Savings as a percentage of the 2025 liability; zero when nothing was
    /// owed under 2025.
    pub savings_percent: Decimal,

    /// 2026 liability as a fraction of income.
    pub effective_rate: Decimal,

    /// Income above the 2026 exemption threshold.
    pub taxable_2026: Decimal,
}

impl ComparisonResult {
    /// Whether the savings block should be shown at all.
    pub fn shows_savings(&self) -> bool {
        self.savings > Decimal::ZERO
    }

    /// Breakdown handed to the tax payment flow for the 2026 liability.
    pub fn breakdown(&self) -> TaxBreakdown {
        TaxBreakdown {
            gross_income: self.income,
            pension_deduction: Decimal::ZERO,
            rent_relief: Decimal::ZERO,
            taxable_income: self.taxable_2026,
            tax_amount: self.tax_2026,
        }
    }
}

/// Runs the same income through an old and a new band table.
#[derive(Debug, Clone)]
pub struct LawComparison {
    old_law: BandTable,
    new_law: BandTable,
}

impl LawComparison {
    pub fn new(
        old_law: BandTable,
        new_law: BandTable,
    ) -> Self {
        Self { old_law, new_law }
    }

    /// The individual PAYE tables: 2025 against 2026.
    pub fn personal() -> Self {
        Self::new(paye_2025(), paye_2026())
    }

    pub fn old_law(&self) -> &BandTable {
        &self.old_law
    }

    pub fn new_law(&self) -> &BandTable {
        &self.new_law
    }

    /// Computes both liabilities and the derived savings figures.
    ///
    /// # Errors
    ///
    /// Propagates [`ProgressiveTaxError`] for negative income.
    pub fn compare(
        &self,
        income: Decimal,
    ) -> Result<ComparisonResult, ProgressiveTaxError> {
        let old = ProgressiveTaxCalculator::new(&self.old_law).calculate(income)?;
        let new = ProgressiveTaxCalculator::new(&self.new_law).calculate(income)?;

        let savings = old.tax_amount - new.tax_amount;
        let savings_percent = ratio_or_zero(savings, old.tax_amount) * Decimal::ONE_HUNDRED;

        debug!(%income, tax_2025 = %old.tax_amount, tax_2026 = %new.tax_amount, %savings, "law comparison");

        Ok(ComparisonResult {
            income,
            tax_2025: old.tax_amount,
            tax_2026: new.tax_amount,
            savings,
            savings_percent,
            effective_rate: new.effective_rate,
            taxable_2026: new.taxable_income,
        })
    }
}

impl Default for LawComparison {
    fn default() -> Self {
        Self::personal()
    }
}
