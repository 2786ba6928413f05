//! Progressive (banded) tax computation.
//!
//! Each band's rate applies only to the slice of taxable income that falls
//! inside it. Income that sits exactly on a band boundary is taxed at the
//! lower band's rate.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use narrate_core::calculations::ProgressiveTaxCalculator;
//! use narrate_core::models::schedules;
//!
//! let table = schedules::paye_2025();
//! let result = ProgressiveTaxCalculator::new(&table)
//!     .calculate(dec!(2500000))
//!     .unwrap();
//!
//! assert_eq!(result.tax_amount, dec!(413000));
//! assert_eq!(result.slices.len(), 5);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::ratio_or_zero;
use crate::models::BandTable;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressiveTaxError {
    /// Income must be sanitised to a non-negative amount before banding.
    #[error("income must not be negative, got {0}")]
    NegativeIncome(Decimal),
}

/// The portion of taxable income that fell inside one band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandSlice {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub taxable_amount: Decimal,
    pub tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputation {
    /// Income as given, before the exemption threshold.
    pub income: Decimal,

    /// Income above the exemption threshold.
    pub taxable_income: Decimal,

    /// Unrounded tax liability.
    pub tax_amount: Decimal,

    /// `tax_amount / income`, or zero for zero income.
    pub effective_rate: Decimal,

    /// Per-band breakdown, lowest band first. Bands the income never reached
    /// are omitted.
    pub slices: Vec<BandSlice>,
}

impl TaxComputation {
    fn exempt(income: Decimal) -> Self {
        Self {
            income,
            taxable_income: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            effective_rate: Decimal::ZERO,
            slices: Vec::new(),
        }
    }
}

/// Applies a [`BandTable`] to an income figure.
#[derive(Debug, Clone, Copy)]
pub struct ProgressiveTaxCalculator<'a> {
    table: &'a BandTable,
}

impl<'a> ProgressiveTaxCalculator<'a> {
    pub fn new(table: &'a BandTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a BandTable {
        self.table
    }

    /// Computes the liability for `income`.
    ///
    /// Income at or below the table's exemption threshold owes nothing. The
    /// remainder is walked up the band ladder until it is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressiveTaxError::NegativeIncome`] for negative input.
    pub fn calculate(
        &self,
        income: Decimal,
    ) -> Result<TaxComputation, ProgressiveTaxError> {
        if income < Decimal::ZERO {
            return Err(ProgressiveTaxError::NegativeIncome(income));
        }

        let threshold = self.table.exemption_threshold();
        if income <= threshold {
            return Ok(TaxComputation::exempt(income));
        }

        let taxable_income = income - threshold;
        let mut remaining = taxable_income;
        let mut previous_bound = Decimal::ZERO;
        let mut tax = Decimal::ZERO;
        let mut slices = Vec::new();

        for band in self.table.bands() {
            let taxable_in_band = match band.upper_bound {
                Some(bound) => remaining.min(bound - previous_bound),
                None => remaining,
            };
            if taxable_in_band <= Decimal::ZERO {
                break;
            }

            let band_tax = taxable_in_band * band.marginal_rate;
            tax += band_tax;
            remaining -= taxable_in_band;
            slices.push(BandSlice {
                lower_bound: previous_bound,
                upper_bound: band.upper_bound,
                rate: band.marginal_rate,
                taxable_amount: taxable_in_band,
                tax: band_tax,
            });

            if let Some(bound) = band.upper_bound {
                previous_bound = bound;
            }
        }

        debug!(
            law_year = %self.table.law_year(),
            category = self.table.category().as_str(),
            %income,
            %taxable_income,
            %tax,
            "progressive tax computed"
        );

        Ok(TaxComputation {
            income,
            taxable_income,
            tax_amount: tax,
            effective_rate: ratio_or_zero(tax, income),
            slices,
        })
    }

    /// Shorthand for `calculate(income)?.tax_amount`.
    pub fn tax(
        &self,
        income: Decimal,
    ) -> Result<Decimal, ProgressiveTaxError> {
        self.calculate(income).map(|c| c.tax_amount)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, proptest};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::schedules::{paye_2025, paye_2026, payroll_2026};
    use crate::models::{LawYear, TaxBand, TaxpayerCategory};

    fn tax(
        table: &BandTable,
        income: Decimal,
    ) -> Decimal {
        ProgressiveTaxCalculator::new(table).tax(income).unwrap()
    }

    // =========================================================================
    // 2025 schedule
    // =========================================================================

    #[test]
    fn paye_2025_at_two_and_a_half_million() {
        assert_eq!(tax(&paye_2025(), dec!(2500000)), dec!(413000));
    }

    #[test]
    fn paye_2025_slices_match_band_widths() {
        let table = paye_2025();
        let result = ProgressiveTaxCalculator::new(&table)
            .calculate(dec!(2500000))
            .unwrap();

        let amounts: Vec<_> = result.slices.iter().map(|s| s.taxable_amount).collect();
        assert_eq!(
            amounts,
            vec![
                dec!(300000),
                dec!(300000),
                dec!(500000),
                dec!(500000),
                dec!(900000)
            ]
        );
        let taxes: Vec<_> = result.slices.iter().map(|s| s.tax).collect();
        assert_eq!(
            taxes,
            vec![
                dec!(21000),
                dec!(33000),
                dec!(75000),
                dec!(95000),
                dec!(189000)
            ]
        );
        assert_eq!(result.slices[4].lower_bound, dec!(1600000));
    }

    #[test]
    fn paye_2025_reaches_the_unbounded_band() {
        // 3.2M fills the first five bands: 21000+33000+75000+95000+336000.
        let at_top_bound = tax(&paye_2025(), dec!(3200000));
        assert_eq!(at_top_bound, dec!(560000));

        assert_eq!(tax(&paye_2025(), dec!(4200000)), dec!(800000));
    }

    #[test]
    fn boundary_amount_is_taxed_at_lower_band_rate() {
        let table = paye_2025();

        assert_eq!(tax(&table, dec!(300000)), dec!(21000));
        assert_eq!(tax(&table, dec!(300001)), dec!(21000.11));
    }

    #[test]
    fn no_jump_across_band_boundary() {
        let table = paye_2025();
        let epsilon = dec!(0.01);
        let boundary = dec!(600000);

        let below = tax(&table, boundary - epsilon);
        let at = tax(&table, boundary);

        assert_eq!(at - below, epsilon * dec!(0.11));
    }

    // =========================================================================
    // 2026 schedule
    // =========================================================================

    #[test]
    fn paye_2026_at_two_and_a_half_million() {
        let table = paye_2026();
        let result = ProgressiveTaxCalculator::new(&table)
            .calculate(dec!(2500000))
            .unwrap();

        assert_eq!(result.taxable_income, dec!(1700000));
        assert_eq!(result.tax_amount, dec!(198000));
        assert_eq!(result.effective_rate, dec!(0.0792));
    }

    #[test]
    fn paye_2026_exempts_income_at_threshold() {
        assert_eq!(tax(&paye_2026(), dec!(800000)), dec!(0));
    }

    #[test]
    fn paye_2026_taxes_first_naira_above_threshold() {
        let just_over = tax(&paye_2026(), dec!(800001));

        assert!(just_over > Decimal::ZERO);
        assert_eq!(just_over, dec!(0.05));
    }

    // =========================================================================
    // payroll schedule
    // =========================================================================

    #[test]
    fn payroll_table_taxes_like_widths() {
        // 2,760,000 taxable: 21000+33000+75000+95000 + 1,160,000 × 0.21.
        assert_eq!(tax(&payroll_2026(), dec!(2760000)), dec!(467600));
    }

    // =========================================================================
    // edge cases
    // =========================================================================

    #[test]
    fn zero_income_owes_nothing_on_every_table() {
        for table in [paye_2025(), paye_2026(), payroll_2026()] {
            let result = ProgressiveTaxCalculator::new(&table)
                .calculate(dec!(0))
                .unwrap();

            assert_eq!(result.tax_amount, dec!(0));
            assert_eq!(result.effective_rate, dec!(0));
            assert!(result.slices.is_empty());
        }
    }

    #[test]
    fn negative_income_is_rejected() {
        let table = paye_2025();

        assert_eq!(
            ProgressiveTaxCalculator::new(&table).calculate(dec!(-1)),
            Err(ProgressiveTaxError::NegativeIncome(dec!(-1)))
        );
    }

    #[test]
    fn fractional_income_is_not_rounded() {
        assert_eq!(tax(&paye_2025(), dec!(100.50)), dec!(7.035));
    }

    #[test]
    fn single_unbounded_band_is_flat_tax() {
        let table = BandTable::new(
            LawYear::Reform2026,
            TaxpayerCategory::Individual,
            dec!(1000),
            vec![TaxBand::unbounded(dec!(0.10))],
        )
        .unwrap();

        assert_eq!(tax(&table, dec!(6000)), dec!(500));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_tax_is_non_negative_and_monotonic(
            low in 0u64..20_000_000,
            delta in 0u64..5_000_000,
        ) {
            for table in [paye_2025(), paye_2026(), payroll_2026()] {
                let calculator = ProgressiveTaxCalculator::new(&table);
                let lower = calculator.tax(Decimal::from(low)).unwrap();
                let higher = calculator.tax(Decimal::from(low + delta)).unwrap();

                prop_assert!(lower >= Decimal::ZERO);
                prop_assert!(higher >= lower);
            }
        }

        #[test]
        fn prop_tax_never_exceeds_top_rate(income in 0u64..50_000_000) {
            let table = paye_2025();
            let income = Decimal::from(income);
            let owed = ProgressiveTaxCalculator::new(&table).tax(income).unwrap();

            prop_assert!(owed <= income * dec!(0.24));
        }
    }
}
