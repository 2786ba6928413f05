//! PAYE for employees on the payroll roster.
//!
//! Monthly gross is annualised, an 8% pension contribution is taken off, and
//! the remainder is banded with the payroll table. Stored figures are rounded
//! to whole naira.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::round_naira;
use super::progressive::{ProgressiveTaxCalculator, ProgressiveTaxError};
use crate::models::BandTable;
use crate::models::schedules::{PENSION_RATE, payroll_2026};

const MONTHS: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeTax {
    pub annual_gross: Decimal,
    pub pension_deduction: Decimal,
    pub taxable_income: Decimal,
    pub annual_tax: Decimal,
    pub monthly_tax: Decimal,
}

#[derive(Debug, Clone)]
pub struct EmployeeTaxCalculator {
    table: BandTable,
    pension_rate: Decimal,
}

impl EmployeeTaxCalculator {
    pub fn new(
        table: BandTable,
        pension_rate: Decimal,
    ) -> Self {
        Self {
            table,
            pension_rate,
        }
    }

    pub fn calculate(
        &self,
        monthly_gross: Decimal,
    ) -> Result<EmployeeTax, ProgressiveTaxError> {
        let annual_gross = monthly_gross * MONTHS;
        let pension_deduction = annual_gross * self.pension_rate;
        let taxable_income = annual_gross - pension_deduction;

        let tax = ProgressiveTaxCalculator::new(&self.table).tax(taxable_income)?;

        Ok(EmployeeTax {
            annual_gross,
            pension_deduction,
            taxable_income,
            annual_tax: round_naira(tax),
            monthly_tax: round_naira(tax / MONTHS),
        })
    }
}

impl Default for EmployeeTaxCalculator {
    fn default() -> Self {
        Self::new(payroll_2026(), PENSION_RATE)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn annualises_and_deducts_pension() {
        let result = EmployeeTaxCalculator::default()
            .calculate(dec!(250000))
            .unwrap();

        assert_eq!(result.annual_gross, dec!(3000000));
        assert_eq!(result.pension_deduction, dec!(240000));
        assert_eq!(result.taxable_income, dec!(2760000));
    }

    #[test]
    fn rounds_annual_and_monthly_tax_to_naira() {
        let result = EmployeeTaxCalculator::default()
            .calculate(dec!(250000))
            .unwrap();

        assert_eq!(result.annual_tax, dec!(467600));
        // 467600 / 12 = 38966.67
        assert_eq!(result.monthly_tax, dec!(38967));
    }

    #[test]
    fn low_earner_stays_in_first_band() {
        // 20,000 × 12 × 0.92 = 220,800 taxable at 7%.
        let result = EmployeeTaxCalculator::default()
            .calculate(dec!(20000))
            .unwrap();

        assert_eq!(result.annual_tax, dec!(15456));
        assert_eq!(result.monthly_tax, dec!(1288));
    }

    #[test]
    fn zero_gross_owes_nothing() {
        let result = EmployeeTaxCalculator::default().calculate(dec!(0)).unwrap();

        assert_eq!(result.annual_tax, dec!(0));
        assert_eq!(result.monthly_tax, dec!(0));
    }
}
