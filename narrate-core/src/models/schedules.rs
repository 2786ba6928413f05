//! Compiled-in PAYE band tables.
//!
//! | Table            | Bounds (cumulative, ₦)               | Rates (%)              | Threshold |
//! |------------------|--------------------------------------|------------------------|-----------|
//! | `paye_2025`      | 300k, 600k, 1.1M, 1.6M, 3.2M, ∞      | 7, 11, 15, 19, 21, 24  | 0         |
//! | `paye_2026`      | 300k, 600k, 1.1M, 1.6M, 3.2M, ∞      | 5, 8, 12, 16, 19, 22   | 800,000   |
//! | `payroll_2026`   | widths 300k, 300k, 500k, 500k, 1.6M  | 7, 11, 15, 19, 21, 24  | 0         |
//!
//! The payroll table is published separately from the individual 2026 table
//! and is applied to income after the 8% pension deduction. Callers pick the
//! table matching their taxpayer category.

use rust_decimal::Decimal;

use super::tax_band::{BandTable, LawYear, TaxBand, TaxpayerCategory, cumulative_bands};

/// Flat exemption applied before the 2026 individual ladder.
pub const REFORM_EXEMPTION_THRESHOLD: Decimal = Decimal::from_parts(800_000, 0, 0, false, 0);

/// Share of annual gross withheld as pension before payroll banding.
pub const PENSION_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

fn naira(amount: u32) -> Decimal {
    Decimal::from(amount)
}

fn percent(rate: u32) -> Decimal {
    Decimal::new(i64::from(rate), 2)
}

fn ladder(rates: [u32; 6]) -> Vec<TaxBand> {
    let bounds = [300_000, 600_000, 1_100_000, 1_600_000, 3_200_000];
    bounds
        .iter()
        .zip(rates.iter())
        .map(|(bound, rate)| TaxBand::bounded(naira(*bound), percent(*rate)))
        .chain(std::iter::once(TaxBand::unbounded(percent(rates[5]))))
        .collect()
}

/// Individual PAYE schedule before the reform.
pub fn paye_2025() -> BandTable {
    BandTable::builtin(
        LawYear::Pre2026,
        TaxpayerCategory::Individual,
        Decimal::ZERO,
        ladder([7, 11, 15, 19, 21, 24]),
    )
}

/// Individual PAYE schedule under the 2026 reform.
pub fn paye_2026() -> BandTable {
    BandTable::builtin(
        LawYear::Reform2026,
        TaxpayerCategory::Individual,
        REFORM_EXEMPTION_THRESHOLD,
        ladder([5, 8, 12, 16, 19, 22]),
    )
}

/// Employee payroll schedule used for PAYE remittance.
pub fn payroll_2026() -> BandTable {
    let widths = [
        (Some(naira(300_000)), percent(7)),
        (Some(naira(300_000)), percent(11)),
        (Some(naira(500_000)), percent(15)),
        (Some(naira(500_000)), percent(19)),
        (Some(naira(1_600_000)), percent(21)),
        (None, percent(24)),
    ];

    BandTable::builtin(
        LawYear::Reform2026,
        TaxpayerCategory::EmployeePayroll,
        Decimal::ZERO,
        cumulative_bands(&widths),
    )
}

/// The compiled-in table for a law year and category, if one exists.
pub fn builtin_for(
    law_year: LawYear,
    category: TaxpayerCategory,
) -> Option<BandTable> {
    match (law_year, category) {
        (LawYear::Pre2026, TaxpayerCategory::Individual) => Some(paye_2025()),
        (LawYear::Reform2026, TaxpayerCategory::Individual) => Some(paye_2026()),
        (LawYear::Reform2026, TaxpayerCategory::EmployeePayroll) => Some(payroll_2026()),
        (LawYear::Pre2026, TaxpayerCategory::EmployeePayroll) => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn revalidate(table: &BandTable) -> BandTable {
        BandTable::new(
            table.law_year(),
            table.category(),
            table.exemption_threshold(),
            table.bands().to_vec(),
        )
        .expect("built-in table must satisfy band invariants")
    }

    #[test]
    fn builtin_tables_pass_validation() {
        for table in [paye_2025(), paye_2026(), payroll_2026()] {
            assert_eq!(revalidate(&table), table);
        }
    }

    #[test]
    fn constants_hold_expected_values() {
        assert_eq!(REFORM_EXEMPTION_THRESHOLD, dec!(800000));
        assert_eq!(PENSION_RATE, dec!(0.08));
    }

    #[test]
    fn paye_2025_rates_and_bounds() {
        let table = paye_2025();
        let rates: Vec<_> = table.bands().iter().map(|b| b.marginal_rate).collect();

        assert_eq!(
            rates,
            vec![
                dec!(0.07),
                dec!(0.11),
                dec!(0.15),
                dec!(0.19),
                dec!(0.21),
                dec!(0.24)
            ]
        );
        assert_eq!(table.bands()[2].upper_bound, Some(dec!(1100000)));
        assert_eq!(table.exemption_threshold(), dec!(0));
    }

    #[test]
    fn paye_2026_has_exemption_and_lower_rates() {
        let table = paye_2026();

        assert_eq!(table.exemption_threshold(), dec!(800000));
        assert_eq!(table.bands()[0].marginal_rate, dec!(0.05));
        assert_eq!(table.bands()[5].marginal_rate, dec!(0.22));
        assert_eq!(table.bands()[5].upper_bound, None);
    }

    #[test]
    fn payroll_table_is_distinct_from_individual_2026() {
        let payroll = payroll_2026();

        assert_eq!(payroll.category(), TaxpayerCategory::EmployeePayroll);
        assert_ne!(payroll.bands(), paye_2026().bands());
        assert_eq!(payroll.bands()[4].upper_bound, Some(dec!(3200000)));
    }

    #[test]
    fn builtin_lookup_matches_constructors() {
        assert_eq!(
            builtin_for(LawYear::Reform2026, TaxpayerCategory::EmployeePayroll),
            Some(payroll_2026())
        );
        assert_eq!(builtin_for(LawYear::Pre2026, TaxpayerCategory::EmployeePayroll), None);
    }
}
