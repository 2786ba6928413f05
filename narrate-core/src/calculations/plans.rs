use rust_decimal::Decimal;

use super::common::round_naira;
use crate::models::{PaymentPlan, TaxMode};

/// Amount due per installment under `plan`, rounded to whole naira.
pub fn installment_amount(
    total: Decimal,
    plan: PaymentPlan,
) -> Decimal {
    match plan {
        PaymentPlan::Full => total,
        _ => round_naira(total / Decimal::from(plan.installments())),
    }
}

/// Businesses settle CIT in one payment; individuals may spread PAYE.
pub fn available_plans(tax_mode: TaxMode) -> &'static [PaymentPlan] {
    match tax_mode {
        TaxMode::Business => &[PaymentPlan::Full],
        TaxMode::Personal => &[
            PaymentPlan::Full,
            PaymentPlan::Quarterly,
            PaymentPlan::Monthly,
        ],
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn full_plan_is_unrounded_total() {
        assert_eq!(installment_amount(dec!(198000.5), PaymentPlan::Full), dec!(198000.5));
    }

    #[test]
    fn quarterly_and_monthly_are_rounded() {
        assert_eq!(installment_amount(dec!(198000), PaymentPlan::Quarterly), dec!(49500));
        assert_eq!(installment_amount(dec!(198000), PaymentPlan::Monthly), dec!(16500));
        assert_eq!(installment_amount(dec!(100000), PaymentPlan::Monthly), dec!(8333));
    }

    #[test]
    fn business_only_pays_in_full() {
        assert_eq!(available_plans(TaxMode::Business), &[PaymentPlan::Full]);
        assert_eq!(available_plans(TaxMode::Personal).len(), 3);
    }
}
