use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::calculations::installment_amount;
use crate::models::ids::{nrs_receipt_no, simulated_tin, transaction_ref};
use crate::models::{
    AccountType, Employee, PaymentMethod, PaymentPlan, PaymentStatus, SubscriptionReceipt,
    SubscriptionTier, TaxBreakdown, TaxMode, TaxReceipt, TaxType, UserProfile, UserType,
};
use crate::state::PayrollRoster;

const TAX_YEAR: i32 = 2026;
const PERSONAL_TAXPAYER: &str = "John Doe";
const BUSINESS_TAXPAYER: &str = "Sample Business Ltd";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRequest {
    pub target: SubscriptionTier,
    pub account_type: AccountType,
    pub method: PaymentMethod,
}

impl SubscriptionRequest {
    pub(crate) fn receipt<R: Rng + ?Sized>(
        &self,
        amount: Decimal,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> SubscriptionReceipt {
        SubscriptionReceipt {
            transaction_ref: transaction_ref(now, rng),
            date: now,
            amount,
            mode: self.target,
            method: self.method,
            user_type: UserType::from(self.account_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxPaymentRequest {
    pub tax_mode: TaxMode,
    pub taxpayer_name: String,
    pub breakdown: TaxBreakdown,
    pub plan: PaymentPlan,
    pub method: PaymentMethod,
    pub consent: bool,
}

impl TaxPaymentRequest {
    /// Request for the profile's current tax mode, using the demo taxpayer
    /// name for that mode.
    pub fn for_profile(
        profile: &UserProfile,
        breakdown: TaxBreakdown,
        plan: PaymentPlan,
        method: PaymentMethod,
        consent: bool,
    ) -> Self {
        let taxpayer_name = match profile.tax_mode {
            TaxMode::Personal => PERSONAL_TAXPAYER,
            TaxMode::Business => BUSINESS_TAXPAYER,
        };
        Self {
            tax_mode: profile.tax_mode,
            taxpayer_name: taxpayer_name.to_string(),
            breakdown,
            plan,
            method,
            consent,
        }
    }

    pub fn tax_type(&self) -> TaxType {
        self.tax_mode.tax_type()
    }

    /// The liability for the year.
    pub fn total(&self) -> Decimal {
        self.breakdown.tax_amount
    }

    /// What this payment charges under the chosen plan.
    pub fn amount_due(&self) -> Decimal {
        installment_amount(self.total(), self.plan)
    }

    /// The receipt carries the full liability whatever the plan.
    pub(crate) fn receipt<R: Rng + ?Sized>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> TaxReceipt {
        TaxReceipt {
            nrs_receipt_no: nrs_receipt_no(now, rng),
            tin: simulated_tin(rng),
            tax_year: TAX_YEAR,
            tax_type: self.tax_type(),
            amount: self.total(),
            date: now,
            method: self.method,
            status: PaymentStatus::Paid,
            taxpayer_name: self.taxpayer_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollRemittanceRequest {
    pub employees: Vec<Employee>,
    pub method: PaymentMethod,
    pub consent: bool,
}

impl PayrollRemittanceRequest {
    /// Remits for whoever is currently selected.
    pub fn from_roster(
        roster: &PayrollRoster,
        method: PaymentMethod,
        consent: bool,
    ) -> Self {
        Self {
            employees: roster.selected().cloned().collect(),
            method,
            consent,
        }
    }

    pub fn total(&self) -> Decimal {
        self.employees.iter().map(|e| e.monthly_tax).sum()
    }
}

/// Confirmation of a PAYE remittance for selected employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRemittance {
    pub reference: String,
    pub date: DateTime<Utc>,
    pub method: PaymentMethod,
    pub employee_ids: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl PayrollRemittance {
    pub(crate) fn new<R: Rng + ?Sized>(
        request: &PayrollRemittanceRequest,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Self {
        Self {
            reference: transaction_ref(now, rng),
            date: now,
            method: request.method,
            employee_ids: request.employees.iter().map(|e| e.id.clone()).collect(),
            total: request.total(),
        }
    }
}
