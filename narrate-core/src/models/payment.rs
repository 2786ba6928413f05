use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::profile::{AccountType, TaxType};
use super::subscription::SubscriptionTier;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Transfer,
    Ussd,
    Debit,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Transfer => "transfer",
            Self::Ussd => "ussd",
            Self::Debit => "debit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "card" => Some(Self::Card),
            "transfer" => Some(Self::Transfer),
            "ussd" => Some(Self::Ussd),
            "debit" => Some(Self::Debit),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentPlan {
    #[default]
    Full,
    Quarterly,
    Monthly,
}

impl PaymentPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Quarterly => "quarterly",
            Self::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "full" => Some(Self::Full),
            "quarterly" => Some(Self::Quarterly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    /// Number of equal installments the annual amount is split into.
    pub fn installments(&self) -> u32 {
        match self {
            Self::Full => 1,
            Self::Quarterly => 4,
            Self::Monthly => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Individual,
    Business,
}

impl From<AccountType> for UserType {
    fn from(account_type: AccountType) -> Self {
        if account_type.is_business() {
            Self::Business
        } else {
            Self::Individual
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionReceipt {
    pub transaction_ref: String,
    pub date: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub mode: SubscriptionTier,
    pub method: PaymentMethod,
    pub user_type: UserType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxReceipt {
    pub nrs_receipt_no: String,
    pub tin: String,
    pub tax_year: i32,
    pub tax_type: TaxType,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub taxpayer_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Receipt {
    Subscription(SubscriptionReceipt),
    Tax(TaxReceipt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Subscription,
    Tax,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentHistoryItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub status: PaymentStatus,
    pub receipt: Receipt,
}

impl From<SubscriptionReceipt> for PaymentHistoryItem {
    fn from(receipt: SubscriptionReceipt) -> Self {
        Self {
            id: receipt.transaction_ref.clone(),
            kind: PaymentKind::Subscription,
            amount: receipt.amount,
            date: receipt.date,
            status: PaymentStatus::Paid,
            receipt: Receipt::Subscription(receipt),
        }
    }
}

impl From<TaxReceipt> for PaymentHistoryItem {
    fn from(receipt: TaxReceipt) -> Self {
        Self {
            id: receipt.nrs_receipt_no.clone(),
            kind: PaymentKind::Tax,
            amount: receipt.amount,
            date: receipt.date,
            status: receipt.status,
            receipt: Receipt::Tax(receipt),
        }
    }
}

/// Figures shown alongside a tax payment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    #[serde(with = "rust_decimal::serde::float")]
    pub gross_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pension_deduction: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub rent_relief: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub taxable_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_amount: Decimal,
}

/// The persisted part of payment state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSnapshot {
    #[serde(default)]
    pub payment_history: Vec<PaymentHistoryItem>,
    #[serde(default, rename = "taxPaidFor2026")]
    pub tax_paid_for_2026: bool,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn sample_tax_receipt() -> TaxReceipt {
        TaxReceipt {
            nrs_receipt_no: "NRS-2026-1700000000000ABCD".to_string(),
            tin: "TIN-123456789".to_string(),
            tax_year: 2026,
            tax_type: TaxType::Paye,
            amount: dec!(198000),
            date: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
            method: PaymentMethod::Transfer,
            status: PaymentStatus::Paid,
            taxpayer_name: "John Doe".to_string(),
        }
    }

    #[test]
    fn history_item_uses_receipt_number_as_id() {
        let item = PaymentHistoryItem::from(sample_tax_receipt());

        assert_eq!(item.id, "NRS-2026-1700000000000ABCD");
        assert_eq!(item.kind, PaymentKind::Tax);
        assert_eq!(item.amount, dec!(198000));
    }

    #[test]
    fn snapshot_json_uses_persisted_field_names() {
        let snapshot = PaymentSnapshot {
            payment_history: vec![sample_tax_receipt().into()],
            tax_paid_for_2026: true,
        };

        let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["taxPaidFor2026"], serde_json::json!(true));
        let item = &json["paymentHistory"][0];
        assert_eq!(item["type"], serde_json::json!("tax"));
        assert_eq!(item["status"], serde_json::json!("paid"));
        assert!(item["amount"].is_number());
        assert_eq!(item["receipt"]["taxType"], serde_json::json!("PAYE"));
    }

    #[test]
    fn untagged_receipt_restores_the_right_variant() {
        let item = PaymentHistoryItem::from(sample_tax_receipt());
        let json = serde_json::to_string(&item).unwrap();

        let restored: PaymentHistoryItem = serde_json::from_str(&json).unwrap();

        assert!(matches!(restored.receipt, Receipt::Tax(_)));
        assert_eq!(restored.amount, dec!(198000));
    }

    #[test]
    fn snapshot_fields_default_when_missing() {
        let snapshot: PaymentSnapshot = serde_json::from_str("{}").unwrap();

        assert_eq!(snapshot, PaymentSnapshot::default());
    }

    #[test]
    fn plan_installments() {
        assert_eq!(PaymentPlan::Full.installments(), 1);
        assert_eq!(PaymentPlan::Quarterly.installments(), 4);
        assert_eq!(PaymentPlan::Monthly.installments(), 12);
    }

    #[test]
    fn business_account_receipts_are_business_user_type() {
        assert_eq!(UserType::from(AccountType::Corporate), UserType::Business);
        assert_eq!(UserType::from(AccountType::Individual), UserType::Individual);
    }
}
