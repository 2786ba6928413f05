use tracing::info;

use crate::models::{PaymentHistoryItem, PaymentSnapshot, SubscriptionReceipt, TaxReceipt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerAction {
    SubscriptionPaid(SubscriptionReceipt),
    TaxPaid(TaxReceipt),
}

/// Payment history, newest first, plus the 2026 settlement flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentLedger {
    payment_history: Vec<PaymentHistoryItem>,
    tax_paid_for_2026: bool,
}

impl PaymentLedger {
    pub fn history(&self) -> &[PaymentHistoryItem] {
        &self.payment_history
    }

    pub fn tax_paid_for_2026(&self) -> bool {
        self.tax_paid_for_2026
    }

    pub fn reduce(
        mut self,
        action: LedgerAction,
    ) -> Self {
        let item = match action {
            LedgerAction::SubscriptionPaid(receipt) => PaymentHistoryItem::from(receipt),
            LedgerAction::TaxPaid(receipt) => {
                self.tax_paid_for_2026 = true;
                PaymentHistoryItem::from(receipt)
            }
        };
        info!(id = %item.id, amount = %item.amount, "payment recorded");
        self.payment_history.insert(0, item);
        self
    }

    pub fn snapshot(&self) -> PaymentSnapshot {
        PaymentSnapshot {
            payment_history: self.payment_history.clone(),
            tax_paid_for_2026: self.tax_paid_for_2026,
        }
    }
}

impl From<PaymentSnapshot> for PaymentLedger {
    fn from(snapshot: PaymentSnapshot) -> Self {
        Self {
            payment_history: snapshot.payment_history,
            tax_paid_for_2026: snapshot.tax_paid_for_2026,
        }
    }
}
