//! One command-line session: profile, ledger and roster wired to storage
//! and the payment flow.

use chrono::{DateTime, Utc};
use narrate_core::gate::{EMPLOYEE_PAYROLL, TAX_CLEARANCE_CERTIFICATE};
use narrate_core::store::{
    EMPLOYEES_KEY, PAYMENT_STATE_KEY, load_payment_snapshot, load_roster, save_payment_snapshot,
    save_roster,
};
use narrate_core::{
    ComparisonResult, Employee, EmployeeTaxCalculator, Feature, FeatureGate, FlowError, GateError,
    InMemoryStoreFactory, LawComparison, LedgerAction, NewEmployee, PaymentFlow, PaymentGateway,
    PaymentLedger, PaymentMethod, PaymentPlan, PayrollRemittance, PayrollRemittanceRequest,
    PayrollRoster, ProfileAction, ProfileState, ProgressiveTaxError, Receipt, RosterAction,
    RosterError, SnapshotStore, StoreError, StoreRegistry, SubscriptionReceipt,
    SubscriptionRequest, SubscriptionTier, TaxPaymentRequest, TaxReceipt, UserProfile,
    register_employee,
};
use narrate_db_sqlite::SqliteStoreFactory;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Every backend the binary can open.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(InMemoryStoreFactory));
    registry.register(Box::new(SqliteStoreFactory));
    registry
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Locked(#[from] GateError),

    #[error(transparent)]
    Tax(#[from] ProgressiveTaxError),

    #[error(transparent)]
    Employee(#[from] RosterError),

    #[error("payroll is only available to business accounts")]
    NotBusiness,

    #[error("no employee with id '{0}'")]
    UnknownEmployee(String),

    #[error("no tax payment for 2026 has been recorded")]
    TaxNotPaid,
}

/// Issued once the 2026 liability has been paid on a Secure+ plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearanceCertificate {
    pub taxpayer_name: String,
    pub tin: String,
    pub tax_year: i32,
    pub nrs_receipt_no: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_paid: Decimal,
    pub issued: DateTime<Utc>,
}

pub struct Session {
    profile: ProfileState,
    ledger: PaymentLedger,
    roster: PayrollRoster,
    store: Box<dyn SnapshotStore>,
    flow: PaymentFlow,
    comparison: LawComparison,
    calculator: EmployeeTaxCalculator,
}

impl Session {
    /// Loads the persisted ledger and roster.
    ///
    /// The profile is not stored. The tier is the higher of the one given
    /// and the newest subscription on record, and a recorded 2026 tax
    /// payment is reflected in the compliance score.
    pub async fn open(
        profile: UserProfile,
        store: Box<dyn SnapshotStore>,
        gateway: Box<dyn PaymentGateway>,
    ) -> Result<Self, SessionError> {
        let ledger = PaymentLedger::from(load_payment_snapshot(store.as_ref()).await?);
        let roster = PayrollRoster::new(load_roster(store.as_ref()).await?);

        let tier = profile.tier.max(newest_subscription(&ledger).unwrap_or_default());
        let mut state = ProfileState::new(UserProfile {
            tier: SubscriptionTier::Lite,
            ..profile
        })
        .reduce(ProfileAction::UpdateTier(tier));
        if ledger.tax_paid_for_2026() {
            state = state.reduce(ProfileAction::TaxPaid);
        }

        debug!(
            history = ledger.history().len(),
            employees = roster.employees().len(),
            tier = %tier,
            "session opened"
        );

        Ok(Self {
            profile: state,
            ledger,
            roster,
            store,
            flow: PaymentFlow::new(gateway),
            comparison: LawComparison::personal(),
            calculator: EmployeeTaxCalculator::default(),
        })
    }

    pub fn profile(&self) -> &ProfileState {
        &self.profile
    }

    pub fn ledger(&self) -> &PaymentLedger {
        &self.ledger
    }

    pub fn roster(&self) -> &PayrollRoster {
        &self.roster
    }

    pub fn flow(&self) -> &PaymentFlow {
        &self.flow
    }

    pub fn compare(
        &self,
        income: Decimal,
    ) -> Result<ComparisonResult, SessionError> {
        Ok(self.comparison.compare(income)?)
    }

    /// The feature catalogue with each entry's lock state for this tier.
    pub fn features(&self) -> Vec<(&'static Feature, bool)> {
        let gate = self.gate();
        narrate_core::FEATURES
            .iter()
            .map(|feature| (feature, gate.is_locked(feature)))
            .collect()
    }

    pub async fn subscribe(
        &mut self,
        target: SubscriptionTier,
        method: PaymentMethod,
    ) -> Result<SubscriptionReceipt, SessionError> {
        let request = SubscriptionRequest {
            target,
            account_type: self.profile.profile.account_type,
            method,
        };
        let receipt = self.flow.pay_subscription(&request).await?;

        self.dispatch_profile(ProfileAction::UpdateTier(receipt.mode));
        self.dispatch_ledger(LedgerAction::SubscriptionPaid(receipt.clone()))
            .await?;
        Ok(receipt)
    }

    /// Pays the 2026 liability on `income` under `plan`.
    pub async fn pay_tax(
        &mut self,
        income: Decimal,
        plan: PaymentPlan,
        method: PaymentMethod,
        consent: bool,
    ) -> Result<TaxReceipt, SessionError> {
        let breakdown = self.compare(income)?.breakdown();
        let request =
            TaxPaymentRequest::for_profile(&self.profile.profile, breakdown, plan, method, consent);
        let receipt = self.flow.pay_tax(&request).await?;

        self.dispatch_profile(ProfileAction::TaxPaid);
        self.dispatch_ledger(LedgerAction::TaxPaid(receipt.clone()))
            .await?;
        Ok(receipt)
    }

    pub async fn add_employee(
        &mut self,
        details: NewEmployee,
    ) -> Result<Employee, SessionError> {
        self.require_payroll()?;
        let employee = register_employee(details, &self.calculator, Utc::now())?;
        self.dispatch_roster(RosterAction::Add(employee.clone()))
            .await?;
        Ok(employee)
    }

    pub async fn set_selected(
        &mut self,
        id: &str,
        selected: bool,
    ) -> Result<(), SessionError> {
        self.require_payroll()?;
        self.require_employee(id)?;
        self.dispatch_roster(RosterAction::SetSelected {
            id: id.to_string(),
            selected,
        })
        .await
    }

    pub async fn toggle_select_all(&mut self) -> Result<(), SessionError> {
        self.require_payroll()?;
        self.dispatch_roster(RosterAction::ToggleSelectAll).await
    }

    pub async fn remove_employee(
        &mut self,
        id: &str,
    ) -> Result<(), SessionError> {
        self.require_payroll()?;
        self.require_employee(id)?;
        self.dispatch_roster(RosterAction::Remove(id.to_string()))
            .await
    }

    /// Remits PAYE for the selected employees, then clears the selection.
    pub async fn remit_payroll(
        &mut self,
        method: PaymentMethod,
        consent: bool,
    ) -> Result<PayrollRemittance, SessionError> {
        self.require_payroll()?;
        let request = PayrollRemittanceRequest::from_roster(&self.roster, method, consent);
        let remittance = self.flow.remit_payroll(&request).await?;

        self.dispatch_roster(RosterAction::DeselectAll).await?;
        Ok(remittance)
    }

    /// Builds the certificate from the newest tax receipt on record.
    pub fn clearance(&self) -> Result<ClearanceCertificate, SessionError> {
        self.gate().check(&TAX_CLEARANCE_CERTIFICATE)?;
        if !self.ledger.tax_paid_for_2026() {
            return Err(SessionError::TaxNotPaid);
        }

        let receipt = self
            .ledger
            .history()
            .iter()
            .find_map(|item| match &item.receipt {
                Receipt::Tax(receipt) => Some(receipt),
                Receipt::Subscription(_) => None,
            })
            .ok_or(SessionError::TaxNotPaid)?;

        Ok(ClearanceCertificate {
            taxpayer_name: receipt.taxpayer_name.clone(),
            tin: receipt.tin.clone(),
            tax_year: receipt.tax_year,
            nrs_receipt_no: receipt.nrs_receipt_no.clone(),
            amount_paid: receipt.amount,
            issued: Utc::now(),
        })
    }

    /// Drops the stored ledger and roster.
    pub async fn reset(&mut self) -> Result<(), SessionError> {
        for key in [PAYMENT_STATE_KEY, EMPLOYEES_KEY] {
            match self.store.remove(key).await {
                Ok(()) | Err(StoreError::NotFound) => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.ledger = PaymentLedger::default();
        self.roster = PayrollRoster::default();
        self.flow.reset();
        info!("stored state cleared");
        Ok(())
    }

    fn gate(&self) -> FeatureGate {
        FeatureGate::new(self.profile.profile.tier)
    }

    fn require_payroll(&self) -> Result<(), SessionError> {
        if !self.profile.profile.account_type.is_business() {
            return Err(SessionError::NotBusiness);
        }
        self.gate().check(&EMPLOYEE_PAYROLL)?;
        Ok(())
    }

    fn require_employee(
        &self,
        id: &str,
    ) -> Result<(), SessionError> {
        match self.roster.find(id) {
            Some(_) => Ok(()),
            None => Err(SessionError::UnknownEmployee(id.to_string())),
        }
    }

    fn dispatch_profile(
        &mut self,
        action: ProfileAction,
    ) {
        self.profile = std::mem::take(&mut self.profile).reduce(action);
    }

    async fn dispatch_ledger(
        &mut self,
        action: LedgerAction,
    ) -> Result<(), SessionError> {
        self.ledger = std::mem::take(&mut self.ledger).reduce(action);
        save_payment_snapshot(self.store.as_ref(), &self.ledger.snapshot()).await?;
        Ok(())
    }

    async fn dispatch_roster(
        &mut self,
        action: RosterAction,
    ) -> Result<(), SessionError> {
        self.roster = std::mem::take(&mut self.roster).reduce(action);
        save_roster(self.store.as_ref(), self.roster.employees()).await?;
        Ok(())
    }
}

fn newest_subscription(ledger: &PaymentLedger) -> Option<SubscriptionTier> {
    ledger
        .history()
        .iter()
        .find_map(|item| match &item.receipt {
            Receipt::Subscription(receipt) => Some(receipt.mode),
            Receipt::Tax(_) => None,
        })
}
