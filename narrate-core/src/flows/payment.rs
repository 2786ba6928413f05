use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{info, warn};

use super::gateway::{GatewayError, PaymentGateway, StageReporter};
use super::requests::{
    PayrollRemittance, PayrollRemittanceRequest, SubscriptionRequest, TaxPaymentRequest,
};
use super::{FlowError, FlowState};
use crate::calculations::available_plans;
use crate::models::{SubscriptionReceipt, TaxReceipt, subscription_price};

const STARTING: &str = "Starting...";

/// Drives one payment at a time through a gateway.
pub struct PaymentFlow {
    gateway: Box<dyn PaymentGateway>,
    state: watch::Sender<FlowState>,
}

impl PaymentFlow {
    pub fn new(gateway: Box<dyn PaymentGateway>) -> Self {
        let (state, _) = watch::channel(FlowState::Idle);
        Self { gateway, state }
    }

    pub fn state(&self) -> FlowState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FlowState> {
        self.state.subscribe()
    }

    /// Returns to [`FlowState::Idle`]. Ignored while processing.
    pub fn reset(&self) {
        self.state.send_if_modified(|state| {
            if state.is_processing() || *state == FlowState::Idle {
                false
            } else {
                *state = FlowState::Idle;
                true
            }
        });
    }

    /// # Errors
    ///
    /// [`FlowError::NotPurchasable`] for the Lite tier, and the usual
    /// processing and gateway failures.
    pub async fn pay_subscription(
        &self,
        request: &SubscriptionRequest,
    ) -> Result<SubscriptionReceipt, FlowError> {
        let amount = subscription_price(request.account_type, request.target)
            .ok_or(FlowError::NotPurchasable(request.target))?;

        self.begin()?;
        let reporter = StageReporter::new(&self.state);
        let outcome = self
            .gateway
            .charge_subscription(amount, request.method, &reporter)
            .await;
        self.finish(outcome)?;

        let receipt = request.receipt(amount, Utc::now(), &mut rand::thread_rng());
        info!(reference = %receipt.transaction_ref, tier = %request.target, %amount, "subscription paid");
        Ok(receipt)
    }

    /// # Errors
    ///
    /// Consent is required, the plan must be offered for the tax mode and
    /// the amount due must be positive.
    pub async fn pay_tax(
        &self,
        request: &TaxPaymentRequest,
    ) -> Result<TaxReceipt, FlowError> {
        if !request.consent {
            return Err(FlowError::ConsentRequired);
        }
        if !available_plans(request.tax_mode).contains(&request.plan) {
            return Err(FlowError::PlanUnavailable(request.plan));
        }
        let amount = request.amount_due();
        if amount <= Decimal::ZERO {
            return Err(FlowError::NonPositiveAmount(amount));
        }

        self.begin()?;
        let reporter = StageReporter::new(&self.state);
        let outcome = self
            .gateway
            .remit_tax(amount, request.method, &reporter)
            .await;
        self.finish(outcome)?;

        let receipt = request.receipt(Utc::now(), &mut rand::thread_rng());
        info!(receipt = %receipt.nrs_receipt_no, tax_type = receipt.tax_type.as_str(), %amount, "tax paid");
        Ok(receipt)
    }

    /// # Errors
    ///
    /// At least one employee must be selected and consent given.
    pub async fn remit_payroll(
        &self,
        request: &PayrollRemittanceRequest,
    ) -> Result<PayrollRemittance, FlowError> {
        if request.employees.is_empty() {
            return Err(FlowError::NoEmployeesSelected);
        }
        if !request.consent {
            return Err(FlowError::ConsentRequired);
        }
        let amount = request.total();

        self.begin()?;
        let reporter = StageReporter::new(&self.state);
        let outcome = self
            .gateway
            .remit_payroll(amount, request.employees.len(), request.method, &reporter)
            .await;
        self.finish(outcome)?;

        let remittance = PayrollRemittance::new(request, Utc::now(), &mut rand::thread_rng());
        info!(
            reference = %remittance.reference,
            employees = remittance.employee_ids.len(),
            %amount,
            "payroll remitted"
        );
        Ok(remittance)
    }

    fn begin(&self) -> Result<(), FlowError> {
        let started = self.state.send_if_modified(|state| {
            if state.is_processing() {
                false
            } else {
                *state = FlowState::Processing {
                    step: 0,
                    stage: STARTING,
                };
                true
            }
        });
        if started {
            Ok(())
        } else {
            Err(FlowError::AlreadyProcessing)
        }
    }

    fn finish(
        &self,
        outcome: Result<(), GatewayError>,
    ) -> Result<(), FlowError> {
        match outcome {
            Ok(()) => {
                self.state.send_replace(FlowState::Succeeded);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "payment failed");
                self.state.send_replace(FlowState::Failed {
                    reason: err.to_string(),
                });
                Err(err.into())
            }
        }
    }
}
