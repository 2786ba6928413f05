//! Simulated payment flows.
//!
//! A [`PaymentFlow`] validates a request, hands it to a [`PaymentGateway`]
//! and builds the receipt once the gateway reports success. Progress is
//! published on a `watch` channel so front ends can render each stage.

mod gateway;
mod payment;
mod requests;

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

pub use gateway::{
    GatewayError, PAYROLL_STAGES, PaymentGateway, SUBSCRIPTION_STAGES, SimulatedGateway, Stage,
    StageReporter, TAX_STAGES,
};
pub use payment::PaymentFlow;
pub use requests::{
    PayrollRemittance, PayrollRemittanceRequest, SubscriptionRequest, TaxPaymentRequest,
};

use crate::models::{PaymentPlan, SubscriptionTier};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    Idle,
    Processing {
        step: usize,
        stage: &'static str,
    },
    Succeeded,
    Failed {
        reason: String,
    },
}

impl FlowState {
    pub fn is_processing(&self) -> bool {
        matches!(self, Self::Processing { .. })
    }
}

impl fmt::Display for FlowState {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Processing { stage, .. } => write!(f, "{stage}"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("a payment is already being processed")]
    AlreadyProcessing,

    #[error("consent to remit is required")]
    ConsentRequired,

    #[error("payment amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("no employees selected for remittance")]
    NoEmployeesSelected,

    #[error("the {} tier cannot be purchased", .0.label())]
    NotPurchasable(SubscriptionTier),

    #[error("the {} plan is not available for this tax", .0.as_str())]
    PlanUnavailable(PaymentPlan),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
