use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

use super::FlowState;
use crate::models::PaymentMethod;

/// One labelled wait in a simulated exchange with the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub label: &'static str,
    pub millis: u64,
}

pub const SUBSCRIPTION_STAGES: &[Stage] = &[Stage {
    label: "Processing payment...",
    millis: 2000,
}];

pub const TAX_STAGES: &[Stage] = &[
    Stage {
        label: "Connecting to NRS Gateway...",
        millis: 1000,
    },
    Stage {
        label: "Verifying TIN with FIRS...",
        millis: 1000,
    },
    Stage {
        label: "Processing payment...",
        millis: 2000,
    },
];

pub const PAYROLL_STAGES: &[Stage] = &[
    Stage {
        label: "Connecting to NRS Gateway...",
        millis: 1000,
    },
    Stage {
        label: "Validating employee TINs...",
        millis: 1000,
    },
    Stage {
        label: "Processing PAYE remittance...",
        millis: 1500,
    },
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("payment declined: {0}")]
    Declined(String),

    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

/// Publishes the current stage of an in-flight payment.
pub struct StageReporter<'a> {
    tx: &'a watch::Sender<FlowState>,
}

impl<'a> StageReporter<'a> {
    pub fn new(tx: &'a watch::Sender<FlowState>) -> Self {
        Self { tx }
    }

    pub fn stage(
        &self,
        step: usize,
        label: &'static str,
    ) {
        self.tx.send_replace(FlowState::Processing { step, stage: label });
    }
}

/// The payment network behind the flows.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge_subscription(
        &self,
        amount: Decimal,
        method: PaymentMethod,
        progress: &StageReporter<'_>,
    ) -> Result<(), GatewayError>;

    async fn remit_tax(
        &self,
        amount: Decimal,
        method: PaymentMethod,
        progress: &StageReporter<'_>,
    ) -> Result<(), GatewayError>;

    async fn remit_payroll(
        &self,
        amount: Decimal,
        employee_count: usize,
        method: PaymentMethod,
        progress: &StageReporter<'_>,
    ) -> Result<(), GatewayError>;
}

/// Largest accepted stage multiplier.
pub const MAX_DELAY_SCALE: f64 = 10.0;

/// Always-successful gateway that waits through fixed stages.
///
/// `delay_scale` multiplies every stage duration; `0.0` skips the waits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedGateway {
    delay_scale: f64,
}

impl SimulatedGateway {
    /// Negative or non-finite scales are treated as zero; larger ones are
    /// capped at [`MAX_DELAY_SCALE`].
    pub fn new(delay_scale: f64) -> Self {
        let delay_scale = if delay_scale.is_finite() && delay_scale > 0.0 {
            delay_scale.min(MAX_DELAY_SCALE)
        } else {
            0.0
        };
        Self { delay_scale }
    }

    /// No waits at all.
    pub fn instant() -> Self {
        Self::new(0.0)
    }

    pub fn delay_scale(&self) -> f64 {
        self.delay_scale
    }

    fn scaled(
        &self,
        stage: &Stage,
    ) -> Duration {
        Duration::from_millis(stage.millis).mul_f64(self.delay_scale)
    }

    async fn walk(
        &self,
        stages: &[Stage],
        progress: &StageReporter<'_>,
    ) {
        for (step, stage) in stages.iter().enumerate() {
            progress.stage(step, stage.label);
            let wait = self.scaled(stage);
            debug!(step, stage = stage.label, ?wait, "gateway stage");
            tokio::time::sleep(wait).await;
        }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge_subscription(
        &self,
        _amount: Decimal,
        _method: PaymentMethod,
        progress: &StageReporter<'_>,
    ) -> Result<(), GatewayError> {
        self.walk(SUBSCRIPTION_STAGES, progress).await;
        Ok(())
    }

    async fn remit_tax(
        &self,
        _amount: Decimal,
        _method: PaymentMethod,
        progress: &StageReporter<'_>,
    ) -> Result<(), GatewayError> {
        self.walk(TAX_STAGES, progress).await;
        Ok(())
    }

    async fn remit_payroll(
        &self,
        _amount: Decimal,
        _employee_count: usize,
        _method: PaymentMethod,
        progress: &StageReporter<'_>,
    ) -> Result<(), GatewayError> {
        self.walk(PAYROLL_STAGES, progress).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn stage_totals_match_simulated_timings() {
        let total = |stages: &[Stage]| stages.iter().map(|s| s.millis).sum::<u64>();

        assert_eq!(total(SUBSCRIPTION_STAGES), 2000);
        assert_eq!(total(TAX_STAGES), 4000);
        assert_eq!(total(PAYROLL_STAGES), 3500);
    }

    #[test]
    fn invalid_scales_become_zero() {
        assert_eq!(SimulatedGateway::new(-1.0).delay_scale(), 0.0);
        assert_eq!(SimulatedGateway::new(f64::NAN).delay_scale(), 0.0);
        assert_eq!(SimulatedGateway::new(0.5).delay_scale(), 0.5);
    }

    #[test]
    fn huge_scale_is_capped() {
        let gateway = SimulatedGateway::new(1e20);

        assert_eq!(gateway.delay_scale(), MAX_DELAY_SCALE);
        assert_eq!(
            gateway.scaled(&SUBSCRIPTION_STAGES[0]),
            Duration::from_secs(20)
        );
    }

    #[test]
    fn scale_shortens_each_stage() {
        let gateway = SimulatedGateway::new(0.5);

        assert_eq!(
            gateway.scaled(&TAX_STAGES[2]),
            Duration::from_millis(1000)
        );
    }

    #[tokio::test]
    async fn walk_leaves_last_stage_published() {
        let (tx, rx) = watch::channel(FlowState::Idle);
        let reporter = StageReporter::new(&tx);

        SimulatedGateway::instant()
            .remit_payroll(dec!(40255), 2, PaymentMethod::Transfer, &reporter)
            .await
            .unwrap();

        assert_eq!(
            *rx.borrow(),
            FlowState::Processing {
                step: 2,
                stage: "Processing PAYE remittance...",
            }
        );
    }
}
