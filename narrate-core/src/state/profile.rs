use serde::{Deserialize, Serialize};
use tracing::info;

use crate::gate::is_feature_locked;
use crate::models::{
    AccountType, ComplianceStatus, PayeStatus, SubscriptionTier, TaxMode, UserProfile,
};

/// Score shown once a tier upgrade marks the TIN as linked.
const SECURE_SCORE: u8 = 75;
const SECURE_PLUS_SCORE: u8 = 95;
const TAX_PAID_SCORE: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileAction {
    /// Direct assignment of the subscription tier. Paid tiers also mark the
    /// compliance fields as satisfied; this is demo behaviour, not a real
    /// verification result.
    UpdateTier(SubscriptionTier),
    UpdateAccountType(AccountType),
    UpdateTaxMode(TaxMode),
    CompleteOnboarding,
    /// The 2026 liability has been settled.
    TaxPaid,
}

/// User profile plus the compliance snapshot derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileState {
    pub profile: UserProfile,
    pub compliance: ComplianceStatus,
}

impl ProfileState {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            profile,
            compliance: ComplianceStatus::default(),
        }
    }

    pub fn reduce(
        mut self,
        action: ProfileAction,
    ) -> Self {
        match action {
            ProfileAction::UpdateTier(tier) => {
                info!(from = %self.profile.tier, to = %tier, "subscription tier updated");
                self.profile.tier = tier;
                if tier.is_paid() {
                    self.compliance.nrs_tax_id = true;
                    self.compliance.paye_status = PayeStatus::Ready;
                    self.compliance.overall_score = if tier == SubscriptionTier::SecurePlus {
                        SECURE_PLUS_SCORE
                    } else {
                        SECURE_SCORE
                    };
                }
            }
            ProfileAction::UpdateAccountType(account_type) => {
                self.profile.account_type = account_type;
                self.profile.tax_mode = account_type.default_tax_mode();
            }
            ProfileAction::UpdateTaxMode(mode) => {
                self.profile.tax_mode = mode;
            }
            ProfileAction::CompleteOnboarding => {
                self.profile.has_completed_onboarding = true;
            }
            ProfileAction::TaxPaid => {
                self.compliance.overall_score = TAX_PAID_SCORE;
                self.compliance.paye_status = PayeStatus::Ready;
            }
        }
        self
    }

    pub fn is_feature_locked(
        &self,
        required: SubscriptionTier,
    ) -> bool {
        is_feature_locked(self.profile.tier, required)
    }
}
