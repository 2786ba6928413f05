use serde::{Deserialize, Serialize};

use super::subscription::SubscriptionTier;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountType {
    #[default]
    Individual,
    SmallBusiness,
    MidSize,
    Corporate,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::SmallBusiness => "small-business",
            Self::MidSize => "mid-size",
            Self::Corporate => "corporate",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "individual" => Some(Self::Individual),
            "small-business" => Some(Self::SmallBusiness),
            "mid-size" => Some(Self::MidSize),
            "corporate" => Some(Self::Corporate),
            _ => None,
        }
    }

    pub fn is_business(&self) -> bool {
        *self != Self::Individual
    }

    /// The tax mode an account type implies when it is selected.
    pub fn default_tax_mode(&self) -> TaxMode {
        if self.is_business() {
            TaxMode::Business
        } else {
            TaxMode::Personal
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaxMode {
    #[default]
    Personal,
    Business,
}

impl TaxMode {
    /// PAYE for individuals, CIT for companies.
    pub fn tax_type(&self) -> TaxType {
        match self {
            Self::Personal => TaxType::Paye,
            Self::Business => TaxType::Cit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxType {
    #[serde(rename = "PAYE")]
    Paye,
    #[serde(rename = "CIT")]
    Cit,
}

impl TaxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paye => "PAYE",
            Self::Cit => "CIT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub account_type: AccountType,
    #[serde(rename = "mode")]
    pub tier: SubscriptionTier,
    pub tax_mode: TaxMode,
    pub is_verified: bool,
    pub has_completed_onboarding: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayeStatus {
    Ready,
    AtRisk,
    #[default]
    Pending,
}

/// Demo compliance readiness shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceStatus {
    pub nrs_tax_id: bool,
    pub e_invoicing: bool,
    pub paye_status: PayeStatus,
    pub overall_score: u8,
}

impl Default for ComplianceStatus {
    fn default() -> Self {
        Self {
            nrs_tax_id: false,
            e_invoicing: false,
            paye_status: PayeStatus::Pending,
            overall_score: 35,
        }
    }
}
