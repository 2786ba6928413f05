//! Subscription-tier feature gating.

use serde::Serialize;
use thiserror::Error;

use crate::models::SubscriptionTier;

/// `true` when `current` ranks below `required`.
pub fn is_feature_locked(
    current: SubscriptionTier,
    required: SubscriptionTier,
) -> bool {
    current.rank() < required.rank()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub required_tier: SubscriptionTier,
}

pub const RENT_RELIEF_CALCULATOR: Feature = Feature {
    id: "rent-relief-calculator",
    name: "Rent Relief Calculator",
    description: "Calculate your housing allowance deduction",
    required_tier: SubscriptionTier::Secure,
};

pub const MULTI_YEAR_HISTORY: Feature = Feature {
    id: "multi-year-history",
    name: "Multi-Year History",
    description: "Track your PAYE across years",
    required_tier: SubscriptionTier::SecurePlus,
};

pub const E_INVOICE_GENERATOR: Feature = Feature {
    id: "e-invoice-generator",
    name: "E-Invoice Generator",
    description: "Generate compliant e-invoices with QR codes",
    required_tier: SubscriptionTier::Secure,
};

pub const AUDIT_READY_REPORTS: Feature = Feature {
    id: "audit-ready-reports",
    name: "Audit-Ready Reports",
    description: "Downloadable compliance reports",
    required_tier: SubscriptionTier::SecurePlus,
};

pub const EMPLOYEE_PAYROLL: Feature = Feature {
    id: "employee-payroll",
    name: "Employee Payroll",
    description: "Register employees and remit PAYE in bulk or individually",
    required_tier: SubscriptionTier::Secure,
};

pub const TAX_CLEARANCE_CERTIFICATE: Feature = Feature {
    id: "tax-clearance-certificate",
    name: "Tax Clearance Certificate",
    description: "Generate official tax clearance for 2026",
    required_tier: SubscriptionTier::SecurePlus,
};

pub const FEATURES: &[Feature] = &[
    RENT_RELIEF_CALCULATOR,
    MULTI_YEAR_HISTORY,
    E_INVOICE_GENERATOR,
    AUDIT_READY_REPORTS,
    EMPLOYEE_PAYROLL,
    TAX_CLEARANCE_CERTIFICATE,
];

pub fn find_feature(id: &str) -> Option<&'static Feature> {
    FEATURES.iter().find(|f| f.id == id)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("{feature} requires the {} tier", .required.label())]
    Locked {
        feature: &'static str,
        required: SubscriptionTier,
    },
}

/// Feature checks for one subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureGate {
    tier: SubscriptionTier,
}

impl FeatureGate {
    pub fn new(tier: SubscriptionTier) -> Self {
        Self { tier }
    }

    pub fn tier(&self) -> SubscriptionTier {
        self.tier
    }

    pub fn is_locked(
        &self,
        feature: &Feature,
    ) -> bool {
        is_feature_locked(self.tier, feature.required_tier)
    }

    /// # Errors
    ///
    /// [`GateError::Locked`] when the tier is below the feature's requirement.
    pub fn check(
        &self,
        feature: &Feature,
    ) -> Result<(), GateError> {
        if self.is_locked(feature) {
            Err(GateError::Locked {
                feature: feature.name,
                required: feature.required_tier,
            })
        } else {
            Ok(())
        }
    }

    pub fn unlocked(&self) -> impl Iterator<Item = &'static Feature> + '_ {
        FEATURES.iter().filter(move |f| !self.is_locked(f))
    }
}
