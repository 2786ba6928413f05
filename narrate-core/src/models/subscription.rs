use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::profile::AccountType;

/// Subscription level gating feature access.
///
/// Variant order is the tier order, so the derived `Ord` matches [`rank`].
///
/// [`rank`]: SubscriptionTier::rank
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubscriptionTier {
    #[default]
    Lite,
    Secure,
    SecurePlus,
}

impl SubscriptionTier {
    pub fn rank(&self) -> u8 {
        match self {
            Self::Lite => 0,
            Self::Secure => 1,
            Self::SecurePlus => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lite => "lite",
            Self::Secure => "secure",
            Self::SecurePlus => "secure-plus",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lite" => Some(Self::Lite),
            "secure" => Some(Self::Secure),
            "secure-plus" => Some(Self::SecurePlus),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Lite => "Lite",
            Self::Secure => "Secure",
            Self::SecurePlus => "Secure+",
        }
    }

    pub fn is_paid(&self) -> bool {
        *self != Self::Lite
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Annual subscription price in naira, or `None` for the free tier.
///
/// Every non-individual account type is billed at the business rate.
pub fn subscription_price(
    account_type: AccountType,
    tier: SubscriptionTier,
) -> Option<Decimal> {
    let amount: u32 = match (account_type.is_business(), tier) {
        (_, SubscriptionTier::Lite) => return None,
        (false, SubscriptionTier::Secure) => 5_000,
        (false, SubscriptionTier::SecurePlus) => 15_000,
        (true, SubscriptionTier::Secure) => 50_000,
        (true, SubscriptionTier::SecurePlus) => 250_000,
    };
    Some(Decimal::from(amount))
}
