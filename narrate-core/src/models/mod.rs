mod employee;
pub mod ids;
mod payment;
mod profile;
pub mod schedules;
mod subscription;
mod tax_band;

pub use employee::{Employee, EmployeeStatus, NewEmployee};
pub use payment::{
    PaymentHistoryItem, PaymentKind, PaymentMethod, PaymentPlan, PaymentSnapshot, PaymentStatus,
    Receipt, SubscriptionReceipt, TaxBreakdown, TaxReceipt, UserType,
};
pub use profile::{AccountType, ComplianceStatus, PayeStatus, TaxMode, TaxType, UserProfile};
pub use subscription::{SubscriptionTier, subscription_price};
pub use tax_band::{BandTable, BandTableError, LawYear, TaxBand, TaxpayerCategory};
