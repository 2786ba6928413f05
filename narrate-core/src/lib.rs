pub mod calculations;
pub mod flows;
pub mod gate;
pub mod models;
pub mod state;
pub mod store;

pub use calculations::{
    ComparisonResult, EmployeeTax, EmployeeTaxCalculator, LawComparison, ProgressiveTaxCalculator,
    ProgressiveTaxError, TaxComputation,
};
pub use flows::{
    FlowError, FlowState, GatewayError, PaymentFlow, PaymentGateway, PayrollRemittance,
    PayrollRemittanceRequest, SimulatedGateway, SubscriptionRequest, TaxPaymentRequest,
};
pub use gate::{FEATURES, Feature, FeatureGate, GateError, find_feature, is_feature_locked};
pub use models::*;
pub use state::{
    LedgerAction, PaymentLedger, PayrollRoster, ProfileAction, ProfileState, RosterAction,
    RosterError, register_employee,
};
pub use store::{
    InMemoryStore, InMemoryStoreFactory, SnapshotStore, StoreConfig, StoreError, StoreFactory,
    StoreRegistry,
};
