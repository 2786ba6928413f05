//! Application state as plain structs with pure reducers.
//!
//! Each store consumes itself and an action and returns the next state, so
//! front ends decide when to persist.

mod ledger;
mod profile;
mod roster;

pub use ledger::{LedgerAction, PaymentLedger};
pub use profile::{ProfileAction, ProfileState};
pub use roster::{PayrollRoster, RosterAction, RosterError, register_employee};
