//! Tax computations.
//!
//! [`ProgressiveTaxCalculator`] is the single banding routine; the comparison
//! and payroll calculators compose it with the right table and pre-ladder
//! adjustments.

pub mod common;
pub mod comparison;
pub mod payroll;
pub mod plans;
pub mod progressive;

pub use comparison::{ComparisonResult, LawComparison};
pub use payroll::{EmployeeTax, EmployeeTaxCalculator};
pub use plans::{available_plans, installment_amount};
pub use progressive::{BandSlice, ProgressiveTaxCalculator, ProgressiveTaxError, TaxComputation};
