use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

use crate::calculations::{EmployeeTaxCalculator, ProgressiveTaxError};
use crate::models::ids::employee_id;
use crate::models::{Employee, EmployeeStatus, NewEmployee};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("employee {0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    Tax(#[from] ProgressiveTaxError),
}

/// Builds a roster entry, computing PAYE once from the monthly gross.
///
/// # Errors
///
/// [`RosterError::MissingField`] when any detail is blank.
pub fn register_employee(
    details: NewEmployee,
    calculator: &EmployeeTaxCalculator,
    now: DateTime<Utc>,
) -> Result<Employee, RosterError> {
    if let Some(field) = details.missing_field() {
        return Err(RosterError::MissingField(field));
    }

    let tax = calculator.calculate(details.monthly_gross)?;

    Ok(Employee {
        id: employee_id(now),
        name: details.name.trim().to_string(),
        email: details.email.trim().to_string(),
        tin: details.tin.trim().to_string(),
        monthly_gross: details.monthly_gross,
        monthly_tax: tax.monthly_tax,
        annual_tax: tax.annual_tax,
        selected: false,
        status: EmployeeStatus::Active,
        date_added: now,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterAction {
    Add(Employee),
    SetSelected { id: String, selected: bool },
    Remove(String),
    ToggleSelectAll,
    DeselectAll,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PayrollRoster {
    employees: Vec<Employee>,
}

impl PayrollRoster {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self { employees }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn find(
        &self,
        id: &str,
    ) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn selected(&self) -> impl Iterator<Item = &Employee> {
        self.employees.iter().filter(|e| e.selected)
    }

    pub fn all_selected(&self) -> bool {
        !self.employees.is_empty() && self.employees.iter().all(|e| e.selected)
    }

    pub fn total_monthly_tax(&self) -> Decimal {
        self.employees.iter().map(|e| e.monthly_tax).sum()
    }

    pub fn selected_monthly_tax(&self) -> Decimal {
        self.selected().map(|e| e.monthly_tax).sum()
    }

    pub fn reduce(
        mut self,
        action: RosterAction,
    ) -> Self {
        match action {
            RosterAction::Add(employee) => {
                info!(id = %employee.id, monthly_tax = %employee.monthly_tax, "employee added");
                self.employees.push(employee);
            }
            RosterAction::SetSelected { id, selected } => {
                if let Some(employee) = self.employees.iter_mut().find(|e| e.id == id) {
                    employee.selected = selected;
                }
            }
            RosterAction::Remove(id) => {
                let before = self.employees.len();
                self.employees.retain(|e| e.id != id);
                if self.employees.len() < before {
                    info!(%id, "employee removed");
                }
            }
            RosterAction::ToggleSelectAll => {
                let select = !self.all_selected();
                for employee in &mut self.employees {
                    employee.selected = select;
                }
            }
            RosterAction::DeselectAll => {
                for employee in &mut self.employees {
                    employee.selected = false;
                }
            }
        }
        self
    }
}
