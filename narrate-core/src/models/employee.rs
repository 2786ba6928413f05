use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

/// A registered employee on the payroll roster.
///
/// `monthly_tax` and `annual_tax` are computed once at registration and
/// stored with the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub tin: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_gross: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub annual_tax: Decimal,
    pub selected: bool,
    pub status: EmployeeStatus,
    pub date_added: DateTime<Utc>,
}

/// Details collected when registering an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub tin: String,
    pub monthly_gross: Decimal,
}

impl NewEmployee {
    /// Names the first empty field, if any. Every field is required.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.email.trim().is_empty() {
            Some("email")
        } else if self.tin.trim().is_empty() {
            Some("tin")
        } else if self.monthly_gross <= Decimal::ZERO {
            Some("monthly_gross")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn new_employee() -> NewEmployee {
        NewEmployee {
            name: "Ada Obi".to_string(),
            email: "ada@example.com".to_string(),
            tin: "12345678-0001".to_string(),
            monthly_gross: dec!(250000),
        }
    }

    #[test]
    fn complete_details_have_no_missing_field() {
        assert_eq!(new_employee().missing_field(), None);
    }

    #[test]
    fn reports_first_missing_field() {
        let mut details = new_employee();
        details.email = "  ".to_string();
        details.tin = String::new();

        assert_eq!(details.missing_field(), Some("email"));
    }

    #[test]
    fn zero_gross_counts_as_missing() {
        let mut details = new_employee();
        details.monthly_gross = dec!(0);

        assert_eq!(details.missing_field(), Some("monthly_gross"));
    }

    #[test]
    fn employee_json_is_camel_case() {
        let employee = Employee {
            id: "EMP-LQ2X9K".to_string(),
            name: "Ada Obi".to_string(),
            email: "ada@example.com".to_string(),
            tin: "12345678-0001".to_string(),
            monthly_gross: dec!(250000),
            monthly_tax: dec!(31420),
            annual_tax: dec!(377040),
            selected: false,
            status: EmployeeStatus::Active,
            date_added: Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap(),
        };

        let json = serde_json::to_value(&employee).unwrap();

        assert_eq!(json["monthlyGross"], serde_json::json!(250000.0));
        assert_eq!(json["status"], serde_json::json!("active"));
        assert!(json.get("dateAdded").is_some());
    }
}
