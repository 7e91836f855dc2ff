use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AttendanceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Manager => "manager",
        }
    }
}

impl FromStr for Role {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(Role::Employee),
            "manager" => Ok(Role::Manager),
            _ => Err(AttendanceError::invalid(format!("unknown role: {}", s))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    #[serde(rename = "present")]
    Present,
    #[serde(rename = "late")]
    Late,
    #[serde(rename = "half-day")]
    HalfDay,
    #[serde(rename = "absent")]
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::HalfDay => "half-day",
            AttendanceStatus::Absent => "absent",
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(AttendanceStatus::Present),
            "late" => Ok(AttendanceStatus::Late),
            "half-day" => Ok(AttendanceStatus::HalfDay),
            "absent" => Ok(AttendanceStatus::Absent),
            _ => Err(AttendanceError::invalid(format!("unknown status: {}", s))),
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub employee_code: String,
    pub department: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub employee_code: String,
    pub department: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

impl EmployeeUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.department.is_none()
    }
}

/// One employee's attendance for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDay {
    pub id: i64,
    pub employee_id: i64,
    pub date: NaiveDate,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    pub total_hours: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity fields joined onto an attendance row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRef {
    pub name: String,
    #[serde(rename = "employeeId")]
    pub employee_code: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    #[serde(flatten)]
    pub day: AttendanceDay,
    pub employee: EmployeeRef,
}

#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub employee_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}

impl AttendanceFilter {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Default::default()
        }
    }

    pub fn on(date: NaiveDate) -> Self {
        Self::between(date, date)
    }

    pub fn for_employee(mut self, employee_id: i64) -> Self {
        self.employee_id = Some(employee_id);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub role: Option<Role>,
    pub employee_code: Option<String>,
}

impl EmployeeFilter {
    /// Employees whose attendance is aggregated; managers are excluded.
    pub fn roster() -> Self {
        Self {
            role: Some(Role::Employee),
            employee_code: None,
        }
    }

    pub fn by_code(code: &str) -> Self {
        Self {
            role: None,
            employee_code: Some(code.to_string()),
        }
    }
}
