use tracing::info;

use crate::database::models::{Employee, EmployeeFilter, EmployeeUpdate, NewEmployee};
use crate::database::store::AttendanceStore;
use crate::error::{AttendanceError, Result};

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AttendanceError::invalid(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    require("email", email)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AttendanceError::invalid(format!("invalid email: {}", email))),
    }
}

pub async fn register_employee<S: AttendanceStore + ?Sized>(
    store: &S,
    employee: NewEmployee,
) -> Result<Employee> {
    require("name", &employee.name)?;
    require("employee code", &employee.employee_code)?;
    require("department", &employee.department)?;
    validate_email(&employee.email)?;

    let created = store.create_employee(&employee).await?;
    info!(
        employee_id = created.id,
        code = %created.employee_code,
        department = %created.department,
        "Registered employee"
    );
    Ok(created)
}

pub async fn update_employee_profile<S: AttendanceStore + ?Sized>(
    store: &S,
    employee_id: i64,
    update: EmployeeUpdate,
) -> Result<Employee> {
    if let Some(name) = &update.name {
        require("name", name)?;
    }
    if let Some(email) = &update.email {
        validate_email(email)?;
    }
    if let Some(department) = &update.department {
        require("department", department)?;
    }

    store
        .update_employee(employee_id, &update)
        .await?
        .ok_or_else(|| AttendanceError::not_found(format!("employee {}", employee_id)))
}

/// Employees with role `employee`, ordered by code.
pub async fn list_roster<S: AttendanceStore + ?Sized>(store: &S) -> Result<Vec<Employee>> {
    store.find_employees(&EmployeeFilter::roster()).await
}

pub async fn find_employee_by_code<S: AttendanceStore + ?Sized>(
    store: &S,
    code: &str,
) -> Result<Employee> {
    store
        .find_employees(&EmployeeFilter::by_code(code))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AttendanceError::not_found(format!("employee code {}", code)))
}
