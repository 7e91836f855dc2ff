#![allow(dead_code)]

use chrono::DateTime;

use kintai::attendance::roster::register_employee;
use kintai::attendance::{AttendancePolicy, AttendanceService};
use kintai::database::models::{AttendanceDay, Employee, NewEmployee, Role};
use kintai::database::{self, SqliteStore};
use kintai::reports::Reports;
use kintai::utils::time::FixedClock;

pub async fn setup() -> SqliteStore {
    let pool = database::create_connection("sqlite::memory:")
        .await
        .expect("in-memory database");
    SqliteStore::new(pool)
}

pub fn clock(rfc3339: &str) -> FixedClock {
    FixedClock(DateTime::parse_from_rfc3339(rfc3339).expect("valid timestamp"))
}

pub fn attendance_at(store: &SqliteStore, rfc3339: &str) -> AttendanceService<SqliteStore, FixedClock> {
    AttendanceService::new(store.clone(), clock(rfc3339), AttendancePolicy::default())
}

pub fn reports_at(store: &SqliteStore, rfc3339: &str) -> Reports<SqliteStore, FixedClock> {
    Reports::new(store.clone(), clock(rfc3339))
}

pub async fn add_employee(store: &SqliteStore, code: &str, name: &str, department: &str) -> Employee {
    add_with_role(store, code, name, department, Role::Employee).await
}

pub async fn add_with_role(
    store: &SqliteStore,
    code: &str,
    name: &str,
    department: &str,
    role: Role,
) -> Employee {
    register_employee(
        store,
        NewEmployee {
            name: name.to_string(),
            email: format!("{}@company.com", code.to_lowercase()),
            employee_code: code.to_string(),
            department: department.to_string(),
            role,
        },
    )
    .await
    .expect("register employee")
}

/// Checks in at `check_in` and, when given, checks out at `check_out`.
pub async fn work_day(
    store: &SqliteStore,
    employee_id: i64,
    check_in: &str,
    check_out: Option<&str>,
) -> AttendanceDay {
    let day = attendance_at(store, check_in)
        .record_check_in(employee_id)
        .await
        .expect("check in");

    match check_out {
        Some(check_out) => attendance_at(store, check_out)
            .record_check_out(employee_id)
            .await
            .expect("check out"),
        None => day,
    }
}
