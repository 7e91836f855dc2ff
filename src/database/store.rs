use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::database::models::{
    AttendanceDay, AttendanceEntry, AttendanceFilter, AttendanceStatus, Employee, EmployeeFilter,
    EmployeeUpdate, NewEmployee,
};
use crate::error::Result;

/// Persistence contract the attendance engine runs against.
///
/// Check-in and check-out are conditional writes: the store applies them only
/// when the day is in the expected state and reports `None` otherwise, so the
/// caller never has to find-then-write.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn find_attendance_day(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceDay>>;

    /// Creates the day, or fills in a day that has no check-in yet.
    /// Returns `None` when the day already carries a check-in.
    async fn upsert_check_in(
        &self,
        employee_id: i64,
        date: NaiveDate,
        check_in: DateTime<Utc>,
        status: AttendanceStatus,
    ) -> Result<Option<AttendanceDay>>;

    /// Sets check-out on a checked-in, not yet checked-out day.
    /// Returns `None` when no such day exists.
    async fn complete_check_out(
        &self,
        employee_id: i64,
        date: NaiveDate,
        check_out: DateTime<Utc>,
        total_hours: f64,
        status: AttendanceStatus,
    ) -> Result<Option<AttendanceDay>>;

    async fn query_attendance_days(&self, filter: &AttendanceFilter)
    -> Result<Vec<AttendanceEntry>>;

    async fn find_employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>>;

    async fn get_employee(&self, employee_id: i64) -> Result<Option<Employee>>;

    async fn create_employee(&self, employee: &NewEmployee) -> Result<Employee>;

    async fn update_employee(
        &self,
        employee_id: i64,
        update: &EmployeeUpdate,
    ) -> Result<Option<Employee>>;
}
