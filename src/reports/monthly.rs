use serde::Serialize;
use tracing::debug;

use crate::database::models::AttendanceFilter;
use crate::database::store::AttendanceStore;
use crate::error::Result;
use crate::reports::{Reports, StatusTally};
use crate::utils::time::{self, Clock};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub month: u32,
    pub year: i32,
    pub present: u32,
    pub absent: u32,
    pub late: u32,
    pub half_day: u32,
    pub total_hours: f64,
    pub working_days: u32,
}

impl<S: AttendanceStore, C: Clock> Reports<S, C> {
    /// Attendance totals for one employee and month. Absence is inferred from
    /// the working days elapsed so far in that month.
    pub async fn summarize_employee_month(
        &self,
        employee_id: i64,
        month: u32,
        year: i32,
    ) -> Result<MonthlySummary> {
        self.employee(employee_id).await?;
        let (first, last) = time::month_bounds(year, month)?;

        let entries = self
            .store
            .query_attendance_days(&AttendanceFilter::between(first, last).for_employee(employee_id))
            .await?;
        let tally = StatusTally::from_days(entries.iter().map(|entry| &entry.day));

        let elapsed_end = last.min(self.clock.today());
        let working_days = time::count_working_days(first, elapsed_end);

        debug!(
            employee_id,
            month,
            year,
            records = entries.len(),
            working_days,
            "Summarized employee month"
        );

        Ok(MonthlySummary {
            month,
            year,
            present: tally.present,
            absent: working_days.saturating_sub(tally.attended()),
            late: tally.late,
            half_day: tally.half_day,
            total_hours: tally.hours(),
            working_days,
        })
    }
}
