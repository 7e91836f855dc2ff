//! Read-only rollups over classified attendance days.
//!
//! Absence is never stored: a working day without a record is counted as
//! absent when a summary needs an absence figure.

pub mod dashboard;
pub mod export;
pub mod monthly;
pub mod team;

pub use dashboard::{EmployeeDashboard, ManagerDashboard, WeeklyTrendDay};
pub use export::{AttendanceQuery, ExportRow};
pub use monthly::MonthlySummary;
pub use team::{DepartmentStats, EmployeeStats, TeamMonthSummary, TodayTeamStatus};

use crate::database::models::{AttendanceDay, AttendanceStatus, Employee};
use crate::database::store::AttendanceStore;
use crate::error::{AttendanceError, Result};
use crate::utils::time::{Clock, round_hours};

pub struct Reports<S, C> {
    store: S,
    clock: C,
}

impl<S: AttendanceStore, C: Clock> Reports<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    async fn employee(&self, employee_id: i64) -> Result<Employee> {
        self.store
            .get_employee(employee_id)
            .await?
            .ok_or_else(|| AttendanceError::not_found(format!("employee {}", employee_id)))
    }
}

/// Per-status counts over a set of days.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct StatusTally {
    pub present: u32,
    pub late: u32,
    pub half_day: u32,
    pub absent: u32,
    pub total_hours: f64,
}

impl StatusTally {
    pub fn add(&mut self, day: &AttendanceDay) {
        self.total_hours += day.total_hours;
        match day.status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::HalfDay => self.half_day += 1,
            AttendanceStatus::Absent => self.absent += 1,
        }
    }

    pub fn from_days<'a>(days: impl IntoIterator<Item = &'a AttendanceDay>) -> Self {
        let mut tally = Self::default();
        for day in days {
            tally.add(day);
        }
        tally
    }

    pub fn attended(&self) -> u32 {
        self.present + self.late + self.half_day
    }

    pub fn hours(&self) -> f64 {
        round_hours(self.total_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn day(status: AttendanceStatus, hours: f64) -> AttendanceDay {
        AttendanceDay {
            id: 1,
            employee_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            check_in_time: None,
            check_out_time: None,
            status,
            total_hours: hours,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn tally_counts_each_status_once() {
        let days = vec![
            day(AttendanceStatus::Present, 8.0),
            day(AttendanceStatus::Present, 7.5),
            day(AttendanceStatus::Late, 6.1),
            day(AttendanceStatus::HalfDay, 3.2),
            day(AttendanceStatus::Absent, 0.0),
        ];
        let tally = StatusTally::from_days(&days);

        assert_eq!(tally.present, 2);
        assert_eq!(tally.late, 1);
        assert_eq!(tally.half_day, 1);
        assert_eq!(tally.absent, 1);
        assert_eq!(tally.attended(), 4);
        assert_eq!(tally.hours(), 24.8);
    }
}
