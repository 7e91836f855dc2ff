use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::attendance::classifier::AttendancePolicy;
use crate::database::models::{AttendanceDay, AttendanceFilter};
use crate::database::store::AttendanceStore;
use crate::error::{AttendanceError, Result};
use crate::utils::time::{self, Clock};

pub const NOT_CHECKED_IN: &str = "not-checked-in";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayStatus {
    pub status: String,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub total_hours: f64,
}

impl TodayStatus {
    pub fn from_day(day: Option<&AttendanceDay>) -> Self {
        match day {
            Some(day) => Self {
                status: day.status.as_str().to_string(),
                check_in_time: day.check_in_time,
                check_out_time: day.check_out_time,
                total_hours: day.total_hours,
            },
            None => Self {
                status: NOT_CHECKED_IN.to_string(),
                check_in_time: None,
                check_out_time: None,
                total_hours: 0.0,
            },
        }
    }
}

/// Records check-ins and check-outs and classifies each employee-day.
pub struct AttendanceService<S, C> {
    store: S,
    clock: C,
    policy: AttendancePolicy,
}

impl<S: AttendanceStore, C: Clock> AttendanceService<S, C> {
    pub fn new(store: S, clock: C, policy: AttendancePolicy) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    async fn ensure_employee(&self, employee_id: i64) -> Result<()> {
        match self.store.get_employee(employee_id).await? {
            Some(_) => Ok(()),
            None => Err(AttendanceError::not_found(format!("employee {}", employee_id))),
        }
    }

    pub async fn record_check_in(&self, employee_id: i64) -> Result<AttendanceDay> {
        self.ensure_employee(employee_id).await?;

        let now = self.clock.now();
        let today = now.date_naive();
        let status = self.policy.check_in_status(now.time());

        match self
            .store
            .upsert_check_in(employee_id, today, now.with_timezone(&Utc), status)
            .await?
        {
            Some(day) => {
                info!(employee_id, date = %today, status = %day.status, "Checked in");
                Ok(day)
            }
            None => {
                warn!(employee_id, date = %today, "Rejected second check-in");
                Err(AttendanceError::AlreadyCheckedIn)
            }
        }
    }

    pub async fn record_check_out(&self, employee_id: i64) -> Result<AttendanceDay> {
        self.ensure_employee(employee_id).await?;

        let now = self.clock.now();
        let today = now.date_naive();

        let day = self.store.find_attendance_day(employee_id, today).await?;
        let (check_in, current_status) = match &day {
            Some(day) if day.check_out_time.is_some() => {
                warn!(employee_id, date = %today, "Rejected second check-out");
                return Err(AttendanceError::AlreadyCheckedOut);
            }
            Some(AttendanceDay {
                check_in_time: Some(check_in),
                status,
                ..
            }) => (*check_in, *status),
            _ => {
                warn!(employee_id, date = %today, "Rejected check-out without check-in");
                return Err(AttendanceError::NotCheckedIn);
            }
        };

        let check_out = now.with_timezone(&Utc).max(check_in);
        let hours = time::hours_between(check_in, check_out);
        let status = self.policy.check_out_status(current_status, hours);

        let updated = self
            .store
            .complete_check_out(employee_id, today, check_out, hours, status)
            .await?;

        match updated {
            Some(day) => {
                info!(employee_id, date = %today, status = %day.status, hours, "Checked out");
                Ok(day)
            }
            // Someone checked out between the read and the guarded update.
            None => Err(AttendanceError::AlreadyCheckedOut),
        }
    }

    pub async fn today_status(&self, employee_id: i64) -> Result<TodayStatus> {
        self.ensure_employee(employee_id).await?;
        let day = self
            .store
            .find_attendance_day(employee_id, self.clock.today())
            .await?;
        Ok(TodayStatus::from_day(day.as_ref()))
    }

    /// The employee's days in a month, newest first.
    pub async fn history(&self, employee_id: i64, month: u32, year: i32) -> Result<Vec<AttendanceDay>> {
        self.ensure_employee(employee_id).await?;
        let (first, last) = time::month_bounds(year, month)?;

        let mut days: Vec<AttendanceDay> = self
            .store
            .query_attendance_days(&AttendanceFilter::between(first, last).for_employee(employee_id))
            .await?
            .into_iter()
            .map(|entry| entry.day)
            .collect();
        days.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(days)
    }
}
