use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::database::models::{AttendanceDay, AttendanceFilter, AttendanceStatus, Employee, EmployeeFilter};
use crate::database::store::AttendanceStore;
use crate::error::Result;
use crate::reports::{Reports, StatusTally};
use crate::utils::time::{self, Clock, round_hours};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeStats {
    pub id: i64,
    #[serde(rename = "employeeId")]
    pub employee_code: String,
    pub name: String,
    pub department: String,
    pub present: u32,
    pub late: u32,
    pub half_day: u32,
    pub total_hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStats {
    pub present: u32,
    pub late: u32,
    pub half_day: u32,
    pub total_hours: f64,
    pub employee_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMonthSummary {
    pub month: u32,
    pub year: i32,
    pub employee_stats: Vec<EmployeeStats>,
    pub department_stats: BTreeMap<String, DepartmentStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDayInfo {
    pub id: i64,
    pub name: String,
    #[serde(rename = "employeeId")]
    pub employee_code: String,
    pub department: String,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayCounts {
    pub total: usize,
    pub present: usize,
    pub late: usize,
    pub not_checked_in: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayBuckets {
    pub present: Vec<EmployeeDayInfo>,
    pub late: Vec<EmployeeDayInfo>,
    pub not_checked_in: Vec<EmployeeDayInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayTeamStatus {
    pub date: NaiveDate,
    pub summary: TodayCounts,
    pub details: TodayBuckets,
}

/// Days matching `filter`, grouped by employee id.
pub(crate) async fn days_by_employee<S: AttendanceStore + ?Sized>(
    store: &S,
    filter: &AttendanceFilter,
) -> Result<HashMap<i64, Vec<AttendanceDay>>> {
    let mut grouped: HashMap<i64, Vec<AttendanceDay>> = HashMap::new();
    for entry in store.query_attendance_days(filter).await? {
        grouped.entry(entry.day.employee_id).or_default().push(entry.day);
    }
    Ok(grouped)
}

impl<S: AttendanceStore, C: Clock> Reports<S, C> {
    /// Raw per-employee counts for a month, rolled up by department.
    /// No absence is inferred here.
    pub async fn summarize_team_month(&self, month: u32, year: i32) -> Result<TeamMonthSummary> {
        let (first, last) = time::month_bounds(year, month)?;

        let roster = self.store.find_employees(&EmployeeFilter::roster()).await?;
        let days = days_by_employee(&self.store, &AttendanceFilter::between(first, last)).await?;

        let mut employee_stats = Vec::with_capacity(roster.len());
        let mut department_stats: BTreeMap<String, DepartmentStats> = BTreeMap::new();

        for employee in &roster {
            let tally = days
                .get(&employee.id)
                .map(|days| StatusTally::from_days(days))
                .unwrap_or_default();

            let department = department_stats.entry(employee.department.clone()).or_default();
            department.present += tally.present;
            department.late += tally.late;
            department.half_day += tally.half_day;
            department.total_hours += tally.total_hours;
            department.employee_count += 1;

            employee_stats.push(EmployeeStats {
                id: employee.id,
                employee_code: employee.employee_code.clone(),
                name: employee.name.clone(),
                department: employee.department.clone(),
                present: tally.present,
                late: tally.late,
                half_day: tally.half_day,
                total_hours: tally.hours(),
            });
        }

        for stats in department_stats.values_mut() {
            stats.total_hours = round_hours(stats.total_hours);
        }

        info!(
            month,
            year,
            employees = roster.len(),
            departments = department_stats.len(),
            "Built team summary"
        );

        Ok(TeamMonthSummary {
            month,
            year,
            employee_stats,
            department_stats,
        })
    }

    /// Partitions the roster into present, late and not-checked-in for today.
    pub async fn summarize_today_team_status(&self) -> Result<TodayTeamStatus> {
        let today = self.clock.today();

        let roster = self.store.find_employees(&EmployeeFilter::roster()).await?;
        let days = days_by_employee(&self.store, &AttendanceFilter::on(today)).await?;

        let mut details = TodayBuckets::default();
        for employee in &roster {
            let day = days.get(&employee.id).and_then(|days| days.first());
            let info = day_info(employee, day);

            match day.map(|day| (day.status, day.check_in_time.is_some())) {
                Some((AttendanceStatus::Present | AttendanceStatus::HalfDay, true)) => {
                    details.present.push(info)
                }
                Some((AttendanceStatus::Late, true)) => details.late.push(info),
                // Missing rows and rows without a check-in both count as not checked in.
                _ => details.not_checked_in.push(info),
            }
        }

        Ok(TodayTeamStatus {
            date: today,
            summary: TodayCounts {
                total: roster.len(),
                present: details.present.len(),
                late: details.late.len(),
                not_checked_in: details.not_checked_in.len(),
            },
            details,
        })
    }
}

fn day_info(employee: &Employee, day: Option<&AttendanceDay>) -> EmployeeDayInfo {
    EmployeeDayInfo {
        id: employee.id,
        name: employee.name.clone(),
        employee_code: employee.employee_code.clone(),
        department: employee.department.clone(),
        check_in_time: day.and_then(|day| day.check_in_time),
        check_out_time: day.and_then(|day| day.check_out_time),
    }
}
