use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::Serialize;

use crate::attendance::TodayStatus;
use crate::database::models::{AttendanceDay, AttendanceFilter, AttendanceStatus, EmployeeFilter};
use crate::database::store::AttendanceStore;
use crate::error::Result;
use crate::reports::monthly::MonthlySummary;
use crate::reports::team::days_by_employee;
use crate::reports::{Reports, StatusTally};
use crate::utils::time::Clock;

const TREND_DAYS: u64 = 7;
const RECENT_DAYS: u64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTrendDay {
    pub date: NaiveDate,
    pub weekday_label: String,
    pub present: u32,
    pub late: u32,
    pub absent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardUser {
    pub name: String,
    #[serde(rename = "employeeId")]
    pub employee_code: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDashboard {
    pub today: TodayStatus,
    pub monthly_stats: MonthlySummary,
    pub recent_attendance: Vec<AttendanceDay>,
    pub user: DashboardUser,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayStats {
    pub present: u32,
    pub late: u32,
    pub absent: u32,
    pub half_day: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LateArrival {
    pub name: String,
    #[serde(rename = "employeeId")]
    pub employee_code: String,
    pub department: String,
    pub check_in_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentMonthToDate {
    pub employees: u32,
    pub present: u32,
    pub late: u32,
    pub half_day: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerDashboard {
    pub total_employees: usize,
    pub today_stats: TodayStats,
    pub late_arrivals: Vec<LateArrival>,
    pub absent_employees: Vec<DashboardUser>,
    pub weekly_trend: Vec<WeeklyTrendDay>,
    pub department_stats: BTreeMap<String, DepartmentMonthToDate>,
}

impl<S: AttendanceStore, C: Clock> Reports<S, C> {
    /// Seven days ending today, oldest first. Every roster employee without a
    /// record on a day is absent that day, weekends included.
    pub async fn build_weekly_trend(&self) -> Result<Vec<WeeklyTrendDay>> {
        let today = self.clock.today();
        let start = today - Days::new(TREND_DAYS - 1);

        let roster = self.store.find_employees(&EmployeeFilter::roster()).await?;
        let roster_ids: HashSet<i64> = roster.iter().map(|employee| employee.id).collect();

        let mut by_date: HashMap<NaiveDate, Vec<AttendanceDay>> = HashMap::new();
        for entry in self
            .store
            .query_attendance_days(&AttendanceFilter::between(start, today))
            .await?
        {
            if roster_ids.contains(&entry.day.employee_id) {
                by_date.entry(entry.day.date).or_default().push(entry.day);
            }
        }

        let total = roster.len() as u32;
        let trend = start
            .iter_days()
            .take_while(|date| *date <= today)
            .map(|date| {
                let days = by_date.get(&date).map(Vec::as_slice).unwrap_or_default();
                let count = |status: AttendanceStatus| {
                    days.iter().filter(|day| day.status == status).count() as u32
                };

                WeeklyTrendDay {
                    date,
                    weekday_label: date.format("%a").to_string(),
                    present: count(AttendanceStatus::Present),
                    late: count(AttendanceStatus::Late),
                    absent: total.saturating_sub(days.len() as u32),
                }
            })
            .collect();

        Ok(trend)
    }

    pub async fn employee_dashboard(&self, employee_id: i64) -> Result<EmployeeDashboard> {
        let employee = self.employee(employee_id).await?;
        let today = self.clock.today();

        let monthly_stats = self
            .summarize_employee_month(employee_id, today.month(), today.year())
            .await?;

        let mut recent: Vec<AttendanceDay> = self
            .store
            .query_attendance_days(
                &AttendanceFilter::between(today - Days::new(RECENT_DAYS), today)
                    .for_employee(employee_id),
            )
            .await?
            .into_iter()
            .map(|entry| entry.day)
            .collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));

        let today_day = recent.iter().find(|day| day.date == today);

        Ok(EmployeeDashboard {
            today: TodayStatus::from_day(today_day),
            monthly_stats,
            recent_attendance: recent,
            user: DashboardUser {
                name: employee.name,
                employee_code: employee.employee_code,
                department: employee.department,
            },
        })
    }

    pub async fn manager_dashboard(&self) -> Result<ManagerDashboard> {
        let today = self.clock.today();
        let month_start = today.with_day(1).unwrap_or(today);

        let roster = self.store.find_employees(&EmployeeFilter::roster()).await?;
        let today_days = days_by_employee(&self.store, &AttendanceFilter::on(today)).await?;
        let month_days =
            days_by_employee(&self.store, &AttendanceFilter::between(month_start, today)).await?;

        let mut today_stats = TodayStats::default();
        let mut late_arrivals = Vec::new();
        let mut absent_employees = Vec::new();
        let mut department_stats: BTreeMap<String, DepartmentMonthToDate> = BTreeMap::new();

        for employee in &roster {
            match today_days.get(&employee.id).and_then(|days| days.first()) {
                Some(day) => match day.status {
                    AttendanceStatus::Present => today_stats.present += 1,
                    AttendanceStatus::HalfDay => today_stats.half_day += 1,
                    AttendanceStatus::Late => {
                        today_stats.late += 1;
                        late_arrivals.push(LateArrival {
                            name: employee.name.clone(),
                            employee_code: employee.employee_code.clone(),
                            department: employee.department.clone(),
                            check_in_time: day.check_in_time,
                        });
                    }
                    AttendanceStatus::Absent => {}
                },
                None => absent_employees.push(DashboardUser {
                    name: employee.name.clone(),
                    employee_code: employee.employee_code.clone(),
                    department: employee.department.clone(),
                }),
            }

            let tally = month_days
                .get(&employee.id)
                .map(|days| StatusTally::from_days(days))
                .unwrap_or_default();
            let department = department_stats.entry(employee.department.clone()).or_default();
            department.employees += 1;
            department.present += tally.present;
            department.late += tally.late;
            department.half_day += tally.half_day;
        }

        // Anyone on the roster without a row today.
        today_stats.absent = absent_employees.len() as u32;

        Ok(ManagerDashboard {
            total_employees: roster.len(),
            today_stats,
            late_arrivals,
            absent_employees,
            weekly_trend: self.build_weekly_trend().await?,
            department_stats,
        })
    }
}
