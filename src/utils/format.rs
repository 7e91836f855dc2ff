use chrono::{DateTime, FixedOffset, Utc};

use crate::attendance::TodayStatus;
use crate::database::models::{AttendanceDay, AttendanceEntry, Employee};
use crate::reports::dashboard::{EmployeeDashboard, ManagerDashboard};
use crate::reports::team::{EmployeeDayInfo, TeamMonthSummary, TodayTeamStatus};
use crate::reports::{MonthlySummary, WeeklyTrendDay};
use crate::utils::time::format_time_local;

fn time_or_dash(instant: Option<DateTime<Utc>>, offset: FixedOffset) -> String {
    instant
        .map(|instant| format_time_local(instant, offset))
        .unwrap_or_else(|| "--:--:--".to_string())
}

pub fn format_day(day: &AttendanceDay, offset: FixedOffset) -> String {
    format!(
        "{}  in {}  out {}  {:<8}  {:>5.2}h",
        day.date.format("%Y-%m-%d (%a)"),
        time_or_dash(day.check_in_time, offset),
        time_or_dash(day.check_out_time, offset),
        day.status.as_str(),
        day.total_hours
    )
}

pub fn format_today_status(status: &TodayStatus, offset: FixedOffset) -> String {
    format!(
        "Today: {}\n  Check in:  {}\n  Check out: {}\n  Hours:     {:.2}",
        status.status,
        time_or_dash(status.check_in_time, offset),
        time_or_dash(status.check_out_time, offset),
        status.total_hours
    )
}

pub fn format_history(days: &[AttendanceDay], offset: FixedOffset) -> String {
    if days.is_empty() {
        return "No attendance records for this period".to_string();
    }

    let mut text = String::new();
    let mut total_hours = 0.0;
    for day in days {
        text.push_str(&format_day(day, offset));
        text.push('\n');
        total_hours += day.total_hours;
    }
    text.push_str(&format!("Total: {:.2}h over {} day(s)", total_hours, days.len()));
    text
}

pub fn format_monthly_summary(summary: &MonthlySummary) -> String {
    format!(
        "Summary {:04}-{:02}\n  Working days: {}\n  Present:      {}\n  Late:         {}\n  Half-day:     {}\n  Absent:       {}\n  Total hours:  {:.2}",
        summary.year,
        summary.month,
        summary.working_days,
        summary.present,
        summary.late,
        summary.half_day,
        summary.absent,
        summary.total_hours
    )
}

pub fn format_team_summary(summary: &TeamMonthSummary) -> String {
    let mut text = format!("Team summary {:04}-{:02}\n", summary.year, summary.month);

    text.push_str(&format!(
        "{:<8} {:<20} {:<14} {:>7} {:>5} {:>8} {:>8}\n",
        "Code", "Name", "Department", "Present", "Late", "Half-day", "Hours"
    ));
    for stats in &summary.employee_stats {
        text.push_str(&format!(
            "{:<8} {:<20} {:<14} {:>7} {:>5} {:>8} {:>8.2}\n",
            stats.employee_code,
            stats.name,
            stats.department,
            stats.present,
            stats.late,
            stats.half_day,
            stats.total_hours
        ));
    }

    text.push_str("\nBy department\n");
    for (department, stats) in &summary.department_stats {
        text.push_str(&format!(
            "  {:<14} employees {:>3}  present {:>4}  late {:>4}  half-day {:>4}  hours {:>8.2}\n",
            department,
            stats.employee_count,
            stats.present,
            stats.late,
            stats.half_day,
            stats.total_hours
        ));
    }
    text
}

fn format_bucket(title: &str, people: &[EmployeeDayInfo], offset: FixedOffset) -> String {
    let mut text = format!("{} ({})\n", title, people.len());
    for person in people {
        text.push_str(&format!(
            "  {:<8} {:<20} {:<14} in {}  out {}\n",
            person.employee_code,
            person.name,
            person.department,
            time_or_dash(person.check_in_time, offset),
            time_or_dash(person.check_out_time, offset)
        ));
    }
    text
}

pub fn format_today_team(status: &TodayTeamStatus, offset: FixedOffset) -> String {
    let mut text = format!(
        "Team status {}: {} total, {} present, {} late, {} not checked in\n\n",
        status.date,
        status.summary.total,
        status.summary.present,
        status.summary.late,
        status.summary.not_checked_in
    );
    text.push_str(&format_bucket("Present", &status.details.present, offset));
    text.push_str(&format_bucket("Late", &status.details.late, offset));
    text.push_str(&format_bucket("Not checked in", &status.details.not_checked_in, offset));
    text
}

pub fn format_weekly_trend(trend: &[WeeklyTrendDay]) -> String {
    let mut text = format!("{:<12} {:<4} {:>7} {:>5} {:>6}\n", "Date", "Day", "Present", "Late", "Absent");
    for day in trend {
        text.push_str(&format!(
            "{:<12} {:<4} {:>7} {:>5} {:>6}\n",
            day.date.to_string(),
            day.weekday_label,
            day.present,
            day.late,
            day.absent
        ));
    }
    text
}

pub fn format_employee(employee: &Employee) -> String {
    format!(
        "#{:<4} {:<8} {:<20} {:<14} {:<8} {}",
        employee.id,
        employee.employee_code,
        employee.name,
        employee.department,
        employee.role.as_str(),
        employee.email
    )
}

pub fn format_entries(entries: &[AttendanceEntry], offset: FixedOffset) -> String {
    if entries.is_empty() {
        return "No attendance records match".to_string();
    }

    entries
        .iter()
        .map(|entry| {
            format!(
                "{:<8} {:<20} {}",
                entry.employee.employee_code,
                entry.employee.name,
                format_day(&entry.day, offset)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_employee_dashboard(dashboard: &EmployeeDashboard, offset: FixedOffset) -> String {
    format!(
        "{} ({}, {})\n\n{}\n\n{}\n\nLast 7 days\n{}",
        dashboard.user.name,
        dashboard.user.employee_code,
        dashboard.user.department,
        format_today_status(&dashboard.today, offset),
        format_monthly_summary(&dashboard.monthly_stats),
        format_history(&dashboard.recent_attendance, offset)
    )
}

pub fn format_manager_dashboard(dashboard: &ManagerDashboard, offset: FixedOffset) -> String {
    let stats = &dashboard.today_stats;
    let mut text = format!(
        "Employees: {}\nToday: {} present, {} late, {} half-day, {} absent\n",
        dashboard.total_employees, stats.present, stats.late, stats.half_day, stats.absent
    );

    text.push_str(&format!("\nLate arrivals ({})\n", dashboard.late_arrivals.len()));
    for late in &dashboard.late_arrivals {
        text.push_str(&format!(
            "  {:<8} {:<20} {:<14} in {}\n",
            late.employee_code,
            late.name,
            late.department,
            time_or_dash(late.check_in_time, offset)
        ));
    }

    text.push_str(&format!("\nAbsent ({})\n", dashboard.absent_employees.len()));
    for absent in &dashboard.absent_employees {
        text.push_str(&format!(
            "  {:<8} {:<20} {}\n",
            absent.employee_code, absent.name, absent.department
        ));
    }

    text.push_str("\nWeekly trend\n");
    text.push_str(&format_weekly_trend(&dashboard.weekly_trend));

    text.push_str("\nMonth to date by department\n");
    for (department, stats) in &dashboard.department_stats {
        text.push_str(&format!(
            "  {:<14} employees {:>3}  present {:>4}  late {:>4}  half-day {:>4}\n",
            department, stats.employees, stats.present, stats.late, stats.half_day
        ));
    }
    text
}

pub fn format_error_message(error: &str) -> String {
    format!("❌ Error: {}", error)
}

pub fn format_success_message(message: &str) -> String {
    format!("✅ {}", message)
}

pub fn format_info_message(message: &str) -> String {
    format!("ℹ️ {}", message)
}
