mod common;

use chrono::NaiveDate;
use kintai::AttendanceError;
use kintai::database::models::{AttendanceStatus, Role};
use kintai::reports::AttendanceQuery;
use kintai::reports::export::write_csv;

use common::{add_employee, add_with_role, reports_at, setup, work_day};

const NOW: &str = "2024-03-13T12:00:00+00:00";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn month_summary_infers_absence_from_elapsed_working_days() {
    let store = setup().await;
    let alice = add_employee(&store, "EMP001", "Alice Johnson", "Engineering").await;

    work_day(&store, alice.id, "2024-03-01T09:00:00+00:00", Some("2024-03-01T17:00:00+00:00")).await;
    work_day(&store, alice.id, "2024-03-04T09:45:00+00:00", Some("2024-03-04T17:45:00+00:00")).await;
    work_day(&store, alice.id, "2024-03-05T08:00:00+00:00", Some("2024-03-05T11:00:00+00:00")).await;

    let summary = reports_at(&store, NOW)
        .summarize_employee_month(alice.id, 3, 2024)
        .await
        .unwrap();

    assert_eq!(summary.working_days, 9);
    assert_eq!(summary.present, 1);
    assert_eq!(summary.late, 1);
    assert_eq!(summary.half_day, 1);
    assert_eq!(summary.absent, 6);
    assert_eq!(summary.total_hours, 19.0);
    assert_eq!(
        summary.present + summary.late + summary.half_day + summary.absent,
        summary.working_days
    );
}

#[tokio::test]
async fn past_month_counts_every_working_day() {
    let store = setup().await;
    let alice = add_employee(&store, "EMP001", "Alice Johnson", "Engineering").await;

    let summary = reports_at(&store, NOW)
        .summarize_employee_month(alice.id, 2, 2024)
        .await
        .unwrap();

    assert_eq!(summary.working_days, 21);
    assert_eq!(summary.absent, 21);
    assert_eq!(summary.total_hours, 0.0);
}

#[tokio::test]
async fn future_month_has_no_working_days_yet() {
    let store = setup().await;
    let alice = add_employee(&store, "EMP001", "Alice Johnson", "Engineering").await;

    let summary = reports_at(&store, NOW)
        .summarize_employee_month(alice.id, 4, 2024)
        .await
        .unwrap();

    assert_eq!(summary.working_days, 0);
    assert_eq!(summary.absent, 0);
}

#[tokio::test]
async fn invalid_month_is_rejected() {
    let store = setup().await;
    let alice = add_employee(&store, "EMP001", "Alice Johnson", "Engineering").await;

    let err = reports_at(&store, NOW)
        .summarize_employee_month(alice.id, 13, 2024)
        .await
        .unwrap_err();

    assert!(matches!(err, AttendanceError::InvalidInput(_)));
}

#[tokio::test]
async fn team_month_groups_by_department_without_managers() {
    let store = setup().await;
    let alice = add_employee(&store, "EMP001", "Alice Johnson", "Engineering").await;
    let bob = add_employee(&store, "EMP002", "Bob Smith", "Engineering").await;
    let carol = add_employee(&store, "EMP003", "Carol Davis", "HR").await;
    let _dave = add_employee(&store, "EMP004", "Dave Wilson", "Sales").await;
    let boss = add_with_role(&store, "MGR001", "Manager One", "Management", Role::Manager).await;

    work_day(&store, alice.id, "2024-03-04T09:00:00+00:00", Some("2024-03-04T17:00:00+00:00")).await;
    work_day(&store, alice.id, "2024-03-05T09:00:00+00:00", Some("2024-03-05T17:00:00+00:00")).await;
    work_day(&store, bob.id, "2024-03-04T09:45:00+00:00", Some("2024-03-04T17:45:00+00:00")).await;
    work_day(&store, carol.id, "2024-03-04T08:00:00+00:00", Some("2024-03-04T11:30:00+00:00")).await;
    work_day(&store, boss.id, "2024-03-04T09:00:00+00:00", None).await;
    // Outside the month.
    work_day(&store, alice.id, "2024-02-29T09:00:00+00:00", None).await;

    let summary = reports_at(&store, NOW).summarize_team_month(3, 2024).await.unwrap();

    let codes: Vec<&str> = summary
        .employee_stats
        .iter()
        .map(|stats| stats.employee_code.as_str())
        .collect();
    assert_eq!(codes, vec!["EMP001", "EMP002", "EMP003", "EMP004"]);

    let alice_stats = &summary.employee_stats[0];
    assert_eq!(alice_stats.present, 2);
    assert_eq!(alice_stats.total_hours, 16.0);

    let engineering = &summary.department_stats["Engineering"];
    assert_eq!(engineering.employee_count, 2);
    assert_eq!(engineering.present, 2);
    assert_eq!(engineering.late, 1);
    assert_eq!(engineering.total_hours, 24.0);

    let hr = &summary.department_stats["HR"];
    assert_eq!(hr.half_day, 1);
    assert_eq!(hr.total_hours, 3.5);

    let sales = &summary.department_stats["Sales"];
    assert_eq!(sales.employee_count, 1);
    assert_eq!(sales.present + sales.late + sales.half_day, 0);

    assert!(!summary.department_stats.contains_key("Management"));

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["employeeStats"][0]["employeeId"], "EMP001");
    assert_eq!(json["departmentStats"]["Engineering"]["employeeCount"], 2);
}

#[tokio::test]
async fn today_team_status_partitions_roster() {
    let store = setup().await;
    let alice = add_employee(&store, "EMP001", "Alice Johnson", "Engineering").await;
    let bob = add_employee(&store, "EMP002", "Bob Smith", "Engineering").await;
    add_employee(&store, "EMP003", "Carol Davis", "HR").await;
    add_employee(&store, "EMP004", "Dave Wilson", "Sales").await;
    add_employee(&store, "EMP005", "Eve Brown", "Sales").await;
    let boss = add_with_role(&store, "MGR001", "Manager One", "Management", Role::Manager).await;

    work_day(&store, alice.id, "2024-03-13T09:00:00+00:00", None).await;
    work_day(&store, bob.id, "2024-03-13T09:45:00+00:00", None).await;
    work_day(&store, boss.id, "2024-03-13T08:30:00+00:00", None).await;

    let status = reports_at(&store, NOW).summarize_today_team_status().await.unwrap();

    assert_eq!(status.date, date(2024, 3, 13));
    assert_eq!(status.summary.total, 5);
    assert_eq!(status.summary.present, 1);
    assert_eq!(status.summary.late, 1);
    assert_eq!(status.summary.not_checked_in, 3);
    assert_eq!(
        status.summary.present + status.summary.late + status.summary.not_checked_in,
        status.summary.total
    );

    assert_eq!(status.details.present[0].employee_code, "EMP001");
    assert_eq!(status.details.late[0].employee_code, "EMP002");
    assert!(status.details.late[0].check_in_time.is_some());
    assert!(
        status
            .details
            .not_checked_in
            .iter()
            .all(|info| info.check_in_time.is_none())
    );

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["details"]["late"][0]["employeeId"], "EMP002");
    assert_eq!(json["summary"]["notCheckedIn"], 3);
}

#[tokio::test]
async fn weekly_trend_covers_seven_days_oldest_first() {
    let store = setup().await;
    let alice = add_employee(&store, "EMP001", "Alice Johnson", "Engineering").await;
    let bob = add_employee(&store, "EMP002", "Bob Smith", "Engineering").await;

    for day in ["07", "11", "12", "13"] {
        work_day(&store, alice.id, &format!("2024-03-{}T09:00:00+00:00", day), None).await;
    }
    work_day(&store, bob.id, "2024-03-13T09:45:00+00:00", None).await;

    let trend = reports_at(&store, NOW).build_weekly_trend().await.unwrap();

    assert_eq!(trend.len(), 7);
    assert_eq!(trend[0].date, date(2024, 3, 7));
    assert_eq!(trend[6].date, date(2024, 3, 13));
    let labels: Vec<&str> = trend.iter().map(|day| day.weekday_label.as_str()).collect();
    assert_eq!(labels, vec!["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"]);

    // Thursday: Alice in, Bob missing.
    assert_eq!((trend[0].present, trend[0].late, trend[0].absent), (1, 0, 1));
    // Weekends are not exempt.
    assert_eq!(trend[2].absent, 2);
    assert_eq!(trend[3].absent, 2);
    // Today: one on time, one late.
    assert_eq!((trend[6].present, trend[6].late, trend[6].absent), (1, 1, 0));
}

#[tokio::test]
async fn export_orders_by_date_then_code_with_placeholders() {
    let store = setup().await;
    let alice = add_employee(&store, "EMP001", "Alice Johnson", "Engineering").await;
    let bob = add_employee(&store, "EMP002", "Bob Smith", "Engineering").await;

    work_day(&store, bob.id, "2024-03-04T09:45:00+00:00", Some("2024-03-04T17:45:00+00:00")).await;
    work_day(&store, alice.id, "2024-03-04T09:00:00+00:00", Some("2024-03-04T17:30:00+00:00")).await;
    work_day(&store, alice.id, "2024-03-05T09:00:00+00:00", None).await;
    work_day(&store, alice.id, "2024-03-20T09:00:00+00:00", None).await;

    let rows = reports_at(&store, NOW)
        .export_range(date(2024, 3, 1), date(2024, 3, 15), None)
        .await
        .unwrap();

    let keys: Vec<(&str, &str)> = rows
        .iter()
        .map(|row| (row.date.as_str(), row.employee_code.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("2024-03-04", "EMP001"),
            ("2024-03-04", "EMP002"),
            ("2024-03-05", "EMP001"),
        ]
    );

    assert_eq!(rows[0].check_in, "09:00:00");
    assert_eq!(rows[0].total_hours, "8.50");
    assert_eq!(rows[1].status, "late");
    assert_eq!(rows[2].check_out, "N/A");
    assert_eq!(rows[2].total_hours, "0.00");

    let mut out = Vec::new();
    write_csv(&rows, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("Date,Employee ID,Name,Department,Check In,Check Out,Status,Total Hours")
    );
    assert_eq!(
        lines.next(),
        Some("2024-03-04,EMP001,Alice Johnson,Engineering,09:00:00,17:30:00,present,8.50")
    );
    assert_eq!(lines.count(), 2);
}

#[tokio::test]
async fn export_filters_by_employee_code() {
    let store = setup().await;
    let alice = add_employee(&store, "EMP001", "Alice Johnson", "Engineering").await;
    let bob = add_employee(&store, "EMP002", "Bob Smith", "Engineering").await;

    work_day(&store, alice.id, "2024-03-04T09:00:00+00:00", None).await;
    work_day(&store, bob.id, "2024-03-04T09:00:00+00:00", None).await;

    let rows = reports_at(&store, NOW)
        .export_range(date(2024, 3, 1), date(2024, 3, 31), Some("EMP002"))
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Bob Smith");
}

#[tokio::test]
async fn empty_export_still_writes_header() {
    let store = setup().await;
    add_employee(&store, "EMP001", "Alice Johnson", "Engineering").await;

    let rows = reports_at(&store, NOW)
        .export_range(date(2024, 3, 1), date(2024, 3, 31), None)
        .await
        .unwrap();
    assert!(rows.is_empty());

    let mut out = Vec::new();
    write_csv(&rows, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap().trim_end(),
        "Date,Employee ID,Name,Department,Check In,Check Out,Status,Total Hours"
    );
}

#[tokio::test]
async fn export_rejects_unknown_code_and_inverted_range() {
    let store = setup().await;
    add_employee(&store, "EMP001", "Alice Johnson", "Engineering").await;
    let reports = reports_at(&store, NOW);

    let err = reports
        .export_range(date(2024, 3, 1), date(2024, 3, 31), Some("EMP999"))
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::NotFound(_)));

    let err = reports
        .export_range(date(2024, 3, 31), date(2024, 3, 1), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::InvalidInput(_)));
}

#[tokio::test]
async fn list_attendance_filters_status_newest_first() {
    let store = setup().await;
    let alice = add_employee(&store, "EMP001", "Alice Johnson", "Engineering").await;
    let bob = add_employee(&store, "EMP002", "Bob Smith", "Engineering").await;

    work_day(&store, alice.id, "2024-03-04T09:45:00+00:00", None).await;
    work_day(&store, alice.id, "2024-03-06T09:50:00+00:00", None).await;
    work_day(&store, bob.id, "2024-03-06T09:40:00+00:00", None).await;
    work_day(&store, bob.id, "2024-03-05T09:00:00+00:00", None).await;

    let entries = reports_at(&store, NOW)
        .list_attendance(&AttendanceQuery {
            status: Some(AttendanceStatus::Late),
            ..Default::default()
        })
        .await
        .unwrap();

    let keys: Vec<(NaiveDate, &str)> = entries
        .iter()
        .map(|entry| (entry.day.date, entry.employee.employee_code.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            (date(2024, 3, 6), "EMP001"),
            (date(2024, 3, 6), "EMP002"),
            (date(2024, 3, 4), "EMP001"),
        ]
    );
}

#[tokio::test]
async fn list_attendance_for_single_date() {
    let store = setup().await;
    let alice = add_employee(&store, "EMP001", "Alice Johnson", "Engineering").await;

    work_day(&store, alice.id, "2024-03-04T09:00:00+00:00", None).await;
    work_day(&store, alice.id, "2024-03-05T09:00:00+00:00", None).await;

    let entries = reports_at(&store, NOW)
        .list_attendance(&AttendanceQuery {
            date: Some(date(2024, 3, 5)),
            employee_code: Some("EMP001".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].day.date, date(2024, 3, 5));
}

#[tokio::test]
async fn employee_dashboard_combines_today_month_and_recent() {
    let store = setup().await;
    let alice = add_employee(&store, "EMP001", "Alice Johnson", "Engineering").await;

    for day in ["05", "06", "12", "13"] {
        work_day(&store, alice.id, &format!("2024-03-{}T09:00:00+00:00", day), None).await;
    }

    let dashboard = reports_at(&store, NOW).employee_dashboard(alice.id).await.unwrap();

    assert_eq!(dashboard.user.employee_code, "EMP001");
    assert_eq!(dashboard.today.status, "present");
    assert_eq!(dashboard.monthly_stats.working_days, 9);
    assert_eq!(dashboard.monthly_stats.present, 4);

    let recent: Vec<NaiveDate> = dashboard
        .recent_attendance
        .iter()
        .map(|day| day.date)
        .collect();
    assert_eq!(recent, vec![date(2024, 3, 13), date(2024, 3, 12), date(2024, 3, 6)]);
}

#[tokio::test]
async fn manager_dashboard_reports_today_and_departments() {
    let store = setup().await;
    let alice = add_employee(&store, "EMP001", "Alice Johnson", "Engineering").await;
    let bob = add_employee(&store, "EMP002", "Bob Smith", "Engineering").await;
    add_employee(&store, "EMP003", "Carol Davis", "HR").await;
    add_with_role(&store, "MGR001", "Manager One", "Management", Role::Manager).await;

    work_day(&store, alice.id, "2024-03-11T09:00:00+00:00", None).await;
    work_day(&store, alice.id, "2024-03-13T09:00:00+00:00", None).await;
    work_day(&store, bob.id, "2024-03-13T10:05:00+00:00", None).await;

    let dashboard = reports_at(&store, NOW).manager_dashboard().await.unwrap();

    assert_eq!(dashboard.total_employees, 3);
    assert_eq!(dashboard.today_stats.present, 1);
    assert_eq!(dashboard.today_stats.late, 1);
    assert_eq!(dashboard.today_stats.absent, 1);

    assert_eq!(dashboard.late_arrivals.len(), 1);
    assert_eq!(dashboard.late_arrivals[0].employee_code, "EMP002");
    assert_eq!(dashboard.absent_employees[0].employee_code, "EMP003");
    assert_eq!(dashboard.weekly_trend.len(), 7);

    let engineering = &dashboard.department_stats["Engineering"];
    assert_eq!(engineering.employees, 2);
    assert_eq!(engineering.present, 2);
    assert_eq!(engineering.late, 1);
    assert_eq!(dashboard.department_stats["HR"].employees, 1);
}

#[tokio::test]
async fn reports_for_unknown_employee_are_not_found() {
    let store = setup().await;
    let reports = reports_at(&store, NOW);

    assert!(matches!(
        reports.summarize_employee_month(99, 3, 2024).await,
        Err(AttendanceError::NotFound(_))
    ));
    assert!(matches!(
        reports.employee_dashboard(99).await,
        Err(AttendanceError::NotFound(_))
    ));
}
