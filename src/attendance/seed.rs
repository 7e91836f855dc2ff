//! Demo data for a fresh database: a small roster and a month of history.
//!
//! History is derived from the date and the employee's roster position, so a
//! given day always seeds the same shift. Every day goes through the same
//! policy and store operations as a live check-in/check-out.

use chrono::{DateTime, Datelike, Days, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use tracing::{debug, info};

use crate::attendance::classifier::AttendancePolicy;
use crate::attendance::roster::register_employee;
use crate::database::models::{EmployeeFilter, NewEmployee, Role};
use crate::database::store::AttendanceStore;
use crate::error::{AttendanceError, Result};
use crate::utils::time::{self, is_working_day};

/// How far back `seed` generates attendance.
pub const DEMO_HISTORY_DAYS: u64 = 30;

const DEMO_ROSTER: [(&str, &str, &str, &str, Role); 6] = [
    ("John Manager", "manager@company.com", "MGR001", "Management", Role::Manager),
    ("Alice Johnson", "alice@company.com", "EMP001", "Engineering", Role::Employee),
    ("Bob Smith", "bob@company.com", "EMP002", "Engineering", Role::Employee),
    ("Carol Williams", "carol@company.com", "EMP003", "HR", Role::Employee),
    ("David Brown", "david@company.com", "EMP004", "Sales", Role::Employee),
    ("Eva Martinez", "eva@company.com", "EMP005", "Engineering", Role::Employee),
];

/// Inserts a demo roster when no employees exist yet. Returns how many were added.
pub async fn seed_demo_roster<S: AttendanceStore + ?Sized>(store: &S) -> Result<usize> {
    if !store.find_employees(&EmployeeFilter::default()).await?.is_empty() {
        info!("Employees already present, skipping seed");
        return Ok(0);
    }

    for (name, email, code, department, role) in DEMO_ROSTER {
        register_employee(
            store,
            NewEmployee {
                name: name.to_string(),
                email: email.to_string(),
                employee_code: code.to_string(),
                department: department.to_string(),
                role,
            },
        )
        .await?;
    }

    Ok(DEMO_ROSTER.len())
}

/// Check-in and check-out wall-clock times for one employee-day, `None` when
/// the employee stays away. Roughly 5% absent, 5% short, 10% late.
fn demo_shift(date: NaiveDate, index: usize) -> Option<(NaiveTime, NaiveTime)> {
    let day = date.num_days_from_ce().unsigned_abs() as usize;
    let roll = (day + index * 7) % 20;
    let minute = ((day * 3 + index * 11) % 30) as u32;

    match roll {
        0 => None,
        1 => {
            let start = NaiveTime::from_hms_opt(9, minute, 0)?;
            Some((start, start + Duration::minutes(180 + minute as i64)))
        }
        2 | 3 => Some((
            NaiveTime::from_hms_opt(10 + roll as u32 % 2, minute * 2, 0)?,
            NaiveTime::from_hms_opt(18, minute, 0)?,
        )),
        _ => Some((
            NaiveTime::from_hms_opt(8 + roll as u32 % 2, minute, 0)?,
            NaiveTime::from_hms_opt(17 + roll as u32 % 2, minute, 0)?,
        )),
    }
}

fn local_instant(date: NaiveDate, time: NaiveTime, offset: FixedOffset) -> Result<DateTime<Utc>> {
    date.and_time(time)
        .and_local_timezone(offset)
        .single()
        .map(|instant| instant.with_timezone(&Utc))
        .ok_or_else(|| AttendanceError::invalid(format!("no local instant for {} {}", date, time)))
}

/// Fills the `days` working days before `today` for every roster employee.
/// Days that already have a check-in are left alone. Returns the number of
/// days written.
pub async fn seed_demo_history<S: AttendanceStore + ?Sized>(
    store: &S,
    policy: &AttendancePolicy,
    today: NaiveDate,
    offset: FixedOffset,
    days: u64,
) -> Result<usize> {
    let roster = store.find_employees(&EmployeeFilter::roster()).await?;
    let mut written = 0;

    for (index, employee) in roster.iter().enumerate() {
        for back in (1..=days).rev() {
            let Some(date) = today.checked_sub_days(Days::new(back)) else {
                continue;
            };
            if !is_working_day(date) {
                continue;
            }
            let Some((start, end)) = demo_shift(date, index) else {
                continue;
            };

            let check_in = local_instant(date, start, offset)?;
            let check_out = local_instant(date, end, offset)?;
            let status = policy.check_in_status(start);

            if store
                .upsert_check_in(employee.id, date, check_in, status)
                .await?
                .is_none()
            {
                debug!(employee_id = employee.id, %date, "Day already recorded");
                continue;
            }

            let hours = time::hours_between(check_in, check_out);
            store
                .complete_check_out(
                    employee.id,
                    date,
                    check_out,
                    hours,
                    policy.check_out_status(status, hours),
                )
                .await?;
            written += 1;
        }
    }

    info!(employees = roster.len(), days = written, "Seeded attendance history");
    Ok(written)
}
