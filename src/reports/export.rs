use std::io;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::attendance::roster::find_employee_by_code;
use crate::database::models::{AttendanceEntry, AttendanceFilter, AttendanceStatus};
use crate::database::store::AttendanceStore;
use crate::error::{AttendanceError, Result};
use crate::reports::Reports;
use crate::utils::time::{self, Clock};

pub const EXPORT_HEADERS: [&str; 8] = [
    "Date",
    "Employee ID",
    "Name",
    "Department",
    "Check In",
    "Check Out",
    "Status",
    "Total Hours",
];

const MISSING: &str = "N/A";

/// Manager-side filter over the attendance table.
#[derive(Debug, Clone, Default)]
pub struct AttendanceQuery {
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
    pub employee_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Employee ID")]
    pub employee_code: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Check In")]
    pub check_in: String,
    #[serde(rename = "Check Out")]
    pub check_out: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Total Hours")]
    pub total_hours: String,
}

impl ExportRow {
    pub fn from_entry(entry: &AttendanceEntry, offset: FixedOffset) -> Self {
        let local = |instant: Option<DateTime<Utc>>| {
            instant
                .map(|instant| time::format_time_local(instant, offset))
                .unwrap_or_else(|| MISSING.to_string())
        };

        Self {
            date: entry.day.date.format("%Y-%m-%d").to_string(),
            employee_code: entry.employee.employee_code.clone(),
            name: entry.employee.name.clone(),
            department: entry.employee.department.clone(),
            check_in: local(entry.day.check_in_time),
            check_out: local(entry.day.check_out_time),
            status: entry.day.status.as_str().to_string(),
            total_hours: format!("{:.2}", entry.day.total_hours),
        }
    }
}

/// Writes the header row followed by one line per row.
pub fn write_csv<W: io::Write>(rows: &[ExportRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(EXPORT_HEADERS)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;

    Ok(())
}

impl<S: AttendanceStore, C: Clock> Reports<S, C> {
    async fn resolve_code(&self, code: Option<&str>) -> Result<Option<i64>> {
        match code {
            Some(code) => Ok(Some(find_employee_by_code(&self.store, code).await?.id)),
            None => Ok(None),
        }
    }

    /// Newest date first, latest check-in first within a date.
    pub async fn list_attendance(&self, query: &AttendanceQuery) -> Result<Vec<AttendanceEntry>> {
        let mut filter = match (query.date, query.from, query.to) {
            (Some(date), _, _) => AttendanceFilter::on(date),
            (None, Some(from), Some(to)) if from > to => {
                return Err(AttendanceError::invalid(format!(
                    "start date {} is after end date {}",
                    from, to
                )));
            }
            (None, from, to) => AttendanceFilter {
                from,
                to,
                ..Default::default()
            },
        };
        filter.status = query.status;
        filter.employee_id = self.resolve_code(query.employee_code.as_deref()).await?;

        let mut entries = self.store.query_attendance_days(&filter).await?;
        entries.sort_by(|a, b| {
            b.day
                .date
                .cmp(&a.day.date)
                .then_with(|| b.day.check_in_time.cmp(&a.day.check_in_time))
        });

        Ok(entries)
    }

    /// One employee's month with identity fields, newest first.
    pub async fn employee_attendance(
        &self,
        employee_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<AttendanceEntry>> {
        self.employee(employee_id).await?;
        let (first, last) = time::month_bounds(year, month)?;

        let mut entries = self
            .store
            .query_attendance_days(&AttendanceFilter::between(first, last).for_employee(employee_id))
            .await?;
        entries.sort_by(|a, b| b.day.date.cmp(&a.day.date));

        Ok(entries)
    }

    /// Tabular export of `[start, end]`, ordered by date then employee code.
    pub async fn export_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        employee_code: Option<&str>,
    ) -> Result<Vec<ExportRow>> {
        if start > end {
            return Err(AttendanceError::invalid(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }

        let mut filter = AttendanceFilter::between(start, end);
        filter.employee_id = self.resolve_code(employee_code).await?;

        let mut entries = self.store.query_attendance_days(&filter).await?;
        entries.sort_by(|a, b| {
            a.day
                .date
                .cmp(&b.day.date)
                .then_with(|| a.employee.employee_code.cmp(&b.employee.employee_code))
        });

        let offset = self.clock.offset();
        let rows: Vec<ExportRow> = entries
            .iter()
            .map(|entry| ExportRow::from_entry(entry, offset))
            .collect();

        info!(%start, %end, rows = rows.len(), "Exported attendance");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{AttendanceDay, EmployeeRef};
    use chrono::TimeZone;

    fn entry(check_out: bool) -> AttendanceEntry {
        let check_in = Utc.with_ymd_and_hms(2024, 3, 4, 0, 15, 0).unwrap();
        AttendanceEntry {
            day: AttendanceDay {
                id: 1,
                employee_id: 7,
                date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                check_in_time: Some(check_in),
                check_out_time: check_out.then(|| check_in + chrono::Duration::hours(8)),
                status: AttendanceStatus::Present,
                total_hours: if check_out { 8.0 } else { 0.0 },
                created_at: check_in,
                updated_at: check_in,
            },
            employee: EmployeeRef {
                name: "Alice Johnson".to_string(),
                employee_code: "EMP001".to_string(),
                department: "Engineering".to_string(),
            },
        }
    }

    #[test]
    fn row_uses_local_times_and_placeholders() {
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();

        let row = ExportRow::from_entry(&entry(false), offset);
        assert_eq!(row.date, "2024-03-04");
        assert_eq!(row.check_in, "09:15:00");
        assert_eq!(row.check_out, "N/A");
        assert_eq!(row.total_hours, "0.00");

        let row = ExportRow::from_entry(&entry(true), offset);
        assert_eq!(row.check_out, "17:15:00");
        assert_eq!(row.total_hours, "8.00");
    }

    #[test]
    fn csv_always_has_header() {
        let mut out = Vec::new();
        write_csv(&[], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Date,Employee ID,Name,Department,Check In,Check Out,Status,Total Hours\n"
        );
    }

    #[test]
    fn csv_rows_follow_header() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let mut out = Vec::new();
        write_csv(&[ExportRow::from_entry(&entry(true), offset)], &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "2024-03-04,EMP001,Alice Johnson,Engineering,00:15:00,08:15:00,present,8.00"
        );
    }
}
