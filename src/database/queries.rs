use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::database::models::{
    AttendanceDay, AttendanceEntry, AttendanceFilter, AttendanceStatus, Employee, EmployeeFilter,
    EmployeeRef, EmployeeUpdate, NewEmployee,
};
use crate::database::store::AttendanceStore;
use crate::error::{AttendanceError, Result};

const DAY_COLUMNS: &str = "a.id, a.employee_id, a.date, a.check_in, a.check_out, a.status, \
                           a.total_hours, a.created_at, a.updated_at";

const EMPLOYEE_COLUMNS: &str = "id, name, email, employee_code, department, role, created_at";

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn day_from_row(row: &SqliteRow) -> Result<AttendanceDay> {
    let status: String = row.try_get("status")?;

    Ok(AttendanceDay {
        id: row.try_get("id")?,
        employee_id: row.try_get("employee_id")?,
        date: row.try_get("date")?,
        check_in_time: row.try_get("check_in")?,
        check_out_time: row.try_get("check_out")?,
        status: status.parse()?,
        total_hours: row.try_get("total_hours")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn employee_from_row(row: &SqliteRow) -> Result<Employee> {
    let role: String = row.try_get("role")?;

    Ok(Employee {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        employee_code: row.try_get("employee_code")?,
        department: row.try_get("department")?,
        role: role.parse()?,
        created_at: row.try_get("created_at")?,
    })
}

// Unique-key clashes on employees are caller mistakes, not store failures.
fn map_employee_write_error(err: sqlx::Error) -> AttendanceError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AttendanceError::invalid("employee code or email already registered");
        }
    }
    AttendanceError::Store(err)
}

#[async_trait]
impl AttendanceStore for SqliteStore {
    async fn find_attendance_day(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceDay>> {
        let row = sqlx::query(&format!(
            "SELECT {DAY_COLUMNS} FROM attendance_days a WHERE a.employee_id = ? AND a.date = ?"
        ))
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(day_from_row).transpose()
    }

    async fn upsert_check_in(
        &self,
        employee_id: i64,
        date: NaiveDate,
        check_in: DateTime<Utc>,
        status: AttendanceStatus,
    ) -> Result<Option<AttendanceDay>> {
        // The conflict branch only fires for a day without a check-in, so a
        // concurrent second check-in returns no row instead of a duplicate.
        let row = sqlx::query(
            r#"
            INSERT INTO attendance_days (employee_id, date, check_in, status, total_hours)
            VALUES (?, ?, ?, ?, 0)
            ON CONFLICT (employee_id, date) DO UPDATE
                SET check_in = excluded.check_in,
                    status = excluded.status,
                    updated_at = CURRENT_TIMESTAMP
                WHERE attendance_days.check_in IS NULL
            RETURNING id, employee_id, date, check_in, check_out, status, total_hours,
                      created_at, updated_at
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .bind(check_in)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(day_from_row).transpose()
    }

    async fn complete_check_out(
        &self,
        employee_id: i64,
        date: NaiveDate,
        check_out: DateTime<Utc>,
        total_hours: f64,
        status: AttendanceStatus,
    ) -> Result<Option<AttendanceDay>> {
        let row = sqlx::query(
            r#"
            UPDATE attendance_days
            SET check_out = ?, total_hours = ?, status = ?, updated_at = CURRENT_TIMESTAMP
            WHERE employee_id = ? AND date = ?
              AND check_in IS NOT NULL AND check_out IS NULL
            RETURNING id, employee_id, date, check_in, check_out, status, total_hours,
                      created_at, updated_at
            "#,
        )
        .bind(check_out)
        .bind(total_hours)
        .bind(status.as_str())
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(day_from_row).transpose()
    }

    async fn query_attendance_days(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceEntry>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {DAY_COLUMNS}, e.name, e.employee_code, e.department \
             FROM attendance_days a JOIN employees e ON e.id = a.employee_id WHERE 1 = 1"
        ));

        if let Some(employee_id) = filter.employee_id {
            query.push(" AND a.employee_id = ").push_bind(employee_id);
        }
        if let Some(from) = filter.from {
            query.push(" AND a.date >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            query.push(" AND a.date <= ").push_bind(to);
        }
        if let Some(status) = filter.status {
            query.push(" AND a.status = ").push_bind(status.as_str());
        }
        query.push(" ORDER BY a.date ASC, e.employee_code ASC");

        let rows = query.build().fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> Result<AttendanceEntry> {
                Ok(AttendanceEntry {
                    day: day_from_row(row)?,
                    employee: EmployeeRef {
                        name: row.try_get("name")?,
                        employee_code: row.try_get("employee_code")?,
                        department: row.try_get("department")?,
                    },
                })
            })
            .collect()
    }

    async fn find_employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE 1 = 1"));

        if let Some(role) = filter.role {
            query.push(" AND role = ").push_bind(role.as_str());
        }
        if let Some(code) = &filter.employee_code {
            query.push(" AND employee_code = ").push_bind(code.clone());
        }
        query.push(" ORDER BY employee_code ASC");

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(employee_from_row).collect()
    }

    async fn get_employee(&self, employee_id: i64) -> Result<Option<Employee>> {
        let row = sqlx::query(&format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?"))
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(employee_from_row).transpose()
    }

    async fn create_employee(&self, employee: &NewEmployee) -> Result<Employee> {
        let result = sqlx::query(
            "INSERT INTO employees (name, email, employee_code, department, role) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(&employee.employee_code)
        .bind(&employee.department)
        .bind(employee.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_employee_write_error)?;

        let employee_id = result.last_insert_rowid();
        self.get_employee(employee_id)
            .await?
            .ok_or_else(|| AttendanceError::not_found(format!("employee {}", employee_id)))
    }

    async fn update_employee(
        &self,
        employee_id: i64,
        update: &EmployeeUpdate,
    ) -> Result<Option<Employee>> {
        let result = sqlx::query(
            "UPDATE employees \
             SET name = COALESCE(?, name), \
                 email = COALESCE(?, email), \
                 department = COALESCE(?, department), \
                 updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?",
        )
        .bind(update.name.as_deref())
        .bind(update.email.as_deref())
        .bind(update.department.as_deref())
        .bind(employee_id)
        .execute(&self.pool)
        .await
        .map_err(map_employee_write_error)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_employee(employee_id).await
    }
}
