use sqlx::SqlitePool;
use tracing::info;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Running database migrations...");

    create_employees_table(pool).await?;
    create_attendance_days_table(pool).await?;

    info!("Database migrations completed successfully");
    Ok(())
}

async fn create_employees_table(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            employee_code TEXT UNIQUE NOT NULL,
            department TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'employee' CHECK (role IN ('employee', 'manager')),
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

// One row per (employee, calendar day); the unique key backs the check-in upsert.
async fn create_attendance_days_table(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS attendance_days (
            id INTEGER PRIMARY KEY,
            employee_id INTEGER NOT NULL,
            date DATE NOT NULL,
            check_in DATETIME,
            check_out DATETIME,
            status TEXT NOT NULL DEFAULT 'present'
                CHECK (status IN ('present', 'late', 'half-day', 'absent')),
            total_hours REAL NOT NULL DEFAULT 0 CHECK (total_hours >= 0),
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (employee_id, date),
            CHECK (check_out IS NULL OR check_in IS NOT NULL),
            FOREIGN KEY (employee_id) REFERENCES employees (id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_attendance_days_date ON attendance_days (date)")
        .execute(pool)
        .await?;

    Ok(())
}
