pub mod commands;

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::attendance::{AttendancePolicy, AttendanceService};
use crate::config::Config;
use crate::database::{self, SqliteStore};
use crate::reports::Reports;
use crate::utils::time::{Clock, FixedClock, SystemClock, parse_offset};

#[derive(Parser, Debug)]
#[command(name = "kintai")]
#[command(about = "Employee attendance tracking and reports")]
pub struct Cli {
    /// Overrides DATABASE_URL.
    #[arg(long, global = true)]
    pub database_url: Option<String>,
    /// Overrides UTC_OFFSET, e.g. +09:00.
    #[arg(long, global = true)]
    pub utc_offset: Option<String>,
    /// Run as if the current instant were this RFC 3339 timestamp.
    #[arg(long, global = true)]
    pub at: Option<DateTime<FixedOffset>>,
    /// Print results as JSON.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the employee roster.
    Employee {
        #[command(subcommand)]
        command: commands::employees::EmployeeCommand,
    },
    /// Insert a demo roster into an empty database.
    Seed,
    CheckIn {
        code: String,
    },
    CheckOut {
        code: String,
    },
    /// Today's record for one employee.
    Today {
        code: String,
    },
    History {
        code: String,
        #[command(flatten)]
        period: commands::reports::Period,
    },
    /// Monthly totals with inferred absences.
    Summary {
        code: String,
        #[command(flatten)]
        period: commands::reports::Period,
    },
    /// Per-employee and per-department totals for a month.
    Team {
        #[command(flatten)]
        period: commands::reports::Period,
    },
    /// Who is present, late or not checked in today.
    TeamToday,
    /// Attendance over the last seven days.
    Trend,
    Dashboard {
        code: String,
    },
    ManagerDashboard,
    /// Attendance records matching filters.
    List(commands::reports::ListArgs),
    /// Write attendance as CSV.
    Export(commands::reports::ExportArgs),
}

#[derive(Debug, Clone, Copy)]
pub enum AppClock {
    System(SystemClock),
    Fixed(FixedClock),
}

impl Clock for AppClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self {
            AppClock::System(clock) => clock.now(),
            AppClock::Fixed(clock) => clock.now(),
        }
    }
}

/// Shared state handed to every command.
pub struct Context {
    pub store: SqliteStore,
    pub clock: AppClock,
    pub policy: AttendancePolicy,
    pub json: bool,
}

impl Context {
    pub fn attendance(&self) -> AttendanceService<SqliteStore, AppClock> {
        AttendanceService::new(self.store.clone(), self.clock, self.policy)
    }

    pub fn reports(&self) -> Reports<SqliteStore, AppClock> {
        Reports::new(self.store.clone(), self.clock)
    }

    pub fn offset(&self) -> FixedOffset {
        self.clock.offset()
    }

    /// JSON when `--json` was given, otherwise the text rendering.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text(value));
        }
        Ok(())
    }
}

pub async fn create_context(cli: &Cli, config: Config) -> Result<Context> {
    let database_url = cli.database_url.clone().unwrap_or(config.database_url);

    let offset = match &cli.utc_offset {
        Some(value) => Some(parse_offset(value)?),
        None => config.utc_offset,
    };

    let clock = match (cli.at, offset) {
        (Some(at), Some(offset)) => AppClock::Fixed(FixedClock(at.with_timezone(&offset))),
        (Some(at), None) => AppClock::Fixed(FixedClock(at)),
        (None, Some(offset)) => AppClock::System(SystemClock::new(offset)),
        (None, None) => AppClock::System(SystemClock::local()),
    };

    let pool = database::create_connection(&database_url).await?;

    Ok(Context {
        store: SqliteStore::new(pool),
        clock,
        policy: config.policy,
        json: cli.json,
    })
}

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let ctx = create_context(&cli, config).await?;

    match cli.command {
        Command::Employee { command } => commands::employees::run(&ctx, command).await,
        Command::Seed => commands::employees::seed(&ctx).await,
        Command::CheckIn { code } => commands::attendance::check_in(&ctx, &code).await,
        Command::CheckOut { code } => commands::attendance::check_out(&ctx, &code).await,
        Command::Today { code } => commands::attendance::today(&ctx, &code).await,
        Command::History { code, period } => {
            commands::attendance::history(&ctx, &code, period).await
        }
        Command::Summary { code, period } => commands::reports::summary(&ctx, &code, period).await,
        Command::Team { period } => commands::reports::team(&ctx, period).await,
        Command::TeamToday => commands::reports::team_today(&ctx).await,
        Command::Trend => commands::reports::trend(&ctx).await,
        Command::Dashboard { code } => commands::reports::dashboard(&ctx, &code).await,
        Command::ManagerDashboard => commands::reports::manager_dashboard(&ctx).await,
        Command::List(args) => commands::reports::list(&ctx, args).await,
        Command::Export(args) => commands::reports::export(&ctx, args).await,
    }
}
