use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use clap::Args;

use crate::attendance::roster::find_employee_by_code;
use crate::cli::Context;
use crate::database::models::AttendanceStatus;
use crate::reports::AttendanceQuery;
use crate::reports::export::write_csv;
use crate::utils::format::{
    format_employee_dashboard, format_entries, format_manager_dashboard, format_monthly_summary,
    format_success_message, format_team_summary, format_today_team, format_weekly_trend,
};
use crate::utils::time::{Clock, month_bounds};

/// Month selector; missing parts default to the current month.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct Period {
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
    #[arg(long)]
    pub year: Option<i32>,
}

impl Period {
    pub fn resolve(&self, ctx: &Context) -> (u32, i32) {
        let today = ctx.clock.today();
        (
            self.month.unwrap_or(today.month()),
            self.year.unwrap_or(today.year()),
        )
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub from: Option<NaiveDate>,
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// present, late, half-day or absent.
    #[arg(long)]
    pub status: Option<String>,
    /// Employee code.
    #[arg(long)]
    pub employee: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,
    /// Employee code; `all` or omitted exports everyone.
    #[arg(long)]
    pub employee: Option<String>,
    /// Defaults to stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub async fn summary(ctx: &Context, code: &str, period: Period) -> Result<()> {
    let employee = find_employee_by_code(&ctx.store, code).await?;
    let (month, year) = period.resolve(ctx);
    let summary = ctx
        .reports()
        .summarize_employee_month(employee.id, month, year)
        .await?;

    ctx.emit(&summary, format_monthly_summary)
}

pub async fn team(ctx: &Context, period: Period) -> Result<()> {
    let (month, year) = period.resolve(ctx);
    let summary = ctx.reports().summarize_team_month(month, year).await?;

    ctx.emit(&summary, format_team_summary)
}

pub async fn team_today(ctx: &Context) -> Result<()> {
    let status = ctx.reports().summarize_today_team_status().await?;

    let offset = ctx.offset();
    ctx.emit(&status, |status| format_today_team(status, offset))
}

pub async fn trend(ctx: &Context) -> Result<()> {
    let trend = ctx.reports().build_weekly_trend().await?;

    ctx.emit(&trend, |trend| format_weekly_trend(trend))
}

pub async fn dashboard(ctx: &Context, code: &str) -> Result<()> {
    let employee = find_employee_by_code(&ctx.store, code).await?;
    let dashboard = ctx.reports().employee_dashboard(employee.id).await?;

    let offset = ctx.offset();
    ctx.emit(&dashboard, |dashboard| format_employee_dashboard(dashboard, offset))
}

pub async fn manager_dashboard(ctx: &Context) -> Result<()> {
    let dashboard = ctx.reports().manager_dashboard().await?;

    let offset = ctx.offset();
    ctx.emit(&dashboard, |dashboard| format_manager_dashboard(dashboard, offset))
}

pub async fn list(ctx: &Context, args: ListArgs) -> Result<()> {
    let status = args
        .status
        .as_deref()
        .map(str::parse::<AttendanceStatus>)
        .transpose()?;

    let query = AttendanceQuery {
        date: args.date,
        from: args.from,
        to: args.to,
        status,
        employee_code: args.employee,
    };
    let entries = ctx.reports().list_attendance(&query).await?;

    let offset = ctx.offset();
    ctx.emit(&entries, |entries| format_entries(entries, offset))
}

pub async fn export(ctx: &Context, args: ExportArgs) -> Result<()> {
    let (start, end): (NaiveDate, NaiveDate) = match (args.from, args.to) {
        (Some(from), Some(to)) => (from, to),
        _ => {
            let today = ctx.clock.today();
            month_bounds(today.year(), today.month())?
        }
    };
    let employee = args
        .employee
        .as_deref()
        .filter(|code| !code.eq_ignore_ascii_case("all"));

    let rows = ctx.reports().export_range(start, end, employee).await?;

    match &args.output {
        Some(path) => {
            write_csv(&rows, File::create(path)?)?;
            eprintln!(
                "{}",
                format_success_message(&format!(
                    "Wrote {} rows to {}",
                    rows.len(),
                    path.display()
                ))
            );
        }
        None => write_csv(&rows, io::stdout().lock())?,
    }

    Ok(())
}
