use anyhow::Result;

use crate::attendance::roster::find_employee_by_code;
use crate::cli::Context;
use crate::cli::commands::reports::Period;
use crate::utils::format::{format_history, format_success_message, format_today_status};
use crate::utils::time::format_time_local;

pub async fn check_in(ctx: &Context, code: &str) -> Result<()> {
    let employee = find_employee_by_code(&ctx.store, code).await?;
    let day = ctx.attendance().record_check_in(employee.id).await?;

    let offset = ctx.offset();
    ctx.emit(&day, |day| {
        let at = day
            .check_in_time
            .map(|instant| format_time_local(instant, offset))
            .unwrap_or_default();
        format_success_message(&format!(
            "{} checked in at {} ({})",
            employee.name, at, day.status
        ))
    })
}

pub async fn check_out(ctx: &Context, code: &str) -> Result<()> {
    let employee = find_employee_by_code(&ctx.store, code).await?;
    let day = ctx.attendance().record_check_out(employee.id).await?;

    let offset = ctx.offset();
    ctx.emit(&day, |day| {
        let at = day
            .check_out_time
            .map(|instant| format_time_local(instant, offset))
            .unwrap_or_default();
        format_success_message(&format!(
            "{} checked out at {}, worked {:.2}h ({})",
            employee.name, at, day.total_hours, day.status
        ))
    })
}

pub async fn today(ctx: &Context, code: &str) -> Result<()> {
    let employee = find_employee_by_code(&ctx.store, code).await?;
    let status = ctx.attendance().today_status(employee.id).await?;

    let offset = ctx.offset();
    ctx.emit(&status, |status| format_today_status(status, offset))
}

pub async fn history(ctx: &Context, code: &str, period: Period) -> Result<()> {
    let employee = find_employee_by_code(&ctx.store, code).await?;
    let (month, year) = period.resolve(ctx);
    let days = ctx.attendance().history(employee.id, month, year).await?;

    let offset = ctx.offset();
    ctx.emit(&days, |days| format_history(days, offset))
}
