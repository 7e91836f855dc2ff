use anyhow::Result;
use clap::Subcommand;

use crate::attendance::roster::{
    find_employee_by_code, list_roster, register_employee, update_employee_profile,
};
use crate::attendance::seed::{DEMO_HISTORY_DAYS, seed_demo_history, seed_demo_roster};
use crate::cli::Context;
use crate::database::models::{EmployeeUpdate, NewEmployee, Role};
use crate::utils::format::{format_employee, format_info_message, format_success_message};
use crate::utils::time::Clock;

#[derive(Subcommand, Debug)]
pub enum EmployeeCommand {
    Add {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        department: String,
        #[arg(long, default_value = "employee")]
        role: String,
    },
    Update {
        code: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        department: Option<String>,
    },
    /// Employees counted in attendance reports.
    List,
}

pub async fn run(ctx: &Context, command: EmployeeCommand) -> Result<()> {
    match command {
        EmployeeCommand::Add {
            code,
            name,
            email,
            department,
            role,
        } => {
            let role: Role = role.parse()?;
            let employee = register_employee(
                &ctx.store,
                NewEmployee {
                    name,
                    email,
                    employee_code: code,
                    department,
                    role,
                },
            )
            .await?;
            ctx.emit(&employee, |employee| {
                format_success_message(&format!("Registered {}", format_employee(employee)))
            })
        }
        EmployeeCommand::Update {
            code,
            name,
            email,
            department,
        } => {
            let update = EmployeeUpdate {
                name,
                email,
                department,
            };
            if update.is_empty() {
                println!("{}", format_info_message("Nothing to update"));
                return Ok(());
            }

            let employee = find_employee_by_code(&ctx.store, &code).await?;
            let employee = update_employee_profile(&ctx.store, employee.id, update).await?;
            ctx.emit(&employee, |employee| {
                format_success_message(&format!("Updated {}", format_employee(employee)))
            })
        }
        EmployeeCommand::List => {
            let roster = list_roster(&ctx.store).await?;
            ctx.emit(&roster, |roster| {
                roster
                    .iter()
                    .map(format_employee)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
    }
}

pub async fn seed(ctx: &Context) -> Result<()> {
    let added = seed_demo_roster(&ctx.store).await?;
    if added == 0 {
        println!("{}", format_info_message("Employees already exist, nothing seeded"));
        return Ok(());
    }

    let days = seed_demo_history(
        &ctx.store,
        &ctx.policy,
        ctx.clock.today(),
        ctx.offset(),
        DEMO_HISTORY_DAYS,
    )
    .await?;
    println!(
        "{}",
        format_success_message(&format!(
            "Seeded {} employees and {} attendance days",
            added, days
        ))
    );
    Ok(())
}
