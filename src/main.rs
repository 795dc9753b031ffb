// Clinic Scheduler
// Headless entry point: lists the appointments for a view window

use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};

use clinic_scheduler::models::directory::{Role, SessionUser};
use clinic_scheduler::models::view_context::ViewMode;
use clinic_scheduler::services::config::Config;
use clinic_scheduler::services::repository::HttpAppointmentClient;
use clinic_scheduler::services::scheduler::Scheduler;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let (view_mode, anchor) = parse_args()?;

    let config = Config::load()?;
    log::info!("Starting clinic scheduler against {}", config.api_base_url);

    let client = HttpAppointmentClient::new(
        &config.api_base_url,
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("failed to build appointment store client")?;

    let session = SessionUser {
        user_id: 0,
        role: Role::Admin,
        first_name: "Front".to_string(),
        last_name: "Desk".to_string(),
    };

    let today = Local::now().date_naive();
    let mut scheduler = Scheduler::new(client, session, today, config.max_appointment_minutes);
    scheduler.set_view_mode(view_mode)?;
    scheduler.set_anchor(anchor)?;
    scheduler.refresh()?;

    let range = scheduler.active_range();
    println!("Appointments {} .. {}", range.start, range.end);
    for appointment in scheduler.appointments() {
        println!(
            "  {} - {}  {}",
            appointment.start.format("%Y-%m-%d %H:%M"),
            appointment.end().format("%H:%M"),
            appointment.display_title()
        );
    }

    Ok(())
}

fn parse_args() -> Result<(ViewMode, NaiveDate)> {
    let mut view_mode = ViewMode::Day;
    let mut anchor = Local::now().date_naive();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--view" => {
                let value = args.next().context("--view needs a value")?;
                view_mode = match value.as_str() {
                    "day" => ViewMode::Day,
                    "week" => ViewMode::Week,
                    "month" => ViewMode::Month,
                    other => bail!("unknown view mode '{}'", other),
                };
            }
            "--date" => {
                let value = args.next().context("--date needs a value")?;
                anchor = value
                    .parse()
                    .with_context(|| format!("invalid date '{}'", value))?;
            }
            other => bail!("unknown argument '{}' (expected --view or --date)", other),
        }
    }

    Ok((view_mode, anchor))
}
