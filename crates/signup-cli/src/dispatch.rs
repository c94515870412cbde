use std::io::IsTerminal;

use anyhow::{Result, bail};
use comfy_table::{Cell, ContentArrangement, Table};
use signup_app::App;
use signup_core::doctor::DoctorReport;
use signup_core::strength::PasswordStrength;
use signup_tui::UiExit;

use crate::cli::{Cli, Command};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Doctor) => run_doctor_command(),
        Some(Command::Strength { password }) => run_strength_command(&password),
        None => run_wizard_command(),
    }
}

fn run_wizard_command() -> Result<()> {
    let config = signup_app::ensure_config_ready()?;
    if !std::io::stdout().is_terminal() {
        bail!(
            "the registration wizard needs an interactive terminal\nRun `signup doctor` to check your setup."
        );
    }

    let app = App::from_config(config);
    match signup_tui::run_wizard(&app)? {
        UiExit::Completed => println!("Registration complete."),
        UiExit::Left | UiExit::Canceled => {
            log::info!("wizard closed without creating an account");
        }
    }

    Ok(())
}

fn run_doctor_command() -> Result<()> {
    let report = signup_app::doctor_report();
    println!("{}", doctor_table(&report));
    println!("{}", report.summary());
    if report.has_failures() {
        log::warn!("doctor reported failing checks");
        println!("Fix the failing checks above and rerun `signup doctor`.");
    }
    Ok(())
}

fn run_strength_command(password: &str) -> Result<()> {
    let strength = signup_app::password_strength(password);
    println!("{}", strength_table(&strength));
    Ok(())
}

fn doctor_table(report: &DoctorReport) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Check", "Status", "Details"]);

    for check in &report.checks {
        table.add_row(vec![
            Cell::new(check.name.as_str()),
            Cell::new(check.state.to_string()),
            Cell::new(check.details.as_str()),
        ]);
    }

    table
}

fn strength_table(strength: &PasswordStrength) -> Table {
    let label = match strength.label.as_str() {
        "" => "-",
        label => label,
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Score", "Label", "Meter", "Tone"]);
    table.add_row(vec![
        Cell::new(format!("{}/{}", strength.score, signup_core::strength::MAX_SCORE)),
        Cell::new(label),
        Cell::new(format!("{}%", strength.meter_percent())),
        Cell::new(strength.tone().as_str()),
    ]);
    table
}
