use std::fmt;
use std::io::IsTerminal;
use std::path::Path;

use crate::config::{SignupConfig, load_config, resolve_config_path};
use crate::fields::FieldMap;
use crate::steps::{step_at, step_count};
use crate::validate::validate_step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Pass,
    Fail,
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCheck {
    pub name: String,
    pub state: CheckState,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    pub fn has_failures(&self) -> bool {
        self.checks
            .iter()
            .any(|check| check.state == CheckState::Fail)
    }

    pub fn summary(&self) -> String {
        let passed = self
            .checks
            .iter()
            .filter(|check| check.state == CheckState::Pass)
            .count();
        let failed = self.checks.len().saturating_sub(passed);
        format!("{passed} passed, {failed} failed")
    }
}

pub fn run_doctor() -> DoctorReport {
    let mut checks = Vec::new();

    checks.push(if std::io::stdout().is_terminal() {
        pass_check("stdout is a terminal", "interactive wizard can run")
    } else {
        fail_check(
            "stdout is a terminal",
            "stdout is redirected; the wizard needs an interactive terminal",
        )
    });

    match resolve_config_path() {
        Ok(config_path) => checks.extend(config_checks(&config_path)),
        Err(error) => {
            checks.push(fail_check("config path resolves", error.to_string()));
            push_skipped_checks(
                &mut checks,
                &["config parses and validates", "submission timing"],
                "config path could not be resolved",
            );
        }
    }

    checks.push(step_table_check());

    DoctorReport { checks }
}

/// Every step must exist at its 1-based position and reject a blank form.
pub fn step_table_check() -> DoctorCheck {
    const NAME: &str = "wizard steps";
    let blank = FieldMap::new();
    let mut titles = Vec::new();

    for number in 1..=step_count() {
        let Some(step) = step_at(number) else {
            return fail_check(NAME, format!("step {number} is missing"));
        };
        if validate_step(step.id, &blank).is_valid() {
            return fail_check(NAME, format!("step {number} ({}) accepts a blank form", step.title));
        }
        titles.push(step.title);
    }

    pass_check(NAME, format!("{} steps: {}", titles.len(), titles.join(", ")))
}

pub fn config_checks(config_path: &Path) -> Vec<DoctorCheck> {
    let mut checks = Vec::new();

    if !config_path.exists() {
        checks.push(pass_check(
            "config file exists",
            format!(
                "not found at {}; built-in defaults apply",
                config_path.display()
            ),
        ));
        checks.push(pass_check(
            "config parses and validates",
            "using built-in defaults",
        ));
        checks.push(timing_check(&SignupConfig::default()));
        return checks;
    }

    checks.push(pass_check(
        "config file exists",
        format!("found at {}", config_path.display()),
    ));

    match load_config(config_path) {
        Ok(config) => {
            checks.push(pass_check("config parses and validates", "config is valid"));
            checks.push(timing_check(&config));
        }
        Err(error) => {
            checks.push(fail_check("config parses and validates", error.to_string()));
            checks.push(skipped_check("submission timing", "config is invalid"));
        }
    }

    checks
}

fn timing_check(config: &SignupConfig) -> DoctorCheck {
    pass_check(
        "submission timing",
        format!(
            "simulated delay {} ms, timeout {} ms",
            config.submission.delay_ms, config.submission.timeout_ms
        ),
    )
}

fn pass_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Pass,
        details: details.into(),
    }
}

fn fail_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Fail,
        details: details.into(),
    }
}

fn skipped_check(name: &str, reason: &str) -> DoctorCheck {
    fail_check(name, format!("skipped because {reason}"))
}

fn push_skipped_checks(checks: &mut Vec<DoctorCheck>, names: &[&str], reason: &str) {
    checks.extend(
        names
            .iter()
            .copied()
            .map(|name| skipped_check(name, reason)),
    );
}
