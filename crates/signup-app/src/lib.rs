mod services;
mod submission;
mod wizard;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use signup_core::config::{SignupConfig, load_config_or_default, resolve_config_path};
use signup_core::doctor::{DoctorReport, run_doctor};
use signup_core::strength::{PasswordStrength, score_password};

pub use services::{
    AccountCreationService, AccountReceipt, AccountRequest, CreationEvent, LogNotificationSink,
    NotificationSink, SimulatedAccountService, SocialProvider,
};
pub use submission::{GateStart, SubmissionGate, SubmissionPhase, SubmissionResolution};
pub use wizard::{AdvanceError, SubmissionTicket, SubmitError, WizardController};

pub struct App {
    config: SignupConfig,
    accounts: Arc<dyn AccountCreationService>,
}

impl App {
    pub fn new(config: SignupConfig, accounts: Arc<dyn AccountCreationService>) -> Self {
        Self { config, accounts }
    }

    /// Wires the simulated backend using the configured delay.
    pub fn from_config(config: SignupConfig) -> Self {
        let accounts = Arc::new(SimulatedAccountService::new(config.submission.delay()));
        Self::new(config, accounts)
    }

    pub fn config(&self) -> &SignupConfig {
        &self.config
    }

    pub fn start_wizard(&self, notifier: Arc<dyn NotificationSink>) -> WizardController {
        log::debug!(
            "starting wizard with submission timeout {} ms",
            self.config.submission.timeout_ms
        );
        WizardController::new(
            Arc::clone(&self.accounts),
            notifier,
            self.config.submission.timeout(),
        )
    }
}

pub fn doctor_report() -> DoctorReport {
    log::info!("running doctor checks");
    run_doctor()
}

pub fn password_strength(password: &str) -> PasswordStrength {
    score_password(password)
}

pub fn ensure_config_ready() -> Result<SignupConfig> {
    let config_path = resolve_config_path().context("failed to resolve config path")?;
    load_config_ready(&config_path)
}

pub fn load_config_ready(config_path: &Path) -> Result<SignupConfig> {
    if !config_path.exists() {
        log::info!(
            "no config at {}; using built-in defaults",
            config_path.display()
        );
    }

    load_config_or_default(config_path).map_err(|error| {
        anyhow!(
            "invalid config at {}: {error}\nFix the config and retry. See README.md for setup instructions.",
            config_path.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn load_config_ready_defaults_when_missing() {
        let temp = tempfile::tempdir().expect("temp dir");
        let config = load_config_ready(&temp.path().join("config.toml")).expect("config");
        assert_eq!(config, SignupConfig::default());
    }

    #[test]
    fn load_config_ready_reports_path_for_invalid_config() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "version = 3\n").expect("write config");

        let error = load_config_ready(&path).expect_err("invalid config");
        let message = error.to_string();
        assert!(message.contains("invalid config at"));
        assert!(message.contains("version must be 1"));
    }

    #[test]
    fn password_strength_delegates_to_scorer() {
        assert_eq!(password_strength("abc").score, 1);
        assert_eq!(password_strength("Abcdefg1!").score, 5);
    }

    #[test]
    fn app_keeps_loaded_config() {
        let mut config = SignupConfig::default();
        config.submission.timeout_ms = 2_000;
        let app = App::from_config(config.clone());
        assert_eq!(app.config(), &config);
    }
}
